//! Tests for the configuration resolver.
//!
//! Responsibilities:
//! - Test YAML loading, blank and missing files, and path handling.
//! - Test environment overlays.
//! - Test template expansion and memoization.
//!
//! Invariants:
//! - Every test writes its own file under a `TempDir`.
//! - Tests that read process environment variables use `serial_test`.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub mod environment_tests;

/// Writes `yaml` to a fresh file and returns the directory guard and path.
pub fn yaml_to_path(yaml: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("application.yml");
    fs::write(&path, yaml).unwrap();
    (temp_dir, path)
}
