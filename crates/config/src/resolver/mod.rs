//! Configuration resolver.
//!
//! Responsibilities:
//! - Read the YAML file at a path, tolerating its absence.
//! - Expand templates over the whole file, then parse it as YAML.
//! - Flatten the active environment section into the top level.
//! - Cache the result for the lifetime of the resolver.
//!
//! Does NOT handle:
//! - Writing into the environment (see `merger.rs`).
//! - Choosing the path or environment for the process (see `global.rs`).
//!
//! Invariants / Assumptions:
//! - The file is read and parsed at most once per resolver until `reset()`
//!   or a setter discards the cached configuration.
//! - A missing or unreadable file is an empty configuration, never an error.
//! - Template and YAML syntax errors are fatal and are not cached.
//! - Values keep their YAML types; nothing is stringified here.

mod document;
#[cfg(test)]
mod tests;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::constants::{CONFIG_FILE_EXTENSION, DEFAULT_APP_NAME, DEFAULT_CONFIG_DIR};
use crate::diagnostics::WarningSink;
use crate::error::ConfigError;
use crate::memo::Memo;
use crate::merger::{MergeSummary, Merger};
use crate::store::EnvStore;
use crate::template::TemplateEngine;

/// Resolves a YAML file and an environment scope into a flat configuration.
#[derive(Debug, Clone)]
pub struct Resolver {
    path: String,
    environment: Option<String>,
    configuration: Memo<Mapping>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::for_app("", DEFAULT_APP_NAME)
    }
}

impl Resolver {
    /// Create a resolver for the file at `path`.
    ///
    /// Any path-like value is accepted and stored in string form.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path_to_string(path.as_ref()),
            environment: None,
            configuration: Memo::new(),
        }
    }

    /// Create a resolver for `<root>/config/<app_name>.yml`.
    pub fn for_app(root: impl AsRef<Path>, app_name: &str) -> Self {
        let path = root
            .as_ref()
            .join(DEFAULT_CONFIG_DIR)
            .join(format!("{app_name}.{CONFIG_FILE_EXTENSION}"));
        Self::new(path)
    }

    /// Set the environment scope (e.g. "test", "production").
    pub fn with_environment(mut self, environment: impl AsRef<str>) -> Self {
        self.set_environment(environment);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    /// Change the file path. Discards any cached configuration.
    pub fn set_path(&mut self, path: impl AsRef<Path>) {
        self.path = path_to_string(path.as_ref());
        self.reset();
    }

    /// Change the environment scope. Discards any cached configuration.
    pub fn set_environment(&mut self, environment: impl AsRef<str>) {
        self.environment = Some(environment.as_ref().to_string());
        self.reset();
    }

    /// Remove the environment scope. Discards any cached configuration.
    pub fn clear_environment(&mut self) {
        self.environment = None;
        self.reset();
    }

    /// Discard the cached configuration so the next access re-reads the file.
    pub fn reset(&mut self) {
        self.configuration.reset();
    }

    /// Whether the configuration has been computed and cached.
    pub fn is_resolved(&self) -> bool {
        self.configuration.is_computed()
    }

    /// Returns the resolved configuration, reading the file on first call.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Template` if template expansion fails.
    /// - `ConfigError::Parse` if the expanded text is not valid YAML.
    /// - `ConfigError::NotAMapping` if the document is not a mapping.
    pub fn configuration(&self) -> Result<&Mapping, ConfigError> {
        self.configuration.get_or_try_init(|| self.resolve())
    }

    /// Deserialize the resolved configuration into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let mapping = self.configuration()?.clone();
        serde_yaml::from_value(Value::Mapping(mapping)).map_err(ConfigError::Deserialize)
    }

    /// Merge the configuration into the process environment.
    ///
    /// Variables set by the surrounding process are never overwritten.
    /// Skipped entries are reported as `tracing` warnings.
    pub fn load(&self) -> Result<(), ConfigError> {
        Merger::process().load(self)?;
        Ok(())
    }

    /// Merge the configuration through an explicit merger.
    pub fn load_with<S, W>(&self, merger: &mut Merger<S, W>) -> Result<MergeSummary, ConfigError>
    where
        S: EnvStore,
        W: WarningSink,
    {
        merger.load(self)
    }

    fn resolve(&self) -> Result<Mapping, ConfigError> {
        let path = PathBuf::from(&self.path);
        let raw = read_source(&path);

        let expanded = TemplateEngine::new()
            .expand(&raw, self.environment())
            .map_err(|source| ConfigError::Template {
                path: path.clone(),
                source: Box::new(source),
            })?;

        let document = document::parse(&expanded, &path)?;
        let resolved = document::apply_environment(document, self.environment());

        debug!(
            path = %path.display(),
            environment = self.environment(),
            entries = resolved.len(),
            "Resolved configuration"
        );
        Ok(resolved)
    }
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Read the file, treating a missing or unreadable file as empty.
fn read_source(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "Config file not found; using empty configuration");
            String::new()
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Config file is unreadable; using empty configuration"
            );
            String::new()
        }
    }
}
