//! Centralized constants for the figenv workspace.
//!
//! Default locations and reserved environment variable names live here so
//! the resolver, merger, and global application agree on them.

// =============================================================================
// File Locations
// =============================================================================

/// Directory (relative to the application root) holding the YAML file.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Application name used to build the default file name.
pub const DEFAULT_APP_NAME: &str = "application";

/// Extension of the configuration file.
pub const CONFIG_FILE_EXTENSION: &str = "yml";

/// Default configuration path, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/application.yml";

// =============================================================================
// Reserved Environment Variables
// =============================================================================

/// Prefix of the marker variable recording that a key was written by a load.
///
/// A key that is present without its marker was set by the surrounding
/// process and always wins.
pub const INTERNAL_MARKER_PREFIX: &str = "_FIGENV_";

/// Environment variable supplying the default environment scope of the
/// process-wide application.
pub const ENVIRONMENT_VAR: &str = "FIGENV_ENV";

/// Returns the marker variable name for `key`.
pub fn internal_marker(key: &str) -> String {
    format!("{INTERNAL_MARKER_PREFIX}{key}")
}
