//! Error types for configuration resolution and environment access.
//!
//! Responsibilities:
//! - Define error variants for every fatal failure of the pipeline.
//! - Carry the offending path or key so messages are actionable.
//!
//! Does NOT handle:
//! - Recoverable merge problems (non-string keys or values). Those are
//!   reported as `MergeWarning`s through a `WarningSink`.
//! - Missing or unreadable files, which resolve to an empty document.
//!
//! Invariants:
//! - Errors never include the raw file contents, only positions and paths.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving or reading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Template expansion failed (undefined variable, helper error, bad syntax).
    #[error("Failed to expand templates in config file at {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    /// The expanded text is not valid YAML.
    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document parsed, but its top level is not a mapping.
    #[error("Config file at {path} must contain a mapping at the top level, found {found}")]
    NotAMapping { path: PathBuf, found: &'static str },

    /// The resolved mapping does not fit the requested type.
    #[error("Failed to deserialize configuration: {0}")]
    Deserialize(#[source] serde_yaml::Error),

    #[error("Missing required environment variable: {0}")]
    MissingKey(String),

    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_lists_every_key() {
        let err = ConfigError::MissingKeys(vec!["FOO".to_string(), "BAR".to_string()]);
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: FOO, BAR"
        );
    }

    #[test]
    fn test_not_a_mapping_names_path_and_kind() {
        let err = ConfigError::NotAMapping {
            path: PathBuf::from("config/application.yml"),
            found: "a sequence",
        };
        let message = err.to_string();
        assert!(message.contains("config/application.yml"));
        assert!(message.contains("a sequence"));
    }
}
