//! YAML document parsing and environment overlay.
//!
//! Responsibilities:
//! - Parse expanded text into a top-level mapping.
//! - Flatten environment sections into the top level for the active scope.
//!
//! Invariants:
//! - Blank, comment-only, and null documents parse to an empty mapping.
//! - Merge keys (`<<: *anchor`) are expanded before the overlay runs.
//! - With a scope set, mapping-valued top-level entries are environment
//!   sections and never appear in the result; the active section's entries
//!   replace top-level entries in place and new ones are appended.
//! - With no scope set the document is returned unchanged.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;

pub(crate) fn parse(text: &str, path: &Path) -> Result<Mapping, ConfigError> {
    if is_blank(text) {
        return Ok(Mapping::new());
    }

    let parse_error = |source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    };
    let mut value: Value = serde_yaml::from_str(text).map_err(parse_error)?;
    value.apply_merge().map_err(parse_error)?;

    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
            found: kind_of(&other),
        }),
    }
}

/// True when every line is whitespace or a comment.
fn is_blank(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

pub(crate) fn apply_environment(document: Mapping, environment: Option<&str>) -> Mapping {
    let Some(environment) = environment else {
        return document;
    };

    let section = match document.get(environment) {
        Some(Value::Mapping(section)) => Some(section.clone()),
        _ => None,
    };

    let mut resolved: Mapping = document
        .into_iter()
        .filter(|(_, value)| !value.is_mapping())
        .collect();

    if let Some(section) = section {
        for (key, value) in section {
            resolved.insert(key, value);
        }
    }

    resolved
}
