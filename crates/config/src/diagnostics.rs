//! Merge diagnostics.
//!
//! Responsibilities:
//! - Describe the recoverable problems found while merging a configuration
//!   into the environment (`MergeWarning`).
//! - Route them to a caller-supplied `WarningSink` so tests can capture them
//!   and hosts can redirect or silence them.
//!
//! Does NOT handle:
//! - Fatal errors (see `error.rs`).
//!
//! Invariants:
//! - Each skipped entry produces exactly one warning.
//! - Keys preserved because they were set externally produce no warning.

use std::fmt;

use serde_yaml::Value;

/// A configuration entry skipped during merge.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeWarning {
    /// The key is not a YAML string.
    NonStringKey { key: Value },
    /// The key is a string the platform rejects as a variable name.
    InvalidName { key: String },
    /// The value is not a string (and was not coerced).
    NonStringValue { key: String, value: Value },
    /// The value is a string the platform cannot store.
    InvalidValue { key: String },
}

impl MergeWarning {
    /// Returns the key as a string when it is one.
    pub fn key(&self) -> Option<&str> {
        match self {
            MergeWarning::NonStringKey { .. } => None,
            MergeWarning::InvalidName { key }
            | MergeWarning::NonStringValue { key, .. }
            | MergeWarning::InvalidValue { key } => Some(key),
        }
    }
}

impl fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeWarning::NonStringKey { key } => write!(
                f,
                "{} isn't a String and can't be used as an environment variable name; skipping.",
                render(key)
            ),
            MergeWarning::InvalidName { key } => write!(
                f,
                "{key:?} can't be used as an environment variable name; skipping."
            ),
            MergeWarning::NonStringValue { value, .. } => write!(
                f,
                "{} isn't a String and can't be used as an environment variable value; skipping.",
                render(value)
            ),
            MergeWarning::InvalidValue { key } => write!(
                f,
                "The value of {key:?} contains a NUL byte and can't be used as an environment variable value; skipping."
            ),
        }
    }
}

/// Renders a YAML value on one line for diagnostics.
fn render(value: &Value) -> String {
    serde_json::to_string(value)
        .or_else(|_| serde_yaml::to_string(value).map(|s| s.trim_end().replace('\n', " ")))
        .unwrap_or_else(|_| format!("{value:?}"))
}

/// Receives merge warnings.
pub trait WarningSink {
    fn warn(&mut self, warning: &MergeWarning);
}

/// Emits warnings as `tracing` events. The default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&mut self, warning: &MergeWarning) {
        tracing::warn!(key = warning.key(), "{}", warning);
    }
}

/// Discards every warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl WarningSink for SilentSink {
    fn warn(&mut self, _warning: &MergeWarning) {}
}

/// Collects warnings in order.
impl WarningSink for Vec<MergeWarning> {
    fn warn(&mut self, warning: &MergeWarning) {
        self.push(warning.clone());
    }
}

impl<F> WarningSink for F
where
    F: FnMut(&MergeWarning),
{
    fn warn(&mut self, warning: &MergeWarning) {
        self(warning)
    }
}
