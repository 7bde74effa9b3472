//! Environment merger.
//!
//! Responsibilities:
//! - Validate each resolved entry as an environment variable name and value.
//! - Write accepted entries into an `EnvStore`, honoring precedence.
//! - Report skipped entries to a `WarningSink`.
//!
//! Does NOT handle:
//! - Reading or resolving configuration files (see `resolver`).
//!
//! Invariants:
//! - A key present in the store without its internal marker was set by the
//!   surrounding process and is never overwritten.
//! - Every value the merger writes is mirrored under the marker
//!   (`_FIGENV_<key>`), so a later load may replace it.
//! - Only string values are accepted under `ValuePolicy::Strict`.
//! - One bad entry never prevents the others from being merged.

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::constants::internal_marker;
use crate::diagnostics::{MergeWarning, TracingSink, WarningSink};
use crate::error::ConfigError;
use crate::resolver::Resolver;
use crate::store::{EnvStore, ProcessEnv, is_valid_name, is_valid_value};

/// How non-string values are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValuePolicy {
    /// Only YAML strings are accepted; everything else is warned about.
    #[default]
    Strict,
    /// Numbers and booleans are written in their YAML text form as well.
    Scalars,
}

/// Counts from a single merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Entries written to the store.
    pub set: usize,
    /// Entries left alone because the surrounding process set them.
    pub preserved: usize,
    /// Entries rejected with a warning.
    pub skipped: usize,
}

/// Merges resolved configuration into an environment store.
pub struct Merger<S = ProcessEnv, W = TracingSink> {
    store: S,
    sink: W,
    policy: ValuePolicy,
}

impl Merger {
    /// A merger writing to the process environment and warning via `tracing`.
    pub fn process() -> Self {
        Self::new(ProcessEnv, TracingSink)
    }
}

impl<S, W> Merger<S, W>
where
    S: EnvStore,
    W: WarningSink,
{
    pub fn new(store: S, sink: W) -> Self {
        Self {
            store,
            sink,
            policy: ValuePolicy::Strict,
        }
    }

    pub fn with_policy(mut self, policy: ValuePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ValuePolicy {
        self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn into_parts(self) -> (S, W) {
        (self.store, self.sink)
    }

    /// Resolve `resolver` (if not already cached) and merge the result.
    pub fn load(&mut self, resolver: &Resolver) -> Result<MergeSummary, ConfigError> {
        let configuration = resolver.configuration()?;
        let summary = self.merge(configuration);
        debug!(
            path = resolver.path(),
            set = summary.set,
            preserved = summary.preserved,
            skipped = summary.skipped,
            "Loaded configuration into environment"
        );
        Ok(summary)
    }

    /// Merge `configuration` into the store in mapping order.
    pub fn merge(&mut self, configuration: &Mapping) -> MergeSummary {
        let mut summary = MergeSummary::default();

        for (key, value) in configuration {
            match self.merge_entry(key, value) {
                Ok(true) => summary.set += 1,
                Ok(false) => summary.preserved += 1,
                Err(warning) => {
                    self.sink.warn(&warning);
                    summary.skipped += 1;
                }
            }
        }

        summary
    }

    /// Returns `Ok(true)` if written, `Ok(false)` if preserved.
    fn merge_entry(&mut self, key: &Value, value: &Value) -> Result<bool, MergeWarning> {
        let Some(key) = key.as_str() else {
            return Err(MergeWarning::NonStringKey { key: key.clone() });
        };
        if !is_valid_name(key) {
            return Err(MergeWarning::InvalidName {
                key: key.to_string(),
            });
        }

        let Some(value) = self.coerce(value) else {
            return Err(MergeWarning::NonStringValue {
                key: key.to_string(),
                value: value.clone(),
            });
        };
        if !is_valid_value(&value) {
            return Err(MergeWarning::InvalidValue {
                key: key.to_string(),
            });
        }

        if self.is_set_externally(key) {
            debug!(key, "Keeping externally set environment variable");
            return Ok(false);
        }

        self.store.set(key, &value);
        self.store.set(&internal_marker(key), &value);
        Ok(true)
    }

    fn coerce(&self, value: &Value) -> Option<String> {
        match (value, self.policy) {
            (Value::String(s), _) => Some(s.clone()),
            (Value::Number(n), ValuePolicy::Scalars) => Some(n.to_string()),
            (Value::Bool(b), ValuePolicy::Scalars) => Some(b.to_string()),
            _ => None,
        }
    }

    fn is_set_externally(&self, key: &str) -> bool {
        self.store.contains(key) && !self.store.contains(&internal_marker(key))
    }
}
