//! Read access to the environment after configuration is loaded.
//!
//! Responsibilities:
//! - Look up variables with a case-insensitive fallback.
//! - Enforce required variables with descriptive errors.
//! - Parse variables into typed values.
//!
//! Does NOT handle:
//! - Writing variables (see `merger.rs`).
//!
//! Invariants:
//! - An exact-case match always wins over a case-insensitive one.
//! - Empty or whitespace-only values count as absent for `env_var_or_none`
//!   and `is_present`, but `get` returns them verbatim.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::store::{EnvStore, ProcessEnv};

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// A read view over an environment store.
#[derive(Debug, Clone, Default)]
pub struct Env<S = ProcessEnv> {
    store: S,
}

impl Env {
    /// A view over the live process environment.
    pub fn process() -> Self {
        Self { store: ProcessEnv }
    }
}

impl<S: EnvStore> Env<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Returns the value of `key`, matching case-insensitively if there is
    /// no exact match.
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.store.get(key) {
            return Some(value);
        }
        self.store
            .keys()
            .into_iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(key))
            .and_then(|candidate| self.store.get(&candidate))
    }

    /// Returns the value of `key` or `ConfigError::MissingKey`.
    pub fn require(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    /// Whether `key` is set to a non-blank value.
    pub fn is_present(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| !value.trim().is_empty())
    }

    /// Parse `key` into `T`. Unset variables yield `Ok(None)`.
    pub fn parse<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        raw.trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                var: key.to_string(),
                message: e.to_string(),
            })
    }

    /// Fails with every missing key listed if any of `keys` is unset.
    pub fn require_keys<I, K>(&self, keys: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let missing: Vec<String> = keys
            .into_iter()
            .filter(|key| self.get(key.as_ref()).is_none())
            .map(|key| key.as_ref().to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingKeys(missing))
        }
    }
}
