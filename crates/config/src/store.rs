//! Key/value stores backing the environment.
//!
//! Responsibilities:
//! - Define the `EnvStore` trait the merger and the `Env` accessor read and
//!   write through.
//! - Provide `ProcessEnv` (the real process environment) and `MemoryEnv`
//!   (an isolated map for tests and embedding).
//!
//! Does NOT handle:
//! - Precedence rules (see `merger.rs`).
//! - Name validation. Callers must only pass names accepted by
//!   `is_valid_name` and values accepted by `is_valid_value`.
//!
//! Invariants:
//! - `ProcessEnv` performs no locking. Writes mutate process-global state and
//!   must not race with other threads reading or writing the environment.

use std::collections::BTreeMap;

/// A mutable string-to-string environment table.
pub trait EnvStore {
    /// Returns the value of `key` if it is set and valid unicode.
    fn get(&self, key: &str) -> Option<String>;

    /// Returns true if `key` is set, whatever its value.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn set(&mut self, key: &str, value: &str);

    /// Returns every key currently set (unicode keys only).
    fn keys(&self) -> Vec<String>;
}

impl<S: EnvStore + ?Sized> EnvStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn contains(&self, key: &str) -> bool {
        (**self).contains(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

/// Returns true if `key` can be used as a process environment variable name.
pub fn is_valid_name(key: &str) -> bool {
    !key.is_empty() && !key.contains('=') && !key.contains('\0')
}

/// Returns true if `value` can be stored in the process environment.
pub fn is_valid_value(value: &str) -> bool {
    !value.contains('\0')
}

/// The live process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvStore for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn contains(&self, key: &str) -> bool {
        std::env::var_os(key).is_some()
    }

    fn set(&mut self, key: &str, value: &str) {
        // SAFETY: configuration is loaded during single-threaded startup;
        // concurrent callers must serialize loads themselves.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    fn keys(&self) -> Vec<String> {
        std::env::vars_os()
            .filter_map(|(key, _)| key.into_string().ok())
            .collect()
    }
}

/// An in-memory environment, isolated from the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryEnv {
    vars: BTreeMap<String, String>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvStore for MemoryEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }

    fn keys(&self) -> Vec<String> {
        self.vars.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("DATABASE_URL"));
        assert!(is_valid_name("foo.bar"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("FOO=BAR"));
        assert!(!is_valid_name("FOO\0"));
    }

    #[test]
    fn test_valid_values() {
        assert!(is_valid_value(""));
        assert!(is_valid_value("a=b"));
        assert!(!is_valid_value("nul\0byte"));
    }

    #[test]
    fn test_memory_env_round_trip() {
        let mut env = MemoryEnv::new();
        assert!(!env.contains("FOO"));

        env.set("FOO", "bar");
        assert_eq!(env.get("FOO").as_deref(), Some("bar"));
        assert!(env.contains("FOO"));
        assert_eq!(env.keys(), vec!["FOO".to_string()]);
        assert!(!env.is_empty());
    }

    #[test]
    fn test_memory_env_from_iter() {
        let env: MemoryEnv = [("A", "1"), ("B", "2")].into_iter().collect();
        assert_eq!(env.len(), 2);
        assert_eq!(env.keys(), vec!["A".to_string(), "B".to_string()]);
        assert_eq!(env.get("B").as_deref(), Some("2"));
    }

    #[test]
    fn test_mut_ref_delegates() {
        let mut env = MemoryEnv::new();
        {
            let mut borrowed: &mut MemoryEnv = &mut env;
            EnvStore::set(&mut borrowed, "KEY", "value");
        }
        assert_eq!(env.get("KEY").as_deref(), Some("value"));
    }

    #[test]
    #[serial]
    fn test_process_env_reads_and_writes() {
        let key = "_FIGENV_TEST_PROCESS_STORE";
        temp_env::with_var_unset(key, || {
            let mut env = ProcessEnv;
            assert!(!env.contains(key));

            env.set(key, "value");
            assert_eq!(env.get(key).as_deref(), Some("value"));
            assert!(env.keys().iter().any(|k| k == key));
        });
    }
}
