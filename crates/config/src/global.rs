//! Process-wide default application.
//!
//! Responsibilities:
//! - Hold the path and environment scope the process loads from.
//! - Keep one memoized `Resolver` for them and load it on request.
//! - Expose the live environment through `env()`.
//!
//! Does NOT handle:
//! - Resolution or merge logic (see `resolver` and `merger.rs`).
//!
//! Invariants / Assumptions:
//! - Changing the path or environment discards the memoized resolver.
//! - The default environment is read from `FIGENV_ENV` once, on first use.
//! - State is guarded by a mutex, but writes to the process environment are
//!   still unsynchronized with other threads reading it directly.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use serde_yaml::Mapping;

use crate::constants::{DEFAULT_CONFIG_PATH, ENVIRONMENT_VAR};
use crate::env::{Env, env_var_or_none};
use crate::error::ConfigError;
use crate::resolver::Resolver;

#[derive(Debug)]
struct Application {
    resolver: Resolver,
}

impl Application {
    fn from_env() -> Self {
        let mut resolver = Resolver::new(DEFAULT_CONFIG_PATH);
        if let Some(environment) = env_var_or_none(ENVIRONMENT_VAR) {
            resolver.set_environment(environment);
        }
        Self { resolver }
    }
}

fn lock() -> MutexGuard<'static, Application> {
    static APPLICATION: OnceLock<Mutex<Application>> = OnceLock::new();
    APPLICATION
        .get_or_init(|| Mutex::new(Application::from_env()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// The path the process-wide application loads from.
pub fn path() -> String {
    lock().resolver.path().to_string()
}

pub fn set_path(path: impl AsRef<Path>) {
    lock().resolver.set_path(path);
}

/// The environment scope of the process-wide application.
pub fn environment() -> Option<String> {
    lock().resolver.environment().map(str::to_string)
}

pub fn set_environment(environment: impl AsRef<str>) {
    lock().resolver.set_environment(environment);
}

pub fn clear_environment() {
    lock().resolver.clear_environment();
}

/// Restore the default path and environment and drop the cached configuration.
pub fn reset() {
    *lock() = Application::from_env();
}

/// The resolved configuration of the process-wide application.
pub fn configuration() -> Result<Mapping, ConfigError> {
    lock().resolver.configuration().cloned()
}

/// Load the process-wide application into the process environment.
pub fn load() -> Result<(), ConfigError> {
    lock().resolver.load()
}

/// A read view over the live process environment.
pub fn env() -> Env {
    Env::process()
}

/// Fails with every missing key listed if any of `keys` is unset.
pub fn require_keys<I, K>(keys: I) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    env().require_keys(keys)
}
