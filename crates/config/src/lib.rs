//! Environment configuration loaded from a YAML file.
//!
//! This crate reads a YAML file, expands templates in it, flattens the section
//! for the active environment, and merges the result into the process
//! environment without overwriting variables the surrounding process already
//! set.
//!
//! ```rust,ignore
//! use figenv_config::Resolver;
//!
//! let resolver = Resolver::new("config/application.yml").with_environment("production");
//! resolver.load()?;
//!
//! let database_url = figenv_config::env().require("DATABASE_URL")?;
//! ```
//!
//! Tests and embedders can merge into an isolated store and capture warnings:
//!
//! ```rust,ignore
//! use figenv_config::{MemoryEnv, MergeWarning, Merger};
//!
//! let mut merger = Merger::new(MemoryEnv::new(), Vec::<MergeWarning>::new());
//! resolver.load_with(&mut merger)?;
//! ```

pub mod constants;
pub mod diagnostics;
pub mod env;
mod error;
pub mod global;
mod memo;
pub mod merger;
mod resolver;
pub mod store;
pub mod template;

pub use diagnostics::{MergeWarning, SilentSink, TracingSink, WarningSink};
pub use env::{Env, env_var_or_none};
pub use error::ConfigError;
pub use global::{env, load, require_keys};
pub use memo::Memo;
pub use merger::{MergeSummary, Merger, ValuePolicy};
pub use resolver::Resolver;
pub use store::{EnvStore, MemoryEnv, ProcessEnv};

/// Resolved configuration: YAML keys to YAML values, in document order.
pub type Configuration = serde_yaml::Mapping;
