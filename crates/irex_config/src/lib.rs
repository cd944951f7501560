//! Parsing and validation of `irex.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`ProjectConfig`] with target membership tables, tool path defaults, and the
//! eager membership-integrity pre-flight check.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;
pub mod verify;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use resolve::{resolve_target, ResolvedTarget};
pub use types::*;
pub use verify::verify_membership;
