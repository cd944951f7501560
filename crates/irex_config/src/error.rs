//! Error types for configuration loading and validation.

use std::path::PathBuf;

/// Errors that can occur when loading or validating an `irex.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A referenced target name does not exist in the configuration.
    #[error("unknown target '{0}'")]
    UnknownTarget(String),

    /// A target's membership table lists a file that does not exist under
    /// the source root.
    #[error("target '{target}' lists missing file: {path}")]
    MembershipIntegrity {
        /// The target whose table contains the bad entry.
        target: String,
        /// The resolved path that does not exist on disk.
        path: PathBuf,
    },
}
