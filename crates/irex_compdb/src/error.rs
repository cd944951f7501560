//! Error types for invocation-database loading.

use std::path::PathBuf;

/// Errors that can occur when loading a `compile_commands.json` database.
#[derive(Debug, thiserror::Error)]
pub enum CompDbError {
    /// An I/O error occurred while reading the database file.
    #[error("failed to read invocation database {path}: {source}")]
    IoError {
        /// The database path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The JSON content could not be parsed.
    #[error("failed to parse invocation database: {0}")]
    ParseError(String),

    /// A record's command line could not be split (unbalanced quoting).
    #[error("unbalanced quoting in recorded command for {file}")]
    UnbalancedCommand {
        /// The source file whose record is malformed.
        file: PathBuf,
    },

    /// A record carries neither a `command` string nor an `arguments` array,
    /// or the argument list is empty.
    #[error("empty command in record for {file}")]
    EmptyCommand {
        /// The source file whose record is malformed.
        file: PathBuf,
    },
}
