//! Error types for the compilation pipeline.

use std::path::PathBuf;

/// Fatal pipeline errors.
///
/// These abort the run outright. Individual compile failures are not errors
/// at this level — they are recorded in the
/// [`PipelineReport`](crate::orchestrate::PipelineReport) and handled
/// according to the configured failure policy.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A configuration error surfaced during the run.
    #[error(transparent)]
    Config(#[from] irex_config::ConfigError),

    /// An invocation-database error surfaced during the run.
    #[error(transparent)]
    CompDb(#[from] irex_compdb::CompDbError),

    /// Strict lookup mode: a file in the batch has no matching database
    /// record. Raised during planning, before any subprocess is launched.
    #[error("no invocation record for {file} (target '{target}')")]
    InvocationNotFound {
        /// The target being built.
        target: String,
        /// The file with no matching record.
        file: PathBuf,
    },

    /// An output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The compile worker pool could not be constructed.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
}
