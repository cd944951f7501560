//! The selective compilation pipeline.
//!
//! Drives a batch of source files through filtering, invocation lookup,
//! command rewriting, parallel IR compilation, and the final link into a
//! single module:
//!
//! 1. [`filter`] — format-based rejection and target membership.
//! 2. [`rewrite`] — recorded invocation → IR-emitting invocation.
//! 3. [`exec`] — subprocess launching with captured diagnostics.
//! 4. [`orchestrate`] — sequencing, artifact paths, failure policy.

#![warn(missing_docs)]

pub mod artifact;
pub mod error;
pub mod exec;
pub mod filter;
pub mod orchestrate;
pub mod rewrite;

pub use artifact::{artifact_path, Artifact};
pub use error::PipelineError;
pub use exec::{render_command, run_tool, ToolFailure};
pub use filter::{classify, is_compilable, SkipReason};
pub use orchestrate::{run, PipelineReport, PipelineRequest};
pub use rewrite::rewrite_for_ir;
