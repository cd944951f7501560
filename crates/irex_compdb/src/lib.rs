//! Loading and querying `compile_commands.json` invocation databases.
//!
//! A build-invocation database records exactly how each source file was
//! compiled in a reference build. This crate parses the database and answers
//! "what command produced object code for file F, for target T?" — the
//! lookup that anchors the selective compilation pipeline.

#![warn(missing_docs)]

pub mod db;
pub mod error;
pub mod split;

pub use db::{CompilationDb, CompileCommand, DEFAULT_DB_FILE};
pub use error::CompDbError;
pub use split::split_command;
