//! The invocation database and its lookup index.

use crate::error::CompDbError;
use crate::split::split_command;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The well-known database file name, looked for in the working directory
/// when no explicit path is given.
pub const DEFAULT_DB_FILE: &str = "compile_commands.json";

/// One recorded compilation: how a reference build produced object code for
/// one source file.
///
/// Records are sourced from the database and never constructed internally,
/// except for the permissive-mode [`fallback`](CompileCommand::fallback).
/// A file may appear in more than one record across targets, so lookup also
/// filters by target identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCommand {
    /// Absolute path of the compiled source file.
    pub file: PathBuf,
    /// Working directory the command was recorded in. Compilers resolve
    /// relative includes and flags against this directory.
    pub directory: PathBuf,
    /// The recorded argument list, compiler binary first.
    pub args: Vec<String>,
}

impl CompileCommand {
    /// Builds the trivial permissive-mode invocation `{compiler, file}` for
    /// a source file with no database record.
    ///
    /// The working directory is the file's parent so relative artifacts of
    /// the compile land next to the source.
    pub fn fallback(compiler: &str, file: &Path) -> Self {
        let directory = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            file: file.to_path_buf(),
            directory,
            args: vec![compiler.to_string(), file.display().to_string()],
        }
    }

    /// Returns `true` iff any argument of the recorded command mentions
    /// `target` as a substring.
    fn mentions_target(&self, target: &str) -> bool {
        self.args.iter().any(|arg| arg.contains(target))
    }
}

/// On-disk record shape: the command comes as either a shell-quoted
/// `command` string (CMake, Bear) or an `arguments` array (newer tools).
#[derive(Debug, Deserialize)]
struct RawRecord {
    directory: PathBuf,
    file: PathBuf,
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    arguments: Option<Vec<String>>,
}

impl RawRecord {
    fn into_command(self) -> Result<CompileCommand, CompDbError> {
        let args = match (self.arguments, self.command) {
            (Some(arguments), _) => arguments,
            (None, Some(command)) => {
                split_command(&command).map_err(|_| CompDbError::UnbalancedCommand {
                    file: self.file.clone(),
                })?
            }
            (None, None) => Vec::new(),
        };
        if args.is_empty() {
            return Err(CompDbError::EmptyCommand { file: self.file });
        }

        // Some producers record the file relative to the working directory.
        let file = if self.file.is_absolute() {
            self.file
        } else {
            self.directory.join(&self.file)
        };

        Ok(CompileCommand {
            file,
            directory: self.directory,
            args,
        })
    }
}

/// A loaded invocation database.
#[derive(Debug, Default)]
pub struct CompilationDb {
    records: Vec<CompileCommand>,
}

impl CompilationDb {
    /// An empty database: every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads and parses a database from `path`.
    pub fn load(path: &Path) -> Result<Self, CompDbError> {
        let content = std::fs::read_to_string(path).map_err(|source| CompDbError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parses a database from a JSON string.
    ///
    /// Useful for testing without filesystem dependencies.
    pub fn from_json(content: &str) -> Result<Self, CompDbError> {
        let raw: Vec<RawRecord> =
            serde_json::from_str(content).map_err(|e| CompDbError::ParseError(e.to_string()))?;
        let records = raw
            .into_iter()
            .map(RawRecord::into_command)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }

    /// Number of records in the database.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the database has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finds the record that compiled `file` for `target`.
    ///
    /// A record matches iff its file path equals `file` exactly and its
    /// command mentions `target` — the target substring disambiguates
    /// records describing the same source compiled for different targets
    /// within one database.
    pub fn lookup(&self, target: &str, file: &Path) -> Option<&CompileCommand> {
        self.records
            .iter()
            .find(|r| r.file == file && r.mentions_target(target))
    }
}
