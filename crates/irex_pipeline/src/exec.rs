//! Subprocess launching with captured diagnostics.
//!
//! Every tool invocation runs with an explicit per-invocation working
//! directory rather than mutating the process-wide one, which keeps
//! concurrent compile jobs independent. Captured output and the full
//! command line are retained so no failure is opaque to the operator.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs a tool to completion, capturing stdout and stderr.
///
/// `argv` must be non-empty; `cwd`, when given, is passed to the subprocess
/// as its working directory. Blocks until the tool exits.
pub fn run_tool(argv: &[String], cwd: Option<&Path>) -> std::io::Result<std::process::Output> {
    let mut cmd = Command::new(&argv[0]);
    cmd.args(&argv[1..]);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd.output()
}

/// Renders an argument list as a copy-pasteable command line.
///
/// Arguments containing whitespace or quotes are single-quoted.
pub fn render_command(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if arg.is_empty() || arg.contains([' ', '\t', '"', '\'']) {
                format!("'{}'", arg.replace('\'', r"'\''"))
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A failed tool invocation, with everything needed to diagnose it.
#[derive(Debug, Clone)]
pub struct ToolFailure {
    /// The full argument list that was executed (or attempted).
    pub command: Vec<String>,
    /// The working directory the tool ran in, if one was set.
    pub cwd: Option<PathBuf>,
    /// The exit code. `None` if the tool was killed by a signal or never
    /// launched.
    pub exit_code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error, or the launch error message if the tool
    /// could not be spawned.
    pub stderr: String,
}

impl ToolFailure {
    /// Builds a failure from a completed subprocess with non-zero exit.
    pub fn from_output(
        argv: &[String],
        cwd: Option<&Path>,
        output: &std::process::Output,
    ) -> Self {
        Self {
            command: argv.to_vec(),
            cwd: cwd.map(Path::to_path_buf),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    /// Builds a failure for a tool that could not be launched at all.
    pub fn from_spawn_error(argv: &[String], cwd: Option<&Path>, err: &std::io::Error) -> Self {
        Self {
            command: argv.to_vec(),
            cwd: cwd.map(Path::to_path_buf),
            exit_code: None,
            stdout: String::new(),
            stderr: format!("failed to launch: {err}"),
        }
    }
}

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit_code {
            Some(code) => writeln!(f, "command exited with {code}:")?,
            None => writeln!(f, "command did not run to completion:")?,
        }
        writeln!(f, "  {}", render_command(&self.command))?;
        if let Some(cwd) = &self.cwd {
            writeln!(f, "  (in {})", cwd.display())?;
        }
        if !self.stdout.is_empty() {
            writeln!(f, "--- stdout ---")?;
            writeln!(f, "{}", self.stdout.trim_end())?;
        }
        if !self.stderr.is_empty() {
            writeln!(f, "--- stderr ---")?;
            writeln!(f, "{}", self.stderr.trim_end())?;
        }
        Ok(())
    }
}
