//! irex CLI — selective LLVM-IR extraction for multi-target C codebases.
//!
//! Provides `irex emit` for running the compile-and-link pipeline against
//! one target, `irex check` for the membership-table integrity pre-flight,
//! and `irex targets` for listing configured targets.

#![warn(missing_docs)]

mod check;
mod emit;
mod project;
mod targets;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// irex — turn a curated slice of a C codebase into one linked IR module.
#[derive(Parser, Debug)]
#[command(name = "irex", version, about = "Selective LLVM-IR extraction")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output (lists skipped files).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `irex.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a batch of files to IR and link them into one module.
    Emit(EmitArgs),
    /// Verify membership-table integrity across all targets.
    Check,
    /// List configured targets and their membership sizes.
    Targets,
}

/// Arguments for the `irex emit` subcommand.
#[derive(Parser, Debug)]
pub struct EmitArgs {
    /// Target to build the module for.
    #[arg(short, long)]
    pub target: String,

    /// Path of the final linked module.
    #[arg(short, long)]
    pub output: String,

    /// Path to the clang binary (overrides `[tools] clang`).
    #[arg(long)]
    pub clang: Option<String>,

    /// Path to the llvm-link binary (overrides `[tools] llvm_link`).
    #[arg(long)]
    pub llvm_link: Option<String>,

    /// Path to the opt binary. Reserved; not invoked by the pipeline.
    #[arg(long)]
    pub opt: Option<String>,

    /// Path to the invocation database (default: `compile_commands.json`
    /// in the current directory).
    #[arg(long)]
    pub compdb: Option<String>,

    /// Directory for per-file artifacts (overrides `[emit] output_dir`).
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Invocation-database lookup policy.
    #[arg(long, value_enum)]
    pub lookup: Option<CliLookupMode>,

    /// What to do when a compile fails.
    #[arg(long, value_enum)]
    pub on_failure: Option<CliFailurePolicy>,

    /// Number of parallel compile jobs (0 = one per core).
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Candidate source files. Relative paths are resolved against the
    /// source root.
    #[arg(required = true)]
    pub inputs: Vec<String>,
}

/// CLI spelling of the lookup policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliLookupMode {
    /// A missing database record aborts the run.
    Strict,
    /// A missing record falls back to a trivial invocation.
    Permissive,
}

/// CLI spelling of the compile-failure policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliFailurePolicy {
    /// Report and keep going; link whatever succeeded.
    Continue,
    /// Fail the run on the first compile failure, before linking.
    Abort,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Emit(ref args) => emit::run(args, &global),
        Command::Check => check::run(&global),
        Command::Targets => targets::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
