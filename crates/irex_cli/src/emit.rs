//! `irex emit` — the selective compilation pipeline for one target.
//!
//! Orchestrates the full run:
//! 1. Load and pre-flight the configuration
//! 2. Resolve the target membership table
//! 3. Load the invocation database
//! 4. Compile surviving files to IR on a worker pool
//! 5. Link the artifacts into a single module

use std::path::PathBuf;

use irex_compdb::{CompilationDb, DEFAULT_DB_FILE};
use irex_config::{FailurePolicy, LookupMode};
use irex_pipeline::{PipelineReport, PipelineRequest};

use crate::project::resolve_project_root;
use crate::{CliFailurePolicy, CliLookupMode, EmitArgs, GlobalArgs};

/// Runs the `irex emit` command.
///
/// Returns exit code 0 only for a clean run: every surviving file compiled
/// and the module linked. Partial output still exits 1 so that scripted
/// callers cannot mistake it for a complete module.
pub fn run(args: &EmitArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    // Step 1: Find project root and load config
    let project_dir = resolve_project_root(global)?;
    let config = irex_config::load_config(&project_dir)?;
    let source_root = config.source_root_in(&project_dir);

    if !global.quiet {
        eprintln!(
            "   Project {} ({})",
            config.project.name,
            source_root.display()
        );
    }

    // Step 2: Pre-flight — every membership entry in every target must
    // exist before anything is compiled.
    irex_config::verify_membership(&config, &source_root)?;

    // Step 3: Resolve target
    let target = irex_config::resolve_target(&config, &args.target, &source_root)?;

    if !global.quiet {
        eprintln!("    Target {} ({} member file(s))", target.name, target.files.len());
    }

    // Step 4: Resolve tools and policies
    let compiler = resolve_tool(args.clang.as_deref(), config.tools.clang.as_deref(), "clang")?;
    let linker = resolve_tool(
        args.llvm_link.as_deref(),
        config.tools.llvm_link.as_deref(),
        "llvm_link",
    )?;
    // The opt binary is accepted for forward compatibility but the current
    // pipeline never invokes it.
    let _opt = args.opt.as_deref().or(config.tools.opt.as_deref());

    let lookup = match args.lookup {
        Some(CliLookupMode::Strict) => LookupMode::Strict,
        Some(CliLookupMode::Permissive) => LookupMode::Permissive,
        None => config.emit.lookup,
    };
    let on_failure = match args.on_failure {
        Some(CliFailurePolicy::Continue) => FailurePolicy::Continue,
        Some(CliFailurePolicy::Abort) => FailurePolicy::Abort,
        None => config.emit.on_failure,
    };
    let jobs = args.jobs.unwrap_or(config.emit.jobs);
    let output_dir = match &args.output_dir {
        Some(dir) => PathBuf::from(dir),
        None => project_dir.join(&config.emit.output_dir),
    };

    // Step 5: Load the invocation database
    let db = load_db(args.compdb.as_deref(), lookup, global)?;

    if !global.quiet {
        eprintln!("  Database {} record(s)", db.len());
    }

    // Step 6: Run the pipeline
    let request = PipelineRequest {
        source_root,
        output_dir,
        output: PathBuf::from(&args.output),
        compiler,
        linker,
        inputs: args.inputs.iter().map(PathBuf::from).collect(),
        lookup,
        on_failure,
        jobs,
    };

    let report = irex_pipeline::run(&request, &target, &db)?;
    print_report(&report, global);

    Ok(if report.success() { 0 } else { 1 })
}

/// Resolves a tool path: CLI flag wins, then the `[tools]` config section.
fn resolve_tool(
    cli: Option<&str>,
    config: Option<&str>,
    name: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    cli.or(config).map(str::to_string).ok_or_else(|| {
        format!("{name} path not configured (pass --{flag} or set [tools] {name})",
            flag = name.replace('_', "-"))
            .into()
    })
}

/// Loads the invocation database according to the lookup policy.
///
/// In strict mode a missing database is fatal up front — one actionable
/// message instead of a per-file miss. In permissive mode it degrades to
/// an empty database and every file takes the trivial fallback.
fn load_db(
    compdb: Option<&str>,
    lookup: LookupMode,
    global: &GlobalArgs,
) -> Result<CompilationDb, Box<dyn std::error::Error>> {
    let path = PathBuf::from(compdb.unwrap_or(DEFAULT_DB_FILE));
    if path.is_file() {
        return Ok(CompilationDb::load(&path)?);
    }
    match lookup {
        LookupMode::Strict => Err(format!(
            "invocation database not found at {} (required in strict mode; \
             pass --compdb or use --lookup permissive)",
            path.display()
        )
        .into()),
        LookupMode::Permissive => {
            if !global.quiet {
                eprintln!(
                    "warning: no invocation database at {}; using trivial invocations",
                    path.display()
                );
            }
            Ok(CompilationDb::empty())
        }
    }
}

/// Prints skip details, failure diagnostics, and the run summary.
fn print_report(report: &PipelineReport, global: &GlobalArgs) {
    if global.verbose {
        for (path, reason) in &report.skipped {
            eprintln!("   skipped {} ({reason})", path.display());
        }
    }

    for failure in &report.failures {
        eprintln!("{failure}");
    }

    if global.quiet {
        return;
    }

    eprintln!(
        "  Compiled {} file(s), {} failed, {} skipped",
        report.artifacts.len(),
        report.failures.len(),
        report.skipped.len()
    );

    if report.aborted {
        eprintln!(
            "   Aborted after first failure; {} job(s) not attempted, link skipped",
            report.not_attempted.len()
        );
        return;
    }

    match (&report.linked, &report.link_failure) {
        (Some(path), _) => {
            eprintln!("    Linked {} artifact(s) -> {}", report.artifacts.len(), path.display());
        }
        (None, Some(failure)) => {
            eprintln!("error: link failed");
            eprintln!("{failure}");
        }
        (None, None) => {
            eprintln!("warning: no artifacts survived filtering; nothing to link");
        }
    }
}
