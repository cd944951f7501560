//! Pipeline sequencing: plan, compile, link.
//!
//! Planning is side-effect free: filtering, invocation lookup, artifact
//! path derivation, and command rewriting all happen before the first
//! subprocess starts, so a strict-mode lookup miss aborts the run without
//! launching anything. Compilation then runs on a bounded worker pool —
//! compile jobs are independent and each owns a disjoint output file — and
//! the final link has a hard ordering dependency on all of them.

use crate::artifact::{artifact_path, Artifact};
use crate::error::PipelineError;
use crate::exec::{run_tool, ToolFailure};
use crate::filter::{classify, SkipReason};
use crate::rewrite::rewrite_for_ir;
use irex_compdb::{CompilationDb, CompileCommand};
use irex_config::{FailurePolicy, LookupMode, ResolvedTarget};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Everything one pipeline run needs. Immutable for the run's duration.
#[derive(Debug)]
pub struct PipelineRequest {
    /// Root of the analyzed source tree; relative inputs are resolved
    /// against it.
    pub source_root: PathBuf,
    /// Directory under which per-file artifacts are written.
    pub output_dir: PathBuf,
    /// Path of the final linked module.
    pub output: PathBuf,
    /// Compiler binary used for IR emission.
    pub compiler: String,
    /// Linker binary used for the final merge.
    pub linker: String,
    /// Candidate source files, in order.
    pub inputs: Vec<PathBuf>,
    /// Invocation-database lookup policy.
    pub lookup: LookupMode,
    /// What to do when a compile subprocess fails.
    pub on_failure: FailurePolicy,
    /// Worker pool size for compilation. `0` means one per available core.
    pub jobs: usize,
}

/// The outcome of a pipeline run.
///
/// Compile failures do not abort the run under
/// [`FailurePolicy::Continue`]; they are collected here so the operator
/// sees exactly what was linked and what was not.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// Inputs rejected by filtering, with the reason. Expected and silent.
    pub skipped: Vec<(PathBuf, SkipReason)>,
    /// Successfully compiled artifacts, in input order. This order is the
    /// link input order.
    pub artifacts: Vec<Artifact>,
    /// Compile invocations that failed, with full diagnostics.
    pub failures: Vec<ToolFailure>,
    /// Jobs never started because an earlier failure tripped the abort
    /// policy.
    pub not_attempted: Vec<PathBuf>,
    /// Whether the abort policy cut the run short before linking.
    pub aborted: bool,
    /// The link invocation's failure, if it ran and failed.
    pub link_failure: Option<ToolFailure>,
    /// Path of the linked module, if linking succeeded.
    pub linked: Option<PathBuf>,
}

impl PipelineReport {
    /// `true` iff every surviving file compiled and the module was linked.
    pub fn success(&self) -> bool {
        self.linked.is_some() && self.failures.is_empty() && !self.aborted
    }
}

/// A planned compile: ready-to-execute argv, its working directory, and
/// the artifact it will produce.
#[derive(Debug)]
struct CompileJob {
    argv: Vec<String>,
    cwd: PathBuf,
    artifact: Artifact,
}

#[derive(Debug)]
enum JobOutcome {
    Compiled(Artifact),
    Failed(ToolFailure),
    NotAttempted(PathBuf),
}

/// Runs the pipeline over the requested batch.
///
/// Returns `Err` only for pre-subprocess fatal conditions (strict-mode
/// lookup miss, unwritable output tree, worker pool construction).
/// Everything after the first subprocess is reported through the
/// [`PipelineReport`], including a partial artifact list on failure.
pub fn run(
    request: &PipelineRequest,
    target: &ResolvedTarget,
    db: &CompilationDb,
) -> Result<PipelineReport, PipelineError> {
    let mut report = PipelineReport::default();

    let jobs = plan(request, target, db, &mut report)?;

    for job in &jobs {
        if let Some(parent) = job.artifact.output.parent() {
            std::fs::create_dir_all(parent).map_err(|err| PipelineError::CreateDir {
                path: parent.to_path_buf(),
                source: err,
            })?;
        }
    }

    for outcome in compile_all(&jobs, request)? {
        match outcome {
            JobOutcome::Compiled(artifact) => report.artifacts.push(artifact),
            JobOutcome::Failed(failure) => report.failures.push(failure),
            JobOutcome::NotAttempted(source) => report.not_attempted.push(source),
        }
    }

    if request.on_failure == FailurePolicy::Abort && !report.failures.is_empty() {
        report.aborted = true;
        return Ok(report);
    }

    if report.artifacts.is_empty() {
        // Nothing survived; there is no module to link.
        return Ok(report);
    }

    match link(request, &report.artifacts)? {
        None => report.linked = Some(request.output.clone()),
        Some(failure) => report.link_failure = Some(failure),
    }

    Ok(report)
}

/// Filtering, resolving, and rewriting — no side effects.
fn plan(
    request: &PipelineRequest,
    target: &ResolvedTarget,
    db: &CompilationDb,
    report: &mut PipelineReport,
) -> Result<Vec<CompileJob>, PipelineError> {
    let mut jobs = Vec::new();

    for input in &request.inputs {
        let source = absolutize(input, &request.source_root);

        if let Some(reason) = classify(target, &source) {
            report.skipped.push((source, reason));
            continue;
        }

        let record = match db.lookup(&target.name, &source) {
            Some(record) => record.clone(),
            None => match request.lookup {
                LookupMode::Strict => {
                    return Err(PipelineError::InvocationNotFound {
                        target: target.name.clone(),
                        file: source,
                    })
                }
                LookupMode::Permissive => CompileCommand::fallback(&request.compiler, &source),
            },
        };

        let output = artifact_path(&request.output_dir, &target.name, &source);
        let argv = rewrite_for_ir(&record, &request.compiler, &output);

        jobs.push(CompileJob {
            argv,
            cwd: record.directory,
            artifact: Artifact { source, output },
        });
    }

    Ok(jobs)
}

/// Executes planned compiles on a worker pool sized by `request.jobs`.
///
/// Outcomes come back in job order regardless of execution order. Under
/// the abort policy, the first failure stops further jobs from launching;
/// in-flight jobs run to completion.
fn compile_all(
    jobs: &[CompileJob],
    request: &PipelineRequest,
) -> Result<Vec<JobOutcome>, PipelineError> {
    let abort_early = request.on_failure == FailurePolicy::Abort;
    let failed = AtomicBool::new(false);

    let run_one = |job: &CompileJob| -> JobOutcome {
        if abort_early && failed.load(Ordering::Relaxed) {
            return JobOutcome::NotAttempted(job.artifact.source.clone());
        }
        match run_tool(&job.argv, Some(&job.cwd)) {
            Ok(output) if output.status.success() => JobOutcome::Compiled(job.artifact.clone()),
            Ok(output) => {
                failed.store(true, Ordering::Relaxed);
                JobOutcome::Failed(ToolFailure::from_output(&job.argv, Some(&job.cwd), &output))
            }
            Err(err) => {
                failed.store(true, Ordering::Relaxed);
                JobOutcome::Failed(ToolFailure::from_spawn_error(
                    &job.argv,
                    Some(&job.cwd),
                    &err,
                ))
            }
        }
    };

    let outcomes = if request.jobs > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(request.jobs)
            .build()
            .map_err(|e| PipelineError::WorkerPool(e.to_string()))?;
        pool.install(|| jobs.par_iter().map(run_one).collect())
    } else {
        jobs.par_iter().map(run_one).collect()
    };

    Ok(outcomes)
}

/// Invokes the linker once over the full artifact list, in order.
fn link(
    request: &PipelineRequest,
    artifacts: &[Artifact],
) -> Result<Option<ToolFailure>, PipelineError> {
    if let Some(parent) = request.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| PipelineError::CreateDir {
                path: parent.to_path_buf(),
                source: err,
            })?;
        }
    }

    let mut argv = Vec::with_capacity(artifacts.len() + 3);
    argv.push(request.linker.clone());
    argv.extend(artifacts.iter().map(|a| a.output.display().to_string()));
    argv.push("-o".to_string());
    argv.push(request.output.display().to_string());

    match run_tool(&argv, None) {
        Ok(output) if output.status.success() => Ok(None),
        Ok(output) => Ok(Some(ToolFailure::from_output(&argv, None, &output))),
        Err(err) => Ok(Some(ToolFailure::from_spawn_error(&argv, None, &err))),
    }
}

fn absolutize(input: &Path, source_root: &Path) -> PathBuf {
    if input.is_absolute() {
        input.to_path_buf()
    } else {
        source_root.join(input)
    }
}
