//! Configuration types deserialized from `irex.toml`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The top-level project configuration parsed from `irex.toml`.
///
/// Contains project metadata, external tool paths, emit defaults, and the
/// per-target membership tables that decide which source files are in scope
/// for each target architecture.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata (name, source root).
    pub project: ProjectMeta,
    /// Paths to the external tools driven by the pipeline.
    #[serde(default)]
    pub tools: ToolsConfig,
    /// Defaults for the `irex emit` pipeline.
    #[serde(default)]
    pub emit: EmitConfig,
    /// Named target membership tables (e.g., "x86_64", "aarch64").
    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfig>,
}

impl ProjectConfig {
    /// Resolves the configured source root against the directory containing
    /// the configuration file.
    ///
    /// An absolute `source_root` is returned as-is; a relative one is joined
    /// onto `config_dir`.
    pub fn source_root_in(&self, config_dir: &Path) -> PathBuf {
        let root = Path::new(&self.project.source_root);
        if root.is_absolute() {
            root.to_path_buf()
        } else {
            config_dir.join(root)
        }
    }
}

/// Core project metadata required in every `irex.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// Root directory of the analyzed source tree. Membership table entries
    /// are relative to this directory.
    pub source_root: String,
}

/// Paths to the external executables the pipeline invokes.
///
/// Any of these may be omitted and supplied on the command line instead.
#[derive(Debug, Default, Deserialize)]
pub struct ToolsConfig {
    /// Path to the clang binary used for IR emission.
    pub clang: Option<String>,
    /// Path to the llvm-link binary used for the final merge.
    pub llvm_link: Option<String>,
    /// Path to the opt binary. Accepted and carried through, but not
    /// invoked by the current pipeline.
    pub opt: Option<String>,
}

/// Defaults for the emit pipeline, overridable on the command line.
#[derive(Debug, Deserialize)]
pub struct EmitConfig {
    /// Directory under which per-file artifacts are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Invocation-database lookup policy.
    #[serde(default)]
    pub lookup: LookupMode,
    /// What to do when a compile subprocess fails.
    #[serde(default)]
    pub on_failure: FailurePolicy,
    /// Number of parallel compile jobs. `0` means one per available core.
    #[serde(default)]
    pub jobs: usize,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            lookup: LookupMode::default(),
            on_failure: FailurePolicy::default(),
            jobs: 0,
        }
    }
}

fn default_output_dir() -> String {
    "irex-out".to_string()
}

/// Policy for files that have no matching record in the invocation database.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    /// A missing record aborts the run before any subprocess is launched
    /// (default). Silently degrading invocation fidelity would produce IR
    /// that does not match how the file is actually built.
    #[default]
    Strict,
    /// A missing record falls back to a trivial `{compiler, file}`
    /// invocation with no additional flags.
    Permissive,
}

/// Policy for compile subprocesses that exit non-zero.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Report the failure, keep compiling the remaining files, and still
    /// link whatever artifacts succeeded (default).
    #[default]
    Continue,
    /// Stop launching new compiles after the first failure and fail the
    /// run before linking.
    Abort,
}

/// Membership table for a single target: the source files considered
/// relevant to that target's analysis.
#[derive(Debug, Deserialize)]
pub struct TargetConfig {
    /// Source paths relative to the project source root. Membership is
    /// exact — no globs or pattern matching.
    pub files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn lookup_mode_variants() {
        for (input, expected) in [
            ("strict", LookupMode::Strict),
            ("permissive", LookupMode::Permissive),
        ] {
            let toml = format!(
                r#"
[project]
name = "test"
source_root = "/src/vm"

[emit]
lookup = "{input}"
"#
            );
            let config = load_config_from_str(&toml).unwrap();
            assert_eq!(config.emit.lookup, expected);
        }
    }

    #[test]
    fn failure_policy_variants() {
        for (input, expected) in [
            ("continue", FailurePolicy::Continue),
            ("abort", FailurePolicy::Abort),
        ] {
            let toml = format!(
                r#"
[project]
name = "test"
source_root = "/src/vm"

[emit]
on_failure = "{input}"
"#
            );
            let config = load_config_from_str(&toml).unwrap();
            assert_eq!(config.emit.on_failure, expected);
        }
    }

    #[test]
    fn emit_defaults() {
        let toml = r#"
[project]
name = "test"
source_root = "/src/vm"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.emit.output_dir, "irex-out");
        assert_eq!(config.emit.lookup, LookupMode::Strict);
        assert_eq!(config.emit.on_failure, FailurePolicy::Continue);
        assert_eq!(config.emit.jobs, 0);
    }

    #[test]
    fn source_root_absolute_kept() {
        let toml = r#"
[project]
name = "test"
source_root = "/src/vm"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(
            config.source_root_in(Path::new("/etc/irex")),
            PathBuf::from("/src/vm")
        );
    }

    #[test]
    fn source_root_relative_joined() {
        let toml = r#"
[project]
name = "test"
source_root = "vm"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(
            config.source_root_in(Path::new("/work/proj")),
            PathBuf::from("/work/proj/vm")
        );
    }

    #[test]
    fn tools_all_optional() {
        let toml = r#"
[project]
name = "test"
source_root = "/src/vm"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert!(config.tools.clang.is_none());
        assert!(config.tools.llvm_link.is_none());
        assert!(config.tools.opt.is_none());
    }
}
