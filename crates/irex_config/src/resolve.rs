//! Target resolution: turning a target name into its absolute membership set.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A resolved target: its name and the absolute paths of every source file
/// in its membership table.
///
/// The relative entries from `irex.toml` are preserved in listed order for
/// reporting; `members` is the absolute-path set used for exact membership
/// tests.
#[derive(Debug)]
pub struct ResolvedTarget {
    /// The target name.
    pub name: String,
    /// Membership entries as written in the configuration, in listed order.
    pub files: Vec<String>,
    /// Absolute source root the entries were resolved against.
    pub source_root: PathBuf,
    /// Absolute paths of the member files.
    pub members: BTreeSet<PathBuf>,
}

impl ResolvedTarget {
    /// Returns `true` iff `path` is a literal member of this target's
    /// membership table.
    ///
    /// `path` must be absolute; relative paths never match.
    pub fn contains(&self, path: &Path) -> bool {
        self.members.contains(path)
    }
}

/// Resolves a named target against the configured source root.
///
/// Unknown target names are a fatal configuration error, not an empty
/// membership set — a typo in a target name must be loud.
pub fn resolve_target(
    config: &ProjectConfig,
    target_name: &str,
    source_root: &Path,
) -> Result<ResolvedTarget, ConfigError> {
    let target = config
        .targets
        .get(target_name)
        .ok_or_else(|| ConfigError::UnknownTarget(target_name.to_string()))?;

    let members = target.files.iter().map(|f| source_root.join(f)).collect();

    Ok(ResolvedTarget {
        name: target_name.to_string(),
        files: target.files.clone(),
        source_root: source_root.to_path_buf(),
        members,
    })
}
