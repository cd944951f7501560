//! Candidate filtering: format-based rejection and target membership.
//!
//! Many files handed to the pipeline are irrelevant to a given target's
//! analysis (host-side utilities, other targets' backends, generated
//! headers). The membership filter is a pure allow-list — precision over
//! recall, because false inclusion corrupts the merged module while false
//! exclusion shows up as missing symbols at link time.

use irex_config::ResolvedTarget;
use std::path::Path;

/// File extensions that are never compilation candidates: headers,
/// generated includes, and interpreter scripts.
const NON_COMPILABLE_EXTENSIONS: &[&str] = &["h", "inc", "pyinc", "py"];

/// Why a candidate file was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The file is not a compilable source kind (header, generated
    /// include, script). Rejected before membership lookup.
    NonCompilable,
    /// The file is not in the target's membership table.
    NotAMember,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NonCompilable => write!(f, "not a compilable source"),
            SkipReason::NotAMember => write!(f, "not in target membership table"),
        }
    }
}

/// Returns `true` if the file is a compilable source kind.
///
/// This is a fast, format-based test independent of target; it runs before
/// any membership lookup.
pub fn is_compilable(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => !NON_COMPILABLE_EXTENSIONS.contains(&ext),
        None => true,
    }
}

/// Decides whether `path` (absolute) is in scope for `target`.
///
/// Returns `None` when the file should be compiled, or the reason it is
/// skipped. Skips are the normal mechanism for narrowing a broad input
/// list to one target, not errors.
pub fn classify(target: &ResolvedTarget, path: &Path) -> Option<SkipReason> {
    if !is_compilable(path) {
        return Some(SkipReason::NonCompilable);
    }
    if !target.contains(path) {
        return Some(SkipReason::NotAMember);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use irex_config::{load_config_from_str, resolve_target};

    fn target() -> ResolvedTarget {
        let config = load_config_from_str(
            r#"
[project]
name = "test"
source_root = "/src/vm"

[targets.x86_64]
files = ["interp/core.c", "interp/dispatch.c", "interp/notes.h"]
"#,
        )
        .unwrap();
        resolve_target(&config, "x86_64", Path::new("/src/vm")).unwrap()
    }

    #[test]
    fn compilable_sources_pass() {
        assert!(is_compilable(Path::new("/s/core.c")));
        assert!(is_compilable(Path::new("/s/core.cc")));
        assert!(is_compilable(Path::new("/s/core.S")));
        assert!(is_compilable(Path::new("/s/Makefile")));
    }

    #[test]
    fn headers_and_scripts_rejected() {
        assert!(!is_compilable(Path::new("/s/core.h")));
        assert!(!is_compilable(Path::new("/s/opcodes.inc")));
        assert!(!is_compilable(Path::new("/s/frozen.pyinc")));
        assert!(!is_compilable(Path::new("/s/gen_opcodes.py")));
    }

    #[test]
    fn member_file_accepted() {
        let t = target();
        assert_eq!(classify(&t, Path::new("/src/vm/interp/core.c")), None);
    }

    #[test]
    fn non_member_skipped() {
        let t = target();
        assert_eq!(
            classify(&t, Path::new("/src/vm/host/util.c")),
            Some(SkipReason::NotAMember)
        );
    }

    #[test]
    fn format_rejection_precedes_membership() {
        // Listed in the table, but headers are rejected before lookup.
        let t = target();
        assert_eq!(
            classify(&t, Path::new("/src/vm/interp/notes.h")),
            Some(SkipReason::NonCompilable)
        );
    }

    #[test]
    fn membership_is_literal_not_pattern() {
        let t = target();
        assert_eq!(
            classify(&t, Path::new("/src/vm/interp/core_extra.c")),
            Some(SkipReason::NotAMember)
        );
        assert_eq!(
            classify(&t, Path::new("/other/interp/core.c")),
            Some(SkipReason::NotAMember)
        );
    }
}
