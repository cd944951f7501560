//! Per-file artifact records and output path derivation.

use std::path::{Path, PathBuf};

/// Extension of per-file IR artifacts.
const ARTIFACT_EXTENSION: &str = "bc";

/// One compiled artifact: the source that produced it and where it landed.
///
/// Collected in insertion order; that order defines link input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Absolute path of the compiled source file.
    pub source: PathBuf,
    /// Path of the emitted IR file.
    pub output: PathBuf,
}

/// Derives the artifact path for a source file.
///
/// Shape: `<output_dir>/<target>/<containing-directory-name>/<stem>.bc`.
/// Including the name of the source's containing directory keeps
/// same-named files from different directories from colliding.
pub fn artifact_path(output_dir: &Path, target: &str, source: &Path) -> PathBuf {
    let containing = source
        .parent()
        .and_then(Path::file_name)
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    let stem = source.file_stem().unwrap_or_default();

    let mut file_name = PathBuf::from(stem);
    file_name.set_extension(ARTIFACT_EXTENSION);

    output_dir.join(target).join(containing).join(file_name)
}
