//! `irex check` — membership-table integrity pre-flight as a standalone
//! command.
//!
//! Runs the same check `irex emit` performs before compiling, across every
//! target, so a stale table entry surfaces in CI instead of hours into a
//! batch.

use crate::project::resolve_project_root;
use crate::GlobalArgs;

/// Runs the `irex check` command. Returns exit code 0 if every membership
/// entry in every target exists under the source root, 1 otherwise.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = irex_config::load_config(&project_dir)?;
    let source_root = config.source_root_in(&project_dir);

    if let Err(e) = irex_config::verify_membership(&config, &source_root) {
        eprintln!("error: {e}");
        return Ok(1);
    }

    if !global.quiet {
        for (name, target) in &config.targets {
            eprintln!("   {name}: {} file(s) ok", target.files.len());
        }
        eprintln!(
            "   Checked {} target(s) against {}",
            config.targets.len(),
            source_root.display()
        );
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn global_for(dir: &Path) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(dir.display().to_string()),
        }
    }

    fn write_config(dir: &Path, root: &Path, files: &str) {
        fs::write(
            dir.join("irex.toml"),
            format!(
                r#"
[project]
name = "t"
source_root = "{root}"

[targets.x86_64]
files = {files}
"#,
                root = root.display()
            ),
        )
        .unwrap();
    }

    #[test]
    fn intact_table_passes() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("src");
        fs::create_dir_all(root.join("interp")).unwrap();
        fs::write(root.join("interp/core.c"), "").unwrap();
        write_config(tmp.path(), &root, r#"["interp/core.c"]"#);

        let code = run(&global_for(tmp.path())).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn missing_entry_fails() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("src");
        fs::create_dir_all(&root).unwrap();
        write_config(tmp.path(), &root, r#"["interp/gone.c"]"#);

        let code = run(&global_for(tmp.path())).unwrap();
        assert_eq!(code, 1);
    }
}
