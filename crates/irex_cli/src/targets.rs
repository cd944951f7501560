//! `irex targets` — list configured targets.

use crate::project::resolve_project_root;
use crate::GlobalArgs;

/// Runs the `irex targets` command, printing one line per configured
/// target with its membership size.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = irex_config::load_config(&project_dir)?;

    if config.targets.is_empty() {
        eprintln!("warning: no targets configured in irex.toml");
        return Ok(0);
    }

    for (name, target) in &config.targets {
        println!("{name}  ({} file(s))", target.files.len());
    }

    Ok(0)
}
