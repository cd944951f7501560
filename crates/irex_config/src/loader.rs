//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Loads and validates an `irex.toml` configuration from a project directory.
///
/// Reads `<project_dir>/irex.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join("irex.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates an `irex.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and membership tables are
/// well-formed.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.source_root.is_empty() {
        return Err(ConfigError::MissingField("project.source_root".to_string()));
    }
    for (name, target) in &config.targets {
        if target.files.iter().any(|f| f.is_empty()) {
            return Err(ConfigError::MissingField(format!(
                "targets.{name}.files contains an empty path"
            )));
        }
        if target.files.iter().any(|f| Path::new(f).is_absolute()) {
            return Err(ConfigError::ParseError(format!(
                "targets.{name}.files must be relative to the source root"
            )));
        }
    }
    Ok(())
}
