//! Pre-flight membership-table integrity checking.
//!
//! Runs before any compilation begins so that a single bad configuration
//! entry cannot produce a silently incomplete module hours into a long batch.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Verifies that every membership entry across every target exists under
/// the source root.
///
/// All targets are checked, not just the one being built this run: a stale
/// entry anywhere in the table is a configuration error worth fixing now.
/// Returns the first violation found, in target/entry order.
pub fn verify_membership(config: &ProjectConfig, source_root: &Path) -> Result<(), ConfigError> {
    for (name, target) in &config.targets {
        for file in &target.files {
            let path = source_root.join(file);
            if !path.is_file() {
                return Err(ConfigError::MembershipIntegrity {
                    target: name.clone(),
                    path,
                });
            }
        }
    }
    Ok(())
}
