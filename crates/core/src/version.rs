//! Startup consistency check between the package version and the
//! recorded `VERSION` file.

use std::path::Path;

use crate::error::{CampaignError, CampaignResult};

/// Compare the compiled package version against the recorded one.
/// Surrounding whitespace in the recorded value is ignored.
pub fn check_version(package: &str, recorded: &str) -> CampaignResult<()> {
    let recorded = recorded.trim();
    if package.trim() == recorded {
        Ok(())
    } else {
        Err(CampaignError::VersionMismatch {
            package: package.to_string(),
            recorded: recorded.to_string(),
        })
    }
}

pub fn read_version_file(path: &Path) -> CampaignResult<String> {
    let text = std::fs::read_to_string(path)?;
    Ok(text.trim().to_string())
}
