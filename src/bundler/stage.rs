//! Stage preparation.
//!
//! Resets the ephemeral workspace and instantiates the bundle template into
//! it, guaranteeing that no residue from a prior build survives.

use super::StagePaths;
use crate::{settings::Settings, utils::fs};
use crate::error::Result;

/// Removes any existing output, recreates the stage fresh, and copies the
/// entire template tree into it.
///
/// The whole output directory is removed, not just the stage, so stale
/// artifacts next to the stage are discarded as well. A missing output
/// directory is not an error.
pub async fn prepare(settings: &Settings, paths: &StagePaths) -> Result<()> {
    log::debug!("Preparing stage {}", paths.stage_dir.display());

    fs::remove_dir_all(settings.output_directory()).await?;
    fs::create_dir_all(&paths.stage_dir).await?;
    fs::merge_dir(settings.template_directory(), &paths.stage_dir).await?;

    Ok(())
}
