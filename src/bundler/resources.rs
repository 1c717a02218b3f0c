//! Resource and icon installation.

use super::StagePaths;
use crate::error::Result;
use crate::{settings::Settings, utils::fs};

/// Merges the externally built program tree into the bundle's Resources.
///
/// Template-placed files with no counterpart in the program tree are
/// preserved; matching paths are overwritten.
pub async fn merge_program_tree(settings: &Settings, paths: &StagePaths) -> Result<()> {
    log::debug!(
        "Merging {} into {}",
        settings.program_directory().display(),
        paths.resources_dir.display()
    );
    fs::merge_dir(settings.program_directory(), &paths.resources_dir).await
}

/// Copies the product icon to `Contents/Resources/AppIcon.icns`, overwriting
/// any icon the template shipped at that exact path.
pub async fn install_icon(settings: &Settings, paths: &StagePaths) -> Result<()> {
    let target = paths.resources_dir.join("AppIcon.icns");
    log::debug!("Installing icon {}", target.display());
    fs::copy_file(settings.icon(), &target).await
}
