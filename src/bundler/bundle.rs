//! Bundle materialization and launch-script setup.

use super::StagePaths;
use crate::error::{ErrorExt, Result};
use crate::settings::Settings;
use tokio::io::AsyncWriteExt;

/// Renames the template's placeholder bundle and inner executable to their
/// product-specific names.
///
/// The bundle rename must complete first: the executable lives at
/// `Contents/MacOS/` inside the renamed bundle, so its path does not exist
/// until the outer rename has happened.
pub async fn materialize(paths: &StagePaths) -> Result<()> {
    log::debug!("Materializing {}", paths.app_bundle.display());

    tokio::fs::rename(&paths.template_bundle, &paths.app_bundle)
        .await
        .fs_context("renaming template bundle", &paths.template_bundle)?;

    tokio::fs::rename(&paths.template_exe, &paths.target_exe)
        .await
        .fs_context("renaming bundle executable", &paths.template_exe)?;

    Ok(())
}

/// Appends the runtime executable name to the bundle's launch script.
///
/// The name is appended byte-verbatim with no separator; the template's
/// script is expected to end exactly where the command belongs. Prior
/// content is never truncated or rewritten.
pub async fn write_launch_command(settings: &Settings, paths: &StagePaths) -> Result<()> {
    let mut script = tokio::fs::OpenOptions::new()
        .append(true)
        .open(&paths.launch_script)
        .await
        .fs_context("opening launch script", &paths.launch_script)?;

    script
        .write_all(settings.executable_name().as_bytes())
        .await
        .fs_context("appending to launch script", &paths.launch_script)?;
    script
        .flush()
        .await
        .fs_context("flushing launch script", &paths.launch_script)?;

    Ok(())
}
