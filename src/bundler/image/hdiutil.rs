//! hdiutil-backed disk imager.
//!
//! Production implementation of [`DiskImager`] that stages the spec's
//! contents in a temporary directory and rasterizes them with the native
//! `hdiutil` tool using UDZO compression. Entry positions require Finder
//! scripting to apply, so hdiutil output uses the default icon arrangement.

use super::{ContentKind, DiskImageEvent, DiskImageSpec, DiskImager};
use crate::error::{Context, Error, ErrorExt, Result};
use crate::utils::fs;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

/// Disk imager that shells out to `hdiutil`.
pub struct HdiutilImager;

impl DiskImager for HdiutilImager {
    fn availability(&self) -> Result<()> {
        which::which("hdiutil")
            .map(|_| ())
            .map_err(|e| Error::Generic(format!("hdiutil not found in PATH: {e}")))
    }

    fn create(&self, spec: DiskImageSpec) -> UnboundedReceiver<DiskImageEvent> {
        let (tx, rx) = unbounded_channel();
        tokio::spawn(async move {
            let _ = tx.send(DiskImageEvent::Progress {
                current: 1,
                total: 2,
                title: Some("staging image contents".into()),
            });
            let staged = stage_contents(&spec).await;

            let result = match staged {
                Ok(staging) => {
                    let _ = tx.send(DiskImageEvent::Progress {
                        current: 2,
                        total: 2,
                        title: Some("rasterizing image".into()),
                    });
                    rasterize(&spec, staging.path()).await
                },
                Err(e) => Err(e),
            };

            let _ = match result {
                Ok(()) => tx.send(DiskImageEvent::Finished),
                Err(e) => tx.send(DiskImageEvent::Failed(e.to_string())),
            };
        });
        rx
    }
}

/// Lays the spec's content entries out in a temporary staging directory.
async fn stage_contents(spec: &DiskImageSpec) -> Result<tempfile::TempDir> {
    let staging = tempfile::tempdir()
        .map_err(|e| Error::Generic(format!("creating image staging directory: {e}")))?;

    for entry in &spec.contents {
        let name = entry
            .path
            .file_name()
            .ok_or_else(|| Error::Generic(format!("content entry has no name: {:?}", entry.path)))?;
        let dest = staging.path().join(name);

        match entry.kind {
            ContentKind::Link => {
                #[cfg(unix)]
                std::os::unix::fs::symlink(&entry.path, &dest)
                    .fs_context("creating content symlink", &dest)?;
                #[cfg(not(unix))]
                log::debug!("skipping symlink entry {:?} on non-unix host", entry.path);
            },
            ContentKind::File => {
                let source = spec.base_path.join(&entry.path);
                if source.is_dir() {
                    fs::merge_dir(&source, &dest).await?;
                } else {
                    fs::copy_file(&source, &dest).await?;
                }
            },
        }
    }

    // Volume icon; Finder only honors it once the custom-icon attribute is
    // set on the mounted volume, which is left to the consumer.
    if spec.icon.is_file() {
        fs::copy_file(&spec.icon, &staging.path().join(".VolumeIcon.icns")).await?;
    }

    Ok(staging)
}

/// Runs `hdiutil create` over the staged contents.
async fn rasterize(spec: &DiskImageSpec, staging: &std::path::Path) -> Result<()> {
    let staging_str = staging.to_str().context("staging path is not valid UTF-8")?;
    let target_str = spec
        .target
        .to_str()
        .context("image target path is not valid UTF-8")?;

    let output = tokio::process::Command::new("hdiutil")
        .args([
            "create",
            "-volname",
            spec.title.as_str(),
            "-srcfolder",
            staging_str,
            "-ov",
            "-format",
            "UDZO",
            target_str,
        ])
        .output()
        .await
        .map_err(|e| Error::Generic(format!("failed to execute hdiutil: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Generic(format!("hdiutil failed: {stderr}")));
    }

    Ok(())
}
