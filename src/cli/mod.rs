//! Command line interface for the DMG bundler.

mod args;

pub use args::Args;

use crate::bundler::DmgBundler;
use crate::bundler::image::HdiutilImager;
use crate::error::{Context, Error, ErrorExt, Result};
use crate::settings::SettingsBuilder;
use std::path::Path;
use std::sync::Arc;

/// Main CLI entry point.
///
/// Parses and validates arguments, runs the pipeline once, and optionally
/// moves the finished image out of the stage.
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    if let Err(reason) = args.validate() {
        return Err(Error::Generic(reason));
    }

    let mut builder = SettingsBuilder::new()
        .output_directory(&args.output)
        .template_directory(&args.template)
        .program_directory(&args.program_dir)
        .product_name(args.product_name.as_str())
        .executable_name(args.executable_name.as_str())
        .icon(&args.icon);
    if let Some(id) = &args.bundle_id {
        builder = builder.bundle_id(id.as_str());
    }
    if let Some(version) = &args.app_version {
        builder = builder.version(version.as_str());
    }
    if let Some(copyright) = &args.copyright {
        builder = builder.copyright(copyright.as_str());
    }
    let settings = builder.build()?;

    let bundler = DmgBundler::new(settings, Arc::new(HdiutilImager));
    bundler.init()?;
    let dmg_path = bundler.build().await?;

    match &args.output_image {
        Some(destination) => {
            move_image(&dmg_path, destination)
                .await
                .context("moving image to output path")?;
            bundler.cleanup().await?;
            println!("{}", destination.display());
        },
        None => {
            // Stage is left in place so the caller can inspect or reuse it
            println!("{}", dmg_path.display());
        },
    }

    Ok(0)
}

/// Moves the finished image to its final path, falling back to copy+delete
/// when the rename crosses filesystems.
async fn move_image(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating output directory", parent)?;
    }
    match tokio::fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(_) => copy_and_remove(from, to).await,
    }
}

/// Cross-filesystem move: copy the image to its destination, then delete the
/// staged original.
async fn copy_and_remove(from: &Path, to: &Path) -> Result<()> {
    crate::utils::fs::copy_file(from, to).await?;
    tokio::fs::remove_file(from)
        .await
        .fs_context("removing staged image", from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn move_image_creates_parent_and_renames() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("Foo.dmg");
        std::fs::write(&from, b"dmg").unwrap();
        let to = dir.path().join("dist/Foo.dmg");

        move_image(&from, &to).await.unwrap();

        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"dmg");
    }

    #[tokio::test]
    async fn copy_and_remove_preserves_bytes_and_drops_source() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("Foo.dmg");
        std::fs::write(&from, b"image-bytes").unwrap();
        let to = dir.path().join("dist/Foo.dmg");

        copy_and_remove(&from, &to).await.unwrap();

        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"image-bytes");
    }

    #[tokio::test]
    async fn move_image_missing_source_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("ghost.dmg");
        let to = dir.path().join("dist/ghost.dmg");

        let err = move_image(&from, &to).await.unwrap_err();
        match err {
            Error::Fs { path, .. } => assert_eq!(path, from),
            other => panic!("expected Fs error, got {other}"),
        }
    }
}
