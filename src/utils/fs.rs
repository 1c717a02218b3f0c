//! File system primitives for staging.
//!
//! Thin wrappers over `tokio::fs` and `walkdir` that attach the offending path
//! to every failure. The directory copy is a non-destructive merge: paths
//! already present in the destination that have no counterpart in the source
//! are left alone.

use crate::error::{Error, ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Creates all of the directories of the specified path. Idempotent.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
///
/// A missing path is not an error, so repeated cleanup calls succeed.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Fs {
            context: "removing directory",
            path: path.to_path_buf(),
            error: e,
        }),
    }
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary. Overwrites the
/// destination if it already exists.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.is_file() {
        return Err(Error::Fs {
            context: "copying file",
            path: from.to_path_buf(),
            error: io::Error::new(io::ErrorKind::NotFound, "not a regular file"),
        });
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file to", to)?;
    Ok(())
}

/// Recursively merges a directory tree into another, creating any parent
/// directories of the destination path as necessary.
///
/// Files with matching relative paths are overwritten; destination entries
/// with no counterpart in the source are preserved. Symlinks are recreated
/// rather than followed.
///
/// Fails if the source path is not a directory or doesn't exist.
pub async fn merge_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        return Err(Error::Fs {
            context: "mirroring directory",
            path: from.to_path_buf(),
            error: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
        });
    }

    // Clone paths for move into blocking closure
    let from = from.to_path_buf();
    let to = to.to_path_buf();

    // Offload blocking traversal to the dedicated thread pool
    tokio::task::spawn_blocking(move || -> Result<()> {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
        }

        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry?;
            debug_assert!(entry.path().starts_with(&from));
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            if entry.path_is_symlink() {
                let target = std::fs::read_link(entry.path())
                    .fs_context("reading symlink", entry.path())?;
                // Replace any stale link at the destination
                match std::fs::remove_file(&dest_path) {
                    Ok(()) => {},
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {},
                    Err(e) => {
                        return Err(Error::Fs {
                            context: "replacing symlink",
                            path: dest_path,
                            error: e,
                        });
                    },
                }
                symlink(&target, &dest_path).fs_context("creating symlink", &dest_path)?;
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path)
                    .fs_context("creating directory", &dest_path)?;
            } else {
                std::fs::copy(entry.path(), &dest_path)
                    .fs_context("copying file to", &dest_path)?;
            }
        }

        Ok(())
    })
    .await
    .map_err(|e| Error::Generic(format!("directory merge task panicked: {}", e)))?
}

#[cfg(unix)]
fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    if src.is_dir() {
        std::os::windows::fs::symlink_dir(src, dst)
    } else {
        std::os::windows::fs::symlink_file(src, dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_dir_all_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        create_dir_all(&nested).await.unwrap();
        create_dir_all(&nested).await.unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn remove_dir_all_missing_path_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("never-created");
        remove_dir_all(&missing).await.unwrap();
        remove_dir_all(&missing).await.unwrap();
    }

    #[tokio::test]
    async fn merge_dir_keeps_unmatched_destination_files() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("new.txt"), "new").unwrap();
        std::fs::write(dst.path().join("keep.txt"), "keep").unwrap();

        merge_dir(src.path(), dst.path()).await.unwrap();

        assert_eq!(std::fs::read_to_string(dst.path().join("new.txt")).unwrap(), "new");
        assert_eq!(std::fs::read_to_string(dst.path().join("keep.txt")).unwrap(), "keep");
    }

    #[tokio::test]
    async fn merge_dir_overwrites_matching_paths() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("file.txt"), "fresh").unwrap();
        std::fs::write(dst.path().join("file.txt"), "stale").unwrap();

        merge_dir(src.path(), dst.path()).await.unwrap();

        assert_eq!(std::fs::read_to_string(dst.path().join("file.txt")).unwrap(), "fresh");
    }

    #[tokio::test]
    async fn copy_file_missing_source_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("ghost.icns");
        let err = copy_file(&missing, &dir.path().join("out.icns"))
            .await
            .unwrap_err();
        match err {
            Error::Fs { path, .. } => assert_eq!(path, missing),
            other => panic!("expected Fs error, got {other}"),
        }
    }
}
