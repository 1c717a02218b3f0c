//! Error types for bundling operations.
//!
//! Every filesystem failure carries the offending path, and failures from the
//! external disk-image builder or the plist codec keep the underlying cause
//! attached rather than reclassifying it.

use std::{
    fmt::Display,
    io,
    path::{self, PathBuf},
};
use thiserror::Error as DeriveError;

/// Convenient type alias for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the bundler.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// The external disk-image capability could not be loaded at init time.
    #[error("disk image capability unavailable: {0}")]
    MissingDependency(String),

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method so every I/O
    /// failure names the path that caused it.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Context describing the operation (e.g., "copying icon")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// The bundle metadata document could not be decoded.
    #[error("malformed property list {path}: {error}")]
    PlistParse {
        /// Path of the document being decoded
        path: PathBuf,
        /// Underlying decode failure
        error: String,
    },

    /// The bundle metadata document could not be re-encoded or written back.
    #[error("writing property list {path}: {error}")]
    PlistWrite {
        /// Path of the document being written
        path: PathBuf,
        /// Underlying encode/write failure
        error: String,
    },

    /// The external disk-image builder reported a terminal failure.
    #[error("disk image builder failed: {0}")]
    DiskImage(String),

    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// Generic I/O error without a specific path.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// Error walking a directory tree during mirroring.
    #[error("{0}")]
    Walkdir(#[from] walkdir::Error),

    /// Path prefix stripping error during mirroring.
    #[error("{0}")]
    StripPrefix(#[from] path::StripPrefixError),

    /// Generic error with custom message.
    #[error("{0}")]
    Generic(String),
}

/// Trait for adding context to errors.
///
/// Works with both `Result<T>` and `Option<T>`.
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation).
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::Generic(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::Generic(f().to_string()))
    }
}

/// Extension trait for filesystem operations with automatic path context.
///
/// # Examples
///
/// ```no_run
/// # use std::path::Path;
/// use dmg_bundler::error::{ErrorExt, Result};
///
/// fn create_stage(path: &Path) -> Result<()> {
///     std::fs::create_dir_all(path).fs_context("creating stage directory", path)?;
///     Ok(())
/// }
/// ```
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the
    /// operation, e.g., "renaming bundle", "copying icon".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}
