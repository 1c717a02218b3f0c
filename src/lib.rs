//! macOS DMG installer bundler.
//!
//! Turns a compiled program tree, an icon, and metadata into a distributable
//! installer image: instantiates a fixed application-bundle template inside
//! an ephemeral stage, injects the program and resources, patches the
//! bundle's binary Info.plist, and drives an external disk-image builder to
//! completion.
//!
//! It can be used both as a CLI tool and as a library dependency; the
//! disk-image capability is injected, so tests and alternative rasterizers
//! plug in behind [`bundler::image::DiskImager`].

pub mod bundler;
pub mod cli;
pub mod error;
pub mod settings;
pub mod utils;

// Re-export commonly used types
pub use bundler::{DmgBundler, StagePaths};
pub use error::{Error, Result};
pub use settings::{Settings, SettingsBuilder};
