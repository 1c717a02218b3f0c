//! Configuration for a single bundling run.
//!
//! [`Settings`] is the immutable input to the pipeline: where to stage, what
//! template to instantiate, which program tree and icon to inject, and the
//! metadata to stamp into the bundle. Construct it via [`SettingsBuilder`].

mod builder;
mod core;

pub use builder::SettingsBuilder;
pub use core::Settings;
