//! Builder for constructing Settings.

use super::Settings;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// The directories, product name, executable name, and icon are required;
/// `build` fails with a descriptive error when any is missing. Bundle
/// identifier, version, and copyright are optional.
#[derive(Default)]
pub struct SettingsBuilder {
    output_directory: Option<PathBuf>,
    template_directory: Option<PathBuf>,
    program_directory: Option<PathBuf>,
    product_name: Option<String>,
    executable_name: Option<String>,
    icon: Option<PathBuf>,
    bundle_id: Option<String>,
    version: Option<String>,
    copyright: Option<String>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the output directory that will own the stage.
    ///
    /// # Required
    pub fn output_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the bundle template directory.
    ///
    /// # Required
    pub fn template_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.template_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the externally built program tree to merge into Resources.
    ///
    /// # Required
    pub fn program_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.program_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the product name.
    ///
    /// # Required
    pub fn product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    /// Sets the runtime executable name appended to the launch script.
    ///
    /// # Required
    pub fn executable_name(mut self, name: impl Into<String>) -> Self {
        self.executable_name = Some(name.into());
        self
    }

    /// Sets the icon file path.
    ///
    /// # Required
    pub fn icon<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.icon = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the bundle identifier.
    ///
    /// Default: [`Settings::DEFAULT_BUNDLE_ID`]
    pub fn bundle_id(mut self, id: impl Into<String>) -> Self {
        self.bundle_id = Some(id.into());
        self
    }

    /// Sets the version string.
    ///
    /// Default: "1.0.0"
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the human-readable copyright string.
    ///
    /// Default: None (the Info.plist key is left untouched)
    pub fn copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = Some(copyright.into());
        self
    }

    /// Builds the [`Settings`], validating that required fields are present.
    pub fn build(self) -> Result<Settings> {
        Ok(Settings::new(
            self.output_directory
                .ok_or_else(|| Error::Generic("output directory is required".into()))?,
            self.template_directory
                .ok_or_else(|| Error::Generic("template directory is required".into()))?,
            self.program_directory
                .ok_or_else(|| Error::Generic("program directory is required".into()))?,
            self.product_name
                .ok_or_else(|| Error::Generic("product name is required".into()))?,
            self.executable_name
                .ok_or_else(|| Error::Generic("executable name is required".into()))?,
            self.icon
                .ok_or_else(|| Error::Generic("icon path is required".into()))?,
            self.bundle_id,
            self.version,
            self.copyright,
        ))
    }
}
