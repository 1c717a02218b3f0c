//! Core Settings struct and implementations.

use std::path::{Path, PathBuf};

/// Immutable configuration for one bundling run.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder). The optional
/// metadata fields fall back to fixed defaults when the Info.plist is patched:
/// bundle identifier → [`Settings::DEFAULT_BUNDLE_ID`], version → `"1.0.0"`.
///
/// # Examples
///
/// ```no_run
/// use dmg_bundler::settings::SettingsBuilder;
///
/// # fn example() -> dmg_bundler::error::Result<()> {
/// let settings = SettingsBuilder::new()
///     .output_directory("build")
///     .template_directory("template")
///     .program_directory("target/release/pkg")
///     .product_name("MyApp")
///     .executable_name("myapp")
///     .icon("assets/icon.icns")
///     .version("2.1.0")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Directory that will hold the ephemeral stage.
    output_directory: PathBuf,

    /// Read-only bundle template instantiated at the start of every build.
    template_directory: PathBuf,

    /// Externally built program tree merged into the bundle's Resources.
    program_directory: PathBuf,

    /// Product name. Names the bundle, its executable, and the image.
    product_name: String,

    /// Runtime executable name appended to the bundle's launch script.
    executable_name: String,

    /// Icon installed as `Contents/Resources/AppIcon.icns`.
    icon: PathBuf,

    /// Bundle identifier. Falls back to [`Settings::DEFAULT_BUNDLE_ID`].
    bundle_id: Option<String>,

    /// Version string. Falls back to "1.0.0".
    version: Option<String>,

    /// Human-readable copyright. Written only when present.
    copyright: Option<String>,
}

impl Settings {
    /// Bundle identifier used when none is configured.
    pub const DEFAULT_BUNDLE_ID: &'static str = "org.littlecorelabs.pkgpackager";

    /// Version string used when none is configured.
    pub const DEFAULT_VERSION: &'static str = "1.0.0";

    /// Returns the output directory that owns the stage.
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Returns the bundle template directory.
    pub fn template_directory(&self) -> &Path {
        &self.template_directory
    }

    /// Returns the externally built program tree.
    pub fn program_directory(&self) -> &Path {
        &self.program_directory
    }

    /// Returns the product name.
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Returns the runtime executable name.
    pub fn executable_name(&self) -> &str {
        &self.executable_name
    }

    /// Returns the icon path.
    pub fn icon(&self) -> &Path {
        &self.icon
    }

    /// Returns the configured bundle identifier, or the fixed fallback.
    pub fn bundle_id(&self) -> &str {
        self.bundle_id.as_deref().unwrap_or(Self::DEFAULT_BUNDLE_ID)
    }

    /// Returns the configured version, or "1.0.0".
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(Self::DEFAULT_VERSION)
    }

    /// Returns the copyright string, if any.
    pub fn copyright(&self) -> Option<&str> {
        self.copyright.as_deref()
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        output_directory: PathBuf,
        template_directory: PathBuf,
        program_directory: PathBuf,
        product_name: String,
        executable_name: String,
        icon: PathBuf,
        bundle_id: Option<String>,
        version: Option<String>,
        copyright: Option<String>,
    ) -> Self {
        Self {
            output_directory,
            template_directory,
            program_directory,
            product_name,
            executable_name,
            icon,
            bundle_id,
            version,
            copyright,
        }
    }
}
