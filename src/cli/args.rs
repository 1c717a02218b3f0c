//! Command line argument parsing and validation.

use clap::Parser;
use std::path::PathBuf;

/// macOS DMG installer bundler
#[derive(Parser, Debug)]
#[command(
    name = "dmg_bundler",
    version,
    about = "Stages a macOS app bundle from a template and builds a DMG installer",
    long_about = "Instantiates an application-bundle template, injects the built program tree \
and icon, patches the bundle's Info.plist, and builds a drag-to-install DMG.

Usage:
  dmg_bundler --output build --template template --program-dir target/pkg \\
      --product-name MyApp --executable-name myapp --icon assets/icon.icns

With --output-image the finished DMG is moved to that exact path and the
staging directory is removed. Exit code 0 then guarantees the image exists
at the output path."
)]
pub struct Args {
    /// Output directory that will own the ephemeral staging area
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: PathBuf,

    /// Application-bundle template directory
    #[arg(short = 't', long, value_name = "DIR")]
    pub template: PathBuf,

    /// Externally built program tree merged into the bundle's Resources
    #[arg(short = 'p', long, value_name = "DIR")]
    pub program_dir: PathBuf,

    /// Product name; names the bundle, its executable, and the image
    #[arg(short = 'n', long, value_name = "NAME")]
    pub product_name: String,

    /// Runtime executable name appended to the bundle's launch script
    #[arg(short = 'e', long, value_name = "NAME")]
    pub executable_name: String,

    /// Icon installed as AppIcon.icns and used as the volume icon
    #[arg(short = 'i', long, value_name = "PATH")]
    pub icon: PathBuf,

    /// Bundle identifier (default: org.littlecorelabs.pkgpackager)
    #[arg(long, value_name = "ID")]
    pub bundle_id: Option<String>,

    /// Version stamped into the Info.plist (default: 1.0.0)
    #[arg(long = "app-version", value_name = "VERSION")]
    pub app_version: Option<String>,

    /// Human-readable copyright stamped into the Info.plist
    #[arg(long, value_name = "TEXT")]
    pub copyright: Option<String>,

    /// Move the finished DMG to this path and remove the stage
    #[arg(long, value_name = "PATH")]
    pub output_image: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.product_name.trim().is_empty() {
            return Err("Product name cannot be empty".to_string());
        }
        if self.executable_name.trim().is_empty() {
            return Err("Executable name cannot be empty".to_string());
        }
        if !self.template.is_dir() {
            return Err(format!(
                "Template directory does not exist: {}",
                self.template.display()
            ));
        }
        if !self.program_dir.is_dir() {
            return Err(format!(
                "Program directory does not exist: {}",
                self.program_dir.display()
            ));
        }
        Ok(())
    }
}
