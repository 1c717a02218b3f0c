//! Staged DMG build pipeline.
//!
//! [`DmgBundler`] instantiates a fixed application-bundle template inside an
//! ephemeral stage directory, injects the program tree and icon, patches the
//! bundle's Info.plist, and hands the assembled bundle to an injected
//! [`DiskImager`] capability.
//!
//! The pipeline is strictly sequential: each step's completion is observed
//! before the next starts, and the first failure aborts the remaining steps
//! and surfaces directly to the caller. There are no retries and no automatic
//! rollback; `cleanup` is a separate, caller-driven operation.

mod bundle;
pub mod image;
mod metadata;
mod resources;
mod stage;

use crate::{
    error::{Error, Result},
    settings::Settings,
    utils::fs,
};
use image::{DiskImageSpec, DiskImager};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// Name of the placeholder bundle shipped inside the template.
pub const TEMPLATE_APP_NAME: &str = "Application";

/// Resolved paths for one build invocation.
///
/// Computed once from [`Settings`] and threaded through the pipeline as an
/// immutable context. The template executable path is already anchored under
/// the *renamed* bundle, because the bundle rename happens before the
/// executable rename.
#[derive(Clone, Debug)]
pub struct StagePaths {
    /// Ephemeral workspace, `<output>/stage`. Owned by one build at a time.
    pub stage_dir: PathBuf,
    /// Placeholder bundle copied from the template, `stage/Application.app`.
    pub template_bundle: PathBuf,
    /// Product bundle after materialization, `stage/<product>.app`.
    pub app_bundle: PathBuf,
    /// Placeholder executable inside the renamed bundle.
    pub template_exe: PathBuf,
    /// Product executable, `Contents/MacOS/<product>`.
    pub target_exe: PathBuf,
    /// The bundle's resource area, `Contents/Resources`.
    pub resources_dir: PathBuf,
    /// Launch script the runtime executable name is appended to.
    pub launch_script: PathBuf,
    /// The bundle's metadata document, `Contents/Info.plist`.
    pub info_plist: PathBuf,
    /// Final installer image, `stage/<product>.dmg`.
    pub dmg_path: PathBuf,
}

impl StagePaths {
    /// Resolves all pipeline paths from the settings.
    pub fn resolve(settings: &Settings) -> Self {
        let stage_dir = settings.output_directory().join("stage");
        let template_bundle = stage_dir.join(format!("{TEMPLATE_APP_NAME}.app"));
        let app_bundle = stage_dir.join(format!("{}.app", settings.product_name()));
        let contents = app_bundle.join("Contents");
        let resources_dir = contents.join("Resources");

        Self {
            template_exe: contents.join("MacOS").join(TEMPLATE_APP_NAME),
            target_exe: contents.join("MacOS").join(settings.product_name()),
            launch_script: resources_dir.join("script"),
            info_plist: contents.join("Info.plist"),
            dmg_path: stage_dir.join(format!("{}.dmg", settings.product_name())),
            stage_dir,
            template_bundle,
            app_bundle,
            resources_dir,
        }
    }
}

/// DMG build orchestrator.
///
/// Owns the resolved [`StagePaths`] and the injected disk-image capability.
/// Call [`init`](Self::init) once to verify the capability is available, then
/// [`build`](Self::build) to run the pipeline, and optionally
/// [`cleanup`](Self::cleanup) to discard the stage.
///
/// Not safe for concurrent invocation against the same output directory: the
/// stage preparer of a second build deletes the first build's in-progress
/// work.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use dmg_bundler::bundler::{DmgBundler, image::HdiutilImager};
/// use dmg_bundler::settings::SettingsBuilder;
///
/// # async fn example() -> dmg_bundler::error::Result<()> {
/// let settings = SettingsBuilder::new()
///     .output_directory("build")
///     .template_directory("template")
///     .program_directory("pkg")
///     .product_name("MyApp")
///     .executable_name("myapp")
///     .icon("icon.icns")
///     .build()?;
///
/// let bundler = DmgBundler::new(settings, Arc::new(HdiutilImager));
/// bundler.init()?;
/// let dmg = bundler.build().await?;
/// println!("created {}", dmg.display());
/// # Ok(())
/// # }
/// ```
pub struct DmgBundler {
    settings: Settings,
    paths: StagePaths,
    imager: Arc<dyn DiskImager>,
}

impl DmgBundler {
    /// Creates a new bundler with the given settings and disk-image capability.
    pub fn new(settings: Settings, imager: Arc<dyn DiskImager>) -> Self {
        let paths = StagePaths::resolve(&settings);
        Self {
            settings,
            paths,
            imager,
        }
    }

    /// Returns the resolved stage paths.
    pub fn paths(&self) -> &StagePaths {
        &self.paths
    }

    /// Verifies the disk-image capability is loadable before any work begins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDependency`] when the capability is
    /// unavailable. No filesystem work is performed either way.
    pub fn init(&self) -> Result<()> {
        self.imager
            .availability()
            .map_err(|e| Error::MissingDependency(e.to_string()))
    }

    /// Runs the full pipeline once, returning the path of the created image.
    ///
    /// Steps run in strict order; the first failure aborts the rest and is
    /// returned unmodified. A previous stage at the same output directory is
    /// removed before any new work starts.
    pub async fn build(&self) -> Result<PathBuf> {
        let settings = &self.settings;
        let paths = &self.paths;

        log::info!("Bundling {} into {}", settings.product_name(), paths.stage_dir.display());

        // Step 1: Reset the stage and instantiate the template
        stage::prepare(settings, paths).await?;

        // Step 2: Rename the placeholder bundle, then its inner executable.
        // The executable path is nested under the renamed bundle, so the
        // order is load-bearing.
        bundle::materialize(paths).await?;

        // Step 3: Append the runtime executable name to the launch script
        bundle::write_launch_command(settings, paths).await?;

        // Step 4: Merge the program tree into Resources (non-destructive)
        resources::merge_program_tree(settings, paths).await?;

        // Step 5: Install the icon
        resources::install_icon(settings, paths).await?;

        // Step 6: Patch Info.plist, preserving every key we don't own
        metadata::patch_info_plist(settings, paths).await?;

        // Step 7: Hand the assembled bundle to the external image builder
        let spec = DiskImageSpec::for_bundle(settings, paths);
        image::run_to_completion(self.imager.as_ref(), spec).await?;

        log::info!("✓ Created DMG: {}", paths.dmg_path.display());
        Ok(paths.dmg_path.clone())
    }

    /// Removes the stage directory.
    ///
    /// Idempotent: succeeds as a no-op when the stage does not exist. Never
    /// invoked automatically by `build`, on success or failure.
    pub async fn cleanup(&self) -> Result<()> {
        log::debug!("Removing stage {}", self.paths.stage_dir.display());
        fs::remove_dir_all(&self.paths.stage_dir).await
    }

    /// Returns the stage directory owned by this bundler.
    pub fn stage_dir(&self) -> &Path {
        &self.paths.stage_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsBuilder;

    #[test]
    fn paths_resolve_under_the_stage() {
        let settings = SettingsBuilder::new()
            .output_directory("/tmp/out")
            .template_directory("/tmp/template")
            .program_directory("/tmp/pkg")
            .product_name("Foo")
            .executable_name("foo-bin")
            .icon("/tmp/icon.icns")
            .build()
            .unwrap();
        let paths = StagePaths::resolve(&settings);

        assert_eq!(paths.stage_dir, Path::new("/tmp/out/stage"));
        assert_eq!(paths.template_bundle, Path::new("/tmp/out/stage/Application.app"));
        assert_eq!(paths.app_bundle, Path::new("/tmp/out/stage/Foo.app"));
        // Placeholder executable is addressed under the renamed bundle
        assert_eq!(
            paths.template_exe,
            Path::new("/tmp/out/stage/Foo.app/Contents/MacOS/Application")
        );
        assert_eq!(
            paths.target_exe,
            Path::new("/tmp/out/stage/Foo.app/Contents/MacOS/Foo")
        );
        assert_eq!(paths.dmg_path, Path::new("/tmp/out/stage/Foo.dmg"));
    }
}
