//! Disk-image building capability.
//!
//! The image rasterizer itself is an external collaborator behind the
//! [`DiskImager`] trait: given a [`DiskImageSpec`] it emits zero or more
//! progress events followed by a terminal success or failure event. Some
//! builders emit *both* terminal events, in either order, so
//! [`run_to_completion`] latches the first terminal event observed and
//! ignores everything after it.

mod hdiutil;

pub use hdiutil::HdiutilImager;

use crate::bundler::StagePaths;
use crate::error::{Error, Result};
use crate::settings::Settings;
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedReceiver;

/// Where the Applications-folder shortcut sits in the installer window.
const APPLICATIONS_LINK_POSITION: (u32, u32) = (448, 344);

/// Where the app bundle sits in the installer window.
const APP_BUNDLE_POSITION: (u32, u32) = (192, 344);

/// Kind of a content entry inside the installer window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    /// Symlink into the host filesystem (the Applications folder).
    Link,
    /// File or directory resolved against the spec's base path.
    File,
}

/// One entry in the installer window, at a fixed pixel position.
#[derive(Clone, Debug)]
pub struct ContentEntry {
    /// Horizontal position in the installer window.
    pub x: u32,
    /// Vertical position in the installer window.
    pub y: u32,
    /// Entry kind.
    pub kind: ContentKind,
    /// Link target, or path relative to the base path.
    pub path: PathBuf,
}

/// Descriptor handed to the external image builder.
#[derive(Clone, Debug)]
pub struct DiskImageSpec {
    /// Output path of the image.
    pub target: PathBuf,
    /// Directory that `File` content entries are resolved against.
    pub base_path: PathBuf,
    /// Volume title.
    pub title: String,
    /// Volume icon.
    pub icon: PathBuf,
    /// Window contents.
    pub contents: Vec<ContentEntry>,
}

impl DiskImageSpec {
    /// Builds the fixed two-entry installer layout for an assembled bundle:
    /// an Applications-folder shortcut and the product bundle, each at its
    /// fixed window position.
    pub fn for_bundle(settings: &Settings, paths: &StagePaths) -> Self {
        Self {
            target: paths.dmg_path.clone(),
            base_path: paths.stage_dir.clone(),
            title: settings.product_name().to_string(),
            icon: settings.icon().to_path_buf(),
            contents: vec![
                ContentEntry {
                    x: APPLICATIONS_LINK_POSITION.0,
                    y: APPLICATIONS_LINK_POSITION.1,
                    kind: ContentKind::Link,
                    path: PathBuf::from("/Applications"),
                },
                ContentEntry {
                    x: APP_BUNDLE_POSITION.0,
                    y: APP_BUNDLE_POSITION.1,
                    kind: ContentKind::File,
                    path: PathBuf::from(format!("{}.app", settings.product_name())),
                },
            ],
        }
    }
}

/// Notification emitted by a [`DiskImager`] while it works.
#[derive(Clone, Debug)]
pub enum DiskImageEvent {
    /// Step progress. Logged and otherwise ignored.
    Progress {
        /// Current step, 1-based.
        current: u32,
        /// Total number of steps.
        total: u32,
        /// Title of the current step, when the builder reports one.
        title: Option<String>,
    },
    /// Terminal success.
    Finished,
    /// Terminal failure with the builder's own message.
    Failed(String),
}

/// External disk-image building capability.
///
/// Injected into the bundler at construction; availability is probed once by
/// `init` before any pipeline work starts rather than discovered mid-build.
pub trait DiskImager: Send + Sync {
    /// Checks that the capability is loadable.
    fn availability(&self) -> Result<()>;

    /// Starts building the image described by `spec`.
    ///
    /// The returned stream carries progress events followed by at least one
    /// terminal event. Implementations may emit duplicate terminal events;
    /// callers must treat only the first as authoritative.
    fn create(&self, spec: DiskImageSpec) -> UnboundedReceiver<DiskImageEvent>;
}

/// Drives an imager to completion, resolving exactly once.
///
/// The first terminal event wins: a boolean latch guards against duplicate
/// terminals and the channel is closed on the first observation, the
/// equivalent of detaching listeners. Already-queued events are drained and
/// discarded. A stream that ends without any terminal event is reported as a
/// builder failure.
pub async fn run_to_completion(imager: &dyn DiskImager, spec: DiskImageSpec) -> Result<()> {
    let target = spec.target.clone();
    log::info!("Building disk image {}", target.display());

    let mut events = imager.create(spec);
    let mut completed = false;
    let mut outcome: Result<()> = Err(Error::DiskImage(format!(
        "builder for {} ended without a terminal event",
        target.display()
    )));

    while let Some(event) = events.recv().await {
        match event {
            DiskImageEvent::Progress { current, total, title } => {
                log::debug!(
                    "dmg progress {current}/{total}{}",
                    title.map(|t| format!(": {t}")).unwrap_or_default()
                );
            },
            DiskImageEvent::Finished => {
                if completed {
                    log::debug!("ignoring duplicate terminal event (finish)");
                    continue;
                }
                completed = true;
                outcome = Ok(());
                events.close();
            },
            DiskImageEvent::Failed(message) => {
                if completed {
                    log::debug!("ignoring duplicate terminal event (error)");
                    continue;
                }
                completed = true;
                outcome = Err(Error::DiskImage(message));
                events.close();
            },
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    /// Imager that replays a fixed event script.
    struct ScriptedImager(Vec<DiskImageEvent>);

    impl DiskImager for ScriptedImager {
        fn availability(&self) -> Result<()> {
            Ok(())
        }

        fn create(&self, _spec: DiskImageSpec) -> UnboundedReceiver<DiskImageEvent> {
            let (tx, rx) = unbounded_channel();
            for event in self.0.clone() {
                let _ = tx.send(event);
            }
            rx
        }
    }

    fn spec() -> DiskImageSpec {
        DiskImageSpec {
            target: "/tmp/x/Foo.dmg".into(),
            base_path: "/tmp/x".into(),
            title: "Foo".into(),
            icon: "/tmp/icon.icns".into(),
            contents: vec![],
        }
    }

    #[tokio::test]
    async fn first_terminal_wins_finish_then_error() {
        let imager = ScriptedImager(vec![
            DiskImageEvent::Progress { current: 1, total: 2, title: None },
            DiskImageEvent::Finished,
            DiskImageEvent::Failed("late failure".into()),
        ]);
        run_to_completion(&imager, spec()).await.unwrap();
    }

    #[tokio::test]
    async fn first_terminal_wins_error_then_finish() {
        let imager = ScriptedImager(vec![
            DiskImageEvent::Failed("boom".into()),
            DiskImageEvent::Finished,
        ]);
        let err = run_to_completion(&imager, spec()).await.unwrap_err();
        assert!(matches!(err, Error::DiskImage(m) if m == "boom"));
    }

    #[tokio::test]
    async fn stream_without_terminal_is_a_failure() {
        let imager = ScriptedImager(vec![DiskImageEvent::Progress {
            current: 1,
            total: 2,
            title: Some("staging".into()),
        }]);
        let err = run_to_completion(&imager, spec()).await.unwrap_err();
        assert!(matches!(err, Error::DiskImage(_)));
    }

    #[test]
    fn bundle_spec_has_fixed_two_entry_layout() {
        let settings = crate::settings::SettingsBuilder::new()
            .output_directory("/tmp/out")
            .template_directory("/tmp/template")
            .program_directory("/tmp/pkg")
            .product_name("Foo")
            .executable_name("foo-bin")
            .icon("/tmp/icon.icns")
            .build()
            .unwrap();
        let paths = crate::bundler::StagePaths::resolve(&settings);
        let spec = DiskImageSpec::for_bundle(&settings, &paths);

        assert_eq!(spec.target, paths.dmg_path);
        assert_eq!(spec.base_path, paths.stage_dir);
        assert_eq!(spec.title, "Foo");
        assert_eq!(spec.contents.len(), 2);
        assert_eq!(spec.contents[0].kind, ContentKind::Link);
        assert_eq!((spec.contents[0].x, spec.contents[0].y), (448, 344));
        assert_eq!(spec.contents[1].kind, ContentKind::File);
        assert_eq!((spec.contents[1].x, spec.contents[1].y), (192, 344));
        assert_eq!(spec.contents[1].path, PathBuf::from("Foo.app"));
    }
}
