// SPDX-License-Identifier: MPL-2.0
//! The image source: one file, one representation.
//!
//! [`ImageSource`] classifies a file, owns exactly one backing resource for it
//! (vector document, animation or bitmap) and produces renderable items on
//! demand. Every notification is delivered synchronously to the
//! [`SourceObserver`] passed to the operation, before the operation returns.
//!
//! # Example
//!
//! ```no_run
//! use lens_view::source::{EventLog, ImageSource, RepresentationKind};
//!
//! let mut source = ImageSource::new();
//! let mut log = EventLog::new();
//! source.open("picture.png", &mut log).expect("cannot open picture");
//! assert_eq!(source.kind(), RepresentationKind::Static);
//! let item = source.create_graphics_item().expect("static item");
//! println!("{}x{}", item.size().width, item.size().height);
//! ```

mod events;
mod item;

pub use events::{
    ChangeTrigger, ChangeType, EventLog, ReloadBehavior, ReloadFlag, SourceEvent, SourceObserver,
};
pub use item::{AnimatedItem, GraphicsItem, ItemId, SharedAnimation, StaticItem, VectorItem};

use crate::config::DEFAULT_START_PAUSED;
use crate::error::{CannotHandle, OpenError};
use crate::media::{
    Animation, AnimationEvent, Bitmap, DetectedFormat, FormatFamily, ImageSize, Sniffed,
    VectorDocument,
};
use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

/// Which representation a source currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentationKind {
    None,
    Vector,
    Animated,
    Static,
}

/// The single backing resource, tagged by kind.
#[derive(Debug, Default)]
enum Representation {
    #[default]
    None,
    Vector {
        document: VectorDocument,
        /// Built during detection; moved out by the first `create_graphics_item`.
        pending_item: Option<VectorItem>,
    },
    Animated(SharedAnimation),
    Static(Bitmap),
}

impl Representation {
    fn kind(&self) -> RepresentationKind {
        match self {
            Representation::None => RepresentationKind::None,
            Representation::Vector { .. } => RepresentationKind::Vector,
            Representation::Animated(_) => RepresentationKind::Animated,
            Representation::Static(_) => RepresentationKind::Static,
        }
    }
}

/// Construction-time settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceOptions {
    /// Pause state forced onto every newly opened animation.
    pub start_paused: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            start_paused: DEFAULT_START_PAUSED,
        }
    }
}

/// Loads one image file and owns its decoded representation.
#[derive(Debug, Default)]
pub struct ImageSource {
    representation: Representation,
    /// Last successfully opened path; kept across failed attempts.
    file_path: Option<PathBuf>,
    paused: bool,
    options: SourceOptions,
}

impl ImageSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: SourceOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Loads `path`, replacing whatever was loaded before.
    ///
    /// The previous representation is released first, so on failure the source
    /// is empty. [`SourceEvent::OpenFinished`] is emitted exactly once, after
    /// any size notification.
    ///
    /// # Errors
    ///
    /// - [`OpenError::Read`] if the file cannot be opened for reading.
    /// - [`OpenError::CannotHandle`] if the format is unknown or the content
    ///   cannot be decoded.
    pub fn open<P, O>(&mut self, path: P, observer: &mut O) -> Result<(), OpenError>
    where
        P: AsRef<Path>,
        O: SourceObserver + ?Sized,
    {
        let result = self.open_impl(path.as_ref(), observer);
        observer.notify(
            self,
            SourceEvent::OpenFinished {
                success: result.is_ok(),
            },
        );
        result
    }

    fn open_impl<O>(&mut self, path: &Path, observer: &mut O) -> Result<(), OpenError>
    where
        O: SourceObserver + ?Sized,
    {
        self.clean_up();

        File::open(path).map_err(|source| OpenError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let sniffed = Sniffed::read(path).map_err(|err| {
            tracing::debug!(path = %path.display(), %err, "cannot sniff file");
            CannotHandle::UnsupportedFormat
        })?;
        let format = sniffed.detect().ok_or_else(|| {
            tracing::debug!(path = %path.display(), "no decoder recognizes file");
            CannotHandle::UnsupportedFormat
        })?;
        let family = sniffed.family(format);
        tracing::debug!(path = %path.display(), ?format, ?family, "detected image format");

        match (family, format) {
            (FormatFamily::Vector, _) => self.open_vector(path, observer)?,
            (FormatFamily::Animated, DetectedFormat::Raster(raster)) => {
                let animation = Animation::load(path, raster)?;
                self.open_animation(path, animation, observer);
            }
            _ => self.open_static(path, observer)?,
        }

        tracing::info!(path = %path.display(), kind = ?self.kind(), "image opened");
        Ok(())
    }

    fn open_vector<O>(&mut self, path: &Path, observer: &mut O) -> Result<(), CannotHandle>
    where
        O: SourceObserver + ?Sized,
    {
        let document = VectorDocument::load(path)?;
        let size = document.bounds().to_image_size();
        let pending_item = Some(VectorItem::from_document(&document));

        self.representation = Representation::Vector {
            document,
            pending_item,
        };
        self.file_path = Some(path.to_path_buf());
        observer.notify(self, SourceEvent::ImageSizeChanged(size));
        Ok(())
    }

    fn open_animation<O>(&mut self, path: &Path, animation: Animation, observer: &mut O)
    where
        O: SourceObserver + ?Sized,
    {
        let animation = Rc::new(RefCell::new(animation));
        self.representation = Representation::Animated(Rc::clone(&animation));
        self.file_path = Some(path.to_path_buf());

        let events = animation.borrow_mut().start();
        self.forward_animation_events(&events, observer);
        self.force_paused(self.options.start_paused, observer);
    }

    fn open_static<O>(&mut self, path: &Path, observer: &mut O) -> Result<(), CannotHandle>
    where
        O: SourceObserver + ?Sized,
    {
        let bitmap = Bitmap::load(path)?;
        let size = bitmap.size();

        self.representation = Representation::Static(bitmap);
        self.file_path = Some(path.to_path_buf());
        observer.notify(self, SourceEvent::ImageSizeChanged(size));
        Ok(())
    }

    /// Advises whether a change should be reloaded silently or after asking.
    #[must_use]
    pub fn reload_behavior(&self, trigger: ChangeTrigger, change: ChangeType) -> ReloadBehavior {
        match (change, trigger) {
            (ChangeType::Removed | ChangeType::PermissionsChanged, _) => ReloadBehavior::Silent,
            (ChangeType::ContentsChanged, ChangeTrigger::Internal) if !self.is_modified() => {
                ReloadBehavior::Silent
            }
            _ => ReloadBehavior::Ask,
        }
    }

    /// Reacts to a change of the loaded file.
    ///
    /// `Ignore` does nothing. A permissions change only emits
    /// [`SourceEvent::Changed`]. Anything else emits
    /// [`SourceEvent::AboutToReload`], reopens the current path and emits
    /// [`SourceEvent::ReloadFinished`]. The old representation is released
    /// before the new one is built.
    ///
    /// # Errors
    ///
    /// Same as [`ImageSource::open`]; reloading with no path ever opened is a
    /// read error.
    pub fn reload<O>(
        &mut self,
        flag: ReloadFlag,
        change: ChangeType,
        observer: &mut O,
    ) -> Result<(), OpenError>
    where
        O: SourceObserver + ?Sized,
    {
        if flag == ReloadFlag::Ignore {
            return Ok(());
        }

        if change == ChangeType::PermissionsChanged {
            observer.notify(self, SourceEvent::Changed);
            return Ok(());
        }

        observer.notify(self, SourceEvent::AboutToReload);
        let result = match self.file_path.clone() {
            Some(path) => self.open_impl(&path, observer),
            None => {
                self.clean_up();
                Err(OpenError::Read {
                    path: PathBuf::new(),
                    source: io::Error::new(io::ErrorKind::NotFound, "no file loaded"),
                })
            }
        };
        if let Err(err) = &result {
            tracing::warn!(%err, "reload failed");
        }
        observer.notify(
            self,
            SourceEvent::ReloadFinished {
                success: result.is_ok(),
            },
        );
        result
    }

    /// Pauses or resumes the animation.
    ///
    /// Does nothing unless an animation is loaded and `paused` differs from the
    /// current state.
    pub fn set_paused<O>(&mut self, paused: bool, observer: &mut O)
    where
        O: SourceObserver + ?Sized,
    {
        if self.animation().is_none() || self.paused == paused {
            return;
        }
        self.force_paused(paused, observer);
    }

    /// Applies `paused` to the engine and notifies, even when the stored flag
    /// already has that value. A freshly started engine is running regardless
    /// of what the source remembers.
    fn force_paused<O>(&mut self, paused: bool, observer: &mut O)
    where
        O: SourceObserver + ?Sized,
    {
        let Some(animation) = self.animation() else {
            return;
        };
        self.paused = paused;
        animation.borrow_mut().set_paused(paused);
        observer.notify(self, SourceEvent::PausedChanged(paused));
    }

    /// Re-asserts playback on the engine if the animation should be running.
    pub fn update_visibility(&mut self) {
        if self.paused {
            return;
        }
        if let Some(animation) = self.animation() {
            animation.borrow_mut().set_paused(false);
        }
    }

    /// Drives animation playback by `elapsed`.
    ///
    /// A finished sequence restarts from its first frame. Returns `true` if the
    /// displayed frame changed.
    pub fn advance_animation<O>(&mut self, elapsed: Duration, observer: &mut O) -> bool
    where
        O: SourceObserver + ?Sized,
    {
        let Some(animation) = self.animation() else {
            return false;
        };

        let mut events = animation.borrow_mut().advance(elapsed);
        if events.contains(&AnimationEvent::Finished) {
            events.extend(animation.borrow_mut().start());
        }
        self.forward_animation_events(&events, observer);

        events
            .iter()
            .any(|event| matches!(event, AnimationEvent::FrameUpdated(_)))
    }

    fn forward_animation_events<O>(&mut self, events: &[AnimationEvent], observer: &mut O)
    where
        O: SourceObserver + ?Sized,
    {
        for event in events {
            if let AnimationEvent::Resized(size) = event {
                observer.notify(self, SourceEvent::ImageSizeChanged(*size));
            }
        }
    }

    /// Builds a renderable item for the current representation.
    ///
    /// For a vector image the item built while opening is handed over on the
    /// first call; later calls parse the file again. Animated items share the
    /// live animation. Static items copy the bitmap.
    pub fn create_graphics_item(&mut self) -> Option<GraphicsItem> {
        match &mut self.representation {
            Representation::None => None,
            Representation::Vector { pending_item, .. } => {
                if let Some(item) = pending_item.take() {
                    return Some(GraphicsItem::Vector(item));
                }
                let path = self.file_path.as_deref()?;
                match VectorItem::load(path) {
                    Ok(item) => Some(GraphicsItem::Vector(item)),
                    Err(err) => {
                        tracing::warn!(path = %path.display(), %err, "cannot rebuild vector item");
                        None
                    }
                }
            }
            Representation::Animated(animation) => Some(GraphicsItem::Animated(
                AnimatedItem::new(Rc::clone(animation)),
            )),
            Representation::Static(bitmap) => {
                Some(GraphicsItem::Static(StaticItem::from_bitmap(bitmap)))
            }
        }
    }

    /// Releases the backing resource and any unclaimed vector item.
    fn clean_up(&mut self) {
        self.representation = Representation::None;
    }

    fn animation(&self) -> Option<SharedAnimation> {
        match &self.representation {
            Representation::Animated(animation) => Some(Rc::clone(animation)),
            _ => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> RepresentationKind {
        self.representation.kind()
    }

    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Meaningful only while an animation is loaded.
    ///
    /// Opening a still image or vector after an animation leaves the last
    /// value in place; it is not reset to `false`.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Sources are never edited in place.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        false
    }

    #[must_use]
    pub fn options(&self) -> SourceOptions {
        self.options
    }

    /// Whether a vector item is still waiting to be claimed.
    #[must_use]
    pub fn has_pending_item(&self) -> bool {
        matches!(
            self.representation,
            Representation::Vector {
                pending_item: Some(_),
                ..
            }
        )
    }

    /// Size of the current content, if anything is loaded.
    #[must_use]
    pub fn image_size(&self) -> Option<ImageSize> {
        match &self.representation {
            Representation::None => None,
            Representation::Vector { document, .. } => Some(document.bounds().to_image_size()),
            Representation::Animated(animation) => Some(animation.borrow().size()),
            Representation::Static(bitmap) => Some(bitmap.size()),
        }
    }
}
