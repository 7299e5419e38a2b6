// SPDX-License-Identifier: MPL-2.0
//! Image viewer: installs the item produced by an [`ImageSource`] and keeps the
//! display state (zoom, background, outline, play/pause indicator) around it.
//!
//! [`Viewer`] is the observer handed to every source operation. It reacts to
//! notifications in place, so by the time `open` or `reload` returns the new
//! item is already installed.

pub mod controls;
pub mod pane;

use crate::config::Config;
use crate::media::ImageSize;
use crate::source::{GraphicsItem, ImageSource, RepresentationKind, SourceEvent, SourceObserver};
use crate::ui::state::{ZoomPercent, ZoomState, ZoomStep};
use iced::widget::image;
use iced::{Element, Size};

/// What the host has to do after a toolbar message, beyond viewer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Flip the source's pause state.
    TogglePlayback,
}

#[derive(Debug)]
pub struct Viewer {
    item: Option<GraphicsItem>,
    /// Last painted animation frame; refreshed only when the engine moved on.
    frame: Option<image::Handle>,
    image_size: Option<ImageSize>,
    paused: bool,
    zoom: ZoomState,
    show_background: bool,
    show_outline: bool,
    viewport: Option<Size>,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Viewer {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let zoom = ZoomState::new(
            config.fit_to_window.unwrap_or(true),
            ZoomStep::new(config.zoom_step.unwrap_or(crate::config::DEFAULT_ZOOM_STEP_PERCENT)),
        );
        Self {
            item: None,
            frame: None,
            image_size: None,
            paused: false,
            zoom,
            show_background: config.show_background.unwrap_or(false),
            show_outline: config.show_outline.unwrap_or(false),
            viewport: None,
        }
    }

    fn install(&mut self, item: Option<GraphicsItem>) {
        if let Some(item) = &item {
            self.image_size = Some(item.size());
        }
        self.item = item;
        self.frame = None;
        self.refresh_frame();
    }

    fn detach(&mut self) {
        self.item = None;
        self.frame = None;
        self.image_size = None;
    }

    /// Picks up a new animation frame if there is one. Returns `true` if the
    /// displayed frame changed.
    pub fn refresh_frame(&mut self) -> bool {
        let Some(GraphicsItem::Animated(item)) = &mut self.item else {
            return false;
        };
        if !item.take_update() {
            return false;
        }
        self.frame = Some(item.frame());
        true
    }

    /// Applies a toolbar message.
    pub fn update(&mut self, message: controls::Message) -> Effect {
        match message {
            controls::Message::ZoomIn => self.zoom.zoom_in(self.effective_zoom()),
            controls::Message::ZoomOut => self.zoom.zoom_out(self.effective_zoom()),
            controls::Message::OriginalSize => self.zoom.reset_zoom(),
            controls::Message::FitToScreen => self.zoom.enable_fit_to_window(),
            controls::Message::ToggleBackground => self.show_background = !self.show_background,
            controls::Message::ToggleOutline => self.show_outline = !self.show_outline,
            controls::Message::TogglePlayPause => return Effect::TogglePlayback,
        }
        Effect::None
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = Some(viewport);
    }

    /// Zoom currently applied to the image.
    #[must_use]
    pub fn effective_zoom(&self) -> ZoomPercent {
        match self.image_size {
            Some(size) => self.zoom.effective(size, self.viewport),
            None => self.zoom.manual,
        }
    }

    #[must_use]
    pub fn item(&self) -> Option<&GraphicsItem> {
        self.item.as_ref()
    }

    #[must_use]
    pub fn image_size(&self) -> Option<ImageSize> {
        self.image_size
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.item
            .as_ref()
            .is_some_and(|item| item.kind() == RepresentationKind::Animated)
    }

    #[must_use]
    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    #[must_use]
    pub fn show_background(&self) -> bool {
        self.show_background
    }

    #[must_use]
    pub fn show_outline(&self) -> bool {
        self.show_outline
    }

    /// Toolbar on top, image pane below.
    pub fn view(&self) -> Element<'_, controls::Message> {
        iced::widget::Column::new()
            .push(controls::view(controls::ViewContext {
                zoom: self.effective_zoom(),
                fit_to_window: self.zoom.fit_to_window,
                show_background: self.show_background,
                show_outline: self.show_outline,
                playback: self.is_animated().then_some(self.paused),
            }))
            .push(pane::view(pane::ViewModel {
                item: self.item.as_ref(),
                frame: self.frame.as_ref(),
                zoom: &self.zoom,
                show_background: self.show_background,
                show_outline: self.show_outline,
            }))
            .into()
    }
}

impl SourceObserver for Viewer {
    fn notify(&mut self, source: &mut ImageSource, event: SourceEvent) {
        match event {
            SourceEvent::OpenFinished { success: true }
            | SourceEvent::ReloadFinished { success: true } => {
                self.install(source.create_graphics_item());
            }
            SourceEvent::OpenFinished { success: false }
            | SourceEvent::ReloadFinished { success: false }
            | SourceEvent::AboutToReload => self.detach(),
            SourceEvent::ImageSizeChanged(size) => self.image_size = Some(size),
            SourceEvent::PausedChanged(paused) => self.paused = paused,
            SourceEvent::Changed => {
                tracing::debug!(path = ?source.file_path(), "file attributes changed");
            }
        }
    }
}
