// SPDX-License-Identifier: MPL-2.0
//! Animated image playback (GIF, animated WebP, APNG).
//!
//! Every frame is decoded up front and kept in memory, so playback never
//! touches the file again. The engine has no timer of its own: the host calls
//! [`Animation::advance`] with the time elapsed since the previous call and
//! reacts to the returned [`AnimationEvent`]s.

use super::resources::ResourceToken;
use super::ImageSize;
use crate::config::{DEFAULT_FRAME_DELAY, MIN_FRAME_DELAY};
use crate::error::CannotHandle;
use iced::widget::image;
use image_rs::codecs::gif::GifDecoder;
use image_rs::codecs::png::PngDecoder;
use image_rs::codecs::webp::WebPDecoder;
use image_rs::{AnimationDecoder, Frame, ImageFormat, ImageResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

/// One decoded frame, composited to the full canvas.
#[derive(Debug, Clone)]
pub struct AnimationFrame {
    handle: image::Handle,
    size: ImageSize,
    delay: Duration,
}

impl AnimationFrame {
    fn from_image_frame(frame: Frame) -> Option<Self> {
        let delay = normalize_delay(Duration::from(frame.delay()));
        let buffer = frame.into_buffer();
        let (width, height) = buffer.dimensions();
        if width == 0 || height == 0 {
            return None;
        }

        Some(Self {
            handle: image::Handle::from_rgba(width, height, buffer.into_raw()),
            size: ImageSize::new(width, height),
            delay,
        })
    }

    #[must_use]
    pub fn handle(&self) -> &image::Handle {
        &self.handle
    }

    #[must_use]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Near-zero delays mean "as fast as possible" in practice; browsers slow them
/// down and so do we.
fn normalize_delay(delay: Duration) -> Duration {
    if delay < MIN_FRAME_DELAY {
        DEFAULT_FRAME_DELAY
    } else {
        delay
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    NotRunning,
    Running,
    Paused,
}

/// Something the engine wants its owner to know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEvent {
    /// The displayed frame has a size that was not reported before.
    Resized(ImageSize),
    /// A different frame is now current.
    FrameUpdated(usize),
    /// The last frame has been shown for its full delay; playback stopped.
    Finished,
}

/// A fully decoded frame sequence plus its playback position.
#[derive(Debug)]
pub struct Animation {
    /// Never empty.
    frames: Vec<AnimationFrame>,
    current: usize,
    elapsed_in_frame: Duration,
    state: PlaybackState,
    reported_size: Option<ImageSize>,
    /// Bumped whenever the current frame changes.
    generation: u64,
    _resource: ResourceToken,
}

impl Animation {
    /// Decodes every frame of the animated file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CannotHandle::InvalidImage`] if the file cannot be decoded,
    /// `format` has no animation decoder, or no usable frame comes out.
    pub fn load<P: AsRef<Path>>(path: P, format: ImageFormat) -> Result<Self, CannotHandle> {
        let path = path.as_ref();
        let frames = decode_frames(path, format).map_err(|err| {
            tracing::debug!(path = %path.display(), ?format, %err, "animation decode failed");
            CannotHandle::InvalidImage
        })?;
        Self::from_frames(frames)
    }

    /// Builds an animation from frames that were already decoded.
    ///
    /// # Errors
    ///
    /// Returns [`CannotHandle::InvalidImage`] if no frame has a non-empty size.
    pub fn from_frames(frames: Vec<Frame>) -> Result<Self, CannotHandle> {
        let frames: Vec<AnimationFrame> = frames
            .into_iter()
            .filter_map(AnimationFrame::from_image_frame)
            .collect();
        if frames.is_empty() {
            return Err(CannotHandle::InvalidImage);
        }

        Ok(Self {
            frames,
            current: 0,
            elapsed_in_frame: Duration::ZERO,
            state: PlaybackState::NotRunning,
            reported_size: None,
            generation: 0,
            _resource: ResourceToken::acquire(),
        })
    }

    /// Rewinds to the first frame and starts playing.
    pub fn start(&mut self) -> Vec<AnimationEvent> {
        self.state = PlaybackState::Running;
        self.current = 0;
        self.elapsed_in_frame = Duration::ZERO;
        self.generation += 1;

        let mut events = Vec::with_capacity(2);
        if let Some(resized) = self.check_resize() {
            events.push(resized);
        }
        events.push(AnimationEvent::FrameUpdated(0));
        events
    }

    /// Switches between running and paused. Has no effect while not running.
    pub fn set_paused(&mut self, paused: bool) {
        self.state = match (self.state, paused) {
            (PlaybackState::Running, true) => PlaybackState::Paused,
            (PlaybackState::Paused, false) => PlaybackState::Running,
            (state, _) => state,
        };
    }

    /// Moves playback forward by `elapsed`.
    ///
    /// Several frames may be skipped at once if `elapsed` is long, but playback
    /// never wraps past the last frame: it stops and reports
    /// [`AnimationEvent::Finished`] instead.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<AnimationEvent> {
        if self.state != PlaybackState::Running {
            return Vec::new();
        }

        self.elapsed_in_frame += elapsed;
        let mut moved = false;
        let mut finished = false;

        loop {
            let delay = self.frames[self.current].delay;
            if self.elapsed_in_frame < delay {
                break;
            }
            if self.current + 1 >= self.frames.len() {
                self.state = PlaybackState::NotRunning;
                self.elapsed_in_frame = Duration::ZERO;
                finished = true;
                break;
            }
            self.elapsed_in_frame -= delay;
            self.current += 1;
            moved = true;
        }

        let mut events = Vec::new();
        if moved {
            self.generation += 1;
            if let Some(resized) = self.check_resize() {
                events.push(resized);
            }
            events.push(AnimationEvent::FrameUpdated(self.current));
        }
        if finished {
            events.push(AnimationEvent::Finished);
        }
        events
    }

    fn check_resize(&mut self) -> Option<AnimationEvent> {
        let size = self.frames[self.current].size;
        if self.reported_size == Some(size) {
            return None;
        }
        self.reported_size = Some(size);
        Some(AnimationEvent::Resized(size))
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }

    #[must_use]
    pub fn current_frame(&self) -> &AnimationFrame {
        &self.frames[self.current]
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Size of the frame currently shown.
    #[must_use]
    pub fn size(&self) -> ImageSize {
        self.current_frame().size
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

fn decode_frames(path: &Path, format: ImageFormat) -> ImageResult<Vec<Frame>> {
    let reader = BufReader::new(File::open(path)?);
    match format {
        ImageFormat::Gif => GifDecoder::new(reader)?.into_frames().collect_frames(),
        ImageFormat::WebP => WebPDecoder::new(reader)?.into_frames().collect_frames(),
        ImageFormat::Png => PngDecoder::new(reader)?
            .apng()?
            .into_frames()
            .collect_frames(),
        _ => Ok(Vec::new()),
    }
}
