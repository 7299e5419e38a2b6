// SPDX-License-Identifier: MPL-2.0
//! Decoding of the three kinds of backing resource an image source can own:
//! still bitmaps, animated frame sequences and vector documents.
//!
//! This module knows nothing about ownership rules or notifications; see
//! [`crate::source`] for that.

pub mod animation;
pub mod bitmap;
pub mod format;
pub mod resources;
pub mod vector;

pub use animation::{Animation, AnimationEvent, AnimationFrame, PlaybackState};
pub use bitmap::Bitmap;
pub use format::{DetectedFormat, FormatFamily, Sniffed, VectorFormat, PRECEDENCE};
pub use resources::{live_resources, ResourceToken};
pub use vector::{VectorBounds, VectorDocument};

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Rounds fractional dimensions to the nearest pixel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_f32(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0).round() as u32,
            height: height.max(0.0).round() as u32,
        }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<ImageSize> for iced::Size {
    #[allow(clippy::cast_precision_loss)]
    fn from(size: ImageSize) -> Self {
        iced::Size::new(size.width as f32, size.height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_f32_rounds_to_nearest_pixel() {
        assert_eq!(ImageSize::from_f32(6.4, 2.6), ImageSize::new(6, 3));
        assert_eq!(ImageSize::from_f32(-3.0, 1.0), ImageSize::new(0, 1));
    }

    #[test]
    fn empty_when_any_axis_is_zero() {
        assert!(ImageSize::new(0, 10).is_empty());
        assert!(ImageSize::default().is_empty());
        assert!(!ImageSize::new(1, 1).is_empty());
    }

    #[test]
    fn converts_to_iced_size() {
        let size: iced::Size = ImageSize::new(1920, 1080).into();
        assert_eq!(size, iced::Size::new(1920.0, 1080.0));
    }
}
