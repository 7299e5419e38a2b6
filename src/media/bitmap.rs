// SPDX-License-Identifier: MPL-2.0
//! Still raster images decoded into RGBA memory.

use super::resources::ResourceToken;
use super::ImageSize;
use crate::error::CannotHandle;
use image_rs::{GenericImageView, ImageReader};
use std::path::Path;
use std::sync::Arc;

/// A decoded still image.
#[derive(Debug)]
pub struct Bitmap {
    size: ImageSize,
    /// RGBA bytes, 4 per pixel, row-major.
    rgba_bytes: Arc<Vec<u8>>,
    _resource: ResourceToken,
}

impl Bitmap {
    /// Creates a bitmap from RGBA pixels.
    ///
    /// Returns `None` when the buffer length does not match the dimensions or
    /// the image is empty.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return None;
        }

        Some(Self {
            size: ImageSize::new(width, height),
            rgba_bytes: Arc::new(pixels),
            _resource: ResourceToken::acquire(),
        })
    }

    /// Decodes the file at `path`, guessing the format from its content.
    ///
    /// # Errors
    ///
    /// Returns [`CannotHandle::InvalidImage`] if the file cannot be decoded or
    /// decodes to an empty image.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CannotHandle> {
        let path = path.as_ref();
        let img = ImageReader::open(path)
            .and_then(ImageReader::with_guessed_format)
            .map_err(|err| {
                tracing::debug!(path = %path.display(), %err, "cannot open image for decoding");
                CannotHandle::InvalidImage
            })?
            .decode()
            .map_err(|err| {
                tracing::debug!(path = %path.display(), %err, "image decode failed");
                CannotHandle::InvalidImage
            })?;

        let (width, height) = img.dimensions();
        let pixels = img.to_rgba8().into_vec();

        Self::from_rgba(width, height, pixels).ok_or(CannotHandle::InvalidImage)
    }

    #[must_use]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Returns a reference to the RGBA bytes.
    #[must_use]
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }

    /// Copies the pixels into a new buffer owned by the caller.
    #[must_use]
    pub fn to_rgba_vec(&self) -> Vec<u8> {
        self.rgba_bytes.to_vec()
    }
}
