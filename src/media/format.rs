// SPDX-License-Identifier: MPL-2.0
//! Format sniffing and representation-family classification.
//!
//! Detection looks at the first [`SNIFF_LEN`] bytes of the file (magic numbers,
//! SVG markup) and falls back to the file extension, using the `image` crate's
//! format registry restricted to decoders compiled into this build.
//!
//! Animation is decided from container structure rather than a byte search:
//! the `VP8X` feature flags for WebP, and the chunk sequence before the first
//! `IDAT` for PNG. PNG chunks are walked in the file itself, so large ancillary
//! chunks (an embedded ICC profile, say) cannot hide `acTL`.
//!
//! When more than one family could claim a file, [`PRECEDENCE`] decides:
//! vector documents win over animated sequences, which win over still images.

use image_rs::ImageFormat;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// Number of leading bytes inspected when sniffing a file.
pub const SNIFF_LEN: usize = 4096;

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
/// Bit 1 of the `VP8X` flags byte.
const WEBP_ANIMATION_FLAG: u8 = 0x02;
const WEBP_FLAGS_OFFSET: usize = 20;
/// Upper bound on chunks inspected before giving up on finding `acTL`.
const MAX_PNG_CHUNKS: usize = 256;
const UTF8_BOM: &str = "\u{feff}";

/// Raster formats the animation decoders understand.
pub const ANIMATION_FORMATS: &[ImageFormat] = &[ImageFormat::Gif, ImageFormat::WebP, ImageFormat::Png];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorFormat {
    Svg,
    /// Gzip-compressed SVG.
    Svgz,
}

/// What a file was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedFormat {
    Vector(VectorFormat),
    Raster(ImageFormat),
}

/// Which representation a detected file is loaded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatFamily {
    Vector,
    Animated,
    Static,
}

/// Order in which families claim a file.
pub const PRECEDENCE: [FormatFamily; 3] = [
    FormatFamily::Vector,
    FormatFamily::Animated,
    FormatFamily::Static,
];

/// The leading bytes and extension of a file, enough to decide its format.
#[derive(Debug, Clone)]
pub struct Sniffed {
    head: Vec<u8>,
    extension: Option<String>,
    /// An `acTL` chunk precedes the first `IDAT`.
    png_animation_control: bool,
}

impl Sniffed {
    /// Reads up to [`SNIFF_LEN`] bytes from `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be opened or read.
    pub fn read<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let mut head = Vec::with_capacity(SNIFF_LEN);
        file.by_ref()
            .take(SNIFF_LEN as u64)
            .read_to_end(&mut head)?;

        let png_animation_control =
            head.starts_with(PNG_SIGNATURE) && has_png_animation_control(&mut file);

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_lowercase);

        Ok(Self {
            head,
            extension,
            png_animation_control,
        })
    }

    /// Builds a sniff result from bytes already in memory.
    ///
    /// Only the first [`SNIFF_LEN`] bytes are kept, but PNG chunks are walked
    /// across all of `bytes`.
    #[must_use]
    pub fn from_parts(bytes: &[u8], extension: Option<&str>) -> Self {
        let len = bytes.len().min(SNIFF_LEN);
        let png_animation_control =
            bytes.starts_with(PNG_SIGNATURE) && has_png_animation_control(&mut Cursor::new(bytes));
        Self {
            head: bytes[..len].to_vec(),
            extension: extension.map(str::to_lowercase),
            png_animation_control,
        }
    }

    /// Recognizes the format from content first, then from the extension.
    ///
    /// Returns `None` when nothing in this build can decode the file.
    #[must_use]
    pub fn detect(&self) -> Option<DetectedFormat> {
        self.detect_from_content()
            .or_else(|| self.detect_from_extension())
    }

    fn detect_from_content(&self) -> Option<DetectedFormat> {
        if let Ok(format) = image_rs::guess_format(&self.head) {
            if format.reading_enabled() {
                return Some(DetectedFormat::Raster(format));
            }
        }

        if self.head.starts_with(GZIP_MAGIC) && self.extension.as_deref() == Some("svgz") {
            return Some(DetectedFormat::Vector(VectorFormat::Svgz));
        }

        if looks_like_svg(&self.head) {
            return Some(DetectedFormat::Vector(VectorFormat::Svg));
        }

        None
    }

    fn detect_from_extension(&self) -> Option<DetectedFormat> {
        let ext = self.extension.as_deref()?;
        match ext {
            "svg" => Some(DetectedFormat::Vector(VectorFormat::Svg)),
            "svgz" => Some(DetectedFormat::Vector(VectorFormat::Svgz)),
            _ => ImageFormat::from_extension(ext)
                .filter(ImageFormat::reading_enabled)
                .map(DetectedFormat::Raster),
        }
    }

    /// Picks the family for `format` by walking [`PRECEDENCE`].
    #[must_use]
    pub fn family(&self, format: DetectedFormat) -> FormatFamily {
        PRECEDENCE
            .into_iter()
            .find(|family| self.claims(*family, format))
            .unwrap_or(FormatFamily::Static)
    }

    fn claims(&self, family: FormatFamily, format: DetectedFormat) -> bool {
        match (family, format) {
            (FormatFamily::Vector, DetectedFormat::Vector(_)) => true,
            (FormatFamily::Animated, DetectedFormat::Raster(raster)) => {
                ANIMATION_FORMATS.contains(&raster) && self.has_animation_marker(raster)
            }
            (FormatFamily::Static, DetectedFormat::Raster(_)) => true,
            _ => false,
        }
    }

    /// GIF is always handed to the animation decoder; WebP and PNG only when
    /// their containers declare an animation.
    fn has_animation_marker(&self, format: ImageFormat) -> bool {
        match format {
            ImageFormat::Gif => true,
            ImageFormat::WebP => is_animated_webp(&self.head),
            ImageFormat::Png => self.png_animation_control,
            _ => false,
        }
    }
}

/// Extended WebP files carry a `VP8X` chunk first, whose flags byte has the
/// animation bit set when `ANIM`/`ANMF` chunks follow.
fn is_animated_webp(head: &[u8]) -> bool {
    head.get(12..16) == Some(b"VP8X".as_slice())
        && head
            .get(WEBP_FLAGS_OFFSET)
            .is_some_and(|flags| flags & WEBP_ANIMATION_FLAG != 0)
}

/// Walks PNG chunk headers from the start of `reader` until `acTL`, `IDAT` or
/// `IEND`. Truncated or unreadable input counts as not animated.
fn has_png_animation_control<R: Read + Seek>(reader: &mut R) -> bool {
    match find_png_animation_control(reader) {
        Ok(found) => found,
        Err(err) => {
            tracing::debug!(%err, "stopped walking png chunks");
            false
        }
    }
}

fn find_png_animation_control<R: Read + Seek>(reader: &mut R) -> io::Result<bool> {
    reader.seek(SeekFrom::Start(PNG_SIGNATURE.len() as u64))?;
    let mut header = [0u8; 8];
    for _ in 0..MAX_PNG_CHUNKS {
        reader.read_exact(&mut header)?;
        let length = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
        match &header[4..] {
            b"acTL" => return Ok(true),
            b"IDAT" | b"IEND" => return Ok(false),
            // Skip data and CRC.
            _ => {
                reader.seek(SeekFrom::Current(i64::from(length) + 4))?;
            }
        }
    }
    Ok(false)
}

fn looks_like_svg(head: &[u8]) -> bool {
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches(UTF8_BOM).trim_start();
    text.starts_with('<') && text.to_ascii_lowercase().contains("<svg")
}
