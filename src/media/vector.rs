// SPDX-License-Identifier: MPL-2.0
//! SVG documents parsed with `usvg`.
//!
//! Parsing is the validation step: a document that parses and has non-empty
//! bounds can always be handed to the renderer.

use super::resources::ResourceToken;
use super::ImageSize;
use crate::error::CannotHandle;
use resvg::usvg;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Intrinsic size of a vector document in user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorBounds {
    pub width: f32,
    pub height: f32,
}

impl VectorBounds {
    /// Both dimensions are (numerically) zero.
    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.width.abs() <= f32::EPSILON && self.height.abs() <= f32::EPSILON
    }

    /// Rounded pixel size, as reported to the view.
    #[must_use]
    pub fn to_image_size(self) -> ImageSize {
        ImageSize::from_f32(self.width, self.height)
    }
}

/// A parsed SVG (or SVGZ) document.
pub struct VectorDocument {
    tree: usvg::Tree,
    /// Raw file content, compressed or not; the renderer parses it again.
    data: Arc<Vec<u8>>,
    bounds: VectorBounds,
    _resource: ResourceToken,
}

impl std::fmt::Debug for VectorDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorDocument")
            .field("bounds", &self.bounds)
            .field("bytes", &self.data.len())
            .finish_non_exhaustive()
    }
}

impl VectorDocument {
    /// Reads and parses the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CannotHandle::InvalidVector`] if the file cannot be read, does
    /// not parse, or has zero width and height.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CannotHandle> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|err| {
            tracing::debug!(path = %path.display(), %err, "cannot read vector file");
            CannotHandle::InvalidVector
        })?;
        Self::from_data(data)
    }

    /// Parses an in-memory document. Gzip-compressed input is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`CannotHandle::InvalidVector`] if the data does not parse or
    /// the document bounds are degenerate. `usvg` itself refuses a document
    /// with a zero `width` or `height`, so the bounds check only catches sizes
    /// the parser accepts but that are numerically nothing.
    pub fn from_data(data: Vec<u8>) -> Result<Self, CannotHandle> {
        let tree = usvg::Tree::from_data(&data, &usvg::Options::default()).map_err(|err| {
            tracing::debug!(%err, "svg parse failed");
            CannotHandle::InvalidVector
        })?;

        let size = tree.size();
        let bounds = VectorBounds {
            width: size.width(),
            height: size.height(),
        };
        if bounds.is_degenerate() {
            return Err(CannotHandle::InvalidVector);
        }

        Ok(Self {
            tree,
            data: Arc::new(data),
            bounds,
            _resource: ResourceToken::acquire(),
        })
    }

    #[must_use]
    pub fn bounds(&self) -> VectorBounds {
        self.bounds
    }

    #[must_use]
    pub fn tree(&self) -> &usvg::Tree {
        &self.tree
    }

    /// The original file bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_svg_reports_bounds() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let svg_path = temp_dir.path().join("sample.svg");
        let svg_content = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="6" height="3">
                <rect width="6" height="3" fill="blue" />
            </svg>
        "#;
        fs::write(&svg_path, svg_content.trim()).expect("failed to write svg");

        let document = VectorDocument::load(&svg_path).expect("svg should load successfully");
        assert_eq!(document.bounds().to_image_size(), ImageSize::new(6, 3));
        assert!(!document.data().is_empty());
        assert!(document.tree().size().width() > 0.0);
    }

    #[test]
    fn broken_svg_is_invalid_vector() {
        let result = VectorDocument::from_data(b"<svg>oops".to_vec());
        assert_eq!(result.unwrap_err(), CannotHandle::InvalidVector);
    }

    #[test]
    fn zero_sized_svg_is_invalid_vector() {
        let svg = r"<svg xmlns='http://www.w3.org/2000/svg' width='0' height='0'></svg>";
        let result = VectorDocument::from_data(svg.as_bytes().to_vec());
        assert_eq!(result.unwrap_err(), CannotHandle::InvalidVector);
    }

    #[test]
    fn single_zero_axis_is_refused_by_parser() {
        let svg = r"<svg xmlns='http://www.w3.org/2000/svg' width='0' height='4'></svg>";
        assert!(usvg::Tree::from_data(svg.as_bytes(), &usvg::Options::default()).is_err());
        assert!(!VectorBounds { width: 0.0, height: 4.0 }.is_degenerate());

        let result = VectorDocument::from_data(svg.as_bytes().to_vec());
        assert_eq!(result.unwrap_err(), CannotHandle::InvalidVector);
    }

    #[test]
    fn degenerate_bounds_need_both_axes_empty() {
        assert!(VectorBounds { width: 0.0, height: 0.0 }.is_degenerate());
        assert!(!VectorBounds { width: 0.0, height: 4.0 }.is_degenerate());
        assert!(!VectorBounds { width: 0.5, height: 0.5 }.is_degenerate());
    }
}
