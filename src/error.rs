// SPDX-License-Identifier: MPL-2.0
//! Error types shared across the crate.
//!
//! [`OpenError`] is what loading a file into an
//! [`ImageSource`](crate::source::ImageSource) can fail with. [`Error`] covers the
//! surrounding application concerns (configuration, file watching).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),
    #[error("Config Error: {0}")]
    Config(String),
    #[error("Watch Error: {0}")]
    Watch(String),
}

/// Why a readable file could not be turned into a representation.
///
/// The `Display` output is the human-readable message handed to the embedding
/// application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CannotHandle {
    /// No decoder recognizes the content or the extension.
    #[error("Image format not supported")]
    UnsupportedFormat,
    /// The file looks like SVG but does not parse, or its bounds are empty.
    #[error("Failed to read vector image")]
    InvalidVector,
    /// The raster or animated decoder rejected the content.
    #[error("Failed to read image")]
    InvalidImage,
}

/// Failure of [`ImageSource::open`](crate::source::ImageSource::open) and
/// [`ImageSource::reload`](crate::source::ImageSource::reload).
#[derive(Debug, Error)]
pub enum OpenError {
    /// The path could not be opened for reading (missing, permissions, ...).
    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file was readable but its content cannot be displayed.
    #[error(transparent)]
    CannotHandle(#[from] CannotHandle),
}

impl OpenError {
    /// Returns `true` for [`OpenError::Read`].
    #[must_use]
    pub fn is_read_error(&self) -> bool {
        matches!(self, OpenError::Read { .. })
    }

    /// Returns the format-level reason, if this is not a read error.
    #[must_use]
    pub fn cannot_handle(&self) -> Option<CannotHandle> {
        match self {
            OpenError::CannotHandle(reason) => Some(*reason),
            OpenError::Read { .. } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        Error::Watch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn cannot_handle_messages_are_human_readable() {
        assert_eq!(
            CannotHandle::UnsupportedFormat.to_string(),
            "Image format not supported"
        );
        assert_eq!(
            CannotHandle::InvalidVector.to_string(),
            "Failed to read vector image"
        );
        assert_eq!(CannotHandle::InvalidImage.to_string(), "Failed to read image");
    }

    #[test]
    fn open_error_displays_reason_transparently() {
        let err = OpenError::from(CannotHandle::InvalidImage);
        assert_eq!(err.to_string(), "Failed to read image");
        assert_eq!(err.cannot_handle(), Some(CannotHandle::InvalidImage));
        assert!(!err.is_read_error());
    }

    #[test]
    fn read_error_mentions_path() {
        let err = OpenError::Read {
            path: PathBuf::from("/nope/photo.png"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.is_read_error());
        assert!(err.cannot_handle().is_none());
        assert!(err.to_string().contains("/nope/photo.png"));
    }
}
