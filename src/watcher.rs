// SPDX-License-Identifier: MPL-2.0
//! Watches the displayed file for changes made on disk.
//!
//! The parent directory is watched rather than the file itself so that
//! editors replacing the file atomically (write to a temp file, rename over)
//! are still seen. Events are buffered in a channel and drained by
//! [`FileWatcher::poll`] from the UI tick.

use crate::error::Result;
use crate::source::ChangeType;
use notify::event::{MetadataKind, ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

pub struct FileWatcher {
    // Dropping the watcher stops delivery.
    _watcher: RecommendedWatcher,
    events: Receiver<notify::Result<Event>>,
    file_name: OsString,
    path: PathBuf,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl FileWatcher {
    /// Starts watching `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Watch`] if the platform watcher cannot be
    /// created or the parent directory cannot be watched, and
    /// [`crate::error::Error::Io`] if `path` has no file name.
    pub fn watch(path: &Path) -> Result<Self> {
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let file_name = path
            .file_name()
            .map(OsString::from)
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file"))?;
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let (tx, events) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(tx, Config::default())?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = %path.display(), "watching file");

        Ok(Self {
            _watcher: watcher,
            events,
            file_name,
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drains pending events and returns the most significant change to the
    /// watched file, if any.
    pub fn poll(&self) -> Option<ChangeType> {
        let mut strongest: Option<ChangeType> = None;
        while let Ok(result) = self.events.try_recv() {
            let event = match result {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!(%err, "file watcher error");
                    continue;
                }
            };
            if !self.concerns_file(&event) {
                continue;
            }
            if let Some(change) = classify(&event.kind) {
                strongest = Some(match strongest {
                    Some(current) if rank(current) >= rank(change) => current,
                    _ => change,
                });
            }
        }
        strongest
    }

    fn concerns_file(&self, event: &Event) -> bool {
        event
            .paths
            .iter()
            .any(|path| path.file_name() == Some(self.file_name.as_os_str()))
    }
}

/// Maps a raw filesystem event to the kind of change it means for a viewer.
#[must_use]
pub fn classify(kind: &EventKind) -> Option<ChangeType> {
    match kind {
        EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            Some(ChangeType::Removed)
        }
        EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)) => {
            Some(ChangeType::PermissionsChanged)
        }
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Create(_) | EventKind::Modify(_) => Some(ChangeType::ContentsChanged),
        _ => None,
    }
}

fn rank(change: ChangeType) -> u8 {
    match change {
        ChangeType::PermissionsChanged => 0,
        ChangeType::ContentsChanged => 1,
        ChangeType::Removed => 2,
    }
}
