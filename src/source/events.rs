// SPDX-License-Identifier: MPL-2.0
//! Notifications emitted by [`ImageSource`] and the reload-policy vocabulary.

use super::ImageSource;
use crate::media::ImageSize;

/// A notification delivered synchronously while an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEvent {
    /// `open` completed, successfully or not. Emitted exactly once per call.
    OpenFinished { success: bool },
    /// A reload is about to tear down the current representation.
    AboutToReload,
    /// A reload completed.
    ReloadFinished { success: bool },
    /// The file changed in a way that needs no reload (permissions).
    Changed,
    /// The dimensions of the content became known or changed.
    ImageSizeChanged(ImageSize),
    /// The animation pause flag changed.
    PausedChanged(bool),
}

/// Receives [`SourceEvent`]s in emission order.
///
/// The observer gets the source back so it can react in place, typically by
/// calling [`ImageSource::create_graphics_item`] on `OpenFinished`.
pub trait SourceObserver {
    fn notify(&mut self, source: &mut ImageSource, event: SourceEvent);
}

/// Ignores everything.
impl SourceObserver for () {
    fn notify(&mut self, _source: &mut ImageSource, _event: SourceEvent) {}
}

/// Records every event, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<SourceEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[SourceEvent] {
        &self.events
    }

    /// How many recorded events satisfy `predicate`.
    pub fn count(&self, predicate: impl Fn(&SourceEvent) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl SourceObserver for EventLog {
    fn notify(&mut self, _source: &mut ImageSource, event: SourceEvent) {
        self.events.push(event);
    }
}

/// Who caused a change to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeTrigger {
    /// This process wrote the file.
    Internal,
    /// Something else touched the file.
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    ContentsChanged,
    PermissionsChanged,
    Removed,
}

/// Whether a detected change should be reloaded without asking the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadBehavior {
    Ask,
    Silent,
}

/// The caller's decision after consulting [`ReloadBehavior`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadFlag {
    Reload,
    Ignore,
}
