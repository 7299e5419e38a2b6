// SPDX-License-Identifier: MPL-2.0
//! Live backing-resource accounting.
//!
//! Each decoded bitmap, animation and vector document owns a [`ResourceToken`].
//! The count is per thread: an `ImageSource` and everything it hands out live
//! on the UI thread, and tests each run on their own thread.

use std::cell::Cell;

thread_local! {
    static LIVE: Cell<usize> = const { Cell::new(0) };
}

/// Marker held by a backing resource for as long as it is alive.
#[derive(Debug)]
pub struct ResourceToken {
    _private: (),
}

impl ResourceToken {
    pub(crate) fn acquire() -> Self {
        LIVE.with(|live| live.set(live.get() + 1));
        Self { _private: () }
    }
}

impl Drop for ResourceToken {
    fn drop(&mut self) {
        LIVE.with(|live| live.set(live.get().saturating_sub(1)));
    }
}

/// Number of backing resources currently alive on this thread.
#[must_use]
pub fn live_resources() -> usize {
    LIVE.with(Cell::get)
}
