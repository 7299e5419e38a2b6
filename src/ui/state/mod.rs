// SPDX-License-Identifier: MPL-2.0
//! UI state kept apart from widgets.

pub mod zoom;

pub use zoom::{ZoomPercent, ZoomState, ZoomStep};
