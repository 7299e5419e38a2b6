// SPDX-License-Identifier: MPL-2.0
//! User interface components and state management.
//!
//! - [`viewer`] - Installs source items and renders them with the toolbar
//! - [`state`] - Zoom state kept apart from widgets
//! - [`components`] - Reusable widgets (checkerboard background)

pub mod components;
pub mod state;
pub mod viewer;
