// SPDX-License-Identifier: MPL-2.0
//! Reusable UI components.
//!
//! - [`checkerboard`] - Transparency background drawn under images

pub mod checkerboard;
