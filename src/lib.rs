// SPDX-License-Identifier: MPL-2.0
//! `lens_view` is an embeddable image-viewing core with a small Iced front end.
//!
//! [`source::ImageSource`] loads a single raster, vector or animated file and
//! owns its decoded representation. [`ui::viewer::Viewer`] observes the source
//! and renders what it produces, and [`app`] ties both to a window, an
//! animation tick and a file watcher.

#![doc(html_root_url = "https://docs.rs/lens_view/0.1.0")]

pub mod app;
pub mod config;
pub mod error;
pub mod media;
pub mod source;
pub mod ui;
pub mod watcher;
