// SPDX-License-Identifier: MPL-2.0
//! This module handles the viewer's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use lens_view::config::{self, Config};
//! use std::path::PathBuf;
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Start animations playing instead of paused
//! config.start_paused = Some(false);
//!
//! // To load/save from a specific path (e.g., for testing)
//! let temp_file = PathBuf::from("./temp_config_dir/test_settings.toml");
//! config::save_to_path(&config, &temp_file).expect("Failed to save to path");
//! let loaded = config::load_from_path(&temp_file).expect("Failed to load from path");
//! assert_eq!(loaded.start_paused, Some(false));
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";
pub const APP_NAME: &str = "LensView";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Whether animated images open paused.
    #[serde(default)]
    pub start_paused: Option<bool>,
    #[serde(default)]
    pub fit_to_window: Option<bool>,
    #[serde(default)]
    pub zoom_step: Option<f32>,
    /// Draw a checkerboard behind transparent content.
    #[serde(default)]
    pub show_background: Option<bool>,
    /// Draw a thin outline around the image bounds.
    #[serde(default)]
    pub show_outline: Option<bool>,
    /// Reload (or offer to reload) when the file changes on disk.
    #[serde(default)]
    pub watch_file: Option<bool>,
    #[serde(default)]
    pub frame_tick_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_paused: Some(DEFAULT_START_PAUSED),
            fit_to_window: Some(true),
            zoom_step: Some(DEFAULT_ZOOM_STEP_PERCENT),
            show_background: Some(false),
            show_outline: Some(false),
            watch_file: Some(true),
            frame_tick_ms: Some(DEFAULT_FRAME_TICK_MS),
        }
    }
}

impl Config {
    /// Animation tick interval, clamped to the supported range.
    #[must_use]
    pub fn frame_tick(&self) -> Duration {
        let ms = self
            .frame_tick_ms
            .unwrap_or(DEFAULT_FRAME_TICK_MS)
            .clamp(MIN_FRAME_TICK_MS, MAX_FRAME_TICK_MS);
        Duration::from_millis(ms)
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the platform config directory, or defaults
/// when no file exists yet.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

/// Saves the configuration to the platform config directory.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Loads the configuration from `path`. Malformed TOML yields the defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "invalid settings file, using defaults");
            Ok(Config::default())
        }
    }
}

/// Writes the configuration to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
