// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Zoom**: Zoom percentage and step bounds
//! - **Playback**: Animation start state and tick interval
//! - **Frame timing**: Delay normalization for animated formats

use std::time::Duration;

// ==========================================================================
// Zoom Defaults
// ==========================================================================

/// Default zoom level when opening an image (100% = original size).
pub const DEFAULT_ZOOM_PERCENT: f32 = 100.0;

/// Minimum allowed zoom percentage.
pub const MIN_ZOOM_PERCENT: f32 = 10.0;

/// Maximum allowed zoom percentage.
pub const MAX_ZOOM_PERCENT: f32 = 800.0;

/// Default zoom step for zoom in/out operations.
pub const DEFAULT_ZOOM_STEP_PERCENT: f32 = 10.0;

/// Minimum allowed zoom step percentage.
pub const MIN_ZOOM_STEP_PERCENT: f32 = 1.0;

/// Maximum allowed zoom step percentage.
pub const MAX_ZOOM_STEP_PERCENT: f32 = 200.0;

// ==========================================================================
// Playback Defaults
// ==========================================================================

/// Animated images open paused until the user presses play.
pub const DEFAULT_START_PAUSED: bool = true;

/// Default interval between animation ticks, in milliseconds.
pub const DEFAULT_FRAME_TICK_MS: u64 = 16;

/// Minimum animation tick interval, in milliseconds.
pub const MIN_FRAME_TICK_MS: u64 = 5;

/// Maximum animation tick interval, in milliseconds.
pub const MAX_FRAME_TICK_MS: u64 = 200;

// ==========================================================================
// Frame Timing
// ==========================================================================

/// Frames shorter than this are treated as "unspecified" by browsers.
pub const MIN_FRAME_DELAY: Duration = Duration::from_millis(20);

/// Delay substituted for frames below [`MIN_FRAME_DELAY`].
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_ZOOM_PERCENT > 0.0);
    assert!(MIN_ZOOM_PERCENT < DEFAULT_ZOOM_PERCENT);
    assert!(MAX_ZOOM_PERCENT > DEFAULT_ZOOM_PERCENT);
    assert!(MIN_ZOOM_STEP_PERCENT > 0.0);
    assert!(MAX_ZOOM_STEP_PERCENT > MIN_ZOOM_STEP_PERCENT);
    assert!(DEFAULT_ZOOM_STEP_PERCENT >= MIN_ZOOM_STEP_PERCENT);
    assert!(DEFAULT_ZOOM_STEP_PERCENT <= MAX_ZOOM_STEP_PERCENT);

    assert!(MIN_FRAME_TICK_MS > 0);
    assert!(MAX_FRAME_TICK_MS >= MIN_FRAME_TICK_MS);
    assert!(DEFAULT_FRAME_TICK_MS >= MIN_FRAME_TICK_MS);
    assert!(DEFAULT_FRAME_TICK_MS <= MAX_FRAME_TICK_MS);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_defaults_are_valid() {
        assert_eq!(DEFAULT_ZOOM_PERCENT, 100.0);
        assert!(MIN_ZOOM_PERCENT < DEFAULT_ZOOM_PERCENT);
        assert!(MAX_ZOOM_PERCENT > DEFAULT_ZOOM_PERCENT);
    }

    #[test]
    fn zoom_step_defaults_are_valid() {
        assert_eq!(DEFAULT_ZOOM_STEP_PERCENT, 10.0);
        assert!(DEFAULT_ZOOM_STEP_PERCENT >= MIN_ZOOM_STEP_PERCENT);
        assert!(DEFAULT_ZOOM_STEP_PERCENT <= MAX_ZOOM_STEP_PERCENT);
    }

    #[test]
    fn frame_delay_substitute_exceeds_threshold() {
        assert!(DEFAULT_FRAME_DELAY > MIN_FRAME_DELAY);
    }
}
