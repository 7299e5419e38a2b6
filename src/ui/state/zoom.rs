// SPDX-License-Identifier: MPL-2.0
//! Zoom state management
//!
//! Tracks the manual zoom percentage, fit-to-window mode and the zoom step.
//! The effective scale shown on screen is either the manual percentage or,
//! when fitting, the largest scale at which the whole image fits the viewport.

pub use crate::config::{
    DEFAULT_ZOOM_PERCENT, DEFAULT_ZOOM_STEP_PERCENT, MAX_ZOOM_PERCENT, MAX_ZOOM_STEP_PERCENT,
    MIN_ZOOM_PERCENT, MIN_ZOOM_STEP_PERCENT,
};
use crate::media::ImageSize;
use iced::Size;

/// Zoom percentage, guaranteed to be within valid range (10%–800%).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomPercent(f32);

impl ZoomPercent {
    /// Creates a new zoom percentage, clamping the value to the valid range.
    #[must_use]
    pub fn new(percent: f32) -> Self {
        Self(percent.clamp(MIN_ZOOM_PERCENT, MAX_ZOOM_PERCENT))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns the zoom as a multiplier (e.g., 100% → 1.0).
    #[must_use]
    pub fn as_factor(self) -> f32 {
        self.0 / 100.0
    }

    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= MIN_ZOOM_PERCENT
    }

    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= MAX_ZOOM_PERCENT
    }

    #[must_use]
    pub fn zoom_in(self, step: ZoomStep) -> Self {
        Self::new(self.0 + step.value())
    }

    #[must_use]
    pub fn zoom_out(self, step: ZoomStep) -> Self {
        Self::new(self.0 - step.value())
    }
}

impl Default for ZoomPercent {
    fn default() -> Self {
        Self(DEFAULT_ZOOM_PERCENT)
    }
}

/// Zoom step percentage, guaranteed to be within valid range (1%–200%).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomStep(f32);

impl ZoomStep {
    /// Creates a new zoom step, clamping the value to the valid range.
    #[must_use]
    pub fn new(percent: f32) -> Self {
        Self(percent.clamp(MIN_ZOOM_STEP_PERCENT, MAX_ZOOM_STEP_PERCENT))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for ZoomStep {
    fn default() -> Self {
        Self(DEFAULT_ZOOM_STEP_PERCENT)
    }
}

/// Manages all zoom-related state for the viewer
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomState {
    /// Last zoom chosen by the user; used whenever fit-to-window is off.
    pub manual: ZoomPercent,

    /// Whether the image is scaled to fit the viewport.
    pub fit_to_window: bool,

    pub step: ZoomStep,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            manual: ZoomPercent::default(),
            fit_to_window: true,
            step: ZoomStep::default(),
        }
    }
}

impl ZoomState {
    #[must_use]
    pub fn new(fit_to_window: bool, step: ZoomStep) -> Self {
        Self {
            fit_to_window,
            step,
            ..Self::default()
        }
    }

    /// Zoom percentage actually applied for `image` shown in `viewport`.
    #[must_use]
    pub fn effective(&self, image: ImageSize, viewport: Option<Size>) -> ZoomPercent {
        if !self.fit_to_window {
            return self.manual;
        }
        viewport
            .and_then(|viewport| fit_zoom_percent(image, viewport))
            .unwrap_or(self.manual)
    }

    /// Steps up from the zoom currently on screen and leaves fit mode.
    pub fn zoom_in(&mut self, current: ZoomPercent) {
        self.apply_manual_zoom(current.zoom_in(self.step));
    }

    /// Steps down from the zoom currently on screen and leaves fit mode.
    pub fn zoom_out(&mut self, current: ZoomPercent) {
        self.apply_manual_zoom(current.zoom_out(self.step));
    }

    pub fn apply_manual_zoom(&mut self, zoom: ZoomPercent) {
        self.manual = zoom;
        self.fit_to_window = false;
    }

    /// Shows the image at 100 %.
    pub fn reset_zoom(&mut self) {
        self.apply_manual_zoom(ZoomPercent::default());
    }

    pub fn enable_fit_to_window(&mut self) {
        self.fit_to_window = true;
    }
}

/// Largest zoom at which `image` fits entirely inside `viewport`.
///
/// Returns `None` while the viewport has no area yet, and 100 % for images
/// without a size.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fit_zoom_percent(image: ImageSize, viewport: Size) -> Option<ZoomPercent> {
    if image.is_empty() {
        return Some(ZoomPercent::default());
    }
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return None;
    }

    let scale_x = viewport.width / image.width as f32;
    let scale_y = viewport.height / image.height as f32;
    let scale = scale_x.min(scale_y);

    if !scale.is_finite() || scale <= 0.0 {
        return Some(ZoomPercent::default());
    }
    Some(ZoomPercent::new(scale * 100.0))
}

/// Formats a number for display (removes unnecessary decimal places)
#[must_use]
pub fn format_number(value: f32) -> String {
    if value.fract().abs() < f32::EPSILON {
        #[allow(clippy::cast_possible_truncation)]
        let int_value = value as i32;
        format!("{int_value}")
    } else {
        format!("{value:.1}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_percent_is_clamped() {
        assert_eq!(ZoomPercent::new(9999.0).value(), MAX_ZOOM_PERCENT);
        assert_eq!(ZoomPercent::new(1.0).value(), MIN_ZOOM_PERCENT);
        assert!(ZoomPercent::new(1.0).is_min());
        assert!(ZoomPercent::new(800.0).is_max());
    }

    #[test]
    fn zoom_in_out_leave_fit_mode() {
        let mut state = ZoomState::new(true, ZoomStep::new(10.0));

        state.zoom_in(ZoomPercent::new(100.0));
        assert_eq!(state.manual.value(), 110.0);
        assert!(!state.fit_to_window);

        state.zoom_out(state.manual);
        assert_eq!(state.manual.value(), 100.0);
    }

    #[test]
    fn fit_uses_the_tighter_axis() {
        let zoom = fit_zoom_percent(ImageSize::new(400, 100), Size::new(200.0, 200.0))
            .expect("viewport has area");
        assert_eq!(zoom.value(), 50.0);
    }

    #[test]
    fn fit_needs_a_viewport() {
        assert!(fit_zoom_percent(ImageSize::new(10, 10), Size::new(0.0, 100.0)).is_none());
        assert_eq!(
            fit_zoom_percent(ImageSize::default(), Size::new(0.0, 0.0)),
            Some(ZoomPercent::default())
        );
    }

    #[test]
    fn effective_zoom_follows_mode() {
        let mut state = ZoomState::default();
        let image = ImageSize::new(1000, 1000);
        let viewport = Some(Size::new(500.0, 500.0));

        assert_eq!(state.effective(image, viewport).value(), 50.0);
        assert_eq!(state.effective(image, None), state.manual);

        state.reset_zoom();
        assert_eq!(state.effective(image, viewport).value(), 100.0);
    }

    #[test]
    fn format_number_drops_trailing_zeros() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(12.5), "12.5");
    }
}
