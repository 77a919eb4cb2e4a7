//! Pan/zoom viewport transform
//!
//! Owns the affine transform (translation + uniform scale) between
//! workspace and screen coordinates. Discrete zoom gestures compose a
//! scale about an anchor point onto the existing transform; clicks are
//! mapped back into workspace coordinates by inverting the transform and
//! the active unit scale.

use glam::{DAffine2, DVec2};
use pathview_core::Units;

/// Base scale applied when the view is centered
pub const BASE_CENTER_SCALE: f64 = 0.45;
/// Zoom factor for one keyboard step
pub const KEYBOARD_ZOOM_STEP: f64 = 1.03;
/// Zoom factor for one scroll-wheel step
pub const SCROLL_ZOOM_STEP: f64 = 1.1;

/// Pan/zoom controller over the rendered scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportController {
    transform: DAffine2,
}

impl ViewportController {
    /// Create a controller with the identity transform
    pub fn new() -> Self {
        Self {
            transform: DAffine2::IDENTITY,
        }
    }

    /// The current scene transform
    pub fn transform(&self) -> DAffine2 {
        self.transform
    }

    /// Reset the transform so the workspace origin lands at the viewport
    /// center, then apply the base scale anchored at the screen origin.
    pub fn center_view(&mut self, viewport_width: f64, viewport_height: f64) {
        let translate =
            DAffine2::from_translation(DVec2::new(viewport_width / 2.0, viewport_height / 2.0));
        self.transform = scale_about(DVec2::ZERO, BASE_CENTER_SCALE) * translate;
    }

    /// Compose a zoom of `factor` about `anchor` onto the current
    /// transform. Factors below 1.0 zoom out.
    pub fn zoom_by(&mut self, factor: f64, anchor: DVec2) {
        self.transform = scale_about(anchor, factor) * self.transform;
    }

    /// One keyboard zoom-in step, anchored at the screen origin
    pub fn zoom_in_key(&mut self) {
        self.zoom_by(KEYBOARD_ZOOM_STEP, DVec2::ZERO);
    }

    /// One keyboard zoom-out step, anchored at the screen origin
    pub fn zoom_out_key(&mut self) {
        self.zoom_by(1.0 / KEYBOARD_ZOOM_STEP, DVec2::ZERO);
    }

    /// One scroll zoom-in step, anchored at the cursor
    pub fn zoom_in_at(&mut self, cursor: DVec2) {
        self.zoom_by(SCROLL_ZOOM_STEP, cursor);
    }

    /// One scroll zoom-out step, anchored at the cursor
    pub fn zoom_out_at(&mut self, cursor: DVec2) {
        self.zoom_by(1.0 / SCROLL_ZOOM_STEP, cursor);
    }

    /// Pan the view by a screen-space delta
    pub fn pan_by(&mut self, delta: DVec2) {
        self.transform = DAffine2::from_translation(delta) * self.transform;
    }

    /// Map a workspace point (in `units`) to screen coordinates
    pub fn workspace_to_screen(&self, point: DVec2, units: Units) -> DVec2 {
        self.transform
            .transform_point2(point * units.scale_factor())
    }

    /// Map a screen point back to workspace coordinates (in `units`),
    /// inverting the transform and the active unit scale.
    pub fn screen_to_workspace(&self, point: DVec2, units: Units) -> DVec2 {
        self.transform.inverse().transform_point2(point) / units.scale_factor()
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniform scale that keeps `anchor` fixed
fn scale_about(anchor: DVec2, factor: f64) -> DAffine2 {
    DAffine2::from_translation(anchor)
        * DAffine2::from_scale(DVec2::splat(factor))
        * DAffine2::from_translation(-anchor)
}
