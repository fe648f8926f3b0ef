//! Scale and pan state of the page surface.
//!
//! `scale` is clamped into `[min_scale, max_scale]` on every write. The pan
//! offset is a screen-space translation that accumulates across gestures and
//! is only cleared by [`ViewportController::reset_pan`]; zoom never touches it.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::config::ViewerConfig;
use crate::input::Tool;
use crate::transform::{self, Point};

/// Owns scale and pan and decides when panning is allowed.
#[derive(Debug, Clone)]
pub struct ViewportController {
    scale: f64,
    min_scale: f64,
    max_scale: f64,
    zoom_step: f64,
    pan: Point,
    /// Un-panned top-left of the page surface in screen space.
    layout_origin: Point,
    enable_pan: bool,
    enable_zoom: bool,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}

impl ViewportController {
    #[must_use]
    pub fn from_config(config: &ViewerConfig) -> Self {
        let mut vp = Self {
            scale: config.scale,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            zoom_step: config.zoom_step,
            pan: Point::ORIGIN,
            layout_origin: Point::ORIGIN,
            enable_pan: config.enable_pan,
            enable_zoom: config.enable_zoom,
        };
        vp.scale = vp.clamp(config.scale);
        vp
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn pan(&self) -> Point {
        self.pan
    }

    /// Rendered top-left of the page surface: layout origin plus pan.
    #[must_use]
    pub fn container_origin(&self) -> Point {
        self.layout_origin + self.pan
    }

    pub fn set_layout_origin(&mut self, origin: Point) {
        self.layout_origin = origin;
    }

    pub fn set_enable_pan(&mut self, enabled: bool) {
        self.enable_pan = enabled;
    }

    pub fn set_enable_zoom(&mut self, enabled: bool) {
        self.enable_zoom = enabled;
    }

    #[must_use]
    pub fn zoom_enabled(&self) -> bool {
        self.enable_zoom
    }

    /// Whether a pointer-down may start panning under the current tool.
    ///
    /// Annotation tools take precedence over panning while annotations are enabled.
    #[must_use]
    pub fn can_pan(&self, tool: Tool, annotations_enabled: bool) -> bool {
        self.enable_pan && (!tool.is_annotation_tool() || !annotations_enabled)
    }

    /// Clamp `requested` into the allowed scale range.
    #[must_use]
    pub fn clamp(&self, requested: f64) -> f64 {
        requested.max(self.min_scale).min(self.max_scale)
    }

    /// Set the scale from the host, clamped. Returns the new scale if it changed.
    #[allow(clippy::float_cmp)]
    pub fn set_scale(&mut self, requested: f64) -> Option<f64> {
        if !requested.is_finite() {
            return None;
        }
        let next = self.clamp(requested);
        if next == self.scale {
            return None;
        }
        self.scale = next;
        Some(next)
    }

    /// Apply one wheel notch: scrolling down zooms out, up zooms in.
    ///
    /// Returns the new scale if it changed. A purely horizontal or non-finite
    /// scroll does nothing.
    pub fn zoom_by_wheel(&mut self, delta_y: f64) -> Option<f64> {
        if !self.enable_zoom || !delta_y.is_finite() || delta_y == 0.0 {
            return None;
        }
        let step = if delta_y > 0.0 { -self.zoom_step } else { self.zoom_step };
        self.set_scale(self.scale + step)
    }

    /// Step the scale up by one zoom step.
    pub fn zoom_in(&mut self) -> Option<f64> {
        self.set_scale(self.scale + self.zoom_step)
    }

    /// Step the scale down by one zoom step.
    pub fn zoom_out(&mut self) -> Option<f64> {
        self.set_scale(self.scale - self.zoom_step)
    }

    /// Add a screen-space offset to the pan.
    pub fn pan_by(&mut self, delta: Point) {
        self.pan = self.pan + delta;
    }

    /// Clear the pan offset. Returns `true` if it was non-zero.
    pub fn reset_pan(&mut self) -> bool {
        let moved = self.pan != Point::ORIGIN;
        self.pan = Point::ORIGIN;
        moved
    }

    /// Map a screen-space pointer position to document space.
    #[must_use]
    pub fn to_document(&self, screen: Point) -> Point {
        transform::to_document(screen, self.container_origin(), self.scale)
    }

    /// Map a document-space point to screen space for rendering.
    #[must_use]
    pub fn to_screen(&self, document: Point) -> Point {
        transform::to_screen(document, self.layout_origin, self.scale, self.pan)
    }
}
