//! Viewer configuration supplied by the host.
//!
//! Every field has a default, so hosts can pass a partial JSON object such as
//! `{"enable_annotations": true}`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE, DEFAULT_SCALE, DEFAULT_ZOOM_STEP, MIN_DRAG_DISTANCE,
    MIN_HIGHLIGHT_DISTANCE, MIN_RESIZE_SIZE, TEXT_SELECTION_DELAY_MS,
};
use crate::error::ConfigError;

/// Gesture thresholds, in document units unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum diagonal of a drawn rectangle.
    pub min_drag_distance: f64,
    /// Minimum width and height of a highlight selection.
    pub min_highlight_distance: f64,
    /// Minimum rectangle width and height while resizing (divided by scale).
    pub min_resize_size: f64,
    /// Delay before a finished selection becomes a highlight, in milliseconds.
    pub text_selection_delay_ms: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_drag_distance: MIN_DRAG_DISTANCE,
            min_highlight_distance: MIN_HIGHLIGHT_DISTANCE,
            min_resize_size: MIN_RESIZE_SIZE,
            text_selection_delay_ms: TEXT_SELECTION_DELAY_MS,
        }
    }
}

/// Host-facing configuration of the annotation surface.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Allow dragging the page when no annotation tool is active.
    pub enable_pan: bool,
    /// Allow wheel zoom.
    pub enable_zoom: bool,
    /// Allow every annotation gesture and show annotations.
    pub enable_annotations: bool,
    /// Initial scale.
    pub scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale change per wheel notch or zoom button press.
    pub zoom_step: f64,
    /// Initial 1-based page.
    pub page_number: u32,
    pub thresholds: Thresholds,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            enable_pan: true,
            enable_zoom: true,
            enable_annotations: false,
            scale: DEFAULT_SCALE,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            zoom_step: DEFAULT_ZOOM_STEP,
            page_number: 1,
            thresholds: Thresholds::default(),
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any error from
    /// [`ViewerConfig::validate`].
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("scale", self.scale),
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
            ("zoom_step", self.zoom_step),
            ("min_drag_distance", self.thresholds.min_drag_distance),
            ("min_highlight_distance", self.thresholds.min_highlight_distance),
            ("min_resize_size", self.thresholds.min_resize_size),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }
        if self.min_scale <= 0.0 || self.min_scale > self.max_scale {
            return Err(ConfigError::InvalidScaleRange { min: self.min_scale, max: self.max_scale });
        }
        if self.zoom_step <= 0.0 {
            return Err(ConfigError::InvalidZoomStep(self.zoom_step));
        }
        for (field, value) in [
            ("min_drag_distance", self.thresholds.min_drag_distance),
            ("min_highlight_distance", self.thresholds.min_highlight_distance),
            ("min_resize_size", self.thresholds.min_resize_size),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeThreshold { field, value });
            }
        }
        if self.page_number == 0 {
            return Err(ConfigError::InvalidPage);
        }
        Ok(())
    }
}
