//! Coordinate transforms between screen space and document space.
//!
//! Screen space is whatever the host reports pointer positions in (CSS pixels
//! relative to the viewport). Document space is fixed to the page content and
//! is the only space annotations are stored in. Pan is a purely visual
//! translation of the whole surface, so it appears in [`to_screen`] but never
//! leaks into stored coordinates.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point in either screen or document space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Convert a screen-space point to document coordinates.
///
/// `container_origin` is the rendered top-left of the page surface, i.e. it
/// already includes the current pan offset.
#[must_use]
pub fn to_document(screen: Point, container_origin: Point, scale: f64) -> Point {
    Point {
        x: (screen.x - container_origin.x) / scale,
        y: (screen.y - container_origin.y) / scale,
    }
}

/// Convert a document-space point to screen coordinates for rendering.
///
/// `container_origin` is the un-panned layout origin; `pan` is added on top.
#[must_use]
pub fn to_screen(document: Point, container_origin: Point, scale: f64, pan: Point) -> Point {
    Point {
        x: document.x * scale + container_origin.x + pan.x,
        y: document.y * scale + container_origin.y + pan.y,
    }
}

/// Convert a screen-space distance (pixels) to a document-space distance.
#[must_use]
pub fn screen_dist_to_document(screen_dist: f64, scale: f64) -> f64 {
    screen_dist / scale
}

/// Document-space displacement between two screen points.
#[must_use]
pub fn screen_delta_to_document(from: Point, to: Point, scale: f64) -> Point {
    Point {
        x: (to.x - from.x) / scale,
        y: (to.y - from.y) / scale,
    }
}
