//! Bounding-box normalization and the size thresholds applied to gestures.
//!
//! Annotations store a signed box: an origin corner plus signed extents whose
//! sign records the drag direction. Everything that consumes geometry
//! (rendering, hit-testing, overlap, resize) goes through [`normalize`] first.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::hit::ResizeHandle;
use crate::transform::Point;

/// A canonical axis-aligned box with non-negative extents.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Multiply every coordinate by `factor` (document → screen when `factor` is the scale).
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            left: self.left * factor,
            top: self.top * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Axis-aligned overlap test. Touching edges count as overlapping.
    #[must_use]
    pub fn intersects(&self, other: &Bounds) -> bool {
        !(other.right() < self.left
            || other.left > self.right()
            || other.bottom() < self.top
            || other.top > self.bottom())
    }

    /// Whether `pt` lies inside or on the border of the box.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.left && pt.x <= self.right() && pt.y >= self.top && pt.y <= self.bottom()
    }
}

/// Convert a signed box (origin corner plus signed extents) into [`Bounds`].
#[must_use]
pub fn normalize(x: f64, y: f64, width: f64, height: f64) -> Bounds {
    Bounds {
        left: x.min(x + width),
        top: y.min(y + height),
        width: width.abs(),
        height: height.abs(),
    }
}

/// Diagonal length of a signed extent.
#[must_use]
pub fn drag_distance(width: f64, height: f64) -> f64 {
    (width * width + height * height).sqrt()
}

/// The four independent edges of a box, moved individually while resizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edges {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Edges {
    #[must_use]
    pub fn from_bounds(bounds: Bounds) -> Self {
        Self {
            left: bounds.left,
            top: bounds.top,
            right: bounds.right(),
            bottom: bounds.bottom(),
        }
    }

    /// Move the edges owned by `handle` by `delta`; the others stay put.
    #[must_use]
    pub fn dragged(self, handle: ResizeHandle, delta: Point) -> Self {
        let mut out = self;
        if handle.moves_left() {
            out.left += delta.x;
        }
        if handle.moves_right() {
            out.right += delta.x;
        }
        if handle.moves_top() {
            out.top += delta.y;
        }
        if handle.moves_bottom() {
            out.bottom += delta.y;
        }
        out
    }

    /// Signed width (`right - left`).
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Signed height (`bottom - top`).
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}
