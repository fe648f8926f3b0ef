//! Input model: tools, buttons, and the gesture state machine's states.
//!
//! `Tool` captures which annotation tool the host has selected. `InputState`
//! is the single active interaction mode, carrying the gesture context needed
//! to compute incremental deltas and emit final mutations on release. Modes
//! are mutually exclusive by construction.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotationId, AnnotationKind};
use crate::geometry::{self, Bounds, Edges};
use crate::hit::ResizeHandle;
use crate::transform::Point;

/// Which annotation tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// No annotation tool; the pointer pans the page.
    #[default]
    None,
    /// Double-click to drop a comment.
    Comment,
    /// Drag to draw a rectangle.
    Rectangle,
    /// Select text to highlight it.
    Highlight,
}

impl Tool {
    /// Whether this is an annotation tool (anything but `None`).
    #[must_use]
    pub fn is_annotation_tool(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// A keyboard key, holding the key name as the browser reports it (e.g. `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    #[serde(default)]
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    #[serde(default)]
    pub dy: f64,
}

/// Identifies one scheduled deferred task. Stale tokens are ignored when fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeferredToken(pub u64);

/// Guard for a global pointer-event subscription held for the length of a gesture.
///
/// The engine flags the subscription as active when the guard is acquired;
/// dropping the guard (because the state holding it was replaced for any
/// reason) clears the flag, so the engine can always tell the host to release.
#[derive(Debug)]
pub struct PointerSubscription {
    active: Rc<Cell<bool>>,
}

impl PointerSubscription {
    #[must_use]
    pub fn acquire(flag: &Rc<Cell<bool>>) -> Self {
        flag.set(true);
        Self { active: Rc::clone(flag) }
    }
}

impl Drop for PointerSubscription {
    fn drop(&mut self) {
        self.active.set(false);
    }
}

/// An annotation under construction. It has no id until it is committed.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub kind: AnnotationKind,
    /// Document-space corner where the gesture started.
    pub origin: Point,
    /// Signed document-space width.
    pub width: f64,
    /// Signed document-space height.
    pub height: f64,
}

impl Draft {
    #[must_use]
    pub fn new(kind: AnnotationKind, origin: Point) -> Self {
        Self { kind, origin, width: 0.0, height: 0.0 }
    }

    /// Stretch the draft so its far corner sits at `corner`.
    pub fn stretch_to(&mut self, corner: Point) {
        self.width = corner.x - self.origin.x;
        self.height = corner.y - self.origin.y;
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        geometry::normalize(self.origin.x, self.origin.y, self.width, self.height)
    }

    #[must_use]
    pub fn drag_distance(&self) -> f64 {
        geometry::drag_distance(self.width, self.height)
    }
}

/// What the host should draw for the draft being constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftPreview {
    /// Normalized document-space bounds.
    pub bounds: Bounds,
    /// Whether releasing now would commit the draft.
    pub valid: bool,
}

/// Internal state for the input state machine.
#[derive(Debug, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging the whole page surface with no annotation tool active.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
    },
    /// Drawing a new annotation by dragging from a corner.
    Drawing { draft: Draft },
    /// Moving an existing comment or rectangle.
    DraggingAnnotation {
        id: AnnotationId,
        /// Screen-space pointer position at gesture start.
        start_screen: Point,
        /// Annotation x at gesture start.
        orig_x: f64,
        /// Annotation y at gesture start.
        orig_y: f64,
        subscription: PointerSubscription,
    },
    /// Resizing a rectangle by one of its eight handles.
    ResizingAnnotation {
        id: AnnotationId,
        handle: ResizeHandle,
        /// Screen-space pointer position at gesture start.
        start_screen: Point,
        /// Normalized edges at gesture start.
        start_edges: Edges,
        subscription: PointerSubscription,
    },
    /// A native text selection is in progress with the highlight tool.
    TextSelecting,
}

impl InputState {
    /// Short name of the active mode, for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Panning { .. } => "panning",
            Self::Drawing { .. } => "drawing",
            Self::DraggingAnnotation { .. } => "dragging",
            Self::ResizingAnnotation { .. } => "resizing",
            Self::TextSelecting => "text_selecting",
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
