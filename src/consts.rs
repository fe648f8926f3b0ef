//! Shared numeric constants for the annotation engine.

// ── Gesture thresholds (document units) ─────────────────────────

/// Minimum diagonal length of a drawn rectangle before it is committed.
pub const MIN_DRAG_DISTANCE: f64 = 10.0;

/// Minimum width and height of a text selection before it becomes a highlight.
pub const MIN_HIGHLIGHT_DISTANCE: f64 = 5.0;

/// Minimum width and height of a rectangle while resizing, divided by scale.
pub const MIN_RESIZE_SIZE: f64 = 20.0;

/// Delay before a finished text selection is turned into a highlight.
pub const TEXT_SELECTION_DELAY_MS: u32 = 50;

// ── Zoom ────────────────────────────────────────────────────────

pub const DEFAULT_SCALE: f64 = 1.0;
pub const DEFAULT_MIN_SCALE: f64 = 0.5;
pub const DEFAULT_MAX_SCALE: f64 = 3.0;
pub const DEFAULT_ZOOM_STEP: f64 = 0.1;

// ── Annotation defaults ─────────────────────────────────────────

pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#ffff00";
pub const DEFAULT_HIGHLIGHT_OPACITY: f64 = 0.3;

/// Text given to a comment created by double-click.
pub const DEFAULT_COMMENT_TEXT: &str = "New comment";

// ── Hit-testing (screen pixels) ─────────────────────────────────

/// Slop around a rectangle resize handle.
pub const HANDLE_RADIUS_PX: f64 = 6.0;

/// Radius of the round marker drawn for a comment.
pub const COMMENT_MARKER_RADIUS_PX: f64 = 12.0;

/// Radius of the delete control drawn at an annotation's top-right corner.
pub const DELETE_CONTROL_RADIUS_PX: f64 = 8.0;
