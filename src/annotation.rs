//! Annotation records and sparse updates.
//!
//! An [`Annotation`] is the unit of markup exchanged with the host. Its `id`,
//! `kind` and `page` are fixed at creation; everything else changes through an
//! [`AnnotationPatch`], which has no fields for the fixed ones.
//!
//! Geometry is stored signed (origin corner plus signed extents) and
//! normalized on read via [`Annotation::bounds`].

#[cfg(test)]
#[path = "annotation_test.rs"]
mod annotation_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::warn;
use uuid::Uuid;

use crate::consts::{DEFAULT_HIGHLIGHT_COLOR, DEFAULT_HIGHLIGHT_OPACITY};
use crate::geometry::{self, Bounds};
use crate::transform::Point;

/// Unique identifier for an annotation.
pub type AnnotationId = String;

/// The kind of an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    /// A point comment with free text. Older hosts call this `text`.
    #[serde(alias = "text")]
    Comment,
    /// A drawn rectangle capturing the text beneath it.
    Rectangle,
    /// A highlight created from a native text selection.
    Highlight,
}

impl AnnotationKind {
    /// Lowercase name, matching the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Rectangle => "rectangle",
            Self::Highlight => "highlight",
        }
    }

    /// Whether annotations of this kind can be moved by dragging their body.
    #[must_use]
    pub fn is_draggable(self) -> bool {
        matches!(self, Self::Comment | Self::Rectangle)
    }

    /// Whether annotations of this kind expose resize handles.
    #[must_use]
    pub fn is_resizable(self) -> bool {
        matches!(self, Self::Rectangle)
    }

    /// Whether `selected_text` is derived from the geometry of this kind.
    #[must_use]
    pub fn tracks_text(self) -> bool {
        matches!(self, Self::Rectangle)
    }
}

/// An annotation as stored in the collection and handed to the host.
///
/// Reading accepts older host records: the `text` type, the `text` key and
/// RFC 3339 timestamps. Writing always uses the canonical fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAnnotation")]
pub struct Annotation {
    /// Unique identifier, assigned at commit.
    pub id: AnnotationId,
    /// Comment, rectangle or highlight.
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    /// 1-based page the annotation is anchored to.
    pub page: u32,
    /// Document-space x of the origin corner.
    pub x: f64,
    /// Document-space y of the origin corner.
    pub y: f64,
    /// Signed document-space width.
    #[serde(default)]
    pub width: f64,
    /// Signed document-space height.
    #[serde(default)]
    pub height: f64,
    /// Free text of a comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Text beneath a rectangle or highlight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_text: Option<String>,
    /// Highlight fill color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Highlight fill opacity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Creation time in milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
}

// =============================================================
// Host record decoding
// =============================================================

/// Type tag as written by hosts, keeping `text` apart from `comment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawKind {
    Comment,
    Text,
    Rectangle,
    Highlight,
}

impl From<RawKind> for AnnotationKind {
    fn from(raw: RawKind) -> Self {
        match raw {
            RawKind::Comment | RawKind::Text => Self::Comment,
            RawKind::Rectangle => Self::Rectangle,
            RawKind::Highlight => Self::Highlight,
        }
    }
}

/// Timestamp as either epoch milliseconds or an RFC 3339 string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

impl RawTimestamp {
    fn to_millis(&self) -> i64 {
        match self {
            Self::Millis(ms) => *ms,
            Self::Text(text) => match OffsetDateTime::parse(text, &Rfc3339) {
                Ok(parsed) => i64::try_from(parsed.unix_timestamp_nanos() / 1_000_000).unwrap_or(0),
                Err(err) => {
                    warn!(timestamp = %text, error = %err, "unreadable annotation timestamp; using 0");
                    0
                }
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawAnnotation {
    id: AnnotationId,
    #[serde(rename = "type")]
    kind: RawKind,
    page: u32,
    x: f64,
    y: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    selected_text: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    opacity: Option<f64>,
    #[serde(default)]
    timestamp: Option<RawTimestamp>,
}

impl From<RawAnnotation> for Annotation {
    fn from(raw: RawAnnotation) -> Self {
        let mut comment = raw.comment;
        let mut selected_text = raw.selected_text;
        match raw.kind {
            // Legacy text notes keep their editable body under `text`.
            RawKind::Text | RawKind::Comment => {
                if comment.as_deref().is_none_or(str::is_empty) && raw.text.is_some() {
                    comment = raw.text;
                }
            }
            RawKind::Rectangle | RawKind::Highlight => {
                if selected_text.is_none() {
                    selected_text = raw.text;
                }
            }
        }
        Self {
            id: raw.id,
            kind: raw.kind.into(),
            page: raw.page,
            x: raw.x,
            y: raw.y,
            width: raw.width,
            height: raw.height,
            comment,
            selected_text,
            color: raw.color,
            opacity: raw.opacity,
            timestamp: raw.timestamp.as_ref().map_or(0, RawTimestamp::to_millis),
        }
    }
}

impl Annotation {
    /// Create an annotation with a fresh id and the current timestamp.
    #[must_use]
    pub fn new(kind: AnnotationKind, page: u32, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: new_id(kind),
            kind,
            page,
            x,
            y,
            width,
            height,
            comment: None,
            selected_text: None,
            color: None,
            opacity: None,
            timestamp: now_ms(),
        }
    }

    /// A zero-size comment anchored at `at`.
    #[must_use]
    pub fn comment(page: u32, at: Point, text: impl Into<String>) -> Self {
        let mut ann = Self::new(AnnotationKind::Comment, page, at.x, at.y, 0.0, 0.0);
        ann.comment = Some(text.into());
        ann
    }

    /// A rectangle covering `bounds`, carrying the text beneath it.
    #[must_use]
    pub fn rectangle(page: u32, bounds: Bounds, selected_text: String) -> Self {
        let mut ann = Self::new(AnnotationKind::Rectangle, page, bounds.left, bounds.top, bounds.width, bounds.height);
        ann.selected_text = Some(selected_text);
        ann
    }

    /// A highlight with the default color and opacity.
    #[must_use]
    pub fn highlight(page: u32, bounds: Bounds, selected_text: String) -> Self {
        let mut ann = Self::new(AnnotationKind::Highlight, page, bounds.left, bounds.top, bounds.width, bounds.height);
        ann.selected_text = Some(selected_text);
        ann.color = Some(DEFAULT_HIGHLIGHT_COLOR.to_string());
        ann.opacity = Some(DEFAULT_HIGHLIGHT_OPACITY);
        ann
    }

    /// Normalized document-space bounds.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        geometry::normalize(self.x, self.y, self.width, self.height)
    }

    /// Highlight color, falling back to the default.
    #[must_use]
    pub fn color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_HIGHLIGHT_COLOR)
    }

    /// Highlight opacity, falling back to the default.
    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.opacity.unwrap_or(DEFAULT_HIGHLIGHT_OPACITY)
    }

    /// Merge the present fields of `patch` into this annotation.
    pub fn apply(&mut self, patch: &AnnotationPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(w) = patch.width {
            self.width = w;
        }
        if let Some(h) = patch.height {
            self.height = h;
        }
        if let Some(ref comment) = patch.comment {
            self.comment = Some(comment.clone());
        }
        if let Some(ref text) = patch.selected_text {
            self.selected_text = Some(text.clone());
        }
        if let Some(ref color) = patch.color {
            self.color = Some(color.clone());
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = Some(opacity);
        }
    }
}

/// Sparse update for an annotation. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl AnnotationPatch {
    /// A patch that moves the origin corner.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Self::default() }
    }

    /// A patch replacing the whole signed box.
    #[must_use]
    pub fn geometry(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x: Some(x), y: Some(y), width: Some(width), height: Some(height), ..Self::default() }
    }

    /// Attach recomputed text beneath the geometry.
    #[must_use]
    pub fn with_selected_text(mut self, text: String) -> Self {
        self.selected_text = Some(text);
        self
    }

    /// Returns `true` if no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn new_id(kind: AnnotationKind) -> AnnotationId {
    format!("{}_{}", kind.as_str(), Uuid::new_v4().simple())
}

#[cfg(all(feature = "dom", target_arch = "wasm32"))]
fn now_ms() -> i64 {
    #[allow(clippy::cast_possible_truncation)]
    let ms = js_sys::Date::now() as i64;
    ms
}

#[cfg(not(all(feature = "dom", target_arch = "wasm32")))]
fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}
