//! Resolving which text lies under a document-space rectangle.
//!
//! The engine never knows how the page's text layer is produced. It asks a
//! [`TextSpanProvider`] for the spans that are currently laid out, each with a
//! screen-space box relative to the page surface, and concatenates the ones
//! that overlap the rectangle. Extraction is best-effort: a missing provider
//! yields an empty string rather than an error.

#[cfg(test)]
#[path = "text_test.rs"]
mod text_test;

use serde::{Deserialize, Serialize};

use crate::geometry::Bounds;

/// A run of text laid out on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// Text content of the span, possibly with surrounding whitespace.
    pub text: String,
    /// Screen-space box relative to the page surface origin.
    #[serde(flatten)]
    pub bounds: Bounds,
}

impl TextSpan {
    #[must_use]
    pub fn new(text: impl Into<String>, bounds: Bounds) -> Self {
        Self { text: text.into(), bounds }
    }
}

/// Capability exposing the text spans of the rendered page.
///
/// Queried live on every overlap test; implementations must not assume the
/// result is cached between calls.
pub trait TextSpanProvider {
    /// Current spans in document order, or `None` when the text layer is not available.
    fn spans(&self) -> Option<Vec<TextSpan>>;
}

impl TextSpanProvider for Vec<TextSpan> {
    fn spans(&self) -> Option<Vec<TextSpan>> {
        Some(self.clone())
    }
}

/// Concatenate the text of every span overlapping `rect`.
///
/// `rect` is a normalized document-space box; it is scaled into screen space
/// before comparison with the span boxes. Overlapping spans with non-blank
/// content are joined by single spaces in provider order.
#[must_use]
pub fn resolve_text(rect: Bounds, scale: f64, provider: Option<&dyn TextSpanProvider>) -> String {
    let Some(spans) = provider.and_then(|p| p.spans()) else {
        return String::new();
    };
    let screen_rect = rect.scaled(scale);

    let parts: Vec<&str> = spans
        .iter()
        .filter(|span| screen_rect.intersects(&span.bounds))
        .map(|span| span.text.trim())
        .filter(|text| !text.is_empty())
        .collect();

    parts.join(" ").trim().to_string()
}
