//! Overlay layout: where each visible annotation and its controls sit on screen.
//!
//! This is a read-only view of store and viewport state. Hosts draw from the
//! boxes it produces; nothing here mutates application state.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use crate::annotation::{Annotation, AnnotationId, AnnotationKind};
use crate::geometry::Bounds;
use crate::hit::{self, ResizeHandle};
use crate::transform::Point;
use crate::viewport::ViewportController;

/// Screen-space placement of one annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBox {
    pub id: AnnotationId,
    pub kind: AnnotationKind,
    /// Stacking layer from [`hit::layer`]; draw lower layers first.
    pub layer: u8,
    /// Screen box. For comments this is the fixed-size marker around the anchor.
    pub screen: Bounds,
    /// Centre of the delete control.
    pub delete_control: Point,
    /// Resize handle centres, for rectangles only.
    pub handles: Vec<(ResizeHandle, Point)>,
    /// Fill color and opacity, for highlights only.
    pub fill: Option<(String, f64)>,
    /// Hover text: the comment body, or the captured text of a rectangle or highlight.
    pub label: Option<String>,
}

/// Lay out `annotations` bottom layer first, keeping insertion order within a layer.
#[must_use]
pub fn layout(annotations: &[&Annotation], viewport: &ViewportController) -> Vec<OverlayBox> {
    let mut boxes: Vec<OverlayBox> = annotations.iter().map(|ann| place(ann, viewport)).collect();
    boxes.sort_by_key(|b| b.layer);
    boxes
}

fn place(ann: &Annotation, viewport: &ViewportController) -> OverlayBox {
    let scale = viewport.scale();
    let doc_box = hit::hit_box(ann, scale);
    let top_left = viewport.to_screen(Point::new(doc_box.left, doc_box.top));
    let screen = Bounds::new(top_left.x, top_left.y, doc_box.width * scale, doc_box.height * scale);

    let handles = if ann.kind.is_resizable() {
        let bounds = ann.bounds();
        ResizeHandle::ALL
            .into_iter()
            .map(|h| (h, viewport.to_screen(h.position(&bounds))))
            .collect()
    } else {
        Vec::new()
    };

    let fill = match ann.kind {
        AnnotationKind::Highlight => Some((ann.color().to_string(), ann.opacity())),
        AnnotationKind::Comment | AnnotationKind::Rectangle => None,
    };
    let label = match ann.kind {
        AnnotationKind::Comment => ann.comment.clone(),
        AnnotationKind::Rectangle | AnnotationKind::Highlight => {
            ann.selected_text.clone().filter(|t| !t.is_empty())
        }
    };

    OverlayBox {
        id: ann.id.clone(),
        kind: ann.kind,
        layer: hit::layer(ann.kind),
        screen,
        delete_control: viewport.to_screen(hit::delete_control_center(ann, scale)),
        handles,
        fill,
        label,
    }
}
