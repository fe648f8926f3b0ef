//! Hit-testing pointer positions against annotation parts.
//!
//! All inputs are in document space. Slop radii are defined in screen pixels
//! and divided by the current scale, so handles keep a constant on-screen
//! size at every zoom level.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::annotation::{Annotation, AnnotationId, AnnotationKind};
use crate::consts::{COMMENT_MARKER_RADIUS_PX, DELETE_CONTROL_RADIUS_PX, HANDLE_RADIUS_PX};
use crate::geometry::Bounds;
use crate::transform::{self, Point};

/// Which part of an annotation was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeHandle),
    DeleteControl,
}

/// One of the eight resize handles on a rectangle's border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    pub const ALL: [Self; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }

    /// Document-space location of this handle on `bounds`.
    #[must_use]
    pub fn position(self, bounds: &Bounds) -> Point {
        let x = if self.moves_left() {
            bounds.left
        } else if self.moves_right() {
            bounds.right()
        } else {
            bounds.left + bounds.width * 0.5
        };
        let y = if self.moves_top() {
            bounds.top
        } else if self.moves_bottom() {
            bounds.bottom()
        } else {
            bounds.top + bounds.height * 0.5
        };
        Point::new(x, y)
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub id: AnnotationId,
    pub part: HitPart,
}

/// Stacking layer: higher layers sit above lower ones.
#[must_use]
pub fn layer(kind: AnnotationKind) -> u8 {
    match kind {
        AnnotationKind::Highlight => 0,
        AnnotationKind::Rectangle => 1,
        AnnotationKind::Comment => 2,
    }
}

/// The document-space box an annotation occupies on screen.
///
/// Comments are zero-size points drawn as a fixed-size marker centred on the point.
#[must_use]
pub fn hit_box(ann: &Annotation, scale: f64) -> Bounds {
    match ann.kind {
        AnnotationKind::Comment => {
            let r = transform::screen_dist_to_document(COMMENT_MARKER_RADIUS_PX, scale);
            Bounds::new(ann.x - r, ann.y - r, r * 2.0, r * 2.0)
        }
        AnnotationKind::Rectangle | AnnotationKind::Highlight => ann.bounds(),
    }
}

/// Document-space centre of the delete control, just outside the top-right corner.
#[must_use]
pub fn delete_control_center(ann: &Annotation, scale: f64) -> Point {
    let b = hit_box(ann, scale);
    let r = transform::screen_dist_to_document(DELETE_CONTROL_RADIUS_PX, scale);
    Point::new(b.right() + r, b.top - r)
}

/// Test which annotation part (if any) is under `doc_pt`.
///
/// `annotations` is in insertion order; later entries and higher layers win.
/// Within one annotation the delete control beats resize handles, which beat the body.
#[must_use]
pub fn hit_test(doc_pt: Point, annotations: &[&Annotation], scale: f64) -> Option<Hit> {
    let mut stacked: Vec<(usize, &Annotation)> = annotations.iter().copied().enumerate().collect();
    stacked.sort_by(|(ia, a), (ib, b)| layer(b.kind).cmp(&layer(a.kind)).then_with(|| ib.cmp(ia)));

    stacked
        .into_iter()
        .find_map(|(_, ann)| hit_part(doc_pt, ann, scale).map(|part| Hit { id: ann.id.clone(), part }))
}

fn hit_part(doc_pt: Point, ann: &Annotation, scale: f64) -> Option<HitPart> {
    let delete_center = delete_control_center(ann, scale);
    let delete_r = transform::screen_dist_to_document(DELETE_CONTROL_RADIUS_PX, scale);
    if distance(doc_pt, delete_center) <= delete_r {
        return Some(HitPart::DeleteControl);
    }

    if ann.kind.is_resizable() {
        let bounds = ann.bounds();
        let slop = transform::screen_dist_to_document(HANDLE_RADIUS_PX, scale);
        // Handles of small boxes overlap; the closest one wins.
        let nearest = ResizeHandle::ALL
            .into_iter()
            .map(|handle| (handle, handle.position(&bounds)))
            .filter(|(_, p)| (doc_pt.x - p.x).abs() <= slop && (doc_pt.y - p.y).abs() <= slop)
            .min_by(|(_, a), (_, b)| distance(doc_pt, *a).total_cmp(&distance(doc_pt, *b)));
        if let Some((handle, _)) = nearest {
            return Some(HitPart::ResizeHandle(handle));
        }
    }

    // Highlights let pointer events fall through to the text beneath.
    if ann.kind.is_draggable() && hit_box(ann, scale).contains(doc_pt) {
        return Some(HitPart::Body);
    }
    None
}

fn distance(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}
