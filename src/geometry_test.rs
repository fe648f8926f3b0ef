#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// normalize
// =============================================================

#[test]
fn normalize_positive_extents_is_identity() {
    assert_eq!(normalize(10.0, 20.0, 30.0, 40.0), Bounds::new(10.0, 20.0, 30.0, 40.0));
}

#[test]
fn normalize_negative_extents_moves_origin() {
    assert_eq!(normalize(100.0, 100.0, -20.0, -20.0), Bounds::new(80.0, 80.0, 20.0, 20.0));
}

#[test]
fn normalize_mixed_signs() {
    assert_eq!(normalize(50.0, 50.0, -10.0, 25.0), Bounds::new(40.0, 50.0, 10.0, 25.0));
    assert_eq!(normalize(50.0, 50.0, 10.0, -25.0), Bounds::new(50.0, 25.0, 10.0, 25.0));
}

#[test]
fn normalize_zero_extents() {
    assert_eq!(normalize(7.0, 8.0, 0.0, 0.0), Bounds::new(7.0, 8.0, 0.0, 0.0));
}

#[test]
fn normalize_is_invariant_to_drag_direction() {
    let cases = [(10.0, 10.0), (-3.5, 12.0), (0.0, -8.0), (250.0, -0.25)];
    for (w, h) in cases {
        let x = 37.0;
        let y = -14.0;
        let forward = normalize(x, y, w, h);
        // Same box dragged from the opposite corner.
        let backward = normalize(x + w, y + h, -w, -h);
        assert_eq!(forward, backward, "w={w} h={h}");
    }
}

// =============================================================
// drag_distance
// =============================================================

#[test]
fn drag_distance_pythagorean() {
    assert_eq!(drag_distance(3.0, 4.0), 5.0);
}

#[test]
fn drag_distance_ignores_sign() {
    assert_eq!(drag_distance(-3.0, -4.0), 5.0);
}

#[test]
fn drag_distance_zero() {
    assert_eq!(drag_distance(0.0, 0.0), 0.0);
}

#[test]
fn drag_distance_diagonal_twenty() {
    let d = drag_distance(-20.0, -20.0);
    assert!((d - 28.284_271).abs() < 1e-5);
}

// =============================================================
// Bounds
// =============================================================

#[test]
fn bounds_right_and_bottom() {
    let b = Bounds::new(10.0, 20.0, 5.0, 6.0);
    assert_eq!(b.right(), 15.0);
    assert_eq!(b.bottom(), 26.0);
}

#[test]
fn bounds_scaled() {
    let b = Bounds::new(10.0, 20.0, 5.0, 6.0).scaled(2.0);
    assert_eq!(b, Bounds::new(20.0, 40.0, 10.0, 12.0));
}

#[test]
fn bounds_intersects_overlap() {
    let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
    let b = Bounds::new(5.0, 5.0, 10.0, 10.0);
    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
}

#[test]
fn bounds_intersects_touching_edge() {
    let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
    let b = Bounds::new(10.0, 0.0, 5.0, 5.0);
    assert!(a.intersects(&b));
}

#[test]
fn bounds_intersects_disjoint() {
    let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(!a.intersects(&Bounds::new(11.0, 0.0, 5.0, 5.0)));
    assert!(!a.intersects(&Bounds::new(0.0, 11.0, 5.0, 5.0)));
    assert!(!a.intersects(&Bounds::new(-6.0, 0.0, 5.0, 5.0)));
    assert!(!a.intersects(&Bounds::new(0.0, -6.0, 5.0, 5.0)));
}

#[test]
fn bounds_intersects_contained() {
    let outer = Bounds::new(0.0, 0.0, 100.0, 100.0);
    let inner = Bounds::new(40.0, 40.0, 1.0, 1.0);
    assert!(outer.intersects(&inner));
    assert!(inner.intersects(&outer));
}

#[test]
fn bounds_contains_point() {
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(b.contains(Point::new(5.0, 5.0)));
    assert!(b.contains(Point::new(10.0, 0.0)));
    assert!(!b.contains(Point::new(10.1, 5.0)));
}

// =============================================================
// Edges
// =============================================================

#[test]
fn edges_from_bounds() {
    let e = Edges::from_bounds(Bounds::new(5.0, 5.0, 5.0, 5.0));
    assert_eq!(e, Edges { left: 5.0, top: 5.0, right: 10.0, bottom: 10.0 });
}

#[test]
fn edges_se_moves_right_and_bottom() {
    let e = Edges::from_bounds(Bounds::new(5.0, 5.0, 5.0, 5.0)).dragged(ResizeHandle::Se, Point::new(20.0, 20.0));
    assert_eq!(e, Edges { left: 5.0, top: 5.0, right: 30.0, bottom: 30.0 });
    assert_eq!(e.width(), 25.0);
    assert_eq!(e.height(), 25.0);
}

#[test]
fn edges_nw_moves_left_and_top() {
    let e = Edges::from_bounds(Bounds::new(0.0, 0.0, 50.0, 50.0)).dragged(ResizeHandle::Nw, Point::new(10.0, -5.0));
    assert_eq!(e, Edges { left: 10.0, top: -5.0, right: 50.0, bottom: 50.0 });
}

#[test]
fn edges_side_handles_move_one_edge() {
    let base = Edges::from_bounds(Bounds::new(0.0, 0.0, 50.0, 50.0));
    let d = Point::new(7.0, 9.0);
    assert_eq!(base.dragged(ResizeHandle::N, d), Edges { top: 9.0, ..base });
    assert_eq!(base.dragged(ResizeHandle::S, d), Edges { bottom: 59.0, ..base });
    assert_eq!(base.dragged(ResizeHandle::E, d), Edges { right: 57.0, ..base });
    assert_eq!(base.dragged(ResizeHandle::W, d), Edges { left: 7.0, ..base });
}

#[test]
fn edges_ne_and_sw() {
    let base = Edges::from_bounds(Bounds::new(0.0, 0.0, 50.0, 50.0));
    let d = Point::new(3.0, 4.0);
    assert_eq!(base.dragged(ResizeHandle::Ne, d), Edges { right: 53.0, top: 4.0, ..base });
    assert_eq!(base.dragged(ResizeHandle::Sw, d), Edges { left: 3.0, bottom: 54.0, ..base });
}

#[test]
fn edges_can_cross_producing_negative_extent() {
    let e = Edges::from_bounds(Bounds::new(0.0, 0.0, 30.0, 30.0)).dragged(ResizeHandle::E, Point::new(-60.0, 0.0));
    assert_eq!(e.width(), -30.0);
}
