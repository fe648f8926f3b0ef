#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_default_is_origin() {
    assert_eq!(Point::default(), Point::ORIGIN);
}

#[test]
fn point_add_and_sub() {
    let a = Point::new(1.0, 2.0);
    let b = Point::new(10.0, 20.0);
    assert_eq!(a + b, Point::new(11.0, 22.0));
    assert_eq!(b - a, Point::new(9.0, 18.0));
}

// --- to_document ---

#[test]
fn to_document_identity() {
    let doc = to_document(Point::new(50.0, 75.0), Point::ORIGIN, 1.0);
    assert!(point_approx_eq(doc, Point::new(50.0, 75.0)));
}

#[test]
fn to_document_subtracts_origin() {
    let doc = to_document(Point::new(150.0, 90.0), Point::new(100.0, 40.0), 1.0);
    assert!(point_approx_eq(doc, Point::new(50.0, 50.0)));
}

#[test]
fn to_document_divides_by_scale() {
    let doc = to_document(Point::new(40.0, 80.0), Point::ORIGIN, 4.0);
    assert!(point_approx_eq(doc, Point::new(10.0, 20.0)));
}

#[test]
fn to_document_origin_and_scale_combined() {
    let doc = to_document(Point::new(120.0, 60.0), Point::new(20.0, 10.0), 2.0);
    assert!(point_approx_eq(doc, Point::new(50.0, 25.0)));
}

#[test]
fn to_document_negative_result_left_of_origin() {
    let doc = to_document(Point::new(0.0, 0.0), Point::new(10.0, 10.0), 1.0);
    assert!(point_approx_eq(doc, Point::new(-10.0, -10.0)));
}

// --- to_screen ---

#[test]
fn to_screen_identity() {
    let s = to_screen(Point::new(5.0, 6.0), Point::ORIGIN, 1.0, Point::ORIGIN);
    assert!(point_approx_eq(s, Point::new(5.0, 6.0)));
}

#[test]
fn to_screen_applies_scale_origin_and_pan() {
    let s = to_screen(Point::new(10.0, 20.0), Point::new(5.0, 5.0), 2.0, Point::new(100.0, -50.0));
    assert!(point_approx_eq(s, Point::new(125.0, -5.0)));
}

#[test]
fn roundtrip_with_panned_origin() {
    let layout = Point::new(30.0, 40.0);
    let pan = Point::new(-12.5, 7.25);
    let scale = 1.75;
    let doc = Point::new(123.0, 456.0);
    let screen = to_screen(doc, layout, scale, pan);
    let back = to_document(screen, layout + pan, scale);
    assert!(point_approx_eq(back, doc));
}

#[test]
fn pan_does_not_change_document_point_of_same_content() {
    let layout = Point::new(0.0, 0.0);
    let doc = Point::new(80.0, 80.0);
    for pan in [Point::ORIGIN, Point::new(300.0, -200.0), Point::new(-1.0, 1.0)] {
        let screen = to_screen(doc, layout, 1.5, pan);
        assert!(point_approx_eq(to_document(screen, layout + pan, 1.5), doc));
    }
}

// --- distances ---

#[test]
fn screen_dist_scales_inversely() {
    assert!(approx_eq(screen_dist_to_document(20.0, 2.0), 10.0));
    assert!(approx_eq(screen_dist_to_document(20.0, 0.5), 40.0));
}

#[test]
fn screen_delta_to_document_divides_difference() {
    let d = screen_delta_to_document(Point::new(10.0, 10.0), Point::new(50.0, -10.0), 2.0);
    assert!(point_approx_eq(d, Point::new(20.0, -10.0)));
}
