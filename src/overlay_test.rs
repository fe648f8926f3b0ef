#![allow(clippy::float_cmp)]

use super::*;
use crate::config::ViewerConfig;

fn viewport(scale: f64) -> ViewportController {
    ViewportController::from_config(&ViewerConfig { scale, ..ViewerConfig::default() })
}

fn rect(x: f64, y: f64, w: f64, h: f64) -> Annotation {
    Annotation::rectangle(1, Bounds::new(x, y, w, h), String::new())
}

#[test]
fn rectangle_box_is_scaled_and_panned() {
    let mut vp = viewport(2.0);
    vp.set_layout_origin(Point::new(10.0, 20.0));
    vp.pan_by(Point::new(5.0, 5.0));
    let r = rect(10.0, 10.0, 30.0, 20.0);

    let boxes = layout(&[&r], &vp);
    assert_eq!(boxes.len(), 1);
    assert_eq!(boxes[0].screen, Bounds::new(35.0, 45.0, 60.0, 40.0));
    assert_eq!(boxes[0].handles.len(), 8);
    assert!(boxes[0].fill.is_none());
}

#[test]
fn comment_marker_keeps_screen_size() {
    let c = Annotation::comment(1, Point::new(50.0, 50.0), "hi");
    for scale in [0.5, 1.0, 2.0] {
        let boxes = layout(&[&c], &viewport(scale));
        assert_eq!(boxes[0].screen.width, 24.0);
        assert_eq!(boxes[0].screen.height, 24.0);
    }
}

#[test]
fn comment_label_is_comment_text() {
    let c = Annotation::comment(1, Point::new(0.0, 0.0), "remember this");
    let boxes = layout(&[&c], &viewport(1.0));
    assert_eq!(boxes[0].label.as_deref(), Some("remember this"));
    assert!(boxes[0].handles.is_empty());
}

#[test]
fn empty_captured_text_has_no_label() {
    let r = rect(0.0, 0.0, 10.0, 10.0);
    assert!(layout(&[&r], &viewport(1.0))[0].label.is_none());
}

#[test]
fn highlight_carries_fill() {
    let h = Annotation::highlight(1, Bounds::new(0.0, 0.0, 10.0, 10.0), "word".into());
    let boxes = layout(&[&h], &viewport(1.0));
    assert_eq!(boxes[0].fill, Some(("#ffff00".to_string(), 0.3)));
    assert_eq!(boxes[0].label.as_deref(), Some("word"));
}

#[test]
fn layout_orders_by_layer_then_insertion() {
    let c = Annotation::comment(1, Point::new(0.0, 0.0), "c");
    let r1 = rect(0.0, 0.0, 10.0, 10.0);
    let h = Annotation::highlight(1, Bounds::new(0.0, 0.0, 10.0, 10.0), "h".into());
    let r2 = rect(5.0, 5.0, 10.0, 10.0);

    let ids: Vec<_> = layout(&[&c, &r1, &h, &r2], &viewport(1.0)).into_iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![h.id, r1.id, r2.id, c.id]);
}

#[test]
fn delete_control_sits_outside_top_right() {
    let r = rect(0.0, 0.0, 100.0, 50.0);
    let b = &layout(&[&r], &viewport(1.0))[0];
    assert_eq!(b.delete_control, Point::new(108.0, -8.0));
}
