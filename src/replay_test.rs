#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::annotation::AnnotationKind;

fn script(value: serde_json::Value) -> ReplayScript {
    ReplayScript::from_json(&value.to_string()).unwrap()
}

fn enabled() -> serde_json::Value {
    json!({ "enable_annotations": true })
}

// =============================================================
// Parsing
// =============================================================

#[test]
fn empty_object_is_a_valid_script() {
    let s = ReplayScript::from_json("{}").unwrap();
    assert!(s.events.is_empty());
    assert_eq!(s.config, ViewerConfig::default());
}

#[test]
fn events_parse_with_defaults() {
    let s = script(json!({
        "events": [
            { "type": "pointer_down", "x": 1, "y": 2 },
            { "type": "wheel", "dy": 3 },
            { "type": "set_tool", "tool": "highlight" },
            { "type": "pointer_leave" },
        ]
    }));
    assert_eq!(
        s.events,
        vec![
            ReplayEvent::PointerDown { x: 1.0, y: 2.0, button: Button::Primary },
            ReplayEvent::Wheel { dx: 0.0, dy: 3.0 },
            ReplayEvent::SetTool { tool: Tool::Highlight },
            ReplayEvent::PointerLeave,
        ]
    );
}

#[test]
fn unknown_event_is_rejected() {
    let err = ReplayScript::from_json(r#"{"events":[{"type":"teleport"}]}"#).unwrap_err();
    assert!(matches!(err, ReplayError::Parse(_)));
}

#[test]
fn missing_file_reports_path() {
    let err = ReplayScript::load(Path::new("/nonexistent/session.json")).unwrap_err();
    assert!(matches!(err, ReplayError::Io { ref path, .. } if path.contains("session.json")));
}

#[test]
fn invalid_config_fails_run() {
    let s = script(json!({ "config": { "zoom_step": -1.0 } }));
    assert!(matches!(run(&s), Err(ConfigError::InvalidZoomStep(_))));
}

// =============================================================
// Sessions
// =============================================================

#[test]
fn rectangle_session_captures_text() {
    let s = script(json!({
        "config": enabled(),
        "spans": [
            { "text": "alpha", "left": 10, "top": 10, "width": 20, "height": 10 },
            { "text": "beta", "left": 500, "top": 500, "width": 20, "height": 10 },
        ],
        "events": [
            { "type": "set_tool", "tool": "rectangle" },
            { "type": "pointer_down", "x": 0, "y": 0 },
            { "type": "pointer_move", "x": 40, "y": 30 },
            { "type": "pointer_up", "x": 40, "y": 30 },
        ]
    }));
    let report = run(&s).unwrap();
    assert_eq!(report.annotations.len(), 1);
    let ann = &report.annotations[0];
    assert_eq!(ann.kind, AnnotationKind::Rectangle);
    assert_eq!(ann.selected_text.as_deref(), Some("alpha"));
    assert_eq!(report.tool, Tool::Rectangle);
}

#[test]
fn highlight_fires_after_wait() {
    let s = script(json!({
        "config": enabled(),
        "events": [
            { "type": "set_tool", "tool": "highlight" },
            { "type": "select_text", "text": "brown fox", "left": 10, "top": 10, "width": 80, "height": 14 },
            { "type": "pointer_up", "x": 90, "y": 24 },
            { "type": "wait", "ms": 60 },
        ]
    }));
    let mut replayer = Replayer::new(&s).unwrap();
    for event in &s.events[..3] {
        replayer.step(event);
    }
    assert!(replayer.core().store().is_empty());
    replayer.step(&s.events[3]);
    let report = replayer.report();
    assert_eq!(report.annotations.len(), 1);
    assert_eq!(report.annotations[0].selected_text.as_deref(), Some("brown fox"));
}

#[test]
fn selection_cleared_before_deadline_is_not_highlighted() {
    let s = script(json!({
        "config": enabled(),
        "events": [
            { "type": "set_tool", "tool": "highlight" },
            { "type": "select_text", "text": "brown fox", "left": 10, "top": 10, "width": 80, "height": 14 },
            { "type": "pointer_up", "x": 90, "y": 24 },
            { "type": "wait", "ms": 10 },
            { "type": "clear_selection" },
        ]
    }));
    assert!(run(&s).unwrap().annotations.is_empty());
}

#[test]
fn tool_switch_before_deadline_drops_highlight() {
    let s = script(json!({
        "config": enabled(),
        "events": [
            { "type": "set_tool", "tool": "highlight" },
            { "type": "select_text", "text": "brown fox", "left": 10, "top": 10, "width": 80, "height": 14 },
            { "type": "pointer_up", "x": 90, "y": 24 },
            { "type": "set_tool", "tool": "none" },
            { "type": "wait", "ms": 100 },
        ]
    }));
    assert!(run(&s).unwrap().annotations.is_empty());
}

#[test]
fn pending_highlight_is_drained_at_end() {
    let s = script(json!({
        "config": enabled(),
        "events": [
            { "type": "set_tool", "tool": "highlight" },
            { "type": "select_text", "text": "fox", "left": 10, "top": 10, "width": 30, "height": 14 },
            { "type": "pointer_up", "x": 40, "y": 24 },
        ]
    }));
    assert_eq!(run(&s).unwrap().annotations.len(), 1);
}

#[test]
fn wheel_session_clamps_scale() {
    let events: Vec<_> = (0..8).map(|_| json!({ "type": "wheel", "dy": 120 })).collect();
    let s = script(json!({ "events": events }));
    assert_eq!(run(&s).unwrap().scale, 0.5);
}

#[test]
fn pan_session_accumulates() {
    let s = script(json!({
        "events": [
            { "type": "pointer_down", "x": 0, "y": 0 },
            { "type": "pointer_move", "x": 10, "y": 5 },
            { "type": "pointer_up", "x": 10, "y": 5 },
            { "type": "pointer_down", "x": 0, "y": 0 },
            { "type": "pointer_move", "x": 10, "y": 5 },
            { "type": "pointer_up", "x": 10, "y": 5 },
        ]
    }));
    assert_eq!(run(&s).unwrap().pan, Point::new(20.0, 10.0));
}

#[test]
fn page_count_and_initial_page() {
    let s = script(json!({ "config": { "page_number": 9 }, "page_count": 4 }));
    assert_eq!(run(&s).unwrap().page, 4);
}

#[test]
fn legacy_text_annotations_load_as_comments() {
    let s = script(json!({
        "config": enabled(),
        "annotations": [
            { "id": "text_1", "type": "text", "page": 1, "x": 5, "y": 5, "text": "Edit this text", "comment": "" },
        ]
    }));
    let mut replayer = Replayer::new(&s).unwrap();
    let loaded = replayer.report();
    assert_eq!(loaded.annotations[0].kind, AnnotationKind::Comment);
    assert_eq!(loaded.annotations[0].comment.as_deref(), Some("Edit this text"));
    assert_eq!(loaded.annotations[0].selected_text, None);

    replayer.step(&ReplayEvent::SetComment { id: "text_1".into(), text: "edited".into() });
    assert_eq!(replayer.report().annotations[0].comment.as_deref(), Some("edited"));
}

#[test]
fn iso_timestamps_in_loaded_annotations_are_accepted() {
    let s = ReplayScript::from_json(
        r#"{"annotations":[{"id":"rectangle_1","type":"rectangle","page":1,"x":0,"y":0,"width":10,"height":10,"timestamp":"2024-05-01T10:00:00.000Z"}]}"#,
    )
    .unwrap();
    assert_eq!(s.annotations[0].timestamp, 1_714_557_600_000);
}

#[test]
fn highlight_scheduled_at_end_of_time_does_not_overflow() {
    let s = script(json!({
        "config": enabled(),
        "events": [
            { "type": "set_tool", "tool": "highlight" },
            { "type": "select_text", "text": "brown fox", "left": 10, "top": 10, "width": 80, "height": 14 },
            { "type": "wait", "ms": u64::MAX },
            { "type": "pointer_up", "x": 90, "y": 24 },
        ]
    }));
    let report = run(&s).unwrap();
    assert_eq!(report.annotations.len(), 1);
}

#[test]
fn delete_event_removes_annotation() {
    let s = script(json!({
        "config": enabled(),
        "annotations": [
            { "id": "rectangle_1", "type": "rectangle", "page": 1, "x": 0, "y": 0, "width": 10, "height": 10 },
        ],
        "events": [{ "type": "delete", "id": "rectangle_1" }]
    }));
    let report = run(&s).unwrap();
    assert!(report.annotations.is_empty());
    assert_eq!(report.action_count, 1);
}
