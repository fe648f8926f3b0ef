//! Scripted replay of input sessions against [`EngineCore`].
//!
//! A replay script is a JSON document holding a configuration, the text layer
//! of the page, any preloaded annotations and an ordered list of input events.
//! The replayer drives the engine natively, standing in for the host: it owns
//! a scripted native selection and a virtual clock that fires deferred tasks
//! when `wait` events advance time past their deadline.
//!
//! ```json
//! {
//!   "config": { "enable_annotations": true },
//!   "spans": [{ "text": "hello", "left": 10, "top": 10, "width": 40, "height": 12 }],
//!   "events": [
//!     { "type": "set_tool", "tool": "rectangle" },
//!     { "type": "pointer_down", "x": 0, "y": 0 },
//!     { "type": "pointer_up", "x": 60, "y": 30 }
//!   ]
//! }
//! ```

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::annotation::Annotation;
use crate::config::ViewerConfig;
use crate::engine::{Action, EngineCore};
use crate::error::{ConfigError, ReplayError};
use crate::geometry::Bounds;
use crate::input::{Button, DeferredToken, Key, Tool, WheelDelta};
use crate::selection::{NativeSelection, ScriptedSelection, SelectionSource};
use crate::text::TextSpan;
use crate::transform::Point;

/// A complete replay session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub config: ViewerConfig,
    /// Page count reported by the document loader, if any.
    #[serde(default)]
    pub page_count: Option<u32>,
    /// Annotations already saved by the host.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Screen-space text layer of the page surface.
    #[serde(default)]
    pub spans: Vec<TextSpan>,
    #[serde(default)]
    pub events: Vec<ReplayEvent>,
}

impl ReplayScript {
    /// Parse a script from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Parse`] if the JSON does not describe a script.
    pub fn from_json(raw: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Io`] if the file cannot be read, or
    /// [`ReplayError::Parse`] if its contents are not a script.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ReplayError::Io { path: path.display().to_string(), source })?;
        Self::from_json(&raw)
    }
}

/// One host event. Coordinates are screen-space pixels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    SetTool { tool: Tool },
    SetAnnotationsEnabled { enabled: bool },
    SetEnablePan { enabled: bool },
    SetEnableZoom { enabled: bool },
    SetScale { scale: f64 },
    SetLayoutOrigin { x: f64, y: f64 },
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
    },
    PointerMove { x: f64, y: f64 },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
    },
    PointerLeave,
    DoubleClick { x: f64, y: f64 },
    Wheel {
        #[serde(default)]
        dx: f64,
        dy: f64,
    },
    KeyDown { key: String },
    /// The user selected text; bounds are relative to the page surface.
    SelectText { text: String, left: f64, top: f64, width: f64, height: f64 },
    ClearSelection,
    /// Advance the virtual clock, firing any deferred task that falls due.
    Wait { ms: u64 },
    ZoomIn,
    ZoomOut,
    ResetPan,
    SetPage { page: u32 },
    NextPage,
    PrevPage,
    SetComment { id: String, text: String },
    Delete { id: String },
}

/// Final engine state after a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub annotations: Vec<Annotation>,
    pub scale: f64,
    pub pan: Point,
    pub page: u32,
    pub tool: Tool,
    /// Number of actions the engine emitted over the session.
    pub action_count: usize,
}

/// Drives an [`EngineCore`] from script events on a virtual clock.
pub struct Replayer {
    core: EngineCore,
    selection: ScriptedSelection,
    now_ms: u64,
    timers: Vec<(u64, DeferredToken)>,
    action_count: usize,
}

impl Replayer {
    /// Build the engine described by `script` and load its document state.
    ///
    /// # Errors
    ///
    /// Returns the configuration error if the script's config is invalid.
    pub fn new(script: &ReplayScript) -> Result<Self, ConfigError> {
        let mut core = EngineCore::with_config(&script.config)?;
        let selection = ScriptedSelection::new();
        core.set_selection_source(Box::new(selection.clone()));
        core.set_text_spans(Box::new(script.spans.clone()));
        core.load_annotations(script.annotations.clone());

        let mut replayer = Self { core, selection, now_ms: 0, timers: Vec::new(), action_count: 0 };
        if let Some(count) = script.page_count {
            let actions = replayer.core.on_document_loaded(count);
            replayer.absorb(actions);
            let actions = replayer.core.set_page(script.config.page_number);
            replayer.absorb(actions);
        }
        Ok(replayer)
    }

    #[must_use]
    pub fn core(&self) -> &EngineCore {
        &self.core
    }

    /// Feed one event to the engine.
    pub fn step(&mut self, event: &ReplayEvent) {
        trace!(?event, now_ms = self.now_ms, "replay event");
        let core = &mut self.core;
        let actions = match event {
            ReplayEvent::SetTool { tool } => core.set_tool(*tool),
            ReplayEvent::SetAnnotationsEnabled { enabled } => core.set_annotations_enabled(*enabled),
            ReplayEvent::SetEnablePan { enabled } => {
                core.set_enable_pan(*enabled);
                Vec::new()
            }
            ReplayEvent::SetEnableZoom { enabled } => {
                core.set_enable_zoom(*enabled);
                Vec::new()
            }
            ReplayEvent::SetScale { scale } => {
                core.set_scale(*scale);
                Vec::new()
            }
            ReplayEvent::SetLayoutOrigin { x, y } => {
                core.set_layout_origin(Point::new(*x, *y));
                Vec::new()
            }
            ReplayEvent::PointerDown { x, y, button } => core.on_pointer_down(Point::new(*x, *y), *button),
            ReplayEvent::PointerMove { x, y } => core.on_pointer_move(Point::new(*x, *y)),
            ReplayEvent::PointerUp { x, y, button } => core.on_pointer_up(Point::new(*x, *y), *button),
            ReplayEvent::PointerLeave => core.on_pointer_leave(),
            ReplayEvent::DoubleClick { x, y } => core.on_double_click(Point::new(*x, *y)),
            ReplayEvent::Wheel { dx, dy } => core.on_wheel(WheelDelta { dx: *dx, dy: *dy }),
            ReplayEvent::KeyDown { key } => core.on_key_down(&Key(key.clone())),
            ReplayEvent::SelectText { text, left, top, width, height } => {
                self.selection.select(NativeSelection {
                    text: text.clone(),
                    bounds: Bounds::new(*left, *top, *width, *height),
                });
                core.on_selection_change()
            }
            ReplayEvent::ClearSelection => {
                self.selection.clear();
                core.on_selection_change()
            }
            ReplayEvent::Wait { ms } => {
                self.advance(*ms);
                return;
            }
            ReplayEvent::ZoomIn => core.zoom_in(),
            ReplayEvent::ZoomOut => core.zoom_out(),
            ReplayEvent::ResetPan => core.reset_pan(),
            ReplayEvent::SetPage { page } => core.set_page(*page),
            ReplayEvent::NextPage => core.next_page(),
            ReplayEvent::PrevPage => core.prev_page(),
            ReplayEvent::SetComment { id, text } => core.set_comment(id, text.clone()),
            ReplayEvent::Delete { id } => core.delete_annotation(id),
        };
        self.absorb(actions);
    }

    /// Advance the virtual clock by `ms`, firing due deferred tasks in deadline order.
    pub fn advance(&mut self, ms: u64) {
        let target = self.now_ms.saturating_add(ms);
        while let Some(idx) = self.next_due(target) {
            let (due, token) = self.timers.remove(idx);
            self.now_ms = due;
            let actions = self.core.fire_deferred(token);
            self.absorb(actions);
        }
        self.now_ms = target;
    }

    /// Fire every remaining deferred task, as if the host stayed open long enough.
    pub fn drain(&mut self) {
        if let Some(last) = self.timers.iter().map(|(due, _)| *due).max() {
            self.advance(last.saturating_sub(self.now_ms));
        }
    }

    /// Summarize the engine state.
    #[must_use]
    pub fn report(&self) -> ReplayReport {
        ReplayReport {
            annotations: self.core.store().snapshot().as_ref().clone(),
            scale: self.core.scale(),
            pan: self.core.pan(),
            page: self.core.page(),
            tool: self.core.tool(),
            action_count: self.action_count,
        }
    }

    fn next_due(&self, target: u64) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, (due, _))| *due <= target)
            .min_by_key(|(_, (due, _))| *due)
            .map(|(idx, _)| idx)
    }

    fn absorb(&mut self, actions: Vec<Action>) {
        self.action_count += actions.len();
        for action in actions {
            match action {
                Action::ScheduleDeferred { token, delay_ms } => {
                    self.timers.push((self.now_ms.saturating_add(u64::from(delay_ms)), token));
                }
                Action::AnnotationAdded(ann) => debug!(id = %ann.id, kind = ann.kind.as_str(), "replay added"),
                Action::AnnotationDeleted { id } => debug!(%id, "replay deleted"),
                other => trace!(?other, "replay action"),
            }
        }
    }
}

/// Run `script` to completion and report the final state.
///
/// # Errors
///
/// Returns the configuration error if the script's config is invalid.
pub fn run(script: &ReplayScript) -> Result<ReplayReport, ConfigError> {
    let mut replayer = Replayer::new(script)?;
    for event in &script.events {
        replayer.step(event);
    }
    replayer.drain();

    let report = replayer.report();
    info!(
        events = script.events.len(),
        annotations = report.annotations.len(),
        actions = report.action_count,
        "replay finished"
    );
    Ok(report)
}
