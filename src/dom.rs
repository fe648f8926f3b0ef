//! Browser bindings: DOM-backed text layer and selection, and the [`Engine`] wrapper.
//!
//! This is the only module that touches `web_sys`. It adapts the page's
//! rendered text layer and the window selection to the capability traits the
//! core consumes, and keeps the viewport's layout origin in sync with where
//! the page surface actually sits on screen.

use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{DomRect, Element, Window};

use crate::config::ViewerConfig;
use crate::engine::{Action, EngineCore};
use crate::error::ConfigError;
use crate::geometry::Bounds;
use crate::input::{Button, DeferredToken, Key, WheelDelta};
use crate::selection::{NativeSelection, SelectionSource};
use crate::text::{TextSpan, TextSpanProvider};
use crate::transform::Point;

/// Map `MouseEvent.button` to a [`Button`].
#[must_use]
pub fn button_from_dom(code: i16) -> Button {
    match code {
        0 => Button::Primary,
        1 => Button::Middle,
        _ => Button::Secondary,
    }
}

fn relative_bounds(rect: &DomRect, surface: &DomRect) -> Bounds {
    Bounds::new(rect.left() - surface.left(), rect.top() - surface.top(), rect.width(), rect.height())
}

/// Text spans read live from the rendered text layer.
pub struct DomTextLayer {
    layer: Element,
    surface: Element,
}

impl DomTextLayer {
    #[must_use]
    pub fn new(layer: Element, surface: Element) -> Self {
        Self { layer, surface }
    }
}

impl TextSpanProvider for DomTextLayer {
    fn spans(&self) -> Option<Vec<TextSpan>> {
        let nodes = match self.layer.query_selector_all("span") {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!(?err, "text layer query failed");
                return None;
            }
        };
        let surface = self.surface.get_bounding_client_rect();
        let mut spans = Vec::with_capacity(nodes.length() as usize);
        for i in 0..nodes.length() {
            let Some(node) = nodes.item(i) else {
                continue;
            };
            let Ok(el) = node.dyn_into::<Element>() else {
                continue;
            };
            let text = el.text_content().unwrap_or_default();
            spans.push(TextSpan::new(text, relative_bounds(&el.get_bounding_client_rect(), &surface)));
        }
        Some(spans)
    }
}

/// The window's native selection, measured relative to the page surface.
pub struct DomSelection {
    window: Window,
    surface: Element,
}

impl DomSelection {
    #[must_use]
    pub fn new(window: Window, surface: Element) -> Self {
        Self { window, surface }
    }

    fn selection(&self) -> Option<web_sys::Selection> {
        match self.window.get_selection() {
            Ok(sel) => sel,
            Err(err) => {
                warn!(?err, "get_selection failed");
                None
            }
        }
    }
}

impl SelectionSource for DomSelection {
    fn current(&self) -> Option<NativeSelection> {
        let sel = self.selection()?;
        if sel.is_collapsed() || sel.range_count() == 0 {
            return None;
        }
        let range = match sel.get_range_at(0) {
            Ok(range) => range,
            Err(err) => {
                warn!(?err, "selection range unavailable");
                return None;
            }
        };
        let surface = self.surface.get_bounding_client_rect();
        Some(NativeSelection {
            text: String::from(sel.to_string()),
            bounds: relative_bounds(&range.get_bounding_client_rect(), &surface),
        })
    }

    fn clear(&mut self) {
        if let Some(sel) = self.selection() {
            if let Err(err) = sel.remove_all_ranges() {
                warn!(?err, "failed to clear selection");
            }
        }
    }
}

/// The full engine. Wraps [`EngineCore`] and owns the page surface element.
///
/// Pointer coordinates are `clientX`/`clientY`.
pub struct Engine {
    surface: Element,
    pub core: EngineCore,
}

impl Engine {
    /// Bind an engine to the page surface and its text layer.
    ///
    /// # Errors
    ///
    /// Returns the configuration error if `config` is invalid.
    pub fn new(surface: Element, text_layer: Element, config: &ViewerConfig) -> Result<Self, ConfigError> {
        let mut core = EngineCore::with_config(config)?;
        core.set_text_spans(Box::new(DomTextLayer::new(text_layer, surface.clone())));
        match web_sys::window() {
            Some(window) => core.set_selection_source(Box::new(DomSelection::new(window, surface.clone()))),
            None => warn!("no window; highlights disabled"),
        }
        let mut engine = Self { surface, core };
        engine.sync_layout();
        Ok(engine)
    }

    /// Re-read the surface position. The rendered rect includes the pan offset.
    pub fn sync_layout(&mut self) {
        let rect = self.surface.get_bounding_client_rect();
        let pan = self.core.pan();
        self.core.set_layout_origin(Point::new(rect.left() - pan.x, rect.top() - pan.y));
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, client: Point, button: Button) -> Vec<Action> {
        self.sync_layout();
        self.core.on_pointer_down(client, button)
    }

    pub fn on_pointer_move(&mut self, client: Point) -> Vec<Action> {
        self.core.on_pointer_move(client)
    }

    pub fn on_pointer_up(&mut self, client: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_up(client, button)
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.core.on_pointer_leave()
    }

    pub fn on_double_click(&mut self, client: Point) -> Vec<Action> {
        self.sync_layout();
        self.core.on_double_click(client)
    }

    pub fn on_wheel(&mut self, delta: WheelDelta) -> Vec<Action> {
        self.core.on_wheel(delta)
    }

    pub fn on_selection_change(&mut self) -> Vec<Action> {
        self.core.on_selection_change()
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        self.core.on_key_down(key)
    }

    /// Called from the host's timer for a [`Action::ScheduleDeferred`].
    pub fn fire_deferred(&mut self, token: DeferredToken) -> Vec<Action> {
        self.core.fire_deferred(token)
    }
}
