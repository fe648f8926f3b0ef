//! The interaction engine: turns host input events into annotation mutations.
//!
//! [`EngineCore`] owns the annotation store, the viewport and the single
//! active [`InputState`]. Every handler returns the [`Action`]s the host must
//! act on (persist a mutation, move the surface, schedule a timer, capture the
//! pointer). Nothing here touches the DOM, so it runs and tests natively; the
//! browser wrapper lives in `dom`.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::annotation::{Annotation, AnnotationId, AnnotationKind, AnnotationPatch};
use crate::config::{Thresholds, ViewerConfig};
use crate::consts::DEFAULT_COMMENT_TEXT;
use crate::error::ConfigError;
use crate::geometry::{self, Bounds, Edges};
use crate::hit::{self, HitPart, ResizeHandle};
use crate::input::{
    Button, DeferredToken, Draft, DraftPreview, InputState, Key, PointerSubscription, Tool, WheelDelta,
};
use crate::overlay::{self, OverlayBox};
use crate::pages::PageCursor;
use crate::selection::SelectionSource;
use crate::store::{AnnotationStore, StoreCallbacks};
use crate::text::{self, TextSpanProvider};
use crate::transform::{self, Point};
use crate::viewport::ViewportController;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AnnotationAdded(Annotation),
    AnnotationUpdated { id: AnnotationId, fields: AnnotationPatch },
    AnnotationDeleted { id: AnnotationId },
    /// The scale changed; the host owns the authoritative value.
    ScaleChanged(f64),
    /// The accumulated pan offset changed.
    PanChanged(Point),
    PageChanged(u32),
    /// Call [`EngineCore::fire_deferred`] with `token` after `delay_ms`.
    ScheduleDeferred { token: DeferredToken, delay_ms: u32 },
    /// Start routing pointer events from the whole window to the engine.
    CapturePointer,
    /// Stop routing window-level pointer events.
    ReleasePointer,
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the browser.
pub struct EngineCore {
    store: AnnotationStore,
    viewport: ViewportController,
    pages: PageCursor,
    tool: Tool,
    annotations_enabled: bool,
    thresholds: Thresholds,
    input: InputState,
    capture: Rc<Cell<bool>>,
    pending_selection: Option<DeferredToken>,
    next_token: u64,
    text_spans: Option<Box<dyn TextSpanProvider>>,
    selection: Option<Box<dyn SelectionSource>>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::from_valid_config(&ViewerConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine from host configuration.
    ///
    /// # Errors
    ///
    /// Returns the first problem reported by [`ViewerConfig::validate`].
    pub fn with_config(config: &ViewerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: &ViewerConfig) -> Self {
        Self {
            store: AnnotationStore::new(),
            viewport: ViewportController::from_config(config),
            pages: PageCursor::new(config.page_number),
            tool: Tool::default(),
            annotations_enabled: config.enable_annotations,
            thresholds: config.thresholds,
            input: InputState::Idle,
            capture: Rc::new(Cell::new(false)),
            pending_selection: None,
            next_token: 0,
            text_spans: None,
            selection: None,
        }
    }

    // --- Collaborators ---

    /// Install the provider queried for text beneath rectangles.
    pub fn set_text_spans(&mut self, provider: Box<dyn TextSpanProvider>) {
        self.text_spans = Some(provider);
    }

    /// Install the source of native text selections for the highlight tool.
    pub fn set_selection_source(&mut self, source: Box<dyn SelectionSource>) {
        self.selection = Some(source);
    }

    /// Register host callbacks on the annotation store.
    pub fn set_callbacks(&mut self, callbacks: StoreCallbacks) {
        self.store.set_callbacks(callbacks);
    }

    // --- Data inputs ---

    /// Replace the collection with the host's current annotations.
    pub fn load_annotations(&mut self, annotations: Vec<Annotation>) {
        self.store.load(annotations);
    }

    /// Switch the active tool, aborting any gesture in progress.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = Vec::new();
        if tool == self.tool {
            return actions;
        }
        debug!(from = ?self.tool, to = ?tool, "tool changed");
        self.tool = tool;
        self.abort(&mut actions);
        actions
    }

    /// Enable or disable every annotation gesture.
    pub fn set_annotations_enabled(&mut self, enabled: bool) -> Vec<Action> {
        let mut actions = Vec::new();
        if enabled == self.annotations_enabled {
            return actions;
        }
        self.annotations_enabled = enabled;
        self.abort(&mut actions);
        actions
    }

    pub fn set_enable_pan(&mut self, enabled: bool) {
        self.viewport.set_enable_pan(enabled);
    }

    pub fn set_enable_zoom(&mut self, enabled: bool) {
        self.viewport.set_enable_zoom(enabled);
    }

    /// Adopt the host's scale, clamped to the configured range. Returns the effective scale.
    pub fn set_scale(&mut self, scale: f64) -> f64 {
        self.viewport.set_scale(scale);
        self.viewport.scale()
    }

    /// Set the un-panned screen position of the page surface's top-left corner.
    pub fn set_layout_origin(&mut self, origin: Point) {
        self.viewport.set_layout_origin(origin);
    }

    /// Replace a comment's text.
    pub fn set_comment(&mut self, id: &str, comment: String) -> Vec<Action> {
        let mut actions = Vec::new();
        let is_comment = self.store.get(id).is_some_and(|a| a.kind == AnnotationKind::Comment);
        if is_comment {
            let patch = AnnotationPatch { comment: Some(comment), ..AnnotationPatch::default() };
            self.update_into(id, patch, &mut actions);
        }
        actions
    }

    /// Delete an annotation, as its delete control does.
    pub fn delete_annotation(&mut self, id: &str) -> Vec<Action> {
        let mut actions = Vec::new();
        self.delete_into(id, &mut actions);
        actions
    }

    // --- Pages ---

    /// A new document finished loading with `num_pages` pages.
    pub fn on_document_loaded(&mut self, num_pages: u32) -> Vec<Action> {
        let mut actions = Vec::new();
        self.abort(&mut actions);
        self.pages.document_loaded(num_pages);
        actions.push(Action::PageChanged(self.pages.current()));
        actions
    }

    pub fn set_page(&mut self, page: u32) -> Vec<Action> {
        let next = self.pages.set(page);
        self.page_moved(next)
    }

    pub fn next_page(&mut self) -> Vec<Action> {
        let next = self.pages.next_page();
        self.page_moved(next)
    }

    pub fn prev_page(&mut self) -> Vec<Action> {
        let next = self.pages.prev_page();
        self.page_moved(next)
    }

    fn page_moved(&mut self, next: Option<u32>) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(page) = next {
            self.abort(&mut actions);
            actions.push(Action::PageChanged(page));
        }
        actions
    }

    // --- Viewport ---

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.viewport.zoom_in().map(Action::ScaleChanged).into_iter().collect()
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.viewport.zoom_out().map(Action::ScaleChanged).into_iter().collect()
    }

    /// Clear the pan offset.
    pub fn reset_pan(&mut self) -> Vec<Action> {
        if self.viewport.reset_pan() {
            vec![Action::PanChanged(self.viewport.pan())]
        } else {
            Vec::new()
        }
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        let mut actions = Vec::new();
        if button != Button::Primary {
            return actions;
        }
        if !matches!(self.input, InputState::Idle | InputState::TextSelecting) {
            self.finish_gesture(&mut actions);
        }

        let doc_pt = self.viewport.to_document(screen_pt);
        let scale = self.viewport.scale();

        if self.annotations_enabled {
            let hit = hit::hit_test(doc_pt, &self.store.list(self.pages.current()), scale);
            if let Some(hit) = hit {
                match hit.part {
                    HitPart::DeleteControl => self.delete_into(&hit.id, &mut actions),
                    HitPart::ResizeHandle(handle) => self.begin_resize(hit.id, handle, screen_pt, &mut actions),
                    HitPart::Body => self.begin_drag(hit.id, screen_pt, &mut actions),
                }
                return actions;
            }
        }

        if self.viewport.can_pan(self.tool, self.annotations_enabled) {
            self.input = InputState::Panning { last_screen: screen_pt };
            return actions;
        }
        if !self.annotations_enabled {
            return actions;
        }

        match self.tool {
            Tool::Rectangle => {
                self.input = InputState::Drawing { draft: Draft::new(AnnotationKind::Rectangle, doc_pt) };
                actions.push(Action::RenderNeeded);
            }
            // Comments commit on double-click; highlights follow the native selection.
            Tool::Comment | Tool::Highlight | Tool::None => {}
        }
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        let scale = self.viewport.scale();

        match &mut self.input {
            InputState::Idle | InputState::TextSelecting => {}
            InputState::Panning { last_screen } => {
                let delta = screen_pt - *last_screen;
                *last_screen = screen_pt;
                self.viewport.pan_by(delta);
                actions.push(Action::PanChanged(self.viewport.pan()));
            }
            InputState::Drawing { draft } => {
                draft.stretch_to(self.viewport.to_document(screen_pt));
                actions.push(Action::RenderNeeded);
            }
            InputState::DraggingAnnotation { id, start_screen, orig_x, orig_y, .. } => {
                let delta = transform::screen_delta_to_document(*start_screen, screen_pt, scale);
                let (id, x, y) = (id.clone(), *orig_x + delta.x, *orig_y + delta.y);
                self.drag_to(&id, x, y, &mut actions);
            }
            InputState::ResizingAnnotation { id, handle, start_screen, start_edges, .. } => {
                let delta = transform::screen_delta_to_document(*start_screen, screen_pt, scale);
                let edges = start_edges.dragged(*handle, delta);
                let id = id.clone();
                self.resize_to(&id, edges, &mut actions);
            }
        }
        actions
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        let mut actions = Vec::new();
        if button != Button::Primary {
            return actions;
        }

        if matches!(self.input, InputState::Drawing { .. }) {
            // Apply the release position in case no move preceded it.
            actions.extend(self.on_pointer_move(screen_pt));
        }
        // Releases ending a drag, resize or pan never commit a selection.
        let selecting = matches!(self.input, InputState::Idle | InputState::TextSelecting);
        if !matches!(self.input, InputState::TextSelecting) {
            if let Some(draft) = self.finish_gesture(&mut actions) {
                self.commit_draft(draft, &mut actions);
            }
        }

        if selecting && self.annotations_enabled && self.tool == Tool::Highlight {
            let token = self.schedule_selection_commit();
            actions.push(Action::ScheduleDeferred { token, delay_ms: self.thresholds.text_selection_delay_ms });
        }
        actions
    }

    /// The pointer left the surface or the window; end any pointer-driven gesture.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if !matches!(self.input, InputState::Idle | InputState::TextSelecting) {
            if let Some(draft) = self.finish_gesture(&mut actions) {
                trace!(distance = draft.drag_distance(), "draft discarded on pointer leave");
            }
        }
        actions
    }

    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        if !self.annotations_enabled || self.tool != Tool::Comment {
            return actions;
        }
        let doc_pt = self.viewport.to_document(screen_pt);
        let page = self.pages.current();
        if hit::hit_test(doc_pt, &self.store.list(page), self.viewport.scale()).is_some() {
            return actions;
        }
        self.add_into(Annotation::comment(page, doc_pt, DEFAULT_COMMENT_TEXT), &mut actions);
        actions
    }

    pub fn on_wheel(&mut self, delta: WheelDelta) -> Vec<Action> {
        match self.viewport.zoom_by_wheel(delta.dy) {
            Some(scale) => {
                debug!(scale, "zoomed");
                vec![Action::ScaleChanged(scale)]
            }
            None => Vec::new(),
        }
    }

    /// The host's native selection changed.
    pub fn on_selection_change(&mut self) -> Vec<Action> {
        if !self.annotations_enabled || self.tool != Tool::Highlight {
            return Vec::new();
        }
        if !matches!(self.input, InputState::Idle | InputState::TextSelecting) {
            return Vec::new();
        }
        let selecting = self
            .selection
            .as_ref()
            .and_then(|s| s.current())
            .is_some_and(|sel| !sel.text.is_empty());
        self.input = if selecting { InputState::TextSelecting } else { InputState::Idle };
        Vec::new()
    }

    /// Run a task previously requested with [`Action::ScheduleDeferred`].
    ///
    /// Tokens invalidated by a tool switch, page change or a newer schedule are ignored.
    pub fn fire_deferred(&mut self, token: DeferredToken) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.pending_selection != Some(token) {
            return actions;
        }
        self.pending_selection = None;
        if matches!(self.input, InputState::TextSelecting) {
            self.input = InputState::Idle;
        }
        if self.annotations_enabled && self.tool == Tool::Highlight {
            self.commit_selection(&mut actions);
        }
        actions
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        let mut actions = Vec::new();
        if key.0 == "Escape" {
            self.cancel_gesture_into(&mut actions);
        }
        actions
    }

    /// Abort the gesture in progress, discarding any draft.
    pub fn cancel_gesture(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        self.cancel_gesture_into(&mut actions);
        actions
    }

    // --- Queries ---

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    #[must_use]
    pub fn annotations_enabled(&self) -> bool {
        self.annotations_enabled
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.viewport.scale()
    }

    #[must_use]
    pub fn pan(&self) -> Point {
        self.viewport.pan()
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.pages.current()
    }

    #[must_use]
    pub fn page_count(&self) -> Option<u32> {
        self.pages.count()
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    #[must_use]
    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    /// Whether a gesture currently holds the window-level pointer subscription.
    #[must_use]
    pub fn has_pointer_capture(&self) -> bool {
        self.capture.get()
    }

    /// The deferred selection commit awaiting [`EngineCore::fire_deferred`], if any.
    #[must_use]
    pub fn pending_deferred(&self) -> Option<DeferredToken> {
        self.pending_selection
    }

    /// Look up an annotation by id.
    #[must_use]
    pub fn annotation(&self, id: &str) -> Option<&Annotation> {
        self.store.get(id)
    }

    /// Annotations to show on the current page; none while annotations are disabled.
    #[must_use]
    pub fn visible_annotations(&self) -> Vec<&Annotation> {
        if !self.annotations_enabled {
            return Vec::new();
        }
        self.store.list(self.pages.current())
    }

    /// Screen-space layout of the visible annotations, bottom layer first.
    #[must_use]
    pub fn overlay(&self) -> Vec<OverlayBox> {
        overlay::layout(&self.visible_annotations(), &self.viewport)
    }

    /// The draft being drawn, if any.
    #[must_use]
    pub fn draft_preview(&self) -> Option<DraftPreview> {
        let InputState::Drawing { draft } = &self.input else {
            return None;
        };
        Some(DraftPreview {
            bounds: draft.bounds(),
            valid: draft.drag_distance() >= self.thresholds.min_drag_distance,
        })
    }

    // --- Gesture plumbing ---

    fn begin_drag(&mut self, id: AnnotationId, screen_pt: Point, actions: &mut Vec<Action>) {
        let Some(ann) = self.store.get(&id) else {
            return;
        };
        let (orig_x, orig_y) = (ann.x, ann.y);
        self.input = InputState::DraggingAnnotation {
            id,
            start_screen: screen_pt,
            orig_x,
            orig_y,
            subscription: PointerSubscription::acquire(&self.capture),
        };
        actions.push(Action::CapturePointer);
    }

    fn begin_resize(&mut self, id: AnnotationId, handle: ResizeHandle, screen_pt: Point, actions: &mut Vec<Action>) {
        let Some(ann) = self.store.get(&id) else {
            return;
        };
        let start_edges = Edges::from_bounds(ann.bounds());
        self.input = InputState::ResizingAnnotation {
            id,
            handle,
            start_screen: screen_pt,
            start_edges,
            subscription: PointerSubscription::acquire(&self.capture),
        };
        actions.push(Action::CapturePointer);
    }

    fn drag_to(&mut self, id: &str, x: f64, y: f64, actions: &mut Vec<Action>) {
        let Some(ann) = self.store.get(id) else {
            self.finish_gesture(actions);
            return;
        };
        let mut patch = AnnotationPatch::position(x, y);
        if ann.kind.tracks_text() {
            let bounds = geometry::normalize(x, y, ann.width, ann.height);
            patch = patch.with_selected_text(self.resolve_text(bounds));
        }
        self.update_into(id, patch, actions);
    }

    fn resize_to(&mut self, id: &str, edges: Edges, actions: &mut Vec<Action>) {
        if !self.store.contains(id) {
            self.finish_gesture(actions);
            return;
        }
        let (width, height) = (edges.width(), edges.height());
        let min = transform::screen_dist_to_document(self.thresholds.min_resize_size, self.viewport.scale());
        if width.abs() < min || height.abs() < min {
            trace!(width, height, min, "resize frame suppressed");
            return;
        }
        let bounds = geometry::normalize(edges.left, edges.top, width, height);
        let patch =
            AnnotationPatch::geometry(edges.left, edges.top, width, height).with_selected_text(self.resolve_text(bounds));
        self.update_into(id, patch, actions);
    }

    fn commit_draft(&mut self, draft: Draft, actions: &mut Vec<Action>) {
        let distance = draft.drag_distance();
        if distance < self.thresholds.min_drag_distance {
            trace!(distance, "draft discarded below minimum drag distance");
            return;
        }
        let bounds = draft.bounds();
        let mut ann =
            Annotation::new(draft.kind, self.pages.current(), bounds.left, bounds.top, bounds.width, bounds.height);
        if draft.kind.tracks_text() {
            ann.selected_text = Some(self.resolve_text(bounds));
        }
        self.add_into(ann, actions);
    }

    fn commit_selection(&mut self, actions: &mut Vec<Action>) {
        let Some(source) = self.selection.as_mut() else {
            return;
        };
        let Some(sel) = source.current() else {
            return;
        };
        let text = sel.text.trim();
        if text.is_empty() {
            return;
        }
        let bounds = sel.bounds.scaled(1.0 / self.viewport.scale());
        let min = self.thresholds.min_highlight_distance;
        if bounds.width <= min || bounds.height <= min {
            trace!(width = bounds.width, height = bounds.height, "selection too small to highlight");
            return;
        }
        let ann = Annotation::highlight(self.pages.current(), bounds, text.to_string());
        source.clear();
        self.add_into(ann, actions);
    }

    fn schedule_selection_commit(&mut self) -> DeferredToken {
        self.next_token += 1;
        let token = DeferredToken(self.next_token);
        self.pending_selection = Some(token);
        token
    }

    /// Leave the current mode for `Idle`, returning the draft if one was being drawn.
    fn finish_gesture(&mut self, actions: &mut Vec<Action>) -> Option<Draft> {
        let had_capture = self.capture.get();
        // Dropping the previous state releases any pointer subscription it held.
        let draft = match std::mem::take(&mut self.input) {
            InputState::Drawing { draft } => Some(draft),
            _ => None,
        };
        if had_capture && !self.capture.get() {
            actions.push(Action::ReleasePointer);
        }
        if draft.is_some() {
            actions.push(Action::RenderNeeded);
        }
        draft
    }

    fn cancel_gesture_into(&mut self, actions: &mut Vec<Action>) {
        if let Some(draft) = self.finish_gesture(actions) {
            trace!(distance = draft.drag_distance(), "draft cancelled");
        }
    }

    /// Cancel the gesture and any pending selection commit.
    fn abort(&mut self, actions: &mut Vec<Action>) {
        self.cancel_gesture_into(actions);
        self.pending_selection = None;
        actions.push(Action::RenderNeeded);
    }

    fn resolve_text(&self, bounds: Bounds) -> String {
        text::resolve_text(bounds, self.viewport.scale(), self.text_spans.as_deref())
    }

    fn add_into(&mut self, ann: Annotation, actions: &mut Vec<Action>) {
        if self.store.add(ann.clone()) {
            actions.push(Action::AnnotationAdded(ann));
        }
    }

    fn update_into(&mut self, id: &str, patch: AnnotationPatch, actions: &mut Vec<Action>) {
        if self.store.update(id, &patch) {
            actions.push(Action::AnnotationUpdated { id: id.to_string(), fields: patch });
        }
    }

    fn delete_into(&mut self, id: &str, actions: &mut Vec<Action>) {
        if self.store.delete(id) {
            actions.push(Action::AnnotationDeleted { id: id.to_string() });
        }
    }
}
