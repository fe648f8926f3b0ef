//! The host's native text selection, as seen by the highlight tool.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::geometry::Bounds;

/// A snapshot of the current native selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeSelection {
    /// Selected text exactly as the host reports it (not trimmed).
    pub text: String,
    /// Screen-space bounding box of the selected range, relative to the page surface.
    #[serde(flatten)]
    pub bounds: Bounds,
}

/// Capability for reading and clearing the native selection.
pub trait SelectionSource {
    /// The current selection, or `None` when nothing is selected.
    fn current(&self) -> Option<NativeSelection>;

    /// Remove every selected range.
    fn clear(&mut self);
}

/// An in-memory selection that can be driven from scripts and tests.
///
/// Cloned handles share the same selection, so the driver can keep one handle
/// while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSelection {
    inner: Rc<RefCell<Option<NativeSelection>>>,
}

impl ScriptedSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current selection.
    pub fn select(&self, selection: NativeSelection) {
        *self.inner.borrow_mut() = Some(selection);
    }

    /// Whether nothing is currently selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_none()
    }
}

impl SelectionSource for ScriptedSelection {
    fn current(&self) -> Option<NativeSelection> {
        self.inner.borrow().clone()
    }

    fn clear(&mut self) {
        *self.inner.borrow_mut() = None;
    }
}
