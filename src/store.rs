//! The page-scoped annotation collection and its change notifications.
//!
//! The collection is copy-on-write: every mutation builds a new
//! `Rc<Vec<Annotation>>` and hands it to the host through the replace
//! callback, so a snapshot the host is holding never changes underneath it.
//! After the replace notification the matching add/update/delete callback
//! fires, once per committed mutation. Mutations that reference an unknown id
//! are silent no-ops.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashSet;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::annotation::{Annotation, AnnotationPatch};

type AddFn = Box<dyn FnMut(&Annotation)>;
type UpdateFn = Box<dyn FnMut(&str, &AnnotationPatch)>;
type DeleteFn = Box<dyn FnMut(&str)>;
type ChangeFn = Box<dyn FnMut(Rc<Vec<Annotation>>)>;

/// Host callbacks. Any of them may be left unregistered.
#[derive(Default)]
pub struct StoreCallbacks {
    on_add: Option<AddFn>,
    on_update: Option<UpdateFn>,
    on_delete: Option<DeleteFn>,
    on_change: Option<ChangeFn>,
}

impl StoreCallbacks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_add(mut self, f: impl FnMut(&Annotation) + 'static) -> Self {
        self.on_add = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_update(mut self, f: impl FnMut(&str, &AnnotationPatch) + 'static) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_delete(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_delete = Some(Box::new(f));
        self
    }

    /// Called with the full new collection after every mutation.
    #[must_use]
    pub fn on_change(mut self, f: impl FnMut(Rc<Vec<Annotation>>) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }
}

/// Insertion-ordered collection of annotations across all pages.
#[derive(Default)]
pub struct AnnotationStore {
    annotations: Rc<Vec<Annotation>>,
    callbacks: StoreCallbacks,
}

impl AnnotationStore {
    /// Create an empty store with no callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register host callbacks, replacing any previous set.
    pub fn set_callbacks(&mut self, callbacks: StoreCallbacks) {
        self.callbacks = callbacks;
    }

    /// Replace the collection with the host's current list.
    ///
    /// No callbacks fire: the host already has this list. Records whose id
    /// repeats an earlier one are dropped.
    pub fn load(&mut self, annotations: Vec<Annotation>) {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(annotations.len());
        for ann in annotations {
            if seen.insert(ann.id.clone()) {
                kept.push(ann);
            } else {
                warn!(id = %ann.id, "dropping annotation with duplicate id");
            }
        }
        self.annotations = Rc::new(kept);
    }

    /// Cheap handle to the current collection.
    #[must_use]
    pub fn snapshot(&self) -> Rc<Vec<Annotation>> {
        Rc::clone(&self.annotations)
    }

    /// Annotations anchored to `page`, in insertion order.
    #[must_use]
    pub fn list(&self, page: u32) -> Vec<&Annotation> {
        self.annotations.iter().filter(|a| a.page == page).collect()
    }

    /// Look up an annotation by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Append an annotation. Returns `false` (and changes nothing) if its id is taken.
    pub fn add(&mut self, annotation: Annotation) -> bool {
        if self.contains(&annotation.id) {
            warn!(id = %annotation.id, "refusing to add annotation with duplicate id");
            return false;
        }
        debug!(id = %annotation.id, kind = annotation.kind.as_str(), page = annotation.page, "annotation added");

        let mut next = Vec::with_capacity(self.annotations.len() + 1);
        next.extend(self.annotations.iter().cloned());
        next.push(annotation.clone());
        self.replace(next);

        if let Some(f) = self.callbacks.on_add.as_mut() {
            f(&annotation);
        }
        true
    }

    /// Merge `patch` into the annotation with `id`. Returns `false` if it is absent.
    pub fn update(&mut self, id: &str, patch: &AnnotationPatch) -> bool {
        if !self.contains(id) {
            return false;
        }

        let next = self
            .annotations
            .iter()
            .map(|a| {
                let mut a = a.clone();
                if a.id == id {
                    a.apply(patch);
                }
                a
            })
            .collect();
        self.replace(next);

        if let Some(f) = self.callbacks.on_update.as_mut() {
            f(id, patch);
        }
        true
    }

    /// Remove the annotation with `id`. Returns `false` if it is absent.
    pub fn delete(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        debug!(%id, "annotation deleted");

        let next = self.annotations.iter().filter(|a| a.id != id).cloned().collect();
        self.replace(next);

        if let Some(f) = self.callbacks.on_delete.as_mut() {
            f(id);
        }
        true
    }

    /// Total number of annotations across all pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    fn replace(&mut self, next: Vec<Annotation>) {
        self.annotations = Rc::new(next);
        if let Some(f) = self.callbacks.on_change.as_mut() {
            f(Rc::clone(&self.annotations));
        }
    }
}
