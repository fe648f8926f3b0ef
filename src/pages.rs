//! The current page and, once the document has loaded, the page count.

#[cfg(test)]
#[path = "pages_test.rs"]
mod pages_test;

/// 1-based page position, clamped to the document once its length is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    current: u32,
    count: Option<u32>,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self { current: 1, count: None }
    }
}

impl PageCursor {
    #[must_use]
    pub fn new(current: u32) -> Self {
        Self { current: current.max(1), count: None }
    }

    #[must_use]
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Number of pages, if the document has loaded.
    #[must_use]
    pub fn count(&self) -> Option<u32> {
        self.count
    }

    /// Record the page count of a freshly loaded document and return to page 1.
    pub fn document_loaded(&mut self, count: u32) {
        self.count = Some(count.max(1));
        self.current = 1;
    }

    /// Jump to `page`, clamped to the valid range. Returns the new page if it changed.
    pub fn set(&mut self, page: u32) -> Option<u32> {
        let upper = self.count.unwrap_or(u32::MAX);
        let next = page.max(1).min(upper);
        if next == self.current {
            return None;
        }
        self.current = next;
        Some(next)
    }

    pub fn next_page(&mut self) -> Option<u32> {
        self.set(self.current.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Option<u32> {
        self.set(self.current.saturating_sub(1))
    }
}
