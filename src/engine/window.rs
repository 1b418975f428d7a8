//! "Show more" windowing over a result sequence.
//!
//! The engine always returns the full filtered and sorted sequence. A `Window`
//! is presentation state owned by the caller: it reveals the first `limit`
//! results and can be expanded to reveal all of them.

use serde::{Deserialize, Serialize};

/// Reveal-the-first-N window over a list of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    limit: usize,
    expanded: bool,
}

impl Window {
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self {
            limit,
            expanded: false,
        }
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    #[must_use]
    pub const fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Number of results currently revealed out of `total`.
    #[must_use]
    pub fn visible_len(&self, total: usize) -> usize {
        if self.expanded {
            total
        } else {
            self.limit.min(total)
        }
    }

    /// `results[0..min(limit, len)]`, or all results once expanded.
    ///
    /// # Examples
    ///
    /// ```
    /// use marketview::Window;
    ///
    /// let results = [1, 2, 3, 4, 5];
    /// let mut window = Window::new(2);
    /// assert_eq!(window.visible(&results), &[1, 2]);
    /// assert_eq!(window.hidden(results.len()), 3);
    ///
    /// window.expand();
    /// assert_eq!(window.visible(&results).len(), 5);
    /// ```
    #[must_use]
    pub fn visible<'a, T>(&self, results: &'a [T]) -> &'a [T] {
        &results[..self.visible_len(results.len())]
    }

    /// How many results the window is hiding.
    #[must_use]
    pub fn hidden(&self, total: usize) -> usize {
        total - self.visible_len(total)
    }

    /// `true` when a "show more" control is needed.
    #[must_use]
    pub fn has_more(&self, total: usize) -> bool {
        self.hidden(total) > 0
    }

    pub fn expand(&mut self) {
        self.expanded = true;
    }

    pub fn collapse(&mut self) {
        self.expanded = false;
    }
}
