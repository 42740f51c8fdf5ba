// SPDX-License-Identifier: MPL-2.0
//! Focus trap for the dialog and its popups.
//!
//! When accessibility mode is enabled, Tab and Shift+Tab cycle only within
//! the registered focusable descendants, wrapping at the ends. Focus that
//! lands outside the trap is forced back to the first focusable element.

/// Cycles focus within an ordered set of focusable element identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusTrap {
    order: Vec<String>,
    current: Option<usize>,
}

impl FocusTrap {
    /// Replaces the focusable order, keeping the current element if it
    /// survives the change.
    pub fn set_order(&mut self, order: Vec<String>) {
        let kept = self
            .current
            .and_then(|i| self.order.get(i))
            .and_then(|id| order.iter().position(|o| o == id));
        self.order = order;
        self.current = kept;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The identifier currently holding focus, if any.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.and_then(|i| self.order.get(i)).map(String::as_str)
    }

    /// Moves focus forward, wrapping past the end.
    pub fn forward(&mut self) -> Option<&str> {
        if self.order.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(i) => (i + 1) % self.order.len(),
            None => 0,
        };
        self.current = Some(next);
        self.current()
    }

    /// Moves focus backward, wrapping past the start.
    pub fn backward(&mut self) -> Option<&str> {
        if self.order.is_empty() {
            return None;
        }
        let prev = match self.current {
            Some(0) | None => self.order.len() - 1,
            Some(i) => i - 1,
        };
        self.current = Some(prev);
        self.current()
    }

    /// Reports where focus actually landed. Focus outside the trap is
    /// forced to the first focusable element; returns the element that
    /// should hold focus.
    pub fn capture(&mut self, target: Option<&str>) -> Option<&str> {
        if self.order.is_empty() {
            self.current = None;
            return None;
        }
        self.current = Some(
            target
                .and_then(|t| self.order.iter().position(|o| o == t))
                .unwrap_or(0),
        );
        self.current()
    }

    /// Drops any tracked focus position.
    pub fn clear(&mut self) {
        self.current = None;
    }
}
