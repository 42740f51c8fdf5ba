// SPDX-License-Identifier: MPL-2.0
//! Single-finger swipe recognition.
//!
//! A horizontal drag that travels far enough and dominates the vertical
//! axis navigates; a dominant vertical drag closes the overlay. The
//! controller gates both on zoom state and configuration.

use crate::config::defaults::{SWIPE_CLOSE_THRESHOLD_PX, SWIPE_NAV_THRESHOLD_PX};
use kurbo::Point;

/// What a completed swipe asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    None,
    /// Swipe toward the left edge: advance to the next item.
    Next,
    /// Swipe toward the right edge: go back to the previous item.
    Prev,
    Close,
}

/// Tracks one single-finger swipe from touch-down to lift.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SwipeTracker {
    start: Option<Point>,
}

impl SwipeTracker {
    pub fn begin(&mut self, position: Point) {
        self.start = Some(position);
    }

    /// Abandons the gesture without producing an outcome (e.g. a second
    /// finger touched down and a pinch took over).
    pub fn cancel(&mut self) {
        self.start = None;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// Completes the gesture and classifies it.
    pub fn end(&mut self, position: Point) -> SwipeOutcome {
        let Some(start) = self.start.take() else {
            return SwipeOutcome::None;
        };

        let delta = position - start;
        let horizontal = delta.x.abs();
        let vertical = delta.y.abs();

        if horizontal >= SWIPE_NAV_THRESHOLD_PX && horizontal > vertical {
            if delta.x < 0.0 {
                SwipeOutcome::Next
            } else {
                SwipeOutcome::Prev
            }
        } else if vertical >= SWIPE_CLOSE_THRESHOLD_PX && vertical > horizontal {
            SwipeOutcome::Close
        } else {
            SwipeOutcome::None
        }
    }
}
