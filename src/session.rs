// SPDX-License-Identifier: MPL-2.0
//! Gallery sessions.
//!
//! A session owns the ordered item list, the cursor into it, the active
//! render result and the per-session slideshow state. The controller holds
//! at most one session at a time; opening a new gallery replaces it.

use crate::config::Config;
use crate::item::Item;
use crate::render::{ItemRenderer, RenderResult};
use crate::slideshow::Scheduler;
use crate::toolbar::{ToolbarEntry, ToolbarModifier};
use std::fmt;

/// Per-open runtime options.
///
/// The serializable preferences live in [`Config`]; everything here is a
/// runtime extension point that cannot round-trip through a file.
#[derive(Default)]
pub struct SessionOptions {
    pub config: Config,
    /// Custom entries merged into the toolbar after the renderer's own.
    pub custom_toolbar: Vec<ToolbarEntry>,
    /// Renderer consulted before the built-in handlers.
    pub render_override: Option<Box<dyn ItemRenderer>>,
    /// Callback that may replace the merged toolbar wholesale.
    pub toolbar_modifier: Option<Box<ToolbarModifier>>,
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("config", &self.config)
            .field("custom_toolbar", &self.custom_toolbar)
            .field("render_override", &self.render_override.is_some())
            .field("toolbar_modifier", &self.toolbar_modifier.is_some())
            .finish()
    }
}

/// One open gallery.
///
/// Invariant: `current_index` stays within `[0, items.len())` whenever the
/// item list is non-empty.
pub struct Session {
    items: Vec<Item>,
    current_index: usize,
    pub options: SessionOptions,
    /// The authoritative render for the current item, if one is mounted.
    pub render_result: Option<RenderResult>,
    pub slideshow: Scheduler,
    /// The selected poll option for the current item, if any.
    pub poll_selection: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(items: Vec<Item>, start_index: usize, options: SessionOptions) -> Self {
        let slideshow = Scheduler::new(&options.config.slideshow);
        let current_index = clamp_index(start_index, items.len());
        Self {
            items,
            current_index,
            options,
            render_result: None,
            slideshow,
            poll_selection: None,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_item(&self) -> Option<&Item> {
        self.items.get(self.current_index)
    }

    #[must_use]
    pub fn looping(&self) -> bool {
        self.options.config.navigation.looping
    }

    /// The index one step forward, or `None` at a non-looping boundary.
    /// A list of fewer than two items never navigates.
    #[must_use]
    pub fn next_index(&self) -> Option<usize> {
        self.step_index(1)
    }

    /// The index one step back, or `None` at a non-looping boundary.
    #[must_use]
    pub fn prev_index(&self) -> Option<usize> {
        self.step_index(-1)
    }

    fn step_index(&self, direction: isize) -> Option<usize> {
        let count = self.items.len();
        if count < 2 {
            return None;
        }
        let current = self.current_index as isize;
        let stepped = current + direction;
        if self.looping() {
            Some(stepped.rem_euclid(count as isize) as usize)
        } else if (0..count as isize).contains(&stepped) {
            Some(stepped as usize)
        } else {
            None
        }
    }

    /// Whether a "next" control should be offered at all.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.next_index().is_some()
    }

    /// Whether a "previous" control should be offered at all.
    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.prev_index().is_some()
    }

    /// Moves the cursor, clamping into range. Returns the effective index.
    pub fn set_index(&mut self, index: usize) -> usize {
        self.current_index = clamp_index(index, self.items.len());
        self.current_index
    }

    /// Replaces the item list wholesale (collection-layer rescan), keeping
    /// the cursor in range. Poll selection belongs to the old list.
    pub fn replace_items(&mut self, items: Vec<Item>) {
        self.items = items;
        self.current_index = clamp_index(self.current_index, self.items.len());
        self.poll_selection = None;
    }

    /// Takes the active render result for teardown.
    pub fn take_render_result(&mut self) -> Option<RenderResult> {
        self.render_result.take()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("item_count", &self.items.len())
            .field("current_index", &self.current_index)
            .field("render_result", &self.render_result)
            .field("slideshow", &self.slideshow)
            .field("poll_selection", &self.poll_selection)
            .finish()
    }
}

fn clamp_index(index: usize, count: usize) -> usize {
    if count == 0 {
        0
    } else {
        index.min(count - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| Item::image(format!("https://example.com/{i}.jpg")))
            .collect()
    }

    fn session(n: usize, start: usize, looping: bool) -> Session {
        let mut options = SessionOptions::default();
        options.config.navigation.looping = looping;
        Session::new(items(n), start, options)
    }

    #[test]
    fn start_index_is_clamped_into_range() {
        let s = session(3, 99, true);
        assert_eq!(s.current_index(), 2);

        let s = session(0, 5, true);
        assert_eq!(s.current_index(), 0);
        assert!(s.current_item().is_none());
    }

    #[test]
    fn looping_wraps_both_directions() {
        let mut s = session(3, 2, true);
        assert_eq!(s.next_index(), Some(0));
        s.set_index(0);
        assert_eq!(s.prev_index(), Some(2));
    }

    #[test]
    fn non_looping_stops_at_boundaries() {
        let s = session(3, 2, false);
        assert_eq!(s.next_index(), None);
        assert!(!s.has_next());
        assert_eq!(s.prev_index(), Some(1));

        let s = session(3, 0, false);
        assert_eq!(s.prev_index(), None);
        assert!(!s.has_prev());
        assert_eq!(s.next_index(), Some(1));
    }

    #[test]
    fn single_item_never_navigates() {
        let s = session(1, 0, true);
        assert_eq!(s.next_index(), None);
        assert_eq!(s.prev_index(), None);
    }

    #[test]
    fn replace_items_keeps_the_cursor_in_range() {
        let mut s = session(5, 4, true);
        s.poll_selection = Some("opt-1".into());
        s.replace_items(items(2));
        assert_eq!(s.current_index(), 1);
        assert!(s.poll_selection.is_none());

        s.replace_items(Vec::new());
        assert_eq!(s.current_index(), 0);
        assert!(s.is_empty());
    }

    #[test]
    fn set_index_clamps() {
        let mut s = session(3, 0, true);
        assert_eq!(s.set_index(7), 2);
        assert_eq!(s.current_index(), 2);
    }
}
