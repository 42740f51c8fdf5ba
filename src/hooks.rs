// SPDX-License-Identifier: MPL-2.0
//! Named extension points fired synchronously at fixed lifecycle moments.
//!
//! All hooks are plain callbacks invoked on the caller's thread; none may
//! assume the overlay state changes beneath them while they run.

use crate::item::Item;
use crate::theme::ThemeMode;
use crate::toolbar::ToolbarEntry;
use std::fmt;

/// Synchronous notification callbacks.
#[derive(Default)]
pub struct Hooks {
    /// Fired before an item's render begins, with the item and its index.
    pub before_load: Option<Box<dyn FnMut(&Item, usize)>>,

    /// Fired once the item's render result is in place.
    pub after_item_displayed: Option<Box<dyn FnMut(&Item, usize)>>,

    /// Fired after any navigation transition has finished.
    pub after_display_settled: Option<Box<dyn FnMut(usize)>>,

    /// Fired on close, before the current render result is torn down.
    pub pre_teardown: Option<Box<dyn FnMut()>>,

    /// Fired after the overlay has fully closed.
    pub after_close: Option<Box<dyn FnMut()>>,

    pub on_theme_change: Option<Box<dyn FnMut(ThemeMode)>>,

    /// Fired with the new scale after every zoom mutation.
    pub on_zoom_change: Option<Box<dyn FnMut(f64)>>,

    /// Fired with the resolved toolbar; a returned list replaces it.
    #[allow(clippy::type_complexity)]
    pub on_toolbar_resolved: Option<Box<dyn FnMut(&[ToolbarEntry]) -> Option<Vec<ToolbarEntry>>>>,

    /// Fired when the download control is invoked for an item.
    pub on_download: Option<Box<dyn FnMut(&Item)>>,

    /// Fired when the poll selection changes; `None` clears the selection.
    pub on_poll_selection: Option<Box<dyn FnMut(Option<&str>)>>,
}

impl Hooks {
    pub fn fire_before_load(&mut self, item: &Item, index: usize) {
        if let Some(hook) = &mut self.before_load {
            hook(item, index);
        }
    }

    pub fn fire_after_item_displayed(&mut self, item: &Item, index: usize) {
        if let Some(hook) = &mut self.after_item_displayed {
            hook(item, index);
        }
    }

    pub fn fire_after_display_settled(&mut self, index: usize) {
        if let Some(hook) = &mut self.after_display_settled {
            hook(index);
        }
    }

    pub fn fire_pre_teardown(&mut self) {
        if let Some(hook) = &mut self.pre_teardown {
            hook();
        }
    }

    pub fn fire_after_close(&mut self) {
        if let Some(hook) = &mut self.after_close {
            hook();
        }
    }

    pub fn fire_theme_change(&mut self, mode: ThemeMode) {
        if let Some(hook) = &mut self.on_theme_change {
            hook(mode);
        }
    }

    pub fn fire_zoom_change(&mut self, scale: f64) {
        if let Some(hook) = &mut self.on_zoom_change {
            hook(scale);
        }
    }

    /// Fires the toolbar hook and returns the replacement list, if any.
    #[must_use]
    pub fn fire_toolbar_resolved(&mut self, entries: &[ToolbarEntry]) -> Option<Vec<ToolbarEntry>> {
        self.on_toolbar_resolved.as_mut().and_then(|hook| hook(entries))
    }

    pub fn fire_download(&mut self, item: &Item) {
        if let Some(hook) = &mut self.on_download {
            hook(item);
        }
    }

    pub fn fire_poll_selection(&mut self, option_id: Option<&str>) {
        if let Some(hook) = &mut self.on_poll_selection {
            hook(option_id);
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before_load", &self.before_load.is_some())
            .field("after_item_displayed", &self.after_item_displayed.is_some())
            .field("after_display_settled", &self.after_display_settled.is_some())
            .field("pre_teardown", &self.pre_teardown.is_some())
            .field("after_close", &self.after_close.is_some())
            .field("on_theme_change", &self.on_theme_change.is_some())
            .field("on_zoom_change", &self.on_zoom_change.is_some())
            .field("on_toolbar_resolved", &self.on_toolbar_resolved.is_some())
            .field("on_download", &self.on_download.is_some())
            .field("on_poll_selection", &self.on_poll_selection.is_some())
            .finish()
    }
}
