// SPDX-License-Identifier: MPL-2.0
//! Toolbar entries and the toolbar resolver.
//!
//! Up to five contributors feed the final control list: the renderer's own
//! entries, configured custom entries, the slideshow play/pause control,
//! the toolbar-modifier callback, and the download control. [`resolve`]
//! merges them with strict precedence and also decides zoom widget and
//! footer visibility.

use crate::item::{Item, ItemKind};
use crate::safety;

/// What a toolbar button does when activated. The engine routes reserved
/// keyboard mnemonics to the matching visible action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarAction {
    MediaPlayPause,
    Mute,
    Download,
    Print,
    Fullscreen,
    Theme,
    Carousel,
    SlideshowToggle,
    Help,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    RotateClockwise,
    PageNext,
    PagePrev,
    /// Caller-defined action, dispatched back to the embedding layer.
    Custom(String),
}

/// Runtime facts a visibility predicate may consult.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolbarContext {
    pub item_kind: ItemKind,
    pub index: usize,
    pub item_count: usize,
    pub media_playing: bool,
    pub muted: bool,
    pub fullscreen: bool,
    pub slideshow_running: bool,
}

/// Visibility predicate evaluated against the current [`ToolbarContext`].
pub type VisibilityPredicate = fn(&ToolbarContext) -> bool;

/// A toolbar button.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub id: Option<String>,
    /// Markup fragment for the icon; sanitized during resolution.
    pub icon: Option<String>,
    pub label: Option<String>,
    pub tooltip: Option<String>,
    pub show_label: bool,
    pub class_name: Option<String>,
    pub visible: bool,
    pub visible_when: Option<VisibilityPredicate>,
    pub action: Option<ToolbarAction>,
    /// Item-level custom mnemonic, honored only when not reserved.
    pub shortcut: Option<char>,
}

impl Button {
    #[must_use]
    pub fn new(action: ToolbarAction) -> Self {
        Self {
            id: None,
            icon: None,
            label: None,
            tooltip: None,
            show_label: false,
            class_name: None,
            visible: true,
            visible_when: None,
            action: Some(action),
            shortcut: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    #[must_use]
    pub fn with_shortcut(mut self, shortcut: char) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    #[must_use]
    pub fn with_visible_when(mut self, predicate: VisibilityPredicate) -> Self {
        self.visible_when = Some(predicate);
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Evaluates the effective visibility against the current context.
    #[must_use]
    pub fn is_visible(&self, ctx: &ToolbarContext) -> bool {
        self.visible && self.visible_when.is_none_or(|p| p(ctx))
    }
}

/// One entry in the resolved toolbar.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarEntry {
    Button(Button),
    Separator,
    /// Raw markup inserted verbatim by the embedding layer.
    Raw(String),
}

impl ToolbarEntry {
    /// The button payload, if this entry is a button.
    #[must_use]
    pub fn as_button(&self) -> Option<&Button> {
        match self {
            ToolbarEntry::Button(b) => Some(b),
            _ => None,
        }
    }
}

/// Inputs to toolbar resolution for the current item.
pub struct ResolveRequest<'a> {
    /// Entries returned by the renderer, if any.
    pub renderer_toolbar: Option<Vec<ToolbarEntry>>,
    /// True when the caller override produced the render.
    pub overridden: bool,
    pub item: &'a Item,
    pub item_count: usize,
    pub stage_only: bool,
    /// The current render reported an image error state.
    pub image_error: bool,
    /// The current item carries an active poll row.
    pub poll_active: bool,
    pub slideshow_enabled: bool,
    pub download_enabled: bool,
    pub zoom_enabled: bool,
    /// Configured custom entries appended after the renderer's.
    pub custom_entries: &'a [ToolbarEntry],
}

/// Callback that may replace the merged list wholesale.
pub type ToolbarModifier = dyn FnMut(&[ToolbarEntry]) -> Option<Vec<ToolbarEntry>>;

/// The final toolbar plus the two independent visibility decisions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedToolbar {
    pub entries: Vec<ToolbarEntry>,
    /// The zoom widget is independent of the entry list: built-in image
    /// handler, not overridden, zoom enabled.
    pub zoom_widget: bool,
    pub footer_visible: bool,
}

/// Resolves the final toolbar for the current item.
pub fn resolve(
    req: ResolveRequest<'_>,
    mut modifier: Option<&mut (dyn FnMut(&[ToolbarEntry]) -> Option<Vec<ToolbarEntry>> + '_)>,
) -> ResolvedToolbar {
    let slideshow_applicable = req.slideshow_enabled && req.item_count > 1;
    let kind = req.item.effective_kind();

    let mut entries;
    if req.overridden {
        // An override-supplied toolbar is authoritative; no implicit
        // slideshow, download or zoom contributions.
        entries = req.renderer_toolbar.unwrap_or_default();
    } else if req.stage_only
        || req.image_error
        || matches!(kind, ItemKind::Error | ItemKind::Markup)
    {
        // Fixed special cases outside the merge algorithm.
        entries = Vec::new();
        if slideshow_applicable {
            entries.push(slideshow_entry());
        }
    } else {
        // (a) renderer entries
        entries = req.renderer_toolbar.unwrap_or_default();

        // (b) configured custom entries after a separator
        if !req.custom_entries.is_empty() {
            if !entries.is_empty() {
                entries.push(ToolbarEntry::Separator);
            }
            entries.extend_from_slice(req.custom_entries);
        }

        // (c) slideshow play/pause prepended
        if slideshow_applicable {
            if !entries.is_empty() {
                entries.insert(0, ToolbarEntry::Separator);
            }
            entries.insert(0, slideshow_entry());
        }

        // (d) modifier callback sees a copy; a returned list replaces
        // the merge wholesale
        if let Some(modifier) = modifier.as_deref_mut() {
            let snapshot = entries.clone();
            if let Some(replacement) = modifier(&snapshot) {
                entries = replacement;
            }
        }

        // (e) download entry appended
        if req.download_enabled {
            if let Some(target) = req.item.download_target() {
                if safety::is_safe_download_uri(target) {
                    if !entries.is_empty() {
                        entries.push(ToolbarEntry::Separator);
                    }
                    entries.push(download_entry(req.item));
                }
            }
        }
    }

    sanitize_icons(&mut entries);

    let zoom_widget = !req.overridden
        && !req.stage_only
        && !req.image_error
        && req.zoom_enabled
        && kind == ItemKind::Image;

    let has_slideshow_button = entries.iter().any(|e| {
        e.as_button()
            .is_some_and(|b| b.action == Some(ToolbarAction::SlideshowToggle))
    });

    let force_hidden = req.stage_only
        || req.image_error
        || (kind == ItemKind::Markup && !has_slideshow_button);

    let footer_visible =
        !force_hidden && (!entries.is_empty() || zoom_widget || req.poll_active);

    ResolvedToolbar {
        entries,
        zoom_widget,
        footer_visible,
    }
}

fn slideshow_entry() -> ToolbarEntry {
    ToolbarEntry::Button(
        Button::new(ToolbarAction::SlideshowToggle)
            .with_id("slideshow")
            .with_label("Slideshow"),
    )
}

fn download_entry(item: &Item) -> ToolbarEntry {
    let mut button = Button::new(ToolbarAction::Download)
        .with_id("download")
        .with_label("Download");
    if let Some(size) = &item.size_label {
        button = button.with_tooltip(size.clone());
    }
    ToolbarEntry::Button(button)
}

/// Sanitizes any icon markup in place.
fn sanitize_icons(entries: &mut [ToolbarEntry]) {
    for entry in entries {
        if let ToolbarEntry::Button(button) = entry {
            if let Some(icon) = &button.icon {
                button.icon = Some(safety::sanitize_icon_markup(icon));
            }
        }
    }
}
