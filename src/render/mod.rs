// SPDX-License-Identifier: MPL-2.0
//! Renderer dispatch.
//!
//! Every item render goes through [`dispatch`] against an empty stage,
//! trying three tiers in order: a caller-supplied override renderer, the
//! built-in handler for the item's effective kind, and finally a generic
//! unsupported-content card if the stage is still empty. Exactly one
//! render owns the stage at a time; its teardown runs before the next
//! render or on close.

pub mod builtin;

use crate::item::Item;
use crate::stage::{Stage, StageContent};
use crate::toolbar::ToolbarEntry;
use std::fmt;
use tracing::debug;

/// Cleanup closure owned by a render result. Runs exactly once, before the
/// next item renders or when the overlay closes.
pub type Teardown = Box<dyn FnOnce(&mut Stage)>;

/// What a renderer hands back alongside the content it mounted.
#[derive(Default)]
pub struct RenderResult {
    /// Toolbar entries contributed by the renderer, fed into resolution.
    pub toolbar: Option<Vec<ToolbarEntry>>,
    /// The sole cleanup hook for whatever the render allocated.
    pub destroy: Option<Teardown>,
    /// The render degraded to an inline error card for an image item.
    pub image_error: bool,
}

impl RenderResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_toolbar(mut self, entries: Vec<ToolbarEntry>) -> Self {
        self.toolbar = Some(entries);
        self
    }

    #[must_use]
    pub fn with_destroy(mut self, destroy: Teardown) -> Self {
        self.destroy = Some(destroy);
        self
    }

    /// Runs the teardown, if any, and clears the stage.
    pub fn teardown(mut self, stage: &mut Stage) {
        if let Some(destroy) = self.destroy.take() {
            destroy(stage);
        }
        stage.clear();
    }
}

impl fmt::Debug for RenderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderResult")
            .field("toolbar", &self.toolbar)
            .field("destroy", &self.destroy.is_some())
            .field("image_error", &self.image_error)
            .finish()
    }
}

/// Facts a renderer may consult while mounting content.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    /// Load generation this render belongs to; async completions carry it
    /// back so stale ones can be ignored.
    pub generation: u64,
    pub index: usize,
    pub item_count: usize,
    /// Third-party playback/viewer backends detected at runtime. Absent
    /// backends degrade the handler to a plain native mount.
    pub video_backend: bool,
    pub audio_backend: bool,
    pub document_backend: bool,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            generation: 0,
            index: 0,
            item_count: 1,
            video_backend: true,
            audio_backend: true,
            document_backend: true,
        }
    }
}

/// A caller-supplied renderer consulted before the built-in handlers.
///
/// Returning a result *and* populating the stage makes the override
/// authoritative; leaving the stage empty falls through to the built-in
/// tier regardless of the return value.
pub trait ItemRenderer {
    fn render(&mut self, item: &Item, stage: &mut Stage, ctx: &RenderContext)
        -> Option<RenderResult>;
}

impl<F> ItemRenderer for F
where
    F: FnMut(&Item, &mut Stage, &RenderContext) -> Option<RenderResult>,
{
    fn render(
        &mut self,
        item: &Item,
        stage: &mut Stage,
        ctx: &RenderContext,
    ) -> Option<RenderResult> {
        self(item, stage, ctx)
    }
}

/// The outcome of a dispatch: the result plus which tier produced it.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub result: RenderResult,
    /// True when the caller override was authoritative.
    pub overridden: bool,
}

/// Renders `item` onto the (empty) stage through the three tiers.
pub fn dispatch(
    item: &Item,
    stage: &mut Stage,
    ctx: &RenderContext,
    mut override_renderer: Option<&mut (dyn ItemRenderer + '_)>,
) -> DispatchOutcome {
    debug_assert!(stage.is_empty());

    if let Some(renderer) = override_renderer.as_deref_mut() {
        let result = renderer.render(item, stage, ctx);
        if !stage.is_empty() {
            return DispatchOutcome {
                result: result.unwrap_or_default(),
                overridden: true,
            };
        }
        debug!(index = ctx.index, "override renderer declined, falling back");
    }

    let result = builtin::render(item, stage, ctx);

    // An empty stage with the loading flag up is an async handler at
    // work, not a dispatch failure.
    if stage.is_empty() && !stage.is_loading() {
        debug!(index = ctx.index, "no handler produced content, mounting unsupported card");
        stage.mount(StageContent::UnsupportedCard {
            extension: item.extension.clone(),
            download: item.download_target().map(str::to_owned),
        });
    }

    DispatchOutcome {
        result,
        overridden: false,
    }
}
