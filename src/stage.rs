// SPDX-License-Identifier: MPL-2.0
//! The stage: the single shared drawing surface renderers populate.
//!
//! The engine is headless; stage content is a typed description the
//! embedding layer turns into actual widgets or DOM. Renderers receive the
//! stage empty and mount exactly one content value.

use crate::error::RenderFailure;
use kurbo::Size;

/// Typed content mounted on the stage by a renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum StageContent {
    Empty,
    Image {
        source: String,
        /// Animated rasters keep their pan pinned to center.
        animated: bool,
    },
    Video {
        source: String,
        poster: Option<String>,
        /// True when the third-party player backend was unavailable and the
        /// handler degraded to a plain native element.
        native_fallback: bool,
    },
    Audio {
        source: String,
        native_fallback: bool,
    },
    Document {
        source: String,
        native_fallback: bool,
    },
    Text {
        body: String,
    },
    /// Markup passed through verbatim from the item.
    Markup {
        body: String,
    },
    /// Inline degraded card for an item that could not be shown.
    ErrorCard {
        message: String,
        failure: RenderFailure,
    },
    /// Generic card for content no handler recognized.
    UnsupportedCard {
        extension: Option<String>,
        download: Option<String>,
    },
}

/// The mutable drawing surface handed to renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    content: StageContent,
    loading: bool,
    viewport: Size,
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            content: StageContent::Empty,
            loading: false,
            viewport: Size::ZERO,
        }
    }
}

impl Stage {
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Mounts content, replacing whatever was there.
    pub fn mount(&mut self, content: StageContent) {
        self.content = content;
    }

    /// Clears the stage back to empty and stops any loading indicator.
    pub fn clear(&mut self) {
        self.content = StageContent::Empty;
        self.loading = false;
    }

    #[must_use]
    pub fn content(&self) -> &StageContent {
        &self.content
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.content, StageContent::Empty)
    }

    /// Toggles the loading indicator shown while an async handler works.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Whether the mounted content exposes a playable media element.
    #[must_use]
    pub fn has_playable_media(&self) -> bool {
        matches!(
            self.content,
            StageContent::Video { .. } | StageContent::Audio { .. }
        )
    }

    /// Whether the mounted content is a degraded error card.
    #[must_use]
    pub fn is_error_card(&self) -> bool {
        matches!(self.content, StageContent::ErrorCard { .. })
    }
}
