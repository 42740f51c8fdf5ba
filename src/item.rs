// SPDX-License-Identifier: MPL-2.0
//! Gallery item records.
//!
//! Items are produced by an external collection layer and are immutable for
//! the lifetime of a session. The `origin` tag is a non-owning association
//! back to the collecting layer's element, never a lifetime dependency.

/// Content category of a gallery item, selecting the built-in handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemKind {
    #[default]
    Image,
    Video,
    Audio,
    Document,
    InlineText,
    Markup,
    Error,
    Unrecognized,
}

impl ItemKind {
    /// Whether this kind exposes a playable media element whose end signal
    /// can race the slideshow timer.
    #[must_use]
    pub fn is_playable_media(self) -> bool {
        matches!(self, ItemKind::Video | ItemKind::Audio)
    }
}

/// One gallery item. Built by the collection layer, replaced wholesale on
/// rescan, destroyed with the owning session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Item {
    pub kind: ItemKind,
    pub source: Option<String>,
    pub title: String,
    pub download: Option<String>,
    pub extension: Option<String>,
    pub size_label: Option<String>,
    pub thumbnail: Option<String>,
    pub message: Option<String>,
    pub inline_content: Option<String>,
    pub poll_label: Option<String>,
    pub poll_option_id: Option<String>,
    /// Forces a different built-in handler than `kind` would select.
    pub format_override: Option<ItemKind>,
    /// Opaque association with the originating collection element.
    pub origin: Option<u64>,
}

impl Item {
    /// Creates an item of the given kind with a source URI.
    #[must_use]
    pub fn new(kind: ItemKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            source: Some(source.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn image(source: impl Into<String>) -> Self {
        Self::new(ItemKind::Image, source)
    }

    #[must_use]
    pub fn video(source: impl Into<String>) -> Self {
        Self::new(ItemKind::Video, source)
    }

    #[must_use]
    pub fn audio(source: impl Into<String>) -> Self {
        Self::new(ItemKind::Audio, source)
    }

    #[must_use]
    pub fn document(source: impl Into<String>) -> Self {
        Self::new(ItemKind::Document, source)
    }

    /// Inline text shown directly, without a fetch.
    #[must_use]
    pub fn inline_text(content: impl Into<String>) -> Self {
        Self {
            kind: ItemKind::InlineText,
            inline_content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Arbitrary markup passed through to the stage.
    #[must_use]
    pub fn markup(content: impl Into<String>) -> Self {
        Self {
            kind: ItemKind::Markup,
            inline_content: Some(content.into()),
            ..Self::default()
        }
    }

    /// A pre-failed item carrying an error message from the collection layer.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ItemKind::Error,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_download(mut self, download: impl Into<String>) -> Self {
        self.download = Some(download.into());
        self
    }

    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    #[must_use]
    pub fn with_size_label(mut self, label: impl Into<String>) -> Self {
        self.size_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    #[must_use]
    pub fn with_poll(mut self, label: impl Into<String>, option_id: impl Into<String>) -> Self {
        self.poll_label = Some(label.into());
        self.poll_option_id = Some(option_id.into());
        self
    }

    #[must_use]
    pub fn with_format_override(mut self, kind: ItemKind) -> Self {
        self.format_override = Some(kind);
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: u64) -> Self {
        self.origin = Some(origin);
        self
    }

    /// The kind dispatch actually uses, honoring any format override.
    #[must_use]
    pub fn effective_kind(&self) -> ItemKind {
        self.format_override.unwrap_or(self.kind)
    }

    /// Whether this item carries a poll row.
    #[must_use]
    pub fn has_poll(&self) -> bool {
        self.poll_label.is_some() && self.poll_option_id.is_some()
    }

    /// The download target, falling back to the source URI.
    #[must_use]
    pub fn download_target(&self) -> Option<&str> {
        self.download.as_deref().or(self.source.as_deref())
    }

    /// Whether the content is an animated raster whose pan stays pinned to
    /// center regardless of zoom.
    #[must_use]
    pub fn pins_pan(&self) -> bool {
        if self.effective_kind() != ItemKind::Image {
            return false;
        }
        self.extension
            .as_deref()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gif") || ext.eq_ignore_ascii_case("apng"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_kind_is_image() {
        assert_eq!(ItemKind::default(), ItemKind::Image);
        assert_eq!(Item::default().effective_kind(), ItemKind::Image);
    }

    #[test]
    fn format_override_wins_over_kind() {
        let item = Item::image("https://example.com/a.txt").with_format_override(ItemKind::InlineText);
        assert_eq!(item.effective_kind(), ItemKind::InlineText);
    }

    #[test]
    fn download_target_falls_back_to_source() {
        let item = Item::image("https://example.com/a.jpg");
        assert_eq!(item.download_target(), Some("https://example.com/a.jpg"));

        let item = item.with_download("https://example.com/orig.jpg");
        assert_eq!(item.download_target(), Some("https://example.com/orig.jpg"));
    }

    #[test]
    fn gif_pins_pan_but_jpeg_does_not() {
        let gif = Item::image("https://example.com/a.gif").with_extension("gif");
        assert!(gif.pins_pan());

        let jpeg = Item::image("https://example.com/a.jpg").with_extension("jpg");
        assert!(!jpeg.pins_pan());

        let video = Item::video("https://example.com/a.gif").with_extension("gif");
        assert!(!video.pins_pan());
    }

    #[test]
    fn poll_requires_both_fields() {
        let item = Item::image("https://example.com/a.jpg");
        assert!(!item.has_poll());
        let item = item.with_poll("Best photo?", "opt-3");
        assert!(item.has_poll());
    }

    #[test]
    fn playable_media_kinds() {
        assert!(ItemKind::Video.is_playable_media());
        assert!(ItemKind::Audio.is_playable_media());
        assert!(!ItemKind::Image.is_playable_media());
        assert!(!ItemKind::Document.is_playable_media());
    }
}
