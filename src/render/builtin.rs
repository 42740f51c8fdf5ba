// SPDX-License-Identifier: MPL-2.0
//! Built-in handlers, one per item kind.
//!
//! Handlers are thin: they validate the resource against the safety
//! policy, mount typed stage content, and contribute their own toolbar
//! entries. Failures degrade to an inline error card; the overlay stays
//! fully operable.

use super::{RenderContext, RenderResult};
use crate::error::RenderFailure;
use crate::item::{Item, ItemKind};
use crate::safety;
use crate::stage::{Stage, StageContent};
use crate::toolbar::{Button, ToolbarAction, ToolbarContext, ToolbarEntry};
use tracing::warn;

/// Renders `item` with the built-in handler for its effective kind.
pub fn render(item: &Item, stage: &mut Stage, ctx: &RenderContext) -> RenderResult {
    match item.effective_kind() {
        ItemKind::Image => render_image(item, stage),
        ItemKind::Video => render_video(item, stage, ctx),
        ItemKind::Audio => render_audio(item, stage, ctx),
        ItemKind::Document => render_document(item, stage, ctx),
        ItemKind::InlineText => render_inline_text(item, stage),
        ItemKind::Markup => render_markup(item, stage),
        ItemKind::Error => render_error(item, stage),
        // Leave the stage empty; dispatch mounts the unsupported card.
        ItemKind::Unrecognized => RenderResult::new(),
    }
}

fn render_image(item: &Item, stage: &mut Stage) -> RenderResult {
    let Some(source) = checked_source(item, stage) else {
        let mut result = RenderResult::new();
        result.image_error = true;
        return result;
    };

    stage.mount(StageContent::Image {
        source,
        animated: item.pins_pan(),
    });
    // The decode completes asynchronously; the completion call clears this.
    stage.set_loading(true);
    RenderResult::new()
}

fn render_video(item: &Item, stage: &mut Stage, ctx: &RenderContext) -> RenderResult {
    let Some(source) = checked_source(item, stage) else {
        return RenderResult::new();
    };

    if !ctx.video_backend {
        warn!(
            failure = RenderFailure::BackendUnavailable("video".into()).key(),
            "video backend unavailable, using native playback"
        );
    }
    stage.mount(StageContent::Video {
        source,
        poster: item.thumbnail.clone(),
        native_fallback: !ctx.video_backend,
    });
    RenderResult::new().with_toolbar(media_toolbar())
}

fn render_audio(item: &Item, stage: &mut Stage, ctx: &RenderContext) -> RenderResult {
    let Some(source) = checked_source(item, stage) else {
        return RenderResult::new();
    };

    if !ctx.audio_backend {
        warn!(
            failure = RenderFailure::BackendUnavailable("audio".into()).key(),
            "audio backend unavailable, using native playback"
        );
    }
    stage.mount(StageContent::Audio {
        source,
        native_fallback: !ctx.audio_backend,
    });
    RenderResult::new().with_toolbar(media_toolbar())
}

fn render_document(item: &Item, stage: &mut Stage, ctx: &RenderContext) -> RenderResult {
    let Some(source) = checked_source(item, stage) else {
        return RenderResult::new();
    };

    if !ctx.document_backend {
        warn!(
            failure = RenderFailure::BackendUnavailable("document".into()).key(),
            "document backend unavailable, using native viewer"
        );
        stage.mount(StageContent::Document {
            source,
            native_fallback: true,
        });
        // The native viewer brings its own controls.
        return RenderResult::new();
    }

    stage.mount(StageContent::Document {
        source,
        native_fallback: false,
    });
    stage.set_loading(true);
    RenderResult::new().with_toolbar(document_toolbar())
}

fn render_inline_text(item: &Item, stage: &mut Stage) -> RenderResult {
    if let Some(body) = &item.inline_content {
        stage.mount(StageContent::Text { body: body.clone() });
        return RenderResult::new();
    }

    if checked_source(item, stage).is_none() {
        return RenderResult::new();
    }

    // The text body arrives through a completion call for this generation.
    stage.set_loading(true);
    RenderResult::new()
}

fn render_markup(item: &Item, stage: &mut Stage) -> RenderResult {
    match &item.inline_content {
        Some(body) => {
            stage.mount(StageContent::Markup { body: body.clone() });
        }
        None => {
            mount_failure(stage, RenderFailure::MissingContent);
        }
    }
    RenderResult::new()
}

fn render_error(item: &Item, stage: &mut Stage) -> RenderResult {
    let message = item
        .message
        .clone()
        .unwrap_or_else(|| "This item could not be prepared".to_owned());
    stage.mount(StageContent::ErrorCard {
        message: message.clone(),
        failure: RenderFailure::LoadFailure(message),
    });
    RenderResult::new()
}

/// Validates the item's source against the media safety policy. On
/// rejection or absence, mounts the degraded card and returns `None`.
fn checked_source(item: &Item, stage: &mut Stage) -> Option<String> {
    let Some(source) = &item.source else {
        mount_failure(stage, RenderFailure::MissingContent);
        return None;
    };

    if !safety::is_safe_media_uri(source) {
        warn!(uri = %source, "rejecting unsafe media resource");
        mount_failure(stage, RenderFailure::UnsafeResource(source.clone()));
        return None;
    }

    Some(source.clone())
}

fn mount_failure(stage: &mut Stage, failure: RenderFailure) {
    stage.mount(StageContent::ErrorCard {
        message: failure.to_string(),
        failure,
    });
}

fn media_toolbar() -> Vec<ToolbarEntry> {
    fn when_playing(ctx: &ToolbarContext) -> bool {
        ctx.media_playing
    }

    vec![
        ToolbarEntry::Button(
            Button::new(ToolbarAction::MediaPlayPause)
                .with_id("play-pause")
                .with_label("Play/Pause"),
        ),
        ToolbarEntry::Button(
            Button::new(ToolbarAction::Mute)
                .with_id("mute")
                .with_label("Mute")
                .with_visible_when(when_playing),
        ),
    ]
}

fn document_toolbar() -> Vec<ToolbarEntry> {
    vec![
        ToolbarEntry::Button(
            Button::new(ToolbarAction::PagePrev)
                .with_id("page-prev")
                .with_label("Previous page"),
        ),
        ToolbarEntry::Button(
            Button::new(ToolbarAction::PageNext)
                .with_id("page-next")
                .with_label("Next page"),
        ),
        ToolbarEntry::Separator,
        ToolbarEntry::Button(
            Button::new(ToolbarAction::Print)
                .with_id("print")
                .with_label("Print"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RenderContext {
        RenderContext::default()
    }

    #[test]
    fn image_mounts_and_starts_loading() {
        let item = Item::image("https://example.com/a.jpg");
        let mut stage = Stage::default();
        let result = render(&item, &mut stage, &ctx());

        assert!(matches!(
            stage.content(),
            StageContent::Image { animated: false, .. }
        ));
        assert!(stage.is_loading());
        assert!(!result.image_error);
    }

    #[test]
    fn animated_raster_is_flagged() {
        let item = Item::image("https://example.com/a.gif").with_extension("gif");
        let mut stage = Stage::default();
        render(&item, &mut stage, &ctx());
        assert!(matches!(
            stage.content(),
            StageContent::Image { animated: true, .. }
        ));
    }

    #[test]
    fn script_scheme_image_degrades_with_image_error() {
        let item = Item::image("javascript:alert(1)");
        let mut stage = Stage::default();
        let result = render(&item, &mut stage, &ctx());

        assert!(stage.is_error_card());
        assert!(result.image_error);
        match stage.content() {
            StageContent::ErrorCard { failure, .. } => {
                assert!(matches!(failure, RenderFailure::UnsafeResource(_)));
            }
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[test]
    fn video_contributes_media_controls() {
        let item = Item::video("https://example.com/v.mp4").with_thumbnail("https://example.com/p.jpg");
        let mut stage = Stage::default();
        let result = render(&item, &mut stage, &ctx());

        match stage.content() {
            StageContent::Video {
                poster,
                native_fallback,
                ..
            } => {
                assert_eq!(poster.as_deref(), Some("https://example.com/p.jpg"));
                assert!(!native_fallback);
            }
            other => panic!("unexpected content: {other:?}"),
        }
        let toolbar = result.toolbar.expect("toolbar");
        assert_eq!(toolbar.len(), 2);
    }

    #[test]
    fn missing_video_backend_degrades_to_native() {
        let item = Item::video("https://example.com/v.mp4");
        let mut stage = Stage::default();
        let mut context = ctx();
        context.video_backend = false;
        render(&item, &mut stage, &context);

        assert!(matches!(
            stage.content(),
            StageContent::Video {
                native_fallback: true,
                ..
            }
        ));
    }

    #[test]
    fn document_gets_page_navigation_and_print() {
        let item = Item::document("https://example.com/d.pdf");
        let mut stage = Stage::default();
        let result = render(&item, &mut stage, &ctx());

        let toolbar = result.toolbar.expect("toolbar");
        let actions: Vec<_> = toolbar
            .iter()
            .filter_map(|e| e.as_button().and_then(|b| b.action.clone()))
            .collect();
        assert_eq!(
            actions,
            vec![
                ToolbarAction::PagePrev,
                ToolbarAction::PageNext,
                ToolbarAction::Print
            ]
        );
    }

    #[test]
    fn native_document_viewer_has_no_engine_toolbar() {
        let item = Item::document("https://example.com/d.pdf");
        let mut stage = Stage::default();
        let mut context = ctx();
        context.document_backend = false;
        let result = render(&item, &mut stage, &context);
        assert!(result.toolbar.is_none());
    }

    #[test]
    fn inline_text_shows_immediately() {
        let item = Item::inline_text("hello world");
        let mut stage = Stage::default();
        render(&item, &mut stage, &ctx());

        assert!(matches!(stage.content(), StageContent::Text { .. }));
        assert!(!stage.is_loading());
    }

    #[test]
    fn sourced_text_waits_for_the_fetch() {
        let item = Item {
            kind: ItemKind::InlineText,
            source: Some("https://example.com/a.txt".into()),
            ..Item::default()
        };
        let mut stage = Stage::default();
        render(&item, &mut stage, &ctx());

        assert!(stage.is_empty());
        assert!(stage.is_loading());
    }

    #[test]
    fn markup_without_content_is_a_missing_content_card() {
        let item = Item {
            kind: ItemKind::Markup,
            ..Item::default()
        };
        let mut stage = Stage::default();
        render(&item, &mut stage, &ctx());

        match stage.content() {
            StageContent::ErrorCard { failure, .. } => {
                assert_eq!(failure, &RenderFailure::MissingContent);
            }
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[test]
    fn error_kind_carries_the_collection_message() {
        let item = Item::error("upstream said no");
        let mut stage = Stage::default();
        render(&item, &mut stage, &ctx());

        match stage.content() {
            StageContent::ErrorCard { message, .. } => {
                assert_eq!(message, "upstream said no");
            }
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[test]
    fn data_uri_image_is_accepted() {
        let item = Item::image("data:image/png;base64,AAAA");
        let mut stage = Stage::default();
        render(&item, &mut stage, &ctx());
        assert!(matches!(stage.content(), StageContent::Image { .. }));
    }
}
