// SPDX-License-Identifier: MPL-2.0
//! End-to-end controller scenarios: session lifecycle, boundary
//! navigation, takeover ordering, slideshow cadence and resource safety.

use lightstage::config::defaults::{CLOSE_TRANSITION_MS, FADE_OUT_MS};
use lightstage::item::Item;
use lightstage::overlay::{Controller, Phase};
use lightstage::render::{RenderContext, RenderResult};
use lightstage::session::SessionOptions;
use lightstage::stage::{Stage, StageContent};
use lightstage::toolbar::ToolbarAction;
use lightstage::keyboard::Key;
use kurbo::Size;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

fn gallery(n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| Item::image(format!("https://example.com/{i}.jpg")).with_title(format!("item {i}")))
        .collect()
}

fn controller() -> (Controller, Instant) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let now = Instant::now();
    let mut c = Controller::new();
    c.handle_resize(Size::new(1280.0, 720.0), now);
    (c, now)
}

/// Advances past the open/navigation fade so the controller is displaying.
fn settled(c: &mut Controller, now: Instant) -> Instant {
    let later = now + Duration::from_secs(1);
    c.tick(later);
    later
}

/// Drives a pending navigation transition to completion.
fn complete_transition(c: &mut Controller, now: Instant) -> Instant {
    let later = now + Duration::from_millis(FADE_OUT_MS);
    c.tick(later);
    later
}

#[test]
fn three_item_gallery_with_looping_off_stops_at_both_ends() {
    let (mut c, now) = controller();
    let mut options = SessionOptions::default();
    options.config.navigation.looping = false;
    c.open(gallery(3), 0, options, now);
    let now = settled(&mut c, now);

    // Previous at the first item is a silent no-op.
    c.prev(now);
    assert_eq!(c.phase(), Phase::Displaying);
    assert_eq!(c.current_index(), Some(0));
    assert!(!c.session().expect("session").has_prev());

    c.next(now);
    let now = complete_transition(&mut c, now);
    assert_eq!(c.current_index(), Some(1));

    c.next(now);
    let now = complete_transition(&mut c, now);
    assert_eq!(c.current_index(), Some(2));

    // Next at the last item is a silent no-op and the control disappears.
    c.next(now);
    assert_eq!(c.phase(), Phase::Displaying);
    assert_eq!(c.current_index(), Some(2));
    assert!(!c.session().expect("session").has_next());
}

#[test]
fn looping_wraps_and_the_index_stays_in_range() {
    let (mut c, now) = controller();
    c.open(gallery(3), 2, SessionOptions::default(), now);
    let mut now = settled(&mut c, now);

    for _ in 0..7 {
        c.next(now);
        now = complete_transition(&mut c, now);
        let index = c.current_index().expect("index");
        assert!(index < 3);
    }
    // 2 -> 0 -> 1 -> 2 -> 0 -> 1 -> 2 -> 0
    assert_eq!(c.current_index(), Some(0));
}

#[test]
fn arrow_keys_navigate() {
    let (mut c, now) = controller();
    c.open(gallery(3), 1, SessionOptions::default(), now);
    let now = settled(&mut c, now);

    c.handle_key(Key::ArrowRight, now);
    let now = complete_transition(&mut c, now);
    assert_eq!(c.current_index(), Some(2));

    c.handle_key(Key::ArrowLeft, now);
    let _ = complete_transition(&mut c, now);
    assert_eq!(c.current_index(), Some(1));
}

#[test]
fn takeover_tears_down_the_old_render_before_the_new_load() {
    let log: Rc<RefCell<Vec<String>>> = Rc::default();
    let (mut c, now) = controller();

    let sink = Rc::clone(&log);
    let mut options = SessionOptions::default();
    options.render_override = Some(Box::new(
        move |_item: &Item, stage: &mut Stage, _ctx: &RenderContext| {
            let sink = Rc::clone(&sink);
            stage.mount(StageContent::Text {
                body: "first gallery".into(),
            });
            Some(
                RenderResult::new()
                    .with_destroy(Box::new(move |_: &mut Stage| {
                        sink.borrow_mut().push("teardown first".into());
                    })),
            )
        },
    ));
    c.open(gallery(1), 0, options, now);

    let sink = Rc::clone(&log);
    c.hooks_mut().before_load = Some(Box::new(move |item: &Item, _index: usize| {
        sink.borrow_mut().push(format!("load {}", item.title));
    }));

    // Second open while the first session is active.
    c.open(gallery(2), 0, SessionOptions::default(), now);

    let log = log.borrow();
    assert_eq!(log.as_slice(), ["teardown first", "load item 0"]);
    assert!(c.is_scroll_locked());
}

#[test]
fn slideshow_advances_every_interval_and_pauses_cleanly() {
    let (mut c, now) = controller();
    let mut options = SessionOptions::default();
    options.config.slideshow.enabled = true;
    options.config.slideshow.auto_start = true;
    options.config.slideshow.interval_secs = 4;
    options.config.slideshow.progress_indicator = true;
    c.open(gallery(3), 0, options, now);

    // Just short of the interval: nothing moves.
    c.tick(now + Duration::from_millis(3_900));
    assert_eq!(c.current_index(), Some(0));

    // The interval elapses; the cross-fade then lands on item 1.
    let fire = now + Duration::from_secs(4);
    c.tick(fire);
    assert!(matches!(c.phase(), Phase::Transitioning { target: 1 }));
    let now = complete_transition(&mut c, fire);
    assert_eq!(c.current_index(), Some(1));

    // A fresh full interval armed at the new item's load.
    let progress = c.slideshow_progress(now).expect("progress");
    assert!(progress < 0.01);

    // Pause freezes it; resume re-arms a fresh interval.
    c.activate(&ToolbarAction::SlideshowToggle, now);
    assert!(c.slideshow_progress(now).is_none());
    c.tick(now + Duration::from_secs(30));
    assert_eq!(c.current_index(), Some(1));

    let resumed = now + Duration::from_secs(31);
    c.activate(&ToolbarAction::SlideshowToggle, resumed);
    c.tick(resumed + Duration::from_secs(4));
    assert!(matches!(c.phase(), Phase::Transitioning { target: 2 }));
}

#[test]
fn help_popup_suspends_a_running_slideshow() {
    let (mut c, now) = controller();
    let mut options = SessionOptions::default();
    options.config.slideshow.enabled = true;
    options.config.slideshow.auto_start = true;
    c.open(gallery(2), 0, options, now);

    c.toggle_help(now);
    c.tick(now + Duration::from_secs(60));
    assert_eq!(c.current_index(), Some(0));

    // Closing the popup restores a fresh full interval.
    let reopened = now + Duration::from_secs(61);
    c.handle_key(Key::Escape, reopened);
    assert!(!c.is_help_open());
    c.tick(reopened + Duration::from_secs(4));
    assert!(matches!(c.phase(), Phase::Transitioning { target: 1 }));
}

#[test]
fn script_scheme_image_degrades_without_download_or_footer() {
    let (mut c, now) = controller();
    c.open(vec![Item::image("javascript:alert(1)")], 0, SessionOptions::default(), now);

    assert!(c.stage().is_error_card());
    match c.stage().content() {
        StageContent::ErrorCard { failure, .. } => {
            assert_eq!(failure.key(), "stage-error-unsafe-resource");
        }
        other => panic!("unexpected content: {other:?}"),
    }

    let toolbar = c.toolbar();
    assert!(toolbar.entries.is_empty());
    assert!(!toolbar.footer_visible);
    assert!(!toolbar.zoom_widget);
}

#[test]
fn close_completes_and_restores_scroll_after_the_transition() {
    let log: Rc<RefCell<Vec<String>>> = Rc::default();
    let (mut c, now) = controller();
    c.open(gallery(2), 0, SessionOptions::default(), now);

    let sink = Rc::clone(&log);
    c.hooks_mut().pre_teardown = Some(Box::new(move || {
        sink.borrow_mut().push("pre-teardown".into());
    }));
    let sink = Rc::clone(&log);
    c.hooks_mut().after_close = Some(Box::new(move || {
        sink.borrow_mut().push("after-close".into());
    }));

    c.close(now);
    assert_eq!(c.phase(), Phase::Closing);
    // Scroll stays locked until the close transition finishes.
    assert!(c.is_scroll_locked());

    c.tick(now + Duration::from_millis(CLOSE_TRANSITION_MS));
    assert_eq!(c.phase(), Phase::Closed);
    assert!(!c.is_scroll_locked());
    assert_eq!(log.borrow().as_slice(), ["pre-teardown", "after-close"]);
}

#[test]
fn reopening_during_the_close_transition_keeps_the_lock() {
    let (mut c, now) = controller();
    c.open(gallery(2), 0, SessionOptions::default(), now);
    c.close(now);
    assert_eq!(c.phase(), Phase::Closing);

    c.open(gallery(1), 0, SessionOptions::default(), now);
    assert_eq!(c.phase(), Phase::Displaying);
    assert!(c.is_scroll_locked());

    // The abandoned close deadline must not fire later.
    c.tick(now + Duration::from_secs(5));
    assert!(c.is_open());
}

#[test]
fn media_end_advances_with_the_on_media_end_trigger() {
    let (mut c, now) = controller();
    let mut options = SessionOptions::default();
    options.config.slideshow.enabled = true;
    options.config.slideshow.auto_start = true;
    options.config.slideshow.trigger = lightstage::config::AdvanceTrigger::OnMediaEnd;
    let items = vec![
        Item::video("https://example.com/a.mp4"),
        Item::image("https://example.com/b.jpg"),
    ];
    c.open(items, 0, options, now);

    // The media finishes well before the 4 s fallback.
    let ended = now + Duration::from_secs(1);
    c.note_media_ended(ended);
    assert!(matches!(c.phase(), Phase::Transitioning { target: 1 }));

    // The fallback timer must not fire a second advance.
    let now = complete_transition(&mut c, ended);
    c.tick(now + Duration::from_millis(1));
    assert_eq!(c.current_index(), Some(1));
}

#[test]
fn slideshow_mnemonic_routes_to_the_visible_control() {
    let (mut c, now) = controller();
    let mut options = SessionOptions::default();
    options.config.slideshow.enabled = true;
    options.config.slideshow.auto_start = true;
    c.open(gallery(2), 0, options, now);
    assert!(c.slideshow_progress(now).is_some() || c.session().is_some());

    c.handle_key(Key::Char('s'), now);
    let running = c
        .session()
        .map(|s| s.slideshow.is_running())
        .unwrap_or(true);
    assert!(!running);
}

#[test]
fn download_mnemonic_fires_the_hook_for_a_safe_target() {
    let downloads: Rc<RefCell<Vec<String>>> = Rc::default();
    let (mut c, now) = controller();
    c.open(gallery(1), 0, SessionOptions::default(), now);

    let sink = Rc::clone(&downloads);
    c.hooks_mut().on_download = Some(Box::new(move |item: &Item| {
        if let Some(target) = item.download_target() {
            sink.borrow_mut().push(target.to_owned());
        }
    }));

    c.handle_key(Key::Char('d'), now);
    assert_eq!(
        downloads.borrow().as_slice(),
        ["https://example.com/0.jpg"]
    );
}

#[test]
fn generation_guard_discards_results_for_abandoned_loads() {
    let (mut c, now) = controller();
    let items = vec![
        Item {
            kind: lightstage::item::ItemKind::InlineText,
            source: Some("https://example.com/a.txt".into()),
            ..Item::default()
        },
        Item::image("https://example.com/b.jpg"),
    ];
    c.open(items, 0, SessionOptions::default(), now);
    let text_generation = c.generation();
    assert!(c.stage().is_loading());

    // Navigate away before the fetch lands.
    let now = settled(&mut c, now);
    c.next(now);
    let now = complete_transition(&mut c, now);

    c.note_text_loaded(text_generation, "too late", now);
    assert!(matches!(c.stage().content(), StageContent::Image { .. }));
}
