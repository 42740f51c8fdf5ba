// SPDX-License-Identifier: MPL-2.0
//! The overlay controller.
//!
//! One controller owns at most one active session and the chrome around
//! it: the stage, the transform, the resolved toolbar, theme and popup
//! flags, and every deferred deadline (cross-fade transitions, close
//! animation, slideshow, debounced resize). The engine is single-threaded
//! and cooperative; the host calls [`Controller::tick`] from its event
//! loop and reports async completions explicitly, tagged with the load
//! generation they belong to.

use crate::config::defaults::{CLOSE_TRANSITION_MS, FADE_IN_MS, FADE_OUT_MS, RESIZE_DEBOUNCE_MS};
use crate::config::Config;
use crate::error::RenderFailure;
use crate::focus::FocusTrap;
use crate::gesture::{SwipeOutcome, SwipeTracker};
use crate::hooks::Hooks;
use crate::item::{Item, ItemKind};
use crate::keyboard::{self, Key, KeyCommand, KeyContext};
use crate::render::{self, RenderContext};
use crate::session::{Session, SessionOptions};
use crate::stage::{Stage, StageContent};
use crate::theme::ThemeMode;
use crate::toolbar::{self, ResolveRequest, ResolvedToolbar, ToolbarAction, ToolbarContext};
use crate::transform::{Layout, Transform};
use kurbo::{Point, Size};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Overlay lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Opening,
    Displaying,
    /// Cross-fading toward another item.
    Transitioning { target: usize },
    Closing,
}

/// The singleton overlay controller.
pub struct Controller {
    phase: Phase,
    /// Chrome has been built; building is lazy and happens once.
    built: bool,
    session: Option<Session>,
    stage: Stage,
    transform: Transform,
    theme: ThemeMode,
    hooks: Hooks,
    toolbar: ResolvedToolbar,

    /// Monotonic load generation; stale async completions are dropped.
    generation: u64,
    /// The current render came from the caller override.
    overridden: bool,
    natural_size: Option<Size>,
    fit_size: Size,

    carousel_open: bool,
    help_open: bool,
    fullscreen: bool,
    scroll_locked: bool,
    media_playing: bool,
    muted: bool,

    transition_deadline: Option<Instant>,
    settle_deadline: Option<Instant>,
    close_deadline: Option<Instant>,
    resize_deadline: Option<Instant>,
    pending_viewport: Option<Size>,

    focus_trap: FocusTrap,
    saved_focus: Option<String>,
    swipe: SwipeTracker,
    slideshow_was_running: bool,

    video_backend: bool,
    audio_backend: bool,
    document_backend: bool,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Closed,
            built: false,
            session: None,
            stage: Stage::default(),
            transform: Transform::default(),
            theme: ThemeMode::default(),
            hooks: Hooks::default(),
            toolbar: ResolvedToolbar::default(),
            generation: 0,
            overridden: false,
            natural_size: None,
            fit_size: Size::ZERO,
            carousel_open: false,
            help_open: false,
            fullscreen: false,
            scroll_locked: false,
            media_playing: false,
            muted: false,
            transition_deadline: None,
            settle_deadline: None,
            close_deadline: None,
            resize_deadline: None,
            pending_viewport: None,
            focus_trap: FocusTrap::default(),
            saved_focus: None,
            swipe: SwipeTracker::default(),
            slideshow_was_running: false,
            video_backend: true,
            audio_backend: true,
            document_backend: true,
        }
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self.phase, Phase::Closed)
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(Session::current_index)
    }

    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[must_use]
    pub fn toolbar(&self) -> &ResolvedToolbar {
        &self.toolbar
    }

    #[must_use]
    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    #[must_use]
    pub fn is_help_open(&self) -> bool {
        self.help_open
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    #[must_use]
    pub fn is_carousel_open(&self) -> bool {
        self.carousel_open
    }

    #[must_use]
    pub fn is_media_playing(&self) -> bool {
        self.media_playing
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Slideshow progress fraction, when configured and running.
    #[must_use]
    pub fn slideshow_progress(&self, now: Instant) -> Option<f64> {
        self.session.as_ref().and_then(|s| s.slideshow.progress(now))
    }

    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    pub fn focus_trap_mut(&mut self) -> &mut FocusTrap {
        &mut self.focus_trap
    }

    /// Records the element holding focus before the overlay took over, for
    /// restoration after close (focus management mode).
    pub fn save_focus(&mut self, target: impl Into<String>) {
        self.saved_focus = Some(target.into());
    }

    /// Takes the focus target saved before open; the host restores it
    /// after the overlay has fully closed.
    pub fn take_saved_focus(&mut self) -> Option<String> {
        self.saved_focus.take()
    }

    /// Reports which optional playback/viewer backends the host detected.
    pub fn set_backend_availability(&mut self, video: bool, audio: bool, document: bool) {
        self.video_backend = video;
        self.audio_backend = audio;
        self.document_backend = document;
    }

    fn config(&self) -> Option<&Config> {
        self.session.as_ref().map(|s| &s.options.config)
    }

    fn layout(&self) -> Layout {
        Layout::new(self.fit_size, self.stage.viewport())
    }

    // -------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------

    /// Opens the overlay on a gallery.
    ///
    /// Opening while another session is active is a takeover: the previous
    /// render result is torn down synchronously before the new session
    /// starts. An out-of-range start index is clamped into range.
    pub fn open(
        &mut self,
        items: Vec<Item>,
        start_index: usize,
        options: SessionOptions,
        now: Instant,
    ) {
        if items.is_empty() {
            warn!("ignoring open with no items");
            return;
        }

        if self.session.is_some() {
            debug!("takeover: tearing down the active session");
            self.teardown_current_render();
            self.cancel_deadlines();
        }

        self.ensure_built();

        if start_index >= items.len() {
            debug!(
                start_index,
                item_count = items.len(),
                "start index out of range, clamping"
            );
        }

        self.theme = options.config.general.theme_mode;
        self.session = Some(Session::new(items, start_index, options));
        self.scroll_locked = true;
        self.help_open = false;
        self.carousel_open = false;
        self.fullscreen = false;
        self.muted = false;
        self.slideshow_was_running = false;
        self.phase = Phase::Opening;

        debug!("opening overlay");
        self.load_current(now);
        self.phase = Phase::Displaying;
        self.settle_deadline = Some(now + Duration::from_millis(FADE_IN_MS));
    }

    /// Closes the overlay. Idempotent; the close transition completes on a
    /// later [`tick`](Self::tick).
    pub fn close(&mut self, now: Instant) {
        if matches!(self.phase, Phase::Closed | Phase::Closing) {
            return;
        }
        debug!("closing overlay");

        self.cancel_deadlines();
        if let Some(session) = &mut self.session {
            session.slideshow.cancel();
        }

        self.hooks.fire_pre_teardown();

        // The overlay owns its fullscreen; closing always exits it.
        self.fullscreen = false;
        self.help_open = false;
        self.carousel_open = false;
        self.media_playing = false;
        self.swipe.cancel();
        self.focus_trap.clear();
        self.toolbar = ResolvedToolbar::default();

        self.phase = Phase::Closing;
        self.close_deadline = Some(now + Duration::from_millis(CLOSE_TRANSITION_MS));
    }

    /// Advances time: completes transitions and the close animation, fires
    /// due slideshow advances, and applies a settled resize.
    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.close_deadline {
            if now >= deadline {
                self.close_deadline = None;
                self.finish_close();
                return;
            }
        }

        if let (Phase::Transitioning { target }, Some(deadline)) =
            (self.phase, self.transition_deadline)
        {
            if now >= deadline {
                self.transition_deadline = None;
                if let Some(session) = &mut self.session {
                    session.set_index(target);
                }
                self.load_current(now);
                self.phase = Phase::Displaying;
                self.settle_deadline = Some(now + Duration::from_millis(FADE_IN_MS));
            }
        }

        if let Some(deadline) = self.settle_deadline {
            if now >= deadline {
                self.settle_deadline = None;
                if let Some(index) = self.current_index() {
                    self.hooks.fire_after_display_settled(index);
                }
            }
        }

        if let Some(deadline) = self.resize_deadline {
            if now >= deadline {
                self.resize_deadline = None;
                if let Some(viewport) = self.pending_viewport.take() {
                    self.apply_viewport(viewport);
                }
            }
        }

        let fired = self
            .session
            .as_mut()
            .is_some_and(|s| s.slideshow.poll(now));
        if fired && self.phase == Phase::Displaying {
            debug!("slideshow interval elapsed");
            self.advance_slideshow(now);
        }
    }

    fn finish_close(&mut self) {
        // The content stays mounted through the fade; teardown runs once
        // the transition completes.
        self.teardown_current_render();
        self.session = None;
        self.scroll_locked = false;
        self.phase = Phase::Closed;
        self.stage.clear();
        debug!("overlay closed");
        self.hooks.fire_after_close();
    }

    fn ensure_built(&mut self) {
        if !self.built {
            debug!("building overlay chrome");
            self.built = true;
        }
    }

    fn cancel_deadlines(&mut self) {
        self.transition_deadline = None;
        self.settle_deadline = None;
        self.close_deadline = None;
        self.resize_deadline = None;
        self.pending_viewport = None;
    }

    fn teardown_current_render(&mut self) {
        if let Some(session) = &mut self.session {
            if let Some(result) = session.take_render_result() {
                result.teardown(&mut self.stage);
                return;
            }
        }
        self.stage.clear();
    }

    // -------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------

    fn load_current(&mut self, now: Instant) {
        let (item, index, count) = match &self.session {
            Some(session) => match session.current_item() {
                Some(item) => (item.clone(), session.current_index(), session.item_count()),
                None => return,
            },
            None => return,
        };

        self.teardown_current_render();
        self.hooks.fire_before_load(&item, index);

        self.generation = self.generation.wrapping_add(1);
        self.natural_size = None;
        self.fit_size = self.stage.viewport();
        self.media_playing = false;

        let ctx = RenderContext {
            generation: self.generation,
            index,
            item_count: count,
            video_backend: self.video_backend,
            audio_backend: self.audio_backend,
            document_backend: self.document_backend,
        };

        let Some(session) = &mut self.session else {
            return;
        };
        let zoom = &session.options.config.zoom;
        self.transform = Transform::new(zoom.bounds(), zoom.clamped_step());
        self.transform.set_pinned(item.pins_pan());

        let outcome = render::dispatch(
            &item,
            &mut self.stage,
            &ctx,
            session.options.render_override.as_deref_mut(),
        );
        self.overridden = outcome.overridden;
        session.render_result = Some(outcome.result);
        session.poll_selection = None;

        let playable = self.stage.has_playable_media();
        session.slideshow.arm_for_item(now, count, playable);

        self.resolve_toolbar();
        self.hooks.fire_after_item_displayed(&item, index);
    }

    fn resolve_toolbar(&mut self) {
        let Some(session) = &mut self.session else {
            self.toolbar = ResolvedToolbar::default();
            return;
        };
        let Some(item) = session.current_item().cloned() else {
            self.toolbar = ResolvedToolbar::default();
            return;
        };

        let config = &session.options.config;
        let stage_only = config.general.stage_only;
        let slideshow_enabled = config.slideshow.enabled;
        let download_enabled = config.general.download_enabled;
        let zoom_enabled = config.zoom.enabled;
        let item_count = session.item_count();

        let renderer_toolbar = session
            .render_result
            .as_ref()
            .and_then(|r| r.toolbar.clone());
        let image_error = session
            .render_result
            .as_ref()
            .is_some_and(|r| r.image_error);
        let custom = session.options.custom_toolbar.clone();

        let req = ResolveRequest {
            renderer_toolbar,
            overridden: self.overridden,
            item: &item,
            item_count,
            stage_only,
            image_error,
            poll_active: item.has_poll(),
            slideshow_enabled,
            download_enabled,
            zoom_enabled,
            custom_entries: &custom,
        };

        let modifier = session.options.toolbar_modifier.as_deref_mut();
        let mut resolved = toolbar::resolve(req, modifier);
        if let Some(replacement) = self.hooks.fire_toolbar_resolved(&resolved.entries) {
            resolved.entries = replacement;
        }
        self.toolbar = resolved;
    }

    fn toolbar_context(&self) -> ToolbarContext {
        let (kind, index, count, running) = match &self.session {
            Some(session) => (
                session
                    .current_item()
                    .map(Item::effective_kind)
                    .unwrap_or_default(),
                session.current_index(),
                session.item_count(),
                session.slideshow.is_running(),
            ),
            None => (ItemKind::default(), 0, 0, false),
        };
        ToolbarContext {
            item_kind: kind,
            index,
            item_count: count,
            media_playing: self.media_playing,
            muted: self.muted,
            fullscreen: self.fullscreen,
            slideshow_running: running,
        }
    }

    // -------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------

    /// Moves to the next item, honoring the looping setting. A boundary
    /// with looping off is a silent no-op.
    pub fn next(&mut self, now: Instant) {
        let target = self.session.as_ref().and_then(Session::next_index);
        match target {
            Some(target) => self.begin_transition(target, now),
            None => debug!("next at boundary, ignoring"),
        }
    }

    /// Moves to the previous item, honoring the looping setting.
    pub fn prev(&mut self, now: Instant) {
        let target = self.session.as_ref().and_then(Session::prev_index);
        match target {
            Some(target) => self.begin_transition(target, now),
            None => debug!("prev at boundary, ignoring"),
        }
    }

    /// Jumps directly to an index (carousel click). Out-of-range indexes
    /// are clamped.
    pub fn go_to(&mut self, index: usize, now: Instant) {
        let Some(session) = &self.session else {
            return;
        };
        if session.is_empty() {
            return;
        }
        let target = index.min(session.item_count() - 1);
        if target != session.current_index() {
            self.begin_transition(target, now);
        }
    }

    fn begin_transition(&mut self, target: usize, now: Instant) {
        if !matches!(self.phase, Phase::Displaying | Phase::Transitioning { .. }) {
            return;
        }
        if let Some(session) = &mut self.session {
            // Manual navigation restarts the slideshow cadence; the timer
            // re-arms when the target item loads.
            session.slideshow.cancel();
        }
        self.swipe.cancel();
        self.settle_deadline = None;
        self.phase = Phase::Transitioning { target };
        self.transition_deadline = Some(now + Duration::from_millis(FADE_OUT_MS));
    }

    fn advance_slideshow(&mut self, now: Instant) {
        let target = self.session.as_ref().and_then(Session::next_index);
        match target {
            Some(target) => self.begin_transition(target, now),
            // Looping off at the last item: the show simply ends.
            None => debug!("slideshow reached the end"),
        }
    }

    // -------------------------------------------------------------------
    // Keyboard
    // -------------------------------------------------------------------

    pub fn handle_key(&mut self, key: Key, now: Instant) {
        if !self.is_open() {
            return;
        }
        let ctx = KeyContext {
            help_open: self.help_open,
            fullscreen: self.fullscreen,
            accessibility: self
                .config()
                .is_some_and(|c| c.general.focus_management),
        };
        match keyboard::route(key, &ctx) {
            KeyCommand::None => {}
            KeyCommand::CloseHelp => self.close_help(now),
            KeyCommand::ExitFullscreen => self.fullscreen = false,
            KeyCommand::CloseOverlay => self.close(now),
            KeyCommand::Prev => self.prev(now),
            KeyCommand::Next => self.next(now),
            KeyCommand::ZoomIn => self.zoom_in_at(Point::ZERO),
            KeyCommand::ZoomOut => self.zoom_out_at(Point::ZERO),
            KeyCommand::FocusNext => {
                self.focus_trap.forward();
            }
            KeyCommand::FocusPrev => {
                self.focus_trap.backward();
            }
            KeyCommand::Mnemonic(c) => self.dispatch_mnemonic(c, now),
        }
    }

    fn dispatch_mnemonic(&mut self, mnemonic: char, now: Instant) {
        if let Some(action) = keyboard::reserved_action(mnemonic) {
            if self.mnemonic_target_visible(&action) {
                self.activate(&action, now);
            }
            return;
        }

        let ctx = self.toolbar_context();
        if let Some((shortcut, action)) = keyboard::custom_mnemonic(&self.toolbar.entries, &ctx) {
            if shortcut == mnemonic {
                self.activate(&action, now);
            }
        }
    }

    /// A reserved mnemonic only fires when its control is actually shown.
    fn mnemonic_target_visible(&self, action: &ToolbarAction) -> bool {
        match action {
            // Chrome-level controls, present whenever the overlay is.
            ToolbarAction::Help | ToolbarAction::Theme | ToolbarAction::Fullscreen => true,
            ToolbarAction::Carousel => self
                .config()
                .is_some_and(|c| c.general.carousel && !c.general.stage_only),
            _ => {
                let ctx = self.toolbar_context();
                self.toolbar.entries.iter().any(|entry| {
                    entry
                        .as_button()
                        .is_some_and(|b| b.action.as_ref() == Some(action) && b.is_visible(&ctx))
                })
            }
        }
    }

    /// Performs a toolbar action. Actions the engine has no state for
    /// (page navigation, rotation, custom ids) are the host's to handle.
    pub fn activate(&mut self, action: &ToolbarAction, now: Instant) {
        match action {
            ToolbarAction::MediaPlayPause => {
                if self.stage.has_playable_media() {
                    self.media_playing = !self.media_playing;
                }
            }
            ToolbarAction::Mute => self.muted = !self.muted,
            ToolbarAction::Download => self.download_current(),
            ToolbarAction::Fullscreen => self.fullscreen = !self.fullscreen,
            ToolbarAction::Theme => self.toggle_theme(),
            ToolbarAction::Carousel => self.carousel_open = !self.carousel_open,
            ToolbarAction::SlideshowToggle => self.toggle_slideshow(now),
            ToolbarAction::Help => self.toggle_help(now),
            ToolbarAction::ZoomIn => self.zoom_in_at(Point::ZERO),
            ToolbarAction::ZoomOut => self.zoom_out_at(Point::ZERO),
            ToolbarAction::ZoomReset => self.zoom_reset(),
            ToolbarAction::Print
            | ToolbarAction::RotateClockwise
            | ToolbarAction::PageNext
            | ToolbarAction::PagePrev
            | ToolbarAction::Custom(_) => {}
        }
    }

    fn download_current(&mut self) {
        let item = match &self.session {
            Some(session) => match session.current_item() {
                Some(item) => item.clone(),
                None => return,
            },
            None => return,
        };
        let safe = item
            .download_target()
            .is_some_and(crate::safety::is_safe_download_uri);
        if safe {
            self.hooks.fire_download(&item);
        } else {
            warn!("rejecting download with unsafe target");
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        debug!(theme = ?self.theme, "theme toggled");
        self.hooks.fire_theme_change(self.theme);
    }

    fn toggle_slideshow(&mut self, now: Instant) {
        let playable = self.stage.has_playable_media();
        if let Some(session) = &mut self.session {
            let count = session.item_count();
            session.slideshow.toggle(now, count, playable);
        }
    }

    // -------------------------------------------------------------------
    // Help popup
    // -------------------------------------------------------------------

    pub fn toggle_help(&mut self, now: Instant) {
        if self.help_open {
            self.close_help(now);
        } else {
            self.open_help();
        }
    }

    fn open_help(&mut self) {
        if self.help_open {
            return;
        }
        self.help_open = true;
        if let Some(session) = &mut self.session {
            self.slideshow_was_running = session.slideshow.suspend();
        }
    }

    fn close_help(&mut self, now: Instant) {
        if !self.help_open {
            return;
        }
        self.help_open = false;
        let playable = self.stage.has_playable_media();
        let was_running = self.slideshow_was_running;
        self.slideshow_was_running = false;
        if let Some(session) = &mut self.session {
            let count = session.item_count();
            session.slideshow.restore(now, count, playable, was_running);
        }
    }

    // -------------------------------------------------------------------
    // Zoom and gestures
    // -------------------------------------------------------------------

    /// Whether the current content accepts zoom at all.
    #[must_use]
    pub fn is_zoomable(&self) -> bool {
        if self.overridden || !matches!(self.stage.content(), StageContent::Image { .. }) {
            return false;
        }
        self.config().is_some_and(|c| c.zoom.enabled)
    }

    /// Zooms in one step, anchored at `anchor` (viewport-center relative).
    pub fn zoom_in_at(&mut self, anchor: Point) {
        if !self.is_zoomable() {
            return;
        }
        let layout = self.layout();
        if self.transform.zoom_in(anchor, layout) {
            self.hooks.fire_zoom_change(self.transform.scale());
        }
    }

    /// Zooms out one step, anchored at `anchor`.
    pub fn zoom_out_at(&mut self, anchor: Point) {
        if !self.is_zoomable() {
            return;
        }
        let layout = self.layout();
        if self.transform.zoom_out(anchor, layout) {
            self.hooks.fire_zoom_change(self.transform.scale());
        }
    }

    /// Resets the transform to identity (double click/tap).
    pub fn zoom_reset(&mut self) {
        if !self.transform.is_zoomed() && self.transform.pan() == kurbo::Vec2::ZERO {
            return;
        }
        self.transform.reset();
        self.hooks.fire_zoom_change(self.transform.scale());
    }

    /// A pointer or single touch went down on the stage.
    pub fn pointer_down(&mut self, position: Point) {
        if self.phase != Phase::Displaying {
            return;
        }
        if self.transform.is_zoomed() {
            self.transform.begin_drag(position);
        } else {
            self.swipe.begin(position);
        }
    }

    /// The pointer moved while down; continues a drag-pan if one is active.
    pub fn pointer_move(&mut self, position: Point) {
        let layout = self.layout();
        self.transform.drag_to(position, layout);
    }

    /// The pointer lifted: ends a drag-pan or classifies a swipe.
    pub fn pointer_up(&mut self, position: Point, now: Instant) {
        if self.transform.is_dragging() {
            self.transform.end_drag();
            self.swipe.cancel();
            return;
        }

        let outcome = self.swipe.end(position);
        // Gesture navigation is suppressed while zoomed or pinching.
        if self.transform.is_zoomed() || self.transform.is_pinching() {
            return;
        }
        match outcome {
            SwipeOutcome::Next => self.next(now),
            SwipeOutcome::Prev => self.prev(now),
            SwipeOutcome::Close => {
                if self.config().is_some_and(|c| c.general.backdrop_close) {
                    self.close(now);
                }
            }
            SwipeOutcome::None => {}
        }
    }

    /// A second touch went down: a pinch takes over from any swipe.
    pub fn pinch_begin(&mut self, first: Point, second: Point) {
        if !self.is_zoomable() {
            return;
        }
        self.swipe.cancel();
        self.transform.pinch_begin(first, second);
    }

    pub fn pinch_update(&mut self, first: Point, second: Point) {
        let layout = self.layout();
        if self.transform.pinch_update(first, second, layout) {
            self.hooks.fire_zoom_change(self.transform.scale());
        }
    }

    /// A touch lifted during a pinch. With one finger remaining, the
    /// gesture continues as a drag anchored at that finger.
    pub fn pinch_end(&mut self, remaining: Option<Point>) {
        self.transform.pinch_end(remaining);
    }

    // -------------------------------------------------------------------
    // Viewport
    // -------------------------------------------------------------------

    /// Reports a viewport resize. While open, the fit recompute is
    /// debounced; closed, it applies immediately.
    pub fn handle_resize(&mut self, viewport: Size, now: Instant) {
        if self.is_open() {
            self.pending_viewport = Some(viewport);
            self.resize_deadline = Some(now + Duration::from_millis(RESIZE_DEBOUNCE_MS));
        } else {
            self.apply_viewport(viewport);
        }
    }

    fn apply_viewport(&mut self, viewport: Size) {
        self.stage.set_viewport(viewport);
        self.recompute_fit();
        let layout = self.layout();
        self.transform.clamp_pan(layout);
    }

    fn recompute_fit(&mut self) {
        let viewport = self.stage.viewport();
        self.fit_size = match self.natural_size {
            Some(natural)
                if natural.width > 0.0 && natural.height > 0.0 && viewport.width > 0.0 =>
            {
                let ratio = (viewport.width / natural.width)
                    .min(viewport.height / natural.height);
                Size::new(natural.width * ratio, natural.height * ratio)
            }
            _ => viewport,
        };
    }

    // -------------------------------------------------------------------
    // Async completions
    // -------------------------------------------------------------------

    /// The resource for load `generation` finished decoding with the given
    /// natural size. Stale completions are dropped.
    pub fn note_load_complete(&mut self, generation: u64, natural: Size, _now: Instant) {
        if !self.accept_completion(generation) {
            return;
        }
        self.stage.set_loading(false);
        self.natural_size = Some(natural);
        self.recompute_fit();
        let layout = self.layout();
        self.transform.clamp_pan(layout);
    }

    /// The resource for load `generation` failed. Degrades the stage to an
    /// inline error card; for images this also flags the error state,
    /// which suppresses toolbar and download.
    pub fn note_load_failed(&mut self, generation: u64, message: impl Into<String>, _now: Instant) {
        if !self.accept_completion(generation) {
            return;
        }
        let message = message.into();
        warn!(%message, "resource load failed");

        let was_image = matches!(self.stage.content(), StageContent::Image { .. });
        self.stage.set_loading(false);
        self.stage.mount(StageContent::ErrorCard {
            message: message.clone(),
            failure: RenderFailure::LoadFailure(message),
        });
        if let Some(session) = &mut self.session {
            if let Some(result) = &mut session.render_result {
                result.image_error = was_image;
            }
        }
        self.resolve_toolbar();
    }

    /// The text fetch for load `generation` completed.
    pub fn note_text_loaded(&mut self, generation: u64, body: impl Into<String>, _now: Instant) {
        if !self.accept_completion(generation) {
            return;
        }
        self.stage.set_loading(false);
        self.stage.mount(StageContent::Text { body: body.into() });
    }

    /// The current playable media signaled completion; advances the
    /// slideshow when the on-media-end trigger armed for it.
    pub fn note_media_ended(&mut self, now: Instant) {
        self.media_playing = false;
        let advance = self
            .session
            .as_mut()
            .is_some_and(|s| s.slideshow.note_media_ended());
        if advance {
            debug!("media ended, advancing slideshow");
            self.advance_slideshow(now);
        }
    }

    fn accept_completion(&mut self, generation: u64) -> bool {
        if !self.is_open() || generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "dropping stale completion"
            );
            return false;
        }
        true
    }

    // -------------------------------------------------------------------
    // Poll row
    // -------------------------------------------------------------------

    /// Changes the poll selection for the current item; `None` clears it.
    pub fn select_poll_option(&mut self, option_id: Option<&str>) {
        let Some(session) = &mut self.session else {
            return;
        };
        let active = session.current_item().is_some_and(Item::has_poll);
        if !active {
            return;
        }
        session.poll_selection = option_id.map(str::to_owned);
        self.hooks.fire_poll_selection(option_id);
    }
}
