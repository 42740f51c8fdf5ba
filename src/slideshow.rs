// SPDX-License-Identifier: MPL-2.0
//! Slideshow scheduler: one deadline-based timer per session.
//!
//! The engine never spawns threads or timers of its own; the controller
//! polls the scheduler from `tick(now)` on the host's event loop. With the
//! on-media-end trigger, the media end signal races the armed interval
//! timer as a fallback: whichever fires first advances and cancels the
//! other.

use crate::config::{AdvanceTrigger, SlideshowConfig};
use std::time::{Duration, Instant};

/// Per-session auto-advance state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduler {
    enabled: bool,
    interval: Duration,
    trigger: AdvanceTrigger,
    progress_indicator: bool,
    user_paused: bool,
    deadline: Option<Instant>,
    armed_at: Option<Instant>,
    media_end_armed: bool,
}

impl Scheduler {
    #[must_use]
    pub fn new(config: &SlideshowConfig) -> Self {
        Self {
            enabled: config.enabled,
            interval: config.interval(),
            trigger: config.trigger,
            progress_indicator: config.progress_indicator,
            user_paused: !config.auto_start,
            deadline: None,
            armed_at: None,
            media_end_armed: false,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.user_paused
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Arms the timer for the item just loaded. No-op unless the slideshow
    /// is enabled, more than one item exists, and the user has not paused.
    /// `playable` reports whether the item exposes a playable media
    /// element; with the on-media-end trigger that arms the race listener.
    pub fn arm_for_item(&mut self, now: Instant, item_count: usize, playable: bool) {
        self.cancel();
        if !self.enabled || item_count <= 1 || self.user_paused {
            return;
        }
        self.deadline = Some(now + self.interval);
        self.armed_at = Some(now);
        self.media_end_armed = self.trigger == AdvanceTrigger::OnMediaEnd && playable;
    }

    /// Cancels any armed timer and media-end listener.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.armed_at = None;
        self.media_end_armed = false;
    }

    /// User pause: clears the timer; the progress indicator disappears
    /// with it.
    pub fn pause(&mut self) {
        self.user_paused = true;
        self.cancel();
    }

    /// User resume: re-arms a fresh full-length timer. Progress restarts
    /// from zero, never mid-way.
    pub fn resume(&mut self, now: Instant, item_count: usize, playable: bool) {
        self.user_paused = false;
        self.arm_for_item(now, item_count, playable);
    }

    /// Toggles pause/resume; returns true when running afterwards.
    pub fn toggle(&mut self, now: Instant, item_count: usize, playable: bool) -> bool {
        if self.user_paused {
            self.resume(now, item_count, playable);
        } else {
            self.pause();
        }
        self.is_running()
    }

    /// Suspends a running timer (keyboard-shortcuts popup opened).
    /// Returns whether it had been running, for the matching `restore`.
    pub fn suspend(&mut self) -> bool {
        let was_running = self.is_running();
        self.cancel();
        was_running
    }

    /// Restores after a popup closes, with a full fresh interval, only if
    /// the timer had been running.
    pub fn restore(&mut self, now: Instant, item_count: usize, playable: bool, was_running: bool) {
        if was_running {
            self.arm_for_item(now, item_count, playable);
        }
    }

    /// Polls the timer. Returns true exactly once when the deadline
    /// passes; firing cancels the media-end race.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.cancel();
                true
            }
            _ => false,
        }
    }

    /// The current media signaled completion. Returns true if that should
    /// advance the slideshow now; doing so cancels the interval fallback.
    pub fn note_media_ended(&mut self) -> bool {
        if self.media_end_armed {
            self.cancel();
            true
        } else {
            false
        }
    }

    /// Progress fraction of the running interval, if the indicator is
    /// configured and the timer is armed.
    #[must_use]
    pub fn progress(&self, now: Instant) -> Option<f64> {
        if !self.progress_indicator {
            return None;
        }
        let armed_at = self.armed_at?;
        let elapsed = now.saturating_duration_since(armed_at).as_secs_f64();
        Some((elapsed / self.interval.as_secs_f64()).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(auto_start: bool) -> SlideshowConfig {
        SlideshowConfig {
            enabled: true,
            interval_secs: 4,
            auto_start,
            trigger: AdvanceTrigger::Interval,
            progress_indicator: true,
        }
    }

    #[test]
    fn arm_sets_a_full_interval_deadline() {
        let now = Instant::now();
        let mut s = Scheduler::new(&config(true));
        s.arm_for_item(now, 2, false);

        assert!(s.is_running());
        assert_eq!(s.deadline(), Some(now + Duration::from_secs(4)));
        assert!(!s.poll(now + Duration::from_millis(3999)));
        assert!(s.poll(now + Duration::from_secs(4)));
        // Fires exactly once.
        assert!(!s.poll(now + Duration::from_secs(5)));
    }

    #[test]
    fn single_item_or_disabled_never_arms() {
        let now = Instant::now();
        let mut s = Scheduler::new(&config(true));
        s.arm_for_item(now, 1, false);
        assert!(!s.is_running());

        let mut disabled = SlideshowConfig::default();
        disabled.enabled = false;
        let mut s = Scheduler::new(&disabled);
        s.arm_for_item(now, 5, false);
        assert!(!s.is_running());
    }

    #[test]
    fn auto_start_false_starts_paused() {
        let now = Instant::now();
        let mut s = Scheduler::new(&config(false));
        assert!(s.is_paused());
        s.arm_for_item(now, 2, false);
        assert!(!s.is_running());
    }

    #[test]
    fn pause_cancels_and_resume_rearms_fresh() {
        let now = Instant::now();
        let mut s = Scheduler::new(&config(true));
        s.arm_for_item(now, 2, false);

        let later = now + Duration::from_secs(3);
        s.pause();
        assert!(!s.is_running());
        assert_eq!(s.progress(later), None);

        s.resume(later, 2, false);
        assert_eq!(s.deadline(), Some(later + Duration::from_secs(4)));
        // Progress restarted from zero.
        let progress = s.progress(later).expect("progress");
        assert!(progress.abs() < 1e-9);
    }

    #[test]
    fn media_end_race_advances_and_cancels_the_timer() {
        let now = Instant::now();
        let mut cfg = config(true);
        cfg.trigger = AdvanceTrigger::OnMediaEnd;
        let mut s = Scheduler::new(&cfg);

        s.arm_for_item(now, 2, true);
        assert!(s.note_media_ended());
        // Timer fallback was cancelled by the media-end advance.
        assert!(!s.poll(now + Duration::from_secs(10)));
    }

    #[test]
    fn timer_firing_cancels_the_media_end_listener() {
        let now = Instant::now();
        let mut cfg = config(true);
        cfg.trigger = AdvanceTrigger::OnMediaEnd;
        let mut s = Scheduler::new(&cfg);

        s.arm_for_item(now, 2, true);
        assert!(s.poll(now + Duration::from_secs(4)));
        assert!(!s.note_media_ended());
    }

    #[test]
    fn interval_trigger_ignores_media_end() {
        let now = Instant::now();
        let mut s = Scheduler::new(&config(true));
        s.arm_for_item(now, 2, true);
        assert!(!s.note_media_ended());
        assert!(s.is_running());
    }

    #[test]
    fn suspend_and_restore_for_the_help_popup() {
        let now = Instant::now();
        let mut s = Scheduler::new(&config(true));
        s.arm_for_item(now, 2, false);

        let was_running = s.suspend();
        assert!(was_running);
        assert!(!s.is_running());

        let later = now + Duration::from_secs(30);
        s.restore(later, 2, false, was_running);
        assert_eq!(s.deadline(), Some(later + Duration::from_secs(4)));
    }

    #[test]
    fn restore_does_nothing_if_it_was_not_running() {
        let now = Instant::now();
        let mut s = Scheduler::new(&config(false));
        let was_running = s.suspend();
        assert!(!was_running);
        s.restore(now, 2, false, was_running);
        assert!(!s.is_running());
    }

    #[test]
    fn progress_tracks_the_elapsed_fraction() {
        let now = Instant::now();
        let mut s = Scheduler::new(&config(true));
        s.arm_for_item(now, 2, false);

        let half = s.progress(now + Duration::from_secs(2)).expect("progress");
        assert!((half - 0.5).abs() < 1e-9);

        let capped = s.progress(now + Duration::from_secs(60)).expect("progress");
        assert!((capped - 1.0).abs() < 1e-9);
    }
}
