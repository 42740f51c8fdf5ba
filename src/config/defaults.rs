// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Zoom**: Scale bounds and step size for the transform engine
//! - **Slideshow**: Auto-advance interval bounds
//! - **Transitions**: Timed open/close and cross-fade durations
//! - **Gestures**: Swipe recognition thresholds
//! - **Resize**: Debounce window for viewport recompute

// ==========================================================================
// Zoom Defaults
// ==========================================================================

/// Default minimum zoom scale (1.0 = fit size).
pub const DEFAULT_ZOOM_MIN: f64 = 1.0;

/// Default maximum zoom scale.
pub const DEFAULT_ZOOM_MAX: f64 = 5.0;

/// Hard lower bound any configured minimum is clamped to.
pub const ZOOM_SCALE_FLOOR: f64 = 0.1;

/// Hard upper bound any configured maximum is clamped to.
pub const ZOOM_SCALE_CEILING: f64 = 20.0;

/// Default zoom step for wheel/keyboard zoom operations.
pub const DEFAULT_ZOOM_STEP: f64 = 0.5;

/// Minimum allowed zoom step.
pub const MIN_ZOOM_STEP: f64 = 0.05;

/// Maximum allowed zoom step.
pub const MAX_ZOOM_STEP: f64 = 4.0;

// ==========================================================================
// Slideshow Defaults
// ==========================================================================

/// Default auto-advance interval in seconds.
pub const DEFAULT_SLIDESHOW_INTERVAL_SECS: u64 = 4;

/// Minimum auto-advance interval in seconds.
pub const MIN_SLIDESHOW_INTERVAL_SECS: u64 = 1;

/// Maximum auto-advance interval in seconds.
pub const MAX_SLIDESHOW_INTERVAL_SECS: u64 = 600;

// ==========================================================================
// Transition Defaults
// ==========================================================================

/// Fade-out duration when navigating with a gesture transition (ms).
pub const FADE_OUT_MS: u64 = 280;

/// Fade-in duration for the incoming item of a gesture transition (ms).
pub const FADE_IN_MS: u64 = 320;

/// Close transition duration before teardown runs (ms).
pub const CLOSE_TRANSITION_MS: u64 = 300;

// ==========================================================================
// Gesture Defaults
// ==========================================================================

/// Minimum dominant horizontal travel to trigger prev/next (px).
pub const SWIPE_NAV_THRESHOLD_PX: f64 = 50.0;

/// Minimum dominant vertical travel to close the overlay (px).
pub const SWIPE_CLOSE_THRESHOLD_PX: f64 = 60.0;

// ==========================================================================
// Resize Defaults
// ==========================================================================

/// Debounce window for viewport resize recompute (ms).
pub const RESIZE_DEBOUNCE_MS: u64 = 150;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Zoom validation
    assert!(ZOOM_SCALE_FLOOR > 0.0);
    assert!(DEFAULT_ZOOM_MIN >= ZOOM_SCALE_FLOOR);
    assert!(DEFAULT_ZOOM_MAX > DEFAULT_ZOOM_MIN);
    assert!(DEFAULT_ZOOM_MAX <= ZOOM_SCALE_CEILING);
    assert!(MIN_ZOOM_STEP > 0.0);
    assert!(MAX_ZOOM_STEP > MIN_ZOOM_STEP);
    assert!(DEFAULT_ZOOM_STEP >= MIN_ZOOM_STEP);
    assert!(DEFAULT_ZOOM_STEP <= MAX_ZOOM_STEP);

    // Slideshow validation
    assert!(MIN_SLIDESHOW_INTERVAL_SECS > 0);
    assert!(MAX_SLIDESHOW_INTERVAL_SECS >= MIN_SLIDESHOW_INTERVAL_SECS);
    assert!(DEFAULT_SLIDESHOW_INTERVAL_SECS >= MIN_SLIDESHOW_INTERVAL_SECS);
    assert!(DEFAULT_SLIDESHOW_INTERVAL_SECS <= MAX_SLIDESHOW_INTERVAL_SECS);

    // Transition validation
    assert!(FADE_OUT_MS > 0);
    assert!(FADE_IN_MS > 0);
    assert!(CLOSE_TRANSITION_MS > 0);

    // Gesture validation
    assert!(SWIPE_NAV_THRESHOLD_PX > 0.0);
    assert!(SWIPE_CLOSE_THRESHOLD_PX > 0.0);
};
