// SPDX-License-Identifier: MPL-2.0
//! Transform engine: zoom/pan/pinch math over the content plane.
//!
//! The model is a continuous scale within configured bounds and a pan
//! offset in pixels, applied translate-then-scale about the content's own
//! center. Anchor points are expressed relative to the viewport center.
//!
//! Wheel, keyboard and pinch zoom all use the same fixed-point rule:
//! `new_pan = anchor - (new_scale / old_scale) * (anchor - old_pan)`,
//! so the content point under the anchor stays visually stationary.

use crate::config::defaults::{ZOOM_SCALE_CEILING, ZOOM_SCALE_FLOOR};
use kurbo::{Point, Size, Vec2};

/// Scale threshold above which content counts as zoomed.
const ZOOM_EPSILON: f64 = 1e-9;

/// Validated zoom scale bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    min: f64,
    max: f64,
}

impl ZoomBounds {
    /// Creates bounds, clamping both ends to the supported range and
    /// ordering them.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        let min = min.clamp(ZOOM_SCALE_FLOOR, ZOOM_SCALE_CEILING);
        let max = max.clamp(ZOOM_SCALE_FLOOR, ZOOM_SCALE_CEILING);
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    #[must_use]
    pub fn min(self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn clamp(self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self { min: 1.0, max: 5.0 }
    }
}

/// Geometry the pan clamp needs: the fit-to-viewport content size and the
/// viewport itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub fit_size: Size,
    pub viewport: Size,
}

impl Layout {
    #[must_use]
    pub fn new(fit_size: Size, viewport: Size) -> Self {
        Self { fit_size, viewport }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    grab: Point,
    pan_at_grab: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PinchAnchor {
    span: f64,
    scale_at_begin: f64,
}

/// Continuous zoom/pan state for the stage content.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    scale: f64,
    pan: Vec2,
    bounds: ZoomBounds,
    step: f64,
    /// Content whose pan is always pinned to center (animated rasters).
    pinned: bool,
    drag: Option<DragAnchor>,
    pinch: Option<PinchAnchor>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(ZoomBounds::default(), 0.5)
    }
}

impl Transform {
    #[must_use]
    pub fn new(bounds: ZoomBounds, step: f64) -> Self {
        Self {
            scale: 1.0,
            pan: Vec2::ZERO,
            bounds,
            step,
            pinned: false,
            drag: None,
            pinch: None,
        }
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    #[must_use]
    pub fn bounds(&self) -> ZoomBounds {
        self.bounds
    }

    /// Whether content is magnified beyond 1x. Gesture navigation is
    /// suppressed while this holds.
    #[must_use]
    pub fn is_zoomed(&self) -> bool {
        self.scale > 1.0 + ZOOM_EPSILON
    }

    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    /// Marks the content as pan-pinned; the pan snaps to center and stays
    /// there regardless of scale.
    pub fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
        if pinned {
            self.pan = Vec2::ZERO;
        }
    }

    /// Resets to identity: scale 1, pan (0, 0). Used for double-click/tap
    /// and on item change.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.pan = Vec2::ZERO;
        self.drag = None;
        self.pinch = None;
    }

    /// Applies a fixed-point zoom to `new_scale` anchored at `anchor`
    /// (relative to the viewport center). Returns true if the scale
    /// actually changed.
    pub fn zoom_to(&mut self, new_scale: f64, anchor: Point, layout: Layout) -> bool {
        let target = self.bounds.clamp(new_scale);
        if (target - self.scale).abs() < ZOOM_EPSILON {
            return false;
        }

        let a = anchor.to_vec2();
        self.pan = a - (a - self.pan) * (target / self.scale);
        self.scale = target;
        self.clamp_pan(layout);
        true
    }

    /// Zooms in by one configured step, anchored at `anchor`.
    pub fn zoom_in(&mut self, anchor: Point, layout: Layout) -> bool {
        self.zoom_to(self.scale + self.step, anchor, layout)
    }

    /// Zooms out by one configured step, anchored at `anchor`.
    pub fn zoom_out(&mut self, anchor: Point, layout: Layout) -> bool {
        self.zoom_to(self.scale - self.step, anchor, layout)
    }

    /// Starts a drag-pan at `grab`. Ignored unless content is zoomed
    /// beyond 1x.
    pub fn begin_drag(&mut self, grab: Point) {
        if self.is_zoomed() {
            self.drag = Some(DragAnchor {
                grab,
                pan_at_grab: self.pan,
            });
        }
    }

    /// Continues a drag-pan. Returns true if the pan changed.
    pub fn drag_to(&mut self, position: Point, layout: Layout) -> bool {
        let Some(anchor) = self.drag else {
            return false;
        };
        let before = self.pan;
        self.pan = anchor.pan_at_grab + (position - anchor.grab);
        self.clamp_pan(layout);
        before != self.pan
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Starts a pinch from two touch points.
    pub fn pinch_begin(&mut self, first: Point, second: Point) {
        let span = (second - first).hypot();
        if span > 0.0 {
            self.pinch = Some(PinchAnchor {
                span,
                scale_at_begin: self.scale,
            });
            // A pinch supersedes any single-finger drag in progress.
            self.drag = None;
        }
    }

    /// Updates an active pinch; the touch midpoint is the fixed-point
    /// anchor. Returns true if the scale changed.
    pub fn pinch_update(&mut self, first: Point, second: Point, layout: Layout) -> bool {
        let Some(anchor) = self.pinch else {
            return false;
        };
        let span = (second - first).hypot();
        if span <= 0.0 {
            return false;
        }
        let midpoint = first.midpoint(second);
        self.zoom_to(anchor.scale_at_begin * (span / anchor.span), midpoint, layout)
    }

    /// Ends a pinch. When one finger remains down, the continued drag
    /// re-anchors to that finger's current position rather than jumping.
    pub fn pinch_end(&mut self, remaining: Option<Point>) {
        self.pinch = None;
        if let Some(position) = remaining {
            self.begin_drag(position);
        }
    }

    /// Clamps the pan to the content overflow, per axis:
    /// `bound = max(0, (fit_size * scale - viewport) / 2)`.
    /// A scale at or below 1 forces the pan to center, as does pinned
    /// content at any scale.
    pub fn clamp_pan(&mut self, layout: Layout) {
        if self.pinned || self.scale <= 1.0 + ZOOM_EPSILON {
            self.pan = Vec2::ZERO;
            return;
        }

        let bound_x = ((layout.fit_size.width * self.scale - layout.viewport.width) / 2.0).max(0.0);
        let bound_y =
            ((layout.fit_size.height * self.scale - layout.viewport.height) / 2.0).max(0.0);
        self.pan = Vec2::new(
            self.pan.x.clamp(-bound_x, bound_x),
            self.pan.y.clamp(-bound_y, bound_y),
        );
    }
}
