#![forbid(unsafe_code)]

//! Wheel delta normalization.
//!
//! Converts one raw wheel event into at most one axis-exclusive
//! [`ScrollDelta`]:
//!
//! 1. Line-mode deltas become pixels (`× 16`).
//! 2. Disabled axes are zeroed.
//! 3. Shift + vertical-only input scrolls horizontally when X is allowed.
//! 4. The larger axis survives, the other is dropped.
//! 5. `wheel_scroll_speed_ratio` scales the surviving axis.
//!
//! Pinch gestures (ctrl/meta + wheel) are not scroll input and are ignored
//! before any default suppression is requested.

use std::rc::Rc;

use crate::geometry::ScrollDelta;
use crate::input::{DeltaMode, InputOutcome, Modifiers, WheelInput};
use crate::options::ScrollerOptions;

/// Pixels per wheel line.
pub const LINE_HEIGHT_PX: f64 = 16.0;

/// Wheel delta normalizer.
#[derive(Debug, Clone)]
pub struct Wheel {
    options: Rc<ScrollerOptions>,
}

impl Wheel {
    #[must_use]
    pub fn new(options: Rc<ScrollerOptions>) -> Self {
        Self { options }
    }

    /// Normalize one wheel event.
    pub fn handle(&self, event: &WheelInput) -> InputOutcome {
        if event.mods.is_zoom_gesture() {
            tracing::trace!(target: "scroller.wheel", mods = ?event.mods, "zoom gesture ignored");
            return InputOutcome::IGNORED;
        }

        let (raw_x, raw_y) = to_pixels(event);
        let opts = &self.options;
        let mut dx = if opts.allow_scroll_x { raw_x } else { 0.0 };
        let mut dy = if opts.allow_scroll_y { raw_y } else { 0.0 };

        if opts.allow_scroll_x
            && event.mods.contains(Modifiers::SHIFT)
            && raw_x == 0.0
            && raw_y != 0.0
        {
            dx = raw_y;
            dy = 0.0;
        }

        let ratio = opts.wheel_scroll_speed_ratio;
        let delta = if dx.abs() > dy.abs() {
            ScrollDelta::horizontal(dx * ratio)
        } else {
            ScrollDelta::vertical(dy * ratio)
        };

        InputOutcome::new(Some(delta), opts.prevent_default)
    }
}

fn to_pixels(event: &WheelInput) -> (f64, f64) {
    match event.delta_mode {
        DeltaMode::Line => (event.delta_x * LINE_HEIGHT_PX, event.delta_y * LINE_HEIGHT_PX),
        DeltaMode::Pixel | DeltaMode::Page => (event.delta_x, event.delta_y),
    }
}
