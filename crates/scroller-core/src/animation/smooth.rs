#![forbid(unsafe_code)]

//! Fixed-duration smoothing between two scroll positions.
//!
//! A smoothing function receives the current [`SmoothStep`] and returns the
//! next one, or `None` once the run is complete. The stage applies the first
//! step immediately and one further step per animation frame.
//!
//! The default [`linear_smooth`] advances `(to - from) / 12` per frame and
//! snaps the twelfth frame exactly onto the target so float error never
//! leaves a residual offset.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::geometry::ScrollPosition;

/// Frames in one default smoothing run.
pub const DURATION_FRAMES: u32 = 12;

/// State of one smoothing run between frames.
///
/// Serialized with camelCase names so JS smoothing callbacks see
/// `{fromX, fromY, toX, toY, nowX, nowY, frameCount}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmoothStep {
    pub from_x: f64,
    pub from_y: f64,
    pub to_x: f64,
    pub to_y: f64,
    pub now_x: f64,
    pub now_y: f64,
    pub frame_count: u32,
}

impl SmoothStep {
    /// Initial step of a run: positioned at `from`, no frames elapsed.
    #[must_use]
    pub const fn start(from: ScrollPosition, to: ScrollPosition) -> Self {
        Self {
            from_x: from.x,
            from_y: from.y,
            to_x: to.x,
            to_y: to.y,
            now_x: from.x,
            now_y: from.y,
            frame_count: 0,
        }
    }

    /// Position this step renders.
    #[must_use]
    pub const fn now(&self) -> ScrollPosition {
        ScrollPosition::new(self.now_x, self.now_y)
    }
}

/// Default linear smoothing over [`DURATION_FRAMES`] frames.
#[must_use]
pub fn linear_smooth(step: &SmoothStep) -> Option<SmoothStep> {
    if step.frame_count >= DURATION_FRAMES {
        return None;
    }

    let frames = f64::from(DURATION_FRAMES);
    let (now_x, now_y) = if step.frame_count == DURATION_FRAMES - 1 {
        (step.to_x, step.to_y)
    } else {
        (
            step.now_x + (step.to_x - step.from_x) / frames,
            step.now_y + (step.to_y - step.from_y) / frames,
        )
    };

    Some(SmoothStep {
        now_x,
        now_y,
        frame_count: step.frame_count + 1,
        ..*step
    })
}

/// Pluggable smoothing function.
#[derive(Clone, Default)]
pub enum SmoothFn {
    /// [`linear_smooth`].
    #[default]
    Linear,
    /// Rust callback run inside the stage.
    Custom(Rc<dyn Fn(&SmoothStep) -> Option<SmoothStep>>),
    /// Steps are computed by the host between frames, outside any borrow of
    /// the engine. See [`Stage::pending_smooth_step`](crate::Stage::pending_smooth_step).
    External,
}

impl SmoothFn {
    /// Wrap a custom smoothing function.
    pub fn new(f: impl Fn(&SmoothStep) -> Option<SmoothStep> + 'static) -> Self {
        Self::Custom(Rc::new(f))
    }

    #[must_use]
    pub const fn is_external(&self) -> bool {
        matches!(self, Self::External)
    }

    /// Compute the step after `step`. Always `None` for [`SmoothFn::External`].
    #[must_use]
    pub fn next(&self, step: &SmoothStep) -> Option<SmoothStep> {
        match self {
            Self::Linear => linear_smooth(step),
            Self::Custom(f) => f(step),
            Self::External => None,
        }
    }
}

impl fmt::Debug for SmoothFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("SmoothFn::Linear"),
            Self::Custom(_) => f.debug_tuple("SmoothFn::Custom").finish_non_exhaustive(),
            Self::External => f.write_str("SmoothFn::External"),
        }
    }
}
