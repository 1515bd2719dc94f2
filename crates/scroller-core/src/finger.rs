#![forbid(unsafe_code)]

//! Touch tracking with inertial follow-through.
//!
//! # State Machine
//!
//! ```text
//! Idle ──start──▶ Touching ──end/cancel──▶ Inertial ──momentum 0──▶ Idle
//!                    ▲                         │
//!                    └─────────start───────────┘ (aborts inertia)
//! ```
//!
//! While touching, every move emits its delta immediately and records a
//! [`TouchSnapshot`] in a five-entry history. On release the history is
//! reduced to a per-frame momentum and a decay run starts: each frame emits
//! the current momentum along the locked direction and shrinks its magnitude
//! by one pixel until it reaches zero.
//!
//! # Invariants
//!
//! 1. Deltas are axis-exclusive, like wheel input.
//! 2. History holds at most [`SNAPSHOT_CAPACITY`] entries and is cleared once
//!    a launch has been computed.
//! 3. A new touch-start invalidates the inertial token; the pending frame
//!    becomes a no-op.
//! 4. The last inertial frame emits a zero delta, then no frame is scheduled.
//!
//! # Failure Modes
//!
//! - Secondary contacts are ignored; only the first contact is tracked.
//! - A release with an empty history, or with zero elapsed time between
//!   snapshots, launches no inertia.

use std::collections::VecDeque;
use std::rc::Rc;

use crate::animation::{FrameQueue, TokenSource};
use crate::geometry::{ScrollDelta, ScrollPosition};
use crate::input::{InputOutcome, TouchInput, TouchPhase, TouchPoint};
use crate::options::ScrollerOptions;

/// Touch history length used to estimate release velocity.
pub const SNAPSHOT_CAPACITY: usize = 5;

/// Milliseconds per animation frame used to convert velocity to momentum.
pub const FRAME_MS: f64 = 16.0;

/// Axis a touch move (and the inertia derived from it) is locked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    /// Axis-exclusive classification: horizontal only when strictly larger.
    #[must_use]
    pub fn classify(dx: f64, dy: f64) -> Self {
        if dx.abs() > dy.abs() {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }

    /// Delta of `amount` along this direction.
    #[must_use]
    pub const fn delta(self, amount: f64) -> ScrollDelta {
        match self {
            Self::Horizontal => ScrollDelta::horizontal(amount),
            Self::Vertical => ScrollDelta::vertical(amount),
        }
    }

    const fn component(self, delta: ScrollDelta) -> f64 {
        match self {
            Self::Horizontal => delta.delta_x,
            Self::Vertical => delta.delta_y,
        }
    }
}

/// One recorded touch move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSnapshot {
    pub delta: ScrollDelta,
    pub timestamp_ms: f64,
    pub direction: Direction,
}

/// Tracker phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerPhase {
    Idle,
    Touching,
    Inertial,
}

/// Momentum and direction computed at release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertialLaunch {
    /// Content pixels per animation frame (signed).
    pub momentum: f64,
    pub direction: Direction,
}

impl InertialLaunch {
    /// Estimate the launch from a touch history (oldest first).
    ///
    /// Walks from the newest snapshot back while the direction matches,
    /// summing distance. The duration runs from the newest timestamp back to
    /// the first mismatching snapshot, or to the oldest one.
    #[must_use]
    pub fn from_history<'a, I>(history: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a TouchSnapshot>,
        I::IntoIter: DoubleEndedIterator,
    {
        let mut newest_first = history.into_iter().rev();
        let newest = newest_first.next()?;
        let direction = newest.direction;
        let end_ms = newest.timestamp_ms;
        let mut distance = direction.component(newest.delta);
        let mut start_ms = end_ms;

        for snapshot in newest_first {
            start_ms = snapshot.timestamp_ms;
            if snapshot.direction != direction {
                break;
            }
            distance += direction.component(snapshot.delta);
        }

        let duration_ms = end_ms - start_ms;
        let momentum = distance / duration_ms * FRAME_MS;
        if !momentum.is_finite() {
            return None;
        }
        Some(Self {
            momentum,
            direction,
        })
    }
}

/// One pending inertial frame.
#[derive(Debug, Clone, Copy, PartialEq)]
struct InertialStep {
    momentum: f64,
    direction: Direction,
}

/// Touch input tracker.
#[derive(Debug)]
pub struct Finger {
    options: Rc<ScrollerOptions>,
    phase: FingerPhase,
    contact: Option<TouchPoint>,
    history: VecDeque<TouchSnapshot>,
    tokens: TokenSource,
    frames: FrameQueue<InertialStep>,
}

impl Finger {
    #[must_use]
    pub fn new(options: Rc<ScrollerOptions>) -> Self {
        Self {
            options,
            phase: FingerPhase::Idle,
            contact: None,
            history: VecDeque::with_capacity(SNAPSHOT_CAPACITY),
            tokens: TokenSource::new(),
            frames: FrameQueue::new(),
        }
    }

    #[must_use]
    pub const fn phase(&self) -> FingerPhase {
        self.phase
    }

    /// Recorded snapshots, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &TouchSnapshot> {
        self.history.iter()
    }

    /// Whether an inertial frame is waiting.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Dispatch one touch event. `position` is the stage's current position.
    pub fn handle(&mut self, event: &TouchInput, position: ScrollPosition) -> InputOutcome {
        match event.phase {
            TouchPhase::Start => {
                self.touch_start(event);
                InputOutcome::IGNORED
            }
            TouchPhase::Move => self.touch_move(event, position),
            TouchPhase::End | TouchPhase::Cancel => {
                self.touch_end();
                InputOutcome::IGNORED
            }
        }
    }

    /// Begin tracking the first contact, aborting any inertia.
    pub fn touch_start(&mut self, event: &TouchInput) {
        if self.phase == FingerPhase::Inertial {
            self.abort_inertial();
        }
        if event.touches.len() > 1 {
            tracing::debug!(
                target: "scroller.finger",
                contacts = event.touches.len(),
                "multi-touch start, tracking first contact"
            );
        }
        let Some(first) = event.touches.first() else {
            return;
        };
        self.contact = Some(*first);
        self.phase = FingerPhase::Touching;
    }

    /// Emit the live delta for one move and record it.
    pub fn touch_move(&mut self, event: &TouchInput, position: ScrollPosition) -> InputOutcome {
        if self.phase != FingerPhase::Touching {
            return InputOutcome::IGNORED;
        }
        let (Some(last), Some(current)) = (self.contact, event.touches.first().copied()) else {
            return InputOutcome::IGNORED;
        };
        if event.touches.len() != 1 {
            // Keep this move, but stop following the gesture.
            self.phase = FingerPhase::Idle;
        }

        let opts = &self.options;
        let prevent_default = opts.prevent_default && position.y > 0.0;
        let dx = if opts.allow_scroll_x { last.x - current.x } else { 0.0 };
        let dy = if opts.allow_scroll_y { last.y - current.y } else { 0.0 };
        self.contact = Some(current);

        let direction = Direction::classify(dx, dy);
        let amount = match direction {
            Direction::Horizontal => dx,
            Direction::Vertical => dy,
        };
        let delta = direction.delta(amount * opts.finger_scroll_speed_ratio);

        if self.history.len() >= SNAPSHOT_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(TouchSnapshot {
            delta,
            timestamp_ms: event.timestamp_ms,
            direction,
        });

        InputOutcome::new(Some(delta), prevent_default)
    }

    /// Release: convert history into an inertial run.
    pub fn touch_end(&mut self) {
        if self.phase == FingerPhase::Touching {
            self.phase = FingerPhase::Idle;
        }
        if self.history.is_empty() {
            return;
        }
        let launch = InertialLaunch::from_history(&self.history);
        self.history.clear();

        let Some(launch) = launch else {
            tracing::debug!(target: "scroller.finger", "release without measurable velocity");
            return;
        };
        tracing::debug!(
            target: "scroller.finger",
            momentum = launch.momentum,
            direction = ?launch.direction,
            "inertial launch"
        );
        let token = self.tokens.issue();
        self.frames.schedule(
            token,
            InertialStep {
                momentum: launch.momentum,
                direction: launch.direction,
            },
        );
        self.phase = FingerPhase::Inertial;
    }

    /// Advance one animation frame, returning the inertial delta to apply.
    pub fn tick(&mut self) -> Option<ScrollDelta> {
        let mut emitted = None;
        for frame in self.frames.drain() {
            if !self.tokens.is_current(frame.token) {
                tracing::trace!(
                    target: "scroller.finger",
                    token = frame.token.get(),
                    "stale inertial frame dropped"
                );
                continue;
            }
            let step = frame.step;
            emitted = Some(step.direction.delta(step.momentum));
            if step.momentum != 0.0 {
                self.frames.schedule(
                    frame.token,
                    InertialStep {
                        momentum: reduce_momentum(step.momentum),
                        ..step
                    },
                );
            } else {
                self.tokens.invalidate();
                self.phase = FingerPhase::Idle;
            }
        }
        emitted
    }

    /// Drop pending inertia and tracking state.
    pub fn destroy(&mut self) {
        self.tokens.invalidate();
        self.frames.clear();
        self.history.clear();
        self.contact = None;
        self.phase = FingerPhase::Idle;
    }

    fn abort_inertial(&mut self) {
        tracing::debug!(target: "scroller.finger", "inertia aborted by new touch");
        self.tokens.invalidate();
        self.phase = FingerPhase::Idle;
    }
}

/// Shrink momentum magnitude by one, never crossing zero.
fn reduce_momentum(momentum: f64) -> f64 {
    if momentum > 0.0 {
        (momentum - 1.0).max(0.0)
    } else {
        (momentum + 1.0).min(0.0)
    }
}
