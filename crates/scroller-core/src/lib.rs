#![forbid(unsafe_code)]

//! Core: scroll position engine, input normalization, and animation state.
//!
//! # Role in Scroller
//! `scroller-core` owns every piece of scroll behavior that does not touch the
//! DOM. The web frontend (`scroller-web`) feeds it normalized input events,
//! drives [`Scroller::tick`] once per animation frame, runs the timers it asks
//! for, and renders the [`ScrollBarView`] snapshots it exposes.
//!
//! # Primary responsibilities
//! - **Wheel**: wheel deltas → one axis-exclusive [`ScrollDelta`].
//! - **Finger**: touch drags → live deltas, then a decaying momentum stream.
//! - **ScrollBar**: cursor drags → proportional deltas; cursor geometry.
//! - **Stage**: the single clamped scroll position plus smoothing runs.
//! - **Scroller**: wires the above and republishes a unified scroll event.
//!
//! # Determinism
//! Nothing here reads a clock or schedules work on its own. Timestamps arrive
//! on input events, frames arrive through [`Scroller::tick`], and timers are
//! armed and fired by the host through [`TimerCommand`] values.

pub mod animation;
pub mod error;
pub mod finger;
pub mod geometry;
pub mod input;
pub mod options;
pub mod scrollbar;
pub mod scroller;
pub mod stage;
pub mod surface;
pub mod wheel;

pub use animation::smooth::{SmoothFn, SmoothStep, linear_smooth};
pub use animation::{AnimationToken, FrameQueue, ScheduledFrame, TokenSource};
pub use error::ScrollerError;
pub use finger::{Direction, Finger, FingerPhase, InertialLaunch};
pub use geometry::{Bounds, ScrollDelta, ScrollPosition, Size};
pub use input::{
    DeltaMode, InputOutcome, Modifiers, PointerInput, PointerPhase, TouchInput, TouchPhase,
    TouchPoint, WheelInput,
};
pub use options::ScrollerOptions;
pub use scrollbar::{Axis, CursorPlacement, HideTimer, ScrollBar, ScrollBarView, TimerCommand};
pub use scroller::{ScrollEvent, Scroller, StageGeometry, SubscriptionId};
pub use stage::{Stage, StageSignal};
pub use surface::{HeadlessSurface, StageSurface};
pub use wheel::Wheel;
