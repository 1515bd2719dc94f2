#![forbid(unsafe_code)]

//! Orchestrator.
//!
//! [`Scroller`] owns one of each component and is the only type hosts talk
//! to. Input handlers return an [`InputOutcome`] telling the host whether to
//! suppress the native default; the resulting delta has already been applied
//! and announced to scroll listeners by the time the handler returns.
//!
//! Per animation frame the host calls [`Scroller::tick`] while
//! [`Scroller::needs_frame`] holds, then drains
//! [`Scroller::drain_timer_commands`] and re-renders the
//! [`Scroller::scrollbar_view`] of each axis.

use std::fmt;
use std::rc::Rc;

use crate::animation::smooth::SmoothStep;
use crate::animation::{AnimationToken, ScheduledFrame};
use crate::error::ScrollerError;
use crate::finger::Finger;
use crate::geometry::{Bounds, ScrollDelta, ScrollPosition, Size};
use crate::input::{InputOutcome, PointerInput, TouchInput, WheelInput};
use crate::options::ScrollerOptions;
use crate::scrollbar::{Axis, HideTimer, ScrollBar, ScrollBarView, TimerCommand};
use crate::stage::{Stage, StageSignal};
use crate::surface::StageSurface;
use crate::wheel::Wheel;

/// Payload delivered to scroll listeners: the absolute position after an
/// input-driven move.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollEvent {
    pub x: f64,
    pub y: f64,
}

impl From<ScrollPosition> for ScrollEvent {
    fn from(p: ScrollPosition) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// Handle returned by [`Scroller::on_scroll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Measured stage geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageGeometry {
    pub position: ScrollPosition,
    pub bounds: Bounds,
    pub content: Size,
    pub viewport: Size,
}

type ScrollListener = Box<dyn FnMut(&ScrollEvent)>;

/// Custom scroll viewport bound to a host surface.
pub struct Scroller<S: StageSurface> {
    options: Rc<ScrollerOptions>,
    wheel: Wheel,
    finger: Finger,
    stage: Stage<S>,
    scrollbar_x: ScrollBar,
    scrollbar_y: ScrollBar,
    listeners: Vec<(SubscriptionId, ScrollListener)>,
    next_subscription: u64,
    destroyed: bool,
}

impl<S: StageSurface> fmt::Debug for Scroller<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scroller")
            .field("position", &self.stage.position())
            .field("bounds", &self.stage.bounds())
            .field("finger", &self.finger.phase())
            .field("listeners", &self.listeners.len())
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl<S: StageSurface> Scroller<S> {
    /// Build every component against `surface` and initialize the stage.
    pub fn new(surface: S, options: ScrollerOptions) -> Result<Self, ScrollerError> {
        let options = Rc::new(options);
        let mut scroller = Self {
            wheel: Wheel::new(Rc::clone(&options)),
            finger: Finger::new(Rc::clone(&options)),
            stage: Stage::new(surface, Rc::clone(&options)),
            scrollbar_x: ScrollBar::new(Axis::Horizontal, Rc::clone(&options)),
            scrollbar_y: ScrollBar::new(Axis::Vertical, Rc::clone(&options)),
            options,
            listeners: Vec::new(),
            next_subscription: 0,
            destroyed: false,
        };
        scroller.stage.init()?;
        scroller.sync_scrollbars();
        tracing::debug!(
            target: "scroller",
            geometry = ?scroller.stage_geometry(),
            "scroller created"
        );
        Ok(scroller)
    }

    #[must_use]
    pub fn options(&self) -> &ScrollerOptions {
        &self.options
    }

    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Re-measure and recompute bounds; see [`Stage::update`].
    pub fn update(
        &mut self,
        max_x: Option<f64>,
        max_y: Option<f64>,
        min_x: Option<f64>,
        min_y: Option<f64>,
    ) {
        if self.destroyed {
            return;
        }
        self.stage.update(max_x, max_y, min_x, min_y);
        self.sync_scrollbars();
    }

    /// Move to an absolute position. Does not notify scroll listeners.
    pub fn set_position(&mut self, x: f64, y: f64, smooth: bool) {
        if self.destroyed {
            return;
        }
        self.stage.set_position(ScrollPosition::new(x, y), smooth);
        self.sync_scrollbars();
    }

    /// Move by a relative offset. Does not notify scroll listeners.
    pub fn set_offset(&mut self, dx: f64, dy: f64, smooth: bool) {
        if self.destroyed {
            return;
        }
        self.stage.set_offset(ScrollDelta::new(dx, dy), smooth);
        self.sync_scrollbars();
    }

    #[must_use]
    pub fn position(&self) -> ScrollPosition {
        self.stage.position()
    }

    /// Register a scroll listener.
    pub fn on_scroll(
        &mut self,
        listener: impl FnMut(&ScrollEvent) + 'static,
    ) -> Result<SubscriptionId, ScrollerError> {
        if self.destroyed {
            return Err(ScrollerError::Destroyed);
        }
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        Ok(id)
    }

    /// Remove a scroll listener. Returns whether it was registered.
    pub fn off_scroll(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn handle_wheel(&mut self, event: &WheelInput) -> InputOutcome {
        if self.destroyed {
            return InputOutcome::IGNORED;
        }
        let outcome = self.wheel.handle(event);
        self.apply_outcome(outcome)
    }

    pub fn handle_touch(&mut self, event: &TouchInput) -> InputOutcome {
        if self.destroyed {
            return InputOutcome::IGNORED;
        }
        let outcome = self.finger.handle(event, self.stage.position());
        self.apply_outcome(outcome)
    }

    /// Pointer input for one axis' scrollbar.
    pub fn handle_scrollbar_pointer(&mut self, axis: Axis, pointer: &PointerInput) -> InputOutcome {
        if self.destroyed {
            return InputOutcome::IGNORED;
        }
        let outcome = self.scrollbar_mut(axis).handle_pointer(pointer);
        self.apply_outcome(outcome)
    }

    /// The clipping layer scrolled natively; undo it.
    pub fn handle_native_scroll(&mut self) {
        if self.destroyed {
            return;
        }
        self.stage.reset_native_scroll();
    }

    /// Whether [`Scroller::tick`] has work for the next frame.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        !self.destroyed && (self.stage.needs_frame() || self.finger.needs_frame())
    }

    /// Advance smoothing and inertia by one animation frame.
    ///
    /// Returns whether another frame is needed.
    pub fn tick(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.stage.tick();
        if let Some(delta) = self.finger.tick() {
            self.apply_delta(delta);
        }
        self.sync_scrollbars();
        self.needs_frame()
    }

    /// Step of a [`SmoothFn::External`](crate::SmoothFn::External) run
    /// waiting for the host to compute its successor.
    #[must_use]
    pub fn pending_smooth_step(&self) -> Option<ScheduledFrame<SmoothStep>> {
        if self.destroyed {
            return None;
        }
        self.stage.pending_smooth_step()
    }

    /// Apply a host-computed smoothing step; see [`Stage::resume_smooth`].
    pub fn resume_smooth(&mut self, token: AnimationToken, next: Option<SmoothStep>) -> bool {
        if self.destroyed {
            return false;
        }
        let accepted = self.stage.resume_smooth(token, next);
        self.sync_scrollbars();
        accepted
    }

    /// Hide-timer callback from the host.
    pub fn fire_timer(&mut self, timer: HideTimer) -> bool {
        if self.destroyed {
            return false;
        }
        self.scrollbar_mut(timer.axis).fire_timer(timer)
    }

    /// Timer requests from both scrollbars, horizontal first.
    ///
    /// Still drains after destroy so hosts can clear pending timeouts.
    pub fn drain_timer_commands(&mut self) -> Vec<TimerCommand> {
        let mut commands = self.scrollbar_x.drain_timer_commands();
        commands.extend(self.scrollbar_y.drain_timer_commands());
        commands
    }

    #[must_use]
    pub fn scrollbar_view(&self, axis: Axis) -> ScrollBarView {
        self.scrollbar(axis).view()
    }

    #[must_use]
    pub fn stage_geometry(&self) -> StageGeometry {
        StageGeometry {
            position: self.stage.position(),
            bounds: self.stage.bounds(),
            content: self.stage.content_size(),
            viewport: self.stage.viewport_size(),
        }
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        self.stage.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.stage.surface_mut()
    }

    /// Tear everything down. Idempotent; later calls are no-ops.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.finger.destroy();
        self.scrollbar_x.destroy();
        self.scrollbar_y.destroy();
        self.stage.destroy();
        self.listeners.clear();
        tracing::debug!(target: "scroller", "scroller destroyed");
    }

    fn scrollbar(&self, axis: Axis) -> &ScrollBar {
        match axis {
            Axis::Horizontal => &self.scrollbar_x,
            Axis::Vertical => &self.scrollbar_y,
        }
    }

    fn scrollbar_mut(&mut self, axis: Axis) -> &mut ScrollBar {
        match axis {
            Axis::Horizontal => &mut self.scrollbar_x,
            Axis::Vertical => &mut self.scrollbar_y,
        }
    }

    fn apply_outcome(&mut self, outcome: InputOutcome) -> InputOutcome {
        if let Some(delta) = outcome.delta {
            self.apply_delta(delta);
        }
        outcome
    }

    fn apply_delta(&mut self, delta: ScrollDelta) {
        self.stage.set_offset(delta, false);
        self.sync_scrollbars();
        let event = ScrollEvent::from(self.stage.position());
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    fn sync_scrollbars(&mut self) {
        for signal in self.stage.drain_signals() {
            match signal {
                StageSignal::GeometryChanged => {
                    let content = self.stage.content_size();
                    let viewport = self.stage.viewport_size();
                    self.scrollbar_x.update(content, viewport);
                    self.scrollbar_y.update(content, viewport);
                }
                StageSignal::PositionChanged => {
                    let (nx, ny) = self.stage.bounds().normalize(self.stage.position());
                    self.scrollbar_x.set_position(nx);
                    self.scrollbar_y.set_position(ny);
                }
            }
        }
    }
}
