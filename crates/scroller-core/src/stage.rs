#![forbid(unsafe_code)]

//! Position engine.
//!
//! The stage owns the one authoritative [`ScrollPosition`] and its
//! [`Bounds`]. Every input source ends up in [`Stage::set_offset`] or
//! [`Stage::set_position`]; both clamp before anything is rendered.
//!
//! # Invariants
//!
//! 1. After any operation, `bounds.contains(position)` holds.
//! 2. A non-smooth move renders only when the clamped target differs from
//!    the current position.
//! 3. Every render queues exactly one [`StageSignal::PositionChanged`].
//! 4. Starting a smooth run, or any non-smooth move, supersedes the running
//!    smooth run; its pending frame is discarded at the next tick.
//! 5. With [`SmoothFn::External`](crate::SmoothFn::External) the stage
//!    never computes a step itself; the host reads
//!    [`Stage::pending_smooth_step`] and answers with [`Stage::resume_smooth`]
//!    under the same token.
//! 6. After [`Stage::destroy`] the container holds its original children
//!    and every call is a no-op.

use std::rc::Rc;

use crate::animation::smooth::SmoothStep;
use crate::animation::{AnimationToken, FrameQueue, ScheduledFrame, TokenSource};
use crate::error::ScrollerError;
use crate::geometry::{Bounds, ScrollDelta, ScrollPosition, Size};
use crate::options::ScrollerOptions;
use crate::surface::StageSurface;

/// Notification queued by the stage for its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageSignal {
    /// The content layer was translated to a new position.
    PositionChanged,
    /// Bounds or measured sizes were recomputed.
    GeometryChanged,
}

/// Scroll position state bound to a host surface.
#[derive(Debug)]
pub struct Stage<S: StageSurface> {
    surface: S,
    options: Rc<ScrollerOptions>,
    position: ScrollPosition,
    bounds: Bounds,
    tokens: TokenSource,
    frames: FrameQueue<SmoothStep>,
    awaiting: Option<ScheduledFrame<SmoothStep>>,
    signals: Vec<StageSignal>,
    destroyed: bool,
}

impl<S: StageSurface> Stage<S> {
    pub fn new(surface: S, options: Rc<ScrollerOptions>) -> Self {
        Self {
            surface,
            options,
            position: ScrollPosition::default(),
            bounds: Bounds::default(),
            tokens: TokenSource::new(),
            frames: FrameQueue::new(),
            awaiting: None,
            signals: Vec::new(),
            destroyed: false,
        }
    }

    /// Wrap the container, adopt its native scroll offset, and measure.
    pub fn init(&mut self) -> Result<(), ScrollerError> {
        if self.destroyed {
            return Err(ScrollerError::Destroyed);
        }
        self.surface.wrap_content()?;
        let adopted = self.surface.native_scroll_offset();
        self.update(None, None, None, None);
        // The content layer starts untranslated; render the adopted offset.
        self.position = self.bounds.clamp(adopted);
        self.render();
        tracing::debug!(
            target: "scroller.stage",
            x = self.position.x,
            y = self.position.y,
            "stage initialized"
        );
        Ok(())
    }

    #[must_use]
    pub const fn position(&self) -> ScrollPosition {
        self.position
    }

    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Rendered content box.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.surface.content_size()
    }

    #[must_use]
    pub fn viewport_size(&self) -> Size {
        self.surface.viewport_size()
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Move to `target`, clamped. `smooth` starts an animated run.
    pub fn set_position(&mut self, target: ScrollPosition, smooth: bool) {
        if self.destroyed {
            return;
        }
        let target = self.bounds.clamp(target);

        if smooth {
            let token = self.tokens.issue();
            tracing::debug!(
                target: "scroller.stage",
                token = token.get(),
                to_x = target.x,
                to_y = target.y,
                "smooth run started"
            );
            let start = SmoothStep::start(self.position, target);
            self.awaiting = None;
            if self.options.smooth_fn.is_external() {
                self.awaiting = Some(ScheduledFrame { token, step: start });
                return;
            }
            if let Some(first) = self.options.smooth_fn.next(&start) {
                self.apply_smooth_step(token, first);
            }
            return;
        }

        self.tokens.invalidate();
        self.awaiting = None;
        self.move_to(target);
    }

    /// `set_position(position + delta, smooth)`.
    pub fn set_offset(&mut self, delta: ScrollDelta, smooth: bool) {
        self.set_position(self.position.offset(delta), smooth);
    }

    /// Re-measure and recompute bounds.
    ///
    /// Missing limits default to `max = content - viewport` and `min = 0`.
    /// Explicit values, zero included, are used as given.
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
        let span = self.surface.content_size().minus(self.surface.viewport_size());
        self.bounds = Bounds::new(
            min_x.unwrap_or(0.0),
            max_x.unwrap_or(span.width),
            min_y.unwrap_or(0.0),
            max_y.unwrap_or(span.height),
        );
        tracing::trace!(target: "scroller.stage", bounds = ?self.bounds, "bounds updated");
        self.signals.push(StageSignal::GeometryChanged);
        self.move_to(self.bounds.clamp(self.position));
    }

    /// Whether a smoothing frame is waiting.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        !self.frames.is_empty() || self.pending_smooth_step().is_some()
    }

    /// Step of the running host-computed run whose successor is due.
    #[must_use]
    pub fn pending_smooth_step(&self) -> Option<ScheduledFrame<SmoothStep>> {
        self.awaiting
            .clone()
            .filter(|frame| self.tokens.is_current(frame.token))
    }

    /// Apply a host-computed step for the run identified by `token`.
    ///
    /// `None` ends the run. Returns whether the step was accepted; answers for
    /// a superseded run are ignored.
    pub fn resume_smooth(&mut self, token: AnimationToken, next: Option<SmoothStep>) -> bool {
        if self.destroyed || !self.tokens.is_current(token) {
            tracing::trace!(
                target: "scroller.stage",
                token = token.get(),
                "stale smoothing step ignored"
            );
            return false;
        }
        match next {
            Some(step) => {
                self.position = self.bounds.clamp(step.now());
                self.render();
                self.awaiting = Some(ScheduledFrame { token, step });
            }
            None => {
                self.tokens.invalidate();
                self.awaiting = None;
            }
        }
        true
    }

    /// Advance the smoothing run by one frame. Returns whether it rendered.
    pub fn tick(&mut self) -> bool {
        let mut rendered = false;
        for frame in self.frames.drain() {
            if !self.tokens.is_current(frame.token) {
                tracing::trace!(
                    target: "scroller.stage",
                    token = frame.token.get(),
                    "stale smoothing frame dropped"
                );
                continue;
            }
            self.apply_smooth_step(frame.token, frame.step);
            rendered = true;
        }
        rendered
    }

    /// Undo native scrolling of the clipping layer.
    pub fn reset_native_scroll(&mut self) {
        if self.destroyed {
            return;
        }
        self.surface.reset_native_scroll();
    }

    /// Take the queued signals.
    pub fn drain_signals(&mut self) -> Vec<StageSignal> {
        std::mem::take(&mut self.signals)
    }

    /// Restore the container's original children. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.tokens.invalidate();
        self.frames.clear();
        self.awaiting = None;
        self.signals.clear();
        self.surface.unwrap_content();
        tracing::debug!(target: "scroller.stage", "stage destroyed");
    }

    fn apply_smooth_step(&mut self, token: AnimationToken, step: SmoothStep) {
        self.position = self.bounds.clamp(step.now());
        self.render();
        if let Some(next) = self.options.smooth_fn.next(&step) {
            self.frames.schedule(token, next);
        } else {
            self.tokens.invalidate();
        }
    }

    fn move_to(&mut self, target: ScrollPosition) {
        if target != self.position {
            self.position = target;
            self.render();
        }
    }

    fn render(&mut self) {
        self.surface.render_translate(self.position);
        self.signals.push(StageSignal::PositionChanged);
    }
}
