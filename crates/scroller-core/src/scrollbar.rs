#![forbid(unsafe_code)]

//! Scrollbar state: cursor geometry, drag tracking, and inactivity fading.
//!
//! One [`ScrollBar`] type serves both axes; everything axis-specific lives
//! on [`Axis`]. The bar never touches the DOM. Hosts render
//! [`ScrollBarView`] snapshots and run the hide timers the bar requests
//! through [`TimerCommand`]s.
//!
//! # Drag
//!
//! ```text
//! Idle ──down (visible bar)──▶ Dragging ──up (anywhere)──▶ Idle
//! ```
//!
//! While dragging, track pixels convert to content pixels with
//! `content / (track - cursor_length)`, so moving the cursor across its free
//! travel scrolls the whole content.
//!
//! # Activity
//!
//! A bar is active while it is hovered, dragged, or shortly after a position
//! change. With `hidden_inactive_scrollbar` the host fades inactive bars.
//! Each armed timer carries a fresh token; only the current one may
//! deactivate the bar.

use std::rc::Rc;

use crate::animation::{AnimationToken, TokenSource};
use crate::geometry::{ScrollDelta, Size};
use crate::input::{InputOutcome, PointerInput, PointerPhase};
use crate::options::ScrollerOptions;

/// Smallest rendered cursor length, in pixels.
pub const MIN_CURSOR_LENGTH: f64 = 30.0;

/// Delay before an idle bar is deactivated.
pub const HIDE_DELAY_MS: u32 = 400;

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const ALL: [Self; 2] = [Self::Horizontal, Self::Vertical];

    /// Component of `size` along this axis.
    #[must_use]
    pub const fn extent(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Pointer coordinate along this axis.
    #[must_use]
    pub const fn coordinate(self, pointer: &PointerInput) -> f64 {
        match self {
            Self::Horizontal => pointer.x,
            Self::Vertical => pointer.y,
        }
    }

    /// Scrolling enabled and the bar configured visible on this axis.
    #[must_use]
    pub const fn is_enabled(self, options: &ScrollerOptions) -> bool {
        match self {
            Self::Horizontal => options.allow_scroll_x && options.scrollbar_visible_x,
            Self::Vertical => options.allow_scroll_y && options.scrollbar_visible_y,
        }
    }

    /// Enabled, and the content overflows the viewport.
    #[must_use]
    pub fn is_visible(self, options: &ScrollerOptions, content: Size, viewport: Size) -> bool {
        self.is_enabled(options) && self.extent(viewport) < self.extent(content)
    }

    /// Cursor length proportional to the visible share of the content.
    #[must_use]
    pub fn cursor_length(self, content: Size, viewport: Size) -> f64 {
        let view = self.extent(viewport);
        (view / self.extent(content) * view).max(MIN_CURSOR_LENGTH)
    }

    /// Cursor placement for a normalized position.
    #[must_use]
    pub fn placement(self, normalized: f64) -> CursorPlacement {
        CursorPlacement {
            axis: self,
            offset_percent: normalized * 100.0,
        }
    }

    /// Content delta for `pixels` of cursor travel, or `None` when the cursor
    /// has no free travel.
    #[must_use]
    pub fn drag_delta(
        self,
        pixels: f64,
        content: Size,
        viewport: Size,
        cursor_length: f64,
        ratio: f64,
    ) -> Option<ScrollDelta> {
        let travel = self.extent(viewport) - cursor_length;
        if travel <= 0.0 {
            return None;
        }
        let amount = pixels * (self.extent(content) / travel) * ratio;
        Some(match self {
            Self::Horizontal => ScrollDelta::horizontal(amount),
            Self::Vertical => ScrollDelta::vertical(amount),
        })
    }

    /// Configured track class name.
    #[must_use]
    pub fn class_name(self, options: &ScrollerOptions) -> &str {
        match self {
            Self::Horizontal => &options.scroll_bar_class_name_x,
            Self::Vertical => &options.scroll_bar_class_name_y,
        }
    }
}

/// Cursor offset along the track.
///
/// The cursor sits at `offset_percent` of the track and is translated back
/// by the same share of its own length, so 0 % and 100 % align its edges
/// with the track ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorPlacement {
    pub axis: Axis,
    pub offset_percent: f64,
}

/// Identity of one armed hide timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HideTimer {
    pub axis: Axis,
    pub token: AnimationToken,
}

/// Timer request for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Call `fire_timer(timer)` after `delay_ms`.
    Arm { timer: HideTimer, delay_ms: u32 },
    /// Drop the pending callback for `timer`.
    Disarm { timer: HideTimer },
}

/// Render snapshot of one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollBarView {
    pub axis: Axis,
    pub visible: bool,
    pub cursor_length: f64,
    pub placement: CursorPlacement,
    /// Fully opaque, as opposed to faded out.
    pub opaque: bool,
}

/// One scrollbar.
#[derive(Debug)]
pub struct ScrollBar {
    axis: Axis,
    options: Rc<ScrollerOptions>,
    content: Size,
    viewport: Size,
    visible: bool,
    cursor_length: f64,
    position: f64,
    active: bool,
    hover: bool,
    drag_origin: Option<f64>,
    timers: TokenSource,
    armed: Option<HideTimer>,
    commands: Vec<TimerCommand>,
}

impl ScrollBar {
    #[must_use]
    pub fn new(axis: Axis, options: Rc<ScrollerOptions>) -> Self {
        Self {
            axis,
            options,
            content: Size::default(),
            viewport: Size::default(),
            visible: false,
            cursor_length: 0.0,
            position: 0.0,
            active: false,
            hover: false,
            drag_origin: None,
            timers: TokenSource::new(),
            armed: None,
            commands: Vec::new(),
        }
    }

    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        self.axis.class_name(&self.options)
    }

    /// Recompute visibility and cursor length from new geometry.
    pub fn update(&mut self, content: Size, viewport: Size) {
        self.content = content;
        self.viewport = viewport;
        self.visible = self.axis.is_visible(&self.options, content, viewport);
        if self.visible {
            self.cursor_length = self.axis.cursor_length(content, viewport);
        }
    }

    /// Store a normalized position and mark the bar active.
    ///
    /// `normalized` may be NaN for a zero-span axis; the view then hides.
    pub fn set_position(&mut self, normalized: f64) {
        self.position = normalized;
        self.activate();
        if !self.hover && !self.is_dragging() {
            self.schedule_hide();
        }
    }

    /// Feed one pointer event. Enter, leave, and down are bar-local; move
    /// and up come from the whole container.
    pub fn handle_pointer(&mut self, pointer: &PointerInput) -> InputOutcome {
        match pointer.phase {
            PointerPhase::Enter => {
                self.hover = true;
                self.activate();
            }
            PointerPhase::Leave => {
                self.hover = false;
                if !self.is_dragging() && self.active {
                    self.deactivate();
                }
            }
            PointerPhase::Down => {
                if self.visible {
                    self.drag_origin = Some(self.axis.coordinate(pointer));
                    tracing::trace!(
                        target: "scroller.scrollbar",
                        axis = ?self.axis,
                        "drag started"
                    );
                }
            }
            PointerPhase::Move => return self.drag_move(pointer),
            PointerPhase::Up => {
                if self.drag_origin.take().is_some() {
                    tracing::trace!(target: "scroller.scrollbar", axis = ?self.axis, "drag ended");
                }
                if !self.hover && self.active {
                    self.deactivate();
                }
            }
        }
        InputOutcome::IGNORED
    }

    /// Hide-timer callback from the host. Returns whether it took effect.
    pub fn fire_timer(&mut self, timer: HideTimer) -> bool {
        if timer.axis != self.axis || !self.timers.is_current(timer.token) {
            tracing::trace!(
                target: "scroller.scrollbar",
                axis = ?self.axis,
                token = timer.token.get(),
                "stale hide timer ignored"
            );
            return false;
        }
        self.timers.invalidate();
        self.armed = None;
        self.active = false;
        true
    }

    /// Take queued timer requests.
    pub fn drain_timer_commands(&mut self) -> Vec<TimerCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Render snapshot.
    #[must_use]
    pub fn view(&self) -> ScrollBarView {
        ScrollBarView {
            axis: self.axis,
            visible: self.visible && self.position.is_finite(),
            cursor_length: self.cursor_length,
            placement: self.axis.placement(self.position),
            opaque: !self.options.hidden_inactive_scrollbar || self.active,
        }
    }

    /// Cancel the pending timer and forget pointer state.
    pub fn destroy(&mut self) {
        self.cancel_timer();
        self.drag_origin = None;
        self.hover = false;
        self.active = false;
        self.visible = false;
    }

    fn drag_move(&mut self, pointer: &PointerInput) -> InputOutcome {
        let Some(origin) = self.drag_origin else {
            return InputOutcome::IGNORED;
        };
        let current = self.axis.coordinate(pointer);
        self.drag_origin = Some(current);
        let delta = self.axis.drag_delta(
            current - origin,
            self.content,
            self.viewport,
            self.cursor_length,
            self.options.drag_scroll_speed_ratio,
        );
        InputOutcome::new(delta, true)
    }

    fn activate(&mut self) {
        self.active = true;
        self.cancel_timer();
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.cancel_timer();
    }

    fn schedule_hide(&mut self) {
        if !self.options.hidden_inactive_scrollbar {
            return;
        }
        let timer = HideTimer {
            axis: self.axis,
            token: self.timers.issue(),
        };
        self.armed = Some(timer);
        self.commands.push(TimerCommand::Arm {
            timer,
            delay_ms: HIDE_DELAY_MS,
        });
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.armed.take() {
            self.timers.invalidate();
            self.commands.push(TimerCommand::Disarm { timer });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VIEWPORT: Size = Size::new(300.0, 300.0);
    const CONTENT: Size = Size::new(300.0, 900.0);

    fn bar(axis: Axis, options: ScrollerOptions) -> ScrollBar {
        let mut b = ScrollBar::new(axis, Rc::new(options));
        b.update(CONTENT, VIEWPORT);
        b
    }

    fn y_bar() -> ScrollBar {
        bar(Axis::Vertical, ScrollerOptions::default())
    }

    fn pointer(phase: PointerPhase, y: f64) -> PointerInput {
        PointerInput::new(phase, 0.0, y)
    }

    #[test]
    fn visibility_requires_overflow_and_config() {
        assert!(y_bar().view().visible);
        assert!(!bar(Axis::Horizontal, ScrollerOptions::default()).view().visible);
        let hidden_bar = ScrollerOptions::default().with_scrollbars(true, false);
        assert!(!bar(Axis::Vertical, hidden_bar).view().visible);
        let locked_axis = ScrollerOptions::default().with_axes(true, false);
        assert!(!bar(Axis::Vertical, locked_axis).view().visible);
    }

    #[test]
    fn cursor_length_is_proportional_with_minimum() {
        assert_eq!(Axis::Vertical.cursor_length(CONTENT, VIEWPORT), 100.0);
        let tall = Size::new(300.0, 30_000.0);
        assert_eq!(Axis::Vertical.cursor_length(tall, VIEWPORT), MIN_CURSOR_LENGTH);
    }

    #[test]
    fn drag_converts_track_pixels_to_content_pixels() {
        let mut b = y_bar();
        b.handle_pointer(&pointer(PointerPhase::Down, 50.0));
        let out = b.handle_pointer(&pointer(PointerPhase::Move, 60.0));
        assert_eq!(out.delta, Some(ScrollDelta::vertical(45.0)));
        assert!(out.prevent_default);

        let out = b.handle_pointer(&pointer(PointerPhase::Move, 55.0));
        assert_eq!(out.delta, Some(ScrollDelta::vertical(-22.5)));

        b.handle_pointer(&pointer(PointerPhase::Up, 55.0));
        let out = b.handle_pointer(&pointer(PointerPhase::Move, 90.0));
        assert_eq!(out, InputOutcome::IGNORED);
    }

    #[test]
    fn drag_ratio_scales_delta() {
        let mut b = bar(Axis::Vertical, ScrollerOptions::default().with_drag_speed(2.0));
        b.handle_pointer(&pointer(PointerPhase::Down, 0.0));
        let out = b.handle_pointer(&pointer(PointerPhase::Move, 10.0));
        assert_eq!(out.delta, Some(ScrollDelta::vertical(90.0)));
    }

    #[test]
    fn hidden_bar_does_not_start_drag() {
        let mut b = bar(Axis::Horizontal, ScrollerOptions::default());
        b.handle_pointer(&PointerInput::new(PointerPhase::Down, 10.0, 0.0));
        assert!(!b.is_dragging());
    }

    #[test]
    fn no_free_travel_yields_no_delta() {
        assert_eq!(
            Axis::Vertical.drag_delta(10.0, CONTENT, VIEWPORT, 300.0, 1.0),
            None
        );
    }

    #[test]
    fn placement_uses_percentages() {
        let mut b = y_bar();
        b.set_position(0.25);
        assert_eq!(b.view().placement.offset_percent, 25.0);
    }

    #[test]
    fn nan_position_hides_bar() {
        let mut b = y_bar();
        b.set_position(f64::NAN);
        assert!(!b.view().visible);
    }

    #[test]
    fn set_position_arms_hide_timer() {
        let mut b = y_bar();
        b.set_position(0.5);
        assert!(b.view().opaque);
        let cmds = b.drain_timer_commands();
        let [TimerCommand::Arm { timer, delay_ms }] = cmds.as_slice() else {
            panic!("expected one arm, got {cmds:?}");
        };
        assert_eq!(*delay_ms, HIDE_DELAY_MS);
        assert!(b.fire_timer(*timer));
        assert!(!b.is_active());
        assert!(!b.view().opaque);
    }

    #[test]
    fn rearming_supersedes_previous_timer() {
        let mut b = y_bar();
        b.set_position(0.1);
        b.set_position(0.2);
        let cmds = b.drain_timer_commands();
        assert_eq!(cmds.len(), 3);
        let TimerCommand::Arm { timer: first, .. } = cmds[0] else {
            panic!("expected arm");
        };
        assert_eq!(cmds[1], TimerCommand::Disarm { timer: first });
        let TimerCommand::Arm { timer: second, .. } = cmds[2] else {
            panic!("expected arm");
        };
        assert!(!b.fire_timer(first));
        assert!(b.is_active());
        assert!(b.fire_timer(second));
    }

    #[test]
    fn hover_keeps_bar_active() {
        let mut b = y_bar();
        b.handle_pointer(&pointer(PointerPhase::Enter, 0.0));
        b.set_position(0.3);
        assert!(b.drain_timer_commands().is_empty());
        b.handle_pointer(&pointer(PointerPhase::Up, 0.0));
        assert!(b.is_active());
        b.handle_pointer(&pointer(PointerPhase::Leave, 0.0));
        assert!(!b.is_active());
    }

    #[test]
    fn leave_while_dragging_keeps_active_until_up() {
        let mut b = y_bar();
        b.handle_pointer(&pointer(PointerPhase::Enter, 10.0));
        b.handle_pointer(&pointer(PointerPhase::Down, 10.0));
        b.handle_pointer(&pointer(PointerPhase::Leave, 10.0));
        assert!(b.is_active());
        b.set_position(0.4);
        assert!(b.drain_timer_commands().is_empty());
        b.handle_pointer(&pointer(PointerPhase::Up, 40.0));
        assert!(!b.is_active());
    }

    #[test]
    fn always_opaque_without_hiding() {
        let mut b = bar(
            Axis::Vertical,
            ScrollerOptions::default().with_hidden_inactive_scrollbar(false),
        );
        b.set_position(0.5);
        assert!(b.drain_timer_commands().is_empty());
        assert!(b.view().opaque);
    }

    #[test]
    fn destroy_disarms_pending_timer() {
        let mut b = y_bar();
        b.set_position(0.5);
        let armed = b.drain_timer_commands();
        b.destroy();
        let TimerCommand::Arm { timer, .. } = armed[0] else {
            panic!("expected arm");
        };
        assert_eq!(b.drain_timer_commands(), vec![TimerCommand::Disarm { timer }]);
        assert!(!b.fire_timer(timer));
    }

    #[test]
    fn class_name_follows_axis() {
        let o = ScrollerOptions::default().with_scrollbar_class_names("bx", "by");
        assert_eq!(bar(Axis::Horizontal, o.clone()).class_name(), "bx");
        assert_eq!(bar(Axis::Vertical, o).class_name(), "by");
    }
}
