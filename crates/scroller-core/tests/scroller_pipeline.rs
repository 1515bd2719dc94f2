//! End-to-end host loop: input events, animation frames, and hide timers
//! driven the way the web frontend drives them, against a headless surface.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use scroller_core::{
    Axis, DeltaMode, HeadlessSurface, HideTimer, Modifiers, PointerInput, PointerPhase,
    ScrollEvent, ScrollPosition, Scroller, ScrollerOptions, Size, SmoothFn, SmoothStep,
    TimerCommand, TouchInput, TouchPhase, WheelInput,
};

const FRAME_MS: u64 = 16;

/// Minimal host: a virtual clock, a timer table, and a frame pump.
struct Host {
    scroller: Scroller<HeadlessSurface>,
    now_ms: u64,
    timers: BTreeMap<HideTimer, u64>,
    events: Rc<RefCell<Vec<ScrollEvent>>>,
    frames: usize,
}

impl Host {
    fn new(options: ScrollerOptions) -> Self {
        let surface = HeadlessSurface::new(Size::new(300.0, 300.0), Size::new(600.0, 900.0))
            .with_children(["nav", "article", "aside", "footer"]);
        let mut scroller = Scroller::new(surface, options).expect("headless init");
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        scroller
            .on_scroll(move |e| sink.borrow_mut().push(*e))
            .expect("live scroller");
        let mut host = Self {
            scroller,
            now_ms: 0,
            timers: BTreeMap::new(),
            events,
            frames: 0,
        };
        host.pump_timers();
        host
    }

    fn pump_timers(&mut self) {
        for cmd in self.scroller.drain_timer_commands() {
            match cmd {
                TimerCommand::Arm { timer, delay_ms } => {
                    self.timers.insert(timer, self.now_ms + u64::from(delay_ms));
                }
                TimerCommand::Disarm { timer } => {
                    self.timers.remove(&timer);
                }
            }
        }
    }

    /// Run frames (and due timers) until `ms` of virtual time elapsed.
    fn advance(&mut self, ms: u64) {
        let end = self.now_ms + ms;
        while self.now_ms < end {
            self.now_ms += FRAME_MS;
            if self.scroller.needs_frame() {
                self.scroller.tick();
                self.frames += 1;
            }
            self.pump_timers();
            let due: Vec<HideTimer> = self
                .timers
                .iter()
                .filter(|(_, at)| **at <= self.now_ms)
                .map(|(t, _)| *t)
                .collect();
            for timer in due {
                self.timers.remove(&timer);
                self.scroller.fire_timer(timer);
            }
        }
    }

    fn settle(&mut self) {
        while self.scroller.needs_frame() {
            self.advance(FRAME_MS);
        }
    }

    fn touch(&mut self, phase: TouchPhase, y: f64) {
        let event = TouchInput::single(phase, 10.0, y, self.now_ms as f64);
        self.scroller.handle_touch(&event);
        self.pump_timers();
    }

    fn event_ys(&self) -> Vec<f64> {
        self.events.borrow().iter().map(|e| e.y).collect()
    }
}

fn wheel(dx: f64, dy: f64) -> WheelInput {
    WheelInput {
        delta_x: dx,
        delta_y: dy,
        delta_mode: DeltaMode::Line,
        mods: Modifiers::empty(),
    }
}

#[test]
fn wheel_line_scroll_reaches_listener() {
    let mut host = Host::new(ScrollerOptions::default());
    let out = host.scroller.handle_wheel(&wheel(0.0, 10.0));
    assert!(out.prevent_default);
    assert_eq!(host.event_ys(), vec![160.0]);
    assert_eq!(host.scroller.surface().translate(), ScrollPosition::new(0.0, 160.0));
}

#[test]
fn wheel_dominant_axis_drops_minor() {
    let mut host = Host::new(ScrollerOptions::default());
    host.scroller.handle_wheel(&wheel(3.0, 1.0));
    let events = host.events.borrow();
    assert_eq!(events[0], ScrollEvent { x: 48.0, y: 0.0 });
}

#[test]
fn swipe_then_inertia_then_fade() {
    let mut host = Host::new(ScrollerOptions::default());
    host.scroller.set_position(0.0, 400.0, false);

    host.touch(TouchPhase::Start, 200.0);
    for y in [210.0, 220.0, 230.0] {
        host.touch(TouchPhase::Move, y);
        host.now_ms += FRAME_MS;
    }
    host.now_ms -= FRAME_MS;
    host.touch(TouchPhase::End, 230.0);
    assert_eq!(host.event_ys(), vec![390.0, 380.0, 370.0]);

    host.settle();
    let inertial: Vec<f64> = host.event_ys()[3..].to_vec();
    let expected: Vec<f64> = (0..=15)
        .scan(370.0, |y, i| {
            *y -= f64::from(15 - i);
            Some(*y)
        })
        .collect();
    assert_eq!(inertial, expected);
    assert_eq!(host.scroller.position().y, 250.0);

    let y = host.scroller.scrollbar_view(Axis::Vertical);
    assert!(y.visible && y.opaque);
    host.advance(400);
    assert!(!host.scroller.scrollbar_view(Axis::Vertical).opaque);
}

#[test]
fn touch_restart_cancels_inertia() {
    let mut host = Host::new(ScrollerOptions::default());
    host.scroller.set_position(0.0, 600.0, false);
    host.touch(TouchPhase::Start, 100.0);
    host.touch(TouchPhase::Move, 140.0);
    host.now_ms += FRAME_MS;
    host.touch(TouchPhase::Move, 180.0);
    host.touch(TouchPhase::End, 180.0);
    host.advance(FRAME_MS * 2);
    let moved = host.events.borrow().len();

    host.touch(TouchPhase::Start, 300.0);
    host.advance(FRAME_MS * 10);
    assert_eq!(host.events.borrow().len(), moved);
    assert!(!host.scroller.needs_frame());
}

#[test]
fn smoothing_supersession_lands_on_latest_target() {
    let mut host = Host::new(ScrollerOptions::default());
    host.scroller.set_position(0.0, 600.0, true);
    host.advance(FRAME_MS * 3);
    let mid = host.scroller.position().y;
    assert_eq!(mid, 200.0);

    host.scroller.set_position(0.0, 0.0, true);
    host.settle();
    assert_eq!(host.scroller.position(), ScrollPosition::default());
    // Smoothing is API-driven and never reaches scroll listeners.
    assert!(host.events.borrow().is_empty());
}

#[test]
fn custom_smoothing_function_is_used() {
    let halfway = SmoothFn::new(|s: &SmoothStep| {
        (s.frame_count < 2).then(|| SmoothStep {
            now_x: s.now_x + (s.to_x - s.now_x) / 2.0,
            now_y: s.now_y + (s.to_y - s.now_y) / 2.0,
            frame_count: s.frame_count + 1,
            ..*s
        })
    });
    let mut host = Host::new(ScrollerOptions::default().with_smooth_fn(halfway));
    host.scroller.set_position(0.0, 400.0, true);
    assert_eq!(host.scroller.position().y, 200.0);
    host.settle();
    assert_eq!(host.scroller.position().y, 300.0);
    assert_eq!(host.frames, 1);
}

#[test]
fn scrollbar_drag_and_hover() {
    let mut host = Host::new(ScrollerOptions::default());
    let s = &mut host.scroller;
    let enter = PointerInput::new(PointerPhase::Enter, 295.0, 10.0);
    s.handle_scrollbar_pointer(Axis::Vertical, &enter);
    let down = PointerInput::new(PointerPhase::Down, 295.0, 10.0);
    s.handle_scrollbar_pointer(Axis::Vertical, &down);
    let out = s.handle_scrollbar_pointer(
        Axis::Vertical,
        &PointerInput::new(PointerPhase::Move, 295.0, 20.0),
    );
    assert!(out.prevent_default);
    assert_eq!(s.position().y, 45.0);

    s.handle_scrollbar_pointer(Axis::Vertical, &PointerInput::new(PointerPhase::Up, 295.0, 20.0));
    host.pump_timers();
    // Hovered: no fade timer armed for the vertical bar.
    host.advance(1_000);
    assert!(host.scroller.scrollbar_view(Axis::Vertical).opaque);

    let leave = PointerInput::new(PointerPhase::Leave, 320.0, 20.0);
    host.scroller.handle_scrollbar_pointer(Axis::Vertical, &leave);
    assert!(!host.scroller.scrollbar_view(Axis::Vertical).opaque);
}

#[test]
fn zero_span_axis_hides_its_bar() {
    let mut host = Host::new(ScrollerOptions::default());
    host.scroller.update(Some(0.0), None, None, None);
    host.scroller.handle_wheel(&wheel(0.0, 1.0));
    assert!(!host.scroller.scrollbar_view(Axis::Horizontal).visible);
    assert!(host.scroller.scrollbar_view(Axis::Vertical).visible);
}

#[test]
fn destroy_restores_original_children() {
    let mut host = Host::new(ScrollerOptions::default());
    host.scroller.handle_wheel(&wheel(0.0, 2.0));
    host.pump_timers();
    assert!(!host.timers.is_empty());

    host.scroller.destroy();
    host.pump_timers();
    assert!(host.timers.is_empty());
    assert_eq!(
        host.scroller.surface().container_children(),
        ["nav", "article", "aside", "footer"]
    );
    assert!(!host.scroller.surface().is_wrapped());

    host.scroller.handle_wheel(&wheel(0.0, 2.0));
    host.scroller.destroy();
    assert_eq!(host.event_ys(), vec![32.0]);
}
