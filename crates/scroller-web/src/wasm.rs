#![forbid(unsafe_code)]

//! JS-facing scroller handle.
//!
//! All state lives in one `Rc<RefCell<Inner>>`. DOM listeners, the frame
//! callback, and the per-axis hide-timer callbacks hold `Weak` references,
//! so dropping the handle frees everything. JS scroll listeners are invoked
//! only after the borrow is released, which lets them call back into the
//! handle (`setPosition`, `destroy`, …). A JS `smoothFn` runs the same way:
//! the engine parks the current step, the callback computes the next one with
//! no borrow held, and the answer is handed back under the run's token.
//!
//! Dropping the last handle cancels the pending animation frame and hide
//! timers before their callbacks are freed.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use js_sys::{Function, JSON, Object, Reflect};
use scroller_core::{
    Axis, DeltaMode, HideTimer, InputOutcome, Modifiers, PointerInput, PointerPhase, ScrollEvent,
    Scroller as Engine, ScrollerError, ScrollerOptions, SmoothFn, SmoothStep, TimerCommand,
    TouchInput, TouchPhase, TouchPoint, WheelInput,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, HtmlElement, MouseEvent, TouchEvent, WheelEvent,
    Window,
};

use crate::FALLBACK_FRAME_MS;
use crate::dom::{DomStage, ScrollBarElements};

type Shared = Rc<RefCell<Inner>>;
type WeakShared = Weak<RefCell<Inner>>;

fn js_error(err: ScrollerError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

const fn axis_index(axis: Axis) -> usize {
    match axis {
        Axis::Horizontal => 0,
        Axis::Vertical => 1,
    }
}

// ── Listeners ───────────────────────────────────────────────────────────

/// DOM event listener, detached on drop.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Option<Closure<dyn FnMut(Event)>>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        passive: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, ScrollerError> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|err| ScrollerError::Surface(format!("listen {kind}: {err:?}")))?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure: Some(closure),
        })
    }

    /// Detach from the DOM but hand the closure back, so a listener that is
    /// currently running is not freed under itself.
    fn retire(mut self) -> Option<Closure<dyn FnMut(Event)>> {
        self.detach();
        self.closure.take()
    }

    fn detach(&self) {
        if let Some(closure) = &self.closure {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.kind, closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.detach();
    }
}

// ── Event conversion ────────────────────────────────────────────────────

fn modifiers(event: &MouseEvent) -> Modifiers {
    let mut mods = Modifiers::empty();
    mods.set(Modifiers::SHIFT, event.shift_key());
    mods.set(Modifiers::ALT, event.alt_key());
    mods.set(Modifiers::CTRL, event.ctrl_key());
    mods.set(Modifiers::META, event.meta_key());
    mods
}

fn wheel_input(event: &WheelEvent) -> WheelInput {
    WheelInput {
        delta_x: event.delta_x(),
        delta_y: event.delta_y(),
        delta_mode: DeltaMode::from_dom(event.delta_mode()),
        mods: modifiers(event),
    }
}

fn touch_input(event: &TouchEvent, phase: TouchPhase) -> TouchInput {
    let list = event.touches();
    let touches = (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| TouchPoint {
            x: f64::from(t.client_x()),
            y: f64::from(t.client_y()),
        })
        .collect();
    TouchInput {
        phase,
        touches,
        timestamp_ms: event.time_stamp(),
    }
}

fn pointer_input(event: &MouseEvent, phase: PointerPhase) -> PointerInput {
    PointerInput::new(
        phase,
        f64::from(event.client_x()),
        f64::from(event.client_y()),
    )
}

fn position_object(event: ScrollEvent) -> JsValue {
    let obj = Object::new();
    let _ = Reflect::set(&obj, &JsValue::from_str("x"), &JsValue::from_f64(event.x));
    let _ = Reflect::set(&obj, &JsValue::from_str("y"), &JsValue::from_f64(event.y));
    obj.into()
}

// ── Options ─────────────────────────────────────────────────────────────

/// Call a JS `smoothFn(step) -> step | undefined` through a JSON round trip.
fn call_js_smooth(callback: &Function, step: &SmoothStep) -> Option<SmoothStep> {
    let json = serde_json::to_string(step).ok()?;
    let arg = JSON::parse(&json).ok()?;
    let result = match callback.call1(&JsValue::NULL, &arg) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(target: "scroller.web", ?err, "smoothFn threw; run ended");
            return None;
        }
    };
    if result.is_undefined() || result.is_null() {
        return None;
    }
    let text: String = JSON::stringify(&result).ok()?.into();
    match serde_json::from_str(&text) {
        Ok(next) => Some(next),
        Err(err) => {
            tracing::warn!(target: "scroller.web", %err, "smoothFn returned a malformed step");
            None
        }
    }
}

/// Parsed options plus the JS `smoothFn`, if one was given.
fn parse_options(options: &JsValue) -> Result<(ScrollerOptions, Option<Function>), ScrollerError> {
    if options.is_undefined() || options.is_null() {
        return Ok((ScrollerOptions::default(), None));
    }
    let json: String = JSON::stringify(options)
        .map_err(|err| ScrollerError::InvalidOptions(format!("{err:?}")))?
        .into();
    let mut parsed = ScrollerOptions::from_json(&json)?;

    let smooth = Reflect::get(options, &JsValue::from_str("smoothFn")).unwrap_or_default();
    let callback = smooth.dyn_into::<Function>().ok();
    if callback.is_some() {
        parsed = parsed.with_smooth_fn(SmoothFn::External);
    }
    Ok((parsed, callback))
}

// ── Shared state ────────────────────────────────────────────────────────

struct Inner {
    engine: Engine<DomStage>,
    window: Window,
    has_animation_frame: bool,
    weak_self: WeakShared,
    frame_callback: Closure<dyn FnMut()>,
    // rAF id, or the fallback setTimeout handle.
    frame_request: Option<i32>,
    timer_callbacks: [Closure<dyn FnMut()>; 2],
    armed: [Option<(HideTimer, i32)>; 2],
    bars: [Option<ScrollBarElements>; 2],
    listeners: Vec<Listener>,
    // Detached listener closures; one of them may still be on the stack.
    #[allow(dead_code)]
    retired: Vec<Closure<dyn FnMut(Event)>>,
    pending_events: Rc<RefCell<VecDeque<ScrollEvent>>>,
    js_listeners: Vec<(u32, Function)>,
    next_listener_id: u32,
    js_smooth: Option<Function>,
}

impl Inner {
    /// Render scrollbars, run timer requests, and request the next frame.
    fn flush(&mut self) {
        if !self.engine.is_destroyed() {
            self.render_scrollbars();
        }
        for command in self.engine.drain_timer_commands() {
            match command {
                TimerCommand::Arm { timer, delay_ms } => self.arm(timer, delay_ms),
                TimerCommand::Disarm { timer } => self.disarm(timer),
            }
        }
        self.request_frame();
    }

    fn render_scrollbars(&mut self) {
        let fade = self.engine.options().hidden_inactive_scrollbar;
        for axis in Axis::ALL {
            let view = self.engine.scrollbar_view(axis);
            let slot = axis_index(axis);
            if self.bars[slot].is_none() && view.visible {
                match self.create_scrollbar(axis) {
                    Ok(bar) => self.bars[slot] = Some(bar),
                    Err(err) => {
                        tracing::warn!(
                            target: "scroller.web",
                            ?axis,
                            %err,
                            "scrollbar creation failed"
                        );
                    }
                }
            }
            if let Some(bar) = &self.bars[slot] {
                bar.render(&view, fade);
            }
        }
    }

    fn create_scrollbar(&mut self, axis: Axis) -> Result<ScrollBarElements, ScrollerError> {
        let container = self.engine.surface().container().clone();
        let class_name = axis.class_name(self.engine.options());
        let bar = ScrollBarElements::create(&container, axis, class_name)?;
        let target: &EventTarget = bar.track.as_ref();
        for (kind, phase) in [
            ("mouseenter", PointerPhase::Enter),
            ("mouseleave", PointerPhase::Leave),
            ("mousedown", PointerPhase::Down),
        ] {
            let weak = self.weak_self.clone();
            let attached = Listener::attach(target, kind, true, move |event| {
                on_scrollbar_pointer(&weak, &event, axis, phase);
            });
            match attached {
                Ok(listener) => self.listeners.push(listener),
                Err(err) => {
                    bar.remove();
                    return Err(err);
                }
            }
        }
        Ok(bar)
    }

    fn arm(&mut self, timer: HideTimer, delay_ms: u32) {
        let slot = axis_index(timer.axis);
        if let Some((_, handle)) = self.armed[slot].take() {
            self.window.clear_timeout_with_handle(handle);
        }
        let callback: &Function = self.timer_callbacks[slot].as_ref().unchecked_ref();
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback, delay)
        {
            Ok(handle) => self.armed[slot] = Some((timer, handle)),
            Err(err) => tracing::warn!(target: "scroller.web", ?err, "setTimeout failed"),
        }
    }

    fn disarm(&mut self, timer: HideTimer) {
        let slot = axis_index(timer.axis);
        if let Some((armed, handle)) = self.armed[slot] {
            if armed == timer {
                self.window.clear_timeout_with_handle(handle);
                self.armed[slot] = None;
            }
        }
    }

    fn request_frame(&mut self) {
        if self.frame_request.is_some() || !self.engine.needs_frame() {
            return;
        }
        let callback: &Function = self.frame_callback.as_ref().unchecked_ref();
        let scheduled = if self.has_animation_frame {
            self.window.request_animation_frame(callback)
        } else {
            self.window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback,
                    FALLBACK_FRAME_MS,
                )
        };
        match scheduled {
            Ok(handle) => self.frame_request = Some(handle),
            Err(err) => tracing::warn!(target: "scroller.web", ?err, "frame request failed"),
        }
    }

    /// Cancel the requested frame and both hide timers.
    fn cancel_scheduled(&mut self) {
        if let Some(handle) = self.frame_request.take() {
            if self.has_animation_frame {
                if let Err(err) = self.window.cancel_animation_frame(handle) {
                    tracing::warn!(target: "scroller.web", ?err, "cancelAnimationFrame failed");
                }
            } else {
                self.window.clear_timeout_with_handle(handle);
            }
        }
        for (_, handle) in self.armed.iter_mut().filter_map(Option::take) {
            self.window.clear_timeout_with_handle(handle);
        }
    }

    fn take_dispatch(&mut self) -> Option<(Vec<ScrollEvent>, Vec<Function>)> {
        let events: Vec<ScrollEvent> = self.pending_events.borrow_mut().drain(..).collect();
        if events.is_empty() || self.js_listeners.is_empty() {
            return None;
        }
        let listeners = self.js_listeners.iter().map(|(_, f)| f.clone()).collect();
        Some((events, listeners))
    }

    fn teardown(&mut self) {
        if self.engine.is_destroyed() {
            return;
        }
        self.engine.destroy();
        self.flush();
        self.cancel_scheduled();
        for listener in self.listeners.drain(..) {
            self.retired.extend(listener.retire());
        }
        for bar in self.bars.iter_mut().filter_map(Option::take) {
            bar.remove();
        }
        self.js_listeners.clear();
        self.js_smooth = None;
        self.pending_events.borrow_mut().clear();
        tracing::debug!(target: "scroller.web", "scroller torn down");
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        // Callbacks hold `Weak`s, so none of them is running here.
        self.teardown();
    }
}

/// Compute the next step of a JS-smoothed run with no borrow held, so the
/// `smoothFn` may call back into the handle.
fn drive_js_smoothing(shared: &Shared) {
    let request = {
        let inner = shared.borrow();
        inner.js_smooth.clone().zip(inner.engine.pending_smooth_step())
    };
    let Some((callback, frame)) = request else {
        return;
    };
    let next = call_js_smooth(&callback, &frame.step);
    shared.borrow_mut().engine.resume_smooth(frame.token, next);
}

/// Flush the shared state, then call JS listeners with no borrow held.
fn settle(shared: &Shared) {
    let dispatch = {
        let mut inner = shared.borrow_mut();
        inner.flush();
        inner.take_dispatch()
    };
    let Some((events, listeners)) = dispatch else {
        return;
    };
    for event in events {
        let payload = position_object(event);
        for listener in &listeners {
            if let Err(err) = listener.call1(&JsValue::NULL, &payload) {
                tracing::warn!(target: "scroller.web", ?err, "scroll listener threw");
            }
        }
    }
}

fn apply_default(event: &Event, outcome: InputOutcome) {
    if outcome.prevent_default {
        event.prevent_default();
    }
}

// ── DOM callbacks ───────────────────────────────────────────────────────

fn on_wheel(weak: &WeakShared, event: &Event) {
    let (Some(shared), Some(wheel)) = (weak.upgrade(), event.dyn_ref::<WheelEvent>()) else {
        return;
    };
    let outcome = shared.borrow_mut().engine.handle_wheel(&wheel_input(wheel));
    apply_default(event, outcome);
    settle(&shared);
}

fn on_touch(weak: &WeakShared, event: &Event, phase: TouchPhase) {
    let (Some(shared), Some(touch)) = (weak.upgrade(), event.dyn_ref::<TouchEvent>()) else {
        return;
    };
    let outcome = shared
        .borrow_mut()
        .engine
        .handle_touch(&touch_input(touch, phase));
    apply_default(event, outcome);
    settle(&shared);
}

/// Container-wide move/up, delivered to both bars.
fn on_container_pointer(weak: &WeakShared, event: &Event, phase: PointerPhase) {
    let (Some(shared), Some(mouse)) = (weak.upgrade(), event.dyn_ref::<MouseEvent>()) else {
        return;
    };
    let pointer = pointer_input(mouse, phase);
    let prevent = {
        let mut inner = shared.borrow_mut();
        Axis::ALL
            .iter()
            .map(|axis| inner.engine.handle_scrollbar_pointer(*axis, &pointer))
            .fold(false, |acc, outcome| acc | outcome.prevent_default)
    };
    if prevent {
        event.prevent_default();
    }
    settle(&shared);
}

fn on_scrollbar_pointer(weak: &WeakShared, event: &Event, axis: Axis, phase: PointerPhase) {
    let (Some(shared), Some(mouse)) = (weak.upgrade(), event.dyn_ref::<MouseEvent>()) else {
        return;
    };
    let outcome = shared
        .borrow_mut()
        .engine
        .handle_scrollbar_pointer(axis, &pointer_input(mouse, phase));
    apply_default(event, outcome);
    settle(&shared);
}

fn on_native_scroll(weak: &WeakShared) {
    if let Some(shared) = weak.upgrade() {
        shared.borrow_mut().engine.handle_native_scroll();
    }
}

fn on_frame(weak: &WeakShared) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    {
        let mut inner = shared.borrow_mut();
        inner.frame_request = None;
        inner.engine.tick();
    }
    drive_js_smoothing(&shared);
    settle(&shared);
}

fn on_hide_timer(weak: &WeakShared, axis: Axis) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    {
        let mut inner = shared.borrow_mut();
        if let Some((timer, _)) = inner.armed[axis_index(axis)].take() {
            inner.engine.fire_timer(timer);
        }
    }
    settle(&shared);
}

fn attach_listeners(shared: &Shared) -> Result<(), ScrollerError> {
    let weak = Rc::downgrade(shared);
    let mut inner = shared.borrow_mut();
    let container: EventTarget = inner.engine.surface().container().clone().into();
    let clip: Option<EventTarget> = inner.engine.surface().clip_layer().map(|c| c.clone().into());

    let mut listeners = Vec::new();
    let w = weak.clone();
    listeners.push(Listener::attach(&container, "wheel", false, move |e| on_wheel(&w, &e))?);
    for (kind, phase, passive) in [
        ("touchstart", TouchPhase::Start, true),
        ("touchmove", TouchPhase::Move, false),
        ("touchend", TouchPhase::End, true),
        ("touchcancel", TouchPhase::Cancel, true),
    ] {
        let w = weak.clone();
        listeners.push(Listener::attach(&container, kind, passive, move |e| {
            on_touch(&w, &e, phase);
        })?);
    }
    for (kind, phase, passive) in [
        ("mousemove", PointerPhase::Move, false),
        ("mouseup", PointerPhase::Up, true),
    ] {
        let w = weak.clone();
        listeners.push(Listener::attach(&container, kind, passive, move |e| {
            on_container_pointer(&w, &e, phase);
        })?);
    }
    if let Some(clip) = clip {
        let w = weak.clone();
        listeners.push(Listener::attach(&clip, "scroll", true, move |_| on_native_scroll(&w))?);
    }
    inner.listeners.extend(listeners);
    Ok(())
}

// ── JS API ──────────────────────────────────────────────────────────────

/// Custom scroll viewport bound to a container element.
#[wasm_bindgen]
pub struct Scroller {
    inner: Shared,
}

#[wasm_bindgen]
impl Scroller {
    /// Wrap `container`'s children and start intercepting input.
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, options: JsValue) -> Result<Scroller, JsValue> {
        let (options, js_smooth) = parse_options(&options).map_err(js_error)?;
        let window = web_sys::window()
            .ok_or_else(|| js_error(ScrollerError::Surface("no global window".into())))?;
        let has_animation_frame =
            Reflect::has(&window, &JsValue::from_str("requestAnimationFrame")).unwrap_or(false);

        let mut engine = Engine::new(DomStage::new(container), options).map_err(js_error)?;
        let pending_events = Rc::new(RefCell::new(VecDeque::new()));
        let sink = Rc::clone(&pending_events);
        engine
            .on_scroll(move |event| sink.borrow_mut().push_back(*event))
            .map_err(js_error)?;

        let inner = Rc::new_cyclic(|weak: &WeakShared| {
            let frame_weak = weak.clone();
            let timer_callback = |axis: Axis| {
                let weak = weak.clone();
                Closure::wrap(Box::new(move || on_hide_timer(&weak, axis)) as Box<dyn FnMut()>)
            };
            RefCell::new(Inner {
                engine,
                window,
                has_animation_frame,
                weak_self: weak.clone(),
                frame_callback: Closure::wrap(
                    Box::new(move || on_frame(&frame_weak)) as Box<dyn FnMut()>
                ),
                frame_request: None,
                timer_callbacks: [
                    timer_callback(Axis::Horizontal),
                    timer_callback(Axis::Vertical),
                ],
                armed: [None, None],
                bars: [None, None],
                listeners: Vec::new(),
                retired: Vec::new(),
                pending_events,
                js_listeners: Vec::new(),
                next_listener_id: 0,
                js_smooth,
            })
        });

        if let Err(err) = attach_listeners(&inner) {
            inner.borrow_mut().teardown();
            return Err(js_error(err));
        }
        settle(&inner);
        tracing::debug!(target: "scroller.web", "scroller attached");
        Ok(Self { inner })
    }

    /// Detach listeners and restore the container. Idempotent.
    pub fn destroy(&self) {
        self.inner.borrow_mut().teardown();
    }

    /// Re-measure; explicit limits override the measured ones.
    pub fn update(
        &self,
        max_x: Option<f64>,
        max_y: Option<f64>,
        min_x: Option<f64>,
        min_y: Option<f64>,
    ) {
        self.inner
            .borrow_mut()
            .engine
            .update(max_x, max_y, min_x, min_y);
        settle(&self.inner);
    }

    #[wasm_bindgen(js_name = setPosition)]
    pub fn set_position(&self, x: f64, y: f64, smooth: Option<bool>) {
        self.inner
            .borrow_mut()
            .engine
            .set_position(x, y, smooth.unwrap_or(false));
        drive_js_smoothing(&self.inner);
        settle(&self.inner);
    }

    /// Current position as `{x, y}`.
    #[wasm_bindgen(js_name = getPosition)]
    pub fn get_position(&self) -> JsValue {
        let position = self.inner.borrow().engine.position();
        position_object(ScrollEvent::from(position))
    }

    #[wasm_bindgen(js_name = setOffset)]
    pub fn set_offset(&self, dx: f64, dy: f64, smooth: Option<bool>) {
        self.inner
            .borrow_mut()
            .engine
            .set_offset(dx, dy, smooth.unwrap_or(false));
        drive_js_smoothing(&self.inner);
        settle(&self.inner);
    }

    /// Subscribe to `"scroll"`; returns an id for [`Scroller::off`].
    pub fn on(&self, event: &str, listener: Function) -> Result<u32, JsValue> {
        if event != "scroll" {
            return Err(JsValue::from_str(&format!("unsupported event: {event}")));
        }
        let mut inner = self.inner.borrow_mut();
        if inner.engine.is_destroyed() {
            return Err(js_error(ScrollerError::Destroyed));
        }
        let id = inner.next_listener_id;
        inner.next_listener_id = inner.next_listener_id.wrapping_add(1);
        inner.js_listeners.push((id, listener));
        Ok(id)
    }

    /// Unsubscribe; returns whether `id` was registered.
    pub fn off(&self, id: u32) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.js_listeners.len();
        inner.js_listeners.retain(|(listener_id, _)| *listener_id != id);
        inner.js_listeners.len() != before
    }
}

/// `create(container, options)`: same as `new Scroller(container, options)`.
#[wasm_bindgen]
pub fn create(container: HtmlElement, options: JsValue) -> Result<Scroller, JsValue> {
    Scroller::new(container, options)
}
