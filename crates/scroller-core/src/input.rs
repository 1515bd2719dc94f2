#![forbid(unsafe_code)]

//! Normalized input schema consumed by the engine.
//!
//! The web host converts DOM `WheelEvent`, `TouchEvent`, and `MouseEvent`
//! objects into these values. Coordinates are client pixels; timestamps are
//! the event's `timeStamp` in milliseconds.

use bitflags::bitflags;

use crate::geometry::ScrollDelta;

bitflags! {
    /// Modifier keys held during an input event.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const META  = 0b1000;
    }
}

impl Modifiers {
    /// Pinch gestures on touch pads arrive as ctrl/meta + wheel.
    #[must_use]
    pub const fn is_zoom_gesture(self) -> bool {
        self.intersects(Self::CTRL.union(Self::META))
    }
}

/// Unit of a wheel delta (`WheelEvent.deltaMode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl DeltaMode {
    /// Map the DOM numeric constant; unknown values are treated as pixels.
    #[must_use]
    pub const fn from_dom(mode: u32) -> Self {
        match mode {
            1 => Self::Line,
            2 => Self::Page,
            _ => Self::Pixel,
        }
    }
}

/// Raw wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    pub delta_mode: DeltaMode,
    pub mods: Modifiers,
}

/// Phase for touch events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// One active contact point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

/// Touch event with all currently active contacts.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchInput {
    pub phase: TouchPhase,
    pub touches: Vec<TouchPoint>,
    pub timestamp_ms: f64,
}

impl TouchInput {
    /// Single-contact touch event.
    #[must_use]
    pub fn single(phase: TouchPhase, x: f64, y: f64, timestamp_ms: f64) -> Self {
        Self {
            phase,
            touches: vec![TouchPoint { x, y }],
            timestamp_ms,
        }
    }

    /// Touch event without active contacts (end/cancel).
    #[must_use]
    pub fn released(phase: TouchPhase, timestamp_ms: f64) -> Self {
        Self {
            phase,
            touches: Vec::new(),
            timestamp_ms,
        }
    }
}

/// Phase for scrollbar pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// Pointer entered the scrollbar track.
    Enter,
    /// Pointer left the scrollbar track.
    Leave,
    /// Button pressed over the scrollbar cursor.
    Down,
    /// Pointer moved anywhere over the container.
    Move,
    /// Button released anywhere over the container.
    Up,
}

/// Pointer event routed to a scrollbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub phase: PointerPhase,
    pub x: f64,
    pub y: f64,
}

impl PointerInput {
    #[must_use]
    pub const fn new(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self { phase, x, y }
    }
}

/// Result of feeding one input event to a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputOutcome {
    /// Delta to apply to the stage, if the event produced motion.
    pub delta: Option<ScrollDelta>,
    /// Whether the host should call `preventDefault()` on the DOM event.
    pub prevent_default: bool,
}

impl InputOutcome {
    /// Event consumed without motion or default suppression.
    pub const IGNORED: Self = Self {
        delta: None,
        prevent_default: false,
    };

    #[must_use]
    pub const fn new(delta: Option<ScrollDelta>, prevent_default: bool) -> Self {
        Self {
            delta,
            prevent_default,
        }
    }
}
