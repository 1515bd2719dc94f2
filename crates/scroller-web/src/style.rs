#![forbid(unsafe_code)]

//! CSS declarations for the synthetic layers and scrollbar elements.
//!
//! Kept free of `web-sys` so the exact strings written to the DOM can be
//! checked natively.

use scroller_core::{Axis, CursorPlacement, ScrollPosition, scrollbar::MIN_CURSOR_LENGTH};

/// One `property: value` pair, property in CSS (kebab-case) form.
pub type Declaration = (&'static str, String);

fn decl(property: &'static str, value: impl Into<String>) -> Declaration {
    (property, value.into())
}

/// Pixel length without a negative zero.
fn px(value: f64) -> String {
    format!("{}px", value + 0.0)
}

fn percent(value: f64) -> String {
    format!("{}%", value + 0.0)
}

/// Styles applied to the scroll container once its content is wrapped.
#[must_use]
pub fn container() -> Vec<Declaration> {
    vec![
        decl("overflow", "visible"),
        decl("position", "relative"),
        decl("width", "100%"),
        decl("height", "100%"),
    ]
}

/// Clipping layer sized to the container's bounding box.
#[must_use]
pub fn clip_layer(width: f64, height: f64) -> Vec<Declaration> {
    vec![
        decl("position", "absolute"),
        decl("overflow", "hidden"),
        decl("width", px(width)),
        decl("height", px(height)),
    ]
}

/// Translated layer holding the original children.
#[must_use]
pub fn content_layer() -> Vec<Declaration> {
    vec![
        decl("position", "absolute"),
        decl("min-width", "100%"),
        decl("min-height", "100%"),
    ]
}

/// `transform` value that scrolls the content layer to `position`.
#[must_use]
pub fn translate(position: ScrollPosition) -> String {
    format!("translate({}, {})", px(-position.x), px(-position.y))
}

/// Scrollbar track pinned to the container edge.
#[must_use]
pub fn track(axis: Axis) -> Vec<Declaration> {
    let mut out = vec![decl("position", "absolute")];
    match axis {
        Axis::Horizontal => out.extend([
            decl("left", "0"),
            decl("bottom", "0"),
            decl("width", "100%"),
        ]),
        Axis::Vertical => out.extend([
            decl("right", "0"),
            decl("top", "0"),
            decl("height", "100%"),
        ]),
    }
    out
}

/// Static cursor styles; the length is set separately on every render.
#[must_use]
pub fn cursor(axis: Axis) -> Vec<Declaration> {
    let min = px(MIN_CURSOR_LENGTH);
    let mut out = vec![decl("position", "relative")];
    match axis {
        Axis::Horizontal => out.extend([decl("height", "100%"), decl("min-width", min)]),
        Axis::Vertical => out.extend([decl("width", "100%"), decl("min-height", min)]),
    }
    out
}

/// Cursor length along the axis.
#[must_use]
pub fn cursor_length(axis: Axis, length: f64) -> Declaration {
    match axis {
        Axis::Horizontal => decl("width", px(length)),
        Axis::Vertical => decl("height", px(length)),
    }
}

/// Offset plus counter-translation for a cursor placement.
#[must_use]
pub fn cursor_placement(placement: CursorPlacement) -> Vec<Declaration> {
    let offset = placement.offset_percent;
    match placement.axis {
        Axis::Horizontal => vec![
            decl("left", percent(offset)),
            decl("transform", format!("translate({}, 0)", percent(-offset))),
        ],
        Axis::Vertical => vec![
            decl("top", percent(offset)),
            decl("transform", format!("translate(0, {})", percent(-offset))),
        ],
    }
}

/// Track `display` value.
#[must_use]
pub fn display(visible: bool) -> Declaration {
    decl("display", if visible { "block" } else { "none" })
}

/// Track `opacity` value.
#[must_use]
pub fn opacity(opaque: bool) -> Declaration {
    decl("opacity", if opaque { "1" } else { "0" })
}
