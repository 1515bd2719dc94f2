#![forbid(unsafe_code)]

//! Web frontend for `scroller-core`.
//!
//! # Role in Scroller
//! `scroller-web` binds the engine to a browser container element. It wraps
//! the container's children in a clipping layer and a translated content
//! layer, forwards wheel/touch/mouse events, drives animation frames with
//! `requestAnimationFrame`, runs the scrollbar hide timers, and renders the
//! scrollbar elements.
//!
//! # JS API
//! `create(container, options)` or `new Scroller(container, options)` returns
//! a handle with `destroy`, `update`, `setPosition`, `getPosition`,
//! `setOffset`, `on("scroll", fn)`, and `off(id)`.
//!
//! The CSS builders in [`style`] are target-independent and tested natively;
//! everything touching `web-sys` is compiled for `wasm32` only.

pub mod style;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{Scroller, create};

/// `setTimeout` delay standing in for `requestAnimationFrame` (1000 / 60).
pub const FALLBACK_FRAME_MS: i32 = 16;
