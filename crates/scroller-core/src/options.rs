#![forbid(unsafe_code)]

//! Scroller configuration.
//!
//! [`ScrollerOptions`] is built once, before the scroller exists, and shared
//! read-only with every component. JSON payloads use the camelCase field
//! names of the JS API; any missing field falls back to its default.

use serde::Deserialize;

use crate::animation::smooth::SmoothFn;
use crate::error::ScrollerError;

/// Tuning knobs and feature switches for one scroller instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrollerOptions {
    /// Speed multiplier for mouse wheel / touch pad deltas.
    pub wheel_scroll_speed_ratio: f64,
    /// Speed multiplier for scrollbar drags.
    pub drag_scroll_speed_ratio: f64,
    /// Speed multiplier for finger swipes and their inertia.
    pub finger_scroll_speed_ratio: f64,
    /// Suppress native scrolling and navigation gestures.
    pub prevent_default: bool,
    pub allow_scroll_x: bool,
    pub allow_scroll_y: bool,
    /// Class name applied to the horizontal scrollbar track.
    pub scroll_bar_class_name_x: String,
    /// Class name applied to the vertical scrollbar track.
    pub scroll_bar_class_name_y: String,
    pub scrollbar_visible_x: bool,
    pub scrollbar_visible_y: bool,
    /// Fade scrollbars out after a short period without activity.
    pub hidden_inactive_scrollbar: bool,
    /// Smoothing used by `set_position(.., smooth = true)`.
    #[serde(skip)]
    pub smooth_fn: SmoothFn,
}

impl Default for ScrollerOptions {
    fn default() -> Self {
        Self {
            wheel_scroll_speed_ratio: 1.0,
            drag_scroll_speed_ratio: 1.0,
            finger_scroll_speed_ratio: 1.0,
            prevent_default: true,
            allow_scroll_x: true,
            allow_scroll_y: true,
            scroll_bar_class_name_x: String::new(),
            scroll_bar_class_name_y: String::new(),
            scrollbar_visible_x: true,
            scrollbar_visible_y: true,
            hidden_inactive_scrollbar: true,
            smooth_fn: SmoothFn::default(),
        }
    }
}

impl ScrollerOptions {
    /// Parse a JSON options object, merging it over the defaults.
    pub fn from_json(json: &str) -> Result<Self, ScrollerError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_wheel_speed(mut self, ratio: f64) -> Self {
        self.wheel_scroll_speed_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_drag_speed(mut self, ratio: f64) -> Self {
        self.drag_scroll_speed_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_finger_speed(mut self, ratio: f64) -> Self {
        self.finger_scroll_speed_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_prevent_default(mut self, prevent: bool) -> Self {
        self.prevent_default = prevent;
        self
    }

    /// Enable or disable scrolling per axis.
    #[must_use]
    pub fn with_axes(mut self, allow_x: bool, allow_y: bool) -> Self {
        self.allow_scroll_x = allow_x;
        self.allow_scroll_y = allow_y;
        self
    }

    /// Show or hide the scrollbar per axis.
    #[must_use]
    pub fn with_scrollbars(mut self, visible_x: bool, visible_y: bool) -> Self {
        self.scrollbar_visible_x = visible_x;
        self.scrollbar_visible_y = visible_y;
        self
    }

    #[must_use]
    pub fn with_scrollbar_class_names(
        mut self,
        x: impl Into<String>,
        y: impl Into<String>,
    ) -> Self {
        self.scroll_bar_class_name_x = x.into();
        self.scroll_bar_class_name_y = y.into();
        self
    }

    #[must_use]
    pub fn with_hidden_inactive_scrollbar(mut self, hide: bool) -> Self {
        self.hidden_inactive_scrollbar = hide;
        self
    }

    #[must_use]
    pub fn with_smooth_fn(mut self, smooth_fn: SmoothFn) -> Self {
        self.smooth_fn = smooth_fn;
        self
    }
}
