#![forbid(unsafe_code)]

//! Geometric primitives in content space (CSS pixels, origin top-left).

/// Width and height of a measured box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Subtract another size componentwise.
    #[inline]
    pub fn minus(self, other: Size) -> Size {
        Size::new(self.width - other.width, self.height - other.height)
    }
}

/// Current scroll offset of the content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollPosition {
    pub x: f64,
    pub y: f64,
}

impl ScrollPosition {
    /// Create a new position.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Position offset by `delta`.
    #[inline]
    pub fn offset(self, delta: ScrollDelta) -> Self {
        Self::new(self.x + delta.delta_x, self.y + delta.delta_y)
    }
}

/// Relative motion produced by an input source.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollDelta {
    pub delta_x: f64,
    pub delta_y: f64,
}

impl ScrollDelta {
    /// Create a new delta.
    #[inline]
    pub const fn new(delta_x: f64, delta_y: f64) -> Self {
        Self { delta_x, delta_y }
    }

    /// Horizontal-only delta.
    #[inline]
    pub const fn horizontal(delta_x: f64) -> Self {
        Self::new(delta_x, 0.0)
    }

    /// Vertical-only delta.
    #[inline]
    pub const fn vertical(delta_y: f64) -> Self {
        Self::new(0.0, delta_y)
    }
}

/// Legal scroll range on both axes.
///
/// Invariant: `min_x <= max_x` and `min_y <= max_y`. A maximum below its
/// minimum collapses to a zero-span range at the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Bounds {
    /// Create bounds, collapsing inverted ranges.
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x: max_x.max(min_x),
            min_y,
            max_y: max_y.max(min_y),
        }
    }

    #[inline]
    pub const fn min_x(&self) -> f64 {
        self.min_x
    }

    #[inline]
    pub const fn max_x(&self) -> f64 {
        self.max_x
    }

    #[inline]
    pub const fn min_y(&self) -> f64 {
        self.min_y
    }

    #[inline]
    pub const fn max_y(&self) -> f64 {
        self.max_y
    }

    /// Clamp a position into the range.
    pub fn clamp(&self, position: ScrollPosition) -> ScrollPosition {
        ScrollPosition::new(
            position.x.max(self.min_x).min(self.max_x),
            position.y.max(self.min_y).min(self.max_y),
        )
    }

    /// Whether `position` lies inside the range.
    pub fn contains(&self, position: ScrollPosition) -> bool {
        (self.min_x..=self.max_x).contains(&position.x)
            && (self.min_y..=self.max_y).contains(&position.y)
    }

    /// Position mapped to `[0, 1]` per axis.
    ///
    /// A zero-span axis divides by zero and yields NaN; scrollbars treat a
    /// non-finite value as "hide this axis".
    pub fn normalize(&self, position: ScrollPosition) -> (f64, f64) {
        (
            (position.x - self.min_x) / (self.max_x - self.min_x),
            (position.y - self.min_y) / (self.max_y - self.min_y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_collapse_when_content_is_smaller() {
        let span = Size::new(100.0, 50.0).minus(Size::new(300.0, 200.0));
        let b = Bounds::new(0.0, span.width, 0.0, span.height);
        assert_eq!(b.max_x(), 0.0);
        assert_eq!(b.max_y(), 0.0);
        assert_eq!(b.clamp(ScrollPosition::new(40.0, -3.0)), ScrollPosition::default());
    }

    #[test]
    fn clamp_limits_each_axis() {
        let b = Bounds::new(0.0, 100.0, 10.0, 20.0);
        assert_eq!(
            b.clamp(ScrollPosition::new(150.0, 0.0)),
            ScrollPosition::new(100.0, 10.0)
        );
        assert!(b.contains(ScrollPosition::new(50.0, 15.0)));
        assert!(!b.contains(ScrollPosition::new(50.0, 25.0)));
    }

    #[test]
    fn normalize_zero_span_is_nan() {
        let b = Bounds::new(0.0, 200.0, 0.0, 0.0);
        let (nx, ny) = b.normalize(ScrollPosition::new(50.0, 0.0));
        assert_eq!(nx, 0.25);
        assert!(ny.is_nan());
    }

    #[test]
    fn delta_helpers() {
        assert_eq!(ScrollDelta::vertical(4.0), ScrollDelta::new(0.0, 4.0));
        assert_eq!(
            ScrollPosition::new(1.0, 1.0).offset(ScrollDelta::horizontal(2.0)),
            ScrollPosition::new(3.0, 1.0)
        );
    }
}
