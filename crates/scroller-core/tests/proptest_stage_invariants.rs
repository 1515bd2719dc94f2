//! Property-based invariant tests for the position engine.
//!
//! 1. Any target lands inside the bounds
//! 2. Unsmoothed deltas compose as a step-wise clamped sum
//! 3. Without intermediate clamping that sum equals `clamp(start + Σdelta)`
//! 4. A smooth run always ends exactly on its clamped target
//! 5. Wheel output is axis-exclusive

use std::rc::Rc;

use proptest::prelude::*;
use scroller_core::{
    Bounds, DeltaMode, HeadlessSurface, Modifiers, ScrollDelta, ScrollPosition, ScrollerOptions,
    Size, Stage, Wheel, WheelInput,
};

// ── Strategies ──────────────────────────────────────────────────────────

fn extent() -> impl Strategy<Value = f64> {
    0.0f64..5_000.0
}

fn coordinate() -> impl Strategy<Value = f64> {
    -10_000.0f64..10_000.0
}

fn delta() -> impl Strategy<Value = ScrollDelta> {
    (-400.0f64..400.0, -400.0f64..400.0).prop_map(|(x, y)| ScrollDelta::new(x, y))
}

fn stage(viewport: Size, content: Size) -> Stage<HeadlessSurface> {
    let mut stage = Stage::new(
        HeadlessSurface::new(viewport, content),
        Rc::new(ScrollerOptions::default()),
    );
    stage.init().expect("headless surface always wraps");
    stage
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Clamp invariant
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn set_position_stays_in_bounds(
        vw in extent(), vh in extent(), cw in extent(), ch in extent(),
        x in coordinate(), y in coordinate(),
        smooth in any::<bool>(),
    ) {
        let mut s = stage(Size::new(vw, vh), Size::new(cw, ch));
        s.set_position(ScrollPosition::new(x, y), smooth);
        prop_assert!(
            s.bounds().contains(s.position()),
            "{:?} outside {:?}",
            s.position(),
            s.bounds()
        );
        while s.needs_frame() {
            s.tick();
            prop_assert!(s.bounds().contains(s.position()));
        }
    }

    #[test]
    fn explicit_limits_never_invert(
        max_x in coordinate(), max_y in coordinate(),
        min_x in coordinate(), min_y in coordinate(),
    ) {
        let mut s = stage(Size::new(100.0, 100.0), Size::new(800.0, 800.0));
        s.update(Some(max_x), Some(max_y), Some(min_x), Some(min_y));
        let b = s.bounds();
        prop_assert!(b.min_x() <= b.max_x());
        prop_assert!(b.min_y() <= b.max_y());
        prop_assert!(b.contains(s.position()));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2-3. Delta composition
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn deltas_compose_as_stepwise_clamp(
        deltas in prop::collection::vec(delta(), 0..40),
    ) {
        let mut s = stage(Size::new(300.0, 300.0), Size::new(2_000.0, 4_000.0));
        let bounds = s.bounds();
        let mut expected = s.position();
        for d in &deltas {
            s.set_offset(*d, false);
            expected = bounds.clamp(expected.offset(*d));
        }
        prop_assert_eq!(s.position(), expected);
    }

    #[test]
    fn unclamped_walk_equals_clamped_sum(
        deltas in prop::collection::vec((0.0f64..50.0, 0.0f64..50.0), 0..20),
    ) {
        // 20 steps of at most 50 px from the origin never leave [0, 1000].
        let mut s = stage(Size::new(100.0, 100.0), Size::new(1_100.0, 1_100.0));
        let (mut sx, mut sy) = (0.0, 0.0);
        for (dx, dy) in &deltas {
            s.set_offset(ScrollDelta::new(*dx, *dy), false);
            sx += dx;
            sy += dy;
        }
        let expected = Bounds::new(0.0, 1_000.0, 0.0, 1_000.0).clamp(ScrollPosition::new(sx, sy));
        prop_assert!((s.position().x - expected.x).abs() < 1e-9);
        prop_assert!((s.position().y - expected.y).abs() < 1e-9);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Smoothing converges
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn smooth_run_ends_on_target(x in coordinate(), y in coordinate()) {
        let mut s = stage(Size::new(300.0, 300.0), Size::new(3_000.0, 3_000.0));
        let target = s.bounds().clamp(ScrollPosition::new(x, y));
        s.set_position(ScrollPosition::new(x, y), true);
        let mut frames = 1;
        while s.needs_frame() {
            s.tick();
            frames += 1;
        }
        prop_assert_eq!(s.position(), target);
        prop_assert_eq!(frames, 12);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Wheel axis exclusivity
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn wheel_moves_one_axis(
        dx in -500.0f64..500.0,
        dy in -500.0f64..500.0,
        line in any::<bool>(),
        shift in any::<bool>(),
    ) {
        let wheel = Wheel::new(Rc::new(ScrollerOptions::default()));
        let event = WheelInput {
            delta_x: dx,
            delta_y: dy,
            delta_mode: if line { DeltaMode::Line } else { DeltaMode::Pixel },
            mods: if shift { Modifiers::SHIFT } else { Modifiers::empty() },
        };
        let out = wheel.handle(&event);
        let d = out.delta.expect("plain wheel always yields a delta");
        prop_assert!(d.delta_x == 0.0 || d.delta_y == 0.0, "{:?}", d);
    }
}
