#![forbid(unsafe_code)]

use criterion::{Criterion, criterion_group, criterion_main};
use scroller_core::{
    Axis, DeltaMode, HeadlessSurface, Modifiers, PointerInput, PointerPhase, Scroller,
    ScrollerOptions, Size, TouchInput, TouchPhase, WheelInput,
};
use std::hint::black_box;

fn scroller() -> Scroller<HeadlessSurface> {
    let surface = HeadlessSurface::new(Size::new(800.0, 600.0), Size::new(1_600.0, 60_000.0))
        .with_children(["header", "feed", "footer"]);
    Scroller::new(surface, ScrollerOptions::default()).expect("headless init")
}

fn bench_input_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroller/pipeline");

    group.bench_function("wheel_120_events", |b| {
        b.iter(|| {
            let mut s = scroller();
            for i in 0..120 {
                let out = s.handle_wheel(&WheelInput {
                    delta_x: 0.0,
                    delta_y: if i % 7 == 0 { -3.0 } else { 3.0 },
                    delta_mode: DeltaMode::Line,
                    mods: Modifiers::empty(),
                });
                black_box(out.delta);
            }
            black_box(s.drain_timer_commands().len());
        });
    });

    group.bench_function("swipe_and_inertia", |b| {
        b.iter(|| {
            let mut s = scroller();
            s.set_position(0.0, 30_000.0, false);
            s.handle_touch(&TouchInput::single(TouchPhase::Start, 10.0, 500.0, 0.0));
            for step in 1..=24 {
                let t = f64::from(step) * 8.0;
                let y = 500.0 - f64::from(step) * 18.0;
                black_box(s.handle_touch(&TouchInput::single(TouchPhase::Move, 10.0, y, t)));
            }
            s.handle_touch(&TouchInput::released(TouchPhase::End, 200.0));
            let mut frames = 0u32;
            while s.tick() {
                frames += 1;
            }
            black_box(frames);
        });
    });

    group.bench_function("smooth_run", |b| {
        b.iter(|| {
            let mut s = scroller();
            s.set_position(400.0, 20_000.0, true);
            while s.tick() {}
            black_box(s.position());
        });
    });

    group.bench_function("scrollbar_drag_64_moves", |b| {
        b.iter(|| {
            let mut s = scroller();
            let down = PointerInput::new(PointerPhase::Down, 795.0, 5.0);
            s.handle_scrollbar_pointer(Axis::Vertical, &down);
            for step in 0..64 {
                let y = 5.0 + f64::from(step) * 4.0;
                let pointer = PointerInput::new(PointerPhase::Move, 795.0, y);
                black_box(s.handle_scrollbar_pointer(Axis::Vertical, &pointer));
            }
            let up = PointerInput::new(PointerPhase::Up, 795.0, 261.0);
            s.handle_scrollbar_pointer(Axis::Vertical, &up);
            black_box(s.scrollbar_view(Axis::Vertical));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_input_pipeline);
criterion_main!(benches);
