//! Snapshot handoff under concurrent publishing

mod helpers;

use approx::assert_abs_diff_eq;
use helpers::tolerances::{GAIN_EPSILON, POWER_EPSILON};
use helpers::*;
use spatium::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Quad on outputs 1-4.
fn front_quad() -> SpeakerSetup {
    SpeakerSetup::from_angles(&[
        (1, 45.0, 0.0),
        (2, -45.0, 0.0),
        (3, 135.0, 0.0),
        (4, -135.0, 0.0),
    ])
    .unwrap()
}

/// Hexagon on outputs 11-16, disjoint from the quad.
fn far_hexagon() -> SpeakerSetup {
    let angles: Vec<(u16, f32, f32)> = (0..6)
        .map(|i| (i + 11, spatium::wrap_azimuth(i as f32 * 60.0), 0.0))
        .collect();
    SpeakerSetup::from_angles(&angles).unwrap()
}

#[test]
fn test_reader_never_sees_torn_layout() {
    init_tracing();
    let engine = Arc::new(test_engine());
    engine.set_layout(front_quad()).unwrap();
    let mut renderer = engine.renderer();

    let quad: Vec<OutputPatch> = front_quad().speakers().iter().map(|s| s.patch()).collect();
    let hexagon: Vec<OutputPatch> = far_hexagon().speakers().iter().map(|s| s.patch()).collect();

    let done = Arc::new(AtomicBool::new(false));
    let writer = {
        let engine = Arc::clone(&engine);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for i in 0..200 {
                let setup = if i % 2 == 0 { far_hexagon() } else { front_quad() };
                engine.set_layout(setup).unwrap();
            }
            done.store(true, Ordering::Release);
        })
    };

    let source = SourceState::new(10.0, 0.0).with_span(0.5, 0.0);
    let mut checked = 0usize;
    while !done.load(Ordering::Acquire) || checked < 100 {
        let gains = renderer.compute_gains(&source);
        let on_quad = power_over(gains, &quad);
        let on_hexagon = power_over(gains, &hexagon);
        // All of the power lands on exactly one of the two layouts.
        assert!(
            ((on_quad - 1.0).abs() < POWER_EPSILON && on_hexagon == 0.0)
                || ((on_hexagon - 1.0).abs() < POWER_EPSILON && on_quad == 0.0),
            "torn snapshot: quad {} hexagon {}",
            on_quad,
            on_hexagon
        );
        checked += 1;
    }

    writer.join().unwrap();
    assert_eq!(engine.version(), 201);
    assert!(renderer.layout_changed());
}

#[test]
fn test_mode_switches_while_rendering() {
    let engine = Arc::new(test_engine());
    engine.set_layout(octahedron()).unwrap();
    let mut renderer = engine.renderer();

    let writer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for mode in [SpatMode::Field, SpatMode::Stereo, SpatMode::Binaural, SpatMode::Vbap] {
                engine.set_mode(mode);
                engine.set_layout(octahedron()).unwrap();
            }
        })
    };

    let source = SourceState::new(-30.0, 15.0);
    for _ in 0..1000 {
        let gains = renderer.compute_gains(&source);
        assert!(gains.as_slice().iter().all(|g| g.is_finite() && *g >= 0.0));
    }

    writer.join().unwrap();
    assert_eq!(renderer.mode(), SpatMode::Vbap);
    assert!(engine.is_ready());
}

#[test]
fn test_source_params_across_threads() {
    let params = Arc::new(SourceParams::default());
    let engine = test_engine();
    engine.set_layout(octahedron()).unwrap();
    let mut renderer = engine.renderer();

    let control = {
        let params = Arc::clone(&params);
        thread::spawn(move || {
            params.set_direction(90.0, 0.0);
            params.set_span(0.0, 0.0);
        })
    };
    control.join().unwrap();

    let gains = renderer.compute_gains(&params.load());
    assert_abs_diff_eq!(gains.get(patch(2)), 1.0, epsilon = GAIN_EPSILON);
}
