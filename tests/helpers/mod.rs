//! Layout fixtures and helpers for Spatium integration tests
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-5): Exact gains and identity checks
//! - `GAIN_EPSILON` (1e-4): Solved gains
//! - `POWER_EPSILON` (1e-3): Normalized power
//! - `SILENCE_THRESHOLD` (1e-4): Silence detection

#![allow(dead_code)]

pub mod tolerances;

use spatium::prelude::*;
use spatium::{wrap_azimuth, CartesianVector};

/// Output count used by every test engine.
pub const TEST_OUTPUTS: usize = 32;

/// Install a test subscriber so `RUST_LOG`-style output shows up with
/// `--nocapture`. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn test_engine() -> SpatEngine {
    SpatEngine::builder()
        .max_outputs(TEST_OUTPUTS)
        .build()
        .expect("Failed to create test engine")
}

pub fn test_engine_in(mode: SpatMode) -> SpatEngine {
    SpatEngine::builder()
        .max_outputs(TEST_OUTPUTS)
        .mode(mode)
        .build()
        .expect("Failed to create test engine")
}

pub fn patch(n: u16) -> OutputPatch {
    OutputPatch::new(n).expect("output patches start at 1")
}

/// Regular octahedron: four at ear level, one zenith, one nadir.
pub fn octahedron() -> SpeakerSetup {
    SpeakerSetup::from_angles(&[
        (1, 0.0, 0.0),
        (2, 90.0, 0.0),
        (3, 180.0, 0.0),
        (4, -90.0, 0.0),
        (5, 0.0, 90.0),
        (6, 0.0, -90.0),
    ])
    .expect("valid octahedron")
}

/// `count` speakers evenly spaced at ear level, starting at the front.
pub fn ring(count: u16) -> SpeakerSetup {
    let step = 360.0 / count as f32;
    let angles: Vec<(u16, f32, f32)> = (0..count)
        .map(|i| (i + 1, wrap_azimuth(i as f32 * step), 0.0))
        .collect();
    SpeakerSetup::from_angles(&angles).expect("valid ring")
}

/// Eight at ear level, four at 45 degrees, one on top.
pub fn dome() -> SpeakerSetup {
    let mut angles: Vec<(u16, f32, f32)> = (0..8)
        .map(|i| (i + 1, wrap_azimuth(i as f32 * 45.0), 0.0))
        .collect();
    angles.extend((0..4).map(|i| (i + 9, wrap_azimuth(45.0 + i as f32 * 90.0), 45.0)));
    angles.push((13, 0.0, 90.0));
    SpeakerSetup::from_angles(&angles).expect("valid dome")
}

/// Eight speakers on the corners of the unit cube.
pub fn cube() -> SpeakerSetup {
    let mut speakers = Vec::new();
    let mut n = 1;
    for z in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for x in [-1.0, 1.0] {
                speakers.push(Loudspeaker::from_cartesian(
                    patch(n),
                    CartesianVector::new(x, y, z),
                ));
                n += 1;
            }
        }
    }
    SpeakerSetup::new(speakers)
}

/// Sum of squared gains over `patches` only.
pub fn power_over(gains: &GainVector, patches: &[OutputPatch]) -> f32 {
    patches.iter().map(|p| gains.get(*p).powi(2)).sum()
}

/// Number of outputs above the silence threshold.
pub fn audible(gains: &GainVector) -> usize {
    gains
        .as_slice()
        .iter()
        .filter(|g| g.abs() >= tolerances::SILENCE_THRESHOLD)
        .count()
}

/// Assert that every output outside `allowed` is silent.
pub fn assert_only_on(gains: &GainVector, allowed: &[OutputPatch]) {
    for (p, g) in gains.active() {
        assert!(
            allowed.contains(&p) || g.abs() < tolerances::SILENCE_THRESHOLD,
            "output {} carries gain {} but is not in the layout",
            p,
            g
        );
    }
}
