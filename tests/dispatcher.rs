//! Integration tests for mode switching and per-mode gain computation

mod helpers;

use approx::assert_abs_diff_eq;
use helpers::tolerances::{GAIN_EPSILON, POWER_EPSILON, SILENCE_THRESHOLD};
use helpers::*;
use spatium::prelude::*;
use spatium::BINAURAL_SPEAKERS;

#[test]
fn test_vbap_source_at_speaker() {
    init_tracing();
    let engine = test_engine();
    let mut renderer = engine.renderer();
    engine.set_layout(octahedron()).unwrap();

    let gains = renderer.compute_gains(&SourceState::new(90.0, 0.0));
    assert_abs_diff_eq!(gains.get(patch(2)), 1.0, epsilon = GAIN_EPSILON);
    assert_only_on(gains, &[patch(2)]);
}

#[test]
fn test_vbap_spread_is_normalized() {
    let engine = test_engine();
    let mut renderer = engine.renderer();
    engine.set_layout(dome()).unwrap();

    let setup = dome();
    let patches: Vec<OutputPatch> = setup.speakers().iter().map(|s| s.patch()).collect();
    let source = SourceState::new(20.0, 30.0).with_span(0.6, 0.4);
    let gains = renderer.compute_gains(&source);
    assert_abs_diff_eq!(power_over(gains, &patches), 1.0, epsilon = POWER_EPSILON);
    assert_only_on(gains, &patches);
    assert!(gains.active().count() > 3);
}

#[test]
fn test_two_d_layout_ignores_elevation() {
    let engine = test_engine();
    let mut renderer = engine.renderer();
    engine.set_layout(ring(8)).unwrap();
    assert!(engine.triplets().iter().all(|t| t.id3.is_none()));

    let flat = renderer.compute_gains(&SourceState::new(45.0, 0.0)).clone();
    let raised = renderer.compute_gains(&SourceState::new(45.0, 60.0)).clone();
    for (a, b) in flat.as_slice().iter().zip(raised.as_slice()) {
        assert_abs_diff_eq!(*a, *b, epsilon = GAIN_EPSILON);
    }
}

#[test]
fn test_refused_layout_keeps_rendering_previous() {
    let engine = SpatEngine::builder()
        .max_outputs(TEST_OUTPUTS)
        .dimension(Dimension::Three)
        .build()
        .unwrap();
    let mut renderer = engine.renderer();
    engine.set_layout(octahedron()).unwrap();
    let before = renderer.compute_gains(&SourceState::new(0.0, 0.0)).clone();

    let three = SpeakerSetup::from_angles(&[(1, 0.0, 0.0), (2, 120.0, 0.0), (3, 0.0, 60.0)])
        .unwrap();
    let err = engine.set_layout(three).unwrap_err();
    assert_eq!(
        err,
        Error::Dsp(spatium::dsp::Error::InsufficientSpeakers {
            required: 4,
            found: 3
        })
    );
    assert_eq!(engine.triplets().len(), 8);
    assert_eq!(renderer.compute_gains(&SourceState::new(0.0, 0.0)), &before);
}

#[test]
fn test_out_of_range_patch_refused() {
    let engine = SpatEngine::builder().max_outputs(4).build().unwrap();
    let err = engine.set_layout(ring(6)).unwrap_err();
    assert_eq!(
        err,
        Error::Dsp(spatium::dsp::Error::Core(
            spatium::core::Error::OutputPatchOutOfRange { patch: 5, max: 4 }
        ))
    );
    assert!(!engine.is_ready());
}

#[test]
fn test_switch_to_field_requires_layout() {
    let engine = test_engine();
    let mut renderer = engine.renderer();
    engine.set_layout(octahedron()).unwrap();
    assert!(engine.has_triplets());

    engine.set_mode(SpatMode::Field);
    assert_eq!(renderer.mode(), SpatMode::Field);
    assert!(!engine.has_triplets());
    assert_eq!(
        renderer.compute_gains(&SourceState::new(0.0, 0.0)).power(),
        0.0
    );

    engine.set_layout(cube()).unwrap();
    assert!(engine.is_ready());
    assert!(engine.triplets().is_empty());
    let gains = renderer.compute_gains(&SourceState::new(0.0, 0.0).with_radius(0.5));
    assert_eq!(gains.active().count(), 8);
    assert_eq!(renderer.response(), DistanceResponse::UNITY);
}

#[test]
fn test_field_distance_response_outside() {
    let engine = test_engine_in(SpatMode::Field);
    let mut renderer = engine.renderer();
    engine.set_layout(cube()).unwrap();

    renderer.compute_gains(&SourceState::new(0.0, 0.0).with_radius(3.0));
    let far = renderer.response();
    assert!(far.gain < 1.0);
    assert!(far.lowpass_coefficient > 0.0);
}

#[test]
fn test_field_hint_in_vbap_mode() {
    let engine = test_engine();
    let mut renderer = engine.renderer();
    engine.set_layout(octahedron()).unwrap();

    let vector = audible(renderer.compute_gains(&SourceState::new(90.0, 0.0)));
    let field = audible(
        renderer.compute_gains(&SourceState::new(90.0, 0.0).with_hint(RenderHint::Field)),
    );
    assert_eq!(vector, 1);
    assert_eq!(field, 6);
}

#[test]
fn test_binaural_virtual_dome() {
    let engine = test_engine_in(SpatMode::Binaural);
    let mut renderer = engine.renderer();
    // Binaural pans on its own dome whatever the physical layout.
    engine.set_layout(ring(4)).unwrap();

    assert!(engine.has_triplets());
    assert!(engine.triplets().iter().all(|t| t.id3.is_some()));

    let gains = renderer.compute_gains(&SourceState::new(0.0, 0.0));
    assert_abs_diff_eq!(gains.get(patch(1)), 1.0, epsilon = GAIN_EPSILON);
    for (p, g) in gains.active() {
        assert!(
            p.index() < BINAURAL_SPEAKERS || g < SILENCE_THRESHOLD,
            "output {} beyond the virtual dome",
            p
        );
    }
}

#[test]
fn test_binaural_needs_sixteen_outputs() {
    let engine = SpatEngine::builder()
        .max_outputs(8)
        .mode(SpatMode::Binaural)
        .build()
        .unwrap();
    assert!(engine.set_layout(ring(4)).is_err());
}

#[test]
fn test_stereo_pan() {
    let engine = test_engine_in(SpatMode::Stereo);
    let mut renderer = engine.renderer();
    engine.set_layout(SpeakerSetup::default()).unwrap();
    assert!(!engine.has_triplets());

    let left = renderer.compute_gains(&SourceState::new(90.0, 0.0));
    assert_abs_diff_eq!(left.get(patch(1)), 1.0, epsilon = GAIN_EPSILON);
    assert!(left.get(patch(2)) < SILENCE_THRESHOLD);

    let center = renderer.compute_gains(&SourceState::new(0.0, 0.0));
    let half = std::f32::consts::FRAC_1_SQRT_2;
    assert_abs_diff_eq!(center.get(patch(1)), half, epsilon = GAIN_EPSILON);
    assert_abs_diff_eq!(center.get(patch(2)), half, epsilon = GAIN_EPSILON);
    assert_only_on(center, &[patch(1), patch(2)]);
}

#[test]
fn test_direct_out_never_receives_gain() {
    let engine = test_engine();
    let mut renderer = engine.renderer();
    let mut setup = octahedron();
    setup.push(
        Loudspeaker::from_polar(patch(7), PolarVector::unit(90.0, 0.0)).direct_out(true),
    );
    engine.set_layout(setup).unwrap();

    for azimuth in [-135.0, -45.0, 0.0, 90.0, 170.0] {
        let source = SourceState::new(azimuth, 10.0).with_span(1.0, 1.0);
        assert_eq!(renderer.compute_gains(&source).get(patch(7)), 0.0);
    }
}

#[test]
fn test_field_settings_republish() {
    let engine = test_engine_in(SpatMode::Field);
    engine.set_layout(cube()).unwrap();
    let version = engine.version();

    let settings = FieldSettings {
        rolloff_db: 12.0,
        ..FieldSettings::default()
    };
    engine.set_field_settings(settings.clone()).unwrap();
    assert_eq!(engine.version(), version + 1);
    assert_eq!(engine.config().field, settings);

    let invalid = FieldSettings {
        blur: -1.0,
        ..FieldSettings::default()
    };
    assert!(engine.set_field_settings(invalid).is_err());
    assert_eq!(engine.version(), version + 1);
}
