//! Spatial blur by blending sub-direction solves around a source.

use super::solver::GainSolver;
use super::types::CoveringSet;
use spatium_core::{wrap_azimuth, Dimension, GainVector, PolarVector, SourceState};

/// Concentric rings of sub-directions around the nominal direction.
const RINGS: usize = 4;

/// Azimuth deviation per ring at full span (degrees).
const AZIMUTH_STEP_DEG: f32 = 45.0;

/// Elevation deviation per ring at full span (degrees).
const ELEVATION_STEP_DEG: f32 = 22.5;

/// Above this span on both axes a uniform fill is added.
const FILL_THRESHOLD: f32 = 0.8;

/// Fill weight reached when both spans are 1.
const FILL_WEIGHT: f32 = 10.0;

/// Sub-direction offsets as (azimuth sign, elevation sign). The first four
/// are used alone when only one axis spreads.
const OFFSETS: [(f32, f32); 8] = [
    (1.0, 1.0),
    (-1.0, -1.0),
    (1.0, -1.0),
    (-1.0, 1.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
];

/// Blends gain solves over rings of sub-directions and renormalizes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadSynthesizer;

impl SpreadSynthesizer {
    /// Weight of ring `ring` (0-based): -3 dB per ring.
    #[inline]
    pub fn ring_compensation(ring: usize) -> f32 {
        10f32.powf(-0.15 * (ring as f32 + 1.0))
    }

    /// Spread gains for `source` into `gains`.
    ///
    /// Falls back to a plain [`GainSolver::solve`] when the source has no
    /// span usable in the set's dimension (elevation span is ignored in 2-D).
    /// Otherwise the result has unit L2 norm over the layout's speakers, or
    /// stays silent if every solve was silent. `scratch` holds the
    /// sub-direction solves. Never allocates.
    pub fn spread(
        source: &SourceState,
        set: &CoveringSet,
        scratch: &mut GainVector,
        gains: &mut GainVector,
    ) {
        let two_d = set.dimension() == Dimension::Two;
        let azimuth_span = source.azimuth_span.clamp(0.0, 1.0);
        let elevation_span = if two_d {
            0.0
        } else {
            source.elevation_span.clamp(0.0, 1.0)
        };

        let nominal = if two_d {
            PolarVector::unit(source.direction.azimuth, 0.0)
        } else {
            source.direction.with_unit_length()
        };
        GainSolver::solve(&nominal.to_cartesian(), set, gains);

        if azimuth_span <= 0.0 && elevation_span <= 0.0 {
            return;
        }

        let directions = if azimuth_span > 0.0 && elevation_span > 0.0 {
            &OFFSETS[..]
        } else {
            &OFFSETS[..4]
        };

        for ring in 0..RINGS {
            let compensation = Self::ring_compensation(ring);
            let scale = ring as f32 + 1.0;
            let azimuth_dev = AZIMUTH_STEP_DEG * scale * azimuth_span;
            let elevation_dev = ELEVATION_STEP_DEG * scale * elevation_span;

            for &(azimuth_sign, elevation_sign) in directions {
                let azimuth = wrap_azimuth(nominal.azimuth + azimuth_sign * azimuth_dev);
                let elevation =
                    (nominal.elevation + elevation_sign * elevation_dev).clamp(0.0, 90.0);
                let sub = PolarVector::unit(azimuth, elevation).to_cartesian();
                GainSolver::solve(&sub, set, scratch);
                gains.mix_from(scratch, compensation);
            }
        }

        if azimuth_span > FILL_THRESHOLD && elevation_span > FILL_THRESHOLD {
            let fill = (azimuth_span - FILL_THRESHOLD) / (1.0 - FILL_THRESHOLD)
                * (elevation_span - FILL_THRESHOLD)
                / (1.0 - FILL_THRESHOLD)
                * FILL_WEIGHT;
            for patch in set.speakers() {
                gains.add(*patch, fill);
            }
        }

        let power: f32 = set
            .speakers()
            .iter()
            .map(|patch| gains.get(*patch).powi(2))
            .sum();
        if power > 0.0 {
            let scale = 1.0 / power.sqrt();
            for patch in set.speakers() {
                gains.set(*patch, gains.get(*patch) * scale);
            }
        }
    }
}
