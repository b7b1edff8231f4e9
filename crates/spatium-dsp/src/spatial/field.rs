//! Field panning: distance-driven gains over a cube-shaped layout.
//!
//! Every speaker can sound at once. A speaker's gain falls off with the
//! blurred distance between the source and the speaker's cell:
//!
//! ```text
//! gain = (blur / sqrt(d^2 + blur^2)) ^ (rolloff_db / 6.02)
//! ```
//!
//! so `rolloff_db` is the attenuation per doubling of distance, and gains
//! more than `dynamic_range_db` below unity are silenced. A source outside
//! the field is further attenuated and darkened by a
//! [`DistanceAttenuationCurve`].

use spatium_core::{CartesianVector, FieldSettings, GainVector, OutputPatch, SpeakerSetup};
use std::f32::consts::TAU;
use tracing::debug;

/// Decibels per doubling of distance under the inverse distance law.
const DB_PER_DOUBLING: f32 = 6.0206;

/// Speakers whose cell radii differ by less than this share a zone.
const ZONE_TOLERANCE: f32 = 0.05;

/// Cutoff (Hz) of a source inside the field.
const OPEN_CUTOFF_HZ: f32 = 20000.0;

/// Speaker placed in the field cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpeaker {
    pub patch: OutputPatch,
    /// Cell position, clamped into [-1, 1] on every axis
    pub position: CartesianVector,
    /// Index into [`FieldLayout::zones`], for display
    pub zone: usize,
}

/// Speaker cells partitioned into zones by their distance from the field
/// center.
///
/// Zones are for display: gains depend only on the speaker cells and on
/// [`radius`](Self::radius), the outermost zone, where the distance
/// response starts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldLayout {
    speakers: Vec<FieldSpeaker>,
    zones: Vec<f32>,
}

impl FieldLayout {
    /// Field from the geometric speakers of `setup`. Never fails: an empty
    /// setup yields an empty field.
    pub fn new(setup: &SpeakerSetup) -> Self {
        let cells: Vec<(OutputPatch, CartesianVector)> = setup
            .geometric()
            .map(|s| (s.patch(), clamp_to_cube(s.position())))
            .collect();

        let mut zones: Vec<f32> = Vec::new();
        let mut radii: Vec<f32> = cells.iter().map(|(_, p)| p.chebyshev_length()).collect();
        radii.sort_by(f32::total_cmp);
        for radius in radii {
            match zones.last() {
                Some(last) if radius - last < ZONE_TOLERANCE => {}
                _ => zones.push(radius),
            }
        }

        let speakers: Vec<FieldSpeaker> = cells
            .into_iter()
            .map(|(patch, position)| FieldSpeaker {
                patch,
                position,
                zone: zone_index(&zones, position.chebyshev_length()),
            })
            .collect();

        debug!(
            "Field layout built: {} speakers in {} zones",
            speakers.len(),
            zones.len()
        );
        Self { speakers, zones }
    }

    pub fn speakers(&self) -> &[FieldSpeaker] {
        &self.speakers
    }

    /// Zone radii (Chebyshev distance from the center), ascending.
    pub fn zones(&self) -> &[f32] {
        &self.zones
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }

    /// Radius of the outermost zone, 1 for an empty field.
    pub fn radius(&self) -> f32 {
        self.zones.last().copied().filter(|r| *r > 0.0).unwrap_or(1.0)
    }

    /// Zone a point at `position` falls into. Display only, no gain
    /// computation reads it.
    pub fn zone_of(&self, position: &CartesianVector) -> usize {
        zone_index(&self.zones, clamp_to_cube(*position).chebyshev_length())
    }
}

fn clamp_to_cube(position: CartesianVector) -> CartesianVector {
    CartesianVector::new(
        position.x.clamp(-1.0, 1.0),
        position.y.clamp(-1.0, 1.0),
        position.z.clamp(-1.0, 1.0),
    )
}

/// Innermost zone whose radius reaches `radius` (last zone beyond all).
fn zone_index(zones: &[f32], radius: f32) -> usize {
    zones
        .iter()
        .position(|zone| radius <= zone + ZONE_TOLERANCE * 0.5)
        .unwrap_or(zones.len().saturating_sub(1))
}

/// Level and tone change applied to a source outside the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceResponse {
    /// Linear gain applied on top of every speaker gain
    pub gain: f32,
    /// One-pole low-pass coefficient for the mixer (0 = bypass)
    pub lowpass_coefficient: f32,
}

impl DistanceResponse {
    pub const UNITY: Self = Self {
        gain: 1.0,
        lowpass_coefficient: 0.0,
    };
}

/// Maps how far a source sits outside the field to a [`DistanceResponse`].
///
/// Inside the field nothing changes. Over one further unit the gain falls
/// linearly in dB to `attenuation_db` and the cutoff glides logarithmically
/// from 20 kHz to `attenuation_hz`, then both hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceAttenuationCurve {
    attenuation_db: f32,
    attenuation_hz: f32,
    sample_rate: f32,
}

impl DistanceAttenuationCurve {
    pub fn new(settings: &FieldSettings, sample_rate: f64) -> Self {
        Self {
            attenuation_db: settings.attenuation_db.min(0.0),
            attenuation_hz: settings.attenuation_hz.clamp(20.0, OPEN_CUTOFF_HZ),
            sample_rate: sample_rate as f32,
        }
    }

    /// Response for a source `excess` units beyond the field boundary.
    pub fn response(&self, excess: f32) -> DistanceResponse {
        let t = if excess.is_nan() {
            0.0
        } else {
            excess.clamp(0.0, 1.0)
        };
        if t == 0.0 {
            return DistanceResponse::UNITY;
        }

        let gain = 10f32.powf(self.attenuation_db * t / 20.0);
        let log_cutoff =
            OPEN_CUTOFF_HZ.ln() + (self.attenuation_hz.ln() - OPEN_CUTOFF_HZ.ln()) * t;
        let cutoff = log_cutoff.exp().min(self.sample_rate * 0.5);
        let lowpass_coefficient = (-TAU * cutoff / self.sample_rate).exp();
        DistanceResponse {
            gain,
            lowpass_coefficient,
        }
    }
}

/// Distance-based gain computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldPanner {
    exponent: f32,
    blur: f32,
    floor: f32,
}

impl FieldPanner {
    pub fn new(settings: &FieldSettings) -> Self {
        Self {
            exponent: settings.rolloff_db.max(f32::EPSILON) / DB_PER_DOUBLING,
            blur: settings.blur.max(f32::EPSILON),
            floor: 10f32.powf(-settings.dynamic_range_db.abs() / 20.0),
        }
    }

    /// Gain of a speaker `distance` away from the source, before the
    /// distance response.
    #[inline]
    pub fn speaker_gain(&self, distance: f32) -> f32 {
        let gain = (self.blur / (distance * distance + self.blur * self.blur).sqrt())
            .powf(self.exponent);
        if gain < self.floor {
            0.0
        } else {
            gain
        }
    }

    /// Overwrite `gains` for a source at `position` and return the distance
    /// response the mixer should apply to the source's signal.
    ///
    /// An empty field leaves `gains` silent. Never allocates.
    pub fn compute(
        &self,
        position: &CartesianVector,
        layout: &FieldLayout,
        curve: &DistanceAttenuationCurve,
        gains: &mut GainVector,
    ) -> DistanceResponse {
        gains.clear();
        if layout.is_empty() {
            return DistanceResponse::UNITY;
        }

        let excess = position.chebyshev_length() - layout.radius();
        let response = curve.response(excess);
        let inside = clamp_to_cube(*position);
        for speaker in layout.speakers() {
            let distance = inside.distance_to(&speaker.position);
            gains.set(speaker.patch, self.speaker_gain(distance) * response.gain);
        }
        response
    }
}
