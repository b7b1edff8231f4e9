//! Per-source state read by the audio context each control cycle.

use crate::geometry::{CartesianVector, PolarVector};
use crate::lockfree::{AtomicFlag, AtomicFloat};
use serde::{Deserialize, Serialize};

/// Which renderer a source asks for in hybrid configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderHint {
    /// Follow the engine's active mode.
    #[default]
    Vector,
    /// Use the field panner even when the engine runs a vector-base mode.
    Field,
}

/// Direction, spread and hint of one source for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceState {
    /// Direction plus radius. Vector-base modes only use the angles.
    pub direction: PolarVector,
    /// Horizontal spread in [0, 1]
    pub azimuth_span: f32,
    /// Vertical spread in [0, 1]
    pub elevation_span: f32,
    pub hint: RenderHint,
}

impl SourceState {
    /// Point source on the unit sphere.
    pub fn new(azimuth: f32, elevation: f32) -> Self {
        Self {
            direction: PolarVector::unit(azimuth, elevation),
            azimuth_span: 0.0,
            elevation_span: 0.0,
            hint: RenderHint::Vector,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.direction.length = radius.max(0.0);
        self
    }

    /// Spans are clamped into [0, 1].
    pub fn with_span(mut self, azimuth_span: f32, elevation_span: f32) -> Self {
        self.azimuth_span = clamp_span(azimuth_span);
        self.elevation_span = clamp_span(elevation_span);
        self
    }

    pub fn with_hint(mut self, hint: RenderHint) -> Self {
        self.hint = hint;
        self
    }

    #[inline]
    pub fn is_spread(&self) -> bool {
        self.azimuth_span > 0.0 || self.elevation_span > 0.0
    }

    /// Unit direction vector, ignoring the radius.
    #[inline]
    pub fn unit_direction(&self) -> CartesianVector {
        self.direction.with_unit_length().to_cartesian()
    }

    /// Position in the field, radius included.
    #[inline]
    pub fn position(&self) -> CartesianVector {
        self.direction.to_cartesian()
    }
}

impl Default for SourceState {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[inline]
fn clamp_span(span: f32) -> f32 {
    if span.is_nan() {
        0.0
    } else {
        span.clamp(0.0, 1.0)
    }
}

/// Source parameters shared between the control and audio threads.
///
/// The control side writes individual fields, the audio side reads a
/// [`SourceState`] per cycle. Fields are independent atomics: a reader may
/// see a new azimuth with an old elevation for one cycle.
#[derive(Debug)]
pub struct SourceParams {
    azimuth: AtomicFloat,
    elevation: AtomicFloat,
    radius: AtomicFloat,
    azimuth_span: AtomicFloat,
    elevation_span: AtomicFloat,
    field_hint: AtomicFlag,
}

impl SourceParams {
    pub fn new(initial: SourceState) -> Self {
        Self {
            azimuth: AtomicFloat::new(initial.direction.azimuth),
            elevation: AtomicFloat::new(initial.direction.elevation),
            radius: AtomicFloat::new(initial.direction.length),
            azimuth_span: AtomicFloat::new(initial.azimuth_span),
            elevation_span: AtomicFloat::new(initial.elevation_span),
            field_hint: AtomicFlag::new(initial.hint == RenderHint::Field),
        }
    }

    pub fn set_direction(&self, azimuth: f32, elevation: f32) {
        self.azimuth.set(azimuth);
        self.elevation.set(elevation);
    }

    pub fn set_radius(&self, radius: f32) {
        self.radius.set(radius.max(0.0));
    }

    pub fn set_span(&self, azimuth_span: f32, elevation_span: f32) {
        self.azimuth_span.set(clamp_span(azimuth_span));
        self.elevation_span.set(clamp_span(elevation_span));
    }

    pub fn set_hint(&self, hint: RenderHint) {
        self.field_hint.set(hint == RenderHint::Field);
    }

    /// Current values. Lock-free, safe on the audio thread.
    #[inline]
    pub fn load(&self) -> SourceState {
        SourceState {
            direction: PolarVector::new(
                self.azimuth.get(),
                self.elevation.get(),
                self.radius.get(),
            ),
            azimuth_span: self.azimuth_span.get(),
            elevation_span: self.elevation_span.get(),
            hint: if self.field_hint.get() {
                RenderHint::Field
            } else {
                RenderHint::Vector
            },
        }
    }
}

impl Default for SourceParams {
    fn default() -> Self {
        Self::new(SourceState::default())
    }
}
