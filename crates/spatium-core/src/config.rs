//! Engine configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Largest number of physical outputs a gain vector can address.
pub const MAX_OUTPUTS: usize = 256;

/// Configuration for the panning engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatConfig {
    pub sample_rate: f64,
    /// Length of every gain vector. Fixed for the engine's lifetime.
    pub max_outputs: usize,
    /// One-pole factor applied to gains between cycles, in [0, 1)
    pub gain_interpolation: f32,
    pub field: FieldSettings,
}

impl Default for SpatConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            max_outputs: 64,
            gain_interpolation: 0.0,
            field: FieldSettings::default(),
        }
    }
}

impl SpatConfig {
    pub fn validate(&self) -> Result<()> {
        if !(8000.0..=384000.0).contains(&self.sample_rate) {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range (8000-384000 Hz)",
                self.sample_rate
            )));
        }
        if !(1..=MAX_OUTPUTS).contains(&self.max_outputs) {
            return Err(Error::InvalidConfig(format!(
                "max_outputs {} out of range (1-{MAX_OUTPUTS})",
                self.max_outputs
            )));
        }
        if !(0.0..1.0).contains(&self.gain_interpolation) {
            return Err(Error::InvalidConfig(format!(
                "gain_interpolation {} out of range [0, 1)",
                self.gain_interpolation
            )));
        }
        self.field.validate()
    }
}

/// Field panning parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    /// Attenuation in dB per doubling of distance to a speaker
    pub rolloff_db: f32,
    /// Minimum effective distance, keeps the gain finite at a speaker
    pub blur: f32,
    /// Gains below `-dynamic_range_db` are silenced
    pub dynamic_range_db: f32,
    /// Extra attenuation reached when the source is a full unit outside the field
    pub attenuation_db: f32,
    /// Low-pass cutoff reached at that same distance
    pub attenuation_hz: f32,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            rolloff_db: 6.0,
            blur: 0.2,
            dynamic_range_db: 60.0,
            attenuation_db: -12.0,
            attenuation_hz: 5000.0,
        }
    }
}

impl FieldSettings {
    pub fn validate(&self) -> Result<()> {
        if self.rolloff_db.is_nan() || self.rolloff_db <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "field rolloff_db {} must be positive",
                self.rolloff_db
            )));
        }
        if self.blur.is_nan() || self.blur <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "field blur {} must be positive",
                self.blur
            )));
        }
        if self.dynamic_range_db.is_nan() || self.dynamic_range_db <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "field dynamic_range_db {} must be positive",
                self.dynamic_range_db
            )));
        }
        if self.attenuation_db.is_nan() || self.attenuation_db > 0.0 {
            return Err(Error::InvalidConfig(format!(
                "field attenuation_db {} must not be positive",
                self.attenuation_db
            )));
        }
        if !(20.0..=20000.0).contains(&self.attenuation_hz) {
            return Err(Error::InvalidConfig(format!(
                "field attenuation_hz {} out of range (20-20000 Hz)",
                self.attenuation_hz
            )));
        }
        Ok(())
    }
}
