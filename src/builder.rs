//! Builder for configuring and constructing a `SpatEngine`.

use crate::{Result, SpatEngine};
use spatium_core::{Dimension, FieldSettings, SpatConfig};
use spatium_dsp::SpatMode;
use tracing::debug;

/// Every setting starts from [`SpatConfig::default`]. `build()` validates
/// the configuration; the engine starts in its initial mode with no layout.
///
/// # Example
///
/// ```
/// use spatium::prelude::*;
///
/// let engine = SpatEngine::builder()
///     .sample_rate(44100.0)
///     .max_outputs(32)
///     .mode(SpatMode::Field)
///     .build()?;
///
/// assert_eq!(engine.mode(), SpatMode::Field);
/// assert!(!engine.is_ready());
/// # Ok::<(), spatium::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SpatEngineBuilder {
    config: SpatConfig,
    mode: SpatMode,
    dimension: Option<Dimension>,
}

impl Default for SpatEngineBuilder {
    fn default() -> Self {
        Self {
            config: SpatConfig::default(),
            mode: SpatMode::Vbap,
            dimension: None,
        }
    }
}

impl SpatEngineBuilder {
    /// Replace the whole configuration, e.g. one loaded with serde.
    pub fn config(mut self, config: SpatConfig) -> Self {
        self.config = config;
        self
    }

    /// Default: 48000
    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    /// Default: 64
    pub fn max_outputs(mut self, count: usize) -> Self {
        self.config.max_outputs = count;
        self
    }

    /// Per-source smoothing factor in [0, 1). Default: 0 (no smoothing)
    pub fn gain_interpolation(mut self, factor: f32) -> Self {
        self.config.gain_interpolation = factor;
        self
    }

    pub fn field(mut self, field: FieldSettings) -> Self {
        self.config.field = field;
        self
    }

    /// Default: [`SpatMode::Vbap`]
    pub fn mode(mut self, mode: SpatMode) -> Self {
        self.mode = mode;
        self
    }

    /// Force pairs or triplets in vector-base mode instead of detecting
    /// them from the layout.
    pub fn dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = Some(dimension);
        self
    }

    pub fn build(self) -> Result<SpatEngine> {
        self.config.validate()?;
        debug!(
            "Building engine: {:?} mode, {} outputs at {} Hz",
            self.mode, self.config.max_outputs, self.config.sample_rate
        );
        Ok(SpatEngine::from_parts(self.config, self.mode, self.dimension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let engine = SpatEngineBuilder::default().build().unwrap();
        assert_eq!(engine.mode(), SpatMode::Vbap);
        assert_eq!(engine.dimension(), None);
        assert_eq!(engine.config(), SpatConfig::default());
        assert_eq!(engine.version(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(SpatEngineBuilder::default().max_outputs(0).build().is_err());
        assert!(SpatEngineBuilder::default().sample_rate(1000.0).build().is_err());
        assert!(SpatEngineBuilder::default()
            .gain_interpolation(1.0)
            .build()
            .is_err());

        let field = FieldSettings {
            blur: 0.0,
            ..FieldSettings::default()
        };
        assert!(SpatEngineBuilder::default().field(field).build().is_err());
    }

    #[test]
    fn test_forced_dimension() {
        let engine = SpatEngineBuilder::default()
            .dimension(Dimension::Three)
            .build()
            .unwrap();
        assert_eq!(engine.dimension(), Some(Dimension::Three));
    }
}
