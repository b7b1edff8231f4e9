//! The closed set of rendering modes and their per-layout state.

use super::binaural::virtual_setup;
use super::field::{DistanceAttenuationCurve, DistanceResponse, FieldLayout, FieldPanner};
use super::layout::LayoutAnalyzer;
use super::spread::SpreadSynthesizer;
use super::stereo::StereoPanner;
use super::types::{CoveringSet, Triplet};
use crate::{Error, Result};
use spatium_core::{Dimension, GainVector, RenderHint, SourceState, SpatConfig, SpeakerSetup};
use tracing::warn;

/// Rendering mode selected by the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpatMode {
    /// Vector-base amplitude panning on the physical layout
    #[default]
    Vbap,
    /// Vector-base panning on a fixed virtual dome, for headphones
    Binaural,
    /// Distance-based panning over a cube-like layout
    Field,
    /// Constant-power pan onto outputs 1 and 2
    Stereo,
}

/// Field layout together with the panner and distance curve that read it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRenderer {
    layout: FieldLayout,
    panner: FieldPanner,
    curve: DistanceAttenuationCurve,
}

impl FieldRenderer {
    pub fn new(setup: &SpeakerSetup, config: &SpatConfig) -> Self {
        Self {
            layout: FieldLayout::new(setup),
            panner: FieldPanner::new(&config.field),
            curve: DistanceAttenuationCurve::new(&config.field, config.sample_rate),
        }
    }

    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    #[inline]
    pub fn compute(&self, source: &SourceState, gains: &mut GainVector) -> DistanceResponse {
        self.panner
            .compute(&source.position(), &self.layout, &self.curve, gains)
    }
}

/// Everything the audio context needs to render sources in one mode.
///
/// Built on the control context, then published whole.
#[derive(Debug, Clone, PartialEq)]
pub enum Spatializer {
    /// Mode selected, layout not supplied yet: renders silence.
    Pending(SpatMode),
    /// The field layout serves sources hinted [`RenderHint::Field`].
    Vbap {
        covering: CoveringSet,
        field: FieldRenderer,
    },
    Binaural {
        covering: CoveringSet,
    },
    Field(FieldRenderer),
    Stereo(StereoPanner),
}

impl Spatializer {
    /// Build `mode` for `setup`.
    ///
    /// `dimension` forces pairs or triplets in vector-base mode; `None`
    /// detects it from the speakers' elevations. Binaural and stereo use
    /// fixed layouts and ignore `setup`.
    pub fn build(
        mode: SpatMode,
        setup: &SpeakerSetup,
        dimension: Option<Dimension>,
        config: &SpatConfig,
    ) -> Result<Self> {
        match mode {
            SpatMode::Vbap => {
                setup.validate(config.max_outputs)?;
                let dimension = dimension.unwrap_or_else(|| setup.detect_dimension());
                let covering = LayoutAnalyzer::build(setup, dimension)?;
                if covering.is_empty() {
                    return Err(Error::DegenerateLayout { dimension });
                }
                Ok(Spatializer::Vbap {
                    covering,
                    field: FieldRenderer::new(setup, config),
                })
            }
            SpatMode::Binaural => {
                let setup = virtual_setup();
                setup.validate(config.max_outputs)?;
                let covering = LayoutAnalyzer::build(&setup, Dimension::Three)?;
                if covering.is_empty() {
                    return Err(Error::DegenerateLayout {
                        dimension: Dimension::Three,
                    });
                }
                Ok(Spatializer::Binaural { covering })
            }
            SpatMode::Field => {
                setup.validate(config.max_outputs)?;
                let field = FieldRenderer::new(setup, config);
                if field.layout().is_empty() {
                    warn!("Field layout has no speakers, sources will be silent");
                }
                Ok(Spatializer::Field(field))
            }
            SpatMode::Stereo => {
                let panner = StereoPanner::default();
                let widest = panner.left().max(panner.right());
                if widest.index() >= config.max_outputs {
                    return Err(spatium_core::Error::OutputPatchOutOfRange {
                        patch: widest.get(),
                        max: config.max_outputs,
                    }
                    .into());
                }
                Ok(Spatializer::Stereo(panner))
            }
        }
    }

    pub fn mode(&self) -> SpatMode {
        match self {
            Spatializer::Pending(mode) => *mode,
            Spatializer::Vbap { .. } => SpatMode::Vbap,
            Spatializer::Binaural { .. } => SpatMode::Binaural,
            Spatializer::Field(_) => SpatMode::Field,
            Spatializer::Stereo(_) => SpatMode::Stereo,
        }
    }

    /// `false` while waiting for a layout.
    pub fn is_ready(&self) -> bool {
        !matches!(self, Spatializer::Pending(_))
    }

    pub fn covering_set(&self) -> Option<&CoveringSet> {
        match self {
            Spatializer::Vbap { covering, .. } | Spatializer::Binaural { covering } => {
                Some(covering)
            }
            Spatializer::Pending(_) | Spatializer::Field(_) | Spatializer::Stereo(_) => None,
        }
    }

    pub fn field_layout(&self) -> Option<&FieldLayout> {
        match self {
            Spatializer::Vbap { field, .. } | Spatializer::Field(field) => Some(field.layout()),
            Spatializer::Pending(_) | Spatializer::Binaural { .. } | Spatializer::Stereo(_) => {
                None
            }
        }
    }

    /// Covering elements for display; empty in modes without any.
    pub fn triplets(&self) -> Vec<Triplet> {
        self.covering_set()
            .map(CoveringSet::triplets)
            .unwrap_or_default()
    }

    pub fn has_triplets(&self) -> bool {
        self.covering_set().is_some_and(|set| !set.is_empty())
    }

    /// Overwrite `gains` for `source` and return the distance response for
    /// the mixer (unity outside field rendering).
    ///
    /// `scratch` must be as long as `gains`. Never allocates, never fails:
    /// a pending mode renders silence.
    pub fn compute(
        &self,
        source: &SourceState,
        scratch: &mut GainVector,
        gains: &mut GainVector,
    ) -> DistanceResponse {
        match self {
            Spatializer::Pending(_) => {
                gains.clear();
                DistanceResponse::UNITY
            }
            Spatializer::Vbap { field, .. } if source.hint == RenderHint::Field => {
                field.compute(source, gains)
            }
            Spatializer::Vbap { covering, .. } | Spatializer::Binaural { covering } => {
                SpreadSynthesizer::spread(source, covering, scratch, gains);
                DistanceResponse::UNITY
            }
            Spatializer::Field(field) => field.compute(source, gains),
            Spatializer::Stereo(panner) => {
                panner.compute(source, gains);
                DistanceResponse::UNITY
            }
        }
    }
}
