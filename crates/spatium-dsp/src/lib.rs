//! Panning algorithms: covering-set analysis (2-D pairs, 3-D triplets),
//! per-source gain solving and spread, field panning, and the [`Spatializer`]
//! variant that ties them to a rendering mode.
//!
//! Layout analysis runs on the control context and may fail. Everything that
//! computes gains is allocation-free and total.

mod error;
pub use error::{Error, Result};

mod spatial;
pub use spatial::binaural::{self, BINAURAL_SPEAKERS};
pub use spatial::{
    Coefficients, CoveringElement, CoveringSet, DistanceAttenuationCurve, DistanceResponse,
    FieldLayout, FieldPanner, FieldRenderer, FieldSpeaker, GainSolver, LayoutAnalyzer, SpatMode,
    Spatializer, SpreadSynthesizer, StereoPanner, Triplet,
};
