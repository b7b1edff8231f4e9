//! Vector-base, field, binaural and stereo panning.

pub mod types;
pub use types::{Coefficients, CoveringElement, CoveringSet, Triplet};

mod triangulation;

mod layout;
pub use layout::LayoutAnalyzer;

mod solver;
pub use solver::GainSolver;

mod spread;
pub use spread::SpreadSynthesizer;

mod field;
pub use field::{
    DistanceAttenuationCurve, DistanceResponse, FieldLayout, FieldPanner, FieldSpeaker,
};

mod stereo;
pub use stereo::StereoPanner;

pub mod binaural;

mod spatializer;
pub use spatializer::{FieldRenderer, SpatMode, Spatializer};
