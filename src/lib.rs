//! # Spatium - Real-time Multichannel Panning
//!
//! Computes per-loudspeaker gains for moving sound sources on arbitrary
//! speaker layouts.
//!
//! ## Architecture
//!
//! Spatium is an umbrella crate that coordinates:
//! - **spatium-core** - Geometry, speaker setups, gain vectors, lock-free snapshots, config
//! - **spatium-dsp** - Layout analysis, gain solving, spread, field and stereo panning
//!
//! [`SpatEngine`] lives on the control context: it switches modes, analyzes
//! layouts and publishes complete snapshots. [`SpatRenderer`] lives on the
//! audio context: it reads the latest snapshot and fills gain buffers
//! without locking or allocating.
//!
//! ## Modes
//!
//! - `Vbap` - vector-base amplitude panning over pairs (2-D) or triplets (3-D)
//! - `Binaural` - vector-base panning on a fixed 16-speaker virtual dome
//! - `Field` - distance-based panning over a cube-shaped layout
//! - `Stereo` - constant-power pan on outputs 1 and 2
//!
//! ## Quick Start
//!
//! ```
//! use spatium::prelude::*;
//!
//! let engine = SpatEngine::builder().max_outputs(16).build()?;
//! let mut renderer = engine.renderer();
//!
//! // Octahedron: four speakers at ear level, one above, one below
//! engine.set_layout(SpeakerSetup::from_angles(&[
//!     (1, 0.0, 0.0),
//!     (2, 90.0, 0.0),
//!     (3, 180.0, 0.0),
//!     (4, -90.0, 0.0),
//!     (5, 0.0, 90.0),
//!     (6, 0.0, -90.0),
//! ])?)?;
//! assert_eq!(engine.triplets().len(), 8);
//!
//! let source = SourceState::new(30.0, 20.0).with_span(0.5, 0.5);
//! let gains = renderer.compute_gains(&source);
//! assert!((gains.power() - 1.0).abs() < 1e-3);
//! # Ok::<(), spatium::Error>(())
//! ```

/// Re-export of spatium-core for direct access
pub use spatium_core as core;

/// Re-export of spatium-dsp for direct access
pub use spatium_dsp as dsp;

// Core types
pub use spatium_core::{
    // Geometry
    wrap_azimuth,
    // Lock-free primitives
    AtomicFlag,
    AtomicFloat,
    CartesianVector,
    Dimension,
    // Config
    FieldSettings,
    // Gains
    GainSmoother,
    GainVector,
    // Speakers
    Loudspeaker,
    OutputPatch,
    PolarVector,
    // Sources
    RenderHint,
    SnapshotCell,
    SourceParams,
    SourceState,
    SpatConfig,
    SpeakerSetup,
    MAX_OUTPUTS,
};

// Panning
pub use spatium_dsp::{
    CoveringElement, CoveringSet, DistanceResponse, FieldLayout, FieldPanner, GainSolver,
    LayoutAnalyzer, SpatMode, Spatializer, SpreadSynthesizer, StereoPanner, Triplet,
    BINAURAL_SPEAKERS,
};

mod error;
pub use error::{Error, Result};

mod builder;
mod engine;

pub use builder::SpatEngineBuilder;
pub use engine::{SpatEngine, SpatRenderer};

/// Convenience prelude for common imports
pub mod prelude {
    // Main engine
    pub use crate::{SpatEngine, SpatEngineBuilder, SpatRenderer};

    // Errors
    pub use crate::{Error, Result};

    // Layouts and sources
    pub use crate::{
        Dimension, Loudspeaker, OutputPatch, PolarVector, RenderHint, SourceParams, SourceState,
        SpeakerSetup,
    };

    // Rendering
    pub use crate::{
        DistanceResponse, FieldSettings, GainSmoother, GainVector, SpatConfig, SpatMode, Triplet,
    };
}
