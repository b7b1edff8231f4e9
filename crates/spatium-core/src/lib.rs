//! Core types for the Spatium panning engine.
//!
//! # Primary API
//!
//! - [`SpeakerSetup`] / [`Loudspeaker`] / [`OutputPatch`]: physical layouts
//! - [`CartesianVector`] / [`PolarVector`]: listener-centered geometry
//! - [`GainVector`]: per-output gains, indexed by output patch
//! - [`SourceState`] / [`SourceParams`]: per-source direction and spread
//! - [`SnapshotCell`]: lock-free handoff from the control to the audio context
//! - [`GainSmoother`]: per-source gain interpolation
//! - [`SpatConfig`]: engine configuration
//!
//! # Example
//!
//! ```
//! use spatium_core::{Dimension, SpeakerSetup};
//!
//! let setup = SpeakerSetup::from_angles(&[
//!     (1, 30.0, 0.0),
//!     (2, -30.0, 0.0),
//!     (3, 110.0, 0.0),
//!     (4, -110.0, 0.0),
//! ])?;
//! assert_eq!(setup.detect_dimension(), Dimension::Two);
//! setup.validate(8)?;
//! # Ok::<(), spatium_core::Error>(())
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{FieldSettings, SpatConfig, MAX_OUTPUTS};

pub mod geometry;
pub use geometry::{wrap_azimuth, CartesianVector, PolarVector};

pub mod speaker;
pub use speaker::{Dimension, Loudspeaker, OutputPatch, SpeakerSetup};

pub mod gains;
pub use gains::GainVector;

pub mod source;
pub use source::{RenderHint, SourceParams, SourceState};

pub(crate) mod lockfree;
pub use lockfree::{AtomicFlag, AtomicFloat};

pub mod snapshot;
pub use snapshot::SnapshotCell;

pub mod smooth;
pub use smooth::GainSmoother;
