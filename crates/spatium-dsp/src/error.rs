//! Error types for spatium-dsp

use spatium_core::Dimension;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Insufficient speakers: {required} required, {found} found")]
    InsufficientSpeakers { required: usize, found: usize },

    #[error("Degenerate layout: no usable covering element for {dimension:?}")]
    DegenerateLayout { dimension: Dimension },

    #[error("Invalid dimension: {0}. Expected 2 or 3")]
    InvalidDimension(u8),

    #[error("No layout supplied for the active mode")]
    NoLayout,

    #[error(transparent)]
    Core(#[from] spatium_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
