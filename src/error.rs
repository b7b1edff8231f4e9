//! Error types for the umbrella crate

use thiserror::Error;

/// Error type covering every fallible Spatium operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] spatium_core::Error),

    #[error("DSP: {0}")]
    Dsp(#[from] spatium_dsp::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
