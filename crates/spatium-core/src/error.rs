//! Error types for spatium-core.

use thiserror::Error;

/// Error type for spatium-core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid output patch: {0}. Output patches start at 1")]
    InvalidOutputPatch(u32),

    #[error("Output patch {0} is used by more than one speaker")]
    DuplicateOutputPatch(u16),

    #[error("Output patch {patch} exceeds the configured maximum of {max} outputs")]
    OutputPatchOutOfRange { patch: u16, max: usize },
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
