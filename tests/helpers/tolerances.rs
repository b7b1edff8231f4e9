//! Tolerance constants for gain testing.

/// Floating point rounding errors (exact gains, identity matrices).
pub const FLOAT_EPSILON: f32 = 1e-5;

/// Gains derived through trigonometry and matrix inversion.
pub const GAIN_EPSILON: f32 = 1e-4;

/// Sum-of-squares checks after normalization.
pub const POWER_EPSILON: f32 = 1e-3;

/// Gains below this are considered silent.
pub const SILENCE_THRESHOLD: f32 = 1e-4;
