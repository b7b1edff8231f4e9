//! Per-source gain interpolation between control cycles.
//!
//! Each cycle the renderer hands the freshly solved gains to the smoother,
//! which moves its own state toward them with a one-pole step:
//!
//! ```text
//! current = current * factor + target * (1 - factor)
//! ```
//!
//! A factor of 0 jumps straight to the target.
//!
//! # Example
//!
//! ```
//! use spatium_core::{GainSmoother, GainVector, OutputPatch};
//!
//! let mut smoother = GainSmoother::new(4, 0.5);
//! let mut target = GainVector::new(4);
//! target.set(OutputPatch::new(1).unwrap(), 1.0);
//!
//! let gains = smoother.process(&target);
//! assert_eq!(gains.get(OutputPatch::new(1).unwrap()), 0.5);
//! ```

use crate::gains::GainVector;

/// Values closer to the target than this are snapped onto it.
const SNAP_THRESHOLD: f32 = 1e-6;

/// Smoothed gain vector owned by one source.
#[derive(Debug, Clone)]
pub struct GainSmoother {
    current: GainVector,
    factor: f32,
    primed: bool,
}

impl GainSmoother {
    /// `factor` is clamped into [0, 1).
    pub fn new(outputs: usize, factor: f32) -> Self {
        Self {
            current: GainVector::new(outputs),
            factor: clamp_factor(factor),
            primed: false,
        }
    }

    pub fn immediate(outputs: usize) -> Self {
        Self::new(outputs, 0.0)
    }

    #[inline]
    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn set_factor(&mut self, factor: f32) {
        self.factor = clamp_factor(factor);
    }

    /// Step toward `target` and return the smoothed gains.
    ///
    /// The first call after construction or [`reset`](Self::reset) jumps to
    /// the target so a new source does not fade in from silence.
    pub fn process(&mut self, target: &GainVector) -> &GainVector {
        if !self.primed || self.factor == 0.0 {
            self.current.copy_from(target);
            self.primed = true;
            return &self.current;
        }

        let factor = self.factor;
        let current = self.current.as_mut_slice();
        for (i, value) in current.iter_mut().enumerate() {
            let goal = target.as_slice().get(i).copied().unwrap_or(0.0);
            let next = *value * factor + goal * (1.0 - factor);
            *value = if (next - goal).abs() < SNAP_THRESHOLD {
                goal
            } else {
                next
            };
        }
        &self.current
    }

    #[inline]
    pub fn current(&self) -> &GainVector {
        &self.current
    }

    /// Forget the history; the next [`process`](Self::process) jumps.
    pub fn reset(&mut self) {
        self.current.clear();
        self.primed = false;
    }
}

#[inline]
fn clamp_factor(factor: f32) -> f32 {
    if factor.is_nan() {
        0.0
    } else {
        factor.clamp(0.0, 0.999)
    }
}
