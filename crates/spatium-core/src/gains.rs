//! Per-speaker gain buffers.

use crate::speaker::OutputPatch;

/// One non-negative gain per output, indexed by [`OutputPatch`].
///
/// Sized once from the configured output count; every operation after
/// construction is allocation-free so the buffer can live on the audio thread.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GainVector {
    gains: Vec<f32>,
}

impl GainVector {
    pub fn new(outputs: usize) -> Self {
        Self {
            gains: vec![0.0; outputs],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.gains.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gains.is_empty()
    }

    /// Gain for `patch`, 0 when the patch is outside the buffer.
    #[inline]
    pub fn get(&self, patch: OutputPatch) -> f32 {
        self.gains.get(patch.index()).copied().unwrap_or(0.0)
    }

    /// Patches outside the buffer are ignored.
    #[inline]
    pub fn set(&mut self, patch: OutputPatch, gain: f32) {
        if let Some(slot) = self.gains.get_mut(patch.index()) {
            *slot = gain;
        }
    }

    #[inline]
    pub fn add(&mut self, patch: OutputPatch, gain: f32) {
        if let Some(slot) = self.gains.get_mut(patch.index()) {
            *slot += gain;
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.gains.fill(0.0);
    }

    /// Accumulate `other * weight` into this vector.
    pub fn mix_from(&mut self, other: &GainVector, weight: f32) {
        for (dst, src) in self.gains.iter_mut().zip(&other.gains) {
            *dst += src * weight;
        }
    }

    /// Copy as many entries as both buffers hold; the remainder is zeroed.
    pub fn copy_from(&mut self, other: &GainVector) {
        let shared = self.gains.len().min(other.gains.len());
        self.gains[..shared].copy_from_slice(&other.gains[..shared]);
        self.gains[shared..].fill(0.0);
    }

    /// Sum of squared gains.
    pub fn power(&self) -> f32 {
        self.gains.iter().map(|g| g * g).sum()
    }

    /// Scale to unit L2 norm. A silent vector is left untouched.
    ///
    /// Returns `false` when there was nothing to normalize.
    pub fn normalize(&mut self) -> bool {
        let power = self.power();
        if power <= 0.0 {
            return false;
        }
        let scale = 1.0 / power.sqrt();
        for gain in &mut self.gains {
            *gain *= scale;
        }
        true
    }

    /// Non-zero entries as `(patch, gain)`.
    pub fn active(&self) -> impl Iterator<Item = (OutputPatch, f32)> + '_ {
        self.gains
            .iter()
            .enumerate()
            .filter(|(_, g)| **g != 0.0)
            .filter_map(|(i, g)| OutputPatch::from_index(i).map(|p| (p, *g)))
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.gains
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.gains
    }
}
