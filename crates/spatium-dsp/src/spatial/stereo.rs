use spatium_core::{GainVector, OutputPatch, SourceState};
use std::f32::consts::FRAC_PI_4;

const LEFT: OutputPatch = match OutputPatch::new(1) {
    Some(patch) => patch,
    None => panic!("output patch 1 is valid"),
};

const RIGHT: OutputPatch = match OutputPatch::new(2) {
    Some(patch) => patch,
    None => panic!("output patch 2 is valid"),
};

/// Constant-power pan onto a fixed left/right output pair.
///
/// Only the source's lateral position counts: a source behind the listener
/// pans like its mirror image in front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StereoPanner {
    left: OutputPatch,
    right: OutputPatch,
}

impl StereoPanner {
    pub fn new(left: OutputPatch, right: OutputPatch) -> Self {
        Self { left, right }
    }

    pub fn left(&self) -> OutputPatch {
        self.left
    }

    pub fn right(&self) -> OutputPatch {
        self.right
    }

    /// Left and right gain for a lateral position in [-1 (left), 1 (right)].
    #[inline]
    pub fn pan(position: f32) -> (f32, f32) {
        let angle = (position.clamp(-1.0, 1.0) + 1.0) * FRAC_PI_4;
        (angle.cos(), angle.sin())
    }

    /// Overwrite `gains` for `source`. Never allocates.
    pub fn compute(&self, source: &SourceState, gains: &mut GainVector) {
        gains.clear();
        let (left, right) = Self::pan(source.unit_direction().x);
        gains.set(self.left, left);
        gains.set(self.right, right);
    }
}

impl Default for StereoPanner {
    fn default() -> Self {
        Self::new(LEFT, RIGHT)
    }
}
