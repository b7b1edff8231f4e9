//! Fixed virtual speaker dome rendered to headphones downstream.

use spatium_core::{Loudspeaker, OutputPatch, PolarVector, SpeakerSetup};

/// Virtual speakers on the ear-level ring and on the 45 degree ring.
const RING_SIZE: u16 = 8;
const UPPER_ELEVATION: f32 = 45.0;

/// Number of virtual speakers (and of outputs the binaural mode writes).
pub const BINAURAL_SPEAKERS: usize = 2 * RING_SIZE as usize;

/// The virtual layout binaural mode pans on.
///
/// Outputs 1-8 sit at ear level every 45 degrees starting in front, outputs
/// 9-16 at 45 degrees up, offset by 22.5 degrees.
pub fn virtual_setup() -> SpeakerSetup {
    let step = 360.0 / RING_SIZE as f32;
    (1..=2 * RING_SIZE)
        .filter_map(|n| {
            let ring = (n - 1) / RING_SIZE;
            let slot = ((n - 1) % RING_SIZE) as f32;
            let polar = if ring == 0 {
                PolarVector::unit(slot * step, 0.0)
            } else {
                PolarVector::unit(slot * step + step * 0.5, UPPER_ELEVATION)
            };
            OutputPatch::new(n).map(|patch| Loudspeaker::from_polar(patch, polar))
        })
        .collect()
}
