//! Loudspeaker identity and physical setups.

use crate::geometry::{CartesianVector, PolarVector};
use crate::{Error, Result};
use core::fmt;
use core::num::NonZeroU16;
use serde::{Deserialize, Serialize};

/// Two speakers closer than this in elevation (degrees) count as one layer.
const LAYER_TOLERANCE_DEG: f32 = 4.9;

/// Physical output channel a loudspeaker is routed to (1-based).
///
/// Doubles as the loudspeaker's identity: gain vectors are indexed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct OutputPatch(NonZeroU16);

impl OutputPatch {
    /// Returns `None` for patch 0.
    pub const fn new(patch: u16) -> Option<Self> {
        match NonZeroU16::new(patch) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }

    /// Zero-based slot in a gain vector.
    #[inline]
    pub const fn index(self) -> usize {
        self.0.get() as usize - 1
    }

    /// Inverse of [`index`](Self::index).
    pub fn from_index(index: usize) -> Option<Self> {
        u16::try_from(index + 1).ok().and_then(Self::new)
    }
}

impl TryFrom<u16> for OutputPatch {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        Self::new(value).ok_or(Error::InvalidOutputPatch(value as u32))
    }
}

impl From<OutputPatch> for u16 {
    fn from(patch: OutputPatch) -> Self {
        patch.get()
    }
}

impl fmt::Display for OutputPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Number of spatial dimensions a setup is panned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    /// Horizontal ring, panned between pairs
    Two,
    /// Sphere or dome, panned between triplets
    Three,
}

impl Dimension {
    /// `Some` for 2 or 3.
    pub const fn from_count(count: u8) -> Option<Self> {
        match count {
            2 => Some(Dimension::Two),
            3 => Some(Dimension::Three),
            _ => None,
        }
    }

    /// Entries per covering element (2 for pairs, 3 for triplets).
    #[inline]
    pub const fn count(self) -> usize {
        match self {
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }

    /// Smallest speaker count that can produce a covering set.
    #[inline]
    pub const fn min_speakers(self) -> usize {
        self.count() + 1
    }
}

/// One loudspeaker of a committed layout.
///
/// Immutable once built: a layout edit recreates the whole setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loudspeaker {
    patch: OutputPatch,
    position: CartesianVector,
    polar: PolarVector,
    direction: CartesianVector,
    direct_out: bool,
}

impl Loudspeaker {
    /// Speaker at a polar position. A zero radius is treated as 1.
    pub fn from_polar(patch: OutputPatch, polar: PolarVector) -> Self {
        let polar = if polar.length > 0.0 {
            polar
        } else {
            polar.with_unit_length()
        };
        Self::from_cartesian(patch, polar.to_cartesian())
    }

    /// Speaker at a cartesian position.
    ///
    /// A speaker at the origin has no direction; it is pointed to the front.
    pub fn from_cartesian(patch: OutputPatch, position: CartesianVector) -> Self {
        let direction = position
            .normalized()
            .unwrap_or(CartesianVector::new(0.0, 1.0, 0.0));
        Self {
            patch,
            position,
            polar: position.to_polar(),
            direction,
            direct_out: false,
        }
    }

    /// Mark as direct-out only: routed, but excluded from panning geometry.
    pub fn direct_out(mut self, direct_out: bool) -> Self {
        self.direct_out = direct_out;
        self
    }

    #[inline]
    pub fn patch(&self) -> OutputPatch {
        self.patch
    }

    #[inline]
    pub fn position(&self) -> CartesianVector {
        self.position
    }

    #[inline]
    pub fn polar(&self) -> PolarVector {
        self.polar
    }

    /// Unit-length direction vector.
    #[inline]
    pub fn direction(&self) -> CartesianVector {
        self.direction
    }

    #[inline]
    pub fn is_direct_out(&self) -> bool {
        self.direct_out
    }
}

/// Ordered list of loudspeakers as supplied by the host application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeakerSetup {
    speakers: Vec<Loudspeaker>,
}

impl SpeakerSetup {
    pub fn new(speakers: Vec<Loudspeaker>) -> Self {
        Self { speakers }
    }

    /// Setup from `(patch, azimuth, elevation)` triples on the unit sphere.
    pub fn from_angles(angles: &[(u16, f32, f32)]) -> Result<Self> {
        let speakers = angles
            .iter()
            .map(|&(patch, azimuth, elevation)| {
                let patch = OutputPatch::try_from(patch)?;
                Ok(Loudspeaker::from_polar(
                    patch,
                    PolarVector::unit(azimuth, elevation),
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(speakers))
    }

    pub fn push(&mut self, speaker: Loudspeaker) {
        self.speakers.push(speaker);
    }

    pub fn speakers(&self) -> &[Loudspeaker] {
        &self.speakers
    }

    pub fn len(&self) -> usize {
        self.speakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }

    /// Speakers that take part in panning geometry (direct-outs removed).
    pub fn geometric(&self) -> impl Iterator<Item = &Loudspeaker> + '_ {
        self.speakers.iter().filter(|s| !s.is_direct_out())
    }

    pub fn geometric_count(&self) -> usize {
        self.geometric().count()
    }

    pub fn get(&self, patch: OutputPatch) -> Option<&Loudspeaker> {
        self.speakers.iter().find(|s| s.patch() == patch)
    }

    /// Highest output patch in use, or 0 for an empty setup.
    pub fn max_patch(&self) -> u16 {
        self.speakers
            .iter()
            .map(|s| s.patch().get())
            .max()
            .unwrap_or(0)
    }

    /// 3-D as soon as one geometric speaker leaves the first one's layer.
    pub fn detect_dimension(&self) -> Dimension {
        let mut geometric = self.geometric();
        let Some(first) = geometric.next() else {
            return Dimension::Two;
        };
        let reference = first.polar().elevation;
        if geometric.any(|s| (s.polar().elevation - reference).abs() > LAYER_TOLERANCE_DEG) {
            Dimension::Three
        } else {
            Dimension::Two
        }
    }

    /// Check patch ranges and reject geometric speakers sharing a patch.
    ///
    /// Direct-out speakers may share patches with each other.
    pub fn validate(&self, max_outputs: usize) -> Result<()> {
        let mut seen = vec![false; max_outputs];
        for speaker in &self.speakers {
            let patch = speaker.patch();
            let Some(slot) = seen.get_mut(patch.index()) else {
                return Err(Error::OutputPatchOutOfRange {
                    patch: patch.get(),
                    max: max_outputs,
                });
            };
            if speaker.is_direct_out() {
                continue;
            }
            if *slot {
                return Err(Error::DuplicateOutputPatch(patch.get()));
            }
            *slot = true;
        }
        Ok(())
    }
}

impl FromIterator<Loudspeaker> for SpeakerSetup {
    fn from_iter<I: IntoIterator<Item = Loudspeaker>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(n: u16) -> OutputPatch {
        OutputPatch::new(n).unwrap()
    }

    #[test]
    fn test_output_patch_zero_rejected() {
        assert!(OutputPatch::new(0).is_none());
        assert_eq!(OutputPatch::try_from(0u16), Err(Error::InvalidOutputPatch(0)));
        assert_eq!(patch(3).index(), 2);
        assert_eq!(OutputPatch::from_index(2), Some(patch(3)));
    }

    #[test]
    fn test_detect_dimension_flat_ring() {
        let setup =
            SpeakerSetup::from_angles(&[(1, 0.0, 0.0), (2, 90.0, 3.0), (3, 180.0, -2.0)]).unwrap();
        assert_eq!(setup.detect_dimension(), Dimension::Two);
    }

    #[test]
    fn test_detect_dimension_dome() {
        let setup =
            SpeakerSetup::from_angles(&[(1, 0.0, 0.0), (2, 90.0, 0.0), (3, 0.0, 45.0)]).unwrap();
        assert_eq!(setup.detect_dimension(), Dimension::Three);
    }

    #[test]
    fn test_detect_dimension_ignores_direct_outs() {
        let mut setup = SpeakerSetup::from_angles(&[(1, 0.0, 0.0), (2, 90.0, 0.0)]).unwrap();
        setup.push(
            Loudspeaker::from_polar(patch(3), PolarVector::unit(0.0, 60.0)).direct_out(true),
        );
        assert_eq!(setup.detect_dimension(), Dimension::Two);
        assert_eq!(setup.geometric_count(), 2);
    }

    #[test]
    fn test_validate_duplicates_and_range() {
        let setup = SpeakerSetup::from_angles(&[(1, 0.0, 0.0), (1, 90.0, 0.0)]).unwrap();
        assert_eq!(setup.validate(8), Err(Error::DuplicateOutputPatch(1)));

        let setup = SpeakerSetup::from_angles(&[(9, 0.0, 0.0)]).unwrap();
        assert_eq!(
            setup.validate(8),
            Err(Error::OutputPatchOutOfRange { patch: 9, max: 8 })
        );
    }

    #[test]
    fn test_validate_allows_shared_direct_outs() {
        let mut setup = SpeakerSetup::from_angles(&[(1, 0.0, 0.0)]).unwrap();
        setup.push(Loudspeaker::from_polar(patch(2), PolarVector::unit(0.0, 0.0)).direct_out(true));
        setup.push(Loudspeaker::from_polar(patch(2), PolarVector::unit(0.0, 0.0)).direct_out(true));
        assert!(setup.validate(4).is_ok());
    }

    #[test]
    fn test_direction_is_unit_length() {
        let speaker = Loudspeaker::from_cartesian(patch(1), CartesianVector::new(2.0, 2.0, 1.0));
        assert!((speaker.direction().length() - 1.0).abs() < 1e-6);
        assert!((speaker.polar().length - 3.0).abs() < 1e-5);
    }
}
