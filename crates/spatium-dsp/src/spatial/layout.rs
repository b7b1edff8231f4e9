//! Covering-set construction from a physical speaker setup.

use super::triangulation::{choose_triplets, Node};
use super::types::{CoveringElement, CoveringSet};
use crate::{Error, Result};
use spatium_core::{Dimension, OutputPatch, SpeakerSetup};
use tracing::{debug, warn};

/// Adjacent speakers further apart than this (degrees) leave a gap instead
/// of forming a pair.
const MAX_PAIR_GAP_DEG: f32 = 170.0;

/// Builds the pairs (2-D) or triplets (3-D) that cover a layout.
///
/// Runs on the control context only. Direct-out speakers are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutAnalyzer;

impl LayoutAnalyzer {
    /// Covering set of `setup` in the given dimension.
    ///
    /// Fails with [`Error::InsufficientSpeakers`] when fewer than
    /// `dimension + 1` geometric speakers are present. Degenerate geometry
    /// yields a partial or empty set; callers decide whether that is usable.
    pub fn build(setup: &SpeakerSetup, dimension: Dimension) -> Result<CoveringSet> {
        let nodes: Vec<Node> = setup
            .geometric()
            .map(|speaker| Node {
                patch: speaker.patch(),
                direction: speaker.direction(),
                elevation: speaker.polar().elevation,
            })
            .collect();

        let required = dimension.min_speakers();
        if nodes.len() < required {
            return Err(Error::InsufficientSpeakers {
                required,
                found: nodes.len(),
            });
        }

        let elements = match dimension {
            Dimension::Two => choose_pairs(&nodes),
            Dimension::Three => choose_triplets(&nodes),
        };
        let speakers: Vec<OutputPatch> = nodes.iter().map(|node| node.patch).collect();

        debug!(
            "Covering set built: {:?}, {} speakers, {} elements",
            dimension,
            speakers.len(),
            elements.len()
        );
        Ok(CoveringSet::new(dimension, elements, speakers))
    }

    /// Like [`build`](Self::build), with the dimension detected from the
    /// speakers' elevations.
    pub fn build_detected(setup: &SpeakerSetup) -> Result<CoveringSet> {
        Self::build(setup, setup.detect_dimension())
    }

    /// Parse a numeric dimension (2 or 3).
    pub fn dimension(count: u8) -> Result<Dimension> {
        Dimension::from_count(count).ok_or(Error::InvalidDimension(count))
    }
}

/// Horizontal angle in degrees, in the frame the pair inverses are built in.
fn plane_angle(node: &Node) -> f32 {
    node.direction.y.atan2(node.direction.x).to_degrees()
}

fn choose_pairs(nodes: &[Node]) -> Vec<CoveringElement> {
    let mut sorted: Vec<(f32, &Node)> = nodes.iter().map(|n| (plane_angle(n), n)).collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut elements = Vec::with_capacity(sorted.len());
    let last = sorted.len() - 1;
    for i in 0..sorted.len() {
        let (angle, node) = sorted[i];
        let (next_angle, next) = if i == last {
            (sorted[0].0 + 360.0, sorted[0].1)
        } else {
            sorted[i + 1]
        };

        let gap = next_angle - angle;
        if gap > MAX_PAIR_GAP_DEG {
            warn!(
                "Gap of {:.1} degrees between speakers {} and {} is too wide, directions inside are not covered",
                gap, node.patch, next.patch
            );
            continue;
        }
        match CoveringElement::pair([node.patch, next.patch], [node.direction, next.direction]) {
            Some(element) => elements.push(element),
            None => warn!(
                "Skipping degenerate pair {} - {}",
                node.patch, next.patch
            ),
        }
    }
    elements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(count: u16) -> SpeakerSetup {
        let angles: Vec<(u16, f32, f32)> = (0..count)
            .map(|i| (i + 1, i as f32 * 360.0 / count as f32, 0.0))
            .collect();
        SpeakerSetup::from_angles(&angles).unwrap()
    }

    #[test]
    fn test_ring_of_eight_gives_eight_pairs() {
        let set = LayoutAnalyzer::build(&ring(8), Dimension::Two).unwrap();
        assert_eq!(set.len(), 8);
        assert_eq!(set.dimension(), Dimension::Two);
        // Every speaker appears in exactly two pairs.
        for patch in set.speakers() {
            let count = set.elements().iter().filter(|e| e.contains(*patch)).count();
            assert_eq!(count, 2);
        }
    }

    #[test]
    fn test_wide_gap_is_left_uncovered() {
        let setup = SpeakerSetup::from_angles(&[(1, -30.0, 0.0), (2, 0.0, 0.0), (3, 30.0, 0.0)])
            .unwrap();
        let set = LayoutAnalyzer::build(&setup, Dimension::Two).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_insufficient_speakers() {
        let setup = SpeakerSetup::from_angles(&[(1, 0.0, 0.0), (2, 90.0, 0.0), (3, 0.0, 45.0)])
            .unwrap();
        assert_eq!(
            LayoutAnalyzer::build(&setup, Dimension::Three),
            Err(Error::InsufficientSpeakers {
                required: 4,
                found: 3
            })
        );
        let pair = SpeakerSetup::from_angles(&[(1, 30.0, 0.0), (2, -30.0, 0.0)]).unwrap();
        assert!(matches!(
            LayoutAnalyzer::build(&pair, Dimension::Two),
            Err(Error::InsufficientSpeakers { .. })
        ));
    }

    #[test]
    fn test_coplanar_three_d_is_empty() {
        let set = LayoutAnalyzer::build(&ring(6), Dimension::Three).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_build_detected() {
        let set = LayoutAnalyzer::build_detected(&ring(4)).unwrap();
        assert_eq!(set.dimension(), Dimension::Two);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_dimension_parse() {
        assert_eq!(LayoutAnalyzer::dimension(3), Ok(Dimension::Three));
        assert_eq!(LayoutAnalyzer::dimension(4), Err(Error::InvalidDimension(4)));
    }
}
