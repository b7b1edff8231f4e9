//! Common types for vector-base panning

use spatium_core::{CartesianVector, Dimension, OutputPatch};

/// Pairs whose 2x2 determinant is at or below this are skipped.
pub(crate) const PAIR_DETERMINANT_EPSILON: f32 = 0.001;

/// Triplets whose 3x3 determinant is at or below this are skipped.
pub(crate) const TRIPLET_DETERMINANT_EPSILON: f32 = 1e-6;

/// Raw gain coefficients of one covering element for one direction.
///
/// Holds 2 values for a pair, 3 for a triplet. Values may be negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    values: [f32; 3],
    len: usize,
}

impl Coefficients {
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.values[..self.len]
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.values[..self.len]
    }

    /// Smallest coefficient.
    #[inline]
    pub fn min(&self) -> f32 {
        self.as_slice().iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Number of coefficients strictly below `threshold`.
    #[inline]
    pub fn count_below(&self, threshold: f32) -> usize {
        self.as_slice().iter().filter(|c| **c < threshold).count()
    }
}

/// Minimal group of speakers whose directions span one region of the
/// circle (pair) or sphere (triplet), with the inverse of their direction
/// matrix.
///
/// The inverse maps a direction to one raw gain per speaker: projecting a
/// member speaker's own direction yields 1 for it and 0 for the others.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoveringElement {
    Pair {
        speakers: [OutputPatch; 2],
        /// Row-major 2x2 inverse over the horizontal (x, y) plane
        inverse: [f32; 4],
    },
    Triplet {
        speakers: [OutputPatch; 3],
        /// Row-major 3x3 inverse, row `i` yields the gain of `speakers[i]`
        inverse: [f32; 9],
    },
}

impl CoveringElement {
    /// Pair from two directions projected onto the horizontal plane.
    ///
    /// `None` when the projected directions are collinear or coincident.
    pub fn pair(speakers: [OutputPatch; 2], directions: [CartesianVector; 2]) -> Option<Self> {
        let a1 = directions[0].y.atan2(directions[0].x);
        let a2 = directions[1].y.atan2(directions[1].x);
        let (x1, x2) = (a1.cos(), a1.sin());
        let (x3, x4) = (a2.cos(), a2.sin());

        let det = x1 * x4 - x3 * x2;
        if det.abs() <= PAIR_DETERMINANT_EPSILON {
            return None;
        }
        Some(CoveringElement::Pair {
            speakers,
            inverse: [x4 / det, -x3 / det, -x2 / det, x1 / det],
        })
    }

    /// Triplet from three unit directions, using the closed-form cofactor
    /// inverse.
    ///
    /// `None` when the directions are coplanar with the origin.
    pub fn triplet(speakers: [OutputPatch; 3], directions: [CartesianVector; 3]) -> Option<Self> {
        let [l1, l2, l3] = directions;
        let det = l1.dot(&l2.cross(&l3));
        if det.abs() <= TRIPLET_DETERMINANT_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let r0 = l2.cross(&l3) * inv_det;
        let r1 = l3.cross(&l1) * inv_det;
        let r2 = l1.cross(&l2) * inv_det;
        Some(CoveringElement::Triplet {
            speakers,
            inverse: [r0.x, r0.y, r0.z, r1.x, r1.y, r1.z, r2.x, r2.y, r2.z],
        })
    }

    /// Member speakers, in the order of the inverse's rows.
    #[inline]
    pub fn speakers(&self) -> &[OutputPatch] {
        match self {
            CoveringElement::Pair { speakers, .. } => speakers,
            CoveringElement::Triplet { speakers, .. } => speakers,
        }
    }

    #[inline]
    pub fn inverse(&self) -> &[f32] {
        match self {
            CoveringElement::Pair { inverse, .. } => inverse,
            CoveringElement::Triplet { inverse, .. } => inverse,
        }
    }

    #[inline]
    pub fn dimension(&self) -> Dimension {
        match self {
            CoveringElement::Pair { .. } => Dimension::Two,
            CoveringElement::Triplet { .. } => Dimension::Three,
        }
    }

    /// Raw per-speaker coefficients for `direction`.
    #[inline]
    pub fn project(&self, direction: &CartesianVector) -> Coefficients {
        match self {
            CoveringElement::Pair { inverse: m, .. } => Coefficients {
                values: [
                    direction.x * m[0] + direction.y * m[1],
                    direction.x * m[2] + direction.y * m[3],
                    0.0,
                ],
                len: 2,
            },
            CoveringElement::Triplet { inverse: m, .. } => Coefficients {
                values: [
                    direction.x * m[0] + direction.y * m[1] + direction.z * m[2],
                    direction.x * m[3] + direction.y * m[4] + direction.z * m[5],
                    direction.x * m[6] + direction.y * m[7] + direction.z * m[8],
                ],
                len: 3,
            },
        }
    }

    pub fn contains(&self, patch: OutputPatch) -> bool {
        self.speakers().contains(&patch)
    }

    pub fn to_triplet(&self) -> Triplet {
        match *self {
            CoveringElement::Pair { speakers, .. } => Triplet {
                id1: speakers[0],
                id2: speakers[1],
                id3: None,
            },
            CoveringElement::Triplet { speakers, .. } => Triplet {
                id1: speakers[0],
                id2: speakers[1],
                id3: Some(speakers[2]),
            },
        }
    }
}

/// Covering elements for one layout plus the speakers that took part in it.
///
/// Built once per layout on the control context and read-only afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct CoveringSet {
    dimension: Dimension,
    elements: Vec<CoveringElement>,
    speakers: Vec<OutputPatch>,
}

impl CoveringSet {
    pub fn new(
        dimension: Dimension,
        elements: Vec<CoveringElement>,
        speakers: Vec<OutputPatch>,
    ) -> Self {
        Self {
            dimension,
            elements,
            speakers,
        }
    }

    #[inline]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[inline]
    pub fn elements(&self) -> &[CoveringElement] {
        &self.elements
    }

    /// Geometric speakers of the layout; spread fills and normalizes over these.
    #[inline]
    pub fn speakers(&self) -> &[OutputPatch] {
        &self.speakers
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements as visualization triplets.
    pub fn triplets(&self) -> Vec<Triplet> {
        self.elements.iter().map(CoveringElement::to_triplet).collect()
    }
}

/// Speaker ids of one covering element, for display.
///
/// Pairs leave `id3` empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triplet {
    pub id1: OutputPatch,
    pub id2: OutputPatch,
    pub id3: Option<OutputPatch>,
}

impl Triplet {
    pub fn contains(&self, patch: OutputPatch) -> bool {
        self.id1 == patch || self.id2 == patch || self.id3 == Some(patch)
    }

    /// Same speakers regardless of order.
    pub fn is_same_as(&self, other: &Triplet) -> bool {
        self.id3.is_some() == other.id3.is_some()
            && self.contains(other.id1)
            && self.contains(other.id2)
            && other.id3.map_or(true, |id| self.contains(id))
            && other.contains(self.id1)
            && other.contains(self.id2)
    }
}
