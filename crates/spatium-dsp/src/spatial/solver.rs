//! Per-source gain solve against a covering set.

use super::types::{Coefficients, CoveringElement, CoveringSet};
use spatium_core::{CartesianVector, GainVector};

/// Coefficients below this count as clipped when ranking elements.
const NEGATIVE_THRESHOLD: f32 = -0.05;

/// Picks the element that best contains a direction and writes its gains.
#[derive(Debug, Clone, Copy, Default)]
pub struct GainSolver;

impl GainSolver {
    /// Best-fitting element for `direction` and its raw coefficients.
    ///
    /// Elements with fewer clipped coefficients win; ties go to the larger
    /// smallest coefficient. `None` only for an empty set.
    pub fn select(
        direction: &CartesianVector,
        set: &CoveringSet,
    ) -> Option<(CoveringElement, Coefficients)> {
        let mut best: Option<(CoveringElement, Coefficients, usize, f32)> = None;
        for element in set.elements() {
            let coefficients = element.project(direction);
            let negatives = coefficients.count_below(NEGATIVE_THRESHOLD);
            let smallest = coefficients.min();
            let better = match &best {
                None => true,
                Some((_, _, best_negatives, best_smallest)) => {
                    negatives < *best_negatives
                        || (negatives == *best_negatives && smallest > *best_smallest)
                }
            };
            if better {
                best = Some((*element, coefficients, negatives, smallest));
            }
        }
        best.map(|(element, coefficients, _, _)| (element, coefficients))
    }

    /// Overwrite `gains` with the non-negative gains for `direction`.
    ///
    /// Only the winning element's speakers receive gain. A direction that
    /// leaves every coefficient at or below zero gets unity on all of the
    /// element's speakers. An empty set leaves `gains` silent.
    /// Never allocates.
    pub fn solve(direction: &CartesianVector, set: &CoveringSet, gains: &mut GainVector) {
        gains.clear();
        let Some((element, mut coefficients)) = Self::select(direction, set) else {
            return;
        };

        if coefficients.as_slice().iter().all(|c| *c <= 0.0) {
            coefficients.as_mut_slice().fill(1.0);
        }
        for (patch, coefficient) in element.speakers().iter().zip(coefficients.as_slice()) {
            gains.set(*patch, coefficient.max(0.0));
        }
    }
}
