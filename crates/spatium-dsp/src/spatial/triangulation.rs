//! Triplet selection on the sphere.
//!
//! Candidate triangles are searched between elevation neighbors, every
//! connection crossing a shorter one is removed, and the triangles whose
//! three sides survive and that enclose no other speaker are kept.

use super::types::CoveringElement;
use spatium_core::{CartesianVector, OutputPatch};
use tracing::{debug, warn};

/// Two speakers further apart in elevation (degrees) never share a triangle
/// side found by the pair search.
const MAX_ELEVATION_DIFF: f32 = 10.0;

/// Triangles at or below this volume-over-perimeter ratio are too thin.
const MIN_VOL_P_SIDE_LENGTH: f32 = 0.01;

/// Great-circle tolerance (radians) of the crossing test.
const INTERSECTION_TOLERANCE: f32 = 0.01;

/// A speaker counts as inside a triangle unless one of its coefficients
/// falls below this.
const INSIDE_TOLERANCE: f32 = -0.001;

/// Geometry of one speaker as seen by the triangulation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Node {
    pub patch: OutputPatch,
    pub direction: CartesianVector,
    pub elevation: f32,
}

/// Symmetric n x n connection flags.
struct Connections {
    size: usize,
    flags: Vec<bool>,
}

impl Connections {
    fn new(size: usize) -> Self {
        Self {
            size,
            flags: vec![false; size * size],
        }
    }

    fn get(&self, a: usize, b: usize) -> bool {
        self.flags[a * self.size + b]
    }

    fn set(&mut self, a: usize, b: usize, connected: bool) {
        self.flags[a * self.size + b] = connected;
        self.flags[b * self.size + a] = connected;
    }
}

/// Volume of the parallelepiped spanned by three directions divided by the
/// triangle's perimeter in radians.
pub(crate) fn vol_p_side_lgth(i: &CartesianVector, j: &CartesianVector, k: &CartesianVector) -> f32 {
    let length = i.angle_with(j) + i.angle_with(k) + j.angle_with(k);
    if length <= 0.00001 {
        return 0.0;
    }
    i.cross(j).dot(k).abs() / length
}

/// Whether great-circle segments `i-j` and `k-l` cross.
///
/// Segments meeting at, or crossing near, one of their end points do not
/// count.
pub(crate) fn lines_intersect(
    i: &CartesianVector,
    j: &CartesianVector,
    k: &CartesianVector,
    l: &CartesianVector,
) -> bool {
    let v3 = i.cross(j).cross(&k.cross(l));
    let neg_v3 = -v3;

    let dist_ij = i.angle_with(j);
    let dist_kl = k.angle_with(l);
    let dist_iv3 = i.angle_with(&v3);
    let dist_jv3 = j.angle_with(&v3);
    let dist_kv3 = k.angle_with(&v3);
    let dist_lv3 = l.angle_with(&v3);
    let dist_inv3 = i.angle_with(&neg_v3);
    let dist_jnv3 = j.angle_with(&neg_v3);
    let dist_knv3 = k.angle_with(&neg_v3);
    let dist_lnv3 = l.angle_with(&neg_v3);

    let near_crossing = [
        dist_iv3, dist_jv3, dist_kv3, dist_lv3, dist_inv3, dist_jnv3, dist_knv3, dist_lnv3,
    ]
    .iter()
    .any(|d| d.abs() <= INTERSECTION_TOLERANCE);
    if near_crossing {
        return false;
    }

    let on_segment = |whole: f32, a: f32, b: f32| (whole - (a + b)).abs() <= INTERSECTION_TOLERANCE;
    (on_segment(dist_ij, dist_iv3, dist_jv3) && on_segment(dist_kl, dist_kv3, dist_lv3))
        || (on_segment(dist_ij, dist_inv3, dist_jnv3) && on_segment(dist_kl, dist_knv3, dist_lnv3))
}

/// Select the non-overlapping triplets covering `nodes`.
pub(crate) fn choose_triplets(nodes: &[Node]) -> Vec<CoveringElement> {
    let count = nodes.len();
    let mut by_elevation: Vec<usize> = (0..count).collect();
    by_elevation.sort_by(|a, b| nodes[*a].elevation.total_cmp(&nodes[*b].elevation));

    let mut connections = Connections::new(count);
    let mut candidates: Vec<[usize; 3]> = Vec::new();

    for i in 0..count {
        let first = by_elevation[i];
        for j in i + 1..count {
            let second = by_elevation[j];
            if nodes[second].elevation - nodes[first].elevation > MAX_ELEVATION_DIFF {
                break;
            }
            // Third vertices between i and j are covered by the narrower pairs.
            for (k, &third) in by_elevation.iter().enumerate() {
                if (i..=j).contains(&k) {
                    continue;
                }
                let volume = vol_p_side_lgth(
                    &nodes[first].direction,
                    &nodes[second].direction,
                    &nodes[third].direction,
                );
                if volume > MIN_VOL_P_SIDE_LENGTH {
                    connections.set(first, second, true);
                    connections.set(first, third, true);
                    connections.set(second, third, true);
                    let mut triangle = [first, second, third];
                    triangle.sort_unstable();
                    candidates.push(triangle);
                }
            }
        }
    }
    candidates.sort_unstable();
    candidates.dedup();

    let mut edges: Vec<(f32, usize, usize)> = Vec::new();
    for a in 0..count {
        for b in a + 1..count {
            if connections.get(a, b) {
                edges.push((nodes[a].direction.angle_with(&nodes[b].direction), a, b));
            }
        }
    }
    edges.sort_by(|x, y| x.0.total_cmp(&y.0));

    let mut disconnected = 0usize;
    for &(_, a, b) in &edges {
        if !connections.get(a, b) {
            continue;
        }
        for j in 0..count {
            for k in j + 1..count {
                if j == a || j == b || k == a || k == b || !connections.get(j, k) {
                    continue;
                }
                if lines_intersect(
                    &nodes[a].direction,
                    &nodes[b].direction,
                    &nodes[j].direction,
                    &nodes[k].direction,
                ) {
                    connections.set(j, k, false);
                    disconnected += 1;
                }
            }
        }
    }

    let candidate_count = candidates.len();
    let mut elements = Vec::new();
    for [a, b, c] in candidates {
        if !(connections.get(a, b) && connections.get(a, c) && connections.get(b, c)) {
            continue;
        }
        let Some(element) = CoveringElement::triplet(
            [nodes[a].patch, nodes[b].patch, nodes[c].patch],
            [nodes[a].direction, nodes[b].direction, nodes[c].direction],
        ) else {
            warn!(
                "Skipping degenerate triplet {} - {} - {}",
                nodes[a].patch, nodes[b].patch, nodes[c].patch
            );
            continue;
        };
        if any_speaker_inside(&element, nodes, [a, b, c]) {
            continue;
        }
        elements.push(element);
    }

    debug!(
        "Triplet selection finished: {} speakers, {} candidates, {} edges ({} disconnected), {} kept",
        count,
        candidate_count,
        edges.len(),
        disconnected,
        elements.len()
    );
    elements
}

fn any_speaker_inside(element: &CoveringElement, nodes: &[Node], members: [usize; 3]) -> bool {
    nodes
        .iter()
        .enumerate()
        .filter(|(index, _)| !members.contains(index))
        .any(|(_, node)| {
            element
                .project(&node.direction)
                .as_slice()
                .iter()
                .all(|c| *c >= INSIDE_TOLERANCE)
        })
}
