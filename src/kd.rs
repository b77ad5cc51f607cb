// (c) Copyright 2026 viaroute contributors
// SPDX-License-Identifier: MIT

use crate::{earth_distance, Graph, Node};

/// KdTree implements the [k-d tree data structure](https://en.wikipedia.org/wiki/K-d_tree)
/// over a [Graph]'s node coordinates, speeding up the nearest-node lookup each
/// query starts with. The [Graph] is immutable once built, so the tree is
/// constructed exactly once and never rebuilt.
///
/// Node coordinates far outside the indexed area still resolve to the single
/// nearest node; there is no bounding-box rejection at this layer.
///
/// The splitting planes assume euclidean geometry, even though distances are
/// measured with [earth_distance]. This results in undefined behavior when
/// points are close to the antimeridian (180°/-180° longitude) or the poles,
/// or when the data spans multiple continents.
#[derive(Debug, Clone)]
pub struct KdTree {
    pivot: Node,
    left: Option<Box<KdTree>>,
    right: Option<Box<KdTree>>,
}

impl KdTree {
    /// Builds a k-d tree over all nodes of the provided [Graph].
    /// Returns [None] if the graph has no nodes.
    pub fn build(graph: &Graph) -> Option<Self> {
        let mut nodes = graph.iter().copied().collect::<Vec<_>>();
        Self::from_nodes(nodes.as_mut_slice())
    }

    /// Builds a k-d tree from a mutable slice of [Nodes](Node). Nodes will be
    /// reordered in the slice to facilitate building the tree.
    pub fn from_nodes(nodes: &mut [Node]) -> Option<Self> {
        Self::build_impl(nodes, false)
    }

    fn build_impl(nodes: &mut [Node], lon_divides: bool) -> Option<Self> {
        match nodes.len() {
            0 => None,
            1 => Some(Self {
                pivot: nodes[0],
                left: None,
                right: None,
            }),
            _ => {
                if lon_divides {
                    nodes.sort_by(|a, b| a.lon.total_cmp(&b.lon));
                } else {
                    nodes.sort_by(|a, b| a.lat.total_cmp(&b.lat));
                }
                let median = nodes.len() / 2;
                let pivot = nodes[median];
                let (left, right_and_pivot) = nodes.split_at_mut(median);
                let right = &mut right_and_pivot[1..];
                Some(Self {
                    pivot,
                    left: Self::build_impl(left, !lon_divides).map(Box::new),
                    right: Self::build_impl(right, !lon_divides).map(Box::new),
                })
            }
        }
    }

    /// Finds the [Node] closest to the given position.
    ///
    /// Deterministic: equidistant candidates resolve to the lowest node id,
    /// so repeated calls with identical input return the same node.
    pub fn nearest(&self, lat: f64, lon: f64) -> Node {
        self.nearest_impl(lat, lon, false).0
    }

    fn nearest_impl(&self, lat: f64, lon: f64, lon_divides: bool) -> (Node, f64) {
        // Start by assuming that pivot is the closest
        let mut best = self.pivot;
        let mut best_dist = earth_distance(lat, lon, best.lat, best.lon);

        // Select which branch to recurse into first
        let first_left = if lon_divides {
            lon < self.pivot.lon
        } else {
            lat < self.pivot.lat
        };
        let (first, second) = if first_left {
            (&self.left, &self.right)
        } else {
            (&self.right, &self.left)
        };

        // Recurse into the first branch
        if let Some(branch) = first {
            let (alt, alt_dist) = branch.nearest_impl(lat, lon, !lon_divides);
            if alt_dist < best_dist || (alt_dist == best_dist && alt.id < best.id) {
                best = alt;
                best_dist = alt_dist;
            }
        }

        // (Optionally) recurse into the second branch. A better candidate is
        // possible there if and only if the splitting axis is no further away
        // than the current best; "no further" rather than "closer", so that
        // equidistant nodes across the axis still take part in the id
        // tie-break.
        if let Some(branch) = second {
            let (axis_lat, axis_lon) = if lon_divides {
                (lat, self.pivot.lon)
            } else {
                (self.pivot.lat, lon)
            };
            let dist_to_axis = earth_distance(lat, lon, axis_lat, axis_lon);

            if dist_to_axis <= best_dist {
                let (alt, alt_dist) = branch.nearest_impl(lat, lon, !lon_divides);
                if alt_dist < best_dist || (alt_dist == best_dist && alt.id < best.id) {
                    best = alt;
                    best_dist = alt_dist;
                }
            }
        }

        (best, best_dist)
    }
}
