// (c) Copyright 2026 viaroute contributors
// SPDX-License-Identifier: MIT

use std::collections::{BinaryHeap, HashMap};

use crate::{Edge, Graph};

/// Recommended number of allowed node expansions in [shortest_path]
/// before [RouteError::Timeout] is returned.
pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

/// Error conditions of a route query.
///
/// An unreachable destination is deliberately not listed here; it is a
/// normal query outcome ([SearchOutcome::Unreachable]), not a fault.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum RouteError {
    /// A query coordinate is NaN or infinite.
    #[error("coordinate is not finite: {0}")]
    InvalidInput(f64),

    /// The graph has no nodes, so there is nothing to resolve
    /// coordinates against.
    #[error("the graph contains no nodes")]
    EmptyGraph,

    /// A start or end node id doesn't exist in the graph.
    #[error("unknown node: {0}")]
    UnknownNode(i64),

    /// Route search has exceeded its expansion budget.
    /// Either the nodes are really far apart, or no route exists.
    ///
    /// Concluding that no route exists requires traversing the whole graph,
    /// which can starve other concurrent queries. The step limit bounds the
    /// work a single pathological query may consume.
    #[error("search budget exceeded")]
    Timeout,
}

/// A minimum-weight path through the graph: the visited node ids from origin
/// to destination (inclusive) and the total length in meters.
///
/// `length` is the sum of the stored lengths of the traversed edges, so it
/// can be reproduced from `nodes` by re-summing [Graph::edge_length] over
/// consecutive pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    pub nodes: Vec<i64>,
    pub length: f64,
}

/// Outcome of a shortest-path search between two resolved nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Path(PathResult),
    /// The destination cannot be reached from the origin in the directed
    /// sense. Callers must branch on this, not treat it as an error.
    Unreachable,
}

#[derive(Debug, Clone, Copy)]
struct QueueItem {
    at: i64,
    cost: f64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cost.eq(&other.cost)
    }
}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for QueueItem {}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // NOTE: We revert the order of comparison,
        // as lower costs are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        other.cost.total_cmp(&self.cost)
    }
}

fn reconstruct_path(came_from: &HashMap<i64, i64>, mut last: i64) -> Vec<i64> {
    let mut path = vec![last];

    while let Some(&nd) = came_from.get(&last) {
        path.push(nd);
        last = nd;
    }

    path.reverse();
    path
}

/// Uses [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)
/// to find the minimum-length path between two nodes in the provided graph.
///
/// The search terminates as soon as the destination is extracted from the
/// priority queue; if the queue drains first, the destination is not
/// reachable from the origin and [SearchOutcome::Unreachable] is returned.
/// When `from_id == to_id` the trivial single-node, zero-length path is
/// returned without searching.
///
/// All per-call working state (queue, cost and predecessor maps) is
/// allocated fresh, so concurrent searches over a shared [Graph] need no
/// coordination.
///
/// `step_limit` limits how many nodes may be expanded before
/// [RouteError::Timeout] is returned. Concluding that no route exists
/// requires expanding every node reachable from the origin, which on large
/// road networks is very time-consuming. The recommended value is
/// [DEFAULT_STEP_LIMIT].
pub fn shortest_path(
    g: &Graph,
    from_id: i64,
    to_id: i64,
    step_limit: usize,
) -> Result<SearchOutcome, RouteError> {
    if !g.contains(from_id) {
        return Err(RouteError::UnknownNode(from_id));
    }
    if !g.contains(to_id) {
        return Err(RouteError::UnknownNode(to_id));
    }

    if from_id == to_id {
        return Ok(SearchOutcome::Path(PathResult {
            nodes: vec![from_id],
            length: 0.0,
        }));
    }

    let mut queue: BinaryHeap<QueueItem> = BinaryHeap::default();
    let mut came_from: HashMap<i64, i64> = HashMap::default();
    let mut known_costs: HashMap<i64, f64> = HashMap::default();
    let mut steps: usize = 0;

    queue.push(QueueItem {
        at: from_id,
        cost: 0.0,
    });
    known_costs.insert(from_id, 0.0);

    while let Some(item) = queue.pop() {
        if item.at == to_id {
            return Ok(SearchOutcome::Path(PathResult {
                nodes: reconstruct_path(&came_from, to_id),
                length: item.cost,
            }));
        }

        // Contrary to the textbook definition, we might keep multiple items
        // in the queue for the same node; skip the dominated ones.
        if item.cost > known_costs.get(&item.at).copied().unwrap_or(f64::INFINITY) {
            continue;
        }

        steps += 1;
        if steps > step_limit {
            return Err(RouteError::Timeout);
        }

        for &Edge {
            to: neighbor_id,
            length: edge_length,
        } in g.neighbors(item.at)
        {
            // Check if this is the cheapest way to the neighbor
            let neighbor_cost = item.cost + edge_length;
            if neighbor_cost
                >= known_costs
                    .get(&neighbor_id)
                    .copied()
                    .unwrap_or(f64::INFINITY)
            {
                continue;
            }

            // Push the new item into the queue
            came_from.insert(neighbor_id, item.at);
            known_costs.insert(neighbor_id, neighbor_cost);
            queue.push(QueueItem {
                at: neighbor_id,
                cost: neighbor_cost,
            });
        }
    }

    Ok(SearchOutcome::Unreachable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Graph, GraphBuilder, Node};

    //  B ───1─── C
    //  │         │
    //  1         1
    //  │         │
    //  A ───3─── D
    fn square_graph(scale: f64) -> Graph {
        let mut b = GraphBuilder::new();
        for (id, lat, lon) in [(1, 0.0, 0.0), (2, 0.0, 1.0), (3, 1.0, 1.0), (4, 1.0, 0.0)] {
            b.add_node(Node { id, lat, lon });
        }
        for (from, to, length) in [(1, 2, 1.0), (2, 3, 1.0), (1, 4, 3.0), (4, 3, 1.0)] {
            b.add_edge(from, to, length * scale);
            b.add_edge(to, from, length * scale);
        }
        b.build().unwrap()
    }

    fn expect_path(outcome: SearchOutcome) -> PathResult {
        match outcome {
            SearchOutcome::Path(p) => p,
            SearchOutcome::Unreachable => panic!("expected a path, got Unreachable"),
        }
    }

    #[test]
    fn picks_shorter_of_two_routes() {
        let g = square_graph(1.0);
        let path = expect_path(shortest_path(&g, 1, 3, DEFAULT_STEP_LIMIT).unwrap());
        assert_eq!(path.nodes, vec![1, 2, 3]);
        assert_eq!(path.length, 2.0);
    }

    #[test]
    fn optimal_path_survives_positive_scaling() {
        let g = square_graph(7.5);
        let path = expect_path(shortest_path(&g, 1, 3, DEFAULT_STEP_LIMIT).unwrap());
        assert_eq!(path.nodes, vec![1, 2, 3]);
        assert_eq!(path.length, 15.0);
    }

    #[test]
    fn reported_length_resums_over_returned_nodes() {
        let g = square_graph(1.0);
        let path = expect_path(shortest_path(&g, 4, 2, DEFAULT_STEP_LIMIT).unwrap());
        let resummed: f64 = path
            .nodes
            .windows(2)
            .map(|pair| g.edge_length(pair[0], pair[1]))
            .sum();
        assert_eq!(path.length, resummed);
    }

    #[test]
    fn same_origin_and_destination_is_a_trivial_path() {
        let g = square_graph(1.0);
        let path = expect_path(shortest_path(&g, 2, 2, DEFAULT_STEP_LIMIT).unwrap());
        assert_eq!(path.nodes, vec![2]);
        assert_eq!(path.length, 0.0);
    }

    #[test]
    fn disconnected_destination_is_unreachable() {
        // Remove all edges leading into C but keep a single outgoing C -> B
        // edge, so C still survives the largest-component restriction while
        // being unreachable in the directed sense.
        let mut b = GraphBuilder::new();
        for (id, lat, lon) in [(1, 0.0, 0.0), (2, 0.0, 1.0), (3, 1.0, 1.0), (4, 1.0, 0.0)] {
            b.add_node(Node { id, lat, lon });
        }
        for (from, to) in [(1, 2), (2, 1), (1, 4), (4, 1)] {
            b.add_edge(from, to, 1.0);
        }
        b.add_edge(3, 2, 1.0);
        let g = b.build().unwrap();

        assert_eq!(
            shortest_path(&g, 1, 3, DEFAULT_STEP_LIMIT).unwrap(),
            SearchOutcome::Unreachable
        );
    }

    #[test]
    fn unknown_endpoints_are_rejected() {
        let g = square_graph(1.0);
        assert_eq!(
            shortest_path(&g, 99, 1, DEFAULT_STEP_LIMIT),
            Err(RouteError::UnknownNode(99))
        );
        assert_eq!(
            shortest_path(&g, 1, 99, DEFAULT_STEP_LIMIT),
            Err(RouteError::UnknownNode(99))
        );
    }

    #[test]
    fn exhausted_step_limit_is_a_timeout() {
        let g = square_graph(1.0);
        assert_eq!(
            shortest_path(&g, 1, 3, 1),
            Err(RouteError::Timeout)
        );
    }
}
