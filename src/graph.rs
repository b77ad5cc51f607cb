// (c) Copyright 2026 viaroute contributors
// SPDX-License-Identifier: MIT

use crate::{Edge, Node};
use std::collections::btree_map::BTreeMap;
use std::collections::{HashMap, HashSet, VecDeque};

/// Data errors detected while building a [Graph].
///
/// These are construction-time invariant violations: a service must refuse
/// to start rather than route over an inconsistent graph.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// An edge references a node id not present in the node set.
    #[error("edge {from} -> {to} references a missing node")]
    DanglingEdge { from: i64, to: i64 },

    /// An edge has a NaN, infinite or negative length.
    #[error("edge {from} -> {to} has invalid length {length}")]
    InvalidLength { from: i64, to: i64, length: f64 },
}

/// Represents a road network as a set of [Nodes](Node) and directed
/// [Edges](Edge) between them.
///
/// A `Graph` can only be obtained through [GraphBuilder] and exposes no
/// mutation: once built it is safe to share across concurrently executing
/// queries without locking.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph(BTreeMap<i64, (Node, Vec<Edge>)>);

impl Graph {
    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the graph contains no nodes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the total number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.0.values().map(|(_, edges)| edges.len()).sum()
    }

    /// Returns an iterator over all [Nodes](Node) in the graph,
    /// in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.0.iter().map(|(_, (node, _))| node)
    }

    /// Returns true if a node with the given id exists in the graph.
    pub fn contains(&self, id: i64) -> bool {
        self.0.contains_key(&id)
    }

    /// Retrieves the [Node] with the provided id.
    pub fn node(&self, id: i64) -> Option<Node> {
        self.0.get(&id).map(|&(node, _)| node)
    }

    /// Gets all outgoing [Edges](Edge) from the node with the given id,
    /// in insertion order.
    pub fn neighbors(&self, from_id: i64) -> &[Edge] {
        self.0
            .get(&from_id)
            .map(|(_, e)| e.as_slice())
            .unwrap_or_default()
    }

    /// Gets the length of the [Edge] from one node to another.
    /// If no such edge exists, returns [f64::INFINITY].
    pub fn edge_length(&self, from_id: i64, to_id: i64) -> f64 {
        self.neighbors(from_id)
            .iter()
            .find_map(|edge| (edge.to == to_id).then_some(edge.length))
            .unwrap_or(f64::INFINITY)
    }
}

/// Accumulates a node list and an edge list, validates them, and produces
/// an immutable [Graph].
///
/// [build](GraphBuilder::build) restricts the result to its largest
/// weakly-connected component, so that an unreachable destination reflects a
/// genuine one-way constraint rather than an orphaned map fragment.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: BTreeMap<i64, Node>,
    edges: Vec<(i64, Edge)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a [Node]. Re-adding an id overwrites the previous coordinates.
    pub fn add_node(&mut self, node: Node) -> &mut Self {
        self.nodes.insert(node.id, node);
        self
    }

    /// Adds a directed edge with a length in meters. Endpoint existence and
    /// length validity are checked in [build](GraphBuilder::build).
    pub fn add_edge(&mut self, from: i64, to: i64, length: f64) -> &mut Self {
        self.edges.push((from, Edge { to, length }));
        self
    }

    /// Validates the accumulated data and builds the [Graph].
    ///
    /// Parallel edges between the same node pair collapse to the minimum
    /// length (equal lengths keep the first added). After validation the
    /// graph is restricted to its largest weakly-connected component.
    pub fn build(self) -> Result<Graph, BuildError> {
        let mut adjacency: BTreeMap<i64, (Node, Vec<Edge>)> = self
            .nodes
            .into_iter()
            .map(|(id, node)| (id, (node, Vec::new())))
            .collect();

        for (from, edge) in self.edges {
            if !edge.length.is_finite() || edge.length < 0.0 {
                return Err(BuildError::InvalidLength {
                    from,
                    to: edge.to,
                    length: edge.length,
                });
            }
            if !adjacency.contains_key(&edge.to) {
                return Err(BuildError::DanglingEdge { from, to: edge.to });
            }
            let (_, edges) = adjacency
                .get_mut(&from)
                .ok_or(BuildError::DanglingEdge { from, to: edge.to })?;
            match edges.iter_mut().find(|e| e.to == edge.to) {
                Some(existing) if edge.length < existing.length => *existing = edge,
                Some(_) => {}
                None => edges.push(edge),
            }
        }

        let keep = largest_weak_component(&adjacency);
        let before = adjacency.len();
        adjacency.retain(|id, _| keep.contains(id));
        if adjacency.len() < before {
            log::info!(
                "restricted graph to its largest component: kept {} of {} nodes",
                adjacency.len(),
                before,
            );
        }

        Ok(Graph(adjacency))
    }
}

/// Finds the node set of the largest weakly-connected component,
/// treating every edge as undirected.
fn largest_weak_component(adjacency: &BTreeMap<i64, (Node, Vec<Edge>)>) -> HashSet<i64> {
    let mut undirected: HashMap<i64, Vec<i64>> = HashMap::new();
    for (&from, (_, edges)) in adjacency {
        for edge in edges {
            undirected.entry(from).or_default().push(edge.to);
            undirected.entry(edge.to).or_default().push(from);
        }
    }

    let mut best: HashSet<i64> = HashSet::new();
    let mut visited: HashSet<i64> = HashSet::new();
    let mut queue: VecDeque<i64> = VecDeque::new();

    // BTreeMap iteration keeps component discovery order deterministic,
    // so equally-sized components tie-break to the one with the lowest id.
    for &start in adjacency.keys() {
        if !visited.insert(start) {
            continue;
        }

        let mut component = HashSet::from([start]);
        queue.push_back(start);
        while let Some(at) = queue.pop_front() {
            for &next in undirected.get(&at).map(Vec::as_slice).unwrap_or_default() {
                if visited.insert(next) {
                    component.insert(next);
                    queue.push_back(next);
                }
            }
        }

        if component.len() > best.len() {
            best = component;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, lat: f64, lon: f64) -> Node {
        Node { id, lat, lon }
    }

    #[test]
    fn build_validates_dangling_edge() {
        let mut b = GraphBuilder::new();
        b.add_node(node(1, 0.0, 0.0));
        b.add_edge(1, 2, 10.0);
        assert_eq!(b.build(), Err(BuildError::DanglingEdge { from: 1, to: 2 }));
    }

    #[test]
    fn build_validates_edge_length() {
        let mut b = GraphBuilder::new();
        b.add_node(node(1, 0.0, 0.0));
        b.add_node(node(2, 0.0, 0.001));
        b.add_edge(1, 2, -5.0);
        assert_eq!(
            b.build(),
            Err(BuildError::InvalidLength {
                from: 1,
                to: 2,
                length: -5.0
            })
        );

        let mut b = GraphBuilder::new();
        b.add_node(node(1, 0.0, 0.0));
        b.add_node(node(2, 0.0, 0.001));
        b.add_edge(1, 2, f64::NAN);
        assert!(matches!(b.build(), Err(BuildError::InvalidLength { .. })));
    }

    #[test]
    fn parallel_edges_collapse_to_minimum() {
        let mut b = GraphBuilder::new();
        b.add_node(node(1, 0.0, 0.0));
        b.add_node(node(2, 0.0, 0.001));
        b.add_edge(1, 2, 120.0);
        b.add_edge(1, 2, 100.0);
        b.add_edge(1, 2, 110.0);
        let g = b.build().unwrap();

        assert_eq!(g.neighbors(1).len(), 1);
        assert_eq!(g.edge_length(1, 2), 100.0);
    }

    #[test]
    fn build_keeps_only_largest_component() {
        let mut b = GraphBuilder::new();
        // Component {1, 2, 3} connected by directed edges only.
        b.add_node(node(1, 0.0, 0.0));
        b.add_node(node(2, 0.0, 0.001));
        b.add_node(node(3, 0.001, 0.001));
        b.add_edge(1, 2, 100.0);
        b.add_edge(3, 2, 100.0);
        // Disconnected fragment {10, 11}.
        b.add_node(node(10, 1.0, 1.0));
        b.add_node(node(11, 1.0, 1.001));
        b.add_edge(10, 11, 100.0);
        let g = b.build().unwrap();

        assert_eq!(g.len(), 3);
        assert!(g.contains(1) && g.contains(2) && g.contains(3));
        assert!(!g.contains(10) && !g.contains(11));
    }

    #[test]
    fn neighbors_of_unknown_node_is_empty() {
        let g = GraphBuilder::new().build().unwrap();
        assert!(g.is_empty());
        assert!(g.neighbors(42).is_empty());
        assert!(g.edge_length(42, 43).is_infinite());
    }
}
