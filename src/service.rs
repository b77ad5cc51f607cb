// (c) Copyright 2026 viaroute contributors
// SPDX-License-Identifier: MIT

use crate::{shortest_path, Graph, KdTree, RouteError, SearchOutcome, DEFAULT_STEP_LIMIT};

/// A coordinate path traced through the road network: `(lat, lon)` pairs
/// from origin to destination (inclusive) and the total length in meters.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub coords: Vec<(f64, f64)>,
    pub length_m: f64,
}

/// Outcome of a coordinate-to-coordinate route query.
///
/// `Unreachable` and the trivial same-node route are distinct: the latter is
/// `Found` with a single coordinate and zero length.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Found(Route),
    Unreachable,
}

/// Readiness report: the graph has finished loading and covers `region`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub region: String,
    pub nodes: usize,
    pub edges: usize,
}

/// Answers shortest-path queries between arbitrary coordinate pairs.
///
/// Owns the [Graph] and the [KdTree] built over its nodes, both immutable
/// after construction: a `RouteService` is `Send + Sync` and a single
/// instance may serve any number of concurrent [route](RouteService::route)
/// calls without locking. Queries are pure and safe to retry.
pub struct RouteService {
    graph: Graph,
    index: KdTree,
    region: String,
    step_limit: usize,
}

impl RouteService {
    /// Creates a service over an already-built [Graph], recording the name
    /// of the geographic region it covers.
    ///
    /// Fails with [RouteError::EmptyGraph] if the graph has no nodes, as
    /// there would be nothing to resolve query coordinates against.
    pub fn new(graph: Graph, region: impl Into<String>) -> Result<Self, RouteError> {
        let index = KdTree::build(&graph).ok_or(RouteError::EmptyGraph)?;
        let region = region.into();
        log::info!(
            "serving {}: {} nodes, {} edges",
            region,
            graph.len(),
            graph.edge_count(),
        );
        Ok(Self {
            graph,
            index,
            region,
            step_limit: DEFAULT_STEP_LIMIT,
        })
    }

    /// Replaces the per-query search budget (see [RouteError::Timeout]).
    /// The default is [DEFAULT_STEP_LIMIT] node expansions.
    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Reports that the graph has finished loading and which region it covers.
    pub fn status(&self) -> Status {
        Status {
            region: self.region.clone(),
            nodes: self.graph.len(),
            edges: self.graph.edge_count(),
        }
    }

    /// Finds the shortest route between two coordinate pairs.
    ///
    /// Both endpoints are snapped to the nearest graph node; the query
    /// coordinates may lie anywhere, including far outside the covered
    /// region, as long as all four values are finite
    /// ([RouteError::InvalidInput] otherwise). If both endpoints resolve to
    /// the same node, the trivial single-point route is returned without
    /// searching.
    pub fn route(
        &self,
        orig_lat: f64,
        orig_lon: f64,
        dest_lat: f64,
        dest_lon: f64,
    ) -> Result<RouteOutcome, RouteError> {
        for coord in [orig_lat, orig_lon, dest_lat, dest_lon] {
            if !coord.is_finite() {
                return Err(RouteError::InvalidInput(coord));
            }
        }

        let orig = self.index.nearest(orig_lat, orig_lon);
        let dest = self.index.nearest(dest_lat, dest_lon);

        match shortest_path(&self.graph, orig.id, dest.id, self.step_limit)? {
            SearchOutcome::Unreachable => Ok(RouteOutcome::Unreachable),
            SearchOutcome::Path(path) => {
                let coords = path
                    .nodes
                    .iter()
                    .map(|&id| {
                        // Every id in the path came out of this graph.
                        let node = self.graph.node(id).ok_or(RouteError::UnknownNode(id))?;
                        Ok((node.lat, node.lon))
                    })
                    .collect::<Result<Vec<_>, RouteError>>()?;
                Ok(RouteOutcome::Found(Route {
                    coords,
                    length_m: path.length,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GraphBuilder, Node};

    // A small two-street network around (0, 0); ids 1-2-3 along one street,
    // 3-4 along the other.
    fn service() -> RouteService {
        let mut b = GraphBuilder::new();
        for (id, lat, lon) in [
            (1, 0.00, 0.00),
            (2, 0.00, 0.01),
            (3, 0.00, 0.02),
            (4, 0.01, 0.02),
        ] {
            b.add_node(Node { id, lat, lon });
        }
        for (from, to, length) in [(1, 2, 1100.0), (2, 3, 1100.0), (3, 4, 1100.0)] {
            b.add_edge(from, to, length);
            b.add_edge(to, from, length);
        }
        RouteService::new(b.build().unwrap(), "Testville").unwrap()
    }

    #[test]
    fn routes_between_snapped_endpoints() {
        let s = service();
        // Slightly off both street ends; snaps to nodes 1 and 4.
        match s.route(0.001, -0.001, 0.009, 0.021).unwrap() {
            RouteOutcome::Found(route) => {
                assert_eq!(
                    route.coords,
                    vec![(0.00, 0.00), (0.00, 0.01), (0.00, 0.02), (0.01, 0.02)]
                );
                assert_eq!(route.length_m, 3300.0);
            }
            RouteOutcome::Unreachable => panic!("expected a route"),
        }
    }

    #[test]
    fn identical_resolution_short_circuits_to_trivial_route() {
        let s = service();
        // Both endpoints snap to node 2.
        match s.route(0.001, 0.0101, -0.001, 0.0099).unwrap() {
            RouteOutcome::Found(route) => {
                assert_eq!(route.coords, vec![(0.00, 0.01)]);
                assert_eq!(route.length_m, 0.0);
            }
            RouteOutcome::Unreachable => panic!("expected the trivial route"),
        }
    }

    #[test]
    fn non_finite_coordinates_are_invalid_input() {
        let s = service();
        // NaN compares unequal to itself, so match on the variant instead.
        assert!(matches!(
            s.route(f64::NAN, 0.0, 0.0, 0.01),
            Err(RouteError::InvalidInput(c)) if c.is_nan()
        ));
        assert_eq!(
            s.route(0.0, 0.0, f64::INFINITY, 0.01),
            Err(RouteError::InvalidInput(f64::INFINITY))
        );
    }

    #[test]
    fn empty_graph_is_rejected_at_construction() {
        let g = GraphBuilder::new().build().unwrap();
        assert!(matches!(
            RouteService::new(g, "Nowhere"),
            Err(RouteError::EmptyGraph)
        ));
    }

    #[test]
    fn status_names_the_region_and_graph_size() {
        let s = service();
        assert_eq!(
            s.status(),
            Status {
                region: "Testville".to_string(),
                nodes: 4,
                edges: 6,
            }
        );
    }

    #[test]
    fn service_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RouteService>();
    }
}
