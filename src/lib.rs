// (c) Copyright 2026 viaroute contributors
// SPDX-License-Identifier: MIT

//! Shortest-path queries over road-network graphs.
//!
//! A road network is represented as a standard weighted directed graph
//! ([Graph]), built once at startup from node and edge lists and immutable
//! afterwards. [RouteService] answers coordinate-to-coordinate queries: both
//! endpoints are snapped to the nearest graph node with a k-d tree ([KdTree]),
//! the shortest path between them is found with Dijkstra's algorithm, and the
//! resulting node sequence is translated back to coordinates. An unreachable
//! destination is an expected outcome ([RouteOutcome::Unreachable]), not an
//! error.
//!
//! # Example
//!
//! ```no_run
//! let graph = viaroute::load_from_file("path/to/delhi.csv.gz")
//!     .expect("failed to load network file");
//! let service = viaroute::RouteService::new(graph, "Delhi, India")
//!     .expect("network file contained no nodes");
//!
//! match service.route(28.6139, 77.2090, 28.5245, 77.1855).expect("bad query") {
//!     viaroute::RouteOutcome::Found(route) => {
//!         println!("{} m over {} points", route.length_m, route.coords.len());
//!     }
//!     viaroute::RouteOutcome::Unreachable => println!("no route"),
//! }
//! ```

mod dijkstra;
mod distance;
mod graph;
mod kd;
mod network;
mod service;

pub use dijkstra::{shortest_path, PathResult, RouteError, SearchOutcome, DEFAULT_STEP_LIMIT};
pub use distance::earth_distance;
pub use graph::{BuildError, Graph, GraphBuilder};
pub use kd::KdTree;
pub use network::{load_from_buffer, load_from_file, load_from_io, FileFormat, NetworkError};
pub use service::{Route, RouteOutcome, RouteService, Status};

/// A point in the road network with fixed geographic coordinates.
///
/// Nodes are owned by the [Graph] and immutable once it is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

/// An outgoing (one-way) connection from a specific [Node].
///
/// `length` is the traversal cost in meters and must be finite and
/// non-negative; [GraphBuilder::build] enforces this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: i64,
    pub length: f64,
}
