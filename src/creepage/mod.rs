//! Creepage/clearance graph engine
//!
//! Computes the shortest surface-hugging path between two electrical points
//! or nets on a board, subject to obstruction by intervening conductors and
//! board edges. Uses R-tree spatial indexing for candidate pair filtering
//! and an explicit parallel executor for the pairwise search.
//!
//! # Submodules
//! - `types` - Point, rules, and drawable output types
//! - `distance` - Projection, intersection, and angle-span algorithms
//! - `shapes` - Conductor / board-edge shape primitives
//! - `paths` - Pairwise path generation (tangents, projections)
//! - `graph` - Arena graph of shapes, nodes, and connections
//! - `executor` - Parallel work distribution with a nesting guard
//! - `builder` - Board decomposition and connection generation
//! - `solver` - Dijkstra shortest-path queries

pub mod builder;
pub mod distance;
pub mod executor;
pub mod graph;
pub mod paths;
pub mod shapes;
pub mod solver;
pub mod types;

// Re-export the public surface
pub use executor::ParallelExecutor;
pub use graph::{ConnId, Connection, CreepageGraph, GraphNode, NetCode, NodeId, NodeKind, ShapeId};
pub use paths::{paths_between, tangent_within_span, PathConnection};
pub use shapes::{CreepShape, ShapeGeom, ShapeKind};
pub use solver::PathResult;
pub use types::{CreepageRules, PathDrawable, Point};
