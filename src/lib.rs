//! Creepage distance analysis for PCB conductor geometry
//!
//! Given a board's conductive geometry (tracks, pads, zones) and its edge
//! outline, this crate builds a graph of surface-hugging candidate paths
//! between nets and answers shortest-creepage queries over it. It is an
//! in-process analysis library: the caller owns the board model and the
//! DRC session, and consumes the returned distances and drawable paths.
//!
//! Typical flow:
//!
//! ```ignore
//! let mut graph = CreepageGraph::new();
//! let a = graph.add_net_elements(&board, net_a, "F.Cu")?;
//! let b = graph.add_net_elements(&board, net_b, "F.Cu")?;
//! graph.remove_duplicated_shapes();
//! graph.generate_paths(&board, &rules, "F.Cu", rules.creepage_mm, &executor)?;
//! graph.trim(rules.creepage_mm);
//! let result = graph.solve(a, b);
//! ```

pub mod board;
pub mod creepage;

pub use board::{is_copper_layer, is_edge_layer, Board, BoardItem, BoardLayer, ItemShape};
pub use creepage::{
    CreepShape, CreepageGraph, CreepageRules, NodeId, ParallelExecutor, PathConnection,
    PathDrawable, PathResult, Point, ShapeGeom, ShapeKind,
};
