//! Creepage graph model
//!
//! Arena-based storage for shapes, nodes, and connections. Everything is
//! addressed by dense indices; deletion tombstones entries instead of
//! reshuffling, so ids handed to callers stay stable for the lifetime of
//! the graph.

use std::collections::HashMap;

use super::paths::PathConnection;
use super::shapes::{CreepShape, ShapeKind};
use super::types::{PathDrawable, Point};

pub type NetCode = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnId(pub usize);

/// Graph node kind. Virtual nodes carry no geometry and act as the per-net
/// attachment root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Point,
    Circle,
    Arc,
    Segment,
    Virtual,
}

impl NodeKind {
    fn from_shape(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Point => NodeKind::Point,
            ShapeKind::Circle => NodeKind::Circle,
            ShapeKind::Arc => NodeKind::Arc,
            ShapeKind::Segment => NodeKind::Segment,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphNode {
    pub kind: NodeKind,
    pub pos: Point,
    pub parent_shape: Option<ShapeId>,
    pub net: NetCode,
    /// Whether path queries may terminate here directly, or only through
    /// intermediate point nodes created at mid-shape attachments
    pub connect_directly: bool,
    pub connections: Vec<ConnId>,
    pub alive: bool,
}

#[derive(Debug, Clone)]
pub struct Connection {
    pub a: NodeId,
    pub b: NodeId,
    pub path: PathConnection,
    pub alive: bool,
}

impl Connection {
    pub fn other(&self, n: NodeId) -> NodeId {
        if self.a == n {
            self.b
        } else {
            self.a
        }
    }
}

#[derive(Debug, Clone)]
struct StoredShape {
    shape: CreepShape,
    alive: bool,
}

/// Node deduplication key: kind, exact position bits, and parent shape.
/// Virtual nodes never enter the lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeKey {
    kind: NodeKind,
    x: u64,
    y: u64,
    parent: Option<ShapeId>,
}

fn node_key(kind: NodeKind, pos: Point, parent: Option<ShapeId>) -> NodeKey {
    NodeKey {
        kind,
        x: pos.x.to_bits(),
        y: pos.y.to_bits(),
        parent,
    }
}

/// The creepage graph: owned shapes, nodes, and weighted undirected
/// connections between them.
#[derive(Debug, Default)]
pub struct CreepageGraph {
    shapes: Vec<StoredShape>,
    nodes: Vec<GraphNode>,
    conns: Vec<Connection>,
    node_lookup: HashMap<NodeKey, NodeId>,
}

impl CreepageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shape(&self, id: ShapeId) -> Option<&CreepShape> {
        self.shapes
            .get(id.0)
            .filter(|s| s.alive)
            .map(|s| &s.shape)
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.0).filter(|n| n.alive)
    }

    pub fn connection(&self, id: ConnId) -> Option<&Connection> {
        self.conns.get(id.0).filter(|c| c.alive)
    }

    pub fn live_shape_count(&self) -> usize {
        self.shapes.iter().filter(|s| s.alive).count()
    }

    pub fn live_node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.alive).count()
    }

    pub fn live_connection_count(&self) -> usize {
        self.conns.iter().filter(|c| c.alive).count()
    }

    pub(crate) fn live_node_ids(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .filter(|&i| self.nodes[i].alive)
            .map(NodeId)
            .collect()
    }

    /// Per-net virtual attachment root; intentionally never deduplicated
    pub fn add_virtual_node(&mut self, net: NetCode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(GraphNode {
            kind: NodeKind::Virtual,
            pos: Point::ORIGIN,
            parent_shape: None,
            net,
            connect_directly: false,
            connections: Vec::new(),
            alive: true,
        });
        id
    }

    /// Add a shape and its graph node. The node is deduplicated by
    /// (kind, position, parent) like any other.
    pub fn add_shape_node(&mut self, shape: CreepShape, net: NetCode) -> (ShapeId, NodeId) {
        let sid = ShapeId(self.shapes.len());
        let kind = NodeKind::from_shape(shape.kind());
        let pos = shape.pos;
        self.shapes.push(StoredShape { shape, alive: true });
        let nid = self.insert_node(kind, pos, Some(sid), true, net);
        (sid, nid)
    }

    /// Add (or find) a point node, typically a mid-shape attachment point
    pub fn add_point_node(
        &mut self,
        pos: Point,
        parent_shape: Option<ShapeId>,
        connect_directly: bool,
        net: NetCode,
    ) -> NodeId {
        self.insert_node(NodeKind::Point, pos, parent_shape, connect_directly, net)
    }

    fn insert_node(
        &mut self,
        kind: NodeKind,
        pos: Point,
        parent_shape: Option<ShapeId>,
        connect_directly: bool,
        net: NetCode,
    ) -> NodeId {
        let key = node_key(kind, pos, parent_shape);
        if let Some(&existing) = self.node_lookup.get(&key) {
            if self.nodes[existing.0].alive {
                return existing;
            }
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(GraphNode {
            kind,
            pos,
            parent_shape,
            net,
            connect_directly,
            connections: Vec::new(),
            alive: true,
        });
        self.node_lookup.insert(key, id);
        id
    }

    /// Add an undirected connection. A connection joining a node to itself is
    /// an internal bug: fatal in debug builds, discarded in release.
    pub fn add_connection(&mut self, a: NodeId, b: NodeId, path: PathConnection) -> Option<ConnId> {
        if a == b {
            debug_assert!(false, "connection joining node {a:?} to itself");
            eprintln!("[CREEPAGE] discarding self-connection at node {}", a.0);
            return None;
        }
        if !self.nodes.get(a.0).is_some_and(|n| n.alive)
            || !self.nodes.get(b.0).is_some_and(|n| n.alive)
        {
            debug_assert!(false, "connection references a dead node");
            return None;
        }
        let id = ConnId(self.conns.len());
        self.conns.push(Connection {
            a,
            b,
            path,
            alive: true,
        });
        self.nodes[a.0].connections.push(id);
        self.nodes[b.0].connections.push(id);
        Some(id)
    }

    pub fn are_connected(&self, a: NodeId, b: NodeId) -> bool {
        match self.node(a) {
            Some(node) => node
                .connections
                .iter()
                .any(|&cid| self.connection(cid).is_some_and(|c| c.other(a) == b)),
            None => false,
        }
    }

    /// Remove a connection, garbage-collecting nodes left with no incident
    /// connections.
    pub fn remove_connection(&mut self, id: ConnId) {
        let Some(conn) = self.conns.get_mut(id.0) else {
            return;
        };
        if !conn.alive {
            return;
        }
        conn.alive = false;
        let (a, b) = (conn.a, conn.b);
        for n in [a, b] {
            let node = &mut self.nodes[n.0];
            node.connections.retain(|&c| c != id);
            if node.connections.is_empty() {
                node.alive = false;
            }
        }
    }

    /// Delete all connections whose weight exceeds the limit, then collect
    /// the nodes they leave isolated. Returns the number of removed
    /// connections.
    pub fn trim(&mut self, weight_limit: f64) -> usize {
        let over: Vec<ConnId> = (0..self.conns.len())
            .map(ConnId)
            .filter(|&cid| {
                self.conns[cid.0].alive && self.conns[cid.0].path.weight > weight_limit
            })
            .collect();
        let removed = over.len();
        for cid in over {
            self.remove_connection(cid);
        }
        if removed > 0 {
            eprintln!(
                "[CREEPAGE] trim: removed {} connections over {:.3} mm",
                removed, weight_limit
            );
        }
        removed
    }

    /// Merge shapes that are equivalent (same kind, position, and radius for
    /// circles), re-parenting nodes onto the surviving instance. Returns the
    /// number of duplicates removed.
    pub fn remove_duplicated_shapes(&mut self) -> usize {
        let mut ids: Vec<ShapeId> = (0..self.shapes.len())
            .filter(|&i| self.shapes[i].alive)
            .map(ShapeId)
            .collect();
        ids.sort_by(|a, b| {
            let sa = &self.shapes[a.0].shape;
            let sb = &self.shapes[b.0].shape;
            sa.kind()
                .cmp(&sb.kind())
                .then(sa.pos.x.total_cmp(&sb.pos.x))
                .then(sa.pos.y.total_cmp(&sb.pos.y))
                .then(sa.radius().total_cmp(&sb.radius()))
        });

        let mut removed = 0;
        let mut i = 0;
        while i < ids.len() {
            let keep = ids[i];
            let mut j = i + 1;
            while j < ids.len() {
                let dup = ids[j];
                let equivalent = {
                    let (a, b) = (&self.shapes[keep.0].shape, &self.shapes[dup.0].shape);
                    a.equivalent(b)
                };
                if !equivalent {
                    break;
                }
                for node in self.nodes.iter_mut() {
                    if node.parent_shape == Some(dup) {
                        node.parent_shape = Some(keep);
                    }
                }
                self.shapes[dup.0].alive = false;
                removed += 1;
                j += 1;
            }
            i = j;
        }
        removed
    }

    /// Drawable segments for every visible connection, for callers that
    /// render creepage paths. Hidden structural connections are skipped.
    pub fn path_drawables(&self) -> Vec<PathDrawable> {
        self.conns
            .iter()
            .filter(|c| c.alive && c.path.show)
            .map(|c| PathDrawable {
                start: c.path.a1,
                end: c.path.a2,
                weight_mm: c.path.weight,
                straight: c.path.force_straight,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creepage::types::Point;

    #[test]
    fn test_node_dedup_by_kind_pos_parent() {
        let mut g = CreepageGraph::new();
        let a = g.add_point_node(Point::new(1.0, 2.0), None, true, 1);
        let b = g.add_point_node(Point::new(1.0, 2.0), None, true, 1);
        assert_eq!(a, b);
        let c = g.add_point_node(Point::new(1.0, 2.0), Some(ShapeId(0)), true, 1);
        assert_ne!(a, c);
    }

    #[test]
    fn test_virtual_nodes_unique() {
        let mut g = CreepageGraph::new();
        let a = g.add_virtual_node(1);
        let b = g.add_virtual_node(1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_self_connection_rejected() {
        let mut g = CreepageGraph::new();
        let a = g.add_virtual_node(1);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            g.add_connection(a, a, PathConnection::hidden(Point::ORIGIN, Point::ORIGIN))
        }));
        if cfg!(debug_assertions) {
            assert!(result.is_err());
        } else {
            assert!(result.unwrap().is_none());
        }
    }

    #[test]
    fn test_trim_collects_isolated_nodes() {
        let mut g = CreepageGraph::new();
        let a = g.add_point_node(Point::new(0.0, 0.0), None, true, 1);
        let b = g.add_point_node(Point::new(1.0, 0.0), None, true, 2);
        let c = g.add_point_node(Point::new(2.0, 0.0), None, true, 3);
        g.add_connection(a, b, PathConnection::new(a_pos(), b_pos(), 1.0));
        g.add_connection(b, c, PathConnection::new(b_pos(), c_pos(), 3.0));
        assert_eq!(g.live_connection_count(), 2);

        let removed = g.trim(2.0);
        assert_eq!(removed, 1);
        assert_eq!(g.live_connection_count(), 1);
        // c lost its only connection and is collected
        assert!(g.node(c).is_none());
        assert!(g.node(a).is_some());
        assert!(g.node(b).is_some());
    }

    fn a_pos() -> Point {
        Point::new(0.0, 0.0)
    }
    fn b_pos() -> Point {
        Point::new(1.0, 0.0)
    }
    fn c_pos() -> Point {
        Point::new(2.0, 0.0)
    }
}
