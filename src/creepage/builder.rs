//! Creepage graph construction from board geometry
//!
//! Two phases: `add_net_elements` decomposes board items into primitive
//! shapes hanging off a per-net virtual root, and `generate_paths` runs the
//! R-tree candidate search, pairwise path generation, and obstruction
//! validation that turn shape pairs into weighted connections.

use anyhow::{ensure, Result};
use indexmap::IndexMap;
use rstar::{RTree, RTreeObject, AABB};
use std::time::Instant;

use crate::board::{Board, BoardItem, ItemShape, OutlineEdge};

use super::distance::{
    normalized_arc_angles, segment_arc_intersections, segment_circle_intersections,
    segment_segment_intersection,
};
use super::executor::ParallelExecutor;
use super::graph::{ConnId, CreepageGraph, NetCode, NodeId, NodeKind};
use super::paths::{paths_between, PathConnection};
use super::shapes::CreepShape;
use super::types::{CreepageRules, Point, EPSILON};

/// Group envelope for the R-tree candidate search. One board item may own
/// several shape nodes; the search works at item granularity.
#[derive(Clone)]
struct GroupEnvelope {
    group: usize,
    bounds: AABB<[f64; 2]>,
}

impl RTreeObject for GroupEnvelope {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

impl CreepageGraph {
    /// Decompose every item of `net` on `layer_id` into primitive shapes and
    /// attach them to a fresh virtual root node. Returns the root.
    pub fn add_net_elements(&mut self, board: &Board, net: NetCode, layer_id: &str) -> Result<NodeId> {
        ensure!(
            board.layer_function(layer_id).is_some(),
            "unknown layer '{layer_id}'"
        );
        let conductive = !board.is_edge_layer_id(layer_id);
        let root = self.add_virtual_node(net);
        let items: Vec<(u64, ItemShape)> = board
            .items_on(layer_id)
            .filter(|i| i.net == net)
            .map(|i| (i.id, i.shape.clone()))
            .collect();
        for (item_id, shape) in &items {
            self.add_item_shape(shape, *item_id, conductive, root, net);
        }
        Ok(root)
    }

    /// Recursively decompose one item shape into primitives
    fn add_item_shape(
        &mut self,
        shape: &ItemShape,
        item_id: u64,
        conductive: bool,
        root: NodeId,
        net: NetCode,
    ) {
        match shape {
            ItemShape::Segment { start, end, width } => {
                if start.distance(*end) < EPSILON {
                    self.attach_shape(CreepShape::point(*start, conductive, Some(item_id)), root, net);
                } else {
                    let w = if conductive { *width } else { 0.0 };
                    self.attach_shape(
                        CreepShape::segment(*start, *end, w, conductive, Some(item_id)),
                        root,
                        net,
                    );
                }
            }
            ItemShape::Circle { center, radius } => {
                if *radius < EPSILON {
                    self.attach_shape(CreepShape::point(*center, conductive, Some(item_id)), root, net);
                } else {
                    self.attach_shape(
                        CreepShape::circle(*center, *radius, conductive, Some(item_id)),
                        root,
                        net,
                    );
                }
            }
            ItemShape::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => {
                let (sa, ea) = normalized_arc_angles(*start_angle, *end_angle);
                if *radius < EPSILON {
                    self.attach_shape(CreepShape::point(*center, conductive, Some(item_id)), root, net);
                } else if ea - sa < EPSILON {
                    // Zero-sweep arc degenerates to its start point
                    let p = super::distance::circle_point(*center, *radius, sa);
                    self.attach_shape(CreepShape::point(p, conductive, Some(item_id)), root, net);
                } else {
                    self.attach_shape(
                        CreepShape::arc(*center, *radius, sa, ea, conductive, Some(item_id)),
                        root,
                        net,
                    );
                }
            }
            ItemShape::Polygon { outline } => {
                for i in 0..outline.len() {
                    let a = outline[i];
                    let b = outline[(i + 1) % outline.len()];
                    if a.distance(b) < EPSILON {
                        continue;
                    }
                    self.attach_shape(
                        CreepShape::segment(a, b, 0.0, conductive, Some(item_id)),
                        root,
                        net,
                    );
                }
            }
            ItemShape::LineChain { points, width } => {
                let w = if conductive { *width } else { 0.0 };
                for pair in points.windows(2) {
                    if pair[0].distance(pair[1]) < EPSILON {
                        continue;
                    }
                    self.attach_shape(
                        CreepShape::segment(pair[0], pair[1], w, conductive, Some(item_id)),
                        root,
                        net,
                    );
                }
            }
            // Edge segments and corner arcs only; the inner fill geometry is
            // redundant for surface paths and is skipped
            ItemShape::RoundRect { .. } => {
                for part in shape.round_rect_parts() {
                    self.add_item_shape(&part, item_id, conductive, root, net);
                }
            }
            ItemShape::Compound { parts } => {
                for part in parts {
                    self.add_item_shape(part, item_id, conductive, root, net);
                }
            }
        }
    }

    /// Store a shape, create its node, and hook it to the net root with a
    /// zero-weight hidden connection
    fn attach_shape(&mut self, shape: CreepShape, root: NodeId, net: NetCode) -> NodeId {
        let root_pos = self.node(root).map(|n| n.pos).unwrap_or(Point::ORIGIN);
        let (_sid, nid) = self.add_shape_node(shape, net);
        if nid != root && !self.are_connected(root, nid) {
            let pos = self.node(nid).map(|n| n.pos).unwrap_or(Point::ORIGIN);
            self.add_connection(root, nid, PathConnection::hidden(root_pos, pos));
        }
        nid
    }

    /// Generate all admissible connections between shapes of different nets
    /// (or against the board edge) whose path weight does not exceed
    /// `max_weight`. Returns the number of connections added.
    pub fn generate_paths(
        &mut self,
        board: &Board,
        rules: &CreepageRules,
        layer_id: &str,
        max_weight: f64,
        executor: &ParallelExecutor,
    ) -> Result<usize> {
        ensure!(max_weight >= 0.0, "creepage cutoff must be non-negative");
        ensure!(
            rules.min_groove_width_mm >= 0.0,
            "minimum groove width must be non-negative"
        );
        ensure!(
            board.layer_function(layer_id).is_some(),
            "unknown layer '{layer_id}'"
        );
        let start = Instant::now();

        // Group connect-directly shape nodes by (parent item, net)
        let mut groups: IndexMap<(Option<u64>, NetCode), Vec<NodeId>> = IndexMap::new();
        for nid in self.live_node_ids() {
            let node = match self.node(nid) {
                Some(n) => n,
                None => continue,
            };
            if node.kind == NodeKind::Virtual || !node.connect_directly {
                continue;
            }
            let item = node
                .parent_shape
                .and_then(|sid| self.shape(sid))
                .and_then(|s| s.parent);
            groups.entry((item, node.net)).or_default().push(nid);
        }

        // One envelope per group: the parent item's box where known, else
        // the union of the member shape boxes
        let mut envelopes = Vec::with_capacity(groups.len());
        let mut conductive = Vec::with_capacity(groups.len());
        for (gi, ((item, _net), nodes)) in groups.iter().enumerate() {
            let bounds = match item.and_then(|id| board.item(id)) {
                Some(it) => it.bounds(),
                None => self.group_shape_bounds(nodes),
            };
            envelopes.push(GroupEnvelope {
                group: gi,
                bounds: AABB::from_corners([bounds[0], bounds[1]], [bounds[2], bounds[3]]),
            });
            conductive.push(
                nodes
                    .first()
                    .and_then(|&n| self.node_shape(n))
                    .map(|s| s.conductive)
                    .unwrap_or(false),
            );
        }
        let tree = RTree::bulk_load(envelopes.clone());

        // Candidate pairs whose expanded envelopes intersect. Same-net pairs
        // of two conductive groups carry no creepage information.
        let mut pairs: Vec<(usize, usize)> = Vec::new();
        for env in &envelopes {
            let lower = env.bounds.lower();
            let upper = env.bounds.upper();
            let search = AABB::from_corners(
                [lower[0] - max_weight, lower[1] - max_weight],
                [upper[0] + max_weight, upper[1] + max_weight],
            );
            for hit in tree.locate_in_envelope_intersecting(&search) {
                if hit.group <= env.group {
                    continue;
                }
                let (ka, _) = groups.get_index(env.group).expect("group index");
                let (kb, _) = groups.get_index(hit.group).expect("group index");
                if ka.1 == kb.1 && conductive[env.group] && conductive[hit.group] {
                    continue;
                }
                pairs.push((env.group, hit.group));
            }
        }

        // Pairwise generation and validation, fanned out through the
        // executor. Workers only read the graph; accepted paths are merged
        // into it single-threaded afterwards.
        let this: &CreepageGraph = self;
        let groove = rules.min_groove_width_mm;
        let accepted: Vec<(NodeId, NodeId, PathConnection)> = executor.run(&pairs, |&(gi, gj)| {
            let mut found = Vec::new();
            let nodes_a = &groups[gi];
            let nodes_b = &groups[gj];
            for &na in nodes_a {
                for &nb in nodes_b {
                    let (sa, sb) = match (this.node_shape(na), this.node_shape(nb)) {
                        (Some(a), Some(b)) => (a, b),
                        _ => continue,
                    };
                    for path in paths_between(sa, sb, max_weight) {
                        if path_is_admissible(board, layer_id, sa.parent, sb.parent, &path, groove) {
                            found.push((na, nb, path));
                        }
                    }
                }
            }
            found
        });

        let mut added = 0;
        for (na, nb, path) in accepted {
            if self.add_path_connection(na, nb, path).is_some() {
                added += 1;
            }
        }

        eprintln!(
            "[CREEPAGE] generate_paths: {} groups, {} candidate pairs, {} connections in {:?}",
            groups.len(),
            pairs.len(),
            added,
            start.elapsed()
        );
        Ok(added)
    }

    fn group_shape_bounds(&self, nodes: &[NodeId]) -> [f64; 4] {
        let mut b = [f64::MAX, f64::MAX, f64::MIN, f64::MIN];
        for &nid in nodes {
            let sb = match self.node_shape(nid) {
                Some(s) => s.bounds(),
                None => match self.node(nid) {
                    Some(n) => [n.pos.x, n.pos.y, n.pos.x, n.pos.y],
                    None => continue,
                },
            };
            b[0] = b[0].min(sb[0]);
            b[1] = b[1].min(sb[1]);
            b[2] = b[2].max(sb[2]);
            b[3] = b[3].max(sb[3]);
        }
        b
    }

    pub(crate) fn node_shape(&self, nid: NodeId) -> Option<&CreepShape> {
        self.node(nid)
            .and_then(|n| n.parent_shape)
            .and_then(|sid| self.shape(sid))
    }

    /// Materialize an accepted path as a connection. Paths landing mid-shape
    /// get a hidden intermediate point node at the attachment coordinate so
    /// the solver can attach without originating from shape centers.
    fn add_path_connection(&mut self, na: NodeId, nb: NodeId, path: PathConnection) -> Option<ConnId> {
        let ta = self.attach_node(na, path.a1);
        let tb = self.attach_node(nb, path.a2);
        self.add_connection(ta, tb, path)
    }

    fn attach_node(&mut self, nid: NodeId, at: Point) -> NodeId {
        let Some(node) = self.node(nid) else {
            return nid;
        };
        if node.kind == NodeKind::Point || node.pos.distance(at) < EPSILON {
            return nid;
        }
        let (kind, pos, parent, net) = (node.kind, node.pos, node.parent_shape, node.net);
        let pn = self.add_point_node(at, parent, false, net);
        if pn != nid && !self.are_connected(nid, pn) {
            let mut link = PathConnection::hidden(pos, at);
            // A hop across a circle or arc surface is never drawn as a curve
            link.force_straight = matches!(kind, NodeKind::Circle | NodeKind::Arc);
            self.add_connection(nid, pn, link);
        }
        pn
    }
}

/// Obstruction test for one candidate path. The path must not cross any
/// board-edge item, nor (off the edge layer) any copper item on the target
/// layer, other than the two endpoint parents. Crossings narrower than the
/// minimum groove width do not obstruct.
fn path_is_admissible(
    board: &Board,
    layer_id: &str,
    parent_a: Option<u64>,
    parent_b: Option<u64>,
    path: &PathConnection,
    min_groove: f64,
) -> bool {
    if path.weight <= EPSILON {
        return true;
    }
    let (a, b) = (path.a1, path.a2);

    let blocks = |item: &BoardItem| -> bool {
        let mut pts: Vec<Point> = Vec::new();
        for edge in item.shape.outline_edges() {
            match edge {
                OutlineEdge::Seg(p, q) => {
                    if let Some(x) = segment_segment_intersection(a, b, p, q) {
                        pts.push(x);
                    }
                }
                OutlineEdge::Circle { center, radius } => {
                    pts.extend(segment_circle_intersections(a, b, center, radius));
                }
                OutlineEdge::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                } => {
                    pts.extend(segment_arc_intersections(
                        a,
                        b,
                        center,
                        radius,
                        start_angle,
                        end_angle,
                    ));
                }
            }
        }
        if pts.is_empty() {
            return false;
        }
        // Widest span between the entry/exit crossings of this obstacle.
        // Stacked grooves across several obstacles are judged per obstacle.
        let mut span: f64 = 0.0;
        for i in 0..pts.len() {
            for j in i + 1..pts.len() {
                span = span.max(pts[i].distance(pts[j]));
            }
        }
        span >= min_groove
    };

    for item in board.edge_items() {
        if Some(item.id) == parent_a || Some(item.id) == parent_b {
            continue;
        }
        if blocks(item) {
            return false;
        }
    }
    if !board.is_edge_layer_id(layer_id) {
        for item in board.items_on(layer_id) {
            if Some(item.id) == parent_a || Some(item.id) == parent_b {
                continue;
            }
            if blocks(item) {
                return false;
            }
        }
    }
    true
}
