//! Shortest-path solver over the creepage graph
//!
//! Dijkstra with a binary heap, ties broken by node id so repeated queries
//! on the same graph walk the same path.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use super::graph::{ConnId, CreepageGraph, NodeId};

/// Result of a creepage query: total weight and the ordered connection list
/// from `from` to `to`. Unreachable targets come back with infinite weight
/// and an empty path.
#[derive(Debug, Clone)]
pub struct PathResult {
    pub weight: f64,
    pub connections: Vec<ConnId>,
}

impl PathResult {
    fn empty(weight: f64) -> Self {
        Self {
            weight,
            connections: Vec::new(),
        }
    }
}

#[derive(Debug, PartialEq)]
struct HeapEntry {
    dist: f64,
    node: NodeId,
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist
            .total_cmp(&other.dist)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl CreepageGraph {
    /// Shortest creepage path between two nodes.
    ///
    /// Dead or unknown node ids are treated as a no-op (weight 0, empty
    /// path) without touching the graph; callers are expected to have
    /// validated node existence. `from == to` short-circuits to zero.
    pub fn solve(&self, from: NodeId, to: NodeId) -> PathResult {
        if self.node(from).is_none() || self.node(to).is_none() {
            return PathResult::empty(0.0);
        }
        if from == to {
            return PathResult::empty(0.0);
        }

        let mut dist: HashMap<NodeId, f64> = HashMap::new();
        let mut prev: HashMap<NodeId, (NodeId, ConnId)> = HashMap::new();
        let mut heap: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::new();

        dist.insert(from, 0.0);
        heap.push(Reverse(HeapEntry {
            dist: 0.0,
            node: from,
        }));

        while let Some(Reverse(entry)) = heap.pop() {
            let d = entry.dist;
            let n = entry.node;
            if dist.get(&n).copied().unwrap_or(f64::INFINITY) < d {
                continue;
            }
            if n == to {
                break;
            }
            let Some(node) = self.node(n) else {
                continue;
            };
            for &cid in &node.connections {
                let Some(conn) = self.connection(cid) else {
                    continue;
                };
                let w = conn.path.weight;
                if w < 0.0 {
                    // A negative weight is a construction bug upstream;
                    // skip it rather than corrupting the search
                    eprintln!(
                        "[CREEPAGE] skipping negative-weight connection {} ({:.6} mm)",
                        cid.0, w
                    );
                    continue;
                }
                let next = conn.other(n);
                if self.node(next).is_none() {
                    continue;
                }
                let nd = d + w;
                if nd < dist.get(&next).copied().unwrap_or(f64::INFINITY) {
                    dist.insert(next, nd);
                    prev.insert(next, (n, cid));
                    heap.push(Reverse(HeapEntry {
                        dist: nd,
                        node: next,
                    }));
                }
            }
        }

        let Some(&total) = dist.get(&to) else {
            return PathResult::empty(f64::INFINITY);
        };

        let mut connections = Vec::new();
        let mut cursor = to;
        while cursor != from {
            let Some(&(parent, cid)) = prev.get(&cursor) else {
                // Broken predecessor chain would be an internal bug
                debug_assert!(false, "predecessor chain missing node {cursor:?}");
                return PathResult::empty(f64::INFINITY);
            };
            connections.push(cid);
            cursor = parent;
        }
        connections.reverse();

        PathResult {
            weight: total,
            connections,
        }
    }
}
