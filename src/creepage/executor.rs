//! Parallel work distribution for candidate-pair evaluation
//!
//! Wraps the rayon pool behind an explicit capability so the no-nested-
//! parallel-loops policy is a property of the executor rather than a pool
//! saturation heuristic: a depth counter tracks whether a parallel region
//! is already running, and nested or small submissions execute sequentially
//! on the calling thread.

use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct ParallelExecutor {
    depth: AtomicUsize,
    /// Work lists smaller than this run sequentially
    pub parallel_threshold: usize,
}

impl Default for ParallelExecutor {
    fn default() -> Self {
        Self::new(8)
    }
}

impl ParallelExecutor {
    pub fn new(parallel_threshold: usize) -> Self {
        Self {
            depth: AtomicUsize::new(0),
            parallel_threshold,
        }
    }

    /// Run `body` over every item and collect the flattened results.
    /// Order of results follows item order in both modes, so callers get
    /// deterministic output either way.
    pub fn run<I, T, F>(&self, items: &[I], body: F) -> Vec<T>
    where
        I: Sync,
        T: Send,
        F: Fn(&I) -> Vec<T> + Sync,
    {
        let prev_depth = self.depth.fetch_add(1, Ordering::SeqCst);
        let out = if prev_depth == 0 && items.len() >= self.parallel_threshold {
            items.par_iter().flat_map_iter(|item| body(item)).collect()
        } else {
            items.iter().flat_map(|item| body(item)).collect()
        };
        self.depth.fetch_sub(1, Ordering::SeqCst);
        out
    }
}
