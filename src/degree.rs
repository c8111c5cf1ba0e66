use crate::error::{FasError, Result};
use crate::graph::WeightedDigraph;

/// Remaining weighted in- and out-degree of every vertex.
///
/// Starts out as the summed weight of incident arcs and only ever decreases while the engine
/// removes placed vertices from the graph.
#[derive(Debug, Clone)]
pub struct DegreeTracker {
    in_w: Vec<u64>,
    out_w: Vec<u64>,
    max_in: u64,
    max_out: u64,
}

impl DegreeTracker {
    pub fn new(g: &WeightedDigraph) -> Result<DegreeTracker> {
        let n = g.vertex_count();
        let mut in_w = vec![0u64; n];
        let mut out_w = vec![0u64; n];
        for (u, v, w) in g.edges() {
            out_w[u] = out_w[u].checked_add(w).ok_or(FasError::WeightOverflow(u))?;
            in_w[v] = in_w[v].checked_add(w).ok_or(FasError::WeightOverflow(v))?;
        }
        let max_in = in_w.iter().copied().max().unwrap_or(0);
        let max_out = out_w.iter().copied().max().unwrap_or(0);
        Ok(DegreeTracker { in_w, out_w, max_in, max_out })
    }

    pub fn len(&self) -> usize {
        self.in_w.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_w.is_empty()
    }

    #[inline(always)]
    pub fn in_weight(&self, v: usize) -> u64 {
        self.in_w[v]
    }

    #[inline(always)]
    pub fn out_weight(&self, v: usize) -> u64 {
        self.out_w[v]
    }

    /// Largest initial weighted in-degree.
    pub fn max_in(&self) -> u64 {
        self.max_in
    }

    /// Largest initial weighted out-degree.
    pub fn max_out(&self) -> u64 {
        self.max_out
    }

    /// Subtracts `w` from the remaining in-weight of `v` and returns what is left.
    pub fn decrement_in(&mut self, v: usize, w: u64) -> Result<u64> {
        decrement(&mut self.in_w[v], v, w, "in")
    }

    /// Subtracts `w` from the remaining out-weight of `v` and returns what is left.
    pub fn decrement_out(&mut self, v: usize, w: u64) -> Result<u64> {
        decrement(&mut self.out_w[v], v, w, "out")
    }
}

fn decrement(slot: &mut u64, vertex: usize, by: u64, direction: &'static str) -> Result<u64> {
    let left = slot.checked_sub(by);
    debug_assert!(left.is_some(), "{direction}-weight of vertex {vertex} would go negative");
    let left = left.ok_or(FasError::WeightUnderflow { vertex, direction, remaining: *slot, by })?;
    *slot = left;
    Ok(left)
}
