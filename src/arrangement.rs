use bit_set::BitSet;
use itertools::Itertools;

use crate::graph::WeightedDigraph;

/// A linear arrangement of the vertices `0..n`, queryable in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Arrangement {
    position: Vec<usize>,
    vertex_at: Vec<usize>,
}

impl Arrangement {
    /// Builds an arrangement from the vertices in placement order. Returns `None` unless
    /// `vertices` is a permutation of `0..vertices.len()`.
    pub fn from_sequence(vertices: Vec<usize>) -> Option<Arrangement> {
        let n = vertices.len();
        let mut seen = BitSet::with_capacity(n);
        let mut position = vec![0; n];
        for (i, &v) in vertices.iter().enumerate() {
            if v >= n || !seen.insert(v) {
                return None;
            }
            position[v] = i;
        }
        Some(Arrangement { position, vertex_at: vertices })
    }

    /// Builds an arrangement from `position[v]`. Returns `None` unless `positions` is a
    /// permutation.
    pub fn from_positions(positions: Vec<usize>) -> Option<Arrangement> {
        let n = positions.len();
        let mut vertex_at = vec![0; n];
        let mut seen = BitSet::with_capacity(n);
        for (v, &p) in positions.iter().enumerate() {
            if p >= n || !seen.insert(p) {
                return None;
            }
            vertex_at[p] = v;
        }
        Some(Arrangement { position: positions, vertex_at })
    }

    pub fn len(&self) -> usize {
        self.vertex_at.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_at.is_empty()
    }

    /// Position assigned to vertex `v`.
    #[inline(always)]
    pub fn position(&self, v: usize) -> usize {
        self.position[v]
    }

    /// Vertex placed at position `i`.
    #[inline(always)]
    pub fn vertex_at(&self, i: usize) -> usize {
        self.vertex_at[i]
    }

    /// `position[v]` for every vertex.
    pub fn positions(&self) -> &[usize] {
        &self.position
    }

    /// Vertices in placement order.
    pub fn order(&self) -> &[usize] {
        &self.vertex_at
    }

    pub fn into_order(self) -> Vec<usize> {
        self.vertex_at
    }

    /// Arcs `(u, v, w)` of `g` whose tail is placed after their head. Together they form a
    /// feedback arc set of `g`.
    pub fn backward_arcs(&self, g: &WeightedDigraph) -> Vec<(usize, usize, u64)> {
        g.edges()
            .filter(|&(u, v, _)| self.position[v] < self.position[u])
            .collect()
    }

    pub fn backward_weight(&self, g: &WeightedDigraph) -> u64 {
        self.backward_arcs(g).iter().map(|&(_, _, w)| w).sum()
    }

    /// Consecutive pairs `(vertex_at[i-1], vertex_at[i])`, the layout chain read off the order.
    pub fn adjacent_pairs(&self) -> Vec<(usize, usize)> {
        self.vertex_at.iter().copied().tuple_windows().collect()
    }
}
