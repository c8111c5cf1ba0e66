use itertools::Itertools;
use tracing::debug;

use crate::error::{FasError, Result};

// This module contains the graph the ordering engine consumes.
// Vertices are dense indices 0..n, adjacency is kept in both directions as Vec<Vec<(usize, u64)>>.

/// A weighted arc as handed over by a graph loader. Weights are signed so that negative
/// weights can be rejected instead of silently wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: i64,
}

impl Edge {
    pub fn new(from: usize, to: usize, weight: i64) -> Edge {
        Edge { from, to, weight }
    }
}

impl From<(usize, usize, i64)> for Edge {
    fn from((from, to, weight): (usize, usize, i64)) -> Edge {
        Edge { from, to, weight }
    }
}

/// A simple directed graph with positive integer arc weights.
///
/// Construction validates the input once; afterwards the graph is read-only. Zero-weight arcs are
/// dropped on the way in since they carry no ordering information.
#[derive(Debug, Clone, Default)]
pub struct WeightedDigraph {
    out_adj: Vec<Vec<(usize, u64)>>,
    in_adj: Vec<Vec<(usize, u64)>>,
    m: usize,
}

impl WeightedDigraph {
    /// Builds a graph on `n` vertices. Rejects out-of-range endpoints, self-loops, negative
    /// weights and repeated ordered pairs.
    pub fn from_edges<I>(n: usize, edges: I) -> Result<WeightedDigraph>
    where
        I: IntoIterator<Item = (usize, usize, i64)>,
    {
        let edges: Vec<Edge> = edges.into_iter().map(Edge::from).collect();
        for e in edges.iter() {
            if e.from >= n || e.to >= n {
                return Err(FasError::VertexOutOfRange { from: e.from, to: e.to, n });
            }
            if e.from == e.to {
                return Err(FasError::SelfLoop(e.from));
            }
            if e.weight < 0 {
                return Err(FasError::NegativeWeight { from: e.from, to: e.to, weight: e.weight });
            }
        }
        // a zero-weight duplicate is still a duplicate pair
        if let Some((from, to)) = edges.iter().map(|e| (e.from, e.to)).duplicates().next() {
            return Err(FasError::DuplicateEdge { from, to });
        }

        let mut g = WeightedDigraph {
            out_adj: vec![Vec::new(); n],
            in_adj: vec![Vec::new(); n],
            m: 0,
        };
        let mut dropped = 0;
        for e in edges.into_iter() {
            if e.weight == 0 {
                dropped += 1;
                continue;
            }
            let w = e.weight as u64;
            g.out_adj[e.from].push((e.to, w));
            g.in_adj[e.to].push((e.from, w));
            g.m += 1;
        }
        if dropped > 0 {
            debug!(dropped, "dropped zero-weight edges");
        }
        Ok(g)
    }

    pub fn from_edge_list(n: usize, edges: &[Edge]) -> Result<WeightedDigraph> {
        WeightedDigraph::from_edges(n, edges.iter().map(|e| (e.from, e.to, e.weight)))
    }

    pub fn vertex_count(&self) -> usize {
        self.out_adj.len()
    }

    pub fn edge_count(&self) -> usize {
        self.m
    }

    pub fn is_empty(&self) -> bool {
        self.out_adj.is_empty()
    }

    /// Outgoing arcs of `v` as `(to, weight)`.
    #[inline(always)]
    pub fn out_edges(&self, v: usize) -> &[(usize, u64)] {
        &self.out_adj[v]
    }

    /// Incoming arcs of `v` as `(from, weight)`.
    #[inline(always)]
    pub fn in_edges(&self, v: usize) -> &[(usize, u64)] {
        &self.in_adj[v]
    }

    /// All arcs as `(from, to, weight)`, grouped by source vertex.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, u64)> + '_ {
        self.out_adj
            .iter()
            .enumerate()
            .flat_map(|(u, adj)| adj.iter().map(move |&(v, w)| (u, v, w)))
    }

    pub fn total_weight(&self) -> u64 {
        self.edges().map(|(_, _, w)| w).sum()
    }

    /// Plain successor lists, dropping weights.
    pub fn successors(&self) -> Vec<Vec<usize>> {
        self.out_adj
            .iter()
            .map(|adj| adj.iter().map(|&(v, _)| v).collect())
            .collect()
    }

    /// Constructs the subgraph induced by `subset`. In the resulting graph vertex i corresponds to
    /// vertex subset[i] in this graph.
    pub fn induced_subgraph(&self, subset: &[usize]) -> WeightedDigraph {
        let mut imp: Vec<Option<usize>> = vec![None; self.vertex_count()];
        for (i, &u) in subset.iter().enumerate() {
            imp[u] = Some(i);
        }
        let mut h = WeightedDigraph {
            out_adj: vec![Vec::new(); subset.len()],
            in_adj: vec![Vec::new(); subset.len()],
            m: 0,
        };
        for (i, &u) in subset.iter().enumerate() {
            for &(v, w) in self.out_adj[u].iter() {
                if let Some(j) = imp[v] {
                    h.out_adj[i].push((j, w));
                    h.in_adj[j].push((i, w));
                    h.m += 1;
                }
            }
        }
        h
    }
}

/// Returns the vertices of `g` in decreasing DFS finishing time. For a DAG this is a topological
/// ordering.
pub fn top_ordering(g: &[Vec<usize>]) -> Vec<usize> {
    let mut vis = vec![false; g.len()];
    let mut ord: Vec<usize> = Vec::with_capacity(g.len());
    // (vertex, index of next successor to visit)
    let mut stack: Vec<(usize, usize)> = Vec::new();
    for root in 0..g.len() {
        if vis[root] {
            continue;
        }
        vis[root] = true;
        stack.push((root, 0));
        while let Some((u, next)) = stack.last_mut() {
            let u = *u;
            if let Some(&v) = g[u].get(*next) {
                *next += 1;
                if !vis[v] {
                    vis[v] = true;
                    stack.push((v, 0));
                }
            } else {
                stack.pop();
                ord.push(u);
            }
        }
    }
    ord.reverse();
    ord
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_both_directions() {
        let g = WeightedDigraph::from_edges(3, [(0, 1, 2), (1, 2, 3), (2, 0, 4)]).unwrap();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.out_edges(1), &[(2, 3)]);
        assert_eq!(g.in_edges(0), &[(2, 4)]);
        assert_eq!(g.total_weight(), 9);
    }

    #[test]
    fn drops_zero_weight_edges() {
        let g = WeightedDigraph::from_edges(3, [(0, 1, 0), (1, 2, 1)]).unwrap();
        assert_eq!(g.edge_count(), 1);
        assert!(g.out_edges(0).is_empty());
        assert!(g.in_edges(1).is_empty());
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(
            WeightedDigraph::from_edges(2, [(0, 2, 1)]).unwrap_err(),
            FasError::VertexOutOfRange { from: 0, to: 2, n: 2 }
        );
        assert_eq!(
            WeightedDigraph::from_edges(2, [(1, 1, 1)]).unwrap_err(),
            FasError::SelfLoop(1)
        );
        assert_eq!(
            WeightedDigraph::from_edges(2, [(0, 1, -3)]).unwrap_err(),
            FasError::NegativeWeight { from: 0, to: 1, weight: -3 }
        );
        assert_eq!(
            WeightedDigraph::from_edges(2, [(0, 1, 1), (0, 1, 2)]).unwrap_err(),
            FasError::DuplicateEdge { from: 0, to: 1 }
        );
        // antiparallel pairs are fine
        assert!(WeightedDigraph::from_edges(2, [(0, 1, 1), (1, 0, 2)]).is_ok());
    }

    #[test]
    fn induced_subgraph_relabels() {
        let g = WeightedDigraph::from_edges(4, [(0, 1, 1), (1, 3, 2), (3, 0, 5), (2, 3, 7)]).unwrap();
        let h = g.induced_subgraph(&[3, 1, 0]);
        assert_eq!(h.vertex_count(), 3);
        assert_eq!(h.edge_count(), 3);
        assert_eq!(h.out_edges(0), &[(2, 5)]);
        assert_eq!(h.out_edges(1), &[(0, 2)]);
        assert_eq!(h.out_edges(2), &[(1, 1)]);
    }

    #[test]
    fn top_ordering_of_dag() {
        let g = vec![vec![1, 2], vec![3], vec![3], vec![]];
        let ord = top_ordering(&g);
        let mut pos = vec![0; 4];
        for (i, &v) in ord.iter().enumerate() {
            pos[v] = i;
        }
        for u in 0..4 {
            for &v in g[u].iter() {
                assert!(pos[u] < pos[v]);
            }
        }
    }
}
