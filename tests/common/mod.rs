#![allow(dead_code)]

use std::collections::HashSet;

use eades_order::WeightedDigraph;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Random simple digraph with about `m` arcs of weight `1..=max_w`.
pub fn random_graph(n: usize, m: usize, max_w: i64, seed: u64) -> WeightedDigraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    if n >= 2 {
        for _ in 0..m {
            let u = rng.gen_range(0..n);
            let v = rng.gen_range(0..n);
            if u != v && seen.insert((u, v)) {
                edges.push((u, v, rng.gen_range(1..=max_w)));
            }
        }
    }
    WeightedDigraph::from_edges(n, edges).unwrap()
}

/// Random DAG whose topological order is a shuffled permutation of the vertices.
pub fn random_dag(n: usize, m: usize, max_w: i64, seed: u64) -> WeightedDigraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rank: Vec<usize> = (0..n).collect();
    rank.shuffle(&mut rng);
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    if n >= 2 {
        for _ in 0..m {
            let a = rng.gen_range(0..n);
            let b = rng.gen_range(0..n);
            if a == b {
                continue;
            }
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            let (u, v) = (rank[lo], rank[hi]);
            if seen.insert((u, v)) {
                edges.push((u, v, rng.gen_range(1..=max_w)));
            }
        }
    }
    WeightedDigraph::from_edges(n, edges).unwrap()
}
