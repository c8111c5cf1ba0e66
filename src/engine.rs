use tracing::{debug, trace};

use crate::arrangement::Arrangement;
use crate::bucket::BucketQueue;
use crate::config::OrderingConfig;
use crate::degree::DegreeTracker;
use crate::error::{FasError, Result};
use crate::graph::WeightedDigraph;
use crate::sources::SourceRegistry;

/// Bucket reserved for sinks.
const SINK_BUCKET: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexState {
    Unordered,
    Source,
    Sink,
    Ordered,
}

/// The greedy feedback arc set heuristic of Eades, Lin and Smyth, weighted version.
///
/// Vertices are placed one at a time. Pending sources (no remaining in-weight) always go first
/// since they cannot add a backward arc. Otherwise the vertex with the largest remaining
/// `out - in` weight is taken from the bucket queue. Sinks are parked in bucket 0 so that they
/// are only picked once nothing better is left.
///
/// An engine owns all of its state and is consumed by [`OrderingEngine::run`]; build a fresh one
/// per graph.
#[derive(Debug)]
pub struct OrderingEngine<'g> {
    g: &'g WeightedDigraph,
    config: OrderingConfig,
    degrees: DegreeTracker,
    buckets: BucketQueue,
    sources: SourceRegistry,
    state: Vec<VertexState>,
    position: Vec<usize>,
    shift: usize,
    placed: usize,
}

impl<'g> OrderingEngine<'g> {
    /// Computes degrees and seeds the bucket queue and the source registry.
    pub fn new(g: &'g WeightedDigraph, config: OrderingConfig) -> Result<OrderingEngine<'g>> {
        let n = g.vertex_count();
        let degrees = DegreeTracker::new(g)?;
        // scores out - in live in [-max_in, max_out]; shifting by max_in + 1 maps them to
        // [1, max_in + max_out + 1] and leaves bucket 0 to the sinks
        let too_large = FasError::ScoreRangeTooLarge {
            max_in: degrees.max_in(),
            max_out: degrees.max_out(),
            limit: config.max_buckets,
        };
        let num_buckets = degrees
            .max_in()
            .checked_add(degrees.max_out())
            .and_then(|b| b.checked_add(2))
            .and_then(|b| usize::try_from(b).ok())
            .filter(|&b| b <= config.max_buckets)
            .ok_or(too_large)?;
        // max_in + 1 < num_buckets, so neither conversion nor addition can fail from here on
        let shift = degrees.max_in() as usize + 1;

        let mut engine = OrderingEngine {
            g,
            degrees,
            buckets: BucketQueue::new(num_buckets, n)?,
            sources: SourceRegistry::new(config.source_priority),
            config,
            state: vec![VertexState::Unordered; n],
            position: vec![usize::MAX; n],
            shift,
            placed: 0,
        };

        let (mut n_sources, mut n_sinks) = (0, 0);
        for v in 0..n {
            if engine.degrees.in_weight(v) == 0 {
                engine.state[v] = VertexState::Source;
                engine.sources.add(v, engine.degrees.out_weight(v));
                n_sources += 1;
            } else if engine.degrees.out_weight(v) == 0 {
                engine.state[v] = VertexState::Sink;
                engine.buckets.push_back(SINK_BUCKET, v)?;
                n_sinks += 1;
            } else {
                let k = engine.score(v)?;
                engine.buckets.push_back(k, v)?;
            }
        }
        debug!(
            n,
            m = g.edge_count(),
            num_buckets,
            shift,
            n_sources,
            n_sinks,
            "initialised ordering engine"
        );
        Ok(engine)
    }

    pub fn state(&self, v: usize) -> VertexState {
        self.state[v]
    }

    pub fn degrees(&self) -> &DegreeTracker {
        &self.degrees
    }

    pub fn buckets(&self) -> &BucketQueue {
        &self.buckets
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    /// Number of vertices placed so far.
    pub fn placed(&self) -> usize {
        self.placed
    }

    /// True once every vertex has a position.
    pub fn is_done(&self) -> bool {
        self.placed == self.g.vertex_count()
    }

    /// Places one vertex and returns it: the next pending source if there is one, otherwise the
    /// head of the highest nonempty bucket.
    pub fn step(&mut self) -> Result<usize> {
        self.check_step_limit()?;
        if let Some(v) = self.sources.pop() {
            self.place(v);
            trace!(v, pos = self.placed - 1, "placed source");
            self.remove_out_edges(v)?;
            return Ok(v);
        }
        let v = self.buckets.pop_highest().ok_or(FasError::EmptyQueue {
            remaining: self.g.vertex_count() - self.placed,
        })?;
        self.place(v);
        trace!(v, pos = self.placed - 1, "placed from bucket");
        self.remove_out_edges(v)?;
        self.remove_in_edges(v)?;
        Ok(v)
    }

    /// Runs the greedy loop to completion.
    pub fn run(mut self) -> Result<Arrangement> {
        while !self.is_done() {
            self.step()?;
        }
        Arrangement::from_positions(self.position).ok_or(FasError::CorruptOrder)
    }

    fn check_step_limit(&self) -> Result<()> {
        match self.config.step_limit {
            Some(limit) if self.placed >= limit => Err(FasError::StepLimitExceeded {
                limit,
                remaining: self.g.vertex_count() - self.placed,
            }),
            _ => Ok(()),
        }
    }

    fn place(&mut self, v: usize) {
        self.state[v] = VertexState::Ordered;
        self.position[v] = self.placed;
        self.placed += 1;
    }

    /// Shifted bucket key of a vertex that is neither source nor sink.
    fn score(&self, v: usize) -> Result<usize> {
        let out_w = to_key(self.degrees.out_weight(v), v)?;
        let in_w = to_key(self.degrees.in_weight(v), v)?;
        // in_w <= max_in < shift, so this never underflows
        Ok(out_w + (self.shift - in_w))
    }

    /// Takes an unordered or sink vertex out of its bucket.
    fn unqueue(&mut self, v: usize) -> Result<()> {
        let k = self.buckets.remove(v);
        debug_assert!(k.is_some(), "vertex {v} is not in any bucket");
        k.map(|_| ()).ok_or(FasError::NotQueued(v))
    }

    /// Removes the out-arcs of a freshly placed vertex `v` from its unordered successors.
    fn remove_out_edges(&mut self, v: usize) -> Result<()> {
        let g = self.g;
        for &(to, w) in g.out_edges(v) {
            if matches!(self.state[to], VertexState::Ordered | VertexState::Sink) {
                continue;
            }
            let left = self.degrees.decrement_in(to, w)?;
            self.unqueue(to)?;
            if left == 0 {
                self.state[to] = VertexState::Source;
                self.sources.add(to, self.degrees.out_weight(to));
            } else {
                let k = self.score(to)?;
                self.buckets.insert_front(k, to)?;
            }
        }
        Ok(())
    }

    /// Removes the in-arcs of a vertex `v` placed from the bucket queue from its unordered
    /// predecessors.
    fn remove_in_edges(&mut self, v: usize) -> Result<()> {
        let g = self.g;
        for &(from, w) in g.in_edges(v) {
            if matches!(self.state[from], VertexState::Ordered | VertexState::Source) {
                continue;
            }
            let left = self.degrees.decrement_out(from, w)?;
            self.unqueue(from)?;
            let k = if left == 0 {
                self.state[from] = VertexState::Sink;
                SINK_BUCKET
            } else {
                self.score(from)?
            };
            self.buckets.insert_front(k, from)?;
        }
        Ok(())
    }
}

fn to_key(w: u64, v: usize) -> Result<usize> {
    usize::try_from(w).map_err(|_| FasError::WeightOverflow(v))
}

/// Orders the whole graph with a single engine run.
pub fn greedy_order(g: &WeightedDigraph, config: &OrderingConfig) -> Result<Arrangement> {
    OrderingEngine::new(g, config.clone())?.run()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::config::SourcePriority;

    fn graph(n: usize, edges: &[(usize, usize, i64)]) -> WeightedDigraph {
        WeightedDigraph::from_edges(n, edges.iter().copied()).unwrap()
    }

    #[test]
    fn seeds_sources_sinks_and_buckets() {
        // 0 -> 1 -> 2, 1 <-> 3
        let g = graph(4, &[(0, 1, 2), (1, 2, 1), (1, 3, 4), (3, 1, 3)]);
        let e = OrderingEngine::new(&g, OrderingConfig::default()).unwrap();
        // max_in = 5 (vertex 1), max_out = 5 (vertex 1)
        assert_eq!(e.buckets().num_buckets(), 12);
        assert_eq!(e.state(0), VertexState::Source);
        assert_eq!(e.state(2), VertexState::Sink);
        assert_eq!(e.buckets().key_of(2), Some(0));
        assert_eq!(e.buckets().key_of(0), None);
        // vertex 1: out 5 - in 5 + 6
        assert_eq!(e.buckets().key_of(1), Some(6));
        // vertex 3: out 3 - in 4 + 6
        assert_eq!(e.buckets().key_of(3), Some(5));
        assert_eq!(e.sources().len(), 1);
    }

    #[test]
    fn chain_is_ordered_front_to_back() {
        let g = graph(4, &[(0, 1, 1), (1, 2, 1), (2, 3, 1)]);
        let a = greedy_order(&g, &OrderingConfig::default()).unwrap();
        assert_eq!(a.order(), &[0, 1, 2, 3]);
        assert_eq!(a.backward_weight(&g), 0);
    }

    #[test]
    fn cycle_breaks_cheapest_arc() {
        // heavy cycle 0 -> 1 -> 2 -> 0 with a light closing arc
        let g = graph(3, &[(0, 1, 5), (1, 2, 5), (2, 0, 1)]);
        let a = greedy_order(&g, &OrderingConfig::default()).unwrap();
        assert_eq!(a.backward_weight(&g), 1);
        assert_eq!(a.order(), &[0, 1, 2]);
    }

    #[test]
    fn bucket_pick_promotes_successor_to_source() {
        let g = graph(3, &[(0, 1, 5), (1, 2, 5), (2, 0, 5)]);
        let mut e = OrderingEngine::new(&g, OrderingConfig::default()).unwrap();
        assert!(e.sources().is_empty());
        let v = e.buckets.pop_highest().unwrap();
        assert_eq!(v, 0);
        e.place(v);
        e.remove_out_edges(v).unwrap();
        e.remove_in_edges(v).unwrap();
        assert_eq!(e.state(1), VertexState::Source);
        assert_eq!(e.state(2), VertexState::Sink);
        assert_eq!(e.buckets().key_of(2), Some(SINK_BUCKET));
        assert_eq!(e.placed(), 1);
    }

    #[test]
    fn source_priority_changes_tie_order() {
        // two sources: 0 with out-weight 1, 1 with out-weight 3
        let g = graph(4, &[(0, 2, 1), (1, 3, 3)]);
        let least = greedy_order(&g, &OrderingConfig::default()).unwrap();
        assert_eq!(least.vertex_at(0), 0);
        let greatest = greedy_order(
            &g,
            &OrderingConfig::default().with_source_priority(SourcePriority::GreatestOutWeight),
        )
        .unwrap();
        assert_eq!(greatest.vertex_at(0), 1);
        assert_eq!(least.backward_weight(&g), 0);
        assert_eq!(greatest.backward_weight(&g), 0);
    }

    #[test]
    fn step_limit_stops_the_loop() {
        let g = graph(3, &[(0, 1, 1), (1, 2, 1)]);
        let err = greedy_order(&g, &OrderingConfig::default().with_step_limit(2)).unwrap_err();
        assert_eq!(err, FasError::StepLimitExceeded { limit: 2, remaining: 1 });
        assert!(!err.is_invariant_violation());
        assert!(greedy_order(&g, &OrderingConfig::default().with_step_limit(3)).is_ok());
    }

    #[test]
    fn huge_weights_are_rejected_not_allocated() {
        let g = graph(2, &[(0, 1, 1 << 42), (1, 0, 1)]);
        let err = greedy_order(&g, &OrderingConfig::default()).unwrap_err();
        assert_eq!(
            err,
            FasError::ScoreRangeTooLarge {
                max_in: 1 << 42,
                max_out: 1 << 42,
                limit: crate::config::DEFAULT_MAX_BUCKETS,
            }
        );
        assert!(!err.is_invariant_violation());
    }

    #[test]
    fn bucket_limit_is_configurable() {
        // max_in = max_out = 3, so 8 buckets are needed
        let g = graph(3, &[(0, 1, 3), (1, 2, 3), (2, 0, 3)]);
        let tight = OrderingConfig::default().with_max_buckets(7);
        assert!(matches!(
            greedy_order(&g, &tight),
            Err(FasError::ScoreRangeTooLarge { max_in: 3, max_out: 3, limit: 7 })
        ));
        assert!(greedy_order(&g, &OrderingConfig::default().with_max_buckets(8)).is_ok());
    }

    fn random_graph(rng: &mut StdRng) -> WeightedDigraph {
        let n = rng.gen_range(2..40);
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for _ in 0..rng.gen_range(0..4 * n) {
            let (u, v) = (rng.gen_range(0..n), rng.gen_range(0..n));
            if u != v && seen.insert((u, v)) {
                edges.push((u, v, rng.gen_range(1..20)));
            }
        }
        WeightedDigraph::from_edges(n, edges).unwrap()
    }

    /// Every vertex sits in exactly one of: the source registry, a bucket, or the order. Sources
    /// stay sources until placed.
    fn check_membership(e: &OrderingEngine<'_>, was_source: &mut [bool]) {
        let pending: HashSet<usize> = e.sources().vertices().collect();
        assert_eq!(pending.len(), e.sources().len());
        let mut queued = 0;
        for v in 0..e.g.vertex_count() {
            let in_bucket = e.buckets().key_of(v).is_some();
            match e.state(v) {
                VertexState::Source => {
                    assert!(pending.contains(&v) && !in_bucket, "source {v} misfiled");
                    was_source[v] = true;
                }
                VertexState::Unordered | VertexState::Sink => {
                    assert!(in_bucket && !pending.contains(&v), "vertex {v} not in a bucket");
                    assert!(!was_source[v], "source {v} was demoted");
                    queued += 1;
                }
                VertexState::Ordered => {
                    assert!(!in_bucket && !pending.contains(&v), "placed vertex {v} still queued");
                }
            }
            if e.state(v) == VertexState::Sink {
                assert_eq!(e.buckets().key_of(v), Some(SINK_BUCKET));
            }
        }
        assert_eq!(queued, e.buckets().len());
    }

    #[test]
    fn every_vertex_lives_in_exactly_one_place() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let g = random_graph(&mut rng);
            let mut e = OrderingEngine::new(&g, OrderingConfig::default()).unwrap();
            let mut was_source = vec![false; g.vertex_count()];
            check_membership(&e, &mut was_source);
            while !e.is_done() {
                let v = e.step().unwrap();
                assert_eq!(e.state(v), VertexState::Ordered);
                check_membership(&e, &mut was_source);
            }
            assert!(e.sources().is_empty());
            assert!(e.buckets().is_empty());
        }
    }

    fn engine_with_lost_vertex(g: &WeightedDigraph) -> OrderingEngine<'_> {
        let mut e = OrderingEngine::new(g, OrderingConfig::default()).unwrap();
        // corrupt the bookkeeping: vertex 1 is unordered but in no bucket
        e.buckets.remove(1);
        e
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn missing_bucket_entry_is_reported() {
        let g = graph(3, &[(0, 1, 5), (1, 2, 5), (2, 0, 5)]);
        let mut e = engine_with_lost_vertex(&g);
        let err = e.step().unwrap_err();
        assert_eq!(err, FasError::NotQueued(1));
        assert!(err.is_invariant_violation());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "not in any bucket")]
    fn missing_bucket_entry_asserts_in_debug() {
        let g = graph(3, &[(0, 1, 5), (1, 2, 5), (2, 0, 5)]);
        let mut e = engine_with_lost_vertex(&g);
        let _ = e.step();
    }
}
