//! Weighted minimum feedback arc set, approximated by the greedy ordering heuristic of Eades,
//! Lin and Smyth.
//!
//! Given a directed graph with positive integer arc weights, [`order`] computes a linear order of
//! the vertices that keeps the total weight of backward arcs small. The engine runs in
//! `O(n + m + W)` where `W` is the largest weighted degree, using a bucket queue of intrusive
//! linked lists for the `out - in` scores and a sorted set for pending sources.
//!
//! ```
//! use eades_order::{order, OrderingConfig, WeightedDigraph};
//!
//! let g = WeightedDigraph::from_edges(3, [(0, 1, 5), (1, 2, 5), (2, 0, 1)]).unwrap();
//! let a = order(&g, &OrderingConfig::default()).unwrap();
//! assert_eq!(a.order(), &[0, 1, 2]);
//! assert_eq!(a.backward_weight(&g), 1);
//! ```
pub mod arrangement;
pub mod bucket;
pub mod config;
pub mod degree;
pub mod engine;
pub mod error;
pub mod graph;
pub mod scc;
pub mod sources;

// Re-exports to flatten the crate.
pub use arrangement::Arrangement;
pub use config::{OrderingConfig, SourcePriority};
pub use engine::{greedy_order, OrderingEngine, VertexState};
pub use error::FasError;
pub use graph::{Edge, WeightedDigraph};
pub use scc::{order, order_by_components, strongly_connected_components};
