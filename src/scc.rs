use tracing::info;

use crate::arrangement::Arrangement;
use crate::config::OrderingConfig;
use crate::engine;
use crate::error::{FasError, Result};
use crate::graph::{self, WeightedDigraph};

/// Returns the strongly connected components of `g` in topological order of the condensation:
/// no arc leads from a component to an earlier one.
pub fn strongly_connected_components(g: &WeightedDigraph) -> Vec<Vec<usize>> {
    let h = g.successors();
    // compute top ordering
    let ord = graph::top_ordering(&h);
    // get reverse graph
    let mut hrev: Vec<Vec<usize>> = vec![Vec::new(); h.len()];
    for u in 0..h.len() {
        for &v in h[u].iter() {
            hrev[v].push(u);
        }
    }
    let mut vertex_labels: Vec<Option<usize>> = vec![None; h.len()];
    let mut label = 0;
    let mut stack = Vec::new();
    for u in ord.into_iter() {
        if vertex_labels[u].is_some() {
            continue;
        }
        vertex_labels[u] = Some(label);
        stack.push(u);
        while let Some(x) = stack.pop() {
            for &y in hrev[x].iter() {
                if vertex_labels[y].is_none() {
                    vertex_labels[y] = Some(label);
                    stack.push(y);
                }
            }
        }
        label += 1;
    }
    let mut sccs: Vec<Vec<usize>> = vec![Vec::new(); label];
    for (u, l) in vertex_labels.into_iter().enumerate() {
        if let Some(l) = l {
            sccs[l].push(u);
        }
    }
    sccs
}

/// Orders every strongly connected component with its own engine and glues the partial orders
/// together in condensation order. Arcs between components then always point forward, so the
/// backward arcs of the result all lie inside components.
pub fn order_by_components(g: &WeightedDigraph, config: &OrderingConfig) -> Result<Arrangement> {
    // every vertex is placed exactly once, so the limit can be checked up front
    if let Some(limit) = config.step_limit {
        if limit < g.vertex_count() {
            return Err(FasError::StepLimitExceeded { limit, remaining: g.vertex_count() - limit });
        }
    }
    let sccs = strongly_connected_components(g);
    info!(
        n = g.vertex_count(),
        components = sccs.len(),
        largest = sccs.iter().map(Vec::len).max().unwrap_or(0),
        "decomposed graph into strongly connected components"
    );
    let sub_config = OrderingConfig { step_limit: None, ..config.clone() };
    let mut ordering: Vec<usize> = Vec::with_capacity(g.vertex_count());
    for scc in sccs.iter() {
        if scc.len() == 1 {
            ordering.push(scc[0]);
            continue;
        }
        let sub = g.induced_subgraph(scc);
        let sub_order = engine::greedy_order(&sub, &sub_config)?;
        for &v in sub_order.order() {
            ordering.push(scc[v]);
        }
    }
    Arrangement::from_sequence(ordering).ok_or(FasError::CorruptOrder)
}

/// Orders `g`, decomposing into strongly connected components first if the config asks for it.
pub fn order(g: &WeightedDigraph, config: &OrderingConfig) -> Result<Arrangement> {
    if config.decompose {
        order_by_components(g, config)
    } else {
        engine::greedy_order(g, config)
    }
}
