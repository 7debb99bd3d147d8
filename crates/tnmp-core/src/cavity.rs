//! Cavity Extractor: directional edge-set difference of two neighborhoods.
//!
//! The cavity subgraph for a message from boundary node `a` towards center
//! `i` is the edge-induced subgraph of edges(N_a) \ edges(N_i): the part of
//! a's neighborhood that i's neighborhood does not already cover. The
//! difference is directional: swapping the arguments gives a different
//! subgraph in general.

use std::collections::{HashMap, HashSet};

use crate::error::GraphError;
use crate::graph::{ordered, SpinGraph};
use crate::neighborhood::Neighborhood;

/// Edges present in `source_edges` but absent (in either orientation) from
/// `target_edges`. Pure; output is normalized, deduplicated, and sorted.
pub fn cavity_edges(
    source_edges: &[(usize, usize)],
    target_edges: &[(usize, usize)],
) -> Vec<(usize, usize)> {
    let excluded: HashSet<(usize, usize)> = target_edges
        .iter()
        .map(|&(a, b)| ordered(a, b))
        .collect();
    let mut difference: Vec<(usize, usize)> = source_edges
        .iter()
        .map(|&(a, b)| ordered(a, b))
        .filter(|edge| !excluded.contains(edge))
        .collect();
    difference.sort_unstable();
    difference.dedup();
    difference
}

/// Looks up two precomputed neighborhoods and materializes the cavity
/// subgraph for the message `source → target`. The source node itself is
/// always part of the result, even when the edge difference is empty.
pub fn cavity_subgraph(
    neighborhoods: &HashMap<usize, Neighborhood>,
    source: usize,
    target: usize,
) -> Result<SpinGraph, GraphError> {
    let from = neighborhoods
        .get(&source)
        .ok_or(GraphError::MissingNeighborhood(source))?;
    let into = neighborhoods
        .get(&target)
        .ok_or(GraphError::MissingNeighborhood(target))?;

    let mut graph = SpinGraph::from_edges(cavity_edges(&from.edges, &into.edges))?;
    graph.ensure_node(source);
    Ok(graph)
}
