//! Neighborhood Builder: grows a subgraph around a center node until its
//! boundary is separated in the complement graph.
//!
//! The defining guarantee: after `build_neighborhood(g, center, radius)`,
//! every pair of boundary nodes of the returned subgraph is strictly more
//! than `radius` apart (edge-count distance) in the graph formed by removing
//! the subgraph's internal edges from `g`. Pairs that become disconnected
//! satisfy this vacuously.
//!
//! Growth runs `radius` rounds with a graded path-length threshold (round r
//! absorbs environment paths of at most r edges), and each round iterates
//! turns to a fixed point: recompute the boundary, then absorb the union of
//! all shortest environment paths between every still-close boundary pair.
//! Absorbed edges leave the environment, so distances only grow and both
//! loops terminate.

use log::debug;

use crate::error::GraphError;
use crate::graph::SpinGraph;

/// A grown neighborhood: the center, plus sorted deduplicated node and edge
/// sets. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighborhood {
    pub center: usize,
    pub nodes: Vec<usize>,
    pub edges: Vec<(usize, usize)>,
}

impl Neighborhood {
    /// Materializes the subgraph, including any isolated nodes.
    pub fn to_graph(&self) -> SpinGraph {
        let mut graph = SpinGraph::with_capacity(self.nodes.len(), self.edges.len());
        for &node in &self.nodes {
            graph.ensure_node(node);
        }
        for &(a, b) in &self.edges {
            // Edges come from a validated build; self-loops cannot occur.
            let _ = graph.ensure_edge(a, b);
        }
        graph
    }

    /// Boundary nodes of this neighborhood with respect to the full graph.
    pub fn boundary(&self, full: &SpinGraph) -> Vec<usize> {
        boundary_nodes(&self.to_graph(), full)
    }
}

/// One boundary-recompute-and-absorb turn within a growth round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowthTurn {
    /// Boundary of the neighborhood at the start of the turn.
    pub boundary: Vec<usize>,
    /// Nodes first seen during this turn.
    pub added_nodes: Vec<usize>,
    /// Edges absorbed during this turn.
    pub added_edges: Vec<(usize, usize)>,
}

/// Record of one growth round (one radius step).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowthRound {
    /// Path-length threshold (edge count) used for this round.
    pub reach: usize,
    /// Turns executed until the round reached its fixed point; the last
    /// turn always absorbs nothing.
    pub turns: Vec<GrowthTurn>,
}

/// Nodes of `sub` that have at least one incident `full`-graph edge not
/// contained in `sub`. Sorted ascending.
pub fn boundary_nodes(sub: &SpinGraph, full: &SpinGraph) -> Vec<usize> {
    sub.nodes()
        .into_iter()
        .filter(|&node| {
            full.neighbors(node)
                .into_iter()
                .any(|nb| !sub.has_edge(node, nb))
        })
        .collect()
}

/// Grows the neighborhood of `center` with the separation guarantee above.
///
/// `radius = 0` returns exactly the star of `center`: its direct neighbors
/// and the edges connecting them to it. A center outside the graph is an
/// invalid argument.
pub fn build_neighborhood(
    full: &SpinGraph,
    center: usize,
    radius: usize,
) -> Result<Neighborhood, GraphError> {
    build_neighborhood_traced(full, center, radius).map(|(neighborhood, _)| neighborhood)
}

/// Same as [`build_neighborhood`], also returning the per-round growth
/// records consumed by visualization tooling.
pub fn build_neighborhood_traced(
    full: &SpinGraph,
    center: usize,
    radius: usize,
) -> Result<(Neighborhood, Vec<GrowthRound>), GraphError> {
    if !full.has_node(center) {
        return Err(GraphError::unknown_node(&center));
    }

    let mut sub = SpinGraph::new();
    sub.ensure_node(center);
    let mut environment = full.clone();
    for neighbor in full.neighbors(center) {
        sub.ensure_edge(center, neighbor)?;
        environment.remove_edge(center, neighbor);
    }

    let mut rounds = Vec::with_capacity(radius);
    for reach in 1..=radius {
        rounds.push(grow_round(&mut sub, &mut environment, reach)?);
    }

    let neighborhood = Neighborhood {
        center,
        nodes: sub.nodes(),
        edges: sub.edges(),
    };
    debug!(
        "neighborhood of {center} at radius {radius}: {} nodes, {} edges",
        neighborhood.nodes.len(),
        neighborhood.edges.len()
    );
    Ok((neighborhood, rounds))
}

/// One growth round: turns run until a turn absorbs nothing.
fn grow_round(
    sub: &mut SpinGraph,
    environment: &mut SpinGraph,
    reach: usize,
) -> Result<GrowthRound, GraphError> {
    let mut turns = Vec::new();
    'turns: loop {
        // The environment holds every full-graph edge not yet absorbed, so
        // a neighborhood node is on the boundary exactly when it still has
        // environment degree.
        let boundary: Vec<usize> = sub
            .nodes()
            .into_iter()
            .filter(|&node| environment.degree(node) > 0)
            .collect();

        let mut added_nodes = Vec::new();
        let mut added_edges = Vec::new();
        for (offset, &a) in boundary.iter().enumerate() {
            for &b in &boundary[offset + 1..] {
                // Absorbing removes every shortest path at the current
                // distance, so each iteration strictly increases the pair
                // distance and this loop terminates.
                'absorb: loop {
                    let Some(union) = environment.shortest_path_union(a, b)? else {
                        break 'absorb;
                    };
                    if union.length > reach {
                        break 'absorb;
                    }
                    for &node in &union.nodes {
                        if !sub.has_node(node) {
                            added_nodes.push(node);
                            sub.ensure_node(node);
                        }
                    }
                    for &(u, v) in &union.edges {
                        if sub.ensure_edge(u, v)? {
                            added_edges.push((u, v));
                        }
                        environment.remove_edge(u, v);
                    }
                }
            }
        }

        let grew = !(added_nodes.is_empty() && added_edges.is_empty());
        turns.push(GrowthTurn {
            boundary,
            added_nodes,
            added_edges,
        });
        if !grew {
            break 'turns;
        }
    }
    debug!("growth round at reach {reach}: {} turns", turns.len());
    Ok(GrowthRound { reach, turns })
}
