//! Ising model container: spin graph, symmetric couplings, local fields.

use std::collections::HashMap;

use crate::error::GraphError;
use crate::graph::{ordered, SpinGraph};

const SYMMETRY_TOLERANCE: f64 = 1e-12;

/// An Ising-type spin model over a [`SpinGraph`] with ids in `0..spin_count`.
///
/// Couplings are stored sparsely, keyed by normalized edge; the coupling of
/// an edge with no explicit entry reads as 0.0, and querying a pair that is
/// not a graph edge is a structural error. Fields are dense, indexed by node
/// id. The model is immutable once constructed.
#[derive(Debug, Clone)]
pub struct IsingModel {
    graph: SpinGraph,
    couplings: HashMap<(usize, usize), f64>,
    fields: Vec<f64>,
}

impl IsingModel {
    /// Validates and assembles a model.
    ///
    /// Couplings may be supplied in either orientation (or both, if they
    /// agree); an entry whose pair is not an edge of `graph` or whose two
    /// orientations disagree is rejected. Every node id must index into
    /// `fields`.
    pub fn new(
        graph: SpinGraph,
        couplings: impl IntoIterator<Item = ((usize, usize), f64)>,
        fields: Vec<f64>,
    ) -> Result<Self, GraphError> {
        for node in graph.nodes() {
            if node >= fields.len() {
                return Err(GraphError::FieldTooShort {
                    node,
                    len: fields.len(),
                });
            }
        }

        let mut table: HashMap<(usize, usize), f64> = HashMap::new();
        for ((a, b), value) in couplings {
            if !graph.has_edge(a, b) {
                return Err(GraphError::CouplingOffGraph(a, b));
            }
            let key = ordered(a, b);
            match table.insert(key, value) {
                Some(previous) if (previous - value).abs() > SYMMETRY_TOLERANCE => {
                    return Err(GraphError::AsymmetricCoupling(key.0, key.1));
                }
                _ => {}
            }
        }

        Ok(Self {
            graph,
            couplings: table,
            fields,
        })
    }

    /// Model with the same coupling on every edge and the same field on
    /// every node. Node ids must be contiguous in `0..node_count` only in
    /// the sense that the field vector covers the largest id.
    pub fn uniform(graph: SpinGraph, coupling: f64, field: f64) -> Result<Self, GraphError> {
        let spins = graph.nodes().last().map_or(0, |&last| last + 1);
        let couplings: Vec<((usize, usize), f64)> = graph
            .edges()
            .into_iter()
            .map(|edge| (edge, coupling))
            .collect();
        Self::new(graph, couplings, vec![field; spins])
    }

    pub fn graph(&self) -> &SpinGraph {
        &self.graph
    }

    /// Coupling constant J for the edge (a, b), orientation-insensitive.
    pub fn coupling(&self, a: usize, b: usize) -> Result<f64, GraphError> {
        if !self.graph.has_edge(a, b) {
            return Err(GraphError::CouplingOffGraph(a, b));
        }
        Ok(self.couplings.get(&ordered(a, b)).copied().unwrap_or(0.0))
    }

    /// Local field h for a node of the graph.
    pub fn field(&self, node: usize) -> Result<f64, GraphError> {
        if !self.graph.has_node(node) {
            return Err(GraphError::unknown_node(&node));
        }
        Ok(self.fields[node])
    }

    /// Length of the field vector (one entry per possible node id).
    pub fn spin_count(&self) -> usize {
        self.fields.len()
    }
}
