//! Error types for the graph-level subsystem.

use std::fmt::Debug;

use thiserror::Error;

/// Errors raised by graph construction, model validation, and the
/// neighborhood/cavity operations.
///
/// Invalid arguments (unknown nodes, self-loops) and structural
/// inconsistencies (couplings without a matching edge, edge sets that
/// disagree with the full graph) all fail fast; none of these conditions is
/// retried or repaired.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("node {0} is not part of the graph")]
    UnknownNode(String),

    #[error("edge ({0}, {1}) is not part of the graph")]
    UnknownEdge(String, String),

    #[error("self-loops are not allowed (node {0})")]
    SelfLoop(String),

    #[error("coupling ({0}, {1}) has no matching graph edge")]
    CouplingOffGraph(usize, usize),

    #[error("couplings ({0}, {1}) and ({1}, {0}) disagree")]
    AsymmetricCoupling(usize, usize),

    #[error("field vector has length {len} but the graph contains node {node}")]
    FieldTooShort { node: usize, len: usize },

    #[error("no precomputed neighborhood for node {0}")]
    MissingNeighborhood(usize),
}

impl GraphError {
    pub(crate) fn unknown_node<N: Debug>(node: &N) -> Self {
        GraphError::UnknownNode(format!("{node:?}"))
    }

    pub(crate) fn unknown_edge<N: Debug>(a: &N, b: &N) -> Self {
        GraphError::UnknownEdge(format!("{a:?}"), format!("{b:?}"))
    }

    pub(crate) fn self_loop<N: Debug>(node: &N) -> Self {
        GraphError::SelfLoop(format!("{node:?}"))
    }
}
