//! Error types for the numeric subsystem.

use thiserror::Error;
use tnmp_core::GraphError;

/// Errors raised by the Local Contraction Engine.
///
/// The degeneracy variants ([`ContractionError::Degenerate`],
/// [`ContractionError::DegenerateMessage`],
/// [`ContractionError::FactorOverflow`]) are the distinct, catchable
/// numerical conditions of the engine; everything else is an invalid
/// argument or a structural inconsistency and fails fast.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContractionError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("local graph is empty")]
    EmptyNetwork,

    #[error("open node {0} is not part of the local graph")]
    OpenNodeMissing(usize),

    #[error("inverse temperature must be finite and positive, got {0}")]
    InvalidBeta(f64),

    #[error("axis {id} has inconsistent dimensions ({left} vs {right})")]
    AxisMismatch { id: usize, left: usize, right: usize },

    #[error("open index {0} does not appear in the network")]
    OpenIndexNotFound(usize),

    #[error("Boltzmann factor on edge ({0}, {1}) overflowed")]
    FactorOverflow(usize, usize),

    #[error("message from node {node} has zero norm")]
    DegenerateMessage { node: usize },

    #[error("contraction result sums to {sum:e}; the local distribution is degenerate")]
    Degenerate { sum: f64 },
}

/// Errors raised by the message-passing driver.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PropagationError {
    #[error(transparent)]
    Contraction(#[from] ContractionError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("invalid propagation options: {0}")]
    InvalidOptions(&'static str),
}
