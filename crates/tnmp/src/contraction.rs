//! Local Contraction Engine: sum-product contraction of a local subgraph
//! into a message vector.
//!
//! Every edge of the local graph contributes a 2×2 Boltzmann factor, every
//! node a 2-vector (the open node its own field factor, everyone else their
//! stored message towards the open node, defaulting to their field
//! distribution). Contracting over all shared node labels with only the
//! open node's index left free yields the unnormalized update, which is
//! then normalized to unit sum.
//!
//! Factors are L2-normalized before contraction and the result is
//! renormalized after; both steps only guard against overflow/underflow
//! across extended subgraphs and leave the normalized result unchanged.

use mdarray::{DynRank, Tensor};

use tnmp_core::{IsingModel, SpinGraph};

use crate::einsum::{contract_network, Factor};
use crate::error::ContractionError;
use crate::messages::{field_distribution, MessageTable};

/// Sums below this threshold are reported as degenerate.
const MIN_NORM: f64 = 1e-12;

/// Belief-propagation update for `open_node` on the local graph.
///
/// Pure: identical inputs produce bit-identical output. The returned
/// 2-vector has unit sum; a (near-)zero or non-finite sum is surfaced as
/// [`ContractionError::Degenerate`] instead of being divided through.
pub fn contract_local(
    local: &SpinGraph,
    model: &IsingModel,
    messages: &MessageTable,
    open_node: usize,
    beta: f64,
) -> Result<[f64; 2], ContractionError> {
    if !(beta.is_finite() && beta > 0.0) {
        return Err(ContractionError::InvalidBeta(beta));
    }
    if local.node_count() == 0 {
        return Err(ContractionError::EmptyNetwork);
    }
    if !local.has_node(open_node) {
        return Err(ContractionError::OpenNodeMissing(open_node));
    }

    let mut factors: Vec<Factor> = Vec::with_capacity(local.edge_count() + local.node_count());
    for (u, v) in local.edges() {
        factors.push((vec![u, v], boltzmann_factor(u, v, model.coupling(u, v)?, beta)?));
    }
    for node in local.nodes() {
        let vector = if node == open_node {
            field_distribution(model.field(node)?, beta)
        } else {
            messages.get_or_field(node, open_node, model.field(node)?, beta)
        };
        let vector = l2_normalize(vector)
            .ok_or(ContractionError::DegenerateMessage { node })?;
        factors.push((vec![node], Tensor::from(vector.to_vec()).into_shape([2]).into_dyn()));
    }

    let contracted = contract_network(factors, &[open_node])?;
    let entries: Vec<f64> = contracted.iter().copied().collect();
    debug_assert_eq!(entries.len(), 2);
    let sum = entries[0] + entries[1];
    if !sum.is_finite() || sum.abs() <= MIN_NORM {
        return Err(ContractionError::Degenerate { sum });
    }
    Ok([entries[0] / sum, entries[1] / sum])
}

/// L2-normalized Boltzmann matrix `exp(β·J·[[1, -1], [-1, 1]])`.
fn boltzmann_factor(
    u: usize,
    v: usize,
    coupling: f64,
    beta: f64,
) -> Result<Tensor<f64, DynRank>, ContractionError> {
    let aligned = (beta * coupling).exp();
    let opposed = (-beta * coupling).exp();
    if !aligned.is_finite() || !opposed.is_finite() {
        return Err(ContractionError::FactorOverflow(u, v));
    }
    let norm = (2.0 * (aligned * aligned + opposed * opposed)).sqrt();
    if !norm.is_finite() {
        return Err(ContractionError::FactorOverflow(u, v));
    }
    let data = vec![
        aligned / norm,
        opposed / norm,
        opposed / norm,
        aligned / norm,
    ];
    Ok(Tensor::from(data).into_shape([2, 2]).into_dyn())
}

fn l2_normalize(vector: [f64; 2]) -> Option<[f64; 2]> {
    let norm = (vector[0] * vector[0] + vector[1] * vector[1]).sqrt();
    if !norm.is_finite() || norm <= MIN_NORM {
        return None;
    }
    Some([vector[0] / norm, vector[1] / norm])
}
