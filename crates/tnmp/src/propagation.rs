//! Synchronous message-passing driver.
//!
//! Neighborhoods are built once per node, cavity subgraphs once per message
//! slot; each sweep then recomputes every slot with the contraction engine,
//! reading only the previous sweep's table and writing into a fresh one
//! before swapping. Convergence is measured as the max absolute component
//! delta across all slots.

use std::collections::HashMap;

use log::debug;

use tnmp_core::{build_neighborhood, cavity_subgraph, IsingModel, Neighborhood, SpinGraph};

use crate::contraction::contract_local;
use crate::error::PropagationError;
use crate::messages::MessageTable;

/// Configuration for the message-passing run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationOptions {
    /// Neighborhood radius R.
    pub radius: usize,
    /// Inverse temperature β.
    pub beta: f64,
    /// Maximum synchronous sweeps.
    pub max_sweeps: usize,
    /// Convergence threshold on the max absolute message delta.
    pub tolerance: f64,
}

impl Default for PropagationOptions {
    fn default() -> Self {
        Self {
            radius: 1,
            beta: 1.0,
            max_sweeps: 32,
            tolerance: 1e-6,
        }
    }
}

impl PropagationOptions {
    fn validate(&self) -> Result<(), PropagationError> {
        if self.max_sweeps == 0 {
            return Err(PropagationError::InvalidOptions("max_sweeps must be > 0"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(PropagationError::InvalidOptions(
                "tolerance must be finite and > 0",
            ));
        }
        if !(self.beta.is_finite() && self.beta > 0.0) {
            return Err(PropagationError::InvalidOptions(
                "beta must be finite and > 0",
            ));
        }
        Ok(())
    }
}

/// Runtime diagnostics of a message-passing run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationDiagnostics {
    pub max_sweeps: usize,
    pub sweeps_run: usize,
    pub converged: bool,
    pub final_max_delta: f64,
}

/// Precomputed local structure: every node's neighborhood and boundary, and
/// the cavity subgraph behind every message slot.
#[derive(Debug, Clone)]
pub struct Propagation {
    neighborhoods: HashMap<usize, Neighborhood>,
    boundaries: HashMap<usize, Vec<usize>>,
    cavities: HashMap<(usize, usize), SpinGraph>,
}

impl Propagation {
    /// Builds the neighborhood of every node at the given radius, plus the
    /// cavity subgraph for each (boundary node, center) message slot.
    pub fn prepare(model: &IsingModel, radius: usize) -> Result<Self, PropagationError> {
        let graph = model.graph();
        let mut neighborhoods = HashMap::new();
        for node in graph.nodes() {
            neighborhoods.insert(node, build_neighborhood(graph, node, radius)?);
        }

        let mut boundaries = HashMap::new();
        let mut cavities = HashMap::new();
        for node in graph.nodes() {
            let boundary = neighborhoods[&node].boundary(graph);
            for &source in &boundary {
                cavities.insert((source, node), cavity_subgraph(&neighborhoods, source, node)?);
            }
            boundaries.insert(node, boundary);
        }
        debug!(
            "prepared {} neighborhoods, {} message slots",
            neighborhoods.len(),
            cavities.len()
        );
        Ok(Self {
            neighborhoods,
            boundaries,
            cavities,
        })
    }

    pub fn neighborhood(&self, node: usize) -> Option<&Neighborhood> {
        self.neighborhoods.get(&node)
    }

    pub fn boundary(&self, node: usize) -> Option<&[usize]> {
        self.boundaries.get(&node).map(Vec::as_slice)
    }

    /// All (source, target) message slots, sorted for deterministic sweeps.
    pub fn message_slots(&self) -> Vec<(usize, usize)> {
        let mut slots: Vec<(usize, usize)> = self.cavities.keys().copied().collect();
        slots.sort_unstable();
        slots
    }

    /// One synchronous sweep: recomputes every slot from `previous` into a
    /// fresh table. Returns the new table and the max absolute delta.
    pub fn sweep(
        &self,
        model: &IsingModel,
        previous: &MessageTable,
        beta: f64,
    ) -> Result<(MessageTable, f64), PropagationError> {
        let mut next = MessageTable::new();
        let mut max_delta = 0.0f64;
        for (source, target) in self.message_slots() {
            let cavity = &self.cavities[&(source, target)];
            let updated = contract_local(cavity, model, previous, source, beta)?;
            let current = previous.get_or_field(source, target, model.field(source)?, beta);
            max_delta = max_delta
                .max((updated[0] - current[0]).abs())
                .max((updated[1] - current[1]).abs());
            next.set(source, target, updated);
        }
        Ok((next, max_delta))
    }

    /// Sweeps until convergence or the sweep limit.
    pub fn run(
        &self,
        model: &IsingModel,
        options: PropagationOptions,
    ) -> Result<(MessageTable, PropagationDiagnostics), PropagationError> {
        options.validate()?;
        let mut messages = MessageTable::new();
        let mut diagnostics = PropagationDiagnostics {
            max_sweeps: options.max_sweeps,
            sweeps_run: 0,
            converged: true,
            final_max_delta: 0.0,
        };
        if self.cavities.is_empty() {
            return Ok((messages, diagnostics));
        }

        diagnostics.converged = false;
        for sweep in 0..options.max_sweeps {
            let (next, max_delta) = self.sweep(model, &messages, options.beta)?;
            messages = next;
            diagnostics.sweeps_run = sweep + 1;
            diagnostics.final_max_delta = max_delta;
            debug!("sweep {}: max message delta {max_delta:e}", sweep + 1);
            if max_delta < options.tolerance {
                diagnostics.converged = true;
                break;
            }
        }
        Ok((messages, diagnostics))
    }

    /// Approximate marginal of one node: its full neighborhood contracted
    /// with the open index at the node itself.
    pub fn marginal(
        &self,
        model: &IsingModel,
        messages: &MessageTable,
        node: usize,
        beta: f64,
    ) -> Result<[f64; 2], PropagationError> {
        let neighborhood = self
            .neighborhoods
            .get(&node)
            .ok_or(tnmp_core::GraphError::MissingNeighborhood(node))?;
        Ok(contract_local(
            &neighborhood.to_graph(),
            model,
            messages,
            node,
            beta,
        )?)
    }

    /// Approximate marginals of every node.
    pub fn marginals(
        &self,
        model: &IsingModel,
        messages: &MessageTable,
        beta: f64,
    ) -> Result<HashMap<usize, [f64; 2]>, PropagationError> {
        let mut marginals = HashMap::with_capacity(self.neighborhoods.len());
        for node in model.graph().nodes() {
            marginals.insert(node, self.marginal(model, messages, node, beta)?);
        }
        Ok(marginals)
    }
}

/// Convenience entry point: prepare, run to convergence, read out marginals.
pub fn approximate_marginals(
    model: &IsingModel,
    options: PropagationOptions,
) -> Result<(HashMap<usize, [f64; 2]>, PropagationDiagnostics), PropagationError> {
    let propagation = Propagation::prepare(model, options.radius)?;
    let (messages, diagnostics) = propagation.run(model, options)?;
    let marginals = propagation.marginals(model, &messages, options.beta)?;
    Ok((marginals, diagnostics))
}
