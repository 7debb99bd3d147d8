//! Local tensor-network message passing for sparse Ising models.
//!
//! Computes approximate single-spin marginals by contracting, per node, the
//! tensor network of a finite-radius neighborhood whose boundary is
//! provably separated in the complement graph. Messages between overlapping
//! neighborhoods are exchanged along cavity subgraphs until they stop
//! moving.
//!
//! The graph-level machinery (neighborhood growth, cavity extraction, the
//! descriptive tensor-network mapping) lives in `tnmp-core` and is
//! re-exported here; this crate adds the numeric side: the message table,
//! the local contraction engine, and the synchronous sweep driver.
//!
//! ```
//! use tnmp::{approximate_marginals, IsingModel, PropagationOptions, SpinGraph};
//!
//! let graph = SpinGraph::from_edges([(0, 1), (1, 2)])?;
//! let model = IsingModel::uniform(graph, 1.0, 0.0)?;
//! let (marginals, diagnostics) =
//!     approximate_marginals(&model, PropagationOptions::default())?;
//! assert!(diagnostics.converged);
//! assert!((marginals[&1][0] - 0.5).abs() < 1e-9);
//! # Ok::<(), tnmp::PropagationError>(())
//! ```

pub mod contraction;
mod einsum;
pub mod error;
pub mod messages;
pub mod propagation;

pub use contraction::contract_local;
pub use error::{ContractionError, PropagationError};
pub use messages::{field_distribution, MessageTable};
pub use propagation::{
    approximate_marginals, Propagation, PropagationDiagnostics, PropagationOptions,
};

pub use tnmp_core::{
    boundary_nodes, build_neighborhood, build_neighborhood_traced, cavity_edges, cavity_subgraph,
    map_tensor_network, GraphError, IsingModel, NamedGraph, Neighborhood, SpinGraph,
    TensorNetworkMap, TnGraph, TnNode,
};
