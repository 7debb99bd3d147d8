//! Graph-level subsystem for local tensor-network message passing on
//! sparse Ising-type spin models.
//!
//! Provides the four graph operations the numeric engine builds on:
//! - [`build_neighborhood`]: grow a subgraph around a node whose boundary
//!   nodes are provably more than R apart in the complement graph;
//! - [`cavity_edges`] / [`cavity_subgraph`]: the directional edge-set
//!   difference of two neighborhoods;
//! - [`map_tensor_network`]: the descriptive factor-network form of a
//!   neighborhood, with typed node identities;
//! - [`IsingModel`]: the immutable graph + couplings + fields container.

pub mod cavity;
pub mod error;
pub mod graph;
pub mod model;
pub mod neighborhood;
pub mod network_map;

pub use cavity::{cavity_edges, cavity_subgraph};
pub use error::GraphError;
pub use graph::{NamedGraph, PathUnion, SpinGraph};
pub use model::IsingModel;
pub use neighborhood::{
    boundary_nodes, build_neighborhood, build_neighborhood_traced, GrowthRound, GrowthTurn,
    Neighborhood,
};
pub use network_map::{map_tensor_network, TensorNetworkMap, TnGraph, TnNode};
