//! Tensor-Network Mapper: graph-level description of the factor network a
//! local contraction evaluates.
//!
//! The mapping is descriptive; it feeds layout and inspection tooling. The
//! numeric engine performs the equivalent mapping implicitly. Node identity
//! uses a tagged sum type keyed in a named graph, so the four node
//! categories can never collide and no arithmetic id-offset invariant is
//! involved.

use crate::error::GraphError;
use crate::graph::{NamedGraph, SpinGraph};
use crate::neighborhood::boundary_nodes;

/// Typed identity of a tensor-network node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TnNode {
    /// A spin of the underlying spin graph: a shared contraction index.
    Spin(usize),
    /// Pairwise Boltzmann factor on an edge, keyed by the normalized pair.
    Coupling(usize, usize),
    /// Single-site vector attached to a spin: a field factor for internal
    /// and environment spins, a message placeholder for boundary spins.
    Site(usize),
    /// Pendant marking the one index left uncontracted.
    OpenLeg,
}

/// Tensor-network graphs name their nodes by [`TnNode`].
pub type TnGraph = NamedGraph<TnNode>;

/// A mapped tensor network plus the node classification groups that layout
/// and styling code keys on.
#[derive(Debug, Clone)]
pub struct TensorNetworkMap {
    pub graph: TnGraph,
    /// Coupling factors for every edge of the focus graph.
    pub focus_couplings: Vec<TnNode>,
    /// The subset of `focus_couplings` whose edge lies in the sub graph.
    pub neighborhood_couplings: Vec<TnNode>,
    /// Sub-graph spins with an incident full-graph edge outside the sub
    /// graph; their value arrives as a message rather than a local field.
    pub boundary_spins: Vec<usize>,
    /// Sub-graph spins that are not boundary spins.
    pub internal_spins: Vec<usize>,
    /// Focus-graph spins outside the sub graph.
    pub environment_spins: Vec<usize>,
    /// Message placeholders, one per non-center boundary spin.
    pub message_sites: Vec<TnNode>,
    /// Field factors for internal spins (always including the center).
    pub field_sites: Vec<TnNode>,
    /// Field factors standing in for the environment spins, whose cavity
    /// message substitutes for a genuine field in this local view.
    pub environment_sites: Vec<TnNode>,
    /// The open-leg pendant, when requested.
    pub open_leg: Option<TnNode>,
}

/// Maps `sub` (and the adjacent part of the environment covered by `focus`)
/// to its tensor network in graph form.
///
/// Every focus edge must be an edge of the full graph; a mismatch is a
/// structural inconsistency. The center spin always receives a field site,
/// even when it is structurally a boundary node of `sub`; its single-site
/// factor is always evaluated locally. With `open_leg` set, one pendant
/// node attached to the center marks the index left free, which is what
/// turns the contraction result into a vector instead of a scalar.
pub fn map_tensor_network(
    sub: &SpinGraph,
    focus: &SpinGraph,
    full: &SpinGraph,
    center: usize,
    open_leg: bool,
) -> Result<TensorNetworkMap, GraphError> {
    if !full.has_node(center) {
        return Err(GraphError::unknown_node(&center));
    }

    let mut graph = TnGraph::new();
    let mut focus_couplings = Vec::new();
    let mut neighborhood_couplings = Vec::new();
    for (u, v) in focus.edges() {
        if !full.has_edge(u, v) {
            return Err(GraphError::unknown_edge(&u, &v));
        }
        let factor = TnNode::Coupling(u, v);
        graph.ensure_edge(factor, TnNode::Spin(u))?;
        graph.ensure_edge(factor, TnNode::Spin(v))?;
        focus_couplings.push(factor);
        if sub.has_edge(u, v) {
            neighborhood_couplings.push(factor);
        }
    }

    let boundary_spins = boundary_nodes(sub, full);
    let internal_spins: Vec<usize> = sub
        .nodes()
        .into_iter()
        .filter(|node| !boundary_spins.contains(node))
        .collect();
    let environment_spins: Vec<usize> = focus
        .nodes()
        .into_iter()
        .filter(|&node| !sub.has_node(node))
        .collect();

    let mut message_sites = Vec::new();
    for &spin in &boundary_spins {
        if spin == center {
            continue;
        }
        let site = TnNode::Site(spin);
        graph.ensure_edge(site, TnNode::Spin(spin))?;
        message_sites.push(site);
    }

    let mut field_sites = Vec::new();
    for &spin in &internal_spins {
        let site = TnNode::Site(spin);
        graph.ensure_edge(site, TnNode::Spin(spin))?;
        field_sites.push(site);
    }
    if !internal_spins.contains(&center) {
        let site = TnNode::Site(center);
        graph.ensure_edge(site, TnNode::Spin(center))?;
        field_sites.push(site);
    }

    let mut environment_sites = Vec::new();
    for &spin in &environment_spins {
        let site = TnNode::Site(spin);
        graph.ensure_edge(site, TnNode::Spin(spin))?;
        environment_sites.push(site);
    }

    let open_leg = if open_leg {
        graph.ensure_edge(TnNode::OpenLeg, TnNode::Spin(center))?;
        Some(TnNode::OpenLeg)
    } else {
        None
    };

    Ok(TensorNetworkMap {
        graph,
        focus_couplings,
        neighborhood_couplings,
        boundary_spins,
        internal_spins,
        environment_spins,
        message_sites,
        field_sites,
        environment_sites,
        open_leg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighborhood::build_neighborhood;

    /// 6-cycle, neighborhood of node 0 at radius 0 (its star), focus one
    /// ring of couplings further out.
    fn fixture() -> (SpinGraph, SpinGraph, SpinGraph) {
        let full = SpinGraph::from_edges((0..6).map(|i| (i, (i + 1) % 6))).unwrap();
        let sub = build_neighborhood(&full, 0, 0).unwrap().to_graph();
        let focus =
            SpinGraph::from_edges([(5, 0), (0, 1), (1, 2), (4, 5)]).unwrap();
        (full, sub, focus)
    }

    #[test]
    fn couplings_cover_the_focus() {
        let (full, sub, focus) = fixture();
        let map = map_tensor_network(&sub, &focus, &full, 0, false).unwrap();
        assert_eq!(map.focus_couplings.len(), 4);
        assert_eq!(
            map.neighborhood_couplings,
            vec![TnNode::Coupling(0, 1), TnNode::Coupling(0, 5)]
        );
    }

    #[test]
    fn spins_are_classified() {
        let (full, sub, focus) = fixture();
        let map = map_tensor_network(&sub, &focus, &full, 0, false).unwrap();
        assert_eq!(map.boundary_spins, vec![1, 5]);
        assert_eq!(map.internal_spins, vec![0]);
        assert_eq!(map.environment_spins, vec![2, 4]);
        assert_eq!(
            map.message_sites,
            vec![TnNode::Site(1), TnNode::Site(5)]
        );
        assert_eq!(map.field_sites, vec![TnNode::Site(0)]);
        assert_eq!(
            map.environment_sites,
            vec![TnNode::Site(2), TnNode::Site(4)]
        );
    }

    #[test]
    fn center_gets_a_field_site_even_on_the_boundary() {
        let full = SpinGraph::from_edges([(0, 1), (1, 2)]).unwrap();
        // Sub covers only the (0, 1) edge, so node 1 is a boundary spin.
        let sub = SpinGraph::from_edges([(0, 1)]).unwrap();
        let map = map_tensor_network(&sub, &sub, &full, 1, false).unwrap();
        assert_eq!(map.boundary_spins, vec![1]);
        assert!(map.message_sites.is_empty());
        assert_eq!(map.field_sites, vec![TnNode::Site(0), TnNode::Site(1)]);
    }

    #[test]
    fn open_leg_is_a_pendant_on_the_center() {
        let (full, sub, focus) = fixture();
        let closed = map_tensor_network(&sub, &focus, &full, 0, false).unwrap();
        assert!(closed.open_leg.is_none());
        assert!(!closed.graph.has_node(TnNode::OpenLeg));

        let open = map_tensor_network(&sub, &focus, &full, 0, true).unwrap();
        assert_eq!(open.open_leg, Some(TnNode::OpenLeg));
        assert!(open.graph.has_edge(TnNode::OpenLeg, TnNode::Spin(0)));
        assert_eq!(open.graph.degree(TnNode::OpenLeg), 1);
    }

    #[test]
    fn focus_edge_outside_the_graph_is_inconsistent() {
        let (full, sub, _) = fixture();
        let focus = SpinGraph::from_edges([(0, 3)]).unwrap();
        assert!(matches!(
            map_tensor_network(&sub, &focus, &full, 0, false),
            Err(GraphError::UnknownEdge(_, _))
        ));
    }
}
