//! Named undirected graph wrapper over petgraph.
//!
//! Provides a mapping between caller-visible node names and the internal
//! `NodeIndex` space, so spin graphs can use plain integer ids and derived
//! tensor-network graphs can use typed node identifiers, both over the same
//! structure. Only the operations the neighborhood and cavity machinery
//! relies on are exposed: membership, adjacency, edge removal, and
//! BFS-based shortest-path queries.

use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::Undirected;

use crate::error::GraphError;

/// Orders an unordered pair so edges compare independently of orientation.
pub(crate) fn ordered<N: Ord>(a: N, b: N) -> (N, N) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

/// Undirected simple graph with caller-chosen node names.
///
/// Invariants: no self-loops (rejected with [`GraphError::SelfLoop`]) and no
/// multi-edges (insertion is idempotent). All listing methods return sorted
/// output so downstream iteration is deterministic.
pub struct NamedGraph<N>
where
    N: Copy + Eq + Hash + Ord + Debug,
{
    graph: StableGraph<(), (), Undirected>,
    name_to_index: HashMap<N, NodeIndex>,
    index_to_name: HashMap<NodeIndex, N>,
}

/// Spin graphs name their nodes by plain integer ids.
pub type SpinGraph = NamedGraph<usize>;

/// Union of all shortest paths between two nodes.
///
/// `length` counts edges. `nodes` and `edges` cover every shortest path
/// between the endpoints, not a single representative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathUnion<N> {
    pub length: usize,
    pub nodes: Vec<N>,
    pub edges: Vec<(N, N)>,
}

impl<N> NamedGraph<N>
where
    N: Copy + Eq + Hash + Ord + Debug,
{
    pub fn new() -> Self {
        Self {
            graph: StableGraph::default(),
            name_to_index: HashMap::new(),
            index_to_name: HashMap::new(),
        }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: StableGraph::with_capacity(nodes, edges),
            name_to_index: HashMap::with_capacity(nodes),
            index_to_name: HashMap::with_capacity(nodes),
        }
    }

    /// Builds a graph from an edge list, creating endpoints on the fly.
    pub fn from_edges(edges: impl IntoIterator<Item = (N, N)>) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for (a, b) in edges {
            graph.ensure_edge(a, b)?;
        }
        Ok(graph)
    }

    /// Inserts the node if absent; idempotent.
    pub fn ensure_node(&mut self, name: N) -> NodeIndex {
        match self.name_to_index.get(&name) {
            Some(&index) => index,
            None => {
                let index = self.graph.add_node(());
                self.name_to_index.insert(name, index);
                self.index_to_name.insert(index, name);
                index
            }
        }
    }

    /// Inserts the edge (and any missing endpoint) if absent.
    ///
    /// Returns `true` when the edge was actually added, `false` when it was
    /// already present. Self-loops are rejected.
    pub fn ensure_edge(&mut self, a: N, b: N) -> Result<bool, GraphError> {
        if a == b {
            return Err(GraphError::self_loop(&a));
        }
        let ia = self.ensure_node(a);
        let ib = self.ensure_node(b);
        if self.graph.find_edge(ia, ib).is_some() {
            return Ok(false);
        }
        self.graph.add_edge(ia, ib, ());
        Ok(true)
    }

    /// Removes the edge if present; returns whether anything was removed.
    pub fn remove_edge(&mut self, a: N, b: N) -> bool {
        let (Some(&ia), Some(&ib)) = (self.name_to_index.get(&a), self.name_to_index.get(&b))
        else {
            return false;
        };
        match self.graph.find_edge(ia, ib) {
            Some(edge) => self.graph.remove_edge(edge).is_some(),
            None => false,
        }
    }

    pub fn has_node(&self, name: N) -> bool {
        self.name_to_index.contains_key(&name)
    }

    pub fn has_edge(&self, a: N, b: N) -> bool {
        let (Some(&ia), Some(&ib)) = (self.name_to_index.get(&a), self.name_to_index.get(&b))
        else {
            return false;
        };
        self.graph.find_edge(ia, ib).is_some()
    }

    /// Number of incident edges; 0 for unknown nodes.
    pub fn degree(&self, name: N) -> usize {
        match self.name_to_index.get(&name) {
            Some(&index) => self.graph.neighbors(index).count(),
            None => 0,
        }
    }

    /// Adjacent node names in ascending order; empty for unknown nodes.
    pub fn neighbors(&self, name: N) -> Vec<N> {
        let mut adjacent: Vec<N> = match self.name_to_index.get(&name) {
            Some(&index) => self
                .graph
                .neighbors(index)
                .map(|ix| self.index_to_name[&ix])
                .collect(),
            None => Vec::new(),
        };
        adjacent.sort_unstable();
        adjacent
    }

    /// All node names in ascending order.
    pub fn nodes(&self) -> Vec<N> {
        let mut names: Vec<N> = self.name_to_index.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// All edges as ordered pairs `(min, max)`, sorted.
    pub fn edges(&self) -> Vec<(N, N)> {
        let mut pairs: Vec<(N, N)> = self
            .graph
            .edge_indices()
            .filter_map(|edge| {
                let (ia, ib) = self.graph.edge_endpoints(edge)?;
                Some(ordered(self.index_to_name[&ia], self.index_to_name[&ib]))
            })
            .collect();
        pairs.sort_unstable();
        pairs
    }

    pub fn node_count(&self) -> usize {
        self.name_to_index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// BFS distances (edge counts) from `start` to every reachable node.
    pub fn distances_from(&self, start: N) -> Result<HashMap<N, usize>, GraphError> {
        let &start_ix = self
            .name_to_index
            .get(&start)
            .ok_or_else(|| GraphError::unknown_node(&start))?;
        let mut dist: HashMap<NodeIndex, usize> = HashMap::new();
        let mut queue = VecDeque::new();
        dist.insert(start_ix, 0);
        queue.push_back(start_ix);
        while let Some(ix) = queue.pop_front() {
            let d = dist[&ix];
            for nb in self.graph.neighbors(ix) {
                if !dist.contains_key(&nb) {
                    dist.insert(nb, d + 1);
                    queue.push_back(nb);
                }
            }
        }
        Ok(dist
            .into_iter()
            .map(|(ix, d)| (self.index_to_name[&ix], d))
            .collect())
    }

    /// Whether `b` is reachable from `a`; false when either is unknown.
    pub fn has_path(&self, a: N, b: N) -> bool {
        if !self.has_node(a) || !self.has_node(b) {
            return false;
        }
        self.distances_from(a)
            .map(|dist| dist.contains_key(&b))
            .unwrap_or(false)
    }

    /// Union of all shortest paths between `a` and `b`.
    ///
    /// Returns `None` when the endpoints are disconnected. An edge (u, v)
    /// lies on some shortest path exactly when the forward distance to one
    /// endpoint plus one plus the backward distance from the other equals
    /// the total distance, so two BFS passes recover the whole union
    /// without enumerating paths.
    pub fn shortest_path_union(&self, a: N, b: N) -> Result<Option<PathUnion<N>>, GraphError> {
        let from_a = self.distances_from(a)?;
        if !self.has_node(b) {
            return Err(GraphError::unknown_node(&b));
        }
        let Some(&total) = from_a.get(&b) else {
            return Ok(None);
        };
        let from_b = self.distances_from(b)?;

        let mut nodes: Vec<N> = from_a
            .iter()
            .filter(|&(node, &da)| from_b.get(node).is_some_and(|&db| da + db == total))
            .map(|(&node, _)| node)
            .collect();
        nodes.sort_unstable();

        let mut edges = Vec::new();
        for (u, v) in self.edges() {
            let (Some(&ua), Some(&va)) = (from_a.get(&u), from_a.get(&v)) else {
                continue;
            };
            let (Some(&ub), Some(&vb)) = (from_b.get(&u), from_b.get(&v)) else {
                continue;
            };
            if ua + 1 + vb == total || va + 1 + ub == total {
                edges.push((u, v));
            }
        }
        Ok(Some(PathUnion {
            length: total,
            nodes,
            edges,
        }))
    }
}

impl<N> Default for NamedGraph<N>
where
    N: Copy + Eq + Hash + Ord + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Clone for NamedGraph<N>
where
    N: Copy + Eq + Hash + Ord + Debug,
{
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            name_to_index: self.name_to_index.clone(),
            index_to_name: self.index_to_name.clone(),
        }
    }
}

impl<N> Debug for NamedGraph<N>
where
    N: Copy + Eq + Hash + Ord + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedGraph")
            .field("nodes", &self.nodes())
            .field("edges", &self.edges())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> SpinGraph {
        SpinGraph::from_edges([(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap()
    }

    #[test]
    fn insertion_is_idempotent() {
        let mut g = SpinGraph::new();
        assert!(g.ensure_edge(0, 1).unwrap());
        assert!(!g.ensure_edge(1, 0).unwrap());
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(g.has_edge(1, 0));
    }

    #[test]
    fn self_loops_are_rejected() {
        let mut g = SpinGraph::new();
        assert!(matches!(g.ensure_edge(3, 3), Err(GraphError::SelfLoop(_))));
    }

    #[test]
    fn neighbors_are_sorted() {
        let g = SpinGraph::from_edges([(5, 2), (5, 9), (5, 0)]).unwrap();
        assert_eq!(g.neighbors(5), vec![0, 2, 9]);
        assert_eq!(g.degree(5), 3);
        assert!(g.neighbors(42).is_empty());
    }

    #[test]
    fn edge_removal() {
        let mut g = square();
        assert!(g.remove_edge(1, 0));
        assert!(!g.remove_edge(0, 1));
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.edges(), vec![(0, 3), (1, 2), (2, 3)]);
    }

    #[test]
    fn bfs_distances() {
        let g = square();
        let dist = g.distances_from(0).unwrap();
        assert_eq!(dist[&0], 0);
        assert_eq!(dist[&1], 1);
        assert_eq!(dist[&3], 1);
        assert_eq!(dist[&2], 2);
    }

    #[test]
    fn path_union_covers_both_sides_of_a_cycle() {
        let g = square();
        let union = g.shortest_path_union(0, 2).unwrap().unwrap();
        assert_eq!(union.length, 2);
        assert_eq!(union.nodes, vec![0, 1, 2, 3]);
        assert_eq!(union.edges.len(), 4);
    }

    #[test]
    fn disconnected_components() {
        let g = SpinGraph::from_edges([(0, 1), (2, 3)]).unwrap();
        assert!(!g.has_path(0, 3));
        assert!(g.shortest_path_union(0, 3).unwrap().is_none());
    }

    #[test]
    fn unknown_endpoint_is_an_error() {
        let g = square();
        assert!(matches!(
            g.shortest_path_union(0, 7),
            Err(GraphError::UnknownNode(_))
        ));
        assert!(matches!(
            g.distances_from(7),
            Err(GraphError::UnknownNode(_))
        ));
    }
}
