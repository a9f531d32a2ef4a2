//! Adjacency-list graph keyed by destination.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{Edge, NodeId, WeightedEdge, WeightedGraph};

/// A graph storing only the edges that exist.
///
/// Nodes and incoming lists are kept in ordered maps so that iteration, and
/// therefore the solver's output on ties, does not depend on hashing.
/// Inserting an edge that already exists replaces its weight.
///
/// # Examples
/// ```
/// use arbor_core::{SparseWeightedGraph, WeightedEdge, WeightedGraph};
///
/// let graph = SparseWeightedGraph::from_edges([
///     WeightedEdge::between('a', 'b', 2.0),
///     WeightedEdge::between('b', 'c', 1.0),
/// ]);
/// assert_eq!(graph.nodes(), vec!['a', 'b', 'c']);
/// assert_eq!(graph.weight_of(&'a', &'b'), 2.0);
/// assert_eq!(graph.weight_of(&'b', &'a'), f64::NEG_INFINITY);
/// ```
#[derive(Clone, Debug)]
pub struct SparseWeightedGraph<V: NodeId> {
    nodes: BTreeSet<V>,
    incoming: BTreeMap<V, Vec<WeightedEdge<V>>>,
    positions: HashMap<Edge<V>, usize>,
}

impl<V: NodeId> SparseWeightedGraph<V> {
    /// Creates a graph containing exactly the endpoints of `edges`.
    #[must_use]
    pub fn from_edges(edges: impl IntoIterator<Item = WeightedEdge<V>>) -> Self {
        Self::with_nodes(std::iter::empty(), edges)
    }

    /// Creates a graph containing `nodes`, which may include isolated nodes,
    /// together with the endpoints of `edges`.
    #[must_use]
    pub fn with_nodes(
        nodes: impl IntoIterator<Item = V>,
        edges: impl IntoIterator<Item = WeightedEdge<V>>,
    ) -> Self {
        let mut graph = Self {
            nodes: nodes.into_iter().collect(),
            incoming: BTreeMap::new(),
            positions: HashMap::new(),
        };
        for edge in edges {
            graph.insert(edge);
        }
        graph
    }

    /// Adds a node without edges. Adding an existing node has no effect.
    pub fn add_node(&mut self, node: V) {
        self.nodes.insert(node);
    }

    /// Adds an edge, replacing the weight of an existing edge with the same
    /// endpoints.
    pub fn insert(&mut self, edge: WeightedEdge<V>) {
        self.nodes.insert(edge.edge().source().clone());
        self.nodes.insert(edge.edge().destination().clone());
        let list = self
            .incoming
            .entry(edge.edge().destination().clone())
            .or_default();
        match self.positions.get(edge.edge()) {
            Some(&position) => list[position] = edge,
            None => {
                self.positions.insert(edge.edge().clone(), list.len());
                list.push(edge);
            }
        }
    }

    /// Iterates every edge, grouped by destination.
    pub fn edges(&self) -> impl Iterator<Item = &WeightedEdge<V>> {
        self.incoming.values().flatten()
    }
}

impl<V: NodeId> WeightedGraph<V> for SparseWeightedGraph<V> {
    fn nodes(&self) -> Vec<V> {
        self.nodes.iter().cloned().collect()
    }

    fn incoming_edges(&self, destination: &V) -> Vec<WeightedEdge<V>> {
        self.incoming.get(destination).cloned().unwrap_or_default()
    }

    fn weight_of(&self, source: &V, destination: &V) -> f64 {
        let edge = Edge::new(source.clone(), destination.clone());
        self.positions
            .get(&edge)
            .and_then(|&position| self.incoming.get(destination)?.get(position))
            .map_or(f64::NEG_INFINITY, WeightedEdge::weight)
    }

    fn edge_count(&self) -> usize {
        self.positions.len()
    }
}
