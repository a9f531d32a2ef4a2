//! Directed weighted graph model consumed by the solver.
//!
//! The solver only needs the nodes of a graph and, for each node, the edges
//! entering it. [`SparseWeightedGraph`] and [`DenseWeightedGraph`] are the two
//! bundled representations; anything implementing [`WeightedGraph`] can be
//! solved.

mod dense;
mod sparse;

use std::fmt;
use std::hash::Hash;

pub use self::dense::DenseWeightedGraph;
pub use self::sparse::SparseWeightedGraph;

/// Bounds required of node identities.
///
/// Nodes are opaque to the solver beyond identity; ordering is only used to
/// keep iteration deterministic.
pub trait NodeId: Clone + Eq + Hash + Ord + fmt::Debug {}

impl<T: Clone + Eq + Hash + Ord + fmt::Debug> NodeId for T {}

/// A directed edge. Two edges are equal when both endpoints match.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Edge<V> {
    source: V,
    destination: V,
}

impl<V> Edge<V> {
    /// Creates the edge `source -> destination`.
    #[must_use]
    pub const fn new(source: V, destination: V) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Returns the tail of the edge.
    #[must_use]
    #[rustfmt::skip]
    pub const fn source(&self) -> &V { &self.source }

    /// Returns the head of the edge.
    #[must_use]
    #[rustfmt::skip]
    pub const fn destination(&self) -> &V { &self.destination }
}

impl<V: PartialEq> Edge<V> {
    /// Returns `true` when the edge starts and ends at the same node.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.destination
    }

    /// Returns `true` when the edge enters `node`.
    #[must_use]
    pub fn has_destination(&self, node: &V) -> bool {
        &self.destination == node
    }

    /// Returns `true` when both edges enter the same node but are not the
    /// same edge, so at most one of them can be part of a branching.
    #[must_use]
    pub fn competes_with(&self, other: &Self) -> bool {
        self.destination == other.destination && self.source != other.source
    }
}

impl<V: fmt::Debug> fmt::Display for Edge<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} -> {:?}", self.source, self.destination)
    }
}

/// An edge paired with its weight. A weight of negative infinity marks the
/// edge as absent.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedEdge<V> {
    edge: Edge<V>,
    weight: f64,
}

impl<V> WeightedEdge<V> {
    /// Creates a weighted edge.
    #[must_use]
    pub const fn new(edge: Edge<V>, weight: f64) -> Self {
        Self { edge, weight }
    }

    /// Shorthand for `WeightedEdge::new(Edge::new(source, destination), weight)`.
    #[must_use]
    pub const fn between(source: V, destination: V, weight: f64) -> Self {
        Self::new(Edge::new(source, destination), weight)
    }

    /// Returns the underlying edge.
    #[must_use]
    #[rustfmt::skip]
    pub const fn edge(&self) -> &Edge<V> { &self.edge }

    /// Returns the edge weight.
    #[must_use]
    #[rustfmt::skip]
    pub const fn weight(&self) -> f64 { self.weight }

    /// Consumes the pair, returning the edge.
    #[must_use]
    pub fn into_edge(self) -> Edge<V> {
        self.edge
    }
}

/// A candidate edge together with the previously chosen edges that choosing
/// it would invalidate.
///
/// The exclusion set is only non-empty for edges entering a contracted cycle:
/// choosing such an edge displaces the cycle edge that used to enter the same
/// node. `weight` is the reduced weight used for ranking, which differs from
/// the original weight once the edge has been lifted through a contraction.
#[derive(Clone, Debug, PartialEq)]
pub struct ExclusiveEdge<V> {
    edge: Edge<V>,
    weight: f64,
    excluded: Vec<Edge<V>>,
}

impl<V> ExclusiveEdge<V> {
    /// Creates an exclusive edge.
    #[must_use]
    pub const fn new(edge: Edge<V>, weight: f64, excluded: Vec<Edge<V>>) -> Self {
        Self {
            edge,
            weight,
            excluded,
        }
    }

    /// Returns the candidate edge.
    #[must_use]
    #[rustfmt::skip]
    pub const fn edge(&self) -> &Edge<V> { &self.edge }

    /// Returns the reduced weight of the edge.
    #[must_use]
    #[rustfmt::skip]
    pub const fn weight(&self) -> f64 { self.weight }

    /// Returns the edges this edge would exclude.
    #[must_use]
    #[rustfmt::skip]
    pub fn excluded(&self) -> &[Edge<V>] { &self.excluded }

    /// Splits the edge into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Edge<V>, f64, Vec<Edge<V>>) {
        (self.edge, self.weight, self.excluded)
    }
}

/// Minimal graph contract required by the solver.
pub trait WeightedGraph<V: NodeId> {
    /// Returns every node of the graph, in a stable order.
    fn nodes(&self) -> Vec<V>;

    /// Returns the edges whose destination is `destination`.
    fn incoming_edges(&self, destination: &V) -> Vec<WeightedEdge<V>>;

    /// Returns the weight of `source -> destination`, or negative infinity
    /// when the edge is absent.
    fn weight_of(&self, source: &V, destination: &V) -> f64;

    /// Returns the number of edges in the graph.
    fn edge_count(&self) -> usize {
        self.nodes()
            .iter()
            .map(|node| self.incoming_edges(node).len())
            .sum()
    }

    /// Returns a copy of the graph keeping every node but only the edges for
    /// which `predicate` holds.
    fn filter_edges<F>(&self, mut predicate: F) -> SparseWeightedGraph<V>
    where
        F: FnMut(&Edge<V>) -> bool,
        Self: Sized,
    {
        let nodes = self.nodes();
        let edges: Vec<WeightedEdge<V>> = nodes
            .iter()
            .flat_map(|node| self.incoming_edges(node))
            .filter(|edge| predicate(edge.edge()))
            .collect();
        SparseWeightedGraph::with_nodes(nodes, edges)
    }
}
