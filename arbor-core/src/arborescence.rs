//! Result types returned by the solver.

use std::collections::BTreeMap;

use crate::graph::{Edge, NodeId};

/// A branching stored as a map from each non-root node to its parent.
///
/// Nodes the solver could not attach to any parent (a root, or a node with
/// no usable incoming edge) are simply absent from the map; callers must not
/// assume every node of the input graph appears as a key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Arborescence<V: NodeId> {
    parents: BTreeMap<V, V>,
}

impl<V: NodeId> Arborescence<V> {
    /// Returns the branching with no edges.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            parents: BTreeMap::new(),
        }
    }

    /// Wraps an explicit child-to-parent map.
    #[must_use]
    pub fn from_parents(parents: BTreeMap<V, V>) -> Self {
        Self { parents }
    }

    /// Returns the child-to-parent map.
    #[must_use]
    #[rustfmt::skip]
    pub fn parents(&self) -> &BTreeMap<V, V> { &self.parents }

    /// Returns the parent of `node`, if it has one.
    #[must_use]
    pub fn parent_of(&self, node: &V) -> Option<&V> {
        self.parents.get(node)
    }

    /// Returns `true` when `edge` is part of the branching.
    #[must_use]
    pub fn contains(&self, edge: &Edge<V>) -> bool {
        self.parents
            .get(edge.destination())
            .is_some_and(|parent| parent == edge.source())
    }

    /// Returns the number of edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.parents.len() }

    /// Returns `true` when the branching has no edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.parents.is_empty() }

    /// Iterates the edges as `parent -> child`, ordered by child.
    pub fn edges(&self) -> impl Iterator<Item = Edge<V>> + '_ {
        self.parents
            .iter()
            .map(|(child, parent)| Edge::new(parent.clone(), child.clone()))
    }

    /// Consumes the branching, returning the child-to-parent map.
    #[must_use]
    pub fn into_parents(self) -> BTreeMap<V, V> {
        self.parents
    }
}

impl<V: NodeId> Default for Arborescence<V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<V: NodeId> FromIterator<Edge<V>> for Arborescence<V> {
    /// Collects `parent -> child` edges. A later edge into the same child
    /// replaces an earlier one.
    fn from_iter<I: IntoIterator<Item = Edge<V>>>(edges: I) -> Self {
        let parents = edges
            .into_iter()
            .map(|edge| (edge.destination().clone(), edge.source().clone()))
            .collect();
        Self { parents }
    }
}

/// A value paired with the total weight that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Weighted<T> {
    /// The wrapped value.
    pub value: T,
    /// Sum of the edge weights making up `value`.
    pub weight: f64,
}

impl<T> Weighted<T> {
    /// Pairs `value` with `weight`.
    #[must_use]
    pub const fn new(value: T, weight: f64) -> Self {
        Self { value, weight }
    }
}
