//! Union-find (disjoint set union) over arbitrary node identities.
//!
//! The solver keeps two independent partitions per solve: one tracking the
//! strongly connected components contracted so far and one tracking the
//! weakly connected components of the chosen edges. Components only ever
//! grow; there is no split operation.

use std::collections::HashMap;
use std::hash::Hash;

/// A dynamic equivalence relation over a fixed set of nodes.
///
/// Uses union by size with path compression. Nodes are interned once at
/// construction so the forest itself is stored as dense index vectors.
///
/// # Examples
/// ```
/// use arbor_core::Partition;
///
/// let mut partition = Partition::singletons(["a", "b", "c"]);
/// assert!(!partition.same_component(&"a", &"b"));
/// partition.merge(&"a", &"b");
/// assert!(partition.same_component(&"b", &"a"));
/// assert_eq!(partition.component_count(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Partition<V> {
    nodes: Vec<V>,
    index: HashMap<V, usize>,
    parent: Vec<usize>,
    size: Vec<usize>,
    components: usize,
}

impl<V: Clone + Eq + Hash> Partition<V> {
    /// Creates one singleton component per distinct node.
    #[must_use]
    pub fn singletons(nodes: impl IntoIterator<Item = V>) -> Self {
        let mut interned = Vec::new();
        let mut index = HashMap::new();
        for node in nodes {
            if index.contains_key(&node) {
                continue;
            }
            index.insert(node.clone(), interned.len());
            interned.push(node);
        }
        let count = interned.len();
        Self {
            nodes: interned,
            index,
            parent: (0..count).collect(),
            size: vec![1; count],
            components: count,
        }
    }

    /// Returns every node tracked by the partition, in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[V] {
        &self.nodes
    }

    /// Returns the number of distinct components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components
    }

    /// Returns `true` when `node` is tracked by this partition.
    #[must_use]
    pub fn contains(&self, node: &V) -> bool {
        self.index.contains_key(node)
    }

    /// Returns the representative of the component containing `node`, or
    /// `None` when the node is unknown.
    pub fn component_of(&mut self, node: &V) -> Option<V> {
        let slot = *self.index.get(node)?;
        let root = self.find(slot);
        self.nodes.get(root).cloned()
    }

    /// Returns `true` when both nodes share a component.
    ///
    /// Every node shares a component with itself, tracked or not; an
    /// untracked node shares one with nothing else.
    pub fn same_component(&mut self, left: &V, right: &V) -> bool {
        let (Some(&left_slot), Some(&right_slot)) = (self.index.get(left), self.index.get(right))
        else {
            return left == right;
        };
        self.find(left_slot) == self.find(right_slot)
    }

    /// Unions the components containing `left` and `right` and returns the
    /// representative of the merged component.
    ///
    /// Returns `None` when either node is unknown.
    pub fn merge(&mut self, left: &V, right: &V) -> Option<V> {
        let left = *self.index.get(left)?;
        let right = *self.index.get(right)?;
        let root = self.union(left, right);
        self.nodes.get(root).cloned()
    }

    fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    fn union(&mut self, left: usize, right: usize) -> usize {
        let mut left = self.find(left);
        let mut right = self.find(right);
        if left == right {
            return left;
        }
        if self.size[left] < self.size[right] {
            std::mem::swap(&mut left, &mut right);
        }
        self.parent[right] = left;
        self.size[left] = self.size[left].saturating_add(self.size[right]);
        self.components = self.components.saturating_sub(1);
        left
    }
}
