//! Builder for configuring [`ArborescenceSolver`] instances.
//!
//! Collects the root, edge constraints and tie-break hint, and validates them
//! together before a solver is constructed.

use std::collections::{BTreeSet, HashMap};

use super::ArborescenceSolver;
use crate::{
    Result,
    arborescence::Arborescence,
    error::{ArborError, render},
    graph::{Edge, NodeId},
};

/// Configures and constructs [`ArborescenceSolver`] instances.
///
/// # Examples
/// ```
/// use arbor_core::{Edge, SolverBuilder};
///
/// let solver = SolverBuilder::new()
///     .with_root(0_u32)
///     .with_required_edges([Edge::new(0, 2)])
///     .with_banned_edges([Edge::new(2, 1)])
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(solver.root(), Some(&0));
/// assert_eq!(solver.required_edges().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct SolverBuilder<V: NodeId> {
    root: Option<V>,
    required: BTreeSet<Edge<V>>,
    banned: BTreeSet<Edge<V>>,
    preferred: Arborescence<V>,
    tie_tolerance: f64,
}

impl<V: NodeId> Default for SolverBuilder<V> {
    fn default() -> Self {
        Self {
            root: None,
            required: BTreeSet::new(),
            banned: BTreeSet::new(),
            preferred: Arborescence::empty(),
            tie_tolerance: 0.0,
        }
    }
}

impl<V: NodeId> SolverBuilder<V> {
    /// Creates a builder with no root, no constraints and exact tie-breaking.
    ///
    /// # Examples
    /// ```
    /// use arbor_core::SolverBuilder;
    ///
    /// let builder = SolverBuilder::<u32>::new();
    /// assert_eq!(builder.root(), None);
    /// assert_eq!(builder.tie_tolerance(), 0.0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces the branching to be rooted at `root` by ignoring every edge
    /// entering it.
    #[must_use]
    pub fn with_root(mut self, root: V) -> Self {
        self.root = Some(root);
        self
    }

    /// Returns the configured root, if any.
    #[must_use]
    pub fn root(&self) -> Option<&V> {
        self.root.as_ref()
    }

    /// Adds edges that must be part of the result.
    ///
    /// Requiring `u -> v` removes every other edge entering `v`. A required
    /// edge absent from the graph therefore leaves `v` without a parent.
    #[must_use]
    pub fn with_required_edges(mut self, edges: impl IntoIterator<Item = Edge<V>>) -> Self {
        self.required.extend(edges);
        self
    }

    /// Adds edges that must not be part of the result.
    #[must_use]
    pub fn with_banned_edges(mut self, edges: impl IntoIterator<Item = Edge<V>>) -> Self {
        self.banned.extend(edges);
        self
    }

    /// Sets a branching whose edges win ties between equally good
    /// candidates.
    ///
    /// # Examples
    /// ```
    /// use arbor_core::{Arborescence, Edge, SolverBuilder};
    ///
    /// let hint: Arborescence<u8> = [Edge::new(0, 1)].into_iter().collect();
    /// let builder = SolverBuilder::new().with_preferred_tree(hint.clone());
    /// assert_eq!(builder.preferred_tree(), &hint);
    /// ```
    #[must_use]
    pub fn with_preferred_tree(mut self, preferred: Arborescence<V>) -> Self {
        self.preferred = preferred;
        self
    }

    /// Returns the tie-break hint.
    #[must_use]
    pub fn preferred_tree(&self) -> &Arborescence<V> {
        &self.preferred
    }

    /// Sets how far apart two reduced weights may be and still count as a
    /// tie. Only consulted when a preferred tree is configured.
    #[must_use]
    pub fn with_tie_tolerance(mut self, tolerance: f64) -> Self {
        self.tie_tolerance = tolerance;
        self
    }

    /// Returns the configured tie tolerance.
    #[must_use]
    pub fn tie_tolerance(&self) -> f64 {
        self.tie_tolerance
    }

    /// Validates the configuration and constructs an [`ArborescenceSolver`].
    ///
    /// # Errors
    /// Returns [`ArborError::InvalidTieTolerance`] for a negative or
    /// non-finite tolerance, [`ArborError::RequiredSelfLoop`],
    /// [`ArborError::RequiredAndBanned`] and
    /// [`ArborError::RequiredEdgeIntoRoot`] for unsatisfiable required edges,
    /// and [`ArborError::ConflictingRequiredEdges`] when two required edges
    /// enter the same node.
    ///
    /// # Examples
    /// ```
    /// use arbor_core::{ArborErrorCode, Edge, SolverBuilder};
    ///
    /// let err = SolverBuilder::new()
    ///     .with_required_edges([Edge::new(1, 3), Edge::new(2, 3)])
    ///     .build()
    ///     .expect_err("two parents for node 3");
    /// assert_eq!(err.code(), ArborErrorCode::ConflictingRequiredEdges);
    /// ```
    pub fn build(self) -> Result<ArborescenceSolver<V>> {
        if !self.tie_tolerance.is_finite() || self.tie_tolerance < 0.0 {
            return Err(ArborError::InvalidTieTolerance {
                got: self.tie_tolerance,
            });
        }

        let mut required_by_destination: HashMap<&V, &Edge<V>> = HashMap::new();
        for edge in &self.required {
            if edge.is_self_loop() {
                return Err(ArborError::RequiredSelfLoop { edge: render(edge) });
            }
            if self.banned.contains(edge) {
                return Err(ArborError::RequiredAndBanned { edge: render(edge) });
            }
            if self.root.as_ref().is_some_and(|root| edge.has_destination(root)) {
                return Err(ArborError::RequiredEdgeIntoRoot { edge: render(edge) });
            }
            if let Some(first) = required_by_destination.insert(edge.destination(), edge) {
                return Err(ArborError::ConflictingRequiredEdges {
                    destination: render(edge.destination()),
                    first: render(first),
                    second: render(edge),
                });
            }
        }

        Ok(ArborescenceSolver::new(
            self.root,
            self.required,
            self.banned,
            self.preferred,
            self.tie_tolerance,
        ))
    }
}
