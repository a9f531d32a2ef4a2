//! Maximum branching solver (Chu-Liu-Edmonds, in Tarjan's formulation).
//!
//! The driver keeps a work queue of components that have no chosen incoming
//! edge. Each step gives one such component its best remaining candidate;
//! whenever that closes a cycle the cycle is contracted and the contracted
//! component rejoins the queue. Once the queue drains, the optimum branching
//! is read off the history of choices, newest first.

mod builder;
mod partial;

use std::collections::{BTreeSet, HashMap, VecDeque};

use tracing::{Span, field, instrument};

pub use self::builder::SolverBuilder;
use self::partial::PartialSolution;
use crate::{
    Result,
    arborescence::{Arborescence, Weighted},
    edge_queue::Candidate,
    error::{ArborError, render},
    graph::{Edge, NodeId, SparseWeightedGraph, WeightedGraph},
};

/// Finds maximum branchings of weighted directed graphs.
///
/// Without a root the result is the heaviest branching with the fewest
/// roots, which is a maximum spanning arborescence over every choice of
/// root whenever one exists. Nodes that cannot be reached are left without a
/// parent rather than reported as an error.
///
/// # Examples
/// ```
/// use arbor_core::{SolverBuilder, SparseWeightedGraph, WeightedEdge};
///
/// let graph = SparseWeightedGraph::from_edges([
///     WeightedEdge::between(0, 1, 10.0),
///     WeightedEdge::between(0, 2, 30.0),
///     WeightedEdge::between(0, 3, 10.0),
///     WeightedEdge::between(1, 2, 10.0),
///     WeightedEdge::between(1, 4, 10.0),
///     WeightedEdge::between(2, 1, 20.0),
///     WeightedEdge::between(2, 3, 7.0),
///     WeightedEdge::between(2, 4, 20.0),
///     WeightedEdge::between(3, 2, 40.0),
/// ]);
/// let solver = SolverBuilder::new().with_root(0).build()?;
/// let best = solver.solve(&graph)?;
/// assert_eq!(best.value.parent_of(&2), Some(&3));
/// assert!((best.weight - 90.0).abs() < 1e-9);
/// # Ok::<(), arbor_core::ArborError>(())
/// ```
#[derive(Clone, Debug)]
pub struct ArborescenceSolver<V: NodeId> {
    root: Option<V>,
    required: BTreeSet<Edge<V>>,
    required_into: HashMap<V, Edge<V>>,
    banned: BTreeSet<Edge<V>>,
    preferred: Arborescence<V>,
    tie_tolerance: f64,
}

impl<V: NodeId> ArborescenceSolver<V> {
    pub(crate) fn new(
        root: Option<V>,
        required: BTreeSet<Edge<V>>,
        banned: BTreeSet<Edge<V>>,
        preferred: Arborescence<V>,
        tie_tolerance: f64,
    ) -> Self {
        let required_into = required
            .iter()
            .map(|edge| (edge.destination().clone(), edge.clone()))
            .collect();
        Self {
            root,
            required,
            required_into,
            banned,
            preferred,
            tie_tolerance,
        }
    }

    /// Returns the node the result is forced to be rooted at, if any.
    #[must_use]
    pub fn root(&self) -> Option<&V> {
        self.root.as_ref()
    }

    /// Returns the edges every result must contain.
    #[must_use]
    pub fn required_edges(&self) -> &BTreeSet<Edge<V>> {
        &self.required
    }

    /// Returns the edges no result may contain.
    #[must_use]
    pub fn banned_edges(&self) -> &BTreeSet<Edge<V>> {
        &self.banned
    }

    /// Returns the tie-break hint.
    #[must_use]
    pub fn preferred_tree(&self) -> &Arborescence<V> {
        &self.preferred
    }

    /// Returns the tie tolerance.
    #[must_use]
    pub fn tie_tolerance(&self) -> f64 {
        self.tie_tolerance
    }

    /// Computes the maximum branching of `graph` under this configuration.
    ///
    /// Self-loops and edges weighted negative infinity are ignored. The
    /// returned weight is the sum of the original weights of the returned
    /// edges.
    ///
    /// # Errors
    /// Returns [`ArborError::NonFiniteWeight`] when an edge weight is NaN or
    /// positive infinity, and [`ArborError::Heap`] if the priority queues run
    /// out of capacity.
    #[instrument(
        name = "arbor.solve",
        err,
        skip_all,
        fields(
            nodes = field::Empty,
            edges = field::Empty,
            contractions = field::Empty,
            score = field::Empty,
        ),
    )]
    pub fn solve<G: WeightedGraph<V>>(&self, graph: &G) -> Result<Weighted<Arborescence<V>>> {
        validate_weights(graph)?;
        let admitted = graph.filter_edges(|edge| self.admits(edge));
        let span = Span::current();
        span.record("nodes", admitted.nodes().len());
        span.record("edges", admitted.edge_count());

        let (best, contractions) = run(&admitted, &self.preferred, self.tie_tolerance)?;
        span.record("contractions", contractions);
        span.record("score", best.weight);
        Ok(best)
    }

    fn admits(&self, edge: &Edge<V>) -> bool {
        !edge.is_self_loop()
            && !self.root.as_ref().is_some_and(|root| edge.has_destination(root))
            && !self.banned.contains(edge)
            && !self
                .required_into
                .get(edge.destination())
                .is_some_and(|required| edge.competes_with(required))
    }
}

/// Finds the maximum branching of `graph`, choosing the root freely.
///
/// # Errors
/// See [`ArborescenceSolver::solve`].
pub fn max_arborescence<V, G>(graph: &G) -> Result<Weighted<Arborescence<V>>>
where
    V: NodeId,
    G: WeightedGraph<V>,
{
    SolverBuilder::new().build()?.solve(graph)
}

/// Finds the maximum branching of `graph` rooted at `root`.
///
/// # Errors
/// See [`ArborescenceSolver::solve`].
pub fn max_arborescence_rooted<V, G>(graph: &G, root: V) -> Result<Weighted<Arborescence<V>>>
where
    V: NodeId,
    G: WeightedGraph<V>,
{
    SolverBuilder::new().with_root(root).build()?.solve(graph)
}

/// Finds the maximum branching of `graph` containing every edge of
/// `required` and none of `banned`.
///
/// # Errors
/// Returns the validation errors of [`SolverBuilder::build`] as well as
/// those of [`ArborescenceSolver::solve`].
pub fn max_arborescence_constrained<V, G>(
    graph: &G,
    required: impl IntoIterator<Item = Edge<V>>,
    banned: impl IntoIterator<Item = Edge<V>>,
) -> Result<Weighted<Arborescence<V>>>
where
    V: NodeId,
    G: WeightedGraph<V>,
{
    SolverBuilder::new()
        .with_required_edges(required)
        .with_banned_edges(banned)
        .build()?
        .solve(graph)
}

fn validate_weights<V: NodeId, G: WeightedGraph<V>>(graph: &G) -> Result<()> {
    for node in graph.nodes() {
        for edge in graph.incoming_edges(&node) {
            let weight = edge.weight();
            if weight.is_nan() || weight == f64::INFINITY {
                return Err(ArborError::NonFiniteWeight {
                    source_node: render(edge.edge().source()),
                    destination: render(edge.edge().destination()),
                    weight,
                });
            }
        }
    }
    Ok(())
}

/// Runs the driver loop and returns the branching with the number of
/// contractions it took.
fn run<V: NodeId>(
    graph: &SparseWeightedGraph<V>,
    preferred: &Arborescence<V>,
    tie_tolerance: f64,
) -> Result<(Weighted<Arborescence<V>>, usize)> {
    let mut partial = PartialSolution::initialize(graph, tie_tolerance)?;
    drive(&mut partial, preferred)?;
    let contractions = partial.contractions();
    Ok((partial.recover_best_arborescence(), contractions))
}

/// Settles every component without an incoming edge, contracting cycles as
/// they close.
fn drive<V: NodeId>(partial: &mut PartialSolution<V>, preferred: &Arborescence<V>) -> Result<()> {
    // Every component starts without an incoming edge.
    let mut without_incoming: VecDeque<V> = partial.nodes().iter().cloned().collect();
    while let Some(component) = without_incoming.pop_front() {
        match partial.pop_best_edge(&component, preferred)? {
            None => {}
            Some(Candidate::Root {
                node,
                weight,
                excluded,
            }) => partial.add_root(&node, weight, excluded),
            Some(Candidate::Edge(edge)) => {
                if let Some(contracted) = partial.add_edge(edge)? {
                    without_incoming.push_back(contracted);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod property;
