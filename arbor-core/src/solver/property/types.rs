//! Type definitions for solver property-based tests.
//!
//! Provides the fixture, configuration, and weight distribution types used
//! by the graph generation strategies and property functions.

use crate::graph::{Edge, SparseWeightedGraph, WeightedEdge};

/// Weight distribution strategy for generated graphs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum WeightDistribution {
    /// Continuous positive weights, so ties are vanishingly rare.
    Continuous,
    /// Small integer weights drawn from a pool of two or three values,
    /// stressing tie-breaking inside contracted cycles.
    ManyIdentical,
    /// Integer weights of both signs, so the best branching may still use
    /// edges that lose weight.
    Mixed,
    /// Every ordered pair connected, producing deeply nested contractions.
    Dense,
    /// Several groups of nodes with no edges between them.
    Disconnected,
}

/// Fixture for solver property tests.
///
/// Captures the generated graph together with the solver configuration and
/// the weight distribution, providing full context for failure diagnosis.
#[derive(Clone, Debug)]
pub(super) struct ArborFixture {
    /// Number of nodes; nodes are `0..node_count`.
    pub node_count: u32,
    /// Generated edges as `(source, destination, weight)`.
    pub edges: Vec<(u32, u32, f64)>,
    /// Node the result is forced to be rooted at.
    pub root: Option<u32>,
    /// Edges that must be used when possible.
    pub required: Vec<Edge<u32>>,
    /// Edges that must not be used.
    pub banned: Vec<Edge<u32>>,
    /// Weight distribution used during generation.
    pub distribution: WeightDistribution,
}

impl ArborFixture {
    /// Builds the graph, keeping isolated nodes.
    pub(super) fn graph(&self) -> SparseWeightedGraph<u32> {
        SparseWeightedGraph::with_nodes(
            0..self.node_count,
            self.edges
                .iter()
                .map(|&(source, destination, weight)| {
                    WeightedEdge::between(source, destination, weight)
                }),
        )
    }

    /// Returns `true` when the solver should consider `edge` at all.
    pub(super) fn admits(&self, source: u32, destination: u32) -> bool {
        let edge = Edge::new(source, destination);
        source != destination
            && self.root != Some(destination)
            && !self.banned.contains(&edge)
            && !self
                .required
                .iter()
                .any(|required| edge.competes_with(required))
    }

    /// Summarises the fixture for failure messages.
    pub(super) fn describe(&self) -> String {
        format!(
            "distribution={:?}, nodes={}, edges={}, root={:?}, required={}, banned={}",
            self.distribution,
            self.node_count,
            self.edges.len(),
            self.root,
            self.required.len(),
            self.banned.len(),
        )
    }
}

/// Configuration for the determinism property.
pub(super) struct DeterminismConfig {
    /// Number of times to repeat the solve per input.
    pub repetitions: usize,
}

impl DeterminismConfig {
    /// Loads the configuration from the environment.
    ///
    /// `ARBOR_PBT_DETERMINISM_REPS` controls the repetition count (default:
    /// 3).
    pub(super) fn load() -> Self {
        let repetitions = std::env::var("ARBOR_PBT_DETERMINISM_REPS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3);
        Self { repetitions }
    }
}
