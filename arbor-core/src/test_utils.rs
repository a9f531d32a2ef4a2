//! Shared test utilities for `arbor-core`.

use arbor_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::graph::{SparseWeightedGraph, WeightedEdge};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// Keeps property suites aligned on the same `PROGTEST_CASES` and
/// `ARBOR_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Builds a sparse graph from `(source, destination, weight)` triples.
#[must_use]
pub(crate) fn graph_of(edges: &[(u32, u32, f64)]) -> SparseWeightedGraph<u32> {
    SparseWeightedGraph::from_edges(
        edges
            .iter()
            .map(|&(source, destination, weight)| WeightedEdge::between(source, destination, weight)),
    )
}

/// Five-node graph whose best tree rooted at 0 is `{1:2, 2:3, 3:0, 4:2}`
/// with weight 90.
#[must_use]
pub(crate) fn rooted_fixture() -> SparseWeightedGraph<u32> {
    graph_of(&[
        (0, 1, 10.0),
        (0, 2, 30.0),
        (0, 3, 10.0),
        (1, 2, 10.0),
        (1, 4, 10.0),
        (2, 1, 20.0),
        (2, 3, 7.0),
        (2, 4, 20.0),
        (3, 2, 40.0),
    ])
}

/// Four-node graph with node 0 as the only node without incoming edges.
#[must_use]
pub(crate) fn constrained_fixture() -> SparseWeightedGraph<u32> {
    graph_of(&[
        (0, 1, 5.0),
        (0, 2, 1.0),
        (0, 3, 1.0),
        (1, 2, 11.0),
        (1, 3, 4.0),
        (2, 1, 10.0),
        (2, 3, 5.0),
        (3, 1, 9.0),
        (3, 2, 8.0),
    ])
}

/// Eleven-node graph with cycles nested two levels deep.
#[must_use]
pub(crate) fn nested_cycles_fixture() -> SparseWeightedGraph<u32> {
    graph_of(&[
        (0, 8, 0.0),
        (1, 2, 10.0),
        (1, 4, 5.0),
        (2, 3, 9.0),
        (3, 1, 8.0),
        (4, 5, 9.0),
        (5, 6, 10.0),
        (6, 4, 8.0),
        (6, 7, 5.0),
        (7, 8, 10.0),
        (8, 2, 5.0),
        (8, 9, 8.0),
        (8, 10, 1.0),
        (9, 7, 9.0),
        (10, 3, 3.0),
    ])
}
