//! Shared helper functions for solver property-based tests.

use proptest::test_runner::TestCaseError;

use crate::arborescence::{Arborescence, Weighted};
use crate::error::ArborError;
use crate::solver::SolverBuilder;

use super::types::ArborFixture;

/// Returns `true` when following parents from any node never revisits a
/// node. `parents[i]` is the parent of node `i`.
pub(super) fn is_acyclic(parents: &[Option<u32>]) -> bool {
    (0..parents.len()).all(|start| {
        let mut current = start;
        for _ in 0..=parents.len() {
            match parents[current] {
                Some(parent) => current = parent as usize,
                None => return true,
            }
        }
        false
    })
}

/// Solves the fixture with its root and constraints applied.
pub(super) fn solve_fixture(
    fixture: &ArborFixture,
) -> Result<Weighted<Arborescence<u32>>, ArborError> {
    solve_with_preference(fixture, Arborescence::empty())
}

/// Solves the fixture, breaking ties in favour of `preferred`.
pub(super) fn solve_with_preference(
    fixture: &ArborFixture,
    preferred: Arborescence<u32>,
) -> Result<Weighted<Arborescence<u32>>, ArborError> {
    let mut builder = SolverBuilder::new()
        .with_required_edges(fixture.required.iter().cloned())
        .with_banned_edges(fixture.banned.iter().cloned())
        .with_preferred_tree(preferred);
    if let Some(root) = fixture.root {
        builder = builder.with_root(root);
    }
    builder.build()?.solve(&fixture.graph())
}

/// Wraps a solver failure with the fixture description.
pub(super) fn solve_failure(context: &str, fixture: &ArborFixture, error: &ArborError) -> TestCaseError {
    TestCaseError::fail(format!("{context}: solve failed: {error} ({})", fixture.describe()))
}

/// Converts a branching into a parent vector indexed by node.
pub(super) fn parent_vector(node_count: u32, tree: &Arborescence<u32>) -> Vec<Option<u32>> {
    (0..node_count).map(|node| tree.parent_of(&node).copied()).collect()
}

/// Absolute tolerance for comparing weight sums accumulated in different
/// orders.
pub(super) fn weight_tolerance(fixture: &ArborFixture) -> f64 {
    let scale: f64 = fixture
        .edges
        .iter()
        .map(|&(_, _, weight)| weight.abs())
        .sum();
    1e-9 * scale.max(1.0)
}
