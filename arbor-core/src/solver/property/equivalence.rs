//! Property 1: Equivalence with the exhaustive oracle.
//!
//! For any small generated graph, verifies that the solver returns a
//! branching with as few roots and as much weight as the best branching
//! found by brute force over the same admitted edges.

use proptest::test_runner::{TestCaseError, TestCaseResult};

use super::helpers::{solve_failure, solve_fixture, weight_tolerance};
use super::oracle::exhaustive_best;
use super::types::ArborFixture;

/// Runs the oracle equivalence property for the given fixture.
pub(super) fn run_oracle_equivalence_property(fixture: &ArborFixture) -> TestCaseResult {
    let best = solve_fixture(fixture).map_err(|e| solve_failure("oracle", fixture, &e))?;
    let oracle = exhaustive_best(fixture);

    let root_count = fixture.node_count as usize - best.value.len();
    if root_count != oracle.root_count {
        return Err(TestCaseError::fail(format!(
            "root count mismatch: solver={root_count}, oracle={} ({})",
            oracle.root_count,
            fixture.describe(),
        )));
    }

    if (best.weight - oracle.total_weight).abs() > weight_tolerance(fixture) {
        return Err(TestCaseError::fail(format!(
            "total weight mismatch: solver={}, oracle={} ({})",
            best.weight,
            oracle.total_weight,
            fixture.describe(),
        )));
    }

    Ok(())
}
