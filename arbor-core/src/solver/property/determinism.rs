//! Property 3: Determinism.
//!
//! Solves the same input several times and asserts identical branchings and
//! bit-identical weights. Also feeds the first result back as the preferred
//! tree, which may change which optimum is returned but never its weight or
//! root count.

use proptest::test_runner::{TestCaseError, TestCaseResult};

use super::helpers::{solve_failure, solve_fixture, solve_with_preference, weight_tolerance};
use super::types::{ArborFixture, DeterminismConfig};

/// Runs the determinism property for the given fixture.
pub(super) fn run_determinism_property(fixture: &ArborFixture) -> TestCaseResult {
    let config = DeterminismConfig::load();
    let baseline = solve_fixture(fixture).map_err(|e| solve_failure("baseline", fixture, &e))?;

    for run in 1..config.repetitions {
        let result = solve_fixture(fixture)
            .map_err(|e| solve_failure(&format!("run {run}"), fixture, &e))?;
        if result.value != baseline.value {
            return Err(TestCaseError::fail(format!(
                "run {run}: branching diverged, baseline={:?}, run={:?} ({})",
                baseline.value.parents(),
                result.value.parents(),
                fixture.describe(),
            )));
        }
        if result.weight.to_bits() != baseline.weight.to_bits() {
            return Err(TestCaseError::fail(format!(
                "run {run}: weight diverged, baseline={}, run={} ({})",
                baseline.weight,
                result.weight,
                fixture.describe(),
            )));
        }
    }

    let hinted = solve_with_preference(fixture, baseline.value.clone())
        .map_err(|e| solve_failure("preferred", fixture, &e))?;
    if hinted.value.len() != baseline.value.len()
        || (hinted.weight - baseline.weight).abs() > weight_tolerance(fixture)
    {
        return Err(TestCaseError::fail(format!(
            "preferred tree changed the optimum: baseline={} with {} edges, \
             hinted={} with {} edges ({})",
            baseline.weight,
            baseline.value.len(),
            hinted.weight,
            hinted.value.len(),
            fixture.describe(),
        )));
    }

    Ok(())
}
