//! Property 2: Structural invariant verification.
//!
//! For any branching produced by the solver, verifies:
//!
//! - **Acyclicity**: following parents always ends at a root.
//! - **Admissibility**: every chosen edge exists, is no self-loop, does not
//!   enter the forced root and is not banned.
//! - **Required edges**: the destination of a required edge has either the
//!   required parent or none.
//! - **Score consistency**: the reported weight is the sum of the original
//!   weights of the chosen edges.

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::graph::WeightedGraph;

use super::helpers::{is_acyclic, parent_vector, solve_failure, solve_fixture, weight_tolerance};
use super::types::ArborFixture;

/// Runs the structural invariant property for the given fixture.
pub(super) fn run_structural_invariants_property(fixture: &ArborFixture) -> TestCaseResult {
    let best = solve_fixture(fixture).map_err(|e| solve_failure("structural", fixture, &e))?;
    let graph = fixture.graph();

    if !is_acyclic(&parent_vector(fixture.node_count, &best.value)) {
        return Err(TestCaseError::fail(format!(
            "result contains a cycle: {:?} ({})",
            best.value.parents(),
            fixture.describe(),
        )));
    }

    let mut total = 0.0;
    for edge in best.value.edges() {
        let weight = graph.weight_of(edge.source(), edge.destination());
        if !weight.is_finite() {
            return Err(TestCaseError::fail(format!(
                "chosen edge {edge} is not in the graph ({})",
                fixture.describe(),
            )));
        }
        if !fixture.admits(*edge.source(), *edge.destination()) {
            return Err(TestCaseError::fail(format!(
                "chosen edge {edge} violates the configuration ({})",
                fixture.describe(),
            )));
        }
        total += weight;
    }

    for required in &fixture.required {
        let parent = best.value.parent_of(required.destination());
        if parent.is_some_and(|parent| parent != required.source()) {
            return Err(TestCaseError::fail(format!(
                "required edge {required} displaced by parent {parent:?} ({})",
                fixture.describe(),
            )));
        }
    }

    if (total - best.weight).abs() > weight_tolerance(fixture) {
        return Err(TestCaseError::fail(format!(
            "reported weight {} differs from edge sum {total} ({})",
            best.weight,
            fixture.describe(),
        )));
    }

    Ok(())
}
