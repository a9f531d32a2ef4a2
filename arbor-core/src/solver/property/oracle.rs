//! Exhaustive oracle for branching property verification.
//!
//! Enumerates every assignment of at most one admitted parent per node,
//! discards the cyclic ones and keeps the best of the rest: fewest roots
//! first, then the largest total weight. Only usable on tiny graphs.

use super::helpers::is_acyclic;
use super::types::ArborFixture;

/// Result of the exhaustive oracle.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct ExhaustiveResult {
    /// Number of nodes without a parent in the best branching.
    pub root_count: usize,
    /// Total weight of the best branching.
    pub total_weight: f64,
}

/// Finds the optimum by brute force over the fixture's admitted edges.
pub(super) fn exhaustive_best(fixture: &ArborFixture) -> ExhaustiveResult {
    let node_count = fixture.node_count as usize;
    // Option `None` stands for "no parent".
    let mut options: Vec<Vec<Option<(u32, f64)>>> = vec![vec![None]; node_count];
    for &(source, destination, weight) in &fixture.edges {
        if fixture.admits(source, destination) {
            options[destination as usize].push(Some((source, weight)));
        }
    }

    let mut best: Option<ExhaustiveResult> = None;
    let mut cursor = vec![0_usize; node_count];
    loop {
        let parents: Vec<Option<u32>> = cursor
            .iter()
            .zip(&options)
            .map(|(&index, choices)| choices[index].map(|(source, _)| source))
            .collect();
        if is_acyclic(&parents) {
            let root_count = parents.iter().filter(|parent| parent.is_none()).count();
            let total_weight: f64 = cursor
                .iter()
                .zip(&options)
                .filter_map(|(&index, choices)| choices[index].map(|(_, weight)| weight))
                .sum();
            let better = best.as_ref().is_none_or(|current| {
                root_count < current.root_count
                    || (root_count == current.root_count && total_weight > current.total_weight)
            });
            if better {
                best = Some(ExhaustiveResult {
                    root_count,
                    total_weight,
                });
            }
        }
        if !advance(&mut cursor, &options) {
            break;
        }
    }
    best.unwrap_or(ExhaustiveResult {
        root_count: 0,
        total_weight: 0.0,
    })
}

/// Moves the odometer to the next assignment, returning `false` once every
/// assignment has been visited.
fn advance(cursor: &mut [usize], options: &[Vec<Option<(u32, f64)>>]) -> bool {
    for (digit, choices) in cursor.iter_mut().zip(options) {
        *digit += 1;
        if *digit < choices.len() {
            return true;
        }
        *digit = 0;
    }
    false
}
