//! Strategy builders for solver property-based tests.
//!
//! Provides directed graph generators with varied weight distributions and
//! topologies, plus a randomly chosen root and edge constraints. Small
//! fixtures stay within reach of the exhaustive oracle; regular fixtures are
//! larger and only checked structurally.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::graph::Edge;

use super::types::{ArborFixture, WeightDistribution};

/// Maximum node count for regular fixtures.
const MAX_NODES: u32 = 24;
/// Maximum node count for dense regular fixtures.
const DENSE_MAX_NODES: u32 = 12;
/// Maximum node count the exhaustive oracle can afford.
pub(super) const ORACLE_MAX_NODES: u32 = 6;

/// Generates regular fixtures covering all five weight distributions.
pub(super) fn arbor_fixture_strategy() -> impl Strategy<Value = ArborFixture> {
    (any::<WeightDistribution>(), any::<u64>()).prop_map(|(distribution, seed)| {
        let mut rng = SmallRng::seed_from_u64(seed);
        generate_fixture(distribution, &mut rng)
    })
}

/// Generates fixtures small enough for the exhaustive oracle.
pub(super) fn small_fixture_strategy() -> impl Strategy<Value = ArborFixture> {
    (any::<WeightDistribution>(), any::<u64>()).prop_map(|(distribution, seed)| {
        let mut rng = SmallRng::seed_from_u64(seed);
        generate_small_fixture(distribution, &mut rng)
    })
}

/// Generates a regular fixture for a specific weight distribution.
pub(super) fn generate_fixture(distribution: WeightDistribution, rng: &mut SmallRng) -> ArborFixture {
    let max_nodes = match distribution {
        WeightDistribution::Dense => DENSE_MAX_NODES,
        _ => MAX_NODES,
    };
    generate_with_limit(distribution, max_nodes, rng)
}

/// Generates a fixture for a specific weight distribution with at most
/// [`ORACLE_MAX_NODES`] nodes.
pub(super) fn generate_small_fixture(
    distribution: WeightDistribution,
    rng: &mut SmallRng,
) -> ArborFixture {
    generate_with_limit(distribution, ORACLE_MAX_NODES, rng)
}

fn generate_with_limit(
    distribution: WeightDistribution,
    max_nodes: u32,
    rng: &mut SmallRng,
) -> ArborFixture {
    let node_count = rng.gen_range(1..=max_nodes);
    let edges = match distribution {
        WeightDistribution::Continuous => {
            random_edges(node_count, (0.3, 0.7), rng, |r| r.gen_range(0.1..100.0))
        }
        WeightDistribution::ManyIdentical => {
            let pool: Vec<f64> = (0..rng.gen_range(2..=3))
                .map(|_| f64::from(rng.gen_range(1_u8..=5)))
                .collect();
            random_edges(node_count, (0.4, 0.9), rng, move |r| {
                pool[r.gen_range(0..pool.len())]
            })
        }
        WeightDistribution::Mixed => random_edges(node_count, (0.3, 0.8), rng, |r| {
            f64::from(r.gen_range(-5_i8..=10))
        }),
        WeightDistribution::Dense => {
            random_edges(node_count, (1.0, 1.0), rng, |r| r.gen_range(-10.0..10.0))
        }
        WeightDistribution::Disconnected => disconnected_edges(node_count, rng),
    };
    let mut fixture = ArborFixture {
        node_count,
        edges,
        root: None,
        required: Vec::new(),
        banned: Vec::new(),
        distribution,
    };
    add_constraints(&mut fixture, rng);
    fixture
}

// ── Topologies ──────────────────────────────────────────────────────────

/// Adds each ordered pair of distinct nodes with a probability drawn from
/// `edge_prob_range`.
fn random_edges(
    node_count: u32,
    edge_prob_range: (f64, f64),
    rng: &mut SmallRng,
    mut weight_generator: impl FnMut(&mut SmallRng) -> f64,
) -> Vec<(u32, u32, f64)> {
    let edge_probability = rng.gen_range(edge_prob_range.0..=edge_prob_range.1);
    let mut edges = Vec::new();
    for source in 0..node_count {
        for destination in 0..node_count {
            if source != destination && rng.gen_bool(edge_probability) {
                edges.push((source, destination, weight_generator(rng)));
            }
        }
    }
    edges
}

/// Splits the nodes into contiguous groups and only connects nodes within a
/// group.
fn disconnected_edges(node_count: u32, rng: &mut SmallRng) -> Vec<(u32, u32, f64)> {
    let mut edges = Vec::new();
    let mut start = 0;
    while start < node_count {
        let size = rng.gen_range(1..=4).min(node_count - start);
        for source in start..start + size {
            for destination in start..start + size {
                if source != destination && rng.gen_bool(0.6) {
                    edges.push((source, destination, f64::from(rng.gen_range(0_u8..=9))));
                }
            }
        }
        start += size;
    }
    edges
}

// ── Constraints ─────────────────────────────────────────────────────────

/// Picks a root, a required edge and a banned edge, each with probability
/// one third.
fn add_constraints(fixture: &mut ArborFixture, rng: &mut SmallRng) {
    if rng.gen_bool(1.0 / 3.0) {
        fixture.root = Some(rng.gen_range(0..fixture.node_count));
    }
    if rng.gen_bool(1.0 / 3.0) {
        if let Some(edge) = pick_edge(fixture, rng) {
            fixture.required.push(edge);
        }
    }
    if rng.gen_bool(1.0 / 3.0) {
        if let Some(edge) = pick_edge(fixture, rng) {
            fixture.banned.push(edge);
        }
    }
}

/// Picks an edge that neither enters the root nor is already constrained.
fn pick_edge(fixture: &ArborFixture, rng: &mut SmallRng) -> Option<Edge<u32>> {
    let candidates: Vec<Edge<u32>> = fixture
        .edges
        .iter()
        .map(|&(source, destination, _)| Edge::new(source, destination))
        .filter(|edge| fixture.root.as_ref() != Some(edge.destination()))
        .filter(|edge| !fixture.required.contains(edge) && !fixture.banned.contains(edge))
        .collect();
    if candidates.is_empty() {
        return None;
    }
    candidates.get(rng.gen_range(0..candidates.len())).cloned()
}

// Weighted towards tie-heavy graphs, which exercise the reduced-weight
// bookkeeping hardest.
impl proptest::arbitrary::Arbitrary for WeightDistribution {
    type Parameters = ();
    type Strategy = proptest::strategy::TupleUnion<(
        proptest::strategy::WA<proptest::strategy::Just<Self>>,
        proptest::strategy::WA<proptest::strategy::Just<Self>>,
        proptest::strategy::WA<proptest::strategy::Just<Self>>,
        proptest::strategy::WA<proptest::strategy::Just<Self>>,
        proptest::strategy::WA<proptest::strategy::Just<Self>>,
    )>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            2 => Just(Self::Continuous),
            3 => Just(Self::ManyIdentical),
            3 => Just(Self::Mixed),
            2 => Just(Self::Dense),
            2 => Just(Self::Disconnected),
        ]
    }
}
