//! Synthetic score matrices for benchmarking.
//!
//! Scores are drawn from a seeded RNG so that every benchmark run decodes
//! the same graphs.

use arbor_core::{ArborError, DenseWeightedGraph};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Errors that may occur while generating a synthetic graph.
#[derive(Debug, thiserror::Error)]
pub enum SyntheticError {
    /// The requested node count was zero.
    #[error("node count must be greater than zero")]
    ZeroNodes,
    /// The generated matrix was rejected.
    #[error("generated matrix rejected: {0}")]
    Graph(#[from] ArborError),
}

/// Configuration for synthetic graph generation.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Number of nodes, including node 0.
    pub node_count: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Generates a complete graph with uniform scores in `[-10, 10)`.
///
/// Scores into node 0 are absent, as in a parser's score table, and the
/// diagonal is left absent as well.
///
/// # Errors
/// Returns [`SyntheticError::ZeroNodes`] if `node_count` is zero.
///
/// # Examples
/// ```
/// use arbor_benches::graphs::{SyntheticConfig, dense_scores};
///
/// let graph = dense_scores(&SyntheticConfig { node_count: 5, seed: 42 }).expect("valid config");
/// assert_eq!(graph.node_count(), 5);
/// ```
pub fn dense_scores(config: &SyntheticConfig) -> Result<DenseWeightedGraph, SyntheticError> {
    if config.node_count == 0 {
        return Err(SyntheticError::ZeroNodes);
    }
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let weights: Vec<Vec<f64>> = (0..config.node_count)
        .map(|source| {
            (0..config.node_count)
                .map(|destination| {
                    if destination == 0 || destination == source {
                        f64::NEG_INFINITY
                    } else {
                        rng.gen_range(-10.0..10.0)
                    }
                })
                .collect::<Vec<f64>>()
        })
        .collect();
    Ok(DenseWeightedGraph::from_matrix(weights)?)
}
