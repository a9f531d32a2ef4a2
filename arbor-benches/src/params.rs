//! Benchmark parameter types.

use std::fmt;

/// Parameters for a solver benchmark run.
#[derive(Clone, Debug)]
pub struct SolverBenchParams {
    /// Number of nodes in the graph.
    pub node_count: usize,
    /// Whether the solve is forced to root at node 0.
    pub rooted: bool,
}

impl fmt::Display for SolverBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.rooted { "rooted" } else { "free" };
        write!(f, "n={},{mode}", self.node_count)
    }
}
