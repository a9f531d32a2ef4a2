//! Property-based tests for the maximum branching solver.
//!
//! Verifies the solver against an exhaustive oracle on small graphs,
//! validates structural invariants (acyclicity, constraint handling, score
//! consistency) on larger ones, and checks that repeated solves of the same
//! input agree exactly.

mod determinism;
mod equivalence;
mod helpers;
mod oracle;
mod strategies;
mod structural;
mod types;
