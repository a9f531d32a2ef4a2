//! Benchmark support crate for arbor.
//!
//! Provides seeded synthetic score matrices and parameter types used by the
//! Criterion benchmarks of the maximum branching solver.

pub mod graphs;
pub mod params;
