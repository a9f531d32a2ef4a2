//! Shared test utilities used across arbor crates.

pub mod ci;
pub mod tracing;
