//! Support library for the arbor CLI binary.
//!
//! Exposes the command pipeline, the CoNLL score table codec and logging
//! setup so doctests and integration tests can exercise them without forking
//! a subprocess.

pub mod cli;
pub mod conll;
pub mod logging;
