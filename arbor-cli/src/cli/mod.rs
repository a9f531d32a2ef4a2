//! Command-line interface for decoding dependency trees.
//!
//! The CLI offers a single `parse` command that reads a CoNLL-style arc
//! score table, finds the maximum spanning tree of every sentence rooted at
//! the artificial root, and writes the chosen heads back out.

mod commands;

pub use commands::{
    Cli, CliError, Command, ParseCommand, ParseSummary, ROOT, decode_sentence, parse_stream,
    run_cli,
};
