//! CLI entry point for decoding dependency trees from arc scores.
//!
//! Parses command-line arguments with clap, runs the requested command and
//! maps failures to a non-zero exit code. Logging is initialised first so
//! that every later step can emit structured diagnostics on stderr.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use arbor_cli::{
    cli::{Cli, CliError, ParseSummary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

fn try_main() -> Result<ParseSummary> {
    let cli = Cli::parse();
    run_cli(cli).context("failed to execute command")
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    match try_main() {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            let core = err.downcast_ref::<CliError>().and_then(|cli_error| match cli_error {
                CliError::Core(core) => Some(core),
                _ => None,
            });
            let code_field = core.map(|core| field::display(core.code().as_str()));
            let heap_code_field = core
                .and_then(|core| core.heap_code())
                .map(|code| field::display(code.as_str()));

            error!(
                error = %format_args!("{err:#}"),
                code = code_field,
                heap_code = heap_code_field,
                "command execution failed"
            );
            ExitCode::FAILURE
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
