//! Command implementations and argument parsing for the arbor CLI.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use arbor_core::{ArborError, Arborescence, SolverBuilder, Weighted};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{Span, debug, field, info, instrument};

use crate::conll::{ConllError, Sentence, SentenceReader, write_sentence};

/// Node id of the artificial root every sentence is attached to.
pub const ROOT: usize = 0;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "arbor",
    about = "Decode maximum spanning dependency trees from arc scores."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Pick the best head for every token of every sentence.
    Parse(ParseCommand),
}

/// Options accepted by the `parse` command.
#[derive(Debug, Args, Clone)]
pub struct ParseCommand {
    /// Score table to read (defaults to stdin).
    pub input: Option<PathBuf>,

    /// File to write the parses to (defaults to stdout).
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Opening or creating a file failed.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Writing a parse failed.
    #[error("failed to write output: {source}")]
    Write {
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The score table was malformed.
    #[error(transparent)]
    Conll(#[from] ConllError),
    /// Decoding a sentence failed.
    #[error(transparent)]
    Core(#[from] ArborError),
}

/// Summarises the outcome of a `parse` run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParseSummary {
    /// Number of sentences decoded.
    pub sentences: usize,
    /// Number of tokens across all sentences.
    pub tokens: usize,
    /// Number of tokens left without a head.
    pub headless: usize,
    /// Sum of the scores of every chosen arc.
    pub score: f64,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when reading, decoding or writing fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use arbor_cli::cli::{Cli, Command, ParseCommand, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let input = dir.path().join("scores.conll");
/// let output = dir.path().join("parsed.conll");
/// std::fs::write(&input, "1\tHi\t_\tUH\t_\t_\t_\t_\t_\t_\t1\n")?;
/// let cli = Cli {
///     command: Command::Parse(ParseCommand {
///         input: Some(input),
///         output: Some(output.clone()),
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.sentences, 1);
/// assert_eq!(std::fs::read_to_string(output)?, "1\tHi\t_\tUH\t_\t_\t0\t_\t_\t_\n\n");
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ParseSummary, CliError> {
    match cli.command {
        Command::Parse(parse) => {
            Span::current().record("command", field::display("parse"));
            run_parse(parse)
        }
    }
}

#[instrument(
    name = "cli.parse",
    err,
    skip(command),
    fields(input = field::Empty, output = field::Empty),
)]
pub(super) fn run_parse(command: ParseCommand) -> Result<ParseSummary, CliError> {
    let span = Span::current();
    span.record("input", field::display(describe(command.input.as_deref())));
    span.record("output", field::display(describe(command.output.as_deref())));

    let reader: Box<dyn BufRead> = match &command.input {
        Some(path) => Box::new(open_input(path)?),
        None => Box::new(io::stdin().lock()),
    };
    let summary = match &command.output {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::Io {
                path: path.clone(),
                source,
            })?;
            parse_stream(reader, BufWriter::new(file))?
        }
        None => parse_stream(reader, BufWriter::new(io::stdout().lock()))?,
    };

    info!(
        sentences = summary.sentences,
        tokens = summary.tokens,
        headless = summary.headless,
        score = summary.score,
        "parse completed"
    );
    Ok(summary)
}

/// Decodes every sentence read from `reader` and writes the parses to
/// `writer`.
///
/// # Errors
/// Returns [`CliError`] when the table is malformed, a sentence cannot be
/// decoded, or writing fails.
///
/// # Examples
/// ```
/// # use arbor_cli::cli::parse_stream;
/// let table = "1\tJohn\t_\tNNP\t_\t_\t_\t_\t_\t_\t9\t-inf\t30\n\
///              2\tsaw\t_\tVBD\t_\t_\t_\t_\t_\t_\t10\t20\t-inf\n";
/// let mut output = Vec::new();
/// let summary = parse_stream(table.as_bytes(), &mut output).expect("table is well formed");
/// assert_eq!(summary.tokens, 2);
/// assert_eq!(summary.score, 40.0);
/// ```
pub fn parse_stream(reader: impl BufRead, mut writer: impl Write) -> Result<ParseSummary, CliError> {
    let mut summary = ParseSummary::default();
    for sentence in SentenceReader::new(reader) {
        let sentence = sentence?;
        let best = decode_sentence(&sentence)?;
        write_sentence(&sentence, &best.value, &mut writer)
            .map_err(|source| CliError::Write { source })?;
        summary.sentences += 1;
        summary.tokens += sentence.len();
        summary.headless += sentence.len() - best.value.len();
        summary.score += best.weight;
    }
    writer.flush().map_err(|source| CliError::Write { source })?;
    Ok(summary)
}

/// Finds the best tree over `sentence` rooted at [`ROOT`].
///
/// # Errors
/// Returns [`CliError::Core`] when a score is NaN.
pub fn decode_sentence(sentence: &Sentence) -> Result<Weighted<Arborescence<usize>>, CliError> {
    let graph = sentence.to_graph()?;
    let best = SolverBuilder::new().with_root(ROOT).build()?.solve(&graph)?;
    debug!(
        tokens = sentence.len(),
        attached = best.value.len(),
        score = best.weight,
        "decoded sentence"
    );
    Ok(best)
}

#[instrument(name = "cli.open_input", err, fields(path = field::Empty))]
pub(super) fn open_input(path: &Path) -> Result<BufReader<File>, CliError> {
    Span::current().record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

pub(super) fn describe(path: Option<&Path>) -> String {
    path.map_or_else(|| "-".to_owned(), |path| path.display().to_string())
}
