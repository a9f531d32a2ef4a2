//! Reading and writing CoNLL-style arc score tables.
//!
//! Sentences are separated by blank lines. Each token line carries the ten
//! CoNLL columns `ID FORM LEMMA POS _ _ HEAD DEPREL _ _` followed by the
//! scores of its candidate heads: score column `k` is the weight of the arc
//! from token `k` (0 being the artificial root) to this token. Heads without
//! a score cannot be chosen. Lines starting with `#` are comments.

use std::io::{self, BufRead, Write};

use arbor_core::{Arborescence, ArborError, DenseWeightedGraph};
use thiserror::Error;

/// Number of CoNLL columns before the scores start.
pub const CONLL_COLUMNS: usize = 10;

/// Placeholder written for empty columns.
const EMPTY: &str = "_";

/// Errors raised while reading a score table.
#[derive(Debug, Error)]
pub enum ConllError {
    /// Reading from the underlying source failed.
    #[error("failed to read input: {source}")]
    Io {
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A token line had fewer than the ten CoNLL columns.
    #[error("line {line}: expected at least 10 columns, found {found}")]
    TooFewColumns {
        /// 1-based line number.
        line: usize,
        /// Number of columns present.
        found: usize,
    },
    /// The token id was not the next position in the sentence.
    #[error("line {line}: expected token id {expected}, found `{found}`")]
    UnexpectedId {
        /// 1-based line number.
        line: usize,
        /// Position the token should have had.
        expected: usize,
        /// Raw id column.
        found: String,
    },
    /// A score column was not a number.
    #[error("line {line}: score column {column} is not a number: `{raw}`")]
    InvalidScore {
        /// 1-based line number.
        line: usize,
        /// 0-based head index the score belongs to.
        column: usize,
        /// Raw score text.
        raw: String,
    },
    /// A token scored more heads than the sentence has nodes.
    #[error("line {line}: {found} scores for a sentence with {expected} candidate heads")]
    TooManyScores {
        /// 1-based line number.
        line: usize,
        /// Number of candidate heads, including the root.
        expected: usize,
        /// Number of scores present.
        found: usize,
    },
}

/// One token of a sentence with the scores of its candidate heads.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// 1-based position in the sentence.
    pub id: usize,
    /// Surface form.
    pub form: String,
    /// Part-of-speech tag.
    pub pos: String,
    /// Score of each candidate head, indexed by head id.
    pub scores: Vec<f64>,
    line: usize,
}

/// A sentence read from a score table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sentence {
    tokens: Vec<Token>,
}

impl Sentence {
    /// Returns the tokens in order.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Returns the number of tokens, excluding the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` when the sentence has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Builds the arc score graph over the root and the tokens.
    ///
    /// # Errors
    /// Returns [`ArborError::NonFiniteWeight`] when a score is NaN.
    pub fn to_graph(&self) -> Result<DenseWeightedGraph, ArborError> {
        let size = self.tokens.len() + 1;
        let mut weights = vec![vec![f64::NEG_INFINITY; size]; size];
        for token in &self.tokens {
            for (head, &score) in token.scores.iter().enumerate() {
                if let Some(row) = weights.get_mut(head) {
                    row[token.id] = score;
                }
            }
        }
        DenseWeightedGraph::from_matrix(weights)
    }

    fn finish(self) -> Result<Option<Self>, ConllError> {
        if self.tokens.is_empty() {
            return Ok(None);
        }
        let expected = self.tokens.len() + 1;
        if let Some(token) = self.tokens.iter().find(|token| token.scores.len() > expected) {
            return Err(ConllError::TooManyScores {
                line: token.line,
                expected,
                found: token.scores.len(),
            });
        }
        Ok(Some(self))
    }
}

/// Streams sentences out of a score table.
///
/// # Examples
/// ```
/// use arbor_cli::conll::SentenceReader;
///
/// let table = "1\tJohn\t_\tNNP\t_\t_\t_\t_\t_\t_\t9\t-inf\t30\n\
///              2\tsaw\t_\tVBD\t_\t_\t_\t_\t_\t_\t10\t20\t-inf\n";
/// let sentences: Vec<_> = SentenceReader::new(table.as_bytes())
///     .collect::<Result<_, _>>()
///     .expect("table is well formed");
/// assert_eq!(sentences.len(), 1);
/// assert_eq!(sentences[0].len(), 2);
/// ```
pub struct SentenceReader<R> {
    reader: R,
    line: usize,
    buffer: String,
}

impl<R: BufRead> SentenceReader<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buffer: String::new(),
        }
    }

    /// Reads the next non-empty sentence, or `None` at the end of input.
    ///
    /// # Errors
    /// Returns [`ConllError`] when reading fails or a line is malformed.
    pub fn read_sentence(&mut self) -> Result<Option<Sentence>, ConllError> {
        let mut sentence = Sentence::default();
        loop {
            self.buffer.clear();
            let read = self
                .reader
                .read_line(&mut self.buffer)
                .map_err(|source| ConllError::Io { source })?;
            if read == 0 {
                return sentence.finish();
            }
            self.line += 1;
            let trimmed = self.buffer.trim();
            if trimmed.starts_with('#') {
                continue;
            }
            if trimmed.is_empty() {
                if sentence.is_empty() {
                    continue;
                }
                return sentence.finish();
            }
            let token = parse_token(trimmed, self.line, sentence.len() + 1)?;
            sentence.tokens.push(token);
        }
    }
}

impl<R: BufRead> Iterator for SentenceReader<R> {
    type Item = Result<Sentence, ConllError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_sentence().transpose()
    }
}

fn parse_token(text: &str, line: usize, expected_id: usize) -> Result<Token, ConllError> {
    let columns: Vec<&str> = text.split_whitespace().collect();
    if columns.len() < CONLL_COLUMNS {
        return Err(ConllError::TooFewColumns {
            line,
            found: columns.len(),
        });
    }
    let raw_id = columns[0];
    if raw_id.parse::<usize>().ok() != Some(expected_id) {
        return Err(ConllError::UnexpectedId {
            line,
            expected: expected_id,
            found: raw_id.to_owned(),
        });
    }
    let scores = columns[CONLL_COLUMNS..]
        .iter()
        .enumerate()
        .map(|(column, raw)| {
            raw.parse::<f64>().map_err(|_| ConllError::InvalidScore {
                line,
                column,
                raw: (*raw).to_owned(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Token {
        id: expected_id,
        form: columns[1].to_owned(),
        pos: columns[3].to_owned(),
        scores,
        line,
    })
}

/// Writes `sentence` with the heads chosen in `tree`, followed by a blank
/// line. Tokens without a parent get the head `_`.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn write_sentence(
    sentence: &Sentence,
    tree: &Arborescence<usize>,
    mut writer: impl Write,
) -> io::Result<()> {
    for token in sentence.tokens() {
        let head = tree
            .parent_of(&token.id)
            .map_or_else(|| EMPTY.to_owned(), ToString::to_string);
        writeln!(
            writer,
            "{id}\t{form}\t{EMPTY}\t{pos}\t{EMPTY}\t{EMPTY}\t{head}\t{EMPTY}\t{EMPTY}\t{EMPTY}",
            id = token.id,
            form = token.form,
            pos = token.pos,
        )?;
    }
    writeln!(writer)
}
