//! Error types for CSV reading

use crate::types::Record;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CsvError>;

/// Errors raised while configuring a reader or reading records
#[derive(Error, Debug)]
pub enum CsvError {
    /// Rejected quote character
    #[error("invalid quotation {0:?}")]
    InvalidQuote(char),

    /// Rejected delimiter character
    #[error("invalid delimiter {0:?}")]
    InvalidDelimiter(char),

    /// Rejected comment character
    #[error("invalid comment {0:?}")]
    InvalidComment(char),

    /// A quote appeared inside a non-quoted field
    ///
    /// `record` holds the fields completed before the failure.
    #[error("bare quote in non-quoted field on line {line}")]
    BareQuote { line: u64, record: Record },

    /// A quoted field was never closed, or its closing quote was followed by
    /// something other than a delimiter or line terminator
    #[error("extraneous or missing quote in quoted field on line {line}")]
    UnterminatedQuote { line: u64, record: Record },

    /// The input is exhausted
    #[error("end of input")]
    EndOfInput,

    /// Transport or UTF-8 decoding failure from the underlying reader
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Reader used in a way its contract forbids
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A batch read stopped on `source` after reading `records`
    #[error("{source} (after {} records)", .records.len())]
    ReadAll {
        records: Vec<Record>,
        #[source]
        source: Box<CsvError>,
    },
}

impl CsvError {
    /// Check whether this is the clean end-of-input sentinel
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, CsvError::EndOfInput)
    }

    /// Error that stopped the read, looking through a batch wrapper
    pub fn root_cause(&self) -> &CsvError {
        match self {
            CsvError::ReadAll { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Complete records a batch read collected before failing
    pub fn records_read(&self) -> &[Record] {
        match self {
            CsvError::ReadAll { records, .. } => records,
            _ => &[],
        }
    }

    /// Fields read before a parse error, if this is a parse error
    pub fn partial_record(&self) -> Option<&Record> {
        match self.root_cause() {
            CsvError::BareQuote { record, .. } | CsvError::UnterminatedQuote { record, .. } => {
                Some(record)
            }
            _ => None,
        }
    }

    /// Line the parse error was detected on
    pub fn line(&self) -> Option<u64> {
        match self.root_cause() {
            CsvError::BareQuote { line, .. } | CsvError::UnterminatedQuote { line, .. } => {
                Some(*line)
            }
            _ => None,
        }
    }
}
