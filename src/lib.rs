//! # runecsv
//!
//! Streaming CSV reader built on a character-level state machine.
//!
//! - Configurable quote, delimiter and comment characters, any Unicode scalar
//!   value (multi-byte characters are matched as whole characters)
//! - `\n`, `\r` and `\r\n` line terminators, blank lines skipped
//! - Quoted fields with embedded delimiters, newlines and doubled quotes
//! - Constant memory: one record in flight at a time
//!
//! ## Quick Start
//!
//! ```
//! use runecsv::CsvReader;
//!
//! let input = "name,comment\nAlice,\"likes \"\"quotes\"\"\"\nBob,\"multi\nline\"\n";
//! let mut reader = CsvReader::from_reader(input.as_bytes());
//!
//! let records = reader.read_all()?;
//! assert_eq!(records.len(), 3);
//! assert_eq!(records[1], ["Alice", "likes \"quotes\""]);
//! assert_eq!(records[2], ["Bob", "multi\nline"]);
//! # Ok::<(), runecsv::CsvError>(())
//! ```
//!
//! ## Custom Dialect
//!
//! ```
//! use runecsv::CsvReader;
//!
//! let mut reader = CsvReader::from_reader("# totals\na;b\n".as_bytes());
//! reader.set_delimiter(';')?;
//! reader.set_comment(Some('#'))?;
//!
//! assert_eq!(reader.read_all()?, vec![runecsv::Record::from(vec!["a", "b"])]);
//! # Ok::<(), runecsv::CsvError>(())
//! ```
//!
//! The library logs through the [`log`] facade and never installs a logger.

pub mod csv;
pub mod csv_reader;
pub mod error;
pub mod types;

pub use csv::Dialect;
pub use csv_reader::{CsvReader, CsvRecordIterator};
pub use error::{CsvError, Result};
pub use types::Record;
