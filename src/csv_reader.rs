//! CSV reading with streaming support
//!
//! Records are pulled one at a time from any [`std::io::Read`]; memory usage
//! is bounded by the longest record, not the size of the document.

use crate::csv::{CsvParser, Dialect, Position, RuneSource};
use crate::error::{CsvError, Result};
use crate::types::Record;
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// CSV reader with streaming capabilities
///
/// Reads records one by one using an iterator pattern. `\r`, `\n` and `\r\n`
/// all terminate a record, blank lines are skipped, and quote, delimiter and
/// comment characters are configurable between reads.
///
/// # Examples
///
/// ```no_run
/// use runecsv::csv_reader::CsvReader;
///
/// let mut reader = CsvReader::open("data.csv").unwrap();
///
/// for record_result in reader.records() {
///     let record = record_result.unwrap();
///     println!("{:?}", record);
/// }
/// ```
///
/// # With Headers
///
/// ```
/// use runecsv::csv_reader::CsvReader;
///
/// let mut reader = CsvReader::from_reader("id,name\n1,Alice\n".as_bytes()).has_header(true);
/// let records = reader.read_all()?;
///
/// assert_eq!(reader.headers().unwrap(), &["id", "name"]);
/// assert_eq!(records.len(), 1);
/// # Ok::<(), runecsv::CsvError>(())
/// ```
pub struct CsvReader<R> {
    source: RuneSource<BufReader<R>>,
    parser: CsvParser,
    dialect: Dialect,

    // Header handling
    has_header: bool,
    headers: Option<Record>,

    record_count: u64,
}

impl CsvReader<File> {
    /// Open CSV file for streaming read
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use runecsv::csv_reader::CsvReader;
    ///
    /// let reader = CsvReader::open("data.csv")?;
    /// # Ok::<(), runecsv::CsvError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!("opened CSV file {}", path.display());
        Ok(CsvReader::from_reader(file))
    }
}

impl<R: Read> CsvReader<R> {
    /// Wrap any reader with the default dialect
    ///
    /// Quote is `"`, delimiter is `,` and comments are disabled.
    pub fn from_reader(reader: R) -> Self {
        CsvReader {
            source: RuneSource::new(BufReader::new(reader)),
            parser: CsvParser::new(),
            dialect: Dialect::default(),
            has_header: false,
            headers: None,
            record_count: 0,
        }
    }

    /// Replace the whole dialect (builder pattern)
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Indicate that the first record holds headers (builder pattern)
    ///
    /// When set to `true`, the first record is stored and accessible via
    /// `headers()`; it is never returned as a data record.
    pub fn has_header(mut self, has: bool) -> Self {
        self.has_header = has;
        self
    }

    /// Current dialect
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Set the quote character, effective from the next read
    pub fn set_quote(&mut self, quote: char) -> Result<()> {
        self.dialect.set_quote(quote)
    }

    /// Set the field delimiter, effective from the next read
    pub fn set_delimiter(&mut self, delimiter: char) -> Result<()> {
        self.dialect.set_delimiter(delimiter)
    }

    /// Set or disable the comment character, effective from the next read
    pub fn set_comment(&mut self, comment: Option<char>) -> Result<()> {
        self.dialect.set_comment(comment)
    }

    /// Get header record if one was read
    pub fn headers(&self) -> Option<&Record> {
        self.headers.as_ref()
    }

    /// Read a single record
    ///
    /// - `Ok(Some(record))`: a record was read
    /// - `Ok(None)`: a blank or comment-only line was skipped
    /// - `Err(CsvError::EndOfInput)`: input exhausted (repeatable)
    ///
    /// Parse errors carry the fields completed before the failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use runecsv::{CsvError, csv_reader::CsvReader};
    ///
    /// let mut reader = CsvReader::from_reader("a,b\n\nc,d".as_bytes());
    ///
    /// loop {
    ///     match reader.read_record() {
    ///         Ok(Some(record)) => println!("{}", record),
    ///         Ok(None) => continue,
    ///         Err(CsvError::EndOfInput) => break,
    ///         Err(e) => return Err(e),
    ///     }
    /// }
    /// # Ok::<(), CsvError>(())
    /// ```
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        let record = match self.parser.read_record(&self.dialect, &mut self.source) {
            Ok(record) => record,
            Err(e @ (CsvError::BareQuote { .. } | CsvError::UnterminatedQuote { .. })) => {
                debug!("parse error after {} records: {}", self.record_count, e);
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        match record {
            Some(record) if self.has_header && self.headers.is_none() => {
                debug!("captured header row with {} fields", record.len());
                self.headers = Some(record);
                Ok(None)
            }
            Some(record) => {
                self.record_count += 1;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Read all remaining records
    ///
    /// Blank and comment lines are skipped. Stops cleanly at end of input.
    /// Any other error is returned as [`CsvError::ReadAll`], which carries the
    /// records collected before the failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use runecsv::{CsvError, csv_reader::CsvReader};
    ///
    /// let mut reader = CsvReader::from_reader("a,b\nc\"d\n".as_bytes());
    /// let err = reader.read_all().unwrap_err();
    ///
    /// assert!(matches!(err.root_cause(), CsvError::BareQuote { .. }));
    /// assert_eq!(err.records_read()[0], ["a", "b"]);
    /// ```
    pub fn read_all(&mut self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        loop {
            let exhausted = match self.read_record() {
                Ok(Some(record)) => {
                    records.push(record);
                    self.source.is_exhausted().map_err(CsvError::from)
                }
                Ok(None) => self.source.is_exhausted().map_err(CsvError::from),
                Err(CsvError::EndOfInput) => Ok(true),
                Err(e) => Err(e),
            };
            match exhausted {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) => {
                    debug!("read_all stopped after {} records", records.len());
                    return Err(CsvError::ReadAll {
                        records,
                        source: Box::new(e),
                    });
                }
            }
        }
        debug!("read {} records", records.len());
        Ok(records)
    }

    /// Get iterator over records
    ///
    /// Skips blank lines and ends at end of input. After an error the
    /// iterator is fused and yields `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use runecsv::csv_reader::CsvReader;
    ///
    /// let mut reader = CsvReader::from_reader("a,b\nc,d\n".as_bytes());
    /// let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(records.len(), 2);
    /// # Ok::<(), runecsv::CsvError>(())
    /// ```
    pub fn records(&mut self) -> CsvRecordIterator<'_, R> {
        CsvRecordIterator {
            reader: self,
            done: false,
        }
    }

    /// Get the number of data records read so far
    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Position of the cursor in the input
    pub fn position(&self) -> Position {
        self.source.position()
    }

    /// Unwrap the underlying reader
    pub fn into_inner(self) -> R {
        self.source.into_inner().into_inner()
    }
}

/// Iterator over CSV records
pub struct CsvRecordIterator<'a, R> {
    reader: &'a mut CsvReader<R>,
    done: bool,
}

impl<R: Read> Iterator for CsvRecordIterator<'_, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.reader.read_record() {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(CsvError::EndOfInput) => self.done = true,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

impl<R: Read> std::iter::FusedIterator for CsvRecordIterator<'_, R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn reader(input: &str) -> CsvReader<&[u8]> {
        CsvReader::from_reader(input.as_bytes())
    }

    #[test]
    fn test_read_plain_csv() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"Name,Age,City\r\nAlice,30,NYC\r\nBob,25,SF\r\n")?;

        let mut reader = CsvReader::open(file.path())?;
        let mut records = vec![];
        for record_result in reader.records() {
            records.push(record_result?);
        }

        assert_eq!(records.len(), 3);
        assert_eq!(records[0], ["Name", "Age", "City"]);
        assert_eq!(records[1], ["Alice", "30", "NYC"]);
        assert_eq!(reader.record_count(), 3);
        Ok(())
    }

    #[test]
    fn test_open_missing_file() {
        let err = CsvReader::open("definitely/not/here.csv").err().unwrap();
        assert!(matches!(err, CsvError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    }

    #[test]
    fn test_read_with_headers() -> Result<()> {
        let mut reader = reader("\nID,Name\n1,Alice\n2,Bob\n").has_header(true);
        assert_eq!(reader.headers(), None); // Not read yet

        let records = reader.records().collect::<Result<Vec<_>>>()?;

        assert_eq!(reader.headers().unwrap(), &["ID", "Name"]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], ["1", "Alice"]);
        assert_eq!(reader.record_count(), 2);
        Ok(())
    }

    #[test]
    fn test_end_of_input_is_idempotent() -> Result<()> {
        let mut reader = reader("a,b");
        assert_eq!(reader.read_record()?, Some(Record::from(vec!["a", "b"])));
        for _ in 0..3 {
            assert!(matches!(reader.read_record(), Err(CsvError::EndOfInput)));
        }
        assert_eq!(reader.record_count(), 1);
        Ok(())
    }

    #[test]
    fn test_dialect_change_between_reads() -> Result<()> {
        let mut reader = reader("a,b\nc;d\n");
        assert_eq!(reader.read_record()?.unwrap(), ["a", "b"]);

        reader.set_delimiter(';')?;
        assert_eq!(reader.read_record()?.unwrap(), ["c", "d"]);
        Ok(())
    }

    #[test]
    fn test_rejected_setter_keeps_dialect() {
        let mut reader = reader("a,b\n");
        assert!(matches!(
            reader.set_quote(','),
            Err(CsvError::InvalidQuote(','))
        ));
        assert_eq!(reader.dialect(), &Dialect::default());
    }

    #[test]
    fn test_iterator_fuses_after_error() {
        let mut reader = reader("a,b\nx\"y\nc,d\n");
        let mut records = reader.records();

        assert!(matches!(records.next(), Some(Ok(_))));
        assert!(matches!(records.next(), Some(Err(CsvError::BareQuote { .. }))));
        assert!(records.next().is_none());
    }

    #[test]
    fn test_into_inner_returns_source() -> Result<()> {
        let mut reader = reader("a,b\n");
        reader.read_all()?;
        let rest: &[u8] = reader.into_inner();
        assert!(rest.is_empty());
        Ok(())
    }

    #[test]
    fn test_position_after_reads() -> Result<()> {
        let mut reader = reader("a\nb\n");
        reader.read_record()?;
        assert_eq!(reader.position().line, 2);
        Ok(())
    }
}
