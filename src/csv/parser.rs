//! Record tokenizer: a rune-level state machine with RFC 4180-like behavior
//!
//! `\r`, `\n` and `\r\n` all terminate a record. A bare `\r` ends the line on
//! its own, so the `\n` of a `\r\n` pair is seen as a blank line and skipped.

use crate::csv::dialect::Dialect;
use crate::csv::rune_source::RuneSource;
use crate::error::{CsvError, Result};
use crate::types::Record;
use log::trace;
use std::io::BufRead;

/// Parser states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StartLine,
    Comment,
    StartField,
    Field,
    QuotedField,
    /// A quote was seen inside a quoted field: either closing or escaped
    DoubleQuotedField,
}

/// What a single state step decided
enum Step {
    Next(State),
    /// Line finished; emit the record if any field was finalized
    Done,
    /// Nothing left to read and no record under construction
    EndOfInput,
}

fn is_terminator(c: char) -> bool {
    c == '\r' || c == '\n'
}

/// CSV parser for reading records from a [`RuneSource`]
///
/// Holds only per-read scratch state; every call to
/// [`read_record`](Self::read_record) starts from a clean line.
#[derive(Debug, Default)]
pub struct CsvParser {
    field: String,
    record: Record,
    finished: bool,
}

impl CsvParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the next record under `dialect`
    ///
    /// Returns `Ok(None)` when only a blank or comment line was consumed and
    /// [`CsvError::EndOfInput`] once the source is exhausted.
    pub fn read_record<R: BufRead>(
        &mut self,
        dialect: &Dialect,
        src: &mut RuneSource<R>,
    ) -> Result<Option<Record>> {
        self.field.clear();
        self.record = Record::new();
        self.finished = false;

        let outcome = self.run(dialect, src);
        self.field.clear();
        let record = std::mem::take(&mut self.record);

        match outcome? {
            Step::EndOfInput => Err(CsvError::EndOfInput),
            _ if self.finished => Ok(Some(record)),
            _ => Ok(None),
        }
    }

    fn run<R: BufRead>(&mut self, dialect: &Dialect, src: &mut RuneSource<R>) -> Result<Step> {
        let mut state = State::StartLine;
        loop {
            match self.step(state, dialect, src)? {
                Step::Next(next) => state = next,
                halt => return Ok(halt),
            }
        }
    }

    fn step<R: BufRead>(
        &mut self,
        state: State,
        dialect: &Dialect,
        src: &mut RuneSource<R>,
    ) -> Result<Step> {
        match state {
            State::StartLine => match src.next()? {
                None => Ok(Step::EndOfInput),
                Some(c) if is_terminator(c) => {
                    trace!("skipping blank line before {:?}", src.position());
                    Ok(Step::Done)
                }
                Some(c) if dialect.is_comment(c) => Ok(Step::Next(State::Comment)),
                Some(_) => {
                    src.backup()?;
                    Ok(Step::Next(State::StartField))
                }
            },

            State::Comment => loop {
                match src.next()? {
                    Some(c) if is_terminator(c) => {
                        trace!("skipped comment line before {:?}", src.position());
                        return Ok(Step::Next(State::StartLine));
                    }
                    Some(_) => {}
                    None => return Ok(Step::Done),
                }
            },

            State::StartField => match src.next()? {
                None => {
                    self.end_field();
                    Ok(Step::Done)
                }
                Some(c) if is_terminator(c) => {
                    self.end_field();
                    Ok(Step::Done)
                }
                Some(c) if c == dialect.quote() => Ok(Step::Next(State::QuotedField)),
                Some(_) => {
                    src.backup()?;
                    Ok(Step::Next(State::Field))
                }
            },

            State::Field => loop {
                match src.next()? {
                    None => {
                        self.end_field();
                        return Ok(Step::Done);
                    }
                    Some(c) if is_terminator(c) => {
                        self.end_field();
                        return Ok(Step::Done);
                    }
                    Some(c) if c == dialect.delimiter() => {
                        self.end_field();
                        return Ok(Step::Next(State::StartField));
                    }
                    Some(c) if c == dialect.quote() => {
                        return Err(CsvError::BareQuote {
                            line: src.position().line,
                            record: std::mem::take(&mut self.record),
                        });
                    }
                    Some(c) => self.field.push(c),
                }
            },

            State::QuotedField => loop {
                match src.next()? {
                    None => {
                        return Err(CsvError::UnterminatedQuote {
                            line: src.position().line,
                            record: std::mem::take(&mut self.record),
                        });
                    }
                    Some(c) if c == dialect.quote() => {
                        return Ok(Step::Next(State::DoubleQuotedField))
                    }
                    Some(c) => self.field.push(c),
                }
            },

            State::DoubleQuotedField => match src.next()? {
                None => {
                    self.end_field();
                    Ok(Step::Done)
                }
                Some(c) if is_terminator(c) => {
                    self.end_field();
                    Ok(Step::Done)
                }
                Some(c) if c == dialect.quote() => {
                    self.field.push(c);
                    Ok(Step::Next(State::QuotedField))
                }
                Some(c) if c == dialect.delimiter() => {
                    self.end_field();
                    Ok(Step::Next(State::StartField))
                }
                Some(_) => Err(CsvError::UnterminatedQuote {
                    line: src.position().line,
                    record: std::mem::take(&mut self.record),
                }),
            },
        }
    }

    /// Move the current field into the record under construction
    fn end_field(&mut self) {
        self.record.push_field(std::mem::take(&mut self.field));
        self.finished = true;
    }
}
