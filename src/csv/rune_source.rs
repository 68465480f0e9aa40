//! Pull-based character source with one level of pushback

use crate::error::{CsvError, Result};
use std::io::{self, BufRead};

/// Cursor position inside the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Line number (1-based)
    pub line: u64,
    /// Byte offset from the start of the input (0-based)
    pub byte: u64,
}

impl Default for Position {
    fn default() -> Self {
        Position { line: 1, byte: 0 }
    }
}

/// Decodes UTF-8 from a buffered reader one `char` at a time
///
/// Supports un-reading exactly the last character read, which is all the
/// tokenizer ever needs.
pub struct RuneSource<R> {
    inner: R,
    pending: Option<char>,
    last: Option<char>,
    position: Position,
    last_position: Position,
    after_cr: bool,
    last_after_cr: bool,
}

impl<R: BufRead> RuneSource<R> {
    /// Wrap a buffered reader
    pub fn new(inner: R) -> Self {
        RuneSource {
            inner,
            pending: None,
            last: None,
            position: Position::default(),
            last_position: Position::default(),
            after_cr: false,
            last_after_cr: false,
        }
    }

    /// Read the next character, `None` at end of input
    ///
    /// Invalid UTF-8 surfaces as an [`io::Error`] of kind `InvalidData`.
    pub fn next(&mut self) -> io::Result<Option<char>> {
        let c = match self.pending.take() {
            Some(c) => Some(c),
            None => self.decode()?,
        };

        self.last = c;
        self.last_position = self.position;
        self.last_after_cr = self.after_cr;

        if let Some(c) = c {
            self.advance(c);
        }
        Ok(c)
    }

    /// Un-read the character returned by the last [`next`](Self::next)
    ///
    /// Backing up past end of input is a no-op; the next read reports end of
    /// input again.
    pub fn backup(&mut self) -> Result<()> {
        if self.pending.is_some() {
            return Err(CsvError::InvalidState(
                "cannot back up more than one character".to_string(),
            ));
        }
        self.pending = self.last.take();
        self.position = self.last_position;
        self.after_cr = self.last_after_cr;
        Ok(())
    }

    /// Check for end of input without consuming anything
    pub fn is_exhausted(&mut self) -> io::Result<bool> {
        if self.pending.is_some() {
            return Ok(false);
        }
        Ok(self.fill_buf()?.is_empty())
    }

    /// Current cursor position
    pub fn position(&self) -> Position {
        self.position
    }

    /// Unwrap the underlying reader
    ///
    /// A character held back by [`backup`](Self::backup) is lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn advance(&mut self, c: char) {
        self.position.byte += c.len_utf8() as u64;
        match c {
            '\r' => self.position.line += 1,
            '\n' if !self.after_cr => self.position.line += 1,
            _ => {}
        }
        self.after_cr = c == '\r';
    }

    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        loop {
            match self.inner.fill_buf() {
                Ok(_) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        self.inner.fill_buf()
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = match self.fill_buf()?.first() {
            Some(&b) => b,
            None => return Ok(None),
        };
        self.inner.consume(1);
        Ok(Some(byte))
    }

    fn decode(&mut self) -> io::Result<Option<char>> {
        let first = match self.read_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };
        if first.is_ascii() {
            return Ok(Some(first as char));
        }

        let width = match first {
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Err(invalid_utf8(self.position.byte)),
        };

        // continuation bytes are only consumed once seen to be 0x80..=0xBF
        let at = self.position.byte;
        let mut buf = [first, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            let byte = match self.fill_buf()?.first() {
                Some(&b) if (0x80..=0xBF).contains(&b) => b,
                _ => return Err(invalid_utf8(at)),
            };
            self.inner.consume(1);
            *slot = byte;
        }

        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(|| invalid_utf8(at))
    }
}

fn invalid_utf8(byte: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("stream did not contain valid UTF-8 at byte {}", byte),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(input: &str) -> RuneSource<&[u8]> {
        RuneSource::new(input.as_bytes())
    }

    #[test]
    fn test_decodes_multibyte() -> Result<()> {
        let mut src = source("aλ€😀");
        assert_eq!(src.next()?, Some('a'));
        assert_eq!(src.next()?, Some('λ'));
        assert_eq!(src.next()?, Some('€'));
        assert_eq!(src.next()?, Some('😀'));
        assert_eq!(src.next()?, None);
        assert_eq!(src.next()?, None);
        Ok(())
    }

    #[test]
    fn test_invalid_utf8() {
        let mut src = RuneSource::new(&[b'a', 0xFF, b'b'][..]);
        assert_eq!(src.next().unwrap(), Some('a'));
        let err = src.next().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_truncated_sequence() {
        // first two bytes of '€'
        let mut src = RuneSource::new(&[0xE2, 0x82][..]);
        assert_eq!(src.next().unwrap_err().kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_bad_continuation_keeps_following_byte() -> Result<()> {
        let mut src = RuneSource::new(&[0xC3, b',', b'x'][..]);
        assert_eq!(src.next().unwrap_err().kind(), io::ErrorKind::InvalidData);
        assert_eq!(src.next()?, Some(','));
        assert_eq!(src.next()?, Some('x'));
        Ok(())
    }

    #[test]
    fn test_backup_single_level() -> Result<()> {
        let mut src = source("xy");
        assert_eq!(src.next()?, Some('x'));
        src.backup()?;
        assert!(matches!(src.backup(), Err(CsvError::InvalidState(_))));
        assert_eq!(src.next()?, Some('x'));
        assert_eq!(src.next()?, Some('y'));
        Ok(())
    }

    #[test]
    fn test_is_exhausted() -> Result<()> {
        let mut src = source("z");
        assert!(!src.is_exhausted()?);
        assert_eq!(src.next()?, Some('z'));
        assert!(src.is_exhausted()?);
        src.backup()?;
        assert!(!src.is_exhausted()?);
        Ok(())
    }

    #[test]
    fn test_position_tracks_lines() -> Result<()> {
        let mut src = source("a\r\nb\rc\nd");
        while src.next()?.is_some() {}
        assert_eq!(src.position(), Position { line: 4, byte: 8 });
        Ok(())
    }

    #[test]
    fn test_backup_restores_position() -> Result<()> {
        let mut src = source("\rλ");
        src.next()?;
        assert_eq!(src.position().line, 2);
        assert_eq!(src.next()?, Some('λ'));
        assert_eq!(src.position().byte, 3);
        src.backup()?;
        assert_eq!(src.position(), Position { line: 2, byte: 1 });
        Ok(())
    }
}
