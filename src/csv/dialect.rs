//! Quote, delimiter and comment configuration

use crate::error::{CsvError, Result};

/// Special characters recognized by the parser
///
/// Quote, delimiter and comment must all be different characters, and none of
/// them may be a line terminator (`\r`, `\n`), the replacement character
/// (U+FFFD) or NUL. Comments are disabled when `comment` is `None`.
///
/// # Examples
///
/// ```
/// use runecsv::csv::Dialect;
///
/// let dialect = Dialect::default()
///     .with_delimiter(';')?
///     .with_comment(Some('#'))?;
/// assert_eq!(dialect.delimiter(), ';');
/// # Ok::<(), runecsv::CsvError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dialect {
    quote: char,
    delimiter: char,
    comment: Option<char>,
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect {
            quote: '"',
            delimiter: ',',
            comment: None,
        }
    }
}

/// Whether `c` may be used as a special character at all
fn valid(c: char) -> bool {
    c != '\r' && c != '\n' && c != char::REPLACEMENT_CHARACTER && c != '\0'
}

impl Dialect {
    /// Quote character, `"` by default
    pub fn quote(&self) -> char {
        self.quote
    }

    /// Field delimiter, `,` by default
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Comment character, disabled by default
    pub fn comment(&self) -> Option<char> {
        self.comment
    }

    /// Set the quote character
    ///
    /// Leaves the dialect unchanged and returns [`CsvError::InvalidQuote`] if
    /// `quote` is not allowed.
    pub fn set_quote(&mut self, quote: char) -> Result<()> {
        if !valid(quote) || quote == self.delimiter || Some(quote) == self.comment {
            return Err(CsvError::InvalidQuote(quote));
        }
        self.quote = quote;
        Ok(())
    }

    /// Set the field delimiter
    pub fn set_delimiter(&mut self, delimiter: char) -> Result<()> {
        if !valid(delimiter) || delimiter == self.quote || Some(delimiter) == self.comment {
            return Err(CsvError::InvalidDelimiter(delimiter));
        }
        self.delimiter = delimiter;
        Ok(())
    }

    /// Set or disable (`None`) the comment character
    pub fn set_comment(&mut self, comment: Option<char>) -> Result<()> {
        if let Some(c) = comment {
            if !valid(c) || c == self.quote || c == self.delimiter {
                return Err(CsvError::InvalidComment(c));
            }
        }
        self.comment = comment;
        Ok(())
    }

    /// Set the quote character (builder pattern)
    pub fn with_quote(mut self, quote: char) -> Result<Self> {
        self.set_quote(quote)?;
        Ok(self)
    }

    /// Set the field delimiter (builder pattern)
    pub fn with_delimiter(mut self, delimiter: char) -> Result<Self> {
        self.set_delimiter(delimiter)?;
        Ok(self)
    }

    /// Set the comment character (builder pattern)
    pub fn with_comment(mut self, comment: Option<char>) -> Result<Self> {
        self.set_comment(comment)?;
        Ok(self)
    }

    pub(crate) fn is_comment(&self, c: char) -> bool {
        self.comment == Some(c)
    }
}
