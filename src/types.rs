//! Type definitions for CSV data

use std::fmt;
use std::ops::Index;

/// Represents one record (logical line) of a CSV document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Record { fields: Vec::new() }
    }

    /// Get field at column index
    pub fn get(&self, col: usize) -> Option<&str> {
        self.fields.get(col).map(String::as_str)
    }

    /// Get number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Borrow all fields
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Iterate over fields as string slices
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Convert record to vector of strings
    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }

    pub(crate) fn push_field(&mut self, field: String) {
        self.fields.push(field);
    }
}

impl Index<usize> for Record {
    type Output = str;

    fn index(&self, col: usize) -> &str {
        &self.fields[col]
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.fields)
    }
}

impl From<Vec<String>> for Record {
    fn from(fields: Vec<String>) -> Self {
        Record { fields }
    }
}

impl From<Vec<&str>> for Record {
    fn from(fields: Vec<&str>) -> Self {
        Record {
            fields: fields.into_iter().map(str::to_string).collect(),
        }
    }
}

impl From<Record> for Vec<String> {
    fn from(record: Record) -> Self {
        record.fields
    }
}

impl<S: AsRef<str>> PartialEq<[S]> for Record {
    fn eq(&self, other: &[S]) -> bool {
        self.fields.len() == other.len()
            && self.fields.iter().zip(other).all(|(a, b)| a == b.as_ref())
    }
}

impl<S: AsRef<str>, const N: usize> PartialEq<[S; N]> for Record {
    fn eq(&self, other: &[S; N]) -> bool {
        *self == other[..]
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl IntoIterator for Record {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_access() {
        let record = Record::from(vec!["a", "", "c"]);
        assert_eq!(record.len(), 3);
        assert_eq!(record.get(1), Some(""));
        assert_eq!(record.get(3), None);
        assert_eq!(&record[2], "c");
        assert_eq!(record.iter().collect::<Vec<_>>(), vec!["a", "", "c"]);
    }

    #[test]
    fn test_record_compares_with_arrays() {
        let record = Record::from(vec!["x", "y"]);
        assert_eq!(record, ["x", "y"]);
        assert_ne!(record, ["x"]);
        assert!(Record::new().is_empty());
    }

    #[test]
    fn test_record_display_and_iteration() {
        let record = Record::from(vec!["a".to_string(), "b c".to_string()]);
        assert_eq!(record.to_string(), r#"["a", "b c"]"#);
        assert_eq!(record.fields(), ["a", "b c"]);

        let borrowed: Vec<&String> = (&record).into_iter().collect();
        assert_eq!(borrowed, ["a", "b c"]);

        let mut joined = String::new();
        for field in record.clone() {
            joined.push_str(&field);
        }
        assert_eq!(joined, "ab c");

        let fields: Vec<String> = record.into();
        assert_eq!(fields, vec!["a", "b c"]);
    }
}
