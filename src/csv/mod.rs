//! CSV utilities for configuring and tokenizing input

mod dialect;
mod parser;
mod rune_source;

pub use dialect::Dialect;
pub use parser::CsvParser;
pub use rune_source::{Position, RuneSource};
