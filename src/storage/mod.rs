//! File system storage operations
//!
//! This module handles local delimited-text input.

mod csv;

pub use csv::{CsvFileReader, parse_csv};
