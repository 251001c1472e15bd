//! Loaders that read a whole input file into a table

mod csv;
mod json;

use std::path::Path;

use anyhow::{bail, Result};
use tracing::debug;

use crate::config::Config;
use crate::model::Table;

pub use self::csv::CsvParser;
pub use self::json::JsonParser;

/// Trait for parsing tabular data files
pub trait Parser {
    /// Parse a file and return a Table
    fn parse(&self, path: &Path, config: &Config) -> Result<Table>;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory for creating parsers based on file extension
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all supported parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(CsvParser), Box::new(JsonParser)],
        }
    }

    /// Get a parser for the given file path
    pub fn get_parser(&self, path: &Path) -> Result<&dyn Parser> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        for parser in &self.parsers {
            if parser.supports_extension(&ext) {
                return Ok(parser.as_ref());
            }
        }

        bail!(
            "Unsupported file format: {}",
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
        )
    }

    /// Parse a file using the appropriate parser
    pub fn parse(&self, path: &Path, config: &Config) -> Result<Table> {
        let parser = self.get_parser(path)?;
        let table = parser.parse(path, config)?;
        debug!(
            path = %path.display(),
            columns = table.columns_count(),
            rows = table.rows_count(),
            "loaded table"
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_selection() {
        let factory = ParserFactory::new();
        assert!(factory.get_parser(Path::new("people.CSV")).is_ok());
        assert!(factory.get_parser(Path::new("people.json")).is_ok());
        assert!(factory.get_parser(Path::new("people.xlsx")).is_err());
        assert!(factory.get_parser(Path::new("people")).is_err());
    }
}
