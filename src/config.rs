//! Configuration handling for datatable

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::export::ExportFormat;
use crate::model::{ColumnKind, Schema};

/// Direction of a sort
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

/// Equality filter on one column, value kept as text until the column kind is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub column: String,
    pub value: String,
}

impl std::str::FromStr for FilterSpec {
    type Err = String;

    /// Parse `column=value`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((column, value)) if !column.trim().is_empty() => Ok(FilterSpec {
                column: column.trim().to_string(),
                value: value.to_string(),
            }),
            _ => Err(format!("Invalid filter '{}', expected column=value", s)),
        }
    }
}

/// Parse a schema of the form `id:int,name:string`
pub fn parse_schema(s: &str) -> std::result::Result<Schema, String> {
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| -> std::result::Result<(String, ColumnKind), String> {
            let (name, kind) = part
                .split_once(':')
                .ok_or_else(|| format!("Invalid column '{}', expected name:kind", part))?;
            Ok((name.trim().to_string(), kind.parse::<ColumnKind>()?))
        })
        .collect()
}

/// Read a schema from a JSON object such as `{"id": "integer", "name": "string"}`.
///
/// Column order follows the order of the keys in the file.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open schema file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse schema file: {}", path.display()))
}

/// Configuration for a load, filter, sort and export run
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the input file
    pub input: PathBuf,
    /// Declared columns; inferred from the data when absent
    pub schema: Option<Schema>,
    /// Equality filter applied before sorting
    pub filter: Option<FilterSpec>,
    /// Integer column to sort by
    pub sort_by: Option<String>,
    /// Sort direction
    pub sort_order: SortOrder,
    /// Export format
    pub format: ExportFormat,
    /// Field delimiter of CSV input
    pub delimiter: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            schema: None,
            filter: None,
            sort_by: None,
            sort_order: SortOrder::default(),
            format: ExportFormat::default(),
            delimiter: b';',
        }
    }
}

impl Config {
    /// Create a new Config for an input file
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            ..Default::default()
        }
    }

    /// Declare the input columns explicitly
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Keep only rows whose `column` equals `value`
    pub fn with_filter(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter = Some(FilterSpec {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// Sort by an integer column
    pub fn with_sort(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(column.into());
        self.sort_order = order;
        self
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}
