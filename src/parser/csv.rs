//! CSV file parser

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::model::{ColumnKind, Schema, Table, Value};

use super::Parser;

/// Parser for delimited text, including the table's own CSV export
pub struct CsvParser;

impl Parser for CsvParser {
    fn parse(&self, path: &Path, config: &Config) -> Result<Table> {
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        read_table(BufReader::new(file), config)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "csv" | "tsv" | "txt")
    }
}

/// One non-missing field of a record
struct Field {
    text: String,
    quoted: bool,
}

fn reader_builder(config: &Config) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(config.delimiter)
        .flexible(true);
    builder
}

/// For every record, which fields start with a quote in the raw text.
///
/// Returns `None` when the raw records do not line up with the unquoted ones,
/// which happens when quoted fields contain delimiters or line breaks.
fn quoted_fields(
    input: &str,
    config: &Config,
    records: &[csv::StringRecord],
) -> Option<Vec<Vec<bool>>> {
    let mut raw_reader = reader_builder(config)
        .quoting(false)
        .from_reader(input.as_bytes());
    let flags = raw_reader
        .records()
        .map(|result| {
            let raw = result.ok()?;
            Some(
                raw.iter()
                    .map(|field| field.trim_start().starts_with('"'))
                    .collect::<Vec<_>>(),
            )
        })
        .collect::<Option<Vec<_>>>()?;

    let aligned = flags.len() == records.len()
        && flags.iter().zip(records).all(|(raw, record)| raw.len() == record.len());
    aligned.then_some(flags)
}

fn read_table<R: Read>(mut reader: R, config: &Config) -> Result<Table> {
    let mut input = String::new();
    reader
        .read_to_string(&mut input)
        .context("Failed to read CSV input")?;

    let mut csv_reader = reader_builder(config).from_reader(input.as_bytes());

    // Read headers
    let mut names: Vec<String> = csv_reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|name| name.trim().to_string())
        .collect();

    // A trailing delimiter leaves an empty last header
    if names.last().is_some_and(|name| name.is_empty()) {
        names.pop();
    }

    let raw_records = csv_reader
        .records()
        .enumerate()
        .map(|(line_num, result)| {
            result.with_context(|| format!("Failed to read CSV row {}", line_num + 2)) // +2 for 1-indexing and header
        })
        .collect::<Result<Vec<_>>>()?;
    let quote_flags = quoted_fields(&input, config, &raw_records);

    // Empty unquoted fields are missing values; `""` is an empty string
    let mut records: Vec<Vec<Option<Field>>> = Vec::with_capacity(raw_records.len());
    for (record_idx, record) in raw_records.iter().enumerate() {
        let mut cells: Vec<Option<Field>> = record
            .iter()
            .take(names.len())
            .enumerate()
            .map(|(col_idx, text)| {
                let quoted = quote_flags
                    .as_ref()
                    .is_some_and(|flags| flags[record_idx][col_idx]);
                (quoted || !text.is_empty()).then(|| Field {
                    text: text.to_string(),
                    quoted,
                })
            })
            .collect();
        cells.resize_with(names.len(), || None);
        records.push(cells);
    }

    let schema = resolve_schema(&names, &records, config.schema.as_ref());
    let mut table = Table::with_schema(schema);

    for (line_num, cells) in records.iter().enumerate() {
        let mut row = table.create_row();
        for (name, cell) in names.iter().zip(cells) {
            if let Some(field) = cell {
                let kind = table.column_type(name)?;
                let value = Value::parse_as(kind, &field.text).with_context(|| {
                    format!(
                        "Invalid {} value '{}' for column '{}' on row {}",
                        kind,
                        field.text,
                        name,
                        line_num + 2
                    )
                })?;
                row.set_value(name.as_str(), value);
            }
        }
        table
            .insert_row(row)
            .with_context(|| format!("Failed to insert CSV row {}", line_num + 2))?;
    }

    Ok(table)
}

/// Kinds for the file's columns: declared ones first, then inferred from data.
///
/// Declared columns absent from the file are kept so they still export.
fn resolve_schema(
    names: &[String],
    records: &[Vec<Option<Field>>],
    declared: Option<&Schema>,
) -> Schema {
    let mut schema = Schema::new();
    for (col_idx, name) in names.iter().enumerate() {
        let kind = declared
            .and_then(|s| s.kind(name))
            .unwrap_or_else(|| infer_kind(records.iter().filter_map(|r| r[col_idx].as_ref())));
        schema.declare(name.clone(), kind);
    }
    if let Some(declared) = declared {
        for (name, kind) in declared.iter() {
            if !schema.contains(name) {
                schema.declare(name, kind);
            }
        }
    }
    schema
}

/// Integer when every present value is unquoted and parses as one, otherwise
/// string. A column without any value is a string column.
fn infer_kind<'a>(mut fields: impl Iterator<Item = &'a Field>) -> ColumnKind {
    let mut seen = false;
    let all_integers = fields.all(|field| {
        seen = true;
        !field.quoted && field.text.trim().parse::<i64>().is_ok()
    });
    if seen && all_integers {
        ColumnKind::Integer
    } else {
        ColumnKind::String
    }
}
