//! JSON array parser

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::config::Config;
use crate::model::{ColumnKind, Schema, Table, Value};

use super::Parser;

/// Parser for JSON arrays of objects
pub struct JsonParser;

impl Parser for JsonParser {
    fn parse(&self, path: &Path, config: &Config) -> Result<Table> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open JSON file: {}", path.display()))?;
        read_table(BufReader::new(file), config)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "json")
    }
}

fn read_table<R: Read>(reader: R, config: &Config) -> Result<Table> {
    let value: JsonValue = serde_json::from_reader(reader).context("Failed to parse JSON file")?;

    // Handle both arrays and single objects
    let array = match value {
        JsonValue::Array(arr) => arr,
        JsonValue::Object(_) => vec![value],
        _ => bail!("JSON must be an array or object"),
    };

    let mut objects = Vec::with_capacity(array.len());
    for (index, item) in array.into_iter().enumerate() {
        match item {
            JsonValue::Object(obj) => objects.push(obj),
            other => bail!("JSON item {} is not an object: {}", index, other),
        }
    }

    // Columns in order of first appearance, kind from the first non-null value
    let mut columns: IndexMap<String, Option<ColumnKind>> = IndexMap::new();
    for obj in &objects {
        for (key, value) in obj {
            let kind = json_kind(value);
            let entry = columns.entry(key.clone()).or_insert(None);
            if entry.is_none() {
                *entry = kind;
            }
        }
    }

    let declared = config.schema.as_ref();
    let mut schema = Schema::new();
    for (name, inferred) in &columns {
        let kind = declared
            .and_then(|s| s.kind(name))
            .or(*inferred)
            .unwrap_or(ColumnKind::String);
        schema.declare(name.clone(), kind);
    }
    if let Some(declared) = declared {
        for (name, kind) in declared.iter() {
            if !schema.contains(name) {
                schema.declare(name, kind);
            }
        }
    }

    let mut table = Table::with_schema(schema);
    for (index, obj) in objects.iter().enumerate() {
        let mut row = table.create_row();
        for (key, value) in obj {
            if let Some(value) = json_value_to_cell(value)
                .with_context(|| format!("Invalid value for '{}' in item {}", key, index))?
            {
                row.set_value(key.as_str(), value);
            }
        }
        table
            .insert_row(row)
            .with_context(|| format!("Failed to insert JSON item {}", index))?;
    }

    Ok(table)
}

fn json_kind(value: &JsonValue) -> Option<ColumnKind> {
    match value {
        JsonValue::Number(n) if n.is_i64() => Some(ColumnKind::Integer),
        JsonValue::String(_) => Some(ColumnKind::String),
        _ => None,
    }
}

/// Null becomes a missing value; only integers and strings are accepted
fn json_value_to_cell(value: &JsonValue) -> Result<Option<Value>> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Ok(Some(Value::Integer(i))),
            None => bail!("only integer numbers are supported, got {}", n),
        },
        JsonValue::String(s) => Ok(Some(Value::String(s.clone()))),
        other => bail!("unsupported JSON value {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_schema;
    use crate::error::TableError;

    fn load(input: &str, config: &Config) -> Result<Table> {
        read_table(input.as_bytes(), config)
    }

    #[test]
    fn test_array_of_objects() {
        let table = load(
            r#"[{"id": 1, "name": "Ann"}, {"name": "Bob", "id": null, "city": "Rio"}]"#,
            &Config::default(),
        )
        .unwrap();

        assert_eq!(table.column_names(), vec!["id", "name", "city"]);
        assert_eq!(table.column_type("id").unwrap(), ColumnKind::Integer);
        assert_eq!(table.rows_count(), 2);
        assert!(!table.get_row(1).unwrap().has_value_for("id"));
        assert_eq!(
            table.last_row().unwrap().get_value("city"),
            Some(Value::from("Rio"))
        );
    }

    #[test]
    fn test_mixed_kinds_are_rejected() {
        let err = load(r#"[{"id": 1}, {"id": "two"}]"#, &Config::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TableError>(),
            Some(TableError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_unsupported_values() {
        assert!(load(r#"[{"ratio": 0.5}]"#, &Config::default()).is_err());
        assert!(load(r#"[{"ok": true}]"#, &Config::default()).is_err());
        assert!(load(r#"[1, 2]"#, &Config::default()).is_err());
        assert!(load(r#""text""#, &Config::default()).is_err());
    }

    #[test]
    fn test_empty_array_keeps_declared_columns() {
        let config = Config::default().with_schema(parse_schema("id:int").unwrap());
        let table = load("[]", &config).unwrap();
        assert_eq!(table.column_names(), vec!["id"]);
        assert_eq!(table.rows_count(), 0);
    }
}
