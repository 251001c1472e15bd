//! The table: column registry, row storage, and derived tables

use std::io::Write;

use tracing::{debug, trace};

use super::row::{Row, SharedRow, Value};
use super::schema::{ColumnKind, Schema};
use crate::error::{Result, TableError};
use crate::export::{ExportFormat, ExporterFactory};

/// An in-memory table of typed columns and shared rows
#[derive(Debug, Clone, Default)]
pub struct Table {
    schema: Schema,
    rows: Vec<SharedRow>,
}

impl Table {
    /// Create an empty table with no columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with the given columns
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Declare a column.
    ///
    /// Re-declaring an existing column replaces its kind in place. Rows already
    /// in the table are not checked against the new kind.
    pub fn add_column(&mut self, name: impl Into<String>, kind: ColumnKind) {
        let name = name.into();
        if let Some(previous) = self.schema.declare(name.clone(), kind) {
            if previous != kind {
                debug!(column = %name, %previous, %kind, "column kind redeclared");
            }
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.schema.contains(name)
    }

    /// Declared kind of a column
    pub fn column_type(&self, name: &str) -> Result<ColumnKind> {
        self.schema
            .kind(name)
            .ok_or_else(|| TableError::NotFound(name.to_string()))
    }

    pub fn columns_count(&self) -> usize {
        self.schema.len()
    }

    pub fn rows_count(&self) -> usize {
        self.rows.len()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> Vec<&str> {
        self.schema.names().collect()
    }

    /// Rows in table order
    pub fn rows(&self) -> impl Iterator<Item = &SharedRow> {
        self.rows.iter()
    }

    /// Create an empty row to be filled and inserted into this table
    pub fn create_row(&self) -> Row {
        Row::new()
    }

    /// Validate a row against the declared kinds and append it
    pub fn insert_row(&mut self, row: impl Into<SharedRow>) -> Result<()> {
        let row = row.into();
        self.check_row_compatibility(&row.borrow())?;
        trace!(index = self.rows.len(), "row appended");
        self.rows.push(row);
        Ok(())
    }

    /// Validate a row and insert it at `index`, shifting later rows back.
    ///
    /// `index` may equal the row count, which appends.
    pub fn insert_row_at(&mut self, row: impl Into<SharedRow>, index: usize) -> Result<()> {
        if index > self.rows.len() {
            return Err(TableError::IndexOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        let row = row.into();
        self.check_row_compatibility(&row.borrow())?;
        trace!(index, "row inserted");
        self.rows.insert(index, row);
        Ok(())
    }

    /// Handle to the row at `index`
    pub fn get_row(&self, index: usize) -> Result<SharedRow> {
        self.rows
            .get(index)
            .cloned()
            .ok_or(TableError::IndexOutOfRange {
                index,
                len: self.rows.len(),
            })
    }

    /// Handle to the last row
    pub fn last_row(&self) -> Result<SharedRow> {
        self.rows.last().cloned().ok_or(TableError::IndexOutOfRange {
            index: 0,
            len: 0,
        })
    }

    fn check_row_compatibility(&self, row: &Row) -> Result<()> {
        for (column, expected) in self.schema.iter() {
            if let Some(value) = row.get_value(column) {
                if value.kind() != expected {
                    return Err(TableError::TypeMismatch {
                        column: column.to_string(),
                        expected,
                        actual: value.kind(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Table with the same schema holding the given rows
    fn derive(&self, rows: Vec<SharedRow>) -> Table {
        Table {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Rows whose value for `column` equals `value`, in table order.
    ///
    /// Rows without a value for `column` never match. The result shares its
    /// rows with this table.
    pub fn filter_equal(&self, column: &str, value: impl Into<Value>) -> Table {
        let value = value.into();
        let rows: Vec<SharedRow> = self
            .rows
            .iter()
            .filter(|row| row.borrow().get_value(column) == Some(&value))
            .cloned()
            .collect();
        debug!(
            column,
            %value,
            matched = rows.len(),
            total = self.rows.len(),
            "filtered table"
        );
        self.derive(rows)
    }

    /// Rows ordered by the integer `column`, smallest first. Ties keep their
    /// relative order.
    pub fn sort_ascending(&self, column: &str) -> Result<Table> {
        let rows = self.sorted_rows(column)?;
        debug!(column, rows = rows.len(), "sorted table ascending");
        Ok(self.derive(rows))
    }

    /// Exact reverse of [`Table::sort_ascending`]
    pub fn sort_descending(&self, column: &str) -> Result<Table> {
        let mut rows = self.sorted_rows(column)?;
        rows.reverse();
        debug!(column, rows = rows.len(), "sorted table descending");
        Ok(self.derive(rows))
    }

    fn sorted_rows(&self, column: &str) -> Result<Vec<SharedRow>> {
        let kind = self.column_type(column)?;
        if kind != ColumnKind::Integer {
            return Err(TableError::UnsupportedSort {
                column: column.to_string(),
                kind,
            });
        }

        let mut keyed = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| match row.borrow().get_value(column) {
                Some(Value::Integer(key)) => Ok((*key, row.clone())),
                Some(other) => Err(TableError::value(
                    column,
                    format!("row {} holds a {} value", index, other.kind()),
                )),
                None => Err(TableError::value(
                    column,
                    format!("row {} has no value", index),
                )),
            })
            .collect::<Result<Vec<_>>>()?;

        // sort_by_key is stable
        keyed.sort_by_key(|(key, _)| *key);

        Ok(keyed.into_iter().map(|(_, row)| row).collect())
    }

    /// Render the table in the given format
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(format, &mut buffer)?;
        // Exporters only write `str` data, so the buffer is always UTF-8
        String::from_utf8(buffer)
            .map_err(|e| TableError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    /// Render the table in the given format into a writer
    pub fn write_to(&self, format: ExportFormat, writer: &mut dyn Write) -> Result<()> {
        debug!(%format, rows = self.rows.len(), "exporting table");
        let exporter = ExporterFactory::create(format);
        exporter.render(self, writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Table {
        let mut table = Table::new();
        table.add_column("id", ColumnKind::Integer);
        table.add_column("name", ColumnKind::String);
        for (id, name) in [(3, "Cid"), (1, "Ann"), (2, "Bob"), (1, "Dee")] {
            let row = table.create_row().with_value("id", id).with_value("name", name);
            table.insert_row(row).unwrap();
        }
        table
    }

    fn names(table: &Table) -> Vec<String> {
        table
            .rows()
            .map(|row| row.get_value("name").unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_columns_and_counts() {
        let table = people();
        assert_eq!(table.columns_count(), 2);
        assert_eq!(table.rows_count(), 4);
        assert!(table.has_column("id"));
        assert!(!table.has_column("age"));
        assert_eq!(table.column_type("name").unwrap(), ColumnKind::String);
        assert!(matches!(
            table.column_type("age"),
            Err(TableError::NotFound(name)) if name == "age"
        ));
    }

    #[test]
    fn test_insert_rejects_mismatched_kind_without_mutation() {
        let mut table = people();
        let row = table.create_row().with_value("id", "four");

        let err = table.insert_row(row).unwrap_err();

        assert!(matches!(
            err,
            TableError::TypeMismatch { ref column, expected: ColumnKind::Integer, actual: ColumnKind::String }
                if column == "id"
        ));
        assert_eq!(table.rows_count(), 4);
    }

    #[test]
    fn test_insert_skips_absent_and_undeclared_columns() {
        let mut table = people();
        let row = table.create_row().with_value("name", "Eve").with_value("extra", 9);

        table.insert_row(row).unwrap();

        let last = table.last_row().unwrap();
        assert!(!last.has_value_for("id"));
        assert_eq!(last.get_value("name"), Some(Value::from("Eve")));
    }

    #[test]
    fn test_insert_row_at() {
        let mut table = people();
        table
            .insert_row_at(Row::new().with_value("name", "Zed"), 0)
            .unwrap();
        table
            .insert_row_at(Row::new().with_value("name", "End"), 5)
            .unwrap();

        assert_eq!(names(&table), vec!["Zed", "Cid", "Ann", "Bob", "Dee", "End"]);
        assert!(matches!(
            table.insert_row_at(Row::new(), 7),
            Err(TableError::IndexOutOfRange { index: 7, len: 6 })
        ));
        assert!(matches!(
            table.insert_row_at(Row::new().with_value("id", "x"), 0),
            Err(TableError::TypeMismatch { .. })
        ));
        assert_eq!(table.rows_count(), 6);
    }

    #[test]
    fn test_row_access_bounds() {
        let table = people();
        assert_eq!(table.get_row(1).unwrap().get_value("name"), Some(Value::from("Ann")));
        assert!(matches!(
            table.get_row(4),
            Err(TableError::IndexOutOfRange { index: 4, len: 4 })
        ));
        assert!(matches!(
            Table::new().last_row(),
            Err(TableError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_redeclared_column_is_not_revalidated() {
        let mut table = people();
        table.add_column("id", ColumnKind::String);

        assert_eq!(table.column_type("id").unwrap(), ColumnKind::String);
        assert_eq!(table.column_names(), vec!["id", "name"]);
        assert_eq!(table.rows_count(), 4);
        assert!(table.insert_row(Row::new().with_value("id", 5)).is_err());
    }

    #[test]
    fn test_filter_equal_shares_rows_and_keeps_order() {
        let table = people();
        let filtered = table.filter_equal("id", 1);

        assert_eq!(filtered.column_names(), table.column_names());
        assert_eq!(names(&filtered), vec!["Ann", "Dee"]);
        assert!(filtered.get_row(0).unwrap().ptr_eq(&table.get_row(1).unwrap()));

        table.get_row(1).unwrap().set_value("name", "Anna");
        assert_eq!(
            filtered.get_row(0).unwrap().get_value("name"),
            Some(Value::from("Anna"))
        );
    }

    #[test]
    fn test_filter_equal_compares_strings_by_content() {
        let table = people();
        let needle = String::from("Bo") + "b";
        assert_eq!(table.filter_equal("name", needle).rows_count(), 1);
        assert_eq!(table.filter_equal("name", "bob").rows_count(), 0);
        assert_eq!(table.filter_equal("missing", 1).rows_count(), 0);
    }

    #[test]
    fn test_sort_is_stable_and_descending_reverses() {
        let table = people();

        let ascending = table.sort_ascending("id").unwrap();
        let descending = table.sort_descending("id").unwrap();

        assert_eq!(names(&ascending), vec!["Ann", "Dee", "Bob", "Cid"]);
        assert_eq!(names(&descending), vec!["Cid", "Bob", "Dee", "Ann"]);
        assert_eq!(names(&table), vec!["Cid", "Ann", "Bob", "Dee"]);
    }

    #[test]
    fn test_sort_errors() {
        let mut table = people();
        assert!(matches!(
            table.sort_ascending("name"),
            Err(TableError::UnsupportedSort { kind: ColumnKind::String, .. })
        ));
        assert!(matches!(
            table.sort_descending("age"),
            Err(TableError::NotFound(_))
        ));

        table.insert_row(Row::new().with_value("name", "Nil")).unwrap();
        assert!(matches!(
            table.sort_ascending("id"),
            Err(TableError::Value { ref column, .. }) if column == "id"
        ));
    }

    #[test]
    fn test_sort_rejects_value_mutated_to_wrong_kind() {
        let table = people();
        table.get_row(0).unwrap().set_value("id", "three");
        assert!(matches!(
            table.sort_ascending("id"),
            Err(TableError::Value { .. })
        ));
    }

    #[test]
    fn test_sort_empty_table() {
        let mut table = Table::new();
        table.add_column("n", ColumnKind::Integer);
        assert_eq!(table.sort_ascending("n").unwrap().rows_count(), 0);
    }
}
