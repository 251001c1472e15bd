//! Filter and sort steps driven by a [`Config`]

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{Config, SortOrder};
use crate::model::{Table, Value};

/// Applies the configured filter, then the configured sort
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Derive the output table from a loaded one
    pub fn run(&self, table: &Table) -> Result<Table> {
        let mut output = table.clone();

        if let Some(filter) = &self.config.filter {
            let kind = output.column_type(&filter.column)?;
            let value = Value::parse_as(kind, &filter.value).with_context(|| {
                format!(
                    "Filter value '{}' is not a valid {} for column '{}'",
                    filter.value, kind, filter.column
                )
            })?;
            output = output.filter_equal(&filter.column, value);
            info!(column = %filter.column, rows = output.rows_count(), "filter applied");
        }

        if let Some(column) = &self.config.sort_by {
            output = match self.config.sort_order {
                SortOrder::Ascending => output.sort_ascending(column)?,
                SortOrder::Descending => output.sort_descending(column)?,
            };
            info!(column = %column, order = ?self.config.sort_order, "sort applied");
        }

        Ok(output)
    }
}

/// Convenience function to run a pipeline
pub fn apply(table: &Table, config: &Config) -> Result<Table> {
    Pipeline::new(config.clone()).run(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;
    use crate::model::{ColumnKind, Row};

    fn scores() -> Table {
        let mut table = Table::new();
        table.add_column("score", ColumnKind::Integer);
        table.add_column("team", ColumnKind::String);
        for (score, team) in [(7, "red"), (3, "blue"), (9, "red"), (5, "red")] {
            table
                .insert_row(Row::new().with_value("score", score).with_value("team", team))
                .unwrap();
        }
        table
    }

    #[test]
    fn test_filter_then_sort() {
        let config = Config::default()
            .with_filter("team", "red")
            .with_sort("score", SortOrder::Descending);

        let output = apply(&scores(), &config).unwrap();

        let ordered: Vec<_> = output
            .rows()
            .filter_map(|row| row.get_value("score"))
            .collect();
        assert_eq!(
            ordered,
            vec![Value::from(9), Value::from(7), Value::from(5)]
        );
    }

    #[test]
    fn test_no_steps_keeps_rows() {
        let table = scores();
        let output = apply(&table, &Config::default()).unwrap();
        assert_eq!(output.rows_count(), 4);
        assert!(output.get_row(0).unwrap().ptr_eq(&table.get_row(0).unwrap()));
    }

    #[test]
    fn test_filter_value_parsed_by_column_kind() {
        let output = apply(&scores(), &Config::default().with_filter("score", "3")).unwrap();
        assert_eq!(output.rows_count(), 1);

        assert!(apply(&scores(), &Config::default().with_filter("score", "x")).is_err());

        let err = apply(&scores(), &Config::default().with_filter("age", "1")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TableError>(),
            Some(TableError::NotFound(_))
        ));
    }
}
