//! Semicolon separated export

use std::io::{self, Write};

use crate::model::{ColumnKind, Table};

use super::{Exporter, MISSING_VALUE};

/// Semicolon separated output.
///
/// Every field, including the last, is followed by `;`. Values of string
/// columns are wrapped in double quotes without escaping.
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for CsvExporter {
    fn render(&self, table: &Table, writer: &mut dyn Write) -> io::Result<()> {
        for name in table.schema().names() {
            write!(writer, "{};", name)?;
        }
        writeln!(writer)?;

        for row in table.rows() {
            let row = row.borrow();
            for (name, kind) in table.schema().iter() {
                match (row.get_value(name), kind) {
                    (None, _) => write!(writer, "{};", MISSING_VALUE)?,
                    (Some(value), ColumnKind::String) => write!(writer, "\"{}\";", value)?,
                    (Some(value), ColumnKind::Integer) => write!(writer, "{};", value)?,
                }
            }
            writeln!(writer)?;
        }

        Ok(())
    }
}
