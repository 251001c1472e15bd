//! HTML table export

use std::io::{self, Write};

use crate::model::Table;

use super::{Exporter, MISSING_VALUE};

/// Bare `<table>` output, one `<tr>` per line.
///
/// Cell text is written as is, without HTML escaping.
pub struct HtmlExporter;

impl HtmlExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for HtmlExporter {
    fn render(&self, table: &Table, writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "<table>")?;

        // Header
        write!(writer, "<tr>")?;
        for name in table.schema().names() {
            write!(writer, "<td>{}</td>", name)?;
        }
        writeln!(writer, "</tr>")?;

        // Rows
        for row in table.rows() {
            let row = row.borrow();
            write!(writer, "<tr>")?;
            for name in table.schema().names() {
                match row.get_value(name) {
                    Some(value) => write!(writer, "<td>{}</td>", value)?,
                    None => write!(writer, "<td>{}</td>", MISSING_VALUE)?,
                }
            }
            writeln!(writer, "</tr>")?;
        }

        writeln!(writer, "</table>")?;
        Ok(())
    }
}
