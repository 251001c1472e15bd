//! Text export of tables

mod csv;
mod html;

use std::io::{self, Write};

use crate::model::Table;

pub use self::csv::CsvExporter;
pub use self::html::HtmlExporter;

/// Text written in place of a value a row does not hold
pub const MISSING_VALUE: &str = "";

/// Export format for tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExportFormat {
    #[default]
    Csv = 0,
    Html = 1,
}

impl ExportFormat {
    /// Numeric selector of this format
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ExportFormat {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ExportFormat::Csv),
            1 => Ok(ExportFormat::Html),
            _ => Err(format!("Unknown export format code: {}", code)),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" | "0" => Ok(ExportFormat::Csv),
            "html" | "1" => Ok(ExportFormat::Html),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Html => write!(f, "html"),
        }
    }
}

/// Trait for table exporters
pub trait Exporter {
    /// Render a table to a writer
    fn render(&self, table: &Table, writer: &mut dyn Write) -> io::Result<()>;
}

/// Factory for creating exporters
pub struct ExporterFactory;

impl ExporterFactory {
    /// Create an exporter for the format
    pub fn create(format: ExportFormat) -> Box<dyn Exporter> {
        match format {
            ExportFormat::Csv => Box::new(CsvExporter::new()),
            ExportFormat::Html => Box::new(HtmlExporter::new()),
        }
    }
}
