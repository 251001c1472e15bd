//! datatable - In-memory typed tables
//!
//! Tables with integer and string columns, validated row insertion, equality
//! filtering, stable integer sorting, and CSV/HTML export. Filtered and sorted
//! tables share their rows with the table they were derived from.

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod pipeline;

pub use config::Config;
pub use error::{Result, TableError};
pub use export::ExportFormat;
pub use model::{ColumnKind, Row, SharedRow, Table, Value};
