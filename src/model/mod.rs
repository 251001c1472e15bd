//! Data model: column kinds, values, rows and tables

mod row;
mod schema;
mod table;

pub use row::{Row, SharedRow, Value};
pub use schema::{ColumnKind, Schema};
pub use table::Table;
