//! Error type shared by all table operations

use thiserror::Error;

use crate::model::ColumnKind;

/// Result alias for table operations
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors raised by [`crate::model::Table`] operations
#[derive(Error, Debug)]
pub enum TableError {
    /// A row value disagrees with the declared kind of its column
    #[error("Wrong type for column '{column}': expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: ColumnKind,
        actual: ColumnKind,
    },

    /// Sorting was requested on a column that is not an integer column
    #[error("Only integer columns can be sorted, '{column}' is {kind}")]
    UnsupportedSort { column: String, kind: ColumnKind },

    /// The column is not declared in the table
    #[error("Column '{0}' not found in table")]
    NotFound(String),

    /// Row index outside the table bounds
    #[error("Row index {index} out of range for table with {len} rows")]
    IndexOutOfRange { index: usize, len: usize },

    /// A row cannot provide a usable value for an operation
    #[error("Invalid value for column '{column}': {reason}")]
    Value { column: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TableError {
    pub(crate) fn value(column: &str, reason: impl Into<String>) -> Self {
        TableError::Value {
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}
