//! Cell values, rows, and shared row handles

use std::borrow::Cow;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::schema::ColumnKind;

/// A single typed value stored in a row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Integer(i64),
    String(String),
}

impl Value {
    /// Kind this value satisfies
    pub fn kind(&self) -> ColumnKind {
        match self {
            Value::Integer(_) => ColumnKind::Integer,
            Value::String(_) => ColumnKind::String,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::String(_) => None,
        }
    }

    /// Parse text as a value of the given kind
    pub fn parse_as(kind: ColumnKind, text: &str) -> Result<Value, std::num::ParseIntError> {
        match kind {
            ColumnKind::Integer => text.trim().parse::<i64>().map(Value::Integer),
            ColumnKind::String => Ok(Value::String(text.to_string())),
        }
    }

    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Value::Integer(i) => Cow::Owned(i.to_string()),
            Value::String(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// Values of one row, keyed by column name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    values: FxHashMap<String, Value>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Row::set_value`]
    pub fn with_value(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_value(column, value);
        self
    }

    /// Set the value for a column, replacing any previous one
    pub fn set_value(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }

    pub fn get_value(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn has_value_for(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }
}

/// Reference-counted handle to a row.
///
/// Tables derived by filtering or sorting hold clones of the same handles as
/// their source, so a change made through one handle is seen by every table
/// containing that row. Handles are not `Send`.
#[derive(Debug, Clone, Default)]
pub struct SharedRow(Rc<RefCell<Row>>);

impl SharedRow {
    /// Wrap a row into a new handle
    pub fn new(row: Row) -> Self {
        Self(Rc::new(RefCell::new(row)))
    }

    /// Borrow the underlying row
    pub fn borrow(&self) -> Ref<'_, Row> {
        self.0.borrow()
    }

    /// Copy of the value for a column
    pub fn get_value(&self, column: &str) -> Option<Value> {
        self.0.borrow().get_value(column).cloned()
    }

    /// Set a value on the shared row, visible to every table holding it.
    ///
    /// No kind check happens here; validation only runs on insertion.
    pub fn set_value(&self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.borrow_mut().set_value(column, value);
    }

    pub fn has_value_for(&self, column: &str) -> bool {
        self.0.borrow().has_value_for(column)
    }

    /// Whether both handles point at the same row
    pub fn ptr_eq(&self, other: &SharedRow) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Row> for SharedRow {
    fn from(row: Row) -> Self {
        SharedRow::new(row)
    }
}
