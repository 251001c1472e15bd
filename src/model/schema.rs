//! Column kinds and the ordered column registry

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Declared value kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    String,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Integer => write!(f, "integer"),
            ColumnKind::String => write!(f, "string"),
        }
    }
}

impl std::str::FromStr for ColumnKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "int" | "integer" => Ok(ColumnKind::Integer),
            "str" | "string" | "text" => Ok(ColumnKind::String),
            _ => Err(format!("Unknown column kind: {}", s)),
        }
    }
}

/// Ordered mapping from column name to kind.
///
/// Re-declaring a column replaces its kind but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    columns: IndexMap<String, ColumnKind>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a column, returning the kind it replaced if it already existed
    pub fn declare(&mut self, name: impl Into<String>, kind: ColumnKind) -> Option<ColumnKind> {
        self.columns.insert(name.into(), kind)
    }

    /// Kind of a declared column
    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        self.columns.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// `(name, kind)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnKind)> {
        self.columns.iter().map(|(name, kind)| (name.as_str(), *kind))
    }
}

impl<S: Into<String>> FromIterator<(S, ColumnKind)> for Schema {
    fn from_iter<I: IntoIterator<Item = (S, ColumnKind)>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for (name, kind) in iter {
            schema.declare(name, kind);
        }
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redeclare_keeps_position() {
        let mut schema = Schema::new();
        schema.declare("id", ColumnKind::Integer);
        schema.declare("name", ColumnKind::String);

        let previous = schema.declare("id", ColumnKind::String);

        assert_eq!(previous, Some(ColumnKind::Integer));
        assert_eq!(schema.kind("id"), Some(ColumnKind::String));
        assert_eq!(schema.names().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("INT".parse::<ColumnKind>(), Ok(ColumnKind::Integer));
        assert_eq!("string".parse::<ColumnKind>(), Ok(ColumnKind::String));
        assert!("float".parse::<ColumnKind>().is_err());
    }
}
