//! Scalar and composite values appearing in conditions.

use chrono::{DateTime, FixedOffset};

use crate::binding::BindingVariable;

use super::query::Key;

/// A GQL value: a literal from the source text, or a binding placeholder
/// awaiting resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Bytes decoded from a `BLOB("…")` literal (URL-safe unpadded
    /// base-64 in the source).
    Blob(Vec<u8>),
    /// An RFC 3339 timestamp from a `DATETIME("…")` literal, offset
    /// preserved.
    DateTime(DateTime<FixedOffset>),
    /// An entity key from a `KEY(…)` literal.
    Key(Key),
    /// An `ARRAY(…)` literal; elements may themselves be any value.
    Array(Vec<Value>),
    /// An unresolved `@N` / `@name` placeholder.
    Binding(BindingVariable),
}

impl Value {
    /// Returns true if the value is (or contains) an unresolved binding.
    #[must_use]
    pub fn has_binding(&self) -> bool {
        match self {
            Self::Binding(_) => true,
            Self::Array(values) => values.iter().any(Value::has_binding),
            _ => false,
        }
    }
}
