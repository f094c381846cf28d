//! Query, aggregation and key syntax trees.

use std::fmt;

use crate::binding::BindingVariable;

use super::condition::Condition;

/// A (possibly dotted) path into an entity's fields.
///
/// `a.b.c` is a chain of three nodes rooted at `a`; the terminal node has
/// no child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub child: Option<Box<Property>>,
}

impl Property {
    /// Creates a single-segment property.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            child: None,
        }
    }

    /// Appends a chain to the tail of this property path.
    pub fn append(&mut self, child: Property) {
        let mut last = self;
        while let Some(ref mut next) = last.child {
            last = next;
        }
        last.child = Some(Box::new(child));
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        let mut node = &self.child;
        while let Some(child) = node {
            write!(f, ".{}", child.name)?;
            node = &child.child;
        }
        Ok(())
    }
}

/// One `kind, id-or-name` element of a key path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    pub kind: String,
    pub id: KeyPathId,
}

/// The identifier of a key path element: a numeric ID or a name, never
/// both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPathId {
    Id(i64),
    Name(String),
}

/// An entity key produced by a `KEY(…)` literal or `ParseKey`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Key {
    pub project_id: Option<String>,
    pub namespace: Option<String>,
    pub path: Vec<KeyPath>,
}

/// A single `ORDER BY` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub property: Property,
    pub descending: bool,
}

/// A `LIMIT` clause: a position and, in the `LIMIT FIRST (…, …)` form, a
/// cursor binding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Limit {
    pub position: i64,
    pub cursor: Option<BindingVariable>,
}

/// An `OFFSET` clause: a position and optionally a cursor binding
/// (`OFFSET @cursor + n`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Offset {
    pub position: i64,
    pub cursor: Option<BindingVariable>,
}

/// A projection query (`SELECT … FROM …`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    /// Projected properties; empty for `SELECT *`.
    pub properties: Vec<Property>,
    pub distinct: bool,
    pub distinct_on: Vec<Property>,
    pub kind: String,
    pub where_clause: Option<Condition>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<Limit>,
    pub offset: Option<Offset>,
}

/// A single aggregation in an aggregation query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aggregation {
    /// `COUNT(*)`
    Count { alias: Option<String> },
    /// `COUNT_UP_TO(n)`
    CountUpTo { limit: i64, alias: Option<String> },
    /// `SUM(property)`
    Sum { property: String, alias: Option<String> },
    /// `AVG(property)`
    Avg { property: String, alias: Option<String> },
}

/// An aggregation query in either surface form:
/// `SELECT aggregations FROM kind [WHERE …]` or
/// `AGGREGATE aggregations OVER (query)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregationQuery {
    pub aggregations: Vec<Aggregation>,
    pub query: Query,
}
