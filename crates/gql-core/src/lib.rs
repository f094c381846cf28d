//! # gql-core
//!
//! A parser for Google Cloud Datastore's GQL — the SQL-like query
//! language used to express entity queries over Datastore.
//!
//! This crate provides:
//! - A hand-written lexer producing a lazy token stream with
//!   backtracking support
//! - A Pratt condition parser with a side-of-operator discipline: the
//!   same lexeme (`IN`, `HAS …`) routes to a forward or backward
//!   comparator family depending on which operand is the property, and
//!   symmetric comparisons written value-first (`1 = prop`) canonicalize
//!   to property-first form
//! - Acceptor-based grammar for projection queries, aggregation
//!   queries, standalone conditions and entity keys
//! - Late binding of `@N` / `@name` placeholders into a parsed condition
//!
//! ## Parsing a query
//!
//! ```
//! use gql_core::{parse_query, Lexer};
//!
//! let query = parse_query(&mut Lexer::new(
//!     "SELECT a, b FROM Task WHERE done = false ORDER BY priority DESC LIMIT 10",
//! ))
//! .unwrap();
//!
//! assert_eq!(query.kind, "Task");
//! assert_eq!(query.properties.len(), 2);
//! assert!(query.where_clause.is_some());
//! assert_eq!(query.limit.unwrap().position, 10);
//! ```
//!
//! ## Conditions canonicalize the property side
//!
//! ```
//! use gql_core::ast::{Condition, EitherComparator, Value};
//! use gql_core::{parse_condition, Lexer};
//!
//! // The property may sit on either side of a symmetric comparator;
//! // the AST always carries it in `property`.
//! let condition = parse_condition(&mut Lexer::new("1 <= n")).unwrap();
//! assert_eq!(
//!     condition,
//!     Condition::Either {
//!         comparator: EitherComparator::GreaterThanOrEquals,
//!         property: gql_core::ast::Property::new("n"),
//!         value: Value::Integer(1),
//!     }
//! );
//! ```
//!
//! ## Binding placeholders
//!
//! ```
//! use gql_core::ast::Value;
//! use gql_core::{parse_condition, BindingResolver, Lexer};
//!
//! let mut condition = parse_condition(&mut Lexer::new("a = @limit")).unwrap();
//!
//! let mut resolver = BindingResolver::default();
//! resolver.named.insert("limit".to_string(), Value::Integer(100));
//! condition.bind(&resolver).unwrap();
//! ```

mod acceptor;
pub mod ast;
pub mod binding;
pub mod debug;
pub mod lexer;
mod parser;
mod reader;

pub use ast::{AggregationQuery, Condition, Key, Property, Query, Value};
pub use binding::{BindError, BindingResolver, BindingVariable};
pub use debug::DebugTokenSource;
pub use lexer::{Lexer, Token};
pub use parser::{
    parse_aggregation_query, parse_condition, parse_key, parse_query,
    parse_query_or_aggregation_query, ParseError, QueryOrAggregationQuery,
};
pub use reader::{read_all_tokens, TokenSource};
