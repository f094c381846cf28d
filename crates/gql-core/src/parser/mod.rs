//! GQL Parser
//!
//! A hand-written parser for Google Cloud Datastore's GQL. The
//! clause-level grammar (`SELECT`/`FROM`/`WHERE`, aggregations, keys,
//! `ORDER BY`, `LIMIT`/`OFFSET`) is recursive descent over token
//! acceptors with speculative backtracking; conditions are parsed by a
//! Pratt (top-down operator precedence) core whose infix tables are
//! split by which side of the operator the property operand sits on.
//!
//! # Entry points
//!
//! | Function | Parses |
//! |----------|--------|
//! | [`parse_query`] | `SELECT … FROM …` projection queries |
//! | [`parse_aggregation_query`] | `SELECT COUNT(*) …` / `AGGREGATE … OVER (…)` |
//! | [`parse_query_or_aggregation_query`] | either of the above |
//! | [`parse_condition`] | a standalone condition |
//! | [`parse_key`] | a standalone `KEY(…)` literal |
//!
//! Every entry point requires the token source to be fully consumed; a
//! trailing token is a diagnostic.
//!
//! ```
//! use gql_core::{parse_query, Lexer};
//!
//! let query = parse_query(&mut Lexer::new("SELECT * FROM Task")).unwrap();
//! assert_eq!(query.kind, "Task");
//! assert!(query.properties.is_empty());
//! ```

mod ast;
mod error;
mod grammar;
mod pratt;

pub use error::ParseError;

use crate::ast::{AggregationQuery, Condition, Key, Query};
use crate::lexer::Keyword;
use crate::reader::{ResettableTokenReader, TokenSource};

/// The result of [`parse_query_or_aggregation_query`]: exactly one of
/// the two query forms.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOrAggregationQuery {
    Query(Query),
    AggregationQuery(AggregationQuery),
}

fn expect_exhausted(ts: &mut dyn TokenSource) -> Result<(), ParseError> {
    if ts.next() {
        let token = ts.read()?;
        return Err(ParseError::unexpected(&token));
    }
    Ok(())
}

/// Parses a projection query.
///
/// # Errors
///
/// Returns a [`ParseError`] if the source is not a single well-formed
/// query consuming every token.
pub fn parse_query(ts: &mut dyn TokenSource) -> Result<Query, ParseError> {
    let mut query = Query::default();
    grammar::accept_query(ts, &mut query)?;
    expect_exhausted(ts)?;
    Ok(query)
}

/// Parses an aggregation query in either surface form.
///
/// # Errors
///
/// Returns a [`ParseError`] if the source is not a single well-formed
/// aggregation query consuming every token.
pub fn parse_aggregation_query(ts: &mut dyn TokenSource) -> Result<AggregationQuery, ParseError> {
    let mut query = AggregationQuery::default();
    grammar::accept_aggregation_query(ts, &mut query)?;
    expect_exhausted(ts)?;
    Ok(query)
}

/// Parses a source that may be either a projection query or an
/// aggregation query.
///
/// The projection form is tried first on a speculative snapshot; a
/// recoverable mismatch rewinds the source and parses it as an
/// aggregation query instead.
///
/// # Errors
///
/// Returns a [`ParseError`] if the source is neither form.
pub fn parse_query_or_aggregation_query(
    ts: &mut dyn TokenSource,
) -> Result<QueryOrAggregationQuery, ParseError> {
    let mut snapshot = ResettableTokenReader::new(ts);
    let mut query = Query::default();
    match grammar::accept_query(&mut snapshot, &mut query)
        .and_then(|()| expect_exhausted(&mut snapshot))
    {
        Ok(()) => return Ok(QueryOrAggregationQuery::Query(query)),
        Err(e) if e.is_recoverable() => snapshot.reset(),
        Err(e) => return Err(e),
    }
    drop(snapshot);

    parse_aggregation_query(ts).map(QueryOrAggregationQuery::AggregationQuery)
}

/// Parses a standalone condition.
///
/// # Errors
///
/// Returns a [`ParseError`] if the source is not a single well-formed
/// condition consuming every token.
pub fn parse_condition(ts: &mut dyn TokenSource) -> Result<Condition, ParseError> {
    let condition = grammar::accept_condition(ts)?;
    expect_exhausted(ts)?;
    Ok(condition)
}

/// Parses a standalone `KEY(…)` literal.
///
/// # Errors
///
/// Returns a [`ParseError`] if the source is not a single well-formed
/// key consuming every token.
pub fn parse_key(ts: &mut dyn TokenSource) -> Result<Key, ParseError> {
    crate::acceptor::expect_keyword(ts, &[Keyword::Key])?;
    let key = grammar::accept_key_body(ts)?;
    expect_exhausted(ts)?;
    Ok(key)
}
