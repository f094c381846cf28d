//! The query, aggregation and key grammar.
//!
//! Every production consumes tokens from a [`TokenSource`] and fails
//! with a recoverable diagnostic on mismatch, letting [`attempt`] rewind
//! optional clauses. Whitespace is explicit: productions consume exactly
//! the whitespace the surface syntax allows.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, FixedOffset};

use crate::acceptor::{
    accept_name, accept_whitespace, accept_wildcard, attempt, expect_keyword, expect_operator,
    next_token, not, skip_whitespace,
};
use crate::ast::{
    Aggregation, AggregationQuery, Condition, Key, KeyPath, KeyPathId, Limit, Offset, OrderBy,
    Property, Query, Value,
};
use crate::lexer::{Keyword, Operator, Token};
use crate::reader::TokenSource;

use super::error::ParseError;
use super::pratt::construct_ast;

/// Parses a condition expression and lowers it to the public type.
pub(crate) fn accept_condition(tr: &mut dyn TokenSource) -> Result<Condition, ParseError> {
    let ast = construct_ast(tr, 0)?;
    ast.to_condition()
}

/// `SELECT [DISTINCT …] properties FROM kind [WHERE …] [ORDER BY …]
/// [LIMIT …] [OFFSET …]`
pub(crate) fn accept_query(tr: &mut dyn TokenSource, query: &mut Query) -> Result<(), ParseError> {
    skip_whitespace(tr)?;
    expect_keyword(tr, &[Keyword::Select])?;
    accept_whitespace(tr)?;

    if attempt(tr, |tr| expect_keyword(tr, &[Keyword::Distinct]))? {
        accept_distinct_body(tr, query)?;
    }
    accept_properties(tr, &mut query.properties, true)?;

    accept_whitespace(tr)?;
    expect_keyword(tr, &[Keyword::From])?;
    accept_whitespace(tr)?;
    query.kind = accept_name(tr)?;

    if attempt(tr, |tr| {
        accept_whitespace(tr)?;
        expect_keyword(tr, &[Keyword::Where])
    })? {
        accept_whitespace(tr)?;
        query.where_clause = Some(accept_condition(tr)?);
    }

    if attempt(tr, |tr| {
        accept_whitespace(tr)?;
        expect_keyword(tr, &[Keyword::Order])?;
        accept_whitespace(tr)?;
        expect_keyword(tr, &[Keyword::By])
    })? {
        accept_whitespace(tr)?;
        accept_order_by_body(tr, &mut query.order_by)?;
    }

    if attempt(tr, |tr| {
        accept_whitespace(tr)?;
        expect_keyword(tr, &[Keyword::Limit])
    })? {
        accept_whitespace(tr)?;
        let mut limit = Limit::default();
        accept_limit_body(tr, &mut limit)?;
        query.limit = Some(limit);
    }

    if attempt(tr, |tr| {
        accept_whitespace(tr)?;
        expect_keyword(tr, &[Keyword::Offset])
    })? {
        accept_whitespace(tr)?;
        let mut offset = Offset::default();
        accept_offset_body(tr, &mut offset)?;
        query.offset = Some(offset);
    }

    skip_whitespace(tr)?;
    Ok(())
}

/// The clause after `DISTINCT`: either `ON (properties)` populating
/// `distinct_on`, or nothing, which sets the `distinct` flag — unless a
/// wildcard follows, which is rejected.
fn accept_distinct_body(tr: &mut dyn TokenSource, query: &mut Query) -> Result<(), ParseError> {
    accept_whitespace(tr)?;
    if attempt(tr, |tr| expect_keyword(tr, &[Keyword::On]))? {
        accept_whitespace(tr)?;
        expect_operator(tr, Operator::OpenParen)?;
        skip_whitespace(tr)?;
        accept_properties(tr, &mut query.distinct_on, false)?;
        skip_whitespace(tr)?;
        expect_operator(tr, Operator::CloseParen)?;
        skip_whitespace(tr)?;
    } else {
        not(tr, accept_wildcard)?;
        query.distinct = true;
    }
    Ok(())
}

/// A `*` (wildcard mode only, clears the list) or a comma-separated list
/// of property names.
fn accept_properties(
    tr: &mut dyn TokenSource,
    properties: &mut Vec<Property>,
    wildcard: bool,
) -> Result<(), ParseError> {
    match next_token(tr)? {
        Token::Wildcard(_) if wildcard => properties.clear(),
        Token::Symbol(s) => properties.push(Property::new(s.content)),
        Token::String(s) if s.quote == b'`' => properties.push(Property::new(s.content)),
        other => return Err(ParseError::unexpected(&other)),
    }
    if attempt(tr, |tr| {
        skip_whitespace(tr)?;
        expect_operator(tr, Operator::Comma)?;
        skip_whitespace(tr)
    })? {
        accept_properties(tr, properties, false)?;
    }
    Ok(())
}

/// `property [ASC|DESC]`, comma-repeated. Ascending when the direction
/// is absent.
fn accept_order_by_body(
    tr: &mut dyn TokenSource,
    order_by: &mut Vec<OrderBy>,
) -> Result<(), ParseError> {
    let property = Property::new(accept_name(tr)?);

    let mut descending = false;
    attempt(tr, |tr| {
        accept_whitespace(tr)?;
        match next_token(tr)? {
            Token::Order(order) => {
                descending = order.descending;
                Ok(())
            }
            other => Err(ParseError::unexpected(&other)),
        }
    })?;
    order_by.push(OrderBy {
        property,
        descending,
    });

    if attempt(tr, |tr| {
        skip_whitespace(tr)?;
        expect_operator(tr, Operator::Comma)?;
        skip_whitespace(tr)
    })? {
        accept_order_by_body(tr, order_by)?;
    }
    Ok(())
}

/// Reads a non-floating numeric token.
fn accept_integer(tr: &mut dyn TokenSource) -> Result<i64, ParseError> {
    match next_token(tr)? {
        Token::Numeric(n) => match n.as_integer() {
            Some(value) => Ok(value),
            None => Err(ParseError::unexpected(&Token::Numeric(n))),
        },
        other => Err(ParseError::unexpected(&other)),
    }
}

/// Either a plain integer position, or `FIRST (position, cursor)` /
/// `FIRST (cursor, position)` — the two forms are distinguished by which
/// side carries the numeric.
fn accept_limit_body(tr: &mut dyn TokenSource, limit: &mut Limit) -> Result<(), ParseError> {
    if attempt(tr, |tr| expect_keyword(tr, &[Keyword::First]))? {
        skip_whitespace(tr)?;
        expect_operator(tr, Operator::OpenParen)?;
        skip_whitespace(tr)?;

        let mut want_cursor = false;
        match next_token(tr)? {
            Token::Numeric(n) => match n.as_integer() {
                Some(position) => {
                    limit.position = position;
                    want_cursor = true;
                }
                None => return Err(ParseError::unexpected(&Token::Numeric(n))),
            },
            Token::Binding(b) => limit.cursor = Some(b.variable),
            other => return Err(ParseError::unexpected(&other)),
        }

        skip_whitespace(tr)?;
        expect_operator(tr, Operator::Comma)?;
        skip_whitespace(tr)?;

        match next_token(tr)? {
            Token::Numeric(n) => match n.as_integer() {
                Some(position) if !want_cursor => limit.position = position,
                _ => return Err(ParseError::unexpected(&Token::Numeric(n))),
            },
            Token::Binding(b) if want_cursor => limit.cursor = Some(b.variable),
            other => return Err(ParseError::unexpected(&other)),
        }

        skip_whitespace(tr)?;
        expect_operator(tr, Operator::CloseParen)?;
        Ok(())
    } else {
        limit.position = accept_integer(tr)?;
        Ok(())
    }
}

/// An integer position, or a cursor binding optionally followed by
/// `+ position` (the `+` form requires the preceding binding).
fn accept_offset_body(tr: &mut dyn TokenSource, offset: &mut Offset) -> Result<(), ParseError> {
    match next_token(tr)? {
        Token::Numeric(n) => match n.as_integer() {
            Some(position) => offset.position = position,
            None => return Err(ParseError::unexpected(&Token::Numeric(n))),
        },
        Token::Binding(b) => offset.cursor = Some(b.variable),
        other => return Err(ParseError::unexpected(&other)),
    }

    if attempt(tr, |tr| {
        skip_whitespace(tr)?;
        expect_operator(tr, Operator::Plus)?;
        skip_whitespace(tr)
    })? {
        match next_token(tr)? {
            Token::Numeric(n) => match n.as_integer() {
                Some(position) if offset.cursor.is_some() => offset.position = position,
                _ => return Err(ParseError::unexpected(&Token::Numeric(n))),
            },
            other => return Err(ParseError::unexpected(&other)),
        }
    }
    Ok(())
}

/// An optional `AS alias` tail after an aggregation.
fn accept_optional_alias(tr: &mut dyn TokenSource) -> Result<Option<String>, ParseError> {
    if attempt(tr, |tr| expect_keyword(tr, &[Keyword::As]))? {
        accept_whitespace(tr)?;
        let alias = accept_name(tr)?;
        skip_whitespace(tr)?;
        Ok(Some(alias))
    } else {
        Ok(None)
    }
}

/// A comma-separated list of `COUNT(*)`, `COUNT_UP_TO(n)`,
/// `SUM(property)`, `AVG(property)`, each with an optional alias.
fn accept_aggregations(
    tr: &mut dyn TokenSource,
    aggregations: &mut Vec<Aggregation>,
) -> Result<(), ParseError> {
    let aggregation = if attempt(tr, |tr| expect_keyword(tr, &[Keyword::Count]))? {
        skip_whitespace(tr)?;
        expect_operator(tr, Operator::OpenParen)?;
        skip_whitespace(tr)?;
        accept_wildcard(tr)?;
        skip_whitespace(tr)?;
        expect_operator(tr, Operator::CloseParen)?;
        skip_whitespace(tr)?;
        Aggregation::Count {
            alias: accept_optional_alias(tr)?,
        }
    } else if attempt(tr, |tr| expect_keyword(tr, &[Keyword::CountUpTo]))? {
        skip_whitespace(tr)?;
        expect_operator(tr, Operator::OpenParen)?;
        skip_whitespace(tr)?;
        let limit = accept_integer(tr)?;
        skip_whitespace(tr)?;
        expect_operator(tr, Operator::CloseParen)?;
        skip_whitespace(tr)?;
        Aggregation::CountUpTo {
            limit,
            alias: accept_optional_alias(tr)?,
        }
    } else if attempt(tr, |tr| expect_keyword(tr, &[Keyword::Sum]))? {
        skip_whitespace(tr)?;
        expect_operator(tr, Operator::OpenParen)?;
        skip_whitespace(tr)?;
        let property = accept_name(tr)?;
        skip_whitespace(tr)?;
        expect_operator(tr, Operator::CloseParen)?;
        skip_whitespace(tr)?;
        Aggregation::Sum {
            property,
            alias: accept_optional_alias(tr)?,
        }
    } else if attempt(tr, |tr| expect_keyword(tr, &[Keyword::Avg]))? {
        skip_whitespace(tr)?;
        expect_operator(tr, Operator::OpenParen)?;
        skip_whitespace(tr)?;
        let property = accept_name(tr)?;
        skip_whitespace(tr)?;
        expect_operator(tr, Operator::CloseParen)?;
        skip_whitespace(tr)?;
        Aggregation::Avg {
            property,
            alias: accept_optional_alias(tr)?,
        }
    } else {
        let token = tr.read()?;
        return Err(ParseError::unexpected(&token));
    };
    aggregations.push(aggregation);

    if attempt(tr, |tr| expect_operator(tr, Operator::Comma))? {
        skip_whitespace(tr)?;
        accept_aggregations(tr, aggregations)?;
    }
    Ok(())
}

/// Either `SELECT aggregations FROM kind [WHERE …]` or
/// `AGGREGATE aggregations OVER (query)`.
pub(crate) fn accept_aggregation_query(
    tr: &mut dyn TokenSource,
    query: &mut AggregationQuery,
) -> Result<(), ParseError> {
    skip_whitespace(tr)?;
    if attempt(tr, |tr| expect_keyword(tr, &[Keyword::Select]))? {
        accept_whitespace(tr)?;
        // The aggregation list consumes its own trailing whitespace.
        accept_aggregations(tr, &mut query.aggregations)?;
        expect_keyword(tr, &[Keyword::From])?;
        accept_whitespace(tr)?;
        query.query.kind = accept_name(tr)?;

        if attempt(tr, |tr| {
            accept_whitespace(tr)?;
            expect_keyword(tr, &[Keyword::Where])
        })? {
            accept_whitespace(tr)?;
            query.query.where_clause = Some(accept_condition(tr)?);
        }
        Ok(())
    } else if attempt(tr, |tr| expect_keyword(tr, &[Keyword::Aggregate]))? {
        accept_whitespace(tr)?;
        accept_aggregations(tr, &mut query.aggregations)?;
        expect_keyword(tr, &[Keyword::Over])?;
        skip_whitespace(tr)?;
        expect_operator(tr, Operator::OpenParen)?;
        accept_query(tr, &mut query.query)?;
        expect_operator(tr, Operator::CloseParen)?;
        skip_whitespace(tr)?;
        Ok(())
    } else {
        let token = tr.read()?;
        Err(ParseError::unexpected(&token))
    }
}

/// Reads a non-backtick string token.
fn accept_string_value(tr: &mut dyn TokenSource) -> Result<String, ParseError> {
    match next_token(tr)? {
        Token::String(s) if s.quote != b'`' => Ok(s.content),
        other => Err(ParseError::unexpected(&other)),
    }
}

/// The parenthesized body of `KEY(…)`: optional `PROJECT("…")` and
/// `NAMESPACE("…")` headers followed by one or more `kind, id-or-name`
/// pairs.
pub(crate) fn accept_key_body(tr: &mut dyn TokenSource) -> Result<Key, ParseError> {
    let mut key = Key::default();
    expect_operator(tr, Operator::OpenParen)?;
    skip_whitespace(tr)?;

    if attempt(tr, |tr| expect_keyword(tr, &[Keyword::Project]))? {
        expect_operator(tr, Operator::OpenParen)?;
        skip_whitespace(tr)?;
        key.project_id = Some(accept_string_value(tr)?);
        skip_whitespace(tr)?;
        expect_operator(tr, Operator::CloseParen)?;
        skip_whitespace(tr)?;
        expect_operator(tr, Operator::Comma)?;
        skip_whitespace(tr)?;
    }

    if attempt(tr, |tr| expect_keyword(tr, &[Keyword::Namespace]))? {
        expect_operator(tr, Operator::OpenParen)?;
        skip_whitespace(tr)?;
        key.namespace = Some(accept_string_value(tr)?);
        skip_whitespace(tr)?;
        expect_operator(tr, Operator::CloseParen)?;
        skip_whitespace(tr)?;
        expect_operator(tr, Operator::Comma)?;
        skip_whitespace(tr)?;
    }

    accept_key_path(tr, &mut key.path)?;
    expect_operator(tr, Operator::CloseParen)?;
    Ok(key)
}

/// One `kind, id-or-name` pair, comma-repeated for ancestor paths.
fn accept_key_path(tr: &mut dyn TokenSource, path: &mut Vec<KeyPath>) -> Result<(), ParseError> {
    let kind = match next_token(tr)? {
        Token::Symbol(s) => s.content,
        other => return Err(ParseError::unexpected(&other)),
    };
    skip_whitespace(tr)?;
    expect_operator(tr, Operator::Comma)?;
    skip_whitespace(tr)?;

    let id = match next_token(tr)? {
        Token::String(s) if s.quote != b'`' => KeyPathId::Name(s.content),
        Token::Numeric(n) => match n.as_integer() {
            Some(id) => KeyPathId::Id(id),
            None => return Err(ParseError::unexpected(&Token::Numeric(n))),
        },
        other => return Err(ParseError::unexpected(&other)),
    };
    skip_whitespace(tr)?;
    path.push(KeyPath { kind, id });

    if attempt(tr, |tr| {
        expect_operator(tr, Operator::Comma)?;
        skip_whitespace(tr)
    })? {
        accept_key_path(tr, path)?;
    }
    Ok(())
}

/// A value inside `ARRAY(…)` or on the value side of a comparison body.
enum ValueNode {
    /// A bare numeric literal; the only thing a sign prefix may apply
    /// to.
    Numeric(Value),
    /// A signed numeric.
    Prefixed(Value),
    /// Any other value form.
    Other(Value),
}

impl ValueNode {
    fn into_value(self) -> Value {
        match self {
            Self::Numeric(value) | Self::Prefixed(value) | Self::Other(value) => value,
        }
    }
}

/// Any condition-value form: scalars, bindings, `NULL`, signed numbers,
/// and the non-scalar `KEY`/`ARRAY`/`BLOB`/`DATETIME` literals
/// (recursively for nested arrays).
fn accept_condition_value(tr: &mut dyn TokenSource) -> Result<ValueNode, ParseError> {
    match next_token(tr)? {
        Token::Operator(op) => {
            if !matches!(op.op, Operator::Plus | Operator::Minus) {
                return Err(ParseError::unexpected(&Token::Operator(op)));
            }
            // Report failures below as the prefix operator being the
            // first unexpected token.
            let op_err = ParseError::unexpected(&Token::Operator(op.clone()));
            let inner = accept_condition_value(tr).map_err(|_| op_err.clone())?;
            match inner {
                ValueNode::Numeric(value) => {
                    let value = match (op.op, value) {
                        (Operator::Minus, Value::Integer(n)) => Value::Integer(n.wrapping_neg()),
                        (Operator::Minus, Value::Float(f)) => Value::Float(-f),
                        (_, value) => value,
                    };
                    Ok(ValueNode::Prefixed(value))
                }
                _ => Err(op_err),
            }
        }
        Token::Boolean(b) => Ok(ValueNode::Other(Value::Bool(b.value))),
        Token::String(s) if s.quote == b'`' => {
            Err(ParseError::unexpected(&Token::String(s)))
        }
        Token::String(s) => Ok(ValueNode::Other(Value::String(s.content))),
        Token::Numeric(n) => Ok(ValueNode::Numeric(match n.value {
            crate::lexer::NumericValue::Integer(i) => Value::Integer(i),
            crate::lexer::NumericValue::Float(f) => Value::Float(f),
        })),
        Token::Binding(b) => Ok(ValueNode::Other(Value::Binding(b.variable))),
        Token::Keyword(kw) => match kw.name {
            Keyword::Key => Ok(ValueNode::Other(Value::Key(accept_key_body(tr)?))),
            Keyword::Array => Ok(ValueNode::Other(Value::Array(accept_array_body(tr)?))),
            Keyword::Blob => Ok(ValueNode::Other(Value::Blob(accept_blob_body(tr)?))),
            Keyword::Datetime => Ok(ValueNode::Other(Value::DateTime(accept_datetime_body(tr)?))),
            Keyword::Null => Ok(ValueNode::Other(Value::Null)),
            _ => Err(ParseError::unexpected(&Token::Keyword(kw))),
        },
        other => Err(ParseError::unexpected(&other)),
    }
}

/// The parenthesized body of `ARRAY(…)`: one or more comma-separated
/// values.
pub(crate) fn accept_array_body(tr: &mut dyn TokenSource) -> Result<Vec<Value>, ParseError> {
    let mut values = Vec::new();
    expect_operator(tr, Operator::OpenParen)?;
    skip_whitespace(tr)?;
    values.push(accept_condition_value(tr)?.into_value());
    skip_whitespace(tr)?;
    if attempt(tr, |tr| expect_operator(tr, Operator::Comma))? {
        accept_more_array_body(tr, &mut values)?;
    }
    expect_operator(tr, Operator::CloseParen)?;
    Ok(values)
}

fn accept_more_array_body(
    tr: &mut dyn TokenSource,
    values: &mut Vec<Value>,
) -> Result<(), ParseError> {
    skip_whitespace(tr)?;
    values.push(accept_condition_value(tr)?.into_value());
    skip_whitespace(tr)?;
    if attempt(tr, |tr| expect_operator(tr, Operator::Comma))? {
        accept_more_array_body(tr, values)?;
    }
    Ok(())
}

/// The parenthesized body of `BLOB(…)`: a string of URL-safe unpadded
/// base-64.
pub(crate) fn accept_blob_body(tr: &mut dyn TokenSource) -> Result<Vec<u8>, ParseError> {
    expect_operator(tr, Operator::OpenParen)?;
    skip_whitespace(tr)?;
    let bytes = match next_token(tr)? {
        Token::String(s) if s.quote != b'`' => {
            let token = Token::String(s.clone());
            URL_SAFE_NO_PAD
                .decode(s.content.as_bytes())
                .map_err(|e| ParseError::unexpected_with(&token, e.to_string()))?
        }
        other => return Err(ParseError::unexpected(&other)),
    };
    skip_whitespace(tr)?;
    expect_operator(tr, Operator::CloseParen)?;
    Ok(bytes)
}

/// The parenthesized body of `DATETIME(…)`: an RFC 3339 timestamp with
/// up to nanosecond precision.
pub(crate) fn accept_datetime_body(
    tr: &mut dyn TokenSource,
) -> Result<DateTime<FixedOffset>, ParseError> {
    expect_operator(tr, Operator::OpenParen)?;
    skip_whitespace(tr)?;
    let at = match next_token(tr)? {
        Token::String(s) if s.quote != b'`' => {
            let token = Token::String(s.clone());
            DateTime::parse_from_rfc3339(&s.content)
                .map_err(|e| ParseError::unexpected_with(&token, e.to_string()))?
        }
        other => return Err(ParseError::unexpected(&other)),
    };
    skip_whitespace(tr)?;
    expect_operator(tr, Operator::CloseParen)?;
    Ok(at)
}
