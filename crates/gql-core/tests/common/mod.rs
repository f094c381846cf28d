#![allow(dead_code)]

use gql_core::ast::{AggregationQuery, Condition, Key, Property, Query};
use gql_core::{Lexer, ParseError};

pub fn parse_query(source: &str) -> Query {
    gql_core::parse_query(&mut Lexer::new(source))
        .unwrap_or_else(|e| panic!("failed to parse query: {source}\nerror: {e}"))
}

pub fn parse_query_err(source: &str) -> ParseError {
    gql_core::parse_query(&mut Lexer::new(source))
        .expect_err(&format!("expected parse error for: {source}"))
}

pub fn parse_aggregation(source: &str) -> AggregationQuery {
    gql_core::parse_aggregation_query(&mut Lexer::new(source))
        .unwrap_or_else(|e| panic!("failed to parse aggregation query: {source}\nerror: {e}"))
}

pub fn parse_aggregation_err(source: &str) -> ParseError {
    gql_core::parse_aggregation_query(&mut Lexer::new(source))
        .expect_err(&format!("expected parse error for: {source}"))
}

pub fn parse_condition(source: &str) -> Condition {
    gql_core::parse_condition(&mut Lexer::new(source))
        .unwrap_or_else(|e| panic!("failed to parse condition: {source}\nerror: {e}"))
}

pub fn parse_condition_err(source: &str) -> ParseError {
    gql_core::parse_condition(&mut Lexer::new(source))
        .expect_err(&format!("expected parse error for: {source}"))
}

pub fn parse_key(source: &str) -> Key {
    gql_core::parse_key(&mut Lexer::new(source))
        .unwrap_or_else(|e| panic!("failed to parse key: {source}\nerror: {e}"))
}

pub fn parse_key_err(source: &str) -> ParseError {
    gql_core::parse_key(&mut Lexer::new(source))
        .expect_err(&format!("expected parse error for: {source}"))
}

pub fn prop(name: &str) -> Property {
    Property::new(name)
}

/// Builds a dotted property chain from its segments.
pub fn path(segments: &[&str]) -> Property {
    let mut iter = segments.iter();
    let mut property = Property::new(*iter.next().expect("at least one segment"));
    for segment in iter {
        property.append(Property::new(*segment));
    }
    property
}
