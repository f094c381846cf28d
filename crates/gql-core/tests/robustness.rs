//! Property tests: the lexer and parser must never panic, and a
//! successful lex reproduces the source text token-for-token.

use proptest::prelude::*;

use gql_core::{read_all_tokens, Lexer, Token};

/// Well-formed lexemes the grammar can actually meet in any order.
fn lexeme() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "SELECT", "FROM", "WHERE", "ORDER", "BY", "LIMIT", "OFFSET", "FIRST", "DISTINCT", "ON",
        "AGGREGATE", "OVER", "COUNT", "COUNT_UP_TO", "SUM", "AVG", "AS", "KEY", "PROJECT",
        "NAMESPACE", "ARRAY", "BLOB", "DATETIME", "NULL", "AND", "OR", "IS", "CONTAINS", "HAS",
        "ANCESTOR", "DESCENDANT", "NOT", "IN", "TRUE", "FALSE", "ASC", "DESC", "prop", "a", "b",
        "__key__", "`quoted`", "'str'", "\"str\"", "0", "1", "42", "-7", "2.5", "-0.5", "@1",
        "@2", "@name", "=", "!=", "<", "<=", ">", ">=", "(", ")", ",", ".", "*", "+",
    ])
}

proptest! {
    #[test]
    fn lexing_never_panics(source in ".*") {
        let _ = read_all_tokens(&mut Lexer::new(&source));
    }

    #[test]
    fn lexing_is_deterministic(source in ".*") {
        let first = read_all_tokens(&mut Lexer::new(&source));
        let second = read_all_tokens(&mut Lexer::new(&source));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn successful_lex_reproduces_source(source in ".*") {
        if let Ok(tokens) = read_all_tokens(&mut Lexer::new(&source)) {
            let rebuilt: String = tokens.iter().map(Token::content).collect();
            prop_assert_eq!(rebuilt, source);
        }
    }

    #[test]
    fn parsing_arbitrary_text_never_panics(source in ".*") {
        let _ = gql_core::parse_query(&mut Lexer::new(&source));
        let _ = gql_core::parse_condition(&mut Lexer::new(&source));
    }

    #[test]
    fn parsing_token_soup_never_panics(
        lexemes in prop::collection::vec(lexeme(), 0..12),
    ) {
        let source = lexemes.join(" ");
        let _ = gql_core::parse_query(&mut Lexer::new(&source));
        let _ = gql_core::parse_aggregation_query(&mut Lexer::new(&source));
        let _ = gql_core::parse_query_or_aggregation_query(&mut Lexer::new(&source));
        let _ = gql_core::parse_condition(&mut Lexer::new(&source));
        let _ = gql_core::parse_key(&mut Lexer::new(&source));
    }
}
