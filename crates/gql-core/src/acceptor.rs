//! Token acceptors: the building blocks of the non-condition grammar.
//!
//! A grammar production is a function that consumes a prefix of tokens
//! from a [`TokenSource`] and either succeeds or fails with one of two
//! recoverable conditions: [`ParseError::UnexpectedToken`] (pattern
//! mismatch) or [`ParseError::NoTokens`] (source exhausted prematurely).
//! Any other error is fatal and propagates. Sequencing is `?`-chaining;
//! speculation is [`attempt`] (if/then/else over a resettable snapshot)
//! and [`not`] (negative lookahead).

use crate::lexer::{Keyword, Operator, Token};
use crate::parser::ParseError;
use crate::reader::{ResettableTokenReader, TokenSource};

/// Reads one token, reporting exhaustion as [`ParseError::NoTokens`].
pub(crate) fn next_token(tr: &mut dyn TokenSource) -> Result<Token, ParseError> {
    match tr.read() {
        Err(ParseError::EndOfToken) => Err(ParseError::NoTokens),
        other => other,
    }
}

/// Consumes one whitespace token if the next token is whitespace.
/// Never fails on mismatch or exhaustion.
pub(crate) fn skip_whitespace(tr: &mut dyn TokenSource) -> Result<(), ParseError> {
    match tr.read() {
        Err(ParseError::EndOfToken) => Ok(()),
        Err(e) => Err(e),
        Ok(Token::Whitespace(_)) => Ok(()),
        Ok(other) => {
            tr.unread(other);
            Ok(())
        }
    }
}

/// Consumes exactly one whitespace token.
pub(crate) fn accept_whitespace(tr: &mut dyn TokenSource) -> Result<(), ParseError> {
    match next_token(tr)? {
        Token::Whitespace(_) => Ok(()),
        other => Err(ParseError::unexpected_with(&other, "expect whitespace")),
    }
}

/// Consumes exactly one `*` token.
pub(crate) fn accept_wildcard(tr: &mut dyn TokenSource) -> Result<(), ParseError> {
    match next_token(tr)? {
        Token::Wildcard(_) => Ok(()),
        other => Err(ParseError::unexpected_with(&other, "expect *")),
    }
}

/// Consumes one keyword token whose name is in the given set.
pub(crate) fn expect_keyword(
    tr: &mut dyn TokenSource,
    keywords: &[Keyword],
) -> Result<(), ParseError> {
    let expectation = || {
        format!(
            "expect to be any of {:?}",
            keywords.iter().map(Keyword::as_str).collect::<Vec<_>>()
        )
    };
    match next_token(tr)? {
        Token::Keyword(t) if keywords.contains(&t.name) => Ok(()),
        other => Err(ParseError::unexpected_with(&other, expectation())),
    }
}

/// Consumes one operator token of the given type.
pub(crate) fn expect_operator(tr: &mut dyn TokenSource, op: Operator) -> Result<(), ParseError> {
    match next_token(tr)? {
        Token::Operator(t) if t.op == op => Ok(()),
        other => Err(ParseError::unexpected_with(
            &other,
            format!("expect to be {:?}", op.as_str()),
        )),
    }
}

/// Consumes a name: a bare symbol or a backtick-quoted string. Used for
/// kind names, property names and aliases.
pub(crate) fn accept_name(tr: &mut dyn TokenSource) -> Result<String, ParseError> {
    match next_token(tr)? {
        Token::Symbol(t) => Ok(t.content),
        Token::String(t) if t.quote == b'`' => Ok(t.content),
        other => Err(ParseError::unexpected(&other)),
    }
}

/// Runs `if_accept` on a speculative snapshot of the reader.
///
/// On success the consumed tokens are committed and `true` is returned;
/// the caller then parses the "then" branch on the same reader. On a
/// recoverable failure the reader is rewound and `false` is returned. A
/// fatal error rewinds and propagates.
pub(crate) fn attempt(
    tr: &mut dyn TokenSource,
    if_accept: impl FnOnce(&mut dyn TokenSource) -> Result<(), ParseError>,
) -> Result<bool, ParseError> {
    let mut snapshot = ResettableTokenReader::new(tr);
    match if_accept(&mut snapshot) {
        Ok(()) => Ok(true),
        Err(e) if e.is_recoverable() => {
            snapshot.reset();
            Ok(false)
        }
        Err(e) => {
            snapshot.reset();
            Err(e)
        }
    }
}

/// Negative lookahead: succeeds iff `acceptor` fails with
/// `UnexpectedToken`. Consumes no tokens either way.
pub(crate) fn not(
    tr: &mut dyn TokenSource,
    acceptor: impl FnOnce(&mut dyn TokenSource) -> Result<(), ParseError>,
) -> Result<(), ParseError> {
    let mut snapshot = ResettableTokenReader::new(tr);
    match acceptor(&mut snapshot) {
        Err(ParseError::UnexpectedToken { .. }) => {
            snapshot.reset();
            Ok(())
        }
        Err(e) => {
            snapshot.reset();
            Err(e)
        }
        Ok(()) => {
            let err = snapshot
                .first_read()
                .map_or(ParseError::NoTokens, ParseError::unexpected);
            snapshot.reset();
            Err(err)
        }
    }
}
