//! Parse error types.

use crate::lexer::Token;

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(" ({detail})"),
        None => String::new(),
    }
}

/// An error produced by the lexer or the parser.
///
/// The parse layer distinguishes two recoverable conditions —
/// [`UnexpectedToken`](Self::UnexpectedToken) and
/// [`NoTokens`](Self::NoTokens) — which speculative combinators may catch
/// to backtrack. Everything else is fatal and propagates unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The token source is exhausted. Returned by
    /// [`TokenSource::read`](crate::TokenSource::read) when no tokens
    /// remain.
    #[error("end of token")]
    EndOfToken,

    /// The source ran out where the grammar required more input.
    #[error("no tokens")]
    NoTokens,

    /// A token did not match the grammar. Catchable by speculative
    /// combinators for local backtracking.
    #[error("unexpected token: {content} at {position}{}", detail_suffix(.detail))]
    UnexpectedToken {
        /// The raw text of the offending token.
        content: String,
        /// Byte offset of the offending token in the source.
        position: usize,
        /// What was expected instead, or the underlying cause.
        detail: Option<String>,
    },

    /// A lexical failure: unterminated string, dangling `@`, malformed
    /// number, stray escape. Never caught by combinator backtracking.
    #[error("invalid token: {content} at {position}: {message}")]
    InvalidToken {
        /// The raw text of the offending lexeme.
        content: String,
        /// Byte offset of the offending lexeme in the source.
        position: usize,
        /// What went wrong.
        message: String,
    },
}

impl ParseError {
    /// Creates an [`UnexpectedToken`](Self::UnexpectedToken) error
    /// anchored at the given token.
    #[must_use]
    pub fn unexpected(token: &Token) -> Self {
        Self::UnexpectedToken {
            content: token.content(),
            position: token.position(),
            detail: None,
        }
    }

    /// Creates an [`UnexpectedToken`](Self::UnexpectedToken) error with a
    /// description of what was expected or why the token was rejected.
    #[must_use]
    pub fn unexpected_with(token: &Token, detail: impl Into<String>) -> Self {
        Self::UnexpectedToken {
            content: token.content(),
            position: token.position(),
            detail: Some(detail.into()),
        }
    }

    /// Creates an [`InvalidToken`](Self::InvalidToken) lex error.
    #[must_use]
    pub fn invalid(content: impl Into<String>, position: usize, message: impl Into<String>) -> Self {
        Self::InvalidToken {
            content: content.into(),
            position,
            message: message.into(),
        }
    }

    /// Returns true if the error may be caught by a speculative
    /// combinator for backtracking.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnexpectedToken { .. } | Self::NoTokens)
    }
}
