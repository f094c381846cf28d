//! A tracing-instrumented token source for debugging parses.

use crate::lexer::Token;
use crate::parser::ParseError;
use crate::reader::TokenSource;

/// Wraps a [`TokenSource`] and emits a `TRACE` event for every
/// operation. Observationally transparent: the wrapped source sees
/// exactly the same calls and the caller exactly the same results.
pub struct DebugTokenSource<S> {
    source: S,
}

impl<S: TokenSource> DebugTokenSource<S> {
    /// Wraps the given source.
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Unwraps back into the underlying source.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: TokenSource> TokenSource for DebugTokenSource<S> {
    fn next(&mut self) -> bool {
        let next = self.source.next();
        tracing::trace!(next, "token source next()");
        next
    }

    fn read(&mut self) -> Result<Token, ParseError> {
        match self.source.read() {
            Ok(token) => {
                tracing::trace!(?token, "token source read()");
                Ok(token)
            }
            Err(e) => {
                tracing::trace!(error = %e, "token source read() failed");
                Err(e)
            }
        }
    }

    fn unread(&mut self, token: Token) {
        tracing::trace!(?token, "token source unread()");
        self.source.unread(token);
    }
}
