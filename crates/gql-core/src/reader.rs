//! Token sources and the resettable reader used for speculative parsing.

use crate::lexer::Token;
use crate::parser::ParseError;

/// A pull-based stream of tokens with single-token pushback.
///
/// The lexer implements this trait, as does any synthetic token source
/// (tests drive the parser with hand-built token vectors). A source is
/// consumed linearly by exactly one parse and must not be shared across
/// threads.
pub trait TokenSource {
    /// Returns true if more tokens are available.
    fn next(&mut self) -> bool;

    /// Reads the next token.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EndOfToken`] when the source is exhausted,
    /// or a lex error for a malformed lexeme.
    fn read(&mut self) -> Result<Token, ParseError>;

    /// Pushes a token back onto the source. Tokens are re-read in LIFO
    /// order.
    fn unread(&mut self, token: Token);
}

/// Reads every remaining token from the source.
///
/// # Errors
///
/// Returns the first lex error encountered.
pub fn read_all_tokens(source: &mut dyn TokenSource) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    while source.next() {
        tokens.push(source.read()?);
    }
    Ok(tokens)
}

/// A reader that records every token read through it so the stream can be
/// rewound to the state it had at construction.
///
/// Wrapping a resettable reader in another resettable reader captures a
/// new rewind point, enabling nested speculation. Dropping a reader
/// without calling [`reset`](Self::reset) commits its reads: the tokens
/// stay consumed and remain recorded by any outer reader they passed
/// through.
pub(crate) struct ResettableTokenReader<'a> {
    source: &'a mut dyn TokenSource,
    history: Vec<Token>,
}

impl<'a> ResettableTokenReader<'a> {
    pub(crate) fn new(source: &'a mut dyn TokenSource) -> Self {
        Self {
            source,
            history: Vec::new(),
        }
    }

    /// Pushes every token read since construction back onto the
    /// underlying source, most recent first, leaving the source
    /// observationally unchanged.
    pub(crate) fn reset(&mut self) {
        while let Some(token) = self.history.pop() {
            self.source.unread(token);
        }
    }

    /// The first token read through this reader, if any.
    pub(crate) fn first_read(&self) -> Option<&Token> {
        self.history.first()
    }
}

impl TokenSource for ResettableTokenReader<'_> {
    fn next(&mut self) -> bool {
        self.source.next()
    }

    fn read(&mut self) -> Result<Token, ParseError> {
        let token = self.source.read()?;
        self.history.push(token.clone());
        Ok(token)
    }

    fn unread(&mut self, token: Token) {
        self.history.pop();
        self.source.unread(token);
    }
}
