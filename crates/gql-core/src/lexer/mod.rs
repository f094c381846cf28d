//! GQL Lexer/Tokenizer
//!
//! This module provides a hand-written lexer for GQL that produces a lazy
//! stream of tokens with backtracking support.

mod token;
mod tokenizer;

pub use token::{
    BindingToken, BooleanToken, Keyword, KeywordToken, NumericToken, NumericValue, Operator,
    OperatorToken, OrderToken, StringToken, SymbolToken, Token, WhitespaceToken, WildcardToken,
};
pub use tokenizer::Lexer;
