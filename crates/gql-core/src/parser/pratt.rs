//! Pratt (precedence-climbing) parser for conditions.
//!
//! The infix operator tables are split by which side of the operator the
//! property operand sits on. The current left node's variant decides
//! which table is consulted: a value-bearing left admits the symmetric
//! and backward families, a property left admits the symmetric and
//! forward families, and anything else (an already-built comparison)
//! admits only `AND`/`OR`. This is what lets `IN` mean two different
//! things depending on operand side, and what lets `=` commute at the
//! source level while canonicalizing at the AST level.

use crate::ast::{BackwardComparator, EitherComparator, ForwardComparator, Value};
use crate::lexer::{Keyword, Operator, OperatorToken, Token};
use crate::reader::TokenSource;

use super::ast::{AstNode, FieldNode};
use super::error::ParseError;
use super::grammar::{
    accept_array_body, accept_blob_body, accept_datetime_body, accept_key_body,
};
use crate::acceptor::{accept_whitespace, skip_whitespace};
use crate::reader::ResettableTokenReader;

/// Binding power of `AND`/`OR`, selected when the left node is already a
/// comparison.
pub(crate) const fn compound_binding_power(op: Operator) -> u8 {
    match op {
        Operator::And => 2,
        Operator::Or => 1,
        _ => 0,
    }
}

/// Binding power of the symmetric comparators.
pub(crate) const fn either_binding_power(op: Operator) -> u8 {
    match op {
        Operator::Equal
        | Operator::NotEqual
        | Operator::Less
        | Operator::LessOrEqual
        | Operator::Greater
        | Operator::GreaterOrEqual => 3,
        _ => 0,
    }
}

/// Binding power of the property-on-the-left operators. `.` sits here
/// too: between two property nodes it fuses a field access instead of a
/// comparison.
pub(crate) const fn forward_binding_power(op: Operator) -> u8 {
    match op {
        Operator::Contains
        | Operator::HasAncestor
        | Operator::NotIn
        | Operator::In
        | Operator::Is
        | Operator::Dot => 3,
        _ => 0,
    }
}

/// Binding power of the property-on-the-right operators.
pub(crate) const fn backward_binding_power(op: Operator) -> u8 {
    match op {
        Operator::HasDescendant | Operator::In => 3,
        _ => 0,
    }
}

/// Resolves a multi-word operator from its root and the word after it.
pub(crate) const fn resolve_multi_word(root: Operator, next: Operator) -> Option<Operator> {
    match (root, next) {
        (Operator::Not, Operator::In) => Some(Operator::NotIn),
        (Operator::Has, Operator::Ancestor) => Some(Operator::HasAncestor),
        (Operator::Has, Operator::Descendant) => Some(Operator::HasDescendant),
        _ => None,
    }
}

/// Maps a symmetric operator to its comparator.
pub(crate) const fn either_comparator(op: Operator) -> Option<EitherComparator> {
    match op {
        Operator::Equal => Some(EitherComparator::Equals),
        Operator::NotEqual => Some(EitherComparator::NotEquals),
        Operator::Less => Some(EitherComparator::LessThan),
        Operator::LessOrEqual => Some(EitherComparator::LessThanOrEquals),
        Operator::Greater => Some(EitherComparator::GreaterThan),
        Operator::GreaterOrEqual => Some(EitherComparator::GreaterThanOrEquals),
        _ => None,
    }
}

/// Maps a forward-only operator to its comparator.
pub(crate) const fn forward_comparator(op: Operator) -> Option<ForwardComparator> {
    match op {
        Operator::Contains => Some(ForwardComparator::Contains),
        Operator::HasAncestor => Some(ForwardComparator::HasAncestor),
        Operator::In => Some(ForwardComparator::In),
        Operator::NotIn => Some(ForwardComparator::NotIn),
        _ => None,
    }
}

/// Maps a backward-only operator to its comparator.
pub(crate) const fn backward_comparator(op: Operator) -> Option<BackwardComparator> {
    match op {
        Operator::In => Some(BackwardComparator::In),
        Operator::HasDescendant => Some(BackwardComparator::HasDescendant),
        _ => None,
    }
}

/// Parses a condition expression with precedence climbing.
///
/// Reads one prefix form, then loops: speculatively reads an infix
/// operator, consults the side-appropriate binding-power table, and on a
/// power of at least `min_bp` commits the speculation and parses the
/// right operand with `min_bp = bp + 1` (strict left-associativity). A
/// keyword or an operator below `min_bp` rewinds the speculation and
/// ends the expression.
pub(crate) fn construct_ast(
    tr: &mut dyn TokenSource,
    min_bp: u8,
) -> Result<AstNode, ParseError> {
    let token = match tr.read() {
        Err(ParseError::EndOfToken) => return Err(ParseError::NoTokens),
        Err(e) => return Err(e),
        Ok(token) => token,
    };

    let mut left = match token {
        Token::Symbol(sym) => AstNode::Field(FieldNode {
            name: sym.content.clone(),
            token: Token::Symbol(sym),
        }),
        Token::Boolean(b) => AstNode::Scalar {
            value: Value::Bool(b.value),
            token: Token::Boolean(b),
        },
        Token::String(s) if s.quote == b'`' => AstNode::Field(FieldNode {
            name: s.content.clone(),
            token: Token::String(s),
        }),
        Token::String(s) => AstNode::Scalar {
            value: Value::String(s.content.clone()),
            token: Token::String(s),
        },
        Token::Numeric(n) => AstNode::Scalar {
            value: match n.value {
                crate::lexer::NumericValue::Integer(i) => Value::Integer(i),
                crate::lexer::NumericValue::Float(f) => Value::Float(f),
            },
            token: Token::Numeric(n),
        },
        Token::Binding(b) => AstNode::Scalar {
            value: Value::Binding(b.variable.clone()),
            token: Token::Binding(b),
        },
        Token::Operator(op) => parse_prefix_op(tr, op)?,
        Token::Keyword(kw) => match kw.name {
            Keyword::Key => {
                let key = accept_key_body(tr)?;
                AstNode::KeyLiteral {
                    key,
                    token: Token::Keyword(kw),
                }
            }
            Keyword::Array => {
                let values = accept_array_body(tr)?;
                AstNode::ArrayLiteral {
                    values,
                    token: Token::Keyword(kw),
                }
            }
            Keyword::Blob => {
                let bytes = accept_blob_body(tr)?;
                AstNode::BlobLiteral {
                    bytes,
                    token: Token::Keyword(kw),
                }
            }
            Keyword::Datetime => {
                let at = accept_datetime_body(tr)?;
                AstNode::DateTimeLiteral {
                    at,
                    token: Token::Keyword(kw),
                }
            }
            Keyword::Null => AstNode::Scalar {
                value: Value::Null,
                token: Token::Keyword(kw),
            },
            _ => return Err(ParseError::unexpected(&Token::Keyword(kw))),
        },
        other => return Err(ParseError::unexpected(&other)),
    };

    loop {
        let mut snapshot = ResettableTokenReader::new(tr);
        skip_whitespace(&mut snapshot)?;

        let token = match snapshot.read() {
            Err(ParseError::EndOfToken) => return Ok(left),
            Err(e) => return Err(e),
            Ok(token) => token,
        };

        let op_token = match token {
            Token::Operator(op) => op,
            Token::Keyword(_) => {
                // An outer clause (WHERE/ORDER/LIMIT/…) begins here.
                snapshot.reset();
                return Ok(left);
            }
            other => return Err(ParseError::unexpected(&other)),
        };

        // Multi-word operator resolution: NOT IN, HAS ANCESTOR,
        // HAS DESCENDANT.
        let mut op = op_token.op;
        if matches!(op, Operator::Not | Operator::Has) {
            accept_whitespace(&mut snapshot)?;
            let next = match snapshot.read() {
                Err(ParseError::EndOfToken) => {
                    return Err(ParseError::unexpected(&Token::Operator(op_token)))
                }
                Err(e) => return Err(e),
                Ok(token) => token,
            };
            let next_op = match next {
                Token::Operator(t) => t,
                other => return Err(ParseError::unexpected(&other)),
            };
            op = match resolve_multi_word(op, next_op.op) {
                Some(resolved) => resolved,
                None => return Err(ParseError::unexpected(&Token::Operator(next_op))),
            };
        }

        skip_whitespace(&mut snapshot)?;

        // Side-aware binding power selection.
        let allow_backward = left.is_value();
        let allow_forward = left.is_property();
        let allow_compound = !allow_backward && !allow_forward;

        let mut bp = 0;
        let mut is_either = false;
        if allow_backward || allow_forward {
            bp = either_binding_power(op);
            is_either = bp != 0;
        }
        if bp == 0 {
            bp = if allow_compound {
                compound_binding_power(op)
            } else if allow_forward {
                forward_binding_power(op)
            } else {
                backward_binding_power(op)
            };
        }
        if bp == 0 || bp < min_bp {
            snapshot.reset();
            return Ok(left);
        }
        drop(snapshot);

        let right = construct_ast(tr, bp + 1)?;

        left = if is_either {
            if allow_backward {
                if !right.is_property() {
                    return Err(right.unexpected_token_error());
                }
                AstNode::BackwardCmp {
                    left: Box::new(left),
                    op,
                    op_token,
                    right: Box::new(right),
                }
            } else {
                if !right.is_value() {
                    return Err(right.unexpected_token_error());
                }
                AstNode::ForwardCmp {
                    left: Box::new(left),
                    op,
                    op_token,
                    right: Box::new(right),
                }
            }
        } else if allow_compound {
            AstNode::Compound {
                left: Box::new(left),
                op,
                op_token,
                right: Box::new(right),
            }
        } else if allow_forward {
            if op == Operator::Dot {
                // Field-access fusion: a.b builds a property chain, not
                // a comparison.
                if !right.is_property() {
                    return Err(right.unexpected_token_error());
                }
                AstNode::FieldAccess {
                    left: Box::new(left),
                    right: Box::new(right),
                }
            } else {
                if !right.is_value() {
                    return Err(right.unexpected_token_error());
                }
                AstNode::ForwardCmp {
                    left: Box::new(left),
                    op,
                    op_token,
                    right: Box::new(right),
                }
            }
        } else {
            if !right.is_property() {
                return Err(right.unexpected_token_error());
            }
            AstNode::BackwardCmp {
                left: Box::new(left),
                op,
                op_token,
                right: Box::new(right),
            }
        };
    }
}

/// Handles a prefix operator: `(` groups a sub-condition, `+`/`-` sign a
/// numeric literal. Anything else is a diagnostic.
fn parse_prefix_op(
    tr: &mut dyn TokenSource,
    op_token: OperatorToken,
) -> Result<AstNode, ParseError> {
    match op_token.op {
        Operator::OpenParen => {
            skip_whitespace(tr)?;
            let inner = construct_ast(tr, 0)?;
            skip_whitespace(tr)?;
            let close = match tr.read() {
                Err(ParseError::EndOfToken) => {
                    return Err(ParseError::unexpected(&Token::Operator(op_token)))
                }
                Err(e) => return Err(e),
                Ok(token) => token,
            };
            match close {
                Token::Operator(t) if t.op == Operator::CloseParen => Ok(inner),
                _ => Err(ParseError::unexpected(&Token::Operator(op_token))),
            }
        }
        Operator::Plus | Operator::Minus => {
            let next = match tr.read() {
                Err(ParseError::EndOfToken) => {
                    return Err(ParseError::unexpected(&Token::Operator(op_token)))
                }
                Err(e) => return Err(e),
                Ok(token) => token,
            };
            match next {
                Token::Numeric(n) => Ok(AstNode::Prefix {
                    op: op_token.op,
                    token: Token::Operator(op_token),
                    operand: n.value,
                }),
                other => Err(ParseError::unexpected(&other)),
            }
        }
        _ => Err(ParseError::unexpected(&Token::Operator(op_token))),
    }
}
