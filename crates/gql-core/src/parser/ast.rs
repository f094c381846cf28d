//! The intermediate condition tree built by the Pratt parser.
//!
//! Nodes stay partially typed while parsing runs; [`AstNode::to_condition`]
//! lowers the finished tree to the public [`Condition`] type, flipping
//! property-on-the-right comparisons to canonical property-left form.

use chrono::{DateTime, FixedOffset};

use crate::ast::{Condition, Key, Property, Value};
use crate::lexer::{NumericValue, Operator, OperatorToken, Token};

use super::error::ParseError;
use super::pratt::{backward_comparator, either_comparator, forward_comparator};

/// A property reference: a bare symbol or a backtick-quoted string.
#[derive(Debug, Clone)]
pub(crate) struct FieldNode {
    pub name: String,
    /// The originating token, kept for diagnostics.
    pub token: Token,
}

/// A node of the intermediate condition tree.
#[derive(Debug, Clone)]
pub(crate) enum AstNode {
    Field(FieldNode),
    /// `a.b` — both sides are property nodes; lowers to a left-rooted
    /// linked [`Property`] chain.
    FieldAccess {
        left: Box<AstNode>,
        right: Box<AstNode>,
    },
    /// A scalar literal: boolean, non-backtick string, number, `NULL`
    /// or a binding.
    Scalar { value: Value, token: Token },
    /// `KEY(…)`
    KeyLiteral { key: Key, token: Token },
    /// `ARRAY(…)`
    ArrayLiteral { values: Vec<Value>, token: Token },
    /// `BLOB("…")`
    BlobLiteral { bytes: Vec<u8>, token: Token },
    /// `DATETIME("…")`
    DateTimeLiteral {
        at: DateTime<FixedOffset>,
        token: Token,
    },
    /// `+N` or `-N` applied to a numeric literal.
    Prefix {
        op: Operator,
        token: Token,
        operand: NumericValue,
    },
    /// A comparison with the property on the left.
    ForwardCmp {
        left: Box<AstNode>,
        op: Operator,
        op_token: OperatorToken,
        right: Box<AstNode>,
    },
    /// A comparison with the property on the right; symmetric operators
    /// are inverted during lowering.
    BackwardCmp {
        left: Box<AstNode>,
        op: Operator,
        op_token: OperatorToken,
        right: Box<AstNode>,
    },
    /// `AND` / `OR`.
    Compound {
        left: Box<AstNode>,
        op: Operator,
        op_token: OperatorToken,
        right: Box<AstNode>,
    },
}

impl AstNode {
    /// True for nodes that can take the property role of a comparison.
    pub(crate) const fn is_property(&self) -> bool {
        matches!(self, Self::Field(_) | Self::FieldAccess { .. })
    }

    /// True for nodes that can take the value role of a comparison.
    pub(crate) const fn is_value(&self) -> bool {
        matches!(
            self,
            Self::Scalar { .. }
                | Self::KeyLiteral { .. }
                | Self::ArrayLiteral { .. }
                | Self::BlobLiteral { .. }
                | Self::DateTimeLiteral { .. }
                | Self::Prefix { .. }
        )
    }

    /// The earliest token of this subtree, used to anchor diagnostics.
    fn anchor(&self) -> &Token {
        match self {
            Self::Field(field) => &field.token,
            Self::FieldAccess { left, .. } => left.anchor(),
            Self::Scalar { token, .. }
            | Self::KeyLiteral { token, .. }
            | Self::ArrayLiteral { token, .. }
            | Self::BlobLiteral { token, .. }
            | Self::DateTimeLiteral { token, .. }
            | Self::Prefix { token, .. } => token,
            Self::ForwardCmp { left, .. }
            | Self::BackwardCmp { left, .. }
            | Self::Compound { left, .. } => left.anchor(),
        }
    }

    /// Produces an `UnexpectedToken` diagnostic anchored at this node's
    /// earliest token.
    pub(crate) fn unexpected_token_error(&self) -> ParseError {
        ParseError::unexpected(self.anchor())
    }

    /// Extracts the concrete value of a value node.
    ///
    /// Callers must check [`is_value`](Self::is_value) first; the
    /// side-of-operator classification guarantees this at every call
    /// site.
    fn value(&self) -> Value {
        match self {
            Self::Scalar { value, .. } => value.clone(),
            Self::KeyLiteral { key, .. } => Value::Key(key.clone()),
            Self::ArrayLiteral { values, .. } => Value::Array(values.clone()),
            Self::BlobLiteral { bytes, .. } => Value::Blob(bytes.clone()),
            Self::DateTimeLiteral { at, .. } => Value::DateTime(*at),
            Self::Prefix { op, operand, .. } => match (op, operand) {
                (Operator::Minus, NumericValue::Integer(n)) => Value::Integer(n.wrapping_neg()),
                (Operator::Minus, NumericValue::Float(f)) => Value::Float(-f),
                (_, NumericValue::Integer(n)) => Value::Integer(*n),
                (_, NumericValue::Float(f)) => Value::Float(*f),
            },
            _ => unreachable!("value() on a non-value node"),
        }
    }

    /// Builds the property chain of a property node.
    fn to_property(&self) -> Property {
        match self {
            Self::Field(field) => Property::new(field.name.clone()),
            Self::FieldAccess { left, right } => {
                let mut property = left.to_property();
                property.append(right.to_property());
                property
            }
            _ => unreachable!("to_property() on a non-property node"),
        }
    }

    /// Lowers the tree to the public [`Condition`] type.
    ///
    /// # Errors
    ///
    /// Returns an `UnexpectedToken` diagnostic for trees that do not
    /// form a condition (a bare value, a lone property, `IS` with a
    /// non-NULL right-hand side, …).
    pub(crate) fn to_condition(&self) -> Result<Condition, ParseError> {
        match self {
            Self::ForwardCmp {
                left,
                op,
                op_token,
                right,
            } => {
                if let Some(comparator) = either_comparator(*op) {
                    return Ok(Condition::Either {
                        comparator,
                        property: left.to_property(),
                        value: right.value(),
                    });
                }
                if *op == Operator::Is {
                    if right.value() != Value::Null {
                        return Err(right.unexpected_token_error());
                    }
                    return Ok(Condition::IsNull {
                        property: left.to_property(),
                    });
                }
                match forward_comparator(*op) {
                    Some(comparator) => Ok(Condition::Forward {
                        comparator,
                        property: left.to_property(),
                        value: right.value(),
                    }),
                    None => Err(ParseError::unexpected(&Token::Operator(op_token.clone()))),
                }
            }
            Self::BackwardCmp {
                left,
                op,
                op_token,
                right,
            } => {
                if let Some(comparator) = either_comparator(*op) {
                    // Invert to canonical property-left form.
                    return Ok(Condition::Either {
                        comparator: comparator.inverted(),
                        property: right.to_property(),
                        value: left.value(),
                    });
                }
                match backward_comparator(*op) {
                    Some(comparator) => Ok(Condition::Backward {
                        comparator,
                        property: right.to_property(),
                        value: left.value(),
                    }),
                    None => Err(ParseError::unexpected(&Token::Operator(op_token.clone()))),
                }
            }
            Self::Compound {
                left,
                op,
                op_token,
                right,
            } => {
                let left = left.to_condition()?;
                let right = right.to_condition()?;
                match op {
                    Operator::And => Ok(Condition::And {
                        left: Box::new(left),
                        right: Box::new(right),
                    }),
                    Operator::Or => Ok(Condition::Or {
                        left: Box::new(left),
                        right: Box::new(right),
                    }),
                    _ => Err(ParseError::unexpected(&Token::Operator(op_token.clone()))),
                }
            }
            _ => Err(self.unexpected_token_error()),
        }
    }
}
