//! Condition trees and their comparators.

use crate::binding::{BindError, BindingResolver};

use super::query::Property;
use super::value::Value;

/// A symmetric comparator: accepts the property on either side of the
/// operator and is canonicalized to property-left during lowering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EitherComparator {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEquals,
    GreaterThan,
    GreaterThanOrEquals,
}

impl EitherComparator {
    /// Returns the GQL spelling of the comparator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEquals => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEquals => ">=",
        }
    }

    /// Returns the comparator that expresses the same relation with its
    /// operands swapped (`<` becomes `>`, and so on). Used to
    /// canonicalize comparisons written with the property on the right.
    #[must_use]
    pub const fn inverted(&self) -> Self {
        match self {
            Self::Equals => Self::Equals,
            Self::NotEquals => Self::NotEquals,
            Self::LessThan => Self::GreaterThan,
            Self::LessThanOrEquals => Self::GreaterThanOrEquals,
            Self::GreaterThan => Self::LessThan,
            Self::GreaterThanOrEquals => Self::LessThanOrEquals,
        }
    }
}

/// A comparator whose property operand is on the left
/// (`p CONTAINS v`, `p HAS ANCESTOR k`, `p IN list`, `p NOT IN list`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardComparator {
    Contains,
    HasAncestor,
    In,
    NotIn,
}

impl ForwardComparator {
    /// Returns the GQL spelling of the comparator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "CONTAINS",
            Self::HasAncestor => "HAS ANCESTOR",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
        }
    }
}

/// A comparator whose property operand is on the right
/// (`v IN p`, `k HAS DESCENDANT p`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackwardComparator {
    In,
    HasDescendant,
}

impl BackwardComparator {
    /// Returns the GQL spelling of the comparator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::HasDescendant => "HAS DESCENDANT",
        }
    }
}

/// A `WHERE` condition.
///
/// Comparator conditions always carry the property in `property`, even
/// when the source wrote it on the right of the operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    And {
        left: Box<Condition>,
        right: Box<Condition>,
    },
    Or {
        left: Box<Condition>,
        right: Box<Condition>,
    },
    /// `property IS NULL`
    IsNull { property: Property },
    Either {
        comparator: EitherComparator,
        property: Property,
        value: Value,
    },
    Forward {
        comparator: ForwardComparator,
        property: Property,
        value: Value,
    },
    Backward {
        comparator: BackwardComparator,
        property: Property,
        value: Value,
    },
}

fn bind_value(value: &mut Value, resolver: &BindingResolver) -> Result<(), BindError> {
    match value {
        Value::Binding(variable) => {
            *value = resolver.resolve(variable)?;
            Ok(())
        }
        Value::Array(values) => values
            .iter_mut()
            .try_for_each(|value| bind_value(value, resolver)),
        _ => Ok(()),
    }
}

impl Condition {
    /// Substitutes every binding variable in the tree with its resolved
    /// value, in place.
    ///
    /// # Errors
    ///
    /// Returns [`BindError`] for the first binding the resolver cannot
    /// supply; the tree may be partially bound in that case.
    pub fn bind(&mut self, resolver: &BindingResolver) -> Result<(), BindError> {
        match self {
            Self::And { left, right } | Self::Or { left, right } => {
                left.bind(resolver)?;
                right.bind(resolver)
            }
            Self::IsNull { .. } => Ok(()),
            Self::Either { value, .. }
            | Self::Forward { value, .. }
            | Self::Backward { value, .. } => bind_value(value, resolver),
        }
    }

    /// Rewrites synonym comparators to their canonical form:
    ///
    /// - `p CONTAINS v` becomes `p = v`
    /// - `v IN p` (backward) becomes `p = v`
    /// - `k HAS DESCENDANT p` becomes `p HAS ANCESTOR k`
    ///
    /// Compound conditions are normalized recursively; everything else
    /// is returned unchanged. The operation is idempotent.
    #[must_use]
    pub fn normalize(self) -> Self {
        match self {
            Self::And { left, right } => Self::And {
                left: Box::new(left.normalize()),
                right: Box::new(right.normalize()),
            },
            Self::Or { left, right } => Self::Or {
                left: Box::new(left.normalize()),
                right: Box::new(right.normalize()),
            },
            Self::Forward {
                comparator: ForwardComparator::Contains,
                property,
                value,
            } => Self::Either {
                comparator: EitherComparator::Equals,
                property,
                value,
            },
            Self::Backward {
                comparator: BackwardComparator::In,
                property,
                value,
            } => Self::Either {
                comparator: EitherComparator::Equals,
                property,
                value,
            },
            Self::Backward {
                comparator: BackwardComparator::HasDescendant,
                property,
                value,
            } => Self::Forward {
                comparator: ForwardComparator::HasAncestor,
                property,
                value,
            },
            other => other,
        }
    }
}
