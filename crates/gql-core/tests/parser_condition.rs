//! Tests for standalone condition parsing.

mod common;
use common::*;

use chrono::DateTime;
use gql_core::ast::{
    BackwardComparator, Condition, EitherComparator, ForwardComparator, Key, KeyPath, KeyPathId,
    Value,
};
use gql_core::BindingVariable;

fn either(comparator: EitherComparator, property: &str, value: Value) -> Condition {
    Condition::Either {
        comparator,
        property: prop(property),
        value,
    }
}

#[test]
fn equals_with_integer() {
    assert_eq!(
        parse_condition("a = 1"),
        either(EitherComparator::Equals, "a", Value::Integer(1))
    );
}

#[test]
fn equals_by_integer_canonicalizes_property_side() {
    assert_eq!(
        parse_condition("1 = a"),
        either(EitherComparator::Equals, "a", Value::Integer(1))
    );
}

#[test]
fn equals_with_signed_integers() {
    assert_eq!(
        parse_condition("a = +1"),
        either(EitherComparator::Equals, "a", Value::Integer(1))
    );
    assert_eq!(
        parse_condition("+1 = a"),
        either(EitherComparator::Equals, "a", Value::Integer(1))
    );
    assert_eq!(
        parse_condition("a = -1"),
        either(EitherComparator::Equals, "a", Value::Integer(-1))
    );
    assert_eq!(
        parse_condition("-1 = a"),
        either(EitherComparator::Equals, "a", Value::Integer(-1))
    );
}

#[test]
fn equals_with_floats() {
    assert_eq!(
        parse_condition("a = 0.5"),
        either(EitherComparator::Equals, "a", Value::Float(0.5))
    );
    assert_eq!(
        parse_condition("0.5 = a"),
        either(EitherComparator::Equals, "a", Value::Float(0.5))
    );
    assert_eq!(
        parse_condition("a = -0.5"),
        either(EitherComparator::Equals, "a", Value::Float(-0.5))
    );
    assert_eq!(
        parse_condition("-0.5 = a"),
        either(EitherComparator::Equals, "a", Value::Float(-0.5))
    );
}

#[test]
fn equals_with_string_boolean_and_bindings() {
    assert_eq!(
        parse_condition("a = 'string'"),
        either(
            EitherComparator::Equals,
            "a",
            Value::String("string".to_string())
        )
    );
    assert_eq!(
        parse_condition("a = true"),
        either(EitherComparator::Equals, "a", Value::Bool(true))
    );
    assert_eq!(
        parse_condition("a = false"),
        either(EitherComparator::Equals, "a", Value::Bool(false))
    );
    assert_eq!(
        parse_condition("a = @1"),
        either(
            EitherComparator::Equals,
            "a",
            Value::Binding(BindingVariable::Indexed(1))
        )
    );
    assert_eq!(
        parse_condition("a = @foo"),
        either(
            EitherComparator::Equals,
            "a",
            Value::Binding(BindingVariable::Named("foo".to_string()))
        )
    );
}

#[test]
fn every_symmetric_comparator() {
    assert_eq!(
        parse_condition("a != 1"),
        either(EitherComparator::NotEquals, "a", Value::Integer(1))
    );
    assert_eq!(
        parse_condition("a > 1"),
        either(EitherComparator::GreaterThan, "a", Value::Integer(1))
    );
    assert_eq!(
        parse_condition("a >= 1"),
        either(EitherComparator::GreaterThanOrEquals, "a", Value::Integer(1))
    );
    assert_eq!(
        parse_condition("a < 1"),
        either(EitherComparator::LessThan, "a", Value::Integer(1))
    );
    assert_eq!(
        parse_condition("a <= 1"),
        either(EitherComparator::LessThanOrEquals, "a", Value::Integer(1))
    );
}

#[test]
fn symmetric_comparators_invert_when_property_is_right() {
    assert_eq!(
        parse_condition("1 < a"),
        either(EitherComparator::GreaterThan, "a", Value::Integer(1))
    );
    assert_eq!(
        parse_condition("1 <= a"),
        either(EitherComparator::GreaterThanOrEquals, "a", Value::Integer(1))
    );
    assert_eq!(
        parse_condition("1 > a"),
        either(EitherComparator::LessThan, "a", Value::Integer(1))
    );
    assert_eq!(
        parse_condition("1 >= a"),
        either(EitherComparator::LessThanOrEquals, "a", Value::Integer(1))
    );
    assert_eq!(
        parse_condition("1 != a"),
        either(EitherComparator::NotEquals, "a", Value::Integer(1))
    );
}

#[test]
fn is_null() {
    assert_eq!(
        parse_condition("a IS NULL"),
        Condition::IsNull { property: prop("a") }
    );
}

#[test]
fn equals_null_value() {
    assert_eq!(
        parse_condition("a = NULL"),
        either(EitherComparator::Equals, "a", Value::Null)
    );
}

#[test]
fn contains() {
    assert_eq!(
        parse_condition("a CONTAINS 1"),
        Condition::Forward {
            comparator: ForwardComparator::Contains,
            property: prop("a"),
            value: Value::Integer(1),
        }
    );
}

#[test]
fn forward_in_with_array() {
    assert_eq!(
        parse_condition("a IN ARRAY(1, 2, 3)"),
        Condition::Forward {
            comparator: ForwardComparator::In,
            property: prop("a"),
            value: Value::Array(vec![
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(3),
            ]),
        }
    );
}

#[test]
fn not_in() {
    assert_eq!(
        parse_condition("a NOT IN ARRAY(2, 3, 4)"),
        Condition::Forward {
            comparator: ForwardComparator::NotIn,
            property: prop("a"),
            value: Value::Array(vec![
                Value::Integer(2),
                Value::Integer(3),
                Value::Integer(4),
            ]),
        }
    );
}

#[test]
fn has_ancestor() {
    assert_eq!(
        parse_condition("__key__ HAS ANCESTOR KEY(Parent, 1000)"),
        Condition::Forward {
            comparator: ForwardComparator::HasAncestor,
            property: prop("__key__"),
            value: Value::Key(Key {
                project_id: None,
                namespace: None,
                path: vec![KeyPath {
                    kind: "Parent".to_string(),
                    id: KeyPathId::Id(1000),
                }],
            }),
        }
    );
}

#[test]
fn has_descendant_is_backward() {
    assert_eq!(
        parse_condition("KEY(Parent, 1000) HAS DESCENDANT __key__"),
        Condition::Backward {
            comparator: BackwardComparator::HasDescendant,
            property: prop("__key__"),
            value: Value::Key(Key {
                project_id: None,
                namespace: None,
                path: vec![KeyPath {
                    kind: "Parent".to_string(),
                    id: KeyPathId::Id(1000),
                }],
            }),
        }
    );
}

#[test]
fn backward_in_with_key_array() {
    let key = |id| {
        Value::Key(Key {
            project_id: None,
            namespace: None,
            path: vec![KeyPath {
                kind: "Kind".to_string(),
                id: KeyPathId::Id(id),
            }],
        })
    };
    assert_eq!(
        parse_condition("ARRAY(KEY(Kind, 1), KEY(Kind, 2), KEY(Kind, 3)) IN __key__"),
        Condition::Backward {
            comparator: BackwardComparator::In,
            property: prop("__key__"),
            value: Value::Array(vec![key(1), key(2), key(3)]),
        }
    );
}

#[test]
fn equals_with_blob() {
    assert_eq!(
        parse_condition(r#"a = BLOB("YmluYXJ5")"#),
        either(
            EitherComparator::Equals,
            "a",
            Value::Blob(b"binary".to_vec())
        )
    );
}

#[test]
fn equals_with_datetime() {
    let at = DateTime::parse_from_rfc3339("2013-09-29T09:30:20.00002-08:00").unwrap();
    assert_eq!(
        parse_condition(r#"a = DATETIME("2013-09-29T09:30:20.00002-08:00")"#),
        either(EitherComparator::Equals, "a", Value::DateTime(at))
    );
}

#[test]
fn array_with_mixed_values() {
    let at = DateTime::parse_from_rfc3339("2013-09-29T09:30:20.00002-08:00").unwrap();
    let source = concat!(
        r#"a = ARRAY(777, -0.25, "foo", true, NULL, @1, @foo, ARRAY(1, 2, 3), "#,
        r#"BLOB("YmluYXJ5"), DATETIME("2013-09-29T09:30:20.00002-08:00"), KEY(Kind, 1))"#,
    );
    assert_eq!(
        parse_condition(source),
        either(
            EitherComparator::Equals,
            "a",
            Value::Array(vec![
                Value::Integer(777),
                Value::Float(-0.25),
                Value::String("foo".to_string()),
                Value::Bool(true),
                Value::Null,
                Value::Binding(BindingVariable::Indexed(1)),
                Value::Binding(BindingVariable::Named("foo".to_string())),
                Value::Array(vec![
                    Value::Integer(1),
                    Value::Integer(2),
                    Value::Integer(3),
                ]),
                Value::Blob(b"binary".to_vec()),
                Value::DateTime(at),
                Value::Key(Key {
                    project_id: None,
                    namespace: None,
                    path: vec![KeyPath {
                        kind: "Kind".to_string(),
                        id: KeyPathId::Id(1),
                    }],
                }),
            ])
        )
    );
}

#[test]
fn and_binds_tighter_than_or() {
    assert_eq!(
        parse_condition("a = 1 OR b = 2 AND c = 3"),
        Condition::Or {
            left: Box::new(either(EitherComparator::Equals, "a", Value::Integer(1))),
            right: Box::new(Condition::And {
                left: Box::new(either(EitherComparator::Equals, "b", Value::Integer(2))),
                right: Box::new(either(EitherComparator::Equals, "c", Value::Integer(3))),
            }),
        }
    );
}

#[test]
fn compounds_are_left_associative() {
    assert_eq!(
        parse_condition("a = 1 AND b = 2 AND c = 3"),
        Condition::And {
            left: Box::new(Condition::And {
                left: Box::new(either(EitherComparator::Equals, "a", Value::Integer(1))),
                right: Box::new(either(EitherComparator::Equals, "b", Value::Integer(2))),
            }),
            right: Box::new(either(EitherComparator::Equals, "c", Value::Integer(3))),
        }
    );
}

#[test]
fn parentheses_group_compounds() {
    assert_eq!(
        parse_condition("(a = 1 OR b = 2) AND c = 3"),
        Condition::And {
            left: Box::new(Condition::Or {
                left: Box::new(either(EitherComparator::Equals, "a", Value::Integer(1))),
                right: Box::new(either(EitherComparator::Equals, "b", Value::Integer(2))),
            }),
            right: Box::new(either(EitherComparator::Equals, "c", Value::Integer(3))),
        }
    );
}

#[test]
fn dotted_property_paths() {
    assert_eq!(
        parse_condition("a.b = 1"),
        Condition::Either {
            comparator: EitherComparator::Equals,
            property: path(&["a", "b"]),
            value: Value::Integer(1),
        }
    );
    assert_eq!(
        parse_condition("user.profile.address = 'x'"),
        Condition::Either {
            comparator: EitherComparator::Equals,
            property: path(&["user", "profile", "address"]),
            value: Value::String("x".to_string()),
        }
    );
}

#[test]
fn backtick_quoted_property() {
    assert_eq!(
        parse_condition("`weird name` = 1"),
        either(EitherComparator::Equals, "weird name", Value::Integer(1))
    );
}

#[test]
fn normalize_contains_matches_equals() {
    let normalized = parse_condition("a CONTAINS 1").normalize();
    assert_eq!(normalized, parse_condition("a = 1"));
}

#[test]
fn normalize_backward_in_matches_equals() {
    let normalized = parse_condition("1 IN a").normalize();
    assert_eq!(normalized, parse_condition("a = 1"));
}

#[test]
fn normalize_has_descendant_matches_has_ancestor() {
    let normalized =
        parse_condition("KEY(Parent, 1) HAS DESCENDANT __key__").normalize();
    assert_eq!(
        normalized,
        parse_condition("__key__ HAS ANCESTOR KEY(Parent, 1)")
    );
}
