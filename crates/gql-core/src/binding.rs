//! Binding variables and late binding of placeholder values.

use std::collections::HashMap;

use crate::ast::Value;

/// An error raised when a binding variable cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// No value was registered under the given name.
    #[error("no bind value: name={0}")]
    MissingNamed(String),

    /// The given index is out of range of the indexed values.
    #[error("no bind value: index={0}")]
    MissingIndexed(i64),
}

/// A `@N` or `@name` placeholder referenced by a query.
///
/// Indexed bindings are 1-based; index 0 is rejected by the lexer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindingVariable {
    Indexed(i64),
    Named(String),
}

/// Holds the concrete values substituted for binding variables after
/// parsing.
#[derive(Debug, Clone, Default)]
pub struct BindingResolver {
    /// Values for `@1`, `@2`, … — `indexed[0]` answers `@1`.
    pub indexed: Vec<Value>,
    /// Values for `@name` placeholders.
    pub named: HashMap<String, Value>,
}

impl BindingResolver {
    /// Resolves a binding variable to its concrete value.
    ///
    /// # Errors
    ///
    /// Returns [`BindError`] if no value is registered for the variable.
    pub fn resolve(&self, variable: &BindingVariable) -> Result<Value, BindError> {
        match variable {
            BindingVariable::Named(name) => self
                .named
                .get(name)
                .cloned()
                .ok_or_else(|| BindError::MissingNamed(name.clone())),
            BindingVariable::Indexed(index) => {
                let slot = usize::try_from(*index)
                    .ok()
                    .filter(|i| *i >= 1)
                    .and_then(|i| self.indexed.get(i - 1));
                slot.cloned().ok_or(BindError::MissingIndexed(*index))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_named() {
        let mut resolver = BindingResolver::default();
        resolver
            .named
            .insert("name".to_string(), Value::String("John".to_string()));

        let got = resolver
            .resolve(&BindingVariable::Named("name".to_string()))
            .unwrap();
        assert_eq!(got, Value::String("John".to_string()));
    }

    #[test]
    fn test_resolve_named_missing() {
        let resolver = BindingResolver::default();
        let err = resolver
            .resolve(&BindingVariable::Named("nope".to_string()))
            .unwrap_err();
        assert_eq!(err, BindError::MissingNamed("nope".to_string()));
    }

    #[test]
    fn test_resolve_indexed_is_one_based() {
        let resolver = BindingResolver {
            indexed: vec![Value::Integer(10), Value::Integer(20)],
            named: HashMap::new(),
        };
        assert_eq!(
            resolver.resolve(&BindingVariable::Indexed(1)).unwrap(),
            Value::Integer(10)
        );
        assert_eq!(
            resolver.resolve(&BindingVariable::Indexed(2)).unwrap(),
            Value::Integer(20)
        );
    }

    #[test]
    fn test_resolve_indexed_out_of_range() {
        let resolver = BindingResolver {
            indexed: vec![Value::Integer(10)],
            named: HashMap::new(),
        };
        assert_eq!(
            resolver.resolve(&BindingVariable::Indexed(2)).unwrap_err(),
            BindError::MissingIndexed(2)
        );
        assert_eq!(
            resolver.resolve(&BindingVariable::Indexed(0)).unwrap_err(),
            BindError::MissingIndexed(0)
        );
    }

    #[test]
    fn test_resolve_empty_resolver() {
        let resolver = BindingResolver::default();
        assert!(resolver.resolve(&BindingVariable::Indexed(1)).is_err());
        assert!(resolver
            .resolve(&BindingVariable::Named("x".to_string()))
            .is_err());
    }
}
