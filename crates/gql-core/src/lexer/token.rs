//! Token types for the GQL lexer.

use crate::binding::BindingVariable;

/// GQL syntax keywords.
///
/// These introduce clauses and literal constructors (`SELECT`, `KEY(…)`,
/// `ARRAY(…)` and so on). Word operators like `AND` or `CONTAINS` are not
/// keywords; they lex as [`Operator`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Select,
    From,
    Where,
    Aggregate,
    Over,
    Count,
    CountUpTo,
    Sum,
    Avg,
    As,
    Distinct,
    On,
    Order,
    By,
    Limit,
    First,
    Offset,
    Key,
    Project,
    Namespace,
    Array,
    Blob,
    Datetime,
    Null,
}

impl Keyword {
    /// Returns the canonical upper-case spelling of the keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Aggregate => "AGGREGATE",
            Self::Over => "OVER",
            Self::Count => "COUNT",
            Self::CountUpTo => "COUNT_UP_TO",
            Self::Sum => "SUM",
            Self::Avg => "AVG",
            Self::As => "AS",
            Self::Distinct => "DISTINCT",
            Self::On => "ON",
            Self::Order => "ORDER",
            Self::By => "BY",
            Self::Limit => "LIMIT",
            Self::First => "FIRST",
            Self::Offset => "OFFSET",
            Self::Key => "KEY",
            Self::Project => "PROJECT",
            Self::Namespace => "NAMESPACE",
            Self::Array => "ARRAY",
            Self::Blob => "BLOB",
            Self::Datetime => "DATETIME",
            Self::Null => "NULL",
        }
    }
}

/// GQL operators, symbolic and word-form.
///
/// The multi-word forms (`NOT IN`, `HAS ANCESTOR`, `HAS DESCENDANT`) are
/// never produced by the lexer directly; the condition parser resolves a
/// `NOT`/`HAS` root followed by its second word into them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    OpenParen,
    CloseParen,
    Comma,
    Equal,
    Dot,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    NotEqual,
    /// A lone `!`. Lexed, but rejected by the parse layer.
    Bang,
    Plus,
    Minus,
    And,
    Or,
    Is,
    Contains,
    Has,
    Ancestor,
    In,
    Not,
    Descendant,
    NotIn,
    HasAncestor,
    HasDescendant,
}

impl Operator {
    /// Returns the canonical spelling of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenParen => "(",
            Self::CloseParen => ")",
            Self::Comma => ",",
            Self::Equal => "=",
            Self::Dot => ".",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::NotEqual => "!=",
            Self::Bang => "!",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Is => "IS",
            Self::Contains => "CONTAINS",
            Self::Has => "HAS",
            Self::Ancestor => "ANCESTOR",
            Self::In => "IN",
            Self::Not => "NOT",
            Self::Descendant => "DESCENDANT",
            Self::NotIn => "NOT IN",
            Self::HasAncestor => "HAS ANCESTOR",
            Self::HasDescendant => "HAS DESCENDANT",
        }
    }
}

/// A run of whitespace (` `, `\t`, `\r`, `\n`).
#[derive(Debug, Clone, PartialEq)]
pub struct WhitespaceToken {
    /// The verbatim whitespace characters.
    pub content: String,
    /// Byte offset of the first character in the source.
    pub position: usize,
}

/// A quoted string.
///
/// Backtick-quoted strings name identifiers (properties, kinds, aliases);
/// single- and double-quoted strings are values.
#[derive(Debug, Clone, PartialEq)]
pub struct StringToken {
    /// The quote byte: `` ` ``, `'` or `"`.
    pub quote: u8,
    /// The decoded content, escapes resolved.
    pub content: String,
    /// The raw lexeme including quotes and escape sequences.
    pub raw: String,
    /// Byte offset of the opening quote in the source.
    pub position: usize,
}

/// A bare identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolToken {
    pub content: String,
    pub position: usize,
}

/// A reserved syntax keyword.
///
/// `name` is always the canonical upper-case keyword; `raw` preserves the
/// source casing.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordToken {
    pub name: Keyword,
    pub raw: String,
    pub position: usize,
}

/// A symbolic or word operator.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorToken {
    pub op: Operator,
    /// The raw lexeme, stored only when it differs from the canonical
    /// spelling (word operators preserve source casing).
    pub raw: Option<String>,
    pub position: usize,
}

impl OperatorToken {
    /// Creates an operator token whose raw form equals the canonical one.
    #[must_use]
    pub const fn new(op: Operator, position: usize) -> Self {
        Self {
            op,
            raw: None,
            position,
        }
    }
}

/// The `*` wildcard.
#[derive(Debug, Clone, PartialEq)]
pub struct WildcardToken {
    pub position: usize,
}

/// A `TRUE`/`FALSE` literal, matched case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanToken {
    pub value: bool,
    pub raw: String,
    pub position: usize,
}

/// An `ASC`/`DESC` ordering direction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderToken {
    pub descending: bool,
    pub raw: String,
    pub position: usize,
}

/// The numeric payload of a [`NumericToken`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    Integer(i64),
    Float(f64),
}

/// A numeric literal. The sign is part of the literal unless the lexer
/// disambiguated a lone `+` into an operator.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericToken {
    pub value: NumericValue,
    pub raw: String,
    pub position: usize,
}

impl NumericToken {
    /// Returns true if the literal contained a decimal point.
    #[must_use]
    pub const fn is_floating(&self) -> bool {
        matches!(self.value, NumericValue::Float(_))
    }

    /// Returns the integer payload, or `None` for a floating literal.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self.value {
            NumericValue::Integer(n) => Some(n),
            NumericValue::Float(_) => None,
        }
    }
}

/// A `@N` or `@name` binding placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingToken {
    /// The referenced variable: an index (always ≥ 1) or a name.
    pub variable: BindingVariable,
    pub position: usize,
}

/// A lexical token with its byte position in the source string.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Whitespace(WhitespaceToken),
    String(StringToken),
    Symbol(SymbolToken),
    Keyword(KeywordToken),
    Operator(OperatorToken),
    Wildcard(WildcardToken),
    Boolean(BooleanToken),
    Order(OrderToken),
    Numeric(NumericToken),
    Binding(BindingToken),
}

impl Token {
    /// Returns the raw text of the token as it appeared in the source.
    ///
    /// Used for diagnostics; concatenating the contents of every token of
    /// a successful lex reproduces the source string.
    #[must_use]
    pub fn content(&self) -> String {
        match self {
            Self::Whitespace(t) => t.content.clone(),
            Self::String(t) => t.raw.clone(),
            Self::Symbol(t) => t.content.clone(),
            Self::Keyword(t) => t.raw.clone(),
            Self::Operator(t) => t
                .raw
                .clone()
                .unwrap_or_else(|| t.op.as_str().to_string()),
            Self::Wildcard(_) => "*".to_string(),
            Self::Boolean(t) => t.raw.clone(),
            Self::Order(t) => t.raw.clone(),
            Self::Numeric(t) => t.raw.clone(),
            Self::Binding(t) => match &t.variable {
                BindingVariable::Indexed(index) => format!("@{index}"),
                BindingVariable::Named(name) => format!("@{name}"),
            },
        }
    }

    /// Returns the zero-based byte offset of the token in the source.
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::Whitespace(t) => t.position,
            Self::String(t) => t.position,
            Self::Symbol(t) => t.position,
            Self::Keyword(t) => t.position,
            Self::Operator(t) => t.position,
            Self::Wildcard(t) => t.position,
            Self::Boolean(t) => t.position,
            Self::Order(t) => t.position,
            Self::Numeric(t) => t.position,
            Self::Binding(t) => t.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_as_str() {
        assert_eq!(Keyword::Select.as_str(), "SELECT");
        assert_eq!(Keyword::CountUpTo.as_str(), "COUNT_UP_TO");
        assert_eq!(Keyword::Datetime.as_str(), "DATETIME");
    }

    #[test]
    fn test_operator_as_str() {
        assert_eq!(Operator::LessOrEqual.as_str(), "<=");
        assert_eq!(Operator::NotIn.as_str(), "NOT IN");
        assert_eq!(Operator::HasDescendant.as_str(), "HAS DESCENDANT");
    }

    #[test]
    fn test_operator_content_prefers_raw() {
        let canonical = Token::Operator(OperatorToken::new(Operator::And, 3));
        assert_eq!(canonical.content(), "AND");

        let cased = Token::Operator(OperatorToken {
            op: Operator::And,
            raw: Some("and".to_string()),
            position: 3,
        });
        assert_eq!(cased.content(), "and");
        assert_eq!(cased.position(), 3);
    }

    #[test]
    fn test_binding_content() {
        let indexed = Token::Binding(BindingToken {
            variable: BindingVariable::Indexed(7),
            position: 0,
        });
        assert_eq!(indexed.content(), "@7");

        let named = Token::Binding(BindingToken {
            variable: BindingVariable::Named("cursor".to_string()),
            position: 0,
        });
        assert_eq!(named.content(), "@cursor");
    }

    #[test]
    fn test_numeric_as_integer() {
        let int = NumericToken {
            value: NumericValue::Integer(42),
            raw: "42".to_string(),
            position: 0,
        };
        assert_eq!(int.as_integer(), Some(42));
        assert!(!int.is_floating());

        let float = NumericToken {
            value: NumericValue::Float(0.5),
            raw: "0.5".to_string(),
            position: 0,
        };
        assert_eq!(float.as_integer(), None);
        assert!(float.is_floating());
    }
}
