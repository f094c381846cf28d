//! GQL tokenizer implementation.

use crate::binding::BindingVariable;
use crate::parser::ParseError;
use crate::reader::TokenSource;

use super::token::{
    BindingToken, BooleanToken, Keyword, KeywordToken, NumericToken, NumericValue, Operator,
    OperatorToken, OrderToken, StringToken, SymbolToken, Token, WhitespaceToken, WildcardToken,
};

/// A lexer that tokenizes a GQL source string on demand.
///
/// The lexer is a [`TokenSource`]: tokens are produced lazily by
/// [`read`](TokenSource::read), and [`unread`](TokenSource::unread)
/// pushes tokens back onto a LIFO buffer for backtracking.
pub struct Lexer<'a> {
    /// The input source text.
    source: &'a str,
    /// The current byte position.
    position: usize,
    /// Unread tokens, most recent last.
    buffer: Vec<Token>,
}

/// Classification of a reserved word.
#[derive(Debug, Clone, Copy)]
enum Reserved {
    Syntax(Keyword),
    Op(Operator),
    Order { descending: bool },
    Boolean(bool),
}

/// Every reserved word, longest first so that a linear scan yields the
/// longest case-insensitive prefix match (e.g. `COUNT_UP_TO` before
/// `COUNT`, `DESCENDANT` before `DESC`).
const RESERVED: &[(&str, Reserved)] = &[
    ("COUNT_UP_TO", Reserved::Syntax(Keyword::CountUpTo)),
    ("DESCENDANT", Reserved::Op(Operator::Descendant)),
    ("AGGREGATE", Reserved::Syntax(Keyword::Aggregate)),
    ("NAMESPACE", Reserved::Syntax(Keyword::Namespace)),
    ("DISTINCT", Reserved::Syntax(Keyword::Distinct)),
    ("CONTAINS", Reserved::Op(Operator::Contains)),
    ("ANCESTOR", Reserved::Op(Operator::Ancestor)),
    ("DATETIME", Reserved::Syntax(Keyword::Datetime)),
    ("PROJECT", Reserved::Syntax(Keyword::Project)),
    ("SELECT", Reserved::Syntax(Keyword::Select)),
    ("OFFSET", Reserved::Syntax(Keyword::Offset)),
    ("WHERE", Reserved::Syntax(Keyword::Where)),
    ("COUNT", Reserved::Syntax(Keyword::Count)),
    ("ORDER", Reserved::Syntax(Keyword::Order)),
    ("LIMIT", Reserved::Syntax(Keyword::Limit)),
    ("FIRST", Reserved::Syntax(Keyword::First)),
    ("ARRAY", Reserved::Syntax(Keyword::Array)),
    ("FALSE", Reserved::Boolean(false)),
    ("FROM", Reserved::Syntax(Keyword::From)),
    ("OVER", Reserved::Syntax(Keyword::Over)),
    ("NULL", Reserved::Syntax(Keyword::Null)),
    ("BLOB", Reserved::Syntax(Keyword::Blob)),
    ("DESC", Reserved::Order { descending: true }),
    ("TRUE", Reserved::Boolean(true)),
    ("SUM", Reserved::Syntax(Keyword::Sum)),
    ("AVG", Reserved::Syntax(Keyword::Avg)),
    ("AND", Reserved::Op(Operator::And)),
    ("NOT", Reserved::Op(Operator::Not)),
    ("KEY", Reserved::Syntax(Keyword::Key)),
    ("ASC", Reserved::Order { descending: false }),
    ("HAS", Reserved::Op(Operator::Has)),
    ("AS", Reserved::Syntax(Keyword::As)),
    ("ON", Reserved::Syntax(Keyword::On)),
    ("BY", Reserved::Syntax(Keyword::By)),
    ("OR", Reserved::Op(Operator::Or)),
    ("IS", Reserved::Op(Operator::Is)),
    ("IN", Reserved::Op(Operator::In)),
];

/// Finds the longest reserved word that is a case-insensitive prefix of
/// `s`.
fn match_reserved(s: &str) -> Option<(&'static str, Reserved)> {
    RESERVED
        .iter()
        .find(|(word, _)| {
            s.len() >= word.len() && s.as_bytes()[..word.len()].eq_ignore_ascii_case(word.as_bytes())
        })
        .map(|(word, class)| (*word, *class))
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over the given source string.
    #[must_use]
    pub const fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            buffer: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.position..]
    }

    fn take_reserved(&mut self, word: &'static str, class: Reserved) -> Token {
        let position = self.position;
        let raw = self.source[position..position + word.len()].to_string();
        self.position += word.len();
        match class {
            Reserved::Syntax(name) => Token::Keyword(KeywordToken {
                name,
                raw,
                position,
            }),
            Reserved::Op(op) => Token::Operator(OperatorToken {
                op,
                raw: Some(raw),
                position,
            }),
            Reserved::Order { descending } => Token::Order(OrderToken {
                descending,
                raw,
                position,
            }),
            Reserved::Boolean(value) => Token::Boolean(BooleanToken {
                value,
                raw,
                position,
            }),
        }
    }
}

impl TokenSource for Lexer<'_> {
    fn next(&mut self) -> bool {
        !self.buffer.is_empty() || self.position != self.source.len()
    }

    fn read(&mut self) -> Result<Token, ParseError> {
        if let Some(token) = self.buffer.pop() {
            return Ok(token);
        }
        if self.position == self.source.len() {
            return Err(ParseError::EndOfToken);
        }

        match self.source.as_bytes()[self.position] {
            b' ' | b'\t' | b'\r' | b'\n' => {
                let (token, width) = take_whitespace(self.rest(), self.position);
                self.position += width;
                Ok(Token::Whitespace(token))
            }
            b'@' => {
                let (token, width) = take_binding(self.rest(), self.position)?;
                self.position += width;
                Ok(Token::Binding(token))
            }
            b'`' | b'\'' | b'"' => {
                let (token, width) = take_quoted_string(self.rest(), self.position)?;
                self.position += width;
                Ok(Token::String(token))
            }
            b'(' | b',' | b')' | b'=' | b'.' => {
                let op = match self.source.as_bytes()[self.position] {
                    b'(' => Operator::OpenParen,
                    b',' => Operator::Comma,
                    b')' => Operator::CloseParen,
                    b'=' => Operator::Equal,
                    _ => Operator::Dot,
                };
                let token = OperatorToken::new(op, self.position);
                self.position += 1;
                Ok(Token::Operator(token))
            }
            b'<' | b'>' | b'!' => {
                let (token, width) = take_comparison_operator(self.rest(), self.position);
                self.position += width;
                Ok(Token::Operator(token))
            }
            b'*' => {
                let token = WildcardToken {
                    position: self.position,
                };
                self.position += 1;
                Ok(Token::Wildcard(token))
            }
            b'-' | b'+' | b'0'..=b'9' => {
                let (token, width) = take_numeric(self.rest(), self.position)?;
                self.position += width;
                Ok(token)
            }
            _ => {
                if let Some((word, class)) = match_reserved(self.rest()) {
                    Ok(self.take_reserved(word, class))
                } else {
                    let (token, width) = take_symbol(self.rest(), self.position)?;
                    self.position += width;
                    Ok(Token::Symbol(token))
                }
            }
        }
    }

    fn unread(&mut self, token: Token) {
        self.buffer.push(token);
    }
}

const fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// A symbol character: any Unicode letter or digit, `_`, `$`, or a
/// printable non-ASCII character.
fn is_symbol_char(c: char) -> bool {
    c.is_alphabetic() || c.is_numeric() || c == '_' || c == '$' || (!c.is_ascii() && !c.is_control())
}

fn take_whitespace(s: &str, position: usize) -> (WhitespaceToken, usize) {
    let bytes = s.as_bytes();
    let mut width = 1;
    while width < bytes.len() && is_whitespace(bytes[width]) {
        width += 1;
    }
    (
        WhitespaceToken {
            content: s[..width].to_string(),
            position,
        },
        width,
    )
}

fn take_quoted_string(s: &str, position: usize) -> Result<(StringToken, usize), ParseError> {
    let bytes = s.as_bytes();
    let quote = bytes[0];
    let mut ends = 0;
    let mut needs_unescape = false;
    let mut i = 1;
    while i < bytes.len() {
        if bytes[i] == quote {
            ends = i;
            break;
        }
        if bytes[i] == b'\\' {
            i += 1;
            if i == bytes.len() {
                return Err(ParseError::invalid(
                    "\\",
                    position + i - 1,
                    "unterminated escape sequence",
                ));
            }
            needs_unescape = true;
        }
        i += 1;
    }
    if ends == 0 {
        return Err(ParseError::invalid(
            (quote as char).to_string(),
            position,
            "unterminated string",
        ));
    }

    let mut content = s[1..ends].to_string();
    if needs_unescape {
        content = unescape(&content)
            .map_err(|message| ParseError::invalid(&s[..=ends], position, message))?;
    }
    Ok((
        StringToken {
            quote,
            content,
            raw: s[..=ends].to_string(),
            position,
        },
        ends + 1,
    ))
}

/// Decodes the GQL escape set. Any other escape is an error.
fn unescape(s: &str) -> Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('0') => out.push('\u{0000}'),
            Some('b') => out.push('\u{0008}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('Z') => out.push('\u{001A}'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('`') => out.push('`'),
            Some('%') => out.push('%'),
            Some('_') => out.push('_'),
            Some(other) => return Err(format!("unsupported escape sequence: \\{other}")),
            None => return Err("unterminated escape sequence".to_string()),
        }
    }
    Ok(out)
}

fn take_comparison_operator(s: &str, position: usize) -> (OperatorToken, usize) {
    let bytes = s.as_bytes();
    if bytes.len() > 1 && bytes[1] == b'=' {
        let op = match bytes[0] {
            b'<' => Operator::LessOrEqual,
            b'>' => Operator::GreaterOrEqual,
            _ => Operator::NotEqual,
        };
        (OperatorToken::new(op, position), 2)
    } else {
        let op = match bytes[0] {
            b'<' => Operator::Less,
            b'>' => Operator::Greater,
            _ => Operator::Bang,
        };
        (OperatorToken::new(op, position), 1)
    }
}

fn take_binding(s: &str, position: usize) -> Result<(BindingToken, usize), ParseError> {
    let bytes = s.as_bytes();
    if bytes.len() == 1 {
        return Err(ParseError::invalid("@", position, "dangling binding"));
    }

    match bytes[1] {
        b'0' => Err(ParseError::invalid(
            &s[..2],
            position,
            "binding index must be >= 1",
        )),
        b'1'..=b'9' => {
            let mut width = 1;
            while width < bytes.len() && bytes[width].is_ascii_digit() {
                width += 1;
            }
            let index = s[1..width]
                .parse::<i64>()
                .map_err(|e| ParseError::invalid(&s[..width], position, e.to_string()))?;
            Ok((
                BindingToken {
                    variable: BindingVariable::Indexed(index),
                    position,
                },
                width,
            ))
        }
        _ => {
            let tail = take_symbol_run(&s[1..]);
            if tail.is_empty() {
                return Err(ParseError::invalid("@", position, "dangling binding"));
            }
            let width = 1 + tail.len();
            Ok((
                BindingToken {
                    variable: BindingVariable::Named(tail.to_string()),
                    position,
                },
                width,
            ))
        }
    }
}

/// Consumes a numeric run: digits plus arbitrarily-placed `.`, `-`, `+`.
/// Validation is deferred to integer/float parsing. A single `+` with no
/// following digit is the `+` operator instead.
fn take_numeric(s: &str, position: usize) -> Result<(Token, usize), ParseError> {
    let bytes = s.as_bytes();
    let mut width = 1;
    let mut float = false;
    while width < bytes.len() && matches!(bytes[width], b'0'..=b'9' | b'.' | b'-' | b'+') {
        if bytes[width] == b'.' {
            float = true;
        }
        width += 1;
    }

    let raw = &s[..width];
    if raw == "+" {
        return Ok((
            Token::Operator(OperatorToken::new(Operator::Plus, position)),
            1,
        ));
    }

    let value = if float {
        raw.parse::<f64>()
            .map(NumericValue::Float)
            .map_err(|e| ParseError::invalid(raw, position, e.to_string()))?
    } else {
        raw.parse::<i64>()
            .map(NumericValue::Integer)
            .map_err(|e| ParseError::invalid(raw, position, e.to_string()))?
    };
    Ok((
        Token::Numeric(NumericToken {
            value,
            raw: raw.to_string(),
            position,
        }),
        width,
    ))
}

fn take_symbol_run(s: &str) -> &str {
    let end = s
        .char_indices()
        .find(|(_, c)| !is_symbol_char(*c))
        .map_or(s.len(), |(i, _)| i);
    &s[..end]
}

fn take_symbol(s: &str, position: usize) -> Result<(SymbolToken, usize), ParseError> {
    let run = take_symbol_run(s);
    if run.is_empty() {
        let first = s.chars().next().unwrap_or('\u{FFFD}');
        return Err(ParseError::invalid(
            first.to_string(),
            position,
            "unexpected character",
        ));
    }
    Ok((
        SymbolToken {
            content: run.to_string(),
            position,
        },
        run.len(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_all_tokens;

    fn tokenize(source: &str) -> Vec<Token> {
        read_all_tokens(&mut Lexer::new(source)).unwrap()
    }

    fn lex_err(source: &str) -> ParseError {
        read_all_tokens(&mut Lexer::new(source))
            .expect_err(&format!("expected lex error for: {source}"))
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_single_keyword() {
        let tokens = tokenize("SELECT");
        assert_eq!(
            tokens,
            vec![Token::Keyword(KeywordToken {
                name: Keyword::Select,
                raw: "SELECT".to_string(),
                position: 0,
            })]
        );
    }

    #[test]
    fn test_keyword_case_insensitive_preserves_raw() {
        let tokens = tokenize("sElEcT");
        assert_eq!(
            tokens,
            vec![Token::Keyword(KeywordToken {
                name: Keyword::Select,
                raw: "sElEcT".to_string(),
                position: 0,
            })]
        );
    }

    #[test]
    fn test_longest_reserved_match_wins() {
        let tokens = tokenize("COUNT_UP_TO");
        assert!(matches!(
            &tokens[0],
            Token::Keyword(KeywordToken { name: Keyword::CountUpTo, .. })
        ));

        let tokens = tokenize("DESCENDANT");
        assert!(matches!(
            &tokens[0],
            Token::Operator(OperatorToken { op: Operator::Descendant, .. })
        ));
    }

    #[test]
    fn test_backquote_string() {
        let tokens = tokenize("`Kind`");
        assert_eq!(
            tokens,
            vec![Token::String(StringToken {
                quote: b'`',
                content: "Kind".to_string(),
                raw: "`Kind`".to_string(),
                position: 0,
            })]
        );
    }

    #[test]
    fn test_empty_string() {
        let tokens = tokenize("''");
        assert_eq!(
            tokens,
            vec![Token::String(StringToken {
                quote: b'\'',
                content: String::new(),
                raw: "''".to_string(),
                position: 0,
            })]
        );
    }

    #[test]
    fn test_escaped_string() {
        let tokens = tokenize(r"'String\'Quoted\''");
        assert_eq!(
            tokens,
            vec![Token::String(StringToken {
                quote: b'\'',
                content: "String'Quoted'".to_string(),
                raw: r"'String\'Quoted\''".to_string(),
                position: 0,
            })]
        );
    }

    #[test]
    fn test_escaped_backquote_string() {
        let tokens = tokenize("`Kind\\`Kind\\``");
        assert_eq!(
            tokens,
            vec![Token::String(StringToken {
                quote: b'`',
                content: "Kind`Kind`".to_string(),
                raw: "`Kind\\`Kind\\``".to_string(),
                position: 0,
            })]
        );
    }

    #[test]
    fn test_unterminated_string_is_error() {
        assert!(matches!(lex_err("'abc"), ParseError::InvalidToken { .. }));
    }

    #[test]
    fn test_unknown_escape_is_error() {
        assert!(matches!(lex_err(r"'a\xb'"), ParseError::InvalidToken { .. }));
    }

    #[test]
    fn test_equals_condition() {
        let tokens = tokenize("prop = 1");
        assert_eq!(
            tokens,
            vec![
                Token::Symbol(SymbolToken {
                    content: "prop".to_string(),
                    position: 0,
                }),
                Token::Whitespace(WhitespaceToken {
                    content: " ".to_string(),
                    position: 4,
                }),
                Token::Operator(OperatorToken::new(Operator::Equal, 5)),
                Token::Whitespace(WhitespaceToken {
                    content: " ".to_string(),
                    position: 6,
                }),
                Token::Numeric(NumericToken {
                    value: NumericValue::Integer(1),
                    raw: "1".to_string(),
                    position: 7,
                }),
            ]
        );
    }

    #[test]
    fn test_two_byte_comparison_operators() {
        let ops: Vec<Operator> = tokenize("<= >= != < > !")
            .into_iter()
            .filter_map(|t| match t {
                Token::Operator(op) => Some(op.op),
                _ => None,
            })
            .collect();
        assert_eq!(
            ops,
            vec![
                Operator::LessOrEqual,
                Operator::GreaterOrEqual,
                Operator::NotEqual,
                Operator::Less,
                Operator::Greater,
                Operator::Bang,
            ]
        );
    }

    #[test]
    fn test_not_in_lexes_as_two_operators() {
        let tokens = tokenize("1 NOT IN prop");
        assert!(matches!(
            &tokens[2],
            Token::Operator(OperatorToken { op: Operator::Not, .. })
        ));
        assert!(matches!(
            &tokens[4],
            Token::Operator(OperatorToken { op: Operator::In, .. })
        ));
    }

    #[test]
    fn test_basic_query() {
        let tokens = tokenize("SELECT * FROM Kind");
        assert_eq!(tokens.len(), 7);
        assert!(matches!(tokens[2], Token::Wildcard(WildcardToken { position: 7 })));
        assert!(matches!(
            &tokens[6],
            Token::Symbol(SymbolToken { content, position: 14 }) if content == "Kind"
        ));
    }

    #[test]
    fn test_signed_numbers() {
        let tokens = tokenize("-1");
        assert_eq!(
            tokens,
            vec![Token::Numeric(NumericToken {
                value: NumericValue::Integer(-1),
                raw: "-1".to_string(),
                position: 0,
            })]
        );

        let tokens = tokenize("+0.5");
        assert_eq!(
            tokens,
            vec![Token::Numeric(NumericToken {
                value: NumericValue::Float(0.5),
                raw: "+0.5".to_string(),
                position: 0,
            })]
        );
    }

    #[test]
    fn test_lone_plus_is_operator() {
        let tokens = tokenize("+ 2");
        assert!(matches!(
            &tokens[0],
            Token::Operator(OperatorToken { op: Operator::Plus, .. })
        ));
    }

    #[test]
    fn test_lone_minus_is_error() {
        assert!(matches!(lex_err("- 2"), ParseError::InvalidToken { .. }));
    }

    #[test]
    fn test_malformed_numeric_run_is_error() {
        assert!(matches!(lex_err("1+2"), ParseError::InvalidToken { .. }));
        assert!(matches!(lex_err("1.2.3"), ParseError::InvalidToken { .. }));
    }

    #[test]
    fn test_bindings() {
        let tokens = tokenize("@1 @cursor");
        assert_eq!(
            tokens[0],
            Token::Binding(BindingToken {
                variable: BindingVariable::Indexed(1),
                position: 0,
            })
        );
        assert_eq!(
            tokens[2],
            Token::Binding(BindingToken {
                variable: BindingVariable::Named("cursor".to_string()),
                position: 3,
            })
        );
    }

    #[test]
    fn test_binding_index_zero_is_error() {
        assert!(matches!(lex_err("@0"), ParseError::InvalidToken { .. }));
    }

    #[test]
    fn test_dangling_binding_is_error() {
        assert!(matches!(lex_err("@"), ParseError::InvalidToken { .. }));
        assert!(matches!(lex_err("@ x"), ParseError::InvalidToken { .. }));
    }

    #[test]
    fn test_unicode_symbol() {
        let tokens = tokenize("pröp = 1");
        assert!(matches!(
            &tokens[0],
            Token::Symbol(SymbolToken { content, .. }) if content == "pröp"
        ));
    }

    #[test]
    fn test_symbol_with_dollar_and_underscore() {
        let tokens = tokenize("big$bux __qux");
        assert!(matches!(
            &tokens[0],
            Token::Symbol(SymbolToken { content, .. }) if content == "big$bux"
        ));
        assert!(matches!(
            &tokens[2],
            Token::Symbol(SymbolToken { content, .. }) if content == "__qux"
        ));
    }

    #[test]
    fn test_raw_round_trip() {
        let sources = [
            "SELECT * FROM `Kind` WHERE a = 'x' AND b >= -1.5 ORDER BY c DESC LIMIT 10",
            "AGGREGATE COUNT(*) OVER (SELECT * FROM k)",
            "a NOT IN ARRAY(1, @2, @foo)",
            "  \t\r\n  prop\t=\n1",
        ];
        for source in sources {
            let rebuilt: String = tokenize(source).iter().map(Token::content).collect();
            assert_eq!(rebuilt, source, "raw round-trip failed for {source}");
        }
    }

    #[test]
    fn test_lexing_is_deterministic() {
        let source = "SELECT a, b FROM k WHERE a.b.c = @1";
        assert_eq!(tokenize(source), tokenize(source));
    }

    #[test]
    fn test_whitespace_coalesced() {
        let tokens = tokenize("a \t\n b");
        assert_eq!(tokens.len(), 3);
        assert!(matches!(
            &tokens[1],
            Token::Whitespace(WhitespaceToken { content, .. }) if content == " \t\n "
        ));
    }

    #[test]
    fn test_unread_round_trip() {
        let mut lexer = Lexer::new("a = 1");
        let first = lexer.read().unwrap();
        let second = lexer.read().unwrap();
        lexer.unread(second);
        lexer.unread(first.clone());
        assert_eq!(lexer.read().unwrap(), first);
    }
}
