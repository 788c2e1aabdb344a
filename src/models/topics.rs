//! List literal parsing for the list-valued CSV column.
//!
//! Epistemic foundation:
//! - K_i: A valid cell is a bracketed list; anything else is rejected
//! - B_i: Legacy exports use single-quoted literals (`['a', 'b']`), newer ones JSON
//! - I^B: Cell content is untrusted → strict grammar, no evaluation
//!
//! Accepted grammar (JSON arrays without objects, plus single-quoted literals):
//!
//! ```text
//! list   := '[' ( value ( ',' value )* ','? )? ']'
//! value  := string | number | True | False | true | false | None | null | list
//! string := [uU]? ( '...' | "..." )
//! number := [+-]? digits ( '.' digits? )? exponent? | [+-]? '.' digits exponent?
//! ```
//!
//! Whitespace is allowed between tokens. Decoded string escapes:
//! `\\ \' \" \a \b \f \n \r \t \v`, `\xHH`,
//! octal `\ooo`, `\uXXXX`, `\UXXXXXXXX` and a backslash-newline continuation.
//! JSON's `\/` and surrogate pairs are also decoded. Any other escape,
//! `\N{..}` included, is a syntax error, so a cell never reaches the remote with
//! a value different from what it spells.
//!
//! Integers must fit in `i64` or `u64`; larger ones are rejected rather than
//! rounded. Raw and byte prefixes (`r'..'`, `b'..'`), implicit concatenation
//! of adjacent strings (`['a' 'b']`) and digit separators are rejected.

use serde_json::{Number, Value};
use thiserror::Error;

/// Nesting limit for inner lists.
const MAX_DEPTH: usize = 32;

/// Why a cell is not a valid list literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListFormatError {
    #[error("empty value")]
    Empty,

    #[error("expected a list but found {found}")]
    NotAList { found: &'static str },

    #[error("{message} at offset {offset}")]
    Syntax { offset: usize, message: String },
}

/// Parse a list literal into its JSON elements.
pub fn parse_list_literal(text: &str) -> Result<Vec<Value>, ListFormatError> {
    if text.trim().is_empty() {
        return Err(ListFormatError::Empty);
    }

    let mut parser = Parser::new(text);
    parser.skip_ws();
    let value = parser.value(0)?;
    parser.skip_ws();
    if parser.peek().is_some() {
        return Err(parser.error("unexpected trailing characters"));
    }

    match value {
        Value::Array(items) => Ok(items),
        other => Err(ListFormatError::NotAList {
            found: kind_of(&other),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "None",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, message: impl Into<String>) -> ListFormatError {
        ListFormatError::Syntax {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn peek_second(&self) -> Option<char> {
        self.src[self.pos..].chars().nth(1)
    }

    fn value(&mut self, depth: usize) -> Result<Value, ListFormatError> {
        match self.peek() {
            Some('[') => self.list(depth + 1).map(Value::Array),
            Some(q @ ('\'' | '"')) => self.string(q).map(Value::String),
            Some('u' | 'U') if matches!(self.peek_second(), Some('\'' | '"')) => {
                self.bump();
                match self.peek() {
                    Some(q) => self.string(q).map(Value::String),
                    None => Err(self.error("unexpected end of input")),
                }
            }
            Some(c) if matches!(c, '-' | '+' | '.') || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.word(),
            Some(c) => Err(self.error(format!("unexpected character '{c}'"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn list(&mut self, depth: usize) -> Result<Vec<Value>, ListFormatError> {
        if depth > MAX_DEPTH {
            return Err(self.error("lists nested too deeply"));
        }
        self.bump(); // '['
        let mut items = Vec::new();

        loop {
            self.skip_ws();
            if self.peek() == Some(']') {
                self.bump();
                return Ok(items);
            }

            items.push(self.value(depth)?);
            self.skip_ws();

            match self.bump() {
                Some(',') => continue,
                Some(']') => return Ok(items),
                Some(c) => {
                    self.pos -= c.len_utf8();
                    return Err(self.error(format!("expected ',' or ']' but found '{c}'")));
                }
                None => return Err(self.error("unclosed list")),
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<String, ListFormatError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();

        loop {
            let at = self.pos;
            match self.bump() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.escape(at)? {
                    Some(c) => out.push(c),
                    None if self.peek().is_none() => break,
                    None => {}
                },
                Some(c) => out.push(c),
                None => break,
            }
        }

        Err(ListFormatError::Syntax {
            offset: start,
            message: "unterminated string".to_string(),
        })
    }

    /// Decode the escape after a backslash at `at`.
    ///
    /// `None` means the escape produces no character (line continuation or
    /// end of input).
    fn escape(&mut self, at: usize) -> Result<Option<char>, ListFormatError> {
        let Some(c) = self.bump() else {
            return Ok(None);
        };
        let decoded = match c {
            '\n' => return Ok(None),
            '\\' | '\'' | '"' | '/' => c,
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0b}',
            'x' => self.code_point(at, 2)?,
            'u' => self.utf16_escape(at)?,
            'U' => self.code_point(at, 8)?,
            '0'..='7' => self.octal(at, c)?,
            other => {
                return Err(ListFormatError::Syntax {
                    offset: at,
                    message: format!("unsupported escape '\\{other}'"),
                });
            }
        };
        Ok(Some(decoded))
    }

    fn hex_digits(&mut self, at: usize, len: usize) -> Result<u32, ListFormatError> {
        let digits: String = (0..len)
            .map_while(|_| match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => self.bump(),
                _ => None,
            })
            .collect();
        if digits.len() != len {
            return Err(ListFormatError::Syntax {
                offset: at,
                message: format!("escape needs {len} hex digits, found '{digits}'"),
            });
        }
        u32::from_str_radix(&digits, 16).map_err(|e| ListFormatError::Syntax {
            offset: at,
            message: e.to_string(),
        })
    }

    fn code_point(&mut self, at: usize, len: usize) -> Result<char, ListFormatError> {
        let code = self.hex_digits(at, len)?;
        char::from_u32(code).ok_or_else(|| invalid_code_point(at, code))
    }

    /// `\uXXXX`, joining a surrogate pair when a low half follows.
    fn utf16_escape(&mut self, at: usize) -> Result<char, ListFormatError> {
        let high = self.hex_digits(at, 4)?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high).ok_or_else(|| invalid_code_point(at, high));
        }

        let low_at = self.pos;
        if self.peek() != Some('\\') || self.peek_second() != Some('u') {
            return Err(invalid_code_point(at, high));
        }
        self.bump();
        self.bump();
        let low = self.hex_digits(low_at, 4)?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(invalid_code_point(low_at, low));
        }
        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(code).ok_or_else(|| invalid_code_point(at, code))
    }

    fn octal(&mut self, at: usize, first: char) -> Result<char, ListFormatError> {
        let mut code = first.to_digit(8).unwrap_or_default();
        for _ in 0..2 {
            match self.peek().and_then(|c| c.to_digit(8)) {
                Some(d) => {
                    code = code * 8 + d;
                    self.bump();
                }
                None => break,
            }
        }
        char::from_u32(code).ok_or_else(|| invalid_code_point(at, code))
    }

    fn number(&mut self) -> Result<Value, ListFormatError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
        {
            self.bump();
        }
        let raw = &self.src[start..self.pos];
        let invalid = |message: String| ListFormatError::Syntax {
            offset: start,
            message,
        };

        if !raw.contains(|c: char| c.is_ascii_digit()) {
            return Err(invalid(format!("invalid number '{raw}'")));
        }
        if !raw.contains(['.', 'e', 'E']) {
            if let Ok(n) = raw.parse::<i64>() {
                return Ok(Value::Number(n.into()));
            }
            if let Ok(n) = raw.parse::<u64>() {
                return Ok(Value::Number(n.into()));
            }
            let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
            return Err(invalid(if digits.bytes().all(|b| b.is_ascii_digit()) {
                format!("integer '{raw}' out of range")
            } else {
                format!("invalid number '{raw}'")
            }));
        }
        raw.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| invalid(format!("invalid number '{raw}'")))
    }

    fn word(&mut self) -> Result<Value, ListFormatError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        match &self.src[start..self.pos] {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            other => Err(ListFormatError::Syntax {
                offset: start,
                message: format!("unknown identifier '{other}'"),
            }),
        }
    }
}

fn invalid_code_point(offset: usize, code: u32) -> ListFormatError {
    ListFormatError::Syntax {
        offset,
        message: format!("invalid code point U+{code:04X}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_quoted_list() {
        let items = parse_list_literal("['a','b']").unwrap();
        assert_eq!(items, vec![json!("a"), json!("b")]);
    }

    #[test]
    fn test_json_array() {
        let items = parse_list_literal(r#" ["Science Fiction", "Space Opera"] "#).unwrap();
        assert_eq!(items, vec![json!("Science Fiction"), json!("Space Opera")]);
    }

    #[test]
    fn test_empty_list_and_trailing_comma() {
        assert!(parse_list_literal("[]").unwrap().is_empty());
        assert_eq!(parse_list_literal("['x', ]").unwrap(), vec![json!("x")]);
    }

    #[test]
    fn test_mixed_scalars_and_nesting() {
        let items = parse_list_literal("[1, -2.5, True, None, ['inner']]").unwrap();
        assert_eq!(
            items,
            vec![json!(1), json!(-2.5), json!(true), Value::Null, json!(["inner"])]
        );
    }

    #[test]
    fn test_escapes() {
        let items = parse_list_literal(r#"['it\'s', "say \"hi\"", 'café', 'a\\b']"#).unwrap();
        assert_eq!(
            items,
            vec![json!("it's"), json!("say \"hi\""), json!("café"), json!("a\\b")]
        );
    }

    #[test]
    fn test_numeric_escapes_are_decoded() {
        let items = parse_list_literal(r"['\x41', '\101', '\u00e9', '\U0001F600', '\0']").unwrap();
        assert_eq!(
            items,
            vec![json!("A"), json!("A"), json!("é"), json!("😀"), json!("\0")]
        );

        let items = parse_list_literal(r#"["\ud83d\ude00", "a\/b", '\a\v']"#).unwrap();
        assert_eq!(items, vec![json!("😀"), json!("a/b"), json!("\u{07}\u{0b}")]);
    }

    #[test]
    fn test_unsupported_escapes_rejected() {
        for literal in [r"['\q']", r"['\N{EM DASH}']", r"['\x4']", r"['\ud800']"] {
            assert!(
                matches!(
                    parse_list_literal(literal),
                    Err(ListFormatError::Syntax { offset: 2, .. })
                ),
                "{literal} should be rejected"
            );
        }
    }

    #[test]
    fn test_unicode_prefix() {
        let items = parse_list_literal("[u'History', U\"War\"]").unwrap();
        assert_eq!(items, vec![json!("History"), json!("War")]);
        assert!(parse_list_literal("[b'bytes']").is_err());
    }

    #[test]
    fn test_integers_are_exact() {
        let literal = "[12345678901234567890, -9223372036854775808, +1]";
        let items = parse_list_literal(literal).unwrap();
        assert_eq!(
            items,
            vec![json!(12345678901234567890u64), json!(i64::MIN), json!(1)]
        );

        for literal in ["[99999999999999999999]", "[-9223372036854775809]"] {
            match parse_list_literal(literal) {
                Err(ListFormatError::Syntax { offset, message }) => {
                    assert_eq!(offset, 1);
                    assert!(message.contains("out of range"), "{literal}: {message}");
                }
                other => panic!("{literal} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_float_forms() {
        let items = parse_list_literal("[.5, 5., 1e3, -2.5E-1]").unwrap();
        assert_eq!(
            items,
            vec![json!(0.5), json!(5.0), json!(1000.0), json!(-0.25)]
        );
        assert!(parse_list_literal("[1e400]").is_err());
        assert!(parse_list_literal("[.]").is_err());
    }

    #[test]
    fn test_quotes_of_the_other_kind_are_literal() {
        let items = parse_list_literal(r#"["Alzheimer's disease"]"#).unwrap();
        assert_eq!(items, vec![json!("Alzheimer's disease")]);
    }

    #[test]
    fn test_non_list_values_rejected() {
        assert_eq!(
            parse_list_literal("'a'"),
            Err(ListFormatError::NotAList { found: "a string" })
        );
        assert_eq!(
            parse_list_literal("42"),
            Err(ListFormatError::NotAList { found: "a number" })
        );
        assert_eq!(
            parse_list_literal("None"),
            Err(ListFormatError::NotAList { found: "None" })
        );
    }

    #[test]
    fn test_malformed_input_rejected() {
        assert_eq!(parse_list_literal(""), Err(ListFormatError::Empty));
        assert_eq!(parse_list_literal("   "), Err(ListFormatError::Empty));
        assert!(matches!(
            parse_list_literal("bad"),
            Err(ListFormatError::Syntax { offset: 0, .. })
        ));
        assert!(matches!(
            parse_list_literal("['a', 'b'"),
            Err(ListFormatError::Syntax { .. })
        ));
        assert!(matches!(
            parse_list_literal("['a' 'b']"),
            Err(ListFormatError::Syntax { offset: 5, .. })
        ));
        assert!(matches!(
            parse_list_literal("['a'] extra"),
            Err(ListFormatError::Syntax { offset: 6, .. })
        ));
        assert!(matches!(
            parse_list_literal("['unterminated]"),
            Err(ListFormatError::Syntax { offset: 1, .. })
        ));
        assert!(matches!(
            parse_list_literal("[1.2.3]"),
            Err(ListFormatError::Syntax { .. })
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        assert!(matches!(
            parse_list_literal(&deep),
            Err(ListFormatError::Syntax { .. })
        ));

        let ok = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse_list_literal(&ok).is_ok());
    }
}
