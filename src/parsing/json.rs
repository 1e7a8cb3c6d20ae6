//! # JSON Parsing for Generic Dict Payloads
//!
//! Generic dict values are stored in the variable-length region as JSON text.
//! Every object key carries two type tags in front of the literal key text, so
//! the keys must be exposed exactly as written and in encounter order.
//! `JsonValue::Object` therefore keeps a vector of pairs rather than a map.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌──────────────┐    ┌───────────────┐
//! │ JSON bytes  │───>│ JsonParser   │───>│ JsonValue     │
//! └─────────────┘    │ (tokens +    │    │ node tree     │
//!                    │  recursion)  │    └───────────────┘
//!                    └──────────────┘
//! ```
//!
//! ## Node Accessors
//!
//! | Accessor | Returns |
//! |----------|---------|
//! | `entries()` | object children with raw key text, in order |
//! | `is_truthy()` | `true` only for the JSON literal `true` |
//! | `as_f64()` | the number of a numeric node |
//! | `as_text()` | the text of a string node |
//!
//! ## Error Handling
//!
//! All errors carry the byte position where parsing stopped:
//!
//! ```text
//! expected ':' after object key at position 7
//! ```

use std::borrow::Cow;

use eyre::{bail, ensure, Result, WrapErr};

use crate::config::DEFAULT_MAX_NESTING_DEPTH;

#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(Vec<(String, JsonValue)>),
}

impl JsonValue {
    pub fn is_truthy(&self) -> bool {
        matches!(self, JsonValue::Bool(true))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn entries(&self) -> Option<&[(String, JsonValue)]> {
        match self {
            JsonValue::Object(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "bool",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    Colon,
    Comma,
    String(Cow<'a, str>),
    Number(f64),
    Bool(bool),
    Null,
}

pub struct JsonParser<'a> {
    input: &'a str,
    pos: usize,
    max_depth: usize,
}

impl<'a> JsonParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            max_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses one complete document. Anything other than whitespace after the
    /// top-level value is an error.
    pub fn parse_document(mut self) -> Result<JsonValue> {
        let value = self.parse_value(0)?;
        self.skip_whitespace();
        ensure!(
            self.pos == self.input.len(),
            "trailing characters after JSON value at position {}",
            self.pos
        );
        Ok(value)
    }

    fn skip_whitespace(&mut self) {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && matches!(bytes[self.pos], b' ' | b'\t' | b'\n' | b'\r') {
            self.pos += 1;
        }
    }

    fn next_token(&mut self) -> Result<Option<Token<'a>>> {
        self.skip_whitespace();
        let Some(&c) = self.input.as_bytes().get(self.pos) else {
            return Ok(None);
        };

        let single = match c {
            b'{' => Some(Token::ObjectStart),
            b'}' => Some(Token::ObjectEnd),
            b'[' => Some(Token::ArrayStart),
            b']' => Some(Token::ArrayEnd),
            b':' => Some(Token::Colon),
            b',' => Some(Token::Comma),
            _ => None,
        };
        if let Some(token) = single {
            self.pos += 1;
            return Ok(Some(token));
        }

        match c {
            b'"' => self.lex_string().map(Some),
            b't' => self.lex_keyword("true", Token::Bool(true)).map(Some),
            b'f' => self.lex_keyword("false", Token::Bool(false)).map(Some),
            b'n' => self.lex_keyword("null", Token::Null).map(Some),
            b'-' | b'0'..=b'9' => self.lex_number().map(Some),
            _ => bail!(
                "unexpected character '{}' at position {}",
                c as char,
                self.pos
            ),
        }
    }

    fn lex_keyword(&mut self, word: &str, token: Token<'a>) -> Result<Token<'a>> {
        ensure!(
            self.input[self.pos..].starts_with(word),
            "expected '{}' at position {}",
            word,
            self.pos
        );
        self.pos += word.len();
        Ok(token)
    }

    fn lex_string(&mut self) -> Result<Token<'a>> {
        let open = self.pos;
        let start = open + 1;
        let bytes = self.input.as_bytes();
        let mut escaped = false;
        let mut i = start;

        while i < bytes.len() {
            match bytes[i] {
                b'"' => {
                    let raw = &self.input[start..i];
                    self.pos = i + 1;
                    return if escaped {
                        Ok(Token::String(Cow::Owned(unescape_string(raw)?)))
                    } else {
                        Ok(Token::String(Cow::Borrowed(raw)))
                    };
                }
                b'\\' => {
                    escaped = true;
                    i += 2;
                }
                _ => i += 1,
            }
        }

        bail!("unterminated string starting at position {}", open)
    }

    fn lex_number(&mut self) -> Result<Token<'a>> {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let mut end = start + 1;
        while end < bytes.len() && matches!(bytes[end], b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-')
        {
            end += 1;
        }

        let text = &self.input[start..end];
        let n: f64 = text
            .parse()
            .wrap_err_with(|| format!("invalid number '{}' at position {}", text, start))?;
        self.pos = end;
        Ok(Token::Number(n))
    }

    fn parse_value(&mut self, depth: usize) -> Result<JsonValue> {
        match self.next_token()? {
            Some(token) => self.value_from_token(token, depth),
            None => bail!("unexpected end of input at position {}", self.pos),
        }
    }

    fn value_from_token(&mut self, token: Token<'a>, depth: usize) -> Result<JsonValue> {
        match token {
            Token::Null => Ok(JsonValue::Null),
            Token::Bool(b) => Ok(JsonValue::Bool(b)),
            Token::Number(n) => Ok(JsonValue::Number(n)),
            Token::String(s) => Ok(JsonValue::String(s.into_owned())),
            Token::ArrayStart => self.parse_array(depth + 1),
            Token::ObjectStart => self.parse_object(depth + 1),
            other => bail!("unexpected token {:?} at position {}", other, self.pos),
        }
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        ensure!(
            depth <= self.max_depth,
            "JSON nesting depth {} exceeds maximum {} at position {}",
            depth,
            self.max_depth,
            self.pos
        );
        Ok(())
    }

    fn parse_array(&mut self, depth: usize) -> Result<JsonValue> {
        self.check_depth(depth)?;
        let mut elements = Vec::new();

        match self.next_token()? {
            Some(Token::ArrayEnd) => return Ok(JsonValue::Array(elements)),
            Some(token) => elements.push(self.value_from_token(token, depth)?),
            None => bail!("unexpected end of input in array at position {}", self.pos),
        }

        loop {
            match self.next_token()? {
                Some(Token::ArrayEnd) => return Ok(JsonValue::Array(elements)),
                Some(Token::Comma) => elements.push(self.parse_value(depth)?),
                Some(other) => bail!(
                    "expected ',' or ']' in array, got {:?} at position {}",
                    other,
                    self.pos
                ),
                None => bail!("unexpected end of input in array at position {}", self.pos),
            }
        }
    }

    fn parse_object(&mut self, depth: usize) -> Result<JsonValue> {
        self.check_depth(depth)?;
        let mut entries = Vec::new();

        match self.next_token()? {
            Some(Token::ObjectEnd) => return Ok(JsonValue::Object(entries)),
            token => entries.push(self.parse_entry(token, depth)?),
        }

        loop {
            match self.next_token()? {
                Some(Token::ObjectEnd) => return Ok(JsonValue::Object(entries)),
                Some(Token::Comma) => {
                    let token = self.next_token()?;
                    entries.push(self.parse_entry(token, depth)?);
                }
                Some(other) => bail!(
                    "expected ',' or '}}' in object, got {:?} at position {}",
                    other,
                    self.pos
                ),
                None => bail!("unexpected end of input in object at position {}", self.pos),
            }
        }
    }

    fn parse_entry(&mut self, token: Option<Token<'a>>, depth: usize) -> Result<(String, JsonValue)> {
        let key = match token {
            Some(Token::String(key)) => key,
            Some(other) => bail!(
                "expected string key, got {:?} at position {}",
                other,
                self.pos
            ),
            None => bail!("unexpected end of input in object at position {}", self.pos),
        };
        match self.next_token()? {
            Some(Token::Colon) => {}
            _ => bail!("expected ':' after object key at position {}", self.pos),
        }
        let value = self.parse_value(depth)?;
        Ok((key.into_owned(), value))
    }
}

pub fn unescape_string(s: &str) -> Result<String> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('b') => result.push('\x08'),
            Some('f') => result.push('\x0C'),
            Some(c @ ('\\' | '"' | '/')) => result.push(c),
            Some('u') => {
                let mut cp = read_hex4(&mut chars)?;
                if (0xD800..0xDC00).contains(&cp) {
                    ensure!(
                        chars.next() == Some('\\') && chars.next() == Some('u'),
                        "unpaired high surrogate U+{:04X}",
                        cp
                    );
                    let low = read_hex4(&mut chars)?;
                    ensure!(
                        (0xDC00..0xE000).contains(&low),
                        "high surrogate U+{:04X} followed by U+{:04X}",
                        cp,
                        low
                    );
                    cp = 0x10000 + ((cp - 0xD800) << 10) + (low - 0xDC00);
                }
                match char::from_u32(cp) {
                    Some(ch) => result.push(ch),
                    None => bail!("invalid unicode codepoint: U+{:04X}", cp),
                }
            }
            Some(other) => bail!("invalid escape sequence: \\{}", other),
            None => bail!("unexpected end of string after backslash"),
        }
    }

    Ok(result)
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> Result<u32> {
    let hex: String = chars.by_ref().take(4).collect();
    ensure!(hex.len() == 4, "invalid unicode escape: incomplete sequence");
    u32::from_str_radix(&hex, 16).wrap_err_with(|| format!("invalid unicode escape: \\u{}", hex))
}

pub fn parse_json(input: &str) -> Result<JsonValue> {
    JsonParser::new(input).parse_document()
}
