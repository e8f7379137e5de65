//! OpenStep property list parsing and serialization.
//!
//! Glyphs sources store everything as ASCII plists: dictionaries of
//! `key = value;` entries, `( ... )` arrays, `<hex>` data blobs, and quoted
//! or unquoted strings. Dictionary keys are kept in file order so that a
//! document survives a parse/serialize round trip with its values intact.
//!
//! The text dialect has no distinct boolean or date forms; Glyphs carries
//! those as integers and strings, and so do we.

use indexmap::IndexMap;
use thiserror::Error;

/// An ordered-key plist mapping
pub type Dictionary = IndexMap<String, Plist>;

/// A plist value
#[derive(Debug, Clone, PartialEq)]
pub enum Plist {
    /// Quoted or unquoted text
    String(String),
    /// An unquoted token lexing as an integer
    Integer(i64),
    /// An unquoted token lexing as a real number
    Float(f64),
    /// A `<hex>` binary blob
    Data(Vec<u8>),
    /// An ordered sequence of values
    Array(Vec<Plist>),
    /// An ordered-key mapping
    Dictionary(Dictionary),
}

/// Errors produced while parsing a plist document
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The document ended in the middle of a value
    #[error("unexpected end of input on line {line}")]
    UnexpectedEof {
        /// Line the parser had reached
        line: usize,
    },

    /// A character that cannot start or continue a value
    #[error("unexpected character {found:?} on line {line}")]
    UnexpectedChar {
        /// The offending character
        found: char,
        /// Line of the offending character
        line: usize,
    },

    /// A required structural character was missing
    #[error("expected {expected:?} on line {line}")]
    Expected {
        /// The character the grammar requires here
        expected: char,
        /// Line where it was expected
        line: usize,
    },

    /// A malformed backslash escape in a quoted string
    #[error("invalid escape sequence on line {line}")]
    BadEscape {
        /// Line of the escape
        line: usize,
    },

    /// Malformed `<hex>` data
    #[error("invalid data block on line {line}")]
    BadData {
        /// Line of the data block
        line: usize,
    },

    /// Content after the end of the document
    #[error("trailing content after document on line {line}")]
    TrailingContent {
        /// Line of the extra content
        line: usize,
    },

    /// A `/* ... */` comment with no closing delimiter
    #[error("unterminated comment starting on line {line}")]
    UnterminatedComment {
        /// Line the comment opened on
        line: usize,
    },
}

impl Plist {
    /// Parse a plist document from text.
    pub fn parse(text: &str) -> Result<Plist, ParseError> {
        let mut parser = Parser::new(text);
        parser.skip_whitespace()?;
        let value = parser.parse_value()?;
        parser.skip_whitespace()?;
        if parser.pos != parser.text.len() {
            return Err(ParseError::TrailingContent {
                line: parser.line(),
            });
        }
        Ok(value)
    }

    /// Serialize as a plist document, ending with a newline.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.write(&mut out);
        out.push('\n');
        out
    }

    /// The string value, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Plist::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer value, if this is an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Plist::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The numeric value, if this is an integer or a float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Plist::Integer(i) => Some(*i as f64),
            Plist::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The items, if this is an array
    pub fn as_array(&self) -> Option<&[Plist]> {
        match self {
            Plist::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The mapping, if this is a dictionary
    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Plist::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// The bytes, if this is a data blob
    pub fn as_data(&self) -> Option<&[u8]> {
        match self {
            Plist::Data(data) => Some(data),
            _ => None,
        }
    }

    fn write(&self, out: &mut String) {
        match self {
            Plist::String(s) => write_string(out, s),
            Plist::Integer(i) => out.push_str(&i.to_string()),
            Plist::Float(f) => write_float(out, *f),
            Plist::Data(data) => {
                out.push('<');
                for byte in data {
                    out.push_str(&format!("{byte:02x}"));
                }
                out.push('>');
            }
            Plist::Array(items) => {
                out.push_str("(\n");
                for (index, item) in items.iter().enumerate() {
                    item.write(out);
                    if index + 1 < items.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push(')');
            }
            Plist::Dictionary(dict) => {
                out.push_str("{\n");
                for (key, value) in dict {
                    write_string(out, key);
                    out.push_str(" = ");
                    value.write(out);
                    out.push_str(";\n");
                }
                out.push('}');
            }
        }
    }
}

impl From<&str> for Plist {
    fn from(value: &str) -> Plist {
        Plist::String(value.to_string())
    }
}

impl From<String> for Plist {
    fn from(value: String) -> Plist {
        Plist::String(value)
    }
}

impl From<i64> for Plist {
    fn from(value: i64) -> Plist {
        Plist::Integer(value)
    }
}

impl From<f64> for Plist {
    fn from(value: f64) -> Plist {
        Plist::Float(value)
    }
}

impl From<Vec<Plist>> for Plist {
    fn from(value: Vec<Plist>) -> Plist {
        Plist::Array(value)
    }
}

impl From<Dictionary> for Plist {
    fn from(value: Dictionary) -> Plist {
        Plist::Dictionary(value)
    }
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Parser { text, pos: 0 }
    }

    fn line(&self) -> usize {
        self.text.as_bytes()[..self.pos]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    fn current_char(&self) -> char {
        self.text[self.pos..].chars().next().unwrap_or('\u{FFFD}')
    }

    fn eof(&self) -> ParseError {
        ParseError::UnexpectedEof { line: self.line() }
    }

    fn skip_whitespace(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while let Some(b) = self.peek() {
                        self.pos += 1;
                        if b == b'\n' {
                            break;
                        }
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let start_line = self.line();
                    self.pos += 2;
                    loop {
                        match self.peek() {
                            None => {
                                return Err(ParseError::UnterminatedComment { line: start_line })
                            }
                            Some(b'*') if self.peek_at(1) == Some(b'/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(_) => self.pos += 1,
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), ParseError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(ParseError::Expected {
                expected: expected as char,
                line: self.line(),
            })
        }
    }

    fn parse_value(&mut self) -> Result<Plist, ParseError> {
        match self.peek() {
            None => Err(self.eof()),
            Some(b'{') => self.parse_dictionary(),
            Some(b'(') => self.parse_array(),
            Some(b'<') => self.parse_data(),
            Some(b'"') => Ok(Plist::String(self.parse_quoted_string()?)),
            Some(b) if is_unquoted_char(b) => Ok(token_to_plist(self.parse_token()?)),
            Some(_) => Err(ParseError::UnexpectedChar {
                found: self.current_char(),
                line: self.line(),
            }),
        }
    }

    fn parse_dictionary(&mut self) -> Result<Plist, ParseError> {
        self.pos += 1; // '{'
        let mut dict = Dictionary::new();
        loop {
            self.skip_whitespace()?;
            match self.peek() {
                None => return Err(self.eof()),
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(Plist::Dictionary(dict));
                }
                Some(b'"') => {
                    let key = self.parse_quoted_string()?;
                    self.parse_entry(&mut dict, key)?;
                }
                Some(b) if is_unquoted_char(b) => {
                    let key = self.parse_token()?.to_string();
                    self.parse_entry(&mut dict, key)?;
                }
                Some(_) => {
                    return Err(ParseError::UnexpectedChar {
                        found: self.current_char(),
                        line: self.line(),
                    })
                }
            }
        }
    }

    fn parse_entry(&mut self, dict: &mut Dictionary, key: String) -> Result<(), ParseError> {
        self.skip_whitespace()?;
        self.expect(b'=')?;
        self.skip_whitespace()?;
        let value = self.parse_value()?;
        self.skip_whitespace()?;
        self.expect(b';')?;
        dict.insert(key, value);
        Ok(())
    }

    fn parse_array(&mut self) -> Result<Plist, ParseError> {
        self.pos += 1; // '('
        let mut items = Vec::new();
        self.skip_whitespace()?;
        if self.peek() == Some(b')') {
            self.pos += 1;
            return Ok(Plist::Array(items));
        }
        loop {
            items.push(self.parse_value()?);
            self.skip_whitespace()?;
            match self.peek() {
                None => return Err(self.eof()),
                Some(b')') => {
                    self.pos += 1;
                    return Ok(Plist::Array(items));
                }
                Some(b',') => {
                    self.pos += 1;
                    self.skip_whitespace()?;
                    // tolerate a trailing comma before the close
                    if self.peek() == Some(b')') {
                        self.pos += 1;
                        return Ok(Plist::Array(items));
                    }
                }
                Some(_) => {
                    return Err(ParseError::Expected {
                        expected: ',',
                        line: self.line(),
                    })
                }
            }
        }
    }

    fn parse_data(&mut self) -> Result<Plist, ParseError> {
        self.pos += 1; // '<'
        let mut bytes = Vec::new();
        let mut pending: Option<u32> = None;
        loop {
            match self.peek() {
                None => return Err(self.eof()),
                Some(b'>') => {
                    if pending.is_some() {
                        return Err(ParseError::BadData { line: self.line() });
                    }
                    self.pos += 1;
                    return Ok(Plist::Data(bytes));
                }
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b) => {
                    let digit = hex_digit(b).ok_or_else(|| ParseError::BadData {
                        line: self.line(),
                    })?;
                    match pending.take() {
                        Some(high) => bytes.push((high * 16 + digit) as u8),
                        None => pending = Some(digit),
                    }
                    self.pos += 1;
                }
            }
        }
    }

    fn parse_quoted_string(&mut self) -> Result<String, ParseError> {
        self.pos += 1; // opening quote
        let mut result = String::new();
        loop {
            let Some(c) = self.text[self.pos..].chars().next() else {
                return Err(self.eof());
            };
            self.pos += c.len_utf8();
            match c {
                '"' => return Ok(result),
                '\\' => self.parse_escape(&mut result)?,
                _ => result.push(c),
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<(), ParseError> {
        let Some(c) = self.text[self.pos..].chars().next() else {
            return Err(self.eof());
        };
        self.pos += c.len_utf8();
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'v' => out.push('\u{0B}'),
            'U' | 'u' => {
                let mut value = 0u32;
                for _ in 0..4 {
                    let digit = self
                        .peek()
                        .and_then(hex_digit)
                        .ok_or_else(|| ParseError::BadEscape { line: self.line() })?;
                    value = value * 16 + digit;
                    self.pos += 1;
                }
                let c = char::from_u32(value)
                    .ok_or_else(|| ParseError::BadEscape { line: self.line() })?;
                out.push(c);
            }
            '0'..='7' => {
                let mut value = c as u32 - '0' as u32;
                for _ in 0..2 {
                    match self.peek() {
                        Some(b @ b'0'..=b'7') => {
                            value = value * 8 + (b - b'0') as u32;
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                // octal escapes top out at 0o777, always a valid codepoint
                out.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn parse_token(&mut self) -> Result<&'a str, ParseError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if is_unquoted_char(b) {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(ParseError::UnexpectedChar {
                found: self.current_char(),
                line: self.line(),
            });
        }
        Ok(&self.text[start..self.pos])
    }
}

fn is_unquoted_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'$' | b'+' | b'-' | b'/' | b':')
}

fn hex_digit(byte: u8) -> Option<u32> {
    (byte as char).to_digit(16)
}

fn is_integer_token(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_float_token(token: &str) -> bool {
    let body = token.strip_prefix('-').unwrap_or(token);
    let Some((integral, fraction)) = body.split_once('.') else {
        return false;
    };
    (!integral.is_empty() || !fraction.is_empty())
        && integral.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

/// Classify an unquoted token. Deliberately narrower than `f64::from_str`:
/// tokens like `infinity` are glyph names, not numbers.
fn token_to_plist(token: &str) -> Plist {
    if is_integer_token(token) {
        if let Ok(value) = token.parse::<i64>() {
            return Plist::Integer(value);
        }
    }
    if is_integer_token(token) || is_float_token(token) {
        if let Ok(value) = token.parse::<f64>() {
            return Plist::Float(value);
        }
    }
    Plist::String(token.to_string())
}

fn write_float(out: &mut String, value: f64) {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        out.push_str(&(value as i64).to_string());
    } else {
        out.push_str(&value.to_string());
    }
}

fn write_string(out: &mut String, value: &str) {
    if !needs_quotes(value) {
        out.push_str(value);
        return;
    }
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 || c as u32 == 0x7F => {
                out.push_str(&format!("\\U{:04X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// A string must be quoted if it is empty, contains characters outside the
/// unquoted-safe set, or would read back as a number.
fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || !value.bytes().all(is_unquoted_char)
        || is_integer_token(value)
        || is_float_token(value)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use pretty_assertions::assert_eq;
    use similar::TextDiff;

    #[test]
    fn dictionary_keys_keep_file_order() {
        let doc = Plist::parse("{\nzebra = 1;\napple = 2;\nmango = 3;\n}").unwrap();
        let keys: Vec<&str> = doc.as_dict().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn classifies_numbers_and_names() {
        let doc = Plist::parse("(12, -3, 4.5, .5, 12a, infinity, \"34\")").unwrap();
        assert_eq!(
            doc,
            Plist::Array(vec![
                Plist::Integer(12),
                Plist::Integer(-3),
                Plist::Float(4.5),
                Plist::Float(0.5),
                Plist::String("12a".into()),
                Plist::String("infinity".into()),
                Plist::String("34".into()),
            ])
        );
    }

    #[test]
    fn quoted_string_escapes() {
        let doc = Plist::parse(r#""a\nb\t\"c\"\\d\U0041\101""#).unwrap();
        assert_eq!(doc, Plist::String("a\nb\t\"c\"\\dAA".into()));
    }

    #[test]
    fn data_blocks() {
        let doc = Plist::parse("<48 65 6c6c 6f>").unwrap();
        assert_eq!(doc, Plist::Data(b"Hello".to_vec()));
        assert!(matches!(
            Plist::parse("<486>"),
            Err(ParseError::BadData { .. })
        ));
    }

    #[test]
    fn comments_are_whitespace() {
        let doc = Plist::parse("// header\n{\na = 1; /* inline */ b = 2;\n}").unwrap();
        assert_eq!(doc.as_dict().unwrap().len(), 2);
    }

    #[test]
    fn rejects_trailing_content() {
        assert!(matches!(
            Plist::parse("{\na = 1;\n}\nextra"),
            Err(ParseError::TrailingContent { .. })
        ));
    }

    #[test]
    fn rejects_truncated_documents() {
        assert!(matches!(
            Plist::parse("{\na = (1, 2"),
            Err(ParseError::UnexpectedEof { .. })
        ));
        assert!(matches!(Plist::parse("  "), Err(ParseError::UnexpectedEof { .. })));
    }

    #[test]
    fn writes_canonical_form() {
        let mut dict = Dictionary::new();
        dict.insert("familyName".into(), "Test Font".into());
        dict.insert("unitsPerEm".into(), 1000.into());
        dict.insert("weights".into(), Plist::Array(vec![400.into(), 700.into()]));
        assert_eq!(
            Plist::Dictionary(dict).to_text(),
            "{\nfamilyName = \"Test Font\";\nunitsPerEm = 1000;\nweights = (\n400,\n700\n);\n}\n"
        );
    }

    #[test]
    fn canonical_text_round_trips() {
        let text = "{\nfamilyName = \"Test Font\";\nglyphs = (\n{\nglyphname = A;\nunicode = 65;\nwidth = 0.5;\n},\n{\nglyphname = \"12\";\n}\n);\nnote = \"line\\nbreak\";\n}\n";
        let reserialized = Plist::parse(text).unwrap().to_text();
        let diff = TextDiff::from_lines(text, &reserialized);
        assert_eq!(diff.ratio(), 1.0);
    }

    #[test]
    fn numeric_looking_strings_stay_strings() {
        let doc = Plist::String("42".into());
        assert_eq!(doc.to_text(), "\"42\"\n");
        assert_eq!(Plist::parse(&doc.to_text()).unwrap(), doc);
    }

    #[test]
    fn empty_collections() {
        assert_eq!(Plist::parse("(\n)").unwrap(), Plist::Array(vec![]));
        assert_eq!(
            Plist::parse("{\n}").unwrap(),
            Plist::Dictionary(Dictionary::new())
        );
        assert_eq!(Plist::Array(vec![]).to_text(), "(\n)\n");
    }

    #[test]
    fn floats_write_without_trailing_zeros() {
        assert_eq!(Plist::Float(600.0).to_text(), "600\n");
        assert_eq!(Plist::Float(-0.25).to_text(), "-0.25\n");
    }
}
