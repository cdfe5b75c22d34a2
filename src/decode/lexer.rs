// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! An incremental pull lexer over a JSON byte stream.
//!
//! String tokens keep their escaped form; [`unescape`] decodes them on
//! access. The bareword float spellings `NaN`, `Infinity` and `-Infinity`
//! lex as doubles, and [`Token::double_value`] additionally promotes longs
//! and the quoted spellings.

use crate::AvroResult;
use crate::buffer::BlockReader;
use crate::error::Details;
use std::io::Read;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Null,
    Bool(bool),
    Long(i64),
    Double(f64),
    /// String content with its escapes intact, quotes stripped.
    String(String),
    ArrayStart,
    ArrayEnd,
    ObjectStart,
    ObjectEnd,
}

impl Token {
    /// A short description for error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Null => "null".to_string(),
            Token::Bool(b) => b.to_string(),
            Token::Long(n) => n.to_string(),
            Token::Double(x) => x.to_string(),
            Token::String(s) => format!("\"{s}\""),
            Token::ArrayStart => "'['".to_string(),
            Token::ArrayEnd => "']'".to_string(),
            Token::ObjectStart => "'{'".to_string(),
            Token::ObjectEnd => "'}'".to_string(),
        }
    }

    pub fn bool_value(&self) -> AvroResult<bool> {
        match self {
            Token::Bool(value) => Ok(*value),
            other => Err(Details::JsonUnexpectedToken {
                expected: "boolean",
                found: other.describe(),
            }
            .into()),
        }
    }

    pub fn long_value(&self) -> AvroResult<i64> {
        match self {
            Token::Long(value) => Ok(*value),
            other => Err(Details::JsonUnexpectedToken {
                expected: "integer",
                found: other.describe(),
            }
            .into()),
        }
    }

    /// A double; longs promote, as do the quoted non-finite spellings.
    pub fn double_value(&self) -> AvroResult<f64> {
        match self {
            Token::Double(value) => Ok(*value),
            Token::Long(value) => Ok(*value as f64),
            Token::String(raw) => match unescape(raw)?.as_str() {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                other => Err(Details::JsonUnexpectedToken {
                    expected: "double",
                    found: format!("\"{other}\""),
                }
                .into()),
            },
            other => Err(Details::JsonUnexpectedToken {
                expected: "double",
                found: other.describe(),
            }
            .into()),
        }
    }

    /// The decoded text of a string token.
    pub fn string_value(&self) -> AvroResult<String> {
        match self {
            Token::String(raw) => unescape(raw),
            other => Err(Details::JsonUnexpectedToken {
                expected: "string",
                found: other.describe(),
            }
            .into()),
        }
    }
}

/// Decode the escapes of a raw string token.
pub fn unescape(raw: &str) -> AvroResult<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let code = read_hex4(&mut chars)?;
                if (0xD800..=0xDBFF).contains(&code) {
                    // a high surrogate must pair with a following \uXXXX low
                    // surrogate
                    match (chars.next(), chars.next()) {
                        (Some('\\'), Some('u')) => {
                            let low = read_hex4(&mut chars)?;
                            if !(0xDC00..=0xDFFF).contains(&low) {
                                return Err(Details::JsonInvalidEscape(format!(
                                    "\\u{code:04x}\\u{low:04x}"
                                ))
                                .into());
                            }
                            let combined =
                                0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                            match char::from_u32(combined) {
                                Some(c) => out.push(c),
                                None => {
                                    return Err(Details::JsonInvalidEscape(format!(
                                        "\\u{code:04x}\\u{low:04x}"
                                    ))
                                    .into());
                                }
                            }
                        }
                        _ => {
                            return Err(
                                Details::JsonInvalidEscape(format!("\\u{code:04x}")).into()
                            );
                        }
                    }
                } else {
                    match char::from_u32(code) {
                        Some(c) => out.push(c),
                        None => {
                            return Err(
                                Details::JsonInvalidEscape(format!("\\u{code:04x}")).into()
                            );
                        }
                    }
                }
            }
            Some(other) => {
                return Err(Details::JsonInvalidEscape(format!("\\{other}")).into());
            }
            None => return Err(Details::JsonInvalidEscape("\\".to_string()).into()),
        }
    }
    Ok(out)
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> AvroResult<u32> {
    let mut code = 0u32;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| Details::JsonInvalidEscape("\\u".to_string()))?;
        code = (code << 4) | digit;
    }
    Ok(code)
}

/// Pull-parses JSON tokens from a byte stream with one-token lookahead.
pub struct JsonLexer<R: Read> {
    input: BlockReader<R>,
    peeked: Option<Token>,
}

impl<R: Read> JsonLexer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            input: BlockReader::new(reader),
            peeked: None,
        }
    }

    /// Consume and return the next token.
    pub fn advance(&mut self) -> AvroResult<Token> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lex_token(),
        }
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> AvroResult<&Token> {
        if self.peeked.is_none() {
            let token = self.lex_token()?;
            self.peeked = Some(token);
        }
        match &self.peeked {
            Some(token) => Ok(token),
            None => Err(Details::JsonUnexpectedEof.into()),
        }
    }

    /// Commas and colons separate tokens; structural validation is the
    /// decoder's job.
    fn skip_separators(&mut self) -> AvroResult<()> {
        while let Some(byte) = self.input.peek_byte()? {
            match byte {
                b' ' | b'\t' | b'\n' | b'\r' | b',' | b':' => {
                    self.input.next_byte()?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn lex_token(&mut self) -> AvroResult<Token> {
        self.skip_separators()?;
        let byte = self
            .input
            .next_byte()?
            .ok_or(Details::JsonUnexpectedEof)?;
        match byte {
            b'{' => Ok(Token::ObjectStart),
            b'}' => Ok(Token::ObjectEnd),
            b'[' => Ok(Token::ArrayStart),
            b']' => Ok(Token::ArrayEnd),
            b'"' => self.lex_string(),
            b'n' => {
                self.expect_word("ull")?;
                Ok(Token::Null)
            }
            b't' => {
                self.expect_word("rue")?;
                Ok(Token::Bool(true))
            }
            b'f' => {
                self.expect_word("alse")?;
                Ok(Token::Bool(false))
            }
            b'N' => {
                self.expect_word("aN")?;
                Ok(Token::Double(f64::NAN))
            }
            b'I' => {
                self.expect_word("nfinity")?;
                Ok(Token::Double(f64::INFINITY))
            }
            b'-' | b'0'..=b'9' => self.lex_number(byte),
            other => Err(Details::JsonUnexpectedByte(other).into()),
        }
    }

    fn expect_word(&mut self, rest: &str) -> AvroResult<()> {
        for expected in rest.bytes() {
            match self.input.next_byte()? {
                Some(byte) if byte == expected => {}
                Some(byte) => return Err(Details::JsonUnexpectedByte(byte).into()),
                None => return Err(Details::JsonUnexpectedEof.into()),
            }
        }
        Ok(())
    }

    /// Collect the raw (still escaped) body of a string token.
    fn lex_string(&mut self) -> AvroResult<Token> {
        let mut raw = Vec::new();
        loop {
            let byte = self
                .input
                .next_byte()?
                .ok_or(Details::JsonUnexpectedEof)?;
            match byte {
                b'"' => break,
                b'\\' => {
                    raw.push(byte);
                    let escaped = self
                        .input
                        .next_byte()?
                        .ok_or(Details::JsonUnexpectedEof)?;
                    match escaped {
                        b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' | b'u' => {
                            raw.push(escaped);
                        }
                        other => {
                            return Err(Details::JsonInvalidEscape(format!(
                                "\\{}",
                                other as char
                            ))
                            .into());
                        }
                    }
                }
                _ => raw.push(byte),
            }
        }
        String::from_utf8(raw)
            .map(Token::String)
            .map_err(|e| Details::ConvertToUtf8(e).into())
    }

    /// Numeric tokenisation: sign, leading digits, fraction, exponent sign,
    /// exponent digits. Multi-digit integers may not start with zero.
    fn lex_number(&mut self, first: u8) -> AvroResult<Token> {
        let mut text = String::new();
        let mut byte = first;

        if byte == b'-' {
            text.push('-');
            match self.input.peek_byte()? {
                Some(b'I') => {
                    self.input.next_byte()?;
                    self.expect_word("nfinity")?;
                    return Ok(Token::Double(f64::NEG_INFINITY));
                }
                Some(digit) if digit.is_ascii_digit() => {
                    self.input.next_byte()?;
                    byte = digit;
                }
                _ => return Err(Details::JsonNumberFormat(text).into()),
            }
        }

        text.push(byte as char);
        if byte == b'0' {
            if let Some(next) = self.input.peek_byte()? {
                if next.is_ascii_digit() {
                    return Err(Details::JsonNumberFormat(format!("{text}{}", next as char)).into());
                }
            }
        } else {
            self.take_digits(&mut text, false)?;
        }

        let mut is_double = false;
        if self.input.peek_byte()? == Some(b'.') {
            self.input.next_byte()?;
            text.push('.');
            is_double = true;
            self.take_digits(&mut text, true)?;
        }
        if matches!(self.input.peek_byte()?, Some(b'e') | Some(b'E')) {
            self.input.next_byte()?;
            text.push('e');
            is_double = true;
            if let Some(sign @ (b'+' | b'-')) = self.input.peek_byte()? {
                self.input.next_byte()?;
                text.push(sign as char);
            }
            self.take_digits(&mut text, true)?;
        }

        if is_double {
            let value: f64 = text
                .parse()
                .map_err(|_| Details::JsonNumberFormat(text.clone()))?;
            Ok(Token::Double(value))
        } else {
            match text.parse::<i64>() {
                Ok(value) => Ok(Token::Long(value)),
                // integers beyond 64 bits degrade to doubles
                Err(_) => text
                    .parse::<f64>()
                    .map(Token::Double)
                    .map_err(|_| Details::JsonNumberFormat(text.clone()).into()),
            }
        }
    }

    /// Append following digits to `text`; with `at_least_one` the next byte
    /// must be a digit.
    fn take_digits(&mut self, text: &mut String, at_least_one: bool) -> AvroResult<()> {
        let mut seen = false;
        while let Some(byte) = self.input.peek_byte()? {
            if byte.is_ascii_digit() {
                self.input.next_byte()?;
                text.push(byte as char);
                seen = true;
            } else {
                break;
            }
        }
        if at_least_one && !seen {
            return Err(Details::JsonNumberFormat(text.clone()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(input: &str) -> Vec<Token> {
        let mut lexer = JsonLexer::new(input.as_bytes());
        let mut out = Vec::new();
        let mut depth = 0i32;
        loop {
            let token = match lexer.advance() {
                Ok(token) => token,
                Err(_) => break,
            };
            match token {
                Token::ArrayStart | Token::ObjectStart => depth += 1,
                Token::ArrayEnd | Token::ObjectEnd => depth -= 1,
                _ => {}
            }
            out.push(token);
            if depth == 0 {
                break;
            }
        }
        out
    }

    #[test]
    fn literals() {
        assert_eq!(tokens("null"), vec![Token::Null]);
        assert_eq!(tokens("true"), vec![Token::Bool(true)]);
        assert_eq!(tokens("false"), vec![Token::Bool(false)]);
        assert_eq!(tokens("42"), vec![Token::Long(42)]);
        assert_eq!(tokens("-7"), vec![Token::Long(-7)]);
    }

    #[test]
    fn structures() {
        assert_eq!(
            tokens(r#"{"a": [1, 2]}"#),
            vec![
                Token::ObjectStart,
                Token::String("a".to_string()),
                Token::ArrayStart,
                Token::Long(1),
                Token::Long(2),
                Token::ArrayEnd,
                Token::ObjectEnd,
            ]
        );
    }

    #[test]
    fn doubles() {
        assert_eq!(tokens("2.5"), vec![Token::Double(2.5)]);
        assert_eq!(tokens("-0"), vec![Token::Long(0)]);
        assert_eq!(tokens("-0.5"), vec![Token::Double(-0.5)]);
        assert_eq!(tokens("1.23e+20"), vec![Token::Double(1.23e20)]);
        assert_eq!(tokens("1.23E-2"), vec![Token::Double(1.23e-2)]);
        assert_eq!(tokens("5e3"), vec![Token::Double(5000.0)]);
    }

    #[test]
    fn non_finite_barewords() {
        assert_eq!(tokens("Infinity"), vec![Token::Double(f64::INFINITY)]);
        assert_eq!(tokens("-Infinity"), vec![Token::Double(f64::NEG_INFINITY)]);
        match tokens("NaN").as_slice() {
            [Token::Double(x)] => assert!(x.is_nan()),
            other => panic!("Expected one NaN token, got {other:?}"),
        }
    }

    #[test]
    fn leading_zeros_are_rejected_for_multi_digit_integers() {
        let mut lexer = JsonLexer::new("01".as_bytes());
        assert!(lexer.advance().is_err());

        let mut lexer = JsonLexer::new("-012".as_bytes());
        assert!(lexer.advance().is_err());

        // a lone zero and a zero-led fraction are fine
        assert_eq!(tokens("0"), vec![Token::Long(0)]);
        assert_eq!(tokens("0.25"), vec![Token::Double(0.25)]);
    }

    #[test]
    fn trailing_garbage_in_numbers_fails() {
        let mut lexer = JsonLexer::new("1.".as_bytes());
        assert!(lexer.advance().is_err());
        let mut lexer = JsonLexer::new("1e".as_bytes());
        assert!(lexer.advance().is_err());
        let mut lexer = JsonLexer::new("-".as_bytes());
        assert!(lexer.advance().is_err());
    }

    #[test]
    fn strings_keep_their_escaped_form() {
        assert_eq!(
            tokens(r#""a\nb""#),
            vec![Token::String(r"a\nb".to_string())]
        );
        assert_eq!(
            Token::String(r"a\nb".to_string()).string_value().unwrap(),
            "a\nb"
        );
    }

    #[test]
    fn unescape_handles_unicode_and_surrogates() {
        assert_eq!(unescape(r"A").unwrap(), "A");
        assert_eq!(unescape(r"😀").unwrap(), "😀");
        assert_eq!(unescape(r"\/").unwrap(), "/");
        assert!(unescape(r"\ud83d").is_err());
        assert!(unescape(r"\x41").is_err());
    }

    #[test]
    fn peek_is_one_token_of_lookahead() {
        let mut lexer = JsonLexer::new("[1, 2]".as_bytes());
        assert_eq!(lexer.advance().unwrap(), Token::ArrayStart);
        assert_eq!(lexer.peek().unwrap(), &Token::Long(1));
        assert_eq!(lexer.peek().unwrap(), &Token::Long(1));
        assert_eq!(lexer.advance().unwrap(), Token::Long(1));
        assert_eq!(lexer.advance().unwrap(), Token::Long(2));
        assert_eq!(lexer.advance().unwrap(), Token::ArrayEnd);
    }

    #[test]
    fn long_promotes_to_double_on_demand() {
        assert_eq!(Token::Long(3).double_value().unwrap(), 3.0);
        assert_eq!(
            Token::String("Infinity".to_string()).double_value().unwrap(),
            f64::INFINITY
        );
        assert!(Token::Bool(true).double_value().is_err());
    }
}
