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

use crate::AvroResult;
use crate::decode::Decoder;
use crate::decode::lexer::{JsonLexer, Token};
use crate::error::Details;
use crate::schema::{EnumSchema, UnionSchema};
use std::io::Read;

/// Reads the Avro JSON wire format.
///
/// Record fields must appear in schema order; each key is checked against
/// the expected field name. Union values are either a bare `null` or a
/// one-key object tagged with the branch's wire name.
pub struct JsonDecoder<R: Read> {
    lexer: JsonLexer<R>,
    // one entry per open union: whether it came wrapped in an object
    union_stack: Vec<bool>,
}

impl<R: Read> JsonDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lexer: JsonLexer::new(reader),
            union_stack: Vec::new(),
        }
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> AvroResult<()> {
        let token = self.lexer.advance()?;
        if token == expected {
            Ok(())
        } else {
            Err(Details::JsonUnexpectedToken {
                expected: what,
                found: token.describe(),
            }
            .into())
        }
    }

    /// Consume tokens until the already-opened container closes.
    fn skip_balanced(&mut self) -> AvroResult<()> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.lexer.advance()? {
                Token::ArrayStart | Token::ObjectStart => depth += 1,
                Token::ArrayEnd | Token::ObjectEnd => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }
}

impl<R: Read> Decoder for JsonDecoder<R> {
    fn read_null(&mut self) -> AvroResult<()> {
        self.expect(Token::Null, "null")
    }

    fn read_boolean(&mut self) -> AvroResult<bool> {
        self.lexer.advance()?.bool_value()
    }

    fn read_int(&mut self) -> AvroResult<i32> {
        let value = self.lexer.advance()?.long_value()?;
        i32::try_from(value).map_err(|e| Details::ZagI32(e, value).into())
    }

    fn read_long(&mut self) -> AvroResult<i64> {
        self.lexer.advance()?.long_value()
    }

    fn read_float(&mut self) -> AvroResult<f32> {
        Ok(self.lexer.advance()?.double_value()? as f32)
    }

    fn read_double(&mut self) -> AvroResult<f64> {
        self.lexer.advance()?.double_value()
    }

    fn read_bytes(&mut self) -> AvroResult<Vec<u8>> {
        let text = self.lexer.advance()?.string_value()?;
        let mut bytes = Vec::with_capacity(text.len());
        for c in text.chars() {
            let code = c as u32;
            if code > 0xFF {
                return Err(Details::NonLatin1Character(c).into());
            }
            bytes.push(code as u8);
        }
        Ok(bytes)
    }

    fn read_string(&mut self) -> AvroResult<String> {
        self.lexer.advance()?.string_value()
    }

    fn read_fixed(&mut self, size: usize) -> AvroResult<Vec<u8>> {
        let bytes = self.read_bytes()?;
        if bytes.len() != size {
            return Err(Details::FixedValueLength {
                expected: size,
                found: bytes.len(),
            }
            .into());
        }
        Ok(bytes)
    }

    fn read_enum(&mut self, schema: &EnumSchema) -> AvroResult<usize> {
        let symbol = self.lexer.advance()?.string_value()?;
        schema
            .ordinal(&symbol)
            .ok_or_else(|| Details::GetEnumSymbol(symbol).into())
    }

    fn read_array_start(&mut self) -> AvroResult<usize> {
        self.expect(Token::ArrayStart, "'['")?;
        self.read_array_next()
    }

    fn read_array_next(&mut self) -> AvroResult<usize> {
        if self.lexer.peek()? == &Token::ArrayEnd {
            self.lexer.advance()?;
            Ok(0)
        } else {
            Ok(1)
        }
    }

    fn read_map_start(&mut self) -> AvroResult<usize> {
        self.expect(Token::ObjectStart, "'{'")?;
        self.read_map_next()
    }

    fn read_map_next(&mut self) -> AvroResult<usize> {
        if self.lexer.peek()? == &Token::ObjectEnd {
            self.lexer.advance()?;
            Ok(0)
        } else {
            Ok(1)
        }
    }

    fn read_map_key(&mut self) -> AvroResult<String> {
        self.lexer.advance()?.string_value()
    }

    fn read_record_start(&mut self) -> AvroResult<()> {
        self.expect(Token::ObjectStart, "'{'")
    }

    fn read_field_head(&mut self, name: &str) -> AvroResult<()> {
        let key = self.lexer.advance()?.string_value()?;
        if key == name {
            Ok(())
        } else {
            Err(Details::JsonFieldMismatch {
                expected: name.to_string(),
                found: key,
            }
            .into())
        }
    }

    fn read_record_end(&mut self) -> AvroResult<()> {
        self.expect(Token::ObjectEnd, "'}'")
    }

    fn read_union_index(&mut self, union: &UnionSchema) -> AvroResult<usize> {
        enum Head {
            Null,
            Object,
            Other(String),
        }
        let head = match self.lexer.peek()? {
            Token::Null => Head::Null,
            Token::ObjectStart => Head::Object,
            other => Head::Other(other.describe()),
        };
        match head {
            // the bare null is left in place for the following read_null
            Head::Null => {
                let index = union
                    .null_index()
                    .ok_or_else(|| Details::GetUnionVariantName("null".to_string()))?;
                self.union_stack.push(false);
                Ok(index)
            }
            Head::Object => {
                self.lexer.advance()?;
                let branch = self.lexer.advance()?.string_value()?;
                let index = union
                    .index_of_name(&branch)
                    .ok_or_else(|| Details::GetUnionVariantName(branch))?;
                self.union_stack.push(true);
                Ok(index)
            }
            Head::Other(found) => Err(Details::JsonUnexpectedToken {
                expected: "union value",
                found,
            }
            .into()),
        }
    }

    fn read_union_end(&mut self) -> AvroResult<()> {
        match self.union_stack.pop() {
            Some(true) => self.expect(Token::ObjectEnd, "'}'"),
            Some(false) => Ok(()),
            None => Err(Details::IllegalCodecState("read_union_end without a union").into()),
        }
    }

    fn skip_bytes(&mut self) -> AvroResult<()> {
        self.lexer.advance()?.string_value()?;
        Ok(())
    }

    fn skip_string(&mut self) -> AvroResult<()> {
        self.skip_bytes()
    }

    fn skip_fixed(&mut self, _size: usize) -> AvroResult<()> {
        self.skip_bytes()
    }

    fn skip_array(&mut self) -> AvroResult<usize> {
        self.expect(Token::ArrayStart, "'['")?;
        self.skip_balanced()?;
        Ok(0)
    }

    fn skip_map(&mut self) -> AvroResult<usize> {
        self.expect(Token::ObjectStart, "'{'")?;
        self.skip_balanced()?;
        Ok(0)
    }
}
