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
use crate::buffer::BlockWriter;
use crate::encode::{Encoder, UnionBranch};
use crate::error::Details;
use std::io::Write;

/// Append `s` to `out` with Avro JSON escaping: the short escapes, `\uXXXX`
/// for C0 controls, DEL, the C1 range and the U+2028/U+2029 separators.
pub(crate) fn escape_json(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if needs_unicode_escape(c) => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
}

fn needs_unicode_escape(c: char) -> bool {
    let code = c as u32;
    code < 0x20
        || code == 0x7f
        || (0x80..=0x9f).contains(&code)
        || code == 0x2028
        || code == 0x2029
}

/// The JSON construct currently being emitted.
enum State {
    // a record or a map
    Object { first: bool },
    Array { first: bool },
    // a non-null union branch, wrapped in a one-key object
    UnionWrapped,
    // the null union branch, written bare
    UnionBare,
}

/// Writes the Avro JSON wire format.
///
/// Unions become `{"<wire name>": value}` with a bare `null` for the null
/// branch; bytes and fixed become strings through the latin-1 mapping;
/// non-finite floats become the barewords `NaN`, `Infinity`, `-Infinity`.
pub struct JsonEncoder<W: Write> {
    out: BlockWriter<W>,
    stack: Vec<State>,
}

impl<W: Write> JsonEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            out: BlockWriter::new(writer),
            stack: Vec::new(),
        }
    }

    /// Flush and hand back the sink.
    pub fn into_inner(self) -> AvroResult<W> {
        self.out.into_inner()
    }

    fn emit(&mut self, text: &str) -> AvroResult<()> {
        self.out.write_all_bytes(text.as_bytes())
    }

    fn emit_quoted(&mut self, text: &str) -> AvroResult<()> {
        let mut escaped = String::with_capacity(text.len() + 2);
        escaped.push('"');
        escape_json(text, &mut escaped);
        escaped.push('"');
        self.emit(&escaped)
    }

    /// Comma handling for the next key of the object on top of the stack.
    fn next_key(&mut self, context: &'static str) -> AvroResult<()> {
        let needs_comma = match self.stack.last_mut() {
            Some(State::Object { first }) => {
                let needs_comma = !*first;
                *first = false;
                needs_comma
            }
            _ => return Err(Details::IllegalCodecState(context).into()),
        };
        if needs_comma { self.emit(",") } else { Ok(()) }
    }
}

impl<W: Write> Encoder for JsonEncoder<W> {
    fn write_null(&mut self) -> AvroResult<()> {
        self.emit("null")
    }

    fn write_boolean(&mut self, value: bool) -> AvroResult<()> {
        self.emit(if value { "true" } else { "false" })
    }

    fn write_int(&mut self, value: i32) -> AvroResult<()> {
        self.emit(&value.to_string())
    }

    fn write_long(&mut self, value: i64) -> AvroResult<()> {
        self.emit(&value.to_string())
    }

    fn write_float(&mut self, value: f32) -> AvroResult<()> {
        if value.is_nan() {
            self.emit("NaN")
        } else if value == f32::INFINITY {
            self.emit("Infinity")
        } else if value == f32::NEG_INFINITY {
            self.emit("-Infinity")
        } else {
            self.emit(&value.to_string())
        }
    }

    fn write_double(&mut self, value: f64) -> AvroResult<()> {
        if value.is_nan() {
            self.emit("NaN")
        } else if value == f64::INFINITY {
            self.emit("Infinity")
        } else if value == f64::NEG_INFINITY {
            self.emit("-Infinity")
        } else {
            self.emit(&value.to_string())
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> AvroResult<()> {
        // each byte maps to the latin-1 code point of the same value
        let text: String = bytes.iter().map(|&b| b as char).collect();
        self.emit_quoted(&text)
    }

    fn write_string(&mut self, value: &str) -> AvroResult<()> {
        self.emit_quoted(value)
    }

    fn write_fixed(&mut self, bytes: &[u8]) -> AvroResult<()> {
        self.write_bytes(bytes)
    }

    fn write_enum(&mut self, _ordinal: usize, symbol: &str) -> AvroResult<()> {
        self.emit_quoted(symbol)
    }

    fn write_array_start(&mut self) -> AvroResult<()> {
        self.stack.push(State::Array { first: true });
        self.emit("[")
    }

    fn set_item_count(&mut self, _count: usize) -> AvroResult<()> {
        Ok(())
    }

    fn start_item(&mut self) -> AvroResult<()> {
        let needs_comma = match self.stack.last_mut() {
            Some(State::Array { first }) => {
                let needs_comma = !*first;
                *first = false;
                needs_comma
            }
            // map items place their comma with the key
            Some(State::Object { .. }) => false,
            _ => {
                return Err(
                    Details::IllegalCodecState("start_item outside a container").into()
                );
            }
        };
        if needs_comma { self.emit(",") } else { Ok(()) }
    }

    fn write_array_end(&mut self) -> AvroResult<()> {
        match self.stack.pop() {
            Some(State::Array { .. }) => self.emit("]"),
            _ => Err(Details::IllegalCodecState("write_array_end without start").into()),
        }
    }

    fn write_map_start(&mut self) -> AvroResult<()> {
        self.stack.push(State::Object { first: true });
        self.emit("{")
    }

    fn write_map_key(&mut self, key: &str) -> AvroResult<()> {
        self.next_key("write_map_key outside a map")?;
        self.emit_quoted(key)?;
        self.emit(":")
    }

    fn write_map_end(&mut self) -> AvroResult<()> {
        match self.stack.pop() {
            Some(State::Object { .. }) => self.emit("}"),
            _ => Err(Details::IllegalCodecState("write_map_end without start").into()),
        }
    }

    fn write_record_start(&mut self) -> AvroResult<()> {
        self.stack.push(State::Object { first: true });
        self.emit("{")
    }

    fn write_field_head(&mut self, name: &str) -> AvroResult<()> {
        self.next_key("write_field_head outside a record")?;
        self.emit_quoted(name)?;
        self.emit(":")
    }

    fn write_record_end(&mut self) -> AvroResult<()> {
        match self.stack.pop() {
            Some(State::Object { .. }) => self.emit("}"),
            _ => Err(Details::IllegalCodecState("write_record_end without start").into()),
        }
    }

    fn write_union_branch(&mut self, _index: usize, branch: UnionBranch<'_>) -> AvroResult<()> {
        match branch {
            UnionBranch::Null => {
                self.stack.push(State::UnionBare);
                Ok(())
            }
            UnionBranch::Named(name) => {
                self.stack.push(State::UnionWrapped);
                self.emit("{")?;
                self.emit_quoted(name)?;
                self.emit(":")
            }
        }
    }

    fn write_union_end(&mut self) -> AvroResult<()> {
        match self.stack.pop() {
            Some(State::UnionWrapped) => self.emit("}"),
            Some(State::UnionBare) => Ok(()),
            _ => Err(Details::IllegalCodecState("write_union_end without branch").into()),
        }
    }

    fn flush(&mut self) -> AvroResult<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn encoded(f: impl FnOnce(&mut JsonEncoder<&mut Vec<u8>>)) -> String {
        let mut out = Vec::new();
        let mut encoder = JsonEncoder::new(&mut out);
        f(&mut encoder);
        encoder.flush().unwrap();
        drop(encoder);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn primitives() {
        assert_eq!(encoded(|e| e.write_null().unwrap()), "null");
        assert_eq!(encoded(|e| e.write_boolean(true).unwrap()), "true");
        assert_eq!(encoded(|e| e.write_int(-3).unwrap()), "-3");
        assert_eq!(encoded(|e| e.write_long(1234567890123).unwrap()), "1234567890123");
        assert_eq!(encoded(|e| e.write_double(2.5).unwrap()), "2.5");
    }

    #[test]
    fn non_finite_floats_are_barewords() {
        assert_eq!(encoded(|e| e.write_double(f64::NAN).unwrap()), "NaN");
        assert_eq!(
            encoded(|e| e.write_double(f64::INFINITY).unwrap()),
            "Infinity"
        );
        assert_eq!(
            encoded(|e| e.write_float(f32::NEG_INFINITY).unwrap()),
            "-Infinity"
        );
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(
            encoded(|e| e.write_string("a\"b\\c\nd\te").unwrap()),
            r#""a\"b\\c\nd\te""#
        );
        assert_eq!(
            encoded(|e| e.write_string("\u{1}\u{7f}\u{2028}").unwrap()),
            "\"\\u0001\\u007f\\u2028\""
        );
    }

    #[test]
    fn bytes_use_the_latin1_mapping() {
        let text = encoded(|e| e.write_bytes(&[0x41, 0x00, 0xff]).unwrap());
        assert_eq!(text, "\"A\\u0000ÿ\"");
    }

    #[test]
    fn records_and_maps_place_commas() {
        let text = encoded(|e| {
            e.write_record_start().unwrap();
            e.write_field_head("a").unwrap();
            e.write_int(1).unwrap();
            e.write_field_head("b").unwrap();
            e.write_string("two").unwrap();
            e.write_record_end().unwrap();
        });
        assert_eq!(text, r#"{"a":1,"b":"two"}"#);

        let text = encoded(|e| {
            e.write_map_start().unwrap();
            e.start_item().unwrap();
            e.write_map_key("m1").unwrap();
            e.write_long(10).unwrap();
            e.start_item().unwrap();
            e.write_map_key("m2").unwrap();
            e.write_long(20).unwrap();
            e.write_map_end().unwrap();
        });
        assert_eq!(text, r#"{"m1":10,"m2":20}"#);
    }

    #[test]
    fn arrays_place_commas() {
        let text = encoded(|e| {
            e.write_array_start().unwrap();
            e.set_item_count(2).unwrap();
            e.start_item().unwrap();
            e.write_int(1).unwrap();
            e.start_item().unwrap();
            e.write_int(2).unwrap();
            e.write_array_end().unwrap();
        });
        assert_eq!(text, "[1,2]");

        let text = encoded(|e| {
            e.write_array_start().unwrap();
            e.write_array_end().unwrap();
        });
        assert_eq!(text, "[]");
    }

    #[test]
    fn unions_are_tagged_objects_except_null() {
        let text = encoded(|e| {
            e.write_union_branch(0, UnionBranch::Named("int")).unwrap();
            e.write_int(8).unwrap();
            e.write_union_end().unwrap();
        });
        assert_eq!(text, r#"{"int":8}"#);

        let text = encoded(|e| {
            e.write_union_branch(1, UnionBranch::Null).unwrap();
            e.write_null().unwrap();
            e.write_union_end().unwrap();
        });
        assert_eq!(text, "null");
    }

    #[test]
    fn enums_write_the_symbol() {
        assert_eq!(
            encoded(|e| e.write_enum(1, "PARTTIME").unwrap()),
            r#""PARTTIME""#
        );
    }
}
