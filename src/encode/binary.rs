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
use crate::util::{zig_i32, zig_i64};
use std::io::Write;

/// Writes the Avro binary wire format.
///
/// Arrays and maps are emitted as a single positive-count block followed by
/// the zero terminator.
pub struct BinaryEncoder<W: Write> {
    out: BlockWriter<W>,
}

impl<W: Write> BinaryEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            out: BlockWriter::new(writer),
        }
    }

    /// Flush and hand back the sink.
    pub fn into_inner(self) -> AvroResult<W> {
        self.out.into_inner()
    }
}

impl<W: Write> Encoder for BinaryEncoder<W> {
    fn write_null(&mut self) -> AvroResult<()> {
        Ok(())
    }

    fn write_boolean(&mut self, value: bool) -> AvroResult<()> {
        self.out.write_byte(u8::from(value))
    }

    fn write_int(&mut self, value: i32) -> AvroResult<()> {
        zig_i32(value, &mut self.out)?;
        Ok(())
    }

    fn write_long(&mut self, value: i64) -> AvroResult<()> {
        zig_i64(value, &mut self.out)?;
        Ok(())
    }

    fn write_float(&mut self, value: f32) -> AvroResult<()> {
        self.out.write_all_bytes(&value.to_le_bytes())
    }

    fn write_double(&mut self, value: f64) -> AvroResult<()> {
        self.out.write_all_bytes(&value.to_le_bytes())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> AvroResult<()> {
        zig_i64(bytes.len() as i64, &mut self.out)?;
        self.out.write_all_bytes(bytes)
    }

    fn write_string(&mut self, value: &str) -> AvroResult<()> {
        self.write_bytes(value.as_bytes())
    }

    fn write_fixed(&mut self, bytes: &[u8]) -> AvroResult<()> {
        self.out.write_all_bytes(bytes)
    }

    fn write_enum(&mut self, ordinal: usize, _symbol: &str) -> AvroResult<()> {
        self.write_int(ordinal as i32)
    }

    fn write_array_start(&mut self) -> AvroResult<()> {
        Ok(())
    }

    fn set_item_count(&mut self, count: usize) -> AvroResult<()> {
        if count > 0 {
            zig_i64(count as i64, &mut self.out)?;
        }
        Ok(())
    }

    fn start_item(&mut self) -> AvroResult<()> {
        Ok(())
    }

    fn write_array_end(&mut self) -> AvroResult<()> {
        // the terminating zero-count block
        self.out.write_byte(0)
    }

    fn write_map_start(&mut self) -> AvroResult<()> {
        Ok(())
    }

    fn write_map_key(&mut self, key: &str) -> AvroResult<()> {
        self.write_string(key)
    }

    fn write_map_end(&mut self) -> AvroResult<()> {
        self.out.write_byte(0)
    }

    fn write_record_start(&mut self) -> AvroResult<()> {
        Ok(())
    }

    fn write_field_head(&mut self, _name: &str) -> AvroResult<()> {
        Ok(())
    }

    fn write_record_end(&mut self) -> AvroResult<()> {
        Ok(())
    }

    fn write_union_branch(&mut self, index: usize, _branch: UnionBranch<'_>) -> AvroResult<()> {
        self.write_long(index as i64)
    }

    fn write_union_end(&mut self) -> AvroResult<()> {
        Ok(())
    }

    fn flush(&mut self) -> AvroResult<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn encoded(f: impl FnOnce(&mut BinaryEncoder<&mut Vec<u8>>)) -> Vec<u8> {
        let mut out = Vec::new();
        let mut encoder = BinaryEncoder::new(&mut out);
        f(&mut encoder);
        encoder.flush().unwrap();
        drop(encoder);
        out
    }

    #[test]
    fn null_is_zero_bytes() {
        let bytes = encoded(|e| e.write_null().unwrap());
        assert!(bytes.is_empty());
    }

    #[test]
    fn booleans_are_one_byte() {
        assert_eq!(encoded(|e| e.write_boolean(true).unwrap()), vec![1]);
        assert_eq!(encoded(|e| e.write_boolean(false).unwrap()), vec![0]);
    }

    #[test]
    fn ints_are_zigzag_varints() {
        assert_eq!(encoded(|e| e.write_int(8).unwrap()), vec![0x10]);
        assert_eq!(encoded(|e| e.write_int(-1).unwrap()), vec![0x01]);
        assert_eq!(encoded(|e| e.write_long(3).unwrap()), vec![0x06]);
    }

    #[test]
    fn floats_are_little_endian() {
        assert_eq!(
            encoded(|e| e.write_float(1.23f32).unwrap()),
            1.23f32.to_le_bytes().to_vec()
        );
        assert_eq!(
            encoded(|e| e.write_double(-4.5f64).unwrap()),
            (-4.5f64).to_le_bytes().to_vec()
        );
    }

    #[test]
    fn strings_are_length_prefixed() {
        assert_eq!(
            encoded(|e| e.write_string("bob").unwrap()),
            vec![0x06, b'b', b'o', b'b']
        );
        assert_eq!(encoded(|e| e.write_string("").unwrap()), vec![0x00]);
        assert_eq!(encoded(|e| e.write_bytes(&[]).unwrap()), vec![0x00]);
    }

    #[test]
    fn fixed_is_raw() {
        assert_eq!(
            encoded(|e| e.write_fixed(&[1, 2, 3, 4]).unwrap()),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn array_emits_one_block_and_a_terminator() {
        let bytes = encoded(|e| {
            e.write_array_start().unwrap();
            e.set_item_count(2).unwrap();
            e.start_item().unwrap();
            e.write_int(1).unwrap();
            e.start_item().unwrap();
            e.write_int(2).unwrap();
            e.write_array_end().unwrap();
        });
        assert_eq!(bytes, vec![0x04, 0x02, 0x04, 0x00]);
    }

    #[test]
    fn empty_array_is_just_the_terminator() {
        let bytes = encoded(|e| {
            e.write_array_start().unwrap();
            e.set_item_count(0).unwrap();
            e.write_array_end().unwrap();
        });
        assert_eq!(bytes, vec![0x00]);
    }

    #[test]
    fn union_writes_the_branch_tag() {
        let bytes = encoded(|e| {
            e.write_union_branch(1, UnionBranch::Null).unwrap();
            e.write_null().unwrap();
            e.write_union_end().unwrap();
        });
        assert_eq!(bytes, vec![0x02]);
    }

    #[test]
    fn record_hooks_write_nothing() {
        let bytes = encoded(|e| {
            e.write_record_start().unwrap();
            e.write_field_head("a").unwrap();
            e.write_int(1).unwrap();
            e.write_record_end().unwrap();
        });
        assert_eq!(bytes, vec![0x02]);
    }
}
