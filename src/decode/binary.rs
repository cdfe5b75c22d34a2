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
use crate::buffer::BlockReader;
use crate::decode::Decoder;
use crate::error::Details;
use crate::schema::{EnumSchema, UnionSchema};
use crate::util::{safe_len, zag_i32, zag_i64};
use std::io::Read;

/// Reads the Avro binary wire format.
pub struct BinaryDecoder<R: Read> {
    reader: BlockReader<R>,
}

impl<R: Read> BinaryDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BlockReader::new(reader),
        }
    }

    fn read_length(&mut self) -> AvroResult<usize> {
        let len = zag_i64(&mut self.reader)?;
        let len = usize::try_from(len).map_err(|_| Details::IntegerOverflow)?;
        safe_len(len)
    }

    /// Read the next block count; a negative count is followed by the block
    /// size in bytes, which item-by-item readers can ignore.
    fn read_block_count(&mut self) -> AvroResult<usize> {
        let count = zag_i64(&mut self.reader)?;
        if count >= 0 {
            usize::try_from(count).map_err(|_| Details::IntegerOverflow.into())
        } else {
            let _block_bytes = self.read_length()?;
            usize::try_from(count.unsigned_abs()).map_err(|_| Details::IntegerOverflow.into())
        }
    }
}

impl<R: Read> Decoder for BinaryDecoder<R> {
    fn read_null(&mut self) -> AvroResult<()> {
        Ok(())
    }

    fn read_boolean(&mut self) -> AvroResult<bool> {
        match self.reader.next_byte()? {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            Some(other) => Err(Details::BoolValue(other).into()),
            None => Err(Details::UnexpectedEof.into()),
        }
    }

    fn read_int(&mut self) -> AvroResult<i32> {
        zag_i32(&mut self.reader)
    }

    fn read_long(&mut self) -> AvroResult<i64> {
        zag_i64(&mut self.reader)
    }

    fn read_float(&mut self) -> AvroResult<f32> {
        let mut buf = [0u8; 4];
        self.reader.read_exact(&mut buf)?;
        Ok(f32::from_le_bytes(buf))
    }

    fn read_double(&mut self) -> AvroResult<f64> {
        let mut buf = [0u8; 8];
        self.reader.read_exact(&mut buf)?;
        Ok(f64::from_le_bytes(buf))
    }

    fn read_bytes(&mut self) -> AvroResult<Vec<u8>> {
        let len = self.read_length()?;
        let mut bytes = vec![0u8; len];
        self.reader.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    fn read_string(&mut self) -> AvroResult<String> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes).map_err(|e| Details::ConvertToUtf8(e).into())
    }

    fn read_fixed(&mut self, size: usize) -> AvroResult<Vec<u8>> {
        let size = safe_len(size)?;
        let mut bytes = vec![0u8; size];
        self.reader.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    fn read_enum(&mut self, schema: &EnumSchema) -> AvroResult<usize> {
        let ordinal = self.read_int()?;
        match usize::try_from(ordinal) {
            Ok(ordinal) if ordinal < schema.symbols.len() => Ok(ordinal),
            _ => Err(Details::GetEnumValue {
                index: ordinal as i64,
                nsymbols: schema.symbols.len(),
            }
            .into()),
        }
    }

    fn read_array_start(&mut self) -> AvroResult<usize> {
        self.read_block_count()
    }

    fn read_array_next(&mut self) -> AvroResult<usize> {
        self.read_block_count()
    }

    fn read_map_start(&mut self) -> AvroResult<usize> {
        self.read_block_count()
    }

    fn read_map_next(&mut self) -> AvroResult<usize> {
        self.read_block_count()
    }

    fn read_map_key(&mut self) -> AvroResult<String> {
        self.read_string()
    }

    fn read_record_start(&mut self) -> AvroResult<()> {
        Ok(())
    }

    fn read_field_head(&mut self, _name: &str) -> AvroResult<()> {
        Ok(())
    }

    fn read_record_end(&mut self) -> AvroResult<()> {
        Ok(())
    }

    fn read_union_index(&mut self, union: &UnionSchema) -> AvroResult<usize> {
        let index = self.read_long()?;
        match usize::try_from(index) {
            Ok(i) if i < union.len() => Ok(i),
            _ => Err(Details::GetUnionVariant {
                index,
                num_variants: union.len(),
            }
            .into()),
        }
    }

    fn read_union_end(&mut self) -> AvroResult<()> {
        Ok(())
    }

    fn skip_bytes(&mut self) -> AvroResult<()> {
        let len = self.read_length()?;
        self.reader.skip(len)
    }

    fn skip_string(&mut self) -> AvroResult<()> {
        self.skip_bytes()
    }

    fn skip_fixed(&mut self, size: usize) -> AvroResult<()> {
        self.reader.skip(size)
    }

    fn skip_array(&mut self) -> AvroResult<usize> {
        loop {
            let count = zag_i64(&mut self.reader)?;
            if count == 0 {
                return Ok(0);
            }
            if count < 0 {
                // the byte-size prefix lets the whole block be skipped
                let block_bytes = self.read_length()?;
                self.reader.skip(block_bytes)?;
                continue;
            }
            return usize::try_from(count).map_err(|_| Details::IntegerOverflow.into());
        }
    }

    fn skip_map(&mut self) -> AvroResult<usize> {
        self.skip_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use pretty_assertions::assert_eq;

    fn decoder(bytes: &[u8]) -> BinaryDecoder<&[u8]> {
        BinaryDecoder::new(bytes)
    }

    #[test]
    fn primitives_roundtrip_through_the_wire_shapes() {
        assert!(!decoder(&[0x00]).read_boolean().unwrap());
        assert!(decoder(&[0x01]).read_boolean().unwrap());
        assert_eq!(decoder(&[0x10]).read_int().unwrap(), 8);
        assert_eq!(decoder(&[0x01]).read_long().unwrap(), -1);
        assert_eq!(
            decoder(&1.5f32.to_le_bytes()).read_float().unwrap(),
            1.5f32
        );
        assert_eq!(
            decoder(&(-2.5f64).to_le_bytes()).read_double().unwrap(),
            -2.5f64
        );
    }

    #[test]
    fn bad_boolean_byte() {
        let err = decoder(&[0x07]).read_boolean().unwrap_err();
        assert!(matches!(err.into_details(), Details::BoolValue(7)));
    }

    #[test]
    fn int_boundaries() {
        for n in [i32::MIN, i32::MAX, 0, -1, 1] {
            let mut buf = Vec::new();
            crate::util::zig_i32(n, &mut buf).unwrap();
            assert_eq!(decoder(&buf).read_int().unwrap(), n);
        }
        for n in [i64::MIN, i64::MAX] {
            let mut buf = Vec::new();
            crate::util::zig_i64(n, &mut buf).unwrap();
            assert_eq!(decoder(&buf).read_long().unwrap(), n);
        }
    }

    #[test]
    fn strings_and_bytes() {
        let mut d = decoder(&[0x06, b'b', b'o', b'b']);
        assert_eq!(d.read_string().unwrap(), "bob");

        let mut d = decoder(&[0x00]);
        assert_eq!(d.read_bytes().unwrap(), Vec::<u8>::new());

        let mut d = decoder(&[0x04, 0xc3, 0x28]);
        let err = d.read_string().unwrap_err();
        assert!(matches!(err.into_details(), Details::ConvertToUtf8(_)));
    }

    #[test]
    fn illformed_length_is_rejected_before_allocating() {
        // would allocate 18446744073709551605 bytes
        let illformed: &[u8] = &[0x3e, 0x15, 0xff, 0x1f, 0x15, 0xff];
        let mut d = decoder(illformed);
        d.read_long().unwrap();
        assert!(d.read_bytes().is_err());
    }

    #[test]
    fn malformed_varint_is_an_encoding_error() {
        let malformed: &[u8] = &[
            0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x01,
        ];
        let err = decoder(malformed).read_long().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNumberEncoding);
    }

    #[test]
    fn array_blocks_with_byte_size_prefix() {
        // count -2 (zigzag 3), 2 byte block size, items 1 and 2, terminator
        let bytes = [0x03, 0x04, 0x02, 0x04, 0x00];
        let mut d = decoder(&bytes);
        assert_eq!(d.read_array_start().unwrap(), 2);
        assert_eq!(d.read_int().unwrap(), 1);
        assert_eq!(d.read_int().unwrap(), 2);
        assert_eq!(d.read_array_next().unwrap(), 0);
    }

    #[test]
    fn skip_array_uses_the_byte_size_when_present() {
        let bytes = [0x03, 0x04, 0x02, 0x04, 0x00, 0x10];
        let mut d = decoder(&bytes);
        assert_eq!(d.skip_array().unwrap(), 0);
        // the data after the array is still reachable
        assert_eq!(d.read_int().unwrap(), 8);
    }

    #[test]
    fn skip_array_hands_back_plain_blocks() {
        // count 2 without a byte size: the caller must skip the items
        let bytes = [0x04, 0x02, 0x04, 0x00];
        let mut d = decoder(&bytes);
        assert_eq!(d.skip_array().unwrap(), 2);
        d.read_int().unwrap();
        d.read_int().unwrap();
        assert_eq!(d.skip_array().unwrap(), 0);
    }

    #[test]
    fn skip_scalars(){
        let bytes = [0x06, b'a', b'b', b'c', 0x10];
        let mut d = decoder(&bytes);
        d.skip_string().unwrap();
        assert_eq!(d.read_int().unwrap(), 8);

        let bytes = [9, 9, 9, 9, 0x10];
        let mut d = decoder(&bytes);
        d.skip_fixed(4).unwrap();
        assert_eq!(d.read_int().unwrap(), 8);
    }

    #[test]
    fn union_and_enum_indices_are_bounds_checked() {
        use crate::ordered_map::OrderedMap;
        use crate::schema::{Name, Schema};

        let union = UnionSchema::new(vec![Schema::Int, Schema::Null]).unwrap();
        assert_eq!(decoder(&[0x02]).read_union_index(&union).unwrap(), 1);
        let err = decoder(&[0x04]).read_union_index(&union).unwrap_err();
        assert!(matches!(
            err.into_details(),
            Details::GetUnionVariant { index: 2, .. }
        ));
        let err = decoder(&[0x01]).read_union_index(&union).unwrap_err();
        assert!(matches!(
            Error::into_details(err),
            Details::GetUnionVariant { index: -1, .. }
        ));

        let enum_schema = EnumSchema::new(
            Name::new("E").unwrap(),
            vec!["A".to_string(), "B".to_string()],
            None,
            None,
            None,
            OrderedMap::new(),
        )
        .unwrap();
        assert_eq!(decoder(&[0x02]).read_enum(&enum_schema).unwrap(), 1);
        let err = decoder(&[0x04]).read_enum(&enum_schema).unwrap_err();
        assert!(matches!(
            err.into_details(),
            Details::GetEnumValue { index: 2, .. }
        ));
        // a corrupt negative ordinal is reported with its real value
        let err = decoder(&[0x09]).read_enum(&enum_schema).unwrap_err();
        assert!(matches!(
            err.into_details(),
            Details::GetEnumValue { index: -5, .. }
        ));
    }

    #[test]
    fn eof_surfaces_as_an_error() {
        assert!(decoder(&[]).read_boolean().is_err());
        assert!(decoder(&[]).read_long().is_err());
        assert!(decoder(&[0x0a]).read_bytes().is_err());
        assert!(decoder(&[1, 2]).read_float().is_err());
    }
}
