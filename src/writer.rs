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

//! Writing generic datums through an encoder.

use crate::AvroResult;
use crate::encode::{BinaryEncoder, Encoder, JsonEncoder, UnionBranch};
use crate::error::Details;
use crate::generic::GenericDatum;
use crate::schema::Schema;

/// Walks a datum and drives an [`Encoder`].
///
/// Datums are self-describing (records know their fields, unions their
/// branch schemas), so the writer dispatches on the datum alone.
pub struct GenericWriter<E: Encoder> {
    encoder: E,
}

impl<E: Encoder> GenericWriter<E> {
    pub fn new(encoder: E) -> Self {
        Self { encoder }
    }

    /// Write one datum and flush.
    pub fn write(&mut self, datum: &GenericDatum) -> AvroResult<()> {
        write_datum(datum, &mut self.encoder)?;
        self.encoder.flush()
    }

    pub fn encoder_mut(&mut self) -> &mut E {
        &mut self.encoder
    }

    pub fn into_encoder(self) -> E {
        self.encoder
    }
}

fn write_datum<E: Encoder>(datum: &GenericDatum, encoder: &mut E) -> AvroResult<()> {
    match datum {
        GenericDatum::Null => encoder.write_null(),
        GenericDatum::Boolean(value) => encoder.write_boolean(*value),
        GenericDatum::Int(value) => encoder.write_int(*value),
        GenericDatum::Long(value) => encoder.write_long(*value),
        GenericDatum::Float(value) => encoder.write_float(*value),
        GenericDatum::Double(value) => encoder.write_double(*value),
        GenericDatum::Bytes(value) => encoder.write_bytes(value),
        GenericDatum::String(value) => encoder.write_string(value),
        GenericDatum::Enum(value) => encoder.write_enum(value.ordinal(), value.symbol()),
        GenericDatum::Fixed(value) => encoder.write_fixed(value.bytes()),
        GenericDatum::Record(record) => {
            encoder.write_record_start()?;
            for (name, value) in record.iter() {
                encoder.write_field_head(name)?;
                write_datum(value, encoder)?;
            }
            encoder.write_record_end()
        }
        GenericDatum::Array(array) => {
            encoder.write_array_start()?;
            if !array.is_empty() {
                encoder.set_item_count(array.len())?;
                for item in array.iter() {
                    encoder.start_item()?;
                    write_datum(item, encoder)?;
                }
            }
            encoder.write_array_end()
        }
        GenericDatum::Map(map) => {
            encoder.write_map_start()?;
            if !map.is_empty() {
                encoder.set_item_count(map.len())?;
                for (key, value) in map.iter() {
                    encoder.start_item()?;
                    encoder.write_map_key(key)?;
                    write_datum(value, encoder)?;
                }
            }
            encoder.write_map_end()
        }
        GenericDatum::Union(union) => {
            // a union with no selected branch is in an unknown state
            let index = union
                .branch_index()
                .ok_or(Details::UnionBranchNotSelected)?;
            let branch_schema =
                union
                    .schema()
                    .variant(index)
                    .ok_or(Details::GetUnionVariant {
                        index: index as i64,
                        num_variants: union.schema().len(),
                    })?;
            let wire_name;
            let tag = match branch_schema {
                Schema::Null => UnionBranch::Null,
                other => {
                    wire_name = other.wire_name();
                    UnionBranch::Named(&wire_name)
                }
            };
            encoder.write_union_branch(index, tag)?;
            write_datum(union.value()?, encoder)?;
            encoder.write_union_end()
        }
    }
}

/// Encode a datum to the Avro binary format.
pub fn encode_binary(datum: &GenericDatum) -> AvroResult<Vec<u8>> {
    let mut writer = GenericWriter::new(BinaryEncoder::new(Vec::new()));
    writer.write(datum)?;
    writer.into_encoder().into_inner()
}

/// Encode a datum to the Avro JSON format.
pub fn encode_json(datum: &GenericDatum) -> AvroResult<String> {
    let mut writer = GenericWriter::new(JsonEncoder::new(Vec::new()));
    writer.write(datum)?;
    let bytes = writer.into_encoder().into_inner()?;
    String::from_utf8(bytes).map_err(|e| Details::ConvertToUtf8(e).into())
}
