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

//! Reading generic datums through a decoder.

use crate::AvroResult;
use crate::decode::{BinaryDecoder, Decoder, JsonDecoder};
use crate::error::Details;
use crate::generic::GenericDatum;
use crate::schema::{Schema, SchemaTable};
use std::sync::Arc;

/// Walks a schema and builds a [`GenericDatum`] from a [`Decoder`].
///
/// The reader requires the data to have been written with the same schema;
/// resolving a different writer schema is a future extension.
pub struct GenericReader {
    schema: Schema,
    table: Arc<SchemaTable>,
}

impl GenericReader {
    pub fn new(schema: Schema) -> AvroResult<Self> {
        let table = Arc::new(SchemaTable::from_schema(&schema)?);
        Ok(Self { schema, table })
    }

    pub fn with_table(schema: Schema, table: Arc<SchemaTable>) -> Self {
        Self { schema, table }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Read one datum.
    pub fn read<D: Decoder>(&self, decoder: &mut D) -> AvroResult<GenericDatum> {
        let mut datum = GenericDatum::with_table(&self.schema, &self.table)?;
        self.read_into(&mut datum, &self.schema, decoder)?;
        Ok(datum)
    }

    fn read_into<D: Decoder>(
        &self,
        datum: &mut GenericDatum,
        schema: &Schema,
        decoder: &mut D,
    ) -> AvroResult<()> {
        match schema {
            Schema::Ref { name } => {
                let resolved = self.table.resolve(name)?;
                self.read_into(datum, resolved, decoder)
            }
            Schema::Null => decoder.read_null(),
            Schema::Boolean => {
                let value = decoder.read_boolean()?;
                datum.set_boolean(value)
            }
            Schema::Int => {
                let value = decoder.read_int()?;
                datum.set_int(value)
            }
            Schema::Long => {
                let value = decoder.read_long()?;
                datum.set_long(value)
            }
            Schema::Float => {
                let value = decoder.read_float()?;
                datum.set_float(value)
            }
            Schema::Double => {
                let value = decoder.read_double()?;
                datum.set_double(value)
            }
            Schema::Bytes => {
                let value = decoder.read_bytes()?;
                datum.set_bytes(value)
            }
            Schema::String => {
                let value = decoder.read_string()?;
                datum.set_string(value)
            }
            Schema::Fixed(inner) => {
                let bytes = decoder.read_fixed(inner.size)?;
                datum.as_fixed_mut()?.set_bytes(bytes)
            }
            Schema::Enum(inner) => {
                let ordinal = decoder.read_enum(inner)?;
                datum.as_enum_mut()?.set_ordinal(ordinal)
            }
            Schema::Record(inner) => {
                decoder.read_record_start()?;
                let record = datum.as_record_mut()?;
                for field in &inner.fields {
                    decoder.read_field_head(&field.name)?;
                    let slot = record
                        .field_at_mut(field.position)
                        .ok_or_else(|| Details::GetField(field.name.clone()))?;
                    self.read_into(slot, &field.schema, decoder)?;
                }
                decoder.read_record_end()
            }
            Schema::Array(inner) => {
                let array = datum.as_array_mut()?;
                let mut count = decoder.read_array_start()?;
                while count != 0 {
                    for _ in 0..count {
                        let slot = array.push_default()?;
                        self.read_into(slot, &inner.items, decoder)?;
                    }
                    count = decoder.read_array_next()?;
                }
                Ok(())
            }
            Schema::Map(inner) => {
                let map = datum.as_map_mut()?;
                let mut count = decoder.read_map_start()?;
                while count != 0 {
                    for _ in 0..count {
                        let key = decoder.read_map_key()?;
                        let slot = map.insert_default(key)?;
                        self.read_into(slot, &inner.values, decoder)?;
                    }
                    count = decoder.read_map_next()?;
                }
                Ok(())
            }
            Schema::Union(inner) => {
                let index = decoder.read_union_index(inner)?;
                let branch = inner.variant(index).ok_or(Details::GetUnionVariant {
                    index: index as i64,
                    num_variants: inner.len(),
                })?;
                let union = datum.as_union_mut()?;
                union.select_branch(index)?;
                self.read_into(union.value_mut()?, branch, decoder)?;
                decoder.read_union_end()
            }
        }
    }
}

/// Decode a datum from the Avro binary format.
pub fn decode_binary(schema: &Schema, bytes: &[u8]) -> AvroResult<GenericDatum> {
    let reader = GenericReader::new(schema.clone())?;
    let mut decoder = BinaryDecoder::new(bytes);
    reader.read(&mut decoder)
}

/// Decode a datum from the Avro JSON format.
pub fn decode_json(schema: &Schema, text: &str) -> AvroResult<GenericDatum> {
    let reader = GenericReader::new(schema.clone())?;
    let mut decoder = JsonDecoder::new(text.as_bytes());
    reader.read(&mut decoder)
}
