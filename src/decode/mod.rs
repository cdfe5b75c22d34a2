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

//! Decoders for the two standard Avro wire encodings.

pub mod binary;
pub mod json;
pub mod lexer;

pub use binary::BinaryDecoder;
pub use json::JsonDecoder;

use crate::AvroResult;
use crate::schema::{EnumSchema, UnionSchema};

/// A source of one Avro value.
///
/// Array and map reads are block oriented: `read_*_start` yields the number
/// of items before the next block boundary (zero when the container is
/// done), and `read_*_next` does the same at each boundary. The JSON
/// implementation reports one item at a time.
pub trait Decoder {
    fn read_null(&mut self) -> AvroResult<()>;
    fn read_boolean(&mut self) -> AvroResult<bool>;
    fn read_int(&mut self) -> AvroResult<i32>;
    fn read_long(&mut self) -> AvroResult<i64>;
    fn read_float(&mut self) -> AvroResult<f32>;
    fn read_double(&mut self) -> AvroResult<f64>;
    fn read_bytes(&mut self) -> AvroResult<Vec<u8>>;
    fn read_string(&mut self) -> AvroResult<String>;
    fn read_fixed(&mut self, size: usize) -> AvroResult<Vec<u8>>;
    /// Read an enum value as a bounds-checked ordinal.
    fn read_enum(&mut self, schema: &EnumSchema) -> AvroResult<usize>;

    fn read_array_start(&mut self) -> AvroResult<usize>;
    fn read_array_next(&mut self) -> AvroResult<usize>;
    fn read_map_start(&mut self) -> AvroResult<usize>;
    fn read_map_next(&mut self) -> AvroResult<usize>;
    fn read_map_key(&mut self) -> AvroResult<String>;

    fn read_record_start(&mut self) -> AvroResult<()>;
    fn read_field_head(&mut self, name: &str) -> AvroResult<()>;
    fn read_record_end(&mut self) -> AvroResult<()>;

    /// Read the tag selecting a union branch, bounds-checked against the
    /// union schema.
    fn read_union_index(&mut self, union: &UnionSchema) -> AvroResult<usize>;
    fn read_union_end(&mut self) -> AvroResult<()>;

    fn skip_bytes(&mut self) -> AvroResult<()>;
    fn skip_string(&mut self) -> AvroResult<()>;
    fn skip_fixed(&mut self, size: usize) -> AvroResult<()>;
    /// Skip array blocks; blocks carrying a byte size are skipped wholesale.
    /// Returns the number of items the caller must skip one by one before
    /// calling again, zero once the array is fully skipped.
    fn skip_array(&mut self) -> AvroResult<usize>;
    fn skip_map(&mut self) -> AvroResult<usize>;
}
