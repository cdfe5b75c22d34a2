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

//! Encoders for the two standard Avro wire encodings.

pub mod binary;
pub mod json;

pub use binary::BinaryEncoder;
pub use json::JsonEncoder;

use crate::AvroResult;

/// How a union branch is tagged on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnionBranch<'a> {
    /// The `null` branch; the JSON encoding writes a bare `null`.
    Null,
    /// Any other branch, tagged with its wire name.
    Named(&'a str),
}

/// A sink for one Avro value.
///
/// The structural hooks (records, map keys, union tags) exist for the JSON
/// encoding; the binary implementation treats the ones with no binary
/// representation as no-ops.
pub trait Encoder {
    fn write_null(&mut self) -> AvroResult<()>;
    fn write_boolean(&mut self, value: bool) -> AvroResult<()>;
    fn write_int(&mut self, value: i32) -> AvroResult<()>;
    fn write_long(&mut self, value: i64) -> AvroResult<()>;
    fn write_float(&mut self, value: f32) -> AvroResult<()>;
    fn write_double(&mut self, value: f64) -> AvroResult<()>;
    fn write_bytes(&mut self, bytes: &[u8]) -> AvroResult<()>;
    fn write_string(&mut self, value: &str) -> AvroResult<()>;
    fn write_fixed(&mut self, bytes: &[u8]) -> AvroResult<()>;
    fn write_enum(&mut self, ordinal: usize, symbol: &str) -> AvroResult<()>;

    fn write_array_start(&mut self) -> AvroResult<()>;
    /// Announce the number of items in the next block; a zero count emits
    /// nothing (the terminator comes from the matching `*_end`).
    fn set_item_count(&mut self, count: usize) -> AvroResult<()>;
    fn start_item(&mut self) -> AvroResult<()>;
    fn write_array_end(&mut self) -> AvroResult<()>;

    fn write_map_start(&mut self) -> AvroResult<()>;
    fn write_map_key(&mut self, key: &str) -> AvroResult<()>;
    fn write_map_end(&mut self) -> AvroResult<()>;

    fn write_record_start(&mut self) -> AvroResult<()>;
    fn write_field_head(&mut self, name: &str) -> AvroResult<()>;
    fn write_record_end(&mut self) -> AvroResult<()>;

    fn write_union_branch(&mut self, index: usize, branch: UnionBranch<'_>) -> AvroResult<()>;
    fn write_union_end(&mut self) -> AvroResult<()>;

    /// Push everything buffered to the underlying sink.
    fn flush(&mut self) -> AvroResult<()>;
}
