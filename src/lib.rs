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

//! The core of an **[Apache Avro](https://avro.apache.org/)** implementation:
//! the schema model, the schema parser, the generic data model, and the
//! binary and JSON codecs.
//!
//! Data is handled dynamically through [`GenericDatum`], a value shaped by a
//! [`Schema`]:
//!
//! ```
//! use avro_core::{GenericDatum, Schema, decode_binary, encode_binary};
//!
//! let schema = Schema::parse_str(
//!     r#"{"type": "record", "name": "User", "fields": [{"name": "name", "type": "string"}]}"#,
//! )?;
//!
//! let mut datum = GenericDatum::from_schema(&schema)?;
//! datum.as_record_mut()?.field_mut("name")?.set_string("bob")?;
//!
//! let bytes = encode_binary(&datum)?;
//! assert_eq!(bytes, b"\x06bob");
//! assert_eq!(decode_binary(&schema, &bytes)?, datum);
//! # Ok::<(), avro_core::Error>(())
//! ```
//!
//! Object container files, compression, RPC and logical-type interpretation
//! live outside this crate; the parser records `logicalType` annotations
//! textually without acting on them.

pub mod buffer;
pub mod decode;
pub mod encode;
pub mod error;
pub mod generic;
pub mod ordered_map;
pub mod reader;
pub mod schema;
pub mod util;
pub mod writer;

pub use decode::{BinaryDecoder, Decoder, JsonDecoder};
pub use encode::{BinaryEncoder, Encoder, JsonEncoder};
pub use error::{Error, ErrorKind};
pub use generic::{
    DatumKind, GenericArray, GenericDatum, GenericEnum, GenericFixed, GenericMap, GenericRecord,
    GenericUnion,
};
pub use ordered_map::OrderedMap;
pub use reader::{GenericReader, decode_binary, decode_json};
pub use schema::Schema;
pub use writer::{GenericWriter, encode_binary, encode_json};

/// A convenience type alias for `Result`s with `Error`s.
pub type AvroResult<T> = Result<T, Error>;
