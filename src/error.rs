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

use crate::{
    generic::DatumKind,
    schema::{Name, SchemaKind},
};

/// Errors signalled by this crate.
///
/// To inspect the precise failure use [`details`](Self::details) or
/// [`into_details`](Self::into_details); to dispatch on the coarse taxonomy
/// use [`kind`](Self::kind).
#[derive(thiserror::Error, Debug)]
#[repr(transparent)]
#[error(transparent)]
pub struct Error {
    details: Box<Details>,
}

impl Error {
    pub fn new(details: Details) -> Self {
        Self {
            details: Box::new(details),
        }
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn into_details(self) -> Details {
        *self.details
    }

    /// The coarse category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        self.details.kind()
    }
}

impl From<Details> for Error {
    fn from(details: Details) -> Self {
        Self::new(details)
    }
}

/// The coarse error taxonomy surfaced to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A structural or validity failure while interpreting schema JSON.
    SchemaParse,
    /// A runtime mismatch between a datum's type and an operation.
    Type,
    /// Everything else the library signals.
    Runtime,
    /// A malformed varint on the wire.
    InvalidNumberEncoding,
    /// A malformed token in Avro JSON input.
    JsonLex,
}

/// The precise failure behind an [`Error`].
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Details {
    // -- schema parsing -----------------------------------------------------
    #[error("Failed to parse schema from JSON")]
    ParseSchemaJson(#[source] serde_json::Error),

    #[error("Must be a JSON string, object or array")]
    ParseSchemaFromValidJson,

    #[error("Unknown primitive type: {0}")]
    ParsePrimitive(String),

    #[error("Unknown primitive type: {0} (did you mean '{1}'?)")]
    ParsePrimitiveSimilar(String, &'static str),

    #[error("Complex schema without a 'type' key")]
    GetTypeField,

    #[error("Invalid 'type' in complex schema: {0}")]
    GetComplexType(serde_json::Value),

    #[error("Named schema without a 'name' key")]
    GetNameField,

    #[error("Invalid name: {0}, must match the regular expression {1}")]
    InvalidSchemaName(String, &'static str),

    #[error("Invalid namespace: {0}, must match the regular expression {1}")]
    InvalidNamespace(String, &'static str),

    #[error("Invalid enum symbol name {0}")]
    EnumSymbolName(String),

    #[error("Cannot use '{0}' as a bare type reference")]
    InvalidSchemaRecord(String),

    #[error("Two schemas with the same fullname were given: {0}")]
    NameCollision(String),

    #[error("The name '{0}' is reserved for a primitive type and cannot be redefined")]
    ReservedTypeName(String),

    #[error("Record schema without a 'fields' array")]
    GetRecordFieldsJson,

    #[error("Record field without a 'name' key")]
    GetNameFieldFromRecord,

    #[error("Record field without a 'type' key")]
    GetRecordFieldTypeField,

    #[error("Duplicate field name {0} in record")]
    FieldNameDuplicate(String),

    #[error("Invalid field sort order: {0}")]
    ParseRecordFieldOrder(String),

    #[error("Enum schema without a 'symbols' array")]
    GetEnumSymbolsField,

    #[error("Enum 'symbols' must be an array of strings")]
    GetEnumSymbols,

    #[error("Enum symbol {0} appears more than once")]
    EnumSymbolDuplicate(String),

    #[error("Enum 'default' must be a string: {0}")]
    EnumDefaultWrongType(serde_json::Value),

    #[error("Enum default {symbol} is not among the symbols: {symbols:?}")]
    GetEnumDefault {
        symbol: String,
        symbols: Vec<String>,
    },

    #[error("Array schema without an 'items' key")]
    GetArrayItemsField,

    #[error("Map schema without a 'values' key")]
    GetMapValuesField,

    #[error("Fixed schema without a 'size' key")]
    GetFixedSizeField,

    #[error("Fixed 'size' must be a non-negative integer: {0}")]
    GetFixedSizeFieldPositive(serde_json::Value),

    #[error("'logicalType' must be a string, found: {0}")]
    GetLogicalTypeFieldType(serde_json::Value),

    // -- datum / default typing ---------------------------------------------
    #[error("Invalid default for field {field} of type {schema}: {value}")]
    GetDefault {
        field: String,
        schema: SchemaKind,
        value: serde_json::Value,
    },

    #[error("Operation expected a {expected} datum, found {found}")]
    DatumKindMismatch {
        expected: DatumKind,
        found: DatumKind,
    },

    #[error("Fixed datum must hold exactly {expected} bytes, got {found}")]
    FixedValueLength { expected: usize, found: usize },

    // -- runtime ------------------------------------------------------------
    #[error("Unions cannot contain directly nested unions")]
    GetNestedUnion,

    #[error("Unions cannot contain duplicate branches: {0}")]
    GetUnionDuplicate(String),

    #[error("Union index {index} out of bounds: {num_variants}")]
    GetUnionVariant { index: i64, num_variants: usize },

    #[error("No union branch named {0}")]
    GetUnionVariantName(String),

    #[error("Union datum has no selected branch")]
    UnionBranchNotSelected,

    #[error("Enum ordinal {index} out of bounds: {nsymbols}")]
    GetEnumValue { index: i64, nsymbols: usize },

    #[error("Unknown enum symbol: {0}")]
    GetEnumSymbol(String),

    #[error("No field named {0}")]
    GetField(String),

    #[error("Record fields may only be set once")]
    FieldsAlreadySet,

    #[error("Could not resolve schema reference: {0}")]
    SchemaResolutionError(Name),

    #[error("Schema {0} is recursive without an interposed union")]
    CircularSchema(Name),

    #[error("Failed to write bytes")]
    WriteBytes(#[source] std::io::Error),

    #[error("Failed to read bytes")]
    ReadBytes(#[source] std::io::Error),

    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Invalid UTF-8 string")]
    ConvertToUtf8(#[source] std::string::FromUtf8Error),

    #[error("Invalid boolean byte: {0}")]
    BoolValue(u8),

    #[error("Unable to allocate {desired} bytes (maximum allowed: {maximum})")]
    MemoryAllocation { desired: usize, maximum: usize },

    #[error("Character {0:?} is outside the latin-1 range expected for bytes")]
    NonLatin1Character(char),

    #[error("Failed to serialize a schema attribute value to JSON")]
    SerializeAttribute(#[source] serde_json::Error),

    #[error("Codec driven out of order: {0}")]
    IllegalCodecState(&'static str),

    // -- varints ------------------------------------------------------------
    #[error("Integer overflow when decoding a variable-length integer")]
    IntegerOverflow,

    #[error("Value {1} does not fit in a 32-bit integer")]
    ZagI32(#[source] std::num::TryFromIntError, i64),

    // -- JSON lexing --------------------------------------------------------
    #[error("Unexpected character 0x{0:02x} in JSON input")]
    JsonUnexpectedByte(u8),

    #[error("Unexpected end of JSON input")]
    JsonUnexpectedEof,

    #[error("Expected JSON {expected}, found {found}")]
    JsonUnexpectedToken {
        expected: &'static str,
        found: String,
    },

    #[error("Malformed JSON number: {0}")]
    JsonNumberFormat(String),

    #[error("Invalid JSON string escape: {0}")]
    JsonInvalidEscape(String),

    #[error("Expected record field {expected}, found {found}")]
    JsonFieldMismatch { expected: String, found: String },
}

impl Details {
    pub fn kind(&self) -> ErrorKind {
        use Details::*;
        match self {
            ParseSchemaJson(_)
            | ParseSchemaFromValidJson
            | ParsePrimitive(_)
            | ParsePrimitiveSimilar(_, _)
            | GetTypeField
            | GetComplexType(_)
            | GetNameField
            | InvalidSchemaName(_, _)
            | InvalidNamespace(_, _)
            | EnumSymbolName(_)
            | InvalidSchemaRecord(_)
            | NameCollision(_)
            | ReservedTypeName(_)
            | GetRecordFieldsJson
            | GetNameFieldFromRecord
            | GetRecordFieldTypeField
            | FieldNameDuplicate(_)
            | ParseRecordFieldOrder(_)
            | GetEnumSymbolsField
            | GetEnumSymbols
            | EnumSymbolDuplicate(_)
            | EnumDefaultWrongType(_)
            | GetEnumDefault { .. }
            | GetArrayItemsField
            | GetMapValuesField
            | GetFixedSizeField
            | GetFixedSizeFieldPositive(_)
            | GetLogicalTypeFieldType(_) => ErrorKind::SchemaParse,

            GetDefault { .. } | DatumKindMismatch { .. } | FixedValueLength { .. } => {
                ErrorKind::Type
            }

            IntegerOverflow | ZagI32(_, _) => ErrorKind::InvalidNumberEncoding,

            JsonUnexpectedByte(_)
            | JsonUnexpectedEof
            | JsonUnexpectedToken { .. }
            | JsonNumberFormat(_)
            | JsonInvalidEscape(_)
            | JsonFieldMismatch { .. } => ErrorKind::JsonLex,

            _ => ErrorKind::Runtime,
        }
    }
}
