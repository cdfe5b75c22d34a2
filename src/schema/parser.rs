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
use crate::error::Details;
use crate::ordered_map::OrderedMap;
use crate::schema::defaults::validate_default;
use crate::schema::name::validate_name_part;
use crate::schema::table::primitive_schema;
use crate::schema::{
    Alias, Aliases, ArraySchema, EnumSchema, FixedSchema, MapSchema, Name, RecordField,
    RecordFieldOrder, RecordSchema, Schema, SchemaKind, SchemaTable, UnionSchema,
};
use crate::util::MapHelper;
use log::{debug, error, warn};
use serde_json::{Map, Number, Value};
use std::sync::Arc;

/// Keys the parser consumes on a schema object; everything else is kept
/// verbatim as a custom attribute.
const RESERVED_SCHEMA_KEYS: &[&str] = &[
    "type",
    "name",
    "namespace",
    "doc",
    "fields",
    "items",
    "size",
    "symbols",
    "values",
    "aliases",
    "default",
];

const RESERVED_FIELD_KEYS: &[&str] = &["type", "name", "doc", "default", "order", "aliases"];

/// Parses JSON schema documents into [`Schema`]s.
///
/// Named schemas are registered in the parser's [`SchemaTable`]; a parser can
/// be reused, in which case later documents may reference names defined by
/// earlier ones.
#[derive(Default)]
pub struct Parser {
    table: SchemaTable,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// The names registered so far.
    pub fn table(&self) -> &SchemaTable {
        &self.table
    }

    pub fn into_table(self) -> SchemaTable {
        self.table
    }

    /// Create a `Schema` from a string representing a JSON Avro schema.
    pub fn parse_str(&mut self, input: &str) -> AvroResult<Schema> {
        let value = serde_json::from_str(input).map_err(Details::ParseSchemaJson)?;
        self.parse(&value)
    }

    /// Create a `Schema` from a `serde_json::Value` representing a JSON Avro
    /// schema.
    pub fn parse(&mut self, value: &Value) -> AvroResult<Schema> {
        match value {
            Value::String(t) => self.parse_reference(t),
            Value::Object(data) => self.parse_complex(data),
            Value::Array(data) => self.parse_union(data),
            _ => Err(Details::ParseSchemaFromValidJson.into()),
        }
    }

    /// A string node is a reference: a primitive name or an already defined
    /// (or currently resolving) named schema.
    fn parse_reference(&mut self, name: &str) -> AvroResult<Schema> {
        let resolved = self.table.lookup(name)?;
        Ok(schema_ref(&resolved))
    }

    /// Parse a JSON object carrying a `type` key.
    fn parse_complex(&mut self, complex: &Map<String, Value>) -> AvroResult<Schema> {
        match complex.get("logicalType") {
            // The annotation is recorded with the other attributes; this
            // crate does not act on it.
            Some(Value::String(_)) | None => {}
            Some(other) => {
                return Err(Details::GetLogicalTypeFieldType(other.clone()).into());
            }
        }

        match complex.get("type") {
            Some(Value::String(t)) => match t.as_str() {
                "record" => self.parse_record(complex, false),
                "error" => self.parse_record(complex, true),
                "enum" => self.parse_enum(complex),
                "array" => self.parse_array(complex),
                "map" => self.parse_map(complex),
                "fixed" => self.parse_fixed(complex),
                other => match primitive_schema(other) {
                    Some(primitive) => Ok(primitive),
                    None => self.parse_reference(other),
                },
            },
            Some(Value::Object(data)) => self.parse_complex(data),
            Some(Value::Array(variants)) => self.parse_union(variants),
            Some(unknown) => Err(Details::GetComplexType(unknown.clone()).into()),
            None => Err(Details::GetTypeField.into()),
        }
    }

    /// Assemble the fully qualified name of a named schema object. An
    /// explicit empty `namespace` overrides the enclosing default.
    fn parse_name(&self, complex: &Map<String, Value>) -> AvroResult<Name> {
        let name = complex.name().ok_or(Details::GetNameField)?;
        match complex.get("namespace") {
            Some(Value::String(namespace)) if namespace.is_empty() => Name::new(&name),
            Some(Value::String(namespace)) => {
                Name::with_enclosing_namespace(&name, Some(namespace))
            }
            _ => Name::with_enclosing_namespace(&name, self.table.default_namespace()),
        }
    }

    fn parse_record(
        &mut self,
        complex: &Map<String, Value>,
        is_error: bool,
    ) -> AvroResult<Schema> {
        let fully_qualified_name = self.parse_name(complex)?;
        let aliases =
            fix_aliases_namespace(complex.aliases(), fully_qualified_name.namespace())?;

        debug!("Going to parse record schema: {fully_qualified_name}");

        // Register a placeholder before the fields so recursive types
        // resolve.
        self.table.begin_resolving(&fully_qualified_name, &aliases);

        let previous = self
            .table
            .enter_namespace(fully_qualified_name.namespace().map(str::to_string));
        let fields = self.parse_record_fields(complex);
        self.table.restore_namespace(previous);

        let mut record = RecordSchema::new(fully_qualified_name.clone());
        record.aliases = aliases.clone();
        record.doc = complex.doc();
        record.is_error = is_error;
        record.attributes = custom_attributes(complex, RESERVED_SCHEMA_KEYS);
        record.set_fields(fields?)?;

        let schema = Schema::Record(Arc::new(record));
        self.table
            .register(&fully_qualified_name, &schema, &aliases)?;
        Ok(schema)
    }

    fn parse_record_fields(
        &mut self,
        complex: &Map<String, Value>,
    ) -> AvroResult<Vec<RecordField>> {
        let fields = complex
            .get("fields")
            .and_then(|fields| fields.as_array())
            .ok_or(Details::GetRecordFieldsJson)?;

        fields
            .iter()
            .map(|field| {
                field
                    .as_object()
                    .ok_or_else(|| Details::GetRecordFieldsJson.into())
                    .and_then(|field| self.parse_field(field))
            })
            .collect()
    }

    fn parse_field(&mut self, field: &Map<String, Value>) -> AvroResult<RecordField> {
        let name = field.name().ok_or(Details::GetNameFieldFromRecord)?;
        validate_name_part(&name)?;

        let ty = field.get("type").ok_or(Details::GetRecordFieldTypeField)?;
        let schema = self.parse(ty)?;

        let mut default = field.get("default").cloned();
        if let Some(Value::String(literal)) = &default {
            if matches!(schema, Schema::Float | Schema::Double) {
                default = Some(coerce_float_literal(&name, &schema, literal)?);
            }
        }
        if let Some(ref value) = default {
            validate_default(&name, &schema, value, &self.table)?;
        }

        let order = match field.get("order") {
            Some(Value::String(order)) => order.parse::<RecordFieldOrder>()?,
            Some(other) => {
                return Err(Details::ParseRecordFieldOrder(other.to_string()).into());
            }
            None => RecordFieldOrder::default(),
        };

        Ok(RecordField {
            name,
            doc: field.doc(),
            default,
            order,
            aliases: field.aliases().unwrap_or_default(),
            schema,
            position: 0,
            custom_attributes: custom_attributes(field, RESERVED_FIELD_KEYS),
        })
    }

    fn parse_enum(&mut self, complex: &Map<String, Value>) -> AvroResult<Schema> {
        let fully_qualified_name = self.parse_name(complex)?;
        let aliases =
            fix_aliases_namespace(complex.aliases(), fully_qualified_name.namespace())?;

        let symbols: Vec<String> = complex
            .get("symbols")
            .and_then(|v| v.as_array())
            .ok_or(Details::GetEnumSymbolsField)
            .and_then(|symbols| {
                symbols
                    .iter()
                    .map(|symbol| symbol.as_str().map(|s| s.to_string()))
                    .collect::<Option<_>>()
                    .ok_or(Details::GetEnumSymbols)
            })?;

        let default = match complex.get("default") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => return Err(Details::EnumDefaultWrongType(other.clone()).into()),
            None => None,
        };

        let schema = Schema::Enum(Arc::new(EnumSchema::new(
            fully_qualified_name.clone(),
            symbols,
            default,
            aliases.clone(),
            complex.doc(),
            custom_attributes(complex, RESERVED_SCHEMA_KEYS),
        )?));

        self.table
            .register(&fully_qualified_name, &schema, &aliases)?;
        Ok(schema)
    }

    fn parse_array(&mut self, complex: &Map<String, Value>) -> AvroResult<Schema> {
        let items = complex
            .get("items")
            .ok_or_else(|| Details::GetArrayItemsField.into())
            .and_then(|items| self.parse(items))?;

        Ok(Schema::Array(ArraySchema {
            items: Box::new(items),
            attributes: custom_attributes(complex, RESERVED_SCHEMA_KEYS),
        }))
    }

    fn parse_map(&mut self, complex: &Map<String, Value>) -> AvroResult<Schema> {
        let values = complex
            .get("values")
            .ok_or_else(|| Details::GetMapValuesField.into())
            .and_then(|values| self.parse(values))?;

        Ok(Schema::Map(MapSchema {
            values: Box::new(values),
            attributes: custom_attributes(complex, RESERVED_SCHEMA_KEYS),
        }))
    }

    fn parse_union(&mut self, items: &[Value]) -> AvroResult<Schema> {
        if items.is_empty() {
            error!("Union schemas should have at least two members!");
        } else if items.len() == 1 {
            warn!("Union schema with just one member! Consider dropping the union!");
        }
        let branches = items
            .iter()
            .map(|item| self.parse(item))
            .collect::<AvroResult<Vec<_>>>()?;
        Ok(Schema::Union(UnionSchema::new(branches)?))
    }

    fn parse_fixed(&mut self, complex: &Map<String, Value>) -> AvroResult<Schema> {
        let size = match complex.get("size") {
            Some(size) => size
                .as_u64()
                .ok_or_else(|| Details::GetFixedSizeFieldPositive(size.clone()))?,
            None => return Err(Details::GetFixedSizeField.into()),
        };

        let fully_qualified_name = self.parse_name(complex)?;
        let aliases =
            fix_aliases_namespace(complex.aliases(), fully_qualified_name.namespace())?;

        let schema = Schema::Fixed(Arc::new(FixedSchema {
            name: fully_qualified_name.clone(),
            aliases: aliases.clone(),
            doc: complex.doc(),
            size: size as usize,
            attributes: custom_attributes(complex, RESERVED_SCHEMA_KEYS),
        }));

        self.table
            .register(&fully_qualified_name, &schema, &aliases)?;
        Ok(schema)
    }
}

/// Named schemas occur once in the tree; later references become
/// [`Schema::Ref`].
fn schema_ref(parsed: &Schema) -> Schema {
    match parsed {
        Schema::Record(inner) => Schema::Ref {
            name: inner.name.clone(),
        },
        Schema::Enum(inner) => Schema::Ref {
            name: inner.name.clone(),
        },
        Schema::Fixed(inner) => Schema::Ref {
            name: inner.name.clone(),
        },
        other => other.clone(),
    }
}

// A type alias may be specified either fully namespace-qualified, or
// relative to the namespace of the name it is an alias for. For example, if
// a type named "a.b" has aliases of "c" and "x.y", then the fully qualified
// names of its aliases are "a.c" and "x.y".
// https://avro.apache.org/docs/++version++/specification/#aliases
fn fix_aliases_namespace(
    aliases: Option<Vec<String>>,
    namespace: Option<&str>,
) -> AvroResult<Aliases> {
    match aliases {
        Some(aliases) => aliases
            .iter()
            .map(|alias| {
                if alias.contains('.') {
                    Alias::new(alias)
                } else {
                    match namespace {
                        Some(ns) => Alias::new(&format!("{ns}.{alias}")),
                        None => Alias::new(alias),
                    }
                }
            })
            .collect::<AvroResult<Vec<_>>>()
            .map(Some),
        None => Ok(None),
    }
}

fn custom_attributes(complex: &Map<String, Value>, reserved: &[&str]) -> OrderedMap {
    let mut attributes = OrderedMap::new();
    for (key, value) in complex {
        if reserved.contains(&key.as_str()) {
            continue;
        }
        attributes.insert(key.clone(), value.clone());
    }
    attributes
}

/// Float and double defaults supplied as strings are coerced to numbers.
fn coerce_float_literal(field: &str, schema: &Schema, literal: &str) -> AvroResult<Value> {
    let mismatch = || Details::GetDefault {
        field: field.to_string(),
        schema: SchemaKind::from(schema),
        value: Value::String(literal.to_string()),
    };
    let parsed: f64 = literal.trim().parse().map_err(|_| mismatch())?;
    let number = Number::from_f64(parsed).ok_or_else(mismatch)?;
    Ok(Value::Number(number))
}
