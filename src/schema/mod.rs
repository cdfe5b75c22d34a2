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

//! Logic for parsing and interacting with schemas in Avro format.

mod defaults;
mod name;
mod parser;
mod record;
mod table;
mod union;

pub use crate::schema::{
    name::{Alias, Aliases, Name, Namespace},
    parser::Parser,
    record::{RecordField, RecordFieldOrder, RecordSchema},
    table::SchemaTable,
    union::UnionSchema,
};
use crate::{
    AvroResult,
    encode::json::escape_json,
    error::Details,
    ordered_map::OrderedMap,
};
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use strum::EnumDiscriminants;

/// Represents documentation for complex Avro schemas.
pub type Documentation = Option<String>;

/// Represents any valid Avro schema.
///
/// More information about Avro schemas can be found in the
/// [Avro Specification](https://avro.apache.org/docs/++version++/specification/#schema-declaration)
#[derive(Clone, Debug, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(SchemaKind), derive(Hash, Ord, PartialOrd))]
pub enum Schema {
    /// A `null` Avro schema.
    Null,
    /// A `boolean` Avro schema.
    Boolean,
    /// An `int` Avro schema.
    Int,
    /// A `long` Avro schema.
    Long,
    /// A `float` Avro schema.
    Float,
    /// A `double` Avro schema.
    Double,
    /// A `bytes` Avro schema.
    ///
    /// `Bytes` represents a sequence of 8-bit unsigned bytes.
    Bytes,
    /// A `string` Avro schema.
    ///
    /// `String` represents a unicode character sequence.
    String,
    /// An `array` Avro schema.
    ///
    /// All items have the same schema.
    Array(ArraySchema),
    /// A `map` Avro schema.
    ///
    /// Keys are always strings and all values have the same schema.
    Map(MapSchema),
    /// A `union` Avro schema.
    Union(UnionSchema),
    /// A `record` Avro schema.
    Record(Arc<RecordSchema>),
    /// An `enum` Avro schema.
    Enum(Arc<EnumSchema>),
    /// A `fixed` Avro schema.
    Fixed(Arc<FixedSchema>),
    /// A reference to a named schema defined elsewhere in the same tree.
    Ref { name: Name },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArraySchema {
    /// The schema of the array's items.
    pub items: Box<Schema>,
    /// The custom attributes of the schema, in document order.
    pub attributes: OrderedMap,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapSchema {
    /// The schema of the map's values.
    pub values: Box<Schema>,
    /// The custom attributes of the schema, in document order.
    pub attributes: OrderedMap,
}

/// A description of an Enum schema.
#[derive(Clone, Debug, PartialEq)]
pub struct EnumSchema {
    /// The name of the schema.
    pub name: Name,
    /// The aliases of the schema.
    pub aliases: Aliases,
    /// The documentation of the schema.
    pub doc: Documentation,
    /// The ordered symbols of the schema.
    pub symbols: Vec<String>,
    /// An optional default symbol used for compatibility.
    pub default: Option<String>,
    /// The custom attributes of the schema, in document order.
    pub attributes: OrderedMap,
    // Maps symbols to ordinals; derived from `symbols`.
    symbol_index: HashMap<String, usize>,
}

impl EnumSchema {
    /// Build an enum schema, validating symbol names, uniqueness and the
    /// optional default symbol.
    pub fn new(
        name: Name,
        symbols: Vec<String>,
        default: Option<String>,
        aliases: Aliases,
        doc: Documentation,
        attributes: OrderedMap,
    ) -> AvroResult<Self> {
        let mut symbol_index = HashMap::with_capacity(symbols.len());
        for (ordinal, symbol) in symbols.iter().enumerate() {
            name::validate_enum_symbol(symbol)?;
            if symbol_index.insert(symbol.clone(), ordinal).is_some() {
                return Err(Details::EnumSymbolDuplicate(symbol.clone()).into());
            }
        }
        if let Some(ref symbol) = default {
            if !symbol_index.contains_key(symbol) {
                return Err(Details::GetEnumDefault {
                    symbol: symbol.clone(),
                    symbols,
                }
                .into());
            }
        }
        Ok(Self {
            name,
            aliases,
            doc,
            symbols,
            default,
            attributes,
            symbol_index,
        })
    }

    /// The ordinal of a symbol.
    pub fn ordinal(&self, symbol: &str) -> Option<usize> {
        self.symbol_index.get(symbol).copied()
    }

    /// The symbol at an ordinal.
    pub fn symbol(&self, ordinal: usize) -> Option<&str> {
        self.symbols.get(ordinal).map(String::as_str)
    }
}

/// A description of a Fixed schema.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedSchema {
    /// The name of the schema.
    pub name: Name,
    /// The aliases of the schema.
    pub aliases: Aliases,
    /// The documentation of the schema.
    pub doc: Documentation,
    /// The size of the fixed schema, in bytes.
    pub size: usize,
    /// The custom attributes of the schema, in document order.
    pub attributes: OrderedMap,
}

impl SchemaKind {
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            SchemaKind::Null
                | SchemaKind::Boolean
                | SchemaKind::Int
                | SchemaKind::Long
                | SchemaKind::Double
                | SchemaKind::Float
                | SchemaKind::Bytes
                | SchemaKind::String,
        )
    }
}

impl Display for SchemaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            SchemaKind::Null => "null",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Int => "int",
            SchemaKind::Long => "long",
            SchemaKind::Float => "float",
            SchemaKind::Double => "double",
            SchemaKind::Bytes => "bytes",
            SchemaKind::String => "string",
            SchemaKind::Array => "array",
            SchemaKind::Map => "map",
            SchemaKind::Union => "union",
            SchemaKind::Record => "record",
            SchemaKind::Enum => "enum",
            SchemaKind::Fixed => "fixed",
            SchemaKind::Ref => "ref",
        };
        f.write_str(s)
    }
}

impl Display for Schema {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.wire_name())
    }
}

impl Schema {
    /// Create a `Schema` from a string representing a JSON Avro schema.
    pub fn parse_str(input: &str) -> AvroResult<Schema> {
        let mut parser = Parser::new();
        parser.parse_str(input)
    }

    /// Parses an Avro schema from a JSON tree.
    pub fn parse(value: &serde_json::Value) -> AvroResult<Schema> {
        let mut parser = Parser::new();
        parser.parse(value)
    }

    /// An array schema with the given items schema and no attributes.
    pub fn array(items: Schema) -> Schema {
        Schema::Array(ArraySchema {
            items: Box::new(items),
            attributes: OrderedMap::new(),
        })
    }

    /// A map schema with the given values schema and no attributes.
    pub fn map(values: Schema) -> Schema {
        Schema::Map(MapSchema {
            values: Box::new(values),
            attributes: OrderedMap::new(),
        })
    }

    /// Returns whether the schema represents a named type.
    pub fn is_named(&self) -> bool {
        matches!(
            self,
            Schema::Ref { .. } | Schema::Record(_) | Schema::Enum(_) | Schema::Fixed(_)
        )
    }

    /// Returns the name of the schema if it has one.
    pub fn name(&self) -> Option<&Name> {
        match self {
            Schema::Ref { name } => Some(name),
            Schema::Record(inner) => Some(&inner.name),
            Schema::Enum(inner) => Some(&inner.name),
            Schema::Fixed(inner) => Some(&inner.name),
            _ => None,
        }
    }

    /// Returns the namespace of the schema if it has one.
    pub fn namespace(&self) -> Option<&str> {
        self.name().and_then(|n| n.namespace())
    }

    /// Returns the aliases of the schema if it has any.
    pub fn aliases(&self) -> Option<&Vec<Alias>> {
        match self {
            Schema::Record(inner) => inner.aliases.as_ref(),
            Schema::Enum(inner) => inner.aliases.as_ref(),
            Schema::Fixed(inner) => inner.aliases.as_ref(),
            _ => None,
        }
    }

    /// Returns the doc of the schema if it has one.
    pub fn doc(&self) -> Option<&String> {
        match self {
            Schema::Record(inner) => inner.doc.as_ref(),
            Schema::Enum(inner) => inner.doc.as_ref(),
            Schema::Fixed(inner) => inner.doc.as_ref(),
            _ => None,
        }
    }

    /// Returns the custom attributes (metadata) if the schema supports them.
    pub fn custom_attributes(&self) -> Option<&OrderedMap> {
        match self {
            Schema::Record(inner) => Some(&inner.attributes),
            Schema::Enum(inner) => Some(&inner.attributes),
            Schema::Fixed(inner) => Some(&inner.attributes),
            Schema::Array(inner) => Some(&inner.attributes),
            Schema::Map(inner) => Some(&inner.attributes),
            _ => None,
        }
    }

    /// The textual `logicalType` annotation, if the schema was declared with
    /// one. This crate records it but never acts on it.
    pub fn logical_type(&self) -> Option<&str> {
        self.custom_attributes()
            .and_then(|attributes| attributes.get("logicalType"))
            .and_then(|value| value.as_str())
    }

    /// The name of the schema on the wire: the primitive type name,
    /// `"array"`/`"map"`/`"union"`, or the fullname of a named schema.
    ///
    /// Union-tagged JSON objects use this as the branch key.
    pub fn wire_name(&self) -> String {
        match self {
            Schema::Null => "null".to_string(),
            Schema::Boolean => "boolean".to_string(),
            Schema::Int => "int".to_string(),
            Schema::Long => "long".to_string(),
            Schema::Float => "float".to_string(),
            Schema::Double => "double".to_string(),
            Schema::Bytes => "bytes".to_string(),
            Schema::String => "string".to_string(),
            Schema::Array(_) => "array".to_string(),
            Schema::Map(_) => "map".to_string(),
            Schema::Union(_) => "union".to_string(),
            Schema::Record(inner) => inner.name.fullname(None),
            Schema::Enum(inner) => inner.name.fullname(None),
            Schema::Fixed(inner) => inner.name.fullname(None),
            Schema::Ref { name } => name.fullname(None),
        }
    }

    /// Render the schema back to its canonical JSON text.
    ///
    /// A named schema is written in full on its first occurrence and as a
    /// fully qualified name string afterwards; the namespace key is omitted
    /// where it matches the enclosing default.
    pub fn to_json(&self) -> AvroResult<String> {
        let mut out = String::new();
        let mut table = SchemaTable::new();
        self.write_json(&mut out, &mut table)?;
        Ok(out)
    }

    pub(crate) fn write_json(
        &self,
        out: &mut String,
        table: &mut SchemaTable,
    ) -> AvroResult<()> {
        match self {
            Schema::Null
            | Schema::Boolean
            | Schema::Int
            | Schema::Long
            | Schema::Float
            | Schema::Double
            | Schema::Bytes
            | Schema::String => {
                write_string_literal(out, &self.wire_name());
                Ok(())
            }
            Schema::Ref { name } => {
                write_string_literal(out, &name.fullname(None));
                Ok(())
            }
            Schema::Array(inner) => {
                out.push_str("{\"type\":\"array\",\"items\":");
                inner.items.write_json(out, table)?;
                write_attributes(out, &inner.attributes)?;
                out.push('}');
                Ok(())
            }
            Schema::Map(inner) => {
                out.push_str("{\"type\":\"map\",\"values\":");
                inner.values.write_json(out, table)?;
                write_attributes(out, &inner.attributes)?;
                out.push('}');
                Ok(())
            }
            Schema::Union(union) => {
                out.push('[');
                for (i, branch) in union.variants().iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    branch.write_json(out, table)?;
                }
                out.push(']');
                Ok(())
            }
            Schema::Record(record) => {
                if table.contains(&record.name) {
                    write_string_literal(out, &record.name.fullname(None));
                    return Ok(());
                }
                table.begin_resolving(&record.name, &record.aliases);

                out.push_str("{\"type\":");
                write_string_literal(out, if record.is_error { "error" } else { "record" });
                write_name_keys(out, &record.name, table);
                write_doc(out, &record.doc);

                let previous =
                    table.enter_namespace(record.name.namespace().map(str::to_string));
                out.push_str(",\"fields\":[");
                for (i, field) in record.fields.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_field(out, field, table)?;
                }
                out.push(']');
                table.restore_namespace(previous);

                write_aliases(out, &record.aliases);
                write_attributes(out, &record.attributes)?;
                out.push('}');
                Ok(())
            }
            Schema::Enum(inner) => {
                if table.contains(&inner.name) {
                    write_string_literal(out, &inner.name.fullname(None));
                    return Ok(());
                }
                table.begin_resolving(&inner.name, &inner.aliases);

                out.push_str("{\"type\":\"enum\"");
                write_name_keys(out, &inner.name, table);
                write_doc(out, &inner.doc);
                out.push_str(",\"symbols\":[");
                for (i, symbol) in inner.symbols.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_string_literal(out, symbol);
                }
                out.push(']');
                if let Some(ref default) = inner.default {
                    out.push_str(",\"default\":");
                    write_string_literal(out, default);
                }
                write_aliases(out, &inner.aliases);
                write_attributes(out, &inner.attributes)?;
                out.push('}');
                Ok(())
            }
            Schema::Fixed(inner) => {
                if table.contains(&inner.name) {
                    write_string_literal(out, &inner.name.fullname(None));
                    return Ok(());
                }
                table.begin_resolving(&inner.name, &inner.aliases);

                out.push_str("{\"type\":\"fixed\"");
                write_name_keys(out, &inner.name, table);
                write_doc(out, &inner.doc);
                out.push_str(",\"size\":");
                out.push_str(&inner.size.to_string());
                write_aliases(out, &inner.aliases);
                write_attributes(out, &inner.attributes)?;
                out.push('}');
                Ok(())
            }
        }
    }
}

fn write_string_literal(out: &mut String, s: &str) {
    out.push('"');
    escape_json(s, out);
    out.push('"');
}

/// `"name"` and, when it differs from the enclosing default, `"namespace"`.
fn write_name_keys(out: &mut String, name: &Name, table: &SchemaTable) {
    out.push_str(",\"name\":");
    write_string_literal(out, name.name());
    match (name.namespace(), table.default_namespace()) {
        (Some(namespace), Some(default)) if namespace == default => {}
        (Some(namespace), _) => {
            out.push_str(",\"namespace\":");
            write_string_literal(out, namespace);
        }
        (None, Some(_)) => {
            // An explicit empty namespace overrides the enclosing default.
            out.push_str(",\"namespace\":\"\"");
        }
        (None, None) => {}
    }
}

fn write_doc(out: &mut String, doc: &Documentation) {
    if let Some(doc) = doc {
        out.push_str(",\"doc\":");
        write_string_literal(out, doc);
    }
}

fn write_aliases(out: &mut String, aliases: &Aliases) {
    if let Some(aliases) = aliases {
        if !aliases.is_empty() {
            out.push_str(",\"aliases\":[");
            for (i, alias) in aliases.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string_literal(out, &alias.fullname(None));
            }
            out.push(']');
        }
    }
}

fn write_attributes(out: &mut String, attributes: &OrderedMap) -> AvroResult<()> {
    for (key, value) in attributes.iter() {
        out.push(',');
        write_string_literal(out, key);
        out.push(':');
        let rendered = serde_json::to_string(value).map_err(Details::SerializeAttribute)?;
        out.push_str(&rendered);
    }
    Ok(())
}

fn write_field(out: &mut String, field: &RecordField, table: &mut SchemaTable) -> AvroResult<()> {
    out.push_str("{\"name\":");
    write_string_literal(out, &field.name);
    out.push_str(",\"type\":");
    field.schema.write_json(out, table)?;
    if let Some(ref default) = field.default {
        out.push_str(",\"default\":");
        let rendered = serde_json::to_string(default).map_err(Details::SerializeAttribute)?;
        out.push_str(&rendered);
    }
    write_doc(out, &field.doc);
    if field.order != RecordFieldOrder::Ascending {
        out.push_str(",\"order\":");
        write_string_literal(out, &field.order.to_string());
    }
    if !field.aliases.is_empty() {
        out.push_str(",\"aliases\":[");
        for (i, alias) in field.aliases.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_string_literal(out, alias);
        }
        out.push(']');
    }
    for (key, value) in field.custom_attributes.iter() {
        out.push(',');
        write_string_literal(out, key);
        out.push(':');
        let rendered = serde_json::to_string(value).map_err(Details::SerializeAttribute)?;
        out.push_str(&rendered);
    }
    out.push('}');
    Ok(())
}
