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

use crate::error::Details;
use crate::schema::{Aliases, Name, Namespace, Schema};
use crate::AvroResult;
use std::collections::HashMap;

/// Resolves fullnames to schemas and carries the active default namespace.
///
/// A table is populated by the [`Parser`](crate::schema::Parser) while it
/// runs, or reconstructed from a parsed root schema with
/// [`SchemaTable::from_schema`]. Primitive lookups are synthesised on demand
/// and never stored. While a record's fields are being parsed, the record is
/// present as a [`Schema::Ref`] placeholder so that recursive references
/// resolve.
#[derive(Debug, Default, Clone)]
pub struct SchemaTable {
    names: HashMap<Name, Schema>,
    default_namespace: Namespace,
}

/// The primitive schema for a type name, if it is one.
pub(crate) fn primitive_schema(name: &str) -> Option<Schema> {
    match name {
        "null" => Some(Schema::Null),
        "boolean" => Some(Schema::Boolean),
        "int" => Some(Schema::Int),
        "long" => Some(Schema::Long),
        "float" => Some(Schema::Float),
        "double" => Some(Schema::Double),
        "bytes" => Some(Schema::Bytes),
        "string" => Some(Schema::String),
        _ => None,
    }
}

impl SchemaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a parsed schema by collecting every named schema
    /// it defines. Fails if the tree references a name it never defines.
    pub fn from_schema(root: &Schema) -> AvroResult<Self> {
        let mut table = Self::new();
        let mut referenced: Vec<Name> = Vec::new();
        table.collect(root, &mut referenced)?;
        for name in referenced {
            if !table.names.contains_key(&name) {
                return Err(Details::SchemaResolutionError(name).into());
            }
        }
        Ok(table)
    }

    fn collect(&mut self, schema: &Schema, referenced: &mut Vec<Name>) -> AvroResult<()> {
        match schema {
            Schema::Record(record) => {
                self.define(record.name.clone(), schema.clone())?;
                for field in &record.fields {
                    self.collect(&field.schema, referenced)?;
                }
            }
            Schema::Enum(inner) => self.define(inner.name.clone(), schema.clone())?,
            Schema::Fixed(inner) => self.define(inner.name.clone(), schema.clone())?,
            Schema::Array(inner) => self.collect(&inner.items, referenced)?,
            Schema::Map(inner) => self.collect(&inner.values, referenced)?,
            Schema::Union(union) => {
                for branch in union.variants() {
                    self.collect(branch, referenced)?;
                }
            }
            Schema::Ref { name } => referenced.push(name.clone()),
            _ => {}
        }
        Ok(())
    }

    fn define(&mut self, name: Name, schema: Schema) -> AvroResult<()> {
        match self.names.get(&name) {
            Some(existing) if *existing == schema => Ok(()),
            Some(_) => Err(Details::NameCollision(name.fullname(None)).into()),
            None => {
                self.names.insert(name, schema);
                Ok(())
            }
        }
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Swap in a new default namespace, returning the previous one so the
    /// caller can restore it when leaving the scope.
    pub(crate) fn enter_namespace(&mut self, namespace: Namespace) -> Namespace {
        std::mem::replace(&mut self.default_namespace, namespace)
    }

    pub(crate) fn restore_namespace(&mut self, previous: Namespace) {
        self.default_namespace = previous;
    }

    pub fn get(&self, name: &Name) -> Option<&Schema> {
        self.names.get(name)
    }

    pub fn contains(&self, name: &Name) -> bool {
        self.names.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolve a textual type reference: primitives are synthesised,
    /// anything else is looked up against the current default namespace.
    pub fn lookup(&self, reference: &str) -> AvroResult<Schema> {
        if let Some(primitive) = primitive_schema(reference) {
            return Ok(primitive);
        }

        let name = Name::with_enclosing_namespace(reference, self.default_namespace())?;
        if let Some(schema) = self.names.get(&name) {
            return Ok(schema.clone());
        }
        // An unqualified reference that misses in the default namespace may
        // still target a top-level schema without one.
        if name.namespace().is_some() && !reference.contains('.') {
            let bare = Name::new(reference)?;
            if let Some(schema) = self.names.get(&bare) {
                return Ok(schema.clone());
            }
        }

        match reference {
            "record" | "enum" | "fixed" | "array" | "map" | "union" => {
                Err(Details::InvalidSchemaRecord(reference.to_string()).into())
            }
            "bool" => Err(Details::ParsePrimitiveSimilar(reference.to_string(), "boolean").into()),
            _ => Err(Details::ParsePrimitive(name.fullname(None)).into()),
        }
    }

    /// Resolve a [`Schema::Ref`] to its definition.
    pub fn resolve(&self, name: &Name) -> AvroResult<&Schema> {
        self.names
            .get(name)
            .ok_or_else(|| Details::SchemaResolutionError(name.clone()).into())
    }

    /// Dereference one level of [`Schema::Ref`], leaving other schemas as-is.
    pub fn deref_schema<'a>(&'a self, schema: &'a Schema) -> AvroResult<&'a Schema> {
        match schema {
            Schema::Ref { name } => self.resolve(name),
            other => Ok(other),
        }
    }

    /// Insert a [`Schema::Ref`] placeholder for a named schema (and its
    /// aliases) that is about to have its fields parsed.
    pub(crate) fn begin_resolving(&mut self, name: &Name, aliases: &Aliases) {
        let placeholder = Schema::Ref { name: name.clone() };
        self.names.insert(name.clone(), placeholder.clone());
        if let Some(aliases) = aliases {
            for alias in aliases {
                let alias_name = alias.fully_qualified(name.namespace());
                self.names.insert(alias_name, placeholder.clone());
            }
        }
    }

    /// Register a fully constructed named schema, replacing any placeholder.
    /// Redefinition of a real schema or of a primitive name fails.
    pub(crate) fn register(
        &mut self,
        name: &Name,
        schema: &Schema,
        aliases: &Aliases,
    ) -> AvroResult<()> {
        if name.namespace().is_none() && primitive_schema(name.name()).is_some() {
            return Err(Details::ReservedTypeName(name.name().to_string()).into());
        }
        match self.names.get(name) {
            Some(Schema::Ref { name: placeholder }) if placeholder == name => {}
            Some(_) => return Err(Details::NameCollision(name.fullname(None)).into()),
            None => {}
        }
        self.names.insert(name.clone(), schema.clone());
        if let Some(aliases) = aliases {
            for alias in aliases {
                let alias_name = alias.fully_qualified(name.namespace());
                self.names.insert(alias_name, schema.clone());
            }
        }
        Ok(())
    }
}
