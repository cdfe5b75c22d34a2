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

//! The generic, schema-shaped value model.
//!
//! A [`GenericDatum`] is built against a [`Schema`] and mirrors its shape.
//! Typed accessors dereference a selected union transparently, so callers
//! mostly work with the effective value and only touch
//! [`GenericUnion::select_branch`] to switch branches.

use crate::AvroResult;
use crate::error::Details;
use crate::schema::{
    EnumSchema, FixedSchema, Name, RecordSchema, Schema, SchemaTable, UnionSchema,
};
use std::collections::HashMap;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;
use strum::EnumDiscriminants;

/// A runtime value whose shape matches a schema.
#[derive(Clone, Debug, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(DatumKind), derive(Hash))]
pub enum GenericDatum {
    Null,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bytes(Vec<u8>),
    String(String),
    Array(GenericArray),
    Map(GenericMap),
    Union(Box<GenericUnion>),
    Record(GenericRecord),
    Enum(GenericEnum),
    Fixed(GenericFixed),
}

impl Display for DatumKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            DatumKind::Null => "null",
            DatumKind::Boolean => "boolean",
            DatumKind::Int => "int",
            DatumKind::Long => "long",
            DatumKind::Float => "float",
            DatumKind::Double => "double",
            DatumKind::Bytes => "bytes",
            DatumKind::String => "string",
            DatumKind::Array => "array",
            DatumKind::Map => "map",
            DatumKind::Union => "union",
            DatumKind::Record => "record",
            DatumKind::Enum => "enum",
            DatumKind::Fixed => "fixed",
        };
        f.write_str(s)
    }
}

fn mismatch(expected: DatumKind, found: DatumKind) -> crate::Error {
    Details::DatumKindMismatch { expected, found }.into()
}

/// Build the identity datum for a schema, guarding against unions whose
/// first branch refers back to a named schema still under construction.
fn build_datum(
    schema: &Schema,
    table: &Arc<SchemaTable>,
    in_progress: &mut Vec<Name>,
) -> AvroResult<GenericDatum> {
    match schema {
        Schema::Null => Ok(GenericDatum::Null),
        Schema::Boolean => Ok(GenericDatum::Boolean(false)),
        Schema::Int => Ok(GenericDatum::Int(0)),
        Schema::Long => Ok(GenericDatum::Long(0)),
        Schema::Float => Ok(GenericDatum::Float(0.0)),
        Schema::Double => Ok(GenericDatum::Double(0.0)),
        Schema::Bytes => Ok(GenericDatum::Bytes(Vec::new())),
        Schema::String => Ok(GenericDatum::String(String::new())),
        Schema::Array(inner) => Ok(GenericDatum::Array(GenericArray {
            items: (*inner.items).clone(),
            table: Arc::clone(table),
            values: Vec::new(),
        })),
        Schema::Map(inner) => Ok(GenericDatum::Map(GenericMap {
            values: (*inner.values).clone(),
            table: Arc::clone(table),
            entries: Vec::new(),
            index: HashMap::new(),
        })),
        Schema::Record(record) => {
            if in_progress.contains(&record.name) {
                return Err(Details::CircularSchema(record.name.clone()).into());
            }
            in_progress.push(record.name.clone());
            let mut fields = Vec::with_capacity(record.fields.len());
            for field in &record.fields {
                fields.push(build_datum(&field.schema, table, in_progress)?);
            }
            in_progress.pop();
            Ok(GenericDatum::Record(GenericRecord {
                schema: Arc::clone(record),
                fields,
            }))
        }
        Schema::Enum(inner) => {
            if inner.symbols.is_empty() {
                return Err(Details::GetEnumValue {
                    index: 0,
                    nsymbols: 0,
                }
                .into());
            }
            Ok(GenericDatum::Enum(GenericEnum {
                schema: Arc::clone(inner),
                ordinal: 0,
            }))
        }
        Schema::Fixed(inner) => Ok(GenericDatum::Fixed(GenericFixed {
            bytes: vec![0; inner.size],
            schema: Arc::clone(inner),
        })),
        Schema::Union(union) => {
            let selected = match union.variants().first() {
                Some(branch) if !closes_a_cycle(branch, in_progress) => {
                    Some((0, build_datum(branch, table, in_progress)?))
                }
                _ => None,
            };
            Ok(GenericDatum::Union(Box::new(GenericUnion {
                schema: union.clone(),
                table: Arc::clone(table),
                selected,
            })))
        }
        Schema::Ref { name } => {
            if in_progress.contains(name) {
                return Err(Details::CircularSchema(name.clone()).into());
            }
            let resolved = table.resolve(name)?.clone();
            build_datum(&resolved, table, in_progress)
        }
    }
}

/// Only a named reference can close a construction cycle.
fn closes_a_cycle(branch: &Schema, in_progress: &[Name]) -> bool {
    match branch {
        Schema::Ref { name } => in_progress.contains(name),
        Schema::Record(record) => in_progress.contains(&record.name),
        _ => false,
    }
}

impl GenericDatum {
    /// Build the identity datum for a schema.
    pub fn from_schema(schema: &Schema) -> AvroResult<Self> {
        let table = Arc::new(SchemaTable::from_schema(schema)?);
        Self::with_table(schema, &table)
    }

    /// Build the identity datum using an already assembled table.
    pub fn with_table(schema: &Schema, table: &Arc<SchemaTable>) -> AvroResult<Self> {
        build_datum(schema, table, &mut Vec::new())
    }

    /// The shape of this datum, without dereferencing unions.
    pub fn kind(&self) -> DatumKind {
        DatumKind::from(self)
    }

    /// The effective type: a union with a selected branch reports the branch
    /// type, a union without one reports `union`.
    pub fn datum_type(&self) -> DatumKind {
        DatumKind::from(self.effective())
    }

    fn effective(&self) -> &GenericDatum {
        match self {
            GenericDatum::Union(union) => match &union.selected {
                Some((_, value)) => value.effective(),
                None => self,
            },
            _ => self,
        }
    }

    fn effective_mut(&mut self) -> Option<&mut GenericDatum> {
        match self {
            GenericDatum::Union(union) => union
                .selected
                .as_mut()
                .and_then(|(_, value)| value.effective_mut()),
            other => Some(other),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.effective(), GenericDatum::Null)
    }

    pub fn as_boolean(&self) -> AvroResult<bool> {
        match self.effective() {
            GenericDatum::Boolean(value) => Ok(*value),
            other => Err(mismatch(DatumKind::Boolean, other.kind())),
        }
    }

    pub fn as_int(&self) -> AvroResult<i32> {
        match self.effective() {
            GenericDatum::Int(value) => Ok(*value),
            other => Err(mismatch(DatumKind::Int, other.kind())),
        }
    }

    pub fn as_long(&self) -> AvroResult<i64> {
        match self.effective() {
            GenericDatum::Long(value) => Ok(*value),
            other => Err(mismatch(DatumKind::Long, other.kind())),
        }
    }

    pub fn as_float(&self) -> AvroResult<f32> {
        match self.effective() {
            GenericDatum::Float(value) => Ok(*value),
            other => Err(mismatch(DatumKind::Float, other.kind())),
        }
    }

    pub fn as_double(&self) -> AvroResult<f64> {
        match self.effective() {
            GenericDatum::Double(value) => Ok(*value),
            other => Err(mismatch(DatumKind::Double, other.kind())),
        }
    }

    pub fn as_bytes(&self) -> AvroResult<&[u8]> {
        match self.effective() {
            GenericDatum::Bytes(value) => Ok(value),
            other => Err(mismatch(DatumKind::Bytes, other.kind())),
        }
    }

    pub fn as_str(&self) -> AvroResult<&str> {
        match self.effective() {
            GenericDatum::String(value) => Ok(value),
            other => Err(mismatch(DatumKind::String, other.kind())),
        }
    }

    pub fn as_array(&self) -> AvroResult<&GenericArray> {
        match self.effective() {
            GenericDatum::Array(value) => Ok(value),
            other => Err(mismatch(DatumKind::Array, other.kind())),
        }
    }

    pub fn as_map(&self) -> AvroResult<&GenericMap> {
        match self.effective() {
            GenericDatum::Map(value) => Ok(value),
            other => Err(mismatch(DatumKind::Map, other.kind())),
        }
    }

    pub fn as_record(&self) -> AvroResult<&GenericRecord> {
        match self.effective() {
            GenericDatum::Record(value) => Ok(value),
            other => Err(mismatch(DatumKind::Record, other.kind())),
        }
    }

    pub fn as_enum(&self) -> AvroResult<&GenericEnum> {
        match self.effective() {
            GenericDatum::Enum(value) => Ok(value),
            other => Err(mismatch(DatumKind::Enum, other.kind())),
        }
    }

    pub fn as_fixed(&self) -> AvroResult<&GenericFixed> {
        match self.effective() {
            GenericDatum::Fixed(value) => Ok(value),
            other => Err(mismatch(DatumKind::Fixed, other.kind())),
        }
    }

    /// The union itself; this accessor never dereferences.
    pub fn as_union(&self) -> AvroResult<&GenericUnion> {
        match self {
            GenericDatum::Union(value) => Ok(value),
            other => Err(mismatch(DatumKind::Union, other.kind())),
        }
    }

    pub fn set_boolean(&mut self, value: bool) -> AvroResult<()> {
        let found = self.datum_type();
        match self.effective_mut() {
            Some(GenericDatum::Boolean(slot)) => {
                *slot = value;
                Ok(())
            }
            _ => Err(mismatch(DatumKind::Boolean, found)),
        }
    }

    pub fn set_int(&mut self, value: i32) -> AvroResult<()> {
        let found = self.datum_type();
        match self.effective_mut() {
            Some(GenericDatum::Int(slot)) => {
                *slot = value;
                Ok(())
            }
            _ => Err(mismatch(DatumKind::Int, found)),
        }
    }

    pub fn set_long(&mut self, value: i64) -> AvroResult<()> {
        let found = self.datum_type();
        match self.effective_mut() {
            Some(GenericDatum::Long(slot)) => {
                *slot = value;
                Ok(())
            }
            _ => Err(mismatch(DatumKind::Long, found)),
        }
    }

    pub fn set_float(&mut self, value: f32) -> AvroResult<()> {
        let found = self.datum_type();
        match self.effective_mut() {
            Some(GenericDatum::Float(slot)) => {
                *slot = value;
                Ok(())
            }
            _ => Err(mismatch(DatumKind::Float, found)),
        }
    }

    pub fn set_double(&mut self, value: f64) -> AvroResult<()> {
        let found = self.datum_type();
        match self.effective_mut() {
            Some(GenericDatum::Double(slot)) => {
                *slot = value;
                Ok(())
            }
            _ => Err(mismatch(DatumKind::Double, found)),
        }
    }

    pub fn set_bytes(&mut self, value: Vec<u8>) -> AvroResult<()> {
        let found = self.datum_type();
        match self.effective_mut() {
            Some(GenericDatum::Bytes(slot)) => {
                *slot = value;
                Ok(())
            }
            _ => Err(mismatch(DatumKind::Bytes, found)),
        }
    }

    pub fn set_string(&mut self, value: impl Into<String>) -> AvroResult<()> {
        let found = self.datum_type();
        match self.effective_mut() {
            Some(GenericDatum::String(slot)) => {
                *slot = value.into();
                Ok(())
            }
            _ => Err(mismatch(DatumKind::String, found)),
        }
    }

    pub fn as_array_mut(&mut self) -> AvroResult<&mut GenericArray> {
        let found = self.datum_type();
        match self.effective_mut() {
            Some(GenericDatum::Array(value)) => Ok(value),
            _ => Err(mismatch(DatumKind::Array, found)),
        }
    }

    pub fn as_map_mut(&mut self) -> AvroResult<&mut GenericMap> {
        let found = self.datum_type();
        match self.effective_mut() {
            Some(GenericDatum::Map(value)) => Ok(value),
            _ => Err(mismatch(DatumKind::Map, found)),
        }
    }

    pub fn as_record_mut(&mut self) -> AvroResult<&mut GenericRecord> {
        let found = self.datum_type();
        match self.effective_mut() {
            Some(GenericDatum::Record(value)) => Ok(value),
            _ => Err(mismatch(DatumKind::Record, found)),
        }
    }

    pub fn as_enum_mut(&mut self) -> AvroResult<&mut GenericEnum> {
        let found = self.datum_type();
        match self.effective_mut() {
            Some(GenericDatum::Enum(value)) => Ok(value),
            _ => Err(mismatch(DatumKind::Enum, found)),
        }
    }

    pub fn as_fixed_mut(&mut self) -> AvroResult<&mut GenericFixed> {
        let found = self.datum_type();
        match self.effective_mut() {
            Some(GenericDatum::Fixed(value)) => Ok(value),
            _ => Err(mismatch(DatumKind::Fixed, found)),
        }
    }

    pub fn as_union_mut(&mut self) -> AvroResult<&mut GenericUnion> {
        let found = self.kind();
        match self {
            GenericDatum::Union(value) => Ok(value),
            _ => Err(mismatch(DatumKind::Union, found)),
        }
    }

    /// Select the branch of a union datum.
    pub fn select_branch(&mut self, index: usize) -> AvroResult<()> {
        self.as_union_mut()?.select_branch(index)
    }

    /// The number of items of an array or map datum.
    pub fn length(&self) -> AvroResult<usize> {
        match self.effective() {
            GenericDatum::Array(array) => Ok(array.len()),
            GenericDatum::Map(map) => Ok(map.len()),
            other => Err(mismatch(DatumKind::Array, other.kind())),
        }
    }
}

impl From<()> for GenericDatum {
    fn from((): ()) -> Self {
        GenericDatum::Null
    }
}

impl From<bool> for GenericDatum {
    fn from(value: bool) -> Self {
        GenericDatum::Boolean(value)
    }
}

impl From<i32> for GenericDatum {
    fn from(value: i32) -> Self {
        GenericDatum::Int(value)
    }
}

impl From<i64> for GenericDatum {
    fn from(value: i64) -> Self {
        GenericDatum::Long(value)
    }
}

impl From<f32> for GenericDatum {
    fn from(value: f32) -> Self {
        GenericDatum::Float(value)
    }
}

impl From<f64> for GenericDatum {
    fn from(value: f64) -> Self {
        GenericDatum::Double(value)
    }
}

impl From<&str> for GenericDatum {
    fn from(value: &str) -> Self {
        GenericDatum::String(value.to_string())
    }
}

impl From<String> for GenericDatum {
    fn from(value: String) -> Self {
        GenericDatum::String(value)
    }
}

impl From<Vec<u8>> for GenericDatum {
    fn from(value: Vec<u8>) -> Self {
        GenericDatum::Bytes(value)
    }
}

/// A growable sequence of datums sharing one element schema.
#[derive(Clone)]
pub struct GenericArray {
    items: Schema,
    table: Arc<SchemaTable>,
    values: Vec<GenericDatum>,
}

impl GenericArray {
    pub fn item_schema(&self) -> &Schema {
        &self.items
    }

    pub fn values(&self) -> &[GenericDatum] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GenericDatum> {
        self.values.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut GenericDatum> {
        self.values.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenericDatum> {
        self.values.iter()
    }

    /// Append a value; primitives autobox via `Into`.
    pub fn push(&mut self, value: impl Into<GenericDatum>) {
        self.values.push(value.into());
    }

    /// The identity datum of the element schema.
    pub fn new_item(&self) -> AvroResult<GenericDatum> {
        build_datum(&self.items, &self.table, &mut Vec::new())
    }

    /// Append the identity datum and hand it back for in-place filling.
    pub fn push_default(&mut self) -> AvroResult<&mut GenericDatum> {
        let item = self.new_item()?;
        self.values.push(item);
        let last = self.values.len() - 1;
        Ok(&mut self.values[last])
    }
}

impl Debug for GenericArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}

impl PartialEq for GenericArray {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items && self.values == other.values
    }
}

/// A string-keyed mapping of datums sharing one value schema, iterated in
/// insertion order.
#[derive(Clone)]
pub struct GenericMap {
    values: Schema,
    table: Arc<SchemaTable>,
    entries: Vec<(String, GenericDatum)>,
    index: HashMap<String, usize>,
}

impl GenericMap {
    pub fn value_schema(&self) -> &Schema {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&GenericDatum> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut GenericDatum> {
        match self.index.get(key) {
            Some(&position) => Some(&mut self.entries[position].1),
            None => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GenericDatum)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Insert a value; an existing key is overwritten in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<GenericDatum>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Insert the identity datum under `key` and hand it back for in-place
    /// filling.
    pub fn insert_default(&mut self, key: impl Into<String>) -> AvroResult<&mut GenericDatum> {
        let item = build_datum(&self.values, &self.table, &mut Vec::new())?;
        let key = key.into();
        match self.index.get(&key).copied() {
            Some(position) => {
                self.entries[position].1 = item;
                Ok(&mut self.entries[position].1)
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, item));
                let last = self.entries.len() - 1;
                Ok(&mut self.entries[last].1)
            }
        }
    }
}

impl Debug for GenericMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl PartialEq for GenericMap {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values && self.entries == other.entries
    }
}

/// A record datum: field values in schema order.
#[derive(Clone, Debug, PartialEq)]
pub struct GenericRecord {
    schema: Arc<RecordSchema>,
    fields: Vec<GenericDatum>,
}

impl GenericRecord {
    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The field value with the given name or alias.
    pub fn field(&self, name: &str) -> AvroResult<&GenericDatum> {
        match self.schema.field_index(name) {
            Some(position) => Ok(&self.fields[position]),
            None => Err(Details::GetField(name.to_string()).into()),
        }
    }

    pub fn field_mut(&mut self, name: &str) -> AvroResult<&mut GenericDatum> {
        match self.schema.field_index(name) {
            Some(position) => Ok(&mut self.fields[position]),
            None => Err(Details::GetField(name.to_string()).into()),
        }
    }

    pub fn field_at(&self, position: usize) -> Option<&GenericDatum> {
        self.fields.get(position)
    }

    pub fn field_at_mut(&mut self, position: usize) -> Option<&mut GenericDatum> {
        self.fields.get_mut(position)
    }

    /// Replace the value of a field; primitives autobox via `Into`.
    pub fn set_field(
        &mut self,
        name: &str,
        value: impl Into<GenericDatum>,
    ) -> AvroResult<()> {
        *self.field_mut(name)? = value.into();
        Ok(())
    }

    /// Field names paired with their values, in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GenericDatum)> {
        self.schema
            .fields
            .iter()
            .map(|field| field.name.as_str())
            .zip(self.fields.iter())
    }
}

/// A union datum: the selected branch index plus the nested datum.
///
/// A freshly built union selects branch 0, unless branch 0 loops back to a
/// named schema still being constructed; in that case the union starts with
/// no selection and writing it is an error until a branch is chosen.
#[derive(Clone)]
pub struct GenericUnion {
    schema: UnionSchema,
    table: Arc<SchemaTable>,
    selected: Option<(usize, GenericDatum)>,
}

impl GenericUnion {
    pub fn schema(&self) -> &UnionSchema {
        &self.schema
    }

    /// The selected branch index, if a branch has been selected.
    pub fn branch_index(&self) -> Option<usize> {
        self.selected.as_ref().map(|(index, _)| *index)
    }

    pub fn value(&self) -> AvroResult<&GenericDatum> {
        match &self.selected {
            Some((_, value)) => Ok(value),
            None => Err(Details::UnionBranchNotSelected.into()),
        }
    }

    pub fn value_mut(&mut self) -> AvroResult<&mut GenericDatum> {
        match &mut self.selected {
            Some((_, value)) => Ok(value),
            None => Err(Details::UnionBranchNotSelected.into()),
        }
    }

    /// Select a branch, re-initialising the nested datum from the branch
    /// schema. Selecting the already selected branch is a no-op.
    pub fn select_branch(&mut self, index: usize) -> AvroResult<()> {
        if let Some((current, _)) = &self.selected {
            if *current == index {
                return Ok(());
            }
        }
        let branch = self.schema.variant(index).ok_or(Details::GetUnionVariant {
            index: index as i64,
            num_variants: self.schema.len(),
        })?;
        let value = build_datum(branch, &self.table, &mut Vec::new())?;
        self.selected = Some((index, value));
        Ok(())
    }
}

impl Debug for GenericUnion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.selected {
            Some((index, value)) => f
                .debug_struct("GenericUnion")
                .field("branch", index)
                .field("value", value)
                .finish(),
            None => f.write_str("GenericUnion(<no branch selected>)"),
        }
    }
}

impl PartialEq for GenericUnion {
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema && self.selected == other.selected
    }
}

/// An enum datum: an ordinal within the schema's symbol list.
#[derive(Clone, Debug, PartialEq)]
pub struct GenericEnum {
    schema: Arc<EnumSchema>,
    ordinal: usize,
}

impl GenericEnum {
    pub fn schema(&self) -> &Arc<EnumSchema> {
        &self.schema
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn symbol(&self) -> &str {
        &self.schema.symbols[self.ordinal]
    }

    pub fn set_ordinal(&mut self, ordinal: usize) -> AvroResult<()> {
        if ordinal >= self.schema.symbols.len() {
            return Err(Details::GetEnumValue {
                index: ordinal as i64,
                nsymbols: self.schema.symbols.len(),
            }
            .into());
        }
        self.ordinal = ordinal;
        Ok(())
    }

    pub fn set_symbol(&mut self, symbol: &str) -> AvroResult<()> {
        match self.schema.ordinal(symbol) {
            Some(ordinal) => {
                self.ordinal = ordinal;
                Ok(())
            }
            None => Err(Details::GetEnumSymbol(symbol.to_string()).into()),
        }
    }
}

/// A fixed datum: a byte array of exactly the schema's size.
#[derive(Clone, Debug, PartialEq)]
pub struct GenericFixed {
    schema: Arc<FixedSchema>,
    bytes: Vec<u8>,
}

impl GenericFixed {
    pub fn schema(&self) -> &Arc<FixedSchema> {
        &self.schema
    }

    pub fn size(&self) -> usize {
        self.schema.size
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn set_bytes(&mut self, bytes: Vec<u8>) -> AvroResult<()> {
        if bytes.len() != self.schema.size {
            return Err(Details::FixedValueLength {
                expected: self.schema.size,
                found: bytes.len(),
            }
            .into());
        }
        self.bytes = bytes;
        Ok(())
    }
}
