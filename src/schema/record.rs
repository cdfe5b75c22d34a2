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
use crate::ordered_map::OrderedMap;
use crate::schema::name::validate_name_part;
use crate::schema::{Aliases, Documentation, Name, Schema};
use crate::{AvroResult, Error};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// The sort order of a record field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecordFieldOrder {
    #[default]
    Ascending,
    Descending,
    Ignore,
}

impl FromStr for RecordFieldOrder {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_uppercase().as_str() {
            "ASCENDING" => Ok(Self::Ascending),
            "DESCENDING" => Ok(Self::Descending),
            "IGNORE" => Ok(Self::Ignore),
            _ => Err(Details::ParseRecordFieldOrder(value.to_string()).into()),
        }
    }
}

impl Display for RecordFieldOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
            Self::Ignore => "ignore",
        };
        f.write_str(s)
    }
}

/// Represents a `field` in a `record` Avro schema.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordField {
    /// Name of the field.
    pub name: String,
    /// Documentation of the field.
    pub doc: Documentation,
    /// Default value of the field, kept as the JSON it was declared with.
    pub default: Option<serde_json::Value>,
    /// Sort order of the field.
    pub order: RecordFieldOrder,
    /// Aliases of the field's name. They have no namespace.
    pub aliases: Vec<String>,
    /// Schema of the field.
    pub schema: Schema,
    /// Position of the field inside its record, assigned when the fields are
    /// attached.
    pub position: usize,
    /// All unknown keys declared on the field, in document order.
    pub custom_attributes: OrderedMap,
}

impl RecordField {
    /// A field with just a name and a schema; everything else defaulted.
    /// The position is assigned by [`RecordSchema::set_fields`].
    pub fn new(name: impl Into<String>, schema: Schema) -> AvroResult<Self> {
        let name = name.into();
        validate_name_part(&name)?;
        Ok(Self {
            name,
            doc: None,
            default: None,
            order: RecordFieldOrder::default(),
            aliases: Vec::new(),
            schema,
            position: 0,
            custom_attributes: OrderedMap::new(),
        })
    }

    /// Whether the field's schema is a union with a `null` branch.
    pub fn is_nullable(&self) -> bool {
        match self.schema {
            Schema::Union(ref inner) => inner.is_nullable(),
            _ => false,
        }
    }
}

/// A description of a Record schema.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordSchema {
    /// The name of the schema.
    pub name: Name,
    /// The aliases of the schema.
    pub aliases: Aliases,
    /// The documentation of the schema.
    pub doc: Documentation,
    /// Whether the record was declared with `"type": "error"`.
    pub is_error: bool,
    /// The fields of the schema, in declaration order.
    pub fields: Vec<RecordField>,
    /// Maps field names (and field aliases) to positions in `fields`.
    pub lookup: BTreeMap<String, usize>,
    /// The custom attributes of the schema, in document order.
    pub attributes: OrderedMap,
}

impl RecordSchema {
    /// A record shell without fields; attach them once with
    /// [`set_fields`](Self::set_fields).
    pub fn new(name: Name) -> Self {
        Self {
            name,
            aliases: None,
            doc: None,
            is_error: false,
            fields: Vec::new(),
            lookup: BTreeMap::new(),
            attributes: OrderedMap::new(),
        }
    }

    /// Attach the fields, assigning positions `0..n-1` in insertion order
    /// and building the name lookup.
    ///
    /// # Errors
    /// Fails if fields were already set or if a field name repeats.
    pub fn set_fields(&mut self, mut fields: Vec<RecordField>) -> AvroResult<()> {
        if !self.lookup.is_empty() || !self.fields.is_empty() {
            return Err(Details::FieldsAlreadySet.into());
        }

        let mut lookup = BTreeMap::new();
        for (position, field) in fields.iter_mut().enumerate() {
            field.position = position;
            if lookup.insert(field.name.clone(), position).is_some() {
                return Err(Details::FieldNameDuplicate(field.name.clone()).into());
            }
        }
        for (position, field) in fields.iter().enumerate() {
            for alias in &field.aliases {
                lookup.entry(alias.clone()).or_insert(position);
            }
        }

        self.fields = fields;
        self.lookup = lookup;
        Ok(())
    }

    /// The field with the given name or alias.
    pub fn field(&self, name: &str) -> Option<&RecordField> {
        self.lookup.get(name).map(|&position| &self.fields[position])
    }

    /// The position of the field with the given name or alias.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Details, Error};
    use pretty_assertions::assert_eq;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn positions_follow_insertion_order() -> TestResult {
        let mut record = RecordSchema::new(Name::new("TestRecord")?);
        record.set_fields(vec![
            RecordField::new("first", Schema::Null)?,
            RecordField::new("second", Schema::Boolean)?,
            RecordField::new("third", Schema::Long)?,
        ])?;

        for (expected, field) in record.fields.iter().enumerate() {
            assert_eq!(field.position, expected);
        }
        assert_eq!(record.field_index("second"), Some(1));
        assert_eq!(record.field("third").map(|f| &f.schema), Some(&Schema::Long));

        Ok(())
    }

    #[test]
    fn duplicate_field_names_are_rejected() -> TestResult {
        let mut record = RecordSchema::new(Name::new("TestRecord")?);
        let result = record.set_fields(vec![
            RecordField::new("twice", Schema::Int)?,
            RecordField::new("twice", Schema::Long)?,
        ]);
        match result.map_err(Error::into_details) {
            Err(Details::FieldNameDuplicate(name)) => assert_eq!(name, "twice"),
            other => panic!("Expected Details::FieldNameDuplicate, got {other:?}"),
        }

        Ok(())
    }

    #[test]
    fn fields_are_set_at_most_once() -> TestResult {
        let mut record = RecordSchema::new(Name::new("TestRecord")?);
        record.set_fields(vec![RecordField::new("only", Schema::Int)?])?;

        let again = record.set_fields(vec![RecordField::new("more", Schema::Int)?]);
        assert!(matches!(
            again.map_err(Error::into_details),
            Err(Details::FieldsAlreadySet)
        ));

        Ok(())
    }

    #[test]
    fn field_aliases_join_the_lookup() -> TestResult {
        let mut field = RecordField::new("current", Schema::Int)?;
        field.aliases = vec!["previous".to_string()];

        let mut record = RecordSchema::new(Name::new("TestRecord")?);
        record.set_fields(vec![field])?;

        assert_eq!(record.field_index("previous"), Some(0));

        Ok(())
    }

    #[test]
    fn order_parses_case_insensitively() -> TestResult {
        assert_eq!(
            "descending".parse::<RecordFieldOrder>()?,
            RecordFieldOrder::Descending
        );
        assert_eq!(
            "IGNORE".parse::<RecordFieldOrder>()?,
            RecordFieldOrder::Ignore
        );
        assert_eq!(
            "Ascending".parse::<RecordFieldOrder>()?,
            RecordFieldOrder::Ascending
        );
        assert!("sideways".parse::<RecordFieldOrder>().is_err());

        Ok(())
    }

    #[test]
    fn nullable_record_field() -> TestResult {
        use crate::schema::UnionSchema;

        let field = RecordField::new(
            "next",
            Schema::Union(UnionSchema::new(vec![
                Schema::Null,
                Schema::Ref {
                    name: Name::new("LongList")?,
                },
            ])?),
        )?;
        assert!(field.is_nullable());

        let plain = RecordField::new("next", Schema::Long)?;
        assert!(!plain.is_nullable());

        Ok(())
    }
}
