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

//! Validation of field default values.
//!
//! Defaults stay as the JSON they were declared with; only their literal
//! shape is checked against the field's schema. A JSON `null` is accepted
//! against any schema and means "no default".

use crate::AvroResult;
use crate::error::Details;
use crate::schema::{Schema, SchemaKind, SchemaTable};
use serde_json::Value;

pub(crate) fn validate_default(
    field: &str,
    schema: &Schema,
    value: &Value,
    table: &SchemaTable,
) -> AvroResult<()> {
    if value.is_null() {
        return Ok(());
    }

    let mismatch = || {
        Details::GetDefault {
            field: field.to_string(),
            schema: SchemaKind::from(schema),
            value: value.clone(),
        }
        .into()
    };

    let schema = match schema {
        Schema::Ref { name } => match table.get(name) {
            // A placeholder means the named schema is still being built; its
            // own construction validates the defaults it carries.
            None | Some(Schema::Ref { .. }) => return Ok(()),
            Some(resolved) => resolved,
        },
        other => other,
    };

    match schema {
        Schema::Null => Err(mismatch()),
        Schema::Boolean => {
            if value.is_boolean() {
                Ok(())
            } else {
                Err(mismatch())
            }
        }
        Schema::Int => match value.as_i64() {
            Some(n) if i32::try_from(n).is_ok() => Ok(()),
            _ => Err(mismatch()),
        },
        Schema::Long => {
            if value.as_i64().is_some() || value.as_u64().is_some() {
                Ok(())
            } else {
                Err(mismatch())
            }
        }
        Schema::Float | Schema::Double => {
            if value.is_number() {
                Ok(())
            } else {
                Err(mismatch())
            }
        }
        Schema::Bytes | Schema::String | Schema::Enum(_) | Schema::Fixed(_) => {
            if value.is_string() {
                Ok(())
            } else {
                Err(mismatch())
            }
        }
        Schema::Array(inner) => match value.as_array() {
            Some(items) => {
                for item in items {
                    validate_default(field, &inner.items, item, table)?;
                }
                Ok(())
            }
            None => Err(mismatch()),
        },
        Schema::Map(inner) => match value.as_object() {
            Some(entries) => {
                for entry in entries.values() {
                    validate_default(field, &inner.values, entry, table)?;
                }
                Ok(())
            }
            None => Err(mismatch()),
        },
        // A union default is interpreted against its first branch only.
        Schema::Union(union) => match union.variants().first() {
            Some(first_branch) => validate_default(field, first_branch, value, table),
            None => Err(mismatch()),
        },
        Schema::Record(record) => match value.as_object() {
            Some(entries) => {
                for record_field in &record.fields {
                    match entries
                        .get(&record_field.name)
                        .or(record_field.default.as_ref())
                    {
                        Some(sub_value) => validate_default(
                            &record_field.name,
                            &record_field.schema,
                            sub_value,
                            table,
                        )?,
                        // a field with neither a supplied value nor its own
                        // default makes the record default non-materializable
                        None => return Err(mismatch()),
                    }
                }
                Ok(())
            }
            None => Err(mismatch()),
        },
        Schema::Ref { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::schema::UnionSchema;
    use serde_json::json;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn check(schema: &Schema, value: &Value) -> AvroResult<()> {
        validate_default("f", schema, value, &SchemaTable::new())
    }

    #[test]
    fn null_means_no_default_for_any_schema() -> TestResult {
        for schema in [
            Schema::Null,
            Schema::Int,
            Schema::String,
            Schema::array(Schema::Int),
        ] {
            check(&schema, &Value::Null)?;
        }

        Ok(())
    }

    #[test]
    fn int_accepts_only_32_bit_integers() {
        assert!(check(&Schema::Int, &json!(42)).is_ok());
        assert!(check(&Schema::Int, &json!(i32::MIN)).is_ok());
        assert!(check(&Schema::Int, &json!(i32::MAX)).is_ok());
        assert!(check(&Schema::Int, &json!(i32::MAX as i64 + 1)).is_err());
        assert!(check(&Schema::Int, &json!(1.5)).is_err());
        assert!(check(&Schema::Int, &json!("42")).is_err());
    }

    #[test]
    fn long_accepts_any_integer() {
        assert!(check(&Schema::Long, &json!(i64::MIN)).is_ok());
        assert!(check(&Schema::Long, &json!(i64::MAX)).is_ok());
        assert!(check(&Schema::Long, &json!(2.5)).is_err());
        assert!(check(&Schema::Long, &json!(true)).is_err());
    }

    #[test]
    fn floats_accept_numbers() {
        assert!(check(&Schema::Float, &json!(1.25)).is_ok());
        assert!(check(&Schema::Double, &json!(3)).is_ok());
        assert!(check(&Schema::Double, &json!("3.0")).is_err());
    }

    #[test]
    fn strings_bytes_enums_and_fixed_accept_strings() -> TestResult {
        let enum_schema = Schema::parse_str(
            r#"{"type": "enum", "name": "E", "symbols": ["A", "B"]}"#,
        )?;
        let fixed_schema = Schema::parse_str(r#"{"type": "fixed", "name": "F", "size": 2}"#)?;
        for schema in [Schema::String, Schema::Bytes, enum_schema, fixed_schema] {
            assert!(check(&schema, &json!("text")).is_ok());
            assert!(check(&schema, &json!(1)).is_err());
        }

        Ok(())
    }

    #[test]
    fn boolean_accepts_booleans() {
        assert!(check(&Schema::Boolean, &json!(true)).is_ok());
        assert!(check(&Schema::Boolean, &json!(0)).is_err());
    }

    #[test]
    fn arrays_and_maps_recurse() {
        let array = Schema::array(Schema::Int);
        assert!(check(&array, &json!([1, 2, 3])).is_ok());
        assert!(check(&array, &json!([1, "two"])).is_err());
        assert!(check(&array, &json!({})).is_err());

        let map = Schema::map(Schema::Boolean);
        assert!(check(&map, &json!({"a": true})).is_ok());
        assert!(check(&map, &json!({"a": 1})).is_err());
        assert!(check(&map, &json!([])).is_err());
    }

    #[test]
    fn union_defaults_validate_against_branch_zero_only() -> TestResult {
        let union = Schema::Union(UnionSchema::new(vec![Schema::Int, Schema::String])?);
        assert!(check(&union, &json!(5)).is_ok());
        // Valid for branch 1, but only branch 0 counts.
        assert!(check(&union, &json!("five")).is_err());

        Ok(())
    }

    #[test]
    fn record_defaults_fall_back_to_field_defaults() -> TestResult {
        let record = Schema::parse_str(
            r#"
            {
                "type": "record",
                "name": "R",
                "fields": [
                    {"name": "a", "type": "int"},
                    {"name": "b", "type": "string", "default": "x"}
                ]
            }
            "#,
        )?;
        // "b" is missing but has its own default.
        assert!(check(&record, &json!({"a": 1})).is_ok());
        assert!(check(&record, &json!({"a": "one"})).is_err());
        assert!(check(&record, &json!(7)).is_err());

        // "a" has neither a supplied value nor its own default.
        assert!(check(&record, &json!({"b": "y"})).is_err());

        Ok(())
    }

    #[test]
    fn record_defaults_require_every_field_to_resolve() -> TestResult {
        let record = Schema::parse_str(
            r#"
            {
                "type": "record",
                "name": "Inner",
                "fields": [{"name": "req", "type": "int"}]
            }
            "#,
        )?;
        assert!(check(&record, &json!({"req": 1})).is_ok());
        let err = check(&record, &json!({})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);

        Ok(())
    }

    #[test]
    fn mismatch_surfaces_as_a_type_error() {
        let err = check(&Schema::Int, &json!("nope")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }
}
