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

use avro_core::{
    GenericDatum, Schema, decode_binary, decode_json, encode_binary, encode_json,
};
use pretty_assertions::assert_eq;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

const USER_SCHEMA: &str = r#"
{
    "namespace": "example.avro",
    "type": "record",
    "name": "User",
    "fields": [
        {"name": "name", "type": "string"},
        {"name": "favorite_number", "type": ["int", "null"]},
        {"name": "favorite_color", "type": ["string", "null"]}
    ]
}
"#;

fn bob(schema: &Schema) -> TestResult<GenericDatum> {
    let mut datum = GenericDatum::from_schema(schema)?;
    let record = datum.as_record_mut()?;
    record.field_mut("name")?.set_string("bob")?;
    record.field_mut("favorite_number")?.select_branch(0)?;
    record.field_mut("favorite_number")?.set_int(8)?;
    record.field_mut("favorite_color")?.select_branch(0)?;
    record.field_mut("favorite_color")?.set_string("blue")?;
    Ok(datum)
}

#[test]
fn user_record_binary_bytes_are_exact() -> TestResult {
    let schema = Schema::parse_str(USER_SCHEMA)?;
    let datum = bob(&schema)?;

    let bytes = encode_binary(&datum)?;
    assert_eq!(
        bytes,
        vec![0x06, 0x62, 0x6F, 0x62, 0x00, 0x10, 0x00, 0x08, 0x62, 0x6C, 0x75, 0x65]
    );

    let decoded = decode_binary(&schema, &bytes)?;
    assert_eq!(decoded, datum);
    let record = decoded.as_record()?;
    assert_eq!(record.field("name")?.as_str()?, "bob");
    assert_eq!(record.field("favorite_number")?.as_int()?, 8);
    assert_eq!(record.field("favorite_color")?.as_str()?, "blue");

    Ok(())
}

#[test]
fn user_record_json_is_union_tagged() -> TestResult {
    let schema = Schema::parse_str(USER_SCHEMA)?;
    let datum = bob(&schema)?;

    let text = encode_json(&datum)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    let expected: serde_json::Value = serde_json::from_str(
        r#"{"name": "bob", "favorite_number": {"int": 8}, "favorite_color": {"string": "blue"}}"#,
    )?;
    assert_eq!(value, expected);

    let decoded = decode_json(&schema, &text)?;
    assert_eq!(decoded, datum);

    Ok(())
}

#[test]
fn null_branches_roundtrip() -> TestResult {
    let schema = Schema::parse_str(USER_SCHEMA)?;
    let mut datum = GenericDatum::from_schema(&schema)?;
    {
        let record = datum.as_record_mut()?;
        record.field_mut("name")?.set_string("nobody")?;
        record.field_mut("favorite_number")?.select_branch(1)?;
        record.field_mut("favorite_color")?.select_branch(1)?;
    }

    let bytes = encode_binary(&datum)?;
    assert_eq!(decode_binary(&schema, &bytes)?, datum);

    let text = encode_json(&datum)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    assert_eq!(value["favorite_number"], serde_json::Value::Null);
    assert_eq!(decode_json(&schema, &text)?, datum);

    Ok(())
}

#[test]
fn schema_json_roundtrips_through_emission() -> TestResult {
    let schema = Schema::parse_str(USER_SCHEMA)?;
    let emitted = schema.to_json()?;
    let reparsed = Schema::parse_str(&emitted)?;
    assert_eq!(reparsed, schema);

    Ok(())
}
