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

use avro_core::Schema;
use pretty_assertions::assert_eq;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn roundtrip(raw: &str) -> TestResult {
    let schema = Schema::parse_str(raw)?;
    let emitted = schema.to_json()?;
    let reparsed = Schema::parse_str(&emitted).map_err(|e| {
        format!("re-parsing emitted schema failed: {e}\nemitted: {emitted}")
    })?;
    assert_eq!(reparsed, schema, "emitted: {emitted}");
    Ok(())
}

#[test]
fn primitives_roundtrip() -> TestResult {
    for raw in [
        r#""null""#,
        r#""boolean""#,
        r#""int""#,
        r#""long""#,
        r#""float""#,
        r#""double""#,
        r#""bytes""#,
        r#""string""#,
    ] {
        roundtrip(raw)?;
    }
    Ok(())
}

#[test]
fn containers_roundtrip() -> TestResult {
    roundtrip(r#"{"type": "array", "items": {"type": "map", "values": "long"}}"#)?;
    roundtrip(r#"["null", "int", "string"]"#)?;
    roundtrip(r#"{"type": "map", "values": ["null", "double"]}"#)?;
    Ok(())
}

#[test]
fn named_schemas_roundtrip() -> TestResult {
    roundtrip(
        r#"
        {
            "type": "record",
            "name": "Outer",
            "namespace": "org.example",
            "doc": "outer docs",
            "aliases": ["OldOuter"],
            "fields": [
                {"name": "plain", "type": "int"},
                {"name": "documented", "type": "string", "doc": "field docs"},
                {"name": "defaulted", "type": "long", "default": 42},
                {"name": "ordered", "type": "int", "order": "descending"},
                {"name": "renamed", "type": "int", "aliases": ["was"]},
                {
                    "name": "suit",
                    "type": {
                        "type": "enum",
                        "name": "Suit",
                        "symbols": ["SPADES", "HEARTS"],
                        "default": "SPADES"
                    }
                },
                {"name": "hash", "type": {"type": "fixed", "name": "Hash", "size": 16}},
                {"name": "again", "type": "Hash"}
            ]
        }
        "#,
    )
}

#[test]
fn error_type_roundtrips() -> TestResult {
    let schema = Schema::parse_str(
        r#"{"type": "error", "name": "Oops", "fields": [{"name": "m", "type": "string"}]}"#,
    )?;
    let emitted = schema.to_json()?;
    assert!(emitted.contains(r#""type":"error""#));
    assert_eq!(Schema::parse_str(&emitted)?, schema);
    Ok(())
}

#[test]
fn unknown_attributes_roundtrip() -> TestResult {
    roundtrip(
        r#"
        {
            "type": "fixed",
            "name": "Sixteen",
            "size": 16,
            "logicalType": "uuid",
            "vendor": {"tag": [1, 2, 3]},
            "note": "kept verbatim"
        }
        "#,
    )?;
    roundtrip(
        r#"
        {
            "type": "record",
            "name": "Tagged",
            "fields": [
                {"name": "x", "type": "int", "unit": "metres", "deprecated": true}
            ],
            "owner": "data-team"
        }
        "#,
    )
}

#[test]
fn nested_namespaces_roundtrip() -> TestResult {
    roundtrip(
        r#"
        {
            "type": "record",
            "name": "Top",
            "namespace": "a.b",
            "fields": [
                {
                    "name": "other",
                    "type": {
                        "type": "record",
                        "name": "Other",
                        "namespace": "c.d",
                        "fields": [{"name": "z", "type": "int"}]
                    }
                },
                {"name": "sibling", "type": {
                    "type": "record",
                    "name": "Sibling",
                    "fields": [{"name": "o", "type": "c.d.Other"}]
                }},
                {"name": "back", "type": "a.b.Sibling"}
            ]
        }
        "#,
    )
}
