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

use avro_core::{GenericDatum, Schema, decode_binary, decode_json, encode_binary, encode_json};
use pretty_assertions::assert_eq;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

const COMPLEX_SCHEMA: &str = r#"
{
    "type": "record",
    "name": "Complex",
    "fields": [
        {"name": "e", "type": {"type": "enum", "name": "Employment",
                               "symbols": ["FULLTIME", "PARTTIME"]}},
        {"name": "a", "type": {"type": "array", "items": "float"}},
        {"name": "m", "type": {"type": "map", "values": "long"}},
        {"name": "f", "type": {"type": "fixed", "name": "Four", "size": 4}}
    ]
}
"#;

fn sample(schema: &Schema) -> TestResult<GenericDatum> {
    let mut datum = GenericDatum::from_schema(schema)?;
    let record = datum.as_record_mut()?;
    record.field_mut("e")?.as_enum_mut()?.set_symbol("PARTTIME")?;
    {
        let array = record.field_mut("a")?.as_array_mut()?;
        array.push(1.23f32);
        array.push(4.56f32);
    }
    {
        let map = record.field_mut("m")?.as_map_mut()?;
        map.insert("m1", 10i64);
        map.insert("m2", 20i64);
    }
    record
        .field_mut("f")?
        .as_fixed_mut()?
        .set_bytes(vec![0x01, 0x02, 0x03, 0x04])?;
    Ok(datum)
}

#[test]
fn enum_array_map_fixed_binary_bytes_are_exact() -> TestResult {
    let schema = Schema::parse_str(COMPLEX_SCHEMA)?;
    let datum = sample(&schema)?;

    let mut expected: Vec<u8> = Vec::new();
    // enum ordinal 1
    expected.push(0x02);
    // one array block of two floats, then the terminator
    expected.push(0x04);
    expected.extend_from_slice(&1.23f32.to_le_bytes());
    expected.extend_from_slice(&4.56f32.to_le_bytes());
    expected.push(0x00);
    // one map block of two entries in insertion order, then the terminator
    expected.push(0x04);
    expected.extend_from_slice(&[0x04, b'm', b'1', 0x14]);
    expected.extend_from_slice(&[0x04, b'm', b'2', 0x28]);
    expected.push(0x00);
    // fixed as raw bytes
    expected.extend_from_slice(&[0x01, 0x02, 0x03, 0x04]);

    let bytes = encode_binary(&datum)?;
    assert_eq!(bytes, expected);
    assert_eq!(decode_binary(&schema, &bytes)?, datum);

    Ok(())
}

#[test]
fn enum_array_map_fixed_json_roundtrip() -> TestResult {
    let schema = Schema::parse_str(COMPLEX_SCHEMA)?;
    let datum = sample(&schema)?;

    let text = encode_json(&datum)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    assert_eq!(value["e"], serde_json::json!("PARTTIME"));
    assert_eq!(value["m"]["m1"], serde_json::json!(10));
    assert_eq!(value["f"], serde_json::json!("\u{1}\u{2}\u{3}\u{4}"));

    assert_eq!(decode_json(&schema, &text)?, datum);

    Ok(())
}

#[test]
fn zero_length_values_roundtrip() -> TestResult {
    for raw in [
        r#""bytes""#,
        r#""string""#,
        r#"{"type": "array", "items": "int"}"#,
        r#"{"type": "map", "values": "int"}"#,
        r#"{"type": "fixed", "name": "Empty", "size": 0}"#,
    ] {
        let schema = Schema::parse_str(raw)?;
        let datum = GenericDatum::from_schema(&schema)?;
        let bytes = encode_binary(&datum)?;
        assert_eq!(decode_binary(&schema, &bytes)?, datum, "binary: {raw}");

        let text = encode_json(&datum)?;
        assert_eq!(decode_json(&schema, &text)?, datum, "json: {raw}");
    }

    Ok(())
}

#[test]
fn float_specials_in_json() -> TestResult {
    let schema = Schema::parse_str(r#"{"type": "array", "items": "double"}"#)?;
    let mut datum = GenericDatum::from_schema(&schema)?;
    {
        let array = datum.as_array_mut()?;
        array.push(f64::NAN);
        array.push(f64::INFINITY);
        array.push(f64::NEG_INFINITY);
        array.push(2.5f64);
    }

    let text = encode_json(&datum)?;
    assert_eq!(text, "[NaN,Infinity,-Infinity,2.5]");

    let decoded = decode_json(&schema, &text)?;
    let array = decoded.as_array()?;
    assert!(array.get(0).unwrap().as_double()?.is_nan());
    assert_eq!(array.get(1).unwrap().as_double()?, f64::INFINITY);
    assert_eq!(array.get(2).unwrap().as_double()?, f64::NEG_INFINITY);
    assert_eq!(array.get(3).unwrap().as_double()?, 2.5);

    Ok(())
}

#[test]
fn binary_skip_variants_pass_over_containers() -> TestResult {
    use avro_core::{BinaryDecoder, Decoder};

    let schema = Schema::parse_str(COMPLEX_SCHEMA)?;
    let datum = sample(&schema)?;
    let bytes = encode_binary(&datum)?;

    // skip e, a and m by hand, then read f
    let mut decoder = BinaryDecoder::new(&bytes[..]);
    decoder.read_int()?; // enum ordinal

    let mut remaining = decoder.skip_array()?;
    while remaining != 0 {
        for _ in 0..remaining {
            decoder.read_float()?;
        }
        remaining = decoder.skip_array()?;
    }

    let mut remaining = decoder.skip_map()?;
    while remaining != 0 {
        for _ in 0..remaining {
            decoder.skip_string()?;
            decoder.read_long()?;
        }
        remaining = decoder.skip_map()?;
    }

    assert_eq!(decoder.read_fixed(4)?, vec![0x01, 0x02, 0x03, 0x04]);

    Ok(())
}
