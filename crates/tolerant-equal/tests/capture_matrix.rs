//! Capture matrix tests: how `Serialize` data lands in the value model and
//! which inputs are capture errors rather than inequality.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use serde::Serialize;
use serde_json::json;
use tolerant_equal::{to_value, CaptureError, DeepEqual, Timestamp, TypeTag, Value};

#[derive(Serialize)]
struct Reading {
    sensor: String,
    celsius: f64,
    flagged: Option<bool>,
}

#[derive(Serialize)]
enum Shape {
    Dot,
    Circle(f64),
    Rect { w: u32, h: u32 },
}

// ---------------------------------------------------------------------------
// Structs and enums
// ---------------------------------------------------------------------------

#[test]
fn struct_captures_as_named_record() {
    let reading = Reading {
        sensor: "s1".to_string(),
        celsius: 21.5,
        flagged: None,
    };
    let captured = to_value(&reading).unwrap();
    assert_eq!(
        captured,
        Value::record(
            "Reading",
            [
                ("sensor", Value::Str("s1".to_string())),
                ("celsius", Value::F64(21.5)),
                ("flagged", Value::Absent),
            ],
        )
    );
}

#[test]
fn none_field_captures_as_absent_and_matches_none() {
    let engine = DeepEqual::new();
    let a = to_value(&Reading {
        sensor: "s1".into(),
        celsius: 1.0,
        flagged: None,
    })
    .unwrap();
    let b = to_value(&Reading {
        sensor: "s1".into(),
        celsius: 1.0,
        flagged: Some(true),
    })
    .unwrap();
    assert!(!engine.deep_equal(&a, &b));
    assert!(engine.deep_equal(&a, &a.clone()));
}

#[test]
fn enum_variants_have_distinct_type_identity() {
    let engine = DeepEqual::new();
    let dot = to_value(&Shape::Dot).unwrap();
    let circle = to_value(&Shape::Circle(1.0)).unwrap();
    let rect = to_value(&Shape::Rect { w: 1, h: 2 }).unwrap();
    assert!(!engine.deep_equal(&dot, &circle));
    assert!(!engine.deep_equal(&circle, &rect));
    assert!(engine.deep_equal(&dot, &to_value(&Shape::Dot).unwrap()));
}

#[test]
fn tuple_variant_fields_compare_positionally() {
    let engine = DeepEqual::new();
    let a = to_value(&Shape::Circle(1.0)).unwrap();
    let b = to_value(&Shape::Circle(2.0)).unwrap();
    assert!(!engine.deep_equal(&a, &b));
}

#[test]
fn struct_variant_captures_named_fields() {
    let captured = to_value(&Shape::Rect { w: 3, h: 4 }).unwrap();
    assert_eq!(
        captured,
        Value::record("Shape::Rect", [("w", Value::UInt(3)), ("h", Value::UInt(4))])
    );
}

#[test]
fn variant_override_can_be_registered_by_name() {
    let mut engine = DeepEqual::new();
    engine.register(TypeTag::Record("Shape::Circle".to_string()), |_, _| true);
    let a = to_value(&Shape::Circle(1.0)).unwrap();
    let b = to_value(&Shape::Circle(9.0)).unwrap();
    assert!(engine.deep_equal(&a, &b));
}

// ---------------------------------------------------------------------------
// Sequences, tuples, maps
// ---------------------------------------------------------------------------

#[test]
fn vec_captures_as_sequence() {
    assert_eq!(
        to_value(&vec![1i64, 2, 3]).unwrap(),
        Value::Seq(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );
}

#[test]
fn tuple_captures_as_sequence() {
    assert_eq!(
        to_value(&(1i64, "a")).unwrap(),
        Value::Seq(vec![Value::Int(1), Value::Str("a".to_string())])
    );
}

#[test]
fn string_keyed_map_captures_as_map() {
    let mut source = BTreeMap::new();
    source.insert("a".to_string(), 1i64);
    source.insert("b".to_string(), 2i64);
    let captured = to_value(&source).unwrap();
    let expected: BTreeMap<String, Value> = [
        ("a".to_string(), Value::Int(1)),
        ("b".to_string(), Value::Int(2)),
    ]
    .into_iter()
    .collect();
    assert_eq!(captured, Value::Map(expected));
}

#[test]
fn non_string_map_key_is_a_capture_error() {
    let mut source = BTreeMap::new();
    source.insert(1u32, "one");
    assert_eq!(to_value(&source), Err(CaptureError::NonStringKey("uint")));
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

#[test]
fn timestamp_wrapper_lands_on_the_time_tag() {
    let instant = Utc.timestamp_opt(1_000, 500).unwrap();
    let captured = to_value(&Timestamp(instant)).unwrap();
    assert_eq!(captured.type_tag(), Some(TypeTag::Time));
    assert_eq!(captured, Value::Time(instant));
}

#[test]
fn timestamp_inside_struct_survives_capture() {
    #[derive(Serialize)]
    struct Event {
        at: Timestamp,
    }
    let instant = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let captured = to_value(&Event { at: Timestamp(instant) }).unwrap();
    assert_eq!(
        captured,
        Value::record("Event", [("at", Value::Time(instant))])
    );
}

// ---------------------------------------------------------------------------
// JSON values
// ---------------------------------------------------------------------------

#[test]
fn json_values_capture_and_compare() {
    let engine = DeepEqual::new();
    let a = to_value(&json!({"a": 1, "b": [true, null]})).unwrap();
    let b = to_value(&json!({"b": [true, null], "a": 1})).unwrap();
    let c = to_value(&json!({"a": 1, "b": [false, null]})).unwrap();
    assert!(engine.deep_equal(&a, &b));
    assert!(!engine.deep_equal(&a, &c));
}

#[test]
fn json_null_captures_as_absent() {
    assert_eq!(to_value(&json!(null)).unwrap(), Value::Absent);
}
