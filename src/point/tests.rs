use super::{escape, is_numeric, Point};
use crate::error::ValidationError;
use crate::point::{FieldValue, Number};
use influxdb_line_protocol::{self, parse_lines};

fn no_pairs() -> Vec<(String, FieldValue)> {
    Vec::new()
}

#[test]
fn test_point_tag_and_field_positions() -> Result<(), ValidationError> {
    // Tags go between the measurement and the first space, fields after it.
    let point = Point::new("cpu", [("host", "a b")], [("value", 42)], "100")?;

    assert_eq!(point.to_line_protocol(), "cpu,host=a\\ b value=42 100");
    Ok(())
}

#[test]
fn test_point_without_tags() -> Result<(), ValidationError> {
    let point = Point::new("readings", no_pairs(), [("incline", 125)], "1577836800000")?;

    assert_eq!(point.to_line_protocol(), "readings incline=125 1577836800000");
    Ok(())
}

#[test]
fn test_point_multiple_tags_and_fields_keep_order() -> Result<(), ValidationError> {
    let point = Point::new(
        "readings",
        vec![("zone", "b"), ("fleet", "a")],
        vec![
            ("velocity", FieldValue::from(12.5)),
            ("load", FieldValue::from(-3)),
            ("driver", FieldValue::from("Seth")),
        ],
        "1577836800000",
    )?;

    assert_eq!(
        point.to_line_protocol(),
        "readings,zone=b,fleet=a velocity=12.5,load=-3,driver=Seth 1577836800000"
    );
    Ok(())
}

#[test]
fn test_point_display_matches_line_protocol() -> Result<(), ValidationError> {
    let point = Point::new("cpu", [("host", "a")], [("value", 1.5)], "7")?;

    assert_eq!(point.to_string(), point.to_line_protocol());
    Ok(())
}

#[test]
fn test_point_escapes_keys_measurement_and_string_values() -> Result<(), ValidationError> {
    let point = Point::new(
        "my measurement",
        [("tag,key", "v=1")],
        [("field key", "say \"hi\"\\")],
        "1",
    )?;

    assert_eq!(
        point.to_line_protocol(),
        "my\\ measurement,tag\\,key=v\\=1 field\\ key=say\\ \\\"hi\\\"\\\\ 1"
    );
    Ok(())
}

#[test]
fn test_point_numeric_values_are_not_escaped() -> Result<(), ValidationError> {
    let point = Point::new(
        "m",
        [("id", 7u64)],
        vec![
            ("small", FieldValue::Number(Number::F64(-0.25))),
            ("big", FieldValue::Number(Number::U64(u64::MAX))),
        ],
        "1e3",
    )?;

    assert_eq!(
        point.to_line_protocol(),
        "m,id=7 small=-0.25,big=18446744073709551615 1e3"
    );
    Ok(())
}

#[test]
fn test_point_empty_fields() {
    let result = Point::new("cpu", [("host", "a")], no_pairs(), "100");

    assert_eq!(result, Err(ValidationError::EmptyFields));
}

#[test]
fn test_point_empty_fields_reported_before_timestamp() {
    let result = Point::new("cpu", no_pairs(), no_pairs(), "abc");

    assert_eq!(result, Err(ValidationError::EmptyFields));
}

#[test]
fn test_point_non_numeric_timestamps() {
    for timestamp in ["abc", "", "1.2.3", " ", "inf", "NaN", "0x1A", "12abc", "e5"] {
        let result = Point::new("cpu", no_pairs(), [("value", 1)], timestamp);

        assert_eq!(
            result,
            Err(ValidationError::NonNumericTimestamp(timestamp.to_string())),
            "timestamp {:?} should be rejected",
            timestamp
        );
    }
}

#[test]
fn test_point_numeric_timestamps() {
    for timestamp in ["123", "-4.5", "1e3", "+7", ".5", "1577836800000", " 42 "] {
        let point = Point::new("cpu", no_pairs(), [("value", 1)], timestamp)
            .expect("numeric timestamp should be accepted");

        assert_eq!(point.timestamp(), timestamp);
    }
}

#[test]
fn test_point_accessors_return_inputs_unchanged() -> Result<(), ValidationError> {
    let point = Point::new("cpu", [("host", "a b")], [("value", 42)], "100")?;

    assert_eq!(point.measurement(), "cpu");
    assert_eq!(
        point.tags(),
        &[("host".to_string(), FieldValue::String("a b".to_string()))]
    );
    assert_eq!(
        point.fields(),
        &[("value".to_string(), FieldValue::Number(Number::I64(42)))]
    );
    assert_eq!(point.timestamp(), "100");
    Ok(())
}

#[test]
fn test_escape_reserved_characters() {
    assert_eq!(escape("a,b"), "a\\,b");
    assert_eq!(escape("a=b"), "a\\=b");
    assert_eq!(escape("a b"), "a\\ b");
    assert_eq!(escape("a\"b"), "a\\\"b");
    assert_eq!(escape("a\\b"), "a\\\\b");
    assert_eq!(escape("plain-text_1.0"), "plain-text_1.0");
    assert_eq!(escape("ünïcode"), "ünïcode");
    assert_eq!(escape(""), "");
}

#[test]
fn test_is_numeric() {
    assert!(is_numeric("0"));
    assert!(is_numeric("-1E-3"));
    assert!(!is_numeric("-"));
    assert!(!is_numeric("1,5"));
    assert!(is_numeric("\x0B1"));
    assert!(is_numeric("\t12\x0C"));
    assert!(!is_numeric("\u{A0}1"));
}

#[test]
fn test_non_finite_floats_encode_verbatim() {
    assert_eq!(FieldValue::from(f64::NAN).to_line_protocol(), "NaN");
    assert_eq!(FieldValue::from(f64::INFINITY).to_line_protocol(), "inf");
    assert_eq!(FieldValue::from(2.5f32).to_line_protocol(), "2.5");
}

#[test]
fn test_encoded_point_parses_as_line_protocol() -> Result<(), ValidationError> {
    // A numeric-only point round-trips through an independent line protocol parser.
    let point = Point::new(
        "readings",
        vec![("fleet", "Fleet 1"), ("driver", "Seth")],
        vec![("incline", 125), ("load", -4)],
        "1577836800000",
    )?;
    let line = point.to_line_protocol();

    let parsed_lines: Vec<_> = parse_lines(&line).collect();
    assert_eq!(parsed_lines.len(), 1);
    let parsed_line = parsed_lines
        .into_iter()
        .next()
        .expect("Failed to unwrap")
        .expect("Failed to parse line protocol");

    assert_eq!(parsed_line.series.measurement.to_string(), "readings");
    let tags: Vec<(String, String)> = parsed_line
        .series
        .tag_set
        .as_ref()
        .expect("Failed to unwrap tag set")
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    assert_eq!(
        tags,
        vec![
            ("fleet".to_string(), "Fleet 1".to_string()),
            ("driver".to_string(), "Seth".to_string())
        ]
    );
    let fields: Vec<(String, f64)> = parsed_line
        .field_set
        .iter()
        .map(|(key, value)| match value {
            influxdb_line_protocol::FieldValue::F64(float_value) => {
                (key.to_string(), *float_value)
            }
            other => panic!("Unexpected field value {:?}", other),
        })
        .collect();
    assert_eq!(
        fields,
        vec![("incline".to_string(), 125.0), ("load".to_string(), -4.0)]
    );
    assert_eq!(parsed_line.timestamp, Some(1577836800000));
    Ok(())
}
