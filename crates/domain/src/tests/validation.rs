// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    NOTES_MAX_LEN, RawParameterValue, ReadingSubmission, Unit, decimal_places, validate_email,
    validate_name, validate_parameters, validate_reading_submission,
};
use std::collections::BTreeMap;

fn params(entries: &[(&str, RawParameterValue)]) -> BTreeMap<String, RawParameterValue> {
    entries
        .iter()
        .map(|(id, value)| ((*id).to_string(), value.clone()))
        .collect()
}

fn number(value: f64) -> RawParameterValue {
    RawParameterValue::Number(value)
}

fn text(value: &str) -> RawParameterValue {
    RawParameterValue::Text(value.to_string())
}

fn create_test_submission() -> ReadingSubmission {
    ReadingSubmission {
        unit: Some(String::from("DRI1")),
        equipment: Some(String::from("GB-cp48A")),
        date: Some(String::from("2026-03-02")),
        parameters: Some(params(&[("V1", number(4.25)), ("GV1", text("0.5"))])),
        notes: Some(String::from("  bearing noise  ")),
    }
}

#[test]
fn test_decimal_places() {
    assert_eq!(decimal_places(20.0), 0);
    assert_eq!(decimal_places(1.5), 1);
    assert_eq!(decimal_places(1.25), 2);
    assert_eq!(decimal_places(20.001), 3);
}

#[test]
fn test_validate_parameters_accepts_values_within_limits() {
    let errors = validate_parameters(&params(&[
        ("V1", number(20.0)),
        ("H1", text("19.99")),
        ("GA2", number(0.0)),
        ("GV1", number(2.0)),
    ]));
    assert!(errors.is_empty(), "{errors:?}");
}

#[test]
fn test_validate_parameters_rejects_three_decimals_at_max() {
    let errors = validate_parameters(&params(&[("V1", number(20.001))]));
    assert_eq!(errors.len(), 1);

    let errors = validate_parameters(&params(&[("V1", text("20.00"))]));
    assert!(errors.is_empty());
}

#[test]
fn test_validate_parameters_reports_every_bad_entry() {
    let errors = validate_parameters(&params(&[
        ("X9", number(1.0)),
        ("V1", text("abc")),
        ("H1", number(-0.5)),
        ("GV1", number(2.5)),
        ("A1", number(1.234)),
        ("A2", number(3.0)),
    ]));

    assert_eq!(errors.len(), 5, "{errors:?}");
    assert!(errors.contains(&String::from("Invalid parameter: X9")));
    assert!(errors.iter().any(|e| e.contains("must be a number")));
    assert!(errors.iter().any(|e| e.contains("cannot be negative")));
    assert!(errors.iter().any(|e| e.contains("cannot exceed 2")));
    assert!(errors.iter().any(|e| e.contains("decimal places")));
}

#[test]
fn test_validate_parameters_stops_at_first_violation_per_entry() {
    // Negative and too many decimals; only the first check is reported.
    let errors = validate_parameters(&params(&[("V1", number(-1.234))]));
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("cannot be negative"));
}

#[test]
fn test_non_finite_text_is_not_numeric() {
    assert_eq!(text("NaN").as_number(), None);
    assert_eq!(text("inf").as_number(), None);
    assert_eq!(text(" 3.5 ").as_number(), Some(3.5));
}

#[test]
fn test_validate_reading_submission_accepts_valid_submission() {
    let validated = validate_reading_submission(&create_test_submission()).unwrap();

    assert_eq!(validated.unit, Unit::Dri1);
    assert_eq!(validated.equipment.id, "GB-cp48A");
    assert_eq!(validated.notes, "bearing noise");
    assert_eq!(validated.parameters.get("GV1"), Some(&0.5));
    assert_eq!(validated.parameters.len(), 2);
}

#[test]
fn test_validate_reading_submission_collects_all_errors() {
    let submission = ReadingSubmission {
        unit: Some(String::from("DRI3")),
        equipment: Some(String::from("GB-cp99")),
        date: Some(String::from("2026-13-45")),
        parameters: Some(params(&[("V1", number(25.0))])),
        notes: Some("x".repeat(NOTES_MAX_LEN + 1)),
    };

    let errors = validate_reading_submission(&submission).unwrap_err();
    assert_eq!(errors.len(), 5, "{errors:?}");
}

#[test]
fn test_validate_reading_submission_requires_fields() {
    let errors = validate_reading_submission(&ReadingSubmission::default()).unwrap_err();
    assert!(errors.contains(&String::from("Unit is required")));
    assert!(errors.contains(&String::from("Equipment is required")));
    assert!(errors.contains(&String::from("Date is required")));
    assert!(errors.contains(&String::from("Parameters must be an object")));
}

#[test]
fn test_notes_at_limit_are_accepted() {
    let mut submission = create_test_submission();
    submission.notes = Some("n".repeat(NOTES_MAX_LEN));
    assert!(validate_reading_submission(&submission).is_ok());
}

#[test]
fn test_validate_email() {
    assert_eq!(
        validate_email("Jane.Doe@Plant.example").unwrap(),
        "jane.doe@plant.example"
    );
    assert!(validate_email("no-at-sign.example").is_err());
    assert!(validate_email("a@b").is_err());
    assert!(validate_email("a@.com").is_err());
    assert!(validate_email("a b@c.com").is_err());
    assert!(validate_email("a@b@c.com").is_err());
}

#[test]
fn test_validate_name() {
    assert_eq!(validate_name("  Ali Rezaei ").unwrap(), "Ali Rezaei");
    assert!(validate_name(" A ").is_err());
    assert!(validate_name(&"a".repeat(51)).is_err());
    assert!(validate_name(&"a".repeat(50)).is_ok());
}
