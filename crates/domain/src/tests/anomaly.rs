// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AnalysisParams, AnalysisWindow, DomainError, Reading, Unit, detect_anomalies, parse_date};
use std::collections::BTreeMap;

fn create_test_reading(unit: Unit, equipment: &str, date: &str, values: &[(&str, f64)]) -> Reading {
    Reading {
        unit,
        equipment: equipment.to_string(),
        date: parse_date(date).unwrap(),
        parameters: values
            .iter()
            .map(|(id, value)| ((*id).to_string(), *value))
            .collect::<BTreeMap<String, f64>>(),
        notes: String::new(),
        created_by: 1,
        created_by_name: String::from("Test Operator"),
        recorded_at: format!("{date}T08:00:00Z"),
    }
}

fn params(threshold: f64, comparison_offset: i64) -> AnalysisParams {
    AnalysisParams {
        threshold,
        comparison_offset,
        ..AnalysisParams::default()
    }
}

#[test]
fn test_default_params() {
    let defaults = AnalysisParams::default();
    assert!((defaults.threshold - 20.0).abs() < f64::EPSILON);
    assert_eq!(defaults.time_range_days, 7);
    assert_eq!(defaults.comparison_offset, 1);
}

#[test]
fn test_fifty_percent_increase_is_reported() {
    let readings = vec![
        create_test_reading(Unit::Dri1, "GB-cp48A", "2026-03-01", &[("V1", 10.0)]),
        create_test_reading(Unit::Dri1, "GB-cp48A", "2026-03-02", &[("V1", 15.0)]),
    ];

    let anomalies = detect_anomalies(&readings, &params(20.0, 1));

    assert_eq!(anomalies.len(), 1);
    let anomaly = &anomalies[0];
    assert_eq!(anomaly.unit, Unit::Dri1);
    assert_eq!(anomaly.equipment, "GB-cp48A");
    assert_eq!(anomaly.equipment_name, "Compressor 48A Gearbox");
    assert_eq!(anomaly.parameter, "V1");
    assert!((anomaly.increase_percentage - 50.0).abs() < 1e-9);
    assert!((anomaly.increase_amount - 5.0).abs() < 1e-9);
    assert!((anomaly.current_value - 15.0).abs() < 1e-9);
    assert!((anomaly.previous_value - 10.0).abs() < 1e-9);
    assert_eq!(anomaly.latest_date, "2026-03-02");
    assert_eq!(anomaly.comparison_date, "2026-03-01");
}

#[test]
fn test_increase_below_threshold_is_ignored() {
    let readings = vec![
        create_test_reading(Unit::Dri1, "GB-cp48A", "2026-03-01", &[("V1", 10.0)]),
        create_test_reading(Unit::Dri1, "GB-cp48A", "2026-03-02", &[("V1", 11.0)]),
    ];
    assert!(detect_anomalies(&readings, &params(20.0, 1)).is_empty());
}

#[test]
fn test_increase_equal_to_threshold_is_reported() {
    let readings = vec![
        create_test_reading(Unit::Dri2, "FN-fnMAB", "2026-03-01", &[("H2", 4.0)]),
        create_test_reading(Unit::Dri2, "FN-fnMAB", "2026-03-02", &[("H2", 5.0)]),
    ];
    assert_eq!(detect_anomalies(&readings, &params(25.0, 1)).len(), 1);
}

#[test]
fn test_zero_or_missing_comparison_is_skipped() {
    let readings = vec![
        create_test_reading(
            Unit::Dri1,
            "CP-cp51",
            "2026-03-01",
            &[("V1", 0.0), ("H1", 1.0)],
        ),
        create_test_reading(
            Unit::Dri1,
            "CP-cp51",
            "2026-03-02",
            &[("V1", 9.0), ("A1", 9.0), ("H1", 0.0)],
        ),
    ];
    assert!(detect_anomalies(&readings, &params(0.0, 1)).is_empty());
}

#[test]
fn test_single_reading_group_is_ignored() {
    let readings = vec![create_test_reading(
        Unit::Dri1,
        "GB-cp48A",
        "2026-03-02",
        &[("V1", 15.0)],
    )];
    assert!(detect_anomalies(&readings, &params(0.0, 1)).is_empty());
}

#[test]
fn test_two_samples_compare_against_older() {
    // Supplied newest first to show that input order does not matter.
    let readings = vec![
        create_test_reading(Unit::Dri1, "GB-cp71", "2026-03-05", &[("V1", 12.0)]),
        create_test_reading(Unit::Dri1, "GB-cp71", "2026-03-01", &[("V1", 6.0)]),
    ];
    let anomalies = detect_anomalies(&readings, &params(20.0, 1));
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].comparison_date, "2026-03-01");
}

#[test]
fn test_offset_beyond_group_falls_back_to_oldest() {
    let readings: Vec<Reading> = (1..=5)
        .map(|day| {
            create_test_reading(
                Unit::Dri1,
                "CP-cpSGC",
                &format!("2026-03-0{day}"),
                &[("V1", f64::from(day))],
            )
        })
        .collect();

    let anomalies = detect_anomalies(&readings, &params(20.0, 10));

    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].comparison_date, "2026-03-01");
    assert!((anomalies[0].increase_percentage - 400.0).abs() < 1e-9);
}

#[test]
fn test_offset_selects_indexed_reading() {
    let readings: Vec<Reading> = (1..=5)
        .map(|day| {
            create_test_reading(
                Unit::Dri1,
                "CP-cpSGC",
                &format!("2026-03-0{day}"),
                &[("V1", f64::from(day))],
            )
        })
        .collect();

    let anomalies = detect_anomalies(&readings, &params(20.0, 2));
    assert_eq!(anomalies[0].comparison_date, "2026-03-03");
}

#[test]
fn test_negative_offset_falls_back_to_oldest() {
    let readings = vec![
        create_test_reading(Unit::Dri1, "GB-cp51", "2026-03-01", &[("V1", 2.0)]),
        create_test_reading(Unit::Dri1, "GB-cp51", "2026-03-02", &[("V1", 3.0)]),
        create_test_reading(Unit::Dri1, "GB-cp51", "2026-03-03", &[("V1", 4.0)]),
    ];
    let anomalies = detect_anomalies(&readings, &params(20.0, -1));
    assert_eq!(anomalies[0].comparison_date, "2026-03-01");
}

#[test]
fn test_nan_threshold_reports_nothing() {
    let readings = vec![
        create_test_reading(Unit::Dri1, "GB-cp48A", "2026-03-01", &[("V1", 1.0)]),
        create_test_reading(Unit::Dri1, "GB-cp48A", "2026-03-02", &[("V1", 19.0)]),
    ];
    assert!(detect_anomalies(&readings, &params(f64::NAN, 1)).is_empty());
}

#[test]
fn test_anomalies_sorted_descending_and_unique() {
    let readings = vec![
        create_test_reading(
            Unit::Dri1,
            "GB-cp48A",
            "2026-03-01",
            &[("V1", 10.0), ("H1", 10.0)],
        ),
        create_test_reading(
            Unit::Dri1,
            "GB-cp48A",
            "2026-03-02",
            &[("V1", 13.0), ("H1", 19.0)],
        ),
        create_test_reading(Unit::Dri2, "FN-fnAUX", "2026-03-01", &[("GV1", 0.5)]),
        create_test_reading(Unit::Dri2, "FN-fnAUX", "2026-03-02", &[("GV1", 1.0)]),
    ];

    let anomalies = detect_anomalies(&readings, &params(20.0, 1));

    let pcts: Vec<f64> = anomalies.iter().map(|a| a.increase_percentage).collect();
    assert_eq!(pcts.len(), 3);
    assert!(pcts.windows(2).all(|pair| pair[0] >= pair[1]));
    assert_eq!(anomalies[0].parameter, "GV1");
    assert_eq!(anomalies[1].parameter, "H1");
    assert_eq!(anomalies[2].parameter, "V1");
}

#[test]
fn test_analysis_window_spans_requested_days() {
    let today = parse_date("2026-03-10").unwrap();
    let window = AnalysisWindow::ending(today, 7).unwrap();

    assert_eq!(window.start, parse_date("2026-03-03").unwrap());
    assert_eq!(window.end, today);
}

#[test]
fn test_analysis_window_rejects_unrepresentable_range() {
    let today = parse_date("2026-10-17").unwrap();

    for days in [9_999_999_999_999_999, i64::MAX, i64::MIN, 10_000_000] {
        let result = AnalysisWindow::ending(today, days);
        assert!(
            matches!(result, Err(DomainError::DateArithmeticOverflow { .. })),
            "expected overflow for {days} days"
        );
    }
}
