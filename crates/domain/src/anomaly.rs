// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Anomaly detection over a window of vibration readings.
//!
//! Readings are grouped by `(unit, equipment)`. Within each group the most
//! recent reading is compared against an earlier one, and every parameter
//! whose percentage increase meets the threshold is reported.

use crate::catalog::{Unit, find_equipment, find_parameter};
use crate::error::DomainError;
use crate::reading::{Reading, format_date};
use serde::Serialize;
use std::collections::BTreeMap;
use time::{Date, Duration};

/// Default percentage increase that counts as an anomaly.
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 20.0;

/// Default analysis window, in days.
pub const DEFAULT_TIME_RANGE_DAYS: i64 = 7;

/// Default comparison offset within a group.
pub const DEFAULT_COMPARISON_OFFSET: i64 = 1;

/// Tuning parameters for an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisParams {
    /// Minimum percentage increase to report. `NaN` reports nothing.
    pub threshold: f64,
    /// Number of days before today included in the window.
    #[serde(rename = "timeRange")]
    pub time_range_days: i64,
    /// Index of the comparison reading in a date-descending group.
    #[serde(rename = "comparisonDays")]
    pub comparison_offset: i64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD_PERCENT,
            time_range_days: DEFAULT_TIME_RANGE_DAYS,
            comparison_offset: DEFAULT_COMPARISON_OFFSET,
        }
    }
}

const SECONDS_PER_DAY: i64 = 86_400;

/// An inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisWindow {
    pub start: Date,
    pub end: Date,
}

impl AnalysisWindow {
    /// Builds the window `[today - days, today]`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DateArithmeticOverflow`] if the start date is
    /// not representable.
    pub fn ending(today: Date, days: i64) -> Result<Self, DomainError> {
        let start: Date = days
            .checked_mul(SECONDS_PER_DAY)
            .map(Duration::seconds)
            .and_then(|span| today.checked_sub(span))
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("computing a {days}-day analysis window"),
            })?;
        Ok(Self { start, end: today })
    }
}

/// A parameter whose value rose by at least the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub unit: Unit,
    pub equipment: String,
    pub equipment_name: String,
    pub parameter: String,
    pub parameter_name: String,
    pub current_value: f64,
    pub previous_value: f64,
    /// Percentage increase rounded to 2 decimals.
    pub increase_percentage: f64,
    /// Absolute increase rounded to 2 decimals.
    pub increase_amount: f64,
    pub latest_date: String,
    pub comparison_date: String,
}

/// Rounds to 2 decimals with ties going toward positive infinity.
fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Detects anomalies across `readings`.
///
/// The caller supplies the readings of the analysis window. Groups with
/// fewer than two readings are ignored. The comparison reading is the one
/// at `comparison_offset` in the date-descending group, or the oldest one
/// when the offset is out of range. Parameters whose latest value is zero,
/// or whose comparison value is missing or zero, are skipped.
///
/// Groups are visited in `(unit, equipment)` order and parameters in id
/// order, and the result is sorted descending by percentage increase, so
/// the output is deterministic for a given input.
#[must_use]
pub fn detect_anomalies(readings: &[Reading], params: &AnalysisParams) -> Vec<Anomaly> {
    let mut groups: BTreeMap<(Unit, &str), Vec<&Reading>> = BTreeMap::new();
    for reading in readings {
        groups
            .entry((reading.unit, reading.equipment.as_str()))
            .or_default()
            .push(reading);
    }

    let mut anomalies: Vec<Anomaly> = Vec::new();

    for ((unit, equipment), mut group) in groups {
        if group.len() < 2 {
            continue;
        }

        group.sort_by(|a, b| b.date.cmp(&a.date));

        let latest: &Reading = group[0];
        let comparison: &Reading = usize::try_from(params.comparison_offset)
            .ok()
            .and_then(|index| group.get(index))
            .or_else(|| group.last())
            .copied()
            .unwrap_or(latest);

        for (parameter_id, &current) in &latest.parameters {
            if current == 0.0 {
                continue;
            }
            let Some(&previous) = comparison.parameters.get(parameter_id) else {
                continue;
            };
            if previous == 0.0 {
                continue;
            }

            let pct: f64 = (current - previous) / previous * 100.0;
            if pct < params.threshold || pct.is_nan() || params.threshold.is_nan() {
                continue;
            }

            anomalies.push(Anomaly {
                unit,
                equipment: equipment.to_string(),
                equipment_name: find_equipment(equipment)
                    .map_or_else(|| equipment.to_string(), |e| e.name.to_string()),
                parameter: parameter_id.clone(),
                parameter_name: find_parameter(parameter_id)
                    .map_or_else(|| parameter_id.clone(), |p| p.name.to_string()),
                current_value: current,
                previous_value: previous,
                increase_percentage: round2(pct),
                increase_amount: round2(current - previous),
                latest_date: format_date(latest.date),
                comparison_date: format_date(comparison.date),
            });
        }
    }

    anomalies.sort_by(|a, b| b.increase_percentage.total_cmp(&a.increase_percentage));
    anomalies
}
