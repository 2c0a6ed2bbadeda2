// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod account;
mod anomaly;
mod catalog;
mod error;
mod reading;
mod validation;

#[cfg(test)]
mod tests;

pub use account::{AccountState, AccountStatus, Role};
pub use anomaly::{
    AnalysisParams, AnalysisWindow, Anomaly, DEFAULT_COMPARISON_OFFSET, DEFAULT_THRESHOLD_PERCENT,
    DEFAULT_TIME_RANGE_DAYS, detect_anomalies,
};
pub use catalog::{
    EQUIPMENT, Equipment, MeasurementKind, PARAMETERS, Parameter, UNITS, Unit, UnitInfo,
    find_equipment, find_parameter,
};
pub use error::DomainError;
pub use reading::{NOTES_MAX_LEN, Reading, document_id, format_date, parse_date};
pub use validation::{
    RawParameterValue, ReadingSubmission, ValidatedReading, decimal_places, validate_email,
    validate_name, validate_parameters, validate_reading_submission,
};
