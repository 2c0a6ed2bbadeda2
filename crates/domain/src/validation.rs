// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::catalog::{Equipment, Unit, find_equipment, find_parameter};
use crate::error::DomainError;
use crate::reading::{NOTES_MAX_LEN, parse_date};
use serde::Deserialize;
use std::collections::BTreeMap;
use time::Date;

/// Maximum number of decimal places accepted for a parameter value.
const MAX_DECIMAL_PLACES: usize = 2;

const NAME_MIN_LEN: usize = 2;
const NAME_MAX_LEN: usize = 50;

/// A parameter value as submitted by a client.
///
/// Clients send either JSON numbers or numeric strings. Anything else is
/// kept so it can be reported as non-numeric instead of failing the whole
/// request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawParameterValue {
    /// A JSON number.
    Number(f64),
    /// A string that may hold a number.
    Text(String),
    /// Any other JSON value.
    Other(serde::de::IgnoredAny),
}

impl RawParameterValue {
    /// Interprets the raw value as a finite number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
            Self::Other(_) => None,
        }
        .filter(|value| value.is_finite())
    }
}

/// An unvalidated reading as received from a client.
///
/// `parameters` is `None` when the client did not send a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingSubmission {
    pub unit: Option<String>,
    pub equipment: Option<String>,
    pub date: Option<String>,
    pub parameters: Option<BTreeMap<String, RawParameterValue>>,
    pub notes: Option<String>,
}

/// A reading submission that passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedReading {
    pub unit: Unit,
    pub equipment: &'static Equipment,
    pub date: Date,
    pub parameters: BTreeMap<String, f64>,
    /// Trimmed notes.
    pub notes: String,
}

/// Counts the decimal places in the shortest representation of `value`.
///
/// `20.00` is represented as `20` and so has zero decimal places.
#[must_use]
pub fn decimal_places(value: f64) -> usize {
    let text = format!("{value}");
    text.split_once('.').map_or(0, |(_, fraction)| fraction.len())
}

/// Validates a batch of parameter values against the parameter catalog.
///
/// Every entry is checked independently and all violations are returned
/// together. For a single entry the checks run in order (known id,
/// numeric, non-negative, within maximum, decimal places) and stop at the
/// first one that fails.
///
/// # Returns
///
/// An empty vector if every value is acceptable.
#[must_use]
pub fn validate_parameters(parameters: &BTreeMap<String, RawParameterValue>) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();

    for (id, raw) in parameters {
        let Some(parameter) = find_parameter(id) else {
            errors.push(format!("Invalid parameter: {id}"));
            continue;
        };

        let Some(value) = raw.as_number() else {
            errors.push(format!("Value for {} must be a number", parameter.name));
            continue;
        };

        if value < 0.0 {
            errors.push(format!("Value for {} cannot be negative", parameter.name));
            continue;
        }

        if value > parameter.max_value {
            errors.push(format!(
                "Value for {} cannot exceed {}",
                parameter.name, parameter.max_value
            ));
            continue;
        }

        if decimal_places(value) > MAX_DECIMAL_PLACES {
            errors.push(format!(
                "{} allows at most {MAX_DECIMAL_PLACES} decimal places",
                parameter.name
            ));
        }
    }

    errors
}

/// Validates a complete reading submission.
///
/// # Errors
///
/// Returns every violation found across unit, equipment, date, notes and
/// parameters.
pub fn validate_reading_submission(
    submission: &ReadingSubmission,
) -> Result<ValidatedReading, Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    let unit: Option<Unit> = match submission.unit.as_deref() {
        Some(value) => value.parse::<Unit>().map_err(|e| errors.push(e.to_string())).ok(),
        None => {
            errors.push(String::from("Unit is required"));
            None
        }
    };

    let equipment: Option<&'static Equipment> = match submission.equipment.as_deref() {
        Some(value) if !value.trim().is_empty() => {
            let found = find_equipment(value);
            if found.is_none() {
                errors.push(DomainError::UnknownEquipment(value.to_string()).to_string());
            }
            found
        }
        _ => {
            errors.push(String::from("Equipment is required"));
            None
        }
    };

    let date: Option<Date> = match submission.date.as_deref() {
        Some(value) => parse_date(value).map_err(|e| errors.push(e.to_string())).ok(),
        None => {
            errors.push(String::from("Date is required"));
            None
        }
    };

    let notes: String = submission
        .notes
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if notes.chars().count() > NOTES_MAX_LEN {
        errors.push(DomainError::NotesTooLong { max: NOTES_MAX_LEN }.to_string());
    }

    let parameters: Option<BTreeMap<String, f64>> = match &submission.parameters {
        Some(raw) => {
            let parameter_errors = validate_parameters(raw);
            if parameter_errors.is_empty() {
                Some(
                    raw.iter()
                        .filter_map(|(id, value)| value.as_number().map(|v| (id.clone(), v)))
                        .collect(),
                )
            } else {
                errors.extend(parameter_errors);
                None
            }
        }
        None => {
            errors.push(String::from("Parameters must be an object"));
            None
        }
    };

    match (unit, equipment, date, parameters) {
        (Some(unit), Some(equipment), Some(date), Some(parameters)) if errors.is_empty() => {
            Ok(ValidatedReading {
                unit,
                equipment,
                date,
                parameters,
                notes,
            })
        }
        _ => Err(errors),
    }
}

/// Validates an email address and returns it lowercased.
///
/// The address must have the shape `local@domain.tld` with no whitespace.
///
/// # Errors
///
/// Returns [`DomainError::InvalidEmail`] if the address is malformed.
pub fn validate_email(email: &str) -> Result<String, DomainError> {
    let candidate: &str = email.trim();
    let invalid = || DomainError::InvalidEmail(candidate.to_string());

    if candidate.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = candidate.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let has_inner_dot: bool = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());
    if !has_inner_dot {
        return Err(invalid());
    }

    Ok(candidate.to_lowercase())
}

/// Validates a display name and returns it trimmed.
///
/// # Errors
///
/// Returns [`DomainError::InvalidName`] unless the trimmed name is between
/// 2 and 50 characters.
pub fn validate_name(name: &str) -> Result<String, DomainError> {
    let trimmed: &str = name.trim();
    let len: usize = trimmed.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Err(DomainError::InvalidName(format!(
            "Name must be between {NAME_MIN_LEN} and {NAME_MAX_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}
