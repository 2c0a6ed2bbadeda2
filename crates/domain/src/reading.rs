// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::catalog::Unit;
use crate::error::DomainError;
use serde::Serialize;
use std::collections::BTreeMap;
use time::Date;
use time::macros::format_description;

/// Maximum length of a reading's free-form notes, in characters.
pub const NOTES_MAX_LEN: usize = 500;

/// One day's vibration measurements for a piece of equipment.
///
/// The natural key is `(unit, equipment, date)`. Saving a reading with an
/// existing key replaces the previous revision.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// The unit the equipment belongs to.
    pub unit: Unit,
    /// Equipment catalog identifier.
    pub equipment: String,
    /// The calendar day the measurements were taken.
    #[serde(serialize_with = "serialize_date")]
    pub date: Date,
    /// Parameter identifier to measured value.
    pub parameters: BTreeMap<String, f64>,
    /// Free-form operator notes.
    pub notes: String,
    /// The user who recorded the reading.
    pub created_by: i64,
    /// Display name of the recording user at save time.
    pub created_by_name: String,
    /// RFC 3339 timestamp of the last save.
    pub recorded_at: String,
}

impl Reading {
    /// Returns the document identifier derived from the natural key.
    #[must_use]
    pub fn document_id(&self) -> String {
        document_id(self.unit, &self.equipment, self.date)
    }
}

/// Builds the document identifier `data_{unit}_{equipment}_{date}`.
#[must_use]
pub fn document_id(unit: Unit, equipment: &str, date: Date) -> String {
    format!("data_{unit}_{equipment}_{}", format_date(date))
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    let format = format_description!("[year]-[month]-[day]");
    date.format(&format).unwrap_or_else(|_| date.to_string())
}

/// Parses a `YYYY-MM-DD` date string.
///
/// # Errors
///
/// Returns [`DomainError::InvalidDate`] if the string is not a valid
/// calendar date in that format.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value, &format).map_err(|e| DomainError::InvalidDate {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

fn serialize_date<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format_date(*date))
}
