// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Stored timestamps.
//!
//! Every timestamp column holds UTC time in the fixed-width form
//! `YYYY-MM-DDTHH:MM:SSZ`, so lexical order matches chronological order
//! and date-prefix comparisons select whole days.

use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::error::PersistenceError;

/// Formats a point in time for storage.
#[must_use]
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let utc: OffsetDateTime = at.to_offset(time::UtcOffset::UTC);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        utc.year(),
        u8::from(utc.month()),
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second()
    )
}

/// Returns the current time formatted for storage.
#[must_use]
pub fn now_timestamp() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns [`PersistenceError::CorruptRecord`] if the value is not in the
/// stored form.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
    PrimitiveDateTime::parse(value, &format)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| PersistenceError::CorruptRecord(format!("timestamp '{value}': {e}")))
}

/// Returns the first stored timestamp of `date`.
pub(crate) fn start_of_day(date: Date) -> String {
    format_timestamp(date.midnight().assume_utc())
}

/// Returns the last stored timestamp of `date`.
pub(crate) fn end_of_day(date: Date) -> String {
    format!("{}T23:59:59Z", vibemon_domain::format_date(date))
}
