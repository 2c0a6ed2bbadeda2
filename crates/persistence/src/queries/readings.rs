// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vibration reading queries.
//!
//! Reading dates are stored as `YYYY-MM-DD` text, so date ranges are
//! plain string comparisons.

use diesel::dsl::count_distinct;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use std::collections::BTreeMap;
use time::Date;
use tracing::debug;
use vibemon_domain::{Reading, Unit, format_date, parse_date};

use crate::data_models::{Page, Pagination, ReadingFilter, ReadingStats};
use crate::diesel_schema::readings;
use crate::error::PersistenceError;

/// Diesel Queryable struct for reading rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = readings)]
pub(crate) struct ReadingRow {
    reading_id: String,
    unit: String,
    equipment: String,
    reading_date: String,
    parameters_json: String,
    notes: String,
    created_by: i64,
    created_by_name: String,
    recorded_at: String,
}

impl TryFrom<ReadingRow> for Reading {
    type Error = PersistenceError;

    fn try_from(row: ReadingRow) -> Result<Self, Self::Error> {
        let corrupt =
            |what: String| PersistenceError::CorruptRecord(format!("reading {}: {what}", row.reading_id));

        let unit: Unit = row.unit.parse().map_err(|e| corrupt(format!("{e}")))?;
        let date: Date = parse_date(&row.reading_date).map_err(|e| corrupt(format!("{e}")))?;
        let parameters: BTreeMap<String, f64> = serde_json::from_str(&row.parameters_json)?;

        Ok(Self {
            unit,
            equipment: row.equipment,
            date,
            parameters,
            notes: row.notes,
            created_by: row.created_by,
            created_by_name: row.created_by_name,
            recorded_at: row.recorded_at,
        })
    }
}

fn into_readings(rows: Vec<ReadingRow>) -> Result<Vec<Reading>, PersistenceError> {
    rows.into_iter().map(Reading::try_from).collect()
}

fn filtered_readings(filter: &ReadingFilter) -> readings::BoxedQuery<'static, Sqlite> {
    let mut query = readings::table.into_boxed();

    if let Some(unit) = filter.unit {
        query = query.filter(readings::unit.eq(unit.as_str()));
    }
    if let Some(equipment) = &filter.equipment {
        query = query.filter(readings::equipment.eq(equipment.clone()));
    }
    if let Some(date) = filter.date {
        query = query.filter(readings::reading_date.eq(format_date(date)));
    }
    if let Some(from) = filter.date_from {
        query = query.filter(readings::reading_date.ge(format_date(from)));
    }
    if let Some(to) = filter.date_to {
        query = query.filter(readings::reading_date.le(format_date(to)));
    }

    query
}

/// Retrieves a reading by document id.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored row cannot
/// be decoded.
pub fn get_reading(
    conn: &mut SqliteConnection,
    reading_id: &str,
) -> Result<Option<Reading>, PersistenceError> {
    debug!("Looking up reading: {}", reading_id);

    readings::table
        .filter(readings::reading_id.eq(reading_id))
        .select(ReadingRow::as_select())
        .first(conn)
        .optional()?
        .map(Reading::try_from)
        .transpose()
}

/// Lists readings matching `filter`, most recently saved first.
///
/// Every filter, including the date range, is applied before pagination,
/// so `total` counts all matching readings.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_readings(
    conn: &mut SqliteConnection,
    filter: &ReadingFilter,
    pagination: Pagination,
) -> Result<Page<Reading>, PersistenceError> {
    let total: i64 = filtered_readings(filter).count().get_result(conn)?;

    let rows: Vec<ReadingRow> = filtered_readings(filter)
        .order((readings::recorded_at.desc(), readings::reading_id.asc()))
        .limit(pagination.limit)
        .offset(pagination.offset())
        .select(ReadingRow::as_select())
        .load(conn)?;

    Ok(Page {
        items: into_readings(rows)?,
        total,
    })
}

/// Loads every reading dated within `[start, end]`, newest date first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn readings_in_window(
    conn: &mut SqliteConnection,
    start: Date,
    end: Date,
) -> Result<Vec<Reading>, PersistenceError> {
    let rows: Vec<ReadingRow> = readings::table
        .filter(readings::reading_date.ge(format_date(start)))
        .filter(readings::reading_date.le(format_date(end)))
        .order((readings::reading_date.desc(), readings::reading_id.asc()))
        .select(ReadingRow::as_select())
        .load(conn)?;

    debug!(count = rows.len(), "Loaded readings for analysis window");
    into_readings(rows)
}

/// Loads every reading recorded by a user.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn readings_by_creator(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<Reading>, PersistenceError> {
    let rows: Vec<ReadingRow> = readings::table
        .filter(readings::created_by.eq(user_id))
        .order((readings::reading_date.desc(), readings::reading_id.asc()))
        .select(ReadingRow::as_select())
        .load(conn)?;
    into_readings(rows)
}

/// Computes aggregate reading counts relative to `today`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn reading_stats(
    conn: &mut SqliteConnection,
    today: Date,
) -> Result<ReadingStats, PersistenceError> {
    let total: i64 = readings::table.count().get_result(conn)?;
    let today_count: i64 = readings::table
        .filter(readings::reading_date.eq(format_date(today)))
        .count()
        .get_result(conn)?;
    let unique_dates: i64 = readings::table
        .select(count_distinct(readings::reading_date))
        .get_result(conn)?;

    Ok(ReadingStats {
        total,
        today: today_count,
        unique_dates,
    })
}
