// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reading mutations.
//!
//! A reading is keyed by its document id. Saving an existing key replaces
//! the stored revision; no history is kept.

use diesel::prelude::*;
use tracing::info;
use vibemon_domain::{Reading, format_date};

use crate::data_models::SaveOutcome;
use crate::diesel_schema::readings;
use crate::error::PersistenceError;
use crate::queries::readings::get_reading;

/// Inserts or replaces a reading.
///
/// # Errors
///
/// Returns an error if serialization or a database write fails.
pub fn save_reading(
    conn: &mut SqliteConnection,
    reading: &Reading,
) -> Result<SaveOutcome, PersistenceError> {
    let reading_id: String = reading.document_id();
    let parameters_json: String = serde_json::to_string(&reading.parameters)?;
    let reading_date: String = format_date(reading.date);

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let exists: bool = readings::table
            .filter(readings::reading_id.eq(&reading_id))
            .count()
            .get_result::<i64>(conn)?
            > 0;

        if exists {
            diesel::update(readings::table)
                .filter(readings::reading_id.eq(&reading_id))
                .set((
                    readings::parameters_json.eq(&parameters_json),
                    readings::notes.eq(&reading.notes),
                    readings::created_by.eq(reading.created_by),
                    readings::created_by_name.eq(&reading.created_by_name),
                    readings::recorded_at.eq(&reading.recorded_at),
                ))
                .execute(conn)?;
            info!(reading_id, "Reading updated");
            Ok(SaveOutcome::Updated)
        } else {
            diesel::insert_into(readings::table)
                .values((
                    readings::reading_id.eq(&reading_id),
                    readings::unit.eq(reading.unit.as_str()),
                    readings::equipment.eq(&reading.equipment),
                    readings::reading_date.eq(&reading_date),
                    readings::parameters_json.eq(&parameters_json),
                    readings::notes.eq(&reading.notes),
                    readings::created_by.eq(reading.created_by),
                    readings::created_by_name.eq(&reading.created_by_name),
                    readings::recorded_at.eq(&reading.recorded_at),
                ))
                .execute(conn)?;
            info!(reading_id, "Reading created");
            Ok(SaveOutcome::Created)
        }
    })
}

/// Deletes a reading and returns what was removed.
///
/// # Errors
///
/// Returns [`PersistenceError::ReadingNotFound`] if no reading has this id.
pub fn delete_reading(
    conn: &mut SqliteConnection,
    reading_id: &str,
) -> Result<Reading, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let reading: Reading = get_reading(conn, reading_id)?
            .ok_or_else(|| PersistenceError::ReadingNotFound(reading_id.to_string()))?;

        diesel::delete(readings::table)
            .filter(readings::reading_id.eq(reading_id))
            .execute(conn)?;

        info!(reading_id, "Reading deleted");
        Ok(reading)
    })
}
