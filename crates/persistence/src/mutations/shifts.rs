// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftbot_domain::{NewShift, Shift, TimeRange, format_date, format_time};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::{deletion_requests, exchange_requests, shifts};
use crate::error::PersistenceError;

/// Inserts a shift without any overlap check.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn insert_shift(
    conn: &mut SqliteConnection,
    shift: &NewShift,
    now: OffsetDateTime,
) -> Result<Shift, PersistenceError> {
    let created_at: String = format_timestamp(now)?;
    diesel::insert_into(shifts::table)
        .values((
            shifts::employee_id.eq(shift.employee_id.value()),
            shifts::shift_date.eq(format_date(shift.date)),
            shifts::start_time.eq(format_time(shift.range.start())),
            shifts::end_time.eq(format_time(shift.range.end())),
            shifts::is_modified.eq(i32::from(shift.is_modified)),
            shifts::original_employee_id.eq(shift.original_employee_id.as_ref().map(|id| id.value())),
            shifts::created_at.eq(&created_at),
        ))
        .execute(conn)?;

    let shift_id: i64 = get_last_insert_rowid(conn)?;
    info!(
        shift_id,
        employee_id = %shift.employee_id,
        date = %format_date(shift.date),
        range = %shift.range,
        "Shift created"
    );

    Ok(Shift {
        shift_id,
        employee_id: shift.employee_id.clone(),
        date: shift.date,
        range: shift.range,
        is_modified: shift.is_modified,
        original_employee_id: shift.original_employee_id.clone(),
    })
}

/// Replaces a shift's bounds and marks it modified.
///
/// # Errors
///
/// Returns `PersistenceError::ShiftNotFound` if no row was updated.
pub fn widen_shift(
    conn: &mut SqliteConnection,
    shift_id: i64,
    range: TimeRange,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(shifts::table.find(shift_id))
        .set((
            shifts::start_time.eq(format_time(range.start())),
            shifts::end_time.eq(format_time(range.end())),
            shifts::is_modified.eq(1),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::ShiftNotFound(shift_id));
    }
    debug!(shift_id, range = %range, "Shift widened");
    Ok(())
}

/// Clears every request reference to a shift.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn detach_requests(conn: &mut SqliteConnection, shift_id: i64) -> Result<(), PersistenceError> {
    let exchanges: usize =
        diesel::update(exchange_requests::table.filter(exchange_requests::shift_id.eq(shift_id)))
            .set(exchange_requests::shift_id.eq(None::<i64>))
            .execute(conn)?;
    let deletions: usize =
        diesel::update(deletion_requests::table.filter(deletion_requests::shift_id.eq(shift_id)))
            .set(deletion_requests::shift_id.eq(None::<i64>))
            .execute(conn)?;
    debug!(shift_id, exchanges, deletions, "Detached requests from shift");
    Ok(())
}

/// Deletes a shift row.
///
/// # Errors
///
/// Returns `PersistenceError::ShiftNotFound` if no row was deleted.
pub fn delete_shift(conn: &mut SqliteConnection, shift_id: i64) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(shifts::table.find(shift_id)).execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::ShiftNotFound(shift_id));
    }
    info!(shift_id, "Shift deleted");
    Ok(())
}
