// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftbot_domain::{EmployeeId, Shift, format_date};
use time::Date;
use tracing::debug;

use crate::data_models::ShiftRow;
use crate::diesel_schema::shifts;
use crate::error::PersistenceError;

fn into_shifts(rows: Vec<ShiftRow>) -> Result<Vec<Shift>, PersistenceError> {
    rows.into_iter().map(ShiftRow::into_domain).collect()
}

/// Retrieves a shift by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_shift(
    conn: &mut SqliteConnection,
    shift_id: i64,
) -> Result<Option<Shift>, PersistenceError> {
    debug!(shift_id, "Looking up shift");

    shifts::table
        .find(shift_id)
        .select(ShiftRow::as_select())
        .first(conn)
        .optional()?
        .map(ShiftRow::into_domain)
        .transpose()
}

/// Lists one employee's shifts on a day, earliest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_shifts_for_employee_on(
    conn: &mut SqliteConnection,
    employee_id: &EmployeeId,
    date: Date,
) -> Result<Vec<Shift>, PersistenceError> {
    let rows: Vec<ShiftRow> = shifts::table
        .filter(shifts::employee_id.eq(employee_id.value()))
        .filter(shifts::shift_date.eq(format_date(date)))
        .order((shifts::start_time.asc(), shifts::shift_id.asc()))
        .select(ShiftRow::as_select())
        .load(conn)?;
    into_shifts(rows)
}

/// Lists every shift on a day, ordered by start time then employee.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_shifts_on(
    conn: &mut SqliteConnection,
    date: Date,
) -> Result<Vec<Shift>, PersistenceError> {
    let rows: Vec<ShiftRow> = shifts::table
        .filter(shifts::shift_date.eq(format_date(date)))
        .order((
            shifts::start_time.asc(),
            shifts::employee_id.asc(),
            shifts::shift_id.asc(),
        ))
        .select(ShiftRow::as_select())
        .load(conn)?;
    into_shifts(rows)
}

/// Lists shifts in the inclusive date range, optionally for one employee.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_shifts_between(
    conn: &mut SqliteConnection,
    from: Date,
    to: Date,
    employee_id: Option<&EmployeeId>,
) -> Result<Vec<Shift>, PersistenceError> {
    let mut query = shifts::table
        .filter(shifts::shift_date.ge(format_date(from)))
        .filter(shifts::shift_date.le(format_date(to)))
        .into_boxed();
    if let Some(employee_id) = employee_id {
        query = query.filter(shifts::employee_id.eq(employee_id.value().to_string()));
    }
    let rows: Vec<ShiftRow> = query
        .order((
            shifts::shift_date.asc(),
            shifts::start_time.asc(),
            shifts::employee_id.asc(),
        ))
        .select(ShiftRow::as_select())
        .load(conn)?;
    into_shifts(rows)
}
