// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftbot_domain::{Employee, EmployeeId};
use tracing::debug;

use crate::data_models::EmployeeRow;
use crate::diesel_schema::employees;
use crate::error::PersistenceError;

/// Retrieves an employee by roster identifier.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_employee(
    conn: &mut SqliteConnection,
    employee_id: &EmployeeId,
) -> Result<Option<Employee>, PersistenceError> {
    debug!(employee_id = %employee_id, "Looking up employee");

    employees::table
        .find(employee_id.value())
        .select(EmployeeRow::as_select())
        .first(conn)
        .optional()?
        .map(EmployeeRow::into_domain)
        .transpose()
}

/// Retrieves the employee linked to a chat user.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_employee_by_chat_user(
    conn: &mut SqliteConnection,
    chat_user_id: &str,
) -> Result<Option<Employee>, PersistenceError> {
    debug!(chat_user_id, "Looking up employee by chat user");

    employees::table
        .filter(employees::chat_user_id.eq(chat_user_id))
        .select(EmployeeRow::as_select())
        .first(conn)
        .optional()?
        .map(EmployeeRow::into_domain)
        .transpose()
}

/// Lists every known employee ordered by identifier.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_employees(conn: &mut SqliteConnection) -> Result<Vec<Employee>, PersistenceError> {
    employees::table
        .order(employees::employee_id.asc())
        .select(EmployeeRow::as_select())
        .load(conn)?
        .into_iter()
        .map(EmployeeRow::into_domain)
        .collect()
}

/// Lists every employee holding the owner role.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_owners(conn: &mut SqliteConnection) -> Result<Vec<Employee>, PersistenceError> {
    employees::table
        .filter(employees::role.eq(shiftbot_domain::Role::Owner.as_str()))
        .order(employees::employee_id.asc())
        .select(EmployeeRow::as_select())
        .load(conn)?
        .into_iter()
        .map(EmployeeRow::into_domain)
        .collect()
}
