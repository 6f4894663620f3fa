// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftbot_domain::Employee;
use time::OffsetDateTime;
use tracing::info;

use crate::data_models::format_timestamp;
use crate::diesel_schema::employees;
use crate::error::PersistenceError;

/// Stores an employee and binds it to its chat user.
///
/// Any other employee previously bound to the same chat user is unbound
/// first, so a chat account always maps to at most one employee.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn link_employee(
    conn: &mut SqliteConnection,
    employee: &Employee,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    if let Some(chat_user_id) = employee.chat_user_id.as_deref() {
        diesel::update(
            employees::table
                .filter(employees::chat_user_id.eq(chat_user_id))
                .filter(employees::employee_id.ne(employee.employee_id.value())),
        )
        .set(employees::chat_user_id.eq(None::<String>))
        .execute(conn)?;
    }

    let created_at: String = format_timestamp(now)?;
    diesel::insert_into(employees::table)
        .values((
            employees::employee_id.eq(employee.employee_id.value()),
            employees::display_name.eq(&employee.display_name),
            employees::role.eq(employee.role.as_str()),
            employees::chat_user_id.eq(employee.chat_user_id.as_deref()),
            employees::created_at.eq(&created_at),
        ))
        .on_conflict(employees::employee_id)
        .do_update()
        .set((
            employees::display_name.eq(&employee.display_name),
            employees::role.eq(employee.role.as_str()),
            employees::chat_user_id.eq(employee.chat_user_id.as_deref()),
        ))
        .execute(conn)?;

    info!(
        employee_id = %employee.employee_id,
        role = %employee.role,
        "Employee linked"
    );
    Ok(())
}
