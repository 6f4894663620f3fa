// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request queries for all three workflows.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftbot_domain::{
    AdditionRequest, DeletionRequest, EmployeeId, ExchangeRequest, RequestId, RequestStatus,
};
use tracing::debug;

use crate::data_models::{AdditionRequestRow, DeletionRequestRow, ExchangeRequestRow};
use crate::diesel_schema::{addition_requests, deletion_requests, exchange_requests};
use crate::error::PersistenceError;

const PENDING: &str = RequestStatus::Pending.as_str();

/// Retrieves an exchange request by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_exchange_request(
    conn: &mut SqliteConnection,
    request_id: &RequestId,
) -> Result<Option<ExchangeRequest>, PersistenceError> {
    debug!(request_id = %request_id, "Looking up exchange request");

    exchange_requests::table
        .find(request_id.value())
        .select(ExchangeRequestRow::as_select())
        .first(conn)
        .optional()?
        .map(ExchangeRequestRow::into_domain)
        .transpose()
}

/// Retrieves several exchange requests by ID, in request ID order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_exchange_requests(
    conn: &mut SqliteConnection,
    request_ids: &[String],
) -> Result<Vec<ExchangeRequest>, PersistenceError> {
    exchange_requests::table
        .filter(exchange_requests::request_id.eq_any(request_ids))
        .order(exchange_requests::request_id.asc())
        .select(ExchangeRequestRow::as_select())
        .load(conn)?
        .into_iter()
        .map(ExchangeRequestRow::into_domain)
        .collect()
}

/// Returns whether an identical exchange request is already pending.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn has_pending_exchange(
    conn: &mut SqliteConnection,
    requester_id: &EmployeeId,
    shift_id: i64,
    approver_id: &EmployeeId,
) -> Result<bool, PersistenceError> {
    let count: i64 = exchange_requests::table
        .filter(exchange_requests::requester_id.eq(requester_id.value()))
        .filter(exchange_requests::shift_id.eq(shift_id))
        .filter(exchange_requests::approver_id.eq(approver_id.value()))
        .filter(exchange_requests::status.eq(PENDING))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Lists pending exchange requests waiting on an approver, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_pending_exchanges_for_approver(
    conn: &mut SqliteConnection,
    approver_id: &EmployeeId,
) -> Result<Vec<ExchangeRequest>, PersistenceError> {
    exchange_requests::table
        .filter(exchange_requests::approver_id.eq(approver_id.value()))
        .filter(exchange_requests::status.eq(PENDING))
        .order(exchange_requests::requested_at.asc())
        .select(ExchangeRequestRow::as_select())
        .load(conn)?
        .into_iter()
        .map(ExchangeRequestRow::into_domain)
        .collect()
}

/// Lists pending exchange requests sent by a requester, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_pending_exchanges_by_requester(
    conn: &mut SqliteConnection,
    requester_id: &EmployeeId,
) -> Result<Vec<ExchangeRequest>, PersistenceError> {
    exchange_requests::table
        .filter(exchange_requests::requester_id.eq(requester_id.value()))
        .filter(exchange_requests::status.eq(PENDING))
        .order(exchange_requests::requested_at.asc())
        .select(ExchangeRequestRow::as_select())
        .load(conn)?
        .into_iter()
        .map(ExchangeRequestRow::into_domain)
        .collect()
}

/// Lists every exchange request that still references a shift.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_exchanges_for_shift(
    conn: &mut SqliteConnection,
    shift_id: i64,
) -> Result<Vec<ExchangeRequest>, PersistenceError> {
    exchange_requests::table
        .filter(exchange_requests::shift_id.eq(shift_id))
        .order(exchange_requests::requested_at.asc())
        .select(ExchangeRequestRow::as_select())
        .load(conn)?
        .into_iter()
        .map(ExchangeRequestRow::into_domain)
        .collect()
}

/// Retrieves an addition request by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_addition_request(
    conn: &mut SqliteConnection,
    request_id: &RequestId,
) -> Result<Option<AdditionRequest>, PersistenceError> {
    debug!(request_id = %request_id, "Looking up addition request");

    addition_requests::table
        .find(request_id.value())
        .select(AdditionRequestRow::as_select())
        .first(conn)
        .optional()?
        .map(AdditionRequestRow::into_domain)
        .transpose()
}

/// Lists pending addition requests addressed to an employee, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_pending_additions_for_target(
    conn: &mut SqliteConnection,
    target_employee_id: &EmployeeId,
) -> Result<Vec<AdditionRequest>, PersistenceError> {
    addition_requests::table
        .filter(addition_requests::target_employee_id.eq(target_employee_id.value()))
        .filter(addition_requests::status.eq(PENDING))
        .order(addition_requests::requested_at.asc())
        .select(AdditionRequestRow::as_select())
        .load(conn)?
        .into_iter()
        .map(AdditionRequestRow::into_domain)
        .collect()
}

/// Retrieves a deletion request by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_deletion_request(
    conn: &mut SqliteConnection,
    request_id: &RequestId,
) -> Result<Option<DeletionRequest>, PersistenceError> {
    debug!(request_id = %request_id, "Looking up deletion request");

    deletion_requests::table
        .find(request_id.value())
        .select(DeletionRequestRow::as_select())
        .first(conn)
        .optional()?
        .map(DeletionRequestRow::into_domain)
        .transpose()
}

/// Retrieves several deletion requests by ID, in request ID order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_deletion_requests(
    conn: &mut SqliteConnection,
    request_ids: &[String],
) -> Result<Vec<DeletionRequest>, PersistenceError> {
    deletion_requests::table
        .filter(deletion_requests::request_id.eq_any(request_ids))
        .order(deletion_requests::request_id.asc())
        .select(DeletionRequestRow::as_select())
        .load(conn)?
        .into_iter()
        .map(DeletionRequestRow::into_domain)
        .collect()
}

/// Returns whether a deletion request for the shift is already pending.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn has_pending_deletion(
    conn: &mut SqliteConnection,
    shift_id: i64,
) -> Result<bool, PersistenceError> {
    let count: i64 = deletion_requests::table
        .filter(deletion_requests::shift_id.eq(shift_id))
        .filter(deletion_requests::status.eq(PENDING))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Lists every pending deletion request, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_pending_deletions(
    conn: &mut SqliteConnection,
) -> Result<Vec<DeletionRequest>, PersistenceError> {
    deletion_requests::table
        .filter(deletion_requests::status.eq(PENDING))
        .order(deletion_requests::requested_at.asc())
        .select(DeletionRequestRow::as_select())
        .load(conn)?
        .into_iter()
        .map(DeletionRequestRow::into_domain)
        .collect()
}

/// Lists pending deletion requests sent by a requester, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_pending_deletions_by_requester(
    conn: &mut SqliteConnection,
    requester_id: &EmployeeId,
) -> Result<Vec<DeletionRequest>, PersistenceError> {
    deletion_requests::table
        .filter(deletion_requests::requester_id.eq(requester_id.value()))
        .filter(deletion_requests::status.eq(PENDING))
        .order(deletion_requests::requested_at.asc())
        .select(DeletionRequestRow::as_select())
        .load(conn)?
        .into_iter()
        .map(DeletionRequestRow::into_domain)
        .collect()
}
