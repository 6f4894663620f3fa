// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request creation and status mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftbot_domain::{
    AdditionRequest, DeletionRequest, DomainError, ExchangeRequest, RequestId, RequestKind,
    RequestStatus, format_date, format_time,
};
use std::str::FromStr;
use tracing::info;

use crate::data_models::format_timestamp;
use crate::diesel_schema::{addition_requests, deletion_requests, exchange_requests};
use crate::error::PersistenceError;
use crate::queries::requests::{has_pending_deletion, has_pending_exchange};

/// Inserts exchange requests, refusing any that duplicates a pending one.
///
/// # Errors
///
/// Returns `DomainError::DuplicatePendingRequest` if a pending request with
/// the same requester, shift and approver exists, or if the batch itself
/// contains such a duplicate.
pub fn insert_exchange_requests(
    conn: &mut SqliteConnection,
    requests: &[ExchangeRequest],
) -> Result<(), PersistenceError> {
    for request in requests {
        let shift_id: i64 = request.shift_id.ok_or_else(|| {
            PersistenceError::Other(format!(
                "exchange request {} has no shift",
                request.request_id
            ))
        })?;
        if has_pending_exchange(conn, &request.requester_id, shift_id, &request.approver_id)? {
            return Err(DomainError::DuplicatePendingRequest {
                kind: RequestKind::Exchange,
                detail: format!(
                    "{} already asked {} to take shift {shift_id}",
                    request.requester_id, request.approver_id
                ),
            }
            .into());
        }

        diesel::insert_into(exchange_requests::table)
            .values((
                exchange_requests::request_id.eq(request.request_id.value()),
                exchange_requests::requester_id.eq(request.requester_id.value()),
                exchange_requests::approver_id.eq(request.approver_id.value()),
                exchange_requests::shift_id.eq(shift_id),
                exchange_requests::shift_date.eq(format_date(request.shift_date)),
                exchange_requests::start_time.eq(format_time(request.shift_range.start())),
                exchange_requests::end_time.eq(format_time(request.shift_range.end())),
                exchange_requests::status.eq(request.status.as_str()),
                exchange_requests::requested_at.eq(format_timestamp(request.requested_at)?),
            ))
            .execute(conn)?;

        info!(
            request_id = %request.request_id,
            requester_id = %request.requester_id,
            approver_id = %request.approver_id,
            shift_id,
            "Exchange request created"
        );
    }
    Ok(())
}

/// Inserts addition requests.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn insert_addition_requests(
    conn: &mut SqliteConnection,
    requests: &[AdditionRequest],
) -> Result<(), PersistenceError> {
    for request in requests {
        diesel::insert_into(addition_requests::table)
            .values((
                addition_requests::request_id.eq(request.request_id.value()),
                addition_requests::requester_id.eq(request.requester_id.value()),
                addition_requests::target_employee_id.eq(request.target_employee_id.value()),
                addition_requests::shift_date.eq(format_date(request.shift_date)),
                addition_requests::start_time.eq(format_time(request.shift_range.start())),
                addition_requests::end_time.eq(format_time(request.shift_range.end())),
                addition_requests::status.eq(request.status.as_str()),
                addition_requests::requested_at.eq(format_timestamp(request.requested_at)?),
            ))
            .execute(conn)?;

        info!(
            request_id = %request.request_id,
            target_employee_id = %request.target_employee_id,
            "Addition request created"
        );
    }
    Ok(())
}

/// Inserts a deletion request, refusing a second pending one for the shift.
///
/// # Errors
///
/// Returns `DomainError::DuplicatePendingRequest` if the shift already has
/// a pending deletion request.
pub fn insert_deletion_request(
    conn: &mut SqliteConnection,
    request: &DeletionRequest,
) -> Result<(), PersistenceError> {
    let shift_id: i64 = request.shift_id.ok_or_else(|| {
        PersistenceError::Other(format!(
            "deletion request {} has no shift",
            request.request_id
        ))
    })?;
    if has_pending_deletion(conn, shift_id)? {
        return Err(DomainError::DuplicatePendingRequest {
            kind: RequestKind::Deletion,
            detail: format!("shift {shift_id} already has a pending deletion request"),
        }
        .into());
    }

    diesel::insert_into(deletion_requests::table)
        .values((
            deletion_requests::request_id.eq(request.request_id.value()),
            deletion_requests::requester_id.eq(request.requester_id.value()),
            deletion_requests::shift_id.eq(shift_id),
            deletion_requests::shift_date.eq(format_date(request.shift_date)),
            deletion_requests::start_time.eq(format_time(request.shift_range.start())),
            deletion_requests::end_time.eq(format_time(request.shift_range.end())),
            deletion_requests::reason.eq(&request.reason),
            deletion_requests::status.eq(request.status.as_str()),
            deletion_requests::requested_at.eq(format_timestamp(request.requested_at)?),
        ))
        .execute(conn)?;

    info!(
        request_id = %request.request_id,
        requester_id = %request.requester_id,
        shift_id,
        "Deletion request created"
    );
    Ok(())
}

/// Moves a pending exchange request to `status`.
///
/// The update is guarded on the row still being pending, so of two
/// concurrent deciders exactly one succeeds.
///
/// # Errors
///
/// Returns `DomainError::AlreadyProcessed` if the request was no longer
/// pending.
pub fn settle_exchange(
    conn: &mut SqliteConnection,
    request_id: &RequestId,
    status: RequestStatus,
    responded_at: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        exchange_requests::table
            .filter(exchange_requests::request_id.eq(request_id.value()))
            .filter(exchange_requests::status.eq(RequestStatus::Pending.as_str())),
    )
    .set((
        exchange_requests::status.eq(status.as_str()),
        exchange_requests::responded_at.eq(responded_at),
    ))
    .execute(conn)?;
    if updated == 0 {
        let current: Option<String> = exchange_requests::table
            .find(request_id.value())
            .select(exchange_requests::status)
            .first(conn)
            .optional()?;
        return Err(not_settled(request_id, current.as_deref()));
    }
    Ok(())
}

/// Moves a pending addition request to `status`.
///
/// # Errors
///
/// Returns `DomainError::AlreadyProcessed` if the request was no longer
/// pending.
pub fn settle_addition(
    conn: &mut SqliteConnection,
    request_id: &RequestId,
    status: RequestStatus,
    responded_at: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        addition_requests::table
            .filter(addition_requests::request_id.eq(request_id.value()))
            .filter(addition_requests::status.eq(RequestStatus::Pending.as_str())),
    )
    .set((
        addition_requests::status.eq(status.as_str()),
        addition_requests::responded_at.eq(responded_at),
    ))
    .execute(conn)?;
    if updated == 0 {
        let current: Option<String> = addition_requests::table
            .find(request_id.value())
            .select(addition_requests::status)
            .first(conn)
            .optional()?;
        return Err(not_settled(request_id, current.as_deref()));
    }
    Ok(())
}

/// Moves a pending deletion request to `status`.
///
/// # Errors
///
/// Returns `DomainError::AlreadyProcessed` if the request was no longer
/// pending.
pub fn settle_deletion(
    conn: &mut SqliteConnection,
    request_id: &RequestId,
    status: RequestStatus,
    responded_at: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        deletion_requests::table
            .filter(deletion_requests::request_id.eq(request_id.value()))
            .filter(deletion_requests::status.eq(RequestStatus::Pending.as_str())),
    )
    .set((
        deletion_requests::status.eq(status.as_str()),
        deletion_requests::responded_at.eq(responded_at),
    ))
    .execute(conn)?;
    if updated == 0 {
        let current: Option<String> = deletion_requests::table
            .find(request_id.value())
            .select(deletion_requests::status)
            .first(conn)
            .optional()?;
        return Err(not_settled(request_id, current.as_deref()));
    }
    Ok(())
}

fn not_settled(request_id: &RequestId, current: Option<&str>) -> PersistenceError {
    match current.map(RequestStatus::from_str) {
        Some(Ok(status)) => DomainError::AlreadyProcessed {
            request_id: request_id.value().to_string(),
            status,
        }
        .into(),
        Some(Err(e)) => PersistenceError::ReconstructionError(e.to_string()),
        None => PersistenceError::RequestNotFound(request_id.value().to_string()),
    }
}
