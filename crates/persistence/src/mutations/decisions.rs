// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Applying decisions to pending requests.
//!
//! Each function here is the body of one atomic decision. The first write
//! is always the guarded pending-to-terminal status update, so a request
//! decided concurrently by two callers is applied exactly once and every
//! later step sees a consistent schedule.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftbot_domain::{
    AdditionRequest, Decision, DeletionRequest, DomainError, Employee, EmployeeId,
    ExchangeRequest, MergePlan, NewShift, RequestId, RequestStatus, Shift, plan_merge,
};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::data_models::format_timestamp;
use crate::diesel_schema::{deletion_requests, exchange_requests};
use crate::error::PersistenceError;
use crate::mutations::requests::{settle_addition, settle_deletion, settle_exchange};
use crate::mutations::shifts::{delete_shift, detach_requests, insert_shift, widen_shift};
use crate::queries::requests::{
    get_addition_request, get_deletion_request, get_deletion_requests, get_exchange_request,
    get_exchange_requests, has_pending_deletion,
};
use crate::queries::shifts::{get_shift, list_shifts_for_employee_on};

const PENDING: &str = RequestStatus::Pending.as_str();
const REJECTED: &str = RequestStatus::Rejected.as_str();

/// How incoming hours landed in the receiving employee's schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedMerge {
    /// A new shift was stored.
    Created(Shift),
    /// An existing shift already covered the hours.
    Unchanged(Shift),
    /// An existing shift was widened, possibly absorbing neighbours.
    Widened {
        /// The surviving shift with its new bounds.
        shift: Shift,
        /// Identifiers of the shifts folded into it.
        absorbed: Vec<i64>,
    },
}

impl AppliedMerge {
    /// Returns the shift that now holds the hours.
    #[must_use]
    pub const fn shift(&self) -> &Shift {
        match self {
            Self::Created(shift) | Self::Unchanged(shift) | Self::Widened { shift, .. } => shift,
        }
    }
}

/// Everything that changed when an exchange request was decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeDecisionOutcome {
    /// The request after the decision.
    pub request: ExchangeRequest,
    /// Where the hours went, for approvals.
    pub merge: Option<AppliedMerge>,
    /// Other exchange requests rejected as a consequence.
    pub auto_rejected_exchanges: Vec<ExchangeRequest>,
    /// Deletion requests rejected as a consequence.
    pub auto_rejected_deletions: Vec<DeletionRequest>,
}

/// Everything that changed when an addition request was decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionDecisionOutcome {
    /// The request after the decision.
    pub request: AdditionRequest,
    /// Where the hours went, for approvals.
    pub merge: Option<AppliedMerge>,
    /// Exchange requests rejected while merging shifts.
    pub auto_rejected_exchanges: Vec<ExchangeRequest>,
    /// Deletion requests rejected while merging shifts.
    pub auto_rejected_deletions: Vec<DeletionRequest>,
}

/// Everything that changed when a deletion request was decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionDecisionOutcome {
    /// The request after the decision.
    pub request: DeletionRequest,
    /// Exchange requests for the removed shift, rejected as a consequence.
    pub auto_rejected_exchanges: Vec<ExchangeRequest>,
}

/// Request identifiers rejected as side effects of one decision.
#[derive(Debug, Default)]
struct Cascade {
    exchanges: Vec<String>,
    deletions: Vec<String>,
}

fn reject_exchanges(
    conn: &mut SqliteConnection,
    request_ids: &[String],
    responded_at: &str,
) -> Result<(), PersistenceError> {
    if request_ids.is_empty() {
        return Ok(());
    }
    diesel::update(
        exchange_requests::table
            .filter(exchange_requests::request_id.eq_any(request_ids))
            .filter(exchange_requests::status.eq(PENDING)),
    )
    .set((
        exchange_requests::status.eq(REJECTED),
        exchange_requests::responded_at.eq(responded_at),
    ))
    .execute(conn)?;
    Ok(())
}

fn reject_deletions(
    conn: &mut SqliteConnection,
    request_ids: &[String],
    responded_at: &str,
) -> Result<(), PersistenceError> {
    if request_ids.is_empty() {
        return Ok(());
    }
    diesel::update(
        deletion_requests::table
            .filter(deletion_requests::request_id.eq_any(request_ids))
            .filter(deletion_requests::status.eq(PENDING)),
    )
    .set((
        deletion_requests::status.eq(REJECTED),
        deletion_requests::responded_at.eq(responded_at),
    ))
    .execute(conn)?;
    Ok(())
}

fn pending_deletion_ids(
    conn: &mut SqliteConnection,
    shift_id: i64,
) -> Result<Vec<String>, PersistenceError> {
    Ok(deletion_requests::table
        .filter(deletion_requests::shift_id.eq(shift_id))
        .filter(deletion_requests::status.eq(PENDING))
        .select(deletion_requests::request_id)
        .load(conn)?)
}

/// Moves requests from an absorbed shift onto the shift that absorbed it.
///
/// A pending request that would duplicate one already pending on the
/// surviving shift is rejected instead of moved.
fn repoint_requests(
    conn: &mut SqliteConnection,
    from: i64,
    to: i64,
    responded_at: &str,
    cascade: &mut Cascade,
) -> Result<(), PersistenceError> {
    let pending: Vec<(String, String, String)> = exchange_requests::table
        .filter(exchange_requests::shift_id.eq(from))
        .filter(exchange_requests::status.eq(PENDING))
        .select((
            exchange_requests::request_id,
            exchange_requests::requester_id,
            exchange_requests::approver_id,
        ))
        .load(conn)?;

    let mut clashing: Vec<String> = Vec::new();
    for (request_id, requester_id, approver_id) in pending {
        let duplicates: i64 = exchange_requests::table
            .filter(exchange_requests::shift_id.eq(to))
            .filter(exchange_requests::requester_id.eq(&requester_id))
            .filter(exchange_requests::approver_id.eq(&approver_id))
            .filter(exchange_requests::status.eq(PENDING))
            .count()
            .get_result(conn)?;
        if duplicates > 0 {
            clashing.push(request_id);
        }
    }
    reject_exchanges(conn, &clashing, responded_at)?;
    cascade.exchanges.extend(clashing);

    if has_pending_deletion(conn, to)? {
        let clashing: Vec<String> = pending_deletion_ids(conn, from)?;
        reject_deletions(conn, &clashing, responded_at)?;
        cascade.deletions.extend(clashing);
    }

    diesel::update(exchange_requests::table.filter(exchange_requests::shift_id.eq(from)))
        .set(exchange_requests::shift_id.eq(to))
        .execute(conn)?;
    diesel::update(deletion_requests::table.filter(deletion_requests::shift_id.eq(from)))
        .set(deletion_requests::shift_id.eq(to))
        .execute(conn)?;
    Ok(())
}

fn load_shift(conn: &mut SqliteConnection, shift_id: i64) -> Result<Shift, PersistenceError> {
    get_shift(conn, shift_id)?.ok_or(PersistenceError::ShiftNotFound(shift_id))
}

fn apply_merge(
    conn: &mut SqliteConnection,
    plan: MergePlan,
    now: OffsetDateTime,
    responded_at: &str,
    cascade: &mut Cascade,
) -> Result<AppliedMerge, PersistenceError> {
    match plan {
        MergePlan::Create(new_shift) => Ok(AppliedMerge::Created(insert_shift(
            conn, &new_shift, now,
        )?)),
        MergePlan::Unchanged { shift_id } => {
            debug!(shift_id, "Incoming hours already covered");
            Ok(AppliedMerge::Unchanged(load_shift(conn, shift_id)?))
        }
        MergePlan::Widen {
            shift_id,
            range,
            absorbed,
        } => {
            for absorbed_id in &absorbed {
                repoint_requests(conn, *absorbed_id, shift_id, responded_at, cascade)?;
                delete_shift(conn, *absorbed_id)?;
            }
            widen_shift(conn, shift_id, range)?;
            Ok(AppliedMerge::Widened {
                shift: load_shift(conn, shift_id)?,
                absorbed,
            })
        }
    }
}

fn merge_into_schedule(
    conn: &mut SqliteConnection,
    incoming: NewShift,
    now: OffsetDateTime,
    responded_at: &str,
    cascade: &mut Cascade,
) -> Result<AppliedMerge, PersistenceError> {
    let existing: Vec<Shift> = list_shifts_for_employee_on(conn, &incoming.employee_id, incoming.date)?;
    let plan: MergePlan = plan_merge(
        &existing,
        &incoming.employee_id,
        incoming.date,
        incoming.range,
        incoming.original_employee_id,
        incoming.is_modified,
    );
    apply_merge(conn, plan, now, responded_at, cascade)
}

fn reload_exchange(
    conn: &mut SqliteConnection,
    request_id: &RequestId,
) -> Result<ExchangeRequest, PersistenceError> {
    get_exchange_request(conn, request_id)?
        .ok_or_else(|| PersistenceError::RequestNotFound(request_id.value().to_string()))
}

/// Applies a decision to an exchange request.
///
/// Approval moves the shift to the approver: the request is marked
/// approved, the requester's other pending requests for the same shift and
/// any pending deletion requests for it are rejected, every request
/// referencing the shift is detached, the shift is deleted, and the hours
/// are merged into the approver's schedule.
///
/// # Arguments
///
/// * `conn` - The database connection, inside a transaction
/// * `request_id` - The request to decide
/// * `actor` - The employee deciding
/// * `decision` - The decision
/// * `now` - The decision time
///
/// # Errors
///
/// Returns `PersistenceError::RequestNotFound` for an unknown request,
/// `DomainError::NotAuthorized` or `DomainError::AlreadyProcessed` as
/// `PersistenceError::DomainViolation`, or
/// `DomainError::ShiftNoLongerAvailable` when approving a request whose
/// shift is gone.
pub fn decide_exchange(
    conn: &mut SqliteConnection,
    request_id: &RequestId,
    actor: &EmployeeId,
    decision: Decision,
    now: OffsetDateTime,
) -> Result<ExchangeDecisionOutcome, PersistenceError> {
    let request: ExchangeRequest = reload_exchange(conn, request_id)?;
    request.authorize(actor, decision)?;
    let responded_at: String = format_timestamp(now)?;

    if decision != Decision::Approve {
        settle_exchange(conn, request_id, decision.resulting_status(), &responded_at)?;
        info!(request_id = %request_id, decision = %decision, "Exchange request settled");
        return Ok(ExchangeDecisionOutcome {
            request: reload_exchange(conn, request_id)?,
            merge: None,
            auto_rejected_exchanges: Vec::new(),
            auto_rejected_deletions: Vec::new(),
        });
    }

    let unavailable = || DomainError::ShiftNoLongerAvailable {
        request_id: request_id.value().to_string(),
    };
    let shift_id: i64 = request.shift_id.ok_or_else(unavailable)?;
    let shift: Shift = get_shift(conn, shift_id)?.ok_or_else(unavailable)?;

    settle_exchange(conn, request_id, RequestStatus::Approved, &responded_at)?;

    let siblings: Vec<String> = exchange_requests::table
        .filter(exchange_requests::shift_id.eq(shift_id))
        .filter(exchange_requests::requester_id.eq(request.requester_id.value()))
        .filter(exchange_requests::status.eq(PENDING))
        .select(exchange_requests::request_id)
        .load(conn)?;
    reject_exchanges(conn, &siblings, &responded_at)?;
    let deletions: Vec<String> = pending_deletion_ids(conn, shift_id)?;
    reject_deletions(conn, &deletions, &responded_at)?;
    let mut cascade: Cascade = Cascade {
        exchanges: siblings,
        deletions,
    };

    detach_requests(conn, shift_id)?;
    delete_shift(conn, shift_id)?;

    let incoming: NewShift = NewShift {
        employee_id: request.approver_id.clone(),
        date: shift.date,
        range: shift.range,
        is_modified: true,
        original_employee_id: Some(shift.employee_id.clone()),
    };
    let merge: AppliedMerge =
        merge_into_schedule(conn, incoming, now, &responded_at, &mut cascade)?;

    info!(
        request_id = %request_id,
        shift_id,
        new_shift_id = merge.shift().shift_id,
        auto_rejected_exchanges = cascade.exchanges.len(),
        auto_rejected_deletions = cascade.deletions.len(),
        "Exchange request approved"
    );

    Ok(ExchangeDecisionOutcome {
        request: reload_exchange(conn, request_id)?,
        merge: Some(merge),
        auto_rejected_exchanges: get_exchange_requests(conn, &cascade.exchanges)?,
        auto_rejected_deletions: get_deletion_requests(conn, &cascade.deletions)?,
    })
}

/// Applies a decision to an addition request.
///
/// Approval merges the hours into the target employee's schedule, with the
/// requesting owner recorded as provenance on a newly created shift.
///
/// # Errors
///
/// Returns `PersistenceError::RequestNotFound` for an unknown request, or
/// the authorization and state errors of `AdditionRequest::authorize`.
pub fn decide_addition(
    conn: &mut SqliteConnection,
    request_id: &RequestId,
    actor: &EmployeeId,
    decision: Decision,
    now: OffsetDateTime,
) -> Result<AdditionDecisionOutcome, PersistenceError> {
    let not_found = || PersistenceError::RequestNotFound(request_id.value().to_string());
    let request: AdditionRequest = get_addition_request(conn, request_id)?.ok_or_else(not_found)?;
    request.authorize(actor, decision)?;
    let responded_at: String = format_timestamp(now)?;

    settle_addition(conn, request_id, decision.resulting_status(), &responded_at)?;

    let mut cascade: Cascade = Cascade::default();
    let merge: Option<AppliedMerge> = if decision == Decision::Approve {
        let incoming: NewShift = NewShift {
            employee_id: request.target_employee_id.clone(),
            date: request.shift_date,
            range: request.shift_range,
            is_modified: true,
            original_employee_id: Some(request.requester_id.clone()),
        };
        Some(merge_into_schedule(
            conn,
            incoming,
            now,
            &responded_at,
            &mut cascade,
        )?)
    } else {
        None
    };

    info!(request_id = %request_id, decision = %decision, "Addition request settled");

    Ok(AdditionDecisionOutcome {
        request: get_addition_request(conn, request_id)?.ok_or_else(not_found)?,
        merge,
        auto_rejected_exchanges: get_exchange_requests(conn, &cascade.exchanges)?,
        auto_rejected_deletions: get_deletion_requests(conn, &cascade.deletions)?,
    })
}

/// Applies a decision to a deletion request.
///
/// Approval deletes the shift after rejecting every pending exchange
/// request for it and detaching all references.
///
/// # Errors
///
/// Returns `PersistenceError::RequestNotFound` for an unknown request,
/// the authorization and state errors of `DeletionRequest::authorize`, or
/// `DomainError::ShiftNoLongerAvailable` when approving a request whose
/// shift is gone.
pub fn decide_deletion(
    conn: &mut SqliteConnection,
    request_id: &RequestId,
    actor: &Employee,
    decision: Decision,
    now: OffsetDateTime,
) -> Result<DeletionDecisionOutcome, PersistenceError> {
    let not_found = || PersistenceError::RequestNotFound(request_id.value().to_string());
    let request: DeletionRequest = get_deletion_request(conn, request_id)?.ok_or_else(not_found)?;
    request.authorize(actor, decision)?;
    let responded_at: String = format_timestamp(now)?;

    if decision != Decision::Approve {
        settle_deletion(conn, request_id, decision.resulting_status(), &responded_at)?;
        info!(request_id = %request_id, decision = %decision, "Deletion request settled");
        return Ok(DeletionDecisionOutcome {
            request: get_deletion_request(conn, request_id)?.ok_or_else(not_found)?,
            auto_rejected_exchanges: Vec::new(),
        });
    }

    let unavailable = || DomainError::ShiftNoLongerAvailable {
        request_id: request_id.value().to_string(),
    };
    let shift_id: i64 = request.shift_id.ok_or_else(unavailable)?;
    if get_shift(conn, shift_id)?.is_none() {
        return Err(unavailable().into());
    }

    settle_deletion(conn, request_id, RequestStatus::Approved, &responded_at)?;

    let rejected: Vec<String> = exchange_requests::table
        .filter(exchange_requests::shift_id.eq(shift_id))
        .filter(exchange_requests::status.eq(PENDING))
        .select(exchange_requests::request_id)
        .load(conn)?;
    reject_exchanges(conn, &rejected, &responded_at)?;

    detach_requests(conn, shift_id)?;
    delete_shift(conn, shift_id)?;

    info!(
        request_id = %request_id,
        shift_id,
        auto_rejected_exchanges = rejected.len(),
        "Deletion request approved"
    );

    Ok(DeletionDecisionOutcome {
        request: get_deletion_request(conn, request_id)?.ok_or_else(not_found)?,
        auto_rejected_exchanges: get_exchange_requests(conn, &rejected)?,
    })
}
