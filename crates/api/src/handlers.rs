// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Synchronous API handlers.
//!
//! These mirror the chat workflows for callers that already know every
//! answer: each call validates its input, authorizes the actor, and then
//! runs the same submission and decision code the dialogues use.

use shiftbot_domain::{
    Candidate, Employee, EmployeeId, NewShift, RequestId, RequestKind, Shift, TimeRange,
    parse_clock_time, parse_iso_date,
};
use shiftbot_persistence::Persistence;
use time::{Date, OffsetDateTime};
use tracing::info;

use crate::auth::{AuthorizationService, resolve_actor};
use crate::context::{Directory, EngineContext};
use crate::coordinator::{ApprovalCoordinator, DecisionReport};
use crate::error::ApiError;
use crate::messages::describe_slot;
use crate::request_response::{
    CreateAdditionRequestsRequest, CreateDeletionRequestRequest, CreateExchangeRequestsRequest,
    CreateShiftRequest, CreateShiftResponse, DecideRequest, ListShiftsRequest, ListShiftsResponse,
    PendingRequestsResponse, RequestInfo, ShiftInfo, SubmissionResponse,
};
use crate::submissions::{Submission, submit_additions, submit_deletion, submit_exchange};

fn parse_employee_id(field: &str, value: &str) -> Result<EmployeeId, ApiError> {
    EmployeeId::parse(value).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: e.to_string(),
    })
}

fn parse_range(start: &str, end: &str) -> Result<TimeRange, ApiError> {
    Ok(TimeRange::new(
        parse_clock_time(start)?,
        parse_clock_time(end)?,
    )?)
}

fn candidates(
    directory: &Directory,
    field: &str,
    ids: &[String],
) -> Result<Vec<Candidate>, ApiError> {
    ids.iter()
        .map(|id| parse_employee_id(field, id).map(|id| directory.candidate(&id)))
        .collect()
}

fn submission_response(submission: &Submission, summary: &str) -> SubmissionResponse {
    SubmissionResponse {
        request_ids: submission
            .created
            .iter()
            .map(|id| id.value().to_string())
            .collect(),
        excluded: submission
            .excluded
            .iter()
            .map(|c| c.employee_id.value().to_string())
            .collect(),
        message: summary.to_string(),
    }
}

/// Seeds a shift.
///
/// # Arguments
///
/// * `context` - The engine context
/// * `persistence` - The persistence layer
/// * `request` - The shift to create
/// * `now` - The current time
///
/// # Errors
///
/// Returns an error if:
/// - The actor is unknown or not the owner
/// - The date or times are malformed
/// - The employee already works during those hours
pub fn create_shift(
    context: &EngineContext,
    persistence: &mut Persistence,
    request: &CreateShiftRequest,
    now: OffsetDateTime,
) -> Result<CreateShiftResponse, ApiError> {
    let actor_id: EmployeeId = parse_employee_id("actor_id", &request.actor_id)?;
    let actor: Employee = resolve_actor(persistence, context, &actor_id)?;
    AuthorizationService::authorize_create_shift(&actor)?;

    let employee_id: EmployeeId = parse_employee_id("employee_id", &request.employee_id)?;
    let date: Date = parse_iso_date(&request.date)?;
    let range: TimeRange = parse_range(&request.start, &request.end)?;

    let shift: Shift =
        persistence.create_shift(&NewShift::scheduled(employee_id, date, range), now)?;
    info!(
        shift_id = shift.shift_id,
        employee_id = %shift.employee_id,
        actor_id = %actor.employee_id,
        "Shift created"
    );

    let directory: Directory = context.directory();
    Ok(CreateShiftResponse {
        message: format!(
            "Created shift {} for {}",
            describe_slot(shift.date, &shift.range),
            directory.name(&shift.employee_id)
        ),
        shift: ShiftInfo::from_shift(&shift, &directory),
    })
}

/// Lists shifts between two days, inclusive.
///
/// # Errors
///
/// Returns an error if the dates are malformed or out of order, or if the
/// query fails.
pub fn list_shifts(
    context: &EngineContext,
    persistence: &mut Persistence,
    request: &ListShiftsRequest,
) -> Result<ListShiftsResponse, ApiError> {
    let from: Date = parse_iso_date(&request.from)?;
    let to: Date = parse_iso_date(&request.to)?;
    if to < from {
        return Err(ApiError::InvalidInput {
            field: String::from("to"),
            message: String::from("The end of the range must not precede its start."),
        });
    }
    let employee_id: Option<EmployeeId> = request
        .employee_id
        .as_deref()
        .map(|id| parse_employee_id("employee_id", id))
        .transpose()?;

    let shifts: Vec<Shift> = persistence.list_shifts_between(from, to, employee_id.as_ref())?;
    let directory: Directory = context.directory();
    Ok(ListShiftsResponse {
        shifts: shifts
            .iter()
            .map(|s| ShiftInfo::from_shift(s, &directory))
            .collect(),
    })
}

/// Offers a shift to several colleagues at once.
///
/// # Errors
///
/// Returns an error if:
/// - Any identifier is malformed
/// - The shift is missing, not the requester's, or in the past
/// - Every approver already works during the shift
/// - A request duplicates a pending one
pub fn create_exchange_requests(
    context: &EngineContext,
    persistence: &mut Persistence,
    request: &CreateExchangeRequestsRequest,
    now: OffsetDateTime,
) -> Result<SubmissionResponse, ApiError> {
    let requester_id: EmployeeId = parse_employee_id("requester_id", &request.requester_id)?;
    let approvers: Vec<Candidate> =
        candidates(&context.directory(), "approver_ids", &request.approver_ids)?;

    let submission: Submission = submit_exchange(
        context,
        persistence,
        &requester_id,
        request.shift_id,
        &approvers,
        now,
    )?;
    let summary: String = format!("Sent {} exchange request(s)", submission.created.len());
    Ok(submission_response(&submission, &summary))
}

/// Asks several employees to work extra hours.
///
/// # Errors
///
/// Returns an error if:
/// - The requester is unknown or not the owner
/// - The date or times are malformed, or the date is in the past
/// - Every target already works during the hours
pub fn create_addition_requests(
    context: &EngineContext,
    persistence: &mut Persistence,
    request: &CreateAdditionRequestsRequest,
    now: OffsetDateTime,
) -> Result<SubmissionResponse, ApiError> {
    let requester_id: EmployeeId = parse_employee_id("requester_id", &request.requester_id)?;
    let requester: Employee = resolve_actor(persistence, context, &requester_id)?;
    let date: Date = parse_iso_date(&request.date)?;
    let range: TimeRange = parse_range(&request.start, &request.end)?;
    let targets: Vec<Candidate> =
        candidates(&context.directory(), "target_ids", &request.target_ids)?;

    let submission: Submission =
        submit_additions(context, persistence, &requester, date, range, &targets, now)?;
    let summary: String = format!("Sent {} addition request(s)", submission.created.len());
    Ok(submission_response(&submission, &summary))
}

/// Asks the owner to remove a shift.
///
/// # Errors
///
/// Returns an error if the shift is missing, not the requester's, or in
/// the past, if the reason is empty, or if a removal is already pending.
pub fn create_deletion_request(
    context: &EngineContext,
    persistence: &mut Persistence,
    request: &CreateDeletionRequestRequest,
    now: OffsetDateTime,
) -> Result<SubmissionResponse, ApiError> {
    let requester_id: EmployeeId = parse_employee_id("requester_id", &request.requester_id)?;
    let request_id: RequestId = submit_deletion(
        context,
        persistence,
        &requester_id,
        request.shift_id,
        &request.reason,
        now,
    )?;
    Ok(SubmissionResponse {
        request_ids: vec![request_id.value().to_string()],
        excluded: Vec::new(),
        message: String::from("Sent the removal request to the owner"),
    })
}

/// Decides a pending request.
///
/// # Errors
///
/// Returns an error if:
/// - The identifier is malformed or names a different kind of request
/// - The actor is unknown or not the responsible party
/// - The request was already decided or its shift is gone
pub fn decide_request(
    context: &EngineContext,
    persistence: &mut Persistence,
    kind: RequestKind,
    request_id: &str,
    request: &DecideRequest,
    now: OffsetDateTime,
) -> Result<DecisionReport, ApiError> {
    let request_id: RequestId = RequestId::parse(request_id)?;
    if request_id.kind().is_some_and(|k| k != kind) {
        return Err(ApiError::InvalidInput {
            field: String::from("request_id"),
            message: format!("{request_id} is not a {kind} request"),
        });
    }
    let actor_id: EmployeeId = parse_employee_id("actor_id", &request.actor_id)?;
    let actor: Employee = resolve_actor(persistence, context, &actor_id)?;

    ApprovalCoordinator::new(context).decide(
        persistence,
        kind,
        &request_id,
        &actor,
        request.decision,
        now,
    )
}

/// Lists the pending requests an employee can decide or has made.
///
/// The owner's incoming list includes every pending removal request.
///
/// # Errors
///
/// Returns an error if the employee is unknown or a query fails.
pub fn list_pending_requests(
    context: &EngineContext,
    persistence: &mut Persistence,
    employee_id: &str,
) -> Result<PendingRequestsResponse, ApiError> {
    let employee_id: EmployeeId = parse_employee_id("employee_id", employee_id)?;
    let employee: Employee = resolve_actor(persistence, context, &employee_id)?;

    let mut incoming: Vec<RequestInfo> = persistence
        .list_pending_exchanges_for_approver(&employee_id)?
        .iter()
        .map(RequestInfo::from)
        .collect();
    incoming.extend(
        persistence
            .list_pending_additions_for_target(&employee_id)?
            .iter()
            .map(RequestInfo::from),
    );
    if employee.is_owner() {
        incoming.extend(
            persistence
                .list_pending_deletions()?
                .iter()
                .map(RequestInfo::from),
        );
    }

    let mut outgoing: Vec<RequestInfo> = persistence
        .list_pending_exchanges_by_requester(&employee_id)?
        .iter()
        .map(RequestInfo::from)
        .collect();
    outgoing.extend(
        persistence
            .list_pending_deletions_by_requester(&employee_id)?
            .iter()
            .map(RequestInfo::from),
    );

    Ok(PendingRequestsResponse { incoming, outgoing })
}
