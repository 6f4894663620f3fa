// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Creating requests.
//!
//! Both the chat workflows and the synchronous API end here, so the
//! overlap filter, the duplicate check and the notifications are the same
//! whichever way a request arrives.

use shiftbot_domain::{
    AdditionRequest, Availability, Candidate, DeletionRequest, Employee, EmployeeId,
    ExchangeRequest, RequestId, RequestKind, RequestStatus, Shift, TimeRange,
    available_and_overlapping, ensure_not_past, validate_reason,
};
use shiftbot_persistence::Persistence;
use time::{Date, OffsetDateTime};
use tracing::info;

use crate::auth::AuthorizationService;
use crate::context::{Directory, EngineContext};
use crate::error::ApiError;
use crate::messages::{describe_slot, names};
use crate::ports::{NotificationEvent, NotificationKind};

/// The requests created by one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Identifiers of the created requests, one per recipient.
    pub created: Vec<RequestId>,
    /// Recipients left out because they already work during the hours.
    pub excluded: Vec<Candidate>,
}

/// Builds a notification for `recipient`.
#[must_use]
pub fn notification(
    kind: NotificationKind,
    request_kind: RequestKind,
    request_id: &RequestId,
    recipient: &EmployeeId,
    message: String,
) -> NotificationEvent {
    NotificationEvent {
        kind,
        request_kind,
        request_id: request_id.clone(),
        recipient: recipient.clone(),
        message,
    }
}

fn load_own_shift(
    persistence: &mut Persistence,
    requester_id: &EmployeeId,
    shift_id: i64,
    action: &str,
) -> Result<Shift, ApiError> {
    let shift: Shift = persistence
        .get_shift(shift_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Shift"),
            message: String::from("That shift no longer exists."),
        })?;
    AuthorizationService::authorize_shift_holder(requester_id, &shift.employee_id, action)?;
    Ok(shift)
}

fn dedupe(candidates: &[Candidate]) -> Vec<Candidate> {
    let mut unique: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !unique.iter().any(|c| c.employee_id == candidate.employee_id) {
            unique.push(candidate.clone());
        }
    }
    unique
}

fn partition(
    persistence: &mut Persistence,
    candidates: &[Candidate],
    date: Date,
    range: &TimeRange,
) -> Result<Availability, ApiError> {
    let shifts_on_day: Vec<Shift> = persistence.list_shifts_on(date)?;
    Ok(available_and_overlapping(candidates, date, range, &shifts_on_day))
}

/// Offers a shift to one or more colleagues.
///
/// Colleagues who already work during the shift are left out and
/// reported. The remaining requests are stored as one batch.
///
/// # Errors
///
/// Returns an error if the shift is missing, not the requester's, or in the
/// past, if no approver is free, or if any request duplicates a pending one.
pub fn submit_exchange(
    context: &EngineContext,
    persistence: &mut Persistence,
    requester_id: &EmployeeId,
    shift_id: i64,
    approvers: &[Candidate],
    now: OffsetDateTime,
) -> Result<Submission, ApiError> {
    let shift: Shift = load_own_shift(persistence, requester_id, shift_id, "offer this shift")?;
    ensure_not_past(shift.date, context.today(now))?;

    let approvers: Vec<Candidate> = dedupe(approvers);
    if approvers.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("approver_ids"),
            message: String::from("Choose at least one colleague."),
        });
    }
    if approvers.iter().any(|c| &c.employee_id == requester_id) {
        return Err(ApiError::InvalidInput {
            field: String::from("approver_ids"),
            message: String::from("You cannot hand a shift to yourself."),
        });
    }

    let availability: Availability = partition(persistence, &approvers, shift.date, &shift.range)?;
    if availability.available.is_empty() {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("no_available_approvers"),
            message: format!(
                "Nobody can take that shift: {} already work then.",
                names(&availability.overlapping)
            ),
        });
    }

    let requests: Vec<ExchangeRequest> = availability
        .available
        .iter()
        .map(|approver| ExchangeRequest {
            request_id: RequestId::generate(RequestKind::Exchange, now),
            requester_id: requester_id.clone(),
            approver_id: approver.employee_id.clone(),
            shift_id: Some(shift.shift_id),
            shift_date: shift.date,
            shift_range: shift.range,
            status: RequestStatus::Pending,
            requested_at: now,
            responded_at: None,
        })
        .collect();
    persistence.create_exchange_requests(&requests)?;

    info!(
        requester_id = %requester_id,
        shift_id = shift.shift_id,
        created = requests.len(),
        excluded = availability.overlapping.len(),
        "Exchange requests submitted"
    );

    let directory: Directory = context.directory();
    let slot: String = describe_slot(shift.date, &shift.range);
    let events: Vec<NotificationEvent> = requests
        .iter()
        .map(|r| {
            notification(
                NotificationKind::Created,
                RequestKind::Exchange,
                &r.request_id,
                &r.approver_id,
                format!(
                    "{} asks you to take over their shift on {slot}.",
                    directory.name(requester_id)
                ),
            )
        })
        .collect();
    context.notify(&events);

    Ok(Submission {
        created: requests.into_iter().map(|r| r.request_id).collect(),
        excluded: availability.overlapping,
    })
}

/// Asks employees to work extra hours.
///
/// Targets who already work during the hours are left out and reported;
/// one request is stored per remaining target, as one batch.
///
/// # Errors
///
/// Returns an error if the requester is not the owner, the date is in the
/// past, no targets were given, or every target is busy.
pub fn submit_additions(
    context: &EngineContext,
    persistence: &mut Persistence,
    requester: &Employee,
    date: Date,
    range: TimeRange,
    targets: &[Candidate],
    now: OffsetDateTime,
) -> Result<Submission, ApiError> {
    AuthorizationService::authorize_request_addition(requester)?;
    ensure_not_past(date, context.today(now))?;

    let targets: Vec<Candidate> = dedupe(targets);
    if targets.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("target_ids"),
            message: String::from("Choose at least one employee."),
        });
    }

    let availability: Availability = partition(persistence, &targets, date, &range)?;
    if availability.available.is_empty() {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("no_available_employees"),
            message: format!(
                "Nobody can be asked: {} already work then.",
                names(&availability.overlapping)
            ),
        });
    }

    let requests: Vec<AdditionRequest> = availability
        .available
        .iter()
        .map(|target| AdditionRequest {
            request_id: RequestId::generate(RequestKind::Addition, now),
            requester_id: requester.employee_id.clone(),
            target_employee_id: target.employee_id.clone(),
            shift_date: date,
            shift_range: range,
            status: RequestStatus::Pending,
            requested_at: now,
            responded_at: None,
        })
        .collect();
    persistence.create_addition_requests(&requests)?;

    info!(
        requester_id = %requester.employee_id,
        created = requests.len(),
        excluded = availability.overlapping.len(),
        "Addition requests submitted"
    );

    let slot: String = describe_slot(date, &range);
    let events: Vec<NotificationEvent> = requests
        .iter()
        .map(|r| {
            notification(
                NotificationKind::Created,
                RequestKind::Addition,
                &r.request_id,
                &r.target_employee_id,
                format!("{} asks you to work an extra shift on {slot}.", requester.display_name),
            )
        })
        .collect();
    context.notify(&events);

    Ok(Submission {
        created: requests.into_iter().map(|r| r.request_id).collect(),
        excluded: availability.overlapping,
    })
}

/// Asks the owner to remove one of the requester's shifts.
///
/// # Errors
///
/// Returns an error if the shift is missing, not the requester's, or in the
/// past, if the reason is empty, or if a deletion is already pending.
pub fn submit_deletion(
    context: &EngineContext,
    persistence: &mut Persistence,
    requester_id: &EmployeeId,
    shift_id: i64,
    reason: &str,
    now: OffsetDateTime,
) -> Result<RequestId, ApiError> {
    let reason: String = validate_reason(reason)?;
    let shift: Shift = load_own_shift(persistence, requester_id, shift_id, "remove this shift")?;
    ensure_not_past(shift.date, context.today(now))?;

    let request = DeletionRequest {
        request_id: RequestId::generate(RequestKind::Deletion, now),
        requester_id: requester_id.clone(),
        shift_id: Some(shift.shift_id),
        shift_date: shift.date,
        shift_range: shift.range,
        reason,
        status: RequestStatus::Pending,
        requested_at: now,
        responded_at: None,
    };
    persistence.create_deletion_request(&request)?;

    info!(
        request_id = %request.request_id,
        requester_id = %requester_id,
        shift_id = shift.shift_id,
        "Deletion request submitted"
    );

    let mut owners: Vec<EmployeeId> = persistence
        .list_owners()?
        .into_iter()
        .map(|owner| owner.employee_id)
        .collect();
    if owners.is_empty() {
        owners.extend(context.config().owner_id());
    }
    let message: String = format!(
        "{} asks to remove their shift on {}. Reason: {}",
        context.directory().name(requester_id),
        describe_slot(shift.date, &shift.range),
        request.reason
    );
    let events: Vec<NotificationEvent> = owners
        .iter()
        .map(|owner| {
            notification(
                NotificationKind::Created,
                RequestKind::Deletion,
                &request.request_id,
                owner,
                message.clone(),
            )
        })
        .collect();
    context.notify(&events);

    Ok(request.request_id)
}
