// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Asking the owner to remove one of one's own shifts.

use shiftbot::{ConversationStep, Postback, Reply, parse_index};
use shiftbot_domain::{Employee, EmployeeId, Shift, ensure_not_past, format_date, validate_reason};
use shiftbot_persistence::Persistence;
use time::{Date, OffsetDateTime};

use super::{StepOutcome, finish_on_error, read_upcoming_date, reprompt, shift_choices};
use crate::auth::AuthorizationService;
use crate::context::EngineContext;
use crate::error::ApiError;
use crate::messages::describe_slot;
use crate::submissions::submit_deletion;

const DATE_PROMPT: &str =
    "Which day is the shift you want removed? (YYYY-MM-DD, MM/DD, today or tomorrow)";

/// Opens the dialogue.
#[must_use]
pub fn start(requester: &Employee) -> StepOutcome {
    StepOutcome::Advance(
        ConversationStep::WaitingForDeletionDate {
            requester_id: requester.employee_id.clone(),
        },
        Reply::text(DATE_PROMPT),
    )
}

/// Lists the requester's shifts on the typed day.
///
/// # Errors
///
/// Returns an error if shifts cannot be loaded.
pub fn on_date(
    context: &EngineContext,
    persistence: &mut Persistence,
    requester_id: &EmployeeId,
    input: &str,
    now: OffsetDateTime,
) -> Result<StepOutcome, ApiError> {
    let date: Date = match read_upcoming_date(context, input, now) {
        Ok(date) => date,
        Err(e) => return Ok(reprompt(&e, DATE_PROMPT)),
    };

    let shifts: Vec<Shift> = persistence.list_shifts_for_employee_on(requester_id, date)?;
    if shifts.is_empty() {
        return Ok(StepOutcome::Stay(Reply::text(format!(
            "You have no shift on {}. {DATE_PROMPT}",
            format_date(date)
        ))));
    }

    let reply: Reply = shift_choices(
        &format!("Your shifts on {}. Which one should be removed?", format_date(date)),
        &shifts,
        |shift_id| Postback::SelectDeletionShift { shift_id },
    );
    Ok(StepOutcome::Advance(
        ConversationStep::WaitingForDeletionShift {
            requester_id: requester_id.clone(),
            date,
            shift_ids: shifts.iter().map(|s| s.shift_id).collect(),
        },
        reply,
    ))
}

/// Reads the number of one of the listed shifts.
///
/// # Errors
///
/// Returns an error if the chosen shift cannot be removed.
pub fn on_shift(
    context: &EngineContext,
    persistence: &mut Persistence,
    requester_id: &EmployeeId,
    shift_ids: &[i64],
    input: &str,
    now: OffsetDateTime,
) -> Result<StepOutcome, ApiError> {
    match parse_index(input, shift_ids.len()).and_then(|i| shift_ids.get(i)) {
        Some(&shift_id) => select_shift(context, persistence, requester_id, shift_id, now),
        None => Ok(StepOutcome::Stay(Reply::text(format!(
            "Please answer with a number from 1 to {}.",
            shift_ids.len()
        )))),
    }
}

/// Picks the shift to remove and asks for the reason.
///
/// Also reached by pressing a shift button, whatever step the user is in.
///
/// # Errors
///
/// Returns an error if the shift is gone, belongs to someone else, or has
/// already passed.
pub fn select_shift(
    context: &EngineContext,
    persistence: &mut Persistence,
    requester_id: &EmployeeId,
    shift_id: i64,
    now: OffsetDateTime,
) -> Result<StepOutcome, ApiError> {
    let shift: Shift = persistence
        .get_shift(shift_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Shift"),
            message: String::from("That shift no longer exists."),
        })?;
    AuthorizationService::authorize_shift_holder(
        requester_id,
        &shift.employee_id,
        "remove this shift",
    )?;
    ensure_not_past(shift.date, context.today(now))?;

    if persistence.has_pending_deletion(shift_id)? {
        return Ok(StepOutcome::Finish(Reply::text(
            "A removal request for this shift is already waiting for the owner.",
        )));
    }

    Ok(StepOutcome::Advance(
        ConversationStep::WaitingForDeletionReason {
            requester_id: requester_id.clone(),
            shift_id,
        },
        Reply::text(format!(
            "Why should your shift on {} be removed?",
            describe_slot(shift.date, &shift.range)
        )),
    ))
}

/// Reads the reason and sends the request to the owner.
///
/// # Errors
///
/// Returns an error only on storage failures; rule violations end the
/// dialogue with an explanation.
pub fn on_reason(
    context: &EngineContext,
    persistence: &mut Persistence,
    requester_id: &EmployeeId,
    shift_id: i64,
    input: &str,
    now: OffsetDateTime,
) -> Result<StepOutcome, ApiError> {
    if let Err(e) = validate_reason(input) {
        return Ok(reprompt(&ApiError::from(e), "Please tell the owner why."));
    }
    finish_on_error(
        submit_deletion(context, persistence, requester_id, shift_id, input, now).map(|_| {
            Reply::text("Your removal request has been sent to the owner.")
        }),
    )
}
