// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Handing one's shift to a colleague.
//!
//! date -> shift -> colleague -> confirmation. The colleague list is
//! filtered to people who are free during the shift; anyone already working
//! then is named but cannot be picked.

use shiftbot::{Confirmation, ConversationStep, Postback, Reply, parse_index};
use shiftbot_domain::{
    Availability, Candidate, Employee, EmployeeId, Shift, available_and_overlapping,
    ensure_not_past, format_date, match_candidates,
};
use shiftbot_persistence::Persistence;
use time::{Date, OffsetDateTime};

use super::{StepOutcome, finish_on_error, read_upcoming_date, reprompt, shift_choices};
use crate::auth::AuthorizationService;
use crate::context::EngineContext;
use crate::error::ApiError;
use crate::messages::{describe_slot, names, numbered};
use crate::ports::RosterEntry;
use crate::submissions::submit_exchange;

const DATE_PROMPT: &str =
    "Which day is the shift you want to hand over? (YYYY-MM-DD, MM/DD, today or tomorrow)";

/// Opens the dialogue.
#[must_use]
pub fn start(requester: &Employee) -> StepOutcome {
    StepOutcome::Advance(
        ConversationStep::WaitingForShiftDate {
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
pub fn on_shift_date(
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
        &format!("Your shifts on {}. Which one do you want to hand over?", format_date(date)),
        &shifts,
        |shift_id| Postback::SelectExchangeShift { shift_id },
    );
    Ok(StepOutcome::Advance(
        ConversationStep::WaitingForShiftSelection {
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
/// Returns an error if the chosen shift cannot be offered.
pub fn on_shift_selection(
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

/// Picks the shift to hand over and lists who could take it.
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
        "offer this shift",
    )?;
    ensure_not_past(shift.date, context.today(now))?;

    let colleagues: Vec<Candidate> = context
        .roster_entries()
        .iter()
        .map(RosterEntry::as_candidate)
        .filter(|c| &c.employee_id != requester_id)
        .collect();
    let shifts_on_day: Vec<Shift> = persistence.list_shifts_on(shift.date)?;
    let availability: Availability =
        available_and_overlapping(&colleagues, shift.date, &shift.range, &shifts_on_day);
    let slot: String = describe_slot(shift.date, &shift.range);

    if availability.available.is_empty() {
        return Ok(StepOutcome::Advance(
            ConversationStep::WaitingForShiftDate {
                requester_id: requester_id.clone(),
            },
            Reply::text(format!(
                "Nobody is free during {slot}. Pick another day. {DATE_PROMPT}"
            )),
        ));
    }

    let mut text: String = format!(
        "Who should take your shift on {slot}? Answer with a number or a name.\n{}",
        numbered(availability.available.iter().map(|c| c.display_name.as_str()))
    );
    if !availability.overlapping.is_empty() {
        text.push_str(&format!(
            "\n(Already working then: {})",
            names(&availability.overlapping)
        ));
    }
    Ok(StepOutcome::Advance(
        ConversationStep::WaitingForEmployeeSelectionExchange {
            requester_id: requester_id.clone(),
            shift_id,
            candidates: availability.available,
        },
        Reply::text(text),
    ))
}

/// Resolves the typed number or name to one colleague.
///
/// Several name matches narrow the list and ask again.
#[must_use]
pub fn on_employee_selection(
    requester_id: &EmployeeId,
    shift_id: i64,
    candidates: &[Candidate],
    input: &str,
) -> StepOutcome {
    let chosen: Vec<Candidate> = match parse_index(input, candidates.len()) {
        Some(i) => candidates.get(i).cloned().into_iter().collect(),
        None => match_candidates(input, candidates)
            .into_iter()
            .cloned()
            .collect(),
    };

    match chosen.as_slice() {
        [] => StepOutcome::Stay(Reply::text(format!(
            "No one on the list matches '{}'. Answer with a number or a name.\n{}",
            input.trim(),
            numbered(candidates.iter().map(|c| c.display_name.as_str()))
        ))),
        [approver] => StepOutcome::Advance(
            ConversationStep::WaitingForConfirmationExchange {
                requester_id: requester_id.clone(),
                shift_id,
                approver: approver.clone(),
            },
            Reply::text(format!(
                "Ask {} to take your shift? (yes/no)",
                approver.display_name
            )),
        ),
        several => StepOutcome::Advance(
            ConversationStep::WaitingForEmployeeSelectionExchange {
                requester_id: requester_id.clone(),
                shift_id,
                candidates: several.to_vec(),
            },
            Reply::text(format!(
                "Several people match. Which one?\n{}",
                numbered(several.iter().map(|c| c.display_name.as_str()))
            )),
        ),
    }
}

/// Sends the request on "yes", abandons it on "no".
///
/// # Errors
///
/// Returns an error only on storage failures; rule violations end the
/// dialogue with an explanation.
pub fn on_confirmation(
    context: &EngineContext,
    persistence: &mut Persistence,
    requester_id: &EmployeeId,
    shift_id: i64,
    approver: &Candidate,
    input: &str,
    now: OffsetDateTime,
) -> Result<StepOutcome, ApiError> {
    match Confirmation::parse(input) {
        None => Ok(StepOutcome::Stay(Reply::text("Please answer yes or no."))),
        Some(Confirmation::No) => Ok(StepOutcome::Finish(Reply::text(
            "Cancelled. No request was sent.",
        ))),
        Some(Confirmation::Yes) => finish_on_error(
            submit_exchange(
                context,
                persistence,
                requester_id,
                shift_id,
                std::slice::from_ref(approver),
                now,
            )
            .map(|_| {
                Reply::text(format!(
                    "Sent your request to {}. You will be notified when they respond.",
                    approver.display_name
                ))
            }),
        ),
    }
}
