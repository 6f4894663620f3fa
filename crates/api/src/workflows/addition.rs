// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The owner asking employees to work extra hours.

use shiftbot::{Confirmation, ConversationStep, Reply, parse_index, split_selection};
use shiftbot_domain::{
    Availability, Candidate, Employee, EmployeeId, Shift, TimeRange, available_and_overlapping,
    match_candidates, parse_time_range_input,
};
use shiftbot_persistence::Persistence;
use time::{Date, OffsetDateTime};

use super::{StepOutcome, finish_on_error, read_upcoming_date, reprompt};
use crate::auth::{AuthorizationService, resolve_actor};
use crate::context::EngineContext;
use crate::error::ApiError;
use crate::messages::{describe_slot, names, numbered};
use crate::ports::RosterEntry;
use crate::submissions::{Submission, submit_additions};

const DATE_PROMPT: &str = "Which day needs extra hands? (YYYY-MM-DD, MM/DD, today or tomorrow)";
const TIME_PROMPT: &str = "Which hours? For example 18:00-22:00.";

/// Opens the dialogue for the owner.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` if the employee is not the owner.
pub fn start(owner: &Employee) -> Result<StepOutcome, ApiError> {
    AuthorizationService::authorize_request_addition(owner)?;
    Ok(StepOutcome::Advance(
        ConversationStep::WaitingForAdditionDate {
            owner_id: owner.employee_id.clone(),
        },
        Reply::text(DATE_PROMPT),
    ))
}

/// Reads the day of the extra hours.
#[must_use]
pub fn on_date(
    context: &EngineContext,
    owner_id: &EmployeeId,
    input: &str,
    now: OffsetDateTime,
) -> StepOutcome {
    match read_upcoming_date(context, input, now) {
        Ok(date) => StepOutcome::Advance(
            ConversationStep::WaitingForAdditionTime {
                owner_id: owner_id.clone(),
                date,
            },
            Reply::text(TIME_PROMPT),
        ),
        Err(e) => reprompt(&e, DATE_PROMPT),
    }
}

/// Reads the hours and lists the roster, marking who already works then.
///
/// # Errors
///
/// Returns an error if shifts cannot be loaded.
pub fn on_time(
    context: &EngineContext,
    persistence: &mut Persistence,
    owner_id: &EmployeeId,
    date: Date,
    input: &str,
) -> Result<StepOutcome, ApiError> {
    let range: TimeRange = match parse_time_range_input(input) {
        Ok(range) => range,
        Err(e) => return Ok(reprompt(&ApiError::from(e), TIME_PROMPT)),
    };

    let candidates: Vec<Candidate> = context
        .roster_entries()
        .iter()
        .map(RosterEntry::as_candidate)
        .collect();
    if candidates.is_empty() {
        return Ok(StepOutcome::Finish(Reply::text(
            "The roster is unavailable right now, so nobody can be asked.",
        )));
    }

    let shifts_on_day: Vec<Shift> = persistence.list_shifts_on(date)?;
    let availability: Availability =
        available_and_overlapping(&candidates, date, &range, &shifts_on_day);
    let slot: String = describe_slot(date, &range);
    if availability.available.is_empty() {
        return Ok(StepOutcome::Stay(Reply::text(format!(
            "Everyone already works during {slot}. {TIME_PROMPT}"
        ))));
    }

    let listing: String = numbered(candidates.iter().map(|c| {
        if availability.overlapping.contains(c) {
            format!("{} (already working)", c.display_name)
        } else {
            c.display_name.clone()
        }
    }));
    Ok(StepOutcome::Advance(
        ConversationStep::WaitingForAdditionEmployees {
            owner_id: owner_id.clone(),
            date,
            range,
            candidates,
        },
        Reply::text(format!(
            "Who should be asked to work {slot}? Answer with numbers or names separated by commas.\n{listing}"
        )),
    ))
}

/// Resolves one comma-separated item to a single candidate.
fn resolve_item(item: &str, candidates: &[Candidate]) -> Result<Candidate, String> {
    if let Some(candidate) = parse_index(item, candidates.len()).and_then(|i| candidates.get(i)) {
        return Ok(candidate.clone());
    }
    match match_candidates(item, candidates).as_slice() {
        [] => Err(format!("No one on the list matches '{item}'.")),
        [only] => Ok((*only).clone()),
        several => Err(format!(
            "'{item}' matches several people: {}. Please be more specific.",
            several
                .iter()
                .map(|c| c.display_name.as_str())
                .collect::<Vec<&str>>()
                .join(", ")
        )),
    }
}

/// Reads the chosen employees and asks for confirmation.
///
/// Employees who already work during the hours are dropped and named in
/// the confirmation prompt.
///
/// # Errors
///
/// Returns an error if shifts cannot be loaded.
pub fn on_employees(
    persistence: &mut Persistence,
    owner_id: &EmployeeId,
    date: Date,
    range: TimeRange,
    candidates: &[Candidate],
    input: &str,
) -> Result<StepOutcome, ApiError> {
    let items: Vec<String> = split_selection(input);
    if items.is_empty() {
        return Ok(StepOutcome::Stay(Reply::text(
            "Answer with numbers or names separated by commas.",
        )));
    }

    let mut picked: Vec<Candidate> = Vec::with_capacity(items.len());
    for item in &items {
        match resolve_item(item, candidates) {
            Ok(candidate) => {
                if !picked.contains(&candidate) {
                    picked.push(candidate);
                }
            }
            Err(message) => return Ok(StepOutcome::Stay(Reply::text(message))),
        }
    }

    let shifts_on_day: Vec<Shift> = persistence.list_shifts_on(date)?;
    let availability: Availability =
        available_and_overlapping(&picked, date, &range, &shifts_on_day);
    if availability.available.is_empty() {
        return Ok(StepOutcome::Stay(Reply::text(format!(
            "Everyone you picked already works then: {}. Please pick others.",
            names(&availability.overlapping)
        ))));
    }

    let mut text: String = format!(
        "Ask {} to work {}?",
        names(&availability.available),
        describe_slot(date, &range)
    );
    if !availability.overlapping.is_empty() {
        text.push_str(&format!(
            " {} will be skipped because they already work then.",
            names(&availability.overlapping)
        ));
    }
    text.push_str(" (yes/no)");

    Ok(StepOutcome::Advance(
        ConversationStep::WaitingForAdditionConfirmation {
            owner_id: owner_id.clone(),
            date,
            range,
            targets: availability.available,
        },
        Reply::text(text),
    ))
}

/// Sends the requests on "yes", abandons them on "no".
///
/// # Errors
///
/// Returns an error only on storage failures; rule violations end the
/// dialogue with an explanation.
pub fn on_confirmation(
    context: &EngineContext,
    persistence: &mut Persistence,
    owner_id: &EmployeeId,
    slot: (Date, TimeRange),
    targets: &[Candidate],
    input: &str,
    now: OffsetDateTime,
) -> Result<StepOutcome, ApiError> {
    match Confirmation::parse(input) {
        None => Ok(StepOutcome::Stay(Reply::text("Please answer yes or no."))),
        Some(Confirmation::No) => Ok(StepOutcome::Finish(Reply::text(
            "Cancelled. No request was sent.",
        ))),
        Some(Confirmation::Yes) => {
            let (date, range) = slot;
            let result = resolve_actor(persistence, context, owner_id).and_then(|owner| {
                submit_additions(context, persistence, &owner, date, range, targets, now)
            });
            finish_on_error(result.map(|submission| confirmation_text(targets, &submission)))
        }
    }
}

fn confirmation_text(targets: &[Candidate], submission: &Submission) -> Reply {
    let asked: Vec<Candidate> = targets
        .iter()
        .filter(|t| !submission.excluded.contains(t))
        .cloned()
        .collect();
    let mut text: String = format!(
        "Sent {} request(s) to {}.",
        submission.created.len(),
        names(&asked)
    );
    if !submission.excluded.is_empty() {
        text.push_str(&format!(
            " Skipped because they now work then: {}.",
            names(&submission.excluded)
        ));
    }
    Reply::text(text)
}
