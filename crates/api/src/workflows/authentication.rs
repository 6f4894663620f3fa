// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Linking a chat account to a roster employee.

use shiftbot::{ConversationStep, Reply};
use shiftbot_domain::{Candidate, Employee, EmployeeId, match_candidates};
use shiftbot_persistence::Persistence;
use time::OffsetDateTime;
use tracing::{info, warn};

use super::StepOutcome;
use crate::auth::role_for;
use crate::context::EngineContext;
use crate::error::ApiError;
use crate::messages::names;
use crate::ports::RosterEntry;

const NAME_PROMPT: &str = "Please enter your name as it appears on the roster.";

/// Opens the dialogue.
#[must_use]
pub fn start() -> StepOutcome {
    StepOutcome::Advance(ConversationStep::WaitingForEmployeeName, Reply::text(NAME_PROMPT))
}

/// Matches the typed name against the roster and links on a unique hit.
///
/// # Errors
///
/// Returns an error if the employee record cannot be stored.
pub fn on_employee_name(
    context: &EngineContext,
    persistence: &mut Persistence,
    chat_user_id: &str,
    input: &str,
    now: OffsetDateTime,
) -> Result<StepOutcome, ApiError> {
    let entries: Vec<RosterEntry> = context.roster_entries();
    if entries.is_empty() {
        return Ok(StepOutcome::Finish(Reply::text(
            "The roster is unavailable right now. Please try again later.",
        )));
    }

    let candidates: Vec<Candidate> = entries.iter().map(RosterEntry::as_candidate).collect();
    let matches: Vec<Candidate> = match_candidates(input, &candidates)
        .into_iter()
        .cloned()
        .collect();

    let chosen: Candidate = match matches.as_slice() {
        [] => {
            return Ok(StepOutcome::Stay(Reply::text(format!(
                "No employee matches '{}'. {NAME_PROMPT}",
                input.trim()
            ))));
        }
        [only] => only.clone(),
        several => {
            return Ok(StepOutcome::Stay(Reply::text(format!(
                "Several employees match: {}. Please enter your full name.",
                names(several)
            ))));
        }
    };

    let email: Option<&str> = entries
        .iter()
        .find(|e| EmployeeId::new(&e.employee_id) == chosen.employee_id)
        .and_then(|e| e.email.as_deref());
    if !context.config().is_email_allowed(email) {
        warn!(
            chat_user_id,
            employee_id = %chosen.employee_id,
            "Link refused: email not on the allow list"
        );
        return Ok(StepOutcome::Finish(Reply::text(
            "This account is not permitted to use the bot. Please contact the owner.",
        )));
    }

    let employee = Employee {
        role: role_for(context, &chosen.employee_id),
        employee_id: chosen.employee_id,
        display_name: chosen.display_name,
        chat_user_id: Some(chat_user_id.to_string()),
    };
    let linked: Employee = persistence.link_employee(&employee, now)?;
    info!(
        chat_user_id,
        employee_id = %linked.employee_id,
        role = linked.role.as_str(),
        "Chat account linked"
    );

    let mut text: String = format!(
        "Welcome, {}! Your chat account is now linked.",
        linked.display_name
    );
    if linked.is_owner() {
        text.push_str(" You are registered as the owner.");
    }
    Ok(StepOutcome::Finish(Reply::text(text)))
}
