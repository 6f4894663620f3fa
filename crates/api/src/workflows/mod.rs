// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Step handlers of the multi-turn dialogues.
//!
//! Each handler receives the payload of the step the user is in and the
//! text they sent, and says where the dialogue goes next. Handlers never
//! touch the stored conversation state themselves; the router applies the
//! returned [`StepOutcome`].

pub mod addition;
pub mod authentication;
pub mod deletion;
pub mod exchange;
pub mod queries;

use shiftbot::{Postback, Reply};
use shiftbot_domain::{Shift, ensure_not_past, parse_date_input};
use time::{Date, OffsetDateTime};

use crate::context::EngineContext;
use crate::error::ApiError;
use crate::messages::numbered;

/// Where a dialogue goes after one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Store `step` as the new position and send the reply.
    Advance(shiftbot::ConversationStep, Reply),
    /// Keep the current position and send the reply.
    Stay(Reply),
    /// End the dialogue and send the reply.
    Finish(Reply),
}

/// Re-prompts after invalid input, keeping the current step.
fn reprompt(err: &ApiError, prompt: &str) -> StepOutcome {
    StepOutcome::Stay(Reply::text(format!("{}\n{prompt}", err.user_message())))
}

/// Reads a typed date that is today or later in local time.
fn read_upcoming_date(
    context: &EngineContext,
    input: &str,
    now: OffsetDateTime,
) -> Result<Date, ApiError> {
    let today: Date = context.today(now);
    let date: Date = parse_date_input(input, today)?;
    ensure_not_past(date, today)?;
    Ok(date)
}

/// Ends the dialogue with the error text, unless the error is internal.
///
/// Used at the final step, where answering again cannot fix the problem.
fn finish_on_error(result: Result<Reply, ApiError>) -> Result<StepOutcome, ApiError> {
    match result {
        Ok(reply) => Ok(StepOutcome::Finish(reply)),
        Err(e @ ApiError::Internal { .. }) => Err(e),
        Err(e) => Ok(StepOutcome::Finish(Reply::text(e.user_message()))),
    }
}

/// Lists shifts as numbered choices, each with a button.
fn shift_choices<F>(heading: &str, shifts: &[Shift], postback: F) -> Reply
where
    F: Fn(i64) -> Postback,
{
    let text: String = format!(
        "{heading}\n{}\nAnswer with the number or press a button.",
        numbered(shifts.iter().map(|s| s.range.to_string()))
    );
    shifts
        .iter()
        .enumerate()
        .fold(Reply::text(text), |reply, (i, shift)| {
            reply.with_action(format!("{}. {}", i + 1, shift.range), &postback(shift.shift_id))
        })
}
