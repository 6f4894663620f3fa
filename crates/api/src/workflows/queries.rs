// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! One-shot commands: help, schedule listings and the pending inbox.

use std::collections::BTreeMap;

use shiftbot::{Command, CommandVocabulary, Postback, Reply};
use shiftbot_domain::{Decision, Employee, RequestId, RequestKind, Shift, format_date};
use shiftbot_persistence::Persistence;
use time::{Date, Duration, OffsetDateTime};

use crate::context::{Directory, EngineContext};
use crate::error::ApiError;
use crate::messages::describe_slot;

/// Lists every command with its phrases.
#[must_use]
pub fn help(vocabulary: &CommandVocabulary) -> Reply {
    let lines: Vec<String> = Command::ALL
        .iter()
        .map(|command| {
            format!(
                "- {}: {}",
                vocabulary.phrases_for(*command).join(" / "),
                command.description()
            )
        })
        .collect();
    Reply::text(format!("Available commands:\n{}", lines.join("\n")))
}

fn window(context: &EngineContext, now: OffsetDateTime, days: i64) -> (Date, Date) {
    let from: Date = context.today(now);
    let to: Date = from.saturating_add(Duration::days(days.max(1) - 1));
    (from, to)
}

/// Lists the employee's own upcoming shifts.
///
/// # Errors
///
/// Returns an error if shifts cannot be loaded.
pub fn my_shifts(
    context: &EngineContext,
    persistence: &mut Persistence,
    employee: &Employee,
    now: OffsetDateTime,
) -> Result<Reply, ApiError> {
    let days: i64 = context.config().show_my_shifts_days;
    let (from, to) = window(context, now, days);
    let shifts: Vec<Shift> =
        persistence.list_shifts_between(from, to, Some(&employee.employee_id))?;
    if shifts.is_empty() {
        return Ok(Reply::text(format!(
            "You have no shifts in the next {days} days."
        )));
    }

    let directory: Directory = context.directory();
    let lines: Vec<String> = shifts
        .iter()
        .map(|shift| {
            let slot: String = describe_slot(shift.date, &shift.range);
            match &shift.original_employee_id {
                Some(original) if shift.is_modified && original != &employee.employee_id => {
                    format!("{slot} (from {})", directory.name(original))
                }
                _ => slot,
            }
        })
        .collect();
    Ok(Reply::text(format!("Your shifts:\n{}", lines.join("\n"))))
}

/// Lists everyone's shifts for the coming days, grouped by day.
///
/// # Errors
///
/// Returns an error if shifts cannot be loaded.
pub fn all_shifts(
    context: &EngineContext,
    persistence: &mut Persistence,
    now: OffsetDateTime,
) -> Result<Reply, ApiError> {
    let days: i64 = context.config().show_all_shifts_days;
    let (from, to) = window(context, now, days);
    let shifts: Vec<Shift> = persistence.list_shifts_between(from, to, None)?;
    if shifts.is_empty() {
        return Ok(Reply::text(format!("No shifts in the next {days} days.")));
    }

    let directory: Directory = context.directory();
    let mut by_day: BTreeMap<Date, Vec<String>> = BTreeMap::new();
    for shift in &shifts {
        by_day
            .entry(shift.date)
            .or_default()
            .push(format!("  {} {}", shift.range, directory.name(&shift.employee_id)));
    }

    let sections: Vec<String> = by_day
        .into_iter()
        .map(|(date, lines)| format!("{}\n{}", format_date(date), lines.join("\n")))
        .collect();
    Ok(Reply::text(sections.join("\n")))
}

/// Accumulates inbox lines and their buttons.
struct Inbox {
    lines: Vec<String>,
    actions: Vec<(String, Postback)>,
}

impl Inbox {
    const fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    fn push(
        &mut self,
        line: &str,
        kind: RequestKind,
        request_id: &RequestId,
        decisions: &[Decision],
    ) {
        let number: usize = self.lines.len() + 1;
        self.lines.push(format!("{number}. {line}"));
        for decision in decisions {
            let label: &str = match decision {
                Decision::Approve => "Approve",
                Decision::Reject => "Reject",
                Decision::Cancel => "Cancel",
            };
            self.actions.push((
                format!("{label} {number}"),
                Postback::Decide {
                    kind,
                    decision: *decision,
                    request_id: request_id.clone(),
                },
            ));
        }
    }

    fn into_reply(self) -> Reply {
        if self.lines.is_empty() {
            return Reply::text("You have no pending requests.");
        }
        let text: String = format!("Pending requests:\n{}", self.lines.join("\n"));
        self.actions
            .iter()
            .fold(Reply::text(text), |reply, (label, postback)| {
                reply.with_action(label.as_str(), postback)
            })
    }
}

const RESPOND: [Decision; 2] = [Decision::Approve, Decision::Reject];

/// Lists requests waiting on the employee, and their own open requests.
///
/// Requests the employee can decide come with approve/reject buttons;
/// their own exchange offers come with a cancel button. The owner also
/// sees every pending removal request.
///
/// # Errors
///
/// Returns an error if requests cannot be loaded.
pub fn pending(
    context: &EngineContext,
    persistence: &mut Persistence,
    employee: &Employee,
) -> Result<Reply, ApiError> {
    let directory: Directory = context.directory();
    let me = &employee.employee_id;
    let mut inbox = Inbox::new();

    for request in persistence.list_pending_exchanges_for_approver(me)? {
        inbox.push(
            &format!(
                "{} asks you to take {}",
                directory.name(&request.requester_id),
                describe_slot(request.shift_date, &request.shift_range)
            ),
            RequestKind::Exchange,
            &request.request_id,
            &RESPOND,
        );
    }
    for request in persistence.list_pending_additions_for_target(me)? {
        inbox.push(
            &format!(
                "{} asks you to work extra hours {}",
                directory.name(&request.requester_id),
                describe_slot(request.shift_date, &request.shift_range)
            ),
            RequestKind::Addition,
            &request.request_id,
            &RESPOND,
        );
    }
    if employee.is_owner() {
        for request in persistence.list_pending_deletions()? {
            inbox.push(
                &format!(
                    "{} wants {} removed: {}",
                    directory.name(&request.requester_id),
                    describe_slot(request.shift_date, &request.shift_range),
                    request.reason
                ),
                RequestKind::Deletion,
                &request.request_id,
                &RESPOND,
            );
        }
    }
    for request in persistence.list_pending_exchanges_by_requester(me)? {
        inbox.push(
            &format!(
                "Waiting for {} to take your shift {}",
                directory.name(&request.approver_id),
                describe_slot(request.shift_date, &request.shift_range)
            ),
            RequestKind::Exchange,
            &request.request_id,
            &[Decision::Cancel],
        );
    }
    for request in persistence.list_pending_deletions_by_requester(me)? {
        inbox.push(
            &format!(
                "Waiting for the owner to remove your shift {}",
                describe_slot(request.shift_date, &request.shift_range)
            ),
            RequestKind::Deletion,
            &request.request_id,
            &[],
        );
    }

    Ok(inbox.into_reply())
}
