// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::request::{Decision, RequestKind, RequestStatus};
use crate::types::EmployeeId;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Employee identifier is empty.
    InvalidEmployeeId(String),
    /// Role string is not a known role.
    InvalidRole(String),
    /// Free-form date input could not be understood.
    InvalidDate {
        /// The raw input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },
    /// The date lies before the current local day.
    PastDate {
        /// The requested date.
        date: time::Date,
        /// The current local day.
        today: time::Date,
    },
    /// Free-form time input could not be understood.
    InvalidTime(String),
    /// The end of a time range does not come after its start.
    InvalidTimeRange {
        /// Start of the rejected range.
        start: time::Time,
        /// End of the rejected range.
        end: time::Time,
    },
    /// A deletion request was submitted without a reason.
    EmptyReason,
    /// Request identifier is malformed.
    InvalidRequestId(String),
    /// Request status string is not a known status.
    InvalidRequestStatus(String),
    /// Decision string is not a known decision.
    InvalidDecision(String),
    /// The actor may not perform the action.
    NotAuthorized {
        /// The attempted action.
        action: String,
        /// Who is allowed to perform it.
        requirement: String,
    },
    /// The request has already left the pending state.
    AlreadyProcessed {
        /// The request identifier.
        request_id: String,
        /// The status the request currently holds.
        status: RequestStatus,
    },
    /// An identical pending request already exists.
    DuplicatePendingRequest {
        /// Which kind of request was duplicated.
        kind: RequestKind,
        /// Description of the duplicated request.
        detail: String,
    },
    /// The shift referenced by a request no longer exists.
    ShiftNoLongerAvailable {
        /// The request identifier.
        request_id: String,
    },
    /// The decision is not meaningful for this kind of request.
    UnsupportedDecision {
        /// The request kind.
        kind: RequestKind,
        /// The attempted decision.
        decision: Decision,
    },
    /// The employee already works during the requested time.
    OverlappingShift {
        /// The employee whose schedule conflicts.
        employee_id: EmployeeId,
        /// Date of the conflicting shift.
        date: time::Date,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmployeeId(msg) => write!(f, "Invalid employee id: {msg}"),
            Self::InvalidRole(role) => write!(f, "Invalid role: {role}"),
            Self::InvalidDate { input, reason } => {
                write!(f, "Invalid date '{input}': {reason}")
            }
            Self::PastDate { date, today } => {
                write!(f, "Date {date} is in the past (today is {today})")
            }
            Self::InvalidTime(input) => write!(f, "Invalid time '{input}'"),
            Self::InvalidTimeRange { start, end } => write!(
                f,
                "Invalid time range: end {} must be after start {}",
                crate::format_time(*end),
                crate::format_time(*start)
            ),
            Self::EmptyReason => write!(f, "A reason is required"),
            Self::InvalidRequestId(id) => write!(f, "Invalid request id '{id}'"),
            Self::InvalidRequestStatus(status) => write!(f, "Invalid request status '{status}'"),
            Self::InvalidDecision(decision) => write!(f, "Invalid decision '{decision}'"),
            Self::NotAuthorized {
                action,
                requirement,
            } => write!(f, "Not authorized to {action}: {requirement}"),
            Self::AlreadyProcessed { request_id, status } => {
                write!(f, "Request {request_id} has already been {status}")
            }
            Self::DuplicatePendingRequest { kind, detail } => {
                write!(f, "A pending {kind} request already exists: {detail}")
            }
            Self::ShiftNoLongerAvailable { request_id } => write!(
                f,
                "The shift referenced by request {request_id} no longer exists"
            ),
            Self::UnsupportedDecision { kind, decision } => {
                write!(f, "Cannot {decision} a {kind} request")
            }
            Self::OverlappingShift { employee_id, date } => write!(
                f,
                "Employee {employee_id} already has an overlapping shift on {date}"
            ),
        }
    }
}

impl std::error::Error for DomainError {}
