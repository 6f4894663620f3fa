// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates travel as `YYYY-MM-DD` and times as `HH:MM` strings; the handlers
//! parse them strictly, unlike the chat dialogues.

use serde::{Deserialize, Serialize};
use shiftbot_domain::{
    AdditionRequest, Decision, DeletionRequest, ExchangeRequest, RequestKind, RequestStatus, Shift,
    format_date, format_time,
};

use crate::context::Directory;

/// API request to seed a shift directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateShiftRequest {
    /// The employee creating the shift; must be the owner.
    pub actor_id: String,
    /// The employee who will work the shift.
    pub employee_id: String,
    /// Day of the shift.
    pub date: String,
    /// Start time.
    pub start: String,
    /// End time.
    pub end: String,
}

/// A shift as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftInfo {
    /// Database identifier.
    pub shift_id: i64,
    /// The employee working the shift.
    pub employee_id: String,
    /// The employee's roster name.
    pub employee_name: String,
    /// Day of the shift.
    pub date: String,
    /// Start time.
    pub start: String,
    /// End time.
    pub end: String,
    /// Whether an approved request produced or reshaped the shift.
    pub is_modified: bool,
    /// Previous holder of the hours, if any.
    pub original_employee_id: Option<String>,
}

impl ShiftInfo {
    /// Builds the API view of a shift.
    #[must_use]
    pub fn from_shift(shift: &Shift, directory: &Directory) -> Self {
        Self {
            shift_id: shift.shift_id,
            employee_id: shift.employee_id.value().to_string(),
            employee_name: directory.name(&shift.employee_id),
            date: format_date(shift.date),
            start: format_time(shift.range.start()),
            end: format_time(shift.range.end()),
            is_modified: shift.is_modified,
            original_employee_id: shift
                .original_employee_id
                .as_ref()
                .map(|id| id.value().to_string()),
        }
    }
}

/// API response for a created shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateShiftResponse {
    /// The stored shift.
    pub shift: ShiftInfo,
    /// A success message.
    pub message: String,
}

/// API request to list shifts in a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListShiftsRequest {
    /// First day, inclusive.
    pub from: String,
    /// Last day, inclusive.
    pub to: String,
    /// Restrict to one employee.
    #[serde(default)]
    pub employee_id: Option<String>,
}

/// API response listing shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListShiftsResponse {
    /// Shifts ordered by day and start time.
    pub shifts: Vec<ShiftInfo>,
}

/// API request to offer a shift to one or more colleagues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateExchangeRequestsRequest {
    /// The shift holder.
    pub requester_id: String,
    /// The shift to hand over.
    pub shift_id: i64,
    /// Colleagues to ask; one request is created per free colleague.
    pub approver_ids: Vec<String>,
}

/// API request to ask employees to work extra hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAdditionRequestsRequest {
    /// The owner.
    pub requester_id: String,
    /// Employees to ask.
    pub target_ids: Vec<String>,
    /// Day of the extra hours.
    pub date: String,
    /// Start time.
    pub start: String,
    /// End time.
    pub end: String,
}

/// API request to ask the owner to remove a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDeletionRequestRequest {
    /// The shift holder.
    pub requester_id: String,
    /// The shift to remove.
    pub shift_id: i64,
    /// Why it should be removed.
    pub reason: String,
}

/// API response for submitted requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    /// Identifiers of the created requests.
    pub request_ids: Vec<String>,
    /// Recipients skipped because they already work during the hours.
    pub excluded: Vec<String>,
    /// A success message.
    pub message: String,
}

/// API request to decide a pending request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecideRequest {
    /// The employee deciding.
    pub actor_id: String,
    /// The decision.
    pub decision: Decision,
}

/// A request as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInfo {
    /// Request identifier.
    pub request_id: String,
    /// The workflow.
    pub kind: RequestKind,
    /// Who asked.
    pub requester_id: String,
    /// Who is asked to respond; `None` for deletions, which go to the
    /// owner.
    pub recipient_id: Option<String>,
    /// The referenced shift, if it still exists.
    pub shift_id: Option<i64>,
    /// Day of the hours.
    pub date: String,
    /// Start time.
    pub start: String,
    /// End time.
    pub end: String,
    /// Deletion reason.
    pub reason: Option<String>,
    /// Current status.
    pub status: RequestStatus,
}

impl From<&ExchangeRequest> for RequestInfo {
    fn from(request: &ExchangeRequest) -> Self {
        Self {
            request_id: request.request_id.value().to_string(),
            kind: RequestKind::Exchange,
            requester_id: request.requester_id.value().to_string(),
            recipient_id: Some(request.approver_id.value().to_string()),
            shift_id: request.shift_id,
            date: format_date(request.shift_date),
            start: format_time(request.shift_range.start()),
            end: format_time(request.shift_range.end()),
            reason: None,
            status: request.status,
        }
    }
}

impl From<&AdditionRequest> for RequestInfo {
    fn from(request: &AdditionRequest) -> Self {
        Self {
            request_id: request.request_id.value().to_string(),
            kind: RequestKind::Addition,
            requester_id: request.requester_id.value().to_string(),
            recipient_id: Some(request.target_employee_id.value().to_string()),
            shift_id: None,
            date: format_date(request.shift_date),
            start: format_time(request.shift_range.start()),
            end: format_time(request.shift_range.end()),
            reason: None,
            status: request.status,
        }
    }
}

impl From<&DeletionRequest> for RequestInfo {
    fn from(request: &DeletionRequest) -> Self {
        Self {
            request_id: request.request_id.value().to_string(),
            kind: RequestKind::Deletion,
            requester_id: request.requester_id.value().to_string(),
            recipient_id: None,
            shift_id: request.shift_id,
            date: format_date(request.shift_date),
            start: format_time(request.shift_range.start()),
            end: format_time(request.shift_range.end()),
            reason: Some(request.reason.clone()),
            status: request.status,
        }
    }
}

/// API response listing an employee's pending requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequestsResponse {
    /// Requests the employee can decide.
    pub incoming: Vec<RequestInfo>,
    /// Requests the employee made that are still pending.
    pub outgoing: Vec<RequestInfo>,
}
