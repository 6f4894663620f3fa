// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::time_range::TimeRange;
use crate::types::{Employee, EmployeeId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

/// Lifecycle status of any request.
///
/// Requests are created `Pending` and move exactly once to a terminal
/// status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting a decision.
    Pending,
    /// Accepted by the responsible party.
    Approved,
    /// Declined, either explicitly or as a side effect of another approval.
    Rejected,
    /// Withdrawn by the requester.
    Cancelled,
}

impl RequestStatus {
    /// Converts this status to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether the status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidRequestStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The three request workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// Handing one's shift to a colleague.
    Exchange,
    /// The owner asking an employee to take extra hours.
    Addition,
    /// An employee asking the owner to remove their shift.
    Deletion,
}

impl RequestKind {
    /// Returns the identifier prefix used for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exchange => "exchange",
            Self::Addition => "addition",
            Self::Deletion => "deletion",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decision taken on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Accept the request.
    Approve,
    /// Decline the request.
    Reject,
    /// Withdraw the request.
    Cancel,
}

impl Decision {
    /// Returns the verb for this decision.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
        }
    }

    /// Returns the status a request takes after this decision.
    #[must_use]
    pub const fn resulting_status(&self) -> RequestStatus {
        match self {
            Self::Approve => RequestStatus::Approved,
            Self::Reject => RequestStatus::Rejected,
            Self::Cancel => RequestStatus::Cancelled,
        }
    }
}

impl FromStr for Decision {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            "cancel" => Ok(Self::Cancel),
            _ => Err(DomainError::InvalidDecision(s.to_string())),
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Globally unique request identifier of the form
/// `{kind}_{unix_millis}_{random}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generates a fresh identifier for a request of `kind`.
    #[must_use]
    pub fn generate(kind: RequestKind, now: OffsetDateTime) -> Self {
        let millis: i128 = now.unix_timestamp_nanos() / 1_000_000;
        Self(format!(
            "{}_{millis}_{:016x}",
            kind.as_str(),
            rand::random::<u64>()
        ))
    }

    /// Parses an identifier received from outside.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRequestId` if the value is empty or
    /// contains whitespace.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        if value.is_empty() || value.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidRequestId(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    /// Returns the kind encoded in the identifier prefix, if any.
    #[must_use]
    pub fn kind(&self) -> Option<RequestKind> {
        [
            RequestKind::Exchange,
            RequestKind::Addition,
            RequestKind::Deletion,
        ]
        .into_iter()
        .find(|kind| {
            self.0
                .strip_prefix(kind.as_str())
                .is_some_and(|rest| rest.starts_with('_'))
        })
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn ensure_pending(request_id: &RequestId, status: RequestStatus) -> Result<(), DomainError> {
    if status.is_terminal() {
        return Err(DomainError::AlreadyProcessed {
            request_id: request_id.value().to_string(),
            status,
        });
    }
    Ok(())
}

/// A request to hand a shift to a colleague.
///
/// The date and hours are captured when the request is made so the
/// request stays readable after the shift itself is gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRequest {
    /// Request identifier.
    pub request_id: RequestId,
    /// The shift holder giving the shift away.
    pub requester_id: EmployeeId,
    /// The colleague asked to take it.
    pub approver_id: EmployeeId,
    /// The shift, or `None` once it has been destroyed.
    pub shift_id: Option<i64>,
    /// Day of the shift at request time.
    pub shift_date: Date,
    /// Hours of the shift at request time.
    pub shift_range: TimeRange,
    /// Current status.
    pub status: RequestStatus,
    /// When the request was made.
    pub requested_at: OffsetDateTime,
    /// When the request left `Pending`.
    pub responded_at: Option<OffsetDateTime>,
}

impl ExchangeRequest {
    /// Checks that `actor` may take `decision` on this request.
    ///
    /// Only the approver may approve or reject; only the requester may
    /// cancel.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadyProcessed` if the request is terminal,
    /// or `DomainError::NotAuthorized` if the actor is the wrong party.
    pub fn authorize(&self, actor: &EmployeeId, decision: Decision) -> Result<(), DomainError> {
        ensure_pending(&self.request_id, self.status)?;
        match decision {
            Decision::Approve | Decision::Reject if actor != &self.approver_id => {
                Err(DomainError::NotAuthorized {
                    action: format!("{decision} exchange request {}", self.request_id),
                    requirement: String::from("only the requested employee may respond"),
                })
            }
            Decision::Cancel if actor != &self.requester_id => Err(DomainError::NotAuthorized {
                action: format!("cancel exchange request {}", self.request_id),
                requirement: String::from("only the requester may cancel"),
            }),
            _ => Ok(()),
        }
    }
}

/// A request from the owner asking an employee to work extra hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionRequest {
    /// Request identifier.
    pub request_id: RequestId,
    /// The owner who asked.
    pub requester_id: EmployeeId,
    /// The employee asked to work.
    pub target_employee_id: EmployeeId,
    /// Day of the extra hours.
    pub shift_date: Date,
    /// The extra hours.
    pub shift_range: TimeRange,
    /// Current status.
    pub status: RequestStatus,
    /// When the request was made.
    pub requested_at: OffsetDateTime,
    /// When the request left `Pending`.
    pub responded_at: Option<OffsetDateTime>,
}

impl AdditionRequest {
    /// Checks that `actor` may take `decision` on this request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadyProcessed` if the request is terminal,
    /// `DomainError::UnsupportedDecision` for cancellation, or
    /// `DomainError::NotAuthorized` if the actor is not the target.
    pub fn authorize(&self, actor: &EmployeeId, decision: Decision) -> Result<(), DomainError> {
        ensure_pending(&self.request_id, self.status)?;
        if decision == Decision::Cancel {
            return Err(DomainError::UnsupportedDecision {
                kind: RequestKind::Addition,
                decision,
            });
        }
        if actor != &self.target_employee_id {
            return Err(DomainError::NotAuthorized {
                action: format!("{decision} addition request {}", self.request_id),
                requirement: String::from("only the requested employee may respond"),
            });
        }
        Ok(())
    }
}

/// A request to remove one's own shift, decided by the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionRequest {
    /// Request identifier.
    pub request_id: RequestId,
    /// The shift holder asking for removal.
    pub requester_id: EmployeeId,
    /// The shift, or `None` once it has been destroyed.
    pub shift_id: Option<i64>,
    /// Day of the shift at request time.
    pub shift_date: Date,
    /// Hours of the shift at request time.
    pub shift_range: TimeRange,
    /// Why the shift should be removed.
    pub reason: String,
    /// Current status.
    pub status: RequestStatus,
    /// When the request was made.
    pub requested_at: OffsetDateTime,
    /// When the request left `Pending`.
    pub responded_at: Option<OffsetDateTime>,
}

impl DeletionRequest {
    /// Checks that `actor` may take `decision` on this request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadyProcessed` if the request is terminal,
    /// `DomainError::UnsupportedDecision` for cancellation, or
    /// `DomainError::NotAuthorized` unless the actor is the owner.
    pub fn authorize(&self, actor: &Employee, decision: Decision) -> Result<(), DomainError> {
        ensure_pending(&self.request_id, self.status)?;
        if decision == Decision::Cancel {
            return Err(DomainError::UnsupportedDecision {
                kind: RequestKind::Deletion,
                decision,
            });
        }
        if !actor.is_owner() {
            return Err(DomainError::NotAuthorized {
                action: format!("{decision} deletion request {}", self.request_id),
                requirement: String::from("only the owner may decide deletions"),
            });
        }
        Ok(())
    }
}

/// Validates a deletion reason and returns it trimmed.
///
/// # Errors
///
/// Returns `DomainError::EmptyReason` if nothing but whitespace was given.
pub fn validate_reason(reason: &str) -> Result<String, DomainError> {
    let trimmed: &str = reason.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyReason);
    }
    Ok(trimmed.to_string())
}
