// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use shiftbot::CoreError;
use shiftbot_domain::{DomainError, format_date};
use shiftbot_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain, core and persistence errors and
/// represent the contract seen by chat replies and HTTP responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The sender is not linked to an employee, or linking failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor may not perform the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Who may perform it.
        requirement: String,
    },
    /// A scheduling rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The request is no longer in a state that allows the action.
    StateConflict {
        /// Which conflict occurred.
        conflict: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                requirement,
            } => {
                write!(f, "Unauthorized: cannot {action}; {requirement}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::StateConflict { conflict, message } => {
                write!(f, "Conflict ({conflict}): {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Returns the text shown to a chat user for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthenticationFailed { reason } => reason.clone(),
            Self::Unauthorized { requirement, .. } => {
                format!("You are not allowed to do that: {requirement}.")
            }
            Self::DomainRuleViolation { message, .. }
            | Self::InvalidInput { message, .. }
            | Self::ResourceNotFound { message, .. }
            | Self::StateConflict { message, .. } => message.clone(),
            Self::Internal { .. } => {
                String::from("Something went wrong on our side. Please try again later.")
            }
        }
    }

    /// Returns whether a dialogue should end after this error.
    ///
    /// Input errors keep the dialogue open so the user can answer again.
    #[must_use]
    pub const fn ends_dialogue(&self) -> bool {
        matches!(
            self,
            Self::ResourceNotFound { .. }
                | Self::StateConflict { .. }
                | Self::DomainRuleViolation { .. }
        )
    }
}

fn invalid(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidEmployeeId(_) => invalid("employee_id", &err),
        DomainError::InvalidRole(_) => invalid("role", &err),
        DomainError::InvalidDate { .. } => invalid("date", &err),
        DomainError::PastDate { date, today } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!(
                "{} is in the past (today is {}). Please choose today or a later date.",
                format_date(date),
                format_date(today)
            ),
        },
        DomainError::InvalidTime(_) | DomainError::InvalidTimeRange { .. } => {
            invalid("time", &err)
        }
        DomainError::EmptyReason => invalid("reason", &err),
        DomainError::InvalidRequestId(_) => invalid("request_id", &err),
        DomainError::InvalidRequestStatus(_) => invalid("status", &err),
        DomainError::InvalidDecision(_) | DomainError::UnsupportedDecision { .. } => {
            invalid("decision", &err)
        }
        DomainError::NotAuthorized {
            action,
            requirement,
        } => ApiError::Unauthorized {
            action,
            requirement,
        },
        DomainError::AlreadyProcessed { .. } => ApiError::StateConflict {
            conflict: String::from("already_processed"),
            message: format!("{err}. No action was taken."),
        },
        DomainError::DuplicatePendingRequest { .. } => ApiError::StateConflict {
            conflict: String::from("duplicate_pending"),
            message: format!("{err}. No new request was sent."),
        },
        DomainError::ShiftNoLongerAvailable { .. } => ApiError::StateConflict {
            conflict: String::from("shift_no_longer_available"),
            message: format!("{err}. No action was taken."),
        },
        DomainError::OverlappingShift { .. } => ApiError::DomainRuleViolation {
            rule: String::from("no_overlapping_shifts"),
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::UnknownPostback(_) | CoreError::MalformedPostback { .. } => {
            ApiError::InvalidInput {
                field: String::from("postback"),
                message: String::from("That button is no longer valid."),
            }
        }
    }
}

/// Translates a persistence error into an API error.
///
/// Domain violations raised inside a transaction keep their meaning; storage
/// failures become internal errors.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        PersistenceError::RequestNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Request"),
            message: format!("Request {id} does not exist."),
        },
        PersistenceError::ShiftNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Shift"),
            message: format!("Shift {id} does not exist."),
        },
        PersistenceError::EmployeeNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Employee"),
            message: format!("Employee {id} does not exist."),
        },
        PersistenceError::NotFound(what) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message: what,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}
