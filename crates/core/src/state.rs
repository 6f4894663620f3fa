// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use shiftbot_domain::{Candidate, EmployeeId, TimeRange};
use time::{Date, Duration, OffsetDateTime};

/// The dialogue a conversation step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    /// Linking a chat account to an employee.
    Authentication,
    /// Handing a shift to a colleague.
    Exchange,
    /// The owner offering extra hours.
    Addition,
    /// Asking for a shift to be removed.
    Deletion,
}

/// Where a user is inside a multi-turn dialogue.
///
/// Each variant carries exactly the data collected so far, so a stored
/// step can be resumed without any other context. The serialized form is
/// tagged by `step`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ConversationStep {
    /// Waiting for the user to type their name.
    WaitingForEmployeeName,

    /// Waiting for the date of the shift to hand over.
    WaitingForShiftDate {
        /// The shift holder.
        requester_id: EmployeeId,
    },
    /// Waiting for the user to pick one of their shifts on the chosen day.
    WaitingForShiftSelection {
        /// The shift holder.
        requester_id: EmployeeId,
        /// The chosen day.
        date: Date,
        /// Shifts offered, in display order.
        shift_ids: Vec<i64>,
    },
    /// Waiting for the user to pick the colleague to ask.
    WaitingForEmployeeSelectionExchange {
        /// The shift holder.
        requester_id: EmployeeId,
        /// The shift being handed over.
        shift_id: i64,
        /// Colleagues offered, in display order.
        candidates: Vec<Candidate>,
    },
    /// Waiting for yes/no before the exchange request is sent.
    WaitingForConfirmationExchange {
        /// The shift holder.
        requester_id: EmployeeId,
        /// The shift being handed over.
        shift_id: i64,
        /// The colleague who will be asked.
        approver: Candidate,
    },

    /// Waiting for the day of the extra hours.
    WaitingForAdditionDate {
        /// The owner.
        owner_id: EmployeeId,
    },
    /// Waiting for the extra hours.
    WaitingForAdditionTime {
        /// The owner.
        owner_id: EmployeeId,
        /// The chosen day.
        date: Date,
    },
    /// Waiting for the employees to ask.
    WaitingForAdditionEmployees {
        /// The owner.
        owner_id: EmployeeId,
        /// The chosen day.
        date: Date,
        /// The chosen hours.
        range: TimeRange,
        /// Employees free during the hours, in display order.
        candidates: Vec<Candidate>,
    },
    /// Waiting for yes/no before the addition requests are sent.
    WaitingForAdditionConfirmation {
        /// The owner.
        owner_id: EmployeeId,
        /// The chosen day.
        date: Date,
        /// The chosen hours.
        range: TimeRange,
        /// Employees who will be asked.
        targets: Vec<Candidate>,
    },

    /// Waiting for the day of the shift to remove.
    WaitingForDeletionDate {
        /// The shift holder.
        requester_id: EmployeeId,
    },
    /// Waiting for the user to pick the shift to remove.
    WaitingForDeletionShift {
        /// The shift holder.
        requester_id: EmployeeId,
        /// The chosen day.
        date: Date,
        /// Shifts offered, in display order.
        shift_ids: Vec<i64>,
    },
    /// Waiting for the reason.
    WaitingForDeletionReason {
        /// The shift holder.
        requester_id: EmployeeId,
        /// The shift to remove.
        shift_id: i64,
    },
}

impl ConversationStep {
    /// Returns the dialogue this step belongs to.
    #[must_use]
    pub const fn flow(&self) -> Flow {
        match self {
            Self::WaitingForEmployeeName => Flow::Authentication,
            Self::WaitingForShiftDate { .. }
            | Self::WaitingForShiftSelection { .. }
            | Self::WaitingForEmployeeSelectionExchange { .. }
            | Self::WaitingForConfirmationExchange { .. } => Flow::Exchange,
            Self::WaitingForAdditionDate { .. }
            | Self::WaitingForAdditionTime { .. }
            | Self::WaitingForAdditionEmployees { .. }
            | Self::WaitingForAdditionConfirmation { .. } => Flow::Addition,
            Self::WaitingForDeletionDate { .. }
            | Self::WaitingForDeletionShift { .. }
            | Self::WaitingForDeletionReason { .. } => Flow::Deletion,
        }
    }

    /// Returns the serialized tag of the step, for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::WaitingForEmployeeName => "waiting_for_employee_name",
            Self::WaitingForShiftDate { .. } => "waiting_for_shift_date",
            Self::WaitingForShiftSelection { .. } => "waiting_for_shift_selection",
            Self::WaitingForEmployeeSelectionExchange { .. } => {
                "waiting_for_employee_selection_exchange"
            }
            Self::WaitingForConfirmationExchange { .. } => "waiting_for_confirmation_exchange",
            Self::WaitingForAdditionDate { .. } => "waiting_for_addition_date",
            Self::WaitingForAdditionTime { .. } => "waiting_for_addition_time",
            Self::WaitingForAdditionEmployees { .. } => "waiting_for_addition_employees",
            Self::WaitingForAdditionConfirmation { .. } => "waiting_for_addition_confirmation",
            Self::WaitingForDeletionDate { .. } => "waiting_for_deletion_date",
            Self::WaitingForDeletionShift { .. } => "waiting_for_deletion_shift",
            Self::WaitingForDeletionReason { .. } => "waiting_for_deletion_reason",
        }
    }
}

/// A stored dialogue position with its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    /// The current step.
    pub step: ConversationStep,
    /// When the dialogue started.
    pub created_at: OffsetDateTime,
    /// After this instant the state is treated as absent.
    pub expires_at: OffsetDateTime,
}

impl ConversationState {
    /// Starts a state at `now` that lives for `ttl`.
    #[must_use]
    pub fn new(step: ConversationStep, now: OffsetDateTime, ttl: Duration) -> Self {
        Self {
            step,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Returns whether the state is stale at `now`.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }

    /// Serializes the step for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the step cannot be encoded.
    pub fn step_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.step)
    }

    /// Rebuilds a state from its stored parts.
    ///
    /// # Errors
    ///
    /// Returns an error if `step_json` is not a valid encoded step.
    pub fn from_stored(
        step_json: &str,
        created_at: OffsetDateTime,
        expires_at: OffsetDateTime,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            step: serde_json::from_str(step_json)?,
            created_at,
            expires_at,
        })
    }
}
