// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collaborators outside the engine: the employee roster and the
//! notification channel.
//!
//! Both are consulted through narrow traits so the server can plug in real
//! implementations and tests can plug in recording ones.

use serde::{Deserialize, Serialize};
use shiftbot_domain::{Candidate, EmployeeId, RequestId, RequestKind};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{info, warn};

/// One employee as listed by the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Stable roster identifier.
    pub employee_id: String,
    /// Name shown to users and matched against typed names.
    pub display_name: String,
    /// Contact address, used for the allowed-e-mail check.
    #[serde(default)]
    pub email: Option<String>,
}

impl RosterEntry {
    /// Returns the entry as a selectable candidate.
    #[must_use]
    pub fn as_candidate(&self) -> Candidate {
        Candidate::new(EmployeeId::new(&self.employee_id), &self.display_name)
    }
}

/// Failures of the roster provider.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    /// The provider could not be reached.
    #[error("Roster provider unavailable: {0}")]
    Unavailable(String),
    /// The provider answered with data that could not be read.
    #[error("Roster data malformed: {0}")]
    Malformed(String),
}

/// Read-only directory of employees.
pub trait Roster: Send + Sync {
    /// Lists every employee on the roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn list_employees(&self) -> Result<Vec<RosterEntry>, RosterError>;
}

/// A roster held in memory, loaded once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticRoster {
    entries: Vec<RosterEntry>,
}

impl StaticRoster {
    /// Creates a roster from a fixed list of entries.
    #[must_use]
    pub const fn new(entries: Vec<RosterEntry>) -> Self {
        Self { entries }
    }
}

impl Roster for StaticRoster {
    fn list_employees(&self) -> Result<Vec<RosterEntry>, RosterError> {
        Ok(self.entries.clone())
    }
}

/// What happened to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A new request awaits the recipient.
    Created,
    /// The recipient's request was approved.
    Approved,
    /// The recipient's request was rejected.
    Rejected,
    /// A request addressed to the recipient was withdrawn.
    Cancelled,
    /// A request involving the recipient became moot and was closed.
    AutoRejected,
}

/// A message for one employee about one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// What happened.
    pub kind: NotificationKind,
    /// The workflow the request belongs to.
    pub request_kind: RequestKind,
    /// The request concerned.
    pub request_id: RequestId,
    /// Who should be told.
    pub recipient: EmployeeId,
    /// Human-readable text.
    pub message: String,
}

/// Failures of the notification channel.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotifyError {
    /// The channel could not accept the message.
    #[error("Notification channel unavailable: {0}")]
    Unavailable(String),
    /// The channel refused the message.
    #[error("Notification rejected: {0}")]
    Rejected(String),
}

/// Outbound, best-effort notification channel.
pub trait Notifier: Send + Sync {
    /// Hands one event to the channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel does not accept the event.
    fn notify(&self, event: &NotificationEvent) -> Result<(), NotifyError>;
}

/// A notifier that only writes events to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: &NotificationEvent) -> Result<(), NotifyError> {
        info!(
            kind = ?event.kind,
            request_kind = %event.request_kind,
            request_id = %event.request_id,
            recipient = %event.recipient,
            message = %event.message,
            "Notification"
        );
        Ok(())
    }
}

/// A notifier that keeps every event in memory.
///
/// Useful for tests and for inspecting what a decision would announce.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the events received so far.
    #[must_use]
    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: &NotificationEvent) -> Result<(), NotifyError> {
        self.events
            .lock()
            .map_err(|_| NotifyError::Unavailable(String::from("recorder lock poisoned")))?
            .push(event.clone());
        Ok(())
    }
}

/// Sends every event, logging and otherwise ignoring failures.
///
/// Called only after the change the events describe has been committed.
pub fn dispatch(notifier: &dyn Notifier, events: &[NotificationEvent]) {
    for event in events {
        if let Err(e) = notifier.notify(event) {
            warn!(
                request_id = %event.request_id,
                recipient = %event.recipient,
                error = %e,
                "Notification delivery failed"
            );
        }
    }
}
