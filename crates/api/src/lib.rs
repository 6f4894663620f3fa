// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Conversation and workflow layer of the shift workflow engine.
//!
//! This crate turns chat events into replies and state changes:
//!
//! - [`DialogRouter`] decides whether an event is a command, a button
//!   press or an answer within a dialogue, and keeps the stored
//!   conversation state in step
//! - the workflows drive the exchange, addition and deletion dialogues
//!   one step at a time
//! - [`ApprovalCoordinator`] applies decisions on pending requests and
//!   notifies the parties after the change is committed
//!
//! The same submission and decision code also backs the synchronous API
//! in [`handlers`] for callers that do not go through a dialogue.
//!
//! Collaborators outside the engine (the employee roster and the
//! notification channel) are reached through the [`Roster`] and
//! [`Notifier`] traits.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod config;
mod context;
mod coordinator;
mod error;
pub mod handlers;
mod messages;
mod ports;
mod request_response;
mod router;
mod submissions;
mod workflows;

#[cfg(test)]
mod tests;

pub use auth::{AuthorizationService, resolve_actor, resolve_chat_user, role_for};
pub use config::EngineConfig;
pub use context::{Directory, EngineContext};
pub use coordinator::{ApprovalCoordinator, DecisionReport};
pub use error::{ApiError, translate_core_error, translate_domain_error, translate_persistence_error};
pub use ports::{
    LogNotifier, NotificationEvent, NotificationKind, Notifier, NotifyError, RecordingNotifier,
    Roster, RosterEntry, RosterError, StaticRoster, dispatch,
};
pub use request_response::{
    CreateAdditionRequestsRequest, CreateDeletionRequestRequest, CreateExchangeRequestsRequest,
    CreateShiftRequest, CreateShiftResponse, DecideRequest, ListShiftsRequest, ListShiftsResponse,
    PendingRequestsResponse, RequestInfo, ShiftInfo, SubmissionResponse,
};
pub use router::DialogRouter;
pub use submissions::{Submission, submit_additions, submit_deletion, submit_exchange};
