// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the shift workflow engine.
//!
//! This crate stores employees, shifts, the three kinds of requests and
//! per-user conversation state in `SQLite` through Diesel.
//!
//! ## Atomicity
//!
//! Every public write on [`Persistence`] runs inside one
//! `BEGIN IMMEDIATE` transaction. Checks that guard a write (duplicate
//! pending requests, overlap on direct shift creation, the pending status
//! of a request being decided) therefore see the same snapshot as the
//! write itself, and a failed step rolls the whole operation back.
//!
//! ## Testing Philosophy
//!
//! - Tests run against isolated shared-cache in-memory databases
//! - Each call to [`Persistence::new_in_memory`] gets a fresh database

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

use diesel::SqliteConnection;
use shiftbot::ConversationState;
use shiftbot_domain::{
    AdditionRequest, Decision, DeletionRequest, DomainError, Employee, EmployeeId,
    ExchangeRequest, NewShift, RequestId, Shift, has_conflict,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, OffsetDateTime};
use tracing::{debug, warn};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use mutations::decisions::{
    AdditionDecisionOutcome, AppliedMerge, DeletionDecisionOutcome, ExchangeDecisionOutcome,
};

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter owning a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    fn write<T, F>(&mut self, operation: F) -> Result<T, PersistenceError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, PersistenceError>,
    {
        self.conn.immediate_transaction(operation)
    }

    // ------------------------------------------------------------------
    // Employees
    // ------------------------------------------------------------------

    /// Stores an employee and binds it to its chat user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub fn link_employee(
        &mut self,
        employee: &Employee,
        now: OffsetDateTime,
    ) -> Result<Employee, PersistenceError> {
        self.write(|conn| {
            mutations::employees::link_employee(conn, employee, now)?;
            queries::employees::get_employee(conn, &employee.employee_id)?.ok_or_else(|| {
                PersistenceError::EmployeeNotFound(employee.employee_id.value().to_string())
            })
        })
    }

    /// Retrieves an employee by roster identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_employee(
        &mut self,
        employee_id: &EmployeeId,
    ) -> Result<Option<Employee>, PersistenceError> {
        queries::employees::get_employee(&mut self.conn, employee_id)
    }

    /// Retrieves the employee linked to a chat user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_employee_by_chat_user(
        &mut self,
        chat_user_id: &str,
    ) -> Result<Option<Employee>, PersistenceError> {
        queries::employees::get_employee_by_chat_user(&mut self.conn, chat_user_id)
    }

    /// Lists every linked employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_employees(&mut self) -> Result<Vec<Employee>, PersistenceError> {
        queries::employees::list_employees(&mut self.conn)
    }

    /// Lists every linked owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_owners(&mut self) -> Result<Vec<Employee>, PersistenceError> {
        queries::employees::list_owners(&mut self.conn)
    }

    // ------------------------------------------------------------------
    // Shifts
    // ------------------------------------------------------------------

    /// Stores a shift, refusing one that overlaps the employee's existing
    /// shifts that day.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OverlappingShift` on a conflict, or an error
    /// if the database write fails.
    pub fn create_shift(
        &mut self,
        shift: &NewShift,
        now: OffsetDateTime,
    ) -> Result<Shift, PersistenceError> {
        self.write(|conn| {
            let existing: Vec<Shift> =
                queries::shifts::list_shifts_for_employee_on(conn, &shift.employee_id, shift.date)?;
            if has_conflict(&existing, &shift.employee_id, shift.date, &shift.range) {
                return Err(DomainError::OverlappingShift {
                    employee_id: shift.employee_id.clone(),
                    date: shift.date,
                }
                .into());
            }
            mutations::shifts::insert_shift(conn, shift, now)
        })
    }

    /// Retrieves a shift by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_shift(&mut self, shift_id: i64) -> Result<Option<Shift>, PersistenceError> {
        queries::shifts::get_shift(&mut self.conn, shift_id)
    }

    /// Lists one employee's shifts on a day, earliest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_shifts_for_employee_on(
        &mut self,
        employee_id: &EmployeeId,
        date: Date,
    ) -> Result<Vec<Shift>, PersistenceError> {
        queries::shifts::list_shifts_for_employee_on(&mut self.conn, employee_id, date)
    }

    /// Lists every shift on a day.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_shifts_on(&mut self, date: Date) -> Result<Vec<Shift>, PersistenceError> {
        queries::shifts::list_shifts_on(&mut self.conn, date)
    }

    /// Lists shifts in an inclusive date range, optionally for one employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_shifts_between(
        &mut self,
        from: Date,
        to: Date,
        employee_id: Option<&EmployeeId>,
    ) -> Result<Vec<Shift>, PersistenceError> {
        queries::shifts::list_shifts_between(&mut self.conn, from, to, employee_id)
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    /// Stores a batch of exchange requests atomically.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicatePendingRequest` if any request
    /// duplicates a pending one; nothing is stored in that case.
    pub fn create_exchange_requests(
        &mut self,
        requests: &[ExchangeRequest],
    ) -> Result<(), PersistenceError> {
        self.write(|conn| mutations::requests::insert_exchange_requests(conn, requests))
    }

    /// Stores a batch of addition requests atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub fn create_addition_requests(
        &mut self,
        requests: &[AdditionRequest],
    ) -> Result<(), PersistenceError> {
        self.write(|conn| mutations::requests::insert_addition_requests(conn, requests))
    }

    /// Stores a deletion request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicatePendingRequest` if the shift already
    /// has a pending deletion request.
    pub fn create_deletion_request(
        &mut self,
        request: &DeletionRequest,
    ) -> Result<(), PersistenceError> {
        self.write(|conn| mutations::requests::insert_deletion_request(conn, request))
    }

    /// Retrieves an exchange request by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_exchange_request(
        &mut self,
        request_id: &RequestId,
    ) -> Result<Option<ExchangeRequest>, PersistenceError> {
        queries::requests::get_exchange_request(&mut self.conn, request_id)
    }

    /// Retrieves an addition request by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_addition_request(
        &mut self,
        request_id: &RequestId,
    ) -> Result<Option<AdditionRequest>, PersistenceError> {
        queries::requests::get_addition_request(&mut self.conn, request_id)
    }

    /// Retrieves a deletion request by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_deletion_request(
        &mut self,
        request_id: &RequestId,
    ) -> Result<Option<DeletionRequest>, PersistenceError> {
        queries::requests::get_deletion_request(&mut self.conn, request_id)
    }

    /// Returns whether an identical exchange request is already pending.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn has_pending_exchange(
        &mut self,
        requester_id: &EmployeeId,
        shift_id: i64,
        approver_id: &EmployeeId,
    ) -> Result<bool, PersistenceError> {
        queries::requests::has_pending_exchange(&mut self.conn, requester_id, shift_id, approver_id)
    }

    /// Returns whether the shift has a pending deletion request.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn has_pending_deletion(&mut self, shift_id: i64) -> Result<bool, PersistenceError> {
        queries::requests::has_pending_deletion(&mut self.conn, shift_id)
    }

    /// Lists pending exchange requests waiting on an approver.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_pending_exchanges_for_approver(
        &mut self,
        approver_id: &EmployeeId,
    ) -> Result<Vec<ExchangeRequest>, PersistenceError> {
        queries::requests::list_pending_exchanges_for_approver(&mut self.conn, approver_id)
    }

    /// Lists pending exchange requests sent by a requester.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_pending_exchanges_by_requester(
        &mut self,
        requester_id: &EmployeeId,
    ) -> Result<Vec<ExchangeRequest>, PersistenceError> {
        queries::requests::list_pending_exchanges_by_requester(&mut self.conn, requester_id)
    }

    /// Lists every exchange request still referencing a shift.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_exchanges_for_shift(
        &mut self,
        shift_id: i64,
    ) -> Result<Vec<ExchangeRequest>, PersistenceError> {
        queries::requests::list_exchanges_for_shift(&mut self.conn, shift_id)
    }

    /// Lists pending addition requests addressed to an employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_pending_additions_for_target(
        &mut self,
        target_employee_id: &EmployeeId,
    ) -> Result<Vec<AdditionRequest>, PersistenceError> {
        queries::requests::list_pending_additions_for_target(&mut self.conn, target_employee_id)
    }

    /// Lists every pending deletion request.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_pending_deletions(&mut self) -> Result<Vec<DeletionRequest>, PersistenceError> {
        queries::requests::list_pending_deletions(&mut self.conn)
    }

    /// Lists pending deletion requests sent by a requester.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_pending_deletions_by_requester(
        &mut self,
        requester_id: &EmployeeId,
    ) -> Result<Vec<DeletionRequest>, PersistenceError> {
        queries::requests::list_pending_deletions_by_requester(&mut self.conn, requester_id)
    }

    // ------------------------------------------------------------------
    // Decisions
    // ------------------------------------------------------------------

    /// Decides an exchange request atomically.
    ///
    /// Approval moves the shift to the approver, merging it into their
    /// schedule and rejecting the requests it invalidates.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::RequestNotFound` for an unknown request,
    /// or a `PersistenceError::DomainViolation` when the actor may not
    /// decide, the request is no longer pending, or the shift is gone.
    pub fn decide_exchange(
        &mut self,
        request_id: &RequestId,
        actor: &EmployeeId,
        decision: Decision,
        now: OffsetDateTime,
    ) -> Result<ExchangeDecisionOutcome, PersistenceError> {
        self.write(|conn| {
            mutations::decisions::decide_exchange(conn, request_id, actor, decision, now)
        })
    }

    /// Decides an addition request atomically.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::RequestNotFound` for an unknown request,
    /// or a `PersistenceError::DomainViolation` when the actor may not
    /// decide or the request is no longer pending.
    pub fn decide_addition(
        &mut self,
        request_id: &RequestId,
        actor: &EmployeeId,
        decision: Decision,
        now: OffsetDateTime,
    ) -> Result<AdditionDecisionOutcome, PersistenceError> {
        self.write(|conn| {
            mutations::decisions::decide_addition(conn, request_id, actor, decision, now)
        })
    }

    /// Decides a deletion request atomically.
    ///
    /// # Errors
    ///
    /// Same as [`Persistence::decide_exchange`].
    pub fn decide_deletion(
        &mut self,
        request_id: &RequestId,
        actor: &Employee,
        decision: Decision,
        now: OffsetDateTime,
    ) -> Result<DeletionDecisionOutcome, PersistenceError> {
        self.write(|conn| {
            mutations::decisions::decide_deletion(conn, request_id, actor, decision, now)
        })
    }

    // ------------------------------------------------------------------
    // Conversation state
    // ------------------------------------------------------------------

    /// Retrieves a chat user's live conversation state.
    ///
    /// A state that has expired at `now` is deleted and reported as absent.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptConversationState` if the stored
    /// step cannot be decoded, or an error if the database query fails.
    pub fn get_conversation_state(
        &mut self,
        chat_user_id: &str,
        now: OffsetDateTime,
    ) -> Result<Option<ConversationState>, PersistenceError> {
        let Some(row) = queries::conversation::get_conversation_row(&mut self.conn, chat_user_id)?
        else {
            return Ok(None);
        };

        if row.expires_at <= now.unix_timestamp() {
            mutations::conversation::delete_conversation_row(&mut self.conn, chat_user_id)?;
            debug!(chat_user_id, "Discarded expired conversation state");
            return Ok(None);
        }

        let corrupt = |reason: String| PersistenceError::CorruptConversationState {
            chat_user_id: chat_user_id.to_string(),
            reason,
        };
        let created_at: OffsetDateTime = OffsetDateTime::from_unix_timestamp(row.created_at)
            .map_err(|e| corrupt(e.to_string()))?;
        let expires_at: OffsetDateTime = OffsetDateTime::from_unix_timestamp(row.expires_at)
            .map_err(|e| corrupt(e.to_string()))?;

        ConversationState::from_stored(&row.step_json, created_at, expires_at).map_err(|e| {
            warn!(chat_user_id, error = %e, "Stored conversation state is unreadable");
            corrupt(e.to_string())
        })
        .map(Some)
    }

    /// Stores a chat user's conversation state, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the step cannot be encoded or the write fails.
    pub fn set_conversation_state(
        &mut self,
        chat_user_id: &str,
        state: &ConversationState,
    ) -> Result<(), PersistenceError> {
        let step_json: String = state.step_json()?;
        mutations::conversation::put_conversation_row(
            &mut self.conn,
            chat_user_id,
            &step_json,
            state.created_at.unix_timestamp(),
            state.expires_at.unix_timestamp(),
        )?;
        debug!(chat_user_id, step = state.step.name(), "Conversation state stored");
        Ok(())
    }

    /// Removes a chat user's conversation state.
    ///
    /// Returns whether a state existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub fn clear_conversation_state(&mut self, chat_user_id: &str) -> Result<bool, PersistenceError> {
        mutations::conversation::delete_conversation_row(&mut self.conn, chat_user_id)
    }
}
