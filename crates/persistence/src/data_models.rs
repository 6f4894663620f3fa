// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion into domain values.
//!
//! Dates are stored as `YYYY-MM-DD`, times as `HH:MM`, and request
//! timestamps as RFC 3339 text, so lexical order matches chronological
//! order.

use diesel::prelude::*;
use shiftbot_domain::{
    AdditionRequest, DeletionRequest, Employee, EmployeeId, ExchangeRequest, RequestId,
    RequestStatus, Role, Shift, TimeRange, parse_clock_time, parse_iso_date,
};
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::diesel_schema::{
    addition_requests, conversation_states, deletion_requests, employees, exchange_requests,
    shifts,
};
use crate::error::PersistenceError;

/// Diesel Queryable struct for employee rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EmployeeRow {
    pub employee_id: String,
    pub display_name: String,
    pub role: String,
    pub chat_user_id: Option<String>,
}

impl EmployeeRow {
    /// Converts the row into a domain employee.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ReconstructionError` for an unknown role.
    pub fn into_domain(self) -> Result<Employee, PersistenceError> {
        Ok(Employee {
            employee_id: EmployeeId::new(&self.employee_id),
            display_name: self.display_name,
            role: Role::from_str(&self.role).map_err(reconstruction)?,
            chat_user_id: self.chat_user_id,
        })
    }
}

/// Diesel Queryable struct for shift rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = shifts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ShiftRow {
    pub shift_id: i64,
    pub employee_id: String,
    pub shift_date: String,
    pub start_time: String,
    pub end_time: String,
    pub is_modified: i32,
    pub original_employee_id: Option<String>,
}

impl ShiftRow {
    /// Converts the row into a domain shift.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ReconstructionError` for malformed columns.
    pub fn into_domain(self) -> Result<Shift, PersistenceError> {
        Ok(Shift {
            shift_id: self.shift_id,
            employee_id: EmployeeId::new(&self.employee_id),
            date: decode_date(&self.shift_date)?,
            range: decode_range(&self.start_time, &self.end_time)?,
            is_modified: self.is_modified != 0,
            original_employee_id: self.original_employee_id.as_deref().map(EmployeeId::new),
        })
    }
}

/// Diesel Queryable struct for exchange request rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = exchange_requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExchangeRequestRow {
    pub request_id: String,
    pub requester_id: String,
    pub approver_id: String,
    pub shift_id: Option<i64>,
    pub shift_date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub requested_at: String,
    pub responded_at: Option<String>,
}

impl ExchangeRequestRow {
    /// Converts the row into a domain exchange request.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ReconstructionError` for malformed columns.
    pub fn into_domain(self) -> Result<ExchangeRequest, PersistenceError> {
        Ok(ExchangeRequest {
            request_id: RequestId::parse(&self.request_id).map_err(reconstruction)?,
            requester_id: EmployeeId::new(&self.requester_id),
            approver_id: EmployeeId::new(&self.approver_id),
            shift_id: self.shift_id,
            shift_date: decode_date(&self.shift_date)?,
            shift_range: decode_range(&self.start_time, &self.end_time)?,
            status: RequestStatus::from_str(&self.status).map_err(reconstruction)?,
            requested_at: parse_timestamp(&self.requested_at)?,
            responded_at: self.responded_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

/// Diesel Queryable struct for addition request rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = addition_requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AdditionRequestRow {
    pub request_id: String,
    pub requester_id: String,
    pub target_employee_id: String,
    pub shift_date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub requested_at: String,
    pub responded_at: Option<String>,
}

impl AdditionRequestRow {
    /// Converts the row into a domain addition request.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ReconstructionError` for malformed columns.
    pub fn into_domain(self) -> Result<AdditionRequest, PersistenceError> {
        Ok(AdditionRequest {
            request_id: RequestId::parse(&self.request_id).map_err(reconstruction)?,
            requester_id: EmployeeId::new(&self.requester_id),
            target_employee_id: EmployeeId::new(&self.target_employee_id),
            shift_date: decode_date(&self.shift_date)?,
            shift_range: decode_range(&self.start_time, &self.end_time)?,
            status: RequestStatus::from_str(&self.status).map_err(reconstruction)?,
            requested_at: parse_timestamp(&self.requested_at)?,
            responded_at: self.responded_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

/// Diesel Queryable struct for deletion request rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = deletion_requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DeletionRequestRow {
    pub request_id: String,
    pub requester_id: String,
    pub shift_id: Option<i64>,
    pub shift_date: String,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
    pub status: String,
    pub requested_at: String,
    pub responded_at: Option<String>,
}

impl DeletionRequestRow {
    /// Converts the row into a domain deletion request.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ReconstructionError` for malformed columns.
    pub fn into_domain(self) -> Result<DeletionRequest, PersistenceError> {
        Ok(DeletionRequest {
            request_id: RequestId::parse(&self.request_id).map_err(reconstruction)?,
            requester_id: EmployeeId::new(&self.requester_id),
            shift_id: self.shift_id,
            shift_date: decode_date(&self.shift_date)?,
            shift_range: decode_range(&self.start_time, &self.end_time)?,
            reason: self.reason,
            status: RequestStatus::from_str(&self.status).map_err(reconstruction)?,
            requested_at: parse_timestamp(&self.requested_at)?,
            responded_at: self.responded_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

/// Diesel Queryable struct for conversation state rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = conversation_states)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ConversationRow {
    pub step_json: String,
    pub created_at: i64,
    pub expires_at: i64,
}

fn reconstruction(err: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::ReconstructionError(err.to_string())
}

fn decode_date(value: &str) -> Result<Date, PersistenceError> {
    parse_iso_date(value).map_err(reconstruction)
}

fn decode_range(start: &str, end: &str) -> Result<TimeRange, PersistenceError> {
    let start = parse_clock_time(start).map_err(reconstruction)?;
    let end = parse_clock_time(end).map_err(reconstruction)?;
    TimeRange::new(start, end).map_err(reconstruction)
}

/// Formats a timestamp for storage, normalized to UTC.
///
/// # Errors
///
/// Returns `PersistenceError::SerializationError` if the timestamp cannot
/// be represented in RFC 3339.
pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, PersistenceError> {
    timestamp
        .to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a stored RFC 3339 timestamp.
///
/// # Errors
///
/// Returns `PersistenceError::ReconstructionError` if the value is malformed.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(reconstruction)
}
