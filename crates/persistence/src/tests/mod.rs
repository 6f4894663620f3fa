// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod employee_tests;

use crate::Persistence;
use shiftbot_domain::{
    AdditionRequest, DeletionRequest, Employee, EmployeeId, ExchangeRequest, NewShift,
    RequestId, RequestKind, RequestStatus, Role, Shift, TimeRange,
};
use time::macros::datetime;
use time::{Date, Month, OffsetDateTime, Time};

pub fn test_now() -> OffsetDateTime {
    datetime!(2025-09-01 09:00 UTC)
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory database")
}

pub fn create_test_date(day: u8) -> Date {
    Date::from_calendar_date(2025, Month::September, day).unwrap()
}

pub fn create_test_range(start: (u8, u8), end: (u8, u8)) -> TimeRange {
    TimeRange::new(
        Time::from_hms(start.0, start.1, 0).unwrap(),
        Time::from_hms(end.0, end.1, 0).unwrap(),
    )
    .unwrap()
}

pub fn seed_employee(persistence: &mut Persistence, id: &str, name: &str, role: Role) -> Employee {
    let employee = Employee {
        employee_id: EmployeeId::new(id),
        display_name: name.to_string(),
        role,
        chat_user_id: Some(format!("U-{id}")),
    };
    persistence.link_employee(&employee, test_now()).unwrap()
}

/// Seeds the owner `owner` and the employees `alice`, `bob` and `carol`.
pub fn seed_staff(persistence: &mut Persistence) {
    seed_employee(persistence, "owner", "Owner", Role::Owner);
    seed_employee(persistence, "alice", "Alice", Role::Employee);
    seed_employee(persistence, "bob", "Bob", Role::Employee);
    seed_employee(persistence, "carol", "Carol", Role::Employee);
}

pub fn seed_shift(
    persistence: &mut Persistence,
    employee: &str,
    day: u8,
    range: TimeRange,
) -> Shift {
    let shift = NewShift::scheduled(EmployeeId::new(employee), create_test_date(day), range);
    persistence.create_shift(&shift, test_now()).unwrap()
}

pub fn exchange_request(requester: &str, approver: &str, shift: &Shift) -> ExchangeRequest {
    ExchangeRequest {
        request_id: RequestId::generate(RequestKind::Exchange, test_now()),
        requester_id: EmployeeId::new(requester),
        approver_id: EmployeeId::new(approver),
        shift_id: Some(shift.shift_id),
        shift_date: shift.date,
        shift_range: shift.range,
        status: RequestStatus::Pending,
        requested_at: test_now(),
        responded_at: None,
    }
}

pub fn addition_request(target: &str, day: u8, range: TimeRange) -> AdditionRequest {
    AdditionRequest {
        request_id: RequestId::generate(RequestKind::Addition, test_now()),
        requester_id: EmployeeId::new("owner"),
        target_employee_id: EmployeeId::new(target),
        shift_date: create_test_date(day),
        shift_range: range,
        status: RequestStatus::Pending,
        requested_at: test_now(),
        responded_at: None,
    }
}

pub fn deletion_request(requester: &str, shift: &Shift, reason: &str) -> DeletionRequest {
    DeletionRequest {
        request_id: RequestId::generate(RequestKind::Deletion, test_now()),
        requester_id: EmployeeId::new(requester),
        shift_id: Some(shift.shift_id),
        shift_date: shift.date,
        shift_range: shift.range,
        reason: reason.to_string(),
        status: RequestStatus::Pending,
        requested_at: test_now(),
        responded_at: None,
    }
}
