// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_date, create_test_range};
use crate::{
    AdditionRequest, Decision, DeletionRequest, DomainError, Employee, EmployeeId,
    ExchangeRequest, RequestId, RequestKind, RequestStatus, Role, validate_reason,
};
use std::str::FromStr;
use time::OffsetDateTime;
use time::macros::datetime;

fn now() -> OffsetDateTime {
    datetime!(2025-09-01 09:00 UTC)
}

fn create_test_exchange(status: RequestStatus) -> ExchangeRequest {
    ExchangeRequest {
        request_id: RequestId::generate(RequestKind::Exchange, now()),
        requester_id: EmployeeId::new("a"),
        approver_id: EmployeeId::new("b"),
        shift_id: Some(1),
        shift_date: create_test_date(20),
        shift_range: create_test_range((18, 0), (20, 0)),
        status,
        requested_at: now(),
        responded_at: None,
    }
}

fn create_test_employee(id: &str, role: Role) -> Employee {
    Employee {
        employee_id: EmployeeId::new(id),
        display_name: id.to_uppercase(),
        role,
        chat_user_id: None,
    }
}

#[test]
fn test_generated_ids_carry_kind_prefix() {
    let first = RequestId::generate(RequestKind::Deletion, now());
    let second = RequestId::generate(RequestKind::Deletion, now());
    assert!(first.value().starts_with("deletion_"));
    assert_eq!(first.kind(), Some(RequestKind::Deletion));
    assert_ne!(first, second);
}

#[test]
fn test_request_id_parse_rejects_blank() {
    assert!(RequestId::parse("").is_err());
    assert!(RequestId::parse("exchange 1").is_err());
    assert_eq!(RequestId::parse("opaque").unwrap().kind(), None);
}

#[test]
fn test_status_round_trips_through_storage_form() {
    for status in [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::Cancelled,
    ] {
        assert_eq!(RequestStatus::from_str(status.as_str()).unwrap(), status);
    }
    assert!(RequestStatus::from_str("done").is_err());
}

#[test]
fn test_only_approver_may_respond_to_exchange() {
    let request = create_test_exchange(RequestStatus::Pending);
    assert!(request.authorize(&EmployeeId::new("b"), Decision::Approve).is_ok());
    assert!(request.authorize(&EmployeeId::new("b"), Decision::Reject).is_ok());
    assert!(matches!(
        request.authorize(&EmployeeId::new("c"), Decision::Approve),
        Err(DomainError::NotAuthorized { .. })
    ));
    assert!(matches!(
        request.authorize(&EmployeeId::new("a"), Decision::Approve),
        Err(DomainError::NotAuthorized { .. })
    ));
}

#[test]
fn test_only_requester_may_cancel_exchange() {
    let request = create_test_exchange(RequestStatus::Pending);
    assert!(request.authorize(&EmployeeId::new("a"), Decision::Cancel).is_ok());
    assert!(matches!(
        request.authorize(&EmployeeId::new("b"), Decision::Cancel),
        Err(DomainError::NotAuthorized { .. })
    ));
}

#[test]
fn test_terminal_request_reports_already_processed() {
    let request = create_test_exchange(RequestStatus::Rejected);
    assert!(matches!(
        request.authorize(&EmployeeId::new("b"), Decision::Approve),
        Err(DomainError::AlreadyProcessed {
            status: RequestStatus::Rejected,
            ..
        })
    ));
}

#[test]
fn test_addition_decisions_belong_to_target() {
    let request = AdditionRequest {
        request_id: RequestId::generate(RequestKind::Addition, now()),
        requester_id: EmployeeId::new("owner"),
        target_employee_id: EmployeeId::new("y"),
        shift_date: create_test_date(20),
        shift_range: create_test_range((12, 0), (17, 0)),
        status: RequestStatus::Pending,
        requested_at: now(),
        responded_at: None,
    };
    assert!(request.authorize(&EmployeeId::new("y"), Decision::Approve).is_ok());
    assert!(request.authorize(&EmployeeId::new("owner"), Decision::Reject).is_err());
    assert!(matches!(
        request.authorize(&EmployeeId::new("y"), Decision::Cancel),
        Err(DomainError::UnsupportedDecision { .. })
    ));
}

#[test]
fn test_deletion_decisions_belong_to_owner() {
    let request = DeletionRequest {
        request_id: RequestId::generate(RequestKind::Deletion, now()),
        requester_id: EmployeeId::new("a"),
        shift_id: Some(4),
        shift_date: create_test_date(20),
        shift_range: create_test_range((9, 0), (12, 0)),
        reason: String::from("sick"),
        status: RequestStatus::Pending,
        requested_at: now(),
        responded_at: None,
    };
    let owner = create_test_employee("boss", Role::Owner);
    let requester = create_test_employee("a", Role::Employee);
    assert!(request.authorize(&owner, Decision::Approve).is_ok());
    assert!(matches!(
        request.authorize(&requester, Decision::Approve),
        Err(DomainError::NotAuthorized { .. })
    ));
}

#[test]
fn test_reason_must_not_be_blank() {
    assert_eq!(validate_reason("  fever  ").unwrap(), "fever");
    assert_eq!(validate_reason(" \n "), Err(DomainError::EmptyReason));
}
