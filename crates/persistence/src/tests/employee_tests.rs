// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_persistence, seed_employee, test_now};
use shiftbot_domain::{Employee, EmployeeId, Role};

#[test]
fn test_link_employee_and_lookup_by_chat_user() {
    let mut persistence = create_test_persistence();
    let stored: Employee = seed_employee(&mut persistence, "alice", "Alice", Role::Employee);

    let found: Employee = persistence
        .get_employee_by_chat_user("U-alice")
        .unwrap()
        .expect("linked employee should be found");
    assert_eq!(found, stored);
    assert!(!found.is_owner());
}

#[test]
fn test_relinking_chat_user_unbinds_previous_employee() {
    let mut persistence = create_test_persistence();
    seed_employee(&mut persistence, "alice", "Alice", Role::Employee);

    let bob = Employee {
        employee_id: EmployeeId::new("bob"),
        display_name: String::from("Bob"),
        role: Role::Employee,
        chat_user_id: Some(String::from("U-alice")),
    };
    persistence.link_employee(&bob, test_now()).unwrap();

    let found: Employee = persistence.get_employee_by_chat_user("U-alice").unwrap().unwrap();
    assert_eq!(found.employee_id, EmployeeId::new("bob"));

    let alice: Employee = persistence
        .get_employee(&EmployeeId::new("alice"))
        .unwrap()
        .unwrap();
    assert_eq!(alice.chat_user_id, None);
}

#[test]
fn test_list_owners_only_returns_owners() {
    let mut persistence = create_test_persistence();
    seed_employee(&mut persistence, "owner", "Owner", Role::Owner);
    seed_employee(&mut persistence, "alice", "Alice", Role::Employee);

    let owners: Vec<Employee> = persistence.list_owners().unwrap();
    assert_eq!(owners.len(), 1);
    assert_eq!(owners[0].employee_id, EmployeeId::new("owner"));
    assert_eq!(persistence.list_employees().unwrap().len(), 2);
}

#[test]
fn test_unknown_chat_user_is_absent() {
    let mut persistence = create_test_persistence();
    assert!(persistence.get_employee_by_chat_user("U-nobody").unwrap().is_none());
}
