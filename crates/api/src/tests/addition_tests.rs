// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftbot::ConversationStep;
use shiftbot_domain::{AdditionRequest, EmployeeId};

use super::helpers::{
    ALICE, OWNER, TestEngine, candidate, create_test_config, create_test_date, create_test_range,
    create_test_roster, roster_entry, test_now,
};
use crate::{ApiError, NotificationKind, submit_additions};

fn pending_for(engine: &mut TestEngine, id: &str) -> Vec<AdditionRequest> {
    engine
        .persistence
        .list_pending_additions_for_target(&EmployeeId::new(id))
        .unwrap()
}

/// Walks the owner to the employee list for 2025-09-22 18:00-22:00.
fn open_employee_list(engine: &mut TestEngine) -> String {
    engine.say(OWNER, "add shift");
    engine.say(OWNER, "9/22");
    engine.say(OWNER, "18:00-22:00").text
}

#[test]
fn test_only_owner_can_start_addition() {
    let mut engine = TestEngine::with_staff();

    let reply = engine.say(ALICE, "add shift");

    assert!(reply.text.contains("not allowed"));
    assert!(engine.step_of(ALICE).is_none());
}

#[test]
fn test_busy_employee_is_reported_and_skipped() {
    let mut engine = TestEngine::with_staff();
    engine.seed_shift("bob", 22, create_test_range((17, 0), (19, 0)));

    let list = open_employee_list(&mut engine);
    assert!(list.contains("2. Alice"));
    assert!(list.contains("3. Bob (already working)"));

    let confirm = engine.say(OWNER, "Alice, Bob");
    assert!(confirm.text.contains("Ask Alice to work 2025-09-22 18:00-22:00?"));
    assert!(confirm.text.contains("Bob will be skipped"));
    let Some(ConversationStep::WaitingForAdditionConfirmation { targets, .. }) =
        engine.step_of(OWNER)
    else {
        panic!("expected the confirmation step");
    };
    assert_eq!(targets, vec![candidate("alice", "Alice")]);

    let done = engine.say(OWNER, "yes");
    assert!(done.text.contains("Sent 1 request(s) to Alice."));
    assert!(engine.step_of(OWNER).is_none());

    assert_eq!(pending_for(&mut engine, "alice").len(), 1);
    assert!(pending_for(&mut engine, "bob").is_empty());
}

#[test]
fn test_submission_reports_excluded_employees() {
    let mut engine = TestEngine::with_staff();
    engine.seed_shift("bob", 22, create_test_range((17, 0), (19, 0)));
    let owner = engine.employee("owner");
    let context = engine.context().clone();

    let submission = submit_additions(
        &context,
        &mut engine.persistence,
        &owner,
        create_test_date(22),
        create_test_range((18, 0), (22, 0)),
        &[candidate("alice", "Alice"), candidate("bob", "Bob")],
        test_now(),
    )
    .unwrap();

    assert_eq!(submission.created.len(), 1);
    assert_eq!(submission.excluded, vec![candidate("bob", "Bob")]);
}

#[test]
fn test_all_picked_employees_busy_asks_again() {
    let mut engine = TestEngine::with_staff();
    engine.seed_shift("bob", 22, create_test_range((17, 0), (19, 0)));
    open_employee_list(&mut engine);

    let reply = engine.say(OWNER, "Bob");

    assert!(reply.text.contains("already works then: Bob"));
    assert!(matches!(
        engine.step_of(OWNER),
        Some(ConversationStep::WaitingForAdditionEmployees { .. })
    ));
}

#[test]
fn test_employees_can_be_picked_by_number() {
    let mut engine = TestEngine::with_staff();
    open_employee_list(&mut engine);

    let reply = engine.say(OWNER, "2、3");

    assert!(reply.text.contains("Ask Alice, Bob to work"));
}

#[test]
fn test_ambiguous_name_asks_for_more() {
    let mut roster = create_test_roster();
    roster.push(roster_entry("bobby", "Bobby"));
    let mut engine = TestEngine::with(create_test_config(), roster);
    engine.link_staff();
    open_employee_list(&mut engine);

    let reply = engine.say(OWNER, "bo");

    assert!(reply.text.contains("matches several people"));
    assert!(matches!(
        engine.step_of(OWNER),
        Some(ConversationStep::WaitingForAdditionEmployees { .. })
    ));
}

#[test]
fn test_invalid_hours_ask_again() {
    let mut engine = TestEngine::with_staff();
    engine.say(OWNER, "add shift");
    engine.say(OWNER, "9/22");

    let reply = engine.say(OWNER, "22:00-18:00");

    assert!(reply.text.contains("Which hours?"));
    assert!(matches!(
        engine.step_of(OWNER),
        Some(ConversationStep::WaitingForAdditionTime { .. })
    ));
}

#[test]
fn test_target_approval_creates_shift_for_target() {
    let mut engine = TestEngine::with_staff();
    open_employee_list(&mut engine);
    engine.say(OWNER, "Alice");
    engine.say(OWNER, "yes");
    let request = pending_for(&mut engine, "alice").remove(0);

    let reply = engine.press(ALICE, &format!("approve_addition_{}", request.request_id));

    assert!(reply.text.contains("You will work the extra shift"));
    let shifts = engine
        .persistence
        .list_shifts_for_employee_on(&EmployeeId::new("alice"), create_test_date(22))
        .unwrap();
    assert_eq!(shifts.len(), 1);
    assert_eq!(shifts[0].range, create_test_range((18, 0), (22, 0)));
    assert!(shifts[0].is_modified);
    assert_eq!(
        shifts[0].original_employee_id,
        Some(EmployeeId::new("owner"))
    );

    let approval = engine
        .events()
        .into_iter()
        .find(|e| e.kind == NotificationKind::Approved)
        .unwrap();
    assert_eq!(approval.recipient.value(), "owner");
}

#[test]
fn test_additions_cannot_be_cancelled() {
    let mut engine = TestEngine::with_staff();
    open_employee_list(&mut engine);
    engine.say(OWNER, "Alice");
    engine.say(OWNER, "yes");
    let request = pending_for(&mut engine, "alice").remove(0);
    let alice = engine.employee("alice");
    let context = engine.context().clone();

    let result = crate::ApprovalCoordinator::new(&context).decide_addition(
        &mut engine.persistence,
        &request.request_id,
        &alice,
        shiftbot_domain::Decision::Cancel,
        test_now(),
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
    assert_eq!(pending_for(&mut engine, "alice").len(), 1);
}
