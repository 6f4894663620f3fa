// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftbot::ConversationStep;
use shiftbot_domain::{Candidate, EmployeeId, RequestStatus};

use super::helpers::{ALICE, BOB, OWNER, TestEngine, candidate, create_test_range, test_now};
use crate::{NotificationKind, submit_deletion, submit_exchange};

#[test]
fn test_deletion_dialogue_sends_request_to_owner() {
    let mut engine = TestEngine::with_staff();
    engine.seed_shift("alice", 25, create_test_range((10, 0), (14, 0)));

    engine.say(ALICE, "delete shift");
    engine.say(ALICE, "9/25");
    let ask = engine.say(ALICE, "1");
    assert!(ask.text.contains("Why should your shift on 2025-09-25 10:00-14:00 be removed?"));

    let again = engine.say(ALICE, "   ");
    assert!(again.text.contains("tell the owner why"));
    assert!(matches!(
        engine.step_of(ALICE),
        Some(ConversationStep::WaitingForDeletionReason { .. })
    ));

    let done = engine.say(ALICE, "  fever  ");
    assert!(done.text.contains("sent to the owner"));
    assert!(engine.step_of(ALICE).is_none());

    let pending = engine.persistence.list_pending_deletions().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].reason, "fever");
    let events = engine.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].recipient.value(), "owner");
}

#[test]
fn test_deletion_button_works_without_dialogue() {
    let mut engine = TestEngine::with_staff();
    let shift = engine.seed_shift("alice", 25, create_test_range((10, 0), (14, 0)));

    engine.press(ALICE, &format!("deletion_shift_{}", shift.shift_id));

    assert_eq!(
        engine.step_of(ALICE),
        Some(ConversationStep::WaitingForDeletionReason {
            requester_id: EmployeeId::new("alice"),
            shift_id: shift.shift_id,
        })
    );
}

#[test]
fn test_second_deletion_for_same_shift_is_refused() {
    let mut engine = TestEngine::with_staff();
    let shift = engine.seed_shift("alice", 25, create_test_range((10, 0), (14, 0)));
    let context = engine.context().clone();
    submit_deletion(
        &context,
        &mut engine.persistence,
        &EmployeeId::new("alice"),
        shift.shift_id,
        "fever",
        test_now(),
    )
    .unwrap();

    let reply = engine.press(ALICE, &format!("deletion_shift_{}", shift.shift_id));

    assert!(reply.text.contains("already waiting"));
    assert!(engine.step_of(ALICE).is_none());
}

#[test]
fn test_owner_approval_removes_shift_and_closes_exchange() {
    let mut engine = TestEngine::with_staff();
    let shift = engine.seed_shift("alice", 25, create_test_range((10, 0), (14, 0)));
    let context = engine.context().clone();
    let alice = EmployeeId::new("alice");
    let approvers: Vec<Candidate> = vec![candidate("bob", "Bob")];
    let exchange = submit_exchange(
        &context,
        &mut engine.persistence,
        &alice,
        shift.shift_id,
        &approvers,
        test_now(),
    )
    .unwrap();
    let deletion = submit_deletion(
        &context,
        &mut engine.persistence,
        &alice,
        shift.shift_id,
        "fever",
        test_now(),
    )
    .unwrap();

    let reply = engine.press(OWNER, &format!("approve_deletion_{deletion}"));

    assert!(reply.text.contains("Removed Alice's shift"));
    assert!(engine.persistence.get_shift(shift.shift_id).unwrap().is_none());
    let closed = engine
        .persistence
        .get_exchange_request(&exchange.created[0])
        .unwrap()
        .unwrap();
    assert_eq!(closed.status, RequestStatus::Rejected);
    assert_eq!(closed.shift_id, None);
    assert!(engine.events().iter().any(|e| {
        e.kind == NotificationKind::AutoRejected && e.recipient.value() == "bob"
    }));

    let late = engine.press(BOB, &format!("approve_{}", exchange.created[0]));
    assert!(late.text.contains("already been rejected"));
}

#[test]
fn test_employee_cannot_decide_deletion() {
    let mut engine = TestEngine::with_staff();
    let shift = engine.seed_shift("alice", 25, create_test_range((10, 0), (14, 0)));
    let context = engine.context().clone();
    let deletion = submit_deletion(
        &context,
        &mut engine.persistence,
        &EmployeeId::new("alice"),
        shift.shift_id,
        "fever",
        test_now(),
    )
    .unwrap();

    let reply = engine.press(BOB, &format!("approve_deletion_{deletion}"));

    assert!(reply.text.contains("not allowed"));
    assert!(engine.persistence.get_shift(shift.shift_id).unwrap().is_some());
    assert_eq!(engine.persistence.list_pending_deletions().unwrap().len(), 1);
}

#[test]
fn test_owner_rejection_keeps_shift() {
    let mut engine = TestEngine::with_staff();
    let shift = engine.seed_shift("alice", 25, create_test_range((10, 0), (14, 0)));
    let context = engine.context().clone();
    let deletion = submit_deletion(
        &context,
        &mut engine.persistence,
        &EmployeeId::new("alice"),
        shift.shift_id,
        "fever",
        test_now(),
    )
    .unwrap();

    let reply = engine.press(OWNER, &format!("reject_deletion_{deletion}"));

    assert!(reply.text.contains("Declined"));
    assert!(engine.persistence.get_shift(shift.shift_id).unwrap().is_some());
    let rejection = engine
        .events()
        .into_iter()
        .find(|e| e.kind == NotificationKind::Rejected)
        .unwrap();
    assert_eq!(rejection.recipient.value(), "alice");
}
