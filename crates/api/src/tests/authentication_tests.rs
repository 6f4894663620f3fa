// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftbot::ConversationStep;
use shiftbot_domain::Role;

use super::helpers::{TestEngine, create_test_config, create_test_roster, roster_entry};

const NEWCOMER: &str = "U-newcomer";

#[test]
fn test_authentication_links_chat_account() {
    let mut engine = TestEngine::new();

    let prompt = engine.say(NEWCOMER, "authenticate");
    assert!(prompt.text.contains("enter your name"));
    assert_eq!(
        engine.step_of(NEWCOMER),
        Some(ConversationStep::WaitingForEmployeeName)
    );

    let reply = engine.say(NEWCOMER, "alice");

    assert!(reply.text.contains("Welcome, Alice"));
    assert!(engine.step_of(NEWCOMER).is_none());
    let linked = engine
        .persistence
        .get_employee_by_chat_user(NEWCOMER)
        .unwrap()
        .unwrap();
    assert_eq!(linked.employee_id.value(), "alice");
    assert_eq!(linked.role, Role::Employee);
}

#[test]
fn test_configured_owner_is_linked_as_owner() {
    let mut engine = TestEngine::new();
    engine.say(NEWCOMER, "authenticate");

    let reply = engine.say(NEWCOMER, "Owner");

    assert!(reply.text.contains("registered as the owner"));
    assert!(engine.employee("owner").is_owner());
}

#[test]
fn test_unknown_name_asks_again() {
    let mut engine = TestEngine::new();
    engine.say(NEWCOMER, "authenticate");

    let reply = engine.say(NEWCOMER, "Zed");

    assert!(reply.text.contains("No employee matches"));
    assert_eq!(
        engine.step_of(NEWCOMER),
        Some(ConversationStep::WaitingForEmployeeName)
    );
}

#[test]
fn test_ambiguous_name_asks_for_full_name() {
    let mut roster = create_test_roster();
    roster.push(roster_entry("bobby", "Bobby"));
    let mut engine = TestEngine::with(create_test_config(), roster);
    engine.say(NEWCOMER, "authenticate");

    let reply = engine.say(NEWCOMER, "bo");

    assert!(reply.text.contains("Several employees match"));
    assert!(reply.text.contains("Bobby"));
    assert!(engine.step_of(NEWCOMER).is_some());
}

#[test]
fn test_exact_name_wins_over_partial_matches() {
    let mut roster = create_test_roster();
    roster.push(roster_entry("bobby", "Bobby"));
    let mut engine = TestEngine::with(create_test_config(), roster);
    engine.say(NEWCOMER, "authenticate");

    let reply = engine.say(NEWCOMER, "Bob");

    assert!(reply.text.contains("Welcome, Bob!"));
}

#[test]
fn test_email_outside_allow_list_is_refused() {
    let mut config = create_test_config();
    config.allowed_emails = vec![String::from("alice@example.com")];
    let mut engine = TestEngine::with(config, create_test_roster());
    engine.say(NEWCOMER, "authenticate");

    let reply = engine.say(NEWCOMER, "Bob");

    assert!(reply.text.contains("not permitted"));
    assert!(engine.step_of(NEWCOMER).is_none());
    assert!(
        engine
            .persistence
            .get_employee_by_chat_user(NEWCOMER)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_email_on_allow_list_is_accepted() {
    let mut config = create_test_config();
    config.allowed_emails = vec![String::from("ALICE@example.com")];
    let mut engine = TestEngine::with(config, create_test_roster());
    engine.say(NEWCOMER, "authenticate");

    let reply = engine.say(NEWCOMER, "Alice");

    assert!(reply.text.contains("Welcome"));
}

#[test]
fn test_empty_roster_ends_dialogue() {
    let mut engine = TestEngine::with(create_test_config(), Vec::new());
    engine.say(NEWCOMER, "authenticate");

    let reply = engine.say(NEWCOMER, "Alice");

    assert!(reply.text.contains("roster is unavailable"));
    assert!(engine.step_of(NEWCOMER).is_none());
}
