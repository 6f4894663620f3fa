// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;
use std::path::PathBuf;

use diesel::sql_types::{BigInt, Text};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use shiftbot::{Command, ConversationStep};
use shiftbot_persistence::Persistence;
use time::Duration;

use super::helpers::{
    ALICE, TestEngine, create_test_config, create_test_range, create_test_roster, test_now,
};

#[test]
fn test_help_is_answered_in_groups_and_to_strangers() {
    let mut engine = TestEngine::new();

    let reply = engine.say_in_group("U-stranger", "help").unwrap();

    assert!(reply.text.contains(Command::StartExchange.description()));
    assert!(reply.text.contains("ヘルプ"));
}

#[test]
fn test_unrecognized_text_in_direct_chat_gets_a_hint() {
    let mut engine = TestEngine::with_staff();

    let reply = engine.say(ALICE, "good morning");

    assert!(reply.text.contains("did not understand"));
}

#[test]
fn test_unrecognized_text_in_group_is_ignored() {
    let mut engine = TestEngine::with_staff();

    assert!(engine.say_in_group(ALICE, "good morning").is_none());
}

#[test]
fn test_japanese_alias_starts_dialogue() {
    let mut engine = TestEngine::with_staff();

    engine.say(ALICE, "シフト交代");

    assert!(matches!(
        engine.step_of(ALICE),
        Some(ConversationStep::WaitingForShiftDate { .. })
    ));
}

#[test]
fn test_configured_alias_is_recognized() {
    let mut config = create_test_config();
    config.command_aliases = BTreeMap::from([(String::from("swap"), Command::StartExchange)]);
    let mut engine = TestEngine::with(config, create_test_roster());
    engine.link_staff();

    engine.say(ALICE, "Swap");

    assert!(matches!(
        engine.step_of(ALICE),
        Some(ConversationStep::WaitingForShiftDate { .. })
    ));
}

#[test]
fn test_unlinked_user_is_asked_to_authenticate() {
    let mut engine = TestEngine::with_staff();

    let reply = engine.say("U-stranger", "exchange");

    assert!(reply.text.contains("not linked"));
    assert!(engine.step_of("U-stranger").is_none());
}

#[test]
fn test_dialogue_command_in_group_asks_for_direct_chat() {
    let mut engine = TestEngine::with_staff();

    let reply = engine.say_in_group(ALICE, "exchange").unwrap();

    assert!(reply.text.contains("direct chat"));
    assert!(engine.step_of(ALICE).is_none());
}

#[test]
fn test_command_interrupts_dialogue() {
    let mut engine = TestEngine::with_staff();
    engine.say(ALICE, "exchange");
    assert!(engine.step_of(ALICE).is_some());

    let reply = engine.say(ALICE, "my shifts");

    assert!(reply.text.contains("no shifts"));
    assert!(engine.step_of(ALICE).is_none());
}

#[test]
fn test_command_restarts_the_same_dialogue() {
    let mut engine = TestEngine::with_staff();
    engine.seed_shift("alice", 20, create_test_range((18, 0), (20, 0)));
    engine.say(ALICE, "exchange");
    engine.say(ALICE, "2025-09-20");
    assert!(matches!(
        engine.step_of(ALICE),
        Some(ConversationStep::WaitingForShiftSelection { .. })
    ));

    engine.say(ALICE, "exchange");

    assert!(matches!(
        engine.step_of(ALICE),
        Some(ConversationStep::WaitingForShiftDate { .. })
    ));
}

#[test]
fn test_expired_dialogue_is_discarded_silently() {
    let mut engine = TestEngine::with_staff();
    engine.seed_shift("alice", 20, create_test_range((18, 0), (20, 0)));
    engine.say(ALICE, "exchange");

    let later = test_now() + Duration::minutes(31);
    let reply = engine.say_at(ALICE, "2025-09-20", later).unwrap();

    assert!(reply.text.contains("did not understand"));
    assert!(engine.step_of(ALICE).is_none());
}

#[test]
fn test_dialogue_continues_within_its_lifetime() {
    let mut engine = TestEngine::with_staff();
    engine.seed_shift("alice", 20, create_test_range((18, 0), (20, 0)));
    engine.say(ALICE, "exchange");

    let later = test_now() + Duration::minutes(29);
    let reply = engine.say_at(ALICE, "9/20", later).unwrap();

    assert!(reply.text.contains("2025-09-20"));
    assert_eq!(reply.actions.len(), 1);
}

#[test]
fn test_unknown_postback_is_reported() {
    let mut engine = TestEngine::with_staff();

    let reply = engine.press(ALICE, "bogus_1");

    assert!(reply.text.contains("no longer valid"));
}

#[test]
fn test_invalid_date_keeps_dialogue_open() {
    let mut engine = TestEngine::with_staff();
    engine.say(ALICE, "exchange");

    let reply = engine.say(ALICE, "someday");

    assert!(reply.text.contains("Which day"));
    assert!(matches!(
        engine.step_of(ALICE),
        Some(ConversationStep::WaitingForShiftDate { .. })
    ));
}

#[test]
fn test_past_date_is_refused() {
    let mut engine = TestEngine::with_staff();
    engine.say(ALICE, "exchange");

    let reply = engine.say(ALICE, "2025-08-31");

    assert!(reply.text.contains("in the past"));
    assert!(engine.step_of(ALICE).is_some());
}

/// Removes the database file and its WAL side files when dropped.
struct ScratchDatabase(PathBuf);

impl ScratchDatabase {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("{name}-{}.db", std::process::id()));
        let scratch = Self(path);
        scratch.remove();
        scratch
    }

    fn url(&self) -> &str {
        self.0.to_str().unwrap()
    }

    fn remove(&self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", self.url()));
        }
    }
}

impl Drop for ScratchDatabase {
    fn drop(&mut self) {
        self.remove();
    }
}

#[test]
fn test_unreadable_state_is_cleared_with_restart_message() {
    let scratch = ScratchDatabase::new("shiftbot-unreadable-state");
    let mut engine = TestEngine::new();
    engine.persistence = Persistence::new_with_file(scratch.url()).unwrap();
    engine.link_staff();

    // A row left behind by a dialogue step this build does not know.
    let mut raw = SqliteConnection::establish(scratch.url()).unwrap();
    diesel::sql_query(
        "INSERT INTO conversation_states (chat_user_id, step_json, created_at, expires_at) \
         VALUES (?, ?, ?, ?)",
    )
    .bind::<Text, _>(ALICE)
    .bind::<Text, _>("{\"step\":\"waiting_for_nothing\"}")
    .bind::<BigInt, _>(test_now().unix_timestamp())
    .bind::<BigInt, _>((test_now() + Duration::minutes(30)).unix_timestamp())
    .execute(&mut raw)
    .unwrap();

    let reply = engine.say(ALICE, "2025-09-20");

    assert!(reply.text.contains("lost track of our conversation"));
    assert!(engine.step_of(ALICE).is_none());

    let next = engine.say(ALICE, "exchange");
    assert!(next.text.contains("Which day"));
}
