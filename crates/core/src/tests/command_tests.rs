// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, CommandVocabulary};
use std::collections::BTreeMap;

#[test]
fn test_english_and_japanese_phrases_are_recognized() {
    let vocabulary = CommandVocabulary::with_defaults();
    assert_eq!(vocabulary.recognize("help"), Some(Command::Help));
    assert_eq!(vocabulary.recognize("  Exchange "), Some(Command::StartExchange));
    assert_eq!(vocabulary.recognize("シフト交代"), Some(Command::StartExchange));
    assert_eq!(vocabulary.recognize("欠勤申請"), Some(Command::StartDeletion));
    assert_eq!(vocabulary.recognize("my   shifts"), Some(Command::ShowMyShifts));
    assert_eq!(vocabulary.recognize("check-pending"), Some(Command::CheckPending));
}

#[test]
fn test_phrase_inside_sentence_is_not_a_command() {
    let vocabulary = CommandVocabulary::with_defaults();
    assert_eq!(vocabulary.recognize("I need help with exchange"), None);
    assert_eq!(vocabulary.recognize(""), None);
}

#[test]
fn test_configured_aliases_extend_defaults() {
    let mut aliases = BTreeMap::new();
    aliases.insert(String::from("Swap"), Command::StartExchange);
    aliases.insert(String::from("   "), Command::Help);
    let vocabulary = CommandVocabulary::with_defaults().with_aliases(&aliases);

    assert_eq!(vocabulary.recognize("swap"), Some(Command::StartExchange));
    assert_eq!(vocabulary.recognize("exchange"), Some(Command::StartExchange));
    assert!(vocabulary.phrases_for(Command::StartExchange).contains(&"swap"));
    assert_eq!(vocabulary.recognize(""), None);
}

#[test]
fn test_command_gating() {
    assert!(!Command::Help.requires_authentication());
    assert!(!Command::Help.requires_direct_chat());
    assert!(!Command::Authenticate.requires_authentication());
    assert!(Command::Authenticate.requires_direct_chat());
    assert!(Command::StartAddition.requires_authentication());
    assert!(Command::CheckPending.requires_direct_chat());
}

#[test]
fn test_commands_deserialize_from_kebab_case() {
    let command: Command = serde_json::from_str("\"start-exchange\"").unwrap();
    assert_eq!(command, Command::StartExchange);
}
