// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use shiftbot_domain::fold_full_width;
use std::collections::BTreeMap;

/// A top-level chat command.
///
/// Commands start a dialogue or answer immediately. Sending one always
/// abandons whatever dialogue was in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    /// List the available commands.
    Help,
    /// Link the chat account to a roster employee.
    Authenticate,
    /// Show the sender's upcoming shifts.
    ShowMyShifts,
    /// Show everyone's shifts for the coming days.
    ShowAllShifts,
    /// Begin handing a shift to a colleague.
    StartExchange,
    /// Begin asking employees to take extra hours (owner only).
    StartAddition,
    /// Begin asking for one's shift to be removed.
    StartDeletion,
    /// List requests waiting on or sent by the sender.
    CheckPending,
}

impl Command {
    /// Every command, in help order.
    pub const ALL: [Self; 8] = [
        Self::Help,
        Self::Authenticate,
        Self::ShowMyShifts,
        Self::ShowAllShifts,
        Self::StartExchange,
        Self::StartAddition,
        Self::StartDeletion,
        Self::CheckPending,
    ];

    /// Returns the canonical English phrase for the command.
    #[must_use]
    pub const fn phrase(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Authenticate => "authenticate",
            Self::ShowMyShifts => "my shifts",
            Self::ShowAllShifts => "all shifts",
            Self::StartExchange => "exchange",
            Self::StartAddition => "add shift",
            Self::StartDeletion => "delete shift",
            Self::CheckPending => "pending",
        }
    }

    /// Returns the stable identifier, also accepted as a phrase.
    #[must_use]
    pub const fn identifier(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Authenticate => "authenticate",
            Self::ShowMyShifts => "show-my-shifts",
            Self::ShowAllShifts => "show-all-shifts",
            Self::StartExchange => "start-exchange",
            Self::StartAddition => "start-addition",
            Self::StartDeletion => "start-deletion",
            Self::CheckPending => "check-pending",
        }
    }

    /// Returns the default Japanese alias for the command.
    #[must_use]
    pub const fn japanese_alias(&self) -> &'static str {
        match self {
            Self::Help => "ヘルプ",
            Self::Authenticate => "認証",
            Self::ShowMyShifts => "自分のシフト",
            Self::ShowAllShifts => "全員のシフト",
            Self::StartExchange => "シフト交代",
            Self::StartAddition => "シフト追加",
            Self::StartDeletion => "欠勤申請",
            Self::CheckPending => "依頼確認",
        }
    }

    /// Returns a one-line description used by help.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Help => "show this list",
            Self::Authenticate => "link your chat account to your employee record",
            Self::ShowMyShifts => "show your upcoming shifts",
            Self::ShowAllShifts => "show everyone's shifts for the coming week",
            Self::StartExchange => "ask a colleague to take over one of your shifts",
            Self::StartAddition => "ask employees to work extra hours (owner)",
            Self::StartDeletion => "ask the owner to remove one of your shifts",
            Self::CheckPending => "show requests waiting for you",
        }
    }

    /// Returns whether the sender must have a linked account.
    #[must_use]
    pub const fn requires_authentication(&self) -> bool {
        !matches!(self, Self::Help | Self::Authenticate)
    }

    /// Returns whether the command may only be used in a one-to-one chat.
    #[must_use]
    pub const fn requires_direct_chat(&self) -> bool {
        !matches!(self, Self::Help)
    }
}

/// Maps message text to commands.
///
/// Matching is exact after trimming, full-width folding and lowercasing,
/// so a command phrase inside a longer sentence is not treated as a
/// command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandVocabulary {
    phrases: BTreeMap<String, Command>,
}

impl CommandVocabulary {
    /// Builds the vocabulary of identifiers, English phrases and Japanese
    /// aliases.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut phrases: BTreeMap<String, Command> = BTreeMap::new();
        for command in Command::ALL {
            phrases.insert(normalize_phrase(command.identifier()), command);
            phrases.insert(normalize_phrase(command.phrase()), command);
            phrases.insert(normalize_phrase(command.japanese_alias()), command);
        }
        Self { phrases }
    }

    /// Adds extra phrases on top of the defaults.
    #[must_use]
    pub fn with_aliases(mut self, aliases: &BTreeMap<String, Command>) -> Self {
        for (phrase, command) in aliases {
            let key: String = normalize_phrase(phrase);
            if !key.is_empty() {
                self.phrases.insert(key, *command);
            }
        }
        self
    }

    /// Returns the command named by `text`, if any.
    #[must_use]
    pub fn recognize(&self, text: &str) -> Option<Command> {
        self.phrases.get(&normalize_phrase(text)).copied()
    }

    /// Returns every phrase that triggers `command`.
    #[must_use]
    pub fn phrases_for(&self, command: Command) -> Vec<&str> {
        self.phrases
            .iter()
            .filter(|(_, c)| **c == command)
            .map(|(phrase, _)| phrase.as_str())
            .collect()
    }
}

impl Default for CommandVocabulary {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn normalize_phrase(text: &str) -> String {
    fold_full_width(text)
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}
