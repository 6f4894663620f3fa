// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftbot_domain::fold_full_width;

/// A yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Go ahead.
    Yes,
    /// Abandon.
    No,
}

const YES_WORDS: [&str; 8] = ["yes", "y", "ok", "sure", "はい", "うん", "お願いします", "送信"];
const NO_WORDS: [&str; 7] = ["no", "n", "cancel", "いいえ", "いや", "キャンセル", "やめる"];

impl Confirmation {
    /// Reads a yes/no answer; anything else yields `None`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let folded: String = fold_full_width(text).trim().to_lowercase();
        let answer: &str = folded.trim_end_matches(['.', '!', '。', '！']);
        if YES_WORDS.contains(&answer) {
            Some(Self::Yes)
        } else if NO_WORDS.contains(&answer) {
            Some(Self::No)
        } else {
            None
        }
    }
}

/// Reads a 1-based list position and returns the 0-based index.
///
/// Returns `None` unless the text is a number between 1 and `len`.
#[must_use]
pub fn parse_index(text: &str, len: usize) -> Option<usize> {
    let position: usize = fold_full_width(text).trim().parse().ok()?;
    (1..=len).contains(&position).then(|| position - 1)
}

/// Splits a multi-selection such as `1, 3` or `田中、鈴木` into items.
///
/// Commas in half width, full width and the ideographic comma are all
/// separators. Empty items are dropped.
#[must_use]
pub fn split_selection(text: &str) -> Vec<String> {
    fold_full_width(text)
        .split([',', '、'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
