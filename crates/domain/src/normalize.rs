// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Text normalization for user input.
//!
//! Chat users type dates, times and names with a mix of full-width and
//! half-width characters, and names in either hiragana or katakana. The
//! helpers here fold those variants so comparisons are stable.

use crate::types::Candidate;

const FULL_WIDTH_START: u32 = 0xFF01;
const FULL_WIDTH_END: u32 = 0xFF5E;
const FULL_WIDTH_OFFSET: u32 = 0xFEE0;
const IDEOGRAPHIC_SPACE: char = '\u{3000}';

const KATAKANA_START: u32 = 0x30A1;
const KATAKANA_END: u32 = 0x30F6;
const KANA_OFFSET: u32 = 0x60;

/// Folds full-width ASCII variants (digits, letters, punctuation and the
/// ideographic space) to their half-width forms.
#[must_use]
pub fn fold_full_width(input: &str) -> String {
    input.chars().map(fold_width_char).collect()
}

fn fold_width_char(c: char) -> char {
    if c == IDEOGRAPHIC_SPACE {
        return ' ';
    }
    let code: u32 = u32::from(c);
    if (FULL_WIDTH_START..=FULL_WIDTH_END).contains(&code) {
        return char::from_u32(code - FULL_WIDTH_OFFSET).unwrap_or(c);
    }
    c
}

fn fold_kana_char(c: char) -> char {
    let code: u32 = u32::from(c);
    if (KATAKANA_START..=KATAKANA_END).contains(&code) {
        return char::from_u32(code - KANA_OFFSET).unwrap_or(c);
    }
    c
}

/// Normalizes a person's name for comparison.
///
/// Whitespace is removed, full-width characters are folded, katakana is
/// mapped to hiragana and Latin letters are lowercased.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .map(fold_width_char)
        .filter(|c| !c.is_whitespace())
        .map(fold_kana_char)
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns whether a typed query refers to the given name.
///
/// After normalization either string may contain the other, so both
/// "たなか" and "田中 太郎" style partial inputs resolve.
#[must_use]
pub fn names_match(query: &str, name: &str) -> bool {
    let query: String = normalize_name(query);
    let name: String = normalize_name(name);
    if query.is_empty() || name.is_empty() {
        return false;
    }
    name.contains(&query) || query.contains(&name)
}

/// Returns the candidates whose display name matches the query.
///
/// An exact normalized match wins outright; otherwise every partial match
/// is returned in roster order.
#[must_use]
pub fn match_candidates<'a>(query: &str, candidates: &'a [Candidate]) -> Vec<&'a Candidate> {
    let normalized: String = normalize_name(query);
    let exact: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| normalize_name(&c.display_name) == normalized)
        .collect();
    if exact.len() == 1 {
        return exact;
    }
    candidates
        .iter()
        .filter(|c| names_match(query, &c.display_name))
        .collect()
}
