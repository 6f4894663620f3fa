// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Candidate, EmployeeId, fold_full_width, match_candidates, names_match, normalize_name};

fn create_test_candidates() -> Vec<Candidate> {
    vec![
        Candidate::new(EmployeeId::new("e1"), "田中 太郎"),
        Candidate::new(EmployeeId::new("e2"), "田中 花子"),
        Candidate::new(EmployeeId::new("e3"), "スズキ"),
        Candidate::new(EmployeeId::new("e4"), "Alice Smith"),
    ]
}

#[test]
fn test_katakana_folds_to_hiragana() {
    assert_eq!(normalize_name("スズキ"), "すずき");
    assert_eq!(normalize_name("すずき"), "すずき");
}

#[test]
fn test_whitespace_and_case_are_ignored() {
    assert_eq!(normalize_name(" Alice  Smith "), "alicesmith");
    assert_eq!(normalize_name("田中\u{3000}太郎"), "田中太郎");
    assert_eq!(normalize_name("ＡＬＩＣＥ"), "alice");
}

#[test]
fn test_full_width_folding() {
    assert_eq!(fold_full_width("１２：３０"), "12:30");
    assert_eq!(fold_full_width("ａ\u{3000}ｂ"), "a b");
}

#[test]
fn test_substring_match_works_both_ways() {
    assert!(names_match("田中", "田中 太郎"));
    assert!(names_match("田中太郎さん", "田中太郎"));
    assert!(!names_match("佐藤", "田中 太郎"));
    assert!(!names_match("   ", "田中 太郎"));
}

#[test]
fn test_candidate_matching_returns_all_partial_matches() {
    let candidates = create_test_candidates();
    let matches = match_candidates("田中", &candidates);
    assert_eq!(matches.len(), 2);
}

#[test]
fn test_candidate_matching_prefers_exact_name() {
    let candidates = create_test_candidates();
    let matches = match_candidates("たなか はなこ", &candidates);
    assert!(matches.is_empty());

    let matches = match_candidates("田中花子", &candidates);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].employee_id, EmployeeId::new("e2"));

    let matches = match_candidates("すずき", &candidates);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].employee_id, EmployeeId::new("e3"));
}
