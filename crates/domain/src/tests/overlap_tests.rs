// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_date, create_test_range, create_test_shift};
use crate::{Candidate, EmployeeId, available_and_overlapping, has_conflict, overlaps, overlaps_any};

#[test]
fn test_partial_overlap_is_detected() {
    let existing = create_test_range((9, 0), (12, 0));
    let candidate = create_test_range((11, 0), (14, 0));
    assert!(overlaps(&existing, &candidate));
    assert!(overlaps(&candidate, &existing));
}

#[test]
fn test_touching_ranges_do_not_overlap() {
    let morning = create_test_range((9, 0), (14, 0));
    let afternoon = create_test_range((14, 0), (18, 0));
    assert!(!overlaps(&morning, &afternoon));
    assert!(!overlaps(&afternoon, &morning));
}

#[test]
fn test_containment_counts_as_overlap() {
    let outer = create_test_range((9, 0), (18, 0));
    let inner = create_test_range((12, 0), (13, 0));
    assert!(overlaps(&outer, &inner));
    assert!(overlaps(&inner, &outer));
}

#[test]
fn test_overlaps_any_with_no_existing_ranges() {
    let candidate = create_test_range((9, 0), (10, 0));
    assert!(!overlaps_any(std::iter::empty(), &candidate));
}

#[test]
fn test_conflict_ignores_other_days_and_employees() {
    let range = create_test_range((18, 0), (20, 0));
    let shifts = vec![
        create_test_shift(1, "e1", 21, range),
        create_test_shift(2, "e2", 20, range),
    ];
    assert!(!has_conflict(&shifts, &EmployeeId::new("e1"), create_test_date(20), &range));
    assert!(has_conflict(&shifts, &EmployeeId::new("e2"), create_test_date(20), &range));
}

#[test]
fn test_availability_partitions_candidates_in_order() {
    let slot = create_test_range((12, 0), (17, 0));
    let shifts = vec![
        create_test_shift(1, "x", 20, create_test_range((14, 0), (18, 0))),
        create_test_shift(2, "z", 20, create_test_range((9, 0), (12, 0))),
    ];
    let candidates = vec![
        Candidate::new(EmployeeId::new("x"), "Xavier"),
        Candidate::new(EmployeeId::new("y"), "Yuki"),
        Candidate::new(EmployeeId::new("z"), "Zoe"),
    ];

    let availability = available_and_overlapping(&candidates, create_test_date(20), &slot, &shifts);

    let available: Vec<&str> = availability
        .available
        .iter()
        .map(|c| c.employee_id.value())
        .collect();
    let overlapping: Vec<&str> = availability
        .overlapping
        .iter()
        .map(|c| c.display_name.as_str())
        .collect();
    assert_eq!(available, vec!["y", "z"]);
    assert_eq!(overlapping, vec!["Xavier"]);
}
