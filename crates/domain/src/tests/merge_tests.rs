// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_date, create_test_range, create_test_shift};
use crate::{EmployeeId, MergePlan, plan_merge};

#[test]
fn test_merge_creates_shift_when_day_is_free() {
    let incoming = create_test_range((18, 0), (20, 0));
    let plan = plan_merge(
        &[],
        &EmployeeId::new("b"),
        create_test_date(20),
        incoming,
        Some(EmployeeId::new("a")),
        true,
    );

    match plan {
        MergePlan::Create(shift) => {
            assert_eq!(shift.employee_id, EmployeeId::new("b"));
            assert_eq!(shift.range, incoming);
            assert!(shift.is_modified);
            assert_eq!(shift.original_employee_id, Some(EmployeeId::new("a")));
        }
        other => panic!("expected create, got {other:?}"),
    }
}

#[test]
fn test_merge_keeps_covering_shift() {
    let existing = vec![create_test_shift(7, "b", 20, create_test_range((9, 0), (18, 0)))];
    let plan = plan_merge(
        &existing,
        &EmployeeId::new("b"),
        create_test_date(20),
        create_test_range((10, 0), (12, 0)),
        None,
        true,
    );
    assert_eq!(plan, MergePlan::Unchanged { shift_id: 7 });
}

#[test]
fn test_merge_widens_overlapping_shift_to_union() {
    let existing = vec![create_test_shift(3, "b", 20, create_test_range((19, 0), (22, 0)))];
    let plan = plan_merge(
        &existing,
        &EmployeeId::new("b"),
        create_test_date(20),
        create_test_range((18, 0), (20, 0)),
        None,
        true,
    );
    assert_eq!(
        plan,
        MergePlan::Widen {
            shift_id: 3,
            range: create_test_range((18, 0), (22, 0)),
            absorbed: vec![],
        }
    );
}

#[test]
fn test_merge_absorbs_shifts_bridged_by_widening() {
    let existing = vec![
        create_test_shift(1, "b", 20, create_test_range((9, 0), (12, 0))),
        create_test_shift(2, "b", 20, create_test_range((13, 0), (15, 0))),
        create_test_shift(3, "b", 20, create_test_range((19, 0), (21, 0))),
    ];
    let plan = plan_merge(
        &existing,
        &EmployeeId::new("b"),
        create_test_date(20),
        create_test_range((11, 0), (14, 0)),
        None,
        true,
    );
    assert_eq!(
        plan,
        MergePlan::Widen {
            shift_id: 1,
            range: create_test_range((9, 0), (15, 0)),
            absorbed: vec![2],
        }
    );
}

#[test]
fn test_merge_extends_disjoint_shift_to_cover_both() {
    let existing = vec![create_test_shift(4, "b", 5, create_test_range((9, 0), (12, 0)))];
    let plan = plan_merge(
        &existing,
        &EmployeeId::new("b"),
        create_test_date(5),
        create_test_range((18, 0), (20, 0)),
        Some(EmployeeId::new("a")),
        true,
    );
    assert_eq!(
        plan,
        MergePlan::Widen {
            shift_id: 4,
            range: create_test_range((9, 0), (20, 0)),
            absorbed: vec![],
        }
    );
}

#[test]
fn test_merge_disjoint_widening_absorbs_shifts_in_between() {
    let existing = vec![
        create_test_shift(1, "b", 20, create_test_range((9, 0), (10, 0))),
        create_test_shift(2, "b", 20, create_test_range((13, 0), (15, 0))),
    ];
    let plan = plan_merge(
        &existing,
        &EmployeeId::new("b"),
        create_test_date(20),
        create_test_range((18, 0), (20, 0)),
        None,
        true,
    );
    assert_eq!(
        plan,
        MergePlan::Widen {
            shift_id: 1,
            range: create_test_range((9, 0), (20, 0)),
            absorbed: vec![2],
        }
    );
}

#[test]
fn test_merge_extends_adjacent_shift_and_ignores_other_days_and_employees() {
    let existing = vec![
        create_test_shift(1, "b", 20, create_test_range((14, 0), (18, 0))),
        create_test_shift(2, "c", 20, create_test_range((9, 0), (14, 0))),
        create_test_shift(3, "b", 21, create_test_range((9, 0), (14, 0))),
    ];
    let plan = plan_merge(
        &existing,
        &EmployeeId::new("b"),
        create_test_date(20),
        create_test_range((9, 0), (14, 0)),
        None,
        false,
    );
    assert_eq!(
        plan,
        MergePlan::Widen {
            shift_id: 1,
            range: create_test_range((9, 0), (18, 0)),
            absorbed: vec![],
        }
    );
}

#[test]
fn test_merge_ignores_other_days_and_employees_when_day_is_free() {
    let existing = vec![
        create_test_shift(2, "c", 20, create_test_range((9, 0), (14, 0))),
        create_test_shift(3, "b", 21, create_test_range((9, 0), (14, 0))),
    ];
    let plan = plan_merge(
        &existing,
        &EmployeeId::new("b"),
        create_test_date(20),
        create_test_range((9, 0), (14, 0)),
        None,
        false,
    );
    assert!(matches!(plan, MergePlan::Create(_)));
}
