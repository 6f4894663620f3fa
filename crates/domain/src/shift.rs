// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::time_range::TimeRange;
use crate::types::EmployeeId;
use serde::{Deserialize, Serialize};
use time::Date;

/// A persisted work shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Database identifier.
    pub shift_id: i64,
    /// The employee working the shift.
    pub employee_id: EmployeeId,
    /// Calendar day of the shift.
    pub date: Date,
    /// Wall-clock bounds.
    pub range: TimeRange,
    /// Set when the shift was produced or reshaped by an approved request.
    pub is_modified: bool,
    /// The employee who held the hours before an exchange moved them.
    pub original_employee_id: Option<EmployeeId>,
}

/// A shift that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShift {
    /// The employee working the shift.
    pub employee_id: EmployeeId,
    /// Calendar day of the shift.
    pub date: Date,
    /// Wall-clock bounds.
    pub range: TimeRange,
    /// Whether the shift originates from an approved request.
    pub is_modified: bool,
    /// Provenance tag.
    pub original_employee_id: Option<EmployeeId>,
}

impl NewShift {
    /// Creates a plain scheduled shift.
    #[must_use]
    pub const fn scheduled(employee_id: EmployeeId, date: Date, range: TimeRange) -> Self {
        Self {
            employee_id,
            date,
            range,
            is_modified: false,
            original_employee_id: None,
        }
    }
}

/// How incoming hours are folded into an employee's day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergePlan {
    /// The employee has no shift that day; store a new one.
    Create(NewShift),
    /// An existing shift already covers the hours.
    Unchanged {
        /// The covering shift.
        shift_id: i64,
    },
    /// An existing shift is widened to cover the hours.
    Widen {
        /// The shift that survives.
        shift_id: i64,
        /// Its new bounds.
        range: TimeRange,
        /// Other same-day shifts swallowed by the widened range.
        absorbed: Vec<i64>,
    },
}

/// Plans how to give `employee_id` the hours `incoming` on `date`.
///
/// Only shifts of that employee on that day are considered. A day without
/// shifts gets a new one. Otherwise one shift is kept: the earliest that
/// overlaps the incoming hours, or the earliest of the day when none does.
/// It stays unchanged if it already covers the hours and is widened to
/// `[min(starts), max(ends)]` otherwise. Further same-day shifts that the
/// widened range now overlaps are absorbed into it.
///
/// # Arguments
///
/// * `existing` - Shifts to consider; unrelated entries are ignored
/// * `employee_id` - The employee receiving the hours
/// * `date` - The day of the hours
/// * `incoming` - The hours to add
/// * `provenance` - Original holder recorded on a newly created shift
/// * `is_modified` - Modification flag for a newly created shift
#[must_use]
pub fn plan_merge(
    existing: &[Shift],
    employee_id: &EmployeeId,
    date: Date,
    incoming: TimeRange,
    provenance: Option<EmployeeId>,
    is_modified: bool,
) -> MergePlan {
    let mut same_day: Vec<&Shift> = existing
        .iter()
        .filter(|s| &s.employee_id == employee_id && s.date == date)
        .collect();
    same_day.sort_by_key(|s| (s.range.start(), s.shift_id));

    let Some(target) = same_day
        .iter()
        .find(|s| crate::overlap::overlaps(&s.range, &incoming))
        .or_else(|| same_day.first())
    else {
        return MergePlan::Create(NewShift {
            employee_id: employee_id.clone(),
            date,
            range: incoming,
            is_modified,
            original_employee_id: provenance,
        });
    };

    if target.range.contains(&incoming) {
        return MergePlan::Unchanged {
            shift_id: target.shift_id,
        };
    }

    let mut widened: TimeRange = target.range.union(&incoming);
    let mut absorbed: Vec<i64> = Vec::new();
    loop {
        let next: Option<&&Shift> = same_day.iter().find(|s| {
            s.shift_id != target.shift_id
                && !absorbed.contains(&s.shift_id)
                && crate::overlap::overlaps(&s.range, &widened)
        });
        match next {
            Some(shift) => {
                widened = widened.union(&shift.range);
                absorbed.push(shift.shift_id);
            }
            None => break,
        }
    }

    MergePlan::Widen {
        shift_id: target.shift_id,
        range: widened,
        absorbed,
    }
}
