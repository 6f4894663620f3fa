// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Overlap detection between shifts.
//!
//! Ranges are half-open: a shift ending at 14:00 does not overlap one
//! starting at 14:00.

use crate::shift::Shift;
use crate::time_range::TimeRange;
use crate::types::Candidate;
use time::Date;

/// Returns whether `candidate` intersects `existing`.
#[must_use]
pub fn overlaps(existing: &TimeRange, candidate: &TimeRange) -> bool {
    candidate.start() < existing.end() && candidate.end() > existing.start()
}

/// Returns whether any of the existing ranges intersects `candidate`.
#[must_use]
pub fn overlaps_any<'a, I>(existing: I, candidate: &TimeRange) -> bool
where
    I: IntoIterator<Item = &'a TimeRange>,
{
    existing.into_iter().any(|range| overlaps(range, candidate))
}

/// Returns whether the employee already works during `range` on `date`.
#[must_use]
pub fn has_conflict(
    shifts: &[Shift],
    employee_id: &crate::EmployeeId,
    date: Date,
    range: &TimeRange,
) -> bool {
    overlaps_any(
        shifts
            .iter()
            .filter(|s| &s.employee_id == employee_id && s.date == date)
            .map(|s| &s.range),
        range,
    )
}

/// Candidates split by whether they can take a time slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Availability {
    /// Candidates free during the slot, in input order.
    pub available: Vec<Candidate>,
    /// Candidates who already work during the slot, in input order.
    pub overlapping: Vec<Candidate>,
}

/// Partitions candidates by availability for `range` on `date`.
///
/// `shifts` may contain shifts of any employee or day; only matching ones
/// are consulted.
#[must_use]
pub fn available_and_overlapping(
    candidates: &[Candidate],
    date: Date,
    range: &TimeRange,
    shifts: &[Shift],
) -> Availability {
    let (overlapping, available): (Vec<Candidate>, Vec<Candidate>) = candidates
        .iter()
        .cloned()
        .partition(|c| has_conflict(shifts, &c.employee_id, date, range));
    Availability {
        available,
        overlapping,
    }
}
