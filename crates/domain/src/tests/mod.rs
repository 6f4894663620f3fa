// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod merge_tests;
mod normalize_tests;
mod overlap_tests;
mod parsing_tests;
mod request_tests;

use crate::{EmployeeId, Shift, TimeRange};
use time::{Date, Month, Time};

pub fn create_test_range(start: (u8, u8), end: (u8, u8)) -> TimeRange {
    TimeRange::new(
        Time::from_hms(start.0, start.1, 0).unwrap(),
        Time::from_hms(end.0, end.1, 0).unwrap(),
    )
    .unwrap()
}

pub fn create_test_date(day: u8) -> Date {
    Date::from_calendar_date(2025, Month::September, day).unwrap()
}

pub fn create_test_shift(shift_id: i64, employee: &str, day: u8, range: TimeRange) -> Shift {
    Shift {
        shift_id,
        employee_id: EmployeeId::new(employee),
        date: create_test_date(day),
        range,
        is_modified: false,
        original_employee_id: None,
    }
}
