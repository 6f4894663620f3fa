// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Text fragments shared by replies and notifications.

use shiftbot_domain::{Candidate, TimeRange, format_date};
use time::Date;

/// Formats a date and hours as `YYYY-MM-DD HH:MM-HH:MM`.
#[must_use]
pub fn describe_slot(date: Date, range: &TimeRange) -> String {
    format!("{} {range}", format_date(date))
}

/// Formats items as a 1-based numbered list, one per line.
#[must_use]
pub fn numbered<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item.as_ref()))
        .collect::<Vec<String>>()
        .join("\n")
}

/// Joins candidate names with commas.
#[must_use]
pub fn names(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .map(|c| c.display_name.as_str())
        .collect::<Vec<&str>>()
        .join(", ")
}
