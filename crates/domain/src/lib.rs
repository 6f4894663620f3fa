// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod normalize;
mod overlap;
mod request;
mod shift;
mod time_range;
mod types;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use normalize::{fold_full_width, match_candidates, names_match, normalize_name};
pub use overlap::{Availability, available_and_overlapping, has_conflict, overlaps, overlaps_any};
pub use request::{
    AdditionRequest, Decision, DeletionRequest, ExchangeRequest, RequestId, RequestKind,
    RequestStatus, validate_reason,
};
pub use shift::{MergePlan, NewShift, Shift, plan_merge};
pub use time_range::{
    TimeRange, ensure_not_past, format_date, format_time, parse_clock_time, parse_date_input,
    parse_iso_date, parse_time_input, parse_time_range_input,
};
pub use types::{Candidate, Employee, EmployeeId, Role};
