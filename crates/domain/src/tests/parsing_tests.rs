// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_date, create_test_range};
use crate::{
    DomainError, ensure_not_past, format_date, format_time, parse_clock_time, parse_date_input,
    parse_iso_date, parse_time_input, parse_time_range_input,
};
use time::{Date, Month, Time};

#[test]
fn test_iso_date_input() {
    let today = create_test_date(1);
    assert_eq!(parse_date_input("2025-09-20", today).unwrap(), create_test_date(20));
    assert_eq!(parse_date_input("2025/09/20", today).unwrap(), create_test_date(20));
}

#[test]
fn test_month_day_input_uses_current_year() {
    let today = create_test_date(1);
    assert_eq!(parse_date_input("9/20", today).unwrap(), create_test_date(20));
    assert_eq!(parse_date_input("9月20日", today).unwrap(), create_test_date(20));
}

#[test]
fn test_month_day_input_rolls_into_next_year() {
    let today = Date::from_calendar_date(2025, Month::December, 30).unwrap();
    assert_eq!(
        parse_date_input("1/5", today).unwrap(),
        Date::from_calendar_date(2026, Month::January, 5).unwrap()
    );
}

#[test]
fn test_full_width_date_input() {
    let today = create_test_date(1);
    assert_eq!(
        parse_date_input("２０２５－０９－２０", today).unwrap(),
        create_test_date(20)
    );
}

#[test]
fn test_relative_date_words() {
    let today = create_test_date(10);
    assert_eq!(parse_date_input("today", today).unwrap(), today);
    assert_eq!(parse_date_input("明日", today).unwrap(), create_test_date(11));
}

#[test]
fn test_unreadable_date_is_rejected() {
    let today = create_test_date(1);
    assert!(matches!(
        parse_date_input("next week", today),
        Err(DomainError::InvalidDate { .. })
    ));
    assert!(matches!(
        parse_date_input("2025-13-01", today),
        Err(DomainError::InvalidDate { .. })
    ));
    assert!(matches!(
        parse_date_input("2025-02-30", today),
        Err(DomainError::InvalidDate { .. })
    ));
}

#[test]
fn test_past_dates_are_rejected() {
    let today = create_test_date(10);
    assert!(ensure_not_past(create_test_date(10), today).is_ok());
    assert_eq!(
        ensure_not_past(create_test_date(9), today),
        Err(DomainError::PastDate {
            date: create_test_date(9),
            today,
        })
    );
}

#[test]
fn test_time_input_forms() {
    assert_eq!(parse_time_input("9:30").unwrap(), Time::from_hms(9, 30, 0).unwrap());
    assert_eq!(parse_time_input("18").unwrap(), Time::from_hms(18, 0, 0).unwrap());
    assert_eq!(parse_time_input("１８：００").unwrap(), Time::from_hms(18, 0, 0).unwrap());
    assert_eq!(parse_time_input("18時30分").unwrap(), Time::from_hms(18, 30, 0).unwrap());
    assert!(parse_time_input("25:00").is_err());
    assert!(parse_time_input("noon").is_err());
}

#[test]
fn test_time_range_separators() {
    let expected = create_test_range((18, 0), (20, 0));
    assert_eq!(parse_time_range_input("18:00-20:00").unwrap(), expected);
    assert_eq!(parse_time_range_input("18:00~20:00").unwrap(), expected);
    assert_eq!(parse_time_range_input("18:00〜20:00").unwrap(), expected);
    assert_eq!(parse_time_range_input("１８：００～２０：００").unwrap(), expected);
}

#[test]
fn test_inverted_time_range_is_rejected() {
    assert!(matches!(
        parse_time_range_input("20:00-18:00"),
        Err(DomainError::InvalidTimeRange { .. })
    ));
    assert!(matches!(
        parse_time_range_input("18:00-18:00"),
        Err(DomainError::InvalidTimeRange { .. })
    ));
    assert!(matches!(
        parse_time_range_input("18:00"),
        Err(DomainError::InvalidTime(_))
    ));
}

#[test]
fn test_storage_formats() {
    let date = create_test_date(5);
    assert_eq!(format_date(date), "2025-09-05");
    assert_eq!(parse_iso_date("2025-09-05").unwrap(), date);

    let time = Time::from_hms(7, 5, 0).unwrap();
    assert_eq!(format_time(time), "07:05");
    assert_eq!(parse_clock_time("07:05").unwrap(), time);
    assert_eq!(create_test_range((7, 5), (9, 0)).to_string(), "07:05-09:00");
}
