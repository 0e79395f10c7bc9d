// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use spendlens::error::Error;
use spendlens::period::Period;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn bounds_are_inclusive_calendar_days() {
    let p = Period::new(2, 2024).unwrap();
    assert_eq!(p.start(), d(2024, 2, 1));
    assert_eq!(p.end(), d(2024, 2, 29));
    assert_eq!(Period::new(2, 2025).unwrap().end(), d(2025, 2, 28));
    assert_eq!(Period::new(12, 2025).unwrap().end(), d(2025, 12, 31));
    assert_eq!(Period::new(4, 2025).unwrap().days_in_month(), 30);
}

#[test]
fn rejects_month_out_of_range() {
    assert!(matches!(Period::new(0, 2025), Err(Error::InvalidPeriod(_))));
    assert!(matches!(Period::new(13, 2025), Err(Error::InvalidPeriod(_))));
}

#[test]
fn previous_wraps_january() {
    let jan = Period::new(1, 2025).unwrap();
    assert_eq!(jan.previous(), Period::new(12, 2024).unwrap());
    assert_eq!(jan.back(13), Period::new(12, 2023).unwrap());
    assert_eq!(jan.back(0), jan);
}

#[test]
fn days_elapsed_is_partial_only_for_current_month() {
    let may = Period::new(5, 2025).unwrap();
    assert_eq!(may.days_elapsed(d(2025, 5, 17)), 17);
    assert_eq!(may.days_elapsed(d(2025, 6, 1)), 31);
    // same month number, different year
    assert_eq!(may.days_elapsed(d(2024, 5, 17)), 31);
}

#[test]
fn labels() {
    let p = Period::new(11, 2024).unwrap();
    assert_eq!(p.short_label(2024), "Nov");
    assert_eq!(p.short_label(2025), "Nov 2024");
    assert_eq!(p.month_name(), "November");
    assert_eq!(p.to_string(), "2024-11");
}

#[test]
fn parses_year_month() {
    let p: Period = "2025-03".parse().unwrap();
    assert_eq!(p, Period::new(3, 2025).unwrap());
    assert_eq!(Period::containing(d(2025, 3, 31)), p);
    assert!("2025-3x".parse::<Period>().is_err());
    assert!("March".parse::<Period>().is_err());
}
