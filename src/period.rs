// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar-month periods used as the unit of every report.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{Error, Result};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month, stored as its first day so ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    start: NaiveDate,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidPeriod(format!(
                "month {} is outside 1..=12",
                month
            )));
        }
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| Error::InvalidPeriod(format!("{}-{:02}", year, month)))?;
        Ok(Self { start })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            start: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn month(&self) -> u32 {
        self.start.month()
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last calendar day of the month, inclusive.
    pub fn end(&self) -> NaiveDate {
        self.start + Days::new(u64::from(self.days_in_month() - 1))
    }

    pub fn days_in_month(&self) -> u32 {
        match self.month() {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            _ => {
                if NaiveDate::from_ymd_opt(self.year(), 2, 29).is_some() {
                    29
                } else {
                    28
                }
            }
        }
    }

    /// January wraps to December of the previous year.
    pub fn previous(&self) -> Self {
        Self::containing(self.start - Days::new(1))
    }

    pub fn back(&self, months: u32) -> Self {
        (0..months).fold(*self, |p, _| p.previous())
    }

    /// Day-of-month for the in-progress month, full month length otherwise.
    pub fn days_elapsed(&self, today: NaiveDate) -> u32 {
        if Self::containing(today) == *self {
            today.day()
        } else {
            self.days_in_month()
        }
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.start.month0() as usize]
    }

    pub fn short_label(&self, anchor_year: i32) -> String {
        let abbr = MONTH_ABBREVIATIONS[self.start.month0() as usize];
        if self.year() == anchor_year {
            abbr.to_string()
        } else {
            format!("{} {}", abbr, self.year())
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let date = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .map_err(|_| Error::InvalidPeriod(format!("'{}', expected YYYY-MM", s)))?;
        Ok(Self::containing(date))
    }
}
