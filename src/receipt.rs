// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Best-effort guesses from OCR'd receipt text. Not part of the report engine;
//! callers treat every field as a suggestion for the expense form.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReceiptGuess {
    pub amount: Option<Decimal>,
    pub merchant: Option<String>,
    pub date: Option<NaiveDate>,
}

static TOTAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)total\s*:?\s*(?:rm|myr)?\s*(\d+[.,]\d{2})",
        r"(?i)(?:grand\s*total|amount\s*due|total\s*amount)\s*:?\s*(?:rm|myr)?\s*(\d+[.,]\d{2})",
        r"(?i)(?:rm|myr)\s*(\d+[.,]\d{2})",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

static PRICE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\d+\.\d{2}").ok());

static DAY_FIRST: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{2,4})\b").ok());

static YEAR_FIRST: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\b(\d{4})[/\-.](\d{1,2})[/\-.](\d{1,2})\b").ok());

pub fn extract_amount(text: &str) -> Option<Decimal> {
    for re in TOTAL_PATTERNS.iter() {
        if let Some(c) = re.captures(text) {
            return c[1].replace(',', ".").parse::<Decimal>().ok();
        }
    }
    PRICE
        .as_ref()?
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<Decimal>().ok())
        .filter(|d| *d > Decimal::ZERO)
        .max()
}

/// The first of the top three lines that looks like a name rather than a number.
pub fn extract_merchant(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(3)
        .find(|l| {
            let n = l.chars().count();
            n > 2 && n < 60 && !l.starts_with(|c: char| c.is_ascii_digit())
        })
        .map(str::to_string)
}

fn full_year(y: i32) -> i32 {
    if y < 100 { 2000 + y } else { y }
}

pub fn extract_date(text: &str) -> Option<NaiveDate> {
    // year-first wins when both shapes appear
    if let Some(c) = YEAR_FIRST.as_ref()?.captures(text) {
        let (y, m, d) = (c[1].parse().ok()?, c[2].parse().ok()?, c[3].parse().ok()?);
        return NaiveDate::from_ymd_opt(y, m, d);
    }
    let c = DAY_FIRST.as_ref()?.captures(text)?;
    let (d, m, y): (u32, u32, i32) = (c[1].parse().ok()?, c[2].parse().ok()?, c[3].parse().ok()?);
    NaiveDate::from_ymd_opt(full_year(y), m, d)
}

pub fn extract_receipt(text: &str) -> ReceiptGuess {
    ReceiptGuess {
        amount: extract_amount(text),
        merchant: extract_merchant(text),
        date: extract_date(text),
    }
}
