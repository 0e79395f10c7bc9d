// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use super::aggregate::{out_of_range, percentage_of};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub savings: Decimal,
    pub savings_rate: Decimal,
    pub daily_average: Decimal,
    pub comparison_to_last_month: Decimal,
}

fn difference(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_sub(b).ok_or_else(|| out_of_range("difference"))
}

/// Share of income kept after expenses. Zero (never negative) without income.
pub fn savings_rate(total_income: Decimal, total_expenses: Decimal) -> Result<Decimal> {
    if total_income > Decimal::ZERO {
        percentage_of(difference(total_income, total_expenses)?, total_income)
    } else {
        Ok(Decimal::ZERO)
    }
}

pub fn daily_average(total_expenses: Decimal, days_elapsed: u32) -> Decimal {
    if days_elapsed > 0 {
        total_expenses / Decimal::from(days_elapsed)
    } else {
        Decimal::ZERO
    }
}

/// Percent change against the previous month; zero when that month had no spending.
pub fn change_from(total_expenses: Decimal, last_month_total: Decimal) -> Result<Decimal> {
    if last_month_total > Decimal::ZERO {
        percentage_of(difference(total_expenses, last_month_total)?, last_month_total)
    } else {
        Ok(Decimal::ZERO)
    }
}

pub fn compare(
    total_expenses: Decimal,
    total_income: Decimal,
    days_elapsed: u32,
    last_month_total: Decimal,
) -> Result<Comparison> {
    Ok(Comparison {
        savings: difference(total_income, total_expenses)?,
        savings_rate: savings_rate(total_income, total_expenses)?,
        daily_average: daily_average(total_expenses, days_elapsed),
        comparison_to_last_month: change_from(total_expenses, last_month_total)?,
    })
}
