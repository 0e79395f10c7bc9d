// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Fixed, ordered budgeting rules. Every rule that matches contributes a
//! message; the fallback only appears when none did.

use rust_decimal::prelude::*;

use super::aggregate::out_of_range;
use super::compare::{change_from, savings_rate};
use crate::error::Result;
use crate::models::CategoryRollup;

pub const OVERSPENDING: &str = "You are spending more than you earn this month. Consider reviewing your expenses and cutting non-essential spending.";
pub const LOW_SAVINGS: &str = "Your savings rate is below 10%. Financial experts recommend saving at least 20% of your income.";
pub const HIGH_SAVINGS: &str = "Great job! You are saving more than 20% of your income this month.";
pub const SPENT_LESS: &str = "You spent less than last month. Keep up the good habit!";
pub const FOOD_HEAVY: &str = "Food expenses are over 30% of your total spending. Consider meal planning or cooking at home more often.";
pub const BALANCED: &str = "Your spending looks balanced this month. Keep tracking your expenses consistently!";

/// Rounds to a whole number, halves away from zero.
pub fn whole(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

pub fn generate_advice(
    total_expenses: Decimal,
    total_income: Decimal,
    by_category: &[CategoryRollup],
    last_month_total: Decimal,
) -> Result<Vec<String>> {
    let mut advice = Vec::new();
    let rate = savings_rate(total_income, total_expenses)?;

    if rate < Decimal::ZERO {
        advice.push(OVERSPENDING.to_string());
    } else if rate < Decimal::TEN {
        advice.push(LOW_SAVINGS.to_string());
    } else if rate >= Decimal::from(20) {
        advice.push(HIGH_SAVINGS.to_string());
    }

    if last_month_total > Decimal::ZERO {
        let upper = last_month_total
            .checked_mul(Decimal::new(12, 1))
            .ok_or_else(|| out_of_range("last month total"))?;
        if total_expenses > upper {
            let increase = whole(change_from(total_expenses, last_month_total)?);
            advice.push(format!(
                "Your spending increased by {}% compared to last month. Review what changed.",
                increase
            ));
        } else if total_expenses < last_month_total * Decimal::new(8, 1) {
            advice.push(SPENT_LESS.to_string());
        }
    }

    if let Some(top) = by_category.first() {
        if top.percentage > Decimal::from(40) {
            advice.push(format!(
                "{} takes up {}% of your spending. Consider setting a budget limit for this category.",
                top.category_name,
                whole(top.percentage)
            ));
        }
    }

    if by_category
        .iter()
        .any(|c| c.category_name.to_lowercase().contains("food") && c.percentage > Decimal::from(30))
    {
        advice.push(FOOD_HEAVY.to_string());
    }

    if advice.is_empty() {
        advice.push(BALANCED.to_string());
    }
    Ok(advice)
}
