// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::hash::Hash;

use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::{CategoryRollup, Expense, Income, PaymentMethod, PaymentMethodRollup};
use crate::period::Period;
use crate::store::TransactionStore;

pub const UNCATEGORIZED_ID: &str = "uncategorized";
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";
pub const UNCATEGORIZED_COLOR: &str = "#607D8B";
pub const UNCATEGORIZED_ICON: &str = "more-horizontal";

/// Rollups for one period's raw transactions.
#[derive(Debug, Clone, Default)]
pub struct PeriodSummary {
    pub total_expenses: Decimal,
    pub total_income: Decimal,
    pub by_category: Vec<CategoryRollup>,
    pub by_payment_method: Vec<PaymentMethodRollup>,
    pub biggest_expense: Option<Expense>,
}

pub(crate) fn out_of_range(what: &str) -> Error {
    Error::InvalidData(format!("{} is outside the representable range", what))
}

pub(crate) fn checked_sum<I>(amounts: I, what: &str) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, a| {
        acc.checked_add(a).ok_or_else(|| out_of_range(what))
    })
}

/// `part / whole * 100`, or zero when `whole` is zero.
pub fn percentage_of(part: Decimal, whole: Decimal) -> Result<Decimal> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    part.checked_div(whole)
        .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| out_of_range(&format!("{} as a share of {}", part, whole)))
}

struct Bucket<'a> {
    first: &'a Expense,
    total: Decimal,
    count: usize,
}

/// Groups in first-seen order, then sorts descending by total. The sort is
/// stable, so tied buckets keep that order.
fn group_expenses<'a, K, F>(expenses: &'a [Expense], key: F) -> Result<Vec<(K, Bucket<'a>)>>
where
    K: Eq + Hash + Clone,
    F: Fn(&Expense) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut buckets: Vec<(K, Bucket<'a>)> = Vec::new();
    for e in expenses {
        let k = key(e);
        match index.get(&k) {
            Some(&i) => {
                let bucket = &mut buckets[i].1;
                bucket.total = bucket
                    .total
                    .checked_add(e.amount)
                    .ok_or_else(|| out_of_range("group total"))?;
                bucket.count += 1;
            }
            None => {
                index.insert(k.clone(), buckets.len());
                buckets.push((
                    k,
                    Bucket {
                        first: e,
                        total: e.amount,
                        count: 1,
                    },
                ));
            }
        }
    }
    buckets.sort_by(|a, b| b.1.total.cmp(&a.1.total));
    Ok(buckets)
}

pub fn by_category(expenses: &[Expense], total_expenses: Decimal) -> Result<Vec<CategoryRollup>> {
    group_expenses(expenses, |e| e.category.as_ref().map(|c| c.id))?
        .into_iter()
        .map(|(_, b)| {
            let (id, name, color, icon) = match &b.first.category {
                Some(c) => (c.id.to_string(), c.name.clone(), c.color.clone(), c.icon.clone()),
                None => (
                    UNCATEGORIZED_ID.to_string(),
                    UNCATEGORIZED_NAME.to_string(),
                    UNCATEGORIZED_COLOR.to_string(),
                    UNCATEGORIZED_ICON.to_string(),
                ),
            };
            Ok(CategoryRollup {
                category_id: id,
                category_name: name,
                category_color: color,
                category_icon: icon,
                total: b.total,
                percentage: percentage_of(b.total, total_expenses)?,
                count: b.count,
            })
        })
        .collect()
}

pub fn by_payment_method(
    expenses: &[Expense],
    total_expenses: Decimal,
) -> Result<Vec<PaymentMethodRollup>> {
    group_expenses(expenses, |e| e.payment_method)?
        .into_iter()
        .map(|(method, b): (PaymentMethod, _)| {
            Ok(PaymentMethodRollup {
                method,
                total: b.total,
                percentage: percentage_of(b.total, total_expenses)?,
                count: b.count,
            })
        })
        .collect()
}

/// Largest amount wins; on a tie the earlier record is kept.
pub fn biggest_expense(expenses: &[Expense]) -> Option<&Expense> {
    expenses.iter().fold(None, |best: Option<&Expense>, e| match best {
        Some(b) if b.amount >= e.amount => Some(b),
        _ => Some(e),
    })
}

/// Sums that do not fit a `Decimal` are reported as `InvalidData`.
pub fn aggregate(expenses: &[Expense], income: &[Income]) -> Result<PeriodSummary> {
    let total_expenses = checked_sum(expenses.iter().map(|e| e.amount), "expense total")?;
    let total_income = checked_sum(income.iter().map(|i| i.amount), "income total")?;
    Ok(PeriodSummary {
        total_expenses,
        total_income,
        by_category: by_category(expenses, total_expenses)?,
        by_payment_method: by_payment_method(expenses, total_expenses)?,
        biggest_expense: biggest_expense(expenses).cloned(),
    })
}

/// Fetches one period's transactions and aggregates them.
pub fn summarize<S: TransactionStore + ?Sized>(store: &S, period: Period) -> Result<PeriodSummary> {
    let expenses = store.fetch_expenses(period.start(), period.end())?;
    let income = store.fetch_income(period.start(), period.end())?;
    aggregate(&expenses, &income)
}
