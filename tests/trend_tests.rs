// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use spendlens::error::Result;
use spendlens::models::{Expense, Income, PaymentMethod, TrendPoint};
use spendlens::period::Period;
use spendlens::report::{Reporter, build_trend, chronological, trend_periods};
use spendlens::store::{MemoryStore, TransactionStore};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn expense(id: i64, date: NaiveDate, amount: i64) -> Expense {
    Expense {
        id,
        item: format!("item {}", id),
        amount: Decimal::from(amount),
        category_id: None,
        category: None,
        date,
        payment_method: PaymentMethod::Cash,
        is_recurring: false,
        recurring_frequency: None,
        notes: None,
    }
}

fn income(id: i64, date: NaiveDate, amount: i64) -> Income {
    Income {
        id,
        source: "Salary".into(),
        amount: Decimal::from(amount),
        date,
        is_recurring: true,
        recurring_frequency: None,
        notes: None,
    }
}

/// One expense per month from Jul 2024 to Mar 2025 worth `month * 10`, plus income in a few months.
fn store() -> MemoryStore {
    let mut expenses = Vec::new();
    let mut p = Period::new(3, 2025).unwrap();
    for i in 0..9 {
        expenses.push(expense(i, p.start(), i64::from(p.month()) * 10));
        p = p.previous();
    }
    let incomes = vec![
        income(1, d(2024, 12, 25), 3000),
        income(2, d(2025, 1, 25), 3100),
        income(3, d(2025, 2, 25), 3200),
    ];
    MemoryStore::new(expenses, incomes)
}

#[test]
fn six_month_window_crosses_year_boundary() {
    let points = build_trend(&store(), Period::new(2, 2025).unwrap(), 6).unwrap();
    let labels: Vec<&str> = points.iter().map(|p| p.period_label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Sep 2024", "Oct 2024", "Nov 2024", "Dec 2024", "Jan", "Feb"]
    );
    assert_eq!(points[0].total_expenses, Decimal::from(90));
    assert_eq!(points[3].total_income, Decimal::from(3000));
    assert_eq!(points[5].total_expenses, Decimal::from(20));
    assert_eq!(points[5].total_income, Decimal::from(3200));
}

#[test]
fn trend_is_strictly_chronological() {
    let points = build_trend(&store(), Period::new(3, 2025).unwrap(), 6).unwrap();
    assert_eq!(points.len(), 6);
    for pair in points.windows(2) {
        assert!(pair[0].period.start() < pair[1].period.start());
    }
}

#[test]
fn months_without_data_still_get_a_point() {
    let points = build_trend(&MemoryStore::default(), Period::new(6, 2030).unwrap(), 6).unwrap();
    assert_eq!(points.len(), 6);
    assert!(points.iter().all(|p| p.total_expenses.is_zero() && p.total_income.is_zero()));
}

#[test]
fn trend_periods_is_finite_and_restartable() {
    let it = trend_periods(Period::new(1, 2025).unwrap(), 6);
    assert_eq!(it.len(), 6);
    let first: Vec<Period> = it.clone().collect();
    let second: Vec<Period> = it.collect();
    assert_eq!(first, second);
    assert_eq!(first[0], Period::new(8, 2024).unwrap());
    assert_eq!(first[5], Period::new(1, 2025).unwrap());
}

#[test]
fn out_of_order_points_are_sorted_by_month() {
    let anchor = Period::new(1, 2025).unwrap();
    let point = |p: Period| TrendPoint {
        period: p,
        period_label: p.short_label(anchor.year()),
        total_expenses: Decimal::ZERO,
        total_income: Decimal::ZERO,
    };
    // arrival order of concurrent fetches: newest, oldest, then the middle
    let shuffled = vec![
        point(anchor),
        point(anchor.back(2)),
        point(anchor.back(1)),
    ];
    let labels: Vec<String> = chronological(shuffled)
        .into_iter()
        .map(|p| p.period_label)
        .collect();
    assert_eq!(labels, vec!["Nov 2024", "Dec 2024", "Jan"]);
}

#[test]
fn trend_point_json_has_label_and_totals() {
    let points = build_trend(&store(), Period::new(2, 2025).unwrap(), 1).unwrap();
    let v = serde_json::to_value(&points).unwrap();
    assert_eq!(v[0]["period_label"], "Feb");
    assert!(v[0].get("total_expenses").is_some());
    assert!(v[0].get("total_income").is_some());
}

/// Older months answer last, so concurrent fetches finish newest first.
struct SlowStore(MemoryStore);

impl TransactionStore for SlowStore {
    fn fetch_expenses(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>> {
        let delay = 13 - start.month();
        std::thread::sleep(std::time::Duration::from_millis(u64::from(delay) * 5));
        self.0.fetch_expenses(start, end)
    }

    fn fetch_income(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Income>> {
        self.0.fetch_income(start, end)
    }
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_trend_matches_sequential() {
    let anchor = Period::new(3, 2025).unwrap();
    let reporter = Reporter::new(SlowStore(store()));
    let parallel = reporter.trend_parallel(anchor, 6).unwrap();
    let sequential = reporter.trend(anchor, 6).unwrap();

    assert_eq!(parallel.len(), 6);
    let a: Vec<(String, Decimal)> = parallel
        .iter()
        .map(|p| (p.period_label.clone(), p.total_expenses))
        .collect();
    let b: Vec<(String, Decimal)> = sequential
        .iter()
        .map(|p| (p.period_label.clone(), p.total_expenses))
        .collect();
    assert_eq!(a, b);
    assert_eq!(a[0].0, "Oct 2024");
    assert_eq!(a[5].0, "Mar");
}
