// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly report engine.
//!
//! A report is built from two fetches of the injected store: the requested
//! month and the month before it. Nothing is cached; the same store contents
//! always yield the same report.

pub mod advice;
pub mod aggregate;
pub mod compare;
pub mod trend;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::{MonthlyReport, TrendPoint};
use crate::period::Period;
use crate::store::TransactionStore;

pub use advice::generate_advice;
pub use aggregate::{PeriodSummary, aggregate, summarize};
pub use compare::{Comparison, compare};
pub use trend::{TrendPeriods, build_trend, chronological, trend_periods};

pub const DEFAULT_TREND_WINDOW: u32 = 6;

pub struct Reporter<S> {
    store: S,
    today: NaiveDate,
}

impl<S: TransactionStore> Reporter<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Pins the date used to detect the in-progress month.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn last_month_total(&self, period: Period) -> Result<Decimal> {
        let prev = period.previous();
        let expenses = self.store.fetch_expenses(prev.start(), prev.end())?;
        Ok(aggregate(&expenses, &[])?.total_expenses)
    }

    pub fn monthly_report(&self, period: Period) -> Result<MonthlyReport> {
        let summary = summarize(&self.store, period)?;
        let last_month_total = self.last_month_total(period)?;
        let cmp = compare(
            summary.total_expenses,
            summary.total_income,
            period.days_elapsed(self.today),
            last_month_total,
        )?;
        let advice = generate_advice(
            summary.total_expenses,
            summary.total_income,
            &summary.by_category,
            last_month_total,
        )?;
        tracing::debug!(
            period = %period,
            expenses = %summary.total_expenses,
            income = %summary.total_income,
            advice = advice.len(),
            "built monthly report"
        );

        Ok(MonthlyReport {
            month: period.month(),
            year: period.year(),
            total_expenses: summary.total_expenses,
            total_income: summary.total_income,
            savings: cmp.savings,
            savings_rate: cmp.savings_rate,
            by_category: summary.by_category,
            by_payment_method: summary.by_payment_method,
            biggest_expense: summary.biggest_expense,
            daily_average: cmp.daily_average,
            comparison_to_last_month: cmp.comparison_to_last_month,
            advice,
        })
    }

    pub fn trend(&self, anchor: Period, window: u32) -> Result<Vec<TrendPoint>> {
        build_trend(&self.store, anchor, window)
    }
}

#[cfg(feature = "parallel")]
impl<S: TransactionStore + Sync> Reporter<S> {
    pub fn trend_parallel(&self, anchor: Period, window: u32) -> Result<Vec<TrendPoint>> {
        trend::build_trend_parallel(&self.store, anchor, window)
    }
}
