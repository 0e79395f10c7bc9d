// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Result;
use crate::models::TrendPoint;
use crate::period::Period;
use crate::store::TransactionStore;

use super::aggregate::summarize;

/// Months from `anchor - (window - 1)` up to `anchor`, oldest first.
///
/// Cloning the iterator restarts it from wherever the clone was taken.
#[derive(Debug, Clone)]
pub struct TrendPeriods {
    anchor: Period,
    remaining: u32,
}

pub fn trend_periods(anchor: Period, window: u32) -> TrendPeriods {
    TrendPeriods {
        anchor,
        remaining: window,
    }
}

impl Iterator for TrendPeriods {
    type Item = Period;

    fn next(&mut self) -> Option<Period> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.anchor.back(self.remaining))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for TrendPeriods {}

fn point<S: TransactionStore + ?Sized>(store: &S, period: Period, anchor: Period) -> Result<TrendPoint> {
    let summary = summarize(store, period)?;
    Ok(TrendPoint {
        period,
        period_label: period.short_label(anchor.year()),
        total_expenses: summary.total_expenses,
        total_income: summary.total_income,
    })
}

/// Orders points by the first day of their month.
pub fn chronological(mut points: Vec<TrendPoint>) -> Vec<TrendPoint> {
    points.sort_by_key(|p| p.period.start());
    points
}

pub fn build_trend<S: TransactionStore + ?Sized>(
    store: &S,
    anchor: Period,
    window: u32,
) -> Result<Vec<TrendPoint>> {
    let points = trend_periods(anchor, window)
        .map(|p| point(store, p, anchor))
        .collect::<Result<Vec<_>>>()?;
    Ok(chronological(points))
}

/// Same result as [`build_trend`], with each month fetched on the rayon pool.
#[cfg(feature = "parallel")]
pub fn build_trend_parallel<S: TransactionStore + Sync + ?Sized>(
    store: &S,
    anchor: Period,
    window: u32,
) -> Result<Vec<TrendPoint>> {
    use rayon::prelude::*;

    let periods: Vec<Period> = trend_periods(anchor, window).collect();
    let points = periods
        .into_par_iter()
        .map(|p| point(store, p, anchor))
        .collect::<Result<Vec<_>>>()?;
    Ok(chronological(points))
}
