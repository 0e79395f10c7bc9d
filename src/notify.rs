// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! End-of-month report notifications.

use rusqlite::{Connection, params};
use serde_json::json;

use crate::error::{Error, Result};
use crate::models::{MonthlyReport, NewNotification, Notification, NotificationKind};
use crate::period::Period;
use crate::report::Reporter;
use crate::store::{NotificationSink, TransactionStore};

pub const DEFAULT_LIST_LIMIT: usize = 20;

#[derive(Debug, Clone)]
pub struct MonthlyDigest {
    pub period: Period,
    pub notification_id: i64,
    pub report: MonthlyReport,
}

pub fn report_notification(report: &MonthlyReport, period: Period, symbol: &str) -> NewNotification {
    let verdict = if report.savings < rust_decimal::Decimal::ZERO {
        "Overspent"
    } else {
        "Saved"
    };
    let top_category = report
        .by_category
        .first()
        .map(|c| c.category_name.clone())
        .unwrap_or_else(|| "N/A".to_string());

    NewNotification {
        title: format!("{} {} Monthly Report", period.month_name(), period.year()),
        message: format!(
            "Total spending: {sym} {:.2} | Income: {sym} {:.2} | {}: {sym} {:.2}",
            report.total_expenses,
            report.total_income,
            verdict,
            report.savings.abs(),
            sym = symbol
        ),
        kind: NotificationKind::Report,
        data: Some(json!({
            "month": report.month,
            "year": report.year,
            "total_expenses": report.total_expenses,
            "total_income": report.total_income,
            "savings": report.savings,
            "top_category": top_category,
            "advice": report.advice.first().cloned().unwrap_or_default(),
        })),
    }
}

/// Reports on the month before the reporter's "today" and stores the summary.
pub fn generate_monthly_notification<S, N>(
    reporter: &Reporter<S>,
    sink: &N,
    symbol: &str,
) -> Result<MonthlyDigest>
where
    S: TransactionStore,
    N: NotificationSink + ?Sized,
{
    let period = Period::containing(reporter.today()).previous();
    let report = reporter.monthly_report(period)?;
    let notification = report_notification(&report, period, symbol);
    let notification_id = sink.insert_notification(&notification)?;
    tracing::info!(period = %period, id = notification_id, "stored monthly report notification");
    Ok(MonthlyDigest {
        period,
        notification_id,
        report,
    })
}

/// Newest first.
pub fn list_notifications(conn: &Connection, limit: usize) -> Result<Vec<Notification>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, message, type, is_read, data, created_at
         FROM notifications ORDER BY created_at DESC, id DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit as i64], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, bool>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, String>(6)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, title, message, kind, is_read, data, created_at) = row?;
        out.push(Notification {
            id,
            title,
            message,
            kind: kind.parse()?,
            is_read,
            data: data.map(|d| serde_json::from_str(&d)).transpose()?,
            created_at,
        });
    }
    Ok(out)
}

pub fn mark_read(conn: &Connection, id: i64) -> Result<()> {
    let changed = conn.execute("UPDATE notifications SET is_read=1 WHERE id=?1", params![id])?;
    if changed == 0 {
        return Err(Error::NotFound(format!("notification {}", id)));
    }
    Ok(())
}
