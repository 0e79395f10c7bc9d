// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Query boundary between the report engine and wherever transactions live.
//!
//! The engine never opens a database itself; callers hand it something that
//! implements [`TransactionStore`]. [`SqliteStore`] backs the CLI and
//! [`MemoryStore`] holds an already-fetched snapshot.

use std::sync::Mutex;

use chrono::NaiveDate;
use rusqlite::{Connection, ErrorCode, params};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::{
    Category, Expense, Income, MAX_AMOUNT, NewNotification, PaymentMethod, RecurringFrequency,
};

pub trait TransactionStore {
    /// Expenses dated within `[start, end]`, largest amount first.
    fn fetch_expenses(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>>;

    /// Income dated within `[start, end]`.
    fn fetch_income(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Income>>;
}

pub trait NotificationSink {
    fn insert_notification(&self, notification: &NewNotification) -> Result<i64>;
}

impl<T: TransactionStore + ?Sized> TransactionStore for &T {
    fn fetch_expenses(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>> {
        (**self).fetch_expenses(start, end)
    }

    fn fetch_income(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Income>> {
        (**self).fetch_income(start, end)
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for &T {
    fn insert_notification(&self, notification: &NewNotification) -> Result<i64> {
        (**self).insert_notification(notification)
    }
}

fn sort_largest_first(expenses: &mut [Expense]) {
    // stable, so equal amounts keep store order
    expenses.sort_by(|a, b| b.amount.cmp(&a.amount));
}

/// Busy or unreachable databases are reported as an unavailable store so the
/// caller can tell them apart from bad data.
fn store_error(e: rusqlite::Error) -> Error {
    match e.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy)
        | Some(ErrorCode::DatabaseLocked)
        | Some(ErrorCode::CannotOpen)
        | Some(ErrorCode::SystemIoFailure) => Error::StoreUnavailable(e.to_string()),
        _ => Error::Database(e),
    }
}

pub(crate) fn parse_amount(raw: &str, what: &str, id: i64) -> Result<Decimal> {
    let invalid = || Error::InvalidData(format!("Invalid amount '{}' on {} {}", raw, what, id));
    let amount = raw.trim().parse::<Decimal>().map_err(|_| invalid())?;
    if amount < Decimal::ZERO || amount > Decimal::from(MAX_AMOUNT) {
        return Err(invalid());
    }
    Ok(amount)
}

fn parse_frequency(raw: Option<String>) -> Result<Option<RecurringFrequency>> {
    raw.filter(|s| !s.is_empty())
        .map(|s| s.parse::<RecurringFrequency>())
        .transpose()
}

#[derive(Clone, Copy)]
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

type ExpenseRow = (
    i64,
    String,
    String,
    Option<i64>,
    NaiveDate,
    String,
    bool,
    Option<String>,
    Option<String>,
    Option<i64>,
    Option<String>,
    Option<String>,
    Option<String>,
);

impl TransactionStore for SqliteStore<'_> {
    fn fetch_expenses(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT e.id, e.item, e.amount, e.category_id, e.date, e.payment_method,
                        e.is_recurring, e.recurring_frequency, e.notes,
                        c.id, c.name, c.icon, c.color
                 FROM expenses e LEFT JOIN categories c ON e.category_id=c.id
                 WHERE e.date >= ?1 AND e.date <= ?2
                 ORDER BY e.id",
            )
            .map_err(store_error)?;
        let rows = stmt
            .query_map(params![start, end], |r| -> rusqlite::Result<ExpenseRow> {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                    r.get(5)?,
                    r.get(6)?,
                    r.get(7)?,
                    r.get(8)?,
                    r.get(9)?,
                    r.get(10)?,
                    r.get(11)?,
                    r.get(12)?,
                ))
            })
            .map_err(store_error)?;

        let mut expenses = Vec::new();
        for row in rows {
            let (id, item, amount, category_id, date, method, recurring, freq, notes, cid, cname, cicon, ccolor) =
                row.map_err(store_error)?;
            let category = match (cid, cname) {
                (Some(cid), Some(name)) => Some(Category {
                    id: cid,
                    name,
                    icon: cicon.unwrap_or_default(),
                    color: ccolor.unwrap_or_default(),
                }),
                _ => {
                    if let Some(dangling) = category_id {
                        tracing::debug!(expense = id, category = dangling, "expense references a missing category");
                    }
                    None
                }
            };
            expenses.push(Expense {
                id,
                item,
                amount: parse_amount(&amount, "expense", id)?,
                category_id,
                category,
                date,
                payment_method: method.parse::<PaymentMethod>()?,
                is_recurring: recurring,
                recurring_frequency: parse_frequency(freq)?,
                notes,
            });
        }
        sort_largest_first(&mut expenses);
        tracing::debug!(%start, %end, count = expenses.len(), "fetched expenses");
        Ok(expenses)
    }

    fn fetch_income(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Income>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, source, amount, date, is_recurring, recurring_frequency, notes
                 FROM income WHERE date >= ?1 AND date <= ?2
                 ORDER BY date DESC, id DESC",
            )
            .map_err(store_error)?;
        let rows = stmt
            .query_map(params![start, end], |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, NaiveDate>(3)?,
                    r.get::<_, bool>(4)?,
                    r.get::<_, Option<String>>(5)?,
                    r.get::<_, Option<String>>(6)?,
                ))
            })
            .map_err(store_error)?;

        let mut income = Vec::new();
        for row in rows {
            let (id, source, amount, date, recurring, freq, notes) = row.map_err(store_error)?;
            income.push(Income {
                id,
                source,
                amount: parse_amount(&amount, "income", id)?,
                date,
                is_recurring: recurring,
                recurring_frequency: parse_frequency(freq)?,
                notes,
            });
        }
        tracing::debug!(%start, %end, count = income.len(), "fetched income");
        Ok(income)
    }
}

impl NotificationSink for SqliteStore<'_> {
    fn insert_notification(&self, n: &NewNotification) -> Result<i64> {
        let data = n.data.as_ref().map(serde_json::to_string).transpose()?;
        self.conn
            .execute(
                "INSERT INTO notifications(title, message, type, is_read, data)
                 VALUES (?1, ?2, ?3, 0, ?4)",
                params![n.title, n.message, n.kind.as_str(), data],
            )
            .map_err(store_error)?;
        Ok(self.conn.last_insert_rowid())
    }
}

/// An in-memory snapshot of transactions. `Sync`, so it can serve concurrent
/// trend fetches.
#[derive(Default)]
pub struct MemoryStore {
    expenses: Vec<Expense>,
    income: Vec<Income>,
    notifications: Mutex<Vec<NewNotification>>,
}

impl MemoryStore {
    pub fn new(expenses: Vec<Expense>, income: Vec<Income>) -> Self {
        Self {
            expenses,
            income,
            notifications: Mutex::new(Vec::new()),
        }
    }

    pub fn notifications(&self) -> Result<Vec<NewNotification>> {
        let guard = self
            .notifications
            .lock()
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        Ok(guard.clone())
    }
}

impl TransactionStore for MemoryStore {
    fn fetch_expenses(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>> {
        let mut out: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|e| e.date >= start && e.date <= end)
            .cloned()
            .collect();
        sort_largest_first(&mut out);
        Ok(out)
    }

    fn fetch_income(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Income>> {
        Ok(self
            .income
            .iter()
            .filter(|i| i.date >= start && i.date <= end)
            .cloned()
            .collect())
    }
}

impl NotificationSink for MemoryStore {
    fn insert_notification(&self, notification: &NewNotification) -> Result<i64> {
        let mut guard = self
            .notifications
            .lock()
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        guard.push(notification.clone());
        Ok(guard.len() as i64)
    }
}
