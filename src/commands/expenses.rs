// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{PaymentMethod, RecurringFrequency};
use crate::utils::{id_for_category, maybe_print_json, parse_amount, parse_date, pretty_table};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if conn.execute("DELETE FROM expenses WHERE id=?1", params![id])? == 0 {
                bail!("Expense {} not found", id);
            }
            println!("Removed expense {}", id);
        }
        Some(("export", sub)) => export(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub struct NewExpense {
    pub item: String,
    pub amount: Decimal,
    pub category_id: Option<i64>,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub recurring_frequency: Option<RecurringFrequency>,
    pub notes: Option<String>,
}

pub fn insert(conn: &Connection, e: &NewExpense) -> Result<i64> {
    conn.execute(
        "INSERT INTO expenses(item, amount, category_id, date, payment_method, is_recurring, recurring_frequency, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            e.item,
            e.amount.to_string(),
            e.category_id,
            e.date,
            e.payment_method.as_str(),
            e.recurring_frequency.is_some(),
            e.recurring_frequency.map(|f| f.as_str()),
            e.notes
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let item = sub.get_one::<String>("item").unwrap().trim().to_string();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let category_id = sub
        .get_one::<String>("category")
        .map(|c| id_for_category(conn, c))
        .transpose()?;
    let payment_method = sub.get_one::<String>("method").unwrap().parse::<PaymentMethod>()?;
    let recurring_frequency = sub
        .get_one::<String>("recurring")
        .map(|f| f.parse::<RecurringFrequency>())
        .transpose()?;
    let notes = sub
        .get_one::<String>("note")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let id = insert(
        conn,
        &NewExpense {
            item: item.clone(),
            amount,
            category_id,
            date,
            payment_method,
            recurring_frequency,
            notes,
        },
    )?;
    tracing::debug!(id, "inserted expense");
    println!(
        "Recorded expense #{} {} on {} for '{}' ({})",
        id,
        amount,
        date,
        item,
        payment_method.label()
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.item.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.payment_method.clone(),
                    r.recurring.clone(),
                    r.notes.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Item", "Amount", "Category", "Method", "Recurring", "Notes"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct ExpenseRow {
    pub id: i64,
    pub date: String,
    pub item: String,
    pub amount: String,
    pub category: String,
    pub payment_method: String,
    pub recurring: String,
    pub notes: String,
}

/// `%term%` with LIKE wildcards in `term` matched literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("%{}%", escaped)
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<ExpenseRow>> {
    let mut sql = String::from(
        "SELECT e.id, e.date, e.item, e.amount, c.name, e.payment_method, e.recurring_frequency, e.notes
         FROM expenses e LEFT JOIN categories c ON e.category_id=c.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(from) = sub.get_one::<String>("from") {
        sql.push_str(" AND e.date>=?");
        params_vec.push(parse_date(from)?.to_string());
    }
    if let Some(to) = sub.get_one::<String>("to") {
        sql.push_str(" AND e.date<=?");
        params_vec.push(parse_date(to)?.to_string());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND e.category_id=?");
        params_vec.push(id_for_category(conn, cat)?.to_string());
    }
    if let Some(method) = sub.get_one::<String>("method") {
        sql.push_str(" AND e.payment_method=?");
        params_vec.push(method.parse::<PaymentMethod>()?.as_str().to_string());
    }
    if let Some(term) = sub.get_one::<String>("search") {
        sql.push_str(" AND e.item LIKE ? ESCAPE '\\'");
        params_vec.push(like_pattern(term));
    }
    if sub.get_flag("recurring-only") {
        sql.push_str(" AND e.is_recurring=1");
    }
    sql.push_str(" ORDER BY e.date DESC, e.id DESC");
    let limit = sub.get_one::<usize>("limit").copied();
    let offset = sub.get_one::<usize>("offset").copied();
    if limit.is_some() || offset.is_some() {
        // SQLite needs a LIMIT before OFFSET; -1 means unbounded
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.map(|l| l as i64).unwrap_or(-1).to_string());
        if let Some(off) = offset {
            sql.push_str(" OFFSET ?");
            params_vec.push(off.to_string());
        }
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let method: String = r.get(5)?;
        let method = method
            .parse::<PaymentMethod>()
            .map(|m| m.label().to_string())
            .unwrap_or(method);
        data.push(ExpenseRow {
            id: r.get(0)?,
            date: r.get(1)?,
            item: r.get(2)?,
            amount: r.get(3)?,
            category: r
                .get::<_, Option<String>>(4)?
                .unwrap_or_else(|| crate::report::aggregate::UNCATEGORIZED_NAME.to_string()),
            payment_method: method,
            recurring: r.get::<_, Option<String>>(6)?.unwrap_or_default(),
            notes: r.get::<_, Option<String>>(7)?.unwrap_or_default(),
        });
    }
    Ok(data)
}

fn export(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let items = export_rows(conn)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            for row in &items {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} expenses to {}", items.len(), out);
    Ok(())
}

#[derive(Serialize)]
pub struct ExportRow {
    pub date: String,
    pub item: String,
    pub amount: String,
    pub category: String,
    pub payment_method: String,
    pub recurring_frequency: String,
    pub notes: String,
}

pub fn export_rows(conn: &Connection) -> Result<Vec<ExportRow>> {
    let mut stmt = conn.prepare(
        "SELECT e.date, e.item, e.amount, c.name, e.payment_method, e.recurring_frequency, e.notes
         FROM expenses e LEFT JOIN categories c ON e.category_id=c.id
         ORDER BY e.date, e.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(ExportRow {
            date: r.get(0)?,
            item: r.get(1)?,
            amount: r.get(2)?,
            category: r.get::<_, Option<String>>(3)?.unwrap_or_default(),
            payment_method: r.get(4)?,
            recurring_frequency: r.get::<_, Option<String>>(5)?.unwrap_or_default(),
            notes: r.get::<_, Option<String>>(6)?.unwrap_or_default(),
        })
    })?;
    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}
