// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::RecurringFrequency;
use crate::utils::{maybe_print_json, parse_amount, parse_date, pretty_table};
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
            if conn.execute("DELETE FROM income WHERE id=?1", params![id])? == 0 {
                bail!("Income {} not found", id);
            }
            println!("Removed income {}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn insert(
    conn: &Connection,
    source: &str,
    amount: Decimal,
    date: NaiveDate,
    frequency: Option<RecurringFrequency>,
    notes: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO income(source, amount, date, is_recurring, recurring_frequency, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            source,
            amount.to_string(),
            date,
            frequency.is_some(),
            frequency.map(|f| f.as_str()),
            notes
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let source = sub.get_one::<String>("source").unwrap().trim();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let frequency = sub
        .get_one::<String>("recurring")
        .map(|f| f.parse::<RecurringFrequency>())
        .transpose()?;
    let note = sub.get_one::<String>("note").map(|s| s.trim());
    let id = insert(conn, source, amount, date, frequency, note)?;
    println!("Recorded income #{} {} on {} from '{}'", id, amount, date, source);
    Ok(())
}

#[derive(Serialize)]
pub struct IncomeRow {
    pub id: i64,
    pub date: String,
    pub source: String,
    pub amount: String,
    pub recurring: String,
    pub notes: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<IncomeRow>> {
    let mut sql = String::from(
        "SELECT id, date, source, amount, recurring_frequency, notes FROM income WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(from) = sub.get_one::<String>("from") {
        sql.push_str(" AND date>=?");
        params_vec.push(parse_date(from)?.to_string());
    }
    if let Some(to) = sub.get_one::<String>("to") {
        sql.push_str(" AND date<=?");
        params_vec.push(parse_date(to)?.to_string());
    }
    if sub.get_flag("recurring-only") {
        sql.push_str(" AND is_recurring=1");
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(params_vec.iter()), |r| {
        Ok(IncomeRow {
            id: r.get(0)?,
            date: r.get(1)?,
            source: r.get(2)?,
            amount: r.get(3)?,
            recurring: r.get::<_, Option<String>>(4)?.unwrap_or_default(),
            notes: r.get::<_, Option<String>>(5)?.unwrap_or_default(),
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.source.clone(),
                    r.amount.clone(),
                    r.recurring.clone(),
                    r.notes.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Source", "Amount", "Recurring", "Notes"], rows)
        );
    }
    Ok(())
}
