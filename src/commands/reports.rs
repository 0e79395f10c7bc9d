// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::models::MonthlyReport;
use crate::period::Period;
use crate::report::{DEFAULT_TREND_WINDOW, Reporter};
use crate::store::SqliteStore;
use crate::utils::{fmt_pct, maybe_print_json, parse_period, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let reporter = Reporter::new(SqliteStore::new(conn));
    match m.subcommand() {
        Some(("monthly", sub)) => monthly(conn, &reporter, sub)?,
        Some(("trend", sub)) => trend(conn, &reporter, sub)?,
        _ => {}
    }
    Ok(())
}

fn requested_period(reporter: &Reporter<SqliteStore<'_>>, sub: &clap::ArgMatches) -> Result<Period> {
    match sub.get_one::<String>("month") {
        Some(m) => parse_period(m),
        None => Ok(Period::containing(reporter.today())),
    }
}

fn monthly(
    conn: &Connection,
    reporter: &Reporter<SqliteStore<'_>>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let period = requested_period(reporter, sub)?;
    let report = reporter
        .monthly_report(period)
        .with_context(|| format!("Build report for {}", period))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        print_report(&Settings::load(conn)?, period, &report);
    }
    Ok(())
}

fn print_report(settings: &Settings, period: Period, r: &MonthlyReport) {
    println!("{} {}", period.month_name(), period.year());
    let summary = vec![
        vec!["Expenses".into(), settings.fmt_money(&r.total_expenses)],
        vec!["Income".into(), settings.fmt_money(&r.total_income)],
        vec!["Savings".into(), settings.fmt_money(&r.savings)],
        vec!["Savings rate".into(), fmt_pct(&r.savings_rate)],
        vec!["Daily average".into(), settings.fmt_money(&r.daily_average)],
        vec!["vs last month".into(), fmt_pct(&r.comparison_to_last_month)],
        vec![
            "Biggest expense".into(),
            r.biggest_expense
                .as_ref()
                .map(|e| format!("{} ({})", e.item, settings.fmt_money(&e.amount)))
                .unwrap_or_else(|| "-".into()),
        ],
    ];
    println!("{}", pretty_table(&["", ""], summary));

    let cats = r
        .by_category
        .iter()
        .map(|c| {
            vec![
                c.category_name.clone(),
                settings.fmt_money(&c.total),
                fmt_pct(&c.percentage),
                c.count.to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Spent", "Share", "Count"], cats));

    let methods = r
        .by_payment_method
        .iter()
        .map(|m| {
            vec![
                m.method.label().to_string(),
                settings.fmt_money(&m.total),
                fmt_pct(&m.percentage),
                m.count.to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Method", "Spent", "Share", "Count"], methods));

    for line in &r.advice {
        println!("- {}", line);
    }
}

fn trend(
    conn: &Connection,
    reporter: &Reporter<SqliteStore<'_>>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let anchor = requested_period(reporter, sub)?;
    let months = *sub.get_one::<u32>("months").unwrap_or(&DEFAULT_TREND_WINDOW);
    let points = reporter
        .trend(anchor, months)
        .with_context(|| format!("Build {}-month trend ending {}", months, anchor))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &points)? {
        let settings = Settings::load(conn)?;
        let data = points
            .iter()
            .map(|p| {
                vec![
                    p.period_label.clone(),
                    settings.fmt_money(&p.total_income),
                    settings.fmt_money(&p.total_expenses),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Expenses"], data));
    }
    Ok(())
}
