// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use spendlens::commands::{categories, expenses, income};
use spendlens::error::Error;
use spendlens::models::{NotificationKind, PaymentMethod};
use spendlens::notify::{generate_monthly_notification, list_notifications, mark_read};
use spendlens::period::Period;
use spendlens::report::{Reporter, advice};
use spendlens::store::{MemoryStore, SqliteStore};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    spendlens::db::init_schema(&conn).unwrap();
    let food = categories::add(&conn, "Food", "utensils", "#f43f5e").unwrap();
    expenses::insert(
        &conn,
        &expenses::NewExpense {
            item: "Hawker dinner".into(),
            amount: "120.5".parse().unwrap(),
            category_id: Some(food),
            date: d(2025, 2, 14),
            payment_method: PaymentMethod::EWallet,
            recurring_frequency: None,
            notes: None,
        },
    )
    .unwrap();
    income::insert(&conn, "Freelance", "100".parse().unwrap(), d(2025, 2, 20), None, None).unwrap();
    conn
}

#[test]
fn generates_notification_for_previous_month() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let reporter = Reporter::new(store).with_today(d(2025, 3, 5));
    let digest = generate_monthly_notification(&reporter, &store, "RM").unwrap();
    assert_eq!(digest.period, Period::new(2, 2025).unwrap());

    let items = list_notifications(&conn, 20).unwrap();
    assert_eq!(items.len(), 1);
    let n = &items[0];
    assert_eq!(n.id, digest.notification_id);
    assert_eq!(n.kind, NotificationKind::Report);
    assert!(!n.is_read);
    assert_eq!(n.title, "February 2025 Monthly Report");
    assert_eq!(
        n.message,
        "Total spending: RM 120.50 | Income: RM 100.00 | Overspent: RM 20.50"
    );
    let data = n.data.as_ref().unwrap();
    assert_eq!(data["month"], 2);
    assert_eq!(data["year"], 2025);
    assert_eq!(data["top_category"], "Food");
    assert_eq!(data["advice"], advice::OVERSPENDING);
}

#[test]
fn january_reports_on_december() {
    let store = MemoryStore::default();
    let reporter = Reporter::new(&store).with_today(d(2026, 1, 1));
    let digest = generate_monthly_notification(&reporter, &store, "$").unwrap();
    assert_eq!(digest.period, Period::new(12, 2025).unwrap());

    let stored = store.notifications().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "December 2025 Monthly Report");
    assert_eq!(
        stored[0].message,
        "Total spending: $ 0.00 | Income: $ 0.00 | Saved: $ 0.00"
    );
    assert_eq!(stored[0].data.as_ref().unwrap()["top_category"], "N/A");
}

#[test]
fn mark_read_flags_one_notification() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let reporter = Reporter::new(store).with_today(d(2025, 3, 5));
    let first = generate_monthly_notification(&reporter, &store, "RM").unwrap();
    let second = generate_monthly_notification(&reporter, &store, "RM").unwrap();

    mark_read(&conn, first.notification_id).unwrap();
    let items = list_notifications(&conn, 20).unwrap();
    assert_eq!(items.len(), 2);
    // newest first
    assert_eq!(items[0].id, second.notification_id);
    assert!(!items[0].is_read);
    assert!(items[1].is_read);

    assert!(matches!(mark_read(&conn, 999), Err(Error::NotFound(_))));
    assert_eq!(list_notifications(&conn, 1).unwrap().len(), 1);
}
