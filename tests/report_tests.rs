// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use spendlens::commands::{categories, expenses, income};
use spendlens::error::{Error, Result};
use spendlens::models::{Expense, Income, PaymentMethod};
use spendlens::period::Period;
use spendlens::report::{Reporter, advice};
use spendlens::store::{MemoryStore, SqliteStore, TransactionStore};
use spendlens::utils;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    spendlens::db::init_schema(&conn).unwrap();
    conn
}

fn spend(
    conn: &Connection,
    date: NaiveDate,
    item: &str,
    amount: &str,
    category_id: Option<i64>,
    method: PaymentMethod,
) -> i64 {
    expenses::insert(
        conn,
        &expenses::NewExpense {
            item: item.into(),
            amount: amount.parse().unwrap(),
            category_id,
            date,
            payment_method: method,
            recurring_frequency: None,
            notes: None,
        },
    )
    .unwrap()
}

fn earn(conn: &Connection, date: NaiveDate, amount: &str) {
    income::insert(conn, "Salary", amount.parse().unwrap(), date, None, None).unwrap();
}

fn close_to(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < Decimal::new(1, 2)
}

/// Food 300 + Food 200 + Transport 100 in May, income 600, April spending 400.
fn scenario() -> Connection {
    let conn = setup();
    let food = categories::add(&conn, "Food", "utensils", "#f43f5e").unwrap();
    let transport = categories::add(&conn, "Transport", "car", "#3b82f6").unwrap();
    spend(&conn, d(2025, 5, 3), "Groceries", "300", Some(food), PaymentMethod::DebitCard);
    spend(&conn, d(2025, 5, 9), "Dinner", "200", Some(food), PaymentMethod::CreditCard);
    spend(&conn, d(2025, 5, 20), "Train pass", "100", Some(transport), PaymentMethod::CreditCard);
    earn(&conn, d(2025, 5, 25), "600");
    spend(&conn, d(2025, 4, 12), "Rent share", "400", None, PaymentMethod::BankTransfer);
    conn
}

#[test]
fn monthly_report_matches_worked_example() {
    let conn = scenario();
    let reporter = Reporter::new(SqliteStore::new(&conn)).with_today(d(2025, 6, 15));
    let r = reporter.monthly_report(Period::new(5, 2025).unwrap()).unwrap();

    assert_eq!(r.month, 5);
    assert_eq!(r.year, 2025);
    assert_eq!(r.total_expenses, Decimal::from(600));
    assert_eq!(r.total_income, Decimal::from(600));
    assert_eq!(r.savings, Decimal::ZERO);
    assert_eq!(r.savings_rate, Decimal::ZERO);
    assert_eq!(r.comparison_to_last_month, Decimal::from(50));

    assert_eq!(r.by_category.len(), 2);
    assert_eq!(r.by_category[0].category_name, "Food");
    assert_eq!(r.by_category[0].total, Decimal::from(500));
    assert_eq!(r.by_category[0].count, 2);
    assert!(close_to(r.by_category[0].percentage, Decimal::new(8333, 2)));
    assert_eq!(r.by_category[1].category_name, "Transport");
    assert_eq!(r.by_category[1].count, 1);
    assert!(close_to(r.by_category[1].percentage, Decimal::new(1667, 2)));

    // May is over, so the whole month counts
    assert_eq!(r.daily_average, Decimal::from(600) / Decimal::from(31));

    assert_eq!(
        r.advice,
        vec![
            advice::LOW_SAVINGS.to_string(),
            "Your spending increased by 50% compared to last month. Review what changed."
                .to_string(),
            "Food takes up 83% of your spending. Consider setting a budget limit for this category."
                .to_string(),
            advice::FOOD_HEAVY.to_string(),
        ]
    );
    assert!(!r.advice.iter().any(|a| a == advice::BALANCED));
}

#[test]
fn category_rollups_cover_every_expense() {
    let conn = scenario();
    let reporter = Reporter::new(SqliteStore::new(&conn)).with_today(d(2025, 6, 15));
    let r = reporter.monthly_report(Period::new(5, 2025).unwrap()).unwrap();

    let total: Decimal = r.by_category.iter().map(|c| c.total).sum();
    let pct: Decimal = r.by_category.iter().map(|c| c.percentage).sum();
    assert_eq!(total, r.total_expenses);
    assert!(close_to(pct, Decimal::ONE_HUNDRED));

    let method_total: Decimal = r.by_payment_method.iter().map(|m| m.total).sum();
    assert_eq!(method_total, r.total_expenses);
    assert_eq!(r.by_payment_method[0].method, PaymentMethod::DebitCard);
    assert_eq!(r.by_payment_method[0].total, Decimal::from(300));
    assert_eq!(r.by_payment_method[1].method, PaymentMethod::CreditCard);
    assert_eq!(r.by_payment_method[1].count, 2);
}

#[test]
fn biggest_expense_is_largest_amount() {
    let conn = scenario();
    let reporter = Reporter::new(SqliteStore::new(&conn)).with_today(d(2025, 6, 15));
    let r = reporter.monthly_report(Period::new(5, 2025).unwrap()).unwrap();
    let biggest = r.biggest_expense.unwrap();
    assert_eq!(biggest.item, "Groceries");
    assert_eq!(biggest.amount, Decimal::from(300));
    assert_eq!(biggest.category.unwrap().name, "Food");
}

#[test]
fn empty_month_is_all_zero() {
    let conn = setup();
    let reporter = Reporter::new(SqliteStore::new(&conn)).with_today(d(2025, 6, 15));
    let r = reporter.monthly_report(Period::new(2, 2024).unwrap()).unwrap();

    assert_eq!(r.total_expenses, Decimal::ZERO);
    assert_eq!(r.total_income, Decimal::ZERO);
    assert_eq!(r.savings_rate, Decimal::ZERO);
    assert_eq!(r.daily_average, Decimal::ZERO);
    assert_eq!(r.comparison_to_last_month, Decimal::ZERO);
    assert!(r.by_category.is_empty());
    assert!(r.by_payment_method.is_empty());
    assert!(r.biggest_expense.is_none());
    // zero income gives a 0% rate, which still counts as below 10%
    assert_eq!(r.advice, vec![advice::LOW_SAVINGS.to_string()]);
}

#[test]
fn no_spending_last_month_means_no_comparison() {
    let conn = setup();
    spend(&conn, d(2025, 1, 4), "Coffee", "12.50", None, PaymentMethod::Cash);
    let reporter = Reporter::new(SqliteStore::new(&conn)).with_today(d(2025, 3, 1));
    let r = reporter.monthly_report(Period::new(1, 2025).unwrap()).unwrap();
    assert_eq!(r.total_expenses, Decimal::new(1250, 2));
    assert_eq!(r.comparison_to_last_month, Decimal::ZERO);
}

#[test]
fn january_compares_against_previous_december() {
    let conn = setup();
    spend(&conn, d(2024, 12, 31), "Party", "100", None, PaymentMethod::Cash);
    spend(&conn, d(2025, 1, 1), "Brunch", "50", None, PaymentMethod::Cash);
    let reporter = Reporter::new(SqliteStore::new(&conn)).with_today(d(2025, 3, 1));
    let r = reporter.monthly_report(Period::new(1, 2025).unwrap()).unwrap();
    assert_eq!(r.total_expenses, Decimal::from(50));
    assert_eq!(r.comparison_to_last_month, Decimal::from(-50));
    assert!(r.advice.iter().any(|a| a == advice::SPENT_LESS));
}

#[test]
fn current_month_averages_over_elapsed_days() {
    let conn = scenario();
    let reporter = Reporter::new(SqliteStore::new(&conn)).with_today(d(2025, 5, 10));
    let r = reporter.monthly_report(Period::new(5, 2025).unwrap()).unwrap();
    assert_eq!(r.daily_average, Decimal::from(60));
}

#[test]
fn missing_category_reference_is_uncategorized() {
    let conn = setup();
    conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
    spend(&conn, d(2025, 7, 2), "Mystery", "40", Some(999), PaymentMethod::EWallet);
    spend(&conn, d(2025, 7, 3), "Snack", "10", None, PaymentMethod::EWallet);

    let reporter = Reporter::new(SqliteStore::new(&conn)).with_today(d(2025, 9, 1));
    let r = reporter.monthly_report(Period::new(7, 2025).unwrap()).unwrap();
    assert_eq!(r.by_category.len(), 1);
    let bucket = &r.by_category[0];
    assert_eq!(bucket.category_id, "uncategorized");
    assert_eq!(bucket.category_name, "Uncategorized");
    assert_eq!(bucket.category_color, "#607D8B");
    assert_eq!(bucket.category_icon, "more-horizontal");
    assert_eq!(bucket.count, 2);
    assert_eq!(bucket.percentage, Decimal::ONE_HUNDRED);
}

#[test]
fn zero_income_clamps_savings_rate_known_quirk() {
    // Clearly a deficit, yet the rate clamps to 0 and the overspending rule
    // stays silent. Pinned as current behaviour, not as the desired one.
    let conn = setup();
    spend(&conn, d(2025, 8, 8), "Laptop", "500", None, PaymentMethod::CreditCard);
    let reporter = Reporter::new(SqliteStore::new(&conn)).with_today(d(2025, 10, 1));
    let r = reporter.monthly_report(Period::new(8, 2025).unwrap()).unwrap();
    assert_eq!(r.savings, Decimal::from(-500));
    assert_eq!(r.savings_rate, Decimal::ZERO);
    assert!(!r.advice.iter().any(|a| a == advice::OVERSPENDING));
    assert!(r.advice.iter().any(|a| a == advice::LOW_SAVINGS));
}

#[test]
fn report_serializes_with_expected_fields() {
    let conn = scenario();
    let reporter = Reporter::new(SqliteStore::new(&conn)).with_today(d(2025, 6, 15));
    let r = reporter.monthly_report(Period::new(5, 2025).unwrap()).unwrap();
    let v = serde_json::to_value(&r).unwrap();
    for key in [
        "month",
        "year",
        "total_expenses",
        "total_income",
        "savings",
        "savings_rate",
        "by_category",
        "by_payment_method",
        "biggest_expense",
        "daily_average",
        "comparison_to_last_month",
        "advice",
    ] {
        assert!(v.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(v["by_payment_method"][0]["method"], "debit_card");
    assert_eq!(v["by_category"][0]["category_name"], "Food");
    assert_eq!(v["total_expenses"].as_f64(), Some(600.0));
}

struct DownStore;

impl TransactionStore for DownStore {
    fn fetch_expenses(&self, _: NaiveDate, _: NaiveDate) -> Result<Vec<Expense>> {
        Err(Error::StoreUnavailable("connection timed out".into()))
    }

    fn fetch_income(&self, _: NaiveDate, _: NaiveDate) -> Result<Vec<Income>> {
        Ok(Vec::new())
    }
}

#[test]
fn store_failure_propagates_without_partial_report() {
    let reporter = Reporter::new(DownStore).with_today(d(2025, 6, 15));
    let err = reporter
        .monthly_report(Period::new(5, 2025).unwrap())
        .unwrap_err();
    assert!(matches!(err, Error::StoreUnavailable(_)));
}

#[test]
fn tied_totals_follow_largest_first_store_order() {
    let conn = setup();
    let books = categories::add(&conn, "Books", "book-open", "#6366f1").unwrap();
    let music = categories::add(&conn, "Music", "film", "#8b5cf6").unwrap();
    let art = categories::add(&conn, "Art", "gift", "#f97316").unwrap();
    spend(&conn, d(2025, 3, 1), "Paperback", "20", Some(books), PaymentMethod::Cash);
    spend(&conn, d(2025, 3, 2), "Vinyl", "50", Some(music), PaymentMethod::EWallet);
    spend(&conn, d(2025, 3, 3), "Hardcover", "30", Some(books), PaymentMethod::Cash);
    spend(&conn, d(2025, 3, 4), "Poster", "50", Some(art), PaymentMethod::CreditCard);

    let reporter = Reporter::new(SqliteStore::new(&conn)).with_today(d(2025, 4, 2));
    let r = reporter.monthly_report(Period::new(3, 2025).unwrap()).unwrap();

    // every group totals 50; the order is first appearance in Vinyl, Poster, Hardcover, Paperback
    let cats: Vec<&str> = r.by_category.iter().map(|c| c.category_name.as_str()).collect();
    assert_eq!(cats, vec!["Music", "Art", "Books"]);
    assert!(r.by_category.iter().all(|c| c.total == Decimal::from(50)));
    assert_eq!(r.by_category[2].count, 2);

    let methods: Vec<PaymentMethod> = r.by_payment_method.iter().map(|m| m.method).collect();
    assert_eq!(
        methods,
        vec![PaymentMethod::EWallet, PaymentMethod::CreditCard, PaymentMethod::Cash]
    );

    let biggest = r.biggest_expense.unwrap();
    assert_eq!(biggest.item, "Vinyl");
    assert_eq!(biggest.amount, Decimal::from(50));
}

fn raw_expense(id: i64, date: NaiveDate, amount: Decimal) -> Expense {
    Expense {
        id,
        item: format!("item {}", id),
        amount,
        category_id: None,
        category: None,
        date,
        payment_method: PaymentMethod::Cash,
        is_recurring: false,
        recurring_frequency: None,
        notes: None,
    }
}

#[test]
fn huge_prior_month_is_invalid_data_not_a_panic() {
    let store = MemoryStore::new(vec![raw_expense(1, d(2025, 4, 10), Decimal::MAX)], Vec::new());
    let reporter = Reporter::new(&store).with_today(d(2025, 6, 1));
    let err = reporter
        .monthly_report(Period::new(5, 2025).unwrap())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
}

#[test]
fn overflowing_month_total_is_invalid_data() {
    let half: Decimal = "50000000000000000000000000000".parse().unwrap();
    let store = MemoryStore::new(
        vec![
            raw_expense(1, d(2025, 5, 1), half),
            raw_expense(2, d(2025, 5, 2), half),
        ],
        Vec::new(),
    );
    let reporter = Reporter::new(&store).with_today(d(2025, 6, 1));
    let err = reporter
        .monthly_report(Period::new(5, 2025).unwrap())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
}

#[test]
fn amounts_above_the_limit_are_rejected() {
    assert!(utils::parse_amount("1000000000000000").is_ok());
    assert!(utils::parse_amount("1000000000000000.01").is_err());

    let conn = setup();
    spend(&conn, d(2025, 5, 5), "Island", "20000000000000000", None, PaymentMethod::BankTransfer);
    let reporter = Reporter::new(SqliteStore::new(&conn)).with_today(d(2025, 6, 1));
    let err = reporter
        .monthly_report(Period::new(5, 2025).unwrap())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
}
