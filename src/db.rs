// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Spendlens", "spendlens"));

/// Icons and colors for the categories a fresh database starts with.
const DEFAULT_CATEGORIES: [(&str, &str, &str); 15] = [
    ("Food & Dining", "utensils", "#f43f5e"),
    ("Transport", "car", "#3b82f6"),
    ("Shopping", "shopping-bag", "#ec4899"),
    ("Bills & Utilities", "zap", "#f59e0b"),
    ("Entertainment", "film", "#8b5cf6"),
    ("Health", "heart", "#ef4444"),
    ("Education", "book-open", "#6366f1"),
    ("Groceries", "shopping-cart", "#10b981"),
    ("Housing", "home", "#14b8a6"),
    ("Insurance", "shield", "#64748b"),
    ("Investment", "trending-up", "#22c55e"),
    ("Personal Care", "scissors", "#a855f7"),
    ("Travel", "plane", "#06b6d4"),
    ("Gifts", "gift", "#f97316"),
    ("Others", "more-horizontal", "#607D8B"),
];

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("spendlens.sqlite"))
}

pub fn open_or_init(path: Option<&Path>) -> Result<Connection> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => db_path()?,
    };
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    let fresh = init_schema(&conn)?;
    if fresh {
        seed_default_categories(&conn)?;
        tracing::info!(path = %path.display(), "initialized new database");
    }
    Ok(conn)
}

/// Creates any missing tables. Returns true when the categories table was empty.
pub fn init_schema(conn: &Connection) -> Result<bool> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        icon TEXT NOT NULL DEFAULT 'more-horizontal',
        color TEXT NOT NULL DEFAULT '#607D8B',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        item TEXT NOT NULL,
        amount TEXT NOT NULL,
        category_id INTEGER,
        date TEXT NOT NULL,
        payment_method TEXT NOT NULL DEFAULT 'cash'
            CHECK(payment_method IN ('cash','credit_card','debit_card','e_wallet','bank_transfer','other')),
        is_recurring INTEGER NOT NULL DEFAULT 0,
        recurring_frequency TEXT CHECK(recurring_frequency IN ('weekly','monthly','yearly')),
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);

    CREATE TABLE IF NOT EXISTS income(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        source TEXT NOT NULL,
        amount TEXT NOT NULL,
        date TEXT NOT NULL,
        is_recurring INTEGER NOT NULL DEFAULT 0,
        recurring_frequency TEXT CHECK(recurring_frequency IN ('weekly','monthly','yearly')),
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_income_date ON income(date);

    CREATE TABLE IF NOT EXISTS notifications(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        message TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('report','reminder','alert')),
        is_read INTEGER NOT NULL DEFAULT 0,
        data TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
    Ok(count == 0)
}

pub fn seed_default_categories(conn: &Connection) -> Result<()> {
    let mut stmt =
        conn.prepare("INSERT OR IGNORE INTO categories(name, icon, color) VALUES (?1, ?2, ?3)")?;
    for (name, icon, color) in DEFAULT_CATEGORIES {
        stmt.execute(params![name, icon, color])?;
    }
    Ok(())
}
