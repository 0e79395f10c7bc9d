// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

pub const KEYS: [&str; 2] = ["currency", "currency_symbol"];

const DEFAULT_CURRENCY: &str = "MYR";
const DEFAULT_CURRENCY_SYMBOL: &str = "RM";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub currency: String,
    pub currency_symbol: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

impl Settings {
    pub fn load(conn: &Connection) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            currency: get(conn, "currency")?.unwrap_or(defaults.currency),
            currency_symbol: get(conn, "currency_symbol")?.unwrap_or(defaults.currency_symbol),
        })
    }

    pub fn fmt_money(&self, amount: &rust_decimal::Decimal) -> String {
        format!("{} {:.2}", self.currency_symbol, amount)
    }
}

fn check_key(key: &str) -> Result<()> {
    if KEYS.contains(&key) {
        Ok(())
    } else {
        Err(anyhow!(
            "Unknown setting '{}' (expected one of: {})",
            key,
            KEYS.join(", ")
        ))
    }
}

pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
    check_key(key)?;
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    check_key(key)?;
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}
