// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{self, Settings};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            let current = Settings::load(conn)?;
            let value = config::get(conn, key)?.unwrap_or_else(|| match key.as_str() {
                "currency" => current.currency.clone(),
                _ => current.currency_symbol.clone(),
            });
            println!("{}", value);
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            let value = sub.get_one::<String>("value").unwrap().trim();
            config::set(conn, key, value)?;
            println!("{} = {}", key, value);
        }
        Some(("show", sub)) => {
            let s = Settings::load(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
                let rows = vec![
                    vec!["currency".into(), s.currency],
                    vec!["currency_symbol".into(), s.currency_symbol],
                ];
                println!("{}", pretty_table(&["Key", "Value"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
