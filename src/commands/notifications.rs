// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::notify::{DEFAULT_LIST_LIMIT, generate_monthly_notification, list_notifications, mark_read};
use crate::report::Reporter;
use crate::store::SqliteStore;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("generate", _)) => {
            let store = SqliteStore::new(conn);
            let settings = Settings::load(conn)?;
            let digest = generate_monthly_notification(
                &Reporter::new(store),
                &store,
                &settings.currency_symbol,
            )
            .context("Generate monthly notification")?;
            println!(
                "Stored notification #{} for {} {}",
                digest.notification_id,
                digest.period.month_name(),
                digest.period.year()
            );
        }
        Some(("list", sub)) => {
            let limit = *sub.get_one::<usize>("limit").unwrap_or(&DEFAULT_LIST_LIMIT);
            let items = list_notifications(conn, limit)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
                let rows = items
                    .into_iter()
                    .map(|n| {
                        vec![
                            n.id.to_string(),
                            if n.is_read { " ".into() } else { "*".into() },
                            n.kind.as_str().to_string(),
                            n.title,
                            n.message,
                            n.created_at,
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "New", "Type", "Title", "Message", "Created"], rows)
                );
            }
        }
        Some(("read", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            mark_read(conn, id)?;
            println!("Marked notification {} as read", id);
        }
        _ => {}
    }
    Ok(())
}
