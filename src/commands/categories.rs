// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Category;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let icon = sub.get_one::<String>("icon").unwrap();
            let color = sub.get_one::<String>("color").unwrap();
            add(conn, name, icon, color)?;
            println!("Added category '{}'", name);
        }
        Some(("list", sub)) => {
            let cats = list(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let data = cats
                    .into_iter()
                    .map(|c| vec![c.id.to_string(), c.name, c.icon, c.color])
                    .collect();
                println!("{}", pretty_table(&["ID", "Category", "Icon", "Color"], data));
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let n = conn.execute("DELETE FROM categories WHERE name=?1", params![name])?;
            if n == 0 {
                bail!("Category '{}' not found", name);
            }
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

pub fn add(conn: &Connection, name: &str, icon: &str, color: &str) -> Result<i64> {
    if name.is_empty() {
        bail!("Category name must not be empty");
    }
    conn.execute(
        "INSERT INTO categories(name, icon, color) VALUES (?1, ?2, ?3)",
        params![name, icon, color],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name, icon, color FROM categories ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            icon: r.get(2)?,
            color: r.get(3)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
