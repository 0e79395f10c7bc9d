// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::receipt::extract_receipt;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result};

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    if let Some(("parse", sub)) = m.subcommand() {
        let path = sub.get_one::<String>("path").unwrap().trim();
        let text =
            std::fs::read_to_string(path).with_context(|| format!("Read receipt text {}", path))?;
        let guess = extract_receipt(&text);
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &guess)? {
            let show = |v: Option<String>| v.unwrap_or_else(|| "-".into());
            let rows = vec![
                vec!["Merchant".into(), show(guess.merchant.clone())],
                vec!["Amount".into(), show(guess.amount.map(|a| format!("{:.2}", a)))],
                vec!["Date".into(), show(guess.date.map(|d| d.to_string()))],
            ];
            println!("{}", pretty_table(&["Field", "Guess"], rows));
        }
    }
    Ok(())
}
