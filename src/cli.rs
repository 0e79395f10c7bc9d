// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON document per line"),
    )
}

fn recurring_arg() -> Arg {
    Arg::new("recurring")
        .long("recurring")
        .value_parser(["weekly", "monthly", "yearly"])
        .help("Mark as recurring with the given frequency")
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .help("Month as YYYY-MM (defaults to the current month)")
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Manage expense categories")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("icon")
                        .long("icon")
                        .default_value("more-horizontal"),
                )
                .arg(Arg::new("color").long("color").default_value("#607D8B")),
        )
        .subcommand(json_args(Command::new("list")))
        .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true)))
}

fn expense_cmd() -> Command {
    Command::new("expense")
        .about("Record and list expenses")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("date").long("date").required(true))
                .arg(Arg::new("item").long("item").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("method")
                        .long("method")
                        .default_value("cash")
                        .help("cash|credit_card|debit_card|e_wallet|bank_transfer|other"),
                )
                .arg(recurring_arg())
                .arg(Arg::new("note").long("note")),
        )
        .subcommand(json_args(
            Command::new("list")
                .arg(Arg::new("from").long("from").help("Start date, inclusive"))
                .arg(Arg::new("to").long("to").help("End date, inclusive"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("method").long("method"))
                .arg(
                    Arg::new("search")
                        .long("search")
                        .help("Case-insensitive substring of the item"),
                )
                .arg(
                    Arg::new("recurring-only")
                        .long("recurring-only")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("offset")
                        .long("offset")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("rm").arg(
                Arg::new("id")
                    .long("id")
                    .required(true)
                    .value_parser(value_parser!(i64)),
            ),
        )
        .subcommand(
            Command::new("export")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["csv", "json"])
                        .default_value("csv"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
}

fn income_cmd() -> Command {
    Command::new("income")
        .about("Record and list income")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("date").long("date").required(true))
                .arg(Arg::new("source").long("source").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(recurring_arg())
                .arg(Arg::new("note").long("note")),
        )
        .subcommand(json_args(
            Command::new("list")
                .arg(Arg::new("from").long("from"))
                .arg(Arg::new("to").long("to"))
                .arg(
                    Arg::new("recurring-only")
                        .long("recurring-only")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("rm").arg(
                Arg::new("id")
                    .long("id")
                    .required(true)
                    .value_parser(value_parser!(i64)),
            ),
        )
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Monthly reports and trends")
        .subcommand(json_args(Command::new("monthly").arg(month_arg())))
        .subcommand(json_args(
            Command::new("trend").arg(month_arg()).arg(
                Arg::new("months")
                    .long("months")
                    .value_parser(value_parser!(u32).range(1..=60))
                    .default_value("6"),
            ),
        ))
}

fn notify_cmd() -> Command {
    Command::new("notify")
        .about("Monthly report notifications")
        .subcommand(Command::new("generate").about("Store a report notification for last month"))
        .subcommand(json_args(
            Command::new("list").arg(
                Arg::new("limit")
                    .long("limit")
                    .value_parser(value_parser!(usize))
                    .default_value("20"),
            ),
        ))
        .subcommand(
            Command::new("read").arg(
                Arg::new("id")
                    .long("id")
                    .required(true)
                    .value_parser(value_parser!(i64)),
            ),
        )
}

fn receipt_cmd() -> Command {
    Command::new("receipt")
        .about("Guess expense fields from recognized receipt text")
        .subcommand(json_args(
            Command::new("parse").arg(
                Arg::new("path")
                    .long("path")
                    .required(true)
                    .help("Text file produced by a text-recognition service"),
            ),
        ))
}

fn config_cmd() -> Command {
    Command::new("config")
        .about("Read and change settings")
        .subcommand(Command::new("get").arg(Arg::new("key").long("key").required(true)))
        .subcommand(
            Command::new("set")
                .arg(Arg::new("key").long("key").required(true))
                .arg(Arg::new("value").long("value").required(true)),
        )
        .subcommand(json_args(Command::new("show")))
}

pub fn build_cli() -> Command {
    Command::new("spendlens")
        .version(clap::crate_version!())
        .about("Track expenses and income, with monthly reports and budgeting advice")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("SPENDLENS_DB")
                .help("Path to the SQLite database"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging (RUST_LOG takes precedence)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(category_cmd())
        .subcommand(expense_cmd())
        .subcommand(income_cmd())
        .subcommand(report_cmd())
        .subcommand(notify_cmd())
        .subcommand(receipt_cmd())
        .subcommand(config_cmd())
}
