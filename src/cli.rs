// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn text(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).help(help)
}

fn active_arg() -> Arg {
    text("active", "true|false; inactive records are left out of totals")
}

fn crud(
    name: &'static str,
    about: &'static str,
    add: Vec<Arg>,
    update: Vec<Arg>,
    list: Vec<Arg>,
) -> Command {
    Command::new(name)
        .about(about)
        .subcommand_required(true)
        .subcommand(Command::new("add").args(add))
        .subcommand(json_flags(Command::new("list")).args(list))
        .subcommand(Command::new("update").arg(id_arg()).args(update))
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn month_filter() -> Arg {
    text("month", "Only records dated in YYYY-MM")
}

pub fn build_cli() -> Command {
    let expense_category = "moradia|transporte|alimentacao|saude|educacao|lazer|outros";

    Command::new("pocketbook")
        .version(clap::crate_version!())
        .about("Track salary, incomes, expenses and investments with a live monthly summary")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("Database file (overrides POCKETBOOK_DB)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("salary")
                .about("Legacy single salary")
                .subcommand_required(true)
                .subcommand(
                    Command::new("set")
                        .arg(text("amount", "Monthly amount").required(true))
                        .arg(text("description", "Description").required(true)),
                )
                .subcommand(
                    Command::new("show").arg(
                        Arg::new("json")
                            .long("json")
                            .action(ArgAction::SetTrue),
                    ),
                )
                .subcommand(Command::new("clear")),
        )
        .subcommand(crud(
            "fixed-income",
            "Recurring monthly incomes",
            vec![
                text("name", "Name").required(true),
                text("amount", "Monthly amount").required(true),
                text("type", "salary|other").default_value("salary"),
                text("description", "Description"),
            ],
            vec![
                text("name", "Name"),
                text("amount", "Monthly amount"),
                text("type", "salary|other"),
                text("description", "Description"),
                active_arg(),
            ],
            vec![],
        ))
        .subcommand(crud(
            "variable-income",
            "One-off dated incomes",
            vec![
                text("name", "Name").required(true),
                text("amount", "Amount").required(true),
                text("type", "freelance|business|investment|other").default_value("other"),
                text("date", "YYYY-MM-DD, defaults to today"),
                text("description", "Description"),
            ],
            vec![
                text("name", "Name"),
                text("amount", "Amount"),
                text("type", "freelance|business|investment|other"),
                text("date", "YYYY-MM-DD"),
                text("description", "Description"),
            ],
            vec![month_filter()],
        ))
        .subcommand(crud(
            "investment",
            "Investments and their performance",
            vec![
                text("name", "Name").required(true),
                text("type", "stocks|bonds|funds|crypto|real_estate|other").required(true),
                text("initial", "Amount invested").required(true),
                text("current", "Current value, defaults to the initial amount"),
                text("date", "Purchase date YYYY-MM-DD").required(true),
                text("description", "Description"),
            ],
            vec![
                text("name", "Name"),
                text("type", "stocks|bonds|funds|crypto|real_estate|other"),
                text("initial", "Amount invested"),
                text("current", "Current value"),
                text("date", "Purchase date YYYY-MM-DD"),
                text("description", "Description"),
                active_arg(),
            ],
            vec![],
        ))
        .subcommand(crud(
            "fixed-expense",
            "Recurring monthly expenses",
            vec![
                text("name", "Name").required(true),
                text("amount", "Monthly amount").required(true),
                text("category", expense_category).required(true),
                Arg::new("due-day")
                    .long("due-day")
                    .required(true)
                    .value_parser(value_parser!(u8))
                    .help("Day of month, 1-31"),
                text("description", "Description"),
            ],
            vec![
                text("name", "Name"),
                text("amount", "Monthly amount"),
                text("category", expense_category),
                Arg::new("due-day")
                    .long("due-day")
                    .value_parser(value_parser!(u8))
                    .help("Day of month, 1-31"),
                text("description", "Description"),
                active_arg(),
            ],
            vec![],
        ))
        .subcommand(crud(
            "variable-expense",
            "One-off dated expenses",
            vec![
                text("name", "Name").required(true),
                text("amount", "Amount").required(true),
                text("category", expense_category).required(true),
                text("date", "YYYY-MM-DD, defaults to today"),
                text("description", "Description"),
            ],
            vec![
                text("name", "Name"),
                text("amount", "Amount"),
                text("category", expense_category),
                text("date", "YYYY-MM-DD"),
                text("description", "Description"),
            ],
            vec![month_filter()],
        ))
        .subcommand(
            Command::new("summary")
                .about("Totals for the current month")
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("export")
                .about("Write every record to a file")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("json")
                        .value_parser(["json", "csv"]),
                )
                .arg(text("out", "Output path").required(true)),
        )
        .subcommand(
            Command::new("import")
                .about("Load a JSON snapshot (pocketbook export or browser app data)")
                .arg(text("path", "Snapshot file").required(true)),
        )
        .subcommand(Command::new("doctor").about("Check stored data for invalid values"))
}
