// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use pocketbook::{cli, commands, config::Config, db};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let cfg = Config::load(matches.get_one::<String>("db"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cfg.log_filter)
                .unwrap_or_else(|_| EnvFilter::new(pocketbook::config::DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut conn = db::open_or_init(&cfg.db_path)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", cfg.db_path.display());
        }
        Some(("salary", sub)) => commands::salary::handle(&conn, sub, &cfg)?,
        Some(("fixed-income", sub)) => commands::fixed_incomes::handle(&conn, sub, &cfg)?,
        Some(("variable-income", sub)) => commands::variable_incomes::handle(&conn, sub, &cfg)?,
        Some(("investment", sub)) => commands::investments::handle(&conn, sub, &cfg)?,
        Some(("fixed-expense", sub)) => commands::fixed_expenses::handle(&conn, sub, &cfg)?,
        Some(("variable-expense", sub)) => {
            commands::variable_expenses::handle(&conn, sub, &cfg)?
        }
        Some(("summary", sub)) => commands::summary::handle(&conn, sub, &cfg)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
