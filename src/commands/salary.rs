// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The single legacy salary row. It predates fixed incomes and is kept as
//! its own singleton; the summary adds it to the `salary` income type.

use crate::config::Config;
use crate::models::Salary;
use crate::utils::{
    fmt_money, maybe_print_json, parse_amount, parse_decimal, parse_timestamp, pretty_table,
    required_arg,
};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches, cfg: &Config) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let amount = parse_amount("salary", required_arg(sub, "amount")?)?;
            let description = required_arg(sub, "description")?.trim().to_string();
            let s = set(conn, amount, &description)?;
            println!(
                "Salary set to {} ({})",
                fmt_money(&s.amount, &cfg.currency),
                s.description
            );
        }
        Some(("show", sub)) => {
            let s = get(conn)?;
            if !maybe_print_json(sub.get_flag("json"), false, &s)? {
                match s {
                    Some(s) => println!(
                        "{}",
                        pretty_table(
                            &["Amount", "Description", "Updated"],
                            vec![vec![
                                fmt_money(&s.amount, &cfg.currency),
                                s.description,
                                s.updated_at.format("%Y-%m-%d %H:%M").to_string(),
                            ]],
                        )
                    ),
                    None => println!("No salary recorded"),
                }
            }
        }
        Some(("clear", _)) => {
            if clear(conn)? {
                println!("Salary cleared");
            } else {
                println!("No salary recorded");
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn get(conn: &Connection) -> Result<Option<Salary>> {
    let row: Option<(String, String, String)> = conn
        .query_row(
            "SELECT amount, description, updated_at FROM salary WHERE id=1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()?;
    match row {
        Some((amount, description, updated)) => Ok(Some(Salary {
            amount: parse_decimal(&amount).context("Invalid stored salary amount")?,
            description,
            updated_at: parse_timestamp(&updated)?,
        })),
        None => Ok(None),
    }
}

/// Creates or replaces the salary; always refreshes `updated_at`.
pub fn set(conn: &Connection, amount: Decimal, description: &str) -> Result<Salary> {
    let s = Salary {
        amount,
        description: description.to_string(),
        updated_at: Utc::now(),
    };
    store(conn, &s)?;
    tracing::info!(amount = %s.amount, "salary set");
    Ok(s)
}

pub(crate) fn store(conn: &Connection, s: &Salary) -> Result<()> {
    s.validate()?;
    conn.execute(
        "INSERT INTO salary(id, amount, description, updated_at) VALUES (1, ?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET amount=excluded.amount, description=excluded.description,
         updated_at=excluded.updated_at",
        params![s.amount.to_string(), s.description, s.updated_at.to_rfc3339()],
    )?;
    Ok(())
}

/// Returns whether a salary existed.
pub fn clear(conn: &Connection) -> Result<bool> {
    let n = conn.execute("DELETE FROM salary", [])?;
    tracing::info!(removed = n, "salary cleared");
    Ok(n > 0)
}
