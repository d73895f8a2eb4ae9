// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::error::FinanceError;
use crate::models::{Investment, InvestmentType};
use crate::utils::{
    fmt_money, maybe_print_json, optional_text, patch_text, parse_amount, parse_bool, parse_date,
    parse_decimal, parse_timestamp, pretty_table, required_arg,
};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use serde::Serialize;

const ENTITY: &str = "investment";
const COLUMNS: &str = "id, name, type, initial_amount, current_amount, purchase_date, description, is_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct NewInvestment {
    pub name: String,
    pub kind: InvestmentType,
    pub initial_amount: Decimal,
    pub current_amount: Decimal,
    pub purchase_date: NaiveDate,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InvestmentPatch {
    pub name: Option<String>,
    pub kind: Option<InvestmentType>,
    pub initial_amount: Option<Decimal>,
    pub current_amount: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches, cfg: &Config) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let initial = parse_amount("initial amount", required_arg(sub, "initial")?)?;
            // A fresh position is worth what was paid unless told otherwise.
            let current = match sub.get_one::<String>("current") {
                Some(c) => parse_amount("current amount", c)?,
                None => initial,
            };
            let new = NewInvestment {
                name: required_arg(sub, "name")?.trim().to_string(),
                kind: required_arg(sub, "type")?.parse()?,
                initial_amount: initial,
                current_amount: current,
                purchase_date: parse_date(required_arg(sub, "date")?)?,
                description: optional_text(sub, "description"),
            };
            let inv = insert(conn, new)?;
            println!(
                "Added investment #{} '{}' {} ({})",
                inv.id,
                inv.name,
                fmt_money(&inv.initial_amount, &cfg.currency),
                inv.kind.label()
            );
        }
        Some(("list", sub)) => list(conn, sub, cfg)?,
        Some(("update", sub)) => {
            let id = *sub.get_one::<i64>("id").context("Missing --id")?;
            let patch = InvestmentPatch {
                name: optional_text(sub, "name"),
                kind: sub
                    .get_one::<String>("type")
                    .map(|s| s.parse::<InvestmentType>())
                    .transpose()?,
                initial_amount: sub
                    .get_one::<String>("initial")
                    .map(|s| parse_amount("initial amount", s))
                    .transpose()?,
                current_amount: sub
                    .get_one::<String>("current")
                    .map(|s| parse_amount("current amount", s))
                    .transpose()?,
                purchase_date: sub
                    .get_one::<String>("date")
                    .map(|s| parse_date(s))
                    .transpose()?,
                description: patch_text(sub, "description"),
                is_active: sub
                    .get_one::<String>("active")
                    .map(|s| parse_bool(s))
                    .transpose()?,
            };
            let inv = update(conn, id, patch)?;
            println!(
                "Updated investment #{} '{}' (now {}, {:.2}%)",
                inv.id,
                inv.name,
                fmt_money(&inv.current_amount, &cfg.currency),
                inv.performance()
            );
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("Missing --id")?;
            delete(conn, id)?;
            println!("Removed investment #{}", id);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InvestmentRow<'a> {
    #[serde(flatten)]
    investment: &'a Investment,
    performance: Decimal,
}

fn list(conn: &Connection, sub: &clap::ArgMatches, cfg: &Config) -> Result<()> {
    let data = load_all(conn)?;
    let with_perf: Vec<InvestmentRow> = data
        .iter()
        .map(|investment| InvestmentRow {
            investment,
            performance: investment.performance().round_dp(2),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &with_perf)? {
        let rows = with_perf
            .iter()
            .map(|row| {
                let inv = row.investment;
                vec![
                    inv.id.to_string(),
                    inv.name.clone(),
                    inv.kind.label().to_string(),
                    inv.purchase_date.to_string(),
                    fmt_money(&inv.initial_amount, &cfg.currency),
                    fmt_money(&inv.current_amount, &cfg.currency),
                    format!("{:.2}%", row.performance),
                    if inv.is_active { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Type", "Purchased", "Initial", "Current", "Return", "Active"],
                rows
            )
        );
    }
    Ok(())
}

fn decode(r: &Row) -> Result<Investment> {
    let id: i64 = r.get(0)?;
    let kind: String = r.get(2)?;
    let initial: String = r.get(3)?;
    let current: String = r.get(4)?;
    let purchased: String = r.get(5)?;
    let created: String = r.get(8)?;
    let updated: String = r.get(9)?;
    Ok(Investment {
        id,
        name: r.get(1)?,
        kind: kind
            .parse()
            .with_context(|| format!("Invalid type in {} #{}", ENTITY, id))?,
        initial_amount: parse_decimal(&initial)
            .with_context(|| format!("Invalid initial amount in {} #{}", ENTITY, id))?,
        current_amount: parse_decimal(&current)
            .with_context(|| format!("Invalid current amount in {} #{}", ENTITY, id))?,
        purchase_date: parse_date(&purchased)?,
        description: r.get(6)?,
        is_active: r.get(7)?,
        created_at: parse_timestamp(&created)?,
        updated_at: parse_timestamp(&updated)?,
    })
}

pub fn load_all(conn: &Connection) -> Result<Vec<Investment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM investments ORDER BY created_at DESC, id DESC",
        COLUMNS
    ))?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(decode(r)?);
    }
    Ok(data)
}

pub fn get(conn: &Connection, id: i64) -> Result<Investment> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM investments WHERE id=?1", COLUMNS))?;
    let mut rows = stmt.query(params![id])?;
    if let Some(r) = rows.next()? {
        return decode(r);
    }
    Err(FinanceError::NotFound { entity: ENTITY, id }.into())
}

pub fn insert(conn: &Connection, new: NewInvestment) -> Result<Investment> {
    let now = Utc::now();
    let mut inv = Investment {
        id: 0,
        name: new.name,
        kind: new.kind,
        initial_amount: new.initial_amount,
        current_amount: new.current_amount,
        purchase_date: new.purchase_date,
        description: new.description,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    inv.validate()?;
    store(conn, &inv)?;
    inv.id = conn.last_insert_rowid();
    tracing::info!(id = inv.id, name = %inv.name, "investment added");
    Ok(inv)
}

pub(crate) fn store(conn: &Connection, inv: &Investment) -> Result<()> {
    conn.execute(
        "INSERT INTO investments(name, type, initial_amount, current_amount, purchase_date, description, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            inv.name,
            inv.kind.as_str(),
            inv.initial_amount.to_string(),
            inv.current_amount.to_string(),
            inv.purchase_date.to_string(),
            inv.description,
            inv.is_active,
            inv.created_at.to_rfc3339(),
            inv.updated_at.to_rfc3339()
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, id: i64, patch: InvestmentPatch) -> Result<Investment> {
    let mut inv = get(conn, id)?;
    if let Some(name) = patch.name {
        inv.name = name;
    }
    if let Some(kind) = patch.kind {
        inv.kind = kind;
    }
    if let Some(initial) = patch.initial_amount {
        inv.initial_amount = initial;
    }
    if let Some(current) = patch.current_amount {
        inv.current_amount = current;
    }
    if let Some(date) = patch.purchase_date {
        inv.purchase_date = date;
    }
    if let Some(description) = patch.description {
        inv.description = description;
    }
    if let Some(active) = patch.is_active {
        inv.is_active = active;
    }
    inv.updated_at = Utc::now();
    inv.validate()?;
    conn.execute(
        "UPDATE investments SET name=?1, type=?2, initial_amount=?3, current_amount=?4, purchase_date=?5,
         description=?6, is_active=?7, updated_at=?8 WHERE id=?9",
        params![
            inv.name,
            inv.kind.as_str(),
            inv.initial_amount.to_string(),
            inv.current_amount.to_string(),
            inv.purchase_date.to_string(),
            inv.description,
            inv.is_active,
            inv.updated_at.to_rfc3339(),
            id
        ],
    )?;
    tracing::info!(id, "investment updated");
    Ok(inv)
}

pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM investments WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(FinanceError::NotFound { entity: ENTITY, id }.into());
    }
    tracing::info!(id, "investment removed");
    Ok(())
}
