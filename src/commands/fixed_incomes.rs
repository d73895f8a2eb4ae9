// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::error::FinanceError;
use crate::models::{FixedIncome, IncomeType};
use crate::utils::{
    fmt_money, maybe_print_json, optional_text, patch_text, parse_amount, parse_bool, parse_decimal,
    parse_timestamp, pretty_table, required_arg,
};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;

const ENTITY: &str = "fixed income";
const COLUMNS: &str = "id, name, amount, type, description, is_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct NewFixedIncome {
    pub name: String,
    pub amount: Decimal,
    pub kind: IncomeType,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FixedIncomePatch {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub kind: Option<IncomeType>,
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches, cfg: &Config) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = NewFixedIncome {
                name: required_arg(sub, "name")?.trim().to_string(),
                amount: parse_amount("amount", required_arg(sub, "amount")?)?,
                kind: IncomeType::parse_fixed(required_arg(sub, "type")?)?,
                description: optional_text(sub, "description"),
            };
            let i = insert(conn, new)?;
            println!(
                "Added fixed income #{} '{}' {} ({})",
                i.id,
                i.name,
                fmt_money(&i.amount, &cfg.currency),
                i.kind.label()
            );
        }
        Some(("list", sub)) => list(conn, sub, cfg)?,
        Some(("update", sub)) => {
            let id = *sub.get_one::<i64>("id").context("Missing --id")?;
            let patch = FixedIncomePatch {
                name: optional_text(sub, "name"),
                amount: sub
                    .get_one::<String>("amount")
                    .map(|s| parse_amount("amount", s))
                    .transpose()?,
                kind: sub
                    .get_one::<String>("type")
                    .map(|s| IncomeType::parse_fixed(s))
                    .transpose()?,
                description: patch_text(sub, "description"),
                is_active: sub
                    .get_one::<String>("active")
                    .map(|s| parse_bool(s))
                    .transpose()?,
            };
            let i = update(conn, id, patch)?;
            println!("Updated fixed income #{} '{}'", i.id, i.name);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("Missing --id")?;
            delete(conn, id)?;
            println!("Removed fixed income #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches, cfg: &Config) -> Result<()> {
    let data = load_all(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|i| {
                vec![
                    i.id.to_string(),
                    i.name.clone(),
                    i.kind.label().to_string(),
                    fmt_money(&i.amount, &cfg.currency),
                    if i.is_active { "yes" } else { "no" }.to_string(),
                    i.description.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Name", "Type", "Amount", "Active", "Description"], rows)
        );
    }
    Ok(())
}

fn decode(r: &Row) -> Result<FixedIncome> {
    let id: i64 = r.get(0)?;
    let amount: String = r.get(2)?;
    let kind: String = r.get(3)?;
    let created: String = r.get(6)?;
    let updated: String = r.get(7)?;
    Ok(FixedIncome {
        id,
        name: r.get(1)?,
        amount: parse_decimal(&amount)
            .with_context(|| format!("Invalid amount in {} #{}", ENTITY, id))?,
        kind: IncomeType::parse_fixed(&kind)
            .with_context(|| format!("Invalid type in {} #{}", ENTITY, id))?,
        description: r.get(4)?,
        is_active: r.get(5)?,
        created_at: parse_timestamp(&created)?,
        updated_at: parse_timestamp(&updated)?,
    })
}

pub fn load_all(conn: &Connection) -> Result<Vec<FixedIncome>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM fixed_incomes ORDER BY created_at DESC, id DESC",
        COLUMNS
    ))?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(decode(r)?);
    }
    Ok(data)
}

pub fn get(conn: &Connection, id: i64) -> Result<FixedIncome> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM fixed_incomes WHERE id=?1",
        COLUMNS
    ))?;
    let mut rows = stmt.query(params![id])?;
    if let Some(r) = rows.next()? {
        return decode(r);
    }
    Err(FinanceError::NotFound { entity: ENTITY, id }.into())
}

pub fn insert(conn: &Connection, new: NewFixedIncome) -> Result<FixedIncome> {
    let now = Utc::now();
    let mut i = FixedIncome {
        id: 0,
        name: new.name,
        amount: new.amount,
        kind: new.kind,
        description: new.description,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    i.validate()?;
    store(conn, &i)?;
    i.id = conn.last_insert_rowid();
    tracing::info!(id = i.id, name = %i.name, "fixed income added");
    Ok(i)
}

pub(crate) fn store(conn: &Connection, i: &FixedIncome) -> Result<()> {
    conn.execute(
        "INSERT INTO fixed_incomes(name, amount, type, description, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            i.name,
            i.amount.to_string(),
            i.kind.as_str(),
            i.description,
            i.is_active,
            i.created_at.to_rfc3339(),
            i.updated_at.to_rfc3339()
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, id: i64, patch: FixedIncomePatch) -> Result<FixedIncome> {
    let mut i = get(conn, id)?;
    if let Some(name) = patch.name {
        i.name = name;
    }
    if let Some(amount) = patch.amount {
        i.amount = amount;
    }
    if let Some(kind) = patch.kind {
        i.kind = kind;
    }
    if let Some(description) = patch.description {
        i.description = description;
    }
    if let Some(active) = patch.is_active {
        i.is_active = active;
    }
    i.updated_at = Utc::now();
    i.validate()?;
    conn.execute(
        "UPDATE fixed_incomes SET name=?1, amount=?2, type=?3, description=?4, is_active=?5, updated_at=?6
         WHERE id=?7",
        params![
            i.name,
            i.amount.to_string(),
            i.kind.as_str(),
            i.description,
            i.is_active,
            i.updated_at.to_rfc3339(),
            id
        ],
    )?;
    tracing::info!(id, "fixed income updated");
    Ok(i)
}

pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM fixed_incomes WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(FinanceError::NotFound { entity: ENTITY, id }.into());
    }
    tracing::info!(id, "fixed income removed");
    Ok(())
}
