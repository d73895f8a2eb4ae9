// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::error::FinanceError;
use crate::models::{ExpenseCategory, FixedExpense};
use crate::utils::{
    fmt_money, maybe_print_json, optional_text, patch_text, parse_amount, parse_bool, parse_decimal,
    parse_timestamp, pretty_table, required_arg,
};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;

const ENTITY: &str = "fixed expense";
const COLUMNS: &str =
    "id, name, amount, category, description, due_day, is_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct NewFixedExpense {
    pub name: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub description: Option<String>,
    pub due_day: u8,
}

#[derive(Debug, Clone, Default)]
pub struct FixedExpensePatch {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub category: Option<ExpenseCategory>,
    pub description: Option<Option<String>>,
    pub due_day: Option<u8>,
    pub is_active: Option<bool>,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches, cfg: &Config) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = NewFixedExpense {
                name: required_arg(sub, "name")?.trim().to_string(),
                amount: parse_amount("amount", required_arg(sub, "amount")?)?,
                category: required_arg(sub, "category")?.parse()?,
                description: optional_text(sub, "description"),
                due_day: *sub.get_one::<u8>("due-day").context("Missing --due-day")?,
            };
            let e = insert(conn, new)?;
            println!(
                "Added fixed expense #{} '{}' {} (due day {})",
                e.id,
                e.name,
                fmt_money(&e.amount, &cfg.currency),
                e.due_day
            );
        }
        Some(("list", sub)) => list(conn, sub, cfg)?,
        Some(("update", sub)) => {
            let id = *sub.get_one::<i64>("id").context("Missing --id")?;
            let patch = FixedExpensePatch {
                name: optional_text(sub, "name"),
                amount: sub
                    .get_one::<String>("amount")
                    .map(|s| parse_amount("amount", s))
                    .transpose()?,
                category: sub
                    .get_one::<String>("category")
                    .map(|s| s.parse::<ExpenseCategory>())
                    .transpose()?,
                description: patch_text(sub, "description"),
                due_day: sub.get_one::<u8>("due-day").copied(),
                is_active: sub
                    .get_one::<String>("active")
                    .map(|s| parse_bool(s))
                    .transpose()?,
            };
            let e = update(conn, id, patch)?;
            println!("Updated fixed expense #{} '{}'", e.id, e.name);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("Missing --id")?;
            delete(conn, id)?;
            println!("Removed fixed expense #{}", id);
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
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.name.clone(),
                    e.category.label().to_string(),
                    fmt_money(&e.amount, &cfg.currency),
                    e.due_day.to_string(),
                    if e.is_active { "yes" } else { "no" }.to_string(),
                    e.description.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Category", "Amount", "Due", "Active", "Description"],
                rows
            )
        );
    }
    Ok(())
}

fn decode(r: &Row) -> Result<FixedExpense> {
    let id: i64 = r.get(0)?;
    let amount: String = r.get(2)?;
    let category: String = r.get(3)?;
    let due_day: i64 = r.get(5)?;
    let created: String = r.get(7)?;
    let updated: String = r.get(8)?;
    Ok(FixedExpense {
        id,
        name: r.get(1)?,
        amount: parse_decimal(&amount)
            .with_context(|| format!("Invalid amount in {} #{}", ENTITY, id))?,
        category: category
            .parse()
            .with_context(|| format!("Invalid category in {} #{}", ENTITY, id))?,
        description: r.get(4)?,
        due_day: u8::try_from(due_day)
            .with_context(|| format!("Invalid due day {} in {} #{}", due_day, ENTITY, id))?,
        is_active: r.get(6)?,
        created_at: parse_timestamp(&created)?,
        updated_at: parse_timestamp(&updated)?,
    })
}

pub fn load_all(conn: &Connection) -> Result<Vec<FixedExpense>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM fixed_expenses ORDER BY created_at DESC, id DESC",
        COLUMNS
    ))?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(decode(r)?);
    }
    Ok(data)
}

pub fn get(conn: &Connection, id: i64) -> Result<FixedExpense> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM fixed_expenses WHERE id=?1",
        COLUMNS
    ))?;
    let mut rows = stmt.query(params![id])?;
    if let Some(r) = rows.next()? {
        return decode(r);
    }
    Err(FinanceError::NotFound { entity: ENTITY, id }.into())
}

pub fn insert(conn: &Connection, new: NewFixedExpense) -> Result<FixedExpense> {
    let now = Utc::now();
    let mut e = FixedExpense {
        id: 0,
        name: new.name,
        amount: new.amount,
        category: new.category,
        description: new.description,
        due_day: new.due_day,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    e.validate()?;
    store(conn, &e)?;
    e.id = conn.last_insert_rowid();
    tracing::info!(id = e.id, name = %e.name, "fixed expense added");
    Ok(e)
}

/// Writes a full record as a new row, keeping its timestamps.
pub(crate) fn store(conn: &Connection, e: &FixedExpense) -> Result<()> {
    conn.execute(
        "INSERT INTO fixed_expenses(name, amount, category, description, due_day, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            e.name,
            e.amount.to_string(),
            e.category.as_str(),
            e.description,
            e.due_day,
            e.is_active,
            e.created_at.to_rfc3339(),
            e.updated_at.to_rfc3339()
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, id: i64, patch: FixedExpensePatch) -> Result<FixedExpense> {
    let mut e = get(conn, id)?;
    if let Some(name) = patch.name {
        e.name = name;
    }
    if let Some(amount) = patch.amount {
        e.amount = amount;
    }
    if let Some(category) = patch.category {
        e.category = category;
    }
    if let Some(description) = patch.description {
        e.description = description;
    }
    if let Some(day) = patch.due_day {
        e.due_day = day;
    }
    if let Some(active) = patch.is_active {
        e.is_active = active;
    }
    e.updated_at = Utc::now();
    e.validate()?;
    conn.execute(
        "UPDATE fixed_expenses SET name=?1, amount=?2, category=?3, description=?4, due_day=?5, is_active=?6, updated_at=?7
         WHERE id=?8",
        params![
            e.name,
            e.amount.to_string(),
            e.category.as_str(),
            e.description,
            e.due_day,
            e.is_active,
            e.updated_at.to_rfc3339(),
            id
        ],
    )?;
    tracing::info!(id, "fixed expense updated");
    Ok(e)
}

pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM fixed_expenses WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(FinanceError::NotFound { entity: ENTITY, id }.into());
    }
    tracing::info!(id, "fixed expense removed");
    Ok(())
}
