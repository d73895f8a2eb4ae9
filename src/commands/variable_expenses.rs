// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::error::FinanceError;
use crate::models::{ExpenseCategory, VariableExpense};
use crate::summary::Period;
use crate::utils::{
    fmt_money, maybe_print_json, optional_text, patch_text, parse_amount, parse_date, parse_decimal,
    parse_month, parse_timestamp, pretty_table, required_arg,
};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;

const ENTITY: &str = "variable expense";
const COLUMNS: &str = "id, name, amount, category, description, date, created_at";

#[derive(Debug, Clone)]
pub struct NewVariableExpense {
    pub name: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub description: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct VariableExpensePatch {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub category: Option<ExpenseCategory>,
    pub description: Option<Option<String>>,
    pub date: Option<NaiveDate>,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches, cfg: &Config) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let date = match sub.get_one::<String>("date") {
                Some(d) => parse_date(d)?,
                None => chrono::Local::now().date_naive(),
            };
            let new = NewVariableExpense {
                name: required_arg(sub, "name")?.trim().to_string(),
                amount: parse_amount("amount", required_arg(sub, "amount")?)?,
                category: required_arg(sub, "category")?.parse()?,
                description: optional_text(sub, "description"),
                date,
            };
            let e = insert(conn, new)?;
            println!(
                "Recorded variable expense #{} '{}' {} on {}",
                e.id,
                e.name,
                fmt_money(&e.amount, &cfg.currency),
                e.date
            );
        }
        Some(("list", sub)) => list(conn, sub, cfg)?,
        Some(("update", sub)) => {
            let id = *sub.get_one::<i64>("id").context("Missing --id")?;
            let patch = VariableExpensePatch {
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
                date: sub
                    .get_one::<String>("date")
                    .map(|s| parse_date(s))
                    .transpose()?,
            };
            let e = update(conn, id, patch)?;
            println!("Updated variable expense #{} '{}'", e.id, e.name);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("Missing --id")?;
            delete(conn, id)?;
            println!("Removed variable expense #{}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Rows for `list`, narrowed to `--month` when given.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<VariableExpense>> {
    let mut data = load_all(conn)?;
    if let Some(month) = sub.get_one::<String>("month") {
        let (year, month) = parse_month(month)?;
        let period = Period { year, month };
        data.retain(|e| period.contains(e.date));
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches, cfg: &Config) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.date.to_string(),
                    e.name.clone(),
                    e.category.label().to_string(),
                    fmt_money(&e.amount, &cfg.currency),
                    e.description.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Name", "Category", "Amount", "Description"],
                rows
            )
        );
    }
    Ok(())
}

fn decode(r: &Row) -> Result<VariableExpense> {
    let id: i64 = r.get(0)?;
    let amount: String = r.get(2)?;
    let category: String = r.get(3)?;
    let date: String = r.get(5)?;
    let created: String = r.get(6)?;
    Ok(VariableExpense {
        id,
        name: r.get(1)?,
        amount: parse_decimal(&amount)
            .with_context(|| format!("Invalid amount in {} #{}", ENTITY, id))?,
        category: category
            .parse()
            .with_context(|| format!("Invalid category in {} #{}", ENTITY, id))?,
        description: r.get(4)?,
        date: parse_date(&date)?,
        created_at: parse_timestamp(&created)?,
    })
}

pub fn load_all(conn: &Connection) -> Result<Vec<VariableExpense>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM variable_expenses ORDER BY date DESC, id DESC",
        COLUMNS
    ))?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(decode(r)?);
    }
    Ok(data)
}

pub fn get(conn: &Connection, id: i64) -> Result<VariableExpense> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM variable_expenses WHERE id=?1",
        COLUMNS
    ))?;
    let mut rows = stmt.query(params![id])?;
    if let Some(r) = rows.next()? {
        return decode(r);
    }
    Err(FinanceError::NotFound { entity: ENTITY, id }.into())
}

pub fn insert(conn: &Connection, new: NewVariableExpense) -> Result<VariableExpense> {
    let mut e = VariableExpense {
        id: 0,
        name: new.name,
        amount: new.amount,
        category: new.category,
        description: new.description,
        date: new.date,
        created_at: Utc::now(),
    };
    e.validate()?;
    store(conn, &e)?;
    e.id = conn.last_insert_rowid();
    tracing::info!(id = e.id, name = %e.name, date = %e.date, "variable expense recorded");
    Ok(e)
}

pub(crate) fn store(conn: &Connection, e: &VariableExpense) -> Result<()> {
    conn.execute(
        "INSERT INTO variable_expenses(name, amount, category, description, date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            e.name,
            e.amount.to_string(),
            e.category.as_str(),
            e.description,
            e.date.to_string(),
            e.created_at.to_rfc3339()
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, id: i64, patch: VariableExpensePatch) -> Result<VariableExpense> {
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
    if let Some(date) = patch.date {
        e.date = date;
    }
    e.validate()?;
    conn.execute(
        "UPDATE variable_expenses SET name=?1, amount=?2, category=?3, description=?4, date=?5 WHERE id=?6",
        params![
            e.name,
            e.amount.to_string(),
            e.category.as_str(),
            e.description,
            e.date.to_string(),
            id
        ],
    )?;
    tracing::info!(id, "variable expense updated");
    Ok(e)
}

pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM variable_expenses WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(FinanceError::NotFound { entity: ENTITY, id }.into());
    }
    tracing::info!(id, "variable expense removed");
    Ok(())
}
