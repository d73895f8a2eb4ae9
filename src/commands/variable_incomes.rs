// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::error::FinanceError;
use crate::models::{IncomeType, VariableIncome};
use crate::summary::Period;
use crate::utils::{
    fmt_money, maybe_print_json, optional_text, patch_text, parse_amount, parse_date, parse_decimal,
    parse_month, parse_timestamp, pretty_table, required_arg,
};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;

const ENTITY: &str = "variable income";
const COLUMNS: &str = "id, name, amount, type, description, date, created_at";

#[derive(Debug, Clone)]
pub struct NewVariableIncome {
    pub name: String,
    pub amount: Decimal,
    pub kind: IncomeType,
    pub description: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct VariableIncomePatch {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub kind: Option<IncomeType>,
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
            let new = NewVariableIncome {
                name: required_arg(sub, "name")?.trim().to_string(),
                amount: parse_amount("amount", required_arg(sub, "amount")?)?,
                kind: IncomeType::parse_variable(required_arg(sub, "type")?)?,
                description: optional_text(sub, "description"),
                date,
            };
            let i = insert(conn, new)?;
            println!(
                "Recorded variable income #{} '{}' {} on {}",
                i.id,
                i.name,
                fmt_money(&i.amount, &cfg.currency),
                i.date
            );
        }
        Some(("list", sub)) => list(conn, sub, cfg)?,
        Some(("update", sub)) => {
            let id = *sub.get_one::<i64>("id").context("Missing --id")?;
            let patch = VariableIncomePatch {
                name: optional_text(sub, "name"),
                amount: sub
                    .get_one::<String>("amount")
                    .map(|s| parse_amount("amount", s))
                    .transpose()?,
                kind: sub
                    .get_one::<String>("type")
                    .map(|s| IncomeType::parse_variable(s))
                    .transpose()?,
                description: patch_text(sub, "description"),
                date: sub
                    .get_one::<String>("date")
                    .map(|s| parse_date(s))
                    .transpose()?,
            };
            let i = update(conn, id, patch)?;
            println!("Updated variable income #{} '{}'", i.id, i.name);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").context("Missing --id")?;
            delete(conn, id)?;
            println!("Removed variable income #{}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<VariableIncome>> {
    let mut data = load_all(conn)?;
    if let Some(month) = sub.get_one::<String>("month") {
        let (year, month) = parse_month(month)?;
        let period = Period { year, month };
        data.retain(|i| period.contains(i.date));
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches, cfg: &Config) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|i| {
                vec![
                    i.id.to_string(),
                    i.date.to_string(),
                    i.name.clone(),
                    i.kind.label().to_string(),
                    fmt_money(&i.amount, &cfg.currency),
                    i.description.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Name", "Type", "Amount", "Description"], rows)
        );
    }
    Ok(())
}

fn decode(r: &Row) -> Result<VariableIncome> {
    let id: i64 = r.get(0)?;
    let amount: String = r.get(2)?;
    let kind: String = r.get(3)?;
    let date: String = r.get(5)?;
    let created: String = r.get(6)?;
    Ok(VariableIncome {
        id,
        name: r.get(1)?,
        amount: parse_decimal(&amount)
            .with_context(|| format!("Invalid amount in {} #{}", ENTITY, id))?,
        kind: IncomeType::parse_variable(&kind)
            .with_context(|| format!("Invalid type in {} #{}", ENTITY, id))?,
        description: r.get(4)?,
        date: parse_date(&date)?,
        created_at: parse_timestamp(&created)?,
    })
}

pub fn load_all(conn: &Connection) -> Result<Vec<VariableIncome>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM variable_incomes ORDER BY date DESC, id DESC",
        COLUMNS
    ))?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(decode(r)?);
    }
    Ok(data)
}

pub fn get(conn: &Connection, id: i64) -> Result<VariableIncome> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM variable_incomes WHERE id=?1",
        COLUMNS
    ))?;
    let mut rows = stmt.query(params![id])?;
    if let Some(r) = rows.next()? {
        return decode(r);
    }
    Err(FinanceError::NotFound { entity: ENTITY, id }.into())
}

pub fn insert(conn: &Connection, new: NewVariableIncome) -> Result<VariableIncome> {
    let mut i = VariableIncome {
        id: 0,
        name: new.name,
        amount: new.amount,
        kind: new.kind,
        description: new.description,
        date: new.date,
        created_at: Utc::now(),
    };
    i.validate()?;
    store(conn, &i)?;
    i.id = conn.last_insert_rowid();
    tracing::info!(id = i.id, name = %i.name, date = %i.date, "variable income recorded");
    Ok(i)
}

pub(crate) fn store(conn: &Connection, i: &VariableIncome) -> Result<()> {
    conn.execute(
        "INSERT INTO variable_incomes(name, amount, type, description, date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            i.name,
            i.amount.to_string(),
            i.kind.as_str(),
            i.description,
            i.date.to_string(),
            i.created_at.to_rfc3339()
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, id: i64, patch: VariableIncomePatch) -> Result<VariableIncome> {
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
    if let Some(date) = patch.date {
        i.date = date;
    }
    i.validate()?;
    conn.execute(
        "UPDATE variable_incomes SET name=?1, amount=?2, type=?3, description=?4, date=?5 WHERE id=?6",
        params![
            i.name,
            i.amount.to_string(),
            i.kind.as_str(),
            i.description,
            i.date.to_string(),
            id
        ],
    )?;
    tracing::info!(id, "variable income updated");
    Ok(i)
}

pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM variable_incomes WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(FinanceError::NotFound { entity: ENTITY, id }.into());
    }
    tracing::info!(id, "variable income removed");
    Ok(())
}
