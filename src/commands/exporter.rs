// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::summary::load_snapshot;
use crate::summary::Snapshot;
use crate::utils::required_arg;
use anyhow::{bail, Result};
use rusqlite::Connection;
use std::path::Path;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required_arg(sub, "format")?.to_lowercase();
    let out = required_arg(sub, "out")?;
    let snapshot = load_snapshot(conn)?;
    match fmt.as_str() {
        "json" => write_json(&snapshot, Path::new(out))?,
        "csv" => write_csv(&snapshot, Path::new(out))?,
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    tracing::info!(records = snapshot.record_count(), out = %out, "export written");
    println!("Exported {} records to {}", snapshot.record_count(), out);
    Ok(())
}

pub fn write_json(snapshot: &Snapshot, out: &Path) -> Result<()> {
    std::fs::write(out, serde_json::to_string_pretty(snapshot)?)?;
    Ok(())
}

const LEDGER_HEADER: [&str; 10] = [
    "kind",
    "id",
    "name",
    "amount",
    "initial_amount",
    "class",
    "date",
    "due_day",
    "active",
    "description",
];

/// One flat row per record; `class` holds the category or type and
/// `due_day` is only set for fixed expenses.
pub fn write_csv(snapshot: &Snapshot, out: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(out)?;
    wtr.write_record(LEDGER_HEADER)?;
    if let Some(s) = &snapshot.salary {
        wtr.write_record([
            "salary".to_string(),
            String::new(),
            s.description.clone(),
            s.amount.to_string(),
            String::new(),
            "salary".to_string(),
            s.updated_at.date_naive().to_string(),
            String::new(),
            "true".to_string(),
            String::new(),
        ])?;
    }
    for i in &snapshot.fixed_incomes {
        wtr.write_record([
            "fixed_income".to_string(),
            i.id.to_string(),
            i.name.clone(),
            i.amount.to_string(),
            String::new(),
            i.kind.as_str().to_string(),
            String::new(),
            String::new(),
            i.is_active.to_string(),
            i.description.clone().unwrap_or_default(),
        ])?;
    }
    for i in &snapshot.variable_incomes {
        wtr.write_record([
            "variable_income".to_string(),
            i.id.to_string(),
            i.name.clone(),
            i.amount.to_string(),
            String::new(),
            i.kind.as_str().to_string(),
            i.date.to_string(),
            String::new(),
            String::new(),
            i.description.clone().unwrap_or_default(),
        ])?;
    }
    for inv in &snapshot.investments {
        wtr.write_record([
            "investment".to_string(),
            inv.id.to_string(),
            inv.name.clone(),
            inv.current_amount.to_string(),
            inv.initial_amount.to_string(),
            inv.kind.as_str().to_string(),
            inv.purchase_date.to_string(),
            String::new(),
            inv.is_active.to_string(),
            inv.description.clone().unwrap_or_default(),
        ])?;
    }
    for e in &snapshot.fixed_expenses {
        wtr.write_record([
            "fixed_expense".to_string(),
            e.id.to_string(),
            e.name.clone(),
            e.amount.to_string(),
            String::new(),
            e.category.as_str().to_string(),
            String::new(),
            e.due_day.to_string(),
            e.is_active.to_string(),
            e.description.clone().unwrap_or_default(),
        ])?;
    }
    for e in &snapshot.variable_expenses {
        wtr.write_record([
            "variable_expense".to_string(),
            e.id.to_string(),
            e.name.clone(),
            e.amount.to_string(),
            String::new(),
            e.category.as_str().to_string(),
            e.date.to_string(),
            String::new(),
            String::new(),
            e.description.clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
