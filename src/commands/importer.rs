// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{
    fixed_expenses, fixed_incomes, investments, salary, variable_expenses, variable_incomes,
};
use crate::summary::Snapshot;
use crate::utils::required_arg;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

pub fn handle(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = required_arg(sub, "path")?.trim();
    let snapshot = read_snapshot(Path::new(path))?;
    let n = import_snapshot(conn, &snapshot)?;
    println!("Imported {} records from {}", n, path);
    Ok(())
}

/// Reads a snapshot file, either our own export or the browser app's saved data.
pub fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Open snapshot {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Parse snapshot {}", path.display()))
}

/// Inserts every record under fresh ids, all or nothing. An existing salary
/// is replaced by the imported one.
pub fn import_snapshot(conn: &mut Connection, snapshot: &Snapshot) -> Result<usize> {
    let tx = conn.transaction()?;
    if let Some(s) = &snapshot.salary {
        salary::store(&tx, s).context("Invalid salary")?;
    }
    for i in &snapshot.fixed_incomes {
        i.validate()
            .with_context(|| format!("Invalid fixed income '{}'", i.name))?;
        fixed_incomes::store(&tx, i)?;
    }
    for i in &snapshot.variable_incomes {
        i.validate()
            .with_context(|| format!("Invalid variable income '{}'", i.name))?;
        variable_incomes::store(&tx, i)?;
    }
    for inv in &snapshot.investments {
        inv.validate()
            .with_context(|| format!("Invalid investment '{}'", inv.name))?;
        investments::store(&tx, inv)?;
    }
    for e in &snapshot.fixed_expenses {
        e.validate()
            .with_context(|| format!("Invalid fixed expense '{}'", e.name))?;
        fixed_expenses::store(&tx, e)?;
    }
    for e in &snapshot.variable_expenses {
        e.validate()
            .with_context(|| format!("Invalid variable expense '{}'", e.name))?;
        variable_expenses::store(&tx, e)?;
    }
    tx.commit()?;
    let n = snapshot.record_count();
    tracing::info!(records = n, "snapshot imported");
    Ok(n)
}
