// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{ExpenseCategory, IncomeType, InvestmentType, MAX_AMOUNT};
use crate::utils::pretty_table;
use anyhow::Result;
use chrono::{DateTime, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: &'static str,
    pub detail: String,
}

pub fn handle(conn: &Connection) -> Result<()> {
    let issues = find_issues(conn)?;
    if issues.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = issues
            .into_iter()
            .map(|i| vec![i.kind.to_string(), i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Scans stored rows for values the typed loaders would reject.
pub fn find_issues(conn: &Connection) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    // (table, amount columns, class column, allowed classes, date column)
    let expense_keys: Vec<&str> = ExpenseCategory::ALL.iter().map(|c| c.as_str()).collect();
    let fixed_income_keys: Vec<&str> = IncomeType::ALL
        .iter()
        .filter(|t| t.is_fixed_kind())
        .map(|t| t.as_str())
        .collect();
    let variable_income_keys: Vec<&str> = IncomeType::ALL
        .iter()
        .filter(|t| t.is_variable_kind())
        .map(|t| t.as_str())
        .collect();
    let investment_keys: Vec<&str> = InvestmentType::ALL.iter().map(|t| t.as_str()).collect();

    let tables: [(&str, &[&str], &str, &[&str], Option<&str>); 5] = [
        ("fixed_incomes", &["amount"], "type", &fixed_income_keys, None),
        (
            "variable_incomes",
            &["amount"],
            "type",
            &variable_income_keys,
            Some("date"),
        ),
        (
            "investments",
            &["initial_amount", "current_amount"],
            "type",
            &investment_keys,
            Some("purchase_date"),
        ),
        ("fixed_expenses", &["amount"], "category", &expense_keys, None),
        (
            "variable_expenses",
            &["amount"],
            "category",
            &expense_keys,
            Some("date"),
        ),
    ];

    for (table, amount_cols, class_col, allowed, date_col) in tables {
        let mut cols = vec!["id".to_string(), class_col.to_string(), "created_at".to_string()];
        cols.extend(amount_cols.iter().map(|c| c.to_string()));
        if let Some(d) = date_col {
            cols.push(d.to_string());
        }
        let sql = format!("SELECT {} FROM {}", cols.join(", "), table);
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        while let Some(r) = rows.next()? {
            let id: i64 = r.get(0)?;
            let class: String = r.get(1)?;
            let created: String = r.get(2)?;
            if !allowed.contains(&class.as_str()) {
                issues.push(Issue {
                    kind: "unknown_class",
                    detail: format!("{} #{}: {} '{}'", table, id, class_col, class),
                });
            }
            if DateTime::parse_from_rfc3339(&created).is_err() {
                issues.push(Issue {
                    kind: "bad_timestamp",
                    detail: format!("{} #{}: created_at '{}'", table, id, created),
                });
            }
            for (offset, col) in amount_cols.iter().enumerate() {
                let raw: String = r.get(3 + offset)?;
                match raw.trim().parse::<Decimal>() {
                    Ok(d) if d < Decimal::ZERO => issues.push(Issue {
                        kind: "negative_amount",
                        detail: format!("{} #{}: {} {}", table, id, col, d),
                    }),
                    Ok(d) if d > MAX_AMOUNT => issues.push(Issue {
                        kind: "amount_too_large",
                        detail: format!("{} #{}: {} {}", table, id, col, d),
                    }),
                    Ok(_) => {}
                    Err(_) => issues.push(Issue {
                        kind: "bad_amount",
                        detail: format!("{} #{}: {} '{}'", table, id, col, raw),
                    }),
                }
            }
            if let Some(d) = date_col {
                let raw: String = r.get(3 + amount_cols.len())?;
                if NaiveDate::parse_from_str(&raw, "%Y-%m-%d").is_err() {
                    issues.push(Issue {
                        kind: "bad_date",
                        detail: format!("{} #{}: {} '{}'", table, id, d, raw),
                    });
                }
            }
        }
    }

    let mut stmt = conn.prepare("SELECT id, due_day FROM fixed_expenses")?;
    let mut rows = stmt.query([])?;
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let day: i64 = r.get(1)?;
        if !(1..=31).contains(&day) {
            issues.push(Issue {
                kind: "due_day_out_of_range",
                detail: format!("fixed_expenses #{}: due_day {}", id, day),
            });
        }
    }

    for issue in &issues {
        tracing::warn!(kind = issue.kind, detail = %issue.detail, "doctor finding");
    }
    Ok(issues)
}
