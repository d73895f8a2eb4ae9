// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{
    fixed_expenses, fixed_incomes, investments, salary, variable_expenses, variable_incomes,
};
use crate::config::Config;
use crate::summary::{summarize_for, FinancialSummary, Period, Snapshot};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

/// Reads every collection into memory.
pub fn load_snapshot(conn: &Connection) -> Result<Snapshot> {
    let snapshot = Snapshot {
        salary: salary::get(conn)?,
        fixed_incomes: fixed_incomes::load_all(conn)?,
        variable_incomes: variable_incomes::load_all(conn)?,
        investments: investments::load_all(conn)?,
        fixed_expenses: fixed_expenses::load_all(conn)?,
        variable_expenses: variable_expenses::load_all(conn)?,
    };
    tracing::debug!(records = snapshot.record_count(), "snapshot loaded");
    Ok(snapshot)
}

#[derive(Serialize)]
struct SummaryReport<'a> {
    period: String,
    #[serde(flatten)]
    summary: &'a FinancialSummary,
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches, cfg: &Config) -> Result<()> {
    let snapshot = load_snapshot(conn)?;
    let period = Period::current();
    let s = summarize_for(&snapshot, period);
    let report = SummaryReport {
        period: period.to_string(),
        summary: &s,
    };
    if maybe_print_json(sub.get_flag("json"), false, &report)? {
        return Ok(());
    }
    print_report(&s, period, &cfg.currency);
    Ok(())
}

fn print_report(s: &FinancialSummary, period: Period, ccy: &str) {
    let money = |d: &Decimal| fmt_money(d, ccy);
    println!("Summary for {}", period);
    println!(
        "{}",
        pretty_table(
            &["Metric", "Value"],
            vec![
                vec!["Total income".into(), money(&s.total_income)],
                vec!["  fixed".into(), money(&s.total_fixed_income)],
                vec!["  variable (this month)".into(), money(&s.total_variable_income)],
                vec!["Total expenses".into(), money(&s.total_expenses)],
                vec!["  fixed".into(), money(&s.total_fixed_expenses)],
                vec!["  variable (this month)".into(), money(&s.total_variable_expenses)],
                vec!["Remaining balance".into(), money(&s.remaining_balance)],
                vec!["Invested (current)".into(), money(&s.total_investment_value)],
                vec![
                    "Investment performance".into(),
                    format!("{:.2}%", s.investment_performance.round_dp(2)),
                ],
            ],
        )
    );

    let cats = s
        .expenses_by_category
        .iter()
        .map(|(c, v)| vec![c.label().to_string(), money(v)])
        .collect();
    println!("{}", pretty_table(&["Category", "Spent"], cats));

    let types = s
        .income_by_type
        .iter()
        .map(|(t, v)| vec![t.label().to_string(), money(v)])
        .collect();
    println!("{}", pretty_table(&["Income type", "Received"], types));
}
