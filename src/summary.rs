// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Live financial summary over a snapshot of every collection.
//!
//! Fixed records (incomes, expenses, investments) count while active.
//! Variable records count only when dated inside the current calendar month.

use crate::models::{
    percent_change, ExpenseCategory, FixedExpense, FixedIncome, IncomeType, Investment, Salary,
    VariableExpense, VariableIncome,
};
use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// The month of the local wall clock.
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn containing(date: NaiveDate) -> Self {
        Period {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub salary: Option<Salary>,
    #[serde(default)]
    pub fixed_incomes: Vec<FixedIncome>,
    #[serde(default)]
    pub variable_incomes: Vec<VariableIncome>,
    #[serde(default)]
    pub investments: Vec<Investment>,
    #[serde(default)]
    pub fixed_expenses: Vec<FixedExpense>,
    #[serde(default)]
    pub variable_expenses: Vec<VariableExpense>,
}

impl Snapshot {
    pub fn record_count(&self) -> usize {
        usize::from(self.salary.is_some())
            + self.fixed_incomes.len()
            + self.variable_incomes.len()
            + self.investments.len()
            + self.fixed_expenses.len()
            + self.variable_expenses.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_income: Decimal,
    pub total_fixed_income: Decimal,
    pub total_variable_income: Decimal,
    pub total_investment_value: Decimal,
    pub total_fixed_expenses: Decimal,
    pub total_variable_expenses: Decimal,
    pub total_expenses: Decimal,
    pub remaining_balance: Decimal,
    /// Percent, may be negative.
    pub investment_performance: Decimal,
    pub expenses_by_category: BTreeMap<ExpenseCategory, Decimal>,
    pub income_by_type: BTreeMap<IncomeType, Decimal>,
}

/// Saturating sum; store validation keeps real data far below the bound.
fn total(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

/// Summary for the month the clock is in right now.
pub fn summary(snapshot: &Snapshot) -> FinancialSummary {
    summarize_for(snapshot, Period::current())
}

pub fn summarize_for(snapshot: &Snapshot, period: Period) -> FinancialSummary {
    let salary = snapshot
        .salary
        .as_ref()
        .map(|s| s.amount)
        .unwrap_or(Decimal::ZERO);

    let fixed_incomes: Vec<&FixedIncome> =
        snapshot.fixed_incomes.iter().filter(|i| i.is_active).collect();
    let variable_incomes: Vec<&VariableIncome> = snapshot
        .variable_incomes
        .iter()
        .filter(|i| period.contains(i.date))
        .collect();
    let investments: Vec<&Investment> =
        snapshot.investments.iter().filter(|i| i.is_active).collect();
    let fixed_expenses: Vec<&FixedExpense> =
        snapshot.fixed_expenses.iter().filter(|e| e.is_active).collect();
    let variable_expenses: Vec<&VariableExpense> = snapshot
        .variable_expenses
        .iter()
        .filter(|e| period.contains(e.date))
        .collect();

    let total_fixed_income = total(fixed_incomes.iter().map(|i| i.amount));
    let total_variable_income = total(variable_incomes.iter().map(|i| i.amount));
    let total_investment_value = total(investments.iter().map(|i| i.current_amount));
    let total_fixed_expenses = total(fixed_expenses.iter().map(|e| e.amount));
    let total_variable_expenses = total(variable_expenses.iter().map(|e| e.amount));

    let total_income = total([salary, total_fixed_income, total_variable_income]);
    let total_expenses = total_fixed_expenses.saturating_add(total_variable_expenses);

    let mut expenses_by_category: BTreeMap<ExpenseCategory, Decimal> = ExpenseCategory::ALL
        .into_iter()
        .map(|c| (c, Decimal::ZERO))
        .collect();
    let expense_rows = fixed_expenses
        .iter()
        .map(|e| (e.category, e.amount))
        .chain(variable_expenses.iter().map(|e| (e.category, e.amount)));
    for (category, amount) in expense_rows {
        let slot = expenses_by_category.entry(category).or_insert(Decimal::ZERO);
        *slot = slot.saturating_add(amount);
    }

    let mut income_by_type: BTreeMap<IncomeType, Decimal> = IncomeType::ALL
        .into_iter()
        .map(|t| (t, Decimal::ZERO))
        .collect();
    income_by_type.insert(IncomeType::Salary, salary);
    let income_rows = fixed_incomes
        .iter()
        .map(|i| (i.kind, i.amount))
        .chain(variable_incomes.iter().map(|i| (i.kind, i.amount)));
    for (kind, amount) in income_rows {
        let slot = income_by_type.entry(kind).or_insert(Decimal::ZERO);
        *slot = slot.saturating_add(amount);
    }

    let initial_total = total(investments.iter().map(|i| i.initial_amount));

    FinancialSummary {
        total_income,
        total_fixed_income,
        total_variable_income,
        total_investment_value,
        total_fixed_expenses,
        total_variable_expenses,
        total_expenses,
        remaining_balance: total_income.saturating_sub(total_expenses),
        investment_performance: percent_change(initial_total, total_investment_value),
        expenses_by_category,
        income_by_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvestmentType;
    use chrono::{Duration, Utc};

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    const MARCH: Period = Period {
        year: 2025,
        month: 3,
    };

    fn fixed_income(amount: &str, kind: IncomeType, active: bool) -> FixedIncome {
        FixedIncome {
            id: 0,
            name: "Job".into(),
            amount: d(amount),
            kind,
            description: None,
            is_active: active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn variable_income(amount: &str, kind: IncomeType, date: NaiveDate) -> VariableIncome {
        VariableIncome {
            id: 0,
            name: "Gig".into(),
            amount: d(amount),
            kind,
            description: None,
            date,
            created_at: Utc::now(),
        }
    }

    fn fixed_expense(amount: &str, category: ExpenseCategory, active: bool) -> FixedExpense {
        FixedExpense {
            id: 0,
            name: "Rent".into(),
            amount: d(amount),
            category,
            description: None,
            due_day: 5,
            is_active: active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn variable_expense(amount: &str, category: ExpenseCategory, date: NaiveDate) -> VariableExpense {
        VariableExpense {
            id: 0,
            name: "Market".into(),
            amount: d(amount),
            category,
            description: None,
            date,
            created_at: Utc::now(),
        }
    }

    fn investment(initial: &str, current: &str, active: bool) -> Investment {
        Investment {
            id: 0,
            name: "Index fund".into(),
            kind: InvestmentType::Funds,
            initial_amount: d(initial),
            current_amount: d(current),
            purchase_date: day("2024-01-10"),
            description: None,
            is_active: active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn mixed_snapshot() -> Snapshot {
        Snapshot {
            salary: Some(Salary {
                amount: d("1000.10"),
                description: "Legacy".into(),
                updated_at: Utc::now(),
            }),
            fixed_incomes: vec![
                fixed_income("5000", IncomeType::Salary, true),
                fixed_income("250.25", IncomeType::Other, true),
                fixed_income("999", IncomeType::Other, false),
            ],
            variable_incomes: vec![
                variable_income("800", IncomeType::Freelance, day("2025-03-15")),
                variable_income("120.5", IncomeType::Investment, day("2025-03-01")),
                variable_income("300", IncomeType::Business, day("2025-02-28")),
                variable_income("300", IncomeType::Business, day("2024-03-15")),
            ],
            investments: vec![
                investment("1000", "1100", true),
                investment("500", "450", true),
                investment("10000", "1", false),
            ],
            fixed_expenses: vec![
                fixed_expense("1200", ExpenseCategory::Moradia, true),
                fixed_expense("89.90", ExpenseCategory::Educacao, true),
                fixed_expense("400", ExpenseCategory::Lazer, false),
            ],
            variable_expenses: vec![
                variable_expense("300", ExpenseCategory::Alimentacao, day("2025-03-31")),
                variable_expense("45.67", ExpenseCategory::Transporte, day("2025-03-02")),
                variable_expense("12.01", ExpenseCategory::Moradia, day("2025-03-20")),
                variable_expense("70", ExpenseCategory::Saude, day("2025-04-01")),
            ],
        }
    }

    #[test]
    fn rent_salary_and_groceries_scenario() {
        let snap = Snapshot {
            salary: None,
            fixed_incomes: vec![fixed_income("5000", IncomeType::Salary, true)],
            fixed_expenses: vec![fixed_expense("1200", ExpenseCategory::Moradia, true)],
            variable_expenses: vec![variable_expense(
                "300",
                ExpenseCategory::Alimentacao,
                day("2025-03-10"),
            )],
            ..Default::default()
        };
        let s = summarize_for(&snap, MARCH);
        assert_eq!(s.total_income, d("5000"));
        assert_eq!(s.total_fixed_expenses, d("1200"));
        assert_eq!(s.total_variable_expenses, d("300"));
        assert_eq!(s.total_expenses, d("1500"));
        assert_eq!(s.remaining_balance, d("3500"));
        for (cat, amt) in &s.expenses_by_category {
            match cat {
                ExpenseCategory::Moradia => assert_eq!(*amt, d("1200")),
                ExpenseCategory::Alimentacao => assert_eq!(*amt, d("300")),
                _ => assert!(amt.is_zero(), "{} should be zero", cat),
            }
        }
        assert_eq!(s.expenses_by_category.len(), 7);
    }

    #[test]
    fn totals_are_consistent() {
        let s = summarize_for(&mixed_snapshot(), MARCH);
        assert_eq!(s.total_expenses, s.total_fixed_expenses + s.total_variable_expenses);
        assert_eq!(s.remaining_balance, s.total_income - s.total_expenses);
        let by_cat: Decimal = s.expenses_by_category.values().copied().sum();
        assert_eq!(by_cat, s.total_expenses);
        let by_type: Decimal = s.income_by_type.values().copied().sum();
        assert_eq!(by_type, s.total_income);
    }

    #[test]
    fn mixed_snapshot_values() {
        let s = summarize_for(&mixed_snapshot(), MARCH);
        assert_eq!(s.total_fixed_income, d("5250.25"));
        assert_eq!(s.total_variable_income, d("920.5"));
        assert_eq!(s.total_income, d("7170.85"));
        assert_eq!(s.total_fixed_expenses, d("1289.90"));
        assert_eq!(s.total_variable_expenses, d("357.68"));
        assert_eq!(s.remaining_balance, d("5523.27"));
        assert_eq!(s.income_by_type[&IncomeType::Salary], d("6000.10"));
        assert_eq!(s.income_by_type[&IncomeType::Business], Decimal::ZERO);
        assert_eq!(s.expenses_by_category[&ExpenseCategory::Moradia], d("1212.01"));
        assert_eq!(s.expenses_by_category[&ExpenseCategory::Lazer], Decimal::ZERO);
        assert_eq!(s.expenses_by_category[&ExpenseCategory::Saude], Decimal::ZERO);
        assert_eq!(s.total_investment_value, d("1550"));
        // (1550 - 1500) / 1500 * 100
        assert_eq!(s.investment_performance.round_dp(4), d("3.3333"));
    }

    #[test]
    fn recomputation_is_idempotent() {
        let snap = mixed_snapshot();
        assert_eq!(summarize_for(&snap, MARCH), summarize_for(&snap, MARCH));
    }

    #[test]
    fn inactive_fixed_records_contribute_nothing() {
        let snap = Snapshot {
            fixed_incomes: vec![fixed_income("7000", IncomeType::Salary, false)],
            fixed_expenses: vec![fixed_expense("900", ExpenseCategory::Moradia, false)],
            investments: vec![investment("100", "300", false)],
            ..Default::default()
        };
        let s = summarize_for(&snap, MARCH);
        assert!(s.total_income.is_zero());
        assert!(s.total_expenses.is_zero());
        assert!(s.total_investment_value.is_zero());
        assert!(s.investment_performance.is_zero());
    }

    #[test]
    fn previous_month_boundary_is_a_hard_cutoff() {
        let snap = Snapshot {
            variable_incomes: vec![variable_income(
                "450",
                IncomeType::Freelance,
                day("2025-02-28"),
            )],
            variable_expenses: vec![variable_expense(
                "20",
                ExpenseCategory::Lazer,
                day("2025-02-28"),
            )],
            ..Default::default()
        };
        let s = summarize_for(&snap, MARCH);
        assert!(s.total_variable_income.is_zero());
        assert!(s.total_variable_expenses.is_zero());
    }

    #[test]
    fn same_month_other_year_is_excluded() {
        let snap = Snapshot {
            variable_expenses: vec![variable_expense(
                "20",
                ExpenseCategory::Lazer,
                day("2024-03-10"),
            )],
            ..Default::default()
        };
        assert!(summarize_for(&snap, MARCH).total_expenses.is_zero());
    }

    #[test]
    fn live_summary_excludes_last_day_of_previous_month() {
        let today = Local::now().date_naive();
        let first = today.with_day(1).unwrap();
        let yesterday_of_period = first - Duration::days(1);
        let snap = Snapshot {
            variable_incomes: vec![
                variable_income("100", IncomeType::Other, yesterday_of_period),
                variable_income("40", IncomeType::Other, first),
            ],
            ..Default::default()
        };
        let s = summary(&snap);
        assert_eq!(s.total_variable_income, d("40"));
    }

    #[test]
    fn investment_performance_percentage() {
        let snap = Snapshot {
            investments: vec![investment("1000", "1200", true)],
            ..Default::default()
        };
        assert_eq!(summarize_for(&snap, MARCH).investment_performance, d("20.00"));
    }

    #[test]
    fn investment_performance_zero_initial_guard() {
        let snap = Snapshot {
            investments: vec![investment("0", "500", true), investment("800", "900", false)],
            ..Default::default()
        };
        let s = summarize_for(&snap, MARCH);
        assert_eq!(s.total_investment_value, d("500"));
        assert_eq!(s.investment_performance, Decimal::ZERO);
    }

    #[test]
    fn empty_snapshot_is_all_zero() {
        let s = summarize_for(&Snapshot::default(), MARCH);
        assert!(s.total_income.is_zero());
        assert!(s.remaining_balance.is_zero());
        assert!(s.income_by_type.values().all(|v| v.is_zero()));
        assert_eq!(s.income_by_type.len(), 5);
    }

    #[test]
    fn balance_may_go_negative() {
        let snap = Snapshot {
            fixed_incomes: vec![fixed_income("100", IncomeType::Other, true)],
            fixed_expenses: vec![fixed_expense("250", ExpenseCategory::Outros, true)],
            ..Default::default()
        };
        assert_eq!(summarize_for(&snap, MARCH).remaining_balance, d("-150"));
    }

    #[test]
    fn oversized_values_saturate_instead_of_panicking() {
        let huge = Decimal::from_scientific("5e28").unwrap();
        let mut a = fixed_income("0", IncomeType::Salary, true);
        a.amount = huge;
        let mut b = fixed_income("0", IncomeType::Other, true);
        b.amount = huge;
        let snap = Snapshot {
            fixed_incomes: vec![a, b],
            investments: vec![investment("0.00000000000000000001", "100000000000", true)],
            ..Default::default()
        };
        let s = summarize_for(&snap, MARCH);
        assert_eq!(s.total_fixed_income, Decimal::MAX);
        assert_eq!(s.total_income, Decimal::MAX);
        assert_eq!(s.remaining_balance, Decimal::MAX);
        assert_eq!(s.investment_performance, Decimal::MAX);
    }
}
