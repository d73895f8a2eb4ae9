// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketbook::commands::{
    fixed_incomes::{self, FixedIncomePatch, NewFixedIncome},
    salary,
    variable_incomes::{self, NewVariableIncome, VariableIncomePatch},
};
use pocketbook::error::FinanceError;
use pocketbook::models::IncomeType;
use pocketbook::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn gig(name: &str, amount: &str, date: &str) -> NewVariableIncome {
    NewVariableIncome {
        name: name.into(),
        amount: amount.parse().unwrap(),
        kind: IncomeType::Freelance,
        description: None,
        date: day(date),
    }
}

#[test]
fn fixed_income_rejects_variable_only_type() {
    let conn = setup();
    let err = fixed_incomes::insert(
        &conn,
        NewFixedIncome {
            name: "Side gig".into(),
            amount: Decimal::new(300, 0),
            kind: IncomeType::Freelance,
            description: None,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FinanceError>(),
        Some(FinanceError::Validation(_))
    ));
}

#[test]
fn fixed_income_can_be_paused() {
    let conn = setup();
    let i = fixed_incomes::insert(
        &conn,
        NewFixedIncome {
            name: "Empresa".into(),
            amount: Decimal::new(5000, 0),
            kind: IncomeType::Salary,
            description: Some("CLT".into()),
        },
    )
    .unwrap();
    let paused = fixed_incomes::update(
        &conn,
        i.id,
        FixedIncomePatch {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(!paused.is_active);
    assert_eq!(paused.description.as_deref(), Some("CLT"));
    assert!(!fixed_incomes::get(&conn, i.id).unwrap().is_active);
}

#[test]
fn variable_incomes_list_newest_date_first() {
    let conn = setup();
    variable_incomes::insert(&conn, gig("Logo", "800", "2025-03-02")).unwrap();
    variable_incomes::insert(&conn, gig("Site", "1500", "2025-03-20")).unwrap();
    variable_incomes::insert(&conn, gig("Banner", "200", "2025-02-11")).unwrap();
    let names: Vec<String> = variable_incomes::load_all(&conn)
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(names, ["Site", "Logo", "Banner"]);
}

#[test]
fn list_month_filter_uses_calendar_month() {
    let conn = setup();
    variable_incomes::insert(&conn, gig("Logo", "800", "2025-03-01")).unwrap();
    variable_incomes::insert(&conn, gig("Banner", "200", "2025-02-28")).unwrap();
    let matches = cli::build_cli().get_matches_from([
        "pocketbook",
        "variable-income",
        "list",
        "--month",
        "2025-03",
    ]);
    let Some(("variable-income", vi)) = matches.subcommand() else {
        panic!("no variable-income subcommand");
    };
    let Some(("list", list_m)) = vi.subcommand() else {
        panic!("no list subcommand");
    };
    let rows = variable_incomes::query_rows(&conn, list_m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Logo");
}

#[test]
fn variable_income_update_moves_date() {
    let conn = setup();
    let i = variable_incomes::insert(&conn, gig("Logo", "800", "2025-03-01")).unwrap();
    let moved = variable_incomes::update(
        &conn,
        i.id,
        VariableIncomePatch {
            date: Some(day("2025-04-15")),
            kind: Some(IncomeType::Business),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(moved.date, day("2025-04-15"));
    let stored = variable_incomes::get(&conn, i.id).unwrap();
    assert_eq!(stored.kind, IncomeType::Business);
    assert_eq!(stored.created_at, i.created_at);
}

#[test]
fn variable_income_rejects_salary_type() {
    let mut new = gig("Bonus", "100", "2025-03-01");
    new.kind = IncomeType::Salary;
    assert!(variable_incomes::insert(&setup(), new).is_err());
}

#[test]
fn salary_is_a_singleton() {
    let conn = setup();
    assert!(salary::get(&conn).unwrap().is_none());
    salary::set(&conn, Decimal::new(4000, 0), "Base").unwrap();
    salary::set(&conn, Decimal::new(4500, 0), "Reajuste").unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM salary", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
    let s = salary::get(&conn).unwrap().unwrap();
    assert_eq!(s.amount, Decimal::new(4500, 0));
    assert_eq!(s.description, "Reajuste");

    assert!(salary::clear(&conn).unwrap());
    assert!(salary::get(&conn).unwrap().is_none());
    assert!(!salary::clear(&conn).unwrap());
}

#[test]
fn salary_requires_description() {
    assert!(salary::set(&setup(), Decimal::new(4000, 0), "  ").is_err());
}
