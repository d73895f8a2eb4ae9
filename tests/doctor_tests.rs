// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketbook::commands::doctor::find_issues;
use pocketbook::commands::fixed_expenses::{self, NewFixedExpense};
use pocketbook::db;
use pocketbook::models::ExpenseCategory;
use rusqlite::Connection;

const TS: &str = "2025-01-01T00:00:00+00:00";

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

#[test]
fn clean_database_has_no_issues() {
    let conn = setup();
    fixed_expenses::insert(
        &conn,
        NewFixedExpense {
            name: "Luz".into(),
            amount: "180".parse().unwrap(),
            category: ExpenseCategory::Moradia,
            description: None,
            due_day: 20,
        },
    )
    .unwrap();
    assert!(find_issues(&conn).unwrap().is_empty());
}

#[test]
fn hand_edited_rows_are_reported() {
    let conn = setup();
    conn.execute(
        "INSERT INTO fixed_expenses(name, amount, category, due_day, is_active, created_at, updated_at)
         VALUES ('Gym', '-10', 'academia', 0, 1, ?1, ?1)",
        [TS],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO variable_incomes(name, amount, type, date, created_at)
         VALUES ('Bonus', 'lots', 'salary', '03/05/2025', 'yesterday')",
        [],
    )
    .unwrap();

    let issues = find_issues(&conn).unwrap();
    let mut kinds: Vec<&str> = issues.iter().map(|i| i.kind).collect();
    kinds.sort_unstable();
    assert_eq!(
        kinds,
        [
            "bad_amount",
            "bad_date",
            "bad_timestamp",
            "due_day_out_of_range",
            "negative_amount",
            "unknown_class",
            "unknown_class",
        ]
    );
    assert!(issues
        .iter()
        .any(|i| i.detail == "fixed_expenses #1: category 'academia'"));
    assert!(issues
        .iter()
        .any(|i| i.detail == "variable_incomes #1: type 'salary'"));
}

#[test]
fn investment_amount_columns_are_checked_separately() {
    let conn = setup();
    conn.execute(
        "INSERT INTO investments(name, type, initial_amount, current_amount, purchase_date, is_active, created_at, updated_at)
         VALUES ('Fundo', 'funds', '1000', '-1', '2024-05-01', 1, ?1, ?1)",
        [TS],
    )
    .unwrap();
    let issues = find_issues(&conn).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, "negative_amount");
    assert!(issues[0].detail.contains("current_amount"));
}

#[test]
fn amounts_above_the_cap_are_reported() {
    let conn = setup();
    conn.execute(
        "INSERT INTO variable_expenses(name, amount, category, date, created_at)
         VALUES ('Iate', '50000000000000000000000000000', 'lazer', '2025-03-01', ?1)",
        [TS],
    )
    .unwrap();
    let issues = find_issues(&conn).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, "amount_too_large");
}
