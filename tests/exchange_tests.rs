// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Local, NaiveDate};
use pocketbook::commands::{
    exporter,
    fixed_expenses::{self, NewFixedExpense},
    fixed_incomes::{self, NewFixedIncome},
    importer,
    investments::{self, NewInvestment},
    salary,
    summary::load_snapshot,
    variable_expenses::{self, NewVariableExpense},
};
use pocketbook::db;
use pocketbook::models::{ExpenseCategory, IncomeType, InvestmentType};
use pocketbook::summary::{summarize_for, Period};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::fs;
use tempfile::tempdir;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

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

fn seed(conn: &Connection) {
    salary::set(conn, d("2500"), "Bolsa").unwrap();
    fixed_incomes::insert(
        conn,
        NewFixedIncome {
            name: "Aluguel recebido".into(),
            amount: d("900"),
            kind: IncomeType::Other,
            description: Some("Kitnet".into()),
        },
    )
    .unwrap();
    investments::insert(
        conn,
        NewInvestment {
            name: "CDB".into(),
            kind: InvestmentType::Bonds,
            initial_amount: d("1000"),
            current_amount: d("1080"),
            purchase_date: day("2024-09-10"),
            description: None,
        },
    )
    .unwrap();
    variable_expenses::insert(
        conn,
        NewVariableExpense {
            name: "Cinema, pipoca".into(),
            amount: d("64.90"),
            category: ExpenseCategory::Lazer,
            description: None,
            date: day("2025-03-14"),
        },
    )
    .unwrap();
}

#[test]
fn json_export_reimports_to_the_same_summary() {
    let src = setup();
    seed(&src);
    let before = load_snapshot(&src).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("backup.json");
    exporter::write_json(&before, &path).unwrap();

    let mut dst = setup();
    let n = importer::import_snapshot(&mut dst, &importer::read_snapshot(&path).unwrap()).unwrap();
    assert_eq!(n, 4);
    let after = load_snapshot(&dst).unwrap();
    assert_eq!(after.record_count(), before.record_count());
    assert_eq!(summarize_for(&after, MARCH), summarize_for(&before, MARCH));
    assert_eq!(after.fixed_incomes[0].created_at, before.fixed_incomes[0].created_at);
}

#[test]
fn json_export_uses_camel_case_keys() {
    let conn = setup();
    seed(&conn);
    let dir = tempdir().unwrap();
    let path = dir.path().join("backup.json");
    exporter::write_json(&load_snapshot(&conn).unwrap(), &path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(value["fixedIncomes"][0]["isActive"].as_bool().unwrap());
    assert_eq!(value["investments"][0]["type"], "bonds");
    assert_eq!(value["variableExpenses"][0]["date"], "2025-03-14");
}

#[test]
fn csv_ledger_has_one_row_per_record() {
    let conn = setup();
    seed(&conn);
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.csv");
    exporter::write_csv(&load_snapshot(&conn).unwrap(), &path).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        [
            "kind",
            "id",
            "name",
            "amount",
            "initial_amount",
            "class",
            "date",
            "due_day",
            "active",
            "description"
        ]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 4);
    let kinds: Vec<&str> = rows.iter().map(|r| &r[0]).collect();
    assert_eq!(kinds, ["salary", "fixed_income", "investment", "variable_expense"]);
    assert_eq!(&rows[2][3], "1080");
    assert_eq!(&rows[2][4], "1000");
    assert_eq!(&rows[3][2], "Cinema, pipoca");
}

#[test]
fn csv_ledger_keeps_fixed_expense_due_day() {
    let conn = setup();
    fixed_expenses::insert(
        &conn,
        NewFixedExpense {
            name: "Escola".into(),
            amount: d("850"),
            category: ExpenseCategory::Educacao,
            description: None,
            due_day: 15,
        },
    )
    .unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.csv");
    exporter::write_csv(&load_snapshot(&conn).unwrap(), &path).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "fixed_expense");
    assert_eq!(&rows[0][7], "15");
    assert_eq!(&rows[0][8], "true");
}

const BROWSER_DATA: &str = r#"{
  "salary": { "id": "1", "amount": 4200.5, "description": "Salário", "createdAt": "2025-01-02T10:00:00.000Z", "updatedAt": "2025-02-01T10:00:00.000Z" },
  "fixedIncomes": [
    { "id": "1738000000000", "name": "Consultoria", "amount": 800, "type": "other", "isActive": true, "createdAt": "2025-01-05T12:00:00.000Z", "updatedAt": "2025-01-05T12:00:00.000Z" }
  ],
  "variableIncomes": [
    { "id": "1738000000001", "name": "Freela site", "amount": 1500, "type": "freelance", "date": "2025-03-03", "createdAt": "2025-03-03T09:00:00.000Z" }
  ],
  "investments": [
    { "id": "1738000000002", "name": "PETR4", "type": "stocks", "initialAmount": 1000, "currentAmount": 950, "purchaseDate": "2024-12-20T12:00:00.000Z", "isActive": true, "createdAt": "2024-12-20T00:00:00.000Z", "updatedAt": "2025-03-01T00:00:00.000Z" }
  ],
  "fixedExpenses": [
    { "id": "1738000000003", "name": "Condomínio", "amount": 450.75, "category": "moradia", "dueDay": 10, "isActive": true, "createdAt": "2025-01-01T00:00:00.000Z", "updatedAt": "2025-01-01T00:00:00.000Z" }
  ],
  "variableExpenses": [
    { "id": "1738000000004", "name": "Farmácia", "amount": 89.9, "category": "saude", "date": "2025-03-12", "createdAt": "2025-03-12T18:30:00.000Z" }
  ]
}"#;

#[test]
fn browser_app_data_imports_every_collection() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("financial-data.json");
    fs::write(&path, BROWSER_DATA).unwrap();

    let mut conn = setup();
    let snapshot = importer::read_snapshot(&path).unwrap();
    assert_eq!(importer::import_snapshot(&mut conn, &snapshot).unwrap(), 6);

    let stored = load_snapshot(&conn).unwrap();
    assert_eq!(stored.salary.as_ref().unwrap().amount, d("4200.5"));
    assert_eq!(stored.investments[0].purchase_date, day("2024-12-20"));
    assert!(stored.fixed_expenses[0].id > 0);

    let s = summarize_for(&stored, MARCH);
    assert_eq!(s.total_income, d("6500.5"));
    assert_eq!(s.total_expenses, d("540.65"));
    assert_eq!(s.remaining_balance, d("5959.85"));
    assert_eq!(s.investment_performance, d("-5"));
}

#[test]
fn invalid_record_rolls_back_the_whole_import() {
    let mut conn = setup();
    let broken = BROWSER_DATA.replace("\"dueDay\": 10", "\"dueDay\": 40");
    let snapshot = serde_json::from_str(&broken).unwrap();
    let err = importer::import_snapshot(&mut conn, &snapshot).unwrap_err();
    assert!(format!("{err:#}").contains("Condomínio"));

    let stored = load_snapshot(&conn).unwrap();
    assert_eq!(stored.record_count(), 0);
    assert!(fixed_expenses::load_all(&conn).unwrap().is_empty());
}

#[test]
fn unknown_category_fails_to_parse() {
    let broken = BROWSER_DATA.replace("\"saude\"", "\"pets\"");
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, broken).unwrap();
    assert!(importer::read_snapshot(&path).is_err());
}

#[test]
fn browser_instant_dates_count_in_the_local_month() {
    let raw = "2025-02-28T15:00:00.000Z";
    let local_day = DateTime::parse_from_rfc3339(raw)
        .unwrap()
        .with_timezone(&Local)
        .date_naive();
    let data = format!(
        r#"{{ "variableExpenses": [
            {{ "id": "9", "name": "Feira", "amount": 100, "category": "alimentacao", "date": "{raw}" }}
        ] }}"#
    );
    let mut conn = setup();
    let snapshot = serde_json::from_str(&data).unwrap();
    importer::import_snapshot(&mut conn, &snapshot).unwrap();

    let stored = load_snapshot(&conn).unwrap();
    assert_eq!(stored.variable_expenses[0].date, local_day);
    let s = summarize_for(&stored, Period::containing(local_day));
    assert_eq!(s.total_variable_expenses, d("100"));
}
