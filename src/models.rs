// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{FinanceError, FinanceResult};
use crate::utils::{de_date, de_lenient_id};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Moradia,
    Transporte,
    Alimentacao,
    Saude,
    Educacao,
    Lazer,
    Outros,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 7] = [
        ExpenseCategory::Moradia,
        ExpenseCategory::Transporte,
        ExpenseCategory::Alimentacao,
        ExpenseCategory::Saude,
        ExpenseCategory::Educacao,
        ExpenseCategory::Lazer,
        ExpenseCategory::Outros,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Moradia => "moradia",
            ExpenseCategory::Transporte => "transporte",
            ExpenseCategory::Alimentacao => "alimentacao",
            ExpenseCategory::Saude => "saude",
            ExpenseCategory::Educacao => "educacao",
            ExpenseCategory::Lazer => "lazer",
            ExpenseCategory::Outros => "outros",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Moradia => "Moradia",
            ExpenseCategory::Transporte => "Transporte",
            ExpenseCategory::Alimentacao => "Alimentação",
            ExpenseCategory::Saude => "Saúde",
            ExpenseCategory::Educacao => "Educação",
            ExpenseCategory::Lazer => "Lazer",
            ExpenseCategory::Outros => "Outros",
        }
    }
}

impl FromStr for ExpenseCategory {
    type Err = FinanceError;

    fn from_str(s: &str) -> FinanceResult<Self> {
        let key = s.trim().to_lowercase();
        ExpenseCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| FinanceError::validation(format!("unknown expense category '{}'", s)))
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Income types. Fixed incomes only accept `salary` and `other`; variable
/// incomes accept everything except `salary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeType {
    Salary,
    Freelance,
    Business,
    Investment,
    Other,
}

impl IncomeType {
    pub const ALL: [IncomeType; 5] = [
        IncomeType::Salary,
        IncomeType::Freelance,
        IncomeType::Business,
        IncomeType::Investment,
        IncomeType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeType::Salary => "salary",
            IncomeType::Freelance => "freelance",
            IncomeType::Business => "business",
            IncomeType::Investment => "investment",
            IncomeType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IncomeType::Salary => "Salário",
            IncomeType::Freelance => "Freelance",
            IncomeType::Business => "Negócio",
            IncomeType::Investment => "Investimento",
            IncomeType::Other => "Outros",
        }
    }

    pub fn is_fixed_kind(&self) -> bool {
        matches!(self, IncomeType::Salary | IncomeType::Other)
    }

    pub fn is_variable_kind(&self) -> bool {
        !matches!(self, IncomeType::Salary)
    }

    pub fn parse_fixed(s: &str) -> FinanceResult<Self> {
        let t: IncomeType = s.parse()?;
        if !t.is_fixed_kind() {
            return Err(FinanceError::validation(format!(
                "fixed income type must be salary or other, got '{}'",
                s
            )));
        }
        Ok(t)
    }

    pub fn parse_variable(s: &str) -> FinanceResult<Self> {
        let t: IncomeType = s.parse()?;
        if !t.is_variable_kind() {
            return Err(FinanceError::validation(format!(
                "variable income type must be freelance, business, investment or other, got '{}'",
                s
            )));
        }
        Ok(t)
    }
}

impl FromStr for IncomeType {
    type Err = FinanceError;

    fn from_str(s: &str) -> FinanceResult<Self> {
        let key = s.trim().to_lowercase();
        IncomeType::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or_else(|| FinanceError::validation(format!("unknown income type '{}'", s)))
    }
}

impl fmt::Display for IncomeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentType {
    Stocks,
    Bonds,
    Funds,
    Crypto,
    RealEstate,
    Other,
}

impl InvestmentType {
    pub const ALL: [InvestmentType; 6] = [
        InvestmentType::Stocks,
        InvestmentType::Bonds,
        InvestmentType::Funds,
        InvestmentType::Crypto,
        InvestmentType::RealEstate,
        InvestmentType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentType::Stocks => "stocks",
            InvestmentType::Bonds => "bonds",
            InvestmentType::Funds => "funds",
            InvestmentType::Crypto => "crypto",
            InvestmentType::RealEstate => "real_estate",
            InvestmentType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InvestmentType::Stocks => "Ações",
            InvestmentType::Bonds => "Renda Fixa",
            InvestmentType::Funds => "Fundos",
            InvestmentType::Crypto => "Criptomoedas",
            InvestmentType::RealEstate => "Imóveis",
            InvestmentType::Other => "Outros",
        }
    }
}

impl FromStr for InvestmentType {
    type Err = FinanceError;

    fn from_str(s: &str) -> FinanceResult<Self> {
        let key = s.trim().to_lowercase().replace('-', "_");
        InvestmentType::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or_else(|| FinanceError::validation(format!("unknown investment type '{}'", s)))
    }
}

impl fmt::Display for InvestmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedIncome {
    #[serde(default, deserialize_with = "de_lenient_id")]
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: IncomeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableIncome {
    #[serde(default, deserialize_with = "de_lenient_id")]
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: IncomeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "de_date")]
    pub date: NaiveDate,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    #[serde(default, deserialize_with = "de_lenient_id")]
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InvestmentType,
    pub initial_amount: Decimal,
    pub current_amount: Decimal,
    #[serde(deserialize_with = "de_date")]
    pub purchase_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Investment {
    /// Percentage change of the current value over the initial one; 0 when
    /// nothing was invested.
    pub fn performance(&self) -> Decimal {
        percent_change(self.initial_amount, self.current_amount)
    }
}

/// Percent change from `initial` to `current`; 0 when `initial` is zero.
/// A ratio too large for `Decimal` saturates at `Decimal::MAX` or `Decimal::MIN`.
pub fn percent_change(initial: Decimal, current: Decimal) -> Decimal {
    if initial.is_zero() {
        return Decimal::ZERO;
    }
    current
        .checked_sub(initial)
        .and_then(|delta| delta.checked_div(initial))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if current >= initial {
            Decimal::MAX
        } else {
            Decimal::MIN
        })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedExpense {
    #[serde(default, deserialize_with = "de_lenient_id")]
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_day: u8,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableExpense {
    #[serde(default, deserialize_with = "de_lenient_id")]
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "de_date")]
    pub date: NaiveDate,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

// Boundary checks shared by the CLI, the importer and the store.

pub fn check_name(name: &str) -> FinanceResult<()> {
    if name.trim().is_empty() {
        return Err(FinanceError::validation("name is required"));
    }
    Ok(())
}

/// Largest amount a single record may carry.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

pub fn check_amount(field: &str, amount: Decimal) -> FinanceResult<()> {
    if amount < Decimal::ZERO {
        return Err(FinanceError::validation(format!(
            "{} must not be negative, got {}",
            field, amount
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(FinanceError::validation(format!(
            "{} must be at most {}, got {}",
            field, MAX_AMOUNT, amount
        )));
    }
    Ok(())
}

pub fn check_due_day(day: u8) -> FinanceResult<()> {
    if !(1..=31).contains(&day) {
        return Err(FinanceError::validation(format!(
            "due day must be between 1 and 31, got {}",
            day
        )));
    }
    Ok(())
}

impl Salary {
    pub fn validate(&self) -> FinanceResult<()> {
        check_amount("salary", self.amount)?;
        if self.description.trim().is_empty() {
            return Err(FinanceError::validation("salary description is required"));
        }
        Ok(())
    }
}

impl FixedIncome {
    pub fn validate(&self) -> FinanceResult<()> {
        check_name(&self.name)?;
        check_amount("amount", self.amount)?;
        if !self.kind.is_fixed_kind() {
            return Err(FinanceError::validation(format!(
                "fixed income '{}' cannot have type {}",
                self.name, self.kind
            )));
        }
        Ok(())
    }
}

impl VariableIncome {
    pub fn validate(&self) -> FinanceResult<()> {
        check_name(&self.name)?;
        check_amount("amount", self.amount)?;
        if !self.kind.is_variable_kind() {
            return Err(FinanceError::validation(format!(
                "variable income '{}' cannot have type {}",
                self.name, self.kind
            )));
        }
        Ok(())
    }
}

impl Investment {
    pub fn validate(&self) -> FinanceResult<()> {
        check_name(&self.name)?;
        check_amount("initial amount", self.initial_amount)?;
        check_amount("current amount", self.current_amount)?;
        Ok(())
    }
}

impl FixedExpense {
    pub fn validate(&self) -> FinanceResult<()> {
        check_name(&self.name)?;
        check_amount("amount", self.amount)?;
        check_due_day(self.due_day)
    }
}

impl VariableExpense {
    pub fn validate(&self) -> FinanceResult<()> {
        check_name(&self.name)?;
        check_amount("amount", self.amount)
    }
}
