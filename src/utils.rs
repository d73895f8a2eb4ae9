// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::check_amount;
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// Value of an argument that clap already marked as required.
pub fn required_arg<'a>(m: &'a clap::ArgMatches, id: &str) -> Result<&'a String> {
    m.get_one::<String>(id)
        .with_context(|| format!("Missing required argument '--{}'", id))
}

/// Trimmed optional text argument; blank counts as absent.
pub fn optional_text(m: &clap::ArgMatches, id: &str) -> Option<String> {
    m.get_one::<String>(id)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// For `update`: absent leaves the field alone, a blank value clears it.
pub fn patch_text(m: &clap::ArgMatches, id: &str) -> Option<Option<String>> {
    m.get_one::<String>(id).map(|s| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    })
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Parses `YYYY-MM` into (year, month).
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok((d.year(), d.month()))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Decimal that must be zero or positive.
pub fn parse_amount(field: &str, s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    check_amount(field, d)?;
    Ok(d)
}

pub fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!("Invalid boolean '{}', expected true|false", s)),
    }
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .with_context(|| format!("Invalid timestamp '{}'", s))
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Calendar date of `s` as seen in `tz`. A bare `YYYY-MM-DD` is taken as is;
/// an RFC 3339 instant is shifted into `tz` first.
pub fn date_in<Tz: TimeZone>(s: &str, tz: &Tz) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(tz).date_naive())
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp. The browser app stored
/// picked days as local midnight in UTC, so instants map to the local day.
pub fn de_date<'de, D>(d: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(d)?;
    date_in(&s, &Local).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s)))
}

/// Numeric ids are kept; anything else (string ids from older exports)
/// becomes 0 and is reassigned on insert.
pub fn de_lenient_id<'de, D>(d: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(d)?;
    Ok(v.as_i64().unwrap_or(0))
}
