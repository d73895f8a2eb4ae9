// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_CURRENCY: &str = "BRL";
pub const DEFAULT_LOG_FILTER: &str = "pocketbook=warn";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub currency: String,
    pub log_filter: String,
}

impl Config {
    /// Reads the environment; `db_override` (the `--db` flag) wins over `POCKETBOOK_DB`.
    pub fn load(db_override: Option<&String>) -> Result<Self> {
        let db_path = match db_override {
            Some(p) => PathBuf::from(p),
            None => match env::var("POCKETBOOK_DB") {
                Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
                _ => crate::db::default_db_path()?,
            },
        };
        Ok(Self {
            db_path,
            currency: env::var("POCKETBOOK_CURRENCY")
                .map(|c| c.trim().to_uppercase())
                .ok()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            log_filter: env::var("POCKETBOOK_LOG")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}
