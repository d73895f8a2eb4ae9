// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("database error: {0}")]
    Persistence(#[from] rusqlite::Error),
}

impl FinanceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        FinanceError::Validation(msg.into())
    }
}

pub type FinanceResult<T> = std::result::Result<T, FinanceError>;
