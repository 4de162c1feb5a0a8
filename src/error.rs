// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! None of these ever reach the user as a blocking failure: the public
//! load/refresh/favorites operations log them and fall back to the last
//! known good state. They are returned from the fallible building blocks
//! underneath those operations.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bundled snapshot unavailable: {0}")]
    AssetUnavailable(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode payload: {0}")]
    Decode(String),

    #[error("Failed to read from store: {0}")]
    PersistenceRead(String),

    #[error("Failed to write to store: {0}")]
    PersistenceWrite(String),
}

impl AppError {
    /// True for failures that make a refresh a no-op (previous units kept).
    pub fn is_refresh_failure(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::Decode(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AppError::Decode(e.to_string())
        } else {
            AppError::Network(e.to_string())
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
