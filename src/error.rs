// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for rgaabot

use thiserror::Error;

use crate::model::{ScanId, SiteId};

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for rgaabot
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("fetch failed for {url}: HTTP {status}")]
    Fetch { url: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("site not found: {0}")]
    SiteNotFound(SiteId),

    #[error("scan not found: {0}")]
    ScanNotFound(ScanId),

    #[error("not authorized to access this site")]
    Unauthorized,

    #[error("site is inactive")]
    SiteInactive,

    #[error("no accessible pages found")]
    NoAccessiblePages,

    #[error("scan quota exceeded")]
    QuotaExceeded,

    #[error("timeout")]
    Timeout,

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("store error: {0}")]
    Store(String),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
