// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between the endpoint and the CSV file.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("page {page}: server returned {status}")]
    Status { page: u32, status: u16 },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("page {page}: unexpected payload shape: {reason}")]
    Parse { page: u32, reason: String },

    #[error("writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("no page returned any rows")]
    NoData,

    #[error("invalid config: {0}")]
    Config(String),
}

impl ScrapeError {
    pub(crate) fn parse(page: u32, reason: impl Into<String>) -> Self {
        ScrapeError::Parse {
            page,
            reason: reason.into(),
        }
    }

    /// True for failures raised while talking to the endpoint.
    pub fn is_network(&self) -> bool {
        matches!(self, ScrapeError::Status { .. } | ScrapeError::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
