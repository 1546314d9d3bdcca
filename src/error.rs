//! Error type shared by every stage of the crawler.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure or non-success status from the vacancies API
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid synonym pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Source file for an import does not exist
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Source table has no header row
    #[error("table has no header row")]
    EmptyTable,

    /// A data row does not line up with the header
    #[error("row {row} has {found} cells, header has {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown specialization '{0}' (expected one of: analyst, frontend, backend, security)")]
    UnknownSpecialization(String),

    #[error("invalid taxonomy: {0}")]
    InvalidTaxonomy(String),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
