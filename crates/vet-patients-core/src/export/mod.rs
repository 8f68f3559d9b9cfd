//! Roster export and import.

mod roster;

pub use roster::*;

use thiserror::Error;

use crate::store::StoreError;

/// Export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid roster: {0}")]
    Store(#[from] StoreError),
}

pub type ExportResult<T> = Result<T, ExportError>;
