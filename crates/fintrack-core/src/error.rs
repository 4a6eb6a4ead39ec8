use std::io;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Entry book not found: {0}")]
    BookNotFound(String),
    #[error("Entry not found: {0}")]
    EntryNotFound(Uuid),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("CSV error: {0}")]
    Csv(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<csv::Error> for CoreError {
    fn from(err: csv::Error) -> Self {
        CoreError::Csv(err.to_string())
    }
}

impl From<fintrack_domain::DraftError> for CoreError {
    fn from(err: fintrack_domain::DraftError) -> Self {
        CoreError::Validation(err.to_string())
    }
}
