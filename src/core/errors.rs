use crate::ranking::RankingError;
use crate::storage::base::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    #[error("WebDriver error: {0}")]
    Browser(#[from] thirtyfour::error::WebDriverError),

    #[error("Card skipped: {0}")]
    CardSkipped(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Ranking error: {0}")]
    Ranking(#[from] RankingError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),
}

pub type ScoutResult<T> = Result<T, ScoutError>;
