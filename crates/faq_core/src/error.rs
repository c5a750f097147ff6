use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaqError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed dataset {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("Dataset {0} contains no FAQ entries")]
    EmptyDataset(String),

    #[error("Malformed FAQ entry {id} in {dataset}: {reason}")]
    MalformedEntry {
        dataset: String,
        id: String,
        reason: String,
    },

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Stemming failed: {0}")]
    Stemming(String),

    #[error("Dataset switch to {0} cancelled")]
    Cancelled(String),
}

impl FaqError {
    /// True for failures caused by the dataset source itself rather than the caller.
    pub fn is_dataset_error(&self) -> bool {
        matches!(
            self,
            FaqError::Io { .. }
                | FaqError::Json { .. }
                | FaqError::UnknownDataset(_)
                | FaqError::EmptyDataset(_)
                | FaqError::MalformedEntry { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FaqError>;
