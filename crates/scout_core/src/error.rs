use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("unknown counter: {0}")]
    UnknownCounter(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("no report with id {0}")]
    ReportNotFound(u64),

    #[error(transparent)]
    Storage(#[from] crate::storage::StorageError),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
