use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History store not found at '{0}'; run a full rebuild first")]
    MissingStore(String),

    #[error("Failed to read or write the history store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize the history store: {0}")]
    Serialization(#[from] serde_json::Error),
}
