use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Failed to write artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize artifact: {0}")]
    Serialization(#[from] serde_json::Error),
}
