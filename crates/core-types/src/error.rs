use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Failed to parse stored snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}
