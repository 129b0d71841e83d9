//! Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Length mismatch: {documents} documents but {embeddings} embeddings")]
    LengthMismatch { documents: usize, embeddings: usize },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("No embedding found for text: {0:?}")]
    EmbeddingNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
