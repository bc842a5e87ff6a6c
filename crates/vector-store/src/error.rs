use thiserror::Error;

/// Vector store errors
#[derive(Error, Debug)]
pub enum VectorStoreError {
    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl VectorStoreError {
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    #[must_use]
    pub const fn dimension(expected: usize, actual: usize) -> Self {
        Self::Dimension { expected, actual }
    }
}

pub type Result<T> = std::result::Result<T, VectorStoreError>;
