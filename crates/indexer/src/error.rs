use thiserror::Error;

/// Indexer errors
#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Chunker error: {0}")]
    Chunker(#[from] iwsdk_code_chunker::ChunkerError),

    #[error("Vector store error: {0}")]
    VectorStore(#[from] iwsdk_vector_store::VectorStoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl IndexerError {
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath(path.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, IndexerError>;
