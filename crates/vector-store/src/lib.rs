//! Embedding and retrieval boundary for code chunks.
//!
//! Renders chunks into enriched embedding text, stores vectors alongside
//! scalar metadata records, and serves brute-force cosine search with
//! metadata filtering. The embedder is a trait seam; the bundled
//! [`HashEmbedder`] keeps tests and offline runs deterministic.

pub mod embeddings;
pub mod error;
pub mod metadata;
pub mod store;
pub mod types;

pub use embeddings::{embedding_text, Embedder, HashEmbedder};
pub use error::{Result, VectorStoreError};
pub use metadata::{chunk_id, chunk_metadata, Metadata, MetadataFilter, MetadataValue};
pub use store::VectorStore;
pub use types::{SearchResult, StoreStats, StoredChunk};
