use crate::metadata::Metadata;
use iwsdk_code_chunker::Chunk;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A chunk with its embedding and metadata record as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    pub id: String,
    pub chunk: Chunk,
    pub vector: Vec<f32>,
    pub metadata: Metadata,
}

/// One search hit, best first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub score: f32,
    pub chunk: Chunk,
    pub metadata: Metadata,
}

/// Aggregate store statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_chunks: usize,
    pub by_kind: BTreeMap<String, usize>,
    pub by_language: BTreeMap<String, usize>,
}
