//! In-memory vector store with brute-force cosine search.

use crate::embeddings::{embedding_text, Embedder};
use crate::error::{Result, VectorStoreError};
use crate::metadata::{chunk_id, chunk_metadata, MetadataFilter};
use crate::types::{SearchResult, StoreStats, StoredChunk};
use iwsdk_code_chunker::Chunk;
use ndarray::ArrayView1;

/// Vector store over a pluggable embedder
///
/// Storage is a flat vector and search is an exhaustive cosine scan, which
/// is the right trade-off at project-index scale (thousands of chunks, not
/// millions).
pub struct VectorStore<E: Embedder> {
    embedder: E,
    entries: Vec<StoredChunk>,
}

impl<E: Embedder> VectorStore<E> {
    /// Create an empty store backed by `embedder`
    #[must_use]
    pub const fn new(embedder: E) -> Self {
        Self {
            embedder,
            entries: Vec::new(),
        }
    }

    /// Number of stored chunks
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embed and store a batch of chunks under a source label
    ///
    /// Returns the number of chunks added. Chunk ids are positional within
    /// the batch, so re-adding the same batch duplicates entries; callers
    /// own dedup policy.
    pub async fn add_chunks(&mut self, chunks: Vec<Chunk>, source: &str) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(embedding_text).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        if vectors.len() != chunks.len() {
            return Err(VectorStoreError::embedding(format!(
                "embedder returned {} vectors for {} texts",
                vectors.len(),
                chunks.len()
            )));
        }

        let expected = self.embedder.dimension();
        let added = chunks.len();

        for (index, (chunk, vector)) in chunks.into_iter().zip(vectors).enumerate() {
            if vector.len() != expected {
                return Err(VectorStoreError::dimension(expected, vector.len()));
            }

            let id = chunk_id(source, &chunk, index);
            let metadata = chunk_metadata(&chunk, source);
            self.entries.push(StoredChunk {
                id,
                chunk,
                vector,
                metadata,
            });
        }

        log::debug!("Stored {added} chunks from source {source}");
        Ok(added)
    }

    /// Look up a stored chunk by id
    pub fn get(&self, id: &str) -> Result<&StoredChunk> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| VectorStoreError::not_found(id))
    }

    /// Search for the chunks most similar to a query text
    ///
    /// An optional filter restricts candidates to entries whose metadata
    /// matches every given key/value exactly.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>> {
        let query_vector = self.embedder.embed(query).await?;

        let mut scored: Vec<(f32, &StoredChunk)> = self
            .entries
            .iter()
            .filter(|entry| matches_filter(entry, filter))
            .map(|entry| (cosine_similarity(&query_vector, &entry.vector), entry))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        Ok(scored
            .into_iter()
            .map(|(score, entry)| SearchResult {
                id: entry.id.clone(),
                score,
                chunk: entry.chunk.clone(),
                metadata: entry.metadata.clone(),
            })
            .collect())
    }

    /// Aggregate counts by kind and language
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let mut stats = StoreStats {
            total_chunks: self.entries.len(),
            ..StoreStats::default()
        };

        for entry in &self.entries {
            *stats
                .by_kind
                .entry(entry.chunk.kind.as_str().to_string())
                .or_insert(0) += 1;
            *stats
                .by_language
                .entry(entry.chunk.language.as_str().to_string())
                .or_insert(0) += 1;
        }

        stats
    }
}

fn matches_filter(entry: &StoredChunk, filter: Option<&MetadataFilter>) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    filter
        .iter()
        .all(|(key, value)| entry.metadata.get(key) == Some(value))
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let a = ArrayView1::from(a);
    let b = ArrayView1::from(b);

    let denominator = a.dot(&a).sqrt() * b.dot(&b).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    a.dot(&b) / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::HashEmbedder;
    use crate::metadata::MetadataValue;
    use iwsdk_code_chunker::{ChunkKind, Language};
    use pretty_assertions::assert_eq;

    fn chunk(kind: ChunkKind, name: &str, content: &str) -> Chunk {
        Chunk::new(
            kind,
            name,
            content,
            1,
            20,
            "/project/src/test.ts",
            Language::TypeScript,
        )
    }

    fn store() -> VectorStore<HashEmbedder> {
        VectorStore::new(HashEmbedder::new(64))
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let mut store = store();
        let added = store
            .add_chunks(vec![chunk(ChunkKind::Class, "Grab", "class Grab {}")], "iwsdk")
            .await
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(store.len(), 1);

        let entry = store.get("iwsdk:src/test.ts:class:Grab:L1:0").unwrap();
        assert_eq!(entry.chunk.name, "Grab");
        assert!(matches!(
            store.get("missing"),
            Err(VectorStoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_search_ranks_matching_content_first() {
        let mut store = store();
        store
            .add_chunks(
                vec![
                    chunk(
                        ChunkKind::Class,
                        "GrabSystem",
                        "class GrabSystem { grab() { attach hand grab } }",
                    ),
                    chunk(
                        ChunkKind::Class,
                        "RenderSystem",
                        "class RenderSystem { draw() { mesh scene camera } }",
                    ),
                ],
                "iwsdk",
            )
            .await
            .unwrap();

        let results = store.search("grab hand attach", 2, None).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.name, "GrabSystem");
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn test_search_respects_limit_and_filter() {
        let mut store = store();
        store
            .add_chunks(
                vec![
                    chunk(ChunkKind::Class, "A", "alpha"),
                    chunk(ChunkKind::Function, "b", "alpha"),
                    chunk(ChunkKind::Function, "c", "alpha"),
                ],
                "iwsdk",
            )
            .await
            .unwrap();

        let mut filter = MetadataFilter::new();
        filter.insert("kind".to_string(), MetadataValue::Str("function".into()));

        let results = store.search("alpha", 10, Some(&filter)).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.chunk.kind == ChunkKind::Function));

        let limited = store.search("alpha", 1, None).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_stats() {
        let mut store = store();
        store
            .add_chunks(
                vec![
                    chunk(ChunkKind::Class, "A", "a"),
                    chunk(ChunkKind::Class, "B", "b"),
                    chunk(ChunkKind::Interface, "C", "c"),
                ],
                "iwsdk",
            )
            .await
            .unwrap();

        let stats = store.stats();
        assert_eq!(stats.total_chunks, 3);
        assert_eq!(stats.by_kind["class"], 2);
        assert_eq!(stats.by_kind["interface"], 1);
        assert_eq!(stats.by_language["typescript"], 3);
    }

    #[test]
    fn test_cosine_similarity_bounds() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
