//! Embedding boundary: text rendering for chunks and the embedder trait.
//!
//! The store never talks to a model directly; it renders a chunk into an
//! enriched text representation and hands it to an [`Embedder`]. The
//! [`HashEmbedder`] is a deterministic stand-in for offline runs and tests.

use crate::error::{Result, VectorStoreError};
use crate::metadata::relative_source_path;
use async_trait::async_trait;
use iwsdk_code_chunker::Chunk;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Produces fixed-dimension embeddings for text
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts
    ///
    /// The default implementation embeds sequentially; model-backed
    /// implementations should override with true batching.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Output vector dimension
    fn dimension(&self) -> usize;
}

/// Render a chunk into the enriched text the embedder sees
///
/// Metadata lines come first so relationship context weighs into the
/// embedding, then a blank line, then the raw content.
#[must_use]
pub fn embedding_text(chunk: &Chunk) -> String {
    let mut parts = vec![
        format!("# {}: {}", chunk.kind, chunk.name),
        format!("File: {}", relative_source_path(&chunk.file_path)),
        format!("Language: {}", chunk.language),
    ];

    if let Some(class_name) = &chunk.class_name {
        parts.push(format!("Class: {class_name}"));
    }
    if !chunk.semantic_labels.is_empty() {
        parts.push(format!("Labels: {}", join(chunk.semantic_labels.iter())));
    }
    if !chunk.extends.is_empty() {
        parts.push(format!("Extends: {}", join(chunk.extends.iter())));
    }
    if !chunk.implements.is_empty() {
        parts.push(format!("Implements: {}", join(chunk.implements.iter())));
    }

    let modules: Vec<String> = chunk
        .imports
        .iter()
        .filter_map(|stmt| import_module(stmt))
        .take(5)
        .collect();
    if !modules.is_empty() {
        parts.push(format!("Imports: {}", modules.join(", ")));
    }

    if !chunk.calls.is_empty() {
        parts.push(format!("Calls: {}", join(chunk.calls.iter().take(10))));
    }
    if !chunk.webxr_api_usage.is_empty() {
        parts.push(format!("WebXR APIs: {}", join(chunk.webxr_api_usage.iter())));
    }
    if chunk.ecs_component {
        parts.push("ECS Component".to_string());
    }
    if chunk.ecs_system {
        parts.push("ECS System".to_string());
    }

    parts.push(String::new());
    parts.push(chunk.content.clone());
    parts.join("\n")
}

fn join<'a>(items: impl Iterator<Item = &'a String>) -> String {
    items.cloned().collect::<Vec<_>>().join(", ")
}

/// Extract the module specifier from an import statement
///
/// `import { System } from 'elics';` yields `elics`.
fn import_module(statement: &str) -> Option<String> {
    let quote = statement.find(['\'', '"'])?;
    let delimiter = statement.as_bytes()[quote] as char;
    let rest = &statement[quote + 1..];
    let end = rest.find(delimiter)?;
    Some(rest[..end].to_string())
}

/// Deterministic feature-hash embedder
///
/// Tokens are hashed into buckets with alternating sign, then the vector is
/// L2-normalized. Not semantically meaningful, but stable across runs, which
/// is what tests and offline indexing need.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub const DEFAULT_DIMENSION: usize = 384;

    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.dimension == 0 {
            return Err(VectorStoreError::embedding("dimension must be > 0"));
        }

        let mut vector = vec![0.0f32; self.dimension];
        for token in text.split_whitespace() {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let digest = hasher.finish();

            let bucket = (digest % self.dimension as u64) as usize;
            let sign = if digest & (1 << 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
