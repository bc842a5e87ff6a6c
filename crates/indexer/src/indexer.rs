//! Batch indexing driver: scan, chunk in parallel, embed, store.

use crate::error::{IndexerError, Result};
use crate::scanner::FileScanner;
use crate::stats::IndexStats;
use iwsdk_code_chunker::{Chunk, Chunker, ChunkerError, OptimizerConfig};
use iwsdk_vector_store::{Embedder, VectorStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

/// Default number of files chunked concurrently
const DEFAULT_CONCURRENCY: usize = 4;

/// Indexes a project tree into a vector store
///
/// Chunking runs on blocking worker threads behind a semaphore; each worker
/// constructs its own `Chunker` because tree-sitter parser handles are not
/// shareable across threads. A failing file is recorded and skipped, never
/// fatal to the batch.
pub struct ProjectIndexer {
    config: OptimizerConfig,
    concurrency: usize,
    source: String,
}

impl ProjectIndexer {
    /// Create an indexer storing chunks under a source label
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            config: OptimizerConfig::default(),
            concurrency: DEFAULT_CONCURRENCY,
            source: source.into(),
        }
    }

    /// Override the optimizer configuration
    #[must_use]
    pub fn with_config(mut self, config: OptimizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Override worker concurrency
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Index every supported source file under `root` into `store`
    pub async fn index<E: Embedder>(
        &self,
        root: impl AsRef<Path>,
        store: &mut VectorStore<E>,
    ) -> Result<IndexStats> {
        self.config.validate()?;

        let started = Instant::now();
        let files = FileScanner::new(root)?.scan();
        log::info!("Indexing {} files as source {}", files.len(), self.source);

        let mut stats = IndexStats::default();

        for (path, outcome) in self.chunk_files(files).await? {
            match outcome {
                Ok(chunks) => {
                    for chunk in &chunks {
                        stats.record_chunk(chunk);
                    }
                    store.add_chunks(chunks, &self.source).await?;
                    stats.files += 1;
                }
                Err(e) => {
                    log::warn!("Failed to chunk {}: {e}", path.display());
                    stats.failed_files += 1;
                    stats.errors.push(format!("{}: {e}", path.display()));
                }
            }
        }

        stats.time_ms = started.elapsed().as_millis() as u64;
        log::info!("{stats}");
        Ok(stats)
    }

    /// Chunk files on blocking workers, bounded by the semaphore
    ///
    /// Results come back in spawn order so the store's insertion order is
    /// deterministic.
    async fn chunk_files(
        &self,
        files: Vec<PathBuf>,
    ) -> Result<Vec<(PathBuf, std::result::Result<Vec<Chunk>, ChunkerError>)>> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = Vec::with_capacity(files.len());

        for path in files {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| IndexerError::other(e.to_string()))?;
            let config = self.config.clone();

            tasks.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                let outcome = Chunker::new(config).and_then(|mut chunker| chunker.chunk_file(&path));
                (path, outcome)
            }));
        }

        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            results.push(
                task.await
                    .map_err(|e| IndexerError::other(format!("worker panicked: {e}")))?,
            );
        }
        Ok(results)
    }
}
