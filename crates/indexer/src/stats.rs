use serde::{Deserialize, Serialize};

/// Outcome of one indexing run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Files successfully chunked and stored
    pub files: usize,

    /// Files that failed to parse or chunk
    pub failed_files: usize,

    /// Chunks stored
    pub chunks: usize,

    /// Chunks that are merge products
    pub merged_chunks: usize,

    /// Chunks widened with surrounding context
    pub expanded_chunks: usize,

    /// Chunks over the size ceiling, stored with a warning label
    pub oversized_chunks: usize,

    /// Total source lines covered by stored chunks
    pub total_lines: usize,

    /// Wall-clock duration of the run in milliseconds
    pub time_ms: u64,

    /// Per-file failure descriptions, `path: message`
    pub errors: Vec<String>,
}

impl IndexStats {
    /// Record the labels and size of one stored chunk
    pub fn record_chunk(&mut self, chunk: &iwsdk_code_chunker::Chunk) {
        self.chunks += 1;
        self.total_lines += chunk.line_count();

        if chunk.semantic_labels.contains("merged_chunk") {
            self.merged_chunks += 1;
        }
        if chunk.semantic_labels.contains("expanded_context") {
            self.expanded_chunks += 1;
        }
        if chunk.semantic_labels.contains("large_chunk") {
            self.oversized_chunks += 1;
        }
    }
}

impl std::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Indexed {} files ({} failed) in {}ms",
            self.files, self.failed_files, self.time_ms
        )?;
        writeln!(
            f,
            "  {} chunks, {} lines (merged: {}, expanded: {}, oversized: {})",
            self.chunks,
            self.total_lines,
            self.merged_chunks,
            self.expanded_chunks,
            self.oversized_chunks
        )?;
        for error in &self.errors {
            writeln!(f, "  error: {error}")?;
        }
        Ok(())
    }
}
