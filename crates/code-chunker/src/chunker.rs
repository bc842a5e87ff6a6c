//! High-level chunking facade.
//!
//! Wires the pipeline together: parse, extract, annotate, size-optimize.
//! Holds stateful tree-sitter parsers, so it is `&mut self` throughout and
//! not shareable across threads; spawn one `Chunker` per worker.

use crate::config::OptimizerConfig;
use crate::detector::annotate;
use crate::error::Result;
use crate::extractor::ChunkExtractor;
use crate::optimizer::SizeOptimizer;
use crate::parser::SourceParser;
use crate::types::{Chunk, ChunkKind};
use std::collections::BTreeMap;
use std::path::Path;

/// AST-based code chunker for TypeScript and JavaScript sources
pub struct Chunker {
    parser: SourceParser,
    optimizer: SizeOptimizer,
}

impl Chunker {
    /// Create a chunker with the given optimizer configuration
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            parser: SourceParser::new()?,
            optimizer: SizeOptimizer::new(config),
        })
    }

    /// Create a chunker with default thresholds
    pub fn with_defaults() -> Result<Self> {
        Self::new(OptimizerConfig::default())
    }

    /// Chunk a source file on disk
    pub fn chunk_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<Chunk>> {
        let parsed = self.parser.parse_file(path)?;
        self.run_pipeline(&parsed)
    }

    /// Chunk an in-memory buffer; the path selects the grammar and is
    /// recorded as the chunks' `file_path`
    pub fn chunk_source(&mut self, source: Vec<u8>, file_path: &str) -> Result<Vec<Chunk>> {
        let parsed = self.parser.parse_source(source, file_path)?;
        self.run_pipeline(&parsed)
    }

    /// Size distribution of a chunk stream against this chunker's band
    #[must_use]
    pub fn analyze(&self, chunks: &[Chunk]) -> ChunkingStats {
        ChunkingStats::analyze(chunks, self.optimizer.config())
    }

    fn run_pipeline(&self, parsed: &crate::parser::ParsedSource) -> Result<Vec<Chunk>> {
        let extracted = ChunkExtractor::new(parsed).extract();
        let annotated: Vec<Chunk> = extracted.into_iter().map(annotate).collect();
        let optimized = self.optimizer.optimize(annotated);

        log::debug!(
            "Optimized to {} chunks for {}",
            optimized.len(),
            parsed.file_path
        );
        Ok(optimized)
    }
}

/// Chunk size distribution and quality report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkingStats {
    pub total_chunks: usize,
    pub total_lines: usize,
    pub min_size: usize,
    pub max_size: usize,
    /// Chunks under the configured minimum
    pub under_min: usize,
    /// Chunks over the configured maximum
    pub over_max: usize,
    /// Chunks inside the configured band
    pub optimal: usize,
    pub merged_chunks: usize,
    pub expanded_chunks: usize,
    pub ecs_components: usize,
    pub ecs_systems: usize,
    pub by_kind: BTreeMap<ChunkKind, usize>,
}

impl ChunkingStats {
    /// Compute the distribution of a chunk stream against a size band
    #[must_use]
    pub fn analyze(chunks: &[Chunk], config: &OptimizerConfig) -> Self {
        let mut stats = Self::default();

        for chunk in chunks {
            let size = chunk.line_count();
            stats.total_chunks += 1;
            stats.total_lines += size;
            stats.min_size = if stats.min_size == 0 {
                size
            } else {
                stats.min_size.min(size)
            };
            stats.max_size = stats.max_size.max(size);
            *stats.by_kind.entry(chunk.kind).or_insert(0) += 1;

            if size < config.min_lines {
                stats.under_min += 1;
            } else if size > config.max_lines {
                stats.over_max += 1;
            } else {
                stats.optimal += 1;
            }

            if chunk.semantic_labels.contains("merged_chunk") {
                stats.merged_chunks += 1;
            }
            if chunk.semantic_labels.contains("expanded_context") {
                stats.expanded_chunks += 1;
            }
            if chunk.ecs_component {
                stats.ecs_components += 1;
            }
            if chunk.ecs_system {
                stats.ecs_systems += 1;
            }
        }

        stats
    }

    /// Mean chunk size in lines
    #[must_use]
    pub fn average_lines(&self) -> f64 {
        if self.total_chunks == 0 {
            return 0.0;
        }
        self.total_lines as f64 / self.total_chunks as f64
    }
}

impl std::fmt::Display for ChunkingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} chunks, {} lines (avg {:.1})",
            self.total_chunks,
            self.total_lines,
            self.average_lines()
        )?;
        writeln!(
            f,
            "  sizes {}..{} (under: {}, optimal: {}, over: {})",
            self.min_size, self.max_size, self.under_min, self.optimal, self.over_max
        )?;
        writeln!(
            f,
            "  merged: {}, expanded: {}",
            self.merged_chunks, self.expanded_chunks
        )?;
        writeln!(
            f,
            "  ecs components: {}, ecs systems: {}",
            self.ecs_components, self.ecs_systems
        )?;
        for (kind, count) in &self.by_kind {
            writeln!(f, "  {kind}: {count}")?;
        }
        Ok(())
    }
}
