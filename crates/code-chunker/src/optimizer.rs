//! Chunk size optimization: merge, expand, or label chunks so line counts
//! land inside the configured band.
//!
//! Per file, every input chunk is accounted for exactly once: consumed by
//! exactly one merge, expanded, or passed through. Any shortfall is an
//! internal-consistency defect and is reported, never silently dropped.

use crate::config::OptimizerConfig;
use crate::types::Chunk;
use std::collections::HashSet;

/// Lifecycle method prefixes that make two same-kind neighbors related
const LIFECYCLE_PREFIXES: [&str; 6] = ["on", "handle", "init", "update", "cleanup", "destroy"];

/// Result of optimizing one file's chunk list
///
/// `provenance[i]` holds the input indices (into the sorted per-file input)
/// that produced output chunk `i`. `unconsumed` is non-empty only when the
/// accounting invariant was violated.
#[derive(Debug)]
pub struct FileOutcome {
    pub chunks: Vec<Chunk>,
    pub provenance: Vec<Vec<usize>>,
    pub unconsumed: Vec<usize>,
}

impl FileOutcome {
    /// True when every input chunk was consumed exactly once
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unconsumed.is_empty()
    }
}

/// Post-processes extracted chunks into a size-normalized stream
pub struct SizeOptimizer {
    config: OptimizerConfig,
}

impl SizeOptimizer {
    /// Create a new optimizer; the configuration must already be validated
    #[must_use]
    pub const fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Optimize a mixed-file chunk list
    ///
    /// Chunks are grouped by file and sorted ascending by start line; order
    /// within a file is a correctness requirement for the merge-direction
    /// heuristics. Consistency violations are logged at error level.
    #[must_use]
    pub fn optimize(&self, chunks: Vec<Chunk>) -> Vec<Chunk> {
        let mut optimized = Vec::with_capacity(chunks.len());

        for file_chunks in group_by_file(chunks) {
            let file_path = file_chunks
                .first()
                .map(|c| c.file_path.clone())
                .unwrap_or_default();

            let outcome = self.optimize_file(file_chunks);
            if !outcome.is_complete() {
                log::error!(
                    "Optimizer consistency violation in {}: unconsumed input indices {:?}",
                    file_path,
                    outcome.unconsumed
                );
            }

            optimized.extend(outcome.chunks);
        }

        optimized
    }

    /// Optimize the chunks of a single file
    ///
    /// Input must be sorted ascending by `start_line`; `optimize` guarantees
    /// this, direct callers must too.
    #[must_use]
    pub fn optimize_file(&self, chunks: Vec<Chunk>) -> FileOutcome {
        let mut out = Vec::with_capacity(chunks.len());
        let mut provenance = Vec::with_capacity(chunks.len());
        let mut consumed: HashSet<usize> = HashSet::new();

        for i in 0..chunks.len() {
            if consumed.contains(&i) {
                continue;
            }

            let size = chunks[i].line_count();

            if size < self.config.min_lines {
                if let Some((merged, a, b)) = self.try_merge_small_chunk(&chunks, i, &consumed) {
                    out.push(merged);
                    provenance.push(vec![a, b]);
                    consumed.insert(a);
                    consumed.insert(b);
                } else {
                    out.push(self.expand_with_context(chunks[i].clone()));
                    provenance.push(vec![i]);
                    consumed.insert(i);
                }
            } else if size > self.config.max_lines {
                // No recursive splitting; oversized chunks pass through with
                // a warning label only.
                let mut chunk = chunks[i].clone();
                chunk.semantic_labels.insert("large_chunk".to_string());
                out.push(chunk);
                provenance.push(vec![i]);
                consumed.insert(i);
            } else {
                out.push(chunks[i].clone());
                provenance.push(vec![i]);
                consumed.insert(i);
            }
        }

        let unconsumed: Vec<usize> = (0..chunks.len()).filter(|i| !consumed.contains(i)).collect();

        FileOutcome {
            chunks: out,
            provenance,
            unconsumed,
        }
    }

    /// Try to merge an undersized chunk with a related neighbor, preferring
    /// the next chunk over the previous one
    ///
    /// Returns the merged chunk and the two consumed indices on success.
    fn try_merge_small_chunk(
        &self,
        chunks: &[Chunk],
        index: usize,
        consumed: &HashSet<usize>,
    ) -> Option<(Chunk, usize, usize)> {
        let current = &chunks[index];

        if index + 1 < chunks.len() && !consumed.contains(&(index + 1)) {
            let next = &chunks[index + 1];
            if self.should_merge(current, next) {
                return Some((self.merge_chunks(current, next), index, index + 1));
            }
        }

        if index > 0 && !consumed.contains(&(index - 1)) {
            let prev = &chunks[index - 1];
            if self.should_merge(prev, current) {
                return Some((self.merge_chunks(prev, current), index - 1, index));
            }
        }

        None
    }

    /// Merge eligibility for an ordered pair `(a, b)` with `a` before `b`
    fn should_merge(&self, a: &Chunk, b: &Chunk) -> bool {
        if a.file_path != b.file_path {
            return false;
        }

        let gap = b.start_line as i64 - a.end_line as i64;
        if gap > self.config.max_merge_gap as i64 {
            return false;
        }

        let combined = b.end_line.max(a.end_line).saturating_sub(a.start_line) + 1;
        if combined > self.config.max_lines {
            return false;
        }

        if a.kind == b.kind {
            if are_related_names(&a.name, &b.name) {
                return true;
            }

            // Methods of the same enclosing class belong together.
            if a.class_name.is_some() && a.class_name == b.class_name {
                return true;
            }
        }

        // Interfaces and type aliases merge freely with each other.
        a.kind.is_type_like() && b.kind.is_type_like()
    }

    /// Build the merge product of two chunks
    ///
    /// Content is re-sliced from the file; every relationship set is a union,
    /// every flag an OR. Falls back to concatenating the existing contents
    /// when the file cannot be re-read.
    fn merge_chunks(&self, a: &Chunk, b: &Chunk) -> Chunk {
        let (first, second) = if a.start_line <= b.start_line {
            (a, b)
        } else {
            (b, a)
        };

        let start_line = first.start_line.min(second.start_line);
        let end_line = first.end_line.max(second.end_line);

        let content = match slice_file_lines(&first.file_path, start_line, end_line) {
            Some(content) => content,
            None => {
                log::warn!(
                    "Could not re-read {} for merge; concatenating chunk contents",
                    first.file_path
                );
                format!("{}\n{}", first.content, second.content)
            }
        };

        let mut merged = Chunk::new(
            first.kind.grouped(),
            format!("{}_and_{}", first.name, second.name),
            content,
            start_line,
            end_line,
            first.file_path.clone(),
            first.language,
        );

        merged.imports = union_ordered(&first.imports, &second.imports);
        merged.extends = first.extends.union(&second.extends).cloned().collect();
        merged.implements = first
            .implements
            .union(&second.implements)
            .cloned()
            .collect();
        merged.calls = first.calls.union(&second.calls).cloned().collect();
        merged.uses_types = first
            .uses_types
            .union(&second.uses_types)
            .cloned()
            .collect();
        merged.webxr_api_usage = first
            .webxr_api_usage
            .union(&second.webxr_api_usage)
            .cloned()
            .collect();
        merged.three_js_usage = first
            .three_js_usage
            .union(&second.three_js_usage)
            .cloned()
            .collect();

        merged.ecs_component = first.ecs_component || second.ecs_component;
        merged.ecs_system = first.ecs_system || second.ecs_system;

        merged.semantic_labels = first
            .semantic_labels
            .union(&second.semantic_labels)
            .cloned()
            .collect();
        merged.semantic_labels.insert("merged_chunk".to_string());

        if first.class_name == second.class_name {
            merged.class_name = first.class_name.clone();
        }

        merged.merged_from = vec![first.name.clone(), second.name.clone()];
        merged.merged_count = 2;

        merged
    }

    /// Widen an unmergeable undersized chunk with surrounding file context
    ///
    /// On a read failure the chunk is returned unchanged; staying under the
    /// minimum is preferable to fabricating context.
    fn expand_with_context(&self, chunk: Chunk) -> Chunk {
        let lines = match std::fs::read_to_string(&chunk.file_path) {
            Ok(text) => text.lines().map(str::to_string).collect::<Vec<_>>(),
            Err(e) => {
                log::warn!("Could not expand chunk {}: {e}", chunk.name);
                return chunk;
            }
        };

        let total_lines = lines.len();
        // The file changed underneath us; keep the chunk as extracted.
        if chunk.end_line > total_lines {
            log::warn!(
                "File {} shrank below chunk {}; skipping expansion",
                chunk.file_path,
                chunk.name
            );
            return chunk;
        }

        let needed = self.config.min_lines.saturating_sub(chunk.line_count());
        let expand_before = needed / 2;
        let expand_after = needed - expand_before;

        let new_start = chunk.start_line.saturating_sub(expand_before).max(1);
        let new_end = (chunk.end_line + expand_after).min(total_lines);

        let content = lines[new_start - 1..new_end].join("\n");

        let mut expanded = chunk;
        expanded.content = content;
        expanded.start_line = new_start;
        expanded.end_line = new_end;
        expanded
            .semantic_labels
            .insert("expanded_context".to_string());

        expanded
    }
}

/// Group chunks by file, preserving first-seen file order, each group sorted
/// ascending by start line
fn group_by_file(chunks: Vec<Chunk>) -> Vec<Vec<Chunk>> {
    let mut groups: Vec<Vec<Chunk>> = Vec::new();
    let mut index_by_file: std::collections::HashMap<String, usize> =
        std::collections::HashMap::new();

    for chunk in chunks {
        match index_by_file.get(&chunk.file_path) {
            Some(&idx) => groups[idx].push(chunk),
            None => {
                index_by_file.insert(chunk.file_path.clone(), groups.len());
                groups.push(vec![chunk]);
            }
        }
    }

    for group in &mut groups {
        group.sort_by_key(|c| (c.start_line, c.end_line));
    }

    groups
}

/// Check whether two declaration names indicate related functionality
///
/// Getter/setter pairs (same suffix after a `get`/`set` prefix) and shared
/// lifecycle prefixes count as related.
fn are_related_names(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    match (a.strip_prefix("get"), b.strip_prefix("set")) {
        (Some(rest_a), Some(rest_b)) if rest_a == rest_b => return true,
        _ => {}
    }
    match (a.strip_prefix("set"), b.strip_prefix("get")) {
        (Some(rest_a), Some(rest_b)) if rest_a == rest_b => return true,
        _ => {}
    }

    LIFECYCLE_PREFIXES
        .iter()
        .any(|prefix| a.starts_with(prefix) && b.starts_with(prefix))
}

/// Re-read a file and slice the inclusive 1-based line range
fn slice_file_lines(path: &str, start_line: usize, end_line: usize) -> Option<String> {
    let text = std::fs::read_to_string(path).ok()?;
    let lines: Vec<&str> = text.lines().collect();

    if start_line == 0 || start_line > lines.len() {
        return None;
    }

    let end = end_line.min(lines.len());
    Some(lines[start_line - 1..end].join("\n"))
}

/// Union of two ordered lists, first list's order winning, duplicates dropped
fn union_ordered(a: &[String], b: &[String]) -> Vec<String> {
    let mut out = a.to_vec();
    for item in b {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}
