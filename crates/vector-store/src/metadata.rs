//! Stable chunk identifiers and scalar metadata records.
//!
//! Metadata values are restricted to scalars so the record stays portable
//! across vector database backends; relationship sets are comma-joined and
//! capped rather than stored as lists.

use iwsdk_code_chunker::Chunk;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum entries taken from `imports`
const MAX_IMPORTS: usize = 5;

/// Maximum entries taken from `calls`
const MAX_CALLS: usize = 10;

/// Maximum encoded length of any joined string value
const MAX_VALUE_CHARS: usize = 1000;

/// A scalar metadata value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl MetadataValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Metadata record attached to each stored chunk
pub type Metadata = BTreeMap<String, MetadataValue>;

/// Equality filter over metadata records
pub type MetadataFilter = BTreeMap<String, MetadataValue>;

/// File path trimmed to its `src/`-rooted suffix, when one exists
///
/// Keeps identifiers stable across checkouts at different absolute paths.
#[must_use]
pub fn relative_source_path(file_path: &str) -> String {
    let components: Vec<&str> = file_path.split('/').collect();
    match components.iter().position(|c| *c == "src") {
        Some(pos) => components[pos..].join("/"),
        None => file_path.to_string(),
    }
}

/// Build the stable identifier for a chunk
///
/// `index` disambiguates same-named declarations in one file (overloads,
/// merge products).
#[must_use]
pub fn chunk_id(source: &str, chunk: &Chunk, index: usize) -> String {
    format!(
        "{}:{}:{}:{}:L{}:{}",
        source,
        relative_source_path(&chunk.file_path),
        chunk.kind,
        chunk.name,
        chunk.start_line,
        index
    )
}

/// Build the scalar metadata record for a chunk
#[must_use]
pub fn chunk_metadata(chunk: &Chunk, source: &str) -> Metadata {
    let mut metadata = Metadata::new();

    metadata.insert("source".to_string(), source.into());
    metadata.insert("kind".to_string(), chunk.kind.as_str().into());
    metadata.insert("name".to_string(), chunk.name.clone().into());
    metadata.insert(
        "file_path".to_string(),
        relative_source_path(&chunk.file_path).into(),
    );
    metadata.insert("language".to_string(), chunk.language.as_str().into());
    metadata.insert("start_line".to_string(), (chunk.start_line as i64).into());
    metadata.insert("end_line".to_string(), (chunk.end_line as i64).into());
    metadata.insert("size".to_string(), (chunk.line_count() as i64).into());
    metadata.insert("ecs_component".to_string(), chunk.ecs_component.into());
    metadata.insert("ecs_system".to_string(), chunk.ecs_system.into());

    insert_joined(&mut metadata, "extends", chunk.extends.iter().cloned());
    insert_joined(&mut metadata, "implements", chunk.implements.iter().cloned());
    insert_joined(&mut metadata, "calls", chunk.calls.iter().take(MAX_CALLS).cloned());
    insert_joined(
        &mut metadata,
        "imports",
        chunk.imports.iter().take(MAX_IMPORTS).cloned(),
    );
    insert_joined(
        &mut metadata,
        "webxr_apis",
        chunk.webxr_api_usage.iter().cloned(),
    );
    insert_joined(
        &mut metadata,
        "labels",
        chunk.semantic_labels.iter().cloned(),
    );

    if let Some(class_name) = &chunk.class_name {
        metadata.insert("class_name".to_string(), class_name.clone().into());
    }
    if chunk.merged_count > 0 {
        metadata.insert("merged_count".to_string(), (chunk.merged_count as i64).into());
    }

    metadata
}

/// Comma-join values into one capped string entry; empty collections are
/// omitted entirely
fn insert_joined(metadata: &mut Metadata, key: &str, values: impl Iterator<Item = String>) {
    let joined = values.collect::<Vec<_>>().join(",");
    if joined.is_empty() {
        return;
    }

    let capped: String = joined.chars().take(MAX_VALUE_CHARS).collect();
    metadata.insert(key.to_string(), capped.into());
}

#[cfg(test)]
mod tests {
    use super::*;
    use iwsdk_code_chunker::{ChunkKind, Language};
    use pretty_assertions::assert_eq;

    fn sample_chunk() -> Chunk {
        let mut chunk = Chunk::new(
            ChunkKind::Class,
            "GrabSystem",
            "class GrabSystem {}",
            10,
            40,
            "/home/dev/project/src/systems/grab.ts",
            Language::TypeScript,
        );
        chunk.extends.insert("System".to_string());
        chunk.ecs_system = true;
        chunk
    }

    #[test]
    fn test_relative_source_path() {
        assert_eq!(
            relative_source_path("/home/dev/project/src/systems/grab.ts"),
            "src/systems/grab.ts"
        );
        assert_eq!(relative_source_path("scripts/tool.ts"), "scripts/tool.ts");
    }

    #[test]
    fn test_chunk_id_format() {
        let id = chunk_id("iwsdk", &sample_chunk(), 3);
        assert_eq!(id, "iwsdk:src/systems/grab.ts:class:GrabSystem:L10:3");
    }

    #[test]
    fn test_metadata_scalars() {
        let metadata = chunk_metadata(&sample_chunk(), "iwsdk");
        assert_eq!(metadata["kind"], "class".into());
        assert_eq!(metadata["size"], MetadataValue::Int(31));
        assert_eq!(metadata["ecs_system"], MetadataValue::Bool(true));
        assert_eq!(metadata["extends"], "System".into());
        // Empty collections never appear.
        assert!(!metadata.contains_key("implements"));
        assert!(!metadata.contains_key("class_name"));
        assert!(!metadata.contains_key("merged_count"));
    }

    #[test]
    fn test_caps_applied() {
        let mut chunk = sample_chunk();
        for i in 0..20 {
            chunk.imports.push(format!("import {{ x{i} }} from 'm{i}';"));
            chunk.calls.insert(format!("call{i:02}"));
        }

        let metadata = chunk_metadata(&chunk, "iwsdk");
        let imports = metadata["imports"].as_str().unwrap();
        assert_eq!(imports.split(',').count(), 5);

        let calls = metadata["calls"].as_str().unwrap();
        assert_eq!(calls.split(',').count(), 10);
    }

    #[test]
    fn test_long_value_truncated() {
        let mut chunk = sample_chunk();
        chunk.extends.insert("X".repeat(3000));

        let metadata = chunk_metadata(&chunk, "iwsdk");
        assert!(metadata["extends"].as_str().unwrap().chars().count() <= 1000);
    }

    #[test]
    fn test_metadata_value_untagged_json() {
        assert_eq!(
            serde_json::to_string(&MetadataValue::Int(5)).unwrap(),
            "5"
        );
        assert_eq!(
            serde_json::to_string(&MetadataValue::Bool(true)).unwrap(),
            "true"
        );
        assert_eq!(
            serde_json::to_string(&MetadataValue::Str("a".into())).unwrap(),
            "\"a\""
        );
    }
}
