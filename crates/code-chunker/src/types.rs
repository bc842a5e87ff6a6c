use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kind of declaration a chunk was extracted from
///
/// The `*Group` variants mark merge products built by the size optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    Class,
    Function,
    Interface,
    Type,
    Component,
    System,
    ClassGroup,
    FunctionGroup,
    InterfaceGroup,
    TypeGroup,
    ComponentGroup,
    SystemGroup,
}

impl ChunkKind {
    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Function => "function",
            Self::Interface => "interface",
            Self::Type => "type",
            Self::Component => "component",
            Self::System => "system",
            Self::ClassGroup => "class_group",
            Self::FunctionGroup => "function_group",
            Self::InterfaceGroup => "interface_group",
            Self::TypeGroup => "type_group",
            Self::ComponentGroup => "component_group",
            Self::SystemGroup => "system_group",
        }
    }

    /// Map a kind to the kind of its merge product
    #[must_use]
    pub const fn grouped(self) -> Self {
        match self {
            Self::Class | Self::ClassGroup => Self::ClassGroup,
            Self::Function | Self::FunctionGroup => Self::FunctionGroup,
            Self::Interface | Self::InterfaceGroup => Self::InterfaceGroup,
            Self::Type | Self::TypeGroup => Self::TypeGroup,
            Self::Component | Self::ComponentGroup => Self::ComponentGroup,
            Self::System | Self::SystemGroup => Self::SystemGroup,
        }
    }

    /// Interfaces and type aliases are freely mergeable with each other
    #[must_use]
    pub const fn is_type_like(self) -> bool {
        matches!(self, Self::Interface | Self::Type)
    }
}

impl std::fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A retrievable unit of source text plus extracted metadata
///
/// Created by the extractor, annotated by the pattern detector, then either
/// passed through, merged, or expanded by the size optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Exact source text for the chunk's line range
    pub content: String,

    /// Declaration kind (or merge-product kind)
    pub kind: ChunkKind,

    /// Declaration name; sentinel value when the AST has no name field
    pub name: String,

    /// Start line (1-indexed, inclusive)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// Source file path
    pub file_path: String,

    /// Source language
    pub language: Language,

    /// Enclosing class name, when the chunk is a method
    #[serde(default)]
    pub class_name: Option<String>,

    /// Import statements of the originating file, in document order
    #[serde(default)]
    pub imports: Vec<String>,

    /// Inheritance targets (base classes, parent interfaces)
    #[serde(default)]
    pub extends: BTreeSet<String>,

    /// Implemented interfaces
    #[serde(default)]
    pub implements: BTreeSet<String>,

    /// Callee texts of call expressions inside the chunk
    #[serde(default)]
    pub calls: BTreeSet<String>,

    /// Referenced type names
    #[serde(default)]
    pub uses_types: BTreeSet<String>,

    /// WebXR API tokens found in the content
    #[serde(default)]
    pub webxr_api_usage: BTreeSet<String>,

    /// Three.js tokens found in the content
    #[serde(default)]
    pub three_js_usage: BTreeSet<String>,

    /// Chunk declares an ECS component
    #[serde(default)]
    pub ecs_component: bool,

    /// Chunk declares an ECS system
    #[serde(default)]
    pub ecs_system: bool,

    /// Free-form tags added by detection and optimization passes
    #[serde(default)]
    pub semantic_labels: BTreeSet<String>,

    /// Names of the original chunks a merge product was built from
    #[serde(default)]
    pub merged_from: Vec<String>,

    /// Number of inputs consumed by a merge (0 for unmerged chunks)
    #[serde(default)]
    pub merged_count: usize,
}

impl Chunk {
    /// Create a new chunk with empty relationship metadata
    #[must_use]
    pub fn new(
        kind: ChunkKind,
        name: impl Into<String>,
        content: impl Into<String>,
        start_line: usize,
        end_line: usize,
        file_path: impl Into<String>,
        language: Language,
    ) -> Self {
        Self {
            content: content.into(),
            kind,
            name: name.into(),
            start_line,
            end_line,
            file_path: file_path.into(),
            language,
            class_name: None,
            imports: Vec::new(),
            extends: BTreeSet::new(),
            implements: BTreeSet::new(),
            calls: BTreeSet::new(),
            uses_types: BTreeSet::new(),
            webxr_api_usage: BTreeSet::new(),
            three_js_usage: BTreeSet::new(),
            ecs_component: false,
            ecs_system: false,
            semantic_labels: BTreeSet::new(),
            merged_from: Vec::new(),
            merged_count: 0,
        }
    }

    /// Get the number of lines in this chunk
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Check if chunk contains a specific line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}
