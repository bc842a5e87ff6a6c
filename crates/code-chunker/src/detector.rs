//! Relationship and domain-pattern detection.
//!
//! Call-graph edges come from targeted sub-tree queries; ECS and framework
//! markers come from literal substring scans of the chunk content. Substring
//! matching has no token-boundary awareness, so a token like `Scene` inside an
//! unrelated identifier still matches; this mirrors the established tagging
//! contract and is a precision limitation, not a correctness one.
//!
//! Each pass is a `Chunk -> Chunk` value transform; no set is ever shared
//! between two logical chunks.

use crate::node_finder::{find_nodes_by_kind, node_text};
use crate::types::{Chunk, ChunkKind};
use std::collections::BTreeSet;
use tree_sitter::Node;

/// WebXR API tokens recorded into `webxr_api_usage`
const WEBXR_APIS: [&str; 8] = [
    "XRSession",
    "XRFrame",
    "XRReferenceSpace",
    "XRViewerPose",
    "XRInputSource",
    "XRHand",
    "requestSession",
    "requestAnimationFrame",
];

/// Three.js tokens recorded into `three_js_usage`
const THREEJS_PATTERNS: [&str; 5] = ["THREE.", "Scene", "Mesh", "Material", "Geometry"];

/// Collect callee texts of every call expression under `node`
///
/// Returned as a set, so repeated calls collapse.
#[must_use]
pub fn extract_calls(node: Node<'_>, source: &[u8]) -> BTreeSet<String> {
    let mut calls = BTreeSet::new();

    for call in find_nodes_by_kind(node, "call_expression") {
        if let Some(callee) = call.child_by_field_name("function") {
            calls.insert(node_text(callee, source));
        }
    }

    calls
}

/// Annotate a chunk with domain markers appropriate for its kind
#[must_use]
pub fn annotate(chunk: Chunk) -> Chunk {
    match chunk.kind {
        ChunkKind::Class => detect_framework_apis(detect_ecs_patterns(chunk)),
        ChunkKind::Function | ChunkKind::Component | ChunkKind::System => {
            detect_framework_apis(chunk)
        }
        // Interfaces and type aliases carry no behavioral patterns.
        _ => chunk,
    }
}

/// Detect ECS component/system patterns from content and inheritance
#[must_use]
pub fn detect_ecs_patterns(mut chunk: Chunk) -> Chunk {
    let content = chunk.content.to_lowercase();

    if content.contains("implements component") || content.contains("extends componentbase") {
        chunk.ecs_component = true;
        chunk.semantic_labels.insert("ecs_component".to_string());
    }

    // Factory-wrapped inheritance lands the callee in `extends`.
    if content.contains("extends system")
        || content.contains("implements isystem")
        || chunk.extends.contains("createSystem")
    {
        chunk.ecs_system = true;
        chunk.semantic_labels.insert("ecs_system".to_string());
    }

    let name = chunk.name.to_lowercase();
    if name.contains("transform") {
        chunk
            .semantic_labels
            .insert("transform_component".to_string());
    } else if name.contains("physics") {
        chunk.semantic_labels.insert("physics_component".to_string());
    }

    chunk
}

/// Detect WebXR and Three.js API usage via literal token scans
#[must_use]
pub fn detect_framework_apis(mut chunk: Chunk) -> Chunk {
    for api in WEBXR_APIS {
        if chunk.content.contains(api) {
            chunk.webxr_api_usage.insert(api.to_string());
            chunk.semantic_labels.insert("webxr_api".to_string());
        }
    }

    for pattern in THREEJS_PATTERNS {
        if chunk.content.contains(pattern) {
            chunk.three_js_usage.insert(pattern.to_string());
            chunk.semantic_labels.insert("threejs_usage".to_string());
        }
    }

    chunk
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::parser::SourceParser;

    fn class_chunk(content: &str) -> Chunk {
        Chunk::new(
            ChunkKind::Class,
            "TestClass",
            content,
            1,
            10,
            "test.ts",
            Language::TypeScript,
        )
    }

    #[test]
    fn test_extract_calls_deduplicates() {
        let parsed = SourceParser::new()
            .unwrap()
            .parse_source(
                b"function f() { init(); init(); this.update(dt); }\n".to_vec(),
                "test.ts",
            )
            .unwrap();
        let calls = extract_calls(parsed.root(), &parsed.source);
        assert!(calls.contains("init"));
        assert!(calls.contains("this.update"));
        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn test_detect_ecs_component_from_content() {
        let chunk = detect_ecs_patterns(class_chunk(
            "class Health implements Component { value = 100; }",
        ));
        assert!(chunk.ecs_component);
        assert!(chunk.semantic_labels.contains("ecs_component"));
        assert!(!chunk.ecs_system);
    }

    #[test]
    fn test_detect_ecs_system_from_extends_metadata() {
        let mut chunk = class_chunk("class Locomotion {}");
        chunk.extends.insert("createSystem".to_string());
        let chunk = detect_ecs_patterns(chunk);
        assert!(chunk.ecs_system);
        assert!(chunk.semantic_labels.contains("ecs_system"));
    }

    #[test]
    fn test_detect_name_heuristics() {
        let mut chunk = class_chunk("class X {}");
        chunk.name = "TransformComponent".to_string();
        let chunk = detect_ecs_patterns(chunk);
        assert!(chunk.semantic_labels.contains("transform_component"));

        let mut chunk = class_chunk("class X {}");
        chunk.name = "PhysicsBody".to_string();
        let chunk = detect_ecs_patterns(chunk);
        assert!(chunk.semantic_labels.contains("physics_component"));
    }

    #[test]
    fn test_detect_webxr_apis() {
        let chunk = detect_framework_apis(class_chunk(
            "const session: XRSession = await navigator.xr.requestSession('immersive-vr');",
        ));
        assert!(chunk.webxr_api_usage.contains("XRSession"));
        assert!(chunk.webxr_api_usage.contains("requestSession"));
        assert!(chunk.semantic_labels.contains("webxr_api"));
    }

    #[test]
    fn test_detect_threejs_substring_limitation() {
        // Literal substring matching: "Scene" inside "SceneGraphCache" matches.
        let chunk = detect_framework_apis(class_chunk("class SceneGraphCache {}"));
        assert!(chunk.three_js_usage.contains("Scene"));
        assert!(chunk.semantic_labels.contains("threejs_usage"));
    }

    #[test]
    fn test_annotate_skips_type_like_chunks() {
        let mut chunk = class_chunk("interface Foo { scene: Scene; }");
        chunk.kind = ChunkKind::Interface;
        let chunk = annotate(chunk);
        assert!(chunk.three_js_usage.is_empty());
        assert!(chunk.semantic_labels.is_empty());
    }
}
