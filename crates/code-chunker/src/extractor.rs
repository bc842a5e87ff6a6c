//! Structural chunk extraction: one chunk per matched declaration.
//!
//! A declaration missing an expected field degrades to a sentinel name;
//! extraction of one declaration never aborts its siblings.

use crate::detector;
use crate::node_finder::{find_nodes_by_kind, find_top_level, node_text, optional_node_text};
use crate::parser::ParsedSource;
use crate::types::{Chunk, ChunkKind};
use tree_sitter::Node;

/// Factory callee substrings that declare ECS entities
const COMPONENT_FACTORY: &str = "createComponent";
const SYSTEM_FACTORY: &str = "createSystem";

/// Extracts chunks from a parsed source file
pub struct ChunkExtractor<'a> {
    src: &'a ParsedSource,
}

impl<'a> ChunkExtractor<'a> {
    #[must_use]
    pub fn new(src: &'a ParsedSource) -> Self {
        Self { src }
    }

    /// Extract one chunk per class, top-level function, interface, type
    /// alias, and factory-created ECS entity
    #[must_use]
    pub fn extract(&self) -> Vec<Chunk> {
        let root = self.src.root();
        let imports = self.extract_imports(root);

        let mut chunks = Vec::new();

        for node in find_nodes_by_kind(root, "class_declaration") {
            chunks.push(self.parse_class(node, &imports));
        }

        for node in find_top_level(root, &["function_declaration", "function"]) {
            chunks.push(self.parse_function(node, &imports));
        }

        for node in find_nodes_by_kind(root, "interface_declaration") {
            chunks.push(self.parse_interface(node));
        }

        for node in find_nodes_by_kind(root, "type_alias_declaration") {
            chunks.push(self.parse_type_alias(node));
        }

        chunks.extend(self.extract_factory_entities(root, &imports));

        log::debug!(
            "Extracted {} chunks from {}",
            chunks.len(),
            self.src.file_path
        );

        chunks
    }

    /// All import statements of the file, in document order
    fn extract_imports(&self, root: Node<'_>) -> Vec<String> {
        find_nodes_by_kind(root, "import_statement")
            .into_iter()
            .map(|node| node_text(node, &self.src.source))
            .collect()
    }

    fn parse_class(&self, class_node: Node<'_>, imports: &[String]) -> Chunk {
        let name = self.named_field(class_node, "UnknownClass");

        let mut chunk = self.base_chunk(ChunkKind::Class, name, class_node);
        chunk.imports = imports.to_vec();

        self.resolve_heritage(class_node, &mut chunk);

        chunk
    }

    /// Walk the class's heritage clause to recover inheritance targets
    ///
    /// The TypeScript grammar wraps targets in `extends_clause` /
    /// `implements_clause` under `class_heritage`; the JavaScript grammar
    /// puts the extended expression directly under `class_heritage`. Both
    /// shapes are covered.
    fn resolve_heritage(&self, class_node: Node<'_>, chunk: &mut Chunk) {
        for heritage in find_nodes_by_kind(class_node, "class_heritage") {
            for clause in find_nodes_by_kind(heritage, "extends_clause") {
                self.collect_extends_targets(clause, chunk);
            }
            self.collect_extends_targets(heritage, chunk);

            for clause in find_nodes_by_kind(heritage, "implements_clause") {
                for ty in find_nodes_by_kind(clause, "type_identifier") {
                    chunk.implements.insert(node_text(ty, &self.src.source));
                }
            }
        }
    }

    fn collect_extends_targets(&self, clause: Node<'_>, chunk: &mut Chunk) {
        let mut cursor = clause.walk();
        let children: Vec<_> = clause.children(&mut cursor).collect();

        for child in children {
            match child.kind() {
                // Plain base: `class Foo extends Bar`
                "identifier" | "type_identifier" => {
                    chunk.extends.insert(node_text(child, &self.src.source));
                }
                // Factory-wrapped base: `class Foo extends createSystem(Base)`
                // records the callee, not the full call.
                "call_expression" => {
                    if let Some(callee) = child.child_by_field_name("function") {
                        chunk.extends.insert(node_text(callee, &self.src.source));
                    }
                }
                // Qualified base: `class Foo extends Three.Group` keeps the
                // full qualified text.
                "member_expression" => {
                    chunk.extends.insert(node_text(child, &self.src.source));
                }
                _ => {}
            }
        }
    }

    fn parse_function(&self, func_node: Node<'_>, imports: &[String]) -> Chunk {
        let name = self.named_field(func_node, "anonymous");

        let mut chunk = self.base_chunk(ChunkKind::Function, name, func_node);
        chunk.imports = imports.to_vec();
        chunk.calls = detector::extract_calls(func_node, &self.src.source);

        chunk
    }

    fn parse_interface(&self, interface_node: Node<'_>) -> Chunk {
        let name = self.named_field(interface_node, "UnknownInterface");

        let mut chunk = self.base_chunk(ChunkKind::Interface, name, interface_node);

        // Interfaces extending other interfaces contribute to `extends`.
        for clause in find_nodes_by_kind(interface_node, "extends_type_clause") {
            for ty in find_nodes_by_kind(clause, "type_identifier") {
                chunk.extends.insert(node_text(ty, &self.src.source));
            }
        }

        chunk
    }

    fn parse_type_alias(&self, type_node: Node<'_>) -> Chunk {
        let name = self.named_field(type_node, "UnknownType");
        self.base_chunk(ChunkKind::Type, name, type_node)
    }

    /// Extract ECS entities declared through `createComponent` /
    /// `createSystem` factory calls on top-level variable declarations
    fn extract_factory_entities(&self, root: Node<'_>, imports: &[String]) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for declaration in find_nodes_by_kind(root, "lexical_declaration") {
            for declarator in find_nodes_by_kind(declaration, "variable_declarator") {
                let Some(name_node) = declarator.child_by_field_name("name") else {
                    continue;
                };
                let Some(value) = declarator.child_by_field_name("value") else {
                    continue;
                };
                if value.kind() != "call_expression" {
                    continue;
                }
                let Some(callee) = value.child_by_field_name("function") else {
                    continue;
                };

                let callee_text = node_text(callee, &self.src.source);
                let is_component = callee_text.contains(COMPONENT_FACTORY);
                let is_system = callee_text.contains(SYSTEM_FACTORY);
                if !is_component && !is_system {
                    continue;
                }

                // Exported declarations keep the export statement as content.
                let content_node = match declaration.parent() {
                    Some(parent) if parent.kind() == "export_statement" => parent,
                    _ => declaration,
                };

                let kind = if is_component {
                    ChunkKind::Component
                } else {
                    ChunkKind::System
                };
                let name = node_text(name_node, &self.src.source);

                let mut chunk = self.base_chunk(kind, name, content_node);
                chunk.imports = imports.to_vec();

                if is_component {
                    chunk.ecs_component = true;
                    chunk.semantic_labels.insert("ecs_component".to_string());
                    chunk.extends.insert("Component".to_string());
                } else {
                    chunk.ecs_system = true;
                    chunk.semantic_labels.insert("ecs_system".to_string());
                    chunk.extends.insert("System".to_string());
                }

                chunk.calls = detector::extract_calls(value, &self.src.source);

                chunks.push(chunk);
            }
        }

        chunks
    }

    /// Build a chunk from a node's full text and line span
    fn base_chunk(&self, kind: ChunkKind, name: String, node: Node<'_>) -> Chunk {
        Chunk::new(
            kind,
            name,
            node_text(node, &self.src.source),
            node.start_position().row + 1,
            node.end_position().row + 1,
            self.src.file_path.clone(),
            self.src.language,
        )
    }

    /// Text of the node's `name` field, or the sentinel when absent
    fn named_field(&self, node: Node<'_>, sentinel: &str) -> String {
        let text = optional_node_text(node.child_by_field_name("name"), &self.src.source);
        if text.is_empty() {
            sentinel.to_string()
        } else {
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SourceParser;

    fn extract(code: &str, path: &str) -> Vec<Chunk> {
        let parsed = SourceParser::new()
            .unwrap()
            .parse_source(code.as_bytes().to_vec(), path)
            .unwrap();
        ChunkExtractor::new(&parsed).extract()
    }

    fn extract_ts(code: &str) -> Vec<Chunk> {
        extract(code, "test.ts")
    }

    #[test]
    fn test_class_simple_extends() {
        let chunks = extract_ts("class Foo extends Bar {}\n");
        let class = &chunks[0];
        assert_eq!(class.kind, ChunkKind::Class);
        assert_eq!(class.name, "Foo");
        assert!(class.extends.contains("Bar"));
        assert_eq!(class.extends.len(), 1);
    }

    #[test]
    fn test_class_factory_extends_records_callee() {
        let chunks = extract_ts("class Foo extends createSystem(Base) {}\n");
        let class = &chunks[0];
        assert!(class.extends.contains("createSystem"));
        assert_eq!(class.extends.len(), 1);
    }

    #[test]
    fn test_class_member_extends_keeps_qualified_text() {
        let chunks = extract_ts("class Foo extends Three.Group {}\n");
        let class = &chunks[0];
        assert!(class.extends.contains("Three.Group"));
        assert_eq!(class.extends.len(), 1);
    }

    #[test]
    fn test_class_implements() {
        let chunks = extract_ts("class Foo implements Disposable, Updatable {}\n");
        let class = &chunks[0];
        assert!(class.implements.contains("Disposable"));
        assert!(class.implements.contains("Updatable"));
    }

    #[test]
    fn test_javascript_class_extends() {
        let chunks = extract("class Foo extends Bar {}\n", "test.js");
        let class = &chunks[0];
        assert!(class.extends.contains("Bar"));
        assert_eq!(class.extends.len(), 1);
    }

    #[test]
    fn test_function_name_and_calls() {
        let chunks = extract_ts("function setup() {\n  init();\n  configure();\n}\n");
        let func = &chunks[0];
        assert_eq!(func.kind, ChunkKind::Function);
        assert_eq!(func.name, "setup");
        assert!(func.calls.contains("init"));
        assert!(func.calls.contains("configure"));
    }

    #[test]
    fn test_exported_function_unwrapped() {
        let chunks = extract_ts("export function visible() {}\n");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].name, "visible");
    }

    #[test]
    fn test_interface_extends() {
        let chunks = extract_ts("interface Child extends Parent, Other {\n  x: number;\n}\n");
        let iface = &chunks[0];
        assert_eq!(iface.kind, ChunkKind::Interface);
        assert_eq!(iface.name, "Child");
        assert!(iface.extends.contains("Parent"));
        assert!(iface.extends.contains("Other"));
    }

    #[test]
    fn test_type_alias() {
        let chunks = extract_ts("type Vec3 = [number, number, number];\n");
        let alias = &chunks[0];
        assert_eq!(alias.kind, ChunkKind::Type);
        assert_eq!(alias.name, "Vec3");
        assert!(alias.extends.is_empty());
        assert!(alias.calls.is_empty());
    }

    #[test]
    fn test_factory_component() {
        let chunks =
            extract_ts("export const Position = createComponent({ x: 0, y: 0, z: 0 });\n");
        let component = &chunks[0];
        assert_eq!(component.kind, ChunkKind::Component);
        assert_eq!(component.name, "Position");
        assert!(component.ecs_component);
        assert!(component.extends.contains("Component"));
        assert!(component.semantic_labels.contains("ecs_component"));
        // Exported declaration keeps the export statement text.
        assert!(component.content.starts_with("export const"));
        assert!(component.calls.contains("createComponent"));
    }

    #[test]
    fn test_factory_system_unexported() {
        let chunks = extract_ts("const Physics = createSystem([Position], step);\n");
        let system = &chunks[0];
        assert_eq!(system.kind, ChunkKind::System);
        assert!(system.ecs_system);
        assert!(system.extends.contains("System"));
        assert!(system.content.starts_with("const Physics"));
    }

    #[test]
    fn test_plain_const_is_not_a_factory_chunk() {
        let chunks = extract_ts("const answer = compute(42);\nconst other = 7;\n");
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_imports_copied_onto_chunks() {
        let code = "import { System } from 'elics';\nimport * as THREE from 'three';\n\nclass Render extends System {}\n";
        let chunks = extract_ts(code);
        let class = &chunks[0];
        assert_eq!(class.imports.len(), 2);
        assert!(class.imports[0].contains("elics"));
        assert!(class.imports[1].contains("three"));
    }

    #[test]
    fn test_line_spans_are_one_based() {
        let chunks = extract_ts("\n\nclass Foo {\n  bar() {}\n}\n");
        let class = &chunks[0];
        assert_eq!(class.start_line, 3);
        assert_eq!(class.end_line, 5);
    }

    #[test]
    fn test_broken_sibling_does_not_abort_extraction() {
        // The first declaration is syntactically incomplete; error recovery
        // may absorb the statement right after it, but extraction must still
        // reach the declarations beyond the damage.
        let chunks = extract_ts("const broken = ;\nclass Ok {}\nfunction fine() {}\n");
        assert!(chunks.iter().any(|c| c.name == "fine"));
    }
}
