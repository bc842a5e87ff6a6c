use crate::error::{ChunkerError, Result};
use crate::language::Language;
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// A parsed source file: the syntax tree plus the raw bytes it indexes into
///
/// The source is kept as bytes, not decoded text, so node byte offsets slice
/// the buffer exactly.
pub struct ParsedSource {
    tree: Tree,
    pub source: Vec<u8>,
    pub language: Language,
    pub file_path: String,
}

impl ParsedSource {
    /// Root node of the syntax tree
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Total number of lines in the file
    #[must_use]
    pub fn total_lines(&self) -> usize {
        self.source.split(|&b| b == b'\n').count()
    }
}

/// Grammar adapter: selects a concrete-syntax grammar by file extension
///
/// Owns one long-lived tree-sitter parser per grammar. Parsers are stateful
/// and must not be shared across threads; a parallel driver owns one
/// `SourceParser` per worker.
pub struct SourceParser {
    typescript: Parser,
    tsx: Parser,
    javascript: Parser,
}

impl SourceParser {
    /// Create parsers for all supported grammars
    pub fn new() -> Result<Self> {
        Ok(Self {
            typescript: make_parser(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())?,
            tsx: make_parser(tree_sitter_typescript::LANGUAGE_TSX.into())?,
            javascript: make_parser(tree_sitter_javascript::LANGUAGE.into())?,
        })
    }

    /// Read and parse a source file
    ///
    /// Fails with `UnsupportedExtension` for files outside
    /// `.ts/.tsx/.js/.jsx`, and `FileNotFound` for missing files.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<ParsedSource> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ChunkerError::FileNotFound(path.display().to_string()));
        }

        let source = std::fs::read(path)?;
        let file_path = path.display().to_string();
        self.parse_source(source, &file_path)
    }

    /// Parse an in-memory buffer, selecting the grammar from the path
    pub fn parse_source(&mut self, source: Vec<u8>, file_path: &str) -> Result<ParsedSource> {
        let language = Language::from_path(file_path)?;

        let ext = Path::new(file_path)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_lowercase();

        // TSX needs its own grammar variant but still reports as TypeScript.
        let parser = match ext.as_str() {
            "ts" => &mut self.typescript,
            "tsx" => &mut self.tsx,
            "js" | "jsx" => &mut self.javascript,
            other => return Err(ChunkerError::unsupported_extension(other)),
        };

        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| ChunkerError::parse(format!("Failed to parse {file_path}")))?;

        Ok(ParsedSource {
            tree,
            source,
            language,
            file_path: file_path.to_string(),
        })
    }
}

fn make_parser(language: tree_sitter::Language) -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| ChunkerError::tree_sitter(format!("Failed to set language: {e}")))?;
    Ok(parser)
}
