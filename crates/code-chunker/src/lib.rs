//! AST-based code chunking for TypeScript and JavaScript.
//!
//! Splits source files into retrieval-sized chunks along declaration
//! boundaries, extracts relationship metadata (inheritance, calls, type
//! usage), tags ECS and WebXR/Three.js patterns, then normalizes chunk sizes
//! by merging related neighbors and expanding undersized stragglers.
//!
//! # Architecture
//!
//! ```text
//! SourceParser (tree-sitter)
//!        |
//!        v
//! ChunkExtractor ──> detector::annotate ──> SizeOptimizer
//!   classes,          ECS / WebXR /          merge, expand,
//!   functions,        Three.js tags          label oversized
//!   interfaces,
//!   types, factories
//! ```
//!
//! # Example
//!
//! ```no_run
//! use iwsdk_code_chunker::{Chunker, OptimizerConfig};
//!
//! let mut chunker = Chunker::new(OptimizerConfig::default())?;
//! let chunks = chunker.chunk_file("src/systems/grab.ts")?;
//! for chunk in &chunks {
//!     println!("{} {} ({} lines)", chunk.kind, chunk.name, chunk.line_count());
//! }
//! # Ok::<(), iwsdk_code_chunker::ChunkerError>(())
//! ```

pub mod chunker;
pub mod config;
pub mod detector;
pub mod error;
pub mod extractor;
pub mod language;
pub mod node_finder;
pub mod optimizer;
pub mod parser;
pub mod types;

pub use chunker::{Chunker, ChunkingStats};
pub use config::OptimizerConfig;
pub use error::{ChunkerError, Result};
pub use language::Language;
pub use optimizer::{FileOutcome, SizeOptimizer};
pub use parser::{ParsedSource, SourceParser};
pub use types::{Chunk, ChunkKind};
