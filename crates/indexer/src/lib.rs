//! Batch project indexing.
//!
//! Walks a project tree, chunks every supported source file on a bounded
//! blocking worker pool, and embeds the results into a vector store.
//! Per-file failures are collected, not fatal.
//!
//! # Example
//!
//! ```no_run
//! use iwsdk_indexer::ProjectIndexer;
//! use iwsdk_vector_store::{HashEmbedder, VectorStore};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = VectorStore::new(HashEmbedder::default());
//! let stats = ProjectIndexer::new("iwsdk")
//!     .index("path/to/project", &mut store)
//!     .await?;
//! println!("{stats}");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod indexer;
pub mod scanner;
pub mod stats;

pub use error::{IndexerError, Result};
pub use indexer::ProjectIndexer;
pub use scanner::FileScanner;
pub use stats::IndexStats;
