//! Project file discovery.

use crate::error::{IndexerError, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Extensions the chunker can parse
const SUPPORTED_EXTENSIONS: [&str; 4] = ["ts", "tsx", "js", "jsx"];

/// Gitignore-aware scanner for chunkable source files
pub struct FileScanner {
    root: PathBuf,
}

impl FileScanner {
    /// Create a scanner rooted at a project directory
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(IndexerError::invalid_path(root.display().to_string()));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Walk the project and collect supported source files, sorted for
    /// deterministic batch order
    ///
    /// Respects `.gitignore` and skips hidden directories, so `node_modules`
    /// checked into ignore files and dot-directories never reach the parser.
    #[must_use]
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkBuilder::new(&self.root)
            .hidden(true)
            .git_ignore(true)
            // Honor .gitignore files even when the tree is not a git checkout.
            .require_git(false)
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {e}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(ignore::DirEntry::into_path)
            .filter(|path| is_supported(path))
            .collect();

        files.sort();
        files
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
}
