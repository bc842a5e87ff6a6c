use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Source language handled by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    JavaScript,
}

impl Language {
    /// Detect language from file extension
    ///
    /// Only the four extensions the ingestion pipeline supports are accepted;
    /// anything else is an `UnsupportedExtension` error.
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_lowercase().as_str() {
            "ts" | "tsx" => Ok(Language::TypeScript),
            "js" | "jsx" => Ok(Language::JavaScript),
            other => Err(ChunkerError::unsupported_extension(other)),
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| ChunkerError::unsupported_extension("<none>"))?;
        Self::from_extension(ext)
    }

    /// Get language name as string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("ts").unwrap(), Language::TypeScript);
        assert_eq!(Language::from_extension("TSX").unwrap(), Language::TypeScript);
        assert_eq!(Language::from_extension("js").unwrap(), Language::JavaScript);
        assert_eq!(Language::from_extension("jsx").unwrap(), Language::JavaScript);
        assert!(Language::from_extension("py").is_err());
        assert!(Language::from_extension("rs").is_err());
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            Language::from_path("src/ecs/system.ts").unwrap(),
            Language::TypeScript
        );
        assert_eq!(Language::from_path("index.jsx").unwrap(), Language::JavaScript);
        assert!(Language::from_path("no_extension").is_err());
        assert!(Language::from_path("style.css").is_err());
    }

    #[test]
    fn test_as_str() {
        assert_eq!(Language::TypeScript.as_str(), "typescript");
        assert_eq!(Language::JavaScript.as_str(), "javascript");
    }
}
