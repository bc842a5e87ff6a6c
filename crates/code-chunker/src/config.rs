use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the chunk size optimizer
///
/// All thresholds are line counts, measured as `end_line - start_line + 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Minimum lines per chunk; smaller chunks get merged or expanded
    pub min_lines: usize,

    /// Maximum lines per chunk; larger chunks are labeled, never split
    pub max_lines: usize,

    /// Ideal chunk size
    pub target_lines: usize,

    /// Maximum line gap between two chunks for them to be merge-eligible
    pub max_merge_gap: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            min_lines: 15,
            max_lines: 100,
            target_lines: 50,
            max_merge_gap: 5,
        }
    }
}

impl OptimizerConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.min_lines > self.target_lines {
            return Err(ChunkerError::invalid_config(format!(
                "min_lines ({}) cannot exceed target_lines ({})",
                self.min_lines, self.target_lines
            )));
        }

        if self.target_lines > self.max_lines {
            return Err(ChunkerError::invalid_config(format!(
                "target_lines ({}) cannot exceed max_lines ({})",
                self.target_lines, self.max_lines
            )));
        }

        if self.max_lines == 0 {
            return Err(ChunkerError::invalid_config("max_lines must be > 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(OptimizerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = OptimizerConfig::default();

        // Invalid: min > target
        config.min_lines = 80;
        config.target_lines = 50;
        assert!(config.validate().is_err());

        // Invalid: target > max
        config.min_lines = 10;
        config.target_lines = 200;
        config.max_lines = 100;
        assert!(config.validate().is_err());

        // Invalid: max = 0
        config.target_lines = 0;
        config.min_lines = 0;
        config.max_lines = 0;
        assert!(config.validate().is_err());

        // Valid configuration
        config.min_lines = 15;
        config.target_lines = 50;
        config.max_lines = 100;
        assert!(config.validate().is_ok());
    }
}
