//! Traversal limits and configuration

use crate::error::{JapiError, Result};

/// Limits guarding a single serialization pass against runaway object graphs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum typed-object nesting depth (default: 64, hard: 512)
    pub max_depth: usize,
    /// Maximum number of sideloaded resources per document (default: 10,000, hard: 1,000,000)
    pub max_included: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_included: 10_000,
        }
    }
}

impl Limits {
    /// Hard maximum limits that cannot be exceeded
    pub fn hard_maximums() -> Self {
        Self {
            max_depth: 512,
            max_included: 1_000_000,
        }
    }

    /// Validate limits against hard maximums
    pub fn validate(&self) -> Result<()> {
        let hard = Self::hard_maximums();

        if self.max_depth == 0 {
            return Err(JapiError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }

        if self.max_depth > hard.max_depth {
            return Err(JapiError::InvalidConfig(format!(
                "max_depth {} exceeds hard limit {}",
                self.max_depth, hard.max_depth
            )));
        }

        if self.max_included > hard.max_included {
            return Err(JapiError::InvalidConfig(format!(
                "max_included {} exceeds hard limit {}",
                self.max_included, hard.max_included
            )));
        }

        Ok(())
    }
}
