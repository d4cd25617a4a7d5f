//! Clip metadata collected during the upload flow.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadata validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("Clip title must not be empty")]
    EmptyTitle,
}

/// User-entered clip metadata, immutable once submission begins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipMetadata {
    /// Clip title, required non-empty after trimming whitespace.
    pub title: String,
    /// Whether the clip is visible only to its owner.
    #[serde(default)]
    pub is_private: bool,
    /// Selected category ids.
    #[serde(default)]
    pub category_ids: BTreeSet<String>,
}

impl ClipMetadata {
    /// Validate the metadata for submission.
    pub fn validate(&self) -> Result<(), MetadataError> {
        if self.title.trim().is_empty() {
            return Err(MetadataError::EmptyTitle);
        }
        Ok(())
    }

    /// Title with surrounding whitespace removed, as submitted.
    pub fn trimmed_title(&self) -> &str {
        self.title.trim()
    }
}

/// Category entry for the metadata stage's picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_title_rejected() {
        let meta = ClipMetadata::default();
        assert_eq!(meta.validate(), Err(MetadataError::EmptyTitle));

        let meta = ClipMetadata {
            title: "   ".into(),
            ..Default::default()
        };
        assert_eq!(meta.validate(), Err(MetadataError::EmptyTitle));
    }

    #[test]
    fn test_valid_metadata() {
        let meta = ClipMetadata {
            title: "  Test Clip ".into(),
            is_private: true,
            category_ids: ["gaming".to_string()].into_iter().collect(),
        };
        assert!(meta.validate().is_ok());
        assert_eq!(meta.trimmed_title(), "Test Clip");
    }
}
