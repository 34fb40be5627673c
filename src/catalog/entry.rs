//! Catalog entry data model.
//!
//! One taggable emoji record. Records come from the packaged `emojis.json`
//! and are validated here; anything missing a field is rejected.

use serde::{Deserialize, Serialize};

/// A single matchable emoji record. Immutable once loaded.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: i64,
    pub code: String,
    /// The emoji glyph. Never empty.
    pub symbol: String,
    pub description: String,
    pub tags: Vec<String>,
    /// Lowercased `description`, computed once at load so matching never re-normalizes.
    #[serde(skip)]
    normalized_description: String,
}

/// Wire shape of a catalog record. The glyph is stored under `value`.
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    id: i64,
    code: String,
    value: String,
    description: String,
    tags: Vec<String>,
}

impl CatalogEntry {
    pub fn new(
        id: i64,
        code: impl Into<String>,
        symbol: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        let description = description.into();
        Self {
            id,
            code: code.into(),
            symbol: symbol.into(),
            normalized_description: normalize(&description),
            description,
            tags,
        }
    }

    /// Parse one record, returning `None` when a field is missing, mistyped or blank.
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        let record: CatalogRecord = serde_json::from_value(value).ok()?;

        let blank = |field: &str| field.trim().is_empty();
        if blank(&record.code) || blank(&record.value) || blank(&record.description) {
            return None;
        }

        Some(Self::new(
            record.id,
            record.code,
            record.value,
            record.description,
            record.tags,
        ))
    }

    pub fn normalized_description(&self) -> &str {
        &self.normalized_description
    }

    /// Tags are compared exactly as stored (no case folding).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Lowercase and trim. Shared by catalog load and label matching.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
