use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What one prediction resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Raw classifier label, or empty when the label was overridden.
    pub label: String,
    /// Chosen glyph; empty when nothing matched.
    pub symbol: String,
}

impl MatchResult {
    pub fn new(label: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            symbol: symbol.into(),
        }
    }

    /// Observed-but-unmatched results are still cached; this tells them apart.
    pub fn is_matched(&self) -> bool {
        !self.symbol.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub observed_at: DateTime<Utc>,
    pub result: MatchResult,
}
