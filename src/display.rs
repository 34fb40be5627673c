//! What the renderer shows for the newest cached result.

use serde::Serialize;

use crate::cache::MatchResult;
use crate::matching::THINKING_FACE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayNode {
    /// Text shown beside the glyph.
    pub caption: String,
    pub glyph: String,
    /// Announced when the node appears: the classifier's top phrase only.
    pub accessibility_label: String,
}

impl DisplayNode {
    /// Neutral node for "nothing observed" and "observed but unmatched".
    pub fn placeholder() -> Self {
        Self {
            caption: String::new(),
            glyph: THINKING_FACE.to_string(),
            accessibility_label: String::new(),
        }
    }

    pub fn from_latest(latest: Option<&MatchResult>) -> Self {
        let Some(result) = latest else {
            return Self::placeholder();
        };

        let glyph = if result.is_matched() {
            result.symbol.clone()
        } else {
            THINKING_FACE.to_string()
        };

        Self {
            caption: result.label.clone(),
            glyph,
            accessibility_label: top_phrase(&result.label).to_string(),
        }
    }
}

fn top_phrase(label: &str) -> &str {
    label.split(',').next().unwrap_or_default().trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache_shows_placeholder() {
        assert_eq!(DisplayNode::from_latest(None), DisplayNode::placeholder());
    }

    #[test]
    fn test_matched_result() {
        let result = MatchResult::new("golden retriever, labrador", "🐕");
        let node = DisplayNode::from_latest(Some(&result));
        assert_eq!(node.glyph, "🐕");
        assert_eq!(node.caption, "golden retriever, labrador");
        assert_eq!(node.accessibility_label, "golden retriever");
    }

    #[test]
    fn test_unmatched_result_keeps_caption() {
        let result = MatchResult::new("waffle iron", "");
        let node = DisplayNode::from_latest(Some(&result));
        assert_eq!(node.glyph, THINKING_FACE);
        assert_eq!(node.caption, "waffle iron");
    }
}
