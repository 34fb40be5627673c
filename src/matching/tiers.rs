use std::sync::Arc;

use crate::catalog::{normalize, Catalog, CatalogEntry};

use super::tally::SymbolTally;

/// Which precedence level produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Description equals the label.
    Exact,
    /// Containment, tag and per-word hits, voted by frequency.
    Fuzzy,
    None,
}

/// Symbols produced for one label phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatch {
    pub tier: MatchTier,
    /// Every exact hit in catalog order, or the single fuzzy winner.
    pub symbols: Vec<String>,
}

impl PhraseMatch {
    fn none() -> Self {
        Self {
            tier: MatchTier::None,
            symbols: Vec::new(),
        }
    }

    pub fn best(&self) -> Option<&str> {
        self.symbols.first().map(String::as_str)
    }

    pub fn is_match(&self) -> bool {
        !self.symbols.is_empty()
    }
}

/// Maps one classifier phrase to catalog symbols. Pure and cheap to clone.
#[derive(Debug, Clone)]
pub struct Matcher {
    catalog: Arc<Catalog>,
}

impl Matcher {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Best symbol for a phrase, if any tier produced one.
    pub fn best_symbol(&self, label: &str) -> Option<String> {
        self.match_phrase(label).symbols.into_iter().next()
    }

    pub fn match_phrase(&self, label: &str) -> PhraseMatch {
        let input = normalize(label);
        if input.is_empty() {
            return PhraseMatch::none();
        }

        let exact: Vec<String> = self
            .catalog
            .iter()
            .filter(|entry| entry.normalized_description() == input)
            .map(|entry| entry.symbol.clone())
            .collect();
        if !exact.is_empty() {
            return PhraseMatch {
                tier: MatchTier::Exact,
                symbols: exact,
            };
        }

        match self.fuzzy_winner(&input) {
            Some(symbol) => PhraseMatch {
                tier: MatchTier::Fuzzy,
                symbols: vec![symbol.to_string()],
            },
            None => PhraseMatch::none(),
        }
    }

    /// Per-word hits in word order, then containment/tag hits, voted by count.
    fn fuzzy_winner(&self, input: &str) -> Option<&str> {
        let close = self
            .catalog
            .iter()
            .filter(|entry| is_close(entry, input))
            .map(|entry| entry.symbol.as_str());

        let similar = input.split_whitespace().flat_map(|word| {
            self.catalog
                .iter()
                .filter(move |entry| entry.normalized_description().contains(word))
                .map(|entry| entry.symbol.as_str())
        });

        similar.chain(close).collect::<SymbolTally>().most_frequent()
    }
}

fn is_close(entry: &CatalogEntry, input: &str) -> bool {
    let description = entry.normalized_description();
    if description.is_empty() {
        return entry.has_tag(input);
    }
    description.contains(input) || input.contains(description) || entry.has_tag(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, symbol: &str, description: &str, tags: &[&str]) -> CatalogEntry {
        CatalogEntry::new(
            id,
            format!("code-{id}"),
            symbol,
            description,
            tags.iter().map(|t| t.to_string()).collect(),
        )
    }

    fn matcher(entries: Vec<CatalogEntry>) -> Matcher {
        Matcher::new(Arc::new(Catalog::new(entries)))
    }

    #[test]
    fn test_dog_scenario() {
        let m = matcher(vec![entry(1, "🐶", "dog", &["pet"])]);

        let token = m.match_phrase("a cute dog");
        assert_eq!(token.tier, MatchTier::Fuzzy);
        assert_eq!(token.best(), Some("🐶"));

        let exact = m.match_phrase("dog");
        assert_eq!(exact.tier, MatchTier::Exact);
        assert_eq!(exact.best(), Some("🐶"));

        assert_eq!(m.match_phrase("xyz"), PhraseMatch::none());
        assert_eq!(m.best_symbol("xyz"), None);
    }

    #[test]
    fn test_blank_description_matches_nothing() {
        let m = matcher(vec![entry(1, "👻", "   ", &[]), entry(2, "🐶", "dog", &[])]);
        assert_eq!(m.best_symbol("xyz"), None);
        assert_eq!(m.best_symbol("toaster"), None);
        assert_eq!(m.best_symbol("a cute dog"), Some("🐶".to_string()));
    }

    #[test]
    fn test_exact_tier_shadows_substring_hits() {
        let m = matcher(vec![
            entry(1, "🌭", "hot dog", &[]),
            entry(2, "🐶", "Dog", &[]),
            entry(3, "🐕", "dog", &[]),
        ]);

        let result = m.match_phrase("  DOG ");
        assert_eq!(result.tier, MatchTier::Exact);
        assert_eq!(result.symbols, vec!["🐶".to_string(), "🐕".to_string()]);
    }

    #[test]
    fn test_tag_match_is_case_sensitive_as_stored() {
        let m = matcher(vec![entry(1, "🐈", "cat face", &["kitty"])]);
        assert_eq!(m.best_symbol("Kitty"), Some("🐈".to_string()));

        let upper = matcher(vec![entry(1, "🐈", "cat face", &["Kitty"])]);
        assert_eq!(upper.best_symbol("kitty"), None);
    }

    #[test]
    fn test_label_containing_description_matches() {
        let m = matcher(vec![entry(1, "🍎", "apple", &[])]);
        let result = m.match_phrase("granny smith apple");
        assert_eq!(result.tier, MatchTier::Fuzzy);
        assert_eq!(result.best(), Some("🍎"));
    }

    #[test]
    fn test_most_mentioned_symbol_wins() {
        // "golden" and "retriever" each hit 🐕; "golden" also hits 🏆.
        let m = matcher(vec![
            entry(1, "🏆", "golden trophy", &[]),
            entry(2, "🐕", "golden retriever dog", &[]),
        ]);
        assert_eq!(m.best_symbol("golden retriever"), Some("🐕".to_string()));
    }

    #[test]
    fn test_tie_goes_to_earliest_mention() {
        let m = matcher(vec![
            entry(1, "🚗", "sports car", &[]),
            entry(2, "🏀", "sports ball", &[]),
        ]);
        // One hit each from "sports"; neither contains the full label.
        assert_eq!(m.best_symbol("sports day"), Some("🚗".to_string()));
    }

    #[test]
    fn test_word_hits_are_substring_not_token_matches() {
        let m = matcher(vec![entry(1, "🐈", "catamaran", &[])]);
        assert_eq!(m.best_symbol("cat"), Some("🐈".to_string()));
    }

    #[test]
    fn test_empty_catalog_and_empty_label_never_match() {
        let empty = matcher(Vec::new());
        assert_eq!(empty.match_phrase("dog").tier, MatchTier::None);

        let m = matcher(vec![entry(1, "🐶", "dog", &[])]);
        assert_eq!(m.match_phrase("   ").tier, MatchTier::None);
    }
}
