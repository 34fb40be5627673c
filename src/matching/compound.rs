use rand::seq::SliceRandom;
use rand::Rng;

use crate::cache::MatchResult;

use super::tiers::Matcher;

/// Label the classifier emits far more often than nematodes show up in practice.
pub const NEMATODE_LABEL: &str = "nematode, nematode worm, roundworm";

/// Shown in place of [`NEMATODE_LABEL`], and for "nothing to show yet".
pub const THINKING_FACE: &str = "🤔";

/// Resolve a full classifier label (one phrase, or ranked phrases joined by commas)
/// into the pair that gets cached.
///
/// Each phrase contributes its best symbol; the final pick among phrases is an
/// unbiased shuffle-then-take-first so repeated views of the same scene vary.
pub fn resolve_label<R: Rng + ?Sized>(matcher: &Matcher, label: &str, rng: &mut R) -> MatchResult {
    if is_nematode(label) {
        return MatchResult::new("", THINKING_FACE);
    }

    let mut candidates: Vec<String> = label
        .split(',')
        .filter_map(|phrase| matcher.best_symbol(phrase))
        .collect();
    candidates.shuffle(rng);

    MatchResult::new(label, candidates.into_iter().next().unwrap_or_default())
}

fn is_nematode(label: &str) -> bool {
    let phrases: Vec<&str> = label.split(',').map(str::trim).collect();
    phrases.join(", ") == NEMATODE_LABEL
}
