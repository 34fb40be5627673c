use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use emojify_lib::cache::{MatchResult, ResultCache};
use emojify_lib::catalog::{Catalog, CatalogEntry};
use emojify_lib::matching::{resolve_label, MatchTier, Matcher, NEMATODE_LABEL, THINKING_FACE};
use emojify_lib::scheduler::{Cadence, Scheduler};

fn dog_matcher() -> Matcher {
    let catalog = Catalog::new(vec![CatalogEntry::new(1, "U+1F436", "🐶", "dog", vec!["pet".into()])]);
    Matcher::new(Arc::new(catalog))
}

#[test]
fn test_dog_catalog_scenario() {
    let matcher = dog_matcher();
    assert_eq!(matcher.best_symbol("a cute dog").as_deref(), Some("🐶"));
    assert_eq!(matcher.match_phrase("a cute dog").tier, MatchTier::Fuzzy);
    assert_eq!(matcher.match_phrase("Dog").tier, MatchTier::Exact);
    assert_eq!(matcher.best_symbol("xyz"), None);
    assert_eq!(matcher.best_symbol("pet").as_deref(), Some("🐶"));
}

#[test]
fn test_blank_description_record_is_dropped_at_load() {
    let catalog = Catalog::from_json_str(
        r#"[
            {"id": 1, "code": "U+1F47B", "value": "👻", "description": "   ", "tags": []},
            {"id": 2, "code": "U+1F436", "value": "🐶", "description": "dog", "tags": []}
        ]"#,
    )
    .unwrap();
    assert_eq!(catalog.len(), 1);

    let matcher = Matcher::new(Arc::new(catalog));
    assert_eq!(matcher.best_symbol("xyz"), None);
    assert_eq!(matcher.best_symbol("toaster"), None);
}

#[test]
fn test_nematode_ignores_catalog_contents() {
    let mut rng = StdRng::seed_from_u64(0);
    let worm_catalog = Catalog::new(vec![CatalogEntry::new(9, "U+1F41B", "🐛", "roundworm", vec![])]);
    for catalog in [Catalog::empty(), worm_catalog] {
        let matcher = Matcher::new(Arc::new(catalog));
        assert_eq!(
            resolve_label(&matcher, NEMATODE_LABEL, &mut rng),
            MatchResult::new("", THINKING_FACE)
        );
    }
}

#[test]
fn test_empty_catalog_never_matches() {
    let matcher = Matcher::new(Arc::new(Catalog::load(std::path::Path::new(
        "/nonexistent/emojis.json",
    ))));
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(
        resolve_label(&matcher, "dog, cat", &mut rng),
        MatchResult::new("dog, cat", "")
    );
}

#[test]
fn test_cache_window_and_latest() {
    let t = |secs: i64| Utc.timestamp_opt(1_600_000_000 + secs, 0).unwrap();
    let mut cache = ResultCache::new();
    cache.put(t(2), MatchResult::new("b", "🅱️"));
    cache.put(t(3), MatchResult::new("c", "©️"));
    cache.put(t(1), MatchResult::new("a", "🅰️"));
    assert_eq!(cache.latest().unwrap().observed_at, t(3));

    assert_eq!(cache.evict(t(4), Duration::seconds(2)), 1);
    assert_eq!(cache.evict(t(4), Duration::seconds(2)), 0);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_predict_gate_on_half_second_ticks() {
    let t0 = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
    let mut scheduler = Scheduler::new(Cadence::default(), t0);
    let fired: Vec<bool> = [0, 500, 1_000, 1_500]
        .into_iter()
        .map(|ms| scheduler.tick(t0 + Duration::milliseconds(ms), false).predict)
        .collect();
    assert_eq!(fired, vec![false, false, true, false]);
}
