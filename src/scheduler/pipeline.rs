use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

use crate::cache::{CacheHandle, MatchResult};
use crate::catalog::Catalog;
use crate::matching::{resolve_label, Matcher};
use crate::settings::PipelineSettings;

use super::state::{Cadence, ScheduleState, Scheduler, TickDecision};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Result of a classification, tagged with the session it was started in.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub generation: u64,
    pub observed_at: DateTime<Utc>,
    /// `None` when the classifier failed.
    pub label: Option<String>,
}

/// Why a prediction did or did not reach the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionOutcome {
    Stored(MatchResult),
    /// Session restarted or stopped while the classifier was running.
    Stale,
    /// Classifier failed or returned nothing usable.
    Skipped,
}

/// Single owner of the schedule, the cache writes and the shuffle RNG.
///
/// Everything that mutates scheduling or cache state goes through `&mut self`,
/// so callers serialize access by owning or locking the pipeline.
pub struct Pipeline {
    scheduler: Scheduler,
    matcher: Matcher,
    cache: CacheHandle,
    rng: StdRng,
    attention_span: Duration,
    generation: u64,
}

impl Pipeline {
    pub fn new(
        catalog: Arc<Catalog>,
        cache: CacheHandle,
        settings: &PipelineSettings,
        now: DateTime<Utc>,
    ) -> Self {
        let cadence = Cadence {
            predict_rate: settings.predict_rate(),
            refresh_rate: settings.refresh_rate(),
            extended_refresh_rate: settings.extended_refresh_rate(),
        };
        let rng = match settings.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            scheduler: Scheduler::new(cadence, now),
            matcher: Matcher::new(catalog),
            cache,
            rng,
            attention_span: settings.attention_span(),
            generation: 0,
        }
    }

    pub fn cache(&self) -> &CacheHandle {
        &self.cache
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn schedule(&self) -> ScheduleState {
        self.scheduler.state()
    }

    /// Gate one render tick.
    pub fn tick(&mut self, now: DateTime<Utc>, extended_reading: bool) -> TickDecision {
        self.scheduler.tick(now, extended_reading)
    }

    /// Begin a fresh session: empty cache, clocks at `now`, and any prediction
    /// still in flight becomes stale.
    pub fn start_session(&mut self, now: DateTime<Utc>) -> u64 {
        self.generation += 1;
        self.cache.purge_all();
        self.scheduler.reset(now);
        log_info!("session generation {} started", self.generation);
        self.generation
    }

    /// Invalidate in-flight predictions without touching the cache.
    pub fn end_session(&mut self) {
        self.generation += 1;
    }

    /// Match the label and write it to the cache, unless it belongs to an older session.
    pub fn apply(&mut self, prediction: Prediction) -> PredictionOutcome {
        if prediction.generation != self.generation {
            log_info!(
                "discarding stale prediction from generation {} (current {})",
                prediction.generation,
                self.generation
            );
            return PredictionOutcome::Stale;
        }

        let Some(label) = prediction.label.filter(|label| !label.trim().is_empty()) else {
            log_debug!("no usable label for tick at {}", prediction.observed_at);
            return PredictionOutcome::Skipped;
        };

        let result = resolve_label(&self.matcher, &label, &mut self.rng);
        let evicted =
            self.cache
                .evict_then_put(prediction.observed_at, self.attention_span, result.clone());
        log_debug!(
            "cached {:?} -> {:?} at {} (evicted {})",
            result.label,
            result.symbol,
            prediction.observed_at,
            evicted
        );

        PredictionOutcome::Stored(result)
    }
}
