use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// The two clocks the scheduler gates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleState {
    pub last_predicted_at: DateTime<Utc>,
    pub last_refreshed_at: DateTime<Utc>,
}

impl ScheduleState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            last_predicted_at: now,
            last_refreshed_at: now,
        }
    }

    pub fn reset(&mut self, now: DateTime<Utc>) {
        *self = Self::new(now);
    }
}

/// Rates the gate compares elapsed time against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub predict_rate: Duration,
    pub refresh_rate: Duration,
    pub extended_refresh_rate: Duration,
}

impl Cadence {
    pub fn refresh_rate_for(&self, extended_reading: bool) -> Duration {
        if extended_reading {
            self.extended_refresh_rate
        } else {
            self.refresh_rate
        }
    }
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            predict_rate: Duration::seconds(1),
            refresh_rate: Duration::seconds(1),
            extended_refresh_rate: Duration::seconds(2),
        }
    }
}

/// What one tick decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickDecision {
    pub predict: bool,
    pub refresh: bool,
}

/// Dual-clock gate. The predict and refresh timers advance independently:
/// neither decision waits on the other.
#[derive(Debug, Clone)]
pub struct Scheduler {
    state: ScheduleState,
    cadence: Cadence,
}

impl Scheduler {
    pub fn new(cadence: Cadence, now: DateTime<Utc>) -> Self {
        Self {
            state: ScheduleState::new(now),
            cadence,
        }
    }

    pub fn state(&self) -> ScheduleState {
        self.state
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.state.reset(now);
    }

    /// Evaluate both clocks at `now`, advancing whichever fired.
    pub fn tick(&mut self, now: DateTime<Utc>, extended_reading: bool) -> TickDecision {
        let predict = is_due(now, self.state.last_predicted_at, self.cadence.predict_rate);
        if predict {
            self.state.last_predicted_at = now;
        }

        let refresh_rate = self.cadence.refresh_rate_for(extended_reading);
        let refresh = is_due(now, self.state.last_refreshed_at, refresh_rate);
        if refresh {
            self.state.last_refreshed_at = now;
        }

        TickDecision { predict, refresh }
    }
}

/// A clock that went backwards counts as "forever ago", so it never suppresses work.
fn is_due(now: DateTime<Utc>, last: DateTime<Utc>, rate: Duration) -> bool {
    let elapsed = now.signed_duration_since(last);
    elapsed < Duration::zero() || elapsed >= rate
}
