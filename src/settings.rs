use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

/// Upper bound for every configured rate or span: one day.
pub const MAX_DURATION_MS: u64 = 24 * 60 * 60 * 1_000;

/// Tunables for the render-tick pipeline. All rates are in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Period of the render clock that drives the scheduler.
    pub tick_interval_ms: u64,
    pub predict_rate_ms: u64,
    pub refresh_rate_ms: u64,
    /// Refresh cadence while a screen reader needs time to read. Slower than
    /// `refresh_rate_ms`: extended reading means VoiceOver is running and each
    /// result has to stay up long enough to be spoken.
    pub extended_refresh_rate_ms: u64,
    pub attention_span_ms: u64,
    /// Delay between a refresh decision and the anchor actually being replaced.
    pub anchor_delay_ms: u64,
    /// Fixed seed for the cross-phrase shuffle; entropy when unset.
    pub shuffle_seed: Option<u64>,
    pub catalog_path: Option<PathBuf>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 16,
            predict_rate_ms: 1_000,
            refresh_rate_ms: 1_000,
            extended_refresh_rate_ms: 2_000,
            attention_span_ms: 5_000,
            anchor_delay_ms: 0,
            shuffle_seed: None,
            catalog_path: None,
        }
    }
}

impl PipelineSettings {
    /// Read settings from `path`. A missing file gives defaults; a file that
    /// doesn't parse is logged and also gives defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        Ok(serde_json::from_str(&contents).unwrap_or_else(|err| {
            warn!("Ignoring malformed settings at {}: {err}", path.display());
            Self::default()
        }))
    }

    /// Apply `EMOJIFY_*` environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(seed) = std::env::var("EMOJIFY_SHUFFLE_SEED")
            .ok()
            .and_then(|value| value.trim().parse().ok())
        {
            self.shuffle_seed = Some(seed);
        }
        if let Ok(path) = std::env::var("EMOJIFY_CATALOG") {
            self.catalog_path = Some(PathBuf::from(path));
        }
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.clamp(1, MAX_DURATION_MS))
    }

    pub fn anchor_delay(&self) -> Duration {
        Duration::from_millis(self.anchor_delay_ms.min(MAX_DURATION_MS))
    }

    pub fn predict_rate(&self) -> chrono::Duration {
        millis(self.predict_rate_ms)
    }

    pub fn refresh_rate(&self) -> chrono::Duration {
        millis(self.refresh_rate_ms)
    }

    pub fn extended_refresh_rate(&self) -> chrono::Duration {
        millis(self.extended_refresh_rate_ms)
    }

    pub fn attention_span(&self) -> chrono::Duration {
        millis(self.attention_span_ms)
    }
}

/// Whether `EMOJIFY_EXTENDED_READING` asks for the slower refresh cadence.
pub fn extended_reading_from_env() -> bool {
    std::env::var("EMOJIFY_EXTENDED_READING")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn millis(ms: u64) -> chrono::Duration {
    // Fits in i64 after the clamp.
    chrono::Duration::milliseconds(ms.min(MAX_DURATION_MS) as i64)
}
