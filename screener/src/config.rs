//! Screener configuration: YAML shape, defaults, startup validation.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no symbols configured")]
    NoSymbols,

    #[error("go_score_threshold must be finite, got {0}")]
    BadEntryThreshold(f64),

    #[error("go_off_threshold {exit} must not exceed go_score_threshold {entry}")]
    ExitAboveEntry { exit: f64, entry: f64 },

    #[error("{name} must be positive, got {value}")]
    NonPositiveInterval { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScreenerConfig {
    #[serde(default)]
    pub symbols: Vec<String>,

    /// Score at or above which an OFF symbol turns ON.
    #[serde(default = "default_entry_threshold")]
    pub go_score_threshold: f64,

    /// Score below which an ON symbol turns OFF. Defaults to
    /// `0.8 × go_score_threshold` when absent.
    #[serde(default)]
    pub go_off_threshold: Option<f64>,

    /// Whether OFF transitions are written to the log at all.
    #[serde(default = "default_true")]
    pub emit_go_off: bool,

    #[serde(default)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub events: EventsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub tick_interval_sec: f64,
    pub snapshot_interval_sec: f64,
    pub snapshot_top_n: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval_sec: 5.0,
            snapshot_interval_sec: 30.0,
            snapshot_top_n: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    pub path: PathBuf,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./events.jsonl"),
        }
    }
}

fn default_entry_threshold() -> f64 {
    80.0
}

fn default_true() -> bool {
    true
}

impl ScreenerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Effective exit threshold, applying the default derivation.
    pub fn exit_threshold(&self) -> f64 {
        self.go_off_threshold
            .unwrap_or(self.go_score_threshold * 0.8)
    }

    /// Fail fast on configurations the run loop cannot honor. Called once
    /// at startup; nothing is silently corrected beyond the documented
    /// exit-threshold derivation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::NoSymbols);
        }
        if !self.go_score_threshold.is_finite() {
            return Err(ConfigError::BadEntryThreshold(self.go_score_threshold));
        }
        let exit = self.exit_threshold();
        if !exit.is_finite() || exit > self.go_score_threshold {
            return Err(ConfigError::ExitAboveEntry {
                exit,
                entry: self.go_score_threshold,
            });
        }
        if self.runtime.tick_interval_sec <= 0.0 {
            return Err(ConfigError::NonPositiveInterval {
                name: "tick_interval_sec",
                value: self.runtime.tick_interval_sec,
            });
        }
        if self.runtime.snapshot_interval_sec <= 0.0 {
            return Err(ConfigError::NonPositiveInterval {
                name: "snapshot_interval_sec",
                value: self.runtime.snapshot_interval_sec,
            });
        }
        Ok(())
    }
}
