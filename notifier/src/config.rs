//! Consumer-side configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, ensure};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Minimum gap between alerts for the same symbol, in seconds.
    pub min_interval_sec_per_symbol: f64,
    /// Whether OFF transitions are rendered at all.
    pub send_go_off: bool,
    /// Whether snapshots are retained for `top`/`status` queries.
    pub include_snapshot: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            min_interval_sec_per_symbol: 300.0,
            send_go_off: false,
            include_snapshot: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    pub top_n_default: usize,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self { top_n_default: 10 }
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

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub events: EventsConfig,
    pub notify: NotifyConfig,
    pub commands: CommandConfig,
}

impl BotConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        ensure!(
            config.notify.min_interval_sec_per_symbol >= 0.0,
            "min_interval_sec_per_symbol must not be negative"
        );
        Ok(config)
    }
}
