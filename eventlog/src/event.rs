//! Wire model for the event log.
//!
//! One JSON object per line. Records are self-contained: consumers need no
//! context beyond the line itself, and unknown fields written by newer
//! producers survive a decode/encode round trip.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The five per-symbol market-microstructure metrics carried by every
/// transition event and snapshot row.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub spread_bps_med_60s: f64,
    pub notional_60s_usd: f64,
    pub refill_rate_5m: f64,
    pub mid_range_bps_60s: f64,
    pub score: f64,
}

/// Record discriminant.
///
/// `Unknown` absorbs types introduced by newer writers so one unfamiliar
/// record never fails the stream; consumers treat it as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    GoOn,
    GoOff,
    Snapshot,
    #[serde(other)]
    Unknown,
}

/// One ranked row of a snapshot payload: the symbol, its GO flag, and the
/// full metric set flattened alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub symbol: String,
    pub go: bool,
    #[serde(flatten)]
    pub metrics: Metrics,
}

/// Immutable record appended to the event log.
///
/// `go_on`/`go_off` records carry `symbol` and `metrics`; `snapshot` records
/// carry `top` and nothing else. `extra` holds any fields this version does
/// not know about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Seconds since the Unix epoch.
    pub ts: f64,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<Vec<SnapshotRow>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Event {
    /// A GO membership change for one symbol.
    pub fn transition(
        kind: EventKind,
        ts: f64,
        symbol: impl Into<String>,
        metrics: Metrics,
    ) -> Self {
        Self {
            ts,
            kind,
            symbol: Some(symbol.into()),
            metrics: Some(metrics),
            top: None,
            extra: serde_json::Map::new(),
        }
    }

    /// A periodic ranked snapshot.
    pub fn snapshot(ts: f64, top: Vec<SnapshotRow>) -> Self {
        Self {
            ts,
            kind: EventKind::Snapshot,
            symbol: None,
            metrics: None,
            top: Some(top),
            extra: serde_json::Map::new(),
        }
    }
}
