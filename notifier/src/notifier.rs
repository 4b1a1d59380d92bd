//! Dispatch decisions: which tailed events become user-facing alerts.

use std::collections::{HashMap, HashSet};

use chrono::{Local, TimeZone};

use common::clock::epoch_secs;
use eventlog::{Event, EventKind, SnapshotRow};

use crate::config::NotifyConfig;

/// Consumption-side state: mute set, per-symbol cooldown stamps, and the
/// most recent ranked snapshot.
///
/// Not persisted; a restarted consumer starts with a clean slate. When the
/// command front end and the event worker share one instance, both must go
/// through the same lock.
#[derive(Debug, Default)]
pub struct Notifier {
    config: NotifyConfig,
    muted: HashSet<String>,
    last_sent_ts: HashMap<String, f64>,
    last_snapshot: Option<Event>,
}

impl Notifier {
    pub fn new(config: NotifyConfig) -> Self {
        Self {
            config,
            muted: HashSet::new(),
            last_sent_ts: HashMap::new(),
            last_snapshot: None,
        }
    }

    /// Decide whether `event` becomes an outbound message, against the wall
    /// clock.
    pub fn process_event(&mut self, event: &Event) -> Option<String> {
        self.process_event_at(event, epoch_secs())
    }

    /// Same decision with an explicit clock, so throttling is deterministic
    /// under test.
    pub fn process_event_at(&mut self, event: &Event, now: f64) -> Option<String> {
        if event.kind == EventKind::Snapshot {
            if self.config.include_snapshot {
                self.last_snapshot = Some(event.clone());
            }
            return None;
        }

        let symbol = event.symbol.as_deref()?;
        if self.muted.contains(symbol) {
            return None;
        }

        match event.kind {
            EventKind::GoOn => {
                if !self.should_send(symbol, now) {
                    return None;
                }
                Some(self.format_go_message(event))
            }
            EventKind::GoOff if self.config.send_go_off => {
                if !self.should_send(symbol, now) {
                    return None;
                }
                // A delivered go_off closes the episode; the next go_on
                // must not inherit its cooldown stamp.
                self.last_sent_ts.remove(symbol);
                let score = event.metrics.map(|m| m.score).unwrap_or(0.0);
                Some(format!("GO OFF: {symbol}\nscore: {score:.0}"))
            }
            _ => None,
        }
    }

    /// Per-symbol rate limit: refuse when the last delivered alert is too
    /// recent (leaving the stamp untouched), otherwise stamp and allow.
    fn should_send(&mut self, symbol: &str, now: f64) -> bool {
        let last = self.last_sent_ts.get(symbol).copied().unwrap_or(0.0);
        if now - last < self.config.min_interval_sec_per_symbol {
            return false;
        }
        self.last_sent_ts.insert(symbol.to_string(), now);
        true
    }

    fn format_go_message(&self, event: &Event) -> String {
        let metrics = event.metrics.unwrap_or_default();
        let symbol = event.symbol.as_deref().unwrap_or_default();
        format!(
            "GO: {symbol}\n\
             spread: {:.1} bps\n\
             notional(60s): ${:.0}\n\
             refill: {:.2}\n\
             range(60s): {:.1} bps\n\
             score: {:.0}\n\
             {}",
            metrics.spread_bps_med_60s,
            metrics.notional_60s_usd,
            metrics.refill_rate_5m,
            metrics.mid_range_bps_60s,
            metrics.score,
            format_local_ts(event.ts),
        )
    }

    /// Up to `n` rows of the cached snapshot, best first.
    pub fn get_top(&self, n: usize) -> Vec<SnapshotRow> {
        self.last_snapshot
            .as_ref()
            .and_then(|s| s.top.as_ref())
            .map(|rows| rows.iter().take(n).cloned().collect())
            .unwrap_or_default()
    }

    /// Number of symbols currently GO according to the cached snapshot.
    pub fn active_go_count(&self) -> usize {
        self.last_snapshot
            .as_ref()
            .and_then(|s| s.top.as_ref())
            .map(|rows| rows.iter().filter(|row| row.go).count())
            .unwrap_or(0)
    }

    /// Stop rendering alerts for `symbol`, effective immediately for every
    /// subsequently processed event.
    pub fn mute(&mut self, symbol: &str) {
        self.muted.insert(symbol.to_uppercase());
    }

    /// Resume alerting for `symbol`. Cooldown history is kept.
    pub fn unmute(&mut self, symbol: &str) {
        self.muted.remove(&symbol.to_uppercase());
    }
}

/// Render an epoch timestamp in the operator's local time.
fn format_local_ts(ts: f64) -> String {
    Local
        .timestamp_opt(ts as i64, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| format!("{ts:.0}"))
}
