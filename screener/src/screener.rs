//! The screener run loop.
//!
//! Responsibilities:
//!   • Pull fresh metrics for every symbol each tick
//!   • Apply the two-threshold GO rule and publish edge-triggered transitions
//!   • Publish ranked snapshots on their own cadence
//!   • Hold a fixed tick rate: slow fetches shrink the sleep, never stack

use std::cmp::Ordering;
use std::time::Duration;

use tracing::{info, warn};

use common::clock::epoch_secs;
use eventlog::{Event, EventKind, EventSink, SnapshotRow};

use crate::config::{ConfigError, ScreenerConfig};
use crate::provider::MetricsProvider;
use crate::state::{SymbolState, Transition};

/// Owns all per-symbol state and drives the tick/snapshot cadence.
///
/// Nothing else holds a reference into `states`; snapshots are built from
/// clones, so the tick loop mutates without synchronization.
pub struct Screener<P, S> {
    states: Vec<SymbolState>,
    entry_threshold: f64,
    exit_threshold: f64,
    tick_interval: f64,
    snapshot_interval: f64,
    snapshot_top_n: usize,
    emit_go_off: bool,
    provider: P,
    sink: S,
    last_snapshot: f64,
}

impl<P: MetricsProvider, S: EventSink> Screener<P, S> {
    pub fn new(config: &ScreenerConfig, provider: P, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            states: config
                .symbols
                .iter()
                .map(|s| SymbolState::new(s.trim().to_uppercase()))
                .collect(),
            entry_threshold: config.go_score_threshold,
            exit_threshold: config.exit_threshold(),
            tick_interval: config.runtime.tick_interval_sec,
            snapshot_interval: config.runtime.snapshot_interval_sec,
            snapshot_top_n: config.runtime.snapshot_top_n,
            emit_go_off: config.emit_go_off,
            provider,
            sink,
            last_snapshot: 0.0,
        })
    }

    pub fn states(&self) -> &[SymbolState] {
        &self.states
    }

    /// Run forever at a fixed tick rate. The first tick always snapshots;
    /// after that, snapshots follow their own interval measured from the
    /// previous snapshot, not from tick boundaries.
    pub async fn run(&mut self) {
        info!(symbols = self.states.len(), "starting screener");
        loop {
            let start = epoch_secs();
            self.tick(start).await;
            if start - self.last_snapshot >= self.snapshot_interval {
                self.emit_snapshot(start).await;
                self.last_snapshot = start;
            }
            let elapsed = epoch_secs() - start;
            let idle = (self.tick_interval - elapsed).max(0.0);
            tokio::time::sleep(Duration::from_secs_f64(idle)).await;
        }
    }

    /// Evaluate every symbol once against metrics fetched at `now`.
    pub async fn tick(&mut self, now: f64) {
        for i in 0..self.states.len() {
            let symbol = self.states[i].symbol.clone();
            let metrics = match self.provider.fetch(&symbol).await {
                Ok(metrics) => metrics,
                Err(error) => {
                    warn!(symbol = %symbol, %error, "metrics fetch failed; keeping previous state");
                    continue;
                }
            };

            let state = &mut self.states[i];
            match state.apply(metrics, self.entry_threshold, self.exit_threshold) {
                Some(Transition::GoOn) => {
                    info!(symbol = %state.symbol, score = state.score, "GO ON");
                    let event =
                        Event::transition(EventKind::GoOn, now, state.symbol.clone(), state.metrics());
                    self.sink.emit(&event).await;
                }
                Some(Transition::GoOff) => {
                    info!(symbol = %state.symbol, score = state.score, "GO OFF");
                    if self.emit_go_off {
                        let event = Event::transition(
                            EventKind::GoOff,
                            now,
                            state.symbol.clone(),
                            state.metrics(),
                        );
                        self.sink.emit(&event).await;
                    }
                }
                None => {}
            }
        }
    }

    /// Publish the top-N symbols by descending score.
    ///
    /// The sort is stable: equal scores keep their configured relative
    /// order, and identical state always yields an identical payload.
    pub async fn emit_snapshot(&mut self, ts: f64) {
        let mut ranked: Vec<&SymbolState> = self.states.iter().collect();
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        let top: Vec<SnapshotRow> = ranked
            .into_iter()
            .take(self.snapshot_top_n)
            .map(|s| SnapshotRow {
                symbol: s.symbol.clone(),
                go: s.go,
                metrics: s.metrics(),
            })
            .collect();

        self.sink.emit(&Event::snapshot(ts, top)).await;
    }
}
