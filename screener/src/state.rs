//! Per-symbol screening state and the two-threshold GO rule.
//
//  This module is deliberately pure: no async, no IO.

use eventlog::Metrics;

/// Direction of a GO membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    GoOn,
    GoOff,
}

/// Live screening state for one monitored symbol.
///
/// Owned exclusively by the [`Screener`](crate::Screener); metric fields are
/// overwritten on every successful tick and keep their previous values when
/// a fetch for this symbol fails.
#[derive(Debug, Clone, Default)]
pub struct SymbolState {
    pub symbol: String,
    pub go: bool,
    pub score: f64,
    pub spread_bps_med_60s: f64,
    pub notional_60s_usd: f64,
    pub refill_rate_5m: f64,
    pub mid_range_bps_60s: f64,
}

impl SymbolState {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// The five-field metric set in wire form.
    pub fn metrics(&self) -> Metrics {
        Metrics {
            spread_bps_med_60s: self.spread_bps_med_60s,
            notional_60s_usd: self.notional_60s_usd,
            refill_rate_5m: self.refill_rate_5m,
            mid_range_bps_60s: self.mid_range_bps_60s,
            score: self.score,
        }
    }

    /// Store a fresh observation and apply the hysteresis rule.
    ///
    /// OFF flips ON when the score reaches `entry_threshold`; ON flips OFF
    /// when the score drops below `exit_threshold`. Anything else leaves the
    /// flag alone, so holding above or below a threshold never re-fires.
    /// The flag flips even when the caller chooses not to publish the
    /// resulting transition.
    pub fn apply(
        &mut self,
        metrics: Metrics,
        entry_threshold: f64,
        exit_threshold: f64,
    ) -> Option<Transition> {
        self.score = metrics.score;
        self.spread_bps_med_60s = metrics.spread_bps_med_60s;
        self.notional_60s_usd = metrics.notional_60s_usd;
        self.refill_rate_5m = metrics.refill_rate_5m;
        self.mid_range_bps_60s = metrics.mid_range_bps_60s;

        let was_go = self.go;
        let now_go = if was_go {
            metrics.score >= exit_threshold
        } else {
            metrics.score >= entry_threshold
        };
        self.go = now_go;

        match (was_go, now_go) {
            (false, true) => Some(Transition::GoOn),
            (true, false) => Some(Transition::GoOff),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: f64 = 80.0;
    const EXIT: f64 = 64.0;

    fn with_score(score: f64) -> Metrics {
        Metrics {
            score,
            ..Metrics::default()
        }
    }

    fn apply(state: &mut SymbolState, score: f64) -> Option<Transition> {
        state.apply(with_score(score), ENTRY, EXIT)
    }

    #[test]
    fn off_stays_off_below_entry() {
        let mut state = SymbolState::new("XUSDT");

        assert_eq!(apply(&mut state, 79.9), None);
        assert!(!state.go);
    }

    #[test]
    fn off_flips_on_at_entry_threshold() {
        let mut state = SymbolState::new("XUSDT");

        assert_eq!(apply(&mut state, 80.0), Some(Transition::GoOn));
        assert!(state.go);
    }

    #[test]
    fn on_holds_inside_the_hysteresis_band() {
        let mut state = SymbolState::new("XUSDT");
        apply(&mut state, 85.0);

        // Between exit and entry: no flapping, no events.
        assert_eq!(apply(&mut state, 70.0), None);
        assert_eq!(apply(&mut state, 64.0), None);
        assert!(state.go);
    }

    #[test]
    fn on_flips_off_below_exit_threshold() {
        let mut state = SymbolState::new("XUSDT");
        apply(&mut state, 85.0);

        assert_eq!(apply(&mut state, 63.9), Some(Transition::GoOff));
        assert!(!state.go);
    }

    #[test]
    fn unchanged_state_emits_nothing() {
        let mut state = SymbolState::new("XUSDT");

        assert_eq!(apply(&mut state, 90.0), Some(Transition::GoOn));
        assert_eq!(apply(&mut state, 95.0), None);
        assert_eq!(apply(&mut state, 119.0), None);
        assert_eq!(apply(&mut state, 10.0), Some(Transition::GoOff));
        assert_eq!(apply(&mut state, 10.0), None);
    }

    #[test]
    fn score_sequence_produces_expected_transitions() {
        let mut state = SymbolState::new("XUSDT");
        let scores = [50.0, 85.0, 90.0, 70.0, 60.0];

        let transitions: Vec<_> = scores.iter().map(|s| apply(&mut state, *s)).collect();

        assert_eq!(
            transitions,
            vec![
                None,
                Some(Transition::GoOn),
                None,
                None,
                Some(Transition::GoOff),
            ]
        );
    }

    #[test]
    fn apply_overwrites_all_metric_fields() {
        let mut state = SymbolState::new("XUSDT");
        let metrics = Metrics {
            spread_bps_med_60s: 3.2,
            notional_60s_usd: 61_000.0,
            refill_rate_5m: 2.4,
            mid_range_bps_60s: 12.5,
            score: 88.0,
        };

        state.apply(metrics, ENTRY, EXIT);

        assert_eq!(state.metrics(), metrics);
    }
}
