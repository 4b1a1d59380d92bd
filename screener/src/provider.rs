//! Source of per-symbol market metrics.

use async_trait::async_trait;
use rand::Rng;

use eventlog::Metrics;

/// Opaque metrics source queried once per symbol per tick.
///
/// A failed fetch is isolated to its symbol: the tick keeps evaluating the
/// others and the failing symbol retains its previous state.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    async fn fetch(&self, symbol: &str) -> anyhow::Result<Metrics>;
}

/// Placeholder provider producing uniformly random metrics.
///
/// Stands in for a real market-data feed during demos and soak runs; any
/// real provider plugs in behind the same trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedProvider;

#[async_trait]
impl MetricsProvider for SimulatedProvider {
    async fn fetch(&self, _symbol: &str) -> anyhow::Result<Metrics> {
        let mut rng = rand::thread_rng();
        Ok(Metrics {
            spread_bps_med_60s: rng.gen_range(0.5..30.0),
            notional_60s_usd: rng.gen_range(5_000.0..80_000.0),
            refill_rate_5m: rng.gen_range(0.0..5.0),
            mid_range_bps_60s: rng.gen_range(1.0..40.0),
            score: rng.gen_range(0.0..120.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn simulated_metrics_stay_in_range() {
        let provider = SimulatedProvider;

        for _ in 0..50 {
            let m = provider.fetch("BTCUSDT").await.unwrap();
            assert!((0.5..30.0).contains(&m.spread_bps_med_60s));
            assert!((5_000.0..80_000.0).contains(&m.notional_60s_usd));
            assert!((0.0..5.0).contains(&m.refill_rate_5m));
            assert!((1.0..40.0).contains(&m.mid_range_bps_60s));
            assert!((0.0..120.0).contains(&m.score));
        }
    }
}
