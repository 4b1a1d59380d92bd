pub mod config;
pub mod provider;
pub mod screener;
pub mod state;

pub use config::ScreenerConfig;
pub use provider::{MetricsProvider, SimulatedProvider};
pub use screener::Screener;
pub use state::SymbolState;
