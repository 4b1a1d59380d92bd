use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Install the global tracing subscriber for one of the two runtimes.
///
/// Honors `RUST_LOG`; falls back to `info`. Safe to call more than once.
pub fn init_logger(service_name: &'static str) {
    LOGGER_INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt().with_env_filter(filter).with_target(true).init();

        tracing::info!(service = service_name, "logger initialized");
    });
}
