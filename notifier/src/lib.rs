pub mod config;
pub mod dispatch;
pub mod notifier;

pub use config::{BotConfig, CommandConfig, NotifyConfig};
pub use dispatch::run_dispatch;
pub use notifier::Notifier;
