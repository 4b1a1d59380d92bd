//! Bridges the tailed event stream into the notifier.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, watch};
use tracing::info;

use eventlog::tail::EventTail;

use crate::notifier::Notifier;

/// Pump decoded events through the notifier, pushing rendered alerts to
/// `alerts_tx`, until the shutdown flag flips or the front end goes away.
///
/// The notifier is shared with the command front end, so every mutation
/// happens under the same lock. Returning drops the tail and with it the
/// log file handle.
pub async fn run_dispatch(
    mut tail: EventTail,
    notifier: Arc<Mutex<Notifier>>,
    alerts_tx: mpsc::Sender<String>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let event = tokio::select! {
            _ = shutdown.changed() => break,
            event = tail.next_event() => event,
        };

        let message = {
            let mut guard = notifier.lock().await;
            guard.process_event(&event)
        };

        if let Some(message) = message {
            if alerts_tx.send(message).await.is_err() {
                break;
            }
        }
    }

    info!("event dispatch stopped");
}
