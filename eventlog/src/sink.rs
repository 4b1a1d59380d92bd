//! Append-only JSONL writer for the event log.
//!
//! Responsibilities:
//!   • Serialize one event per line, flushed after every write
//!   • Open the destination lazily on first emit, keep the handle open
//!   • Swallow open/write failures — emission is best-effort and must
//!     never abort the producer's tick loop
//!
//! Assumes exactly one writer process at a time; the filesystem's append
//! semantics are the only coordination.

use std::path::PathBuf;

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::event::Event;

/// Destination for screener events.
///
/// Production uses [`FileSink`]; tests swap in an in-memory implementation.
#[async_trait::async_trait]
pub trait EventSink: Send {
    async fn emit(&mut self, event: &Event);
}

/// Newline-delimited JSON sink backed by a single append-only file.
pub struct FileSink {
    path: PathBuf,
    file: Option<File>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    async fn ensure_open(&mut self) {
        if self.file.is_some() {
            return;
        }
        match OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .await
        {
            Ok(file) => self.file = Some(file),
            Err(error) => {
                warn!(path = %self.path.display(), %error, "unable to open events file");
            }
        }
    }
}

async fn write_line(file: &mut File, line: &[u8]) -> std::io::Result<()> {
    file.write_all(line).await?;
    file.flush().await
}

#[async_trait::async_trait]
impl EventSink for FileSink {
    async fn emit(&mut self, event: &Event) {
        self.ensure_open().await;
        let Some(file) = self.file.as_mut() else {
            return;
        };

        let mut line = match serde_json::to_vec(event) {
            Ok(line) => line,
            Err(error) => {
                warn!(%error, "failed to encode event");
                return;
            }
        };
        line.push(b'\n');

        if let Err(error) = write_line(file, &line).await {
            warn!(path = %self.path.display(), %error, "failed to write event");
            // Drop the handle; the next emit retries the open.
            self.file = None;
        }
    }
}
