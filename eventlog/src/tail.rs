//! Resilient follower for the event log file.
//!
//! Polls a path and yields decoded events in append order, indefinitely.
//! Tolerates the file not existing yet, being rotated or replaced (detected
//! through stable file identity, not the path), shrinking under the read
//! cursor, transient I/O errors, and malformed lines.

use std::io::{ErrorKind, SeekFrom};
use std::path::PathBuf;
use std::time::Duration;

use futures::Stream;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::event::Event;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Identity of the underlying file, so rotate-and-recreate at the same path
/// is detected as a different file. Device+inode where the platform has
/// them, creation time otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileId {
    #[cfg(unix)]
    dev: u64,
    #[cfg(unix)]
    ino: u64,
    #[cfg(not(unix))]
    created: Option<std::time::SystemTime>,
}

impl FileId {
    fn from_meta(meta: &std::fs::Metadata) -> Self {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            Self {
                dev: meta.dev(),
                ino: meta.ino(),
            }
        }
        #[cfg(not(unix))]
        {
            Self {
                created: meta.created().ok(),
            }
        }
    }
}

/// Outcome of one poll cycle.
enum Polled {
    /// A record was decoded; poll again immediately.
    Event(Event),
    /// A malformed line was consumed; poll again immediately.
    Skipped,
    /// No complete line available yet; sleep before the next cycle.
    Idle,
}

/// Incremental reader over the event log.
///
/// The sequence never ends on its own: [`EventTail::next_event`] waits as
/// long as it takes for the next record, and cancellation is the consumer's
/// job (drop the tail, or race `next_event` against a shutdown signal).
/// Dropping the tail releases the underlying file handle.
pub struct EventTail {
    path: PathBuf,
    poll_interval: Duration,
    file: Option<File>,
    id: Option<FileId>,
    offset: u64,
}

impl EventTail {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_poll_interval(path, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(path: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        Self {
            path: path.into(),
            poll_interval,
            file: None,
            id: None,
            offset: 0,
        }
    }

    /// Next decoded event in append order.
    ///
    /// Cancel-safe: the read cursor only advances once a complete line has
    /// been consumed, so a dropped call never loses a record.
    pub async fn next_event(&mut self) -> Event {
        loop {
            match self.poll_once().await {
                Ok(Polled::Event(event)) => return event,
                Ok(Polled::Skipped) => continue,
                Ok(Polled::Idle) => sleep(self.poll_interval).await,
                Err(error) => {
                    // NotFound just means the writer hasn't created the file
                    // yet (or rotation is mid-flight); stay quiet for that.
                    if error.kind() != ErrorKind::NotFound {
                        warn!(path = %self.path.display(), %error, "tail error");
                    }
                    self.file = None;
                    self.id = None;
                    sleep(self.poll_interval).await;
                }
            }
        }
    }

    /// One cycle of the tailing protocol: stat, resolve identity, reopen at
    /// zero on identity change, rewind on truncation, then try to read a
    /// single complete line at the stored offset.
    async fn poll_once(&mut self) -> std::io::Result<Polled> {
        let meta = tokio::fs::metadata(&self.path).await?;
        let id = FileId::from_meta(&meta);

        if self.id != Some(id) || self.file.is_none() {
            self.file = Some(File::open(&self.path).await?);
            self.id = Some(id);
            self.offset = 0;
            info!(path = %self.path.display(), "opened events file");
        }

        if meta.len() < self.offset {
            self.offset = 0;
        }

        let Some(file) = self.file.as_mut() else {
            return Ok(Polled::Idle);
        };

        file.seek(SeekFrom::Start(self.offset)).await?;
        let Some(raw) = read_complete_line(file).await? else {
            return Ok(Polled::Idle);
        };

        self.offset += raw.len() as u64 + 1;

        match serde_json::from_slice::<Event>(&raw) {
            Ok(event) => Ok(Polled::Event(event)),
            Err(error) => {
                warn!(
                    line = %String::from_utf8_lossy(&raw).trim(),
                    %error,
                    "skipping malformed event line"
                );
                Ok(Polled::Skipped)
            }
        }
    }

    /// Adapt the tail into an infinite `futures::Stream` of events.
    pub fn into_stream(self) -> impl Stream<Item = Event> {
        futures::stream::unfold(self, |mut tail| async move {
            let event = tail.next_event().await;
            Some((event, tail))
        })
    }
}

/// Read bytes from the current position up to (excluding) the next newline.
///
/// Returns `None` when EOF arrives first — a partially written record stays
/// untouched until its newline lands, so the caller's offset never splits a
/// line.
async fn read_complete_line(file: &mut File) -> std::io::Result<Option<Vec<u8>>> {
    let mut line = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = file.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        if let Some(pos) = chunk[..n].iter().position(|&b| b == b'\n') {
            line.extend_from_slice(&chunk[..pos]);
            return Ok(Some(line));
        }
        line.extend_from_slice(&chunk[..n]);
    }
}
