pub mod event;
pub mod sink;
pub mod tail;

pub use event::{Event, EventKind, Metrics, SnapshotRow};
pub use sink::{EventSink, FileSink};
pub use tail::EventTail;
