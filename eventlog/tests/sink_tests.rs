use std::fs;

use tempfile::TempDir;

use eventlog::{Event, EventKind, EventSink, FileSink, Metrics};

fn metrics(score: f64) -> Metrics {
    Metrics {
        spread_bps_med_60s: 1.5,
        notional_60s_usd: 25_000.0,
        refill_rate_5m: 0.8,
        mid_range_bps_60s: 6.0,
        score,
    }
}

#[tokio::test]
async fn writes_one_json_line_per_event() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.jsonl");

    let mut sink = FileSink::new(&path);
    sink.emit(&Event::transition(EventKind::GoOn, 10.0, "BTCUSDT", metrics(95.0)))
        .await;
    sink.emit(&Event::transition(EventKind::GoOff, 20.0, "BTCUSDT", metrics(40.0)))
        .await;

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: Event = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first.kind, EventKind::GoOn);
    assert_eq!(first.symbol.as_deref(), Some("BTCUSDT"));
    assert_eq!(first.metrics.unwrap().score, 95.0);

    let second: Event = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second.kind, EventKind::GoOff);
}

#[tokio::test]
async fn appends_across_writer_restarts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.jsonl");

    let mut sink = FileSink::new(&path);
    sink.emit(&Event::transition(EventKind::GoOn, 1.0, "AUSDT", metrics(90.0)))
        .await;
    drop(sink);

    let mut sink = FileSink::new(&path);
    sink.emit(&Event::transition(EventKind::GoOn, 2.0, "BUSDT", metrics(91.0)))
        .await;

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 2);
}

#[tokio::test]
async fn open_failure_is_swallowed_and_retried() {
    let dir = TempDir::new().unwrap();
    let missing_parent = dir.path().join("not-yet-here");
    let path = missing_parent.join("events.jsonl");

    let mut sink = FileSink::new(&path);
    // Parent directory missing: the emit must be a silent no-op.
    sink.emit(&Event::transition(EventKind::GoOn, 1.0, "AUSDT", metrics(90.0)))
        .await;
    assert!(!path.exists());

    // Once the operator fixes the directory, the same sink recovers.
    fs::create_dir(&missing_parent).unwrap();
    sink.emit(&Event::transition(EventKind::GoOn, 2.0, "BUSDT", metrics(92.0)))
        .await;

    let content = fs::read_to_string(&path).unwrap();
    let event: Event = serde_json::from_str(content.lines().next().unwrap()).unwrap();
    assert_eq!(event.symbol.as_deref(), Some("BUSDT"));
}
