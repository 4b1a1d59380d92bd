//! Wiring for the two runtimes. Everything here is glue: config in,
//! components constructed, loops run until ctrl-c.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{Mutex, mpsc, watch};
use tracing::info;

use eventlog::{EventTail, FileSink};
use notifier::{BotConfig, Notifier, run_dispatch};
use screener::{Screener, ScreenerConfig, SimulatedProvider};

pub async fn run_screen(config_path: &Path) -> anyhow::Result<()> {
    let config = ScreenerConfig::load(config_path)?;

    let sink = FileSink::new(&config.events.path);
    let mut screener = Screener::new(&config, SimulatedProvider, sink)?;

    tokio::select! {
        _ = screener.run() => {}
        _ = tokio::signal::ctrl_c() => info!("screener stopped"),
    }
    Ok(())
}

pub async fn run_notify(config_path: &Path) -> anyhow::Result<()> {
    let config = BotConfig::load(config_path)?;

    let notifier = Arc::new(Mutex::new(Notifier::new(config.notify.clone())));
    let (alerts_tx, mut alerts_rx) = mpsc::channel::<String>(64);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let tail = EventTail::new(&config.events.path);
    let worker = tokio::spawn(run_dispatch(
        tail,
        Arc::clone(&notifier),
        alerts_tx,
        shutdown_rx,
    ));

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    println!("commands: top [N] | status | mute SYMBOL | unmute SYMBOL | quit");

    loop {
        tokio::select! {
            Some(alert) = alerts_rx.recv() => {
                println!("{alert}\n");
            }
            line = stdin.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if !handle_command(&line, &notifier, config.commands.top_n_default).await {
                            break;
                        }
                    }
                    // stdin closed or unreadable: keep printing alerts only.
                    _ => break,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let _ = shutdown_tx.send(true);
    worker
        .await
        .context("event dispatch worker panicked")?;
    info!("notifier stopped");
    Ok(())
}

/// Returns false when the user asked to quit.
async fn handle_command(line: &str, notifier: &Arc<Mutex<Notifier>>, top_n_default: usize) -> bool {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return true;
    };
    let arg = parts.next();

    match verb {
        "top" => {
            let n = arg.and_then(|a| a.parse().ok()).unwrap_or(top_n_default);
            let rows = notifier.lock().await.get_top(n);
            if rows.is_empty() {
                println!("no snapshot yet");
            } else {
                for row in rows {
                    println!(
                        "{}: score={:.1}, spread={:.1}bps, notional=${:.0}, refill={:.2}",
                        row.symbol,
                        row.metrics.score,
                        row.metrics.spread_bps_med_60s,
                        row.metrics.notional_60s_usd,
                        row.metrics.refill_rate_5m,
                    );
                }
            }
        }
        "status" => {
            let count = notifier.lock().await.active_go_count();
            println!("active GO: {count}");
        }
        "mute" => match arg {
            Some(symbol) => {
                notifier.lock().await.mute(symbol);
                println!("muted {}", symbol.to_uppercase());
            }
            None => println!("usage: mute SYMBOL"),
        },
        "unmute" => match arg {
            Some(symbol) => {
                notifier.lock().await.unmute(symbol);
                println!("unmuted {}", symbol.to_uppercase());
            }
            None => println!("usage: unmute SYMBOL"),
        },
        "quit" | "exit" => return false,
        other => println!("unknown command: {other}"),
    }
    true
}
