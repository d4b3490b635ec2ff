use analyzer::{emit, entropy_for, load_config, parse_command, Scheduler, SchedulerHandle, Snapshot};
use anyhow::Result;
use chrono::Utc;
use portfolio_risk::SessionStats;
use std::io::BufRead;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::fmt;

#[tokio::main]
async fn main() -> Result<()> {
    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = load_config(path.as_deref())?;

    // Initialize logging
    fmt().with_max_level(config.tracing_level()?).init();

    info!(
        filter = %config.scheduler.segment,
        seed = ?config.scheduler.seed,
        max_cycles = config.max_cycles,
        "Pocket Option Analyzer starting"
    );

    let (scheduler, handle) = Scheduler::new(config.clone(), entropy_for(&config));

    let ctrl_c = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.shutdown();
        }
    });

    // Commands from stdin, one per line
    std::thread::spawn(move || read_commands(handle));

    let output = config.output;
    let snapshot = Snapshot::new(&config, Utc::now());
    let last = scheduler
        .run(snapshot, move |outcome| emit(output, outcome))
        .await;

    let stats = SessionStats::from_trades(
        last.book.trades(),
        config.risk.initial_balance,
        last.clock.date_naive(),
    );
    info!(
        cycles = last.cycle,
        balance = %last.balance(),
        trades = stats.total_trades,
        win_rate = stats.win_rate,
        total_profit = %stats.total_profit,
        "Session finished"
    );

    Ok(())
}

/// Forward stdin command lines to the scheduler until EOF or shutdown.
fn read_commands(handle: SchedulerHandle) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Failed to read command");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(action) => {
                if handle.blocking_send(action).is_err() {
                    break;
                }
            }
            Err(e) => warn!(error = %e, command = %line.trim(), "Ignoring command"),
        }
    }
}
