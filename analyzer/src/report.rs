//! Per-cycle summaries

use crate::config::OutputFormat;
use crate::session::{Event, Outcome};
use chrono::{DateTime, Utc};
use common::{SegmentFilter, Signal};
use rust_decimal::Decimal;
use serde::Serialize;
use signal_generation::{format_countdown, profit_potential, signal_strength};
use tracing::{error, info};

/// Leading signal of a cycle with its derived figures
#[derive(Debug, Clone, Serialize)]
pub struct SignalSummary {
    pub id: String,
    pub instrument: String,
    pub direction: String,
    pub probability: u8,
    pub strength: u8,
    pub potential: String,
    pub opens_in: String,
}

impl From<&Signal> for SignalSummary {
    fn from(signal: &Signal) -> Self {
        Self {
            id: signal.id.clone(),
            instrument: signal.instrument.clone(),
            direction: signal.direction.to_string(),
            probability: signal.probability,
            strength: signal_strength(signal),
            potential: profit_potential(signal).to_string(),
            opens_in: format_countdown(signal.seconds_to_open),
        }
    }
}

/// One line of output per outcome
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport<'a> {
    pub cycle: u64,
    pub at: DateTime<Utc>,
    pub filter: SegmentFilter,
    pub balance: Decimal,
    pub signals: usize,
    pub open_trades: usize,
    pub top_signal: Option<SignalSummary>,
    pub events: &'a [Event],
}

impl<'a> CycleReport<'a> {
    pub fn new(outcome: &'a Outcome) -> Self {
        let snapshot = &outcome.snapshot;
        Self {
            cycle: snapshot.cycle,
            at: snapshot.clock,
            filter: snapshot.filter,
            balance: snapshot.balance(),
            signals: snapshot.signals.len(),
            open_trades: snapshot.book.open_trades().count(),
            top_signal: snapshot.signals.first().map(SignalSummary::from),
            events: &outcome.events,
        }
    }
}

/// Emit `outcome` in the configured format.
pub fn emit(format: OutputFormat, outcome: &Outcome) {
    let report = CycleReport::new(outcome);
    match format {
        OutputFormat::Json => match serde_json::to_string(&report) {
            Ok(line) => println!("{}", line),
            Err(e) => error!(error = %e, "Failed to serialize cycle report"),
        },
        OutputFormat::Log => {
            let top = report
                .top_signal
                .as_ref()
                .map(|s| format!("{} {} {}%", s.instrument, s.direction, s.probability))
                .unwrap_or_else(|| "-".to_string());
            info!(
                cycle = report.cycle,
                filter = %report.filter,
                balance = %report.balance,
                signals = report.signals,
                open_trades = report.open_trades,
                top = %top,
                events = report.events.len(),
                "Cycle complete"
            );
        }
    }
}
