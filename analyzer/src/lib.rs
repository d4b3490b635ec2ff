//! Pocket Option Analyzer session engine
//!
//! Holds the dashboard state as immutable snapshots, advances it with a
//! pure reducer and drives the reducer from a tokio tick scheduler.

pub mod command;
pub mod config;
pub mod report;
pub mod scheduler;
pub mod session;

pub use command::parse_command;
pub use config::{load_config, save_config, AnalyzerConfig, OutputFormat, SchedulerConfig};
pub use report::{emit, CycleReport, SignalSummary};
pub use scheduler::{Scheduler, SchedulerHandle};
pub use session::{reduce, Action, Event, Outcome, Snapshot};

use common::{EntropySource, SeededEntropy, SystemEntropy};

/// Entropy for a run: seeded when the config fixes a seed.
pub fn entropy_for(config: &AnalyzerConfig) -> Box<dyn EntropySource + Send> {
    match config.scheduler.seed {
        Some(seed) => Box::new(SeededEntropy::new(seed)),
        None => Box::new(SystemEntropy::new()),
    }
}
