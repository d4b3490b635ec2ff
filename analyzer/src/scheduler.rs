//! Tick scheduler
//!
//! Runs the reducer on a single task: one tick per interval period plus any
//! actions sent through a [`SchedulerHandle`]. Ticks never overlap and every
//! state change goes through [`reduce`].

use crate::config::AnalyzerConfig;
use crate::session::{reduce, Action, Outcome, Snapshot};
use chrono::{DateTime, Utc};
use common::EntropySource;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

const ACTION_QUEUE: usize = 64;

/// Sends actions to a running scheduler and stops it
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    actions: mpsc::Sender<Action>,
    shutdown: watch::Sender<bool>,
}

impl SchedulerHandle {
    pub async fn send(&self, action: Action) -> anyhow::Result<()> {
        self.actions
            .send(action)
            .await
            .map_err(|_| anyhow::anyhow!("scheduler stopped"))
    }

    /// Send from a plain thread (e.g. a stdin reader).
    pub fn blocking_send(&self, action: Action) -> anyhow::Result<()> {
        self.actions
            .blocking_send(action)
            .map_err(|_| anyhow::anyhow!("scheduler stopped"))
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }
}

pub struct Scheduler {
    config: AnalyzerConfig,
    entropy: Box<dyn EntropySource + Send>,
    actions: mpsc::Receiver<Action>,
    shutdown: watch::Receiver<bool>,
}

impl Scheduler {
    pub fn new(
        config: AnalyzerConfig,
        entropy: Box<dyn EntropySource + Send>,
    ) -> (Self, SchedulerHandle) {
        let (action_tx, action_rx) = mpsc::channel(ACTION_QUEUE);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let scheduler = Self {
            config,
            entropy,
            actions: action_rx,
            shutdown: shutdown_rx,
        };
        let handle = SchedulerHandle {
            actions: action_tx,
            shutdown: shutdown_tx,
        };
        (scheduler, handle)
    }

    fn apply(&mut self, snapshot: &Snapshot, action: Action) -> Outcome {
        reduce(snapshot, action, &mut *self.entropy, &self.config)
    }

    /// Drive `snapshot` until shutdown or `max_cycles` ticks.
    ///
    /// Tick timestamps are `snapshot.clock` plus the elapsed tokio time, so
    /// a paused runtime yields reproducible clocks. Every outcome is passed
    /// to `on_outcome`. Returns the final snapshot.
    pub async fn run<F>(mut self, mut snapshot: Snapshot, mut on_outcome: F) -> Snapshot
    where
        F: FnMut(&Outcome),
    {
        let period = time::Duration::from_millis(self.config.scheduler.tick_millis);
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let origin = snapshot.clock;
        let started = Instant::now();
        let max_cycles = self.config.max_cycles;
        let mut actions_open = true;
        let mut shutdown_open = true;

        info!(
            tick_millis = self.config.scheduler.tick_millis,
            max_cycles,
            filter = %snapshot.filter,
            "Scheduler started"
        );

        loop {
            tokio::select! {
                biased;

                changed = self.shutdown.changed(), if shutdown_open => {
                    match changed {
                        Ok(()) if *self.shutdown.borrow() => {
                            info!(cycle = snapshot.cycle, "Shutdown requested");
                            break;
                        }
                        Ok(()) => {}
                        Err(_) => shutdown_open = false,
                    }
                }

                action = self.actions.recv(), if actions_open => {
                    match action {
                        Some(action) => {
                            debug!(?action, "Applying action");
                            let outcome = self.apply(&snapshot, action);
                            on_outcome(&outcome);
                            snapshot = outcome.snapshot;
                        }
                        None => actions_open = false,
                    }
                }

                _ = ticker.tick() => {
                    let now = clock_at(origin, started);
                    let outcome = self.apply(&snapshot, Action::Tick { now });
                    on_outcome(&outcome);
                    snapshot = outcome.snapshot;

                    if max_cycles > 0 && snapshot.cycle >= max_cycles {
                        info!(cycle = snapshot.cycle, "Cycle limit reached");
                        break;
                    }
                }
            }
        }

        snapshot
    }
}

fn clock_at(origin: DateTime<Utc>, started: Instant) -> DateTime<Utc> {
    let elapsed = started.elapsed();
    origin + chrono::Duration::milliseconds(elapsed.as_millis() as i64)
}
