//! Session state and its reducer
//!
//! A [`Snapshot`] is never mutated in place. Every tick or user action goes
//! through [`reduce`], which returns a new snapshot together with the events
//! that produced it.

use crate::config::AnalyzerConfig;
use chrono::{DateTime, Duration, Utc};
use common::{EntropySource, MarketData, SegmentFilter, Signal, Trade};
use portfolio_risk::{position_size, Settlement, StakeSizer, TradeBook, TradeRejection};
use rust_decimal::Decimal;
use serde::Serialize;
use signal_generation::{
    generate_market_data, segment_counts, strong_markets, QualityScorer, SignalPipeline,
    STRONG_MARKET_STRENGTH,
};
use tracing::{debug, warn};

/// Everything the dashboard shows at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub filter: SegmentFilter,
    pub auto_update: bool,
    pub risk_percent: u8,
    pub signals: Vec<Signal>,
    pub market_data: Vec<MarketData>,
    pub book: TradeBook,
    /// Time of the latest tick; new trades open at this instant
    pub clock: DateTime<Utc>,
    pub last_signal_refresh: Option<DateTime<Utc>>,
    pub last_market_refresh: Option<DateTime<Utc>>,
    /// Instant the signal countdowns were last brought up to date
    pub countdown_synced_at: Option<DateTime<Utc>>,
    /// Ticks processed so far
    pub cycle: u64,
}

impl Snapshot {
    /// Fresh session with no signals yet; the first tick generates them.
    pub fn new(config: &AnalyzerConfig, now: DateTime<Utc>) -> Self {
        Self {
            filter: config.scheduler.segment,
            auto_update: config.scheduler.auto_update,
            risk_percent: config.risk.risk_percent,
            signals: Vec::new(),
            market_data: Vec::new(),
            book: TradeBook::new(&config.risk),
            clock: now,
            last_signal_refresh: None,
            last_market_refresh: None,
            countdown_synced_at: None,
            cycle: 0,
        }
    }

    pub fn balance(&self) -> Decimal {
        self.book.balance()
    }

    pub fn signal(&self, signal_id: &str) -> Option<&Signal> {
        self.signals.iter().find(|s| s.id == signal_id)
    }

    /// Signals currently inside their entry window.
    pub fn tradable_signals(&self, entry_window_secs: u32) -> impl Iterator<Item = &Signal> {
        self.signals
            .iter()
            .filter(move |s| s.is_tradable(entry_window_secs))
    }

    pub fn strong_markets(&self) -> Vec<MarketData> {
        strong_markets(&self.market_data, STRONG_MARKET_STRENGTH)
    }

    /// Stake for a manual trade at the session's risk percent.
    pub fn position_size(&self, config: &AnalyzerConfig) -> Result<Decimal, TradeRejection> {
        position_size(
            self.book.balance(),
            self.risk_percent,
            config.risk.min_risk_percent,
            config.risk.max_risk_percent,
        )
    }
}

/// Inputs to the reducer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Tick { now: DateTime<Utc> },
    SelectSegment { filter: SegmentFilter },
    SetAutoUpdate { enabled: bool },
    SetRiskPercent { percent: u8 },
    SetBalance { balance: Decimal },
    /// `stake: None` uses the recommended stake for the signal
    OpenTrade { signal_id: String, stake: Option<Decimal> },
}

/// What changed while reducing one action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    SignalsRefreshed { published: usize, classic: usize, otc: usize },
    CountdownsAdvanced { seconds: u32 },
    MarketDataRefreshed { rows: usize, strong: usize },
    TradeOpened { trade: Trade },
    TradeSettled { settlement: Settlement },
    SegmentSelected { filter: SegmentFilter },
    AutoUpdateChanged { enabled: bool },
    RiskPercentChanged { percent: u8 },
    BalanceChanged { balance: Decimal },
    Rejected { rejection: TradeRejection },
}

/// Result of [`reduce`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub snapshot: Snapshot,
    pub events: Vec<Event>,
}

impl Outcome {
    pub fn rejections(&self) -> impl Iterator<Item = &TradeRejection> {
        self.events.iter().filter_map(|e| match e {
            Event::Rejected { rejection } => Some(rejection),
            _ => None,
        })
    }
}

fn pipeline(config: &AnalyzerConfig) -> SignalPipeline {
    SignalPipeline::new(config.pipeline.clone())
        .with_scorer(QualityScorer::new(config.scoring.clone()))
}

fn refresh_due(last: Option<DateTime<Utc>>, now: DateTime<Utc>, every_secs: u64) -> bool {
    match last {
        None => true,
        Some(last) => now - last >= Duration::seconds(every_secs as i64),
    }
}

/// Apply `action` to `snapshot`, returning the next snapshot.
pub fn reduce(
    snapshot: &Snapshot,
    action: Action,
    entropy: &mut dyn EntropySource,
    config: &AnalyzerConfig,
) -> Outcome {
    let mut next = snapshot.clone();
    let mut events = Vec::new();

    match action {
        Action::Tick { now } => {
            tick(&mut next, now, entropy, config, &mut events);
        }
        Action::SelectSegment { filter } => {
            next.filter = filter;
            events.push(Event::SegmentSelected { filter });
            if next.auto_update {
                let now = next.clock;
                refresh_signals(&mut next, now, entropy, config, &mut events);
            } else {
                // Frozen signals outside the new segment are no longer shown
                next.signals.retain(|s| filter.admits(s.segment));
            }
        }
        Action::SetAutoUpdate { enabled } => {
            next.auto_update = enabled;
            events.push(Event::AutoUpdateChanged { enabled });
        }
        Action::SetRiskPercent { percent } => {
            let (min, max) = (config.risk.min_risk_percent, config.risk.max_risk_percent);
            if (min..=max).contains(&percent) {
                next.risk_percent = percent;
                events.push(Event::RiskPercentChanged { percent });
            } else {
                let rejection = TradeRejection::RiskPercentOutOfRange { percent, min, max };
                warn!(reason = %rejection, "Risk percent rejected");
                events.push(Event::Rejected { rejection });
            }
        }
        Action::SetBalance { balance } => match next.book.set_balance(balance) {
            Ok(()) => events.push(Event::BalanceChanged { balance }),
            Err(rejection) => {
                warn!(reason = %rejection, "Balance change rejected");
                events.push(Event::Rejected { rejection });
            }
        },
        Action::OpenTrade { signal_id, stake } => {
            open_trade(&mut next, &signal_id, stake, config, &mut events);
        }
    }

    Outcome {
        snapshot: next,
        events,
    }
}

fn tick(
    next: &mut Snapshot,
    now: DateTime<Utc>,
    entropy: &mut dyn EntropySource,
    config: &AnalyzerConfig,
    events: &mut Vec<Event>,
) {
    next.cycle += 1;
    next.clock = now;

    for settlement in next.book.settle_due(now, entropy) {
        events.push(Event::TradeSettled { settlement });
    }

    if !next.auto_update {
        // Frozen time does not count against the countdowns
        next.countdown_synced_at = Some(now);
        debug!(cycle = next.cycle, "Auto-update off, signals frozen");
        return;
    }

    let scheduler = &config.scheduler;
    if refresh_due(next.last_signal_refresh, now, scheduler.signal_refresh_secs) {
        refresh_signals(next, now, entropy, config, events);
    } else {
        advance_countdowns(next, now, events);
    }

    if refresh_due(next.last_market_refresh, now, scheduler.market_refresh_secs) {
        refresh_market_data(next, now, entropy, events);
    }
}

/// Decrement countdowns by the whole seconds elapsed since the last sync.
/// The sub-second remainder carries over to the next tick.
fn advance_countdowns(next: &mut Snapshot, now: DateTime<Utc>, events: &mut Vec<Event>) {
    let synced = next.countdown_synced_at.unwrap_or(now);
    let elapsed = (now - synced).num_seconds();
    if elapsed <= 0 {
        return;
    }

    let seconds = u32::try_from(elapsed).unwrap_or(u32::MAX);
    next.signals = next.signals.iter().map(|s| s.with_elapsed(seconds)).collect();
    next.countdown_synced_at = Some(synced + Duration::seconds(elapsed));
    events.push(Event::CountdownsAdvanced { seconds });
}

fn refresh_signals(
    next: &mut Snapshot,
    now: DateTime<Utc>,
    entropy: &mut dyn EntropySource,
    config: &AnalyzerConfig,
    events: &mut Vec<Event>,
) {
    next.signals = pipeline(config).generate(next.filter, now, entropy);
    next.last_signal_refresh = Some(now);
    next.countdown_synced_at = Some(now);

    let (classic, otc) = segment_counts(&next.signals);
    events.push(Event::SignalsRefreshed {
        published: next.signals.len(),
        classic,
        otc,
    });
}

fn refresh_market_data(
    next: &mut Snapshot,
    now: DateTime<Utc>,
    entropy: &mut dyn EntropySource,
    events: &mut Vec<Event>,
) {
    next.market_data = generate_market_data(next.filter, entropy);
    next.last_market_refresh = Some(now);

    events.push(Event::MarketDataRefreshed {
        rows: next.market_data.len(),
        strong: next.strong_markets().len(),
    });
}

fn open_trade(
    next: &mut Snapshot,
    signal_id: &str,
    stake: Option<Decimal>,
    config: &AnalyzerConfig,
    events: &mut Vec<Event>,
) {
    let Some(signal) = next.signal(signal_id).cloned() else {
        let rejection = TradeRejection::UnknownSignal {
            signal_id: signal_id.to_string(),
        };
        warn!(reason = %rejection, "Trade rejected");
        events.push(Event::Rejected { rejection });
        return;
    };

    let stake = stake.unwrap_or_else(|| {
        StakeSizer::new(config.risk.stake_tiers.clone())
            .recommended_stake(next.book.balance(), signal.probability)
    });

    match next.book.open_trade(&signal, stake, next.clock) {
        Ok(trade) => events.push(Event::TradeOpened { trade }),
        Err(rejection) => events.push(Event::Rejected { rejection }),
    }
}
