//! Trading signal types

use crate::instrument::MarketSegment;
use crate::market::IndicatorReading;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cosmetic strategy labels attached to published signals.
pub const STRATEGY_LABELS: [&str; 8] = [
    "AI Multi-Factor",
    "RSI Divergence + MACD",
    "Smart Bollinger Breakout",
    "EMA Crossover Pro",
    "Volume Surge Detection",
    "Trend Momentum Fusion",
    "Support/Resistance AI",
    "Pattern Recognition Pro",
];

/// Binary option direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Up-bet
    Call,
    /// Down-bet
    Put,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Call => f.pad("CALL"),
            Direction::Put => f.pad("PUT"),
        }
    }
}

/// Expiration bucket of a signal or trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expiration {
    OneMinute,
    TwoMinutes,
    ThreeMinutes,
}

impl Expiration {
    pub fn minutes(&self) -> i64 {
        match self {
            Expiration::OneMinute => 1,
            Expiration::TwoMinutes => 2,
            Expiration::ThreeMinutes => 3,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(self.minutes())
    }
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{}m", self.minutes()))
    }
}

/// Confidence tier derived from probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

/// Lifecycle status of a published signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStatus {
    Active,
    Waiting,
}

/// A published trading signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: String,
    pub instrument: String,
    pub direction: Direction,
    pub expiration: Expiration,
    /// Percent, within the configured clamp range
    pub probability: u8,
    pub confidence: ConfidenceTier,
    pub status: SignalStatus,
    pub strategy: String,
    pub segment: MarketSegment,
    pub indicators: IndicatorReading,
    pub generated_at: DateTime<Utc>,
    /// Seconds until the entry opens
    pub seconds_to_open: u32,
}

impl Signal {
    /// Whether a trade may be opened on this signal now.
    ///
    /// Only active signals whose countdown is inside the entry window qualify.
    pub fn is_tradable(&self, entry_window_secs: u32) -> bool {
        self.status == SignalStatus::Active && self.seconds_to_open <= entry_window_secs
    }

    /// Copy of this signal with the countdown advanced by `elapsed_secs`.
    pub fn with_elapsed(&self, elapsed_secs: u32) -> Self {
        Self {
            seconds_to_open: self.seconds_to_open.saturating_sub(elapsed_secs),
            ..self.clone()
        }
    }
}
