//! Sampled market statistics and indicator readings

use serde::{Deserialize, Serialize};

/// Per-instrument market statistics for one generation cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCondition {
    pub instrument: String,
    pub volume: f64,
    pub volatility: f64,
    /// Roughly -1.0 to 1.0
    pub momentum: f64,
    /// 0 to 100
    pub strength: f64,
}

/// Technical-indicator snapshot for one instrument
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReading {
    /// RSI-like oscillator, 0 to 100 scale
    pub oscillator: f64,
    /// MACD-like trend value, roughly -1.0 to 1.0
    pub trend: f64,
    /// EMA alignment, 0.0 to 1.0
    pub ma_alignment: f64,
    /// Bollinger band position, 0.0 to 1.0
    pub band_position: f64,
}

/// Overall market trend label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

/// Market overview row (richer variant of the market statistics)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    pub instrument: String,
    pub trend: Trend,
    pub volume: u64,
    pub volatility: f64,
    pub strength: u8,
    pub momentum: f64,
    pub support: f64,
    pub resistance: f64,
}
