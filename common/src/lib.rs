//! Shared domain types for the analyzer workspace.
//!
//! Instruments and their market segments, sampled market/indicator data,
//! signals, trades, and the entropy abstraction every sampler draws from.

pub mod entropy;
pub mod instrument;
pub mod market;
pub mod signal;
pub mod trade;

pub use chrono::{DateTime, Duration, Utc};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;

pub use entropy::{EntropySource, ScriptedEntropy, SeededEntropy, SystemEntropy};
pub use instrument::{
    Instrument, MarketSegment, SegmentFilter, Universe, ALL_INSTRUMENTS, TOP_INSTRUMENTS,
};
pub use market::{IndicatorReading, MarketCondition, MarketData, Trend};
pub use signal::{ConfidenceTier, Direction, Expiration, Signal, SignalStatus, STRATEGY_LABELS};
pub use trade::{Trade, TradeStatus};

/// Round `value` to `decimals` places, halves toward positive infinity
/// (`-0.125` to two places is `-0.12`).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}
