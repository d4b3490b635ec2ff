//! Stake sizing
//!
//! Tiered recommended stakes by signal probability, plus fixed-percent
//! position sizing for manual entries.

use crate::risk::TradeRejection;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Fraction of balance recommended at or above a probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeTier {
    pub min_probability: u8,
    pub fraction: Decimal,
}

impl StakeTier {
    pub fn new(min_probability: u8, fraction: Decimal) -> Self {
        Self {
            min_probability,
            fraction,
        }
    }
}

/// Recommended stake calculator
#[derive(Debug, Clone, PartialEq)]
pub struct StakeSizer {
    /// Sorted by descending `min_probability`
    tiers: Vec<StakeTier>,
}

impl StakeSizer {
    pub fn new(mut tiers: Vec<StakeTier>) -> Self {
        tiers.sort_by(|a, b| b.min_probability.cmp(&a.min_probability));
        Self { tiers }
    }

    /// Fraction of balance for `probability`; zero if no tier applies.
    pub fn fraction_for(&self, probability: u8) -> Decimal {
        self.tiers
            .iter()
            .find(|tier| probability >= tier.min_probability)
            .map(|tier| tier.fraction)
            .unwrap_or(Decimal::ZERO)
    }

    /// Recommended stake for a signal of `probability`.
    pub fn recommended_stake(&self, balance: Decimal, probability: u8) -> Decimal {
        if balance <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (balance * self.fraction_for(probability)).round_dp(2)
    }
}

impl Default for StakeSizer {
    fn default() -> Self {
        Self::new(vec![
            StakeTier::new(95, dec!(0.05)),
            StakeTier::new(90, dec!(0.04)),
            StakeTier::new(85, dec!(0.03)),
            StakeTier::new(0, dec!(0.02)),
        ])
    }
}

/// Recommended stake with the default 5% / 4% / 3% / 2% tiers.
pub fn recommended_stake(balance: Decimal, probability: u8) -> Decimal {
    StakeSizer::default().recommended_stake(balance, probability)
}

/// Position size for a fixed risk percentage, rounded to cents.
pub fn position_size(
    balance: Decimal,
    risk_percent: u8,
    min_percent: u8,
    max_percent: u8,
) -> Result<Decimal, TradeRejection> {
    if !(min_percent..=max_percent).contains(&risk_percent) {
        return Err(TradeRejection::RiskPercentOutOfRange {
            percent: risk_percent,
            min: min_percent,
            max: max_percent,
        });
    }
    Ok((balance * Decimal::from(risk_percent) / dec!(100)).round_dp(2))
}

/// Profit a winning trade of `stake` would pay.
pub fn potential_payout(stake: Decimal, payout_rate: Decimal) -> Decimal {
    (stake * payout_rate).round_dp(2)
}
