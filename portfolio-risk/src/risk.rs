//! Pre-trade checks and rejection reasons

use common::Signal;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a trade request was refused. A rejected request changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum TradeRejection {
    #[error("insufficient balance: stake ${stake} exceeds balance ${balance}")]
    InsufficientBalance { stake: Decimal, balance: Decimal },

    #[error("stake must be positive, got ${stake}")]
    NonPositiveStake { stake: Decimal },

    #[error("signal {signal_id} is not tradable: {reason}")]
    SignalNotTradable { signal_id: String, reason: String },

    #[error("unknown signal {signal_id}")]
    UnknownSignal { signal_id: String },

    #[error("risk percent {percent}% outside {min}%..={max}%")]
    RiskPercentOutOfRange { percent: u8, min: u8, max: u8 },

    #[error("balance must not be negative, got ${balance}")]
    NegativeBalance { balance: Decimal },
}

/// Checks a trade request against the current balance and signal state
#[derive(Debug, Clone, Copy)]
pub struct RiskChecker {
    entry_window_secs: u32,
}

impl RiskChecker {
    pub fn new(entry_window_secs: u32) -> Self {
        Self { entry_window_secs }
    }

    pub fn entry_window_secs(&self) -> u32 {
        self.entry_window_secs
    }

    /// Check that `stake` can be paid out of `balance`.
    pub fn check_stake(&self, stake: Decimal, balance: Decimal) -> Result<(), TradeRejection> {
        if stake <= Decimal::ZERO {
            return Err(TradeRejection::NonPositiveStake { stake });
        }
        if stake > balance {
            return Err(TradeRejection::InsufficientBalance { stake, balance });
        }
        Ok(())
    }

    /// Check that the signal is active and inside its entry window.
    pub fn check_signal(&self, signal: &Signal) -> Result<(), TradeRejection> {
        if signal.is_tradable(self.entry_window_secs) {
            return Ok(());
        }

        let reason = if signal.seconds_to_open > self.entry_window_secs {
            format!(
                "entry opens in {}s (window {}s)",
                signal.seconds_to_open, self.entry_window_secs
            )
        } else {
            format!("status is {:?}", signal.status).to_lowercase()
        };

        Err(TradeRejection::SignalNotTradable {
            signal_id: signal.id.clone(),
            reason,
        })
    }

    /// Run every pre-trade check.
    pub fn check_trade(
        &self,
        signal: &Signal,
        stake: Decimal,
        balance: Decimal,
    ) -> Result<(), TradeRejection> {
        self.check_signal(signal)?;
        self.check_stake(stake, balance)
    }
}

impl Default for RiskChecker {
    fn default() -> Self {
        Self::new(60)
    }
}
