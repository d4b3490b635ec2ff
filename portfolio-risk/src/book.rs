//! Trade book
//!
//! Owns the virtual balance and every trade opened against it. Trades are
//! opened from tradable signals and settled once their expiration elapses.

use crate::config::RiskConfig;
use crate::risk::{RiskChecker, TradeRejection};
use crate::sizing::potential_payout;
use chrono::{DateTime, Utc};
use common::{EntropySource, Signal, Trade, TradeStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

/// Outcome of settling one trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub trade_id: Uuid,
    pub instrument: String,
    pub status: TradeStatus,
    pub stake: Decimal,
    pub profit: Decimal,
    /// Balance after crediting this trade
    pub balance: Decimal,
}

/// Virtual balance plus trade history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeBook {
    balance: Decimal,
    trades: Vec<Trade>,
    payout_rate: Decimal,
    win_probability: f64,
    entry_window_secs: u32,
}

impl TradeBook {
    pub fn new(config: &RiskConfig) -> Self {
        Self {
            balance: config.initial_balance,
            trades: Vec::new(),
            payout_rate: config.payout_rate,
            win_probability: config.settlement_win_probability,
            entry_window_secs: config.entry_window_secs,
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// All trades, oldest first
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn open_trades(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| t.is_open())
    }

    pub fn closed_trades(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| !t.is_open())
    }

    pub fn get(&self, trade_id: Uuid) -> Option<&Trade> {
        self.trades.iter().find(|t| t.id == trade_id)
    }

    pub fn payout_rate(&self) -> Decimal {
        self.payout_rate
    }

    /// Overwrite the balance. Open stakes already deducted stay deducted.
    pub fn set_balance(&mut self, balance: Decimal) -> Result<(), TradeRejection> {
        if balance < Decimal::ZERO {
            return Err(TradeRejection::NegativeBalance { balance });
        }
        self.balance = balance;
        Ok(())
    }

    /// Open a trade on `signal` for `stake`.
    ///
    /// On success the stake is deducted and the new open trade is returned.
    /// A rejection leaves the book untouched.
    pub fn open_trade(
        &mut self,
        signal: &Signal,
        stake: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Trade, TradeRejection> {
        let checker = RiskChecker::new(self.entry_window_secs);
        if let Err(rejection) = checker.check_trade(signal, stake, self.balance) {
            warn!(
                signal_id = %signal.id,
                instrument = %signal.instrument,
                stake = %stake,
                balance = %self.balance,
                reason = %rejection,
                "Trade rejected"
            );
            return Err(rejection);
        }

        let trade = Trade {
            id: Uuid::new_v4(),
            signal_id: signal.id.clone(),
            instrument: signal.instrument.clone(),
            direction: signal.direction,
            segment: signal.segment,
            expiration: signal.expiration,
            stake,
            opened_at: now,
            closed_at: None,
            profit: Decimal::ZERO,
            status: TradeStatus::Open,
        };

        self.balance -= stake;
        self.trades.push(trade.clone());

        info!(
            trade_id = %trade.id,
            instrument = %trade.instrument,
            direction = %trade.direction,
            expiration = %trade.expiration,
            stake = %stake,
            balance = %self.balance,
            "Trade opened"
        );

        Ok(trade)
    }

    /// Settle every open trade whose expiration has elapsed at `now`.
    ///
    /// Each trade draws one value from `entropy`; closed trades are never
    /// revisited, so a trade is credited at most once.
    pub fn settle_due(
        &mut self,
        now: DateTime<Utc>,
        entropy: &mut dyn EntropySource,
    ) -> Vec<Settlement> {
        let mut settlements = Vec::new();

        for trade in self.trades.iter_mut() {
            if !trade.is_open() || !trade.is_due(now) {
                continue;
            }

            let won = entropy.chance(self.win_probability);
            let (status, profit) = if won {
                (TradeStatus::Win, potential_payout(trade.stake, self.payout_rate))
            } else {
                (TradeStatus::Loss, -trade.stake)
            };

            trade.status = status;
            trade.profit = profit;
            trade.closed_at = Some(now);
            self.balance += trade.stake + profit;

            info!(
                trade_id = %trade.id,
                instrument = %trade.instrument,
                status = ?status,
                profit = %profit,
                balance = %self.balance,
                "Trade settled"
            );

            settlements.push(Settlement {
                trade_id: trade.id,
                instrument: trade.instrument.clone(),
                status,
                stake: trade.stake,
                profit,
                balance: self.balance,
            });
        }

        settlements
    }

    /// Seconds until `trade_id` expires, `None` if unknown or already closed.
    pub fn seconds_remaining(&self, trade_id: Uuid, now: DateTime<Utc>) -> Option<i64> {
        self.get(trade_id)
            .filter(|t| t.is_open())
            .map(|t| t.seconds_remaining(now))
    }
}

impl Default for TradeBook {
    fn default() -> Self {
        Self::new(&RiskConfig::default())
    }
}
