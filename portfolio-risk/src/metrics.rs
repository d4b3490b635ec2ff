//! Session statistics over the trade history

use chrono::NaiveDate;
use common::{Trade, TradeStatus};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-instrument totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentStats {
    pub instrument: String,
    pub trades: usize,
    pub wins: usize,
    pub profit: Decimal,
}

/// Aggregate figures for one trading session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub open: usize,

    /// Wins as a percentage of closed trades
    pub win_rate: f64,

    /// Realized profit over all closed trades
    pub total_profit: Decimal,

    /// Realized profit of trades opened on `today`
    pub today_profit: Decimal,
    pub today_trades: usize,

    /// Largest peak-to-trough fall of the closed-trade equity curve (USD)
    pub max_drawdown: Decimal,

    /// Total profit as a percentage of the initial balance
    pub roi: Decimal,

    /// Sorted by profit, highest first
    pub by_instrument: Vec<InstrumentStats>,
}

impl SessionStats {
    pub fn from_trades(trades: &[Trade], initial_balance: Decimal, today: NaiveDate) -> Self {
        let mut wins = 0;
        let mut losses = 0;
        let mut open = 0;
        let mut today_profit = Decimal::ZERO;
        let mut today_trades = 0;
        let mut per_instrument: HashMap<&str, InstrumentStats> = HashMap::new();

        for trade in trades {
            match trade.status {
                TradeStatus::Win => wins += 1,
                TradeStatus::Loss => losses += 1,
                TradeStatus::Open => open += 1,
            }

            if trade.opened_at.date_naive() == today {
                today_trades += 1;
                today_profit += trade.profit;
            }

            let entry = per_instrument
                .entry(trade.instrument.as_str())
                .or_insert_with(|| InstrumentStats {
                    instrument: trade.instrument.clone(),
                    trades: 0,
                    wins: 0,
                    profit: Decimal::ZERO,
                });
            entry.trades += 1;
            entry.profit += trade.profit;
            if trade.status == TradeStatus::Win {
                entry.wins += 1;
            }
        }

        let closed = wins + losses;
        let win_rate = if closed > 0 {
            wins as f64 / closed as f64 * 100.0
        } else {
            0.0
        };

        // Open trades carry zero profit, so summing everything is the realized total
        let total_profit: Decimal = trades.iter().map(|t| t.profit).sum();

        let roi = if initial_balance > Decimal::ZERO {
            (total_profit / initial_balance * dec!(100)).round_dp(2)
        } else {
            Decimal::ZERO
        };

        let mut by_instrument: Vec<InstrumentStats> = per_instrument.into_values().collect();
        by_instrument.sort_by(|a, b| {
            b.profit
                .cmp(&a.profit)
                .then_with(|| a.instrument.cmp(&b.instrument))
        });

        Self {
            total_trades: trades.len(),
            wins,
            losses,
            open,
            win_rate,
            total_profit,
            today_profit,
            today_trades,
            max_drawdown: max_drawdown(trades),
            roi,
            by_instrument,
        }
    }
}

/// Largest drop from a running peak of cumulative realized profit,
/// in settlement order.
pub fn max_drawdown(trades: &[Trade]) -> Decimal {
    let mut closed: Vec<&Trade> = trades.iter().filter(|t| t.closed_at.is_some()).collect();
    closed.sort_by_key(|t| t.closed_at);

    let mut equity = Decimal::ZERO;
    let mut peak = Decimal::ZERO;
    let mut worst = Decimal::ZERO;

    for trade in closed {
        equity += trade.profit;
        peak = peak.max(equity);
        worst = worst.max(peak - equity);
    }

    worst
}
