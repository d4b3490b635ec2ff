//! Simulated trades opened from signals

use crate::instrument::MarketSegment;
use crate::signal::{Direction, Expiration};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeStatus {
    Open,
    Win,
    Loss,
}

/// A binary-option position opened against the virtual balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: Uuid,
    pub signal_id: String,
    pub instrument: String,
    pub direction: Direction,
    pub segment: MarketSegment,
    pub expiration: Expiration,
    pub stake: Decimal,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Zero while open; payout on a win, `-stake` on a loss
    pub profit: Decimal,
    pub status: TradeStatus,
}

impl Trade {
    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.opened_at + self.expiration.duration()
    }

    /// Whether the expiration has fully elapsed at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now - self.opened_at >= self.expiration.duration()
    }

    /// Whole seconds left until expiry, floored at zero.
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at() - now).num_seconds().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn open_trade(opened_at: DateTime<Utc>) -> Trade {
        Trade {
            id: Uuid::new_v4(),
            signal_id: "signal-0-0".to_string(),
            instrument: "EUR/USD".to_string(),
            direction: Direction::Put,
            segment: MarketSegment::Otc,
            expiration: Expiration::TwoMinutes,
            stake: Decimal::from(20),
            opened_at,
            closed_at: None,
            profit: Decimal::ZERO,
            status: TradeStatus::Open,
        }
    }

    #[test]
    fn test_due_and_remaining() {
        let opened = Utc::now();
        let trade = open_trade(opened);

        assert!(trade.is_open());
        assert!(!trade.is_due(opened + Duration::seconds(119)));
        assert!(trade.is_due(opened + Duration::seconds(120)));
        assert_eq!(trade.seconds_remaining(opened + Duration::seconds(30)), 90);
        assert_eq!(trade.seconds_remaining(opened + Duration::seconds(500)), 0);
    }
}
