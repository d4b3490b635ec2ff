//! Trade Book & Risk Management
//!
//! Virtual balance, trade lifecycle, stake sizing and session statistics
//! for trades opened from generated signals.

mod book;
mod config;
mod metrics;
mod risk;
mod sizing;

pub use book::{Settlement, TradeBook};
pub use config::{create_config_template, load_config, save_config, RiskConfig};
pub use metrics::{max_drawdown, InstrumentStats, SessionStats};
pub use risk::{RiskChecker, TradeRejection};
pub use sizing::{position_size, potential_payout, recommended_stake, StakeSizer, StakeTier};
