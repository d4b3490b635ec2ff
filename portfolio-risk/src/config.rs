//! Risk management configuration

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::sizing::StakeTier;

/// Trade book and stake sizing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Starting virtual balance (USD)
    #[serde(default = "default_initial_balance")]
    pub initial_balance: Decimal,

    /// Profit on a winning trade as a fraction of stake
    #[serde(default = "default_payout_rate")]
    pub payout_rate: Decimal,

    /// Probability that a settled trade wins.
    /// Independent of the signal's stated probability.
    #[serde(default = "default_settlement_win_probability")]
    pub settlement_win_probability: f64,

    /// A signal can be traded once its countdown is at or below this
    #[serde(default = "default_entry_window_secs")]
    pub entry_window_secs: u32,

    /// Percent of balance used for manual position sizing
    #[serde(default = "default_risk_percent")]
    pub risk_percent: u8,

    #[serde(default = "default_min_risk_percent")]
    pub min_risk_percent: u8,

    #[serde(default = "default_max_risk_percent")]
    pub max_risk_percent: u8,

    /// Recommended stake tiers, checked from the highest probability down
    #[serde(default = "default_stake_tiers")]
    pub stake_tiers: Vec<StakeTier>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            initial_balance: default_initial_balance(),
            payout_rate: default_payout_rate(),
            settlement_win_probability: default_settlement_win_probability(),
            entry_window_secs: default_entry_window_secs(),
            risk_percent: default_risk_percent(),
            min_risk_percent: default_min_risk_percent(),
            max_risk_percent: default_max_risk_percent(),
            stake_tiers: default_stake_tiers(),
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.initial_balance < Decimal::ZERO {
            anyhow::bail!("initial balance must not be negative");
        }
        if self.payout_rate <= Decimal::ZERO {
            anyhow::bail!("payout rate must be positive");
        }
        if !(0.0..=1.0).contains(&self.settlement_win_probability) {
            anyhow::bail!(
                "settlement win probability {} outside [0, 1]",
                self.settlement_win_probability
            );
        }
        if self.min_risk_percent == 0 || self.min_risk_percent > self.max_risk_percent {
            anyhow::bail!(
                "invalid risk percent range {}..={}",
                self.min_risk_percent,
                self.max_risk_percent
            );
        }
        if !(self.min_risk_percent..=self.max_risk_percent).contains(&self.risk_percent) {
            anyhow::bail!("risk percent {} outside allowed range", self.risk_percent);
        }
        if self.stake_tiers.is_empty() {
            anyhow::bail!("at least one stake tier is required");
        }
        Ok(())
    }
}

fn default_initial_balance() -> Decimal {
    dec!(1000)
}

fn default_payout_rate() -> Decimal {
    dec!(0.8)
}

fn default_settlement_win_probability() -> f64 {
    0.7
}

fn default_entry_window_secs() -> u32 {
    60
}

fn default_risk_percent() -> u8 {
    2
}

fn default_min_risk_percent() -> u8 {
    1
}

fn default_max_risk_percent() -> u8 {
    10
}

fn default_stake_tiers() -> Vec<StakeTier> {
    vec![
        StakeTier::new(95, dec!(0.05)),
        StakeTier::new(90, dec!(0.04)),
        StakeTier::new(85, dec!(0.03)),
        StakeTier::new(0, dec!(0.02)),
    ]
}

/// Load configuration from TOML file
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<RiskConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: RiskConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Save configuration to TOML file
pub fn save_config(config: &RiskConfig, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Create a default configuration file template
pub fn create_config_template(path: impl AsRef<Path>) -> anyhow::Result<()> {
    let template = "# Trade Book & Risk Configuration

# Starting virtual balance (USD)
initial_balance = 1000.0

# Winning trades pay this fraction of the stake
payout_rate = 0.8

# Chance that a settled trade wins (independent of signal probability)
settlement_win_probability = 0.7

# Signals become tradable when their countdown is at or below this (seconds)
entry_window_secs = 60

# Manual position sizing: percent of balance per trade
risk_percent = 2
min_risk_percent = 1
max_risk_percent = 10

# Recommended stake by signal probability
[[stake_tiers]]
min_probability = 95
fraction = 0.05

[[stake_tiers]]
min_probability = 90
fraction = 0.04

[[stake_tiers]]
min_probability = 85
fraction = 0.03

[[stake_tiers]]
min_probability = 0
fraction = 0.02
";

    std::fs::write(path, template)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RiskConfig::default();
        assert_eq!(config.initial_balance, dec!(1000));
        assert_eq!(config.payout_rate, dec!(0.8));
        assert_eq!(config.stake_tiers.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = RiskConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: RiskConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_template_matches_defaults() {
        let path = std::env::temp_dir().join(format!("risk-template-{}.toml", std::process::id()));
        create_config_template(&path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.initial_balance, dec!(1000));
        assert_eq!(loaded.payout_rate, dec!(0.8));
        assert_eq!(loaded.stake_tiers, default_stake_tiers());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_validate_rejects_out_of_range_risk() {
        let config = RiskConfig {
            risk_percent: 15,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RiskConfig {
            settlement_win_probability: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
