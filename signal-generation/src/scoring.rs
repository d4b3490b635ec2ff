// Quality Scorer
// Fixed-weight linear combination of indicator and market-condition sub-scores

use common::{IndicatorReading, MarketCondition};
use serde::{Deserialize, Serialize};

/// Weights of the seven sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_oscillator_extremity_weight")]
    pub oscillator_extremity: f64,
    #[serde(default = "default_trend_magnitude_weight")]
    pub trend_magnitude: f64,
    #[serde(default = "default_ma_alignment_weight")]
    pub ma_alignment: f64,
    #[serde(default = "default_band_position_weight")]
    pub band_position: f64,
    #[serde(default = "default_trend_confirmation_weight")]
    pub trend_confirmation: f64,
    #[serde(default = "default_volume_confirmation_weight")]
    pub volume_confirmation: f64,
    #[serde(default = "default_volatility_optimality_weight")]
    pub volatility_optimality: f64,
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.oscillator_extremity
            + self.trend_magnitude
            + self.ma_alignment
            + self.band_position
            + self.trend_confirmation
            + self.volume_confirmation
            + self.volatility_optimality
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            oscillator_extremity: 0.25,
            trend_magnitude: 0.20,
            ma_alignment: 0.20,
            band_position: 0.15,
            trend_confirmation: 0.10,
            volume_confirmation: 0.05,
            volatility_optimality: 0.05,
        }
    }
}

fn default_oscillator_extremity_weight() -> f64 {
    0.25
}

fn default_trend_magnitude_weight() -> f64 {
    0.20
}

fn default_ma_alignment_weight() -> f64 {
    0.20
}

fn default_band_position_weight() -> f64 {
    0.15
}

fn default_trend_confirmation_weight() -> f64 {
    0.10
}

fn default_volume_confirmation_weight() -> f64 {
    0.05
}

fn default_volatility_optimality_weight() -> f64 {
    0.05
}

/// Quality scorer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Oscillator midpoint; extremity is measured from here
    #[serde(default = "default_oscillator_midpoint")]
    pub oscillator_midpoint: f64,

    /// Sub-score when oscillator and momentum disagree
    #[serde(default = "default_trend_confirmation_penalty")]
    pub trend_confirmation_penalty: f64,

    /// Volume above which volume is considered confirming
    #[serde(default = "default_volume_threshold")]
    pub volume_threshold: f64,

    /// Sub-score for volume at or below the threshold
    #[serde(default = "default_low_volume_score")]
    pub low_volume_score: f64,

    /// Exclusive lower bound of the optimal volatility band
    #[serde(default = "default_optimal_volatility_min")]
    pub optimal_volatility_min: f64,

    /// Exclusive upper bound of the optimal volatility band
    #[serde(default = "default_optimal_volatility_max")]
    pub optimal_volatility_max: f64,

    /// Sub-score for volatility outside the optimal band
    #[serde(default = "default_suboptimal_volatility_score")]
    pub suboptimal_volatility_score: f64,

    #[serde(default)]
    pub weights: ScoringWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            oscillator_midpoint: 50.0,
            trend_confirmation_penalty: 0.3,
            volume_threshold: 1_000_000.0,
            low_volume_score: 0.7,
            optimal_volatility_min: 0.5,
            optimal_volatility_max: 1.5,
            suboptimal_volatility_score: 0.6,
            weights: ScoringWeights::default(),
        }
    }
}

impl ScoringConfig {
    /// Reject configurations whose weights do not sum to 1.0.
    pub fn validate(&self) -> anyhow::Result<()> {
        let total = self.weights.total();
        if (total - 1.0).abs() > 1e-9 {
            anyhow::bail!("scoring weights must sum to 1.0, got {:.6}", total);
        }
        if self.oscillator_midpoint <= 0.0 {
            anyhow::bail!("oscillator midpoint must be positive");
        }
        if self.optimal_volatility_min >= self.optimal_volatility_max {
            anyhow::bail!(
                "optimal volatility band is empty: {} >= {}",
                self.optimal_volatility_min,
                self.optimal_volatility_max
            );
        }
        Ok(())
    }
}

fn default_oscillator_midpoint() -> f64 {
    50.0
}

fn default_trend_confirmation_penalty() -> f64 {
    0.3
}

fn default_volume_threshold() -> f64 {
    1_000_000.0
}

fn default_low_volume_score() -> f64 {
    0.7
}

fn default_optimal_volatility_min() -> f64 {
    0.5
}

fn default_optimal_volatility_max() -> f64 {
    1.5
}

fn default_suboptimal_volatility_score() -> f64 {
    0.6
}

/// Individual sub-scores before weighting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub oscillator_extremity: f64,
    pub trend_magnitude: f64,
    pub ma_alignment: f64,
    pub band_position: f64,
    pub trend_confirmation: f64,
    pub volume_confirmation: f64,
    pub volatility_optimality: f64,
}

/// Combines an indicator reading and market condition into one quality score
#[derive(Debug, Clone, Default)]
pub struct QualityScorer {
    config: ScoringConfig,
}

impl QualityScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Compute the unweighted sub-scores.
    pub fn breakdown(&self, reading: &IndicatorReading, condition: &MarketCondition) -> SubScores {
        let cfg = &self.config;
        let midpoint = cfg.oscillator_midpoint;

        let oscillator_extremity = ((reading.oscillator - midpoint).abs() / midpoint).min(1.0);
        let trend_magnitude = reading.trend.abs().min(1.0);

        // Oscillator must lean the same way as momentum
        let confirmed = if condition.momentum > 0.0 {
            reading.oscillator > midpoint
        } else {
            reading.oscillator < midpoint
        };
        let trend_confirmation = if confirmed {
            1.0
        } else {
            cfg.trend_confirmation_penalty
        };

        let volume_confirmation = if condition.volume > cfg.volume_threshold {
            1.0
        } else {
            cfg.low_volume_score
        };

        let volatility_optimality = if condition.volatility > cfg.optimal_volatility_min
            && condition.volatility < cfg.optimal_volatility_max
        {
            1.0
        } else {
            cfg.suboptimal_volatility_score
        };

        SubScores {
            oscillator_extremity,
            trend_magnitude,
            ma_alignment: reading.ma_alignment,
            band_position: reading.band_position,
            trend_confirmation,
            volume_confirmation,
            volatility_optimality,
        }
    }

    /// Weighted quality score, approximately 0.0 to 1.0.
    pub fn score(&self, reading: &IndicatorReading, condition: &MarketCondition) -> f64 {
        let s = self.breakdown(reading, condition);
        let w = &self.config.weights;

        s.oscillator_extremity * w.oscillator_extremity
            + s.trend_magnitude * w.trend_magnitude
            + s.ma_alignment * w.ma_alignment
            + s.band_position * w.band_position
            + s.trend_confirmation * w.trend_confirmation
            + s.volume_confirmation * w.volume_confirmation
            + s.volatility_optimality * w.volatility_optimality
    }
}
