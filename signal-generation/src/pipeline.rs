// Signal Generation Pipeline
// Samples, scores, classifies, filters and ranks signals for one cycle

use crate::sampler::{sample_indicators, sample_market_conditions};
use crate::scoring::QualityScorer;
use chrono::{DateTime, Utc};
use common::{
    ConfidenceTier, Direction, EntropySource, Expiration, IndicatorReading, Instrument,
    MarketCondition, SegmentFilter, Signal, SignalStatus, Universe, STRATEGY_LABELS,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Configuration for the signal generation pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of signals to publish per cycle
    #[serde(default = "default_max_signals_per_cycle")]
    pub max_signals_per_cycle: usize,

    /// Probability before the quality score is added
    #[serde(default = "default_base_probability")]
    pub base_probability: f64,

    /// Probability points per unit of quality score
    #[serde(default = "default_score_multiplier")]
    pub score_multiplier: f64,

    /// Lower clamp bound for probability
    #[serde(default = "default_min_probability")]
    pub min_probability: u8,

    /// Upper clamp bound for probability
    #[serde(default = "default_max_probability")]
    pub max_probability: u8,

    /// Minimum probability for a signal to be published
    #[serde(default = "default_publish_threshold")]
    pub publish_threshold: u8,

    /// Probability at or above which confidence is high
    #[serde(default = "default_high_confidence")]
    pub high_confidence: u8,

    /// Probability at or above which confidence is medium
    #[serde(default = "default_medium_confidence")]
    pub medium_confidence: u8,

    /// Probability at or above which the signal is active
    #[serde(default = "default_active_threshold")]
    pub active_threshold: u8,

    /// Probability at or above which the one-minute bucket is used
    #[serde(default = "default_one_minute_threshold")]
    pub one_minute_threshold: u8,

    /// Probability at or above which the two-minute bucket is used
    #[serde(default = "default_two_minute_threshold")]
    pub two_minute_threshold: u8,

    /// Oscillator below this is oversold (up-bet)
    #[serde(default = "default_oversold")]
    pub oversold: f64,

    /// Oscillator above this is overbought (down-bet)
    #[serde(default = "default_overbought")]
    pub overbought: f64,

    /// Countdown range in seconds, `[min, max)`
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: (u32, u32),
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_signals_per_cycle: 15,
            base_probability: 70.0,
            score_multiplier: 28.0,
            min_probability: 75,
            max_probability: 98,
            publish_threshold: 80,
            high_confidence: 92,
            medium_confidence: 86,
            active_threshold: 88,
            one_minute_threshold: 90,
            two_minute_threshold: 85,
            oversold: 35.0,
            overbought: 65.0,
            countdown_secs: (5, 125),
        }
    }
}

fn default_max_signals_per_cycle() -> usize {
    15
}

fn default_base_probability() -> f64 {
    70.0
}

fn default_score_multiplier() -> f64 {
    28.0
}

fn default_min_probability() -> u8 {
    75
}

fn default_max_probability() -> u8 {
    98
}

fn default_publish_threshold() -> u8 {
    80
}

fn default_high_confidence() -> u8 {
    92
}

fn default_medium_confidence() -> u8 {
    86
}

fn default_active_threshold() -> u8 {
    88
}

fn default_one_minute_threshold() -> u8 {
    90
}

fn default_two_minute_threshold() -> u8 {
    85
}

fn default_oversold() -> f64 {
    35.0
}

fn default_overbought() -> f64 {
    65.0
}

fn default_countdown_secs() -> (u32, u32) {
    (5, 125)
}

impl PipelineConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.min_probability > self.max_probability {
            anyhow::bail!(
                "probability clamp is empty: {} > {}",
                self.min_probability,
                self.max_probability
            );
        }
        if self.max_probability > 100 {
            anyhow::bail!("max probability {} exceeds 100", self.max_probability);
        }
        if self.score_multiplier < 0.0 {
            anyhow::bail!("score multiplier must be non-negative");
        }
        if self.oversold >= self.overbought {
            anyhow::bail!("oversold level must be below overbought level");
        }
        Ok(())
    }

    /// Map a quality score to a clamped probability.
    ///
    /// Monotonic non-decreasing in `score`.
    pub fn probability_for(&self, score: f64) -> u8 {
        let raw = (self.base_probability + score * self.score_multiplier).round();
        let clamped = raw.clamp(self.min_probability as f64, self.max_probability as f64);
        clamped as u8
    }

    pub fn confidence_for(&self, probability: u8) -> ConfidenceTier {
        if probability >= self.high_confidence {
            ConfidenceTier::High
        } else if probability >= self.medium_confidence {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    pub fn expiration_for(&self, probability: u8) -> Expiration {
        if probability >= self.one_minute_threshold {
            Expiration::OneMinute
        } else if probability >= self.two_minute_threshold {
            Expiration::TwoMinutes
        } else {
            Expiration::ThreeMinutes
        }
    }

    pub fn status_for(&self, probability: u8) -> SignalStatus {
        if probability >= self.active_threshold {
            SignalStatus::Active
        } else {
            SignalStatus::Waiting
        }
    }

    /// Oscillator extremes decide first; otherwise follow the trend sign.
    pub fn direction_for(&self, reading: &IndicatorReading) -> Direction {
        if reading.oscillator < self.oversold {
            Direction::Call
        } else if reading.oscillator > self.overbought {
            Direction::Put
        } else if reading.trend > 0.0 {
            Direction::Call
        } else {
            Direction::Put
        }
    }
}

/// Signal generation pipeline
#[derive(Debug, Clone)]
pub struct SignalPipeline {
    universe: Universe,
    scorer: QualityScorer,
    config: PipelineConfig,
}

impl SignalPipeline {
    /// Create a pipeline over the standard universe with the default scorer
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            universe: Universe::standard(),
            scorer: QualityScorer::default(),
            config,
        }
    }

    /// Replace the instrument universe
    pub fn with_universe(mut self, universe: Universe) -> Self {
        self.universe = universe;
        self
    }

    /// Replace the quality scorer
    pub fn with_scorer(mut self, scorer: QualityScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn scorer(&self) -> &QualityScorer {
        &self.scorer
    }

    /// Run one generation cycle.
    ///
    /// Returns at most `max_signals_per_cycle` signals, sorted by descending
    /// probability. Market conditions are sampled for the whole universe even
    /// when `filter` excludes part of it.
    pub fn generate(
        &self,
        filter: SegmentFilter,
        now: DateTime<Utc>,
        entropy: &mut dyn EntropySource,
    ) -> Vec<Signal> {
        let conditions = sample_market_conditions(self.universe.instruments(), entropy);
        let mut signals = Vec::new();

        for (position, instrument) in self.universe.filtered(filter) {
            let reading = sample_indicators(entropy);
            let condition = &conditions[position];

            if let Some(signal) = self.evaluate(position, instrument, reading, condition, now, entropy)
            {
                signals.push(signal);
            }
        }

        // Stable sort keeps universe order among equal probabilities
        signals.sort_by(|a, b| b.probability.cmp(&a.probability));
        signals.truncate(self.config.max_signals_per_cycle);

        info!(
            filter = %filter,
            published = signals.len(),
            "Generated signals"
        );
        signals
    }

    /// Score one instrument and build its signal if it clears the
    /// publication threshold.
    fn evaluate(
        &self,
        position: usize,
        instrument: &Instrument,
        reading: IndicatorReading,
        condition: &MarketCondition,
        now: DateTime<Utc>,
        entropy: &mut dyn EntropySource,
    ) -> Option<Signal> {
        let score = self.scorer.score(&reading, condition);
        let probability = self.config.probability_for(score);

        if probability < self.config.publish_threshold {
            debug!(
                instrument = %instrument.symbol,
                score,
                probability,
                "Below publication threshold"
            );
            return None;
        }

        let (countdown_min, countdown_max) = self.config.countdown_secs;
        let seconds_to_open = entropy.range_u32(countdown_min, countdown_max);
        let strategy = STRATEGY_LABELS[entropy.index(STRATEGY_LABELS.len())];

        Some(Signal {
            id: format!("signal-{}-{}", now.timestamp_millis(), position),
            instrument: instrument.symbol.clone(),
            direction: self.config.direction_for(&reading),
            expiration: self.config.expiration_for(probability),
            probability,
            confidence: self.config.confidence_for(probability),
            status: self.config.status_for(probability),
            strategy: strategy.to_string(),
            segment: instrument.segment,
            indicators: reading,
            generated_at: now,
            seconds_to_open,
        })
    }
}

impl Default for SignalPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
