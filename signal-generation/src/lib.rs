// Signal Generation Engine
// Samples synthetic market conditions and indicators, scores them and
// publishes a ranked set of binary-option signals per cycle

pub mod analytics;
pub mod config;
pub mod market_data;
pub mod pipeline;
pub mod sampler;
pub mod scoring;

pub use analytics::{format_countdown, profit_potential, segment_counts, signal_strength, ProfitPotential};
pub use config::{load_config, save_config, GenerationConfig};
pub use market_data::{generate_market_data, strong_markets, trend_for, STRONG_MARKET_STRENGTH};
pub use pipeline::{PipelineConfig, SignalPipeline};
pub use sampler::{sample_indicators, sample_market_condition, sample_market_conditions};
pub use scoring::{QualityScorer, ScoringConfig, ScoringWeights, SubScores};

use chrono::{DateTime, Utc};
use common::{EntropySource, SegmentFilter, Signal};

/// One cycle over the standard universe with default settings.
pub fn generate_signals(
    filter: SegmentFilter,
    now: DateTime<Utc>,
    entropy: &mut dyn EntropySource,
) -> Vec<Signal> {
    SignalPipeline::default().generate(filter, now, entropy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::SeededEntropy;

    #[test]
    fn test_full_universe_scenario() {
        let mut entropy = SeededEntropy::new(31);
        for _ in 0..50 {
            let signals = generate_signals(SegmentFilter::All, Utc::now(), &mut entropy);
            assert!(signals.len() <= 15);
            assert!(signals.iter().all(|s| s.probability >= 80));
        }
    }

    #[test]
    fn test_market_data_wrapper() {
        let mut entropy = SeededEntropy::new(31);
        assert_eq!(generate_market_data(SegmentFilter::All, &mut entropy).len(), 12);
    }

    #[test]
    fn test_signals_serialize_for_display() {
        let mut entropy = common::ScriptedEntropy::constant(0.99);
        let signals = generate_signals(SegmentFilter::All, Utc::now(), &mut entropy);

        let json = serde_json::to_value(&signals[0]).unwrap();
        assert_eq!(json["instrument"], "EUR/USD");
        assert_eq!(json["direction"], "PUT");
        assert_eq!(json["probability"], 94);
        assert_eq!(json["segment"], "otc");
    }
}
