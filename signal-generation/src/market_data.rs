// Market Overview Generator
// Synthetic trend/strength statistics for the top instruments

use common::{round_to, EntropySource, MarketData, SegmentFilter, Trend, TOP_INSTRUMENTS};
use tracing::debug;

/// Strength at or above which a market counts as strongly trending
pub const STRONG_MARKET_STRENGTH: u8 = 70;

/// Generate one overview row per top instrument.
///
/// The overview always covers every top instrument; `filter` only tags the
/// log line.
pub fn generate_market_data(filter: SegmentFilter, entropy: &mut dyn EntropySource) -> Vec<MarketData> {
    let rows: Vec<MarketData> = TOP_INSTRUMENTS
        .iter()
        .map(|symbol| sample_row(symbol, entropy))
        .collect();

    debug!(filter = %filter, rows = rows.len(), "Generated market data");
    rows
}

fn sample_row(symbol: &str, entropy: &mut dyn EntropySource) -> MarketData {
    let base_strength = entropy.uniform(60.0, 100.0);
    let trend = trend_for(base_strength / 100.0);

    let momentum = match trend {
        Trend::Up => entropy.uniform(0.5, 1.0),
        Trend::Down => -entropy.uniform(0.5, 1.0),
        Trend::Neutral => entropy.uniform(-0.2, 0.2),
    };

    MarketData {
        instrument: symbol.to_string(),
        trend,
        volume: entropy.uniform(800_000.0, 3_000_000.0).floor() as u64,
        volatility: round_to(entropy.uniform(0.4, 1.5), 2),
        strength: base_strength.round() as u8,
        momentum: round_to(momentum, 2),
        support: round_to(entropy.uniform(1.05, 1.20), 4),
        resistance: round_to(entropy.uniform(1.15, 1.30), 4),
    }
}

/// Trend label from a normalised strength value.
pub fn trend_for(strength_ratio: f64) -> Trend {
    if strength_ratio > 0.7 {
        Trend::Up
    } else if strength_ratio < 0.5 {
        Trend::Down
    } else {
        Trend::Neutral
    }
}

/// Markets with strength at or above `min_strength`, strongest first.
pub fn strong_markets(rows: &[MarketData], min_strength: u8) -> Vec<MarketData> {
    let mut strong: Vec<MarketData> = rows
        .iter()
        .filter(|m| m.strength >= min_strength)
        .cloned()
        .collect();
    strong.sort_by(|a, b| b.strength.cmp(&a.strength));
    strong
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{ScriptedEntropy, SeededEntropy};

    #[test]
    fn test_all_filter_covers_top_instruments() {
        let mut entropy = SeededEntropy::new(11);
        let rows = generate_market_data(SegmentFilter::All, &mut entropy);

        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].instrument, "EUR/USD");
        assert_eq!(rows[11].instrument, "SOL/USD");
    }

    #[test]
    fn test_segment_filter_keeps_every_top_instrument() {
        for filter in [SegmentFilter::All, SegmentFilter::Classic, SegmentFilter::Otc] {
            let mut entropy = SeededEntropy::new(11);
            let rows = generate_market_data(filter, &mut entropy);

            assert_eq!(rows.len(), 12);
            let symbols: Vec<&str> = rows.iter().map(|m| m.instrument.as_str()).collect();
            assert_eq!(symbols, TOP_INSTRUMENTS.to_vec());
        }
    }

    #[test]
    fn test_row_ranges() {
        let mut entropy = SeededEntropy::new(77);
        for _ in 0..50 {
            for m in generate_market_data(SegmentFilter::All, &mut entropy) {
                assert!((60..=100).contains(&m.strength));
                assert!((800_000..3_000_000).contains(&m.volume));
                assert!((0.4..=1.5).contains(&m.volatility));
                assert!((1.05..=1.2).contains(&m.support));
                assert!((1.15..=1.3).contains(&m.resistance));
                match m.trend {
                    Trend::Up => assert!(m.momentum >= 0.5),
                    Trend::Down => assert!(m.momentum <= -0.5),
                    Trend::Neutral => assert!(m.momentum.abs() <= 0.2),
                }
            }
        }
    }

    #[test]
    fn test_up_trend_row() {
        // strength 60 + 0.9*40 = 96
        let mut entropy = ScriptedEntropy::constant(0.9);
        let rows = generate_market_data(SegmentFilter::All, &mut entropy);

        let row = &rows[0];
        assert_eq!(row.trend, Trend::Up);
        assert_eq!(row.strength, 96);
        assert_eq!(row.momentum, 0.95);
        assert_eq!(row.volume, 2_780_000);
    }

    #[test]
    fn test_trend_for() {
        assert_eq!(trend_for(0.71), Trend::Up);
        assert_eq!(trend_for(0.7), Trend::Neutral);
        assert_eq!(trend_for(0.5), Trend::Neutral);
        assert_eq!(trend_for(0.49), Trend::Down);
    }

    #[test]
    fn test_strong_markets_sorted() {
        let mut entropy = SeededEntropy::new(5);
        let rows = generate_market_data(SegmentFilter::All, &mut entropy);
        let strong = strong_markets(&rows, STRONG_MARKET_STRENGTH);

        assert!(strong.iter().all(|m| m.strength >= 70));
        for pair in strong.windows(2) {
            assert!(pair[0].strength >= pair[1].strength);
        }
    }
}
