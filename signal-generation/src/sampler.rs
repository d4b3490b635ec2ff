// Market Condition and Indicator Samplers
// Produce the synthetic per-instrument inputs for one generation cycle

use common::{round_to, EntropySource, IndicatorReading, Instrument, MarketCondition};

/// Volume range (units)
pub const VOLUME_RANGE: (f64, f64) = (500_000.0, 3_000_000.0);
/// Volatility range
pub const VOLATILITY_RANGE: (f64, f64) = (0.3, 1.8);
/// Momentum range
pub const MOMENTUM_RANGE: (f64, f64) = (-1.0, 1.0);
/// Strength range (0-100 scale)
pub const STRENGTH_RANGE: (f64, f64) = (50.0, 100.0);

/// Oscillator range (RSI-like)
pub const OSCILLATOR_RANGE: (f64, f64) = (20.0, 80.0);
/// Trend value range (MACD-like)
pub const TREND_RANGE: (f64, f64) = (-1.0, 1.0);

/// Sample one market condition per instrument.
///
/// Fields are independent uniform draws; nothing carries over from a
/// previous cycle.
pub fn sample_market_conditions(
    instruments: &[Instrument],
    entropy: &mut dyn EntropySource,
) -> Vec<MarketCondition> {
    instruments
        .iter()
        .map(|instrument| sample_market_condition(&instrument.symbol, entropy))
        .collect()
}

/// Sample the market condition of a single instrument.
pub fn sample_market_condition(symbol: &str, entropy: &mut dyn EntropySource) -> MarketCondition {
    MarketCondition {
        instrument: symbol.to_string(),
        volume: entropy.uniform(VOLUME_RANGE.0, VOLUME_RANGE.1),
        volatility: entropy.uniform(VOLATILITY_RANGE.0, VOLATILITY_RANGE.1),
        momentum: entropy.uniform(MOMENTUM_RANGE.0, MOMENTUM_RANGE.1),
        strength: entropy.uniform(STRENGTH_RANGE.0, STRENGTH_RANGE.1),
    }
}

/// Sample an indicator reading.
///
/// The oscillator is rounded to one decimal and the remaining fields to two,
/// matching what is displayed on a signal.
pub fn sample_indicators(entropy: &mut dyn EntropySource) -> IndicatorReading {
    let oscillator = entropy.uniform(OSCILLATOR_RANGE.0, OSCILLATOR_RANGE.1);
    let trend = entropy.uniform(TREND_RANGE.0, TREND_RANGE.1);
    let ma_alignment = entropy.next_f64();
    let band_position = entropy.next_f64();

    IndicatorReading {
        oscillator: round_to(oscillator, 1),
        trend: round_to(trend, 2),
        ma_alignment: round_to(ma_alignment, 2),
        band_position: round_to(band_position, 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{ScriptedEntropy, SeededEntropy, Universe};

    #[test]
    fn test_one_condition_per_instrument() {
        let universe = Universe::standard();
        let mut entropy = SeededEntropy::new(1);

        let conditions = sample_market_conditions(universe.instruments(), &mut entropy);
        assert_eq!(conditions.len(), 31);
        assert_eq!(conditions[0].instrument, "EUR/USD");
        assert_eq!(conditions[30].instrument, "GAS/USD");
    }

    #[test]
    fn test_condition_ranges() {
        let universe = Universe::standard();
        let mut entropy = SeededEntropy::new(99);

        for _ in 0..20 {
            for c in sample_market_conditions(universe.instruments(), &mut entropy) {
                assert!(c.volume >= 500_000.0 && c.volume < 3_000_000.0);
                assert!(c.volatility >= 0.3 && c.volatility < 1.8);
                assert!(c.momentum >= -1.0 && c.momentum < 1.0);
                assert!(c.strength >= 50.0 && c.strength < 100.0);
            }
        }
    }

    #[test]
    fn test_empty_universe() {
        let mut entropy = SeededEntropy::new(3);
        assert!(sample_market_conditions(&[], &mut entropy).is_empty());
    }

    #[test]
    fn test_indicator_rounding() {
        let mut entropy = ScriptedEntropy::new(vec![0.123_456, 0.987_654, 0.333_333, 0.666_666]);
        let reading = sample_indicators(&mut entropy);

        // 20 + 0.123456 * 60 = 27.407...
        assert_eq!(reading.oscillator, 27.4);
        // -1 + 0.987654 * 2 = 0.975...
        assert_eq!(reading.trend, 0.98);
        assert_eq!(reading.ma_alignment, 0.33);
        assert_eq!(reading.band_position, 0.67);
    }

    #[test]
    fn test_indicator_ranges() {
        let mut entropy = SeededEntropy::new(5);
        for _ in 0..500 {
            let r = sample_indicators(&mut entropy);
            assert!((20.0..=80.0).contains(&r.oscillator));
            assert!((-1.0..=1.0).contains(&r.trend));
            assert!((0.0..=1.0).contains(&r.ma_alignment));
            assert!((0.0..=1.0).contains(&r.band_position));
        }
    }
}
