// Signal Analytics
// Derived figures shown next to each signal

use common::{ConfidenceTier, MarketSegment, Signal};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite 0-100 strength of a signal.
///
/// Blends a technical sub-score (35%), the probability (50%) and a
/// confidence bonus.
pub fn signal_strength(signal: &Signal) -> u8 {
    let ind = &signal.indicators;

    let oscillator_score = (50.0 - ind.oscillator).abs() / 50.0;
    let trend_score = ind.trend.abs().min(1.0);
    let technical = oscillator_score * 0.3
        + trend_score * 0.25
        + ind.ma_alignment * 0.25
        + ind.band_position * 0.2;

    let probability_score = signal.probability as f64 / 100.0;
    let confidence_bonus = match signal.confidence {
        ConfidenceTier::High => 0.15,
        ConfidenceTier::Medium => 0.08,
        ConfidenceTier::Low => 0.0,
    };

    let strength = ((technical * 0.35 + probability_score * 0.5 + confidence_bonus) * 100.0).round();
    strength.clamp(0.0, 100.0) as u8
}

/// Profit potential bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitPotential {
    VeryHigh,
    High,
    Good,
    Average,
}

impl ProfitPotential {
    pub fn for_probability(probability: u8) -> Self {
        match probability {
            p if p >= 95 => ProfitPotential::VeryHigh,
            p if p >= 90 => ProfitPotential::High,
            p if p >= 85 => ProfitPotential::Good,
            _ => ProfitPotential::Average,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfitPotential::VeryHigh => "very high",
            ProfitPotential::High => "high",
            ProfitPotential::Good => "good",
            ProfitPotential::Average => "average",
        }
    }
}

impl fmt::Display for ProfitPotential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn profit_potential(signal: &Signal) -> ProfitPotential {
    ProfitPotential::for_probability(signal.probability)
}

/// `m:ss` countdown text.
pub fn format_countdown(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// (classic, otc) counts among `signals`.
pub fn segment_counts(signals: &[Signal]) -> (usize, usize) {
    signals.iter().fold((0, 0), |(classic, otc), s| match s.segment {
        MarketSegment::Classic => (classic + 1, otc),
        MarketSegment::Otc => (classic, otc + 1),
    })
}
