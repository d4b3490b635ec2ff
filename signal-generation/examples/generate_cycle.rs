// Example: One Signal Generation Cycle
// Generates a ranked signal set and the market overview, then prints them

use chrono::Utc;
use common::{SeededEntropy, SegmentFilter};
use signal_generation::{
    format_countdown, generate_market_data, profit_potential, segment_counts, signal_strength,
    strong_markets, SignalPipeline, STRONG_MARKET_STRENGTH,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    println!("=== Signal Generation - One Cycle ===\n");

    let mut entropy = SeededEntropy::new(7);
    let pipeline = SignalPipeline::default();
    let signals = pipeline.generate(SegmentFilter::All, Utc::now(), &mut entropy);

    let (classic, otc) = segment_counts(&signals);
    println!("Published {} signals ({} classic, {} otc)\n", signals.len(), classic, otc);

    for signal in &signals {
        println!(
            "  {:<12} {:<4} {:>3}% {:<6} {:>2} opens in {} | strength {} | {} potential | {}",
            signal.instrument,
            signal.direction,
            signal.probability,
            format!("{:?}", signal.confidence),
            signal.expiration,
            format_countdown(signal.seconds_to_open),
            signal_strength(signal),
            profit_potential(signal),
            signal.strategy,
        );
    }

    println!("\nStrong markets:");
    let rows = generate_market_data(SegmentFilter::All, &mut entropy);
    for row in strong_markets(&rows, STRONG_MARKET_STRENGTH) {
        println!(
            "  {:<12} {:?} strength {} momentum {:+.2}",
            row.instrument, row.trend, row.strength, row.momentum
        );
    }

    Ok(())
}
