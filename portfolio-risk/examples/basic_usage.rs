//! Example usage of the trade book

use chrono::{Duration, Utc};
use common::{SeededEntropy, SegmentFilter};
use portfolio_risk::{position_size, recommended_stake, RiskConfig, SessionStats, TradeBook};
use signal_generation::SignalPipeline;

fn main() -> anyhow::Result<()> {
    println!("=== Trade Book Example ===\n");

    let config = RiskConfig::default();
    let mut book = TradeBook::new(&config);
    let mut entropy = SeededEntropy::new(42);
    let now = Utc::now();

    println!("Example 1: Generate signals");
    let signals = SignalPipeline::default().generate(SegmentFilter::All, now, &mut entropy);
    println!("  {} signals published\n", signals.len());

    println!("Example 2: Size and open trades");
    let manual = position_size(
        book.balance(),
        config.risk_percent,
        config.min_risk_percent,
        config.max_risk_percent,
    )?;
    println!("  Manual stake at {}%: ${}", config.risk_percent, manual);

    for signal in signals.iter().filter(|s| s.is_tradable(config.entry_window_secs)) {
        let stake = recommended_stake(book.balance(), signal.probability);
        match book.open_trade(signal, stake, now) {
            Ok(trade) => println!(
                "  ✓ {} {} {} for ${}",
                trade.instrument, trade.direction, trade.expiration, trade.stake
            ),
            Err(rejection) => println!("  ✗ {}", rejection),
        }
    }
    println!("  Balance: ${}\n", book.balance());

    println!("Example 3: Settle after three minutes");
    for settlement in book.settle_due(now + Duration::minutes(3), &mut entropy) {
        println!(
            "  {} {:?} {:+}",
            settlement.instrument, settlement.status, settlement.profit
        );
    }

    let stats = SessionStats::from_trades(book.trades(), config.initial_balance, now.date_naive());
    println!("\nBalance: ${}", book.balance());
    println!("Win rate: {:.1}%", stats.win_rate);
    println!("Total profit: ${}", stats.total_profit);
    println!("ROI: {}%", stats.roi);
    println!("Max drawdown: ${}", stats.max_drawdown);

    Ok(())
}
