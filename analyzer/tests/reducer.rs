use analyzer::{reduce, Action, AnalyzerConfig, Event, Snapshot};
use chrono::{DateTime, Duration, TimeZone, Utc};
use common::{ScriptedEntropy, SeededEntropy, SegmentFilter, SignalStatus, TradeStatus};
use portfolio_risk::TradeRejection;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn t0() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

fn tick(snapshot: &Snapshot, secs: i64, entropy: &mut ScriptedEntropy, config: &AnalyzerConfig) -> Snapshot {
    reduce(
        snapshot,
        Action::Tick {
            now: t0() + Duration::seconds(secs),
        },
        entropy,
        config,
    )
    .snapshot
}

/// Config whose signals stay put between ticks
fn frozen_refresh() -> AnalyzerConfig {
    let mut config = AnalyzerConfig::default();
    config.scheduler.signal_refresh_secs = 3600;
    config.scheduler.market_refresh_secs = 3600;
    config
}

#[test]
fn test_open_and_settle_through_reducer() {
    let config = frozen_refresh();
    // 0.99 everywhere: probability 94, active, countdown 123
    let mut entropy = ScriptedEntropy::constant(0.99);
    let mut snapshot = tick(&Snapshot::new(&config, t0()), 0, &mut entropy, &config);
    assert_eq!(snapshot.signals.len(), 15);
    assert_eq!(snapshot.signals[0].status, SignalStatus::Active);

    // Count down into the 60 s entry window
    for secs in 1..=63 {
        snapshot = tick(&snapshot, secs, &mut entropy, &config);
    }
    assert_eq!(snapshot.signals[0].seconds_to_open, 60);

    let signal_id = snapshot.signals[0].id.clone();
    let opened = reduce(
        &snapshot,
        Action::OpenTrade {
            signal_id,
            stake: None,
        },
        &mut entropy,
        &config,
    );
    // 94% sits in the 4% tier
    assert_eq!(opened.snapshot.balance(), dec!(960));
    assert!(matches!(opened.events[0], Event::TradeOpened { .. }));

    // One-minute expiry; 0.99 loses against a 0.7 win chance
    let before = tick(&opened.snapshot, 122, &mut entropy, &config);
    assert_eq!(before.book.open_trades().count(), 1);

    let after = reduce(
        &before,
        Action::Tick {
            now: t0() + Duration::seconds(123),
        },
        &mut entropy,
        &config,
    );
    assert_eq!(after.snapshot.balance(), dec!(960));
    let settled: Vec<_> = after
        .events
        .iter()
        .filter(|e| matches!(e, Event::TradeSettled { .. }))
        .collect();
    assert_eq!(settled.len(), 1);
    assert_eq!(after.snapshot.book.trades()[0].status, TradeStatus::Loss);

    // Later ticks never settle it again
    let later = tick(&after.snapshot, 500, &mut entropy, &config);
    assert_eq!(later.balance(), dec!(960));
}

#[test]
fn test_trade_outside_entry_window_rejected() {
    let config = frozen_refresh();
    let mut entropy = ScriptedEntropy::constant(0.99);
    let snapshot = tick(&Snapshot::new(&config, t0()), 0, &mut entropy, &config);

    let outcome = reduce(
        &snapshot,
        Action::OpenTrade {
            signal_id: snapshot.signals[0].id.clone(),
            stake: Some(dec!(20)),
        },
        &mut entropy,
        &config,
    );

    assert_eq!(outcome.snapshot.balance(), dec!(1000));
    assert!(outcome.snapshot.book.trades().is_empty());
    assert!(matches!(
        outcome.rejections().next(),
        Some(TradeRejection::SignalNotTradable { .. })
    ));
}

#[test]
fn test_insufficient_balance_leaves_state() {
    let config = frozen_refresh();
    let mut entropy = ScriptedEntropy::constant(0.99);
    let mut snapshot = tick(&Snapshot::new(&config, t0()), 0, &mut entropy, &config);
    for secs in 1..=70 {
        snapshot = tick(&snapshot, secs, &mut entropy, &config);
    }
    let snapshot = reduce(
        &snapshot,
        Action::SetBalance { balance: dec!(500) },
        &mut entropy,
        &config,
    )
    .snapshot;

    let outcome = reduce(
        &snapshot,
        Action::OpenTrade {
            signal_id: snapshot.signals[0].id.clone(),
            stake: Some(dec!(600)),
        },
        &mut entropy,
        &config,
    );

    assert_eq!(outcome.snapshot, snapshot);
    assert_eq!(
        outcome.rejections().next(),
        Some(&TradeRejection::InsufficientBalance {
            stake: dec!(600),
            balance: dec!(500),
        })
    );
}

#[test]
fn test_auto_update_off_freezes_data_but_settles() {
    let config = frozen_refresh();
    let mut entropy = ScriptedEntropy::constant(0.99);
    let mut snapshot = tick(&Snapshot::new(&config, t0()), 0, &mut entropy, &config);
    for secs in 1..=63 {
        snapshot = tick(&snapshot, secs, &mut entropy, &config);
    }
    snapshot = reduce(
        &snapshot,
        Action::OpenTrade {
            signal_id: snapshot.signals[0].id.clone(),
            stake: Some(dec!(10)),
        },
        &mut entropy,
        &config,
    )
    .snapshot;
    snapshot = reduce(
        &snapshot,
        Action::SetAutoUpdate { enabled: false },
        &mut entropy,
        &config,
    )
    .snapshot;

    let signals = snapshot.signals.clone();
    let market = snapshot.market_data.clone();

    // A fresh source that wins the settlement draw
    let mut wins = ScriptedEntropy::constant(0.1);
    let settled = tick(&snapshot, 200, &mut wins, &config);

    assert_eq!(settled.signals, signals);
    assert_eq!(settled.market_data, market);
    assert_eq!(settled.balance(), dec!(1008));
    assert_eq!(wins.draws(), 1);
}

#[test]
fn test_segment_selection_regenerates() {
    let config = AnalyzerConfig::default();
    let mut entropy = SeededEntropy::new(12);
    let snapshot = reduce(
        &Snapshot::new(&config, t0()),
        Action::Tick { now: t0() },
        &mut entropy,
        &config,
    )
    .snapshot;

    let outcome = reduce(
        &snapshot,
        Action::SelectSegment {
            filter: SegmentFilter::Otc,
        },
        &mut entropy,
        &config,
    );

    assert_eq!(outcome.snapshot.filter, SegmentFilter::Otc);
    assert!(outcome
        .snapshot
        .signals
        .iter()
        .all(|s| s.segment == common::MarketSegment::Otc));
    // The overview always lists every top instrument
    assert_eq!(outcome.snapshot.market_data.len(), 12);
}

#[test]
fn test_negative_balance_rejected() {
    let config = AnalyzerConfig::default();
    let snapshot = Snapshot::new(&config, t0());
    let mut entropy = SeededEntropy::new(1);

    let outcome = reduce(
        &snapshot,
        Action::SetBalance {
            balance: Decimal::NEGATIVE_ONE,
        },
        &mut entropy,
        &config,
    );
    assert_eq!(outcome.snapshot.balance(), dec!(1000));
    assert_eq!(outcome.rejections().count(), 1);
}

#[test]
fn test_segment_selection_while_frozen_hides_other_segment() {
    let config = AnalyzerConfig::default();
    let mut entropy = ScriptedEntropy::constant(0.99);
    let snapshot = tick(&Snapshot::new(&config, t0()), 0, &mut entropy, &config);
    assert!(snapshot
        .signals
        .iter()
        .any(|s| s.segment == common::MarketSegment::Classic));

    let frozen = reduce(
        &snapshot,
        Action::SetAutoUpdate { enabled: false },
        &mut entropy,
        &config,
    )
    .snapshot;
    let outcome = reduce(
        &frozen,
        Action::SelectSegment {
            filter: SegmentFilter::Otc,
        },
        &mut entropy,
        &config,
    );

    let shown = &outcome.snapshot.signals;
    assert!(!shown.is_empty());
    assert!(shown.iter().all(|s| s.segment == common::MarketSegment::Otc));
    assert_eq!(outcome.snapshot.market_data, frozen.market_data);

    // A classic signal from before the switch can no longer be traded
    let classic_id = frozen
        .signals
        .iter()
        .find(|s| s.segment == common::MarketSegment::Classic)
        .map(|s| s.id.clone())
        .unwrap();
    let rejected = reduce(
        &outcome.snapshot,
        Action::OpenTrade {
            signal_id: classic_id,
            stake: Some(dec!(10)),
        },
        &mut entropy,
        &config,
    );
    assert!(matches!(
        rejected.rejections().next(),
        Some(TradeRejection::UnknownSignal { .. })
    ));
}

#[test]
fn test_countdown_follows_elapsed_time() {
    let config = frozen_refresh();
    let mut entropy = ScriptedEntropy::constant(0.99);
    let snapshot = tick(&Snapshot::new(&config, t0()), 0, &mut entropy, &config);
    assert_eq!(snapshot.signals[0].seconds_to_open, 123);

    // One tick after a 10 s gap
    let later = reduce(
        &snapshot,
        Action::Tick {
            now: t0() + Duration::seconds(10),
        },
        &mut entropy,
        &config,
    );
    assert_eq!(later.snapshot.signals[0].seconds_to_open, 113);
    assert!(later
        .events
        .contains(&Event::CountdownsAdvanced { seconds: 10 }));
}

#[test]
fn test_countdown_with_sub_second_ticks() {
    let config = frozen_refresh();
    let mut entropy = ScriptedEntropy::constant(0.99);
    let mut snapshot = tick(&Snapshot::new(&config, t0()), 0, &mut entropy, &config);

    for millis in [400, 800, 1200, 1600, 2000, 2400] {
        snapshot = reduce(
            &snapshot,
            Action::Tick {
                now: t0() + Duration::milliseconds(millis),
            },
            &mut entropy,
            &config,
        )
        .snapshot;
    }

    // 2.4 s elapsed: two whole seconds counted, remainder carried
    assert_eq!(snapshot.signals[0].seconds_to_open, 121);

    let snapshot = reduce(
        &snapshot,
        Action::Tick {
            now: t0() + Duration::milliseconds(3000),
        },
        &mut entropy,
        &config,
    )
    .snapshot;
    assert_eq!(snapshot.signals[0].seconds_to_open, 120);
}

#[test]
fn test_frozen_time_not_counted() {
    let config = frozen_refresh();
    let mut entropy = ScriptedEntropy::constant(0.99);
    let snapshot = tick(&Snapshot::new(&config, t0()), 0, &mut entropy, &config);

    let mut off = reduce(
        &snapshot,
        Action::SetAutoUpdate { enabled: false },
        &mut entropy,
        &config,
    )
    .snapshot;
    off = tick(&off, 30, &mut entropy, &config);
    assert_eq!(off.signals[0].seconds_to_open, 123);

    let on = reduce(
        &off,
        Action::SetAutoUpdate { enabled: true },
        &mut entropy,
        &config,
    )
    .snapshot;
    let resumed = tick(&on, 35, &mut entropy, &config);
    assert_eq!(resumed.signals[0].seconds_to_open, 118);
}
