//! Instrument universe and market segments

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Full tradable universe, in dashboard order.
pub const ALL_INSTRUMENTS: [&str; 31] = [
    "EUR/USD", "GBP/USD", "USD/JPY", "AUD/USD", "USD/CAD", "NZD/USD", "USD/CHF",
    "EUR/GBP", "EUR/JPY", "GBP/JPY", "AUD/JPY", "EUR/AUD", "GBP/AUD", "EUR/CAD",
    "BTC/USD", "ETH/USD", "XRP/USD", "LTC/USD", "BCH/USD", "BNB/USD", "ADA/USD",
    "DOGE/USD", "SOL/USD", "DOT/USD", "MATIC/USD", "LINK/USD", "UNI/USD",
    "XAU/USD", "XAG/USD", "OIL/USD", "GAS/USD",
];

/// Subset shown in the market overview.
pub const TOP_INSTRUMENTS: [&str; 12] = [
    "EUR/USD", "GBP/USD", "USD/JPY", "AUD/USD", "BTC/USD", "ETH/USD",
    "XAU/USD", "EUR/GBP", "GBP/JPY", "XRP/USD", "LTC/USD", "SOL/USD",
];

/// Market segment an instrument trades in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketSegment {
    Classic,
    Otc,
}

impl MarketSegment {
    /// Segment for the instrument at `position` in its universe.
    /// Every third instrument, starting with the first, is OTC.
    pub fn for_position(position: usize) -> Self {
        if position % 3 == 0 {
            MarketSegment::Otc
        } else {
            MarketSegment::Classic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketSegment::Classic => "classic",
            MarketSegment::Otc => "otc",
        }
    }
}

impl fmt::Display for MarketSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Segment filter requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SegmentFilter {
    #[default]
    All,
    Classic,
    Otc,
}

impl SegmentFilter {
    pub fn admits(&self, segment: MarketSegment) -> bool {
        match self {
            SegmentFilter::All => true,
            SegmentFilter::Classic => segment == MarketSegment::Classic,
            SegmentFilter::Otc => segment == MarketSegment::Otc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentFilter::All => "all",
            SegmentFilter::Classic => "classic",
            SegmentFilter::Otc => "otc",
        }
    }
}

impl fmt::Display for SegmentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(SegmentFilter::All),
            "classic" => Ok(SegmentFilter::Classic),
            "otc" => Ok(SegmentFilter::Otc),
            other => Err(format!("unknown segment filter: {}", other)),
        }
    }
}

/// A tradable symbol together with its fixed segment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub segment: MarketSegment,
}

/// Ordered instrument universe with a position-based segment partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Universe {
    instruments: Vec<Instrument>,
}

impl Universe {
    /// Build a universe; segments are assigned by position.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let instruments = symbols
            .into_iter()
            .enumerate()
            .map(|(position, symbol)| Instrument {
                symbol: symbol.into(),
                segment: MarketSegment::for_position(position),
            })
            .collect();

        Self { instruments }
    }

    /// The 31-instrument dashboard universe.
    pub fn standard() -> Self {
        Self::new(ALL_INSTRUMENTS)
    }

    pub fn empty() -> Self {
        Self {
            instruments: Vec::new(),
        }
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.symbol == symbol)
    }

    pub fn segment_of(&self, symbol: &str) -> Option<MarketSegment> {
        self.get(symbol).map(|i| i.segment)
    }

    /// Instruments admitted by `filter`, with their universe positions.
    pub fn filtered(&self, filter: SegmentFilter) -> impl Iterator<Item = (usize, &Instrument)> {
        self.instruments
            .iter()
            .enumerate()
            .filter(move |(_, i)| filter.admits(i.segment))
    }

    /// (classic, otc) instrument counts.
    pub fn segment_counts(&self) -> (usize, usize) {
        let otc = self
            .instruments
            .iter()
            .filter(|i| i.segment == MarketSegment::Otc)
            .count();
        (self.instruments.len() - otc, otc)
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::standard()
    }
}
