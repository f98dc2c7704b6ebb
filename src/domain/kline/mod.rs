//! K-line domain: candles, the merged series, and the streaming sub-client.

#[cfg(feature = "stream")]
pub mod client;
mod convert;
pub mod state;
pub mod wire;

use crate::shared::{Interval, Symbol};
use serde::{Deserialize, Serialize};

pub use convert::convert_batch;
pub use state::{KlineSeries, MergeOutcome};

/// One OHLCV candle, ready for a chart widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket start, Unix milliseconds.
    pub timestamp: i64,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
}

/// The `(symbol, interval)` pair a series belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub symbol: Symbol,
    pub interval: Interval,
}

impl SeriesKey {
    pub fn new(symbol: impl Into<Symbol>, interval: Interval) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
        }
    }
}

impl std::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.symbol, self.interval)
    }
}
