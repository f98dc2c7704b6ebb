//! Wire types for the k-line stream.

use crate::shared::serde_util::{int_or_string, StringOrInt};
use crate::shared::{Interval, Symbol};
use serde::{Deserialize, Serialize};

/// Body of `POST /kline/getKlineStream`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KlineStreamRequest {
    pub symbol: Symbol,
    pub interval: Interval,
}

/// Payload of one `data: ` frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KlineBatch {
    pub klines: Vec<RawKline>,
}

/// A candle as the backend sends it: epoch seconds and fixed-point fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawKline {
    pub timestamp: StringOrInt,
    #[serde(with = "int_or_string")]
    pub raw_open: i64,
    pub open_decimals: i64,
    #[serde(with = "int_or_string")]
    pub raw_close: i64,
    pub close_decimals: i64,
    #[serde(with = "int_or_string")]
    pub raw_high: i64,
    pub high_decimals: i64,
    #[serde(with = "int_or_string")]
    pub raw_low: i64,
    pub low_decimals: i64,
    #[serde(with = "int_or_string")]
    pub raw_volume: i64,
    pub volume_decimals: i64,
    #[serde(with = "int_or_string")]
    pub raw_turnover: i64,
    pub turnover_decimals: i64,
}
