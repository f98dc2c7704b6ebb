//! Conversions from wire types to domain types for k-lines.

use super::wire::{KlineBatch, RawKline};
use super::Candle;
use crate::error::DecodeError;
use crate::shared::decode_fixed_point;

impl TryFrom<RawKline> for Candle {
    type Error = DecodeError;

    fn try_from(k: RawKline) -> Result<Self, Self::Error> {
        let seconds = k.timestamp.to_i64().map_err(DecodeError::InvalidTimestamp)?;
        let timestamp = seconds.checked_mul(1000).ok_or_else(|| {
            DecodeError::InvalidTimestamp(format!("{} seconds overflows milliseconds", seconds))
        })?;

        Ok(Self {
            timestamp,
            open: decode_fixed_point("open", k.raw_open, k.open_decimals)?,
            close: decode_fixed_point("close", k.raw_close, k.close_decimals)?,
            high: decode_fixed_point("high", k.raw_high, k.high_decimals)?,
            low: decode_fixed_point("low", k.raw_low, k.low_decimals)?,
            volume: decode_fixed_point("volume", k.raw_volume, k.volume_decimals)?,
        })
    }
}

/// Convert a whole frame, preserving record order.
///
/// One bad record rejects the whole frame.
pub fn convert_batch(batch: KlineBatch) -> Result<Vec<Candle>, DecodeError> {
    batch.klines.into_iter().map(Candle::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::serde_util::StringOrInt;

    fn raw(ts: &str, close: i64) -> RawKline {
        RawKline {
            timestamp: StringOrInt::Str(ts.to_string()),
            raw_open: 100,
            open_decimals: 2,
            raw_close: close,
            close_decimals: 2,
            raw_high: 200,
            high_decimals: 2,
            raw_low: 50,
            low_decimals: 2,
            raw_volume: 123456,
            volume_decimals: 3,
            raw_turnover: 999,
            turnover_decimals: 1,
        }
    }

    #[test]
    fn test_raw_kline_conversion() {
        let candle = Candle::try_from(raw("1700000000", 150)).unwrap();
        assert_eq!(candle.timestamp, 1_700_000_000_000);
        assert_eq!(candle.open, 1.0);
        assert_eq!(candle.close, 1.5);
        assert_eq!(candle.high, 2.0);
        assert_eq!(candle.low, 0.5);
        assert_eq!(candle.volume, 123.456);
    }

    #[test]
    fn test_integer_timestamp() {
        let mut k = raw("0", 150);
        k.timestamp = StringOrInt::Int(60);
        assert_eq!(Candle::try_from(k).unwrap().timestamp, 60_000);
    }

    #[test]
    fn test_invalid_timestamp() {
        let err = Candle::try_from(raw("yesterday", 150)).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidTimestamp(_)));

        let mut k = raw("0", 150);
        k.timestamp = StringOrInt::Int(i64::MAX);
        assert!(matches!(
            Candle::try_from(k).unwrap_err(),
            DecodeError::InvalidTimestamp(_)
        ));
    }

    #[test]
    fn test_negative_decimals_rejected() {
        let mut k = raw("1", 150);
        k.close_decimals = -2;
        assert!(matches!(
            Candle::try_from(k).unwrap_err(),
            DecodeError::NegativeDecimals { field: "close", .. }
        ));
    }

    #[test]
    fn test_convert_batch_preserves_order() {
        let batch = KlineBatch {
            klines: vec![raw("3", 300), raw("1", 100), raw("2", 200)],
        };
        let candles = convert_batch(batch).unwrap();
        let ts: Vec<i64> = candles.iter().map(|c| c.timestamp).collect();
        assert_eq!(ts, [3000, 1000, 2000]);
    }

    #[test]
    fn test_convert_batch_rejects_bad_record() {
        let mut bad = raw("2", 200);
        bad.volume_decimals = 40;
        let batch = KlineBatch {
            klines: vec![raw("1", 100), bad],
        };
        assert!(convert_batch(batch).is_err());
    }

    #[test]
    fn test_wire_json_missing_field_fails() {
        let json = r#"{"klines":[{"timestamp":"1","raw_open":1,"open_decimals":0}]}"#;
        assert!(serde_json::from_str::<KlineBatch>(json).is_err());
    }
}
