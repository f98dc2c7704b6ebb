//! Conversions from wire types to domain types for transactions.

use super::wire::TxRecord;
use super::Transaction;
use crate::error::DecodeError;
use crate::shared::decode_fixed_point;
use chrono::{DateTime, Utc};

impl TryFrom<TxRecord> for Transaction {
    type Error = DecodeError;

    fn try_from(t: TxRecord) -> Result<Self, Self::Error> {
        let time = DateTime::<Utc>::from_timestamp(t.time, 0)
            .ok_or_else(|| DecodeError::InvalidTimestamp(t.time.to_string()))?;

        Ok(Self {
            time,
            price: decode_fixed_point("price", t.raw_price, t.price_decimals)?,
            amount: decode_fixed_point("amount", t.raw_amount, t.amount_decimals)?,
            total: decode_fixed_point("total", t.raw_total, t.total_decimals)?,
            tx_hash: t.tx_hash,
            symbol: t.symbol,
            side: t.side,
            trader_address: t.trader_address,
        })
    }
}

/// Convert a page of records, dropping (and logging) the ones that fail to decode.
pub fn convert_txs(records: Vec<TxRecord>) -> Vec<Transaction> {
    records
        .into_iter()
        .filter_map(|record| {
            let tx_hash = record.tx_hash.clone();
            match Transaction::try_from(record) {
                Ok(tx) => Some(tx),
                Err(e) => {
                    tracing::warn!(
                        tx_hash = %tx_hash,
                        error = %e,
                        "Skipping undecodable transaction"
                    );
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{Side, Symbol};
    use chrono::TimeZone;

    fn record(hash: &str, price_decimals: i64) -> TxRecord {
        TxRecord {
            time: 1_700_000_000,
            tx_hash: hash.to_string(),
            token_address: "token".to_string(),
            symbol: Symbol::from("MEME/SOL"),
            side: Side::Buy,
            raw_price: 12345,
            price_decimals,
            raw_amount: 2_500_000,
            amount_decimals: 6,
            raw_total: 308625,
            total_decimals: 5,
            trader_address: "0xabcdef0123456789".to_string(),
        }
    }

    #[test]
    fn test_tx_record_conversion() {
        let tx = Transaction::try_from(record("h1", 4)).unwrap();
        assert_eq!(tx.time, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
        assert_eq!(tx.price, 1.2345);
        assert_eq!(tx.amount, 2.5);
        assert_eq!(tx.total, 3.08625);
        assert_eq!(tx.side, Side::Buy);
        assert_eq!(tx.display_price(), "1.2345");
        assert_eq!(tx.display_total(), "3.08625");
        assert_eq!(tx.short_trader(), "0xabcd...6789");
    }

    #[test]
    fn test_tx_json_wire_shape() {
        let json = r#"{"txs":[{
            "time": 1700000000, "tx_hash": "h", "token_address": "t",
            "symbol": "MEME/SOL", "side": "SELL",
            "raw_price": 5, "price_decimals": 1,
            "raw_amount": "10", "amount_decimals": 0,
            "raw_total": 50, "total_decimals": 1,
            "trader_address": "trader"
        }]}"#;
        let resp: super::super::wire::TxsResponse = serde_json::from_str(json).unwrap();
        let txs = convert_txs(resp.txs);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].side, Side::Sell);
        assert_eq!(txs[0].amount, 10.0);
    }

    #[test]
    fn test_convert_txs_skips_bad_records() {
        let txs = convert_txs(vec![record("good", 4), record("bad", -1), record("good2", 4)]);
        let hashes: Vec<&str> = txs.iter().map(|t| t.tx_hash.as_str()).collect();
        assert_eq!(hashes, ["good", "good2"]);
    }
}
