//! Wire types for transaction responses (REST).

use crate::shared::serde_util::int_or_string;
use crate::shared::{Side, Symbol};
use serde::{Deserialize, Serialize};

/// A single executed transaction as the backend sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxRecord {
    /// Unix seconds.
    pub time: i64,
    pub tx_hash: String,
    pub token_address: String,
    pub symbol: Symbol,
    pub side: Side,
    #[serde(with = "int_or_string")]
    pub raw_price: i64,
    pub price_decimals: i64,
    #[serde(with = "int_or_string")]
    pub raw_amount: i64,
    pub amount_decimals: i64,
    #[serde(with = "int_or_string")]
    pub raw_total: i64,
    pub total_decimals: i64,
    pub trader_address: String,
}

/// REST response for `GET /txs/getTxs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxsResponse {
    pub txs: Vec<TxRecord>,
}
