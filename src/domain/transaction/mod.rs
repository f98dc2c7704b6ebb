//! Transaction domain: executed trades for a symbol, newest first.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use crate::shared::fmt::{fixed, format_time_ago, PRICE_DECIMALS, TOTAL_DECIMALS};
use crate::shared::{truncate_address, Side, Symbol};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use convert::convert_txs;

/// Page size the dashboard polls with.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// An executed transaction with decoded amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub time: DateTime<Utc>,
    pub tx_hash: String,
    pub symbol: Symbol,
    pub side: Side,
    pub price: f64,
    pub amount: f64,
    pub total: f64,
    pub trader_address: String,
}

impl Transaction {
    /// Price with four decimals, as shown in the transaction table.
    pub fn display_price(&self) -> String {
        fixed(self.price, PRICE_DECIMALS)
    }

    /// Total with five decimals, as shown in the transaction table.
    pub fn display_total(&self) -> String {
        fixed(self.total, TOTAL_DECIMALS)
    }

    pub fn short_trader(&self) -> String {
        truncate_address(&self.trader_address)
    }

    pub fn age(&self, now: DateTime<Utc>) -> String {
        format_time_ago(self.time, now)
    }
}
