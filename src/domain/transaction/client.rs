//! Transactions sub-client: recent transaction queries and the polling feed.

use crate::client::FeedClient;
use crate::domain::transaction::{convert_txs, Transaction};
use crate::error::SdkError;
use crate::shared::Symbol;

pub struct Transactions<'a> {
    pub(crate) client: &'a FeedClient,
}

impl<'a> Transactions<'a> {
    /// Fetch one page of transactions for `symbol`, newest first.
    ///
    /// Records that fail to decode are dropped with a warning.
    pub async fn list(
        &self,
        symbol: &Symbol,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Transaction>, SdkError> {
        let resp = self.client.http.get_txs(symbol, page, page_size).await?;
        Ok(convert_txs(resp.txs))
    }

    /// An idle transaction feed using the client's poll settings.
    #[cfg(feature = "stream")]
    pub fn feed(&self) -> crate::stream::TransactionFeed {
        crate::stream::TransactionFeed::new(
            self.client.http.clone(),
            self.client.poll_config.clone(),
        )
    }

    /// A transaction feed already polling `symbol`.
    ///
    /// Must be called inside a Tokio runtime.
    #[cfg(feature = "stream")]
    pub fn watch(&self, symbol: impl Into<Symbol>) -> crate::stream::TransactionFeed {
        let mut feed = self.feed();
        feed.start(symbol.into());
        feed
    }
}
