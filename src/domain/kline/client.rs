//! K-line sub-client: streaming series subscriptions.

use crate::client::FeedClient;
use crate::domain::kline::SeriesKey;
use crate::stream::KlineSubscription;

/// Sub-client for k-line operations.
pub struct Klines<'a> {
    pub(crate) client: &'a FeedClient,
}

impl<'a> Klines<'a> {
    /// An idle subscription. Call [`KlineSubscription::start`] to connect.
    pub fn subscription(&self) -> KlineSubscription {
        KlineSubscription::new(self.client.http.clone(), self.client.stream_config.clone())
    }

    /// A subscription already streaming `key`.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn subscribe(&self, key: SeriesKey) -> KlineSubscription {
        let mut subscription = self.subscription();
        subscription.start(key);
        subscription
    }
}
