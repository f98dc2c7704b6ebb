//! High-level client: `FeedClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, shared cache state, and accessor methods.

use crate::domain::asset::client::Assets;
use crate::domain::asset::Asset;
use crate::domain::transaction::client::Transactions;
use crate::error::SdkError;
use crate::http::{FeedHttp, HttpConfig};

#[cfg(feature = "stream")]
use crate::domain::kline::client::Klines;
#[cfg(feature = "stream")]
use crate::stream::{PollConfig, StreamConfig};

use async_lock::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Re-export sub-client types for convenience.
pub use crate::domain::asset::client::Assets as AssetsClient;
#[cfg(feature = "stream")]
pub use crate::domain::kline::client::Klines as KlinesClient;
pub use crate::domain::transaction::client::Transactions as TransactionsClient;

/// Asset page cache: (page, page_size) → (assets, fetched_at)
pub(crate) type AssetCache = HashMap<(u32, u32), (Vec<Asset>, Instant)>;

/// The primary entry point for the feed SDK.
///
/// Provides nested sub-client accessors for each domain:
/// `client.klines()`, `client.assets()`, `client.transactions()`.
#[derive(Clone)]
pub struct FeedClient {
    pub(crate) http: FeedHttp,
    #[cfg(feature = "stream")]
    pub(crate) stream_config: StreamConfig,
    #[cfg(feature = "stream")]
    pub(crate) poll_config: PollConfig,
    pub(crate) asset_cache: Arc<RwLock<AssetCache>>,
    /// Cache TTL for asset pages
    pub(crate) asset_cache_ttl: Duration,
}

impl FeedClient {
    pub fn builder() -> FeedClientBuilder {
        FeedClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    #[cfg(feature = "stream")]
    pub fn klines(&self) -> Klines<'_> {
        Klines { client: self }
    }

    pub fn assets(&self) -> Assets<'_> {
        Assets { client: self }
    }

    pub fn transactions(&self) -> Transactions<'_> {
        Transactions { client: self }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &FeedHttp {
        &self.http
    }

    /// Clear all HTTP caches.
    pub async fn clear_all_caches(&self) {
        self.asset_cache.write().await.clear();
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct FeedClientBuilder {
    base_url: String,
    http_config: HttpConfig,
    asset_cache_ttl: Duration,
    #[cfg(feature = "stream")]
    stream_config: StreamConfig,
    #[cfg(feature = "stream")]
    poll_config: PollConfig,
}

impl Default for FeedClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            http_config: HttpConfig::default(),
            asset_cache_ttl: Duration::from_secs(60),
            #[cfg(feature = "stream")]
            stream_config: StreamConfig::default(),
            #[cfg(feature = "stream")]
            poll_config: PollConfig::default(),
        }
    }
}

impl FeedClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.request_timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.connect_timeout = timeout;
        self
    }

    pub fn asset_cache_ttl(mut self, ttl: Duration) -> Self {
        self.asset_cache_ttl = ttl;
        self
    }

    #[cfg(feature = "stream")]
    pub fn stream_config(mut self, config: StreamConfig) -> Self {
        self.stream_config = config;
        self
    }

    #[cfg(feature = "stream")]
    pub fn poll_config(mut self, config: PollConfig) -> Self {
        self.poll_config = config;
        self
    }

    /// Shortcut for the transaction poll interval.
    #[cfg(feature = "stream")]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_config.interval = interval;
        self
    }

    pub fn build(self) -> Result<FeedClient, SdkError> {
        let base_url = self.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(SdkError::Validation(format!(
                "base URL must start with http:// or https://, got {base_url:?}"
            )));
        }

        Ok(FeedClient {
            http: FeedHttp::with_config(base_url, &self.http_config),
            #[cfg(feature = "stream")]
            stream_config: self.stream_config,
            #[cfg(feature = "stream")]
            poll_config: self.poll_config,
            asset_cache: Arc::new(RwLock::new(HashMap::new())),
            asset_cache_ttl: self.asset_cache_ttl,
        })
    }
}
