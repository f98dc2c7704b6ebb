//! # K-line Feed SDK
//!
//! A Rust SDK for a trading dashboard backend: live candlestick streams,
//! the asset list, and recent transactions.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core**: Types, fixed-point decoding, domain models, the merged series
//! 2. **HTTP API**: `FeedHttp` with per-endpoint retry policies
//! 3. **Streaming**: Background Tokio tasks: the k-line subscription and the transaction poller
//! 4. **High-Level Client**: `FeedClient` with nested sub-clients and caching
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kline_feed_sdk::prelude::*;
//!
//! let client = FeedClient::builder()
//!     .base_url("http://127.0.0.1:8080")
//!     .build()?;
//!
//! let mut chart = client.klines().subscribe(SeriesKey::new("MEME/SOL", Interval::Minute1));
//! let mut updates = chart.subscribe();
//! while updates.changed().await.is_ok() {
//!     let snap = updates.borrow_and_update().clone();
//!     render(snap.series.candles());
//! }
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes, fixed-point decoding, display helpers.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 3: Streaming ───────────────────────────────────────────────────────

/// Long-lived feeds: SSE k-line subscription, transaction poller.
#[cfg(feature = "stream")]
pub mod stream;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `FeedClient`, the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{decode_fixed_point, FixedPointValue, Interval, Side, Symbol};

    // Domain types
    pub use crate::domain::asset::{Asset, AssetKind};
    pub use crate::domain::kline::{Candle, KlineSeries, MergeOutcome, SeriesKey};
    pub use crate::domain::transaction::Transaction;

    // Errors
    pub use crate::error::{DecodeError, HttpError, SdkError, TransportError};

    // Network
    pub use crate::network::DEFAULT_API_URL;

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{AssetsClient, FeedClient, FeedClientBuilder, TransactionsClient};
    #[cfg(feature = "stream")]
    pub use crate::client::KlinesClient;
    #[cfg(feature = "http")]
    pub use crate::http::{FeedHttp, HttpConfig, RetryConfig, RetryPolicy};

    // Streaming
    #[cfg(feature = "stream")]
    pub use crate::stream::{
        KlineSubscription, PollConfig, SeriesSnapshot, StreamConfig, StreamPhase,
        TransactionFeed, TransactionSnapshot,
    };
}
