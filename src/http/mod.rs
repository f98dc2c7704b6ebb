//! HTTP client layer: `FeedHttp` with per-endpoint retry policies.

pub mod client;
pub mod retry;

pub use client::{FeedHttp, HttpConfig};
pub use retry::{RetryConfig, RetryPolicy};
