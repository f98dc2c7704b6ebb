//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// HTTP-layer errors for the JSON endpoints.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// Failures of the streaming transport. Fatal to a subscription.
///
/// The `Display` text is what a subscription publishes as its terminal error.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[cfg(feature = "http")]
    #[error("Failed to connect to stream: {0}")]
    Connect(#[from] reqwest::Error),

    #[error("Stream read failed: {0}")]
    Read(String),
}

/// Per-frame or per-record decoding failures. Recovered locally by skipping.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Frame is not valid UTF-8")]
    InvalidUtf8,

    #[error("Line exceeds {limit} bytes")]
    LineTooLong { limit: usize },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Negative decimals for {field}: {decimals}")]
    NegativeDecimals { field: &'static str, decimals: i64 },

    #[error("Decimals out of range for {field}: {decimals}")]
    DecimalsOutOfRange { field: &'static str, decimals: i64 },
}
