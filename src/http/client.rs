//! Low-level HTTP client: `FeedHttp`.
//!
//! One method per API endpoint. Returns wire types (conversion to domain types
//! happens at the sub-client boundary). The k-line stream gets its own
//! `reqwest::Client` without a total timeout, since the response never ends
//! on its own.

use crate::domain::asset::wire::AssetsResponse;
use crate::domain::kline::wire::KlineStreamRequest;
use crate::domain::kline::SeriesKey;
use crate::domain::transaction::wire::TxsResponse;
use crate::error::{HttpError, TransportError};
use crate::http::retry::RetryPolicy;
use crate::shared::Symbol;

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing;

/// Timeouts for the two underlying clients.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Total deadline for JSON requests.
    pub request_timeout: Duration,
    /// TCP/TLS connect deadline, shared by JSON requests and the stream.
    pub connect_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Low-level HTTP client for the dashboard API.
#[derive(Clone)]
pub struct FeedHttp {
    base_url: String,
    client: Client,
    stream_client: Client,
}

impl FeedHttp {
    pub fn new(base_url: &str) -> Self {
        Self::with_config(base_url, &HttpConfig::default())
    }

    pub fn with_config(base_url: &str, config: &HttpConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client");

        let stream_client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .expect("Failed to build streaming HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            stream_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Assets ───────────────────────────────────────────────────────────

    pub async fn get_assets(&self, page: u32, page_size: u32) -> Result<AssetsResponse, HttpError> {
        let url = format!(
            "{}/assets/getAssets?page={}&page_size={}",
            self.base_url, page, page_size
        );
        self.get(&url, RetryPolicy::Idempotent).await
    }

    // ── Transactions ─────────────────────────────────────────────────────

    pub async fn get_txs(
        &self,
        symbol: &Symbol,
        page: u32,
        page_size: u32,
    ) -> Result<TxsResponse, HttpError> {
        let url = format!(
            "{}/txs/getTxs?symbol={}&page={}&page_size={}",
            self.base_url,
            urlencoding::encode(symbol.as_str()),
            page,
            page_size
        );
        self.get(&url, RetryPolicy::Idempotent).await
    }

    // ── K-line stream ────────────────────────────────────────────────────

    /// Open the k-line event stream for `key`.
    ///
    /// Never retried: a failed subscription surfaces its error instead. On
    /// success the caller owns the response body; dropping it closes the
    /// connection.
    pub async fn open_kline_stream(
        &self,
        key: &SeriesKey,
    ) -> Result<reqwest::Response, TransportError> {
        let url = format!("{}/kline/getKlineStream", self.base_url);
        let body = KlineStreamRequest {
            symbol: key.symbol.clone(),
            interval: key.interval,
        };

        let resp = self.stream_client.post(&url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(resp)
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let Some(config) = retry.config() else {
            return self.get_once(url).await;
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.get_once::<T>(url).await {
                Ok(resp) => return Ok(resp),
                Err(e) if config.should_retry(&e) && attempt < config.max_retries => {
                    let delay = config.delay_after(attempt, &e);
                    tracing::debug!(
                        attempt = attempt + 1,
                        max = config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying request to {}",
                        url
                    );
                    futures_timer::Delay::new(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(classify)?;
        let status = resp.status();

        if status.is_success() {
            return resp.json::<T>().await.map_err(classify);
        }

        let status_code = status.as_u16();
        let retry_after_ms = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| secs.saturating_mul(1000));
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            404 => Err(HttpError::NotFound(body_text)),
            429 => Err(HttpError::RateLimited { retry_after_ms }),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

/// Split request deadlines out of the generic reqwest error.
fn classify(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Reqwest(e)
    }
}

impl std::fmt::Debug for FeedHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedHttp")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
