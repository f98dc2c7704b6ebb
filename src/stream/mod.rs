//! Streaming layer: long-lived feeds driven by background Tokio tasks.
//!
//! - `kline`: one SSE k-line subscription merged into a
//!   [`KlineSeries`](crate::domain::kline::KlineSeries)
//! - `poll`: the transaction list, refreshed on an interval
//! - `frame`: chunk → line → `data: ` frame decoding
//!
//! Each feed owns at most one background task. Switching key cancels the old task
//! before the new one is spawned, and every publish is tagged with a generation
//! so a task that has been replaced can never write into the new state.
//! Consumers read snapshots through a `tokio::sync::watch` channel.

pub mod frame;
pub mod kline;
pub mod poll;

pub use frame::{parse_frame, LineFramer, DATA_PREFIX};
pub use kline::{KlineSubscription, SeriesSnapshot, StreamPhase};
pub use poll::{TransactionFeed, TransactionSnapshot};

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Configuration for k-line subscriptions.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Fail the subscription when no bytes arrive for this long.
    pub idle_timeout: Option<Duration>,
    /// How long `shutdown()` waits for the task before aborting it.
    pub shutdown_timeout: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            idle_timeout: None,
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

/// Configuration for the transaction poller.
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    pub page: u32,
    pub page_size: u32,
    /// How long `shutdown()` waits for the task before aborting it.
    pub shutdown_timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            page: 0,
            page_size: crate::domain::transaction::DEFAULT_PAGE_SIZE,
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

/// A spawned feed task and the token that stops it.
///
/// Dropping the handle cancels the task.
pub(crate) struct TaskHandle {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl TaskHandle {
    pub(crate) fn spawn<F>(cancel: CancellationToken, future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            cancel,
            handle: tokio::spawn(future),
        }
    }

    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Cancel and wait for the task to return, aborting it after `timeout`.
    pub(crate) async fn shutdown(mut self, timeout: Duration) {
        self.cancel.cancel();
        if tokio::time::timeout(timeout, &mut self.handle).await.is_err() {
            tracing::warn!("Feed task did not stop within {}ms, aborting", timeout.as_millis());
            self.handle.abort();
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
