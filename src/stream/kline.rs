//! K-line subscription: one live event stream merged into a series.
//!
//! Lifecycle: `Idle → Connecting → Streaming → (Closed | Errored)`.
//!
//! - `start(key)` tears down the running stream (if any), clears series and
//!   error, then connects for the new key.
//! - Malformed frames are logged and counted, never fatal.
//! - Transport failures (non-2xx status, connect or read errors) end the
//!   subscription with a terminal error; the series keeps its last good state.
//! - `stop()` and `Drop` cancel the task; the response body is dropped at the
//!   next suspension point, which closes the connection.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn, Instrument};

use super::frame::{parse_frame, LineFramer};
use super::{StreamConfig, TaskHandle};
use crate::domain::kline::{convert_batch, Candle, KlineSeries, SeriesKey};
use crate::error::{DecodeError, TransportError};
use crate::http::FeedHttp;
use crate::shared::{Interval, Symbol};

/// Longest frame excerpt included in a skip warning.
const LOG_EXCERPT_CHARS: usize = 200;

/// Where a subscription is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamPhase {
    #[default]
    Idle,
    Connecting,
    Streaming,
    Closed,
    Errored,
}

impl StreamPhase {
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Connecting | Self::Streaming)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }
}

/// Everything a chart needs to render one subscription.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSnapshot {
    pub key: Option<SeriesKey>,
    /// Bumped on every start/stop; identifies the task allowed to publish.
    pub generation: u64,
    pub phase: StreamPhase,
    pub series: KlineSeries,
    /// Terminal transport error, if the subscription failed.
    pub error: Option<String>,
    /// Frames dropped because they could not be decoded.
    pub skipped_frames: u64,
}

/// A single-consumer k-line subscription.
///
/// At most one stream is live at a time. The background task is the only
/// writer of the series; readers get snapshots from [`subscribe`](Self::subscribe).
pub struct KlineSubscription {
    http: FeedHttp,
    config: StreamConfig,
    state_tx: Arc<watch::Sender<SeriesSnapshot>>,
    task: Option<TaskHandle>,
}

impl KlineSubscription {
    /// Create an idle subscription. Does not connect yet.
    pub fn new(http: FeedHttp, config: StreamConfig) -> Self {
        let (state_tx, _) = watch::channel(SeriesSnapshot::default());
        Self {
            http,
            config,
            state_tx: Arc::new(state_tx),
            task: None,
        }
    }

    /// Start streaming `key`, replacing any running stream.
    ///
    /// The reset (empty series, no error, `Connecting`) is published before
    /// this returns, so no data from the previous key is visible afterwards.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn start(&mut self, key: SeriesKey) {
        self.teardown();

        let mut generation = 0;
        self.state_tx.send_modify(|snap| {
            snap.generation += 1;
            generation = snap.generation;
            snap.key = Some(key.clone());
            snap.phase = StreamPhase::Connecting;
            snap.series.clear();
            snap.error = None;
            snap.skipped_frames = 0;
        });
        info!(%key, generation, "Starting k-line subscription");

        let span = tracing::info_span!(
            "kline_stream",
            symbol = %key.symbol,
            interval = %key.interval,
            generation
        );
        let cancel = CancellationToken::new();
        let task = StreamTask {
            http: self.http.clone(),
            idle_timeout: self.config.idle_timeout,
            key,
            generation,
            state_tx: Arc::clone(&self.state_tx),
            cancel: cancel.clone(),
        };
        self.task = Some(TaskHandle::spawn(cancel, task.run().instrument(span)));
    }

    /// Switch to another symbol, keeping the interval. No-op if unchanged.
    pub fn switch_symbol(&mut self, symbol: impl Into<Symbol>) {
        let symbol = symbol.into();
        let interval = match self.key() {
            Some(key) if key.symbol == symbol => return,
            Some(key) => key.interval,
            None => Interval::default(),
        };
        self.start(SeriesKey { symbol, interval });
    }

    /// Switch to another interval, keeping the symbol. No-op if unchanged.
    pub fn switch_interval(&mut self, interval: Interval) {
        let symbol = match self.key() {
            Some(key) if key.interval == interval => return,
            Some(key) => key.symbol,
            None => Symbol::default(),
        };
        self.start(SeriesKey { symbol, interval });
    }

    /// Stop streaming and discard the series.
    pub fn stop(&mut self) {
        let had_task = self.teardown();
        if !had_task && self.state_tx.borrow().key.is_none() {
            return;
        }
        self.state_tx.send_modify(|snap| {
            snap.generation += 1;
            snap.key = None;
            snap.phase = StreamPhase::Closed;
            snap.series.clear();
            snap.error = None;
            snap.skipped_frames = 0;
        });
        info!("Stopped k-line subscription");
    }

    /// Stop and wait for the background task to finish.
    pub async fn shutdown(mut self) {
        let task = self.task.take();
        self.stop();
        if let Some(task) = task {
            task.shutdown(self.config.shutdown_timeout).await;
        }
    }

    /// The key currently bound to the subscription.
    pub fn key(&self) -> Option<SeriesKey> {
        self.state_tx.borrow().key.clone()
    }

    pub fn phase(&self) -> StreamPhase {
        self.state_tx.borrow().phase
    }

    pub fn error(&self) -> Option<String> {
        self.state_tx.borrow().error.clone()
    }

    /// Copy of the current candles.
    pub fn candles(&self) -> Vec<Candle> {
        self.state_tx.borrow().series.candles().to_vec()
    }

    /// Copy of the full current state.
    pub fn snapshot(&self) -> SeriesSnapshot {
        self.state_tx.borrow().clone()
    }

    /// Receiver notified after every published change.
    pub fn subscribe(&self) -> watch::Receiver<SeriesSnapshot> {
        self.state_tx.subscribe()
    }

    /// Cancel the running task, if any. Returns whether one was running.
    fn teardown(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.cancel();
                debug!("Cancelled previous k-line stream");
                true
            }
            None => false,
        }
    }
}

impl Drop for KlineSubscription {
    fn drop(&mut self) {
        self.teardown();
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

enum StreamEnd {
    Cancelled,
    Eof,
    Failed(TransportError),
}

struct StreamTask {
    http: FeedHttp,
    idle_timeout: Option<Duration>,
    key: SeriesKey,
    generation: u64,
    state_tx: Arc<watch::Sender<SeriesSnapshot>>,
    cancel: CancellationToken,
}

impl StreamTask {
    async fn run(self) {
        let opened = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!("Cancelled before the stream opened");
                return;
            }
            opened = self.http.open_kline_stream(&self.key) => opened,
        };

        let response = match opened {
            Ok(response) => response,
            Err(e) => {
                self.fail(e);
                return;
            }
        };

        self.publish(|snap| snap.phase = StreamPhase::Streaming);
        info!("Streaming");

        match self.pump(response).await {
            StreamEnd::Cancelled => debug!("Subscription cancelled, reader released"),
            StreamEnd::Eof => {
                info!("Stream closed by server");
                self.publish(|snap| snap.phase = StreamPhase::Closed);
            }
            StreamEnd::Failed(e) => self.fail(e),
        }
    }

    /// Read the body until it ends, fails or the task is cancelled.
    /// The body is dropped on return.
    async fn pump(&self, response: reqwest::Response) -> StreamEnd {
        let body = response.bytes_stream();
        tokio::pin!(body);
        let mut framer = LineFramer::new();

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return StreamEnd::Cancelled,
                next = self.next_chunk(&mut body) => next,
            };

            match next {
                Ok(Some(chunk)) => {
                    for line in framer.push(&chunk) {
                        if self.cancel.is_cancelled() {
                            return StreamEnd::Cancelled;
                        }
                        self.handle_line(line);
                    }
                }
                Ok(None) => {
                    if let Some(line) = framer.finish() {
                        self.handle_line(line);
                    }
                    return StreamEnd::Eof;
                }
                Err(e) => return StreamEnd::Failed(e),
            }
        }
    }

    async fn next_chunk<S, B>(&self, body: &mut S) -> Result<Option<B>, TransportError>
    where
        S: Stream<Item = Result<B, reqwest::Error>> + Unpin,
    {
        let next = match self.idle_timeout {
            Some(limit) => tokio::time::timeout(limit, body.next())
                .await
                .map_err(|_| {
                    TransportError::Read(format!("no data received for {}ms", limit.as_millis()))
                })?,
            None => body.next().await,
        };

        match next {
            Some(Ok(chunk)) => Ok(Some(chunk)),
            Some(Err(e)) => Err(TransportError::Read(e.to_string())),
            None => Ok(None),
        }
    }

    fn handle_line(&self, line: Result<String, DecodeError>) {
        let text = match line {
            Ok(text) => text,
            Err(e) => return self.skip(e, "<undecodable line>"),
        };

        let Some(frame) = parse_frame(&text) else {
            trace!(line = %text, "Ignoring non-data line");
            return;
        };

        let candles = match frame.and_then(convert_batch) {
            Ok(candles) => candles,
            Err(e) => return self.skip(e, &text),
        };

        let count = candles.len();
        let mut outcome = None;
        self.publish(|snap| outcome = Some(snap.series.merge(candles)));
        if let Some(outcome) = outcome {
            trace!(
                count,
                replaced = outcome.replaced,
                inserted = outcome.inserted,
                "Merged frame"
            );
        }
    }

    fn skip(&self, e: DecodeError, raw: &str) {
        let excerpt: String = raw.chars().take(LOG_EXCERPT_CHARS).collect();
        warn!(error = %e, frame = %excerpt, "Skipping malformed frame");
        self.publish(|snap| snap.skipped_frames += 1);
    }

    fn fail(&self, e: TransportError) {
        if self.cancel.is_cancelled() {
            debug!(error = %e, "Ignoring failure of a cancelled stream");
            return;
        }
        error!(error = %e, "K-line stream failed");
        self.publish(|snap| {
            snap.phase = StreamPhase::Errored;
            snap.error = Some(e.to_string());
        });
    }

    /// Apply `update` only while this task's generation is current.
    fn publish(&self, update: impl FnOnce(&mut SeriesSnapshot)) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        let generation = self.generation;
        self.state_tx.send_if_modified(|snap| {
            if snap.generation != generation {
                return false;
            }
            update(snap);
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle() -> KlineSubscription {
        KlineSubscription::new(FeedHttp::new("http://127.0.0.1:9"), StreamConfig::default())
    }

    #[test]
    fn test_new_subscription_is_idle() {
        let sub = idle();
        let snap = sub.snapshot();
        assert_eq!(snap.phase, StreamPhase::Idle);
        assert!(snap.key.is_none());
        assert!(snap.series.is_empty());
        assert!(snap.error.is_none());
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut sub = idle();
        sub.stop();
        assert_eq!(sub.phase(), StreamPhase::Idle);
        assert_eq!(sub.snapshot().generation, 0);
    }

    #[test]
    fn test_phase_helpers() {
        assert!(StreamPhase::Connecting.is_live());
        assert!(StreamPhase::Streaming.is_live());
        assert!(StreamPhase::Closed.is_terminal());
        assert!(StreamPhase::Errored.is_terminal());
        assert!(!StreamPhase::Idle.is_live());
    }

    #[tokio::test]
    async fn test_start_resets_state_before_returning() {
        let mut sub = idle();
        sub.start(SeriesKey::new("MEME/SOL", Interval::Minute1));
        let snap = sub.snapshot();
        assert_eq!(snap.generation, 1);
        assert_eq!(snap.key, Some(SeriesKey::new("MEME/SOL", Interval::Minute1)));
        assert!(snap.series.is_empty());
        assert!(snap.error.is_none());

        sub.switch_interval(Interval::Minute5);
        let snap = sub.snapshot();
        assert_eq!(snap.generation, 2);
        assert_eq!(snap.key.unwrap().interval, Interval::Minute5);

        // Same interval again does not restart.
        sub.switch_interval(Interval::Minute5);
        assert_eq!(sub.snapshot().generation, 2);

        sub.stop();
        let snap = sub.snapshot();
        assert_eq!(snap.phase, StreamPhase::Closed);
        assert!(snap.key.is_none());
    }

    #[tokio::test]
    async fn test_stale_generation_cannot_publish() {
        let sub = idle();
        sub.state_tx.send_modify(|snap| snap.generation = 5);

        let stale = StreamTask {
            http: sub.http.clone(),
            idle_timeout: None,
            key: SeriesKey::new("MEME/SOL", Interval::Minute1),
            generation: 4,
            state_tx: Arc::clone(&sub.state_tx),
            cancel: CancellationToken::new(),
        };
        assert!(!stale.publish(|snap| snap.error = Some("late".into())));
        assert!(sub.error().is_none());
    }
}
