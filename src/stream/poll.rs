//! Transaction feed: re-fetches the newest transactions on a fixed interval.
//!
//! The first fetch happens immediately on `start`. A failed poll keeps the
//! last good list and records the error; the next successful poll clears it.
//! Changing symbol clears the list so rows from the old symbol never show
//! under the new one.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn, Instrument};

use super::{PollConfig, TaskHandle};
use crate::domain::transaction::{convert_txs, Transaction};
use crate::http::FeedHttp;
use crate::shared::Symbol;

/// Polls faster than this are clamped.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Current state of a [`TransactionFeed`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionSnapshot {
    pub symbol: Option<Symbol>,
    pub generation: u64,
    /// Newest first, as returned by the server.
    pub transactions: Vec<Transaction>,
    pub last_error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    /// Successful polls since the last start.
    pub polls: u64,
}

/// Interval poller for the transaction list of one symbol.
pub struct TransactionFeed {
    http: FeedHttp,
    config: PollConfig,
    state_tx: Arc<watch::Sender<TransactionSnapshot>>,
    task: Option<TaskHandle>,
}

impl TransactionFeed {
    pub fn new(http: FeedHttp, config: PollConfig) -> Self {
        let (state_tx, _) = watch::channel(TransactionSnapshot::default());
        Self {
            http,
            config,
            state_tx: Arc::new(state_tx),
            task: None,
        }
    }

    /// Start polling `symbol`, replacing any running poller.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn start(&mut self, symbol: Symbol) {
        self.teardown();

        let mut generation = 0;
        self.state_tx.send_modify(|snap| {
            snap.generation += 1;
            generation = snap.generation;
            snap.symbol = Some(symbol.clone());
            snap.transactions.clear();
            snap.last_error = None;
            snap.last_updated = None;
            snap.polls = 0;
        });
        info!(%symbol, generation, "Starting transaction feed");

        let span = tracing::info_span!("tx_feed", symbol = %symbol, generation);
        let cancel = CancellationToken::new();
        let task = PollTask {
            http: self.http.clone(),
            config: self.config.clone(),
            symbol,
            generation,
            state_tx: Arc::clone(&self.state_tx),
            cancel: cancel.clone(),
        };
        self.task = Some(TaskHandle::spawn(cancel, task.run().instrument(span)));
    }

    /// Poll a different symbol. No-op if it is already the current one.
    pub fn switch_symbol(&mut self, symbol: impl Into<Symbol>) {
        let symbol = symbol.into();
        if self.symbol().as_ref() == Some(&symbol) && self.task.is_some() {
            return;
        }
        self.start(symbol);
    }

    /// Stop polling. The last list stays readable.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
            self.state_tx.send_modify(|snap| snap.generation += 1);
            info!("Stopped transaction feed");
        }
    }

    /// Stop and wait for the background task to finish.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            self.state_tx.send_modify(|snap| snap.generation += 1);
            task.shutdown(self.config.shutdown_timeout).await;
        }
    }

    pub fn symbol(&self) -> Option<Symbol> {
        self.state_tx.borrow().symbol.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub fn snapshot(&self) -> TransactionSnapshot {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TransactionSnapshot> {
        self.state_tx.subscribe()
    }

    fn teardown(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }
    }
}

impl Drop for TransactionFeed {
    fn drop(&mut self) {
        self.teardown();
    }
}

struct PollTask {
    http: FeedHttp,
    config: PollConfig,
    symbol: Symbol,
    generation: u64,
    state_tx: Arc<watch::Sender<TransactionSnapshot>>,
    cancel: CancellationToken,
}

impl PollTask {
    async fn run(self) {
        let period = self.config.interval.max(MIN_POLL_INTERVAL);
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let request = self
                .http
                .get_txs(&self.symbol, self.config.page, self.config.page_size);
            let fetched = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                fetched = request => fetched,
            };

            match fetched {
                Ok(resp) => {
                    let transactions = convert_txs(resp.txs);
                    debug!(count = transactions.len(), "Polled transactions");
                    self.publish(|snap| {
                        snap.transactions = transactions;
                        snap.last_error = None;
                        snap.last_updated = Some(Utc::now());
                        snap.polls += 1;
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Transaction poll failed");
                    self.publish(|snap| snap.last_error = Some(e.to_string()));
                }
            }
        }
        debug!("Transaction feed stopped");
    }

    fn publish(&self, update: impl FnOnce(&mut TransactionSnapshot)) -> bool {
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
