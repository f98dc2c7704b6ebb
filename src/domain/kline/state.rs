//! K-line series state: ordered, timestamp-unique candle history.

use super::Candle;

/// What a merge did to the series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Existing candles overwritten in place (same timestamp).
    pub replaced: usize,
    /// New candles inserted.
    pub inserted: usize,
}

/// Candle history for one `(symbol, interval)` subscription.
///
/// Timestamps are strictly ascending and unique at all times. The only mutation
/// is [`KlineSeries::merge`]: replace by timestamp, otherwise ordered insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KlineSeries {
    candles: Vec<Candle>,
}

impl KlineSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a converted batch, one candle at a time, in batch order.
    ///
    /// Later entries of the same batch see the effect of earlier ones, so an
    /// unsorted or self-duplicating batch still leaves the series ordered.
    pub fn merge(&mut self, batch: impl IntoIterator<Item = Candle>) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();
        for candle in batch {
            if self.upsert(candle) {
                outcome.replaced += 1;
            } else {
                outcome.inserted += 1;
            }
        }
        outcome
    }

    /// Replace-or-insert one candle. Returns `true` when it replaced.
    ///
    /// Scans backward from the newest candle.
    fn upsert(&mut self, candle: Candle) -> bool {
        let mut insert_at = 0;
        for (i, existing) in self.candles.iter_mut().enumerate().rev() {
            if existing.timestamp == candle.timestamp {
                *existing = candle;
                return true;
            }
            if existing.timestamp < candle.timestamp {
                insert_at = i + 1;
                break;
            }
        }
        self.candles.insert(insert_at, candle);
        false
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn latest(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn get(&self, timestamp: i64) -> Option<&Candle> {
        self.candles
            .binary_search_by_key(&timestamp, |c| c.timestamp)
            .ok()
            .map(|i| &self.candles[i])
    }

    pub fn clear(&mut self) {
        self.candles.clear();
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn into_vec(self) -> Vec<Candle> {
        self.candles
    }
}
