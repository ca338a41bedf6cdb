//! Dedup cache over the unconfirmed transaction pool.

use std::collections::HashSet;

use nxgate_types::TxId;
use tracing::warn;

/// Txids observed in the pool during the previous pass.
///
/// Replaced wholesale each pass with the complete current pool, never
/// merged, so an id that leaves the pool (confirmed or evicted) leaves the
/// set with it. Bounded: ids beyond capacity are not retained, which at
/// worst re-applies an idempotent upsert on the next pass.
#[derive(Debug)]
pub struct MempoolSeenSet {
    capacity: usize,
    seen: HashSet<TxId>,
}

impl MempoolSeenSet {
    pub fn new(capacity: usize) -> Self {
        MempoolSeenSet {
            capacity,
            seen: HashSet::new(),
        }
    }

    pub fn contains(&self, txid: &TxId) -> bool {
        self.seen.contains(txid)
    }

    /// Replaces the whole set with the ids of the current pool snapshot.
    pub fn replace<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = TxId>,
    {
        self.seen.clear();
        let mut truncated = false;
        for id in ids {
            if self.seen.len() >= self.capacity {
                truncated = true;
                break;
            }
            self.seen.insert(id);
        }
        if truncated {
            warn!(
                capacity = self.capacity,
                "unconfirmed pool exceeds seen-set capacity, excess ids will reprocess next pass"
            );
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
