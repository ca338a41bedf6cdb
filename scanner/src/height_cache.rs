//! Short-lived cache of the node's reported tip height.

use std::time::{Duration, Instant};

/// Caches `latest_height` briefly so closely spaced cycle triggers do not
/// hammer the node with the same query. The current time is passed in by
/// the caller, which keeps expiry under test control.
#[derive(Debug)]
pub struct HeightCache {
    ttl: Duration,
    slot: Option<(Instant, u64)>,
}

impl HeightCache {
    pub fn new(ttl: Duration) -> Self {
        HeightCache { ttl, slot: None }
    }

    /// The cached height, if one was stored less than a TTL ago.
    pub fn get(&self, now: Instant) -> Option<u64> {
        match self.slot {
            Some((stored_at, height)) if now.duration_since(stored_at) < self.ttl => Some(height),
            _ => None,
        }
    }

    pub fn put(&mut self, height: u64, now: Instant) {
        self.slot = Some((now, height));
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}
