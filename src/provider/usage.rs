use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::ProviderId;

pub type UsageSnapshot = BTreeMap<ProviderId, u64>;

/// Completed-call counts per provider.
///
/// Owned by whoever handles requests and passed by reference into each
/// provider call. Increments are relaxed: the only guarantee is that a
/// snapshot eventually reflects every completed call.
#[derive(Debug, Default)]
pub struct UsageCounter {
    counts: [AtomicU64; ProviderId::ALL.len()],
}

impl UsageCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump the count for `provider` and return the new value.
    pub fn record(&self, provider: ProviderId) -> u64 {
        self.counts[provider.index()].fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn get(&self, provider: ProviderId) -> u64 {
        self.counts[provider.index()].load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> UsageSnapshot {
        ProviderId::ALL
            .into_iter()
            .map(|id| (id, self.get(id)))
            .collect()
    }
}
