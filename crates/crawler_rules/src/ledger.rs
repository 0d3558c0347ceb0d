use dashmap::DashSet;

/// Grow-only set of admitted URL keys.
///
/// Entries are never evicted, so memory grows with the number of distinct
/// URLs admitted over the lifetime of the process.
#[derive(Debug, Default)]
pub struct AdmissionLedger {
    admitted: DashSet<String>,
}

impl AdmissionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key` and returns `true` only for the first caller to present it.
    ///
    /// Check and insert happen under the same shard lock, so concurrent
    /// callers racing on one key see exactly one `true`.
    pub fn admit(&self, key: &str) -> bool {
        self.admitted.insert(key.to_string())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.admitted.contains(key)
    }

    pub fn len(&self) -> usize {
        self.admitted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.admitted.is_empty()
    }
}
