//! Holding pen for early-arriving header metadata.
//!
//! `Network.requestWillBeSentExtraInfo` carries fine-grained headers and
//! may land before or after its `requestWillBeSent`, with no ordering
//! guarantee. Headers that arrive early park here until the request
//! record exists; anything still parked at shutdown is discarded.

use std::collections::HashMap;

use harcap_har::Header;

/// Per-request-id cache of unmerged extra header sets.
///
/// At most one record per id: a second early arrival for the same id
/// replaces the first (last-write-wins within the pending window).
#[derive(Debug, Default)]
pub struct ExtraInfoCache {
    records: HashMap<String, Vec<Header>>,
}

impl ExtraInfoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a header set for `request_id`, replacing any prior record.
    pub fn store(&mut self, request_id: &str, headers: Vec<Header>) {
        if self
            .records
            .insert(request_id.to_string(), headers)
            .is_some()
        {
            tracing::debug!(request_id, "replaced unmerged extra-info record");
        }
    }

    /// Remove and return the parked header set for `request_id`, if any.
    pub fn take(&mut self, request_id: &str) -> Option<Vec<Header>> {
        self.records.remove(request_id)
    }

    /// Number of records still awaiting their request.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every unmerged record. Called at shutdown; a header set whose
    /// request never materialized has nothing to attach to.
    pub fn clear(&mut self) {
        if !self.records.is_empty() {
            tracing::debug!(
                discarded = self.records.len(),
                "discarding unmerged extra-info records at shutdown"
            );
        }
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_and_take() {
        let mut cache = ExtraInfoCache::new();
        cache.store("r1", vec![Header::new("cookie", "a=1")]);
        assert_eq!(cache.len(), 1);

        let taken = cache.take("r1").unwrap();
        assert_eq!(taken, vec![Header::new("cookie", "a=1")]);
        assert!(cache.is_empty());
        assert!(cache.take("r1").is_none());
    }

    #[test]
    fn second_store_overwrites_first() {
        let mut cache = ExtraInfoCache::new();
        cache.store("r1", vec![Header::new("cookie", "old")]);
        cache.store("r1", vec![Header::new("cookie", "new")]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.take("r1").unwrap(), vec![Header::new("cookie", "new")]);
    }

    #[test]
    fn clear_discards_everything() {
        let mut cache = ExtraInfoCache::new();
        cache.store("r1", Vec::new());
        cache.store("r2", Vec::new());
        cache.clear();
        assert!(cache.is_empty());
    }
}
