//! Thread-safe store of the most recently decoded value per offset name.
//!
//! The sampler thread is the only writer; it stages a full cycle's batch
//! off-lock and commits it in one short lock acquisition, so a reader
//! observes either the complete prior cycle or the complete new one,
//! never a mix. Reads hold the lock only for the map lookup.

use crate::error::QueryError;
use hashbrown::HashMap;
use std::sync::Mutex;

/// Pure storage for captured values. Sampling logic lives in `sampler`.
#[derive(Debug, Default)]
pub struct ValueCache {
    values: Mutex<HashMap<String, i64>>,
}

impl ValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the last committed value for a name.
    ///
    /// Fails for names that were never registered and for registered
    /// names before their first marker-valid cycle.
    pub fn get_value(&self, name: &str) -> Result<i64, QueryError> {
        self.lock()
            .get(name)
            .copied()
            .ok_or_else(|| QueryError::KeyNotFound(name.to_string()))
    }

    /// Commit a full cycle's batch under a single lock acquisition.
    ///
    /// Keys absent from the batch (per-key decode skips) keep their
    /// previous value; staleness is preserved, never cleared.
    pub fn commit(&self, batch: HashMap<String, i64>) {
        let mut values = self.lock();
        for (name, value) in batch {
            values.insert(name, value);
        }
    }

    /// Copy of the whole map, for diagnostics and listing.
    pub fn snapshot(&self) -> HashMap<String, i64> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Poisoning can only come from a panic mid-lookup; the map is still coherent.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, i64>> {
        self.values.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_empty_cache_is_key_not_found() {
        let cache = ValueCache::new();
        assert_eq!(
            cache.get_value("anything"),
            Err(QueryError::KeyNotFound("anything".to_string()))
        );
    }

    #[test]
    fn test_commit_then_get() {
        let cache = ValueCache::new();
        let mut batch = HashMap::new();
        batch.insert("a".to_string(), 1);
        batch.insert("b".to_string(), 42);
        cache.commit(batch);

        assert_eq!(cache.get_value("a"), Ok(1));
        assert_eq!(cache.get_value("b"), Ok(42));
        assert!(cache.get_value("c").is_err());
    }

    #[test]
    fn test_partial_batch_keeps_stale_value() {
        let cache = ValueCache::new();
        let mut first = HashMap::new();
        first.insert("a".to_string(), 1);
        first.insert("b".to_string(), 2);
        cache.commit(first);

        // Second cycle omits "b" (decode skip); old value persists
        let mut second = HashMap::new();
        second.insert("a".to_string(), 7);
        cache.commit(second);

        assert_eq!(cache.get_value("a"), Ok(7));
        assert_eq!(cache.get_value("b"), Ok(2));
    }

    #[test]
    fn test_batch_commit_atomic_under_readers() {
        // Writer alternates between two full batches; readers must never
        // see values from different batches at the same time.
        let cache = Arc::new(ValueCache::new());
        let mut initial = HashMap::new();
        initial.insert("x".to_string(), 0);
        initial.insert("y".to_string(), 1000);
        cache.commit(initial);

        let writer = {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                for i in 1..500i64 {
                    let mut batch = HashMap::new();
                    batch.insert("x".to_string(), i);
                    batch.insert("y".to_string(), 1000 + i);
                    cache.commit(batch);
                }
            })
        };

        let reader = {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                for _ in 0..2000 {
                    let snap = cache.snapshot();
                    let x = snap["x"];
                    let y = snap["y"];
                    assert_eq!(y - x, 1000, "observed a torn commit: x={x} y={y}");
                }
            })
        };

        writer.join().unwrap();
        reader.join().unwrap();
    }
}
