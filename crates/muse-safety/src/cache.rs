//! Time-expiring verdict cache.
//!
//! Keyed by the exact input (normalized text or raw image URL), bounded by
//! capacity, safe for concurrent use from any task. Presence in the cache
//! short-circuits remote calls; only final resolved verdicts are stored —
//! never an undecided state.
//!
//! Verdicts are idempotent, so two tasks racing to recompute the same key
//! simply overwrite each other with the same value; no coordination beyond
//! the internal mutex is needed.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// Capacity-bounded TTL map from input string to resolved verdict.
pub struct TtlCache<V> {
    ttl: Duration,
    capacity: usize,
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up an unexpired verdict. Expired entries are dropped on read.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a resolved verdict, evicting expired entries first and then
    /// the oldest entry if still at capacity.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut entries = self.entries.lock().unwrap();

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            let ttl = self.ttl;
            entries.retain(|_, e| e.inserted_at.elapsed() < ttl);

            if entries.len() >= self.capacity {
                if let Some(oldest) = entries
                    .iter()
                    .min_by_key(|(_, e)| e.inserted_at)
                    .map(|(k, _)| k.clone())
                {
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
