//! LRU Tracker Module
//!
//! Orders keys by last access so the cache engine knows what to evict first.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Access-order index keyed by a monotonically increasing tick.
///
/// The smallest tick in `by_tick` is the least recently used key.
#[derive(Debug, Default)]
pub struct LruTracker {
    tick: u64,
    by_key: HashMap<String, u64>,
    by_tick: BTreeMap<u64, String>,
}

impl LruTracker {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, tracking it if new.
    pub fn touch(&mut self, key: &str) {
        self.tick += 1;
        if let Some(previous) = self.by_key.insert(key.to_string(), self.tick) {
            self.by_tick.remove(&previous);
        }
        self.by_tick.insert(self.tick, key.to_string());
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.by_key.remove(key) {
            self.by_tick.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.by_tick.pop_first()?;
        self.by_key.remove(&key);
        Some(key)
    }

    // == Accessors ==
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
