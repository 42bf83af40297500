//! Cache Info Module
//!
//! The statistics mapping a cache client reports through `info()`. Field names
//! follow the Redis `INFO` command so both backends describe themselves alike.

use std::collections::HashMap;

// == Field Names ==
pub const KEYSPACE_HITS: &str = "keyspace_hits";
pub const KEYSPACE_MISSES: &str = "keyspace_misses";
pub const USED_MEMORY: &str = "used_memory";
pub const MAX_MEMORY: &str = "maxmemory";
pub const UPTIME_IN_SECONDS: &str = "uptime_in_seconds";
pub const EVICTED_KEYS: &str = "evicted_keys";
pub const EXPIRED_KEYS: &str = "expired_keys";

// == Cache Info ==
/// Field name to raw value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheInfo {
    fields: HashMap<String, String>,
}

impl CacheInfo {
    pub fn new() -> Self {
        Self::default()
    }

    // == Parse ==
    /// Parses the text returned by Redis `INFO`.
    ///
    /// Lines are `name:value`; section headers (`# Stats`), blank lines and
    /// lines without a colon are skipped.
    pub fn parse(raw: &str) -> Self {
        raw.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim(), value.trim()))
            .collect()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl ToString) {
        self.fields.insert(field.into(), value.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Reads a field as an unsigned counter; absent or unparseable reads as None.
    pub fn get_u64(&self, field: &str) -> Option<u64> {
        self.get(field).and_then(|value| value.parse().ok())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for CacheInfo
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
