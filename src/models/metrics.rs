//! Cache Metrics Snapshot
//!
//! Point-in-time health summary derived from the cache client's counters.

use serde::Serialize;

/// Decimal places kept in `hit_ratio`.
const HIT_RATIO_PRECISION: i32 = 4;

/// Decimal places kept in `memory_usage_percentage`.
const MEMORY_PERCENT_PRECISION: i32 = 2;

// == Cache Metrics Snapshot ==
/// Response body for the metrics endpoint (GET /cache-metrics/)
///
/// Recomputed on every request; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheMetricsSnapshot {
    /// Lookups satisfied by the cache
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// hits + misses
    pub total_requests: u64,
    /// hits / total_requests rounded to 4 places, 0.0 when there were no requests
    pub hit_ratio: f64,
    /// Bytes in use by the cache
    pub used_memory: u64,
    /// Configured memory ceiling in bytes (0 = unbounded or unknown)
    pub max_memory: u64,
    /// used_memory / max_memory as a percentage, 0.0 when max_memory is 0
    pub memory_usage_percentage: f64,
    /// Live keys in the cache
    pub total_keys: u64,
    /// Seconds since the cache process started
    pub uptime_seconds: u64,
    /// Set when the cache could not be queried
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CacheMetricsSnapshot {
    // == Constructor ==
    /// Creates a snapshot from hit and miss counters.
    ///
    /// Memory, key count and uptime start at zero; fill them in with the
    /// `with_*` builders.
    pub fn new(hits: u64, misses: u64) -> Self {
        let total_requests = hits.saturating_add(misses);
        Self {
            hits,
            misses,
            total_requests,
            hit_ratio: hit_ratio(hits, total_requests),
            used_memory: 0,
            max_memory: 0,
            memory_usage_percentage: 0.0,
            total_keys: 0,
            uptime_seconds: 0,
            error: None,
        }
    }

    // == Unavailable ==
    /// Zeroed snapshot carrying the reason the cache could not be read.
    pub fn unavailable(error: impl Into<String>) -> Self {
        let mut error = error.into();
        if error.is_empty() {
            error = "cache unavailable".to_string();
        }
        Self {
            error: Some(error),
            ..Self::new(0, 0)
        }
    }

    /// Records memory usage and derives the usage percentage.
    pub fn with_memory(mut self, used_memory: u64, max_memory: u64) -> Self {
        self.used_memory = used_memory;
        self.max_memory = max_memory;
        self.memory_usage_percentage = memory_usage_percentage(used_memory, max_memory);
        self
    }

    pub fn with_total_keys(mut self, total_keys: u64) -> Self {
        self.total_keys = total_keys;
        self
    }

    pub fn with_uptime(mut self, uptime_seconds: u64) -> Self {
        self.uptime_seconds = uptime_seconds;
        self
    }
}

// == Derivations ==
fn hit_ratio(hits: u64, total_requests: u64) -> f64 {
    if total_requests == 0 {
        return 0.0;
    }
    round_to(hits as f64 / total_requests as f64, HIT_RATIO_PRECISION)
}

fn memory_usage_percentage(used_memory: u64, max_memory: u64) -> f64 {
    if max_memory == 0 {
        return 0.0;
    }
    round_to(
        used_memory as f64 / max_memory as f64 * 100.0,
        MEMORY_PERCENT_PRECISION,
    )
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_zero_requests() {
        let snapshot = CacheMetricsSnapshot::new(0, 0);
        assert_eq!(snapshot.total_requests, 0);
        assert_eq!(snapshot.hit_ratio, 0.0);
        assert!(snapshot.error.is_none());
    }

    #[test]
    fn test_snapshot_hit_ratio() {
        assert_eq!(CacheMetricsSnapshot::new(80, 20).hit_ratio, 0.8);
        assert_eq!(CacheMetricsSnapshot::new(1, 0).hit_ratio, 1.0);
        assert_eq!(CacheMetricsSnapshot::new(0, 5).hit_ratio, 0.0);
        assert_eq!(CacheMetricsSnapshot::new(1, 2).hit_ratio, 0.3333);
        assert_eq!(CacheMetricsSnapshot::new(2, 1).hit_ratio, 0.6667);
    }

    #[test]
    fn test_snapshot_total_requests() {
        let snapshot = CacheMetricsSnapshot::new(80, 20);
        assert_eq!(snapshot.total_requests, 100);
    }

    #[test]
    fn test_memory_percentage_without_max() {
        let snapshot = CacheMetricsSnapshot::new(1, 1).with_memory(1_048_576, 0);
        assert_eq!(snapshot.used_memory, 1_048_576);
        assert_eq!(snapshot.memory_usage_percentage, 0.0);
    }

    #[test]
    fn test_memory_percentage_with_max() {
        let snapshot = CacheMetricsSnapshot::new(0, 0).with_memory(256, 1024);
        assert_eq!(snapshot.memory_usage_percentage, 25.0);

        let snapshot = CacheMetricsSnapshot::new(0, 0).with_memory(1, 3);
        assert_eq!(snapshot.memory_usage_percentage, 33.33);
    }

    #[test]
    fn test_unavailable_snapshot() {
        let snapshot = CacheMetricsSnapshot::unavailable("Connection refused");
        assert_eq!(snapshot.hits, 0);
        assert_eq!(snapshot.misses, 0);
        assert_eq!(snapshot.hit_ratio, 0.0);
        assert_eq!(snapshot.error.as_deref(), Some("Connection refused"));
    }

    #[test]
    fn test_unavailable_never_has_empty_error() {
        let snapshot = CacheMetricsSnapshot::unavailable("");
        assert!(!snapshot.error.unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_serialize_omits_missing_error() {
        let json = serde_json::to_value(CacheMetricsSnapshot::new(3, 1)).unwrap();
        assert_eq!(json["hit_ratio"], 0.75);
        assert!(json.get("error").is_none());

        let json = serde_json::to_value(CacheMetricsSnapshot::unavailable("boom")).unwrap();
        assert_eq!(json["error"], "boom");
    }
}
