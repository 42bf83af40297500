//! Property Model
//!
//! Read-only projection of a property listing as served by the backing store
//! and copied into the cache.

use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

// == Property ==
/// A property listing projected to the six fields the endpoint serves.
///
/// `price` serializes as a decimal string (`"125000.00"`) so no precision is lost
/// on the way through the cache. It also accepts a JSON number, read as the
/// shortest decimal that round-trips the number (`0.1` stays `0.1`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Unique, stable identifier
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Asking price, never negative
    #[serde(deserialize_with = "deserialize_price")]
    pub price: BigDecimal,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl Property {
    /// Returns true when the price satisfies the non-negative invariant.
    pub fn has_valid_price(&self) -> bool {
        self.price >= BigDecimal::zero()
    }
}

// == Price Decoding ==
fn deserialize_price<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(PriceVisitor)
}

struct PriceVisitor;

impl<'de> Visitor<'de> for PriceVisitor {
    type Value = BigDecimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal price as a string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<BigDecimal, E> {
        BigDecimal::from_str(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<BigDecimal, E> {
        Ok(BigDecimal::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<BigDecimal, E> {
        Ok(BigDecimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<BigDecimal, E> {
        if !v.is_finite() {
            return Err(E::custom(format!("price {} is not finite", v)));
        }
        // Display gives the shortest text that parses back to the same f64
        BigDecimal::from_str(&v.to_string()).map_err(E::custom)
    }
}

// == Cache Source ==
/// Where a property collection was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
    /// Served from the cached snapshot, no store access
    Hit,
    /// Fetched from the backing store (or degraded to empty)
    Miss,
}

impl CacheSource {
    /// Header-friendly representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheSource::Hit => "HIT",
            CacheSource::Miss => "MISS",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(price: &str) -> Property {
        Property {
            id: 7,
            title: "Harbour loft".to_string(),
            description: "Two bedrooms overlooking the marina".to_string(),
            price: BigDecimal::from_str(price).unwrap(),
            location: "Lisbon".to_string(),
            created_at: DateTime::parse_from_rfc3339("2024-03-01T10:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_property_serialize_fields() {
        let json = serde_json::to_value(sample("125000.50")).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 6);
        assert_eq!(obj["id"], 7);
        assert_eq!(obj["title"], "Harbour loft");
        assert_eq!(obj["price"], "125000.50");
        assert_eq!(obj["location"], "Lisbon");
        assert!(obj["created_at"].as_str().unwrap().starts_with("2024-03-01T10:30:00"));
    }

    #[test]
    fn test_property_deserialize_numeric_price() {
        let json = r#"{
            "id": 1,
            "title": "Cabin",
            "description": "Off grid",
            "price": 89000,
            "location": "Tromso",
            "created_at": "2023-11-05T08:00:00Z"
        }"#;
        let property: Property = serde_json::from_str(json).unwrap();
        assert_eq!(property.price, BigDecimal::from_str("89000").unwrap());
    }

    #[test]
    fn test_fractional_numeric_price_keeps_its_text() {
        let json = r#"{
            "id": 2,
            "title": "Studio",
            "description": "Tiny",
            "price": 0.1,
            "location": "Oslo",
            "created_at": "2023-11-05T08:00:00Z"
        }"#;
        let property: Property = serde_json::from_str(json).unwrap();
        assert_eq!(property.price, BigDecimal::from_str("0.1").unwrap());

        let out = serde_json::to_value(&property).unwrap();
        assert_eq!(out["price"], "0.1");
    }

    #[test]
    fn test_price_rejects_non_decimal() {
        let json = r#"{"id": 3, "title": "t", "description": "d", "price": "cheap",
                       "location": "l", "created_at": "2023-11-05T08:00:00Z"}"#;
        assert!(serde_json::from_str::<Property>(json).is_err());
    }

    #[test]
    fn test_has_valid_price() {
        assert!(sample("0").has_valid_price());
        assert!(sample("10.25").has_valid_price());
        assert!(!sample("-1").has_valid_price());
    }

    #[test]
    fn test_cache_source_as_str() {
        assert_eq!(CacheSource::Hit.as_str(), "HIT");
        assert_eq!(CacheSource::Miss.as_str(), "MISS");
    }
}
