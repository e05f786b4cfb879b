//! Record timestamps.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Layout the store uses for timestamps on the wire.
const STORE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3fZ";

/// Parse layout for the store format; the fraction and the `Z` are optional.
const STORE_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A timestamp that may be unset.
///
/// The zero value stands for "no timestamp" and is written as an empty
/// string, the way the store reports an empty date field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime(Option<chrono::DateTime<Utc>>);

/// A string that is neither empty, RFC 3339, nor in the store format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid datetime '{0}'")]
pub struct ParseDateTimeError(String);

impl DateTime {
    /// The unset timestamp.
    pub const fn zero() -> Self {
        Self(None)
    }

    /// The current time.
    pub fn now() -> Self {
        Self(Some(Utc::now()))
    }

    /// Whether the timestamp is unset.
    pub fn is_zero(&self) -> bool {
        self.0.is_none()
    }

    /// The underlying chrono value, if set.
    pub fn as_chrono(&self) -> Option<chrono::DateTime<Utc>> {
        self.0
    }

    /// Parses RFC 3339 or `YYYY-MM-DD HH:MM:SS.mmmZ`. An empty string is zero.
    pub fn parse(s: &str) -> Result<Self, ParseDateTimeError> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::zero());
        }

        if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(s) {
            return Ok(Self(Some(parsed.with_timezone(&Utc))));
        }

        NaiveDateTime::parse_from_str(s.trim_end_matches('Z'), STORE_PARSE_FORMAT)
            .map(|naive| Self(Some(naive.and_utc())))
            .map_err(|_| ParseDateTimeError(s.to_string()))
    }
}

impl From<chrono::DateTime<Utc>> for DateTime {
    fn from(value: chrono::DateTime<Utc>) -> Self {
        Self(Some(value))
    }
}

impl FromStr for DateTime {
    type Err = ParseDateTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value.format(STORE_FORMAT)),
            None => Ok(()),
        }
    }
}

impl From<DateTime> for Value {
    fn from(value: DateTime) -> Self {
        Value::String(value.to_string())
    }
}

impl Serialize for DateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            Some(s) => Self::parse(&s).map_err(serde::de::Error::custom),
            None => Ok(Self::zero()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_parse_store_format() {
        let dt = DateTime::parse("2024-03-05 10:20:30.123Z").unwrap();
        let value = dt.as_chrono().unwrap();
        assert_eq!((value.year(), value.month(), value.day()), (2024, 3, 5));
        assert_eq!(value.timestamp_subsec_millis(), 123);
        assert_eq!(dt.to_string(), "2024-03-05 10:20:30.123Z");
    }

    #[test]
    fn test_parse_without_fraction() {
        let dt = DateTime::parse("2024-03-05 10:20:30Z").unwrap();
        assert_eq!(dt.to_string(), "2024-03-05 10:20:30.000Z");
    }

    #[test]
    fn test_parse_rfc3339_normalizes_to_utc() {
        let dt = DateTime::parse("2024-03-05T12:20:30+02:00").unwrap();
        assert_eq!(dt.as_chrono().unwrap().hour(), 10);
    }

    #[test]
    fn test_empty_is_zero() {
        let dt = DateTime::parse("").unwrap();
        assert!(dt.is_zero());
        assert_eq!(dt.to_string(), "");
        assert_eq!(Value::from(dt), Value::String(String::new()));
    }

    #[test]
    fn test_invalid() {
        assert!(DateTime::parse("yesterday").is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let dt = DateTime::from(Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap());
        let json = serde_json::to_string(&dt).unwrap();
        assert_eq!(json, "\"2023-01-02 03:04:05.000Z\"");
        assert_eq!(serde_json::from_str::<DateTime>(&json).unwrap(), dt);
        assert!(serde_json::from_str::<DateTime>("null").unwrap().is_zero());
    }
}
