//! ISO-8601 timestamp (de)serialization for persisted state.
//!
//! Timestamps are written as RFC 3339 strings in UTC with as many
//! fractional digits as needed to round-trip exactly. On read, three forms
//! are accepted so that older or hand-written data still loads:
//!
//! - RFC 3339 with offset (`2024-03-01T09:00:00.000Z`, `...+02:00`)
//! - naive date-time, taken as UTC (`2024-03-01T09:00:00`)
//! - bare date, taken as UTC midnight (`2024-03-01`)

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Error returned when a timestamp string matches none of the accepted forms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp: {0:?}")]
pub struct TimestampError(pub String);

/// Formats a timestamp the way it is persisted.
#[must_use]
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses a persisted timestamp string.
///
/// # Errors
///
/// Returns [`TimestampError`] if `raw` matches none of the accepted forms.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    Err(TimestampError(raw.to_string()))
}

/// `#[serde(with = "...")]` adapter for `DateTime<Utc>` fields.
pub mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes as an RFC 3339 string.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(value))
    }

    /// Deserializes from any accepted timestamp form.
    ///
    /// # Errors
    ///
    /// Fails if the value is not a string or is not a recognised timestamp.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with = "...")]` adapter for `Option<DateTime<Utc>>` fields.
///
/// `None` is written as `null`; `null` and absent fields read back as `None`.
pub mod iso8601_option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes as an RFC 3339 string or `null`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&super::format_timestamp(dt)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes from `null` or any accepted timestamp form.
    ///
    /// # Errors
    ///
    /// Fails if a present value is not a recognised timestamp.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| super::parse_timestamp(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}
