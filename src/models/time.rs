//! Civil time primitives for slot arithmetic.
//!
//! All interval math in the crate runs on UTC instants. Availability templates
//! carry naive wall-clock times (`HH:MM`) plus a time-zone label; the label is
//! display metadata and the times are resolved against UTC when a template is
//! expanded into dated slots.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

/// Serde helper for `HH:MM` wall-clock fields.
///
/// Serializes a `NaiveTime` as `"09:30"`; accepts `"09:30"` or `"09:30:00"`
/// on input.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

/// Half-open time interval `[start, end)` over UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Create an interval, rejecting empty or inverted bounds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Interval starting at `start` and running for `minutes`.
    pub fn from_start(start: DateTime<Utc>, minutes: u32) -> Self {
        Self {
            start,
            end: start + Duration::minutes(i64::from(minutes)),
        }
    }

    /// Length of the interval in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Check if an instant lies inside this interval (inclusive start, exclusive end).
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    /// Check if this interval strictly overlaps another.
    ///
    /// Touching at an endpoint is not an overlap: an interval ending at 14:00
    /// does not overlap one starting at 14:00.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Day-of-week index used by availability templates: 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Resolve a naive (date, wall-clock) pair to a UTC instant.
pub fn resolve_utc(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    date.and_time(time).and_utc()
}
