//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Creates a timestamp from a filesystem time.
    pub fn from_system_time(time: SystemTime) -> Self {
        Self(time.into())
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a new timestamp by adding the specified number of hours.
    pub fn plus_hours(&self, hours: i64) -> Self {
        Self(self.0 + Duration::hours(hours))
    }

    /// Creates a new timestamp by subtracting the specified number of hours.
    pub fn minus_hours(&self, hours: i64) -> Self {
        Self(self.0 - Duration::hours(hours))
    }

    /// Returns the timestamp as Unix milliseconds.
    pub fn as_unix_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Renders the timestamp the way chat messages show it (`dd.mm.yyyy HH:MM:SS`, UTC).
    pub fn to_display_string(&self) -> String {
        self.0.format("%d.%m.%Y %H:%M:%S").to_string()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}
