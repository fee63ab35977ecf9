use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// MJD of 1970-01-01T00:00:00Z.
const UNIX_EPOCH_MJD: f64 = 40587.0;
const SECONDS_PER_DAY: f64 = 86400.0;

/// Modified Julian Date, in days since 1858-11-17T00:00:00Z.
///
/// Time-window constraints carry their bounds in this form, written to the
/// block document as a bare number.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifiedJulianDate(f64);

impl ModifiedJulianDate {
    pub fn new(days: f64) -> Self {
        Self(days)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Seconds since the Unix epoch.
    pub fn to_unix_timestamp(&self) -> f64 {
        (self.0 - UNIX_EPOCH_MJD) * SECONDS_PER_DAY
    }

    pub fn from_unix_timestamp(seconds: f64) -> Self {
        Self(UNIX_EPOCH_MJD + seconds / SECONDS_PER_DAY)
    }

    /// `None` when the date is not finite or lies outside chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let seconds = self.to_unix_timestamp();
        if !seconds.is_finite() {
            return None;
        }
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
        DateTime::from_timestamp(whole as i64, nanos)
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let seconds = dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1e9;
        Self::from_unix_timestamp(seconds)
    }
}

impl From<f64> for ModifiedJulianDate {
    fn from(days: f64) -> Self {
        Self(days)
    }
}

impl From<DateTime<Utc>> for ModifiedJulianDate {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

impl fmt::Display for ModifiedJulianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MJD {}", self.0)
    }
}
