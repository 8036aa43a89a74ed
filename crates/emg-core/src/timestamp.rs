//! Microsecond-resolution timestamps for logged EMG samples
//!
//! Log records carry wall-clock times such as `2024-01-01 12:00:00.000000`.
//! The pipeline only ever needs differences between them, expressed in
//! fractional seconds.

use crate::error::{EmgError, EmgResult};
use chrono::{DateTime, NaiveDateTime, TimeDelta};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Text layout used by signal logs
///
/// Parsing also requires the fractional part to have 1 to 6 digits.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Finest fractional-second resolution a log may carry
const MAX_FRACTION_DIGITS: usize = 6;

/// Layout used when writing logs; always six fractional digits
const WRITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Absolute sample time with sub-second precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct PrecisionTimestamp {
    datetime: NaiveDateTime,
}

impl PrecisionTimestamp {
    /// Wrap an existing date-time
    #[inline]
    pub const fn from_datetime(datetime: NaiveDateTime) -> Self {
        Self { datetime }
    }

    /// Create a timestamp from microseconds since the Unix epoch
    pub fn from_unix_micros(micros: i64) -> EmgResult<Self> {
        DateTime::from_timestamp_micros(micros)
            .map(|dt| Self::from_datetime(dt.naive_utc()))
            .ok_or_else(|| EmgError::InvalidParameter {
                name: "timestamp",
                reason: format!("{} microseconds is outside the representable range", micros),
            })
    }

    /// Create a timestamp from fractional seconds since the Unix epoch
    pub fn from_unix_secs_f64(secs: f64) -> EmgResult<Self> {
        if !secs.is_finite() {
            return Err(EmgError::InvalidParameter {
                name: "timestamp",
                reason: format!("{} is not a finite number of seconds", secs),
            });
        }
        Self::from_unix_micros((secs * 1_000_000.0).round() as i64)
    }

    /// Underlying date-time
    #[inline]
    pub const fn as_datetime(&self) -> &NaiveDateTime {
        &self.datetime
    }

    /// Signed number of seconds from `earlier` to `self`
    pub fn seconds_since(&self, earlier: &PrecisionTimestamp) -> f64 {
        delta_as_secs_f64(self.datetime.signed_duration_since(earlier.datetime))
    }

    /// Shift this timestamp by a number of microseconds
    pub fn offset_micros(&self, micros: i64) -> EmgResult<PrecisionTimestamp> {
        self.datetime
            .checked_add_signed(TimeDelta::microseconds(micros))
            .map(PrecisionTimestamp::from_datetime)
            .ok_or(EmgError::InvalidParameter {
                name: "timestamp",
                reason: "timestamp overflow".to_string(),
            })
    }
}

fn delta_as_secs_f64(delta: TimeDelta) -> f64 {
    match delta.num_nanoseconds() {
        Some(nanos) => nanos as f64 / 1_000_000_000.0,
        // Beyond ~292 years nanoseconds overflow; milliseconds are plenty there
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}

impl FromStr for PrecisionTimestamp {
    type Err = EmgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fraction = s.rsplit_once('.').map_or("", |(_, fraction)| fraction);
        if fraction.is_empty()
            || fraction.len() > MAX_FRACTION_DIGITS
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(EmgError::InvalidParameter {
                name: "timestamp",
                reason: format!(
                    "expected 1 to {} fractional second digits",
                    MAX_FRACTION_DIGITS
                ),
            });
        }

        NaiveDateTime::parse_from_str(s, LOG_TIMESTAMP_FORMAT)
            .map(Self::from_datetime)
            .map_err(|e| EmgError::InvalidParameter {
                name: "timestamp",
                reason: e.to_string(),
            })
    }
}

impl fmt::Display for PrecisionTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.datetime.format(WRITE_TIMESTAMP_FORMAT))
    }
}
