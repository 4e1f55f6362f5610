use crate::error::SrtError;
use crate::parser;

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use chrono::Duration;

const MILLIS_PER_SECOND: i64 = 1000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;

/// A point on the subtitle timeline, in milliseconds.
///
/// The value is signed: shifting a track backwards may push it below zero,
/// in which case it renders with a leading `-` (`-00:00:01,000`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    pub fn from_hms_milli(hours: i64, minutes: i64, seconds: i64, millis: i64) -> Self {
        Timestamp(
            hours * MILLIS_PER_HOUR
                + minutes * MILLIS_PER_MINUTE
                + seconds * MILLIS_PER_SECOND
                + millis,
        )
    }

    pub const fn as_millis(self) -> i64 {
        self.0
    }
}

/// Moves a timestamp by a signed offset. Sub-millisecond parts of the offset
/// are dropped.
impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, offset: Duration) -> Timestamp {
        Timestamp(self.0.saturating_add(offset.num_milliseconds()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let total = self.0.unsigned_abs();
        let hours = total / MILLIS_PER_HOUR as u64;
        let minutes = (total % MILLIS_PER_HOUR as u64) / MILLIS_PER_MINUTE as u64;
        let seconds = (total % MILLIS_PER_MINUTE as u64) / MILLIS_PER_SECOND as u64;
        let millis = total % MILLIS_PER_SECOND as u64;
        write!(
            fmt,
            "{}{:02}:{:02}:{:02},{:03}",
            sign, hours, minutes, seconds, millis
        )
    }
}

impl FromStr for Timestamp {
    type Err = SrtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_timestamp(s)
    }
}
