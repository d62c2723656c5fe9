//! Calendar date/time as stored by the real-time clock.
//!
//! A thin wrapper over [`chrono::NaiveDateTime`] with one-second
//! resolution and no time zone.  Calendar validation, parsing and the
//! Unix-time conversions all come from `chrono`; this type only pins the
//! stamp format and drops sub-second precision.

use core::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

/// Format of the firmware build stamp and of every log line.
pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Wall-clock date/time with one-second resolution, no time zone.
///
/// `Default` is the Unix epoch, which an RTC reports when it has never
/// been set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RtcDateTime(NaiveDateTime);

impl RtcDateTime {
    /// Build a date/time, rejecting out-of-range fields.
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Option<Self> {
        NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))?
            .and_hms_opt(u32::from(hour), u32::from(minute), u32::from(second))
            .map(Self)
    }

    /// Hour of day, 0-23.
    pub fn hour(&self) -> u8 {
        self.0.hour() as u8
    }

    /// Parse `YYYY-MM-DD HH:MM:SS` (the build-time stamp format).
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(s.trim(), STAMP_FORMAT)
            .ok()
            .map(Self::from)
    }

    /// Convert from seconds since 1970-01-01 00:00:00.
    ///
    /// `None` only for instants outside `chrono`'s representable range.
    pub fn from_unix_secs(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(|dt| Self(dt.naive_utc()))
    }

    /// Seconds since 1970-01-01 00:00:00.
    pub fn to_unix_secs(&self) -> i64 {
        self.0.and_utc().timestamp()
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl From<NaiveDateTime> for RtcDateTime {
    /// Truncates to whole seconds, as the chip stores them.
    fn from(dt: NaiveDateTime) -> Self {
        Self(dt.with_nanosecond(0).unwrap_or(dt))
    }
}

impl fmt::Display for RtcDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Whole seconds only, so chrono prints no fractional part.
        fmt::Display::fmt(&self.0, f)
    }
}
