//! Fixed UTC-offset timezones.
//!
//! Participants carry labels like `UTC`, `UTC-3:00` or `UTC+05:30`. There is no
//! DST and no political timezone database: a label is just a constant signed
//! offset from UTC. Parsing is total. Anything that is not a well-formed label
//! (empty, `garbage`, `UTC+5`, `UTC+15:00`) is treated as UTC, so scheduling
//! can always be computed.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Largest offset magnitude accepted, in minutes (14:00).
const MAX_OFFSET_MINUTES: i64 = 14 * 60;

/// A constant signed offset from UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeZoneOffset {
    minutes: i64,
}

impl TimeZoneOffset {
    pub const UTC: TimeZoneOffset = TimeZoneOffset { minutes: 0 };

    /// Parse a fixed-offset label. Never fails: unparseable input yields [`TimeZoneOffset::UTC`].
    ///
    /// Accepted forms: `UTC`, `UTC±H:MM`, `UTC±HH:MM`, and the same without a
    /// sign (read as positive). Whitespace around the label and the offset is
    /// ignored.
    pub fn parse(tz: &str) -> Self {
        Self::try_parse(tz).unwrap_or(Self::UTC)
    }

    fn try_parse(tz: &str) -> Option<Self> {
        let offset = tz.trim().strip_prefix("UTC")?.trim();
        if offset.is_empty() {
            return Some(Self::UTC);
        }

        let (negative, body) = match offset.as_bytes()[0] {
            b'+' => (false, &offset[1..]),
            b'-' => (true, &offset[1..]),
            _ => (false, offset),
        };

        let (hours, minutes) = body.split_once(':')?;
        if hours.is_empty()
            || hours.len() > 2
            || minutes.len() != 2
            || !hours.bytes().all(|b| b.is_ascii_digit())
            || !minutes.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let hours: i64 = hours.parse().ok()?;
        let minutes: i64 = minutes.parse().ok()?;
        if minutes >= 60 {
            return None;
        }

        let total = hours * 60 + minutes;
        if total > MAX_OFFSET_MINUTES {
            return None;
        }

        Some(Self {
            minutes: if negative { -total } else { total },
        })
    }

    pub fn from_minutes(minutes: i64) -> Option<Self> {
        (minutes.abs() <= MAX_OFFSET_MINUTES).then_some(Self { minutes })
    }

    pub fn minutes(&self) -> i64 {
        self.minutes
    }

    pub fn as_duration(&self) -> Duration {
        Duration::minutes(self.minutes)
    }

    /// `local - offset`. `None` only when the result is outside chrono's range.
    pub fn to_utc(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        local
            .checked_sub_signed(self.as_duration())
            .map(|naive| naive.and_utc())
    }

    /// `utc + offset`, as a wall-clock time. Saturates to the UTC wall clock on overflow.
    pub fn to_local(&self, utc: DateTime<Utc>) -> NaiveDateTime {
        let naive = utc.naive_utc();
        naive
            .checked_add_signed(self.as_duration())
            .unwrap_or(naive)
    }
}

impl fmt::Display for TimeZoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minutes == 0 {
            return f.write_str("UTC");
        }
        let sign = if self.minutes < 0 { '-' } else { '+' };
        let abs = self.minutes.abs();
        write!(f, "UTC{}{:02}:{:02}", sign, abs / 60, abs % 60)
    }
}

/// Shorthand for `TimeZoneOffset::parse(tz).as_duration()`.
pub fn parse_timezone_offset(tz: &str) -> Duration {
    TimeZoneOffset::parse(tz).as_duration()
}

/// Convert a wall-clock time in `tz` to UTC, falling back to reading it as UTC.
pub fn local_to_utc(local: NaiveDateTime, tz: &str) -> DateTime<Utc> {
    TimeZoneOffset::parse(tz)
        .to_utc(local)
        .unwrap_or_else(|| local.and_utc())
}

/// Convert a UTC instant to the wall-clock time in `tz`.
pub fn utc_to_local(utc: DateTime<Utc>, tz: &str) -> NaiveDateTime {
    TimeZoneOffset::parse(tz).to_local(utc)
}
