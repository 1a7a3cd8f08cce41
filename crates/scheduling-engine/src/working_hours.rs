//! Per-participant working windows expressed in UTC.
//!
//! Everyone works 08:00-18:00 local time. Shifted into UTC that window may
//! wrap past midnight: at `UTC+9:00` it becomes 23:00 (previous day) to 09:00.
//! A [`WorkingWindow`] keeps only the UTC time-of-day bounds plus a flag for
//! that wrap.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Participant;

/// Local start of the working day.
pub const WORKDAY_START: NaiveTime = match NaiveTime::from_hms_opt(8, 0, 0) {
    Some(t) => t,
    None => panic!("invalid workday start"),
};

/// Local end of the working day.
pub const WORKDAY_END: NaiveTime = match NaiveTime::from_hms_opt(18, 0, 0) {
    Some(t) => t,
    None => panic!("invalid workday end"),
};

/// Latest representable time of day; stands in for "end of day" when a
/// meeting runs past UTC midnight.
pub const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_opt(23, 59, 59) {
    Some(t) => t,
    None => panic!("invalid end of day"),
};

/// Human-readable local working hours.
pub const LOCAL_WORKING_HOURS: &str = "08:00 - 18:00";

/// A participant's working hours as UTC time-of-day bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// The UTC end falls on a later calendar date than the UTC start.
    pub crosses_midnight: bool,
}

impl WorkingWindow {
    /// 08:00-18:00 UTC, the fallback when conversion fails.
    pub const fn utc_default() -> Self {
        Self {
            start: WORKDAY_START,
            end: WORKDAY_END,
            crosses_midnight: false,
        }
    }

    /// `"HH:MM - HH:MM UTC"`, or the split form for midnight-crossing windows.
    pub fn utc_display(&self) -> String {
        if self.crosses_midnight {
            format!(
                "{} - 00:00 + 00:00 - {} UTC (crosses midnight)",
                self.start.format("%H:%M"),
                self.end.format("%H:%M")
            )
        } else {
            format!(
                "{} - {} UTC",
                self.start.format("%H:%M"),
                self.end.format("%H:%M")
            )
        }
    }

    /// Whether the UTC time-of-day range `[start, end]` of a meeting fits.
    ///
    /// For a midnight-crossing window it is enough to start after the window
    /// opens or to end before it closes.
    pub fn admits(&self, start: NaiveTime, end: NaiveTime) -> bool {
        if self.crosses_midnight {
            start >= self.start || end <= self.end
        } else {
            start >= self.start && end <= self.end
        }
    }
}

/// Compute a participant's UTC working window for the local working day on `date`.
///
/// Never fails: if either boundary cannot be converted the window falls back
/// to 08:00-18:00 UTC.
pub fn window_for(participant: &Participant, date: NaiveDate) -> WorkingWindow {
    let offset = participant.offset();
    let start = offset.to_utc(date.and_time(WORKDAY_START));
    let end = offset.to_utc(date.and_time(WORKDAY_END));

    match (start, end) {
        (Some(start), Some(end)) => WorkingWindow {
            start: start.time(),
            end: end.time(),
            crosses_midnight: end.date_naive() > start.date_naive(),
        },
        _ => WorkingWindow::utc_default(),
    }
}

/// A participant for whom a proposed meeting falls outside working hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHoursViolation {
    pub name: String,
    pub timezone: String,
    /// Meeting start on the participant's wall clock.
    pub local_start: NaiveTime,
    /// Meeting end on the participant's wall clock.
    pub local_end: NaiveTime,
}

impl fmt::Display for WorkingHoursViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): meeting would be from {} to {} (outside working hours 08:00-18:00)",
            self.name,
            self.timezone,
            self.local_start.format("%H:%M"),
            self.local_end.format("%H:%M")
        )
    }
}

/// `"Outside working hours for: a; b"` for a non-empty violation list.
pub fn violation_message(violations: &[WorkingHoursViolation]) -> String {
    let parts: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
    format!("Outside working hours for: {}", parts.join("; "))
}

/// Check the exact window `[start, end)` against every participant's working
/// hours on the start date. Returns one entry per participant who would be
/// outside 08:00-18:00 local; empty means everyone is available.
pub fn check_working_hours(
    participants: &[Participant],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<WorkingHoursViolation> {
    let meeting_start = start.time();
    let meeting_end = if end.date_naive() > start.date_naive() {
        END_OF_DAY
    } else {
        end.time()
    };

    participants
        .iter()
        .filter(|participant| {
            let window = window_for(participant, start.date_naive());
            let fits = window.admits(meeting_start, meeting_end);
            debug!(
                participant = %participant.id,
                window = %window.utc_display(),
                fits,
                "working hours check"
            );
            !fits
        })
        .map(|participant| {
            let offset = participant.offset();
            WorkingHoursViolation {
                name: participant.name.clone(),
                timezone: participant.timezone.clone(),
                local_start: offset.to_local(start).time(),
                local_end: offset.to_local(end).time(),
            }
        })
        .collect()
}

/// Integer local hour of a UTC instant for a participant.
pub fn local_hour(participant: &Participant, instant: DateTime<Utc>) -> u32 {
    participant.offset().to_local(instant).hour()
}
