//! Search for free meeting slots across a date range.
//!
//! Each calendar day contributes the group's common working window, clipped
//! to the search range. Inside that window, booked meetings are walked in
//! start order and every gap is filled with duration-sized candidates. The
//! cursor advances by the configured step (one hour by default), not by the
//! slot duration, so candidates inside one gap may overlap each other.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::conflict::overlapping;
use crate::model::{Meeting, Participant, ParticipantId};
use crate::overlap::common_window;

/// A free slot of exactly the requested duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

/// Find up to `config.max_suggestions` free slots for `participants` between
/// `search_start` and `search_end`, in chronological order.
///
/// `meetings` is the pre-fetched set of bookings for the range; meetings that
/// involve none of the participants are ignored. Every returned slot lies
/// inside the group's common working window for its day and overlaps no
/// relevant meeting.
pub fn find_slots(
    participants: &[Participant],
    meetings: &[Meeting],
    search_start: DateTime<Utc>,
    search_end: DateTime<Utc>,
    duration_minutes: i64,
    config: &EngineConfig,
) -> Vec<AvailableSlot> {
    let limit = config.max_suggestions;
    if participants.is_empty() || duration_minutes <= 0 || search_end <= search_start || limit == 0 {
        return Vec::new();
    }
    let (Some(duration), Some(step)) = (Duration::try_minutes(duration_minutes), config.slot_step())
    else {
        debug!(duration_minutes, step_minutes = config.slot_step_minutes, "duration out of range");
        return Vec::new();
    };

    let ids: Vec<ParticipantId> = participants.iter().map(|p| p.id).collect();
    let mut relevant: Vec<Meeting> = meetings
        .iter()
        .filter(|m| m.includes_any(&ids))
        .cloned()
        .collect();
    relevant.sort_by_key(|m| (m.start, m.end));

    let search = DaySearch {
        participants,
        meetings: &relevant,
        search_start,
        search_end,
        duration,
        step,
    };

    let mut slots = Vec::new();
    let mut day = search_start.date_naive();
    let last_day = search_end.date_naive();

    while day <= last_day && slots.len() < limit {
        for slot in search.slots_for_day(day) {
            slots.push(slot);
            if slots.len() >= limit {
                break;
            }
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    slots
}

struct DaySearch<'a> {
    participants: &'a [Participant],
    meetings: &'a [Meeting],
    search_start: DateTime<Utc>,
    search_end: DateTime<Utc>,
    duration: Duration,
    step: Duration,
}

impl DaySearch<'_> {
    fn slots_for_day(&self, day: NaiveDate) -> Vec<AvailableSlot> {
        let mut slots = Vec::new();

        let window = common_window(self.participants, day);
        if window.is_empty() {
            debug!(%day, "no common working hours");
            return slots;
        }

        let day_start = day.and_time(window.start).and_utc().max(self.search_start);
        let day_end = day.and_time(window.end).and_utc().min(self.search_end);
        if day_end - day_start < self.duration {
            return slots;
        }

        let mut cursor = day_start;
        for meeting in overlapping(day_start, day_end, self.meetings) {
            let busy_start = meeting.start.max(day_start);
            self.fill(&mut slots, &mut cursor, busy_start);
            cursor = cursor.max(meeting.end);
        }
        self.fill(&mut slots, &mut cursor, day_end);

        debug!(%day, window_start = %day_start, window_end = %day_end, found = slots.len(), "searched day");
        slots
    }

    /// Emit every candidate that ends by `until`, stepping the cursor.
    ///
    /// A step that would leave chrono's range ends the gap at `until`.
    fn fill(&self, slots: &mut Vec<AvailableSlot>, cursor: &mut DateTime<Utc>, until: DateTime<Utc>) {
        while let Some(end) = cursor.checked_add_signed(self.duration) {
            if end > until {
                break;
            }
            slots.push(AvailableSlot {
                start: *cursor,
                end,
                duration_minutes: self.duration.num_minutes(),
            });
            *cursor = cursor.checked_add_signed(self.step).unwrap_or(until);
        }
    }
}
