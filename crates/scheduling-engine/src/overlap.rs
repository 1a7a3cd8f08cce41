//! Common working window for a group of participants.
//!
//! Windows that stay within one UTC day intersect the obvious way. Windows
//! that wrap past UTC midnight are folded in one at a time on top of the
//! same-day intersection. That fold is a heuristic: it is exact for two
//! participants and approximate for larger groups mixing both kinds.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::model::Participant;
use crate::working_hours::{window_for, WorkingWindow, END_OF_DAY, WORKDAY_END, WORKDAY_START};

const MIDNIGHT: NaiveTime = match NaiveTime::from_hms_opt(0, 0, 0) {
    Some(t) => t,
    None => panic!("invalid midnight"),
};

const ELEVEN_PM: NaiveTime = match NaiveTime::from_hms_opt(23, 0, 0) {
    Some(t) => t,
    None => panic!("invalid sentinel"),
};

/// A UTC time-of-day range shared by every participant.
///
/// An empty window (`start >= end`) means there are no common hours; the
/// canonical form is [`OverlapWindow::NONE`] (23:00-23:00).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl OverlapWindow {
    /// Zero-width sentinel for "no common hours".
    pub const NONE: OverlapWindow = OverlapWindow {
        start: ELEVEN_PM,
        end: ELEVEN_PM,
    };

    /// 08:00-18:00, used when there is nobody to intersect with.
    pub const FULL_DAY: OverlapWindow = OverlapWindow {
        start: WORKDAY_START,
        end: WORKDAY_END,
    };

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start).num_minutes()
        }
    }

    fn collapse_if_empty(self) -> Self {
        if self.is_empty() {
            Self::NONE
        } else {
            self
        }
    }
}

/// The UTC time-of-day range during which every participant is inside their
/// local working hours on `date`.
///
/// With no participants the full 08:00-18:00 window is returned. A single
/// participant gets their own window (clipped at midnight if it wraps).
pub fn common_window(participants: &[Participant], date: NaiveDate) -> OverlapWindow {
    if participants.is_empty() {
        return OverlapWindow::FULL_DAY;
    }

    let windows: Vec<WorkingWindow> = participants.iter().map(|p| window_for(p, date)).collect();
    intersect_windows(&windows)
}

/// Intersect a set of working windows. See the module docs for how
/// midnight-crossing windows are handled.
pub fn intersect_windows(windows: &[WorkingWindow]) -> OverlapWindow {
    if windows.is_empty() {
        return OverlapWindow::FULL_DAY;
    }

    let (crossers, normal): (Vec<&WorkingWindow>, Vec<&WorkingWindow>) =
        windows.iter().partition(|w| w.crosses_midnight);

    if crossers.is_empty() {
        return intersect_same_day(&normal).collapse_if_empty();
    }

    if normal.is_empty() {
        // Only the part after midnight is common to all of them.
        let earliest_end = crossers.iter().map(|w| w.end).min().unwrap_or(WORKDAY_END);
        return OverlapWindow {
            start: MIDNIGHT,
            end: earliest_end,
        }
        .collapse_if_empty();
    }

    let mut window = intersect_same_day(&normal);
    if window.is_empty() {
        return OverlapWindow::NONE;
    }

    for crosser in crossers {
        if crosser.start <= window.end {
            window.start = window.start.max(crosser.start);
            window.end = window.end.min(END_OF_DAY);
        } else if window.start <= crosser.end {
            window.end = window.end.min(crosser.end);
        } else {
            return OverlapWindow::NONE;
        }
    }

    window.collapse_if_empty()
}

fn intersect_same_day(windows: &[&WorkingWindow]) -> OverlapWindow {
    let latest_start = windows.iter().map(|w| w.start).max().unwrap_or(WORKDAY_START);
    let earliest_end = windows.iter().map(|w| w.end).min().unwrap_or(WORKDAY_END);
    OverlapWindow {
        start: latest_start,
        end: earliest_end,
    }
}
