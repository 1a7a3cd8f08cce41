//! The conflict-analysis report and its text summary.
//!
//! Everything here is derived per request from the current participants and
//! meetings; nothing is cached. Display strings (local times, ranges) are for
//! presentation only; the UTC instants are authoritative.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Meeting, MeetingId, Participant, ParticipantId};
use crate::overlap::{common_window, OverlapWindow};
use crate::ranking::{recommend, Recommendation};
use crate::slots::AvailableSlot;
use crate::working_hours::{
    violation_message, WorkingHoursViolation, WorkingWindow, LOCAL_WORKING_HOURS,
};

/// One participant's working hours and load over the analysis range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantAnalysis {
    pub id: ParticipantId,
    pub name: String,
    pub timezone: String,
    pub local_working_hours: String,
    pub utc_working_hours: String,
    pub window: WorkingWindow,
    /// Meetings that start and end inside the analysis range.
    pub total_meetings: usize,
}

impl ParticipantAnalysis {
    pub fn new(participant: &Participant, window: WorkingWindow, total_meetings: usize) -> Self {
        Self {
            id: participant.id,
            name: participant.name.clone(),
            timezone: participant.timezone.clone(),
            local_working_hours: LOCAL_WORKING_HOURS.to_string(),
            utc_working_hours: window.utc_display(),
            window,
            total_meetings,
        }
    }
}

/// The group's shared working hours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHoursOverlap {
    pub has_overlap: bool,
    /// `None` when there is no overlap.
    pub window: Option<OverlapWindow>,
    pub overlap_period: String,
    pub overlap_duration: String,
    /// `"Name (tz): HH:MM - HH:MM"`, the overlap in each participant's local time.
    pub participant_local_times: Vec<String>,
}

/// Analyze the common working window of `participants` on `date`.
///
/// Fewer than two participants trivially overlap for 08:00-18:00 UTC.
pub fn analyze_overlap(participants: &[Participant], date: NaiveDate) -> WorkingHoursOverlap {
    if participants.len() < 2 {
        return WorkingHoursOverlap {
            has_overlap: true,
            window: Some(OverlapWindow::FULL_DAY),
            overlap_period: "08:00 - 18:00 UTC".to_string(),
            overlap_duration: "10 hours".to_string(),
            participant_local_times: Vec::new(),
        };
    }

    let window = common_window(participants, date);
    if window.is_empty() {
        return WorkingHoursOverlap {
            has_overlap: false,
            window: None,
            overlap_period: "No overlap".to_string(),
            overlap_duration: "0 hours".to_string(),
            participant_local_times: vec![
                "No common working hours between participants".to_string(),
            ],
        };
    }

    let start = date.and_time(window.start).and_utc();
    let end = date.and_time(window.end).and_utc();
    let participant_local_times = participants
        .iter()
        .map(|p| {
            let offset = p.offset();
            format!(
                "{}: {} - {}",
                p.label(),
                offset.to_local(start).format("%H:%M"),
                offset.to_local(end).format("%H:%M")
            )
        })
        .collect();

    WorkingHoursOverlap {
        has_overlap: true,
        window: Some(window),
        overlap_period: format!(
            "{} - {} UTC",
            window.start.format("%H:%M"),
            window.end.format("%H:%M")
        ),
        overlap_duration: format_hours(window.duration_minutes()),
        participant_local_times,
    }
}

/// `"3 hours"` or `"1:30 hours"`.
fn format_hours(minutes: i64) -> String {
    let (hours, rest) = (minutes / 60, minutes % 60);
    if rest > 0 {
        format!("{}:{:02} hours", hours, rest)
    } else {
        format!("{} hours", hours)
    }
}

/// A booked meeting that collides with the analyzed window or with another booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictingMeeting {
    pub id: MeetingId,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// `"Name (tz)"` for every analyzed participant attending the meeting.
    pub conflicting_participants: Vec<String>,
}

impl ConflictingMeeting {
    /// Describe `meeting`, listing only attendees who are among `analyzed`.
    pub fn new(meeting: &Meeting, analyzed: &[Participant]) -> Self {
        Self {
            id: meeting.id,
            title: meeting.title.clone(),
            start: meeting.start,
            end: meeting.end,
            conflicting_participants: analyzed
                .iter()
                .filter(|p| meeting.includes(p.id))
                .map(Participant::label)
                .collect(),
        }
    }
}

/// A proposed window that falls outside someone's working hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHoursConflict {
    /// `"Working Hours Conflict for HH:MM - HH:MM on dd/mm/yyyy"`.
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// The combined violation text.
    pub message: String,
    /// One line per participant who would be outside their hours.
    pub conflicting_participants: Vec<String>,
}

impl WorkingHoursConflict {
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        violations: &[WorkingHoursViolation],
    ) -> Self {
        Self {
            title: format!(
                "Working Hours Conflict for {} - {} on {}",
                start.format("%H:%M"),
                end.format("%H:%M"),
                start.format("%d/%m/%Y")
            ),
            start,
            end,
            message: violation_message(violations),
            conflicting_participants: violations.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// One entry in the report's conflict list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConflictEntry {
    Meeting(ConflictingMeeting),
    WorkingHours(WorkingHoursConflict),
}

impl ConflictEntry {
    pub fn title(&self) -> String {
        match self {
            ConflictEntry::Meeting(m) => m.title.clone(),
            ConflictEntry::WorkingHours(w) => w.title.clone(),
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        match self {
            ConflictEntry::Meeting(m) => m.start,
            ConflictEntry::WorkingHours(w) => w.start,
        }
    }

    pub fn end(&self) -> DateTime<Utc> {
        match self {
            ConflictEntry::Meeting(m) => m.end,
            ConflictEntry::WorkingHours(w) => w.end,
        }
    }

    /// Attendee labels, or one violation line per participant for a working-hours entry.
    pub fn conflicting_participants(&self) -> Vec<String> {
        match self {
            ConflictEntry::Meeting(m) => m.conflicting_participants.clone(),
            ConflictEntry::WorkingHours(w) => w.conflicting_participants.clone(),
        }
    }

    pub fn is_working_hours(&self) -> bool {
        matches!(self, ConflictEntry::WorkingHours(_))
    }
}

/// A slot's time range on one participant's wall clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantLocalTime {
    pub name: String,
    pub timezone: String,
    pub local_time_range: String,
}

/// A free slot annotated for presentation and ranked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// `"HH:MM - HH:MM UTC - dd/mm/yyyy"`.
    pub utc_time_range: String,
    pub participant_local_times: Vec<ParticipantLocalTime>,
    pub recommendation: Recommendation,
}

impl SuggestedSlot {
    pub fn new(slot: &AvailableSlot, participants: &[Participant]) -> Self {
        let participant_local_times = participants
            .iter()
            .map(|p| {
                let offset = p.offset();
                ParticipantLocalTime {
                    name: p.name.clone(),
                    timezone: p.timezone.clone(),
                    local_time_range: format!(
                        "{} - {}",
                        offset.to_local(slot.start).format("%H:%M"),
                        offset.to_local(slot.end).format("%H:%M")
                    ),
                }
            })
            .collect();

        Self {
            start: slot.start,
            end: slot.end,
            utc_time_range: format!(
                "{} - {} UTC - {}",
                slot.start.format("%H:%M"),
                slot.end.format("%H:%M"),
                slot.start.format("%d/%m/%Y")
            ),
            participant_local_times,
            recommendation: recommend(slot.start, participants),
        }
    }
}

/// Full result of a conflict analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictAnalysis {
    pub has_conflicts: bool,
    pub summary: String,
    pub participants: Vec<ParticipantAnalysis>,
    pub working_hours_overlap: WorkingHoursOverlap,
    pub conflicts: Vec<ConflictEntry>,
    pub suggestions: Vec<SuggestedSlot>,
}

impl ConflictAnalysis {
    /// A report carrying only a summary line, for requests with nobody to analyze.
    pub fn empty(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Default::default()
        }
    }

    pub fn working_hours_conflicts(&self) -> impl Iterator<Item = &ConflictEntry> {
        self.conflicts.iter().filter(|c| c.is_working_hours())
    }

    pub fn meeting_conflicts(&self) -> impl Iterator<Item = &ConflictEntry> {
        self.conflicts.iter().filter(|c| !c.is_working_hours())
    }
}

/// Render the human-readable summary of a finished report.
pub fn render_summary(report: &ConflictAnalysis) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "Analysis for {} participant(s):",
        report.participants.len()
    ));
    for p in &report.participants {
        lines.push(format!("   • {} ({}): {}", p.name, p.timezone, p.utc_working_hours));
    }

    lines.push(String::new());
    let overlap = &report.working_hours_overlap;
    if overlap.has_overlap {
        lines.push(format!(
            "Overlap window: {} ({})",
            overlap.overlap_period, overlap.overlap_duration
        ));
        for local in &overlap.participant_local_times {
            lines.push(format!("   • {}", local));
        }
    } else {
        lines.push("No working hours overlap".to_string());
    }

    lines.push(String::new());
    let working_hours: Vec<&ConflictEntry> = report.working_hours_conflicts().collect();
    let meetings = report.meeting_conflicts().count();
    match (working_hours.first(), meetings) {
        (None, 0) => lines.push("No conflicts detected".to_string()),
        (None, n) => lines.push(format!("{} meeting conflict(s) found", n)),
        (Some(entry), 0) => lines.push(format!(
            "Working hours conflict for {} - {} on {}",
            entry.start().format("%H:%M"),
            entry.end().format("%H:%M"),
            entry.start().format("%d/%m/%Y")
        )),
        (Some(_), n) => lines.push(format!(
            "{} working hours conflict(s) and {} meeting conflict(s) found",
            working_hours.len(),
            n
        )),
    }

    if !report.suggestions.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "{} suggested time slot(s):",
            report.suggestions.len()
        ));
        for s in &report.suggestions {
            lines.push(format!("   • {} - {}", s.utc_time_range, s.recommendation));
        }
    }

    lines.join("\n")
}
