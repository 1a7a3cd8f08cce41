//! Participants, meetings and the calendar snapshot they are exchanged in.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timezone::TimeZoneOffset;

/// Title given to meetings created without one.
pub const UNTITLED_MEETING: &str = "Untitled Meeting";

/// Opaque participant identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque meeting identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingId(pub Uuid);

impl MeetingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MeetingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MeetingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// A person who can be invited to meetings.
///
/// `timezone` is a fixed-offset label such as `UTC`, `UTC-3:00` or `UTC+05:30`.
/// Labels that cannot be parsed behave as UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Participant {
    pub fn new(name: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(),
            name: name.into(),
            timezone: timezone.into(),
        }
    }

    /// The participant's parsed UTC offset.
    pub fn offset(&self) -> TimeZoneOffset {
        TimeZoneOffset::parse(&self.timezone)
    }

    /// `"Name (UTC-3:00)"`, the form used in reports.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.timezone)
    }
}

/// A booked meeting. Start and end are UTC instants with `end > start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Participants are referenced, not owned.
    pub participants: Vec<ParticipantId>,
}

impl Meeting {
    /// Create a meeting with a fresh id. A blank title becomes "Untitled Meeting".
    pub fn new(
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        participants: Vec<ParticipantId>,
    ) -> Self {
        let title = title.trim();
        Self {
            id: MeetingId::new(),
            title: if title.is_empty() {
                UNTITLED_MEETING.to_string()
            } else {
                title.to_string()
            },
            start,
            end,
            participants,
        }
    }

    /// Half-open intersection test against `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }

    pub fn includes(&self, participant: ParticipantId) -> bool {
        self.participants.contains(&participant)
    }

    pub fn includes_any(&self, participants: &[ParticipantId]) -> bool {
        self.participants.iter().any(|p| participants.contains(p))
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// A meeting together with its resolved participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingView {
    #[serde(flatten)]
    pub meeting: Meeting,
    #[serde(rename = "participant_details")]
    pub participants: Vec<Participant>,
}

/// Serialized form of a whole calendar: everyone and everything booked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSnapshot {
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub meetings: Vec<Meeting>,
}
