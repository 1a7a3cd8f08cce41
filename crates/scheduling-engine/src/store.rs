//! Persistence seam for participants and meetings.
//!
//! The engine only talks to [`SchedulingStore`]. [`InMemoryStore`] is the
//! implementation used by the CLI and the tests: data lives in memory behind a
//! shared lock, and can be loaded from or exported to a [`CalendarSnapshot`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::{Result, SchedulingError};
use crate::model::{CalendarSnapshot, Meeting, MeetingId, Participant, ParticipantId};

/// Storage operations the scheduling engine depends on.
///
/// Implementations must be `Send + Sync` so one store can back concurrent requests.
#[async_trait]
pub trait SchedulingStore: Send + Sync {
    async fn get_participant(&self, id: ParticipantId) -> Result<Option<Participant>>;

    async fn list_participants(&self) -> Result<Vec<Participant>>;

    /// Fails with [`SchedulingError::DuplicateId`] if the id is already taken.
    async fn insert_participant(&self, participant: Participant) -> Result<Participant>;

    async fn get_meeting(&self, id: MeetingId) -> Result<Option<Meeting>>;

    /// All meetings, ordered by start time.
    async fn list_meetings(&self) -> Result<Vec<Meeting>>;

    /// Meetings intersecting `[start, end)` that include at least one of
    /// `participants`, ordered by start time.
    async fn list_meetings_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        participants: &[ParticipantId],
    ) -> Result<Vec<Meeting>>;

    /// Every meeting the participant attends, ordered by start time.
    async fn list_meetings_for_participant(&self, id: ParticipantId) -> Result<Vec<Meeting>>;

    /// Fails with [`SchedulingError::InvalidMeeting`] unless `end > start`, and
    /// with [`SchedulingError::DuplicateId`] if the id is already taken.
    async fn insert_meeting(&self, meeting: Meeting) -> Result<Meeting>;

    /// Returns whether a meeting was removed.
    async fn delete_meeting(&self, id: MeetingId) -> Result<bool>;
}

#[derive(Default)]
struct StoreData {
    participants: HashMap<ParticipantId, Participant>,
    /// Insertion order, so exports are stable.
    participant_order: Vec<ParticipantId>,
    meetings: HashMap<MeetingId, Meeting>,
}

impl StoreData {
    fn sorted_meetings(&self, filter: impl Fn(&Meeting) -> bool) -> Vec<Meeting> {
        let mut meetings: Vec<Meeting> = self.meetings.values().filter(|m| filter(m)).cloned().collect();
        meetings.sort_by(|a, b| (a.start, a.end, a.id).cmp(&(b.start, b.end, b.id)));
        meetings
    }

    fn add_participant(&mut self, participant: Participant) -> Result<()> {
        if self.participants.contains_key(&participant.id) {
            return Err(SchedulingError::DuplicateId(participant.id.to_string()));
        }
        self.participant_order.push(participant.id);
        self.participants.insert(participant.id, participant);
        Ok(())
    }

    fn add_meeting(&mut self, meeting: Meeting) -> Result<()> {
        if meeting.end <= meeting.start {
            return Err(SchedulingError::InvalidMeeting(format!(
                "meeting {} ends at or before its start",
                meeting.id
            )));
        }
        if self.meetings.contains_key(&meeting.id) {
            return Err(SchedulingError::DuplicateId(meeting.id.to_string()));
        }
        self.meetings.insert(meeting.id, meeting);
        Ok(())
    }
}

/// In-memory store. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    data: Arc<RwLock<StoreData>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot, validating every record.
    pub fn from_snapshot(snapshot: CalendarSnapshot) -> Result<Self> {
        let mut data = StoreData::default();
        for participant in snapshot.participants {
            data.add_participant(participant)?;
        }
        for meeting in snapshot.meetings {
            data.add_meeting(meeting)?;
        }
        Ok(Self {
            data: Arc::new(RwLock::new(data)),
        })
    }

    /// Export participants in insertion order and meetings by start time.
    pub fn snapshot(&self) -> CalendarSnapshot {
        let data = self.data.read();
        CalendarSnapshot {
            participants: data
                .participant_order
                .iter()
                .filter_map(|id| data.participants.get(id).cloned())
                .collect(),
            meetings: data.sorted_meetings(|_| true),
        }
    }
}

#[async_trait]
impl SchedulingStore for InMemoryStore {
    async fn get_participant(&self, id: ParticipantId) -> Result<Option<Participant>> {
        Ok(self.data.read().participants.get(&id).cloned())
    }

    async fn list_participants(&self) -> Result<Vec<Participant>> {
        Ok(self.snapshot().participants)
    }

    async fn insert_participant(&self, participant: Participant) -> Result<Participant> {
        self.data.write().add_participant(participant.clone())?;
        Ok(participant)
    }

    async fn get_meeting(&self, id: MeetingId) -> Result<Option<Meeting>> {
        Ok(self.data.read().meetings.get(&id).cloned())
    }

    async fn list_meetings(&self) -> Result<Vec<Meeting>> {
        Ok(self.data.read().sorted_meetings(|_| true))
    }

    async fn list_meetings_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        participants: &[ParticipantId],
    ) -> Result<Vec<Meeting>> {
        Ok(self
            .data
            .read()
            .sorted_meetings(|m| m.overlaps(start, end) && m.includes_any(participants)))
    }

    async fn list_meetings_for_participant(&self, id: ParticipantId) -> Result<Vec<Meeting>> {
        Ok(self.data.read().sorted_meetings(|m| m.includes(id)))
    }

    async fn insert_meeting(&self, meeting: Meeting) -> Result<Meeting> {
        self.data.write().add_meeting(meeting.clone())?;
        Ok(meeting)
    }

    async fn delete_meeting(&self, id: MeetingId) -> Result<bool> {
        Ok(self.data.write().meetings.remove(&id).is_some())
    }
}
