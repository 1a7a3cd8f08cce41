//! The scheduling engine: booking, slot search and conflict analysis.
//!
//! Each operation reads what it needs from the store, computes its answer
//! and, for a successful booking only, writes one new meeting. Reads happen
//! before the write, but nothing serializes two concurrent bookings for the
//! same slot: both can pass the conflict check and both get inserted.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::{
    analyze_overlap, render_summary, ConflictAnalysis, ConflictEntry, ConflictingMeeting,
    ParticipantAnalysis, SuggestedSlot, WorkingHoursConflict,
};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::conflict::conflict_groups;
use crate::error::Result;
use crate::model::{Meeting, MeetingId, MeetingView, Participant, ParticipantId};
use crate::ranking::rank_by;
use crate::slots::{find_slots, AvailableSlot};
use crate::store::SchedulingStore;
use crate::working_hours::{check_working_hours, violation_message, window_for, WorkingHoursViolation};

/// A request to book a meeting. Times are UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    #[serde(default)]
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub participant_ids: Vec<ParticipantId>,
}

/// Why a booking was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Rejection {
    InvalidTimeRange,
    NoParticipants,
    ParticipantNotFound(ParticipantId),
    OutsideWorkingHours(Vec<WorkingHoursViolation>),
    /// Existing meetings that overlap the request and share a participant.
    Conflict(Vec<Meeting>),
}

impl Rejection {
    pub fn message(&self) -> String {
        match self {
            Rejection::InvalidTimeRange => "End time must be after start time.".to_string(),
            Rejection::NoParticipants => "At least one participant is required.".to_string(),
            Rejection::ParticipantNotFound(id) => format!("Participant with ID {} not found.", id),
            Rejection::OutsideWorkingHours(violations) => violation_message(violations),
            Rejection::Conflict(_) => {
                "Time conflict detected for one or more participants.".to_string()
            }
        }
    }
}

/// Result of [`SchedulingEngine::schedule_meeting`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScheduleOutcome {
    Scheduled {
        meeting: MeetingView,
    },
    Rejected {
        reason: Rejection,
        /// Alternatives; only filled for working-hours and conflict rejections.
        suggestions: Vec<AvailableSlot>,
    },
}

impl ScheduleOutcome {
    fn rejected(reason: Rejection) -> Self {
        ScheduleOutcome::Rejected {
            reason,
            suggestions: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ScheduleOutcome::Scheduled { .. })
    }

    pub fn message(&self) -> String {
        match self {
            ScheduleOutcome::Scheduled { .. } => "Meeting scheduled successfully.".to_string(),
            ScheduleOutcome::Rejected { reason, .. } => reason.message(),
        }
    }

    pub fn meeting(&self) -> Option<&MeetingView> {
        match self {
            ScheduleOutcome::Scheduled { meeting } => Some(meeting),
            ScheduleOutcome::Rejected { .. } => None,
        }
    }

    pub fn suggestions(&self) -> &[AvailableSlot] {
        match self {
            ScheduleOutcome::Scheduled { .. } => &[],
            ScheduleOutcome::Rejected { suggestions, .. } => suggestions,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            ScheduleOutcome::Scheduled { .. } => None,
            ScheduleOutcome::Rejected { reason, .. } => Some(reason),
        }
    }
}

/// Flat `{success, message, meeting, suggestions}` view of an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub success: bool,
    pub message: String,
    pub meeting: Option<MeetingView>,
    pub suggestions: Vec<AvailableSlot>,
}

impl From<&ScheduleOutcome> for ScheduleResponse {
    fn from(outcome: &ScheduleOutcome) -> Self {
        Self {
            success: outcome.is_success(),
            message: outcome.message(),
            meeting: outcome.meeting().cloned(),
            suggestions: outcome.suggestions().to_vec(),
        }
    }
}

/// Parameters for [`SchedulingEngine::analyze_conflicts`]. Times are UTC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub participant_ids: Vec<ParticipantId>,
    /// Defaults to now.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Defaults to now plus the configured analysis window (just now if that overflows).
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// With `meeting_end`, a specific window to check instead of scanning the range.
    #[serde(default)]
    pub meeting_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub meeting_end: Option<DateTime<Utc>>,
    /// Defaults to the configured meeting length.
    #[serde(default)]
    pub duration_minutes: Option<i64>,
}

/// Books meetings and answers availability questions against a [`SchedulingStore`].
pub struct SchedulingEngine<S, C = SystemClock> {
    store: S,
    clock: C,
    config: EngineConfig,
}

impl<S: SchedulingStore> SchedulingEngine<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: SchedulingStore, C: Clock> SchedulingEngine<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate and book a meeting.
    ///
    /// Checks run in order and stop at the first failure: time ordering,
    /// participant list, participant lookup, working hours, then conflicts
    /// with existing meetings. Working-hours and conflict rejections carry
    /// alternative slots from the following days.
    pub async fn schedule_meeting(&self, request: ScheduleRequest) -> Result<ScheduleOutcome> {
        if request.end <= request.start {
            return Ok(ScheduleOutcome::rejected(Rejection::InvalidTimeRange));
        }

        let ids = dedup_ids(&request.participant_ids);
        if ids.is_empty() {
            return Ok(ScheduleOutcome::rejected(Rejection::NoParticipants));
        }

        let mut participants = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.store.get_participant(*id).await? {
                Some(participant) => participants.push(participant),
                None => {
                    debug!(participant = %id, "unknown participant");
                    return Ok(ScheduleOutcome::rejected(Rejection::ParticipantNotFound(*id)));
                }
            }
        }

        let violations = check_working_hours(&participants, request.start, request.end);
        if !violations.is_empty() {
            debug!(count = violations.len(), "outside working hours");
            let suggestions = self.alternatives(&participants, &request).await?;
            return Ok(ScheduleOutcome::Rejected {
                reason: Rejection::OutsideWorkingHours(violations),
                suggestions,
            });
        }

        let conflicts = self
            .store
            .list_meetings_overlapping(request.start, request.end, &ids)
            .await?;
        if !conflicts.is_empty() {
            debug!(count = conflicts.len(), "booking conflict");
            let suggestions = self.alternatives(&participants, &request).await?;
            return Ok(ScheduleOutcome::Rejected {
                reason: Rejection::Conflict(conflicts),
                suggestions,
            });
        }

        let meeting = Meeting::new(&request.title, request.start, request.end, ids);
        let meeting = self.store.insert_meeting(meeting).await?;
        info!(meeting = %meeting.id, start = %meeting.start, end = %meeting.end, "meeting scheduled");

        Ok(ScheduleOutcome::Scheduled {
            meeting: MeetingView {
                meeting,
                participants,
            },
        })
    }

    /// Up to `max_suggestions` free slots of `duration_minutes` in `[start, end]`.
    ///
    /// Unknown participant ids are ignored; if none are known the result is empty.
    pub async fn find_available_slots(
        &self,
        participant_ids: &[ParticipantId],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Result<Vec<AvailableSlot>> {
        let participants = self.resolve(participant_ids).await?;
        self.slots_for(&participants, start, end, duration_minutes).await
    }

    /// Build a conflict report for a group of participants.
    ///
    /// When both `meeting_start` and `meeting_end` are given, the report lists
    /// bookings overlapping that window plus a working-hours entry if anyone
    /// would be outside their hours. Otherwise it lists every group of
    /// mutually conflicting bookings in the date range.
    pub async fn analyze_conflicts(&self, request: AnalysisRequest) -> Result<ConflictAnalysis> {
        if request.participant_ids.is_empty() {
            return Ok(ConflictAnalysis::empty("No participants selected for analysis."));
        }

        let participants = self.resolve(&request.participant_ids).await?;
        if participants.is_empty() {
            return Ok(ConflictAnalysis::empty("No valid participants found."));
        }
        let ids: Vec<ParticipantId> = participants.iter().map(|p| p.id).collect();

        let now = self.clock.now();
        let range_start = request.start_date.unwrap_or(now);
        let range_end = request
            .end_date
            .or_else(|| {
                self.config
                    .analysis_window()
                    .and_then(|window| now.checked_add_signed(window))
            })
            .unwrap_or(now);
        let duration = request
            .duration_minutes
            .unwrap_or(self.config.default_duration_minutes);

        let mut report = ConflictAnalysis {
            participants: self
                .participant_summaries(&participants, range_start, range_end)
                .await?,
            working_hours_overlap: analyze_overlap(&participants, range_start.date_naive()),
            ..Default::default()
        };

        report.conflicts = match (request.meeting_start, request.meeting_end) {
            (Some(meeting_start), Some(meeting_end)) => {
                let mut entries: Vec<ConflictEntry> = self
                    .store
                    .list_meetings_overlapping(meeting_start, meeting_end, &ids)
                    .await?
                    .iter()
                    .map(|m| ConflictEntry::Meeting(ConflictingMeeting::new(m, &participants)))
                    .collect();

                let violations = check_working_hours(&participants, meeting_start, meeting_end);
                if !violations.is_empty() {
                    entries.push(ConflictEntry::WorkingHours(WorkingHoursConflict::new(
                        meeting_start,
                        meeting_end,
                        &violations,
                    )));
                }
                entries
            }
            _ => {
                let meetings = self
                    .store
                    .list_meetings_overlapping(range_start, range_end, &ids)
                    .await?;
                conflict_groups(&meetings)
                    .iter()
                    .flatten()
                    .map(|m| ConflictEntry::Meeting(ConflictingMeeting::new(m, &participants)))
                    .collect()
            }
        };
        report.has_conflicts = !report.conflicts.is_empty();

        let slots = self
            .slots_for(&participants, range_start, range_end, duration)
            .await?;
        let suggestions: Vec<SuggestedSlot> = slots
            .iter()
            .map(|slot| SuggestedSlot::new(slot, &participants))
            .collect();
        report.suggestions = rank_by(suggestions, self.config.max_suggestions, |s| {
            (s.recommendation, s.start)
        });

        report.summary = render_summary(&report);
        Ok(report)
    }

    pub async fn delete_meeting(&self, id: MeetingId) -> Result<bool> {
        let deleted = self.store.delete_meeting(id).await?;
        if deleted {
            info!(meeting = %id, "meeting deleted");
        }
        Ok(deleted)
    }

    pub async fn list_meetings(&self) -> Result<Vec<Meeting>> {
        self.store.list_meetings().await
    }

    /// Known participants among `ids`, in request order, duplicates dropped.
    async fn resolve(&self, ids: &[ParticipantId]) -> Result<Vec<Participant>> {
        let mut participants = Vec::new();
        for id in dedup_ids(ids) {
            if let Some(participant) = self.store.get_participant(id).await? {
                participants.push(participant);
            }
        }
        Ok(participants)
    }

    async fn slots_for(
        &self,
        participants: &[Participant],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Result<Vec<AvailableSlot>> {
        if participants.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<ParticipantId> = participants.iter().map(|p| p.id).collect();
        let meetings = self.store.list_meetings_overlapping(start, end, &ids).await?;
        Ok(find_slots(
            participants,
            &meetings,
            start,
            end,
            duration_minutes,
            &self.config,
        ))
    }

    /// Same-length slots in the days following a rejected request.
    async fn alternatives(
        &self,
        participants: &[Participant],
        request: &ScheduleRequest,
    ) -> Result<Vec<AvailableSlot>> {
        let duration = (request.end - request.start).num_minutes();
        let Some(horizon_end) = self
            .config
            .search_horizon()
            .and_then(|horizon| request.start.checked_add_signed(horizon))
        else {
            debug!(horizon_days = self.config.search_horizon_days, "search horizon out of range");
            return Ok(Vec::new());
        };
        self.slots_for(participants, request.start, horizon_end, duration)
            .await
    }

    async fn participant_summaries(
        &self,
        participants: &[Participant],
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<ParticipantAnalysis>> {
        let mut summaries = Vec::with_capacity(participants.len());
        for participant in participants {
            let window = window_for(participant, range_start.date_naive());
            let total = self
                .store
                .list_meetings_for_participant(participant.id)
                .await?
                .iter()
                .filter(|m| m.start >= range_start && m.end <= range_end)
                .count();
            summaries.push(ParticipantAnalysis::new(participant, window, total));
        }
        Ok(summaries)
    }
}

fn dedup_ids(ids: &[ParticipantId]) -> Vec<ParticipantId> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
