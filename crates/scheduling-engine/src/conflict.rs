//! Detect overlapping meetings.
//!
//! Intervals are half-open: a meeting ending exactly when another starts is
//! NOT a conflict. Between two booked meetings a conflict additionally needs at
//! least one shared participant.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::model::{Meeting, MeetingId};

/// Meetings whose `[start, end)` intersects `[candidate_start, candidate_end)`.
///
/// Order of `meetings` is preserved.
pub fn overlapping<'a>(
    candidate_start: DateTime<Utc>,
    candidate_end: DateTime<Utc>,
    meetings: &'a [Meeting],
) -> Vec<&'a Meeting> {
    meetings
        .iter()
        .filter(|m| m.start < candidate_end && m.end > candidate_start)
        .collect()
}

/// Two meetings conflict when their time ranges overlap and they share a participant.
pub fn meetings_conflict(a: &Meeting, b: &Meeting) -> bool {
    a.id != b.id
        && a.start < b.end
        && b.start < a.end
        && a.participants.iter().any(|p| b.participants.contains(p))
}

/// Group meetings into sets connected by conflicts.
///
/// Meetings are first ordered by start time; a meeting joins a group if it
/// conflicts with any member, directly or through a chain of conflicts, so
/// A-B and B-C land in one group even when A and C never overlap. Meetings
/// without any conflict are dropped. Each meeting id appears at most once.
pub fn conflict_groups(meetings: &[Meeting]) -> Vec<Vec<Meeting>> {
    let mut ordered: Vec<&Meeting> = Vec::with_capacity(meetings.len());
    let mut seen_ids: HashSet<MeetingId> = HashSet::new();
    for meeting in meetings {
        if seen_ids.insert(meeting.id) {
            ordered.push(meeting);
        }
    }
    ordered.sort_by_key(|m| (m.start, m.end));

    let mut assigned = vec![false; ordered.len()];
    let mut groups = Vec::new();

    for root in 0..ordered.len() {
        if assigned[root] {
            continue;
        }
        assigned[root] = true;

        let mut members = vec![root];
        let mut cursor = 0;
        while cursor < members.len() {
            let current = ordered[members[cursor]];
            for (other, meeting) in ordered.iter().enumerate() {
                if !assigned[other] && meetings_conflict(current, meeting) {
                    assigned[other] = true;
                    members.push(other);
                }
            }
            cursor += 1;
        }

        if members.len() > 1 {
            members.sort_unstable();
            groups.push(members.into_iter().map(|i| ordered[i].clone()).collect());
        }
    }

    groups
}
