//! Tests for the in-memory store.

use chrono::{DateTime, TimeZone, Utc};
use scheduling_engine::{
    CalendarSnapshot, InMemoryStore, Meeting, MeetingId, Participant, SchedulingError,
    SchedulingStore,
};

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, hour, 0, 0).unwrap()
}

#[tokio::test]
async fn participants_round_trip() {
    let store = InMemoryStore::new();
    let ana = store
        .insert_participant(Participant::new("Ana", "UTC"))
        .await
        .unwrap();

    assert_eq!(store.get_participant(ana.id).await.unwrap(), Some(ana.clone()));
    assert_eq!(store.list_participants().await.unwrap(), vec![ana]);
}

#[tokio::test]
async fn duplicate_participant_is_rejected() {
    let store = InMemoryStore::new();
    let ana = Participant::new("Ana", "UTC");
    store.insert_participant(ana.clone()).await.unwrap();

    let err = store.insert_participant(ana).await.unwrap_err();

    assert!(matches!(err, SchedulingError::DuplicateId(_)));
}

#[tokio::test]
async fn inverted_meeting_is_rejected() {
    let store = InMemoryStore::new();
    let meeting = Meeting::new("Backwards", at(10), at(9), vec![]);

    let err = store.insert_meeting(meeting).await.unwrap_err();

    assert!(matches!(err, SchedulingError::InvalidMeeting(_)));
}

#[tokio::test]
async fn meetings_are_listed_by_start() {
    let store = InMemoryStore::new();
    let ana = Participant::new("Ana", "UTC");
    store
        .insert_meeting(Meeting::new("Late", at(15), at(16), vec![ana.id]))
        .await
        .unwrap();
    store
        .insert_meeting(Meeting::new("Early", at(9), at(10), vec![ana.id]))
        .await
        .unwrap();

    let titles: Vec<String> = store
        .list_meetings()
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.title)
        .collect();

    assert_eq!(titles, vec!["Early", "Late"]);
}

#[tokio::test]
async fn overlap_query_filters_by_time_and_participant() {
    let store = InMemoryStore::new();
    let ana = Participant::new("Ana", "UTC");
    let bob = Participant::new("Bob", "UTC");
    for meeting in [
        Meeting::new("Ana 9", at(9), at(10), vec![ana.id]),
        Meeting::new("Ana 11", at(11), at(12), vec![ana.id]),
        Meeting::new("Bob 9", at(9), at(10), vec![bob.id]),
    ] {
        store.insert_meeting(meeting).await.unwrap();
    }

    let hits = store
        .list_meetings_overlapping(at(9), at(11), &[ana.id])
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Ana 9");

    let for_bob = store.list_meetings_for_participant(bob.id).await.unwrap();
    assert_eq!(for_bob.len(), 1);
}

#[tokio::test]
async fn delete_reports_whether_anything_was_removed() {
    let store = InMemoryStore::new();
    let meeting = store
        .insert_meeting(Meeting::new("Sync", at(9), at(10), vec![]))
        .await
        .unwrap();

    assert!(store.delete_meeting(meeting.id).await.unwrap());
    assert!(!store.delete_meeting(meeting.id).await.unwrap());
    assert!(!store.delete_meeting(MeetingId::new()).await.unwrap());
    assert_eq!(store.get_meeting(meeting.id).await.unwrap(), None);
}

#[tokio::test]
async fn snapshot_round_trips_through_json() {
    let ana = Participant::new("Ana", "UTC-3:00");
    let snapshot = CalendarSnapshot {
        participants: vec![ana.clone(), Participant::new("Bob", "UTC")],
        meetings: vec![Meeting::new("Sync", at(14), at(15), vec![ana.id])],
    };

    let json = serde_json::to_string(&snapshot).unwrap();
    let store = InMemoryStore::from_snapshot(serde_json::from_str(&json).unwrap()).unwrap();

    assert_eq!(store.snapshot(), snapshot);
}

#[tokio::test]
async fn snapshot_with_duplicate_ids_fails_to_load() {
    let ana = Participant::new("Ana", "UTC");
    let snapshot = CalendarSnapshot {
        participants: vec![ana.clone(), ana],
        meetings: vec![],
    };

    assert!(InMemoryStore::from_snapshot(snapshot).is_err());
}

#[test]
fn missing_timezone_defaults_to_utc() {
    let json = r#"{"id":"6f1c2a4e-8d1b-4a57-9c1e-2b3f4d5e6a7b","name":"Ana"}"#;

    let participant: Participant = serde_json::from_str(json).unwrap();

    assert_eq!(participant.timezone, "UTC");
}

#[tokio::test]
async fn clones_share_data() {
    let store = InMemoryStore::new();
    let other = store.clone();
    let ana = store
        .insert_participant(Participant::new("Ana", "UTC"))
        .await
        .unwrap();

    assert!(other.get_participant(ana.id).await.unwrap().is_some());
}
