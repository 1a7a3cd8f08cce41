//! Tests for per-participant working windows and the working-hours check.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use scheduling_engine::working_hours::{
    check_working_hours, local_hour, violation_message, window_for, WorkingWindow,
};
use scheduling_engine::Participant;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

#[test]
fn utc_participant_works_eight_to_six() {
    let window = window_for(&Participant::new("Ana", "UTC"), date());

    assert_eq!(window, WorkingWindow::utc_default());
    assert_eq!(window.utc_display(), "08:00 - 18:00 UTC");
}

#[test]
fn negative_offset_shifts_window_later() {
    let window = window_for(&Participant::new("Bruno", "UTC-3:00"), date());

    assert_eq!(window.start, hm(11, 0));
    assert_eq!(window.end, hm(21, 0));
    assert!(!window.crosses_midnight);
}

#[test]
fn tokyo_window_crosses_midnight() {
    let window = window_for(&Participant::new("Kenji", "UTC+9:00"), date());

    assert_eq!(window.start, hm(23, 0));
    assert_eq!(window.end, hm(9, 0));
    assert!(window.crosses_midnight);
    assert_eq!(
        window.utc_display(),
        "23:00 - 00:00 + 00:00 - 09:00 UTC (crosses midnight)"
    );
}

#[test]
fn india_window_has_half_hour_bounds() {
    let window = window_for(&Participant::new("Priya", "UTC+5:30"), date());

    assert_eq!(window.start, hm(2, 30));
    assert_eq!(window.end, hm(12, 30));
    assert!(!window.crosses_midnight);
}

#[test]
fn crossing_window_admits_either_side_of_midnight() {
    let window = window_for(&Participant::new("Kenji", "UTC+9:00"), date());

    assert!(window.admits(hm(23, 0), hm(23, 59)));
    assert!(window.admits(hm(1, 0), hm(2, 0)));
    assert!(!window.admits(hm(12, 0), hm(13, 0)));
}

#[test]
fn meeting_inside_hours_has_no_violations() {
    let people = vec![Participant::new("Ana", "UTC"), Participant::new("Bruno", "UTC-3:00")];
    let start = Utc.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap();

    assert!(check_working_hours(&people, start, end).is_empty());
}

#[test]
fn meeting_ending_at_six_is_inside_hours() {
    let people = vec![Participant::new("Ana", "UTC")];
    let start = Utc.with_ymd_and_hms(2026, 3, 10, 17, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2026, 3, 10, 18, 0, 0).unwrap();

    assert!(check_working_hours(&people, start, end).is_empty());
}

#[test]
fn early_utc_meeting_violates_for_negative_offset() {
    let people = vec![Participant::new("Bruno", "UTC-3:00")];
    let start = Utc.with_ymd_and_hms(2026, 3, 10, 2, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2026, 3, 10, 3, 0, 0).unwrap();

    let violations = check_working_hours(&people, start, end);

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].local_start, hm(23, 0));
    assert_eq!(violations[0].local_end, hm(0, 0));
    assert_eq!(
        violations[0].to_string(),
        "Bruno (UTC-3:00): meeting would be from 23:00 to 00:00 (outside working hours 08:00-18:00)"
    );
}

#[test]
fn only_offending_participants_are_reported() {
    let people = vec![
        Participant::new("Ana", "UTC"),
        Participant::new("Bruno", "UTC-3:00"),
    ];
    let start = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2026, 3, 10, 10, 0, 0).unwrap();

    let violations = check_working_hours(&people, start, end);

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].name, "Bruno");
}

#[test]
fn meeting_crossing_utc_midnight_is_accepted_for_east_asia() {
    let people = vec![
        Participant::new("Kenji", "UTC+9:00"),
        Participant::new("Olivia", "UTC+10:00"),
    ];
    let start = Utc.with_ymd_and_hms(2026, 3, 10, 23, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2026, 3, 11, 0, 0, 0).unwrap();

    assert!(check_working_hours(&people, start, end).is_empty());
}

#[test]
fn violation_message_joins_entries() {
    let people = vec![
        Participant::new("Bruno", "UTC-3:00"),
        Participant::new("Carla", "UTC-5:00"),
    ];
    let start = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();

    let message = violation_message(&check_working_hours(&people, start, end));

    assert!(message.starts_with("Outside working hours for: Bruno (UTC-3:00)"));
    assert!(message.contains("; Carla (UTC-5:00): meeting would be from 03:00 to 04:00"));
}

#[test]
fn local_hour_uses_offset() {
    let instant = Utc.with_ymd_and_hms(2026, 3, 10, 14, 45, 0).unwrap();

    assert_eq!(local_hour(&Participant::new("Priya", "UTC+5:30"), instant), 20);
    assert_eq!(local_hour(&Participant::new("Bruno", "UTC-3:00"), instant), 11);
}
