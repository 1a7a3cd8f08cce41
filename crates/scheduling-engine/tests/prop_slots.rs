//! Property-based tests for slot search.
//!
//! These check invariants that hold for any group and calendar, not just the
//! hand-picked cases in `slots_tests.rs`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use scheduling_engine::slots::find_slots;
use scheduling_engine::working_hours::check_working_hours;
use scheduling_engine::{EngineConfig, Meeting, Participant};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_timezone() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("UTC".to_string()),
        Just("UTC-3:00".to_string()),
        Just("UTC-5:00".to_string()),
        Just("UTC+1:00".to_string()),
        Just("UTC+5:30".to_string()),
        Just("UTC+9:00".to_string()),
        Just("UTC+10:00".to_string()),
    ]
}

fn arb_participants() -> impl Strategy<Value = Vec<Participant>> {
    prop::collection::vec(arb_timezone(), 1..=3).prop_map(|zones| {
        zones
            .into_iter()
            .enumerate()
            .map(|(i, tz)| Participant::new(format!("P{i}"), tz))
            .collect()
    })
}

/// Busy blocks as (day offset, start hour, length in hours).
fn arb_busy() -> impl Strategy<Value = Vec<(i64, i64, i64)>> {
    prop::collection::vec((0i64..3, 0i64..24, 1i64..=3), 0..6)
}

fn arb_duration() -> impl Strategy<Value = i64> {
    prop_oneof![Just(15i64), Just(30), Just(45), Just(60), Just(90), Just(120)]
}

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap()
}

fn meetings_for(people: &[Participant], busy: &[(i64, i64, i64)]) -> Vec<Meeting> {
    busy.iter()
        .enumerate()
        .map(|(i, (day, hour, len))| {
            let start = base() + Duration::days(*day) + Duration::hours(*hour);
            let owner = people[i % people.len()].id;
            Meeting::new("Busy", start, start + Duration::hours(*len), vec![owner])
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn slots_have_exact_duration_and_increase(
        people in arb_participants(),
        busy in arb_busy(),
        duration in arb_duration(),
    ) {
        let meetings = meetings_for(&people, &busy);
        let end = base() + Duration::days(3);

        let slots = find_slots(&people, &meetings, base(), end, duration, &EngineConfig::default());

        prop_assert!(slots.len() <= 3);
        for slot in &slots {
            prop_assert_eq!(slot.end - slot.start, Duration::minutes(duration));
            prop_assert_eq!(slot.duration_minutes, duration);
            prop_assert!(slot.start >= base() && slot.end <= end);
        }
        for pair in slots.windows(2) {
            prop_assert!(pair[0].start < pair[1].start, "slots must be strictly increasing");
        }
    }

    #[test]
    fn slots_never_overlap_bookings(
        people in arb_participants(),
        busy in arb_busy(),
        duration in arb_duration(),
    ) {
        let meetings = meetings_for(&people, &busy);

        let slots = find_slots(
            &people,
            &meetings,
            base(),
            base() + Duration::days(3),
            duration,
            &EngineConfig::default(),
        );

        for slot in &slots {
            for meeting in &meetings {
                prop_assert!(
                    !meeting.overlaps(slot.start, slot.end),
                    "slot {:?} overlaps booking {:?}", slot, meeting
                );
            }
        }
    }

    #[test]
    fn same_day_slots_pass_the_working_hours_check(
        people in arb_participants(),
        duration in arb_duration(),
    ) {
        let slots = find_slots(
            &people,
            &[],
            base(),
            base() + Duration::days(3),
            duration,
            &EngineConfig::default(),
        );

        for slot in slots.iter().filter(|s| s.start.date_naive() == s.end.date_naive()) {
            prop_assert!(check_working_hours(&people, slot.start, slot.end).is_empty());
        }
    }

    #[test]
    fn search_is_deterministic(
        people in arb_participants(),
        busy in arb_busy(),
        duration in arb_duration(),
    ) {
        let meetings = meetings_for(&people, &busy);
        let end = base() + Duration::days(3);
        let config = EngineConfig::default();

        let first = find_slots(&people, &meetings, base(), end, duration, &config);
        let second = find_slots(&people, &meetings, base(), end, duration, &config);

        prop_assert_eq!(first, second);
    }
}
