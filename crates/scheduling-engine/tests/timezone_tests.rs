//! Tests for fixed-offset timezone parsing and conversion.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use scheduling_engine::timezone::{local_to_utc, parse_timezone_offset, utc_to_local};
use scheduling_engine::TimeZoneOffset;

#[test]
fn plain_utc_is_zero() {
    assert_eq!(TimeZoneOffset::parse("UTC"), TimeZoneOffset::UTC);
    assert_eq!(TimeZoneOffset::parse("  UTC  ").minutes(), 0);
}

#[test]
fn negative_offset_with_single_digit_hour() {
    assert_eq!(TimeZoneOffset::parse("UTC-3:00").minutes(), -180);
}

#[test]
fn positive_offset_with_half_hour() {
    assert_eq!(TimeZoneOffset::parse("UTC+05:30").minutes(), 330);
    assert_eq!(TimeZoneOffset::parse("UTC+5:30").minutes(), 330);
}

#[test]
fn signless_offset_is_positive() {
    assert_eq!(TimeZoneOffset::parse("UTC9:00").minutes(), 540);
}

#[test]
fn malformed_labels_fall_back_to_utc() {
    for label in ["", "garbage", "UTC+5", "UTC+15:00", "UTC+05:75", "GMT+1:00", "UTC+a:00"] {
        assert_eq!(
            TimeZoneOffset::parse(label),
            TimeZoneOffset::UTC,
            "{label:?} should parse as UTC"
        );
    }
}

#[test]
fn extreme_valid_offsets() {
    assert_eq!(TimeZoneOffset::parse("UTC+14:00").minutes(), 840);
    assert_eq!(TimeZoneOffset::parse("UTC-12:00").minutes(), -720);
}

#[test]
fn display_is_canonical() {
    assert_eq!(TimeZoneOffset::UTC.to_string(), "UTC");
    assert_eq!(TimeZoneOffset::parse("UTC-3:00").to_string(), "UTC-03:00");
    assert_eq!(TimeZoneOffset::parse("UTC+5:30").to_string(), "UTC+05:30");
}

#[test]
fn from_minutes_rejects_out_of_range() {
    assert!(TimeZoneOffset::from_minutes(841).is_none());
    assert_eq!(TimeZoneOffset::from_minutes(-60).map(|o| o.minutes()), Some(-60));
}

#[test]
fn parse_timezone_offset_returns_duration() {
    assert_eq!(parse_timezone_offset("UTC+9:00"), Duration::hours(9));
    assert_eq!(parse_timezone_offset("garbage"), Duration::zero());
}

#[test]
fn local_eight_am_in_tokyo_is_previous_day_in_utc() {
    let local = NaiveDate::from_ymd_opt(2026, 3, 10)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();

    let utc = local_to_utc(local, "UTC+9:00");

    assert_eq!(utc, Utc.with_ymd_and_hms(2026, 3, 9, 23, 0, 0).unwrap());
}

#[test]
fn utc_to_local_applies_negative_offset() {
    let utc = Utc.with_ymd_and_hms(2026, 3, 10, 2, 0, 0).unwrap();

    let local = utc_to_local(utc, "UTC-3:00");

    assert_eq!(
        local,
        NaiveDate::from_ymd_opt(2026, 3, 9)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap()
    );
}

#[test]
fn unknown_label_converts_as_utc() {
    let utc = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
    assert_eq!(utc_to_local(utc, "Mars/Olympus"), utc.naive_utc());
}
