// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use chrono::{TimeZone, Utc};

use crate::date::Timestamp;
use crate::error::ZipStreamError;

#[test]
fn epoch_forms_parse() {
    assert_eq!(0, Timestamp::parse("@0").unwrap().epoch_seconds());
    assert_eq!(1666544102, Timestamp::parse("1666544102").unwrap().epoch_seconds());
    assert_eq!(1666544102, Timestamp::from(1666544102i64).epoch_seconds());
}

#[test]
fn offset_forms_normalize_to_utc() {
    let expected = Utc.with_ymd_and_hms(2024, 1, 2, 1, 4, 5).unwrap();

    assert_eq!(expected, Timestamp::parse("2024-01-02T03:04:05+02:00").unwrap().as_chrono());
    assert_eq!(expected, Timestamp::parse("Tue, 02 Jan 2024 03:04:05 +0200").unwrap().as_chrono());
}

#[test]
fn naive_forms_are_utc() {
    let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

    assert_eq!(expected, Timestamp::parse("2024-01-02 03:04:05").unwrap().as_chrono());
    assert_eq!(expected, Timestamp::parse("2024-01-02T03:04:05").unwrap().as_chrono());
    assert_eq!(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(), "2024-01-02".parse::<Timestamp>().unwrap().as_chrono());
}

#[test]
fn unparsable_input_is_rejected() {
    for input in ["", "   ", "yesterday", "2024-13-45"] {
        let err = Timestamp::parse(input).unwrap_err();
        assert!(matches!(err, ZipStreamError::InvalidTimestamp(_)), "input {input:?}");
    }
}

#[test]
fn epoch_seconds_saturate() {
    assert_eq!(Timestamp::from_epoch_seconds(i64::MAX).as_chrono(), chrono::DateTime::<Utc>::MAX_UTC);
    assert_eq!(Timestamp::from_epoch_seconds(i64::MIN).as_chrono(), chrono::DateTime::<Utc>::MIN_UTC);
}

#[test]
fn system_time_converts() {
    let time = std::time::UNIX_EPOCH + std::time::Duration::from_secs(86_400);
    assert_eq!(86_400, Timestamp::from(time).epoch_seconds());
}
