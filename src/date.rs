// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Point-in-time values used for entry modification dates.

use std::str::FromStr;
use std::time::SystemTime;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{Result, ZipStreamError};

// Naive formats are interpreted as UTC.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// A normalised modification timestamp.
///
/// Every accepted input (epoch seconds, a parseable string or a `chrono`/`std` date value) is converted into the same
/// UTC representation when it is set, so entries never carry unparsed input around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Interprets `seconds` as seconds since the Unix epoch, saturating at the representable bounds.
    pub fn from_epoch_seconds(seconds: i64) -> Self {
        match DateTime::from_timestamp(seconds, 0) {
            Some(dt) => Self(dt),
            None if seconds < 0 => Self(DateTime::<Utc>::MIN_UTC),
            None => Self(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Parses a timestamp from a string.
    ///
    /// Accepted forms are `@<epoch seconds>`, a bare integer of epoch seconds, RFC 3339, RFC 2822,
    /// `YYYY-MM-DD HH:MM:SS` (also with a `T` separator) and a bare `YYYY-MM-DD` date (midnight UTC).
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || ZipStreamError::InvalidTimestamp(input.to_owned());

        if trimmed.is_empty() {
            return Err(invalid());
        }

        let epoch = trimmed.strip_prefix('@').unwrap_or(trimmed);
        if let Ok(seconds) = epoch.parse::<i64>() {
            return Ok(Self::from_epoch_seconds(seconds));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(dt.into());
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
            return Ok(dt.into());
        }

        for format in NAIVE_DATE_TIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(naive.into());
            }
        }

        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Self::from)
            .ok_or_else(invalid)
    }

    /// Returns this timestamp as a `chrono` value.
    pub fn as_chrono(&self) -> DateTime<Utc> {
        self.0
    }

    /// Returns the number of whole seconds since the Unix epoch.
    pub fn epoch_seconds(&self) -> i64 {
        self.0.timestamp()
    }
}

impl FromStr for Timestamp {
    type Err = ZipStreamError;

    fn from_str(s: &str) -> Result<Self> {
        Timestamp::parse(s)
    }
}

impl From<i64> for Timestamp {
    fn from(seconds: i64) -> Self {
        Timestamp::from_epoch_seconds(seconds)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self(dt.with_timezone(&Utc))
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(naive: NaiveDateTime) -> Self {
        Self(Utc.from_utc_datetime(&naive))
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        Self(time.into())
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(timestamp: Timestamp) -> Self {
        timestamp.0
    }
}
