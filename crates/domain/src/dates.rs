// Copyright (C) 2026 Minpaku Suite Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared date and timestamp handling.
//!
//! Calendar dates travel as `YYYY-MM-DD` strings and timestamps as
//! `YYYY-MM-DD HH:MM:SS` (UTC), matching the storage representation.

use crate::error::DomainError;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

const DATETIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Parses a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_date(s: &str) -> Result<Date, DomainError> {
    Date::parse(s, DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        date_string: s.to_string(),
        error: e.to_string(),
    })
}

/// Formats a calendar date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_default()
}

/// Parses a `YYYY-MM-DD HH:MM:SS` timestamp, assumed UTC.
///
/// # Errors
///
/// Returns `DomainError::DatetimeParseError` if the string is not a valid
/// timestamp.
pub fn parse_datetime(s: &str) -> Result<OffsetDateTime, DomainError> {
    PrimitiveDateTime::parse(s, DATETIME_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| DomainError::DatetimeParseError {
            datetime_string: s.to_string(),
            error: e.to_string(),
        })
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS`.
#[must_use]
pub fn format_datetime(datetime: OffsetDateTime) -> String {
    datetime.format(DATETIME_FORMAT).unwrap_or_default()
}
