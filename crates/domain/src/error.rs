// Copyright (C) 2026 Minpaku Suite Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Booking state string is not one of the recognized states.
    InvalidBookingState(String),
    /// Failed to parse a calendar date from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to parse a timestamp from a string.
    DatetimeParseError {
        /// The invalid timestamp string.
        datetime_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBookingState(state) => {
                write!(f, "Invalid booking state: {state}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::DatetimeParseError {
                datetime_string,
                error,
            } => {
                write!(f, "Failed to parse timestamp '{datetime_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
