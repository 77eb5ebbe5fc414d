// Copyright (C) 2026 Minpaku Suite Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Append-only booking ledger types and summary logic.
//!
//! Every monetary or lifecycle event for a booking is recorded as an
//! immutable [`LedgerEntry`]. Entries are never edited after append; a
//! correction is a compensating `refund` or `adjustment` entry. Storage is
//! the persistence crate's concern; this crate holds the event vocabulary,
//! the entry record, display formatting, and the pure summary computation.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use minpaku_domain::{MetaMap, SortOrder, format_datetime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use time::OffsetDateTime;

/// Default currency for ledger amounts.
pub const DEFAULT_CURRENCY: &str = "JPY";

/// Kinds of events recorded in the booking ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Booking reserved.
    Reserve,
    /// Booking confirmed.
    Confirm,
    /// Booking cancelled.
    Cancel,
    /// Stay completed.
    Complete,
    /// Money returned to the guest.
    Refund,
    /// Payment received.
    Payment,
    /// Manual balance correction.
    Adjustment,
    /// Free-form operator note.
    Note,
}

impl LedgerEvent {
    /// All valid event kinds.
    pub const ALL: [Self; 8] = [
        Self::Reserve,
        Self::Confirm,
        Self::Cancel,
        Self::Complete,
        Self::Refund,
        Self::Payment,
        Self::Adjustment,
        Self::Note,
    ];

    /// Returns the string representation of the event kind.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Reserve => "reserve",
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
            Self::Complete => "complete",
            Self::Refund => "refund",
            Self::Payment => "payment",
            Self::Adjustment => "adjustment",
            Self::Note => "note",
        }
    }

    /// Display label for admin-facing listings.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Reserve => "Reserved",
            Self::Confirm => "Confirmed",
            Self::Cancel => "Cancelled",
            Self::Complete => "Completed",
            Self::Refund => "Refunded",
            Self::Payment => "Payment",
            Self::Adjustment => "Adjustment",
            Self::Note => "Note",
        }
    }

    /// Parses an event kind from its string representation.
    fn parse_str(s: &str) -> Result<Self, LedgerError> {
        match s {
            "reserve" => Ok(Self::Reserve),
            "confirm" => Ok(Self::Confirm),
            "cancel" => Ok(Self::Cancel),
            "complete" => Ok(Self::Complete),
            "refund" => Ok(Self::Refund),
            "payment" => Ok(Self::Payment),
            "adjustment" => Ok(Self::Adjustment),
            "note" => Ok(Self::Note),
            _ => Err(LedgerError::InvalidEvent(s.to_string())),
        }
    }
}

impl FromStr for LedgerEvent {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors from ledger validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Event string is not a recognized ledger event kind.
    InvalidEvent(String),
    /// Booking id must be a positive identifier.
    InvalidBookingId(i64),
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEvent(event) => write!(f, "Invalid ledger event: {event}"),
            Self::InvalidBookingId(id) => write!(f, "Invalid booking id: {id}"),
        }
    }
}

impl std::error::Error for LedgerError {}

/// Validates a booking id for ledger operations.
///
/// # Errors
///
/// Returns `LedgerError::InvalidBookingId` if the id is not positive.
pub const fn validate_booking_id(booking_id: i64) -> Result<(), LedgerError> {
    if booking_id <= 0 {
        return Err(LedgerError::InvalidBookingId(booking_id));
    }
    Ok(())
}

/// One immutable audit-trail row tied to a booking.
///
/// The booking id is a foreign reference by convention only; it is not
/// enforced in-process. Entries never reference other entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    /// Storage-assigned identifier.
    pub id: i64,
    /// The booking this entry belongs to.
    pub booking_id: i64,
    /// What happened.
    pub event: LedgerEvent,
    /// Signed amount; zero for non-monetary events.
    pub amount: f64,
    /// ISO-like currency code.
    pub currency: String,
    /// Arbitrary caller-supplied context.
    pub meta_data: MetaMap,
    /// When the entry was appended (UTC).
    pub created_at: OffsetDateTime,
}

impl LedgerEntry {
    /// Display label for this entry's event kind.
    #[must_use]
    pub const fn event_label(&self) -> &'static str {
        self.event.label()
    }

    /// Amount formatted for display in this entry's currency.
    #[must_use]
    pub fn formatted_amount(&self) -> String {
        format_amount(self.amount, &self.currency)
    }

    /// Creation timestamp formatted for display.
    #[must_use]
    pub fn formatted_date(&self) -> String {
        format_datetime(self.created_at)
    }
}

/// Formats an amount for display.
///
/// JPY has no minor unit, so it renders as a grouped integer. Every other
/// currency renders with two decimals. The currency code is appended.
#[must_use]
pub fn format_amount(amount: f64, currency: &str) -> String {
    if currency == DEFAULT_CURRENCY {
        // Ledger amounts are far inside i64 range.
        #[allow(clippy::cast_possible_truncation)]
        let rounded = amount.round() as i64;
        return format!("{} {currency}", group_thousands(rounded));
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    let formatted = format!("{:.2}", amount.abs());
    match formatted.split_once('.') {
        Some((int_part, frac_part)) => {
            format!("{sign}{}.{frac_part} {currency}", group_digits(int_part))
        }
        None => format!("{sign}{formatted} {currency}"),
    }
}

fn group_thousands(value: i64) -> String {
    let grouped = group_digits(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Inserts a comma every three digits, counting from the right.
fn group_digits(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(char::from(*byte));
    }
    out
}

/// Arguments for listing ledger entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListArgs {
    /// Restrict to a single event kind.
    pub event: Option<LedgerEvent>,
    /// Maximum entries to return; negative means no limit.
    pub limit: i64,
    /// Entries to skip.
    pub offset: i64,
    /// Ordering by creation time then id.
    pub order: SortOrder,
}

impl Default for ListArgs {
    fn default() -> Self {
        Self {
            event: None,
            limit: 50,
            offset: 0,
            order: SortOrder::Desc,
        }
    }
}

impl ListArgs {
    /// Unbounded oldest-first listing, used for summaries.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            limit: -1,
            order: SortOrder::Asc,
            ..Self::default()
        }
    }
}

/// Aggregated view of a booking's full ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct LedgerSummary {
    /// Total number of entries.
    pub total_entries: usize,
    /// Entry count per event kind.
    pub events: BTreeMap<LedgerEvent, usize>,
    /// Amount sum per currency.
    pub amounts: BTreeMap<String, f64>,
    /// Earliest entry by creation time.
    pub first_entry: Option<LedgerEntry>,
    /// Latest entry by creation time.
    pub last_entry: Option<LedgerEntry>,
}

/// Summarizes a booking's full ledger in a single pass.
///
/// Cost is linear in the number of entries; callers pass the unpaginated
/// list for the booking.
#[must_use]
pub fn summarize(entries: &[LedgerEntry]) -> LedgerSummary {
    let mut summary = LedgerSummary {
        total_entries: entries.len(),
        ..LedgerSummary::default()
    };

    for entry in entries {
        *summary.events.entry(entry.event).or_insert(0) += 1;
        *summary
            .amounts
            .entry(entry.currency.clone())
            .or_insert(0.0) += entry.amount;

        if summary
            .first_entry
            .as_ref()
            .is_none_or(|first| entry.created_at < first.created_at)
        {
            summary.first_entry = Some(entry.clone());
        }
        if summary
            .last_entry
            .as_ref()
            .is_none_or(|last| entry.created_at >= last.created_at)
        {
            summary.last_entry = Some(entry.clone());
        }
    }

    summary
}
