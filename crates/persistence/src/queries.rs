// Copyright (C) 2026 Minpaku Suite Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side queries for bookings and ledger entries.

use crate::data_models::{BookingRow, LedgerEntryRow};
use crate::diesel_schema::{bookings, ledger_entries};
use crate::error::PersistenceError;
use diesel::dsl::sum;
use diesel::prelude::*;
use minpaku_booking::Booking;
use minpaku_domain::{BookingState, SortOrder, format_date};
use minpaku_ledger::{LedgerEntry, LedgerEvent, ListArgs};
use time::Date;

/// Column to order booking listings by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingOrder {
    /// Order by creation time.
    #[default]
    CreatedAt,
    /// Order by last modification time.
    UpdatedAt,
    /// Order by check-in date.
    Checkin,
    /// Order by check-out date.
    Checkout,
}

/// Filters and pagination for booking listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingQuery {
    /// Restrict to a single state.
    pub state: Option<BookingState>,
    /// Only bookings checking in on or after this date.
    pub date_from: Option<Date>,
    /// Only bookings checking out on or before this date.
    pub date_to: Option<Date>,
    /// Maximum bookings to return; negative means no limit.
    pub limit: i64,
    /// Bookings to skip.
    pub offset: i64,
    /// Ordering column.
    pub order_by: BookingOrder,
    /// Ordering direction.
    pub order: SortOrder,
}

impl Default for BookingQuery {
    fn default() -> Self {
        Self {
            state: None,
            date_from: None,
            date_to: None,
            limit: 20,
            offset: 0,
            order_by: BookingOrder::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

/// Loads a booking by id.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be reconstructed.
pub fn find_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
) -> Result<Option<Booking>, PersistenceError> {
    let row: Option<BookingRow> = bookings::table
        .filter(bookings::id.eq(booking_id))
        .select(BookingRow::as_select())
        .first(conn)
        .optional()?;

    row.map(BookingRow::into_booking).transpose()
}

/// Lists bookings for a property, filtered and paginated.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_bookings_by_property(
    conn: &mut SqliteConnection,
    property_id: i64,
    args: &BookingQuery,
) -> Result<Vec<Booking>, PersistenceError> {
    let mut query = bookings::table
        .filter(bookings::property_id.eq(property_id))
        .select(BookingRow::as_select())
        .into_boxed();

    if let Some(state) = args.state {
        query = query.filter(bookings::state.eq(state.as_str()));
    }
    if let Some(from) = args.date_from {
        query = query.filter(bookings::checkin.ge(format_date(from)));
    }
    if let Some(to) = args.date_to {
        query = query.filter(bookings::checkout.le(format_date(to)));
    }

    query = match (args.order_by, args.order) {
        (BookingOrder::CreatedAt, SortOrder::Asc) => {
            query.order((bookings::created_at.asc(), bookings::id.asc()))
        }
        (BookingOrder::CreatedAt, SortOrder::Desc) => {
            query.order((bookings::created_at.desc(), bookings::id.desc()))
        }
        (BookingOrder::UpdatedAt, SortOrder::Asc) => {
            query.order((bookings::updated_at.asc(), bookings::id.asc()))
        }
        (BookingOrder::UpdatedAt, SortOrder::Desc) => {
            query.order((bookings::updated_at.desc(), bookings::id.desc()))
        }
        (BookingOrder::Checkin, SortOrder::Asc) => {
            query.order((bookings::checkin.asc(), bookings::id.asc()))
        }
        (BookingOrder::Checkin, SortOrder::Desc) => {
            query.order((bookings::checkin.desc(), bookings::id.desc()))
        }
        (BookingOrder::Checkout, SortOrder::Asc) => {
            query.order((bookings::checkout.asc(), bookings::id.asc()))
        }
        (BookingOrder::Checkout, SortOrder::Desc) => {
            query.order((bookings::checkout.desc(), bookings::id.desc()))
        }
    };

    if args.limit >= 0 {
        query = query.limit(args.limit).offset(args.offset);
    } else if args.offset > 0 {
        // SQLite requires a LIMIT clause for OFFSET to apply.
        query = query.limit(i64::MAX).offset(args.offset);
    }

    let rows: Vec<BookingRow> = query.load(conn)?;
    rows.into_iter().map(BookingRow::into_booking).collect()
}

/// Counts bookings for a property under the same filters as the listing.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_bookings_by_property(
    conn: &mut SqliteConnection,
    property_id: i64,
    args: &BookingQuery,
) -> Result<i64, PersistenceError> {
    let mut query = bookings::table
        .filter(bookings::property_id.eq(property_id))
        .count()
        .into_boxed();

    if let Some(state) = args.state {
        query = query.filter(bookings::state.eq(state.as_str()));
    }
    if let Some(from) = args.date_from {
        query = query.filter(bookings::checkin.ge(format_date(from)));
    }
    if let Some(to) = args.date_to {
        query = query.filter(bookings::checkout.le(format_date(to)));
    }

    Ok(query.get_result(conn)?)
}

/// Finds non-cancelled bookings whose stay intersects `[checkin, checkout)`
/// for a property.
///
/// Ranges are half-open: a booking checking out on the given check-in day
/// does not overlap. Bookings without dates never overlap.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn find_overlapping(
    conn: &mut SqliteConnection,
    property_id: i64,
    checkin: Date,
    checkout: Date,
    exclude_id: Option<i64>,
) -> Result<Vec<Booking>, PersistenceError> {
    let mut query = bookings::table
        .filter(bookings::property_id.eq(property_id))
        .filter(bookings::state.ne(BookingState::Cancelled.as_str()))
        .filter(bookings::checkin.lt(format_date(checkout)))
        .filter(bookings::checkout.gt(format_date(checkin)))
        .select(BookingRow::as_select())
        .into_boxed();

    if let Some(id) = exclude_id {
        query = query.filter(bookings::id.ne(id));
    }

    let rows: Vec<BookingRow> = query
        .order((bookings::checkin.asc(), bookings::id.asc()))
        .load(conn)?;
    rows.into_iter().map(BookingRow::into_booking).collect()
}

/// Loads ledger entries for a booking, filtered and paginated per `args`.
///
/// Ordering is by creation time then id, in the requested direction.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn ledger_entries_for_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
    args: &ListArgs,
) -> Result<Vec<LedgerEntry>, PersistenceError> {
    let mut query = ledger_entries::table
        .filter(ledger_entries::booking_id.eq(booking_id))
        .select(LedgerEntryRow::as_select())
        .into_boxed();

    if let Some(event) = args.event {
        query = query.filter(ledger_entries::event.eq(event.as_str()));
    }

    query = match args.order {
        SortOrder::Asc => query.order((ledger_entries::created_at.asc(), ledger_entries::id.asc())),
        SortOrder::Desc => {
            query.order((ledger_entries::created_at.desc(), ledger_entries::id.desc()))
        }
    };

    if args.limit >= 0 {
        query = query.limit(args.limit).offset(args.offset);
    } else if args.offset > 0 {
        // SQLite requires a LIMIT clause for OFFSET to apply.
        query = query.limit(i64::MAX).offset(args.offset);
    }

    let rows: Vec<LedgerEntryRow> = query.load(conn)?;
    rows.into_iter().map(LedgerEntryRow::into_entry).collect()
}

/// Loads a single ledger entry by id.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be reconstructed.
pub fn ledger_entry(
    conn: &mut SqliteConnection,
    entry_id: i64,
) -> Result<Option<LedgerEntry>, PersistenceError> {
    let row: Option<LedgerEntryRow> = ledger_entries::table
        .filter(ledger_entries::id.eq(entry_id))
        .select(LedgerEntryRow::as_select())
        .first(conn)
        .optional()?;

    row.map(LedgerEntryRow::into_entry).transpose()
}

/// Counts ledger entries for a booking, optionally for one event kind.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn ledger_count(
    conn: &mut SqliteConnection,
    booking_id: i64,
    event: Option<LedgerEvent>,
) -> Result<i64, PersistenceError> {
    let mut query = ledger_entries::table
        .filter(ledger_entries::booking_id.eq(booking_id))
        .count()
        .into_boxed();

    if let Some(event) = event {
        query = query.filter(ledger_entries::event.eq(event.as_str()));
    }

    Ok(query.get_result(conn)?)
}

/// Sums ledger amounts for a booking in one currency, optionally for one
/// event kind. Entries in other currencies are ignored.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn ledger_total_amount(
    conn: &mut SqliteConnection,
    booking_id: i64,
    event: Option<LedgerEvent>,
    currency: &str,
) -> Result<f64, PersistenceError> {
    let mut query = ledger_entries::table
        .filter(ledger_entries::booking_id.eq(booking_id))
        .filter(ledger_entries::currency.eq(currency.to_string()))
        .select(sum(ledger_entries::amount))
        .into_boxed();

    if let Some(event) = event {
        query = query.filter(ledger_entries::event.eq(event.as_str()));
    }

    let total: Option<f64> = query.get_result(conn)?;
    Ok(total.unwrap_or(0.0))
}
