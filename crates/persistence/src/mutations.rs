// Copyright (C) 2026 Minpaku Suite Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write-side mutations for bookings and ledger entries.
//!
//! Ledger rows are insert-only and bulk-delete-only; nothing here updates
//! an existing ledger row.

use crate::backend;
use crate::data_models::{NewBookingRow, NewLedgerEntryRow};
use crate::diesel_schema::{bookings, ledger_entries};
use crate::error::PersistenceError;
use diesel::prelude::*;

/// Inserts a new booking row and returns the assigned id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_booking(
    conn: &mut SqliteConnection,
    row: &NewBookingRow,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(bookings::table)
        .values(row)
        .execute(conn)?;

    backend::last_insert_rowid(conn)
}

/// Overwrites an existing booking row.
///
/// # Errors
///
/// Returns `BookingNotFound` if no row has the given id, or an error if
/// the update fails.
pub fn update_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
    row: &NewBookingRow,
) -> Result<(), PersistenceError> {
    let updated = diesel::update(bookings::table.filter(bookings::id.eq(booking_id)))
        .set(row)
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::BookingNotFound(booking_id));
    }
    Ok(())
}

/// Deletes a booking row. Returns the number of rows removed.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_booking_row(
    conn: &mut SqliteConnection,
    booking_id: i64,
) -> Result<usize, PersistenceError> {
    Ok(diesel::delete(bookings::table.filter(bookings::id.eq(booking_id))).execute(conn)?)
}

/// Appends a ledger entry row and returns the assigned id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn append_ledger_entry(
    conn: &mut SqliteConnection,
    row: &NewLedgerEntryRow,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(ledger_entries::table)
        .values(row)
        .execute(conn)?;

    backend::last_insert_rowid(conn)
}

/// Removes all ledger entries for a booking. Returns the number of rows
/// removed.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_ledger_for_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
) -> Result<usize, PersistenceError> {
    Ok(
        diesel::delete(ledger_entries::table.filter(ledger_entries::booking_id.eq(booking_id)))
            .execute(conn)?,
    )
}
