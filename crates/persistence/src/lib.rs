// Copyright (C) 2026 Minpaku Suite Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Minpaku Suite booking core.
//!
//! This crate persists bookings and their ledger entries to `SQLite` via
//! Diesel, with embedded migrations. The [`Persistence`] adapter owns its
//! connection; nothing in the workspace reaches into a global database
//! handle.
//!
//! In-memory databases (one unique shared-memory database per call) back
//! the standard tests; file-based databases enable WAL mode and verify
//! foreign-key enforcement at startup.
//!
//! Concurrency note: bookings carry no version token. Two processes that
//! load, transition and save the same booking race last-write-wins at this
//! layer. Callers needing race safety must add compare-and-swap on top.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use minpaku_booking::Booking;
use minpaku_domain::{BookingState, MetaMap, format_datetime};
use minpaku_ledger::{LedgerEntry, LedgerEvent, LedgerSummary, ListArgs, validate_booking_id};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, OffsetDateTime};
use tracing::{error, info, warn};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use queries::{BookingOrder, BookingQuery};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID, so
/// tests are isolated without time-based collisions.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for bookings and ledger entries.
///
/// Owns a single `SQLite` connection selected at construction time.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a persistence adapter backed by an in-memory database.
    ///
    /// Each call receives its own shared-memory database instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("minpaku_memdb_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::initialize_database(&shared_memory_url)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a persistence adapter backed by a `SQLite` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::initialize_database(path_str)?;
        backend::enable_wal_mode(&mut conn)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Booking repository
    // ========================================================================

    /// Loads a booking by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row cannot be
    /// reconstructed.
    pub fn find_booking(&mut self, booking_id: i64) -> Result<Option<Booking>, PersistenceError> {
        queries::find_booking(&mut self.conn, booking_id)
    }

    /// Saves a booking, assigning an id on first save.
    ///
    /// Returns the booking's id. A booking with an id is updated in place;
    /// a booking without one is inserted and receives its id.
    ///
    /// # Errors
    ///
    /// Returns `BookingNotFound` when updating a booking whose row no
    /// longer exists, or an error if the write fails.
    pub fn save_booking(&mut self, booking: &mut Booking) -> Result<i64, PersistenceError> {
        let row = data_models::NewBookingRow::from_booking(booking)?;

        match booking.id() {
            Some(id) => {
                mutations::update_booking(&mut self.conn, id, &row)?;
                Ok(id)
            }
            None => {
                let id = mutations::insert_booking(&mut self.conn, &row)?;
                booking.set_id(id);
                info!(booking_id = id, "Booking created");
                Ok(id)
            }
        }
    }

    /// Lists bookings for a property, filtered and paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be
    /// reconstructed.
    pub fn list_bookings_by_property(
        &mut self,
        property_id: i64,
        args: &BookingQuery,
    ) -> Result<Vec<Booking>, PersistenceError> {
        queries::list_bookings_by_property(&mut self.conn, property_id, args)
    }

    /// Counts bookings for a property under the listing filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_bookings_by_property(
        &mut self,
        property_id: i64,
        args: &BookingQuery,
    ) -> Result<i64, PersistenceError> {
        queries::count_bookings_by_property(&mut self.conn, property_id, args)
    }

    /// Finds non-cancelled bookings overlapping `[checkin, checkout)` for a
    /// property, optionally excluding one booking id.
    ///
    /// Callers use this to enforce no-double-booking before transitioning;
    /// the booking entity itself performs no overlap checking.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be
    /// reconstructed.
    pub fn find_overlapping(
        &mut self,
        property_id: i64,
        checkin: Date,
        checkout: Date,
        exclude_id: Option<i64>,
    ) -> Result<Vec<Booking>, PersistenceError> {
        queries::find_overlapping(&mut self.conn, property_id, checkin, checkout, exclude_id)
    }

    /// Deletes a booking.
    ///
    /// Without `force`, only draft bookings may be deleted. Ledger entries
    /// are not removed here; call
    /// [`ledger_delete_for_booking`](Self::ledger_delete_for_booking)
    /// alongside when tearing a booking down completely.
    ///
    /// # Errors
    ///
    /// Returns `BookingNotFound` if the booking does not exist, or
    /// `CannotDeleteBooking` for a non-draft booking without `force`.
    pub fn delete_booking(&mut self, booking_id: i64, force: bool) -> Result<(), PersistenceError> {
        let booking = self
            .find_booking(booking_id)?
            .ok_or(PersistenceError::BookingNotFound(booking_id))?;

        if !force && booking.state() != BookingState::Draft {
            return Err(PersistenceError::CannotDeleteBooking {
                id: booking_id,
                state: booking.state(),
            });
        }

        let deleted = mutations::delete_booking_row(&mut self.conn, booking_id)?;
        if deleted == 0 {
            return Err(PersistenceError::BookingNotFound(booking_id));
        }

        info!(booking_id, force, "Booking deleted");
        Ok(())
    }

    // ========================================================================
    // Ledger
    // ========================================================================

    /// Appends a ledger entry for a booking and returns the assigned entry
    /// id.
    ///
    /// Nothing is written when validation rejects the booking id. Event
    /// validity is enforced by the [`LedgerEvent`] type; callers accepting
    /// strings parse them at their own boundary.
    ///
    /// # Errors
    ///
    /// Returns `LedgerViolation` for a non-positive booking id, or an
    /// error if the write fails.
    pub fn ledger_append(
        &mut self,
        booking_id: i64,
        event: LedgerEvent,
        amount: f64,
        currency: &str,
        meta: MetaMap,
    ) -> Result<i64, PersistenceError> {
        if let Err(violation) = validate_booking_id(booking_id) {
            warn!(booking_id, event = event.as_str(), %violation, "Ledger append rejected");
            return Err(violation.into());
        }

        let row = data_models::NewLedgerEntryRow {
            booking_id,
            event: event.as_str().to_string(),
            amount,
            currency: currency.to_string(),
            meta_json: serde_json::to_string(&meta)?,
            created_at: format_datetime(OffsetDateTime::now_utc()),
        };

        let entry_id = match mutations::append_ledger_entry(&mut self.conn, &row) {
            Ok(id) => id,
            Err(e) => {
                error!(booking_id, event = event.as_str(), %e, "Failed to append ledger entry");
                return Err(e);
            }
        };

        info!(
            entry_id,
            booking_id,
            event = event.as_str(),
            amount,
            currency,
            "Ledger entry created"
        );
        Ok(entry_id)
    }

    /// Lists ledger entries for a booking, filtered and paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be
    /// reconstructed.
    pub fn ledger_entries(
        &mut self,
        booking_id: i64,
        args: &ListArgs,
    ) -> Result<Vec<LedgerEntry>, PersistenceError> {
        queries::ledger_entries_for_booking(&mut self.conn, booking_id, args)
    }

    /// Loads a single ledger entry by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be
    /// reconstructed.
    pub fn ledger_entry(
        &mut self,
        entry_id: i64,
    ) -> Result<Option<LedgerEntry>, PersistenceError> {
        queries::ledger_entry(&mut self.conn, entry_id)
    }

    /// Counts ledger entries for a booking, optionally for one event kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn ledger_count(
        &mut self,
        booking_id: i64,
        event: Option<LedgerEvent>,
    ) -> Result<i64, PersistenceError> {
        queries::ledger_count(&mut self.conn, booking_id, event)
    }

    /// Sums ledger amounts for a booking in one currency, optionally for
    /// one event kind. Entries in other currencies are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn ledger_total_amount(
        &mut self,
        booking_id: i64,
        event: Option<LedgerEvent>,
        currency: &str,
    ) -> Result<f64, PersistenceError> {
        queries::ledger_total_amount(&mut self.conn, booking_id, event, currency)
    }

    /// Summarizes a booking's full ledger.
    ///
    /// Scans the complete unpaginated entry list rather than issuing
    /// aggregate queries, so cost is linear in the booking's entry count.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be
    /// reconstructed.
    pub fn ledger_summary(&mut self, booking_id: i64) -> Result<LedgerSummary, PersistenceError> {
        let entries = self.ledger_entries(booking_id, &ListArgs::unbounded())?;
        Ok(minpaku_ledger::summarize(&entries))
    }

    /// Removes all ledger entries for a booking, for use when the booking
    /// itself is deleted. Not undoable.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn ledger_delete_for_booking(
        &mut self,
        booking_id: i64,
    ) -> Result<usize, PersistenceError> {
        let deleted = mutations::delete_ledger_for_booking(&mut self.conn, booking_id)?;
        info!(booking_id, deleted, "Ledger entries deleted for booking");
        Ok(deleted)
    }
}
