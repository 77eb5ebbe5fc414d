// Copyright (C) 2026 Minpaku Suite Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Diesel row types and their conversions to and from domain values.
//!
//! Dates are stored as `YYYY-MM-DD` and timestamps as
//! `YYYY-MM-DD HH:MM:SS` text so that lexicographic comparison matches
//! chronological order. Metadata bags are stored as JSON text.

use crate::diesel_schema::{bookings, ledger_entries};
use crate::error::PersistenceError;
use diesel::prelude::*;
use minpaku_booking::Booking;
use minpaku_domain::{
    BookingState, MetaMap, format_date, format_datetime, parse_date, parse_datetime,
};
use minpaku_ledger::{LedgerEntry, LedgerEvent};
use std::str::FromStr;

/// Row read from the `bookings` table.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = bookings)]
pub struct BookingRow {
    pub id: i64,
    pub property_id: Option<i64>,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    pub adults: i32,
    pub children: i32,
    pub state: String,
    pub created_at: String,
    pub updated_at: String,
    pub meta_json: String,
}

impl BookingRow {
    /// Reconstructs the domain entity from a stored row.
    ///
    /// # Errors
    ///
    /// Returns a `ReconstructionError` if the stored state, dates,
    /// timestamps or metadata JSON cannot be parsed.
    pub fn into_booking(self) -> Result<Booking, PersistenceError> {
        let state = BookingState::from_str(&self.state)?;
        let checkin = self.checkin.as_deref().map(parse_date).transpose()?;
        let checkout = self.checkout.as_deref().map(parse_date).transpose()?;
        let created_at = parse_datetime(&self.created_at)?;
        let updated_at = parse_datetime(&self.updated_at)?;
        let meta_data: MetaMap = serde_json::from_str(&self.meta_json)?;

        Ok(Booking::from_stored(
            self.id,
            self.property_id,
            checkin,
            checkout,
            u32::try_from(self.adults).unwrap_or(0),
            u32::try_from(self.children).unwrap_or(0),
            state,
            created_at,
            updated_at,
            meta_data,
        ))
    }
}

/// Row written to the `bookings` table, for both inserts and updates.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = bookings)]
#[diesel(treat_none_as_null = true)]
pub struct NewBookingRow {
    pub property_id: Option<i64>,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    pub adults: i32,
    pub children: i32,
    pub state: String,
    pub created_at: String,
    pub updated_at: String,
    pub meta_json: String,
}

impl NewBookingRow {
    /// Flattens a booking into its storage representation.
    ///
    /// # Errors
    ///
    /// Returns a `SerializationError` if the metadata bag cannot be
    /// encoded as JSON.
    pub fn from_booking(booking: &Booking) -> Result<Self, PersistenceError> {
        Ok(Self {
            property_id: booking.property_id(),
            checkin: booking.checkin().map(format_date),
            checkout: booking.checkout().map(format_date),
            adults: i32::try_from(booking.adults()).unwrap_or(i32::MAX),
            children: i32::try_from(booking.children()).unwrap_or(i32::MAX),
            state: booking.state().as_str().to_string(),
            created_at: format_datetime(booking.created_at()),
            updated_at: format_datetime(booking.updated_at()),
            meta_json: serde_json::to_string(booking.meta_data())?,
        })
    }
}

/// Row read from the `ledger_entries` table.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = ledger_entries)]
pub struct LedgerEntryRow {
    pub id: i64,
    pub booking_id: i64,
    pub event: String,
    pub amount: f64,
    pub currency: String,
    pub meta_json: String,
    pub created_at: String,
}

impl LedgerEntryRow {
    /// Reconstructs the ledger entry from a stored row.
    ///
    /// # Errors
    ///
    /// Returns a `ReconstructionError` if the stored event kind, timestamp
    /// or metadata JSON cannot be parsed.
    pub fn into_entry(self) -> Result<LedgerEntry, PersistenceError> {
        let event = LedgerEvent::from_str(&self.event)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
        let created_at = parse_datetime(&self.created_at)?;
        let meta_data: MetaMap = serde_json::from_str(&self.meta_json)?;

        Ok(LedgerEntry {
            id: self.id,
            booking_id: self.booking_id,
            event,
            amount: self.amount,
            currency: self.currency,
            meta_data,
            created_at,
        })
    }
}

/// Row written to the `ledger_entries` table. Append-only; there is no
/// changeset type for this table.
#[derive(Debug, Insertable)]
#[diesel(table_name = ledger_entries)]
pub struct NewLedgerEntryRow {
    pub booking_id: i64,
    pub event: String,
    pub amount: f64,
    pub currency: String,
    pub meta_json: String,
    pub created_at: String,
}
