// Copyright (C) 2026 Minpaku Suite Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::TransitionError;
use crate::result::TransitionResult;
use minpaku_domain::{BookingState, MetaMap, format_date, format_datetime};
use serde::Serialize;
use serde_json::Value;
use time::{Date, OffsetDateTime};
use tracing::info;

/// A single reservation record for a property over a date range.
///
/// State changes go only through [`Booking::transition_to`]; field setters
/// refresh `updated_at`. The entity never touches storage and never deletes
/// itself; persistence is the repository's concern.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    /// Storage-assigned identifier. `None` until first save.
    id: Option<i64>,
    property_id: Option<i64>,
    checkin: Option<Date>,
    checkout: Option<Date>,
    adults: u32,
    children: u32,
    state: BookingState,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    meta_data: MetaMap,
}

impl Booking {
    /// Creates an empty draft booking with default field values.
    ///
    /// Defaults: 1 adult, 0 children, `draft` state, both timestamps set to
    /// now, empty metadata.
    #[must_use]
    pub fn new() -> Self {
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        Self {
            id: None,
            property_id: None,
            checkin: None,
            checkout: None,
            adults: 1,
            children: 0,
            state: BookingState::Draft,
            created_at: now,
            updated_at: now,
            meta_data: MetaMap::new(),
        }
    }

    /// Creates a draft booking for a property and stay window.
    #[must_use]
    pub fn with_details(
        property_id: i64,
        checkin: Date,
        checkout: Date,
        adults: u32,
        children: u32,
    ) -> Self {
        let mut booking = Self::new();
        booking.property_id = Some(property_id);
        booking.checkin = Some(checkin);
        booking.checkout = Some(checkout);
        booking.adults = adults.max(1);
        booking.children = children;
        booking
    }

    /// Reconstructs a booking from stored fields.
    ///
    /// Used by the persistence layer. Stored values are taken as-is; the
    /// transition guards still reject incomplete data at the next
    /// transition attempt.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn from_stored(
        id: i64,
        property_id: Option<i64>,
        checkin: Option<Date>,
        checkout: Option<Date>,
        adults: u32,
        children: u32,
        state: BookingState,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
        meta_data: MetaMap,
    ) -> Self {
        Self {
            id: Some(id),
            property_id,
            checkin,
            checkout,
            adults,
            children,
            state,
            created_at,
            updated_at,
            meta_data,
        }
    }

    /// Storage-assigned identifier, if persisted.
    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        self.id
    }

    /// Assigns the storage identifier on first save.
    pub fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    /// The referenced property, if set.
    #[must_use]
    pub const fn property_id(&self) -> Option<i64> {
        self.property_id
    }

    pub fn set_property_id(&mut self, property_id: i64) {
        self.property_id = Some(property_id);
        self.touch();
    }

    /// Check-in date, if set.
    #[must_use]
    pub const fn checkin(&self) -> Option<Date> {
        self.checkin
    }

    pub fn set_checkin(&mut self, checkin: Date) {
        self.checkin = Some(checkin);
        self.touch();
    }

    /// Check-out date, if set.
    #[must_use]
    pub const fn checkout(&self) -> Option<Date> {
        self.checkout
    }

    pub fn set_checkout(&mut self, checkout: Date) {
        self.checkout = Some(checkout);
        self.touch();
    }

    /// Number of adult guests.
    #[must_use]
    pub const fn adults(&self) -> u32 {
        self.adults
    }

    /// Sets the adult count, clamped to a minimum of 1.
    pub fn set_adults(&mut self, adults: u32) {
        self.adults = adults.max(1);
        self.touch();
    }

    /// Number of child guests.
    #[must_use]
    pub const fn children(&self) -> u32 {
        self.children
    }

    pub fn set_children(&mut self, children: u32) {
        self.children = children;
        self.touch();
    }

    /// Total guest count (adults plus children).
    #[must_use]
    pub const fn total_guests(&self) -> u32 {
        self.adults + self.children
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> BookingState {
        self.state
    }

    /// Creation timestamp (UTC).
    #[must_use]
    pub const fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Last-modification timestamp (UTC).
    #[must_use]
    pub const fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    /// All free-form metadata.
    #[must_use]
    pub const fn meta_data(&self) -> &MetaMap {
        &self.meta_data
    }

    /// Looks up a single metadata value by key.
    #[must_use]
    pub fn meta_value(&self, key: &str) -> Option<&Value> {
        self.meta_data.get(key)
    }

    pub fn set_meta_value(&mut self, key: &str, value: Value) {
        self.meta_data.insert(key.to_string(), value);
        self.touch();
    }

    /// Merges the given metadata into the booking's bag, overwriting
    /// existing keys.
    pub fn merge_meta_data(&mut self, meta_data: MetaMap) {
        for (key, value) in meta_data {
            self.meta_data.insert(key, value);
        }
        self.touch();
    }

    /// Number of nights between check-in and check-out.
    ///
    /// Returns 0 if either date is missing or the dates are inverted.
    #[must_use]
    pub fn nights(&self) -> i64 {
        match (self.checkin, self.checkout) {
            (Some(checkin), Some(checkout)) => (checkout - checkin).whole_days().max(0),
            _ => 0,
        }
    }

    /// Whether the booking is in a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Whether the booking may still be edited or transitioned.
    #[must_use]
    pub const fn can_be_modified(&self) -> bool {
        !self.is_terminal()
    }

    /// Produces a full serializable snapshot, including derived fields.
    #[must_use]
    pub fn snapshot(&self) -> BookingSnapshot {
        BookingSnapshot {
            id: self.id,
            property_id: self.property_id,
            checkin: self.checkin.map(format_date),
            checkout: self.checkout.map(format_date),
            adults: self.adults,
            children: self.children,
            total_guests: self.total_guests(),
            nights: self.nights(),
            state: self.state,
            created_at: format_datetime(self.created_at),
            updated_at: format_datetime(self.updated_at),
            meta_data: self.meta_data.clone(),
            is_terminal: self.is_terminal(),
            can_be_modified: self.can_be_modified(),
        }
    }

    /// Attempts to move the booking to a new state.
    ///
    /// The transition table is checked first, then the data-integrity
    /// guards. The guards run for every target, so a table-legal move such
    /// as draft to pending still fails if basic booking data is incomplete.
    /// State and `updated_at` are mutated only after all checks pass.
    pub fn transition_to(&mut self, to: BookingState, meta: MetaMap) -> TransitionResult {
        self.transition_to_at(to, meta, OffsetDateTime::now_utc())
    }

    /// Transition with an explicit clock, for deterministic tests.
    pub(crate) fn transition_to_at(
        &mut self,
        to: BookingState,
        meta: MetaMap,
        now: OffsetDateTime,
    ) -> TransitionResult {
        let from: BookingState = self.state;

        if !from.can_transition_to(to) {
            let reason: String = from.transition_failure_reason(to).unwrap_or_default();
            let mut result_meta = MetaMap::new();
            result_meta.insert(String::from("from"), Value::from(from.as_str()));
            result_meta.insert(String::from("to"), Value::from(to.as_str()));
            result_meta.insert(String::from("booking_id"), id_value(self.id));
            return TransitionResult::failure(
                TransitionError::InvalidTransition { from, to, reason },
                result_meta,
            );
        }

        if let Err(error) = self.validate_transition(to, &meta, now.date()) {
            let mut result_meta: MetaMap = meta;
            result_meta.insert(String::from("from"), Value::from(from.as_str()));
            result_meta.insert(String::from("to"), Value::from(to.as_str()));
            return TransitionResult::failure(error, result_meta);
        }

        self.state = to;
        self.updated_at = now;

        info!(
            booking_id = ?self.id,
            from = from.as_str(),
            to = to.as_str(),
            "Booking state transition"
        );

        let mut result_meta: MetaMap = meta;
        result_meta.insert(String::from("from"), Value::from(from.as_str()));
        result_meta.insert(String::from("to"), Value::from(to.as_str()));
        result_meta.insert(String::from("booking_id"), id_value(self.id));
        result_meta.insert(
            String::from("transitioned_at"),
            Value::from(format_datetime(self.updated_at)),
        );
        TransitionResult::success(to, result_meta)
    }

    /// Data-integrity guards, evaluated in a fixed order; first failure
    /// wins. The four universal checks run for every target, then the
    /// target-specific gate.
    fn validate_transition(
        &self,
        to: BookingState,
        meta: &MetaMap,
        today: Date,
    ) -> Result<(), TransitionError> {
        if self.property_id.is_none() {
            return Err(TransitionError::MissingProperty);
        }

        let (Some(checkin), Some(checkout)) = (self.checkin, self.checkout) else {
            return Err(TransitionError::MissingDates);
        };

        if checkin >= checkout {
            return Err(TransitionError::InvalidDateOrder);
        }

        if self.adults == 0 {
            return Err(TransitionError::InvalidGuestCount);
        }

        match to {
            BookingState::Confirmed => {
                let has_payment_method = meta
                    .get("payment_method")
                    .and_then(Value::as_str)
                    .is_some_and(|method| !method.is_empty());
                if !has_payment_method {
                    return Err(TransitionError::MissingPaymentMethod);
                }
            }
            BookingState::Completed => {
                if checkout > today {
                    return Err(TransitionError::PrematureCompletion);
                }
            }
            BookingState::Draft | BookingState::Pending | BookingState::Cancelled => {}
        }

        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = OffsetDateTime::now_utc();
    }
}

impl Default for Booking {
    fn default() -> Self {
        Self::new()
    }
}

fn id_value(id: Option<i64>) -> Value {
    id.map_or(Value::Null, Value::from)
}

/// Full snapshot of a booking for serialization to callers, including the
/// derived fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSnapshot {
    pub id: Option<i64>,
    pub property_id: Option<i64>,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    pub adults: u32,
    pub children: u32,
    pub total_guests: u32,
    pub nights: i64,
    pub state: BookingState,
    pub created_at: String,
    pub updated_at: String,
    pub meta_data: MetaMap,
    pub is_terminal: bool,
    pub can_be_modified: bool,
}
