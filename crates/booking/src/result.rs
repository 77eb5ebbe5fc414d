// Copyright (C) 2026 Minpaku Suite Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::TransitionError;
use minpaku_domain::{BookingState, MetaMap};
use serde_json::Value;

/// The immutable outcome of a transition attempt.
///
/// Created fresh by every [`Booking::transition_to`](crate::Booking::transition_to)
/// call; never mutated or reused. Callers must check [`is_success`](Self::is_success)
/// before trusting [`new_state`](Self::new_state).
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    new_state: Option<BookingState>,
    error: Option<TransitionError>,
    meta: MetaMap,
}

impl TransitionResult {
    /// Creates a successful transition result.
    #[must_use]
    pub const fn success(new_state: BookingState, meta: MetaMap) -> Self {
        Self {
            new_state: Some(new_state),
            error: None,
            meta,
        }
    }

    /// Creates a failed transition result.
    #[must_use]
    pub const fn failure(error: TransitionError, meta: MetaMap) -> Self {
        Self {
            new_state: None,
            error: Some(error),
            meta,
        }
    }

    /// Whether the transition took effect.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The state after a successful transition. `None` on failure.
    #[must_use]
    pub const fn new_state(&self) -> Option<BookingState> {
        self.new_state
    }

    /// The rejection reason. `None` on success.
    #[must_use]
    pub const fn error(&self) -> Option<&TransitionError> {
        self.error.as_ref()
    }

    /// Stable machine-readable error code. `None` on success.
    #[must_use]
    pub fn error_code(&self) -> Option<&'static str> {
        self.error.as_ref().map(TransitionError::code)
    }

    /// Operator-facing error message. `None` on success.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Transition context: `from`, `to`, `booking_id` and caller extras.
    #[must_use]
    pub const fn meta(&self) -> &MetaMap {
        &self.meta
    }

    /// Looks up a single metadata value by key.
    #[must_use]
    pub fn meta_value(&self, key: &str) -> Option<&Value> {
        self.meta.get(key)
    }
}
