// Copyright (C) 2026 Minpaku Suite Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking lifecycle states and transition rules.
//!
//! Transitions are caller-initiated only; the system never advances a
//! booking based on time alone. The transition table is necessary but not
//! sufficient: the booking entity runs its data-integrity guards on every
//! transition before the table result takes effect.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingState {
    /// Initial state after creation. Full editing allowed.
    #[default]
    Draft,
    /// Submitted and awaiting confirmation.
    Pending,
    /// Confirmed with payment details.
    Confirmed,
    /// Cancelled by guest or operator. Terminal.
    Cancelled,
    /// Stay finished. Terminal.
    Completed,
}

impl BookingState {
    /// All valid states, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Draft,
        Self::Pending,
        Self::Confirmed,
        Self::Cancelled,
        Self::Completed,
    ];

    /// Returns the string representation of the state.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Display label for admin-facing listings.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
            Self::Completed => "Completed",
        }
    }

    /// Parses a state from its string representation.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidBookingState(s.to_string())),
        }
    }

    /// Returns true if this state has no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// The set of states this state may transition to.
    #[must_use]
    pub const fn allowed_targets(&self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Pending],
            Self::Pending => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed => &[Self::Cancelled, Self::Completed],
            Self::Cancelled | Self::Completed => &[],
        }
    }

    /// Checks if a transition from this state to another is in the table.
    ///
    /// Same-state transitions are always false; there are no self-loops.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Pending)
                | (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled | Self::Completed)
        )
    }

    /// Explains why a transition is not allowed.
    ///
    /// Returns `None` when the transition is permitted by the table. The
    /// message is diagnostic text for operators, not a control-flow signal.
    #[must_use]
    pub fn transition_failure_reason(&self, target: Self) -> Option<String> {
        if *self == target {
            return Some(String::from("Source and target states are the same"));
        }
        if self.is_terminal() {
            return Some(format!("Cannot transition from terminal state: {self}"));
        }
        if !self.can_transition_to(target) {
            return Some(format!("Transition from {self} to {target} is not allowed"));
        }
        None
    }
}

impl FromStr for BookingState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for BookingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
