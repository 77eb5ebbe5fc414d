// Copyright (C) 2026 Minpaku Suite Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod booking_state;
mod dates;
mod error;
mod sort_order;

pub use booking_state::BookingState;
pub use dates::{format_date, format_datetime, parse_date, parse_datetime};
pub use error::DomainError;
pub use sort_order::SortOrder;

/// Free-form metadata bag attached to bookings, transition results and
/// ledger entries.
///
/// Callers legitimately attach heterogeneous context (payment methods,
/// channel identifiers, operator notes), so this stays a generic key to
/// JSON-value map rather than a closed struct.
pub type MetaMap = serde_json::Map<String, serde_json::Value>;
