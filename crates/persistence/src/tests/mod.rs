// Copyright (C) 2026 Minpaku Suite Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::float_cmp)]

mod booking_repository_tests;
mod ledger_tests;

use crate::Persistence;
use minpaku_booking::Booking;
use time::macros::date;

pub fn memory_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

/// A complete draft booking for the given property, 2025-10-01 to
/// 2025-10-05, two adults and one child.
pub fn sample_booking(property_id: i64) -> Booking {
    Booking::with_details(
        property_id,
        date!(2025 - 10 - 01),
        date!(2025 - 10 - 05),
        2,
        1,
    )
}
