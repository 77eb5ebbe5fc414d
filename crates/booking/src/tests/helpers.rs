// Copyright (C) 2026 Minpaku Suite Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Booking;
use minpaku_domain::MetaMap;
use serde_json::Value;
use time::macros::date;

/// A complete draft booking that passes every universal guard.
pub fn valid_booking() -> Booking {
    Booking::with_details(123, date!(2025 - 10 - 01), date!(2025 - 10 - 05), 2, 0)
}

pub fn payment_meta(method: &str) -> MetaMap {
    let mut meta = MetaMap::new();
    meta.insert(String::from("payment_method"), Value::from(method));
    meta
}
