// Copyright (C) 2026 Minpaku Suite Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

diesel::table! {
    bookings (id) {
        id -> BigInt,
        property_id -> Nullable<BigInt>,
        checkin -> Nullable<Text>,
        checkout -> Nullable<Text>,
        adults -> Integer,
        children -> Integer,
        state -> Text,
        created_at -> Text,
        updated_at -> Text,
        meta_json -> Text,
    }
}

diesel::table! {
    ledger_entries (id) {
        id -> BigInt,
        booking_id -> BigInt,
        event -> Text,
        amount -> Double,
        currency -> Text,
        meta_json -> Text,
        created_at -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(bookings, ledger_entries);
