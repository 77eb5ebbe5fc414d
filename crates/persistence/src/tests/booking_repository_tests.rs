// Copyright (C) 2026 Minpaku Suite Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for booking persistence: save/find round trips, deletion rules,
//! listing filters and overlap detection.

use super::{memory_persistence, sample_booking};
use crate::{BookingOrder, BookingQuery, PersistenceError};
use minpaku_booking::Booking;
use minpaku_domain::{BookingState, MetaMap, SortOrder, format_datetime};
use serde_json::Value;
use time::macros::date;

#[test]
fn test_first_save_assigns_an_id() {
    let mut persistence = memory_persistence();
    let mut booking = sample_booking(100);
    assert_eq!(booking.id(), None);

    let id = persistence.save_booking(&mut booking).unwrap();

    assert!(id > 0);
    assert_eq!(booking.id(), Some(id));
}

#[test]
fn test_save_then_find_round_trips_all_fields() {
    let mut persistence = memory_persistence();
    let mut booking = sample_booking(100);
    booking.set_meta_value("source", Value::from("portal"));
    let id = persistence.save_booking(&mut booking).unwrap();

    let loaded = persistence.find_booking(id).unwrap().unwrap();

    assert_eq!(loaded.id(), Some(id));
    assert_eq!(loaded.property_id(), Some(100));
    assert_eq!(loaded.checkin(), Some(date!(2025 - 10 - 01)));
    assert_eq!(loaded.checkout(), Some(date!(2025 - 10 - 05)));
    assert_eq!(loaded.adults(), 2);
    assert_eq!(loaded.children(), 1);
    assert_eq!(loaded.state(), BookingState::Draft);
    assert_eq!(
        loaded.meta_value("source").and_then(|v| v.as_str()),
        Some("portal")
    );
    // Timestamps round-trip at second precision.
    assert_eq!(
        format_datetime(loaded.created_at()),
        format_datetime(booking.created_at())
    );
}

#[test]
fn test_second_save_updates_in_place() {
    let mut persistence = memory_persistence();
    let mut booking = sample_booking(100);
    let id = persistence.save_booking(&mut booking).unwrap();

    booking.set_children(3);
    booking.set_checkout(date!(2025 - 10 - 07));
    let second_id = persistence.save_booking(&mut booking).unwrap();

    assert_eq!(second_id, id);
    let loaded = persistence.find_booking(id).unwrap().unwrap();
    assert_eq!(loaded.children(), 3);
    assert_eq!(loaded.checkout(), Some(date!(2025 - 10 - 07)));
}

#[test]
fn test_state_survives_a_save_reload_cycle() {
    let mut persistence = memory_persistence();
    let mut booking = sample_booking(100);
    assert!(
        booking
            .transition_to(BookingState::Pending, MetaMap::new())
            .is_success()
    );
    let id = persistence.save_booking(&mut booking).unwrap();

    let loaded = persistence.find_booking(id).unwrap().unwrap();

    assert_eq!(loaded.state(), BookingState::Pending);
}

#[test]
fn test_find_missing_booking_returns_none() {
    let mut persistence = memory_persistence();

    assert_eq!(persistence.find_booking(9999).unwrap(), None);
}

#[test]
fn test_update_of_vanished_booking_fails() {
    let mut persistence = memory_persistence();
    let mut booking = sample_booking(100);
    let id = persistence.save_booking(&mut booking).unwrap();
    persistence.delete_booking(id, false).unwrap();

    let result = persistence.save_booking(&mut booking);

    assert_eq!(result, Err(PersistenceError::BookingNotFound(id)));
}

#[test]
fn test_draft_booking_can_be_deleted() {
    let mut persistence = memory_persistence();
    let mut booking = sample_booking(100);
    let id = persistence.save_booking(&mut booking).unwrap();

    persistence.delete_booking(id, false).unwrap();

    assert_eq!(persistence.find_booking(id).unwrap(), None);
}

#[test]
fn test_non_draft_booking_needs_force_to_delete() {
    let mut persistence = memory_persistence();
    let mut booking = sample_booking(100);
    booking.transition_to(BookingState::Pending, MetaMap::new());
    let id = persistence.save_booking(&mut booking).unwrap();

    let refused = persistence.delete_booking(id, false);
    assert_eq!(
        refused,
        Err(PersistenceError::CannotDeleteBooking {
            id,
            state: BookingState::Pending
        })
    );

    persistence.delete_booking(id, true).unwrap();
    assert_eq!(persistence.find_booking(id).unwrap(), None);
}

#[test]
fn test_delete_missing_booking_fails() {
    let mut persistence = memory_persistence();

    let result = persistence.delete_booking(424_242, false);

    assert_eq!(result, Err(PersistenceError::BookingNotFound(424_242)));
}

#[test]
fn test_list_by_property_only_returns_that_property() {
    let mut persistence = memory_persistence();
    for _ in 0..3 {
        persistence.save_booking(&mut sample_booking(100)).unwrap();
    }
    persistence.save_booking(&mut sample_booking(200)).unwrap();

    let listed = persistence
        .list_bookings_by_property(100, &BookingQuery::default())
        .unwrap();

    assert_eq!(listed.len(), 3);
    assert!(listed.iter().all(|b| b.property_id() == Some(100)));
}

#[test]
fn test_list_by_property_filters_on_state() {
    let mut persistence = memory_persistence();
    let mut pending = sample_booking(100);
    pending.transition_to(BookingState::Pending, MetaMap::new());
    persistence.save_booking(&mut pending).unwrap();
    persistence.save_booking(&mut sample_booking(100)).unwrap();

    let query = BookingQuery {
        state: Some(BookingState::Pending),
        ..BookingQuery::default()
    };
    let listed = persistence.list_bookings_by_property(100, &query).unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].state(), BookingState::Pending);
}

#[test]
fn test_list_by_property_filters_on_date_bounds() {
    let mut persistence = memory_persistence();
    let mut september =
        Booking::with_details(100, date!(2025 - 09 - 01), date!(2025 - 09 - 04), 1, 0);
    persistence.save_booking(&mut september).unwrap();
    let mut october = sample_booking(100);
    persistence.save_booking(&mut october).unwrap();

    let query = BookingQuery {
        date_from: Some(date!(2025 - 10 - 01)),
        ..BookingQuery::default()
    };
    let listed = persistence.list_bookings_by_property(100, &query).unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].checkin(), Some(date!(2025 - 10 - 01)));
}

#[test]
fn test_list_by_property_orders_and_paginates_by_checkin() {
    let mut persistence = memory_persistence();
    for day in [5_u8, 1, 9] {
        let mut booking = Booking::with_details(
            100,
            date!(2025 - 11 - 01).replace_day(day).unwrap(),
            date!(2025 - 11 - 15),
            1,
            0,
        );
        persistence.save_booking(&mut booking).unwrap();
    }

    let query = BookingQuery {
        order_by: BookingOrder::Checkin,
        order: SortOrder::Asc,
        limit: 2,
        offset: 1,
        ..BookingQuery::default()
    };
    let listed = persistence.list_bookings_by_property(100, &query).unwrap();

    let checkins: Vec<_> = listed.iter().filter_map(Booking::checkin).collect();
    assert_eq!(
        checkins,
        vec![date!(2025 - 11 - 05), date!(2025 - 11 - 09)]
    );
}

#[test]
fn test_count_by_property_honors_filters() {
    let mut persistence = memory_persistence();
    let mut pending = sample_booking(100);
    pending.transition_to(BookingState::Pending, MetaMap::new());
    persistence.save_booking(&mut pending).unwrap();
    persistence.save_booking(&mut sample_booking(100)).unwrap();

    let all = persistence
        .count_bookings_by_property(100, &BookingQuery::default())
        .unwrap();
    let pending_only = persistence
        .count_bookings_by_property(
            100,
            &BookingQuery {
                state: Some(BookingState::Pending),
                ..BookingQuery::default()
            },
        )
        .unwrap();

    assert_eq!(all, 2);
    assert_eq!(pending_only, 1);
}

#[test]
fn test_find_overlapping_detects_intersecting_stays() {
    let mut persistence = memory_persistence();
    let mut booking = sample_booking(100);
    persistence.save_booking(&mut booking).unwrap();

    let overlapping = persistence
        .find_overlapping(100, date!(2025 - 10 - 04), date!(2025 - 10 - 08), None)
        .unwrap();

    assert_eq!(overlapping.len(), 1);
    assert_eq!(overlapping[0].id(), booking.id());
}

#[test]
fn test_find_overlapping_treats_ranges_as_half_open() {
    let mut persistence = memory_persistence();
    persistence.save_booking(&mut sample_booking(100)).unwrap();

    // Checking in on the existing booking's check-out day is fine.
    let overlapping = persistence
        .find_overlapping(100, date!(2025 - 10 - 05), date!(2025 - 10 - 08), None)
        .unwrap();

    assert!(overlapping.is_empty());
}

#[test]
fn test_find_overlapping_ignores_cancelled_bookings() {
    let mut persistence = memory_persistence();
    let mut booking = sample_booking(100);
    booking.transition_to(BookingState::Pending, MetaMap::new());
    booking.transition_to(BookingState::Cancelled, MetaMap::new());
    persistence.save_booking(&mut booking).unwrap();

    let overlapping = persistence
        .find_overlapping(100, date!(2025 - 10 - 01), date!(2025 - 10 - 05), None)
        .unwrap();

    assert!(overlapping.is_empty());
}

#[test]
fn test_find_overlapping_ignores_other_properties() {
    let mut persistence = memory_persistence();
    persistence.save_booking(&mut sample_booking(200)).unwrap();

    let overlapping = persistence
        .find_overlapping(100, date!(2025 - 10 - 01), date!(2025 - 10 - 05), None)
        .unwrap();

    assert!(overlapping.is_empty());
}

#[test]
fn test_find_overlapping_excludes_the_given_booking() {
    let mut persistence = memory_persistence();
    let mut booking = sample_booking(100);
    let id = persistence.save_booking(&mut booking).unwrap();

    let overlapping = persistence
        .find_overlapping(100, date!(2025 - 10 - 01), date!(2025 - 10 - 05), Some(id))
        .unwrap();

    assert!(overlapping.is_empty());
}
