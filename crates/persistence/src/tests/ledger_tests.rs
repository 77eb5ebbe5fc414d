// Copyright (C) 2026 Minpaku Suite Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for ledger persistence: append validation, listing, aggregation,
//! summaries and bulk deletion.

use super::memory_persistence;
use crate::PersistenceError;
use minpaku_domain::{MetaMap, SortOrder};
use minpaku_ledger::{DEFAULT_CURRENCY, LedgerError, LedgerEvent, ListArgs};
use serde_json::Value;

fn card_meta() -> MetaMap {
    let mut meta = MetaMap::new();
    meta.insert(String::from("method"), Value::from("card"));
    meta
}

#[test]
fn test_append_returns_sequential_entry_ids() {
    let mut persistence = memory_persistence();

    let first = persistence
        .ledger_append(1, LedgerEvent::Reserve, 0.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();
    let second = persistence
        .ledger_append(1, LedgerEvent::Payment, 15000.0, DEFAULT_CURRENCY, card_meta())
        .unwrap();

    assert!(first > 0);
    assert!(second > first);
}

#[test]
fn test_append_rejects_non_positive_booking_ids_without_writing() {
    let mut persistence = memory_persistence();

    for bad_id in [0, -7] {
        let result = persistence.ledger_append(
            bad_id,
            LedgerEvent::Payment,
            100.0,
            DEFAULT_CURRENCY,
            MetaMap::new(),
        );
        assert_eq!(
            result,
            Err(PersistenceError::LedgerViolation(
                LedgerError::InvalidBookingId(bad_id)
            ))
        );
        assert_eq!(persistence.ledger_count(bad_id, None).unwrap(), 0);
    }
}

#[test]
fn test_entry_round_trips_metadata_and_fields() {
    let mut persistence = memory_persistence();
    let entry_id = persistence
        .ledger_append(1, LedgerEvent::Payment, 15000.0, DEFAULT_CURRENCY, card_meta())
        .unwrap();

    let entry = persistence.ledger_entry(entry_id).unwrap().unwrap();

    assert_eq!(entry.id, entry_id);
    assert_eq!(entry.booking_id, 1);
    assert_eq!(entry.event, LedgerEvent::Payment);
    assert_eq!(entry.amount, 15000.0);
    assert_eq!(entry.currency, "JPY");
    assert_eq!(
        entry.meta_data.get("method").and_then(|v| v.as_str()),
        Some("card")
    );
    assert_eq!(entry.event_label(), "Payment");
    assert_eq!(entry.formatted_amount(), "15,000 JPY");
}

#[test]
fn test_missing_entry_returns_none() {
    let mut persistence = memory_persistence();

    assert_eq!(persistence.ledger_entry(9999).unwrap(), None);
}

#[test]
fn test_list_defaults_to_newest_first() {
    let mut persistence = memory_persistence();
    persistence
        .ledger_append(1, LedgerEvent::Payment, 15000.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();
    persistence
        .ledger_append(1, LedgerEvent::Refund, -5000.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();

    let entries = persistence.ledger_entries(1, &ListArgs::default()).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].event, LedgerEvent::Refund);
    assert_eq!(entries[1].event, LedgerEvent::Payment);
}

#[test]
fn test_list_filters_by_event_kind() {
    let mut persistence = memory_persistence();
    persistence
        .ledger_append(1, LedgerEvent::Payment, 1000.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();
    persistence
        .ledger_append(1, LedgerEvent::Note, 0.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();
    persistence
        .ledger_append(1, LedgerEvent::Payment, 500.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();

    let args = ListArgs {
        event: Some(LedgerEvent::Payment),
        ..ListArgs::default()
    };
    let entries = persistence.ledger_entries(1, &args).unwrap();

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.event == LedgerEvent::Payment));
}

#[test]
fn test_list_paginates_in_ascending_order() {
    let mut persistence = memory_persistence();
    for amount in [100.0, 200.0, 300.0, 400.0] {
        persistence
            .ledger_append(1, LedgerEvent::Payment, amount, DEFAULT_CURRENCY, MetaMap::new())
            .unwrap();
    }

    let args = ListArgs {
        limit: 2,
        offset: 1,
        order: SortOrder::Asc,
        ..ListArgs::default()
    };
    let entries = persistence.ledger_entries(1, &args).unwrap();

    let amounts: Vec<f64> = entries.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, vec![200.0, 300.0]);
}

#[test]
fn test_list_scopes_to_the_booking() {
    let mut persistence = memory_persistence();
    persistence
        .ledger_append(1, LedgerEvent::Payment, 1000.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();
    persistence
        .ledger_append(2, LedgerEvent::Payment, 2000.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();

    let entries = persistence.ledger_entries(1, &ListArgs::default()).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].booking_id, 1);
}

#[test]
fn test_count_with_and_without_event_filter() {
    let mut persistence = memory_persistence();
    persistence
        .ledger_append(1, LedgerEvent::Payment, 1000.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();
    persistence
        .ledger_append(1, LedgerEvent::Refund, -300.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();

    assert_eq!(persistence.ledger_count(1, None).unwrap(), 2);
    assert_eq!(
        persistence
            .ledger_count(1, Some(LedgerEvent::Refund))
            .unwrap(),
        1
    );
    assert_eq!(
        persistence
            .ledger_count(1, Some(LedgerEvent::Note))
            .unwrap(),
        0
    );
}

#[test]
fn test_total_amount_sums_signed_amounts() {
    let mut persistence = memory_persistence();
    for amount in [1000.0, -300.0, 500.0] {
        persistence
            .ledger_append(1, LedgerEvent::Adjustment, amount, DEFAULT_CURRENCY, MetaMap::new())
            .unwrap();
    }

    let total = persistence
        .ledger_total_amount(1, None, DEFAULT_CURRENCY)
        .unwrap();

    assert_eq!(total, 1200.0);
}

#[test]
fn test_total_amount_for_payment_minus_refund() {
    let mut persistence = memory_persistence();
    persistence
        .ledger_append(1, LedgerEvent::Payment, 15000.0, DEFAULT_CURRENCY, card_meta())
        .unwrap();
    persistence
        .ledger_append(1, LedgerEvent::Refund, -5000.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();

    let total = persistence
        .ledger_total_amount(1, None, DEFAULT_CURRENCY)
        .unwrap();

    assert_eq!(total, 10000.0);
}

#[test]
fn test_total_amount_ignores_other_currencies() {
    let mut persistence = memory_persistence();
    persistence
        .ledger_append(1, LedgerEvent::Payment, 1000.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();
    persistence
        .ledger_append(1, LedgerEvent::Payment, 50.0, "USD", MetaMap::new())
        .unwrap();

    assert_eq!(
        persistence
            .ledger_total_amount(1, None, DEFAULT_CURRENCY)
            .unwrap(),
        1000.0
    );
    assert_eq!(
        persistence.ledger_total_amount(1, None, "USD").unwrap(),
        50.0
    );
}

#[test]
fn test_total_amount_filters_by_event() {
    let mut persistence = memory_persistence();
    persistence
        .ledger_append(1, LedgerEvent::Payment, 1000.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();
    persistence
        .ledger_append(1, LedgerEvent::Payment, 500.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();
    persistence
        .ledger_append(1, LedgerEvent::Refund, -300.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();

    let payments = persistence
        .ledger_total_amount(1, Some(LedgerEvent::Payment), DEFAULT_CURRENCY)
        .unwrap();

    assert_eq!(payments, 1500.0);
}

#[test]
fn test_total_amount_is_zero_for_empty_ledger() {
    let mut persistence = memory_persistence();

    assert_eq!(
        persistence
            .ledger_total_amount(1, None, DEFAULT_CURRENCY)
            .unwrap(),
        0.0
    );
}

#[test]
fn test_summary_aggregates_the_full_ledger() {
    let mut persistence = memory_persistence();
    let first_id = persistence
        .ledger_append(1, LedgerEvent::Reserve, 0.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();
    persistence
        .ledger_append(1, LedgerEvent::Payment, 15000.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();
    let last_id = persistence
        .ledger_append(1, LedgerEvent::Refund, -5000.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();

    let summary = persistence.ledger_summary(1).unwrap();

    assert_eq!(summary.total_entries, 3);
    assert_eq!(summary.events.get(&LedgerEvent::Payment), Some(&1));
    assert_eq!(summary.events.get(&LedgerEvent::Reserve), Some(&1));
    assert_eq!(summary.amounts.get("JPY"), Some(&10000.0));
    assert_eq!(summary.first_entry.as_ref().map(|e| e.id), Some(first_id));
    assert_eq!(summary.last_entry.as_ref().map(|e| e.id), Some(last_id));
}

#[test]
fn test_delete_for_booking_removes_only_that_booking() {
    let mut persistence = memory_persistence();
    persistence
        .ledger_append(1, LedgerEvent::Payment, 1000.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();
    persistence
        .ledger_append(1, LedgerEvent::Refund, -200.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();
    persistence
        .ledger_append(2, LedgerEvent::Payment, 900.0, DEFAULT_CURRENCY, MetaMap::new())
        .unwrap();

    let deleted = persistence.ledger_delete_for_booking(1).unwrap();

    assert_eq!(deleted, 2);
    assert_eq!(persistence.ledger_count(1, None).unwrap(), 0);
    assert_eq!(persistence.ledger_count(2, None).unwrap(), 1);
}
