//! Shipping event sequencing across the full dispatch lifecycle.
//!
//! Drives the ledger the way a fulfillment dashboard does: register a batch
//! at placement, then post events against its lines as the partner reports
//! progress.

use std::sync::{Arc, Barrier};
use std::thread;

use driftwood_core::BatchLineId;
use driftwood_integration_tests::{batch, dispatch_deliver_types};
use driftwood_orders::{LedgerError, ShippingEventLedger};

fn ledger_for(quantities: &[u32]) -> (ShippingEventLedger, driftwood_orders::Batch) {
    let ledger = ShippingEventLedger::new(dispatch_deliver_types());
    let b = batch(quantities);
    ledger.register_batch(&b);
    (ledger, b)
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn full_lifecycle_across_multiple_lines() {
    let (ledger, b) = ledger_for(&[5, 2]);
    let line_one = BatchLineId::new(1);
    let line_two = BatchLineId::new(2);

    // Placement covers both lines in full (0 = full remaining quantity)
    ledger
        .record("order-placed", &b, &[(line_one, 0), (line_two, 0)], None)
        .expect("placement event");

    // Partner dispatches line one in two parcels, line two in one
    ledger
        .record("dispatched", &b, &[(line_one, 3)], Some("parcel 1/2"))
        .expect("first parcel");
    ledger
        .record(
            "dispatched",
            &b,
            &[(line_one, 2), (line_two, 2)],
            Some("parcel 2/2"),
        )
        .expect("second parcel");

    assert!(ledger.has_shipping_event_occurred(line_one, "dispatched"));
    assert!(ledger.has_shipping_event_occurred(line_two, "dispatched"));
    assert!(!ledger.has_shipping_event_occurred(line_one, "delivered"));

    ledger
        .record("delivered", &b, &[(line_one, 5), (line_two, 2)], None)
        .expect("delivery event");

    assert_eq!(ledger.shipping_status(line_one), vec![
        ("Order placed".to_string(), 5),
        ("Dispatched".to_string(), 5),
        ("Delivered".to_string(), 5),
    ]);
    assert_eq!(ledger.events().len(), 4);
}

#[test]
fn partial_progress_renders_in_the_summary() {
    let (ledger, b) = ledger_for(&[5]);
    let line = BatchLineId::new(1);

    ledger
        .record("order-placed", &b, &[(line, 0)], None)
        .expect("placement event");
    ledger
        .record("dispatched", &b, &[(line, 2)], None)
        .expect("partial dispatch");

    assert_eq!(
        ledger.shipping_status_summary(line),
        "Order placed, Dispatched (2/5 items)"
    );
}

#[test]
fn skipping_a_stage_is_rejected() {
    let (ledger, b) = ledger_for(&[5]);
    let line = BatchLineId::new(1);

    ledger
        .record("order-placed", &b, &[(line, 0)], None)
        .expect("placement event");

    let err = ledger
        .record("delivered", &b, &[(line, 5)], None)
        .expect_err("nothing dispatched yet");
    assert!(matches!(err, LedgerError::PriorEventIncomplete { .. }));
}

#[test]
fn overshooting_a_line_is_rejected_even_across_events() {
    let (ledger, b) = ledger_for(&[5]);
    let line = BatchLineId::new(1);

    ledger
        .record("order-placed", &b, &[(line, 0)], None)
        .expect("placement event");
    ledger
        .record("dispatched", &b, &[(line, 4)], None)
        .expect("first dispatch");

    let err = ledger
        .record("dispatched", &b, &[(line, 2)], None)
        .expect_err("4 + 2 > 5");
    assert_eq!(
        err,
        LedgerError::QuantityExceedsLineTotal {
            line_id: line,
            event_type: "dispatched".to_string(),
            quantity: 2,
            already_recorded: 4,
            line_quantity: 5,
        }
    );

    // The remaining unit still goes through
    ledger
        .record("dispatched", &b, &[(line, 1)], None)
        .expect("final unit");
}

// =============================================================================
// Concurrency
// =============================================================================

/// Two callers racing to record 3 units each against a line of 5: the ledger
/// must serialize validate-and-append, so exactly one attempt wins.
#[test]
fn concurrent_appends_cannot_jointly_overshoot() {
    let (ledger, b) = ledger_for(&[5]);
    let line = BatchLineId::new(1);
    ledger
        .record("order-placed", &b, &[(line, 0)], None)
        .expect("placement event");

    let ledger = Arc::new(ledger);
    let b = Arc::new(b);
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            let b = Arc::clone(&b);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                ledger.record("dispatched", &b, &[(line, 3)], None).is_ok()
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread completes"))
        .filter(|&ok| ok)
        .count();

    assert_eq!(successes, 1, "exactly one racing append may win");
    assert_eq!(ledger.cumulative_quantity(line, "dispatched"), 3);
}
