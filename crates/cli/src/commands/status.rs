//! Shipping status command.
//!
//! Replays a fixture of shipping events through a fresh ledger and reports
//! the resulting status of every line. Useful for checking event sequences
//! offline before posting them against a live order.
//!
//! # Fixture format
//!
//! ```json
//! {
//!   "event_types": [
//!     {"id": 1, "code": "dispatched", "name": "Dispatched",
//!      "is_required": true, "sequence_number": 1}
//!   ],
//!   "batch": { "id": 1, "order_id": 1, "partner_id": 1, "lines": [...] },
//!   "events": [
//!     {"event_type": "dispatched", "notes": "tracking 4021",
//!      "lines": [{"line_id": 1, "quantity": 2}]}
//!   ]
//! }
//! ```

use serde::Deserialize;

use driftwood_core::BatchLineId;
use driftwood_orders::{Batch, ShippingEventLedger, ShippingEventType};

use super::{CliError, load_json};

/// A replayable ledger fixture.
#[derive(Debug, Deserialize)]
struct LedgerFixture {
    event_types: Vec<ShippingEventType>,
    batch: Batch,
    #[serde(default)]
    events: Vec<EventFixture>,
}

/// One event to replay.
#[derive(Debug, Deserialize)]
struct EventFixture {
    event_type: String,
    #[serde(default)]
    notes: Option<String>,
    lines: Vec<LineQuantity>,
}

#[derive(Debug, Deserialize)]
struct LineQuantity {
    line_id: BatchLineId,
    #[serde(default)]
    quantity: u32,
}

/// Replay a fixture and report per-line shipping status.
pub fn run(fixture_path: &str) -> Result<(), CliError> {
    let fixture: LedgerFixture = load_json(fixture_path)?;

    let ledger = ShippingEventLedger::new(fixture.event_types);
    ledger.register_batch(&fixture.batch);

    for event in &fixture.events {
        let line_quantities: Vec<(BatchLineId, u32)> = event
            .lines
            .iter()
            .map(|line| (line.line_id, line.quantity))
            .collect();
        let recorded = ledger.record(
            &event.event_type,
            &fixture.batch,
            &line_quantities,
            event.notes.as_deref(),
        )?;
        tracing::debug!(
            event_id = %recorded.id,
            event_type = %event.event_type,
            "replayed event"
        );
    }

    tracing::info!(
        "Replayed {} event(s) against batch {}",
        fixture.events.len(),
        fixture.batch.id
    );
    for line in &fixture.batch.lines {
        let summary = ledger.shipping_status_summary(line.id);
        if summary.is_empty() {
            tracing::info!("  line {}: {} - no events", line.id, line.description());
        } else {
            tracing::info!("  line {}: {} - {summary}", line.id, line.description());
        }
    }
    Ok(())
}
