//! The append-only shipping event ledger.
//!
//! The ledger owns the quantized progress of batch lines through shipping
//! event types. Rows are only ever appended; current status is the running
//! total per (line, event type), maintained incrementally as events land.
//!
//! Recording is a single validate-and-append critical section. Two callers
//! racing to record against the same line would otherwise both validate
//! against stale totals and jointly overshoot the line quantity, so this
//! serialization is a correctness requirement, not an optimization.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use tracing::{debug, info, instrument};

use driftwood_core::{BatchLineId, ShippingEventId, ShippingEventTypeId};

use crate::error::LedgerError;
use crate::models::{Batch, ShippingEvent, ShippingEventQuantity, ShippingEventType};

/// Tracks shipping events for the lines of one or more batches.
#[derive(Debug)]
pub struct ShippingEventLedger {
    /// Event types this ledger knows, sorted by sequence number.
    event_types: Vec<ShippingEventType>,
    state: Mutex<LedgerState>,
}

#[derive(Debug, Default)]
struct LedgerState {
    lines: HashMap<BatchLineId, LineRecord>,
    events: Vec<ShippingEvent>,
}

#[derive(Debug)]
struct LineRecord {
    /// The line's fixed total quantity.
    quantity: u32,
    /// Cumulative recorded quantity per event type.
    totals: HashMap<ShippingEventTypeId, u32>,
}

impl LineRecord {
    fn total_for(&self, event_type_id: ShippingEventTypeId) -> u32 {
        self.totals.get(&event_type_id).copied().unwrap_or(0)
    }
}

impl ShippingEventLedger {
    /// Create a ledger over the given event types.
    #[must_use]
    pub fn new(mut event_types: Vec<ShippingEventType>) -> Self {
        event_types.sort_by_key(|event_type| event_type.sequence_number);
        Self {
            event_types,
            state: Mutex::new(LedgerState::default()),
        }
    }

    /// The event types this ledger knows, in sequence order.
    #[must_use]
    pub fn event_types(&self) -> &[ShippingEventType] {
        &self.event_types
    }

    /// Look an event type up by its code.
    #[must_use]
    pub fn event_type(&self, code: &str) -> Option<&ShippingEventType> {
        self.event_types
            .iter()
            .find(|event_type| event_type.code == code)
    }

    /// Make a batch's lines known to the ledger.
    ///
    /// Called once at order placement. Lines already registered are left
    /// untouched, so re-registering a batch never resets history.
    pub fn register_batch(&self, batch: &Batch) {
        let mut state = self.lock_state();
        for line in &batch.lines {
            state.lines.entry(line.id).or_insert_with(|| LineRecord {
                quantity: line.quantity,
                totals: HashMap::new(),
            });
        }
    }

    /// Record a shipping event against some of a batch's lines.
    ///
    /// `line_quantities` maps lines to the quantity passing this event; a
    /// quantity of 0 means "the line's remaining quantity for this event
    /// type". Validation completes for every line before any state is
    /// touched - on error, nothing is recorded.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::UnknownEventType`] / [`LedgerError::UnknownLine`] for
    ///   references the ledger does not know
    /// - [`LedgerError::EmptyEvent`] / [`LedgerError::ZeroQuantity`] for
    ///   events that would cover nothing
    /// - [`LedgerError::PriorEventIncomplete`] when an earlier-sequenced
    ///   event has not passed enough units
    /// - [`LedgerError::QuantityExceedsLineTotal`] when the running total
    ///   would overshoot the line quantity
    #[instrument(skip_all, fields(event_type = event_type_code, batch_id = %batch.id))]
    pub fn record(
        &self,
        event_type_code: &str,
        batch: &Batch,
        line_quantities: &[(BatchLineId, u32)],
        notes: Option<&str>,
    ) -> Result<ShippingEvent, LedgerError> {
        let event_type = self
            .event_type(event_type_code)
            .ok_or_else(|| LedgerError::UnknownEventType(event_type_code.to_string()))?;
        if line_quantities.is_empty() {
            return Err(LedgerError::EmptyEvent);
        }

        let mut state = self.lock_state();

        // Validate every line first; only then mutate. Quantities already
        // accepted within this call count against later entries for the
        // same line, so a duplicated line cannot sneak past the total.
        let mut pending: HashMap<BatchLineId, u32> = HashMap::new();
        let mut resolved = Vec::with_capacity(line_quantities.len());
        for &(line_id, requested) in line_quantities {
            if batch.line(line_id).is_none() {
                return Err(LedgerError::UnknownLine(line_id));
            }
            let record = state
                .lines
                .get(&line_id)
                .ok_or(LedgerError::UnknownLine(line_id))?;

            let already_recorded =
                record.total_for(event_type.id) + pending.get(&line_id).copied().unwrap_or(0);
            let quantity = if requested == 0 {
                record.quantity - already_recorded
            } else {
                requested
            };
            if quantity == 0 {
                return Err(LedgerError::ZeroQuantity {
                    line_id,
                    event_type: event_type.code.clone(),
                });
            }

            self.check_prior_events(event_type, record, line_id, quantity)?;

            if already_recorded + quantity > record.quantity {
                return Err(LedgerError::QuantityExceedsLineTotal {
                    line_id,
                    event_type: event_type.code.clone(),
                    quantity,
                    already_recorded,
                    line_quantity: record.quantity,
                });
            }

            debug!(%line_id, quantity, "validated line for shipping event");
            *pending.entry(line_id).or_insert(0) += quantity;
            resolved.push(ShippingEventQuantity { line_id, quantity });
        }

        // All lines validated; append the event and bump running totals.
        for entry in &resolved {
            if let Some(record) = state.lines.get_mut(&entry.line_id) {
                *record.totals.entry(event_type.id).or_insert(0) += entry.quantity;
            }
        }
        let event = ShippingEvent {
            id: ShippingEventId::random(),
            order_id: batch.order_id,
            batch_id: batch.id,
            event_type_id: event_type.id,
            notes: notes.map(String::from),
            date: Utc::now(),
            quantities: resolved,
        };
        state.events.push(event.clone());
        info!(
            event_id = %event.id,
            lines = event.num_affected_lines(),
            "recorded shipping event"
        );
        Ok(event)
    }

    /// The earlier-event check: every earlier-sequenced type that is
    /// required, or that already has history for this line, must have passed
    /// at least `quantity` units.
    fn check_prior_events(
        &self,
        event_type: &ShippingEventType,
        record: &LineRecord,
        line_id: BatchLineId,
        quantity: u32,
    ) -> Result<(), LedgerError> {
        for prior in self
            .event_types
            .iter()
            .filter(|prior| prior.sequence_number < event_type.sequence_number)
        {
            let prior_quantity = record.total_for(prior.id);
            if (prior.is_required || prior_quantity > 0) && prior_quantity < quantity {
                return Err(LedgerError::PriorEventIncomplete {
                    line_id,
                    event_type: event_type.code.clone(),
                    prior_event_type: prior.code.clone(),
                    quantity,
                    prior_quantity,
                });
            }
        }
        Ok(())
    }

    /// The cumulative quantity recorded for a line under an event type.
    #[must_use]
    pub fn cumulative_quantity(&self, line_id: BatchLineId, event_type_code: &str) -> u32 {
        let Some(event_type) = self.event_type(event_type_code) else {
            return 0;
        };
        self.lock_state()
            .lines
            .get(&line_id)
            .map_or(0, |record| record.total_for(event_type.id))
    }

    /// The shipping status of a line: event name to cumulative quantity, in
    /// sequence order, for every event type with recorded history.
    #[must_use]
    pub fn shipping_status(&self, line_id: BatchLineId) -> Vec<(String, u32)> {
        let state = self.lock_state();
        let Some(record) = state.lines.get(&line_id) else {
            return Vec::new();
        };
        self.event_types
            .iter()
            .filter_map(|event_type| {
                let total = record.total_for(event_type.id);
                (total > 0).then(|| (event_type.name.clone(), total))
            })
            .collect()
    }

    /// A display summary of a line's shipping status, rendering stages that
    /// have only partially passed as `"Name (2/5 items)"`.
    #[must_use]
    pub fn shipping_status_summary(&self, line_id: BatchLineId) -> String {
        let state = self.lock_state();
        let Some(record) = state.lines.get(&line_id) else {
            return String::new();
        };
        self.event_types
            .iter()
            .filter_map(|event_type| {
                let total = record.total_for(event_type.id);
                if total == 0 {
                    None
                } else if total == record.quantity {
                    Some(event_type.name.clone())
                } else {
                    Some(format!(
                        "{} ({total}/{} items)",
                        event_type.name, record.quantity
                    ))
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether a line has fully passed an event type.
    ///
    /// Partial completion returns false: 3 of 5 units dispatched does not
    /// count as dispatched.
    #[must_use]
    pub fn has_shipping_event_occurred(&self, line_id: BatchLineId, event_type_code: &str) -> bool {
        let Some(event_type) = self.event_type(event_type_code) else {
            return false;
        };
        self.lock_state().lines.get(&line_id).is_some_and(|record| {
            record.quantity > 0 && record.total_for(event_type.id) == record.quantity
        })
    }

    /// All recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<ShippingEvent> {
        self.lock_state().events.clone()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, LedgerState> {
        // A poisoned lock means a panic mid-append on another thread; the
        // state itself is only mutated after validation, so carry on.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
